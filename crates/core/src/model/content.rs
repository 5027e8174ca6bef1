use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::model::ids::{CheatSheetId, McqId, ProblemId, VideoId};
use crate::model::topic::{Difficulty, Platform, Topic};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentError {
    #[error("title cannot be empty")]
    EmptyTitle,

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("invalid MCQ option: {0}")]
    InvalidOption(String),
}

//
// ─── VIDEO ─────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub platform: String,
    pub duration_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl Video {
    /// Player URL for the video.
    ///
    /// YouTube watch and short links become `https://www.youtube.com/embed/<id>`;
    /// anything else is returned as stored.
    #[must_use]
    pub fn embed_url(&self) -> String {
        youtube_video_id(&self.video_url).map_or_else(
            || self.video_url.clone(),
            |id| format!("https://www.youtube.com/embed/{id}"),
        )
    }
}

fn youtube_video_id(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let host = url.host_str()?;
    let id = if host == "youtu.be" {
        url.path_segments()?.next().map(str::to_owned)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        if url.path() != "/watch" {
            return None;
        }
        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
    } else {
        None
    }?;
    (!id.is_empty()).then_some(id)
}

//
// ─── MCQ ───────────────────────────────────────────────────────────────────────
//

/// Answer slot of a four-option question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum McqOption {
    A,
    B,
    C,
    D,
}

impl McqOption {
    pub const ALL: [McqOption; 4] = [McqOption::A, McqOption::B, McqOption::C, McqOption::D];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            McqOption::A => "A",
            McqOption::B => "B",
            McqOption::C => "C",
            McqOption::D => "D",
        }
    }

    fn index(self) -> usize {
        match self {
            McqOption::A => 0,
            McqOption::B => 1,
            McqOption::C => 2,
            McqOption::D => 3,
        }
    }
}

impl fmt::Display for McqOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for McqOption {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        McqOption::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ContentError::InvalidOption(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mcq {
    pub id: McqId,
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub question: String,
    /// Option texts in A..D order.
    pub options: [String; 4],
    pub correct: McqOption,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Mcq {
    #[must_use]
    pub fn option_text(&self, option: McqOption) -> &str {
        &self.options[option.index()]
    }

    #[must_use]
    pub fn check(&self, selected: McqOption) -> bool {
        self.correct == selected
    }
}

//
// ─── CODING PROBLEM ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingProblem {
    pub id: ProblemId,
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub title: String,
    pub description: Option<String>,
    pub problem_url: String,
    pub platform: Platform,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

//
// ─── CHEAT SHEET ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheatSheet {
    pub id: CheatSheetId,
    pub topic: Topic,
    pub title: String,
    /// Markdown body.
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validates a content title and a link shared by all content drafts.
///
/// # Errors
///
/// Returns `ContentError::EmptyTitle` for blank titles and
/// `ContentError::InvalidUrl` if the link does not parse.
pub fn validate_listing(title: &str, link: &str) -> Result<(), ContentError> {
    if title.trim().is_empty() {
        return Err(ContentError::EmptyTitle);
    }
    Url::parse(link.trim()).map_err(|_| ContentError::InvalidUrl(link.to_string()))?;
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn video(url: &str) -> Video {
        Video {
            id: VideoId::new(1),
            topic: Topic::Sorting,
            difficulty: Difficulty::Beginner,
            title: "Merge sort".into(),
            description: None,
            video_url: url.into(),
            platform: "YouTube".into(),
            duration_minutes: Some(12),
            created_at: fixed_now(),
        }
    }

    #[test]
    fn watch_links_become_embed_links() {
        let v = video("https://www.youtube.com/watch?v=4VqmGXwpLqc&t=30s");
        assert_eq!(v.embed_url(), "https://www.youtube.com/embed/4VqmGXwpLqc");
    }

    #[test]
    fn short_links_become_embed_links() {
        let v = video("https://youtu.be/4VqmGXwpLqc?si=abc");
        assert_eq!(v.embed_url(), "https://www.youtube.com/embed/4VqmGXwpLqc");
    }

    #[test]
    fn other_links_pass_through() {
        let v = video("https://vimeo.com/123");
        assert_eq!(v.embed_url(), "https://vimeo.com/123");
        let v = video("not a url");
        assert_eq!(v.embed_url(), "not a url");
    }

    #[test]
    fn mcq_checks_selected_option() {
        let mcq = Mcq {
            id: McqId::new(7),
            topic: Topic::Basics,
            difficulty: Difficulty::Beginner,
            question: "2 + 2?".into(),
            options: ["3".into(), "4".into(), "5".into(), "22".into()],
            correct: McqOption::B,
            explanation: None,
            created_at: fixed_now(),
        };
        assert!(mcq.check(McqOption::B));
        assert!(!mcq.check(McqOption::D));
        assert_eq!(mcq.option_text(McqOption::D), "22");
    }

    #[test]
    fn option_parsing_is_case_insensitive() {
        assert_eq!("c".parse::<McqOption>().unwrap(), McqOption::C);
        assert!("E".parse::<McqOption>().is_err());
    }

    #[test]
    fn listing_requires_title_and_url() {
        assert_eq!(
            validate_listing(" ", "https://leetcode.com/problems/two-sum"),
            Err(ContentError::EmptyTitle)
        );
        assert!(matches!(
            validate_listing("Two Sum", "leetcode two sum"),
            Err(ContentError::InvalidUrl(_))
        ));
        assert!(validate_listing("Two Sum", "https://leetcode.com/problems/two-sum").is_ok());
    }
}
