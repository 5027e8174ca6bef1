use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Raised when a raw string does not name one of the closed enumerations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicParseError {
    #[error("unknown topic: {0}")]
    UnknownTopic(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// Fixed content category. Every content item belongs to exactly one topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Strings,
    Basics,
    BitManipulation,
    Sorting,
    Searching,
    Hashmaps,
}

impl Topic {
    /// Dashboard order.
    pub const ALL: [Topic; 6] = [
        Topic::Strings,
        Topic::Basics,
        Topic::BitManipulation,
        Topic::Sorting,
        Topic::Searching,
        Topic::Hashmaps,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Topic::Strings => "strings",
            Topic::Basics => "basics",
            Topic::BitManipulation => "bit_manipulation",
            Topic::Sorting => "sorting",
            Topic::Searching => "searching",
            Topic::Hashmaps => "hashmaps",
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Topic::Strings => "Strings",
            Topic::Basics => "Programming Basics",
            Topic::BitManipulation => "Bit Manipulation",
            Topic::Sorting => "Sorting Algorithms",
            Topic::Searching => "Searching Algorithms",
            Topic::Hashmaps => "Hash Maps",
        }
    }

    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Topic::Strings => "Learn string manipulation and algorithms",
            Topic::Basics => "Variables, I/O, and control structures",
            Topic::BitManipulation => "Bitwise operations and techniques",
            Topic::Sorting => "Various sorting techniques and their complexity",
            Topic::Searching => "Binary search and other search techniques",
            Topic::Hashmaps => "Hash tables and their applications",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s)
            .ok_or_else(|| TopicParseError::UnknownTopic(s.to_string()))
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Medium,
    High,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Beginner, Difficulty::Medium, Difficulty::High];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Medium => "medium",
            Difficulty::High => "high",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| TopicParseError::UnknownDifficulty(s.to_string()))
    }
}

//
// ─── PLATFORM ──────────────────────────────────────────────────────────────────
//

/// Judge hosting a coding problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Leetcode,
    Hackerrank,
    Codeforces,
    Codechef,
    Geeksforgeeks,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::Leetcode,
        Platform::Hackerrank,
        Platform::Codeforces,
        Platform::Codechef,
        Platform::Geeksforgeeks,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Leetcode => "leetcode",
            Platform::Hackerrank => "hackerrank",
            Platform::Codeforces => "codeforces",
            Platform::Codechef => "codechef",
            Platform::Geeksforgeeks => "geeksforgeeks",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = TopicParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| TopicParseError::UnknownPlatform(s.to_string()))
    }
}

//
// ─── CONTENT KIND ──────────────────────────────────────────────────────────────
//

/// The three progress-bearing content variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Video,
    Mcq,
    CodingProblem,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::Video, ContentKind::Mcq, ContentKind::CodingProblem];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Video => "video",
            ContentKind::Mcq => "mcq",
            ContentKind::CodingProblem => "coding_problem",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topics_round_trip_through_their_names() {
        for topic in Topic::ALL {
            assert_eq!(topic.as_str().parse::<Topic>().unwrap(), topic);
        }
    }

    #[test]
    fn unknown_topic_is_rejected() {
        let err = "graphs".parse::<Topic>().unwrap_err();
        assert_eq!(err, TopicParseError::UnknownTopic("graphs".into()));
        // names are case sensitive, as stored
        assert!("Sorting".parse::<Topic>().is_err());
    }

    #[test]
    fn serde_uses_storage_names() {
        let json = serde_json::to_string(&Topic::BitManipulation).unwrap();
        assert_eq!(json, "\"bit_manipulation\"");
        let back: Difficulty = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(back, Difficulty::Medium);
    }

    #[test]
    fn platform_and_difficulty_parse() {
        assert_eq!("codechef".parse::<Platform>().unwrap(), Platform::Codechef);
        assert!(matches!(
            "expert".parse::<Difficulty>(),
            Err(TopicParseError::UnknownDifficulty(_))
        ));
    }
}
