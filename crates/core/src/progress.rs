//! Percentages shown on topic cards and dashboards.
//!
//! Each category is rounded to a whole percentage first, and the overall
//! figure is the rounded mean of those already-rounded values. Keep the two
//! stages: a single fused fraction differs by one point on some inputs.

use serde::{Deserialize, Serialize};

use crate::model::ContentKind;

/// Completed vs. total items of one content variant within a topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryTally {
    total: u32,
    completed: u32,
}

impl CategoryTally {
    /// `completed` is capped at `total`.
    #[must_use]
    pub fn new(total: u32, completed: u32) -> Self {
        Self {
            total,
            completed: completed.min(total),
        }
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn completed(&self) -> u32 {
        self.completed
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// `round(100 * completed / total)`, or 0 for an empty category.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = round_half_up(100 * u64::from(self.completed), u64::from(self.total));
        u8::try_from(pct.min(100)).unwrap_or(100)
    }
}

/// `num / den` rounded half-up, for non-negative operands and `den > 0`.
fn round_half_up(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

/// Progress of one user through one topic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicProgress {
    #[serde(rename = "videoProgress")]
    pub video: u8,
    #[serde(rename = "mcqProgress")]
    pub mcq: u8,
    #[serde(rename = "codingProgress")]
    pub coding: u8,
    #[serde(rename = "overallProgress")]
    pub overall: u8,
}

impl TopicProgress {
    pub const ZERO: TopicProgress = TopicProgress {
        video: 0,
        mcq: 0,
        coding: 0,
        overall: 0,
    };

    /// Percentage of one category.
    #[must_use]
    pub fn category(&self, kind: ContentKind) -> u8 {
        match kind {
            ContentKind::Video => self.video,
            ContentKind::Mcq => self.mcq,
            ContentKind::CodingProblem => self.coding,
        }
    }

    /// Combines the three category tallies.
    ///
    /// Empty categories report 0 and are left out of the overall mean.
    #[must_use]
    pub fn from_tallies(video: CategoryTally, mcq: CategoryTally, coding: CategoryTally) -> Self {
        let (sum, weight) = [video, mcq, coding]
            .iter()
            .filter(|tally| !tally.is_empty())
            .fold((0_u64, 0_u64), |(sum, weight), tally| {
                (sum + u64::from(tally.percent()), weight + 1)
            });

        let overall = if weight == 0 {
            0
        } else {
            u8::try_from(round_half_up(sum, weight).min(100)).unwrap_or(100)
        };

        Self {
            video: video.percent(),
            mcq: mcq.percent(),
            coding: coding.percent(),
            overall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_category_is_zero() {
        assert_eq!(CategoryTally::new(0, 0).percent(), 0);
        assert_eq!(CategoryTally::new(0, 5).percent(), 0);
    }

    #[test]
    fn halves_round_up() {
        // 1/8 = 12.5% -> 13
        assert_eq!(CategoryTally::new(8, 1).percent(), 13);
        // 1/3 = 33.3% -> 33, 2/3 = 66.6% -> 67
        assert_eq!(CategoryTally::new(3, 1).percent(), 33);
        assert_eq!(CategoryTally::new(3, 2).percent(), 67);
    }

    #[test]
    fn completed_is_capped_at_total() {
        let tally = CategoryTally::new(2, 9);
        assert_eq!(tally.completed(), 2);
        assert_eq!(tally.percent(), 100);
    }

    #[test]
    fn empty_categories_are_excluded_from_overall() {
        let progress = TopicProgress::from_tallies(
            CategoryTally::new(4, 2),
            CategoryTally::new(0, 0),
            CategoryTally::new(4, 1),
        );
        assert_eq!(
            progress,
            TopicProgress {
                video: 50,
                mcq: 0,
                coding: 25,
                overall: 38,
            }
        );
    }

    #[test]
    fn all_empty_is_zero() {
        let progress = TopicProgress::from_tallies(
            CategoryTally::default(),
            CategoryTally::default(),
            CategoryTally::default(),
        );
        assert_eq!(progress, TopicProgress::ZERO);
    }

    #[test]
    fn everything_done_is_one_hundred() {
        let progress = TopicProgress::from_tallies(
            CategoryTally::new(3, 3),
            CategoryTally::new(0, 0),
            CategoryTally::new(7, 7),
        );
        assert_eq!(progress.overall, 100);
    }

    #[test]
    fn overall_rounds_the_rounded_categories() {
        // 1/8 -> 13 (12.5), 3/8 -> 38 (37.5); rounded mean 25.5 -> 26, fused mean 25.
        let progress = TopicProgress::from_tallies(
            CategoryTally::new(8, 1),
            CategoryTally::new(8, 3),
            CategoryTally::new(0, 0),
        );
        assert_eq!(progress.video, 13);
        assert_eq!(progress.mcq, 38);
        assert_eq!(progress.overall, 26);
    }

    #[test]
    fn category_picks_the_matching_field() {
        let progress = TopicProgress {
            video: 1,
            mcq: 2,
            coding: 3,
            overall: 2,
        };
        let picked: Vec<u8> = ContentKind::ALL.iter().map(|k| progress.category(*k)).collect();
        assert_eq!(picked, vec![1, 2, 3]);
    }

    #[test]
    fn serializes_with_view_field_names() {
        let json = serde_json::to_value(TopicProgress {
            video: 10,
            mcq: 20,
            coding: 30,
            overall: 20,
        })
        .unwrap();
        assert_eq!(json["videoProgress"], 10);
        assert_eq!(json["overallProgress"], 20);
    }
}
