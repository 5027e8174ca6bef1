use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use dsa_core::model::{Topic, UserId};
use dsa_core::{CategoryTally, TopicProgress};
use storage::repository::{ContentRepository, ProgressRepository};
use tracing::{debug, warn};

use super::state::ProgressState;
use crate::error::ProgressError;

/// Computes a user's percentages for one topic from the content catalog and
/// their completion records.
#[derive(Clone)]
pub struct ProgressAggregator {
    content: Arc<dyn ContentRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressAggregator {
    #[must_use]
    pub fn new(content: Arc<dyn ContentRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { content, progress }
    }

    /// Progress for display. Read failures become an all-zero `Unavailable` state.
    pub async fn compute_progress(&self, topic: Topic, user: Option<UserId>) -> ProgressState {
        match self.try_compute_progress(topic, user).await {
            Ok(progress) => ProgressState::ready(progress),
            Err(err) => {
                warn!(%topic, error = %err, "topic progress unavailable");
                ProgressState::unavailable(&err)
            }
        }
    }

    /// Like `compute_progress`, but hands the failure to the caller.
    ///
    /// Without a user every percentage is 0 and nothing is read.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::DataUnavailable` if any catalog or completion
    /// read fails; no partial result is produced.
    pub async fn try_compute_progress(
        &self,
        topic: Topic,
        user: Option<UserId>,
    ) -> Result<TopicProgress, ProgressError> {
        let Some(user) = user else {
            return Ok(TopicProgress::ZERO);
        };

        let (videos, mcqs, problems) = futures::try_join!(
            self.content.video_ids(topic),
            self.content.mcq_ids(topic),
            self.content.problem_ids(topic),
        )?;

        if videos.is_empty() && mcqs.is_empty() && problems.is_empty() {
            debug!(%topic, "topic has no content");
            return Ok(TopicProgress::ZERO);
        }

        let (watched, attempted, solved) = futures::try_join!(
            self.progress.completed_video_ids(user, &videos),
            self.progress.attempted_mcq_ids(user, &mcqs),
            self.progress.solved_problem_ids(user, &problems),
        )?;

        let progress = TopicProgress::from_tallies(
            tally(&videos, &watched),
            tally(&mcqs, &attempted),
            tally(&problems, &solved),
        );
        debug!(%topic, overall = progress.overall, "computed topic progress");
        Ok(progress)
    }

    /// Parses a topic name as it appears in routes (`"bit_manipulation"`) and
    /// computes its progress.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::UnknownTopic` for names outside the fixed set,
    /// before any read is issued.
    pub async fn try_compute_progress_by_name(
        &self,
        topic: &str,
        user: Option<UserId>,
    ) -> Result<TopicProgress, ProgressError> {
        let topic: Topic = topic.parse()?;
        self.try_compute_progress(topic, user).await
    }
}

/// Distinct items vs. distinct completed items that belong to `items`.
fn tally<T: Copy + Eq + Hash>(items: &[T], completed: &[T]) -> CategoryTally {
    let items: HashSet<T> = items.iter().copied().collect();
    let done = completed
        .iter()
        .copied()
        .filter(|id| items.contains(id))
        .collect::<HashSet<T>>()
        .len();
    CategoryTally::new(saturating_u32(items.len()), saturating_u32(done))
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
