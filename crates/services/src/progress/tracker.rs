use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use dsa_core::model::{Topic, UserId};
use tracing::debug;

use super::aggregator::ProgressAggregator;
use super::state::ProgressState;

/// One issued progress computation. Only the most recently issued request may
/// update the tracked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressRequest {
    seq: u64,
    pub topic: Topic,
    pub user: Option<UserId>,
}

impl ProgressRequest {
    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// Holds the progress shown by one view while topic or user change underneath it.
#[derive(Debug)]
pub struct ProgressTracker {
    latest: AtomicU64,
    state: Mutex<ProgressState>,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
            state: Mutex::new(ProgressState::Loading),
        }
    }

    /// Issues a new request and switches the view to `Loading`.
    pub fn begin(&self, topic: Topic, user: Option<UserId>) -> ProgressRequest {
        let seq = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if self.latest.load(Ordering::Acquire) == seq {
            *state = ProgressState::Loading;
        }
        ProgressRequest { seq, topic, user }
    }

    /// Stores `result` if `request` is still the latest one. Returns whether it was stored.
    pub fn apply(&self, request: &ProgressRequest, result: ProgressState) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if self.latest.load(Ordering::Acquire) != request.seq {
            debug!(
                seq = request.seq,
                topic = %request.topic,
                "discarding stale progress result"
            );
            return false;
        }
        *state = result;
        true
    }

    /// Begins, computes and applies in one go.
    pub async fn refresh(
        &self,
        aggregator: &ProgressAggregator,
        topic: Topic,
        user: Option<UserId>,
    ) -> bool {
        let request = self.begin(topic, user);
        let result = aggregator.compute_progress(request.topic, request.user).await;
        self.apply(&request, result)
    }

    #[must_use]
    pub fn current(&self) -> ProgressState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{add_videos, complete_video};
    use dsa_core::TopicProgress;
    use std::sync::Arc;
    use storage::repository::InMemoryRepository;

    fn ready(overall: u8) -> ProgressState {
        ProgressState::ready(TopicProgress {
            video: overall,
            mcq: 0,
            coding: 0,
            overall,
        })
    }

    #[test]
    fn starts_loading() {
        assert!(ProgressTracker::new().current().is_loading());
    }

    #[test]
    fn stale_result_is_discarded() {
        let tracker = ProgressTracker::new();
        let user = Some(UserId::random());
        let old = tracker.begin(Topic::Sorting, user);
        let new = tracker.begin(Topic::Strings, user);

        assert!(tracker.apply(&new, ready(40)));
        assert!(!tracker.apply(&old, ready(90)));
        assert_eq!(tracker.current(), ready(40));
    }

    #[test]
    fn begin_resets_to_loading() {
        let tracker = ProgressTracker::new();
        let first = tracker.begin(Topic::Sorting, None);
        assert!(tracker.apply(&first, ready(10)));
        let second = tracker.begin(Topic::Sorting, None);
        assert!(tracker.current().is_loading());
        assert!(second.seq() > first.seq());
    }

    #[tokio::test]
    async fn refresh_applies_latest_computation() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let videos = add_videos(&repo, Topic::Sorting, 2).await;
        complete_video(&repo, user, videos[0]).await;
        let aggregator = ProgressAggregator::new(Arc::new(repo.clone()), Arc::new(repo));

        let tracker = ProgressTracker::new();
        assert!(tracker.refresh(&aggregator, Topic::Sorting, Some(user)).await);
        assert_eq!(tracker.current().progress().video, 50);
    }
}
