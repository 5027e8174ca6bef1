use dsa_core::TopicProgress;
use serde::Serialize;

use crate::error::ProgressError;

/// What a progress view shows for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProgressState {
    /// A request is in flight and nothing has been applied yet.
    Loading,
    Ready {
        progress: TopicProgress,
    },
    /// A read failed; the view shows zeros and the reason.
    Unavailable {
        progress: TopicProgress,
        reason: String,
    },
}

impl ProgressState {
    #[must_use]
    pub fn ready(progress: TopicProgress) -> Self {
        Self::Ready { progress }
    }

    #[must_use]
    pub fn unavailable(error: &ProgressError) -> Self {
        Self::Unavailable {
            progress: TopicProgress::ZERO,
            reason: error.to_string(),
        }
    }

    /// Percentages to display; zero unless the state is `Ready`.
    #[must_use]
    pub fn progress(&self) -> TopicProgress {
        match self {
            Self::Ready { progress } => *progress,
            Self::Loading | Self::Unavailable { .. } => TopicProgress::ZERO,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::StorageError;

    #[test]
    fn unavailable_shows_zero() {
        let err = ProgressError::DataUnavailable(StorageError::Connection("down".into()));
        let state = ProgressState::unavailable(&err);
        assert!(state.is_unavailable());
        assert_eq!(state.progress(), TopicProgress::ZERO);
    }

    #[test]
    fn serializes_with_status_tag() {
        let state = ProgressState::ready(TopicProgress {
            video: 50,
            mcq: 0,
            coding: 25,
            overall: 38,
        });
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["progress"]["overallProgress"], 38);
    }
}
