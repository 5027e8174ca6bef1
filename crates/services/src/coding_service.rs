use std::collections::HashMap;
use std::sync::Arc;

use dsa_core::model::{CodingProgress, ProblemId, UserId};
use storage::repository::ProgressRepository;
use tracing::info;

use crate::Clock;
use crate::error::TrackingError;

/// Tracks attempted/solved flags on coding problems.
#[derive(Clone)]
pub struct CodingProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
}

impl CodingProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, progress }
    }

    async fn load(&self, user: UserId, problem: ProblemId) -> Result<CodingProgress, TrackingError> {
        Ok(self
            .progress
            .get_coding_progress(user, problem)
            .await?
            .unwrap_or_else(|| CodingProgress::untouched(user, problem)))
    }

    /// Set or clear the attempted flag. Clearing it also clears solved.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Storage` if the problem does not exist or the write fails.
    pub async fn set_attempted(
        &self,
        user: UserId,
        problem: ProblemId,
        attempted: bool,
    ) -> Result<CodingProgress, TrackingError> {
        let mut progress = self.load(user, problem).await?;
        progress.set_attempted(attempted, self.clock.now());
        self.progress.upsert_coding_progress(&progress).await?;
        Ok(progress)
    }

    /// Set or clear the solved flag. Solving also marks the problem attempted.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Storage` if the problem does not exist or the write fails.
    pub async fn set_solved(
        &self,
        user: UserId,
        problem: ProblemId,
        solved: bool,
    ) -> Result<CodingProgress, TrackingError> {
        let mut progress = self.load(user, problem).await?;
        progress.set_solved(solved, self.clock.now());
        self.progress.upsert_coding_progress(&progress).await?;
        if solved {
            info!(%user, %problem, "problem solved");
        }
        Ok(progress)
    }

    /// Stored progress for each of `problems`; untouched problems are absent.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Storage` if repository access fails.
    pub async fn progress_map(
        &self,
        user: UserId,
        problems: &[ProblemId],
    ) -> Result<HashMap<ProblemId, CodingProgress>, TrackingError> {
        let rows = self.progress.coding_progress_for(user, problems).await?;
        Ok(rows.into_iter().map(|p| (p.problem_id, p)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::add_problems;
    use dsa_core::model::Topic;
    use dsa_core::time::fixed_now;
    use storage::repository::{InMemoryRepository, StorageError};

    #[tokio::test]
    async fn solve_then_clear_attempt() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let problems = add_problems(&repo, Topic::BitManipulation, 2).await;
        let svc = CodingProgressService::new(Clock::fixed(fixed_now()), Arc::new(repo));

        let solved = svc.set_solved(user, problems[0], true).await.unwrap();
        assert!(solved.attempted() && solved.solved());
        svc.set_attempted(user, problems[1], true).await.unwrap();

        let map = svc.progress_map(user, &problems).await.unwrap();
        assert_eq!(map.len(), 2);
        assert!(map[&problems[0]].solved());
        assert!(!map[&problems[1]].solved());

        let cleared = svc.set_attempted(user, problems[0], false).await.unwrap();
        assert!(!cleared.attempted());
        assert!(!cleared.solved());
    }

    #[tokio::test]
    async fn unknown_problem_is_rejected() {
        let repo = InMemoryRepository::new();
        let svc = CodingProgressService::new(Clock::fixed(fixed_now()), Arc::new(repo));
        let err = svc
            .set_solved(UserId::random(), ProblemId::new(5), true)
            .await
            .unwrap_err();
        assert!(matches!(err, TrackingError::Storage(StorageError::NotFound)));
    }
}
