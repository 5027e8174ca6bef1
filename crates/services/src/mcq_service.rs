use std::sync::Arc;

use dsa_core::model::{McqAttempt, McqId, McqOption, UserId};
use serde::Serialize;
use storage::repository::{ContentRepository, ProgressRepository, StorageError};
use tracing::debug;

use crate::Clock;
use crate::error::McqServiceError;

/// Feedback shown right after a practice answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub is_correct: bool,
    pub correct: McqOption,
    pub explanation: Option<String>,
}

/// Single-question practice on a topic page.
#[derive(Clone)]
pub struct McqService {
    clock: Clock,
    content: Arc<dyn ContentRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl McqService {
    #[must_use]
    pub fn new(
        clock: Clock,
        content: Arc<dyn ContentRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            content,
            progress,
        }
    }

    /// Grade one answer and record the attempt, right or wrong.
    ///
    /// # Errors
    ///
    /// Returns `McqServiceError::Storage` with `StorageError::NotFound` for an
    /// unknown question, or if the attempt cannot be stored.
    pub async fn submit_answer(
        &self,
        user: UserId,
        mcq_id: McqId,
        selected: McqOption,
    ) -> Result<AnswerFeedback, McqServiceError> {
        let mcq = self
            .content
            .get_mcq(mcq_id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let is_correct = mcq.check(selected);
        self.progress
            .append_mcq_attempt(&McqAttempt {
                user_id: user,
                mcq_id,
                selected: Some(selected),
                is_correct,
                attempted_at: self.clock.now(),
            })
            .await?;
        debug!(%user, mcq = %mcq_id, is_correct, "recorded mcq attempt");

        Ok(AnswerFeedback {
            is_correct,
            correct: mcq.correct,
            explanation: mcq.explanation,
        })
    }

    /// # Errors
    ///
    /// Returns `McqServiceError::Storage` if repository access fails.
    pub async fn has_attempted(&self, user: UserId, mcq_id: McqId) -> Result<bool, McqServiceError> {
        let attempts = self.progress.attempted_mcq_ids(user, &[mcq_id]).await?;
        Ok(!attempts.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::add_mcqs;
    use dsa_core::model::Topic;
    use dsa_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn service(repo: &InMemoryRepository) -> McqService {
        McqService::new(
            Clock::fixed(fixed_now()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    #[tokio::test]
    async fn wrong_answer_is_recorded_with_feedback() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let ids = add_mcqs(&repo, Topic::Sorting, 1).await;
        let svc = service(&repo);

        assert!(!svc.has_attempted(user, ids[0]).await.unwrap());
        let feedback = svc.submit_answer(user, ids[0], McqOption::C).await.unwrap();
        assert!(!feedback.is_correct);
        assert_eq!(feedback.correct, McqOption::A);
        assert!(feedback.explanation.is_some());
        assert!(svc.has_attempted(user, ids[0]).await.unwrap());

        let right = svc.submit_answer(user, ids[0], McqOption::A).await.unwrap();
        assert!(right.is_correct);
    }

    #[tokio::test]
    async fn unknown_question_is_not_found() {
        let repo = InMemoryRepository::new();
        let err = service(&repo)
            .submit_answer(UserId::random(), McqId::new(77), McqOption::A)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            McqServiceError::Storage(StorageError::NotFound)
        ));
    }
}
