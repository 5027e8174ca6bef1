use std::sync::Arc;

use chrono::{DateTime, Utc};
use dsa_core::model::{
    Difficulty, Mcq, McqAttempt, McqOption, QuizError, QuizGrade, QuizSession, QuizSessionId,
    Topic, UserId,
};
use rand::rng;
use rand::seq::SliceRandom;
use storage::repository::{ContentRepository, QuizSessionRepository};
use tracing::info;

use crate::Clock;
use crate::error::QuizServiceError;

/// Questions handed out for one timed quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub questions: Vec<Mcq>,
    pub started_at: DateTime<Utc>,
}

/// Stored result of a submitted quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub session_id: QuizSessionId,
    pub grade: QuizGrade,
}

#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    content: Arc<dyn ContentRepository>,
    quizzes: Arc<dyn QuizSessionRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        content: Arc<dyn ContentRepository>,
        quizzes: Arc<dyn QuizSessionRepository>,
    ) -> Self {
        Self {
            clock,
            content,
            quizzes,
        }
    }

    /// Load every question of a topic and difficulty, optionally shuffled.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` if there are no questions.
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn load_quiz(
        &self,
        topic: Topic,
        difficulty: Difficulty,
        shuffle: bool,
    ) -> Result<Quiz, QuizServiceError> {
        let mut questions = self
            .content
            .list_mcqs(topic, Some(difficulty), None)
            .await?;
        if questions.is_empty() {
            return Err(QuizError::Empty.into());
        }
        if shuffle {
            questions.shuffle(&mut rng());
        }
        Ok(Quiz {
            topic,
            difficulty,
            questions,
            started_at: self.clock.now(),
        })
    }

    /// Grade a quiz and store the session with one attempt per question.
    ///
    /// `answers` follows question order; `None` is an unanswered question and
    /// counts as wrong.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Quiz` for an empty quiz or a wrong number of answers.
    /// Returns `QuizServiceError::Storage` if persistence fails; nothing is stored then.
    pub async fn submit_quiz(
        &self,
        user: UserId,
        quiz: &Quiz,
        answers: &[Option<McqOption>],
        time_limit_minutes: u32,
    ) -> Result<QuizOutcome, QuizServiceError> {
        let grade = QuizGrade::grade(&quiz.questions, answers)?;
        let completed_at = self.clock.now();

        let session = QuizSession::from_grade(
            user,
            quiz.topic,
            quiz.difficulty,
            &grade,
            time_limit_minutes,
            quiz.started_at,
            completed_at,
        );
        let attempts: Vec<McqAttempt> = quiz
            .questions
            .iter()
            .zip(answers)
            .zip(&grade.per_question)
            .map(|((mcq, selected), is_correct)| McqAttempt {
                user_id: user,
                mcq_id: mcq.id,
                selected: *selected,
                is_correct: *is_correct,
                attempted_at: completed_at,
            })
            .collect();

        let session_id = self.quizzes.record_quiz(&session, &attempts).await?;
        info!(
            %user,
            topic = %quiz.topic,
            correct = grade.correct,
            total = grade.total,
            "quiz submitted"
        );
        Ok(QuizOutcome { session_id, grade })
    }

    /// Past quizzes of a user on a topic, latest first.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn history(
        &self,
        user: UserId,
        topic: Topic,
    ) -> Result<Vec<(QuizSessionId, QuizSession)>, QuizServiceError> {
        Ok(self.quizzes.list_quiz_sessions(user, topic).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressAggregator;
    use crate::test_support::mcq_record;
    use chrono::Duration;
    use dsa_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    async fn seed(repo: &InMemoryRepository) {
        for correct in [McqOption::A, McqOption::B, McqOption::C, McqOption::D] {
            repo.insert_mcq(mcq_record(Topic::Searching, Difficulty::Medium, correct))
                .await
                .unwrap();
        }
        repo.insert_mcq(mcq_record(Topic::Searching, Difficulty::High, McqOption::A))
            .await
            .unwrap();
    }

    fn service(repo: &InMemoryRepository, clock: Clock) -> QuizService {
        QuizService::new(clock, Arc::new(repo.clone()), Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn submit_grades_and_records_attempts() {
        let repo = InMemoryRepository::new();
        seed(&repo).await;
        let user = UserId::random();

        let quiz = service(&repo, Clock::fixed(fixed_now()))
            .load_quiz(Topic::Searching, Difficulty::Medium, false)
            .await
            .unwrap();
        assert_eq!(quiz.questions.len(), 4);

        let finished = service(&repo, Clock::fixed(fixed_now() + Duration::minutes(4)));
        let answers = [Some(McqOption::A), Some(McqOption::A), None, Some(McqOption::D)];
        let outcome = finished
            .submit_quiz(user, &quiz, &answers, 10)
            .await
            .unwrap();
        assert_eq!(outcome.grade.correct, 2);
        assert!((outcome.grade.score - 50.0).abs() < f64::EPSILON);

        let history = finished.history(user, Topic::Searching).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].1.started_at, fixed_now());
        assert_eq!(history[0].1.time_limit_minutes, 10);

        // Every question now counts as engaged, including the blank one.
        let progress = ProgressAggregator::new(Arc::new(repo.clone()), Arc::new(repo))
            .try_compute_progress(Topic::Searching, Some(user))
            .await
            .unwrap();
        assert_eq!(progress.mcq, 80);
    }

    #[tokio::test]
    async fn shuffled_quiz_keeps_the_same_questions() {
        let repo = InMemoryRepository::new();
        seed(&repo).await;
        let quiz = service(&repo, Clock::fixed(fixed_now()))
            .load_quiz(Topic::Searching, Difficulty::Medium, true)
            .await
            .unwrap();
        let mut ids: Vec<u64> = quiz.questions.iter().map(|q| q.id.value()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn empty_quiz_and_bad_answer_count_are_rejected() {
        let repo = InMemoryRepository::new();
        seed(&repo).await;
        let svc = service(&repo, Clock::fixed(fixed_now()));

        let empty = svc
            .load_quiz(Topic::Strings, Difficulty::Beginner, false)
            .await
            .unwrap_err();
        assert!(matches!(empty, QuizServiceError::Quiz(QuizError::Empty)));

        let quiz = svc
            .load_quiz(Topic::Searching, Difficulty::High, false)
            .await
            .unwrap();
        let mismatch = svc
            .submit_quiz(UserId::random(), &quiz, &[], 5)
            .await
            .unwrap_err();
        assert!(matches!(
            mismatch,
            QuizServiceError::Quiz(QuizError::AnswerCountMismatch { .. })
        ));
    }
}
