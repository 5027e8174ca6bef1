use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::content::{Mcq, McqOption};
use crate::model::ids::UserId;
use crate::model::topic::{Difficulty, Topic};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    Empty,

    #[error("expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },
}

/// Result of grading one submitted quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizGrade {
    /// Correctness per question, in question order.
    pub per_question: Vec<bool>,
    pub correct: u32,
    pub total: u32,
    /// Percentage in `[0, 100]`, unrounded.
    pub score: f64,
}

impl QuizGrade {
    /// Grades answers against questions. A blank answer counts as wrong.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` when there are no questions and
    /// `QuizError::AnswerCountMismatch` when the answer list has the wrong length.
    #[allow(clippy::cast_precision_loss)]
    pub fn grade(questions: &[Mcq], answers: &[Option<McqOption>]) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        if questions.len() != answers.len() {
            return Err(QuizError::AnswerCountMismatch {
                expected: questions.len(),
                actual: answers.len(),
            });
        }

        let per_question: Vec<bool> = questions
            .iter()
            .zip(answers)
            .map(|(mcq, answer)| answer.is_some_and(|a| mcq.check(a)))
            .collect();
        let correct = per_question.iter().filter(|ok| **ok).count();
        let total = questions.len();
        let score = (correct as f64 / total as f64) * 100.0;

        Ok(Self {
            per_question,
            correct: u32::try_from(correct).unwrap_or(u32::MAX),
            total: u32::try_from(total).unwrap_or(u32::MAX),
            score,
        })
    }
}

/// A finished timed quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    pub user_id: UserId,
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub score: f64,
    pub time_limit_minutes: u32,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl QuizSession {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_grade(
        user_id: UserId,
        topic: Topic,
        difficulty: Difficulty,
        grade: &QuizGrade,
        time_limit_minutes: u32,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            topic,
            difficulty,
            total_questions: grade.total,
            correct_answers: grade.correct,
            score: grade.score,
            time_limit_minutes,
            started_at,
            completed_at,
        }
    }
}
