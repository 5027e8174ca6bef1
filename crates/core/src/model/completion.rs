use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::content::McqOption;
use crate::model::ids::{McqId, ProblemId, UserId, VideoId};

/// A user's "watched" mark on a video. Exists only while completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCompletion {
    pub user_id: UserId,
    pub video_id: VideoId,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl VideoCompletion {
    #[must_use]
    pub fn completed(user_id: UserId, video_id: VideoId, at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            video_id,
            completed: true,
            completed_at: Some(at),
        }
    }
}

/// One answer to one MCQ. A user may have many attempts per question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqAttempt {
    pub user_id: UserId,
    pub mcq_id: McqId,
    /// `None` when a quiz was submitted with the question left blank.
    pub selected: Option<McqOption>,
    pub is_correct: bool,
    pub attempted_at: DateTime<Utc>,
}

/// Per-user state of a coding problem.
///
/// `solved` implies `attempted`; clearing `attempted` clears `solved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodingProgress {
    pub user_id: UserId,
    pub problem_id: ProblemId,
    attempted: bool,
    solved: bool,
    attempted_at: Option<DateTime<Utc>>,
    solved_at: Option<DateTime<Utc>>,
}

impl CodingProgress {
    #[must_use]
    pub fn untouched(user_id: UserId, problem_id: ProblemId) -> Self {
        Self {
            user_id,
            problem_id,
            attempted: false,
            solved: false,
            attempted_at: None,
            solved_at: None,
        }
    }

    /// Rebuilds a record from storage, repairing a solved-but-not-attempted row.
    #[must_use]
    pub fn from_persisted(
        user_id: UserId,
        problem_id: ProblemId,
        attempted: bool,
        solved: bool,
        attempted_at: Option<DateTime<Utc>>,
        solved_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            user_id,
            problem_id,
            attempted: attempted || solved,
            solved,
            attempted_at: attempted_at.or(if solved { solved_at } else { None }),
            solved_at: if solved { solved_at } else { None },
        }
    }

    #[must_use]
    pub fn attempted(&self) -> bool {
        self.attempted
    }

    #[must_use]
    pub fn solved(&self) -> bool {
        self.solved
    }

    #[must_use]
    pub fn attempted_at(&self) -> Option<DateTime<Utc>> {
        self.attempted_at
    }

    #[must_use]
    pub fn solved_at(&self) -> Option<DateTime<Utc>> {
        self.solved_at
    }

    pub fn set_attempted(&mut self, value: bool, now: DateTime<Utc>) {
        if value {
            self.attempted = true;
            self.attempted_at = Some(now);
        } else {
            self.attempted = false;
            self.attempted_at = None;
            self.solved = false;
            self.solved_at = None;
        }
    }

    pub fn set_solved(&mut self, value: bool, now: DateTime<Utc>) {
        if value {
            self.solved = true;
            self.solved_at = Some(now);
            if !self.attempted {
                self.attempted = true;
            }
            if self.attempted_at.is_none() {
                self.attempted_at = Some(now);
            }
        } else {
            self.solved = false;
            self.solved_at = None;
        }
    }
}
