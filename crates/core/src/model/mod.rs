mod completion;
mod content;
mod ids;
mod note;
mod quiz;
mod topic;

pub use completion::{CodingProgress, McqAttempt, VideoCompletion};
pub use content::{
    CheatSheet, CodingProblem, ContentError, Mcq, McqOption, Video, validate_listing,
};
pub use ids::{CheatSheetId, McqId, NoteId, ParseIdError, ProblemId, QuizSessionId, UserId, VideoId};
pub use note::{Note, NoteDraft, NoteError};
pub use quiz::{QuizError, QuizGrade, QuizSession};
pub use topic::{ContentKind, Difficulty, Platform, Topic, TopicParseError};
