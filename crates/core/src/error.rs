use thiserror::Error;

use crate::model::{ContentError, NoteError, ParseIdError, QuizError, TopicParseError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Topic(#[from] TopicParseError),
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Note(#[from] NoteError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Id(#[from] ParseIdError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_model_errors_transparently() {
        let err: Error = ContentError::EmptyTitle.into();
        assert_eq!(err.to_string(), "title cannot be empty");
        let err: Error = TopicParseError::UnknownTopic("graphs".into()).into();
        assert!(matches!(err, Error::Topic(_)));
    }
}
