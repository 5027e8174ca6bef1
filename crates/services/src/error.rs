//! Shared error types for the services crate.

use thiserror::Error;

use dsa_core::model::{NoteError, QuizError, TopicParseError};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while computing topic progress.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error("progress data unavailable: {0}")]
    DataUnavailable(#[from] StorageError),
    #[error(transparent)]
    UnknownTopic(#[from] TopicParseError),
}

/// Errors emitted by `TopicContentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `VideoProgressService` and `CodingProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TrackingError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `McqService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum McqServiceError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `NoteService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NoteServiceError {
    #[error(transparent)]
    Note(#[from] NoteError),
    #[error("note belongs to another user")]
    NotOwner,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
