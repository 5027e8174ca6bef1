use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{NoteId, UserId};
use crate::model::topic::Topic;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NoteError {
    #[error("note title cannot be empty")]
    EmptyTitle,

    #[error("note content cannot be empty")]
    EmptyContent,
}

/// Unvalidated note input from an editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
}

impl NoteDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Trims both fields and rejects blanks.
    ///
    /// # Errors
    ///
    /// Returns `NoteError::EmptyTitle` or `NoteError::EmptyContent`.
    pub fn validate(self) -> Result<(String, String), NoteError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(NoteError::EmptyTitle);
        }
        let content = self.content.trim();
        if content.is_empty() {
            return Err(NoteError::EmptyContent);
        }
        Ok((title.to_owned(), content.to_owned()))
    }
}

/// A user's note on a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    id: NoteId,
    user_id: UserId,
    topic: Topic,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Note {
    /// Builds a note from a draft.
    ///
    /// # Errors
    ///
    /// Returns `NoteError` if the draft has a blank title or content.
    pub fn new(
        id: NoteId,
        user_id: UserId,
        topic: Topic,
        draft: NoteDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, NoteError> {
        let (title, content) = draft.validate()?;
        Ok(Self {
            id,
            user_id,
            topic,
            title,
            content,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rehydrates a stored note without re-validating.
    #[must_use]
    pub fn from_persisted(
        id: NoteId,
        user_id: UserId,
        topic: Topic,
        title: String,
        content: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            topic,
            title,
            content,
            created_at,
            updated_at,
        }
    }

    /// Replaces title and content and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `NoteError` and leaves the note untouched if the draft is blank.
    pub fn edit(&mut self, draft: NoteDraft, now: DateTime<Utc>) -> Result<(), NoteError> {
        let (title, content) = draft.validate()?;
        self.title = title;
        self.content = content;
        self.updated_at = now;
        Ok(())
    }

    #[must_use]
    pub fn with_id(mut self, id: NoteId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn id(&self) -> NoteId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn topic(&self) -> Topic {
        self.topic
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
