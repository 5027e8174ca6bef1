use std::sync::Arc;

use dsa_core::model::{Note, NoteDraft, NoteId, Topic, UserId};
use storage::repository::{NoteRepository, StorageError};

use crate::Clock;
use crate::error::NoteServiceError;

/// Personal notes attached to a topic.
#[derive(Clone)]
pub struct NoteService {
    clock: Clock,
    notes: Arc<dyn NoteRepository>,
}

impl NoteService {
    #[must_use]
    pub fn new(clock: Clock, notes: Arc<dyn NoteRepository>) -> Self {
        Self { clock, notes }
    }

    /// Notes of `user` on `topic`, most recently edited first.
    ///
    /// # Errors
    ///
    /// Returns `NoteServiceError::Storage` if repository access fails.
    pub async fn list(&self, user: UserId, topic: Topic) -> Result<Vec<Note>, NoteServiceError> {
        Ok(self.notes.list_notes(user, topic).await?)
    }

    /// # Errors
    ///
    /// Returns `NoteServiceError::Note` for a blank title or content.
    /// Returns `NoteServiceError::Storage` if persistence fails.
    pub async fn create(
        &self,
        user: UserId,
        topic: Topic,
        draft: NoteDraft,
    ) -> Result<Note, NoteServiceError> {
        let note = Note::new(NoteId::new(0), user, topic, draft, self.clock.now())?;
        let id = self.notes.insert_note(&note).await?;
        Ok(note.with_id(id))
    }

    async fn owned(&self, user: UserId, id: NoteId) -> Result<Note, NoteServiceError> {
        let note = self.notes.get_note(id).await?.ok_or(StorageError::NotFound)?;
        if note.user_id() != user {
            return Err(NoteServiceError::NotOwner);
        }
        Ok(note)
    }

    /// Replace title and content of one of the user's notes.
    ///
    /// # Errors
    ///
    /// Returns `NoteServiceError::NotOwner` if the note belongs to someone else,
    /// `NoteServiceError::Note` for a blank draft, and
    /// `NoteServiceError::Storage` (`NotFound` included) for repository failures.
    pub async fn update(
        &self,
        user: UserId,
        id: NoteId,
        draft: NoteDraft,
    ) -> Result<Note, NoteServiceError> {
        let mut note = self.owned(user, id).await?;
        note.edit(draft, self.clock.now())?;
        self.notes.update_note(&note).await?;
        Ok(note)
    }

    /// # Errors
    ///
    /// Returns `NoteServiceError::NotOwner` if the note belongs to someone else
    /// and `NoteServiceError::Storage` for repository failures.
    pub async fn delete(&self, user: UserId, id: NoteId) -> Result<(), NoteServiceError> {
        self.owned(user, id).await?;
        if !self.notes.delete_note(id).await? {
            return Err(StorageError::NotFound.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use dsa_core::model::NoteError;
    use dsa_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    #[tokio::test]
    async fn edited_note_moves_to_front() {
        let repo = Arc::new(InMemoryRepository::new());
        let user = UserId::random();
        let mut clock = Clock::fixed(fixed_now());

        let first = NoteService::new(clock, repo.clone())
            .create(user, Topic::Hashmaps, NoteDraft::new("Load factor", "resize at 0.75"))
            .await
            .unwrap();
        clock.advance(Duration::minutes(1));
        NoteService::new(clock, repo.clone())
            .create(user, Topic::Hashmaps, NoteDraft::new("Probing", "linear"))
            .await
            .unwrap();
        clock.advance(Duration::minutes(1));
        let svc = NoteService::new(clock, repo);
        svc.update(user, first.id(), NoteDraft::new("Load factor", " resize at 0.7 "))
            .await
            .unwrap();

        let notes = svc.list(user, Topic::Hashmaps).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id(), first.id());
        assert_eq!(notes[0].content(), "resize at 0.7");
        assert_eq!(notes[0].created_at(), fixed_now());
    }

    #[tokio::test]
    async fn other_users_cannot_touch_a_note() {
        let repo = Arc::new(InMemoryRepository::new());
        let owner = UserId::random();
        let svc = NoteService::new(Clock::fixed(fixed_now()), repo);
        let note = svc
            .create(owner, Topic::Strings, NoteDraft::new("Z-function", "linear"))
            .await
            .unwrap();

        let stranger = UserId::random();
        assert!(matches!(
            svc.update(stranger, note.id(), NoteDraft::new("x", "y")).await,
            Err(NoteServiceError::NotOwner)
        ));
        assert!(matches!(
            svc.delete(stranger, note.id()).await,
            Err(NoteServiceError::NotOwner)
        ));

        svc.delete(owner, note.id()).await.unwrap();
        assert!(svc.list(owner, Topic::Strings).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_draft_is_rejected() {
        let svc = NoteService::new(
            Clock::fixed(fixed_now()),
            Arc::new(InMemoryRepository::new()),
        );
        let err = svc
            .create(UserId::random(), Topic::Basics, NoteDraft::new("  ", "body"))
            .await
            .unwrap_err();
        assert!(matches!(err, NoteServiceError::Note(NoteError::EmptyTitle)));
    }
}
