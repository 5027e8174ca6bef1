use dsa_core::model::{Note, NoteId, Topic, UserId};

use super::SqliteRepository;
use super::mapping::{conn_err, id_i64, map_note_row, note_id_from_i64, write_err};
use crate::repository::{NoteRepository, StorageError};

#[async_trait::async_trait]
impl NoteRepository for SqliteRepository {
    async fn insert_note(&self, note: &Note) -> Result<NoteId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO user_notes (user_id, topic, title, content, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(note.user_id().to_string())
        .bind(note.topic().as_str())
        .bind(note.title().to_owned())
        .bind(note.content().to_owned())
        .bind(note.created_at())
        .bind(note.updated_at())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        note_id_from_i64(res.last_insert_rowid())
    }

    async fn update_note(&self, note: &Note) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE user_notes
            SET title = ?2, content = ?3, updated_at = ?4
            WHERE id = ?1
            ",
        )
        .bind(id_i64("note_id", note.id().value())?)
        .bind(note.title().to_owned())
        .bind(note.content().to_owned())
        .bind(note.updated_at())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn get_note(&self, id: NoteId) -> Result<Option<Note>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, user_id, topic, title, content, created_at, updated_at
            FROM user_notes WHERE id = ?1
            ",
        )
        .bind(id_i64("note_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn_err)?;

        match row {
            Some(row) => map_note_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn delete_note(&self, id: NoteId) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM user_notes WHERE id = ?1")
            .bind(id_i64("note_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn_err)?;
        Ok(res.rows_affected() > 0)
    }

    async fn list_notes(&self, user: UserId, topic: Topic) -> Result<Vec<Note>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, user_id, topic, title, content, created_at, updated_at
            FROM user_notes
            WHERE user_id = ?1 AND topic = ?2
            ORDER BY updated_at DESC, id DESC
            ",
        )
        .bind(user.to_string())
        .bind(topic.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn_err)?;

        let mut notes = Vec::with_capacity(rows.len());
        for row in rows {
            notes.push(map_note_row(&row)?);
        }
        Ok(notes)
    }
}
