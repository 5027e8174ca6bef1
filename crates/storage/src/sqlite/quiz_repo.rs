use dsa_core::model::{McqAttempt, QuizSession, QuizSessionId, Topic, UserId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn_err, map_quiz_session_row, ser, write_err};
use super::progress_repo::insert_attempt;
use crate::repository::{QuizSessionRepository, StorageError};

fn session_id_from_i64(v: i64) -> Result<QuizSessionId, StorageError> {
    u64::try_from(v)
        .map(QuizSessionId::new)
        .map_err(|_| StorageError::Serialization("quiz_session_id sign overflow".into()))
}

#[async_trait::async_trait]
impl QuizSessionRepository for SqliteRepository {
    async fn record_quiz(
        &self,
        session: &QuizSession,
        attempts: &[McqAttempt],
    ) -> Result<QuizSessionId, StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn_err)?;

        let res = sqlx::query(
            r"
            INSERT INTO quiz_sessions (
                user_id, topic, difficulty, total_questions, correct_answers, score,
                time_limit_minutes, started_at, completed_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )
        .bind(session.user_id.to_string())
        .bind(session.topic.as_str())
        .bind(session.difficulty.as_str())
        .bind(i64::from(session.total_questions))
        .bind(i64::from(session.correct_answers))
        .bind(session.score)
        .bind(i64::from(session.time_limit_minutes))
        .bind(session.started_at)
        .bind(session.completed_at)
        .execute(&mut *tx)
        .await
        .map_err(write_err)?;
        let id = session_id_from_i64(res.last_insert_rowid())?;

        for attempt in attempts {
            insert_attempt(&mut tx, attempt).await?;
        }

        tx.commit().await.map_err(conn_err)?;
        Ok(id)
    }

    async fn list_quiz_sessions(
        &self,
        user: UserId,
        topic: Topic,
    ) -> Result<Vec<(QuizSessionId, QuizSession)>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT
                id, user_id, topic, difficulty, total_questions, correct_answers, score,
                time_limit_minutes, started_at, completed_at
            FROM quiz_sessions
            WHERE user_id = ?1 AND topic = ?2
            ORDER BY completed_at DESC, id DESC
            ",
        )
        .bind(user.to_string())
        .bind(topic.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn_err)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let id = session_id_from_i64(row.try_get("id").map_err(ser)?)?;
            out.push((id, map_quiz_session_row(&row)?));
        }
        Ok(out)
    }
}
