use dsa_core::model::{
    CodingProgress, McqAttempt, McqId, ProblemId, UserId, VideoCompletion, VideoId,
};
use sqlx::SqliteConnection;

use super::SqliteRepository;
use super::mapping::{
    conn_err, id_i64, map_coding_progress_row, map_video_completion_row, mcq_id_from_i64,
    placeholders, problem_id_from_i64, video_id_from_i64, write_err,
};
use crate::repository::{ProgressRepository, StorageError};

/// Inserts one attempt row on `conn`, so quiz submission can reuse it inside a transaction.
pub(super) async fn insert_attempt(
    conn: &mut SqliteConnection,
    attempt: &McqAttempt,
) -> Result<(), StorageError> {
    sqlx::query(
        r"
        INSERT INTO user_mcq_attempts (user_id, mcq_id, selected_answer, is_correct, attempted_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ",
    )
    .bind(attempt.user_id.to_string())
    .bind(id_i64("mcq_id", attempt.mcq_id.value())?)
    .bind(attempt.selected.map(|o| o.as_str()))
    .bind(i64::from(attempt.is_correct))
    .bind(attempt.attempted_at)
    .execute(&mut *conn)
    .await
    .map_err(write_err)?;
    Ok(())
}

/// Ids bound per `IN (...)` list. `SQLite` numbers parameters up to `?32766`
/// and `?1` is taken by the user.
const IDS_PER_QUERY: usize = 32_000;

/// Runs `SELECT {column} FROM {table} WHERE user_id = ?1 AND {filter} {column} IN (...)`,
/// one query per batch of `IDS_PER_QUERY` ids.
async fn user_ids_in(
    repo: &SqliteRepository,
    table: &'static str,
    column: &'static str,
    filter: &'static str,
    user: UserId,
    ids: &[u64],
) -> Result<Vec<i64>, StorageError> {
    let mut out = Vec::new();
    for batch in ids.chunks(IDS_PER_QUERY) {
        let sql = format!(
            "SELECT {column} FROM {table} WHERE user_id = ?1 AND {filter} {column} IN ({}) ORDER BY rowid ASC",
            placeholders(2, batch.len())
        );
        let mut q = sqlx::query_scalar::<_, i64>(&sql).bind(user.to_string());
        for id in batch {
            q = q.bind(id_i64(column, *id)?);
        }
        out.extend(q.fetch_all(&repo.pool).await.map_err(conn_err)?);
    }
    Ok(out)
}

#[async_trait::async_trait]
impl ProgressRepository for SqliteRepository {
    async fn upsert_video_completion(
        &self,
        completion: &VideoCompletion,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO user_video_progress (user_id, video_id, completed, completed_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, video_id) DO UPDATE SET
                completed = excluded.completed,
                completed_at = excluded.completed_at
            ",
        )
        .bind(completion.user_id.to_string())
        .bind(id_i64("video_id", completion.video_id.value())?)
        .bind(i64::from(completion.completed))
        .bind(completion.completed_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(())
    }

    async fn delete_video_completion(
        &self,
        user: UserId,
        video: VideoId,
    ) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM user_video_progress WHERE user_id = ?1 AND video_id = ?2")
            .bind(user.to_string())
            .bind(id_i64("video_id", video.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn_err)?;

        Ok(res.rows_affected() > 0)
    }

    async fn get_video_completion(
        &self,
        user: UserId,
        video: VideoId,
    ) -> Result<Option<VideoCompletion>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, video_id, completed, completed_at
            FROM user_video_progress
            WHERE user_id = ?1 AND video_id = ?2
            ",
        )
        .bind(user.to_string())
        .bind(id_i64("video_id", video.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn_err)?;

        match row {
            Some(row) => map_video_completion_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn completed_video_ids(
        &self,
        user: UserId,
        ids: &[VideoId],
    ) -> Result<Vec<VideoId>, StorageError> {
        let raw: Vec<u64> = ids.iter().map(VideoId::value).collect();
        user_ids_in(
            self,
            "user_video_progress",
            "video_id",
            "completed = 1 AND",
            user,
            &raw,
        )
        .await?
        .into_iter()
        .map(video_id_from_i64)
        .collect()
    }

    async fn append_mcq_attempt(&self, attempt: &McqAttempt) -> Result<(), StorageError> {
        let mut conn = self.pool.acquire().await.map_err(conn_err)?;
        insert_attempt(&mut conn, attempt).await
    }

    async fn attempted_mcq_ids(
        &self,
        user: UserId,
        ids: &[McqId],
    ) -> Result<Vec<McqId>, StorageError> {
        let raw: Vec<u64> = ids.iter().map(McqId::value).collect();
        user_ids_in(self, "user_mcq_attempts", "mcq_id", "", user, &raw)
            .await?
            .into_iter()
            .map(mcq_id_from_i64)
            .collect()
    }

    async fn upsert_coding_progress(&self, progress: &CodingProgress) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO user_coding_progress (
                user_id, problem_id, attempted, solved, attempted_at, solved_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_id, problem_id) DO UPDATE SET
                attempted = excluded.attempted,
                solved = excluded.solved,
                attempted_at = excluded.attempted_at,
                solved_at = excluded.solved_at
            ",
        )
        .bind(progress.user_id.to_string())
        .bind(id_i64("problem_id", progress.problem_id.value())?)
        .bind(i64::from(progress.attempted()))
        .bind(i64::from(progress.solved()))
        .bind(progress.attempted_at())
        .bind(progress.solved_at())
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        Ok(())
    }

    async fn get_coding_progress(
        &self,
        user: UserId,
        problem: ProblemId,
    ) -> Result<Option<CodingProgress>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT user_id, problem_id, attempted, solved, attempted_at, solved_at
            FROM user_coding_progress
            WHERE user_id = ?1 AND problem_id = ?2
            ",
        )
        .bind(user.to_string())
        .bind(id_i64("problem_id", problem.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn_err)?;

        match row {
            Some(row) => map_coding_progress_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn coding_progress_for(
        &self,
        user: UserId,
        ids: &[ProblemId],
    ) -> Result<Vec<CodingProgress>, StorageError> {
        let mut out = Vec::with_capacity(ids.len().min(IDS_PER_QUERY));
        for batch in ids.chunks(IDS_PER_QUERY) {
            let sql = format!(
                r"
                SELECT user_id, problem_id, attempted, solved, attempted_at, solved_at
                FROM user_coding_progress
                WHERE user_id = ?1 AND problem_id IN ({})
                ORDER BY problem_id ASC
                ",
                placeholders(2, batch.len())
            );
            let mut q = sqlx::query(&sql).bind(user.to_string());
            for id in batch {
                q = q.bind(id_i64("problem_id", id.value())?);
            }
            let rows = q.fetch_all(&self.pool).await.map_err(conn_err)?;
            for row in rows {
                out.push(map_coding_progress_row(&row)?);
            }
        }
        Ok(out)
    }

    async fn solved_problem_ids(
        &self,
        user: UserId,
        ids: &[ProblemId],
    ) -> Result<Vec<ProblemId>, StorageError> {
        let raw: Vec<u64> = ids.iter().map(ProblemId::value).collect();
        user_ids_in(
            self,
            "user_coding_progress",
            "problem_id",
            "solved = 1 AND",
            user,
            &raw,
        )
        .await?
        .into_iter()
        .map(problem_id_from_i64)
        .collect()
    }
}
