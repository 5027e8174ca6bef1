use dsa_core::model::{
    CheatSheet, CheatSheetId, CodingProblem, Difficulty, Mcq, McqId, ProblemId, Topic, Video,
    VideoId,
};

use super::SqliteRepository;
use super::mapping::{
    conn_err, id_i64, map_cheat_sheet_row, map_mcq_row, map_problem_row, map_video_row,
    mcq_id_from_i64, problem_id_from_i64, ser, video_id_from_i64, write_err,
};
use crate::repository::{
    ContentRepository, NewCheatSheetRecord, NewMcqRecord, NewProblemRecord, NewVideoRecord,
    StorageError,
};

const VIDEO_COLUMNS: &str = "id, topic, difficulty, title, description, video_url, platform, duration_minutes, created_at";
const MCQ_COLUMNS: &str = "id, topic, difficulty, question, option_a, option_b, option_c, option_d, correct_answer, explanation, created_at";
const PROBLEM_COLUMNS: &str =
    "id, topic, difficulty, title, description, problem_url, platform, tags, created_at";

async fn topic_ids(
    repo: &SqliteRepository,
    table: &'static str,
    topic: Topic,
) -> Result<Vec<i64>, StorageError> {
    let sql = format!("SELECT id FROM {table} WHERE topic = ?1 ORDER BY id ASC");
    let ids: Vec<i64> = sqlx::query_scalar(&sql)
        .bind(topic.as_str())
        .fetch_all(&repo.pool)
        .await
        .map_err(conn_err)?;
    Ok(ids)
}

#[async_trait::async_trait]
impl ContentRepository for SqliteRepository {
    async fn insert_video(&self, video: NewVideoRecord) -> Result<VideoId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO video_tutorials (
                topic, difficulty, title, description, video_url, platform, duration_minutes, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(video.topic.as_str())
        .bind(video.difficulty.as_str())
        .bind(video.title)
        .bind(video.description)
        .bind(video.video_url)
        .bind(video.platform)
        .bind(video.duration_minutes.map(i64::from))
        .bind(video.created_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        video_id_from_i64(res.last_insert_rowid())
    }

    async fn insert_mcq(&self, mcq: NewMcqRecord) -> Result<McqId, StorageError> {
        let [a, b, c, d] = mcq.options;
        let res = sqlx::query(
            r"
            INSERT INTO mcqs (
                topic, difficulty, question, option_a, option_b, option_c, option_d,
                correct_answer, explanation, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
        )
        .bind(mcq.topic.as_str())
        .bind(mcq.difficulty.as_str())
        .bind(mcq.question)
        .bind(a)
        .bind(b)
        .bind(c)
        .bind(d)
        .bind(mcq.correct.as_str())
        .bind(mcq.explanation)
        .bind(mcq.created_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        mcq_id_from_i64(res.last_insert_rowid())
    }

    async fn insert_problem(&self, problem: NewProblemRecord) -> Result<ProblemId, StorageError> {
        let tags = serde_json::to_string(&problem.tags).map_err(ser)?;
        let res = sqlx::query(
            r"
            INSERT INTO coding_problems (
                topic, difficulty, title, description, problem_url, platform, tags, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ",
        )
        .bind(problem.topic.as_str())
        .bind(problem.difficulty.as_str())
        .bind(problem.title)
        .bind(problem.description)
        .bind(problem.problem_url)
        .bind(problem.platform.as_str())
        .bind(tags)
        .bind(problem.created_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        problem_id_from_i64(res.last_insert_rowid())
    }

    async fn insert_cheat_sheet(
        &self,
        sheet: NewCheatSheetRecord,
    ) -> Result<CheatSheetId, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO cheat_sheets (topic, title, content, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ",
        )
        .bind(sheet.topic.as_str())
        .bind(sheet.title)
        .bind(sheet.content)
        .bind(sheet.created_at)
        .execute(&self.pool)
        .await
        .map_err(write_err)?;

        let id = u64::try_from(res.last_insert_rowid())
            .map_err(|_| StorageError::Serialization("cheat_sheet_id sign overflow".into()))?;
        Ok(CheatSheetId::new(id))
    }

    async fn video_ids(&self, topic: Topic) -> Result<Vec<VideoId>, StorageError> {
        topic_ids(self, "video_tutorials", topic)
            .await?
            .into_iter()
            .map(video_id_from_i64)
            .collect()
    }

    async fn mcq_ids(&self, topic: Topic) -> Result<Vec<McqId>, StorageError> {
        topic_ids(self, "mcqs", topic)
            .await?
            .into_iter()
            .map(mcq_id_from_i64)
            .collect()
    }

    async fn problem_ids(&self, topic: Topic) -> Result<Vec<ProblemId>, StorageError> {
        topic_ids(self, "coding_problems", topic)
            .await?
            .into_iter()
            .map(problem_id_from_i64)
            .collect()
    }

    async fn list_videos(&self, topic: Topic) -> Result<Vec<Video>, StorageError> {
        let sql = format!(
            "SELECT {VIDEO_COLUMNS} FROM video_tutorials WHERE topic = ?1 ORDER BY id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(topic.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(conn_err)?;

        let mut videos = Vec::with_capacity(rows.len());
        for row in rows {
            videos.push(map_video_row(&row)?);
        }
        Ok(videos)
    }

    async fn list_mcqs(
        &self,
        topic: Topic,
        difficulty: Option<Difficulty>,
        limit: Option<u32>,
    ) -> Result<Vec<Mcq>, StorageError> {
        // LIMIT -1 is unbounded in SQLite.
        let lim = limit.map_or(-1, i64::from);
        let sql = format!(
            r"
            SELECT {MCQ_COLUMNS}
            FROM mcqs
            WHERE topic = ?1 AND (?2 IS NULL OR difficulty = ?2)
            ORDER BY id ASC
            LIMIT ?3
            "
        );
        let rows = sqlx::query(&sql)
            .bind(topic.as_str())
            .bind(difficulty.map(Difficulty::as_str))
            .bind(lim)
            .fetch_all(&self.pool)
            .await
            .map_err(conn_err)?;

        let mut mcqs = Vec::with_capacity(rows.len());
        for row in rows {
            mcqs.push(map_mcq_row(&row)?);
        }
        Ok(mcqs)
    }

    async fn list_problems(&self, topic: Topic) -> Result<Vec<CodingProblem>, StorageError> {
        let sql = format!(
            "SELECT {PROBLEM_COLUMNS} FROM coding_problems WHERE topic = ?1 ORDER BY id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(topic.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(conn_err)?;

        let mut problems = Vec::with_capacity(rows.len());
        for row in rows {
            problems.push(map_problem_row(&row)?);
        }
        Ok(problems)
    }

    async fn get_mcq(&self, id: McqId) -> Result<Option<Mcq>, StorageError> {
        let sql = format!("SELECT {MCQ_COLUMNS} FROM mcqs WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id_i64("mcq_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn_err)?;

        match row {
            Some(row) => map_mcq_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn list_cheat_sheets(&self, topic: Topic) -> Result<Vec<CheatSheet>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, topic, title, content, created_at, updated_at
            FROM cheat_sheets
            WHERE topic = ?1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(topic.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(conn_err)?;

        let mut sheets = Vec::with_capacity(rows.len());
        for row in rows {
            sheets.push(map_cheat_sheet_row(&row)?);
        }
        Ok(sheets)
    }
}
