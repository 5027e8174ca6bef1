use std::str::FromStr;

use chrono::{DateTime, Utc};
use dsa_core::model::{
    CheatSheet, CheatSheetId, CodingProblem, CodingProgress, Difficulty, Mcq, McqId, McqOption,
    Note, NoteId, Platform, ProblemId, QuizSession, Topic, UserId, Video, VideoCompletion, VideoId,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps driver errors on writes; constraint failures get their own variants.
pub(crate) fn write_err(e: sqlx::Error) -> StorageError {
    if let Some(db) = e.as_database_error() {
        if db.is_foreign_key_violation() {
            return StorageError::NotFound;
        }
        if db.is_unique_violation() {
            return StorageError::Conflict;
        }
    }
    StorageError::Connection(e.to_string())
}

pub(crate) fn conn_err(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// `?start, ?start+1, ...` for an `IN (...)` list of `count` binds.
pub(crate) fn placeholders(start: usize, count: usize) -> String {
    let mut out = String::with_capacity(count * 4);
    for i in 0..count {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('?');
        out.push_str(&(start + i).to_string());
    }
    out
}

fn parse<T: FromStr>(row: &SqliteRow, column: &'static str) -> Result<T, StorageError>
where
    T::Err: core::fmt::Display,
{
    let raw: String = row.try_get(column).map_err(ser)?;
    raw.parse::<T>().map_err(ser)
}

fn u32_column(row: &SqliteRow, column: &'static str) -> Result<u32, StorageError> {
    i64_to_u32(column, row.try_get::<i64, _>(column).map_err(ser)?)
}

pub(crate) fn video_id_from_i64(v: i64) -> Result<VideoId, StorageError> {
    Ok(VideoId::new(i64_to_u64("video_id", v)?))
}

pub(crate) fn mcq_id_from_i64(v: i64) -> Result<McqId, StorageError> {
    Ok(McqId::new(i64_to_u64("mcq_id", v)?))
}

pub(crate) fn problem_id_from_i64(v: i64) -> Result<ProblemId, StorageError> {
    Ok(ProblemId::new(i64_to_u64("problem_id", v)?))
}

pub(crate) fn note_id_from_i64(v: i64) -> Result<NoteId, StorageError> {
    Ok(NoteId::new(i64_to_u64("note_id", v)?))
}

pub(crate) fn map_video_row(row: &SqliteRow) -> Result<Video, StorageError> {
    Ok(Video {
        id: video_id_from_i64(row.try_get("id").map_err(ser)?)?,
        topic: parse::<Topic>(row, "topic")?,
        difficulty: parse::<Difficulty>(row, "difficulty")?,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        video_url: row.try_get("video_url").map_err(ser)?,
        platform: row.try_get("platform").map_err(ser)?,
        duration_minutes: row
            .try_get::<Option<i64>, _>("duration_minutes")
            .map_err(ser)?
            .map(|v| i64_to_u32("duration_minutes", v))
            .transpose()?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_mcq_row(row: &SqliteRow) -> Result<Mcq, StorageError> {
    Ok(Mcq {
        id: mcq_id_from_i64(row.try_get("id").map_err(ser)?)?,
        topic: parse::<Topic>(row, "topic")?,
        difficulty: parse::<Difficulty>(row, "difficulty")?,
        question: row.try_get("question").map_err(ser)?,
        options: [
            row.try_get("option_a").map_err(ser)?,
            row.try_get("option_b").map_err(ser)?,
            row.try_get("option_c").map_err(ser)?,
            row.try_get("option_d").map_err(ser)?,
        ],
        correct: parse::<McqOption>(row, "correct_answer")?,
        explanation: row.try_get("explanation").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_problem_row(row: &SqliteRow) -> Result<CodingProblem, StorageError> {
    let tags_json: String = row.try_get("tags").map_err(ser)?;
    let tags: Vec<String> = serde_json::from_str(&tags_json).map_err(ser)?;
    Ok(CodingProblem {
        id: problem_id_from_i64(row.try_get("id").map_err(ser)?)?,
        topic: parse::<Topic>(row, "topic")?,
        difficulty: parse::<Difficulty>(row, "difficulty")?,
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        problem_url: row.try_get("problem_url").map_err(ser)?,
        platform: parse::<Platform>(row, "platform")?,
        tags,
        created_at: row.try_get("created_at").map_err(ser)?,
    })
}

pub(crate) fn map_cheat_sheet_row(row: &SqliteRow) -> Result<CheatSheet, StorageError> {
    Ok(CheatSheet {
        id: CheatSheetId::new(i64_to_u64(
            "cheat_sheet_id",
            row.try_get("id").map_err(ser)?,
        )?),
        topic: parse::<Topic>(row, "topic")?,
        title: row.try_get("title").map_err(ser)?,
        content: row.try_get("content").map_err(ser)?,
        created_at: row.try_get("created_at").map_err(ser)?,
        updated_at: row.try_get("updated_at").map_err(ser)?,
    })
}

pub(crate) fn map_video_completion_row(row: &SqliteRow) -> Result<VideoCompletion, StorageError> {
    Ok(VideoCompletion {
        user_id: parse::<UserId>(row, "user_id")?,
        video_id: video_id_from_i64(row.try_get("video_id").map_err(ser)?)?,
        completed: row.try_get::<i64, _>("completed").map_err(ser)? != 0,
        completed_at: row.try_get("completed_at").map_err(ser)?,
    })
}

pub(crate) fn map_coding_progress_row(row: &SqliteRow) -> Result<CodingProgress, StorageError> {
    Ok(CodingProgress::from_persisted(
        parse::<UserId>(row, "user_id")?,
        problem_id_from_i64(row.try_get("problem_id").map_err(ser)?)?,
        row.try_get::<i64, _>("attempted").map_err(ser)? != 0,
        row.try_get::<i64, _>("solved").map_err(ser)? != 0,
        row.try_get("attempted_at").map_err(ser)?,
        row.try_get("solved_at").map_err(ser)?,
    ))
}

pub(crate) fn map_note_row(row: &SqliteRow) -> Result<Note, StorageError> {
    Ok(Note::from_persisted(
        note_id_from_i64(row.try_get("id").map_err(ser)?)?,
        parse::<UserId>(row, "user_id")?,
        parse::<Topic>(row, "topic")?,
        row.try_get("title").map_err(ser)?,
        row.try_get("content").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    ))
}

pub(crate) fn map_quiz_session_row(row: &SqliteRow) -> Result<QuizSession, StorageError> {
    let started_at: DateTime<Utc> = row.try_get("started_at").map_err(ser)?;
    Ok(QuizSession {
        user_id: parse::<UserId>(row, "user_id")?,
        topic: parse::<Topic>(row, "topic")?,
        difficulty: parse::<Difficulty>(row, "difficulty")?,
        total_questions: u32_column(row, "total_questions")?,
        correct_answers: u32_column(row, "correct_answers")?,
        score: row.try_get("score").map_err(ser)?,
        time_limit_minutes: u32_column(row, "time_limit_minutes")?,
        started_at,
        completed_at: row.try_get("completed_at").map_err(ser)?,
    })
}
