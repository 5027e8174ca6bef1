use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

const SCHEMA_V1: &[&str] = &[
    r"
        CREATE TABLE IF NOT EXISTS video_tutorials (
            id INTEGER PRIMARY KEY,
            topic TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            video_url TEXT NOT NULL,
            platform TEXT NOT NULL,
            duration_minutes INTEGER CHECK (duration_minutes IS NULL OR duration_minutes >= 0),
            created_at TEXT NOT NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS mcqs (
            id INTEGER PRIMARY KEY,
            topic TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            question TEXT NOT NULL,
            option_a TEXT NOT NULL,
            option_b TEXT NOT NULL,
            option_c TEXT NOT NULL,
            option_d TEXT NOT NULL,
            correct_answer TEXT NOT NULL CHECK (correct_answer IN ('A', 'B', 'C', 'D')),
            explanation TEXT,
            created_at TEXT NOT NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS coding_problems (
            id INTEGER PRIMARY KEY,
            topic TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            title TEXT NOT NULL,
            description TEXT,
            problem_url TEXT NOT NULL,
            platform TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS cheat_sheets (
            id INTEGER PRIMARY KEY,
            topic TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS user_video_progress (
            user_id TEXT NOT NULL,
            video_id INTEGER NOT NULL,
            completed INTEGER NOT NULL CHECK (completed IN (0, 1)),
            completed_at TEXT,
            PRIMARY KEY (user_id, video_id),
            FOREIGN KEY (video_id) REFERENCES video_tutorials(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS user_mcq_attempts (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            mcq_id INTEGER NOT NULL,
            selected_answer TEXT CHECK (selected_answer IS NULL OR selected_answer IN ('A', 'B', 'C', 'D')),
            is_correct INTEGER NOT NULL CHECK (is_correct IN (0, 1)),
            attempted_at TEXT NOT NULL,
            FOREIGN KEY (mcq_id) REFERENCES mcqs(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS user_coding_progress (
            user_id TEXT NOT NULL,
            problem_id INTEGER NOT NULL,
            attempted INTEGER NOT NULL CHECK (attempted IN (0, 1)),
            solved INTEGER NOT NULL CHECK (solved IN (0, 1)),
            attempted_at TEXT,
            solved_at TEXT,
            PRIMARY KEY (user_id, problem_id),
            CHECK (solved = 0 OR attempted = 1),
            FOREIGN KEY (problem_id) REFERENCES coding_problems(id) ON DELETE CASCADE
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS user_notes (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            topic TEXT NOT NULL,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS quiz_sessions (
            id INTEGER PRIMARY KEY,
            user_id TEXT NOT NULL,
            topic TEXT NOT NULL,
            difficulty TEXT NOT NULL,
            total_questions INTEGER NOT NULL CHECK (total_questions > 0),
            correct_answers INTEGER NOT NULL CHECK (correct_answers >= 0),
            score REAL NOT NULL,
            time_limit_minutes INTEGER NOT NULL CHECK (time_limit_minutes >= 0),
            started_at TEXT NOT NULL,
            completed_at TEXT NOT NULL
        );
    ",
    "CREATE INDEX IF NOT EXISTS idx_video_tutorials_topic ON video_tutorials (topic, id);",
    "CREATE INDEX IF NOT EXISTS idx_mcqs_topic_difficulty ON mcqs (topic, difficulty, id);",
    "CREATE INDEX IF NOT EXISTS idx_coding_problems_topic ON coding_problems (topic, id);",
    "CREATE INDEX IF NOT EXISTS idx_cheat_sheets_topic_created ON cheat_sheets (topic, created_at);",
    "CREATE INDEX IF NOT EXISTS idx_user_mcq_attempts_user_mcq ON user_mcq_attempts (user_id, mcq_id);",
    "CREATE INDEX IF NOT EXISTS idx_user_notes_user_topic_updated ON user_notes (user_id, topic, updated_at);",
    "CREATE INDEX IF NOT EXISTS idx_quiz_sessions_user_topic_completed ON quiz_sessions (user_id, topic, completed_at);",
];

/// Runs the schema migrations that have not been applied yet.
///
/// Version 1 creates the content catalog, the per-user progress tables, notes,
/// quiz sessions, and their lookup indexes.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        for statement in SCHEMA_V1 {
            sqlx::query(*statement).execute(&mut *tx).await?;
        }

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        tracing::info!(version = 1, "applied schema migration");
    }

    Ok(())
}
