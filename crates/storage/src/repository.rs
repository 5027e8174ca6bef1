use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dsa_core::model::{
    CheatSheet, CheatSheetId, CodingProblem, CodingProgress, Difficulty, Mcq, McqAttempt, McqId,
    McqOption, Note, NoteId, Platform, ProblemId, QuizSession, QuizSessionId, Topic, UserId, Video,
    VideoCompletion, VideoId,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

//
// ─── INSERT RECORDS ────────────────────────────────────────────────────────────
//

/// A video tutorial to insert; storage assigns the id.
#[derive(Debug, Clone)]
pub struct NewVideoRecord {
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub title: String,
    pub description: Option<String>,
    pub video_url: String,
    pub platform: String,
    pub duration_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl NewVideoRecord {
    #[must_use]
    pub fn into_video(self, id: VideoId) -> Video {
        Video {
            id,
            topic: self.topic,
            difficulty: self.difficulty,
            title: self.title,
            description: self.description,
            video_url: self.video_url,
            platform: self.platform,
            duration_minutes: self.duration_minutes,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewMcqRecord {
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub question: String,
    pub options: [String; 4],
    pub correct: McqOption,
    pub explanation: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewMcqRecord {
    #[must_use]
    pub fn into_mcq(self, id: McqId) -> Mcq {
        Mcq {
            id,
            topic: self.topic,
            difficulty: self.difficulty,
            question: self.question,
            options: self.options,
            correct: self.correct,
            explanation: self.explanation,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewProblemRecord {
    pub topic: Topic,
    pub difficulty: Difficulty,
    pub title: String,
    pub description: Option<String>,
    pub problem_url: String,
    pub platform: Platform,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl NewProblemRecord {
    #[must_use]
    pub fn into_problem(self, id: ProblemId) -> CodingProblem {
        CodingProblem {
            id,
            topic: self.topic,
            difficulty: self.difficulty,
            title: self.title,
            description: self.description,
            problem_url: self.problem_url,
            platform: self.platform,
            tags: self.tags,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCheatSheetRecord {
    pub topic: Topic,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Read/write access to the shared content catalog.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the video cannot be stored.
    async fn insert_video(&self, video: NewVideoRecord) -> Result<VideoId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn insert_mcq(&self, mcq: NewMcqRecord) -> Result<McqId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the problem cannot be stored.
    async fn insert_problem(&self, problem: NewProblemRecord) -> Result<ProblemId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the cheat sheet cannot be stored.
    async fn insert_cheat_sheet(
        &self,
        sheet: NewCheatSheetRecord,
    ) -> Result<CheatSheetId, StorageError>;

    /// Ids of every video tagged with `topic`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn video_ids(&self, topic: Topic) -> Result<Vec<VideoId>, StorageError>;

    /// Ids of every MCQ tagged with `topic`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn mcq_ids(&self, topic: Topic) -> Result<Vec<McqId>, StorageError>;

    /// Ids of every coding problem tagged with `topic`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn problem_ids(&self, topic: Topic) -> Result<Vec<ProblemId>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_videos(&self, topic: Topic) -> Result<Vec<Video>, StorageError>;

    /// MCQs of a topic ordered by id, optionally filtered by difficulty and capped.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_mcqs(
        &self,
        topic: Topic,
        difficulty: Option<Difficulty>,
        limit: Option<u32>,
    ) -> Result<Vec<Mcq>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_problems(&self, topic: Topic) -> Result<Vec<CodingProblem>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn get_mcq(&self, id: McqId) -> Result<Option<Mcq>, StorageError>;

    /// Cheat sheets of a topic, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_cheat_sheets(&self, topic: Topic) -> Result<Vec<CheatSheet>, StorageError>;
}

/// Per-user completion records.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Insert or replace the completion for `(user, video)`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the video does not exist.
    async fn upsert_video_completion(
        &self,
        completion: &VideoCompletion,
    ) -> Result<(), StorageError>;

    /// Remove the completion for `(user, video)`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn delete_video_completion(
        &self,
        user: UserId,
        video: VideoId,
    ) -> Result<bool, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn get_video_completion(
        &self,
        user: UserId,
        video: VideoId,
    ) -> Result<Option<VideoCompletion>, StorageError>;

    /// Ids among `ids` that `user` has marked completed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn completed_video_ids(
        &self,
        user: UserId,
        ids: &[VideoId],
    ) -> Result<Vec<VideoId>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if any referenced MCQ does not exist.
    async fn append_mcq_attempt(&self, attempt: &McqAttempt) -> Result<(), StorageError>;

    /// MCQ id of every attempt by `user` on a question in `ids`.
    ///
    /// One entry per attempt, so ids repeat when a question was answered twice.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn attempted_mcq_ids(
        &self,
        user: UserId,
        ids: &[McqId],
    ) -> Result<Vec<McqId>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the problem does not exist.
    async fn upsert_coding_progress(&self, progress: &CodingProgress) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn get_coding_progress(
        &self,
        user: UserId,
        problem: ProblemId,
    ) -> Result<Option<CodingProgress>, StorageError>;

    /// Stored progress rows of `user` for problems in `ids`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn coding_progress_for(
        &self,
        user: UserId,
        ids: &[ProblemId],
    ) -> Result<Vec<CodingProgress>, StorageError>;

    /// Ids among `ids` that `user` has solved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn solved_problem_ids(
        &self,
        user: UserId,
        ids: &[ProblemId],
    ) -> Result<Vec<ProblemId>, StorageError>;
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Store a new note; the id on `note` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the note cannot be stored.
    async fn insert_note(&self, note: &Note) -> Result<NoteId, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the note does not exist.
    async fn update_note(&self, note: &Note) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn get_note(&self, id: NoteId) -> Result<Option<Note>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn delete_note(&self, id: NoteId) -> Result<bool, StorageError>;

    /// Notes of `user` on `topic`, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_notes(&self, user: UserId, topic: Topic) -> Result<Vec<Note>, StorageError>;
}

#[async_trait]
pub trait QuizSessionRepository: Send + Sync {
    /// Store a finished quiz together with one attempt per question, atomically.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either write fails; nothing is stored then.
    async fn record_quiz(
        &self,
        session: &QuizSession,
        attempts: &[McqAttempt],
    ) -> Result<QuizSessionId, StorageError>;

    /// Quiz history of `user` on `topic`, latest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on repository failures.
    async fn list_quiz_sessions(
        &self,
        user: UserId,
        topic: Topic,
    ) -> Result<Vec<(QuizSessionId, QuizSession)>, StorageError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct MemoryState {
    next_id: u64,
    videos: BTreeMap<VideoId, Video>,
    mcqs: BTreeMap<McqId, Mcq>,
    problems: BTreeMap<ProblemId, CodingProblem>,
    cheat_sheets: BTreeMap<CheatSheetId, CheatSheet>,
    video_progress: HashMap<(UserId, VideoId), VideoCompletion>,
    mcq_attempts: Vec<McqAttempt>,
    coding_progress: HashMap<(UserId, ProblemId), CodingProgress>,
    notes: BTreeMap<NoteId, Note>,
    quiz_sessions: BTreeMap<QuizSessionId, QuizSession>,
}

impl MemoryState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn insert_video(&self, video: NewVideoRecord) -> Result<VideoId, StorageError> {
        let mut guard = self.lock()?;
        let id = VideoId::new(guard.next_id());
        guard.videos.insert(id, video.into_video(id));
        Ok(id)
    }

    async fn insert_mcq(&self, mcq: NewMcqRecord) -> Result<McqId, StorageError> {
        let mut guard = self.lock()?;
        let id = McqId::new(guard.next_id());
        guard.mcqs.insert(id, mcq.into_mcq(id));
        Ok(id)
    }

    async fn insert_problem(&self, problem: NewProblemRecord) -> Result<ProblemId, StorageError> {
        let mut guard = self.lock()?;
        let id = ProblemId::new(guard.next_id());
        guard.problems.insert(id, problem.into_problem(id));
        Ok(id)
    }

    async fn insert_cheat_sheet(
        &self,
        sheet: NewCheatSheetRecord,
    ) -> Result<CheatSheetId, StorageError> {
        let mut guard = self.lock()?;
        let id = CheatSheetId::new(guard.next_id());
        guard.cheat_sheets.insert(
            id,
            CheatSheet {
                id,
                topic: sheet.topic,
                title: sheet.title,
                content: sheet.content,
                created_at: sheet.created_at,
                updated_at: sheet.created_at,
            },
        );
        Ok(id)
    }

    async fn video_ids(&self, topic: Topic) -> Result<Vec<VideoId>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .videos
            .values()
            .filter(|v| v.topic == topic)
            .map(|v| v.id)
            .collect())
    }

    async fn mcq_ids(&self, topic: Topic) -> Result<Vec<McqId>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .mcqs
            .values()
            .filter(|m| m.topic == topic)
            .map(|m| m.id)
            .collect())
    }

    async fn problem_ids(&self, topic: Topic) -> Result<Vec<ProblemId>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .problems
            .values()
            .filter(|p| p.topic == topic)
            .map(|p| p.id)
            .collect())
    }

    async fn list_videos(&self, topic: Topic) -> Result<Vec<Video>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .videos
            .values()
            .filter(|v| v.topic == topic)
            .cloned()
            .collect())
    }

    async fn list_mcqs(
        &self,
        topic: Topic,
        difficulty: Option<Difficulty>,
        limit: Option<u32>,
    ) -> Result<Vec<Mcq>, StorageError> {
        let guard = self.lock()?;
        let limit = limit.map_or(usize::MAX, |l| l as usize);
        Ok(guard
            .mcqs
            .values()
            .filter(|m| m.topic == topic && difficulty.is_none_or(|d| m.difficulty == d))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_problems(&self, topic: Topic) -> Result<Vec<CodingProblem>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .problems
            .values()
            .filter(|p| p.topic == topic)
            .cloned()
            .collect())
    }

    async fn get_mcq(&self, id: McqId) -> Result<Option<Mcq>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.mcqs.get(&id).cloned())
    }

    async fn list_cheat_sheets(&self, topic: Topic) -> Result<Vec<CheatSheet>, StorageError> {
        let guard = self.lock()?;
        let mut sheets: Vec<CheatSheet> = guard
            .cheat_sheets
            .values()
            .filter(|s| s.topic == topic)
            .cloned()
            .collect();
        sheets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(sheets)
    }
}

#[async_trait]
impl ProgressRepository for InMemoryRepository {
    async fn upsert_video_completion(
        &self,
        completion: &VideoCompletion,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.videos.contains_key(&completion.video_id) {
            return Err(StorageError::NotFound);
        }
        guard.video_progress.insert(
            (completion.user_id, completion.video_id),
            completion.clone(),
        );
        Ok(())
    }

    async fn delete_video_completion(
        &self,
        user: UserId,
        video: VideoId,
    ) -> Result<bool, StorageError> {
        let mut guard = self.lock()?;
        Ok(guard.video_progress.remove(&(user, video)).is_some())
    }

    async fn get_video_completion(
        &self,
        user: UserId,
        video: VideoId,
    ) -> Result<Option<VideoCompletion>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.video_progress.get(&(user, video)).cloned())
    }

    async fn completed_video_ids(
        &self,
        user: UserId,
        ids: &[VideoId],
    ) -> Result<Vec<VideoId>, StorageError> {
        let guard = self.lock()?;
        Ok(ids
            .iter()
            .filter(|id| {
                guard
                    .video_progress
                    .get(&(user, **id))
                    .is_some_and(|c| c.completed)
            })
            .copied()
            .collect())
    }

    async fn append_mcq_attempt(&self, attempt: &McqAttempt) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.mcqs.contains_key(&attempt.mcq_id) {
            return Err(StorageError::NotFound);
        }
        guard.mcq_attempts.push(attempt.clone());
        Ok(())
    }

    async fn attempted_mcq_ids(
        &self,
        user: UserId,
        ids: &[McqId],
    ) -> Result<Vec<McqId>, StorageError> {
        let wanted: HashSet<McqId> = ids.iter().copied().collect();
        let guard = self.lock()?;
        Ok(guard
            .mcq_attempts
            .iter()
            .filter(|a| a.user_id == user && wanted.contains(&a.mcq_id))
            .map(|a| a.mcq_id)
            .collect())
    }

    async fn upsert_coding_progress(&self, progress: &CodingProgress) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if !guard.problems.contains_key(&progress.problem_id) {
            return Err(StorageError::NotFound);
        }
        guard
            .coding_progress
            .insert((progress.user_id, progress.problem_id), progress.clone());
        Ok(())
    }

    async fn get_coding_progress(
        &self,
        user: UserId,
        problem: ProblemId,
    ) -> Result<Option<CodingProgress>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.coding_progress.get(&(user, problem)).cloned())
    }

    async fn coding_progress_for(
        &self,
        user: UserId,
        ids: &[ProblemId],
    ) -> Result<Vec<CodingProgress>, StorageError> {
        let guard = self.lock()?;
        Ok(ids
            .iter()
            .filter_map(|id| guard.coding_progress.get(&(user, *id)).cloned())
            .collect())
    }

    async fn solved_problem_ids(
        &self,
        user: UserId,
        ids: &[ProblemId],
    ) -> Result<Vec<ProblemId>, StorageError> {
        let guard = self.lock()?;
        Ok(ids
            .iter()
            .filter(|id| {
                guard
                    .coding_progress
                    .get(&(user, **id))
                    .is_some_and(CodingProgress::solved)
            })
            .copied()
            .collect())
    }
}

#[async_trait]
impl NoteRepository for InMemoryRepository {
    async fn insert_note(&self, note: &Note) -> Result<NoteId, StorageError> {
        let mut guard = self.lock()?;
        let id = NoteId::new(guard.next_id());
        guard.notes.insert(id, note.clone().with_id(id));
        Ok(id)
    }

    async fn update_note(&self, note: &Note) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let slot = guard.notes.get_mut(&note.id()).ok_or(StorageError::NotFound)?;
        *slot = note.clone();
        Ok(())
    }

    async fn get_note(&self, id: NoteId) -> Result<Option<Note>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.notes.get(&id).cloned())
    }

    async fn delete_note(&self, id: NoteId) -> Result<bool, StorageError> {
        let mut guard = self.lock()?;
        Ok(guard.notes.remove(&id).is_some())
    }

    async fn list_notes(&self, user: UserId, topic: Topic) -> Result<Vec<Note>, StorageError> {
        let guard = self.lock()?;
        let mut notes: Vec<Note> = guard
            .notes
            .values()
            .filter(|n| n.user_id() == user && n.topic() == topic)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()).then(b.id().cmp(&a.id())));
        Ok(notes)
    }
}

#[async_trait]
impl QuizSessionRepository for InMemoryRepository {
    async fn record_quiz(
        &self,
        session: &QuizSession,
        attempts: &[McqAttempt],
    ) -> Result<QuizSessionId, StorageError> {
        let mut guard = self.lock()?;
        if attempts.iter().any(|a| !guard.mcqs.contains_key(&a.mcq_id)) {
            return Err(StorageError::NotFound);
        }
        let id = QuizSessionId::new(guard.next_id());
        guard.quiz_sessions.insert(id, session.clone());
        guard.mcq_attempts.extend(attempts.iter().cloned());
        Ok(id)
    }

    async fn list_quiz_sessions(
        &self,
        user: UserId,
        topic: Topic,
    ) -> Result<Vec<(QuizSessionId, QuizSession)>, StorageError> {
        let guard = self.lock()?;
        let mut sessions: Vec<(QuizSessionId, QuizSession)> = guard
            .quiz_sessions
            .iter()
            .filter(|(_, s)| s.user_id == user && s.topic == topic)
            .map(|(id, s)| (*id, s.clone()))
            .collect();
        sessions.sort_by(|a, b| b.1.completed_at.cmp(&a.1.completed_at).then(b.0.cmp(&a.0)));
        Ok(sessions)
    }
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub content: Arc<dyn ContentRepository>,
    pub progress: Arc<dyn ProgressRepository>,
    pub notes: Arc<dyn NoteRepository>,
    pub quizzes: Arc<dyn QuizSessionRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Wire every contract to clones of one repository.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: ContentRepository
            + ProgressRepository
            + NoteRepository
            + QuizSessionRepository
            + Clone
            + 'static,
    {
        let content: Arc<dyn ContentRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressRepository> = Arc::new(repo.clone());
        let notes: Arc<dyn NoteRepository> = Arc::new(repo.clone());
        let quizzes: Arc<dyn QuizSessionRepository> = Arc::new(repo);
        Self {
            content,
            progress,
            notes,
            quizzes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsa_core::model::NoteDraft;
    use dsa_core::time::fixed_now;

    fn video(topic: Topic) -> NewVideoRecord {
        NewVideoRecord {
            topic,
            difficulty: Difficulty::Beginner,
            title: "Intro".into(),
            description: None,
            video_url: "https://youtu.be/abc".into(),
            platform: "YouTube".into(),
            duration_minutes: Some(10),
            created_at: fixed_now(),
        }
    }

    fn mcq(topic: Topic, difficulty: Difficulty) -> NewMcqRecord {
        NewMcqRecord {
            topic,
            difficulty,
            question: "?".into(),
            options: ["a".into(), "b".into(), "c".into(), "d".into()],
            correct: McqOption::A,
            explanation: None,
            created_at: fixed_now(),
        }
    }

    #[tokio::test]
    async fn ids_are_scoped_to_topic() {
        let repo = InMemoryRepository::new();
        let sorting = repo.insert_video(video(Topic::Sorting)).await.unwrap();
        repo.insert_video(video(Topic::Strings)).await.unwrap();

        let ids = repo.video_ids(Topic::Sorting).await.unwrap();
        assert_eq!(ids, vec![sorting]);
        assert!(repo.video_ids(Topic::Hashmaps).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn completions_are_restricted_to_requested_ids() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let a = repo.insert_video(video(Topic::Sorting)).await.unwrap();
        let b = repo.insert_video(video(Topic::Sorting)).await.unwrap();
        for id in [a, b] {
            repo.upsert_video_completion(&VideoCompletion::completed(user, id, fixed_now()))
                .await
                .unwrap();
        }

        let done = repo.completed_video_ids(user, &[a]).await.unwrap();
        assert_eq!(done, vec![a]);
        let other = repo
            .completed_video_ids(UserId::random(), &[a, b])
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn completion_for_unknown_video_is_rejected() {
        let repo = InMemoryRepository::new();
        let err = repo
            .upsert_video_completion(&VideoCompletion::completed(
                UserId::random(),
                VideoId::new(99),
                fixed_now(),
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn repeated_attempts_are_all_returned() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let id = repo
            .insert_mcq(mcq(Topic::Basics, Difficulty::Beginner))
            .await
            .unwrap();
        for selected in [McqOption::B, McqOption::A] {
            repo.append_mcq_attempt(&McqAttempt {
                user_id: user,
                mcq_id: id,
                selected: Some(selected),
                is_correct: selected == McqOption::A,
                attempted_at: fixed_now(),
            })
            .await
            .unwrap();
        }
        assert_eq!(repo.attempted_mcq_ids(user, &[id]).await.unwrap(), vec![id, id]);
    }

    #[tokio::test]
    async fn list_mcqs_filters_and_limits() {
        let repo = InMemoryRepository::new();
        for _ in 0..3 {
            repo.insert_mcq(mcq(Topic::Sorting, Difficulty::High))
                .await
                .unwrap();
        }
        repo.insert_mcq(mcq(Topic::Sorting, Difficulty::Beginner))
            .await
            .unwrap();

        let high = repo
            .list_mcqs(Topic::Sorting, Some(Difficulty::High), None)
            .await
            .unwrap();
        assert_eq!(high.len(), 3);
        let capped = repo.list_mcqs(Topic::Sorting, None, Some(2)).await.unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[tokio::test]
    async fn notes_list_latest_update_first() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        let first = Note::new(
            NoteId::new(0),
            user,
            Topic::Strings,
            NoteDraft::new("one", "1"),
            fixed_now(),
        )
        .unwrap();
        let first_id = repo.insert_note(&first).await.unwrap();
        let second = Note::new(
            NoteId::new(0),
            user,
            Topic::Strings,
            NoteDraft::new("two", "2"),
            fixed_now() + chrono::Duration::minutes(1),
        )
        .unwrap();
        repo.insert_note(&second).await.unwrap();

        let mut edited = repo.get_note(first_id).await.unwrap().unwrap();
        edited
            .edit(
                NoteDraft::new("one", "1b"),
                fixed_now() + chrono::Duration::minutes(5),
            )
            .unwrap();
        repo.update_note(&edited).await.unwrap();

        let notes = repo.list_notes(user, Topic::Strings).await.unwrap();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].id(), first_id);
    }
}
