//! Fixtures shared by the unit tests in this crate.

use async_trait::async_trait;
use dsa_core::model::{
    CheatSheet, CheatSheetId, CodingProblem, CodingProgress, Difficulty, Mcq, McqAttempt, McqId,
    McqOption, Platform, ProblemId, Topic, UserId, Video, VideoCompletion, VideoId,
};
use dsa_core::time::fixed_now;
use storage::repository::{
    ContentRepository, InMemoryRepository, NewCheatSheetRecord, NewMcqRecord, NewProblemRecord,
    NewVideoRecord, ProgressRepository, StorageError,
};

fn down() -> StorageError {
    StorageError::Connection("database unreachable".into())
}

/// Repository whose every call fails; doubles as a probe that no read happened.
pub(crate) struct Unreachable;

#[async_trait]
impl ContentRepository for Unreachable {
    async fn insert_video(&self, _: NewVideoRecord) -> Result<VideoId, StorageError> {
        Err(down())
    }
    async fn insert_mcq(&self, _: NewMcqRecord) -> Result<McqId, StorageError> {
        Err(down())
    }
    async fn insert_problem(&self, _: NewProblemRecord) -> Result<ProblemId, StorageError> {
        Err(down())
    }
    async fn insert_cheat_sheet(
        &self,
        _: NewCheatSheetRecord,
    ) -> Result<CheatSheetId, StorageError> {
        Err(down())
    }
    async fn video_ids(&self, _: Topic) -> Result<Vec<VideoId>, StorageError> {
        Err(down())
    }
    async fn mcq_ids(&self, _: Topic) -> Result<Vec<McqId>, StorageError> {
        Err(down())
    }
    async fn problem_ids(&self, _: Topic) -> Result<Vec<ProblemId>, StorageError> {
        Err(down())
    }
    async fn list_videos(&self, _: Topic) -> Result<Vec<Video>, StorageError> {
        Err(down())
    }
    async fn list_mcqs(
        &self,
        _: Topic,
        _: Option<Difficulty>,
        _: Option<u32>,
    ) -> Result<Vec<Mcq>, StorageError> {
        Err(down())
    }
    async fn list_problems(&self, _: Topic) -> Result<Vec<CodingProblem>, StorageError> {
        Err(down())
    }
    async fn get_mcq(&self, _: McqId) -> Result<Option<Mcq>, StorageError> {
        Err(down())
    }
    async fn list_cheat_sheets(&self, _: Topic) -> Result<Vec<CheatSheet>, StorageError> {
        Err(down())
    }
}

#[async_trait]
impl ProgressRepository for Unreachable {
    async fn upsert_video_completion(&self, _: &VideoCompletion) -> Result<(), StorageError> {
        Err(down())
    }
    async fn delete_video_completion(&self, _: UserId, _: VideoId) -> Result<bool, StorageError> {
        Err(down())
    }
    async fn get_video_completion(
        &self,
        _: UserId,
        _: VideoId,
    ) -> Result<Option<VideoCompletion>, StorageError> {
        Err(down())
    }
    async fn completed_video_ids(
        &self,
        _: UserId,
        _: &[VideoId],
    ) -> Result<Vec<VideoId>, StorageError> {
        Err(down())
    }
    async fn append_mcq_attempt(&self, _: &McqAttempt) -> Result<(), StorageError> {
        Err(down())
    }
    async fn attempted_mcq_ids(&self, _: UserId, _: &[McqId]) -> Result<Vec<McqId>, StorageError> {
        Err(down())
    }
    async fn upsert_coding_progress(&self, _: &CodingProgress) -> Result<(), StorageError> {
        Err(down())
    }
    async fn get_coding_progress(
        &self,
        _: UserId,
        _: ProblemId,
    ) -> Result<Option<CodingProgress>, StorageError> {
        Err(down())
    }
    async fn coding_progress_for(
        &self,
        _: UserId,
        _: &[ProblemId],
    ) -> Result<Vec<CodingProgress>, StorageError> {
        Err(down())
    }
    async fn solved_problem_ids(
        &self,
        _: UserId,
        _: &[ProblemId],
    ) -> Result<Vec<ProblemId>, StorageError> {
        Err(down())
    }
}

pub(crate) async fn add_videos(repo: &InMemoryRepository, topic: Topic, n: usize) -> Vec<VideoId> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let id = repo
            .insert_video(NewVideoRecord {
                topic,
                difficulty: Difficulty::Beginner,
                title: format!("Video {i}"),
                description: None,
                video_url: format!("https://youtu.be/v{i}"),
                platform: "YouTube".into(),
                duration_minutes: None,
                created_at: fixed_now(),
            })
            .await
            .unwrap();
        ids.push(id);
    }
    ids
}

pub(crate) fn mcq_record(topic: Topic, difficulty: Difficulty, correct: McqOption) -> NewMcqRecord {
    NewMcqRecord {
        topic,
        difficulty,
        question: "Which one?".into(),
        options: ["a".into(), "b".into(), "c".into(), "d".into()],
        correct,
        explanation: Some("A is right".into()),
        created_at: fixed_now(),
    }
}

/// Adds `n` beginner MCQs whose correct answer is `A`.
pub(crate) async fn add_mcqs(repo: &InMemoryRepository, topic: Topic, n: usize) -> Vec<McqId> {
    let mut ids = Vec::with_capacity(n);
    for _ in 0..n {
        let id = repo
            .insert_mcq(mcq_record(topic, Difficulty::Beginner, McqOption::A))
            .await
            .unwrap();
        ids.push(id);
    }
    ids
}

pub(crate) async fn add_problems(
    repo: &InMemoryRepository,
    topic: Topic,
    n: usize,
) -> Vec<ProblemId> {
    let mut ids = Vec::with_capacity(n);
    for i in 0..n {
        let id = repo
            .insert_problem(NewProblemRecord {
                topic,
                difficulty: Difficulty::Medium,
                title: format!("Problem {i}"),
                description: None,
                problem_url: format!("https://leetcode.com/problems/p{i}/"),
                platform: Platform::Leetcode,
                tags: Vec::new(),
                created_at: fixed_now(),
            })
            .await
            .unwrap();
        ids.push(id);
    }
    ids
}

pub(crate) async fn complete_video(repo: &InMemoryRepository, user: UserId, video: VideoId) {
    repo.upsert_video_completion(&VideoCompletion::completed(user, video, fixed_now()))
        .await
        .unwrap();
}

pub(crate) async fn attempt(
    repo: &InMemoryRepository,
    user: UserId,
    mcq: McqId,
    selected: McqOption,
) {
    repo.append_mcq_attempt(&McqAttempt {
        user_id: user,
        mcq_id: mcq,
        selected: Some(selected),
        is_correct: selected == McqOption::A,
        attempted_at: fixed_now(),
    })
    .await
    .unwrap();
}

pub(crate) async fn solve(repo: &InMemoryRepository, user: UserId, problem: ProblemId) {
    let mut progress = CodingProgress::untouched(user, problem);
    progress.set_solved(true, fixed_now());
    repo.upsert_coding_progress(&progress).await.unwrap();
}
