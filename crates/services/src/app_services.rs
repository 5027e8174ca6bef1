use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::coding_service::CodingProgressService;
use crate::dashboard::DashboardService;
use crate::error::AppServicesError;
use crate::mcq_service::McqService;
use crate::note_service::NoteService;
use crate::progress::ProgressAggregator;
use crate::quiz_service::QuizService;
use crate::topic_content_service::TopicContentService;
use crate::video_service::VideoProgressService;

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    aggregator: ProgressAggregator,
    dashboard: Arc<DashboardService>,
    topic_content: Arc<TopicContentService>,
    videos: Arc<VideoProgressService>,
    mcqs: Arc<McqService>,
    quizzes: Arc<QuizService>,
    coding: Arc<CodingProgressService>,
    notes: Arc<NoteService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::from_storage(&storage, clock))
    }

    #[must_use]
    pub fn from_storage(storage: &Storage, clock: Clock) -> Self {
        let aggregator =
            ProgressAggregator::new(Arc::clone(&storage.content), Arc::clone(&storage.progress));
        Self {
            dashboard: Arc::new(DashboardService::new(aggregator.clone())),
            topic_content: Arc::new(TopicContentService::new(Arc::clone(&storage.content))),
            videos: Arc::new(VideoProgressService::new(
                clock,
                Arc::clone(&storage.progress),
            )),
            mcqs: Arc::new(McqService::new(
                clock,
                Arc::clone(&storage.content),
                Arc::clone(&storage.progress),
            )),
            quizzes: Arc::new(QuizService::new(
                clock,
                Arc::clone(&storage.content),
                Arc::clone(&storage.quizzes),
            )),
            coding: Arc::new(CodingProgressService::new(
                clock,
                Arc::clone(&storage.progress),
            )),
            notes: Arc::new(NoteService::new(clock, Arc::clone(&storage.notes))),
            aggregator,
        }
    }

    #[must_use]
    pub fn aggregator(&self) -> &ProgressAggregator {
        &self.aggregator
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    #[must_use]
    pub fn topic_content(&self) -> Arc<TopicContentService> {
        Arc::clone(&self.topic_content)
    }

    #[must_use]
    pub fn videos(&self) -> Arc<VideoProgressService> {
        Arc::clone(&self.videos)
    }

    #[must_use]
    pub fn mcqs(&self) -> Arc<McqService> {
        Arc::clone(&self.mcqs)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn coding(&self) -> Arc<CodingProgressService> {
        Arc::clone(&self.coding)
    }

    #[must_use]
    pub fn notes(&self) -> Arc<NoteService> {
        Arc::clone(&self.notes)
    }
}
