#![forbid(unsafe_code)]

pub mod app_services;
pub mod coding_service;
pub mod dashboard;
pub mod error;
pub mod mcq_service;
pub mod note_service;
pub mod progress;
pub mod quiz_service;
pub mod topic_content_service;
pub mod video_service;

#[cfg(test)]
mod test_support;

pub use dsa_core::Clock;

pub use app_services::AppServices;
pub use coding_service::CodingProgressService;
pub use dashboard::{DashboardService, TopicCard};
pub use error::{
    AppServicesError, ContentServiceError, McqServiceError, NoteServiceError, ProgressError,
    QuizServiceError, TrackingError,
};
pub use mcq_service::{AnswerFeedback, McqService};
pub use note_service::NoteService;
pub use progress::{ProgressAggregator, ProgressRequest, ProgressState, ProgressTracker};
pub use quiz_service::{Quiz, QuizOutcome, QuizService};
pub use topic_content_service::{TOPIC_PAGE_MCQS, TopicContent, TopicContentService};
pub use video_service::VideoProgressService;
