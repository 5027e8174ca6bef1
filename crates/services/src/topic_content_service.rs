use std::sync::Arc;

use dsa_core::model::{CheatSheet, CodingProblem, Mcq, Topic, Video};
use serde::Serialize;
use storage::repository::ContentRepository;

use crate::error::ContentServiceError;

/// Number of MCQs shown on a topic page.
pub const TOPIC_PAGE_MCQS: u32 = 5;

/// Everything listed on a topic page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicContent {
    pub topic: Topic,
    pub videos: Vec<Video>,
    pub mcqs: Vec<Mcq>,
    pub problems: Vec<CodingProblem>,
}

#[derive(Clone)]
pub struct TopicContentService {
    content: Arc<dyn ContentRepository>,
}

impl TopicContentService {
    #[must_use]
    pub fn new(content: Arc<dyn ContentRepository>) -> Self {
        Self { content }
    }

    /// Load the videos, the first MCQs, and the coding problems of a topic.
    ///
    /// # Errors
    ///
    /// Returns `ContentServiceError::Storage` if any of the three reads fails.
    pub async fn topic_content(&self, topic: Topic) -> Result<TopicContent, ContentServiceError> {
        let (videos, mcqs, problems) = futures::try_join!(
            self.content.list_videos(topic),
            self.content.list_mcqs(topic, None, Some(TOPIC_PAGE_MCQS)),
            self.content.list_problems(topic),
        )?;
        Ok(TopicContent {
            topic,
            videos,
            mcqs,
            problems,
        })
    }

    /// Cheat sheets of a topic, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ContentServiceError::Storage` if repository access fails.
    pub async fn cheat_sheets(&self, topic: Topic) -> Result<Vec<CheatSheet>, ContentServiceError> {
        Ok(self.content.list_cheat_sheets(topic).await?)
    }
}
