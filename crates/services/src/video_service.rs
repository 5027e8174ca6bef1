use std::sync::Arc;

use dsa_core::model::{UserId, VideoCompletion, VideoId};
use storage::repository::ProgressRepository;
use tracing::info;

use crate::Clock;
use crate::error::TrackingError;

/// Records which videos a user has watched.
#[derive(Clone)]
pub struct VideoProgressService {
    clock: Clock,
    progress: Arc<dyn ProgressRepository>,
}

impl VideoProgressService {
    #[must_use]
    pub fn new(clock: Clock, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { clock, progress }
    }

    /// Mark a video as watched now. Marking again refreshes the timestamp.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Storage` if the video does not exist or the write fails.
    pub async fn mark_completed(
        &self,
        user: UserId,
        video: VideoId,
    ) -> Result<VideoCompletion, TrackingError> {
        let completion = VideoCompletion::completed(user, video, self.clock.now());
        self.progress.upsert_video_completion(&completion).await?;
        info!(%user, %video, "video marked completed");
        Ok(completion)
    }

    /// Remove the watched mark. Returns `false` if there was none.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::Storage` if repository access fails.
    pub async fn unmark(&self, user: UserId, video: VideoId) -> Result<bool, TrackingError> {
        let removed = self.progress.delete_video_completion(user, video).await?;
        if removed {
            info!(%user, %video, "video unmarked");
        }
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns `TrackingError::Storage` if repository access fails.
    pub async fn is_completed(&self, user: UserId, video: VideoId) -> Result<bool, TrackingError> {
        Ok(self
            .progress
            .get_video_completion(user, video)
            .await?
            .is_some_and(|c| c.completed))
    }
}
