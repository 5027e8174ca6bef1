use dsa_core::model::{Topic, UserId};
use futures::future::join_all;
use serde::Serialize;

use crate::progress::{ProgressAggregator, ProgressState};

/// One entry of the topic grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicCard {
    pub topic: Topic,
    pub title: &'static str,
    pub description: &'static str,
    /// Overall percentage; 0 while unavailable.
    pub progress: u8,
    #[serde(skip)]
    pub state: ProgressState,
}

/// Builds the topic grid shown after sign-in.
#[derive(Clone)]
pub struct DashboardService {
    aggregator: ProgressAggregator,
}

impl DashboardService {
    #[must_use]
    pub fn new(aggregator: ProgressAggregator) -> Self {
        Self { aggregator }
    }

    /// Cards for every topic, in dashboard order.
    ///
    /// Topics are computed concurrently; a topic whose reads fail shows 0
    /// without hiding the others.
    pub async fn topic_cards(&self, user: Option<UserId>) -> Vec<TopicCard> {
        let states = join_all(
            Topic::ALL
                .iter()
                .map(|topic| self.aggregator.compute_progress(*topic, user)),
        )
        .await;

        Topic::ALL
            .iter()
            .zip(states)
            .map(|(topic, state)| TopicCard {
                topic: *topic,
                title: topic.title(),
                description: topic.description(),
                progress: state.progress().overall,
                state,
            })
            .collect()
    }
}
