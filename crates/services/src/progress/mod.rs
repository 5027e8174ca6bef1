mod aggregator;
mod state;
mod tracker;

// Public API of the progress subsystem.
pub use crate::error::ProgressError;
pub use aggregator::ProgressAggregator;
pub use state::ProgressState;
pub use tracker::{ProgressRequest, ProgressTracker};
