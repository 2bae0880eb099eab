//! Aggregates, classifies and ranks media-center addon repositories into a
//! tiered leaderboard.
//!
//! [`aggregator`], [`classifier`] and [`ranker`] are pure transforms over
//! in-memory records and never log; [`manager::LeaderboardManager`] drives
//! them for one snapshot and reports progress through `tracing`.

pub mod aggregator;
pub mod classifier;
pub mod config;
pub mod error;
pub mod manager;
pub mod pass;
pub mod ranker;
pub mod snapshot;

pub use aggregator::{aggregate, aggregate_with_report, Aggregation, DuplicateResolution};
pub use classifier::{Classifier, Leaderboard};
pub use config::LeaderboardConfig;
pub use error::{LeaderboardError, Result};
pub use manager::{LeaderboardManager, LeaderboardRun};
pub use ranker::Ranker;
pub use snapshot::Snapshot;
