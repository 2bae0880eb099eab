//! Record types shared by the leaderboard and its output writers.

pub mod date;
pub mod de;
pub mod repository;
pub mod signals;

pub use repository::{DedupKey, ParseTierError, Platform, Repository, Tier, MAX_CONTRIBUTORS};
pub use signals::{RedditSignals, SignalMap, SignalSource, SocialSignals, WebSignals};
