use model::{ParseTierError, Tier};
use thiserror::Error;

/// Configuration defects. Data-quality problems never surface here; they are
/// absorbed by defaults in the aggregator, classifier and ranker.
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error(transparent)]
    UnknownTier(#[from] ParseTierError),

    #[error("unknown scoring factor `{factor}` in the {tier} weight table")]
    UnknownFactor { tier: Tier, factor: String },

    #[error("weight for `{factor}` in the {tier} weight table must be finite, got {weight}")]
    InvalidWeight { tier: Tier, factor: String, weight: f64 },

    #[error(
        "new tier ends at {new_max_age_days} days, \
         after the rising tier ends at {rising_max_age_days} days"
    )]
    InvalidThresholds {
        new_max_age_days: u32,
        rising_max_age_days: u32,
    },

    #[error("failed to load configuration")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, LeaderboardError>;
