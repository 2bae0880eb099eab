pub mod activity;
pub mod growth;
pub mod social;
pub mod stars;

use crate::config::LeaderboardConfig;
use model::Repository;
use std::sync::Arc;

/// One scoring factor. The ranker multiplies [`ScoringPass::apply`] by the
/// weight the tier's table gives to [`ScoringPass::name`].
pub trait ScoringPass: Send + Sync {
    /// Factor value in `[0, 1]`, before the tier weight is applied.
    fn apply(&self, ctx: &LeaderboardConfig, repo: &Repository) -> f64;
    fn name(&self) -> &'static str;
}

pub fn default_passes() -> Vec<Arc<dyn ScoringPass>> {
    vec![
        Arc::new(stars::Stars),
        Arc::new(activity::RecentActivity),
        Arc::new(social::SocialSignals),
        Arc::new(growth::GrowthRate),
    ]
}

/// Maps `value` onto `[0, 1]` with logarithmic compression between `min_val`
/// and `max_val`, so a 100k-star project does not drown out a 50-star one.
pub fn log_scale(value: f64, min_val: f64, max_val: f64) -> f64 {
    if value <= min_val {
        return 0.0;
    }
    if value >= max_val {
        return 1.0;
    }
    // shift so the lower bound maps to ln(1) = 0
    let shifted_val = value - min_val + 1.0;
    let shifted_max = max_val - min_val + 1.0;
    (shifted_val.ln() / shifted_max.ln()).clamp(0.0, 1.0)
}
