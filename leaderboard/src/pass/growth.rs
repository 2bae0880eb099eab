use crate::config::LeaderboardConfig;
use crate::pass::ScoringPass;
use model::Repository;

#[derive(Debug, Clone)]
pub struct GrowthData {
    pub star_velocity_30d: f64,
    pub recent_mentions_30d: u32,
}

impl From<&Repository> for GrowthData {
    fn from(repo: &Repository) -> Self {
        Self {
            star_velocity_30d: repo.star_velocity_30d,
            recent_mentions_30d: repo.recent_mentions_30d,
        }
    }
}

/// Momentum over the last 30 days. Only the rising tier weighs it by default.
pub struct GrowthRate;

impl ScoringPass for GrowthRate {
    fn apply(&self, ctx: &LeaderboardConfig, repo: &Repository) -> f64 {
        let data = GrowthData::from(repo);
        ctx.calibration.star_velocity.normalize(data.star_velocity_30d)
            * ctx.growth_rate.star_velocity
            + ctx
                .calibration
                .recent_mentions
                .normalize(f64::from(data.recent_mentions_30d))
                * ctx.growth_rate.recent_mentions
    }

    fn name(&self) -> &'static str {
        "growth_rate"
    }
}
