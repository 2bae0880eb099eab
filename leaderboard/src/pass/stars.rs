use crate::config::LeaderboardConfig;
use crate::pass::ScoringPass;
use model::Repository;

#[derive(Debug, Clone)]
pub struct StarsData {
    pub stargazer_count: u32,
}

impl From<&Repository> for StarsData {
    fn from(repo: &Repository) -> Self {
        Self {
            stargazer_count: repo.stars,
        }
    }
}

pub struct Stars;

impl ScoringPass for Stars {
    fn apply(&self, ctx: &LeaderboardConfig, repo: &Repository) -> f64 {
        let data = StarsData::from(repo);
        ctx.calibration
            .stars
            .normalize(f64::from(data.stargazer_count))
    }

    fn name(&self) -> &'static str {
        "stars"
    }
}
