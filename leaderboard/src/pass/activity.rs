use crate::config::LeaderboardConfig;
use crate::pass::ScoringPass;
use model::Repository;

#[derive(Debug, Clone)]
pub struct ActivityData {
    /// Commits since the collector's activity cutoff.
    pub recent_commits: u32,
}

impl From<&Repository> for ActivityData {
    fn from(repo: &Repository) -> Self {
        Self {
            recent_commits: repo.recent_commits_count,
        }
    }
}

pub struct RecentActivity;

impl ScoringPass for RecentActivity {
    fn apply(&self, ctx: &LeaderboardConfig, repo: &Repository) -> f64 {
        let data = ActivityData::from(repo);
        ctx.calibration
            .recent_commits
            .normalize(f64::from(data.recent_commits))
    }

    fn name(&self) -> &'static str {
        "recent_activity"
    }
}
