use crate::config::LeaderboardConfig;
use crate::pass::ScoringPass;
use model::Repository;

#[derive(Debug, Clone)]
pub struct SocialData {
    pub reddit_mentions: u32,
    pub reddit_upvotes: u32,
    pub web_mentions: u32,
}

impl From<&Repository> for SocialData {
    fn from(repo: &Repository) -> Self {
        Self {
            reddit_mentions: repo.reddit_mentions,
            reddit_upvotes: repo.reddit_upvotes,
            web_mentions: repo.web_mentions,
        }
    }
}

pub struct SocialSignals;

impl ScoringPass for SocialSignals {
    fn apply(&self, ctx: &LeaderboardConfig, repo: &Repository) -> f64 {
        let data = SocialData::from(repo);
        let calibration = &ctx.calibration;
        calibration
            .reddit_mentions
            .normalize(f64::from(data.reddit_mentions))
            * ctx.social.reddit_mentions
            + calibration
                .reddit_upvotes
                .normalize(f64::from(data.reddit_upvotes))
                * ctx.social.reddit_upvotes
            + calibration
                .web_mentions
                .normalize(f64::from(data.web_mentions))
                * ctx.social.web_mentions
    }

    fn name(&self) -> &'static str {
        "social_signals"
    }
}
