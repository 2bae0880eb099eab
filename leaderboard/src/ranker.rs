use std::collections::HashMap;
use std::sync::Arc;

use crate::config::LeaderboardConfig;
use crate::error::{LeaderboardError, Result};
use crate::pass::{default_passes, ScoringPass};
use model::{Repository, Tier};

struct WeightedPass {
    pass: Arc<dyn ScoringPass>,
    weight: f64,
}

/// Scores repositories with a per-tier weight table and orders each tier.
pub struct Ranker {
    config: LeaderboardConfig,
    tables: HashMap<Tier, Vec<WeightedPass>>,
}

impl Ranker {
    pub fn new(config: &LeaderboardConfig) -> Result<Self> {
        Self::with_passes(config, default_passes())
    }

    /// Resolves every factor named in the weight tables against `passes`.
    /// A name with no matching pass is a configuration error. Factors are
    /// summed in `passes` order.
    pub fn with_passes(
        config: &LeaderboardConfig,
        passes: Vec<Arc<dyn ScoringPass>>,
    ) -> Result<Self> {
        let mut tables = HashMap::new();
        for tier in Tier::ALL {
            let weights = config.weights.for_tier(tier);
            if let Some(factor) = weights
                .keys()
                .find(|factor| !passes.iter().any(|p| p.name() == factor.as_str()))
            {
                return Err(LeaderboardError::UnknownFactor {
                    tier,
                    factor: factor.clone(),
                });
            }
            let table = passes
                .iter()
                .filter_map(|pass| {
                    weights.get(pass.name()).map(|weight| WeightedPass {
                        pass: Arc::clone(pass),
                        weight: *weight,
                    })
                })
                .collect();
            tables.insert(tier, table);
        }
        Ok(Self {
            config: config.clone(),
            tables,
        })
    }

    fn table(&self, tier: Tier) -> &[WeightedPass] {
        self.tables.get(&tier).map(Vec::as_slice).unwrap_or_default()
    }

    /// Weighted contribution of each factor in the tier's table.
    pub fn breakdown(&self, repo: &Repository, tier: Tier) -> Vec<(&'static str, f64)> {
        self.table(tier)
            .iter()
            .map(|wp| (wp.pass.name(), wp.pass.apply(&self.config, repo) * wp.weight))
            .collect()
    }

    pub fn composite_score(&self, repo: &Repository, tier: Tier) -> f64 {
        self.table(tier)
            .iter()
            .map(|wp| wp.pass.apply(&self.config, repo) * wp.weight)
            .sum()
    }

    /// Scores `repos` with `tier`'s weights, sorts by descending score and
    /// assigns 1-based ranks. Equal scores keep their input order.
    pub fn rank(&self, mut repos: Vec<Repository>, tier: Tier) -> Vec<Repository> {
        for repo in &mut repos {
            repo.composite_score = self.composite_score(repo, tier);
        }
        repos.sort_by(|a, b| b.composite_score.total_cmp(&a.composite_score));
        for (position, repo) in (1u32..).zip(repos.iter_mut()) {
            repo.rank_in_tier = Some(position);
        }
        repos
    }

    /// [`Ranker::rank`] by tier name; an unknown name is an error.
    pub fn rank_tier(&self, repos: Vec<Repository>, tier_name: &str) -> Result<Vec<Repository>> {
        let tier: Tier = tier_name.parse()?;
        Ok(self.rank(repos, tier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Platform;

    fn repo(name: &str, stars: u32, recent_commits: u32) -> Repository {
        let mut repo = Repository::new(
            Platform::Github,
            "kodi",
            name,
            format!("https://github.com/kodi/{name}"),
        );
        repo.stars = stars;
        repo.recent_commits_count = recent_commits;
        repo
    }

    #[test]
    fn test_ranks_are_contiguous_and_descending() {
        let ranker = Ranker::new(&LeaderboardConfig::default()).unwrap();
        let repos = vec![
            repo("a", 30, 2),
            repo("b", 9_000, 80),
            repo("c", 400, 12),
            repo("d", 25, 0),
            repo("e", 1_500, 40),
        ];

        let ranked = ranker.rank(repos, Tier::Established);

        let ranks: Vec<u32> = ranked.iter().filter_map(|r| r.rank_in_tier).collect();
        assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].composite_score >= w[1].composite_score));
        assert_eq!(ranked[0].name, "b");
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let ranker = Ranker::new(&LeaderboardConfig::default()).unwrap();
        let ranked = ranker.rank(
            vec![repo("first", 100, 5), repo("second", 100, 5), repo("third", 100, 5)],
            Tier::New,
        );
        let names: Vec<_> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_tier() {
        let ranker = Ranker::new(&LeaderboardConfig::default()).unwrap();
        assert!(ranker.rank(Vec::new(), Tier::Rising).is_empty());
    }

    #[test]
    fn test_unknown_tier_name_fails() {
        let ranker = Ranker::new(&LeaderboardConfig::default()).unwrap();
        let err = ranker.rank_tier(vec![repo("a", 50, 1)], "legendary").unwrap_err();
        assert!(matches!(err, LeaderboardError::UnknownTier(_)));
        assert_eq!(err.to_string(), "unknown tier `legendary`");
    }

    #[test]
    fn test_rank_tier_by_name() {
        let ranker = Ranker::new(&LeaderboardConfig::default()).unwrap();
        let ranked = ranker
            .rank_tier(vec![repo("a", 50, 1), repo("b", 500, 1)], "rising")
            .unwrap();
        assert_eq!(ranked[0].name, "b");
    }

    #[test]
    fn test_unknown_factor_in_weight_table() {
        let mut config = LeaderboardConfig::default();
        config.weights.new.insert("downloads".into(), 0.1);
        assert!(matches!(
            Ranker::new(&config),
            Err(LeaderboardError::UnknownFactor { tier: Tier::New, .. })
        ));
    }

    #[test]
    fn test_only_tabled_factors_contribute() {
        let ranker = Ranker::new(&LeaderboardConfig::default()).unwrap();
        let mut fast = repo("fast", 0, 0);
        fast.star_velocity_30d = 100.0;

        assert!((ranker.composite_score(&fast, Tier::Rising) - 0.4 * 0.6).abs() < 1e-12);
        assert_eq!(ranker.composite_score(&fast, Tier::New), 0.0);
        assert_eq!(ranker.composite_score(&fast, Tier::Established), 0.0);
    }

    #[test]
    fn test_breakdown_sums_to_composite() {
        let ranker = Ranker::new(&LeaderboardConfig::default()).unwrap();
        let mut r = repo("mixed", 700, 30);
        r.reddit_mentions = 5;
        r.web_mentions = 1;
        r.star_velocity_30d = 12.0;

        let breakdown = ranker.breakdown(&r, Tier::Rising);
        assert_eq!(breakdown.len(), 4);
        let total: f64 = breakdown.iter().map(|(_, s)| s).sum();
        assert!((total - ranker.composite_score(&r, Tier::Rising)).abs() < 1e-12);
    }

    #[test]
    fn test_factors_follow_pass_order() {
        let ranker = Ranker::new(&LeaderboardConfig::default()).unwrap();
        let r = repo("ordered", 120, 4);
        for (tier, expected) in [
            (Tier::Rising, vec!["stars", "recent_activity", "social_signals", "growth_rate"]),
            (Tier::Established, vec!["stars", "recent_activity", "social_signals"]),
            (Tier::New, vec!["stars", "recent_activity", "social_signals"]),
        ] {
            let names: Vec<_> = ranker.breakdown(&r, tier).into_iter().map(|(n, _)| n).collect();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn test_substituted_weights() {
        let mut config = LeaderboardConfig::default();
        config.weights.established.clear();
        config.weights.established.insert("recent_activity".into(), 1.0);
        let ranker = Ranker::new(&config).unwrap();

        let ranked = ranker.rank(
            vec![repo("popular", 9_000, 2), repo("busy", 30, 90)],
            Tier::Established,
        );
        assert_eq!(ranked[0].name, "busy");
    }
}
