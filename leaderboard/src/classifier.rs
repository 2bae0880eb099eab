use crate::config::{GrowthThresholds, LeaderboardConfig, TierThresholds};
use crate::ranker::Ranker;
use model::{Repository, Tier};

/// Ranked repositories, one list per tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Leaderboard {
    pub established: Vec<Repository>,
    pub rising: Vec<Repository>,
    pub new: Vec<Repository>,
}

impl Leaderboard {
    pub fn tier(&self, tier: Tier) -> &[Repository] {
        match tier {
            Tier::Established => &self.established,
            Tier::Rising => &self.rising,
            Tier::New => &self.new,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut Vec<Repository> {
        match tier {
            Tier::Established => &mut self.established,
            Tier::Rising => &mut self.rising,
            Tier::New => &mut self.new,
        }
    }

    pub fn len(&self) -> usize {
        self.established.len() + self.rising.len() + self.new.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every repository, tier by tier in [`Tier::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = &Repository> {
        Tier::ALL.into_iter().flat_map(move |tier| self.tier(tier).iter())
    }
}

/// Assigns each repository to a tier from its age and growth signals.
///
/// Classification is stateless: every run decides from the record alone, so
/// a project moves between tiers as soon as its numbers do.
pub struct Classifier {
    tiers: TierThresholds,
    growth: GrowthThresholds,
}

impl Classifier {
    pub fn new(config: &LeaderboardConfig) -> Self {
        Self {
            tiers: config.tiers.clone(),
            growth: config.growth.clone(),
        }
    }

    /// Any one of these is enough to count as growing.
    pub fn has_growth_signals(&self, repo: &Repository) -> bool {
        repo.star_velocity_30d > self.growth.star_velocity_per_month
            || repo.recent_mentions_30d > 0
            || repo.web_mentions > 0
            || repo.recent_commits_count > self.growth.recent_commits
    }

    pub fn classify(&self, repo: &Repository) -> Tier {
        if repo.age_days < self.tiers.new_max_age_days {
            Tier::New
        } else if repo.age_days < self.tiers.rising_max_age_days {
            // past the new window but not growing: treated as settled, there
            // is no separate stagnant tier
            if self.has_growth_signals(repo) {
                Tier::Rising
            } else {
                Tier::Established
            }
        } else {
            Tier::Established
        }
    }

    /// Tags every repository with its tier and buckets it, keeping input order
    /// inside each bucket. Nothing is ranked yet.
    pub fn partition(&self, repos: Vec<Repository>) -> Leaderboard {
        let mut board = Leaderboard::default();
        for mut repo in repos {
            let tier = self.classify(&repo);
            repo.tier = Some(tier);
            board.tier_mut(tier).push(repo);
        }
        board
    }

    pub fn classify_and_rank(&self, repos: Vec<Repository>, ranker: &Ranker) -> Leaderboard {
        let board = self.partition(repos);
        Leaderboard {
            established: ranker.rank(board.established, Tier::Established),
            rising: ranker.rank(board.rising, Tier::Rising),
            new: ranker.rank(board.new, Tier::New),
        }
    }
}
