use crate::aggregator::aggregate_with_report;
use crate::classifier::{Classifier, Leaderboard};
use crate::config::LeaderboardConfig;
use crate::error::Result;
use crate::ranker::Ranker;
use crate::snapshot::Snapshot;
use chrono::NaiveDate;
use model::{DedupKey, Repository, Tier};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Output of one run: the ranked tiers plus the flat deduplicated list in
/// first-seen order, each record carrying its tier, score and rank.
#[derive(Debug, Clone, Default)]
pub struct LeaderboardRun {
    pub aggregated: Vec<Repository>,
    pub board: Leaderboard,
}

impl LeaderboardRun {
    /// Writes the snapshot CSV, the tier CSVs and `README.md` under `root`.
    /// A run with nothing aggregated only gets the README, with every tier
    /// shown as empty.
    pub fn write_reports(&self, root: &Path, run_date: NaiveDate) -> report::Result<Vec<PathBuf>> {
        let tiers = Tier::ALL.map(|tier| (tier, self.board.tier(tier)));
        let readme = root.join("README.md");
        if self.aggregated.is_empty() {
            info!("No repositories aggregated, writing an empty README only");
            report::write_readme(&readme, tiers, run_date)?;
            return Ok(vec![readme]);
        }

        let mut written = vec![report::write_snapshot_csv(root, &self.aggregated, run_date)?];
        written.extend(report::write_tier_csvs(root, tiers, run_date)?);
        report::write_readme(&readme, tiers, run_date)?;
        written.push(readme);
        Ok(written)
    }
}

/// Runs one snapshot through aggregation, classification and ranking, and
/// logs what happened along the way.
pub struct LeaderboardManager {
    classifier: Classifier,
    ranker: Ranker,
}

impl LeaderboardManager {
    pub fn new(config: &LeaderboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            classifier: Classifier::new(config),
            ranker: Ranker::new(config)?,
        })
    }

    pub fn run(&self, snapshot: Snapshot) -> LeaderboardRun {
        for (platform, repos) in &snapshot.platforms {
            info!("{} collection: {} repositories", platform, repos.len());
        }

        let platform_lists = snapshot.platforms.into_iter().map(|(_, repos)| repos);
        let aggregation = aggregate_with_report(platform_lists, &snapshot.signals);
        info!(
            "Combined {} repositories from all platforms, {} unique after deduplication",
            aggregation.input_count,
            aggregation.repositories.len()
        );
        for duplicate in &aggregation.duplicates {
            info!(
                "Deduplicating {}: keeping {} version with {} stars ({} dropped)",
                duplicate.key, duplicate.kept_platform, duplicate.kept_stars, duplicate.dropped
            );
        }

        let order: Vec<DedupKey> = aggregation
            .repositories
            .iter()
            .map(Repository::dedup_key)
            .collect();
        let board = self
            .classifier
            .classify_and_rank(aggregation.repositories, &self.ranker);
        info!(
            "Classification complete: {} established, {} rising, {} new",
            board.established.len(),
            board.rising.len(),
            board.new.len()
        );

        for tier in Tier::ALL {
            for repo in board.tier(tier) {
                let breakdown = self.ranker.breakdown(repo, tier);
                debug!(
                    "{} #{} {}/{} score={:.4} {:?}",
                    tier,
                    repo.rank_in_tier.unwrap_or_default(),
                    repo.owner,
                    repo.name,
                    repo.composite_score,
                    breakdown,
                );
            }
        }

        let with_reddit = board.iter().filter(|r| r.reddit_mentions > 0).count();
        let with_web = board.iter().filter(|r| r.web_mentions > 0).count();
        info!("Repositories with Reddit mentions: {}", with_reddit);
        info!("Repositories with web mentions: {}", with_web);

        let ranked: HashMap<DedupKey, &Repository> =
            board.iter().map(|repo| (repo.dedup_key(), repo)).collect();
        let aggregated = order
            .iter()
            .filter_map(|key| ranked.get(key).map(|repo| (*repo).clone()))
            .collect();
        LeaderboardRun { aggregated, board }
    }
}
