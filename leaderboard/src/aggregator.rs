//! Merges per-platform repository lists into one deduplicated set and attaches
//! social signals.
//!
//! The same project is often mirrored on several platforms. Records are
//! grouped by [`DedupKey`] and only the copy with the most stars survives;
//! when star counts tie, the copy seen first wins. Losing copies are dropped
//! whole, nothing is merged field by field.

use model::{DedupKey, Platform, Repository, SocialSignals};
use std::collections::HashMap;

/// How one duplicated key was resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateResolution {
    pub key: DedupKey,
    pub kept_platform: Platform,
    pub kept_url: String,
    pub kept_stars: u32,
    /// Number of copies dropped in favour of the kept one.
    pub dropped: usize,
}

/// Aggregated repositories plus the duplicate resolutions behind them.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub repositories: Vec<Repository>,
    pub duplicates: Vec<DuplicateResolution>,
    /// Record count across all platform lists before deduplication.
    pub input_count: usize,
}

pub fn aggregate<I>(platform_lists: I, signals: &SocialSignals) -> Vec<Repository>
where
    I: IntoIterator<Item = Vec<Repository>>,
{
    aggregate_with_report(platform_lists, signals).repositories
}

pub fn aggregate_with_report<I>(platform_lists: I, signals: &SocialSignals) -> Aggregation
where
    I: IntoIterator<Item = Vec<Repository>>,
{
    let mut aggregation = deduplicate(platform_lists.into_iter().flatten());
    for repo in &mut aggregation.repositories {
        signals.apply_to(repo);
    }
    aggregation
}

/// Keeps one record per [`DedupKey`], in first-seen key order.
pub fn deduplicate(repos: impl IntoIterator<Item = Repository>) -> Aggregation {
    let mut slots: HashMap<DedupKey, usize> = HashMap::new();
    let mut kept: Vec<Repository> = Vec::new();
    let mut dropped: Vec<usize> = Vec::new();
    let mut input_count = 0;

    for repo in repos {
        input_count += 1;
        let key = repo.dedup_key();
        match slots.get(&key) {
            Some(&slot) => {
                dropped[slot] += 1;
                // strictly greater: on a tie the earlier record stays
                if repo.stars > kept[slot].stars {
                    kept[slot] = repo;
                }
            }
            None => {
                slots.insert(key, kept.len());
                kept.push(repo);
                dropped.push(0);
            }
        }
    }

    let duplicates = kept
        .iter()
        .zip(&dropped)
        .filter(|(_, dropped)| **dropped > 0)
        .map(|(repo, dropped)| DuplicateResolution {
            key: repo.dedup_key(),
            kept_platform: repo.platform,
            kept_url: repo.repo_url.clone(),
            kept_stars: repo.stars,
            dropped: *dropped,
        })
        .collect();

    Aggregation {
        repositories: kept,
        duplicates,
        input_count,
    }
}
