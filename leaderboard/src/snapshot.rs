//! Loads one run's collector output from disk.
//!
//! Collectors drop one JSON file per source into the input directory:
//! `github.json`, `gitlab.json` and `bitbucket.json` hold arrays of
//! repository records, `reddit.json` and `web_mentions.json` hold objects
//! keyed by `repo_url`. A dated variant such as `github_2025-01-03.json` is
//! preferred when present. A missing file is an empty input.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use model::{Platform, RedditSignals, Repository, SignalMap, SocialSignals, WebSignals};

/// Everything one run consumes.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub platforms: Vec<(Platform, Vec<Repository>)>,
    pub signals: SocialSignals,
}

impl Snapshot {
    pub fn platform(&self, platform: Platform) -> &[Repository] {
        self.platforms
            .iter()
            .find(|(p, _)| *p == platform)
            .map(|(_, repos)| repos.as_slice())
            .unwrap_or_default()
    }

    pub fn record_count(&self) -> usize {
        self.platforms.iter().map(|(_, repos)| repos.len()).sum()
    }

    pub fn load(dir: &Path, run_date: NaiveDate) -> Result<Self> {
        let mut platforms = Vec::new();
        for platform in Platform::ALL {
            let repos = match source_file(dir, platform.as_str(), run_date) {
                Some(path) => load_repositories(&path, platform, run_date)?,
                None => {
                    debug!("No {} input in {}", platform, dir.display());
                    Vec::new()
                }
            };
            platforms.push((platform, repos));
        }

        let reddit: SignalMap<RedditSignals> = load_signals(dir, "reddit", run_date)?;
        let web: SignalMap<WebSignals> = load_signals(dir, "web_mentions", run_date)?;

        Ok(Self {
            platforms,
            signals: SocialSignals { reddit, web },
        })
    }
}

fn source_file(dir: &Path, source: &str, run_date: NaiveDate) -> Option<PathBuf> {
    let dated = dir.join(format!("{source}_{}.json", run_date.format("%Y-%m-%d")));
    let plain = dir.join(format!("{source}.json"));
    [dated, plain].into_iter().find(|p| p.is_file())
}

fn read_json(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Decodes records one at a time so a malformed entry only costs itself.
pub fn load_repositories(
    path: &Path,
    platform: Platform,
    run_date: NaiveDate,
) -> Result<Vec<Repository>> {
    let Value::Array(items) = read_json(path)? else {
        anyhow::bail!("{} does not hold a list of repositories", path.display());
    };

    let total = items.len();
    let mut repos = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        match parse_record(item, platform) {
            Ok(mut repo) => {
                repo.refresh_derived(run_date);
                repos.push(repo);
            }
            Err(e) => warn!(
                "Skipping record {} in {}: {}",
                index,
                path.display(),
                e
            ),
        }
    }

    info!(
        "Loaded {}/{} {} repositories from {}",
        repos.len(),
        total,
        platform,
        path.display()
    );
    Ok(repos)
}

fn parse_record(mut item: Value, platform: Platform) -> serde_json::Result<Repository> {
    // the file decides the platform, whatever the record claims
    if let Value::Object(fields) = &mut item {
        fields.insert("platform".to_owned(), Value::from(platform.as_str()));
    }
    serde_json::from_value(item)
}

fn load_signals<T>(dir: &Path, source: &str, run_date: NaiveDate) -> Result<SignalMap<T>>
where
    T: DeserializeOwned + model::SignalSource,
{
    let Some(path) = source_file(dir, source, run_date) else {
        debug!("No {} input in {}", source, dir.display());
        return Ok(SignalMap::new());
    };
    let Value::Object(entries) = read_json(&path)? else {
        anyhow::bail!("{} does not hold an object keyed by repo_url", path.display());
    };

    let mut map = SignalMap::new();
    for (url, value) in entries {
        match serde_json::from_value::<T>(value) {
            Ok(signals) => map.insert(url, signals),
            Err(e) => warn!("Skipping {} signals for {}: {}", source, url, e),
        }
    }
    info!("Loaded {} signals for {} repositories", source, map.len());
    Ok(map)
}
