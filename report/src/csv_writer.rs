use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{ReportError, Result};
use model::{Repository, Tier};

/// One CSV line. Column order is the published snapshot schema.
#[derive(Debug, Serialize)]
struct SnapshotRow<'a> {
    repo_url: &'a str,
    platform: &'static str,
    name: &'a str,
    owner: &'a str,
    stars: u32,
    forks: u32,
    last_commit_date: String,
    created_date: String,
    age_days: u32,
    issues_count: u32,
    has_recent_activity: bool,
    reddit_mentions: u32,
    reddit_upvotes: u32,
    web_mentions: u32,
    tier: &'static str,
    rank_in_tier: u32,
    star_velocity_30d: f64,
    snapshot_date: String,
}

fn iso(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

impl<'a> SnapshotRow<'a> {
    fn new(repo: &'a Repository, snapshot_date: NaiveDate) -> Self {
        Self {
            repo_url: &repo.repo_url,
            platform: repo.platform.as_str(),
            name: &repo.name,
            owner: &repo.owner,
            stars: repo.stars,
            forks: repo.forks,
            last_commit_date: iso(repo.last_commit_date),
            created_date: iso(repo.created_date),
            age_days: repo.age_days,
            issues_count: repo.open_issues,
            has_recent_activity: repo.has_recent_activity,
            reddit_mentions: repo.reddit_mentions,
            reddit_upvotes: repo.reddit_upvotes,
            web_mentions: repo.web_mentions,
            tier: repo.tier.map(|t| t.as_str()).unwrap_or_default(),
            rank_in_tier: repo.rank_in_tier.unwrap_or_default(),
            star_velocity_30d: repo.star_velocity_30d,
            snapshot_date: snapshot_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Writes a header plus one row per repository.
pub fn write_rows<'a, W, I>(writer: W, repos: I, snapshot_date: NaiveDate) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Repository>,
{
    let mut out = csv::Writer::from_writer(writer);
    let mut wrote_any = false;
    for repo in repos {
        out.serialize(SnapshotRow::new(repo, snapshot_date))?;
        wrote_any = true;
    }
    if !wrote_any {
        // serde-driven headers only appear with the first record
        out.write_record(HEADER)?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

const HEADER: [&str; 18] = [
    "repo_url",
    "platform",
    "name",
    "owner",
    "stars",
    "forks",
    "last_commit_date",
    "created_date",
    "age_days",
    "issues_count",
    "has_recent_activity",
    "reddit_mentions",
    "reddit_upvotes",
    "web_mentions",
    "tier",
    "rank_in_tier",
    "star_velocity_30d",
    "snapshot_date",
];

fn write_file<'a, I>(path: &Path, repos: I, snapshot_date: NaiveDate) -> Result<()>
where
    I: IntoIterator<Item = &'a Repository>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    let file = fs::File::create(path).map_err(|e| ReportError::io(path, e))?;
    write_rows(file, repos, snapshot_date)
}

/// `<root>/data/snapshots/snapshot_<date>.csv` with every repository of the run.
pub fn write_snapshot_csv<'a, I>(
    root: &Path,
    repos: I,
    snapshot_date: NaiveDate,
) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a Repository>,
{
    let path = root
        .join("data")
        .join("snapshots")
        .join(format!("snapshot_{}.csv", snapshot_date.format("%Y-%m-%d")));
    write_file(&path, repos, snapshot_date)?;
    info!("Snapshot CSV saved: {}", path.display());
    Ok(path)
}

/// `<root>/data/current/<tier>.csv`, one file per tier.
pub fn write_tier_csvs(
    root: &Path,
    tiers: [(Tier, &[Repository]); 3],
    snapshot_date: NaiveDate,
) -> Result<Vec<PathBuf>> {
    let dir = root.join("data").join("current");
    let mut written = Vec::with_capacity(tiers.len());
    for (tier, repos) in tiers {
        let path = dir.join(format!("{tier}.csv"));
        write_file(&path, repos, snapshot_date)?;
        info!("Tier CSV saved: {} ({} repositories)", path.display(), repos.len());
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Platform;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()
    }

    fn ranked() -> Repository {
        let mut repo = Repository::new(
            Platform::Gitlab,
            "carol",
            "plugin.program.tools",
            "https://gitlab.com/carol/plugin.program.tools",
        );
        repo.stars = 250;
        repo.forks = 7;
        repo.open_issues = 3;
        repo.created_date = NaiveDate::from_ymd_opt(2023, 2, 1);
        repo.age_days = 702;
        repo.reddit_mentions = 1;
        repo.tier = Some(Tier::Established);
        repo.rank_in_tier = Some(2);
        repo
    }

    #[test]
    fn test_rows_follow_schema() {
        let repo = ranked();
        let mut out = Vec::new();
        write_rows(&mut out, [&repo], date()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next().unwrap(), HEADER.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "https://gitlab.com/carol/plugin.program.tools,gitlab,plugin.program.tools,carol,\
             250,7,,2023-02-01,702,3,false,1,0,0,established,2,0.0,2025-01-03"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_list_still_has_header() {
        let mut out = Vec::new();
        write_rows(&mut out, Vec::<&Repository>::new(), date()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim_end(), HEADER.join(","));
    }

    #[test]
    fn test_files_land_in_data_dirs() {
        let root = tempfile::tempdir().unwrap();
        let repo = ranked();
        let repos = vec![repo];
        let none: &[Repository] = &[];

        let snapshot = write_snapshot_csv(root.path(), &repos, date()).unwrap();
        assert!(snapshot.ends_with("data/snapshots/snapshot_2025-01-03.csv"));

        let written = write_tier_csvs(
            root.path(),
            [
                (Tier::Established, repos.as_slice()),
                (Tier::Rising, none),
                (Tier::New, none),
            ],
            date(),
        )
        .unwrap();
        assert_eq!(written.len(), 3);
        let established =
            fs::read_to_string(root.path().join("data/current/established.csv")).unwrap();
        assert_eq!(established.lines().count(), 2);
        let rising = fs::read_to_string(root.path().join("data/current/rising.csv")).unwrap();
        assert_eq!(rising.lines().count(), 1);
    }
}
