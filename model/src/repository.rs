use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::date;

/// Maximum number of contributors kept per repository.
pub const MAX_CONTRIBUTORS: usize = 3;

/// Source platform a repository record was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Github,
    Gitlab,
    Bitbucket,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Github, Platform::Gitlab, Platform::Bitbucket];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Gitlab => "gitlab",
            Platform::Bitbucket => "bitbucket",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leaderboard bucket. Every repository lands in exactly one tier per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Established,
    Rising,
    New,
}

impl Tier {
    /// Output order of the leaderboard sections.
    pub const ALL: [Tier; 3] = [Tier::Established, Tier::Rising, Tier::New];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Established => "established",
            Tier::Rising => "rising",
            Tier::New => "new",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tier `{0}`")]
pub struct ParseTierError(pub String);

impl FromStr for Tier {
    type Err = ParseTierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "established" => Ok(Tier::Established),
            "rising" => Ok(Tier::Rising),
            "new" => Ok(Tier::New),
            other => Err(ParseTierError(other.to_owned())),
        }
    }
}

/// Identity of a project across platforms: lowercase `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DedupKey(String);

impl DedupKey {
    pub fn new(owner: &str, name: &str) -> Self {
        Self(format!("{}/{}", owner.to_lowercase(), name.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One repository as handed over by a collector and enriched by the leaderboard.
///
/// `repo_url`, `platform`, `owner` and `name` are required. Every other field
/// falls back to zero, `false` or empty when a collector leaves it out or
/// writes `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub repo_url: String,
    pub platform: Platform,
    pub name: String,
    pub owner: String,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub description: String,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub stars: u32,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub forks: u32,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub open_issues: u32,
    #[serde(default, with = "date::optional")]
    pub created_date: Option<NaiveDate>,
    #[serde(default, with = "date::optional")]
    pub last_commit_date: Option<NaiveDate>,
    #[serde(default, with = "date::optional")]
    pub last_activity_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub age_days: u32,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub is_archived: bool,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub is_fork: bool,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub has_recent_activity: bool,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub contributors: Vec<String>,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub recent_commits_count: u32,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub reddit_mentions: u32,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub reddit_upvotes: u32,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub recent_mentions_30d: u32,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub web_mentions: u32,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub star_velocity_30d: f64,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub composite_score: f64,
    #[serde(default)]
    pub rank_in_tier: Option<u32>,
}

impl Repository {
    pub fn new(
        platform: Platform,
        owner: impl Into<String>,
        name: impl Into<String>,
        repo_url: impl Into<String>,
    ) -> Self {
        Self {
            repo_url: repo_url.into(),
            platform,
            name: name.into(),
            owner: owner.into(),
            description: String::new(),
            stars: 0,
            forks: 0,
            open_issues: 0,
            created_date: None,
            last_commit_date: None,
            last_activity_date: None,
            age_days: 0,
            is_archived: false,
            is_fork: false,
            has_recent_activity: false,
            contributors: Vec::new(),
            recent_commits_count: 0,
            reddit_mentions: 0,
            reddit_upvotes: 0,
            recent_mentions_30d: 0,
            web_mentions: 0,
            star_velocity_30d: 0.0,
            tier: None,
            composite_score: 0.0,
            rank_in_tier: None,
        }
    }

    pub fn dedup_key(&self) -> DedupKey {
        DedupKey::new(&self.owner, &self.name)
    }

    /// Recomputes derived fields relative to `today`.
    ///
    /// `age_days` follows `created_date` when one is known, otherwise the
    /// collector-supplied value stays. Contributors beyond the first
    /// [`MAX_CONTRIBUTORS`] are dropped and a negative or non-finite star
    /// velocity reads as zero.
    pub fn refresh_derived(&mut self, today: NaiveDate) {
        if let Some(created) = self.created_date {
            self.age_days = date::age_days(created, today);
        }
        self.contributors.truncate(MAX_CONTRIBUTORS);
        if !self.star_velocity_30d.is_finite() || self.star_velocity_30d < 0.0 {
            self.star_velocity_30d = 0.0;
        }
    }

    /// Most recent activity date, falling back to the last commit.
    pub fn last_active(&self) -> Option<NaiveDate> {
        self.last_activity_date.or(self.last_commit_date)
    }
}
