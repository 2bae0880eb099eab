//! Social signals collected outside the source platforms, keyed by `repo_url`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::repository::Repository;

/// A group of social metrics that can be stamped onto a repository record.
pub trait SignalSource: Default + Clone {
    fn apply_to(&self, repo: &mut Repository);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedditSignals {
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub reddit_mentions: u32,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub reddit_upvotes: u32,
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub recent_mentions_30d: u32,
}

impl SignalSource for RedditSignals {
    fn apply_to(&self, repo: &mut Repository) {
        repo.reddit_mentions = self.reddit_mentions;
        repo.reddit_upvotes = self.reddit_upvotes;
        repo.recent_mentions_30d = self.recent_mentions_30d;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebSignals {
    #[serde(default, deserialize_with = "crate::de::or_default")]
    pub web_mentions: u32,
}

impl SignalSource for WebSignals {
    fn apply_to(&self, repo: &mut Repository) {
        repo.web_mentions = self.web_mentions;
    }
}

/// Signals per `repo_url`. A URL without an entry reads as all-zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignalMap<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for SignalMap<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: SignalSource> SignalMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, repo_url: impl Into<String>, signals: T) {
        self.entries.insert(repo_url.into(), signals);
    }

    pub fn get(&self, repo_url: &str) -> Option<&T> {
        self.entries.get(repo_url)
    }

    pub fn get_or_default(&self, repo_url: &str) -> T {
        self.get(repo_url).cloned().unwrap_or_default()
    }

    /// Copies the entry for `repo.repo_url` onto `repo`, zeroing the fields
    /// when there is none.
    pub fn apply_to(&self, repo: &mut Repository) {
        self.get_or_default(&repo.repo_url).apply_to(repo);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T, S: Into<String>> FromIterator<(S, T)> for SignalMap<T> {
    fn from_iter<I: IntoIterator<Item = (S, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Every social map a run consumes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SocialSignals {
    pub reddit: SignalMap<RedditSignals>,
    pub web: SignalMap<WebSignals>,
}

impl SocialSignals {
    pub fn apply_to(&self, repo: &mut Repository) {
        self.reddit.apply_to(repo);
        self.web.apply_to(repo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Platform;

    #[test]
    fn test_get_or_default_for_unknown_url() {
        let map: SignalMap<RedditSignals> = SignalMap::new();
        assert_eq!(map.get_or_default("https://nowhere"), RedditSignals::default());
    }

    #[test]
    fn test_apply_overwrites_and_zeroes() {
        let url = "https://github.com/bob/script.tv.guide";
        let signals = SocialSignals {
            reddit: [(
                url,
                RedditSignals {
                    reddit_mentions: 4,
                    reddit_upvotes: 120,
                    recent_mentions_30d: 2,
                },
            )]
            .into_iter()
            .collect(),
            web: SignalMap::new(),
        };

        let mut repo = Repository::new(Platform::Github, "bob", "script.tv.guide", url);
        repo.web_mentions = 9;
        signals.apply_to(&mut repo);

        assert_eq!(repo.reddit_mentions, 4);
        assert_eq!(repo.reddit_upvotes, 120);
        assert_eq!(repo.recent_mentions_30d, 2);
        assert_eq!(repo.web_mentions, 0);
    }

    #[test]
    fn test_decodes_from_json_object() {
        let json = r#"{"https://a": {"web_mentions": 3}, "https://b": {}}"#;
        let map: SignalMap<WebSignals> = serde_json::from_str(json).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_or_default("https://a").web_mentions, 3);
        assert_eq!(map.get_or_default("https://b").web_mentions, 0);
    }

    #[test]
    fn test_null_counts_read_as_zero() {
        let json = r#"{"https://a": {"reddit_mentions": 2, "reddit_upvotes": null}}"#;
        let map: SignalMap<RedditSignals> = serde_json::from_str(json).unwrap();
        let signals = map.get_or_default("https://a");
        assert_eq!(signals.reddit_mentions, 2);
        assert_eq!(signals.reddit_upvotes, 0);
        assert_eq!(signals.recent_mentions_30d, 0);
    }
}
