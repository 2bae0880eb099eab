use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{LeaderboardError, Result};
use crate::pass::log_scale;
use model::Tier;

/// 分层年龄阈值, in days
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TierThresholds {
    /// Repositories younger than this are `new`.
    pub new_max_age_days: u32,
    /// Repositories younger than this (and not `new`) may be `rising`.
    pub rising_max_age_days: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            new_max_age_days: 90,
            rising_max_age_days: 365,
        }
    }
}

/// Thresholds a mid-age repository must exceed to count as growing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GrowthThresholds {
    pub star_velocity_per_month: f64,
    pub recent_commits: u32,
}

impl Default for GrowthThresholds {
    fn default() -> Self {
        Self {
            star_velocity_per_month: 10.0,
            recent_commits: 10,
        }
    }
}

/// Factor name to weight, one table per tier. Overrides merge into the
/// default tables key by key; a weight of 0 switches a factor off.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WeightConfig {
    pub established: BTreeMap<String, f64>,
    pub rising: BTreeMap<String, f64>,
    pub new: BTreeMap<String, f64>,
}

impl WeightConfig {
    pub fn for_tier(&self, tier: Tier) -> &BTreeMap<String, f64> {
        match tier {
            Tier::Established => &self.established,
            Tier::Rising => &self.rising,
            Tier::New => &self.new,
        }
    }
}

fn table(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            established: table(&[
                ("stars", 0.6),
                ("recent_activity", 0.2),
                ("social_signals", 0.2),
            ]),
            rising: table(&[
                ("growth_rate", 0.4),
                ("stars", 0.3),
                ("recent_activity", 0.2),
                ("social_signals", 0.1),
            ]),
            new: table(&[
                ("recent_activity", 0.5),
                ("stars", 0.3),
                ("social_signals", 0.2),
            ]),
        }
    }
}

/// Expected range of one raw metric, used for log-scale normalization.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub min: f64,
    pub max: f64,
}

impl Calibration {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        log_scale(value, self.min, self.max)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CalibrationConfig {
    pub stars: Calibration,
    pub recent_commits: Calibration,
    pub reddit_mentions: Calibration,
    pub reddit_upvotes: Calibration,
    pub web_mentions: Calibration,
    pub star_velocity: Calibration,
    pub recent_mentions: Calibration,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            stars: Calibration::new(20.0, 10_000.0),
            recent_commits: Calibration::new(1.0, 100.0),
            reddit_mentions: Calibration::new(0.0, 50.0),
            reddit_upvotes: Calibration::new(0.0, 500.0),
            web_mentions: Calibration::new(0.0, 10.0),
            star_velocity: Calibration::new(0.0, 100.0),
            recent_mentions: Calibration::new(0.0, 20.0),
        }
    }
}

/// Weights inside the `social_signals` factor.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SocialConfig {
    pub reddit_mentions: f64,
    pub reddit_upvotes: f64,
    pub web_mentions: f64,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            reddit_mentions: 0.4,
            reddit_upvotes: 0.4,
            web_mentions: 0.2,
        }
    }
}

/// Weights inside the `growth_rate` factor.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GrowthRateConfig {
    pub star_velocity: f64,
    pub recent_mentions: f64,
}

impl Default for GrowthRateConfig {
    fn default() -> Self {
        Self {
            star_velocity: 0.6,
            recent_mentions: 0.4,
        }
    }
}

/// 排行榜配置
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub tiers: TierThresholds,
    pub growth: GrowthThresholds,
    pub weights: WeightConfig,
    pub calibration: CalibrationConfig,
    pub social: SocialConfig,
    pub growth_rate: GrowthRateConfig,
}

impl LeaderboardConfig {
    /// Layers an optional TOML file and `LEADERBOARD_*` environment overrides
    /// on top of the built-in defaults.
    ///
    /// Nested keys are separated by a double underscore, for example
    /// `LEADERBOARD_TIERS__NEW_MAX_AGE_DAYS=60`.
    pub fn load_config(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        let config: LeaderboardConfig = builder
            .add_source(
                Environment::with_prefix("LEADERBOARD")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tiers.new_max_age_days > self.tiers.rising_max_age_days {
            return Err(LeaderboardError::InvalidThresholds {
                new_max_age_days: self.tiers.new_max_age_days,
                rising_max_age_days: self.tiers.rising_max_age_days,
            });
        }
        for tier in Tier::ALL {
            for (factor, weight) in self.weights.for_tier(tier) {
                if !weight.is_finite() {
                    return Err(LeaderboardError::InvalidWeight {
                        tier,
                        factor: factor.clone(),
                        weight: *weight,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_published_tables() {
        let config = LeaderboardConfig::default();
        assert_eq!(config.tiers.new_max_age_days, 90);
        assert_eq!(config.tiers.rising_max_age_days, 365);
        assert_eq!(config.weights.established["stars"], 0.6);
        assert_eq!(config.weights.rising["growth_rate"], 0.4);
        assert!(!config.weights.new.contains_key("growth_rate"));
        assert_eq!(config.calibration.stars, Calibration::new(20.0, 10_000.0));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_toml_keeps_other_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[tiers]
new_max_age_days = 30

[weights.new]
stars = 1.0

[calibration]
stars = {{ min = 0.0, max = 500.0 }}
"#
        )
        .unwrap();

        let config = LeaderboardConfig::load_config(Some(file.path())).unwrap();
        assert_eq!(config.tiers.new_max_age_days, 30);
        assert_eq!(config.tiers.rising_max_age_days, 365);
        assert_eq!(config.weights.new.len(), 3);
        assert_eq!(config.weights.new["stars"], 1.0);
        assert_eq!(config.weights.new["recent_activity"], 0.5);
        assert_eq!(config.weights.established, WeightConfig::default().established);
        assert_eq!(config.calibration.stars, Calibration::new(0.0, 500.0));
        assert_eq!(
            config.calibration.recent_commits,
            Calibration::new(1.0, 100.0)
        );
    }

    #[test]
    fn test_single_key_overrides_merge_into_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[weights.established]
stars = 0.9

[calibration.stars]
max = 5000.0
"#
        )
        .unwrap();

        let config = LeaderboardConfig::load_config(Some(file.path())).unwrap();
        let established = &config.weights.established;
        assert_eq!(established.len(), 3);
        assert_eq!(established["stars"], 0.9);
        assert_eq!(established["recent_activity"], 0.2);
        assert_eq!(established["social_signals"], 0.2);
        assert_eq!(config.calibration.stars, Calibration::new(20.0, 5000.0));
    }

    #[test]
    fn test_load_without_file_is_default() {
        let config = LeaderboardConfig::load_config(None).unwrap();
        assert_eq!(config.weights, WeightConfig::default());
        assert_eq!(config.calibration, CalibrationConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            LeaderboardConfig::load_config(Some(&missing)),
            Err(LeaderboardError::Config(_))
        ));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let mut config = LeaderboardConfig::default();
        config.tiers.new_max_age_days = 400;
        assert!(matches!(
            config.validate(),
            Err(LeaderboardError::InvalidThresholds { .. })
        ));
    }

    #[test]
    fn test_non_finite_weight_rejected() {
        let mut config = LeaderboardConfig::default();
        config.weights.rising.insert("stars".into(), f64::INFINITY);
        assert!(matches!(
            config.validate(),
            Err(LeaderboardError::InvalidWeight { tier: Tier::Rising, .. })
        ));
    }
}
