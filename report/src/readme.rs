//! Markdown leaderboard with one table per tier.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::{ReportError, Result};
use model::date::format_time_ago;
use model::{Repository, Tier};

const DESCRIPTION_LIMIT: usize = 100;
const GROWTH_SIGNALS_SHOWN: usize = 2;

const RISING_HEADER: [&str; 2] = [
    "| Rank | Repository | Developer | Maintainers | Stars | Last Activity | Growth Signal |",
    "|------|------------|-----------|-------------|-------|---------------|---------------|",
];
const DESCRIPTION_HEADER: [&str; 2] = [
    "| Rank | Repository | Developer | Maintainers | Stars | Last Activity | Description |",
    "|------|------------|-----------|-------------|-------|---------------|-------------|",
];
const INTRO: &str = "A weekly curated list of popular Kodi addons discovered from GitHub, \
                     GitLab, Bitbucket, Reddit, and web sources.";
const FOOTER: &str = "*This list is automatically generated every Friday. Data sources include \
                      GitHub, GitLab, Reddit (r/kodi, r/Addons4Kodi), and various RSS feeds.*";

fn heading(tier: Tier) -> &'static str {
    match tier {
        Tier::Established => "## 🏆 Established Addons",
        Tier::Rising => "## 📈 Rising Addons",
        Tier::New => "## 🆕 New Addons",
    }
}

/// `1234567` -> `1,234,567`
fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn truncate_description(description: &str) -> String {
    if description.chars().count() > DESCRIPTION_LIMIT {
        let head: String = description.chars().take(DESCRIPTION_LIMIT - 3).collect();
        format!("{head}...")
    } else {
        description.to_owned()
    }
}

fn growth_summary(repo: &Repository) -> String {
    let mut signals = Vec::new();
    if repo.star_velocity_30d > 0.0 {
        // always with a fractional part: `+14.0`, `+12.5`
        signals.push(format!("+{:?} stars (30d)", repo.star_velocity_30d));
    }
    if repo.recent_mentions_30d > 0 {
        signals.push(format!("{} Reddit mentions", repo.recent_mentions_30d));
    }
    if repo.web_mentions > 0 {
        signals.push(format!("{} web mentions", repo.web_mentions));
    }
    if signals.is_empty() {
        return "Active development".to_owned();
    }
    signals.truncate(GROWTH_SIGNALS_SHOWN);
    signals.join(", ")
}

fn table_row(repo: &Repository, tier: Tier, today: NaiveDate) -> String {
    let maintainers = if repo.contributors.is_empty() {
        repo.owner.clone()
    } else {
        repo.contributors.join(", ")
    };
    let last_activity = repo
        .last_active()
        .map(|d| format_time_ago(d, today))
        .unwrap_or_else(|| "Unknown".to_owned());
    let last_col = match tier {
        Tier::Rising => growth_summary(repo),
        _ if repo.description.is_empty() => "No description".to_owned(),
        _ => truncate_description(&repo.description),
    };

    format!(
        "| #{} | [{}]({}) | {} | {} | ⭐ {} | {} | {} |",
        repo.rank_in_tier.unwrap_or_default(),
        repo.name,
        repo.repo_url,
        repo.owner,
        escape_cell(&maintainers),
        group_thousands(repo.stars),
        last_activity,
        escape_cell(&last_col),
    )
}

fn tier_table(repos: &[Repository], tier: Tier, today: NaiveDate) -> Vec<String> {
    let mut lines = Vec::with_capacity(repos.len() + 2);
    let header = if tier == Tier::Rising {
        RISING_HEADER
    } else {
        DESCRIPTION_HEADER
    };
    lines.extend(header.map(str::to_owned));
    lines.extend(repos.iter().map(|repo| table_row(repo, tier, today)));
    lines
}

pub fn render_readme(tiers: [(Tier, &[Repository]); 3], today: NaiveDate) -> String {
    let mut lines = vec![
        "# Popular Kodi Addons".to_owned(),
        format!("*Last updated: {}*", today.format("%Y-%m-%d")),
        String::new(),
        INTRO.to_owned(),
        String::new(),
        "📊 [View Historical Data](./data/)".to_owned(),
        String::new(),
    ];

    for (tier, repos) in tiers {
        lines.push(heading(tier).to_owned());
        lines.push(String::new());
        if repos.is_empty() {
            lines.push(format!("*No {tier} addons found this week.*"));
        } else {
            lines.extend(tier_table(repos, tier, today));
        }
        lines.push(String::new());
    }

    lines.push("---".to_owned());
    lines.push(String::new());
    lines.push(FOOTER.to_owned());
    lines.push(String::new());
    lines.join("\n")
}

pub fn write_readme(
    path: &Path,
    tiers: [(Tier, &[Repository]); 3],
    today: NaiveDate,
) -> Result<()> {
    fs::write(path, render_readme(tiers, today)).map_err(|e| ReportError::io(path, e))?;
    info!("README generated: {}", path.display());
    Ok(())
}
