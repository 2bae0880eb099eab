use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer};

/// Whole days from `created` to `today`, clamped at zero for dates in the future.
pub fn age_days(created: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - created).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

/// Human readable distance such as "3d ago", "2w ago" or "5mo ago".
pub fn format_time_ago(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days();
    match days {
        d if d <= 0 => "Today".to_owned(),
        1 => "1d ago".to_owned(),
        d if d < 7 => format!("{d}d ago"),
        d if d < 30 => format!("{}w ago", d / 7),
        d if d < 365 => format!("{}mo ago", d / 30),
        d => format!("{}y ago", d / 365),
    }
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp. Anything else is `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// `#[serde(with = "model::date::optional")]` for collector dates.
///
/// Collectors emit an empty string or `null` when a date is unknown, and some
/// platforms hand back full timestamps instead of calendar dates. Unparseable
/// values decode as `None` rather than failing the whole record.
pub mod optional {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_age_days() {
        assert_eq!(age_days(day("2024-01-01"), day("2024-03-31")), 90);
        assert_eq!(age_days(day("2024-01-01"), day("2024-01-01")), 0);
        // created in the future
        assert_eq!(age_days(day("2024-02-01"), day("2024-01-01")), 0);
    }

    #[test]
    fn test_format_time_ago() {
        let today = day("2024-06-30");
        assert_eq!(format_time_ago(today, today), "Today");
        assert_eq!(format_time_ago(day("2024-06-29"), today), "1d ago");
        assert_eq!(format_time_ago(day("2024-06-25"), today), "5d ago");
        assert_eq!(format_time_ago(day("2024-06-16"), today), "2w ago");
        assert_eq!(format_time_ago(day("2024-04-01"), today), "3mo ago");
        assert_eq!(format_time_ago(day("2022-06-01"), today), "2y ago");
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2023-05-17"), Some(day("2023-05-17")));
        assert_eq!(
            parse_date("2023-05-17T08:30:00Z"),
            Some(day("2023-05-17"))
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("last tuesday"), None);
    }
}
