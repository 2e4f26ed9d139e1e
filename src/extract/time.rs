use std::sync::LazyLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

static HOURS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*hour").expect("HOURS should compile"));
static DAYS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*day").expect("DAYS should compile"));
static WEEKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*week").expect("WEEKS should compile"));

/// Turn "3 hours ago" / "2 days ago" / "1 week ago" into an absolute time.
///
/// Best effort: anything that is not one of those shapes returns `now`
/// unchanged, so a returned `now` does not prove the text was understood.
pub fn parse_relative_timestamp(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    if !text.contains("ago") {
        return now;
    }

    let offset = if text.contains("hour") {
        leading_quantity(&HOURS, text).and_then(Duration::try_hours)
    } else if text.contains("day") {
        leading_quantity(&DAYS, text).and_then(Duration::try_days)
    } else if text.contains("week") {
        leading_quantity(&WEEKS, text)
            .and_then(|weeks| weeks.checked_mul(7))
            .and_then(Duration::try_days)
    } else {
        None
    };

    offset
        .and_then(|offset| now.checked_sub_signed(offset))
        .unwrap_or(now)
}

fn leading_quantity(pattern: &Regex, text: &str) -> Option<i64> {
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Machine-readable `datetime` attribute, when the site provides one.
pub fn parse_absolute_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_hours_ago() {
        assert_eq!(
            parse_relative_timestamp("3 hours ago", now()),
            now() - Duration::hours(3)
        );
        assert_eq!(
            parse_relative_timestamp("1 hour ago", now()),
            now() - Duration::hours(1)
        );
    }

    #[test]
    fn test_days_ago() {
        assert_eq!(
            parse_relative_timestamp("2 days ago", now()),
            now() - Duration::hours(48)
        );
    }

    #[test]
    fn test_weeks_ago() {
        assert_eq!(
            parse_relative_timestamp("1 week ago", now()),
            now() - Duration::days(7)
        );
        assert_eq!(
            parse_relative_timestamp("3 weeks ago", now()),
            now() - Duration::days(21)
        );
    }

    #[test]
    fn test_unrecognized_returns_now() {
        assert_eq!(parse_relative_timestamp("yesterday", now()), now());
        assert_eq!(parse_relative_timestamp("3 hours", now()), now());
        assert_eq!(parse_relative_timestamp("a month ago", now()), now());
        assert_eq!(parse_relative_timestamp("some hours ago", now()), now());
        assert_eq!(parse_relative_timestamp("", now()), now());
    }

    #[test]
    fn test_huge_quantity_returns_now() {
        assert_eq!(
            parse_relative_timestamp("99999999999999999 weeks ago", now()),
            now()
        );
    }

    #[test]
    fn test_absolute_timestamp() {
        let parsed = parse_absolute_timestamp("2024-03-01T10:30:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap());
        assert!(parse_absolute_timestamp("3 hours ago").is_none());
    }
}
