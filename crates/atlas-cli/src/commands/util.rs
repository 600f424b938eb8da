//! Shared utilities for CLI commands.

use std::sync::LazyLock;

use anyhow::Context;
use atlas_core::date::{DAY_FORMAT, previous_day};
use chrono::{Days, NaiveDate};
use regex::Regex;

/// Pre-compiled regex for relative day parsing.
static RELATIVE_DAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(day|week)s?\s+ago$").unwrap());

/// Conservative bound for relative days (~1000 years).
const MAX_RELATIVE_DAYS: u64 = 1000 * 365;

/// Parse a calendar day relative to `today`.
///
/// Supports:
/// - ISO dates: "2026-01-15"
/// - Keywords: "today", "yesterday"
/// - Relative: "3 days ago", "1 week ago"
pub fn parse_day(s: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    match s.to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => return previous_day(today).context("no day before today"),
        _ => {}
    }

    if let Ok(day) = NaiveDate::parse_from_str(s, DAY_FORMAT) {
        return Ok(day);
    }

    let Some(caps) = RELATIVE_DAY_RE.captures(s) else {
        anyhow::bail!(
            "Invalid date: {s}. Use YYYY-MM-DD (e.g., 2026-01-15), 'today', 'yesterday' or relative (e.g., '3 days ago')"
        );
    };

    let n: u64 = caps[1]
        .parse()
        .context("failed to parse number in relative date")?;
    let days = match &caps[2] {
        "day" => n,
        "week" => n.saturating_mul(7),
        unit => anyhow::bail!("Unknown date unit: {unit}"),
    };
    if days > MAX_RELATIVE_DAYS {
        anyhow::bail!("Relative date too far back: {s}");
    }

    today
        .checked_sub_days(Days::new(days))
        .with_context(|| format!("date out of range: {s}"))
}

/// Renders a share in \[0, 1\] as a fixed-width bar.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    reason = "share is clamped to [0, 1] before scaling"
)]
pub fn bar(share: f64, width: usize) -> String {
    let share = if share.is_nan() { 0.0 } else { share.clamp(0.0, 1.0) };
    let filled = ((share * width as f64).round() as usize).min(width);
    format!("{}{}", "#".repeat(filled), ".".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn parses_keywords() {
        assert_eq!(parse_day("today", today()).unwrap(), today());
        assert_eq!(
            parse_day("Yesterday", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
        );
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            parse_day("2025-12-31", today()).unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
        );
    }

    #[test]
    fn parses_relative_days_and_weeks() {
        assert_eq!(
            parse_day("3 days ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 7).unwrap()
        );
        assert_eq!(
            parse_day("1 week ago", today()).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 3).unwrap()
        );
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_day("next tuesday", today()).unwrap_err();
        assert!(err.to_string().contains("Invalid date"));
        assert!(parse_day("999999999 weeks ago", today()).is_err());
    }

    #[test]
    fn bar_scales_to_width() {
        assert_eq!(bar(0.0, 4), "....");
        assert_eq!(bar(0.5, 4), "##..");
        assert_eq!(bar(1.0, 4), "####");
        assert_eq!(bar(7.0, 4), "####");
    }
}
