use anyhow::{Result, bail};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use std::process;

use mise_core::WEEK_DAYS;

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

/// Report a missing record and exit with status 2.
pub(crate) fn exit_not_found(message: &str, json: bool) -> ! {
    if json {
        println!("{}", json_error(message));
    } else {
        eprintln!("{message}");
    }
    process::exit(2);
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

/// ISO week label such as `2024-W07`.
pub(crate) fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

pub(crate) fn resolve_week(week: Option<String>) -> String {
    week.map_or_else(|| week_label(Local::now().date_naive()), |w| w.trim().to_string())
}

/// Accept `mon`, `Monday`, `MON` and so on; return the stored three-letter form.
pub(crate) fn parse_day(day: &str) -> Result<String> {
    let lower = day.trim().to_lowercase();
    let found = WEEK_DAYS.iter().find(|d| {
        let short = d.to_lowercase();
        lower == short || (lower.len() > 3 && lower.starts_with(&short) && lower.ends_with("day"))
    });
    match found {
        Some(d) => Ok((*d).to_string()),
        None => bail!("Invalid day: {day}. Use mon-sun or monday-sunday"),
    }
}

/// Position of a day within the week, for sorting. Unknown days sort last.
pub(crate) fn day_index(day: &str) -> usize {
    WEEK_DAYS
        .iter()
        .position(|d| d.eq_ignore_ascii_case(day.trim()))
        .unwrap_or(WEEK_DAYS.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_escapes() {
        assert_eq!(json_error("Recipe 3 not found"), r#"{"error":"Recipe 3 not found"}"#);
        assert_eq!(json_error("say \"hi\""), r#"{"error":"say \"hi\""}"#);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Crème fraîche", 10), "Crème f...");
        assert_eq!(truncate("日清カップヌードル", 8), "日清カップ...");
    }

    #[test]
    fn test_week_label() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(week_label(d(2024, 2, 14)), "2024-W07");
        // ISO years differ from calendar years at the edges.
        assert_eq!(week_label(d(2024, 12, 30)), "2025-W01");
        assert_eq!(week_label(d(2021, 1, 3)), "2020-W53");
    }

    #[test]
    fn test_resolve_week() {
        assert_eq!(resolve_week(Some(" W43 ".to_string())), "W43");
        assert_eq!(resolve_week(None), week_label(Local::now().date_naive()));
    }

    #[test]
    fn test_parse_day() {
        assert_eq!(parse_day("mon").unwrap(), "Mon");
        assert_eq!(parse_day("Wednesday").unwrap(), "Wed");
        assert_eq!(parse_day(" SUN ").unwrap(), "Sun");
        assert!(parse_day("funday").is_err());
        assert!(parse_day("").is_err());
    }

    #[test]
    fn test_day_index() {
        assert_eq!(day_index("Mon"), 0);
        assert_eq!(day_index("sun"), 6);
        assert_eq!(day_index("?"), 7);
    }
}
