//! Range tokens (`7d`, `custom:2025-08-01:2025-08-17`, ...) resolved into
//! inclusive calendar-day windows and bound SQL predicates.

use std::fmt;

use chrono::{Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::Value;
use serde::Deserialize;

use super::error::RangeError;

/// Start bound literal. No fraction: on SQLite timestamps are compared as
/// `YYYY-MM-DD HH:MM:SS` text, and `... 00:00:00` sorts before `... 00:00:00.000`.
pub const START_BOUND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// End bound literal. Millisecond precision so the end bound covers the
/// whole last second of the day.
pub const END_BOUND_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Today,
    Yesterday,
    Last7Days,
    Last30Days,
    Last3Months,
    Last6Months,
    LastYear,
    AllTime,
    Custom,
}

/// What to do with a token outside the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenPolicy {
    /// Resolve to the last 7 days and mark the window as a fallback
    #[default]
    Lenient,
    /// Reject with `InvalidRangeToken`
    Strict,
}

/// Resolved window. Both bounds are inclusive calendar days, or both absent
/// for "all time".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateWindow {
    token: String,
    kind: WindowKind,
    range: Option<(NaiveDate, NaiveDate)>,
    fallback: bool,
}

/// A WHERE fragment with its positional parameters
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlPredicate {
    pub sql: String,
    pub params: Vec<Value>,
}

impl SqlPredicate {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// `" AND <sql>"`, or nothing for an unbounded window
    pub fn and_clause(&self) -> String {
        if self.sql.is_empty() {
            String::new()
        } else {
            format!(" AND {}", self.sql)
        }
    }
}

impl DateWindow {
    /// Resolve against the server's local calendar date
    pub fn resolve(token: &str, policy: TokenPolicy) -> Result<Self, RangeError> {
        Self::resolve_at(token, Local::now().date_naive(), policy)
    }

    /// Resolve against an explicit "today". Pure.
    pub fn resolve_at(
        token: &str,
        today: NaiveDate,
        policy: TokenPolicy,
    ) -> Result<Self, RangeError> {
        let trimmed = token.trim();

        let bounded = |kind: WindowKind, start: NaiveDate, end: NaiveDate| DateWindow {
            token: trimmed.to_string(),
            kind,
            range: Some((start, end)),
            fallback: false,
        };

        let months_back = |months: u32| {
            today
                .checked_sub_months(Months::new(months))
                .ok_or_else(|| RangeError::invalid(trimmed, "date out of range"))
        };

        match trimmed {
            "today" => Ok(bounded(WindowKind::Today, today, today)),
            "yesterday" => {
                let day = today - Duration::days(1);
                Ok(bounded(WindowKind::Yesterday, day, day))
            }
            "7d" => Ok(bounded(
                WindowKind::Last7Days,
                today - Duration::days(6),
                today,
            )),
            "30d" => Ok(bounded(
                WindowKind::Last30Days,
                today - Duration::days(29),
                today,
            )),
            "3m" => Ok(bounded(WindowKind::Last3Months, months_back(3)?, today)),
            "6m" => Ok(bounded(WindowKind::Last6Months, months_back(6)?, today)),
            "1y" => Ok(bounded(WindowKind::LastYear, months_back(12)?, today)),
            "all" => Ok(DateWindow {
                token: trimmed.to_string(),
                kind: WindowKind::AllTime,
                range: None,
                fallback: false,
            }),
            custom if custom.starts_with("custom:") => {
                let (start, end) = parse_custom(custom)?;
                Ok(bounded(WindowKind::Custom, start, end))
            }
            other => match policy {
                TokenPolicy::Strict => Err(RangeError::invalid(other, "unrecognized range token")),
                TokenPolicy::Lenient => {
                    tracing::warn!(
                        "Unrecognized range token `{}`, falling back to the last 7 days",
                        other
                    );
                    Ok(DateWindow {
                        token: other.to_string(),
                        kind: WindowKind::Last7Days,
                        range: Some((today - Duration::days(6), today)),
                        fallback: true,
                    })
                }
            },
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    /// True when the token was not understood and the default window was used
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.range.map(|(start, _)| start)
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.range.map(|(_, end)| end)
    }

    /// `00:00:00.000` of the first day
    pub fn start_at(&self) -> Option<NaiveDateTime> {
        self.start().map(|d| d.and_time(NaiveTime::MIN))
    }

    /// `23:59:59.999` of the last day
    pub fn end_at(&self) -> Option<NaiveDateTime> {
        self.end().and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
    }

    /// Formatted inclusive bounds, `None` for all time
    pub fn bounds(&self) -> Option<(String, String)> {
        match (self.start_at(), self.end_at()) {
            (Some(start), Some(end)) => Some((
                start.format(START_BOUND_FORMAT).to_string(),
                end.format(END_BOUND_FORMAT).to_string(),
            )),
            _ => None,
        }
    }

    /// Number of calendar days covered
    pub fn days(&self) -> Option<i64> {
        self.range.map(|(start, end)| (end - start).num_days() + 1)
    }

    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        match (self.start_at(), self.end_at()) {
            (Some(start), Some(end)) => start <= ts && ts <= end,
            _ => true,
        }
    }

    /// `column BETWEEN ? AND ?` with both bounds bound as parameters.
    /// Empty for all time.
    pub fn predicate(&self, column: &str) -> SqlPredicate {
        match self.bounds() {
            Some((start, end)) => SqlPredicate {
                sql: format!("{} BETWEEN ? AND ?", column),
                params: vec![start.into(), end.into()],
            },
            None => SqlPredicate::default(),
        }
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.range {
            Some((start, end)) => write!(f, "{} [{} .. {}]", self.token, start, end),
            None => write!(f, "{} [unbounded]", self.token),
        }
    }
}

/// Resolve a token straight into a predicate on `column`
pub fn resolve_date_window(
    token: &str,
    column: &str,
    policy: TokenPolicy,
) -> Result<SqlPredicate, RangeError> {
    Ok(DateWindow::resolve(token, policy)?.predicate(column))
}

fn parse_custom(token: &str) -> Result<(NaiveDate, NaiveDate), RangeError> {
    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() != 3 {
        return Err(RangeError::invalid(
            token,
            "expected custom:<YYYY-MM-DD>:<YYYY-MM-DD>",
        ));
    }

    let parse = |value: &str, which: &str| {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            RangeError::invalid(token, format!("unparsable {} date `{}`", which, value))
        })
    };
    let start = parse(parts[1], "start")?;
    let end = parse(parts[2], "end")?;

    if start > end {
        return Err(RangeError::invalid(token, "start date is after end date"));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn resolve(token: &str) -> Result<DateWindow, RangeError> {
        DateWindow::resolve_at(token, day("2025-08-17"), TokenPolicy::Lenient)
    }

    #[test]
    fn test_rolling_windows_end_today() {
        let w = resolve("7d").unwrap();
        assert_eq!(w.start(), Some(day("2025-08-11")));
        assert_eq!(w.end(), Some(day("2025-08-17")));
        assert_eq!(w.days(), Some(7));

        let w = resolve("30d").unwrap();
        assert_eq!(w.start(), Some(day("2025-07-19")));
        assert_eq!(w.days(), Some(30));
    }

    #[test]
    fn test_today_and_yesterday_are_disjoint() {
        let today = resolve("today").unwrap();
        let yesterday = resolve("yesterday").unwrap();
        assert_eq!(today.days(), Some(1));
        assert_eq!(yesterday.days(), Some(1));
        assert!(yesterday.end_at().unwrap() < today.start_at().unwrap());
    }

    #[test]
    fn test_month_windows_use_calendar_subtraction() {
        let w = DateWindow::resolve_at("3m", day("2025-05-31"), TokenPolicy::Lenient).unwrap();
        assert_eq!(w.start(), Some(day("2025-02-28")));

        let w = resolve("1y").unwrap();
        assert_eq!(w.start(), Some(day("2024-08-17")));
        assert_eq!(w.kind(), WindowKind::LastYear);
    }

    #[test]
    fn test_custom_single_day_covers_whole_day() {
        let w = resolve("custom:2025-08-10:2025-08-10").unwrap();
        assert_eq!(w.days(), Some(1));
        let (start, end) = w.bounds().unwrap();
        assert_eq!(start, "2025-08-10 00:00:00");
        assert_eq!(end, "2025-08-10 23:59:59.999");
        assert!(w.contains(day("2025-08-10").and_hms_opt(23, 59, 59).unwrap()));
        assert!(!w.contains(day("2025-08-11").and_hms_opt(0, 0, 0).unwrap()));
    }

    #[test]
    fn test_malformed_custom_tokens_are_rejected() {
        assert!(matches!(
            resolve("custom:2025-08-01"),
            Err(RangeError::InvalidRangeToken { .. })
        ));
        assert!(resolve("custom:2025-08-01:2025-13-01").is_err());
        assert!(resolve("custom:2025-08-10:2025-08-01").is_err());
        assert!(resolve("custom:2025-08-01:2025-08-02:x").is_err());
    }

    #[test]
    fn test_unknown_token_falls_back_to_last_7_days() {
        let w = resolve("fortnight").unwrap();
        assert!(w.is_fallback());
        assert_eq!(w.kind(), WindowKind::Last7Days);
        assert_eq!(w.days(), Some(7));

        let strict = DateWindow::resolve_at("fortnight", day("2025-08-17"), TokenPolicy::Strict);
        assert!(strict.is_err());
    }

    #[test]
    fn test_all_time_has_no_predicate() {
        let w = resolve("all").unwrap();
        assert_eq!(w.bounds(), None);
        assert!(w.predicate("u.created_at").is_empty());
        assert_eq!(w.predicate("u.created_at").and_clause(), "");
    }

    #[test]
    fn test_predicate_binds_formatted_bounds() {
        let p = resolve("today").unwrap().predicate("o.created_at");
        assert_eq!(p.sql, "o.created_at BETWEEN ? AND ?");
        assert_eq!(
            p.params,
            vec![
                Value::from("2025-08-17 00:00:00"),
                Value::from("2025-08-17 23:59:59.999")
            ]
        );
        assert_eq!(p.and_clause(), " AND o.created_at BETWEEN ? AND ?");
    }

    #[test]
    fn test_start_bound_admits_midnight_text_timestamps() {
        let (start, end) = resolve("today").unwrap().bounds().unwrap();
        for stamp in ["2025-08-17 00:00:00", "2025-08-17 00:00:00.000", "2025-08-17 23:59:59"] {
            assert!(start.as_str() <= stamp && stamp <= end.as_str(), "{}", stamp);
        }
        assert!("2025-08-16 23:59:59.999" < start.as_str());
        assert!("2025-08-18 00:00:00" > end.as_str());
    }

    #[test]
    fn test_resolve_date_window_yields_predicate() {
        let p = resolve_date_window(
            "custom:2025-08-01:2025-08-02",
            "u.created_at",
            TokenPolicy::Strict,
        )
        .unwrap();
        assert_eq!(p.sql, "u.created_at BETWEEN ? AND ?");
        assert_eq!(
            p.params,
            vec![
                Value::from("2025-08-01 00:00:00"),
                Value::from("2025-08-02 23:59:59.999")
            ]
        );

        let all = resolve_date_window("all", "u.created_at", TokenPolicy::Strict).unwrap();
        assert!(all.is_empty());

        assert!(matches!(
            resolve_date_window("fortnight", "u.created_at", TokenPolicy::Strict),
            Err(RangeError::InvalidRangeToken { .. })
        ));
    }

    #[test]
    fn test_resolution_is_pure() {
        assert_eq!(resolve("30d").unwrap(), resolve("30d").unwrap());
        assert_eq!(resolve(" 7d ").unwrap().token(), "7d");
    }
}
