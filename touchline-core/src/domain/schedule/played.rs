// touchline-core/src/domain/schedule/played.rs

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

use crate::domain::dataset::{Cell, Dataset};
use crate::domain::error::DomainError;
use crate::domain::schedule::fixture::DATE_COLUMN;

// Leading ISO date, tolerant of unpadded parts and of a trailing time.
static ISO_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{4})-(\d{1,2})-(\d{1,2})").ok());

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Best-effort calendar date of a schedule cell. `None` means unparseable.
pub fn parse_match_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Timestamp(ts) => Some(ts.with_timezone(&Local).date_naive()),
        Cell::Text(raw) => parse_date_text(raw.trim()),
        _ => None,
    }
}

fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    let caps = ISO_PREFIX.as_ref()?.captures(raw)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let day = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Keeps the fixtures that were played before "today".
#[derive(Debug, Clone)]
pub struct PlayedMatchFilter {
    date_column: String,
}

impl Default for PlayedMatchFilter {
    fn default() -> Self {
        Self {
            date_column: DATE_COLUMN.to_string(),
        }
    }
}

impl PlayedMatchFilter {
    pub fn new(date_column: &str) -> Self {
        Self {
            date_column: date_column.to_string(),
        }
    }

    /// Filters against the local calendar date of the running process.
    pub fn filter_today(&self, fixtures: &Dataset) -> Result<Dataset, DomainError> {
        self.filter(fixtures, Local::now().date_naive())
    }

    /// Rows dated strictly before `today`. Unparseable dates are dropped,
    /// unless nothing at all parses, which is reported as a corrupt schedule.
    pub fn filter(&self, fixtures: &Dataset, today: NaiveDate) -> Result<Dataset, DomainError> {
        let idx = fixtures
            .column_index(&self.date_column)
            .ok_or_else(|| DomainError::MissingColumn {
                dataset: "schedule".to_string(),
                column: self.date_column.clone(),
            })?;

        if fixtures.is_empty() {
            return Ok(fixtures.clone());
        }

        let parsed: Vec<Option<NaiveDate>> = fixtures
            .rows()
            .iter()
            .map(|row| parse_match_date(&row[idx]))
            .collect();

        let unparsed = parsed.iter().filter(|d| d.is_none()).count();
        if unparsed == parsed.len() {
            return Err(DomainError::UnparseableSchedule {
                column: self.date_column.clone(),
                rows: parsed.len(),
            });
        }
        if unparsed > 0 {
            warn!(rows = unparsed, "Dropping fixtures with unparseable dates");
        }

        let mut dates = parsed.into_iter();
        let played = fixtures.filter_rows(|_| matches!(dates.next(), Some(Some(d)) if d < today));

        if played.is_empty() {
            info!("No played matches found.");
        }
        Ok(played)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn schedule(dates: &[Cell]) -> Dataset {
        Dataset::from_rows(
            ["date", "game_id"],
            dates
                .iter()
                .enumerate()
                .map(|(i, d)| vec![d.clone(), Cell::Text(format!("m{}", i))])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_past_kept_future_dropped() {
        let ds = schedule(&["2025-01-01".into(), "2099-01-01".into()]);
        let played = PlayedMatchFilter::default().filter_today(&ds).unwrap();
        assert_eq!(played.num_rows(), 1);
        assert_eq!(played.rows()[0][0], Cell::Text("2025-01-01".into()));
    }

    #[test]
    fn test_today_is_not_played() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let ds = schedule(&["2025-03-01".into(), "2025-02-28".into()]);
        let played = PlayedMatchFilter::default().filter(&ds, today).unwrap();
        assert_eq!(played.num_rows(), 1);
        assert_eq!(played.rows()[0][1], Cell::Text("m1".into()));
    }

    #[test]
    fn test_all_unparseable_is_corruption() {
        let ds = schedule(&["not a date".into(), Cell::Null, "32/13/2024".into()]);
        let err = PlayedMatchFilter::default().filter_today(&ds).unwrap_err();
        assert!(matches!(err, DomainError::UnparseableSchedule { rows: 3, .. }));
    }

    #[test]
    fn test_partially_unparseable_drops_only_bad_rows() {
        let ds = schedule(&["garbage".into(), "2024-08-16".into(), Cell::Null]);
        let played = PlayedMatchFilter::default().filter_today(&ds).unwrap();
        assert_eq!(played.num_rows(), 1);
        assert_eq!(played.rows()[0][1], Cell::Text("m1".into()));
    }

    #[test]
    fn test_no_past_matches_is_a_normal_empty_result() {
        let ds = schedule(&["2099-01-01".into()]);
        let played = PlayedMatchFilter::default().filter_today(&ds).unwrap();
        assert!(played.is_empty());
    }

    #[test]
    fn test_empty_schedule_is_not_corruption() {
        let ds = schedule(&[]);
        assert!(PlayedMatchFilter::default().filter_today(&ds).unwrap().is_empty());
    }

    #[test]
    fn test_missing_date_column() {
        let ds = Dataset::new(["kickoff"]);
        let err = PlayedMatchFilter::default().filter_today(&ds).unwrap_err();
        assert!(matches!(err, DomainError::MissingColumn { .. }));
    }

    #[test]
    fn test_parse_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 8, 16);
        assert_eq!(parse_match_date(&"2024-08-16".into()), d);
        assert_eq!(parse_match_date(&"16/08/2024".into()), d);
        assert_eq!(parse_match_date(&"2024-08-16 20:00:00".into()), d);
        assert_eq!(parse_match_date(&"2024-8-16 (Fri)".into()), d);
        assert_eq!(parse_match_date(&Cell::Int(20240816)), None);
    }
}
