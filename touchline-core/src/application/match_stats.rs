// touchline-core/src/application/match_stats.rs

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::application::context::PipelineContext;
use crate::application::report::UnitFailure;
use crate::application::schedule::played_fixtures;
use crate::domain::error::DomainError;
use crate::domain::schedule::fixture::MATCH_ID_COLUMN;
use crate::error::TouchlineError;
use crate::ports::source::StatsSource;

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsFetchReport {
    pub matches: usize,
    pub written: Vec<String>,
    /// Already in storage and left alone.
    pub existing: usize,
    /// The source answered with no rows; nothing written.
    pub empty: usize,
    pub failed: Vec<UnitFailure>,
}

/// For every played match and every configured stat type, pulls player stats
/// and stores one Parquet object per (match, stat type).
///
/// A failing (match, stat type) is logged and skipped. A corrupt schedule
/// stops the run before any call is made.
#[instrument(skip(ctx, source))]
pub async fn fetch_match_stats(
    ctx: &PipelineContext,
    source: &dyn StatsSource,
    today: NaiveDate,
    overwrite: bool,
) -> Result<StatsFetchReport, TouchlineError> {
    let comp = &ctx.config.competition;
    let played = played_fixtures(ctx, today).await?;

    let mut report = StatsFetchReport::default();
    if played.is_empty() {
        warn!("No matches played yet. Nothing to fetch.");
        return Ok(report);
    }

    let match_ids = played
        .distinct_text(MATCH_ID_COLUMN)
        .ok_or_else(|| DomainError::MissingColumn {
            dataset: "schedule".to_string(),
            column: MATCH_ID_COLUMN.to_string(),
        })?;
    report.matches = match_ids.len();

    let throttle = ctx.call_throttle();
    let mut first_call = true;

    for match_id in &match_ids {
        info!(match_id = %match_id, "⚽ Fetching stats for match");

        for stat_type in &comp.stat_types {
            let object = ctx.raw(ctx.layout.match_stats_key(
                &comp.season,
                &comp.league,
                match_id,
                stat_type,
            )?);

            if !overwrite && ctx.store.exists(&object).await? {
                report.existing += 1;
                continue;
            }

            if !first_call {
                throttle.wait().await;
            }
            first_call = false;

            let unit = format!("{}/{}", match_id, stat_type);
            let stats = match source.player_stats(match_id, stat_type).await {
                Ok(stats) => stats,
                Err(e) => {
                    error!(unit = %unit, error = %e, "Error fetching match stats");
                    report.failed.push(UnitFailure::new(unit, e));
                    continue;
                }
            };

            if stats.is_empty() {
                info!(unit = %unit, "No data found");
                report.empty += 1;
                continue;
            }

            match ctx.write_dataset(&object, &stats).await {
                Ok(()) => {
                    info!(object = %object, rows = stats.num_rows(), "Match stats stored");
                    report.written.push(object.key);
                }
                Err(e) => {
                    error!(unit = %unit, error = %e, "Error storing match stats");
                    report.failed.push(UnitFailure::new(unit, e));
                }
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::context::testing::{FakeStats, bed, fixture, text};
    use crate::application::schedule::fetch_schedule;
    use crate::domain::dataset::{Cell, Dataset};
    use anyhow::Result;
    use std::collections::HashMap;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn summary() -> Dataset {
        Dataset::from_rows(
            ["player", "team", "min"],
            vec![
                [text(&["Saka", "Arsenal"]), vec![Cell::Int(90)]].concat(),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_one_object_per_match_and_stat_type() -> Result<()> {
        let tb = bed();
        let source = FakeStats {
            fixtures: vec![
                fixture("2024-08-16", "Manchester Utd", "Fulham", "m1"),
                fixture("2024-08-17", "Ipswich Town", "Liverpool", "m2"),
                fixture("2099-01-01", "Arsenal", "Everton", "m3"),
            ],
            tables: HashMap::from([
                (("m1".to_string(), "summary".to_string()), summary()),
                (("m1".to_string(), "keepers".to_string()), summary()),
                (("m2".to_string(), "summary".to_string()), summary()),
                (
                    ("m2".to_string(), "keepers".to_string()),
                    Dataset::new(["player"]),
                ),
            ]),
            ..Default::default()
        };
        fetch_schedule(&tb.ctx, &source).await?;

        let report = fetch_match_stats(&tb.ctx, &source, today(), false).await?;
        assert_eq!(report.matches, 2);
        assert_eq!(report.written.len(), 3);
        assert_eq!(report.empty, 1);
        assert!(report.failed.is_empty());
        assert!(report.written.contains(
            &"match_stats/season=2024-25/league=ENG-Premier%20League/match_id=m1/summary.parquet"
                .to_string()
        ));
        // Future match never requested
        assert!(source.calls.lock().unwrap().iter().all(|c| !c.starts_with("m3")));
        Ok(())
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_batch_and_reruns_skip_existing() -> Result<()> {
        let tb = bed();
        let source = FakeStats {
            fixtures: vec![fixture("2024-08-16", "A", "B", "m1")],
            // keepers missing -> the fake fails that unit
            tables: HashMap::from([(("m1".to_string(), "summary".to_string()), summary())]),
            ..Default::default()
        };
        fetch_schedule(&tb.ctx, &source).await?;

        let first = fetch_match_stats(&tb.ctx, &source, today(), false).await?;
        assert_eq!(first.written.len(), 1);
        assert_eq!(first.failed.len(), 1);
        assert_eq!(first.failed[0].unit, "m1/keepers");

        let second = fetch_match_stats(&tb.ctx, &source, today(), false).await?;
        assert_eq!(second.existing, 1);
        assert!(second.written.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_nothing_played_is_not_an_error() -> Result<()> {
        let tb = bed();
        let source = FakeStats {
            fixtures: vec![fixture("2099-01-01", "A", "B", "m1")],
            ..Default::default()
        };
        fetch_schedule(&tb.ctx, &source).await?;
        let report = fetch_match_stats(&tb.ctx, &source, today(), false).await?;
        assert_eq!(report.matches, 0);
        assert!(source.calls.lock().unwrap().is_empty());
        Ok(())
    }
}
