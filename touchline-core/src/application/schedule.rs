// touchline-core/src/application/schedule.rs

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, instrument};

use crate::application::context::PipelineContext;
use crate::domain::dataset::Dataset;
use crate::domain::schedule::{PlayedMatchFilter, fixtures_to_dataset};
use crate::error::TouchlineError;
use crate::ports::source::StatsSource;
use crate::ports::storage::ObjectRef;

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleReport {
    pub object: String,
    pub fixtures: usize,
}

pub(crate) fn schedule_object(ctx: &PipelineContext) -> Result<ObjectRef, TouchlineError> {
    let comp = &ctx.config.competition;
    Ok(ctx.raw(ctx.layout.schedule_key(&comp.season, &comp.league)?))
}

/// Pulls the season's fixture list and stores it as CSV in the raw bucket.
#[instrument(skip(ctx, source))]
pub async fn fetch_schedule(
    ctx: &PipelineContext,
    source: &dyn StatsSource,
) -> Result<ScheduleReport, TouchlineError> {
    let comp = &ctx.config.competition;
    info!(league = %comp.league, season = %comp.season, "📅 Fetching schedule");

    let fixtures = source.schedule(&comp.league, &comp.season).await?;
    let dataset = fixtures_to_dataset(&fixtures);

    let object = schedule_object(ctx)?;
    ctx.write_dataset(&object, &dataset).await?;
    info!(object = %object, fixtures = fixtures.len(), "Schedule stored");

    Ok(ScheduleReport {
        object: object.to_string(),
        fixtures: fixtures.len(),
    })
}

/// Stored fixtures played strictly before `today`.
pub async fn played_fixtures(
    ctx: &PipelineContext,
    today: NaiveDate,
) -> Result<Dataset, TouchlineError> {
    let schedule = ctx.read_dataset(&schedule_object(ctx)?).await?;
    Ok(PlayedMatchFilter::default().filter(&schedule, today)?)
}
