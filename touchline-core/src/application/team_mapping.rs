// touchline-core/src/application/team_mapping.rs

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::application::context::PipelineContext;
use crate::application::schedule::schedule_object;
use crate::domain::error::DomainError;
use crate::domain::mapping::{NameMatcher, TeamMapping, TeamNameSource, mappings_to_dataset};
use crate::domain::schedule::fixture::HOME_TEAM_COLUMN;
use crate::error::TouchlineError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::lookup::LookupStore;
use crate::ports::source::Club;

const CLUBS_PREFIX: &str = "teams_json/";

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamMappingReport {
    pub clubs_key: String,
    /// Stats-side teams created by this run.
    pub registered: usize,
    pub teams: usize,
    pub matched: usize,
    /// Market names left without a stats counterpart.
    pub unmatched: Vec<String>,
}

/// Id of `team_name`, allocating `max + 1` (first id is 1) when the name is
/// new. The name is also recorded as a stats-provider alias.
pub async fn register_team(
    lookup: &dyn LookupStore,
    team_name: &str,
) -> Result<(i64, bool), TouchlineError> {
    if let Some(id) = lookup.team_id(team_name).await? {
        return Ok((id, false));
    }
    let id = lookup.max_team_id().await?.unwrap_or(0) + 1;
    lookup.insert_team(id, team_name).await?;
    lookup.put_alias(TeamNameSource::Stats, team_name, id).await?;
    info!(team = team_name, team_id = id, "Team registered");
    Ok((id, true))
}

/// Registers the schedule's teams, fuzzy-matches the market clubs against
/// them and replaces the mapping table.
///
/// With no `clubs_key`, the most recent club snapshot in the raw bucket is
/// used.
#[instrument(skip(ctx))]
pub async fn map_teams(
    ctx: &PipelineContext,
    clubs_key: Option<&str>,
) -> Result<TeamMappingReport, TouchlineError> {
    let schedule = ctx.read_dataset(&schedule_object(ctx)?).await?;
    let stats_names = schedule
        .distinct_text(HOME_TEAM_COLUMN)
        .ok_or_else(|| DomainError::MissingColumn {
            dataset: "schedule".to_string(),
            column: HOME_TEAM_COLUMN.to_string(),
        })?;

    let mut report = TeamMappingReport {
        teams: stats_names.len(),
        ..Default::default()
    };
    for name in &stats_names {
        let (_, created) = register_team(ctx.lookup.as_ref(), name).await?;
        if created {
            report.registered += 1;
        }
    }

    let clubs_key = match clubs_key {
        Some(key) => key.to_string(),
        None => latest_clubs_snapshot(ctx).await?,
    };
    let body = ctx.store.get(&ctx.raw(clubs_key.clone())).await?;
    let clubs: Vec<Club> = serde_json::from_slice(&body).map_err(InfrastructureError::from)?;
    info!(clubs = clubs.len(), key = %clubs_key, "🔗 Matching club names");
    report.clubs_key = clubs_key;

    let matcher = NameMatcher::new(ctx.config.mapping.min_score);
    let mut mappings = Vec::with_capacity(clubs.len());
    for club in clubs {
        let Some(market_name) = club.name.filter(|n| !n.trim().is_empty()) else {
            continue;
        };

        let mapping = match matcher.best_match(&market_name, &stats_names) {
            Some(m) => {
                let team_id = ctx.lookup.team_id(&m.candidate).await?;
                if let Some(id) = team_id {
                    ctx.lookup.put_alias(TeamNameSource::Market, &market_name, id).await?;
                }
                report.matched += 1;
                TeamMapping {
                    club_id: club.id,
                    team_name_market: market_name,
                    team_name_stats: Some(m.candidate),
                    team_id,
                    match_score: Some(m.score),
                }
            }
            None => {
                warn!(club = %market_name, "⚠️ No team name close enough, left unmatched");
                report.unmatched.push(market_name.clone());
                TeamMapping {
                    club_id: club.id,
                    team_name_market: market_name,
                    team_name_stats: None,
                    team_id: None,
                    match_score: None,
                }
            }
        };
        mappings.push(mapping);
    }

    let table = &ctx.config.warehouse.team_mapping_table;
    ctx.warehouse
        .replace(table, &mappings_to_dataset(&mappings))
        .await?;
    info!(
        table = %table,
        matched = report.matched,
        unmatched = report.unmatched.len(),
        "✅ Team name mapping stored"
    );
    Ok(report)
}

// Snapshot keys end with a sortable timestamp.
async fn latest_clubs_snapshot(ctx: &PipelineContext) -> Result<String, TouchlineError> {
    let keys = ctx
        .store
        .list(&ctx.config.storage.raw_bucket, CLUBS_PREFIX)
        .await?;
    keys.into_iter()
        .filter(|k| k.ends_with(".json"))
        .max()
        .ok_or_else(|| InfrastructureError::ObjectNotFound(format!("{}*.json", CLUBS_PREFIX)).into())
}
