// touchline-core/src/application/player_mapping.rs

use serde::Serialize;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use crate::application::context::PipelineContext;
use crate::domain::dataset::{Cell, Dataset};
use crate::domain::error::DomainError;
use crate::domain::mapping::{PlayerRecord, TeamNameSource};
use crate::error::TouchlineError;
use crate::ports::storage::ObjectRef;

const TEAM_NAME: &str = "team_name";
const PLAYER_NAME: &str = "player_name";
const JERSEY_NUMBER: &str = "jersey_number";
const GAME_TIME: &str = "game_time";

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerMappingReport {
    pub rows: usize,
    pub stored: usize,
    /// Team names found in the dataset but not in the lookup store.
    pub unknown_teams: Vec<String>,
    pub skipped_rows: usize,
}

struct PlayerColumns {
    team: usize,
    player: usize,
    jersey: Option<usize>,
    game_time: Option<usize>,
}

impl PlayerColumns {
    fn locate(ds: &Dataset, dataset: &str) -> Result<Self, DomainError> {
        let required = |column: &str| {
            ds.column_index(column)
                .ok_or_else(|| DomainError::MissingColumn {
                    dataset: dataset.to_string(),
                    column: column.to_string(),
                })
        };
        Ok(Self {
            team: required(TEAM_NAME)?,
            player: required(PLAYER_NAME)?,
            jersey: ds.column_index(JERSEY_NUMBER),
            game_time: ds.column_index(GAME_TIME),
        })
    }
}

fn optional_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Null => None,
        Cell::Text(s) if s.is_empty() => None,
        other => Some(other.to_string()),
    }
}

/// Upserts one player record per row of a cleaned player dataset.
///
/// Team names go through the stats alias table first, then the canonical
/// team names. Rows of unknown teams are skipped and counted.
#[instrument(skip(ctx), fields(object = %object))]
pub async fn map_players(
    ctx: &PipelineContext,
    object: &ObjectRef,
) -> Result<PlayerMappingReport, TouchlineError> {
    let ds = ctx.read_dataset(object).await?;
    let cols = PlayerColumns::locate(&ds, &object.key)?;

    let mut report = PlayerMappingReport {
        rows: ds.num_rows(),
        ..Default::default()
    };
    let mut resolved: HashMap<String, Option<i64>> = HashMap::new();

    for row in ds.rows() {
        let (Some(team_name), Some(player_name)) =
            (optional_text(&row[cols.team]), optional_text(&row[cols.player]))
        else {
            report.skipped_rows += 1;
            continue;
        };

        let team_id = match resolved.get(&team_name) {
            Some(id) => *id,
            None => {
                let id = match ctx.lookup.resolve_alias(TeamNameSource::Stats, &team_name).await? {
                    Some(id) => Some(id),
                    None => ctx.lookup.team_id(&team_name).await?,
                };
                if id.is_none() {
                    warn!(team = %team_name, "⚠️ Team not found in lookup store");
                    report.unknown_teams.push(team_name.clone());
                }
                resolved.insert(team_name.clone(), id);
                id
            }
        };
        let Some(team_id) = team_id else {
            report.skipped_rows += 1;
            continue;
        };

        let player = PlayerRecord {
            team_id,
            player_name,
            jersey_number: cols.jersey.and_then(|i| row[i].as_i64()),
            game_time: cols.game_time.and_then(|i| optional_text(&row[i])),
        };
        ctx.lookup.put_player(&player).await?;
        report.stored += 1;
    }

    info!(
        stored = report.stored,
        skipped = report.skipped_rows,
        "✅ Players mapped"
    );
    Ok(report)
}
