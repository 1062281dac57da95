// touchline-core/src/application/clubs.rs

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{error, info, instrument, warn};

use crate::application::context::PipelineContext;
use crate::error::TouchlineError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::layout::snapshot_timestamp;
use crate::ports::source::{MarketSource, SquadPlayer};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClubSnapshotReport {
    pub clubs_key: String,
    pub players_key: Option<String>,
    pub failed_key: Option<String>,
    pub clubs: usize,
    pub players: usize,
    pub failed_lookups: usize,
}

/// A market-value lookup that returned nothing or failed.
#[derive(Debug, Clone, Serialize)]
struct FailedLookup {
    player_id: String,
    player_name: String,
    club_name: String,
}

/// Snapshots a competition from the market-value source: the club list, then
/// every squad with each player's market-value history.
///
/// Progress (players so far, failed lookups so far) is saved after each club,
/// so an interrupted run still leaves usable documents behind.
#[instrument(skip(ctx, source, now))]
pub async fn fetch_clubs(
    ctx: &PipelineContext,
    source: &dyn MarketSource,
    now: DateTime<Local>,
) -> Result<ClubSnapshotReport, TouchlineError> {
    let comp = &ctx.config.competition;
    let competition = comp.market_id.as_deref().ok_or_else(|| {
        InfrastructureError::ConfigError(
            "competition.market_id is required to fetch clubs".to_string(),
        )
    })?;
    let season = comp
        .market_season
        .clone()
        .unwrap_or_else(|| comp.season.chars().take(4).collect());

    info!(competition, season = %season, "🏟️ Fetching clubs");
    let clubs = source.clubs(competition, &season).await?;
    if clubs.is_empty() {
        error!(competition, "No clubs found. Exiting.");
        return Err(TouchlineError::InternalError(format!(
            "no clubs found for competition {} season {}",
            competition, season
        )));
    }

    let timestamp = snapshot_timestamp(&now);
    let clubs_key = ctx.layout.clubs_key(competition, &timestamp)?;
    ctx.write_json(&ctx.raw(clubs_key.clone()), &clubs).await?;

    let mut report = ClubSnapshotReport {
        clubs_key,
        clubs: clubs.len(),
        ..Default::default()
    };

    let players_object = ctx.raw(ctx.layout.players_key(competition, &timestamp)?);
    let failed_object = ctx.raw(ctx.layout.failed_lookups_key(competition, &timestamp)?);
    let call_throttle = ctx.call_throttle();
    let club_throttle = ctx.club_throttle();

    let mut all_players: Vec<SquadPlayer> = Vec::new();
    let mut failed: Vec<FailedLookup> = Vec::new();

    for (i, club) in clubs.iter().enumerate() {
        let club_name = club
            .name
            .clone()
            .unwrap_or_else(|| format!("Club #{}", i + 1));
        let Some(club_id) = club.id.as_deref().filter(|id| !id.is_empty()) else {
            warn!(club = %club_name, "No ID found for club. Skipping.");
            continue;
        };

        let mut players = match source.club_players(club_id).await {
            Ok(players) => players,
            Err(e) => {
                error!(club = %club_name, error = %e, "Error fetching players");
                Vec::new()
            }
        };
        info!(club = %club_name, players = players.len(), "Squad fetched");

        for player in players.iter_mut() {
            player.extra.insert("club_id".into(), json!(club_id));
            player.extra.insert("club_name".into(), json!(club_name));

            let Some(player_id) = player.id.clone().filter(|id| !id.is_empty()) else {
                continue;
            };
            let player_name = player
                .name
                .clone()
                .unwrap_or_else(|| format!("Player {}", player_id));

            call_throttle.wait().await;
            let document = match source.market_value(&player_id).await {
                Ok(doc) => doc,
                Err(e) => {
                    error!(player = %player_name, error = %e, "Error fetching market value");
                    None
                }
            };

            match document {
                Some(doc) => attach_market_value(player, doc),
                None => failed.push(FailedLookup {
                    player_id,
                    player_name,
                    club_name: club_name.clone(),
                }),
            }
        }

        all_players.extend(players);

        ctx.write_json(&players_object, &all_players).await?;
        report.players_key = Some(players_object.key.clone());
        if !failed.is_empty() {
            ctx.write_json(&failed_object, &failed).await?;
            report.failed_key = Some(failed_object.key.clone());
        }

        if i + 1 < clubs.len() {
            club_throttle.wait().await;
        }
    }

    report.players = all_players.len();
    report.failed_lookups = failed.len();
    info!(
        players = report.players,
        clubs = report.clubs,
        failed = report.failed_lookups,
        "✅ Club snapshot complete"
    );
    Ok(report)
}

// The latest value is the first entry of `market_values`.
fn attach_market_value(player: &mut SquadPlayer, doc: Value) {
    let latest = doc
        .get("market_values")
        .and_then(Value::as_array)
        .and_then(|values| values.first())
        .cloned();

    if let Some(latest) = latest {
        for (field, source) in [
            ("current_market_value", "value"),
            ("current_market_value_currency", "currency"),
            ("current_market_value_date", "date"),
        ] {
            let value = latest.get(source).cloned().unwrap_or(Value::Null);
            player.extra.insert(field.to_string(), value);
        }
    }
    player.extra.insert("market_value_data".to_string(), doc);
}
