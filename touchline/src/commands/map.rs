// touchline/src/commands/map.rs
//
// USE CASES: team name mapping and player lookup records.

use anyhow::Context;
use std::path::Path;

use touchline_core::application::{map_players, map_teams};

use super::project;

pub async fn teams(project_dir: &Path, clubs_key: Option<String>) -> anyhow::Result<()> {
    let ctx = project::open(project_dir)?;
    let report = map_teams(&ctx, clubs_key.as_deref())
        .await
        .context("Team name mapping failed")?;

    println!("🔗 Clubs snapshot: {}", report.clubs_key);
    println!(
        "   {} stats teams ({} new) | {} clubs matched",
        report.teams, report.registered, report.matched
    );
    for name in &report.unmatched {
        println!("   ⚠️  unmatched: {}", name);
    }
    println!(
        "✨ Mapping stored in {}",
        ctx.config.warehouse.team_mapping_table
    );
    Ok(())
}

pub async fn players(project_dir: &Path, key: String) -> anyhow::Result<()> {
    let ctx = project::open(project_dir)?;
    let object = ctx.cleaned(key);
    let report = map_players(&ctx, &object)
        .await
        .with_context(|| format!("Player mapping failed for {}", object))?;

    println!(
        "👥 {} rows | {} players stored | {} skipped",
        report.rows, report.stored, report.skipped_rows
    );
    for team in &report.unknown_teams {
        println!("   ⚠️  Team '{}' not found in lookup store", team);
    }
    Ok(())
}
