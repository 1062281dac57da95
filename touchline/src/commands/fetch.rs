// touchline/src/commands/fetch.rs
//
// USE CASES: schedule, match stats and club snapshots from the external sources.

use anyhow::Context;
use chrono::Local;
use std::path::Path;
use std::time::Duration;

use touchline_core::application::{fetch_clubs, fetch_match_stats, fetch_schedule};
use touchline_core::infrastructure::adapters::{HttpStatsSource, TransfermarktClient};

use super::project;

pub async fn schedule(project_dir: &Path) -> anyhow::Result<()> {
    let ctx = project::open(project_dir)?;
    let sources = &ctx.config.sources;
    let source = HttpStatsSource::new(
        &sources.stats_base_url,
        Duration::from_secs(sources.timeout_secs),
    )?;

    let report = fetch_schedule(&ctx, &source)
        .await
        .context("Schedule fetch failed")?;
    println!("✨ {} fixtures saved to {}", report.fixtures, report.object);
    Ok(())
}

pub async fn stats(project_dir: &Path, overwrite: bool) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    let ctx = project::open(project_dir)?;
    let sources = &ctx.config.sources;
    let source = HttpStatsSource::new(
        &sources.stats_base_url,
        Duration::from_secs(sources.timeout_secs),
    )?;

    let report = fetch_match_stats(&ctx, &source, Local::now().date_naive(), overwrite)
        .await
        .context("Match stats fetch failed")?;

    println!(
        "   {} matches | {} written | {} already stored | {} empty",
        report.matches,
        report.written.len(),
        report.existing,
        report.empty
    );
    for failure in &report.failed {
        eprintln!("   ❌ {}: {}", failure.unit, failure.error);
    }
    if report.failed.is_empty() {
        println!("\n✨ SUCCESS! Stats fetched in {:.2?}", start.elapsed());
    } else {
        eprintln!("\n⚠️  {} (match, stat type) units failed", report.failed.len());
    }
    Ok(())
}

pub async fn clubs(project_dir: &Path) -> anyhow::Result<()> {
    let ctx = project::open(project_dir)?;
    let sources = &ctx.config.sources;
    let source = TransfermarktClient::new(
        &sources.market_base_url,
        Duration::from_secs(sources.timeout_secs),
    )?;

    let report = fetch_clubs(&ctx, &source, Local::now())
        .await
        .context("Club snapshot failed")?;

    println!("\nCollection complete!");
    println!(
        "Found {} players across {} clubs",
        report.players, report.clubs
    );
    println!(
        "Retrieved market values for {} players, {} failed",
        report.players.saturating_sub(report.failed_lookups),
        report.failed_lookups
    );
    if let Some(key) = &report.players_key {
        println!("Data saved to: {}", key);
    }
    Ok(())
}
