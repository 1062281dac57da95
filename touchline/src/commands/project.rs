// touchline/src/commands/project.rs
//
// Builds the adapters once and hands them to the use cases.

use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use touchline_core::application::{BatchReport, PipelineContext};
use touchline_core::domain::cleaning::CleaningRuleSet;
use touchline_core::infrastructure::adapters::{DataFusionCodec, DuckDbConnector, LocalObjectStore};
use touchline_core::infrastructure::{load_pipeline_config, load_rules};

pub fn open(project_dir: &Path) -> anyhow::Result<PipelineContext> {
    println!("⚙️  Loading configuration...");
    let config = load_pipeline_config(project_dir).with_context(|| {
        format!(
            "Failed to load pipeline configuration from {:?}",
            project_dir
        )
    })?;
    println!(
        "   Project: {} (v{}) | {} {}",
        config.name, config.version, config.competition.league, config.competition.season
    );

    let db_path = config.warehouse.path.clone();
    let db = Arc::new(
        DuckDbConnector::new(&db_path)
            .with_context(|| format!("Failed to initialize DuckDB at {}", db_path))?,
    );
    let store = Arc::new(LocalObjectStore::new(&config.storage.root));
    debug!(
        storage = %config.storage.root,
        warehouse = %db_path,
        rules = %config.rules.path,
        "Adapters ready"
    );

    let ctx = PipelineContext::new(
        config,
        store,
        Arc::new(DataFusionCodec::new()),
        db.clone(),
        db,
    )?;
    Ok(ctx)
}

pub fn rules(ctx: &PipelineContext) -> anyhow::Result<CleaningRuleSet> {
    let path = Path::new(&ctx.config.rules.path);
    load_rules(path).with_context(|| format!("Failed to load cleaning rules from {:?}", path))
}

/// Prints a batch outcome; any failed unit makes the process exit non-zero.
pub fn finish_batch(what: &str, report: &BatchReport) {
    for failure in &report.failed {
        eprintln!("   ❌ {}: {}", failure.unit, failure.error);
    }
    if report.is_success() {
        println!("\n✨ SUCCESS! {} finished: {}", what, report);
    } else {
        eprintln!("\n❌ FAILURE. {} finished: {}", what, report);
        std::process::exit(1);
    }
}
