// touchline/src/commands/load.rs
//
// USE CASE: Append cleaned datasets to the warehouse staging table.

use std::path::Path;

use touchline_core::application::{load_object, load_prefix};

use super::project;

pub async fn execute(
    project_dir: &Path,
    key: Option<String>,
    prefix: Option<String>,
) -> anyhow::Result<()> {
    let ctx = project::open(project_dir)?;
    let table = ctx.config.warehouse.staging_table.clone();

    if let Some(key) = key {
        let object = ctx.cleaned(key);
        match load_object(&ctx, &object).await {
            Ok(rows) => println!("✨ {} rows from {} appended to {}", rows, object, table),
            Err(e) => {
                eprintln!("❌ Load failed for {}: {}", object, e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let prefix = prefix.unwrap_or_default();
    println!("📥 Loading '{}*' into {}", prefix, table);
    let report = load_prefix(&ctx, &prefix).await?;
    project::finish_batch("Loading", &report);
    Ok(())
}
