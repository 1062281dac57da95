// touchline/src/commands/clean.rs
//
// USE CASE: Clean raw datasets against the rule set.

use std::path::Path;

use touchline_core::application::{clean_object, clean_prefix};

use super::project;

pub async fn execute(
    project_dir: &Path,
    key: Option<String>,
    prefix: Option<String>,
) -> anyhow::Result<()> {
    let ctx = project::open(project_dir)?;
    let rules = project::rules(&ctx)?;

    if let Some(key) = key {
        let source = ctx.raw(key);
        match clean_object(&ctx, &rules, &source).await {
            Ok(target) => println!("✨ Cleaned {} -> {}", source, target),
            Err(e) => {
                eprintln!("❌ Clean failed for {}: {}", source, e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let prefix = prefix.unwrap_or_default();
    println!("🧹 Cleaning '{}*' in {}", prefix, ctx.config.storage.raw_bucket);
    let report = clean_prefix(&ctx, &rules, &prefix).await?;
    project::finish_batch("Cleaning", &report);
    Ok(())
}
