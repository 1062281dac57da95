// touchline/src/commands/event.rs
//
// USE CASE: Storage-write trigger emulation. Always exits 0, like the
// handler it stands in for.

use std::path::Path;

use touchline_core::application::{handle_clean_event, handle_load_event};

use super::project;
use crate::cli::EventHandler;

pub async fn execute(project_dir: &Path, handler: EventHandler, payload: String) -> anyhow::Result<()> {
    let ctx = project::open(project_dir)?;

    let response = match handler {
        EventHandler::Clean => {
            let rules = project::rules(&ctx)?;
            handle_clean_event(&ctx, &rules, &payload).await
        }
        EventHandler::Load => handle_load_event(&ctx, &payload).await,
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}
