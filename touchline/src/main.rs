// touchline/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG=debug touchline clean ... pour voir les détails
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let project_dir = cli.project_dir;

    match cli.command {
        Commands::FetchSchedule => commands::fetch::schedule(&project_dir).await,
        Commands::FetchStats { overwrite } => commands::fetch::stats(&project_dir, overwrite).await,
        Commands::FetchClubs => commands::fetch::clubs(&project_dir).await,
        Commands::Clean { key, prefix } => commands::clean::execute(&project_dir, key, prefix).await,
        Commands::Load { key, prefix } => commands::load::execute(&project_dir, key, prefix).await,
        Commands::MapTeams { clubs_key } => commands::map::teams(&project_dir, clubs_key).await,
        Commands::MapPlayers { key } => commands::map::players(&project_dir, key).await,
        Commands::OnEvent { handler, payload } => {
            commands::event::execute(&project_dir, handler, payload).await
        }
        Commands::Inspect {
            table,
            key,
            raw,
            limit,
        } => commands::inspect::execute(&project_dir, table, key, raw, limit).await,
    }
}
