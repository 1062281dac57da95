// touchline-core/src/application/mod.rs

pub mod clean;
pub mod clubs;
pub mod context;
pub mod events;
pub mod load;
pub mod match_stats;
pub mod player_mapping;
pub mod report;
pub mod schedule;
pub mod team_mapping;

// --- RE-EXPORTS (FACADE PATTERN) ---
// The CLI does `use touchline_core::application::{clean_object, load_prefix, ...};`
// without knowing the file layout.

pub use clean::{clean_object, clean_prefix};
pub use clubs::{ClubSnapshotReport, fetch_clubs};
pub use context::PipelineContext;
pub use events::{EventResponse, StorageEvent, handle_clean_event, handle_load_event};
pub use load::{load_object, load_prefix};
pub use match_stats::{StatsFetchReport, fetch_match_stats};
pub use player_mapping::{PlayerMappingReport, map_players};
pub use report::{BatchReport, UnitFailure};
pub use schedule::{ScheduleReport, fetch_schedule, played_fixtures};
pub use team_mapping::{TeamMappingReport, map_teams, register_team};
