// touchline-core/src/domain/mapping/mod.rs

pub mod fuzzy;
pub mod team;

pub use fuzzy::{NameMatch, NameMatcher, similarity};
pub use team::{PlayerRecord, TeamMapping, TeamNameSource, mappings_to_dataset};
