// touchline-core/src/domain/schedule/mod.rs

pub mod fixture;
pub mod played;

pub use fixture::{Fixture, fixtures_to_dataset};
pub use played::{PlayedMatchFilter, parse_match_date};
