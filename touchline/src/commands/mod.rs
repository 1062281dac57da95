// touchline/src/commands/mod.rs

pub mod clean;
pub mod event;
pub mod fetch;
pub mod inspect;
pub mod load;
pub mod map;
pub mod project;
