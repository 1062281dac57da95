// touchline-core/src/domain/mod.rs

pub mod cleaning;
pub mod dataset;
pub mod error;
pub mod mapping;
pub mod project;
pub mod schedule;

pub use dataset::{Cell, ColumnKind, Dataset};
pub use error::DomainError;
