// touchline-core/src/domain/cleaning/mod.rs

pub mod cleaner;
pub mod columns;
pub mod rules;

pub use cleaner::{DatasetCleaner, MissingValueReport};
pub use columns::{flatten_column_name, warehouse_column_name};
pub use rules::{CleaningRuleSet, DatasetRules, MissingRulesPolicy};
