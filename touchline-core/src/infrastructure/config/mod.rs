// touchline-core/src/infrastructure/config/mod.rs

pub mod project;
pub mod rules;

pub use project::load_pipeline_config;
pub use rules::load_rules;
