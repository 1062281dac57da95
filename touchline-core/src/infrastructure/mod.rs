// touchline-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;
pub mod layout;
pub mod throttle;

pub use config::{load_pipeline_config, load_rules};
pub use layout::StorageLayout;
pub use throttle::Throttle;
