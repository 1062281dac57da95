// touchline-core/src/domain/project/mod.rs

pub mod configuration;

pub use configuration::{
    CompetitionConfig, LayoutConfig, MappingConfig, PacingConfig, PipelineConfig, RulesConfig,
    SourcesConfig, StorageConfig, WarehouseConfig,
};
