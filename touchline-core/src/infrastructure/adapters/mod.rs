// touchline-core/src/infrastructure/adapters/mod.rs

pub mod datafusion;
pub mod duckdb;
pub mod local_store;
pub mod stats_api;
pub mod transfermarkt;

pub use self::datafusion::DataFusionCodec;
pub use self::duckdb::DuckDbConnector;
pub use local_store::LocalObjectStore;
pub use stats_api::HttpStatsSource;
pub use transfermarkt::TransfermarktClient;

#[cfg(test)]
pub(crate) mod test_http;
