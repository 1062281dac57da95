// touchline-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(touchline::infra::database::duckdb),
        help("An error occurred inside the warehouse engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("DataFusion Error: {0}")]
    #[diagnostic(
        code(touchline::infra::database::datafusion),
        help("The file could not be read as a table. Check its format and extension.")
    )]
    DataFusion(#[from] datafusion::error::DataFusionError),

    #[error("Arrow Error: {0}")]
    #[diagnostic(code(touchline::infra::database::arrow))]
    Arrow(#[from] datafusion::arrow::error::ArrowError),

    #[error("Parquet Error: {0}")]
    #[diagnostic(code(touchline::infra::database::parquet))]
    Parquet(#[from] datafusion::parquet::errors::ParquetError),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE / DATA ENGINES ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(touchline::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(touchline::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    #[diagnostic(code(touchline::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(touchline::infra::config))]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(
        code(touchline::infra::config_missing),
        help("Run the command from the project directory or pass --project-dir.")
    )]
    ConfigNotFound(String),

    // --- REMOTE SOURCES ---
    #[error("HTTP Error: {0}")]
    #[diagnostic(
        code(touchline::infra::http),
        help("The remote source failed or is rate limiting. Re-run the step later.")
    )]
    Http(#[from] reqwest::Error),

    // --- STORAGE ---
    #[error("Object not found: {0}")]
    #[diagnostic(code(touchline::infra::object_not_found))]
    ObjectNotFound(String),

    #[error("Unsupported data format for '{0}'")]
    #[diagnostic(
        code(touchline::infra::unsupported_format),
        help("Only .csv and .parquet objects can be read as datasets.")
    )]
    UnsupportedFormat(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(
        code(touchline::infra::template),
        help("Check the Jinja syntax ({{ ... }}) of the layout templates.")
    )]
    TemplateError(#[from] minijinja::Error),
}

// Shortcuts for `?` on engine calls
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

impl From<datafusion::error::DataFusionError> for InfrastructureError {
    fn from(err: datafusion::error::DataFusionError) -> Self {
        InfrastructureError::Database(DatabaseError::DataFusion(err))
    }
}

impl From<datafusion::arrow::error::ArrowError> for InfrastructureError {
    fn from(err: datafusion::arrow::error::ArrowError) -> Self {
        InfrastructureError::Database(DatabaseError::Arrow(err))
    }
}

impl From<datafusion::parquet::errors::ParquetError> for InfrastructureError {
    fn from(err: datafusion::parquet::errors::ParquetError) -> Self {
        InfrastructureError::Database(DatabaseError::Parquet(err))
    }
}
