// touchline-core/src/ports/warehouse.rs

use async_trait::async_trait;

use crate::domain::dataset::Dataset;
use crate::error::TouchlineError;

// Struct simple pour décrire une colonne (indépendant de la DB)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
}

#[async_trait]
pub trait Warehouse: Send + Sync {
    /// Appends rows, creating the table when absent and adding any column it
    /// does not have yet. Returns the number of rows written.
    async fn append(&self, table: &str, rows: &Dataset) -> Result<usize, TouchlineError>;

    /// Drops whatever the table held and writes `rows` instead.
    async fn replace(&self, table: &str, rows: &Dataset) -> Result<usize, TouchlineError>;

    /// Empty when the table does not exist.
    async fn fetch_columns(&self, table: &str) -> Result<Vec<ColumnSchema>, TouchlineError>;

    async fn preview(&self, table: &str, limit: usize) -> Result<Dataset, TouchlineError>;
}
