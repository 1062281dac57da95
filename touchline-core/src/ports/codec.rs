// touchline-core/src/ports/codec.rs

use async_trait::async_trait;
use std::fmt;

use crate::domain::dataset::Dataset;
use crate::error::TouchlineError;

/// File formats a dataset can be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Parquet,
}

impl DataFormat {
    /// Format implied by the extension of an object key.
    pub fn from_key(key: &str) -> Option<Self> {
        let ext = key.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(DataFormat::Csv),
            "parquet" => Some(DataFormat::Parquet),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[async_trait]
pub trait DatasetCodec: Send + Sync {
    async fn decode(&self, body: &[u8], format: DataFormat) -> Result<Dataset, TouchlineError>;

    async fn encode(&self, dataset: &Dataset, format: DataFormat)
    -> Result<Vec<u8>, TouchlineError>;
}
