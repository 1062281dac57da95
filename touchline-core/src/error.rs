// touchline-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TouchlineError {
    // --- DOMAIN ERRORS (data quality, rules, schedules) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, parsing, engines, HTTP) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe object key detected: {0}")]
    UnsafePath(String),
}

impl From<std::io::Error> for TouchlineError {
    fn from(err: std::io::Error) -> Self {
        TouchlineError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl TouchlineError {
    /// True when the failure comes from the data itself (critical nulls,
    /// missing columns, corrupt schedule) rather than from the plumbing.
    pub fn is_data_quality(&self) -> bool {
        matches!(
            self,
            TouchlineError::Domain(
                DomainError::CriticalNulls { .. }
                    | DomainError::MissingColumn { .. }
                    | DomainError::UnparseableSchedule { .. }
            )
        )
    }
}
