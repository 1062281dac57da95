// touchline-core/src/application/report.rs

use serde::Serialize;
use std::fmt;

/// A unit of work that failed while the batch carried on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitFailure {
    pub unit: String,
    pub error: String,
}

impl UnitFailure {
    pub fn new(unit: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            unit: unit.into(),
            error: error.to_string(),
        }
    }
}

/// Outcome of a multi-object run (clean or load every object under a prefix).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub succeeded: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<UnitFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.succeeded.len() + self.skipped.len() + self.failed.len()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} skipped, {} failed",
            self.succeeded.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}
