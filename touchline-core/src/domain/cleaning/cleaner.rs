// touchline-core/src/domain/cleaning/cleaner.rs

use chrono::{DateTime, Utc};
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::domain::cleaning::columns::flatten_column_name;
use crate::domain::cleaning::rules::{CleaningRuleSet, DatasetRules, MissingRulesPolicy};
use crate::domain::dataset::{Cell, ColumnKind, Dataset};
use crate::domain::error::DomainError;

/// Missing-value count per critical column, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingValueReport(pub Vec<(String, usize)>);

impl MissingValueReport {
    pub fn count(&self, column: &str) -> Option<usize> {
        self.0.iter().find(|(c, _)| c == column).map(|(_, n)| *n)
    }

    pub fn has_missing(&self) -> bool {
        self.0.iter().any(|(_, n)| *n > 0)
    }
}

impl fmt::Display for MissingValueReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(c, n)| format!("{}={}", c, n)).collect();
        f.write_str(&parts.join(", "))
    }
}

/// Applies a [`CleaningRuleSet`] to raw datasets.
pub struct DatasetCleaner<'a> {
    rules: &'a CleaningRuleSet,
    on_missing: MissingRulesPolicy,
}

impl<'a> DatasetCleaner<'a> {
    pub fn new(rules: &'a CleaningRuleSet, on_missing: MissingRulesPolicy) -> Self {
        Self { rules, on_missing }
    }

    /// Dedup, flatten names, check critical columns, project, fill nulls.
    ///
    /// The input is never modified; on error nothing is produced.
    pub fn clean(&self, raw: &Dataset, dataset_type: &str) -> Result<Dataset, DomainError> {
        info!(dataset = dataset_type, rows = raw.num_rows(), "🧹 Cleaning dataset");

        let empty = DatasetRules::default();
        let rules = match self.rules.rules_for(dataset_type) {
            Some(r) => r,
            None => match self.on_missing {
                MissingRulesPolicy::Fail => {
                    return Err(DomainError::UnknownDatasetType(dataset_type.to_string()));
                }
                MissingRulesPolicy::PassThrough => {
                    warn!(
                        dataset = dataset_type,
                        "No cleaning rules found, continuing with an empty column list"
                    );
                    &empty
                }
            },
        };
        debug!(keep = ?rules.columns_to_keep, critical = ?rules.critical_columns, "Rules resolved");

        // 1. Duplicates over the original schema
        let mut ds = raw.deduplicated();
        debug!(dropped = raw.num_rows() - ds.num_rows(), "Duplicates dropped");

        // 2. Tuple-like labels
        ds.rename_columns(flatten_column_name);

        // 3. Critical columns, before anything is projected away
        if !rules.critical_columns.is_empty() {
            let report = missing_values(&ds, &rules.critical_columns, dataset_type)?;
            if report.has_missing() {
                error!(dataset = dataset_type, %report, "Critical columns contain missing values");
                return Err(DomainError::CriticalNulls {
                    dataset: dataset_type.to_string(),
                    report,
                });
            }
        }

        // 4. Projection in rule order
        let projected = project(&ds, &rules.columns_to_keep, dataset_type)?;

        // 5. Null filling, then a last pass so the output itself is duplicate free
        let cleaned = fill_nulls(projected).deduplicated();
        info!(
            dataset = dataset_type,
            rows = cleaned.num_rows(),
            columns = cleaned.num_columns(),
            "✅ Dataset cleaned"
        );
        Ok(cleaned)
    }
}

fn missing_values(
    ds: &Dataset,
    critical: &[String],
    dataset_type: &str,
) -> Result<MissingValueReport, DomainError> {
    let mut counts = Vec::with_capacity(critical.len());
    for column in critical {
        let indices = ds.column_indices(column);
        if indices.is_empty() {
            return Err(DomainError::MissingColumn {
                dataset: dataset_type.to_string(),
                column: column.clone(),
            });
        }
        let missing = ds
            .rows()
            .iter()
            .map(|row| indices.iter().filter(|&&i| row[i].is_null()).count())
            .sum();
        counts.push((column.clone(), missing));
    }
    Ok(MissingValueReport(counts))
}

fn project(ds: &Dataset, keep: &[String], dataset_type: &str) -> Result<Dataset, DomainError> {
    let indices = keep
        .iter()
        .map(|column| {
            ds.column_index(column)
                .ok_or_else(|| DomainError::MissingColumn {
                    dataset: dataset_type.to_string(),
                    column: column.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows = ds
        .rows()
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();
    let declared = indices.iter().map(|&i| ds.declared_kind(i)).collect();
    Ok(Dataset::from_typed_parts(keep.to_vec(), declared, rows))
}

/// Zero value of a column kind. Declared kinds come first, so a text column
/// that is null in every row of this file still gets "".
fn fill_value(kind: ColumnKind) -> Cell {
    match kind {
        ColumnKind::Text => Cell::Text(String::new()),
        ColumnKind::Bool => Cell::Bool(false),
        ColumnKind::Float => Cell::Float(0.0),
        ColumnKind::Timestamp => Cell::Timestamp(DateTime::<Utc>::UNIX_EPOCH),
        ColumnKind::Empty | ColumnKind::Int => Cell::Int(0),
    }
}

fn fill_nulls(ds: Dataset) -> Dataset {
    let fills: Vec<Cell> = (0..ds.num_columns())
        .map(|i| fill_value(ds.column_kind(i)))
        .collect();
    let declared: Vec<Option<ColumnKind>> =
        (0..ds.num_columns()).map(|i| ds.declared_kind(i)).collect();

    let columns = ds.columns().to_vec();
    let rows = ds
        .into_rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(fills.iter())
                .map(|(cell, fill)| if cell.is_null() { fill.clone() } else { cell })
                .collect()
        })
        .collect();
    Dataset::from_typed_parts(columns, declared, rows)
}
