// touchline-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::cleaning::MissingValueReport;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Critical columns contain missing values in '{dataset}': {report}")]
    #[diagnostic(
        code(touchline::domain::critical_nulls),
        help("The dataset was not written. Fix the upstream extract or relax 'critical_columns'.")
    )]
    CriticalNulls {
        dataset: String,
        report: MissingValueReport,
    },

    #[error("Column '{column}' not found in dataset '{dataset}'")]
    #[diagnostic(
        code(touchline::domain::missing_column),
        help("Check 'columns_to_keep' / 'critical_columns' against the flattened column names.")
    )]
    MissingColumn { dataset: String, column: String },

    #[error("No cleaning rules configured for dataset type '{0}'")]
    #[diagnostic(
        code(touchline::domain::unknown_dataset_type),
        help("Add an entry under 'datasets' in the rules file, or set rules.on_missing: pass_through.")
    )]
    UnknownDatasetType(String),

    #[error("None of the {rows} values in column '{column}' could be parsed as a date")]
    #[diagnostic(
        code(touchline::domain::unparseable_schedule),
        help("The schedule file is probably malformed. Check the date format in the raw file.")
    )]
    UnparseableSchedule { column: String, rows: usize },

    #[error("Row has {found} cells but the dataset has {expected} columns")]
    #[diagnostic(code(touchline::domain::row_arity))]
    RowArity { expected: usize, found: usize },
}
