// touchline-core/src/domain/dataset.rs

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::error::DomainError;

/// A single value in a [`Dataset`].
///
/// Floats compare and hash by bit pattern so that rows can be de-duplicated
/// with a `HashSet` (two `NaN`s with the same payload are the same cell).
#[derive(Debug, Clone)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cell::Int(v) => Some(*v),
            Cell::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Cell::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Cell::Null, Cell::Null) => true,
            (Cell::Bool(a), Cell::Bool(b)) => a == b,
            (Cell::Int(a), Cell::Int(b)) => a == b,
            (Cell::Float(a), Cell::Float(b)) => a.to_bits() == b.to_bits(),
            (Cell::Text(a), Cell::Text(b)) => a == b,
            (Cell::Timestamp(a), Cell::Timestamp(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Cell {}

impl Hash for Cell {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Cell::Null => {}
            Cell::Bool(v) => v.hash(state),
            Cell::Int(v) => v.hash(state),
            Cell::Float(v) => v.to_bits().hash(state),
            Cell::Text(v) => v.hash(state),
            Cell::Timestamp(v) => v.hash(state),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Bool(v) => write!(f, "{}", v),
            Cell::Int(v) => write!(f, "{}", v),
            Cell::Float(v) => write!(f, "{}", v),
            Cell::Text(v) => f.write_str(v),
            Cell::Timestamp(v) => write!(f, "{}", v.to_rfc3339()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

/// Storage class of a column: declared by the file it was read from, or
/// inferred from its non-null cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every cell is null (or there are no rows).
    Empty,
    Bool,
    Int,
    /// Floats, possibly mixed with integers.
    Float,
    Timestamp,
    /// Text, or any mix that cannot be represented numerically.
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Bool | ColumnKind::Int | ColumnKind::Float)
    }

    fn merge(self, cell: &Cell) -> ColumnKind {
        let cell_kind = match cell {
            Cell::Null => return self,
            Cell::Bool(_) => ColumnKind::Bool,
            Cell::Int(_) => ColumnKind::Int,
            Cell::Float(_) => ColumnKind::Float,
            Cell::Timestamp(_) => ColumnKind::Timestamp,
            Cell::Text(_) => ColumnKind::Text,
        };
        match (self, cell_kind) {
            (ColumnKind::Empty, k) => k,
            (a, b) if a == b => a,
            (ColumnKind::Int, ColumnKind::Float) | (ColumnKind::Float, ColumnKind::Int) => {
                ColumnKind::Float
            }
            _ => ColumnKind::Text,
        }
    }
}

/// An in-memory table: ordered column names and rows of cells.
///
/// Column names are not required to be unique; lookups by name resolve to
/// the first matching column. A column may carry a declared kind (from a
/// file schema) which wins over what its cells suggest, so an all-null text
/// column stays text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dataset {
    columns: Vec<String>,
    declared: Vec<Option<ColumnKind>>,
    rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        Self {
            declared: vec![None; columns.len()],
            columns,
            rows: Vec::new(),
        }
    }

    pub fn from_rows<S: Into<String>>(
        columns: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Cell>>,
    ) -> Result<Self, DomainError> {
        let mut dataset = Self::new(columns);
        for row in rows {
            dataset.push_row(row)?;
        }
        Ok(dataset)
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), DomainError> {
        if row.len() != self.columns.len() {
            return Err(DomainError::RowArity {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All positions holding `name` (a raw extract may repeat a header).
    pub fn column_indices(&self, name: &str) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() == name)
            .map(|(i, _)| i)
            .collect()
    }

    /// Cells of the first column called `name`.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Declared kind when there is one, otherwise the inferred kind.
    pub fn column_kind(&self, idx: usize) -> ColumnKind {
        self.declared_kind(idx)
            .unwrap_or_else(|| self.inferred_kind(idx))
    }

    pub fn declared_kind(&self, idx: usize) -> Option<ColumnKind> {
        self.declared.get(idx).copied().flatten()
    }

    pub fn inferred_kind(&self, idx: usize) -> ColumnKind {
        self.rows
            .iter()
            .fold(ColumnKind::Empty, |kind, row| kind.merge(&row[idx]))
    }

    /// Declares the kind of every column called `name`.
    pub fn declare(mut self, name: &str, kind: ColumnKind) -> Self {
        for (column, declared) in self.columns.iter().zip(self.declared.iter_mut()) {
            if column == name {
                *declared = Some(kind);
            }
        }
        self
    }

    pub fn rename_columns<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for col in self.columns.iter_mut() {
            *col = f(col);
        }
    }

    /// Appends a column holding `value` on every row.
    pub fn with_constant_column(mut self, name: &str, value: Cell) -> Self {
        self.columns.push(name.to_string());
        self.declared.push(None);
        for row in self.rows.iter_mut() {
            row.push(value.clone());
        }
        self
    }

    /// Keeps the rows for which `keep` returns true, preserving order.
    pub fn filter_rows<F>(&self, mut keep: F) -> Dataset
    where
        F: FnMut(&[Cell]) -> bool,
    {
        Dataset {
            columns: self.columns.clone(),
            declared: self.declared.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| keep(row))
                .cloned()
                .collect(),
        }
    }

    /// Stable de-duplication over full rows: the first occurrence survives.
    pub fn deduplicated(&self) -> Dataset {
        let mut seen: HashSet<&[Cell]> = HashSet::with_capacity(self.rows.len());
        let rows = self
            .rows
            .iter()
            .filter(|row| seen.insert(row.as_slice()))
            .cloned()
            .collect();
        Dataset {
            columns: self.columns.clone(),
            declared: self.declared.clone(),
            rows,
        }
    }

    /// Distinct non-null values of a column, rendered as text, in order of
    /// first appearance.
    pub fn distinct_text(&self, name: &str) -> Option<Vec<String>> {
        let mut seen = HashSet::new();
        let values = self
            .column(name)?
            .filter(|c| !c.is_null())
            .map(|c| c.to_string())
            .filter(|v| seen.insert(v.clone()))
            .collect();
        Some(values)
    }

    pub(crate) fn from_parts(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let declared = vec![None; columns.len()];
        Self::from_typed_parts(columns, declared, rows)
    }

    /// `declared` is padded or cut to the column count.
    pub(crate) fn from_typed_parts(
        columns: Vec<String>,
        mut declared: Vec<Option<ColumnKind>>,
        rows: Vec<Vec<Cell>>,
    ) -> Self {
        declared.resize(columns.len(), None);
        Self {
            columns,
            declared,
            rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_rows(
            ["player", "min"],
            vec![
                vec!["Saka".into(), Cell::Int(90)],
                vec!["Rice".into(), Cell::Null],
                vec!["Saka".into(), Cell::Int(90)],
            ],
        )
        .unwrap_or_default()
    }

    #[test]
    fn test_push_row_rejects_wrong_arity() {
        let mut ds = Dataset::new(["a", "b"]);
        let res = ds.push_row(vec![Cell::Int(1)]);
        assert!(matches!(
            res,
            Err(DomainError::RowArity {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_deduplicated_keeps_first_occurrence() {
        let ds = sample().deduplicated();
        assert_eq!(ds.num_rows(), 2);
        assert_eq!(ds.rows()[0][0], Cell::Text("Saka".into()));
        assert_eq!(ds.rows()[1][0], Cell::Text("Rice".into()));
    }

    #[test]
    fn test_column_kind_inference() {
        let ds = Dataset::from_rows(
            ["i", "f", "t", "n"],
            vec![
                vec![Cell::Int(1), Cell::Int(2), "x".into(), Cell::Null],
                vec![Cell::Int(3), Cell::Float(0.5), Cell::Int(4), Cell::Null],
            ],
        )
        .unwrap_or_default();
        assert_eq!(ds.column_kind(0), ColumnKind::Int);
        assert_eq!(ds.column_kind(1), ColumnKind::Float);
        assert_eq!(ds.column_kind(2), ColumnKind::Text);
        assert_eq!(ds.column_kind(3), ColumnKind::Empty);
    }

    #[test]
    fn test_declared_kind_wins_over_cells() {
        let ds = Dataset::from_rows(["nation", "min"], vec![vec![Cell::Null, Cell::Int(90)]])
            .unwrap_or_default()
            .declare("nation", ColumnKind::Text);
        assert_eq!(ds.inferred_kind(0), ColumnKind::Empty);
        assert_eq!(ds.column_kind(0), ColumnKind::Text);
        assert_eq!(ds.declared_kind(1), None);
        assert_eq!(ds.column_kind(1), ColumnKind::Int);

        // survives row operations and new columns
        let tagged = ds.deduplicated().with_constant_column("source_file", "summary".into());
        assert_eq!(tagged.column_kind(0), ColumnKind::Text);
        assert_eq!(tagged.declared_kind(2), None);
    }

    #[test]
    fn test_nan_cells_are_equal_for_dedup() {
        let ds = Dataset::from_rows(
            ["x"],
            vec![vec![Cell::Float(f64::NAN)], vec![Cell::Float(f64::NAN)]],
        )
        .unwrap_or_default();
        assert_eq!(ds.deduplicated().num_rows(), 1);
    }

    #[test]
    fn test_distinct_text_preserves_order() {
        let values = sample().distinct_text("player").unwrap_or_default();
        assert_eq!(values, vec!["Saka".to_string(), "Rice".to_string()]);
    }
}
