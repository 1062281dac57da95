// touchline-core/src/infrastructure/adapters/datafusion.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use datafusion::arrow::array::{
    Array, ArrayRef, BooleanArray, Float64Array, Int64Array, StringArray,
    TimestampMicrosecondArray,
};
use datafusion::arrow::compute::cast;
use datafusion::arrow::csv::WriterBuilder;
use datafusion::arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use datafusion::arrow::error::ArrowError;
use datafusion::arrow::record_batch::{RecordBatch, RecordBatchOptions};
use datafusion::parquet::arrow::ArrowWriter;
use datafusion::prelude::*;
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

// Hexagonal Imports
use crate::domain::dataset::{Cell, ColumnKind, Dataset};
use crate::error::TouchlineError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::codec::{DataFormat, DatasetCodec};

const UTC: &str = "UTC";

/// Reads CSV / Parquet bodies into datasets and writes them back, with
/// DataFusion doing the parsing and Arrow the encoding.
pub struct DataFusionCodec {
    ctx: Arc<SessionContext>,
}

impl Default for DataFusionCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl DataFusionCodec {
    pub fn new() -> Self {
        Self {
            ctx: Arc::new(SessionContext::new()),
        }
    }

    async fn read(&self, body: &[u8], format: DataFormat) -> Result<Dataset, InfrastructureError> {
        // DataFusion reads from paths: spill the body to a scratch file
        // carrying the extension the reader expects.
        let mut scratch = tempfile::Builder::new()
            .prefix("touchline-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile()?;
        scratch.write_all(body)?;
        scratch.flush()?;
        let path = scratch.path().to_string_lossy().into_owned();

        let df = match format {
            DataFormat::Csv => self.ctx.read_csv(path.as_str(), CsvReadOptions::new()).await?,
            DataFormat::Parquet => {
                self.ctx
                    .read_parquet(path.as_str(), ParquetReadOptions::default())
                    .await?
            }
        };

        let (columns, declared): (Vec<String>, Vec<Option<ColumnKind>>) = df
            .schema()
            .fields()
            .iter()
            .map(|f| (f.name().clone(), declared_kind(f.data_type())))
            .unzip();
        let batches = df.collect().await?;

        let mut rows = Vec::new();
        for batch in &batches {
            append_rows(batch, &mut rows)?;
        }
        debug!(%format, rows = rows.len(), columns = columns.len(), "Dataset decoded");
        Ok(Dataset::from_typed_parts(columns, declared, rows))
    }
}

#[async_trait]
impl DatasetCodec for DataFusionCodec {
    async fn decode(&self, body: &[u8], format: DataFormat) -> Result<Dataset, TouchlineError> {
        Ok(self.read(body, format).await?)
    }

    async fn encode(
        &self,
        dataset: &Dataset,
        format: DataFormat,
    ) -> Result<Vec<u8>, TouchlineError> {
        let batch = to_record_batch(dataset)?;
        let body = match format {
            DataFormat::Parquet => write_parquet(&batch)?,
            DataFormat::Csv => write_csv(&batch)?,
        };
        Ok(body)
    }
}

// --- READ SIDE ---

fn append_rows(batch: &RecordBatch, rows: &mut Vec<Vec<Cell>>) -> Result<(), InfrastructureError> {
    let columns = batch
        .columns()
        .iter()
        .map(array_cells)
        .collect::<Result<Vec<_>, _>>()?;

    for r in 0..batch.num_rows() {
        rows.push(columns.iter().map(|col| col[r].clone()).collect());
    }
    Ok(())
}

fn downcast<T: 'static>(array: &ArrayRef) -> Result<&T, InfrastructureError> {
    array.as_any().downcast_ref::<T>().ok_or_else(|| {
        ArrowError::CastError(format!("Unexpected array type {}", array.data_type())).into()
    })
}

/// Column kind carried by an Arrow type. Integers widen to i64, floats and
/// decimals to f64, timestamps to UTC; anything else (dates, strings, views)
/// is read as text. The `Null` type declares nothing.
fn declared_kind(dt: &DataType) -> Option<ColumnKind> {
    match dt {
        DataType::Null => None,
        DataType::Boolean => Some(ColumnKind::Bool),
        d if d.is_integer() => Some(ColumnKind::Int),
        d if d.is_floating()
            || matches!(d, DataType::Decimal128(_, _) | DataType::Decimal256(_, _)) =>
        {
            Some(ColumnKind::Float)
        }
        DataType::Timestamp(_, _) => Some(ColumnKind::Timestamp),
        _ => Some(ColumnKind::Text),
    }
}

/// One column as cells, following [`declared_kind`].
fn array_cells(array: &ArrayRef) -> Result<Vec<Cell>, InfrastructureError> {
    let cells = match declared_kind(array.data_type()) {
        None => vec![Cell::Null; array.len()],
        Some(ColumnKind::Bool) => {
            let a = downcast::<BooleanArray>(array)?;
            (0..a.len())
                .map(|i| if a.is_null(i) { Cell::Null } else { Cell::Bool(a.value(i)) })
                .collect()
        }
        Some(ColumnKind::Int) => {
            let casted = cast(array, &DataType::Int64)?;
            let a = downcast::<Int64Array>(&casted)?;
            (0..a.len())
                .map(|i| if a.is_null(i) { Cell::Null } else { Cell::Int(a.value(i)) })
                .collect()
        }
        Some(ColumnKind::Float) => {
            let casted = cast(array, &DataType::Float64)?;
            let a = downcast::<Float64Array>(&casted)?;
            (0..a.len())
                .map(|i| if a.is_null(i) { Cell::Null } else { Cell::Float(a.value(i)) })
                .collect()
        }
        Some(ColumnKind::Timestamp) => {
            let target = DataType::Timestamp(TimeUnit::Microsecond, Some(UTC.into()));
            let casted = cast(array, &target)?;
            let a = downcast::<TimestampMicrosecondArray>(&casted)?;
            (0..a.len())
                .map(|i| {
                    if a.is_null(i) {
                        return Cell::Null;
                    }
                    DateTime::<Utc>::from_timestamp_micros(a.value(i))
                        .map(Cell::Timestamp)
                        .unwrap_or(Cell::Null)
                })
                .collect()
        }
        Some(ColumnKind::Text) | Some(ColumnKind::Empty) => {
            let casted = cast(array, &DataType::Utf8)?;
            let a = downcast::<StringArray>(&casted)?;
            (0..a.len())
                .map(|i| {
                    if a.is_null(i) {
                        Cell::Null
                    } else {
                        Cell::Text(a.value(i).to_string())
                    }
                })
                .collect()
        }
    };
    Ok(cells)
}

// --- WRITE SIDE ---

fn to_record_batch(dataset: &Dataset) -> Result<RecordBatch, InfrastructureError> {
    let mut fields = Vec::with_capacity(dataset.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(dataset.num_columns());

    for (idx, name) in dataset.columns().iter().enumerate() {
        let cells = || dataset.rows().iter().map(move |row| &row[idx]);

        let (data_type, array): (DataType, ArrayRef) = match dataset.column_kind(idx) {
            ColumnKind::Bool => (
                DataType::Boolean,
                Arc::new(
                    cells()
                        .map(|c| match c {
                            Cell::Bool(v) => Some(*v),
                            _ => None,
                        })
                        .collect::<BooleanArray>(),
                ),
            ),
            ColumnKind::Int => (
                DataType::Int64,
                Arc::new(
                    cells()
                        .map(|c| match c {
                            Cell::Int(v) => Some(*v),
                            _ => None,
                        })
                        .collect::<Int64Array>(),
                ),
            ),
            ColumnKind::Float => (
                DataType::Float64,
                Arc::new(
                    cells()
                        .map(|c| match c {
                            Cell::Float(v) => Some(*v),
                            Cell::Int(v) => Some(*v as f64),
                            _ => None,
                        })
                        .collect::<Float64Array>(),
                ),
            ),
            ColumnKind::Timestamp => {
                let values: Vec<Option<i64>> = cells()
                    .map(|c| match c {
                        Cell::Timestamp(ts) => Some(ts.timestamp_micros()),
                        _ => None,
                    })
                    .collect();
                (
                    DataType::Timestamp(TimeUnit::Microsecond, Some(UTC.into())),
                    Arc::new(TimestampMicrosecondArray::from(values).with_timezone(UTC)),
                )
            }
            ColumnKind::Text | ColumnKind::Empty => (
                DataType::Utf8,
                Arc::new(
                    cells()
                        .map(|c| if c.is_null() { None } else { Some(c.to_string()) })
                        .collect::<StringArray>(),
                ),
            ),
        };
        fields.push(Field::new(name.as_str(), data_type, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(dataset.num_rows()));
    Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
}

fn write_parquet(batch: &RecordBatch) -> Result<Vec<u8>, InfrastructureError> {
    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), None)?;
    writer.write(batch)?;
    writer.close()?;
    Ok(buf)
}

fn write_csv(batch: &RecordBatch) -> Result<Vec<u8>, InfrastructureError> {
    let mut writer = WriterBuilder::new().with_header(true).build(Vec::new());
    writer.write(batch)?;
    Ok(writer.into_inner())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::TimeZone;

    fn stats() -> Dataset {
        Dataset::from_rows(
            ["('player', '')", "('Performance', 'Gls')", "xG", "starter", "seen_at"],
            vec![
                vec![
                    "Saka".into(),
                    Cell::Int(1),
                    Cell::Float(0.7),
                    Cell::Bool(true),
                    Cell::Timestamp(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()),
                ],
                vec!["Rice".into(), Cell::Null, Cell::Int(0), Cell::Null, Cell::Null],
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_parquet_keeps_names_types_and_nulls() -> Result<()> {
        let codec = DataFusionCodec::new();
        let body = codec.encode(&stats(), DataFormat::Parquet).await?;
        assert!(body.starts_with(b"PAR1"));

        let back = codec.decode(&body, DataFormat::Parquet).await?;
        assert_eq!(back.columns(), stats().columns());
        assert_eq!(back.num_rows(), 2);
        assert_eq!(back.rows()[0][1], Cell::Int(1));
        assert_eq!(back.rows()[1][1], Cell::Null);
        // Int mixed into a float column comes back as a float
        assert_eq!(back.rows()[1][2], Cell::Float(0.0));
        assert_eq!(back.rows()[0][3], Cell::Bool(true));
        assert!(matches!(back.rows()[0][4], Cell::Timestamp(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_all_null_columns_keep_their_schema_type() -> Result<()> {
        let codec = DataFusionCodec::new();
        let ds = Dataset::from_rows(
            ["player", "nation", "seen_at", "loose"],
            vec![
                vec!["Saka".into(), Cell::Null, Cell::Null, Cell::Null],
                vec!["Rice".into(), Cell::Null, Cell::Null, Cell::Null],
            ],
        )?
        .declare("nation", ColumnKind::Text)
        .declare("seen_at", ColumnKind::Timestamp);

        let body = codec.encode(&ds, DataFormat::Parquet).await?;
        let back = codec.decode(&body, DataFormat::Parquet).await?;

        assert_eq!(back.declared_kind(0), Some(ColumnKind::Text));
        assert_eq!(back.declared_kind(1), Some(ColumnKind::Text));
        assert_eq!(back.inferred_kind(1), ColumnKind::Empty);
        assert_eq!(back.declared_kind(2), Some(ColumnKind::Timestamp));
        // undeclared all-null columns are written as text
        assert_eq!(back.declared_kind(3), Some(ColumnKind::Text));
        assert!(back.rows().iter().all(|r| r[1].is_null()));
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_schedule_dates_come_back_as_text() -> Result<()> {
        let codec = DataFusionCodec::new();
        let csv = "date,home_team,game_id\n2024-08-16,Manchester Utd,cc5b4244\n2099-01-01,Arsenal,ff00\n";
        let ds = codec.decode(csv.as_bytes(), DataFormat::Csv).await?;

        assert_eq!(ds.columns(), &["date", "home_team", "game_id"]);
        assert_eq!(ds.rows()[0][0].to_string(), "2024-08-16");
        assert_eq!(ds.rows()[1][1], Cell::Text("Arsenal".into()));
        Ok(())
    }

    #[tokio::test]
    async fn test_csv_encode_has_header() -> Result<()> {
        let codec = DataFusionCodec::new();
        let ds = Dataset::from_rows(
            ["home_team", "week"],
            vec![vec!["Arsenal".into(), Cell::Int(3)]],
        )?;
        let body = String::from_utf8(codec.encode(&ds, DataFormat::Csv).await?)?;
        assert_eq!(body, "home_team,week\nArsenal,3\n");
        Ok(())
    }

    #[tokio::test]
    async fn test_garbage_parquet_is_an_error() {
        let codec = DataFusionCodec::new();
        assert!(codec.decode(b"not parquet", DataFormat::Parquet).await.is_err());
    }
}
