// touchline-core/src/application/load.rs

use chrono::Utc;
use tracing::{error, info, instrument};

use crate::application::context::PipelineContext;
use crate::application::report::{BatchReport, UnitFailure};
use crate::domain::cleaning::warehouse_column_name;
use crate::domain::dataset::Cell;
use crate::error::TouchlineError;
use crate::infrastructure::layout::dataset_name;
use crate::ports::codec::DataFormat;
use crate::ports::storage::ObjectRef;

pub const SOURCE_FILE_COLUMN: &str = "source_file";
pub const INGESTION_TIMESTAMP_COLUMN: &str = "ingestion_timestamp";

/// Appends a cleaned object to the staging table, tagging every row with the
/// file it came from and the ingestion time.
#[instrument(skip(ctx), fields(object = %object))]
pub async fn load_object(ctx: &PipelineContext, object: &ObjectRef) -> Result<usize, TouchlineError> {
    let mut dataset = ctx.read_dataset(object).await?;
    dataset.rename_columns(warehouse_column_name);

    let dataset = dataset
        .with_constant_column(SOURCE_FILE_COLUMN, Cell::from(dataset_name(&object.key)))
        .with_constant_column(INGESTION_TIMESTAMP_COLUMN, Cell::Timestamp(Utc::now()));

    let table = &ctx.config.warehouse.staging_table;
    let written = ctx.warehouse.append(table, &dataset).await?;
    info!(table = %table, rows = written, "📥 Loaded into warehouse");
    Ok(written)
}

/// Loads every Parquet object under `prefix` in the cleaned bucket.
pub async fn load_prefix(ctx: &PipelineContext, prefix: &str) -> Result<BatchReport, TouchlineError> {
    let keys = ctx
        .store
        .list(&ctx.config.storage.cleaned_bucket, prefix)
        .await?;
    info!(prefix, objects = keys.len(), "Loading batch");

    let mut report = BatchReport::default();
    for key in keys {
        if DataFormat::from_key(&key) != Some(DataFormat::Parquet) {
            report.skipped.push(key);
            continue;
        }
        match load_object(ctx, &ctx.cleaned(key.clone())).await {
            Ok(_) => report.succeeded.push(key),
            Err(e) => {
                error!(key = %key, error = %e, "Load failed");
                report.failed.push(UnitFailure::new(key, e));
            }
        }
    }
    info!(%report, "Loading batch finished");
    Ok(report)
}
