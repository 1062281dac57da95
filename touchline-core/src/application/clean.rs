// touchline-core/src/application/clean.rs

use tracing::{error, info, instrument};

use crate::application::context::PipelineContext;
use crate::application::report::{BatchReport, UnitFailure};
use crate::domain::cleaning::{CleaningRuleSet, DatasetCleaner};
use crate::error::TouchlineError;
use crate::infrastructure::layout::dataset_name;
use crate::ports::codec::DataFormat;
use crate::ports::storage::ObjectRef;

/// Cleans one raw object and writes the result under the same key in the
/// cleaned bucket. The dataset type is the object's file name
/// (`.../passing.parquet` -> `passing`).
///
/// Nothing is written when cleaning fails.
#[instrument(skip(ctx, rules), fields(object = %source))]
pub async fn clean_object(
    ctx: &PipelineContext,
    rules: &CleaningRuleSet,
    source: &ObjectRef,
) -> Result<ObjectRef, TouchlineError> {
    let dataset_type = dataset_name(&source.key);
    let raw = ctx.read_dataset(source).await?;

    let cleaner = DatasetCleaner::new(rules, ctx.config.rules.on_missing);
    let cleaned = cleaner.clean(&raw, dataset_type)?;

    let target = source.in_bucket(&ctx.config.storage.cleaned_bucket);
    ctx.write_dataset(&target, &cleaned).await?;
    info!(target = %target, rows = cleaned.num_rows(), "Cleaned dataset stored");
    Ok(target)
}

/// Cleans every Parquet object under `prefix` in the raw bucket. One
/// dataset's failure is recorded and the batch carries on.
pub async fn clean_prefix(
    ctx: &PipelineContext,
    rules: &CleaningRuleSet,
    prefix: &str,
) -> Result<BatchReport, TouchlineError> {
    let keys = ctx
        .store
        .list(&ctx.config.storage.raw_bucket, prefix)
        .await?;
    info!(prefix, objects = keys.len(), "🧹 Cleaning batch");

    let mut report = BatchReport::default();
    for key in keys {
        if DataFormat::from_key(&key) != Some(DataFormat::Parquet) {
            report.skipped.push(key);
            continue;
        }
        match clean_object(ctx, rules, &ctx.raw(key.clone())).await {
            Ok(_) => report.succeeded.push(key),
            Err(e) => {
                error!(key = %key, error = %e, "Cleaning failed");
                report.failed.push(UnitFailure::new(key, e));
            }
        }
    }
    info!(%report, "Cleaning batch finished");
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::context::testing::{bed, text};
    use crate::domain::cleaning::DatasetRules;
    use crate::domain::dataset::{Cell, ColumnKind, Dataset};
    use crate::domain::error::DomainError;
    use anyhow::Result;
    use std::collections::BTreeMap;

    fn rules() -> CleaningRuleSet {
        CleaningRuleSet {
            datasets: BTreeMap::from([(
                "summary".to_string(),
                DatasetRules {
                    columns_to_keep: vec!["player".into(), "Performance_Gls".into()],
                    critical_columns: vec!["player".into()],
                },
            )]),
        }
    }

    fn raw_summary(player: Cell) -> Dataset {
        Dataset::from_rows(
            ["('player', '')", "('Performance', 'Gls')", "('team', '')"],
            vec![
                vec![player, Cell::Null, "Arsenal".into()],
                [text(&["Rice"]), vec![Cell::Int(1)], text(&["Arsenal"])].concat(),
            ],
        )
        .unwrap()
    }

    const KEY: &str = "match_stats/season=2024-25/match_id=m1/summary.parquet";

    #[tokio::test]
    async fn test_clean_object_mirrors_key_into_cleaned_bucket() -> Result<()> {
        let tb = bed();
        let source = tb.ctx.raw(KEY);
        tb.ctx.write_dataset(&source, &raw_summary("Saka".into())).await?;

        let target = clean_object(&tb.ctx, &rules(), &source).await?;
        assert_eq!(target, ObjectRef::new("football-cleaned-data", KEY));

        let cleaned = tb.ctx.read_dataset(&target).await?;
        assert_eq!(cleaned.columns(), &["player", "Performance_Gls"]);
        assert_eq!(cleaned.rows()[0][1], Cell::Int(0));
        Ok(())
    }

    #[tokio::test]
    async fn test_all_null_text_column_is_cleaned_to_empty_strings() -> Result<()> {
        let tb = bed();
        let rules = CleaningRuleSet {
            datasets: BTreeMap::from([(
                "summary".to_string(),
                DatasetRules {
                    columns_to_keep: vec!["player".into(), "nation".into()],
                    critical_columns: vec!["player".into()],
                },
            )]),
        };
        let raw = Dataset::from_rows(
            ["('player', '')", "('nation', '')"],
            vec![text(&["Saka"]), text(&["Rice"])]
                .into_iter()
                .map(|mut row| {
                    row.push(Cell::Null);
                    row
                })
                .collect(),
        )?
        .declare("('nation', '')", ColumnKind::Text);
        let source = tb.ctx.raw(KEY);
        tb.ctx.write_dataset(&source, &raw).await?;

        let target = clean_object(&tb.ctx, &rules, &source).await?;
        let cleaned = tb.ctx.read_dataset(&target).await?;

        assert_eq!(cleaned.rows()[0][1], Cell::Text(String::new()));
        assert_eq!(cleaned.rows()[1][1], Cell::Text(String::new()));
        assert_eq!(cleaned.column_kind(1), ColumnKind::Text);
        Ok(())
    }

    #[tokio::test]
    async fn test_critical_nulls_write_nothing() -> Result<()> {
        let tb = bed();
        let source = tb.ctx.raw(KEY);
        tb.ctx.write_dataset(&source, &raw_summary(Cell::Null)).await?;

        let err = clean_object(&tb.ctx, &rules(), &source).await.unwrap_err();
        assert!(matches!(
            err,
            TouchlineError::Domain(DomainError::CriticalNulls { .. })
        ));
        assert!(!tb.ctx.store.exists(&tb.ctx.cleaned(KEY)).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_batch_continues_after_a_failure() -> Result<()> {
        let tb = bed();
        let good = tb.ctx.raw("match_stats/m=1/summary.parquet");
        let bad = tb.ctx.raw("match_stats/m=2/summary.parquet");
        let unknown = tb.ctx.raw("match_stats/m=2/keepers.parquet");
        tb.ctx.write_dataset(&good, &raw_summary("Saka".into())).await?;
        tb.ctx.write_dataset(&bad, &raw_summary(Cell::Null)).await?;
        tb.ctx.write_dataset(&unknown, &raw_summary("Raya".into())).await?;
        tb.ctx.store.put(&tb.ctx.raw("match_stats/notes.txt"), b"hi").await?;

        let report = clean_prefix(&tb.ctx, &rules(), "match_stats/").await?;
        assert_eq!(report.succeeded, vec!["match_stats/m=1/summary.parquet".to_string()]);
        assert_eq!(report.skipped, vec!["match_stats/notes.txt".to_string()]);
        // critical nulls + no rules for "keepers"
        assert_eq!(report.failed.len(), 2);
        assert!(!report.is_success());
        Ok(())
    }
}
