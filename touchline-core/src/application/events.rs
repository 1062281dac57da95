// touchline-core/src/application/events.rs

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::application::clean::clean_object;
use crate::application::context::PipelineContext;
use crate::application::load::load_object;
use crate::domain::cleaning::CleaningRuleSet;
use crate::ports::codec::DataFormat;
use crate::ports::storage::ObjectRef;

/// Notification that an object was written to a bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageEvent {
    pub bucket: String,
    pub name: String,
}

impl StorageEvent {
    pub fn object(&self) -> ObjectRef {
        ObjectRef::new(self.bucket.clone(), self.name.clone())
    }
}

/// What a handler reports back to the trigger. Always 200: a failure is
/// logged, never surfaced as a retryable status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventResponse {
    pub status_code: u16,
    pub message: String,
}

impl EventResponse {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            message: message.into(),
        }
    }
}

fn parse_event(payload: &str) -> Result<StorageEvent, EventResponse> {
    serde_json::from_str(payload).map_err(|e| {
        error!(error = %e, "Unreadable storage event");
        EventResponse::ok(format!("Ignored unreadable event: {}", e))
    })
}

fn parquet_only(event: &StorageEvent) -> Result<ObjectRef, EventResponse> {
    if DataFormat::from_key(&event.name) != Some(DataFormat::Parquet) {
        info!(name = %event.name, "Skipping non-parquet object");
        return Err(EventResponse::ok(format!("Skipped non-parquet object {}", event.name)));
    }
    Ok(event.object())
}

/// Cleans the object named by the event into the cleaned bucket.
pub async fn handle_clean_event(
    ctx: &PipelineContext,
    rules: &CleaningRuleSet,
    payload: &str,
) -> EventResponse {
    let object = match parse_event(payload).and_then(|e| parquet_only(&e)) {
        Ok(object) => object,
        Err(response) => return response,
    };

    match clean_object(ctx, rules, &object).await {
        Ok(target) => EventResponse::ok(format!("Cleaned {} into {}", object, target)),
        Err(e) => {
            error!(object = %object, error = %e, "Clean event failed");
            EventResponse::ok(format!("Cleaning failed for {}: {}", object, e))
        }
    }
}

/// Appends the object named by the event to the staging table.
pub async fn handle_load_event(ctx: &PipelineContext, payload: &str) -> EventResponse {
    let object = match parse_event(payload).and_then(|e| parquet_only(&e)) {
        Ok(object) => object,
        Err(response) => return response,
    };

    if object.bucket != ctx.config.storage.cleaned_bucket {
        warn!(bucket = %object.bucket, "Load event outside the cleaned bucket");
    }

    match load_object(ctx, &object).await {
        Ok(rows) => EventResponse::ok(format!("Loaded {} rows from {}", rows, object)),
        Err(e) => {
            error!(object = %object, error = %e, "Load event failed");
            EventResponse::ok(format!("Load failed for {}: {}", object, e))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::application::context::testing::bed;
    use crate::domain::cleaning::DatasetRules;
    use crate::domain::dataset::{Cell, Dataset};
    use anyhow::Result;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn rules() -> CleaningRuleSet {
        CleaningRuleSet {
            datasets: BTreeMap::from([(
                "summary".to_string(),
                DatasetRules {
                    columns_to_keep: vec!["player".into()],
                    critical_columns: vec!["player".into()],
                },
            )]),
        }
    }

    fn event(bucket: &str, name: &str) -> String {
        json!({ "bucket": bucket, "name": name }).to_string()
    }

    #[tokio::test]
    async fn test_clean_then_load_events() -> Result<()> {
        let tb = bed();
        let key = "match_stats/match_id=m1/summary.parquet";
        let ds = Dataset::from_rows(["player", "min"], vec![vec!["Saka".into(), Cell::Int(90)]])?;
        tb.ctx.write_dataset(&tb.ctx.raw(key), &ds).await?;

        let res = handle_clean_event(&tb.ctx, &rules(), &event("football-raw-data", key)).await;
        assert_eq!(res.status_code, 200);
        assert!(tb.ctx.store.exists(&tb.ctx.cleaned(key)).await?);

        let res = handle_load_event(&tb.ctx, &event("football-cleaned-data", key)).await;
        assert_eq!(res.status_code, 200);
        assert!(res.message.starts_with("Loaded 1 rows"));
        Ok(())
    }

    #[tokio::test]
    async fn test_failures_still_answer_200() {
        let tb = bed();

        let skipped = handle_load_event(&tb.ctx, &event("football-cleaned-data", "a/b.csv")).await;
        assert_eq!(skipped.status_code, 200);
        assert!(skipped.message.contains("non-parquet"));

        let missing =
            handle_clean_event(&tb.ctx, &rules(), &event("football-raw-data", "x/summary.parquet"))
                .await;
        assert_eq!(missing.status_code, 200);
        assert!(missing.message.starts_with("Cleaning failed"));

        let garbage = handle_load_event(&tb.ctx, "{not json").await;
        assert_eq!(garbage.status_code, 200);
    }
}
