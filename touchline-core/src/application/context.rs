// touchline-core/src/application/context.rs

use std::sync::Arc;

use crate::domain::dataset::Dataset;
use crate::domain::project::PipelineConfig;
use crate::error::TouchlineError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::layout::StorageLayout;
use crate::infrastructure::throttle::Throttle;
use crate::ports::codec::{DataFormat, DatasetCodec};
use crate::ports::lookup::LookupStore;
use crate::ports::storage::{ObjectRef, ObjectStore};
use crate::ports::warehouse::Warehouse;

/// Clients and configuration shared by every use case. Built once by the
/// caller and passed down explicitly.
pub struct PipelineContext {
    pub config: PipelineConfig,
    pub layout: StorageLayout,
    pub store: Arc<dyn ObjectStore>,
    pub codec: Arc<dyn DatasetCodec>,
    pub warehouse: Arc<dyn Warehouse>,
    pub lookup: Arc<dyn LookupStore>,
}

impl PipelineContext {
    pub fn new(
        config: PipelineConfig,
        store: Arc<dyn ObjectStore>,
        codec: Arc<dyn DatasetCodec>,
        warehouse: Arc<dyn Warehouse>,
        lookup: Arc<dyn LookupStore>,
    ) -> Result<Self, TouchlineError> {
        let layout = StorageLayout::new(&config.layout)?;
        Ok(Self {
            config,
            layout,
            store,
            codec,
            warehouse,
            lookup,
        })
    }

    pub fn raw(&self, key: impl Into<String>) -> ObjectRef {
        ObjectRef::new(self.config.storage.raw_bucket.clone(), key)
    }

    pub fn cleaned(&self, key: impl Into<String>) -> ObjectRef {
        ObjectRef::new(self.config.storage.cleaned_bucket.clone(), key)
    }

    pub fn call_throttle(&self) -> Throttle {
        Throttle::between_calls(&self.config.pacing)
    }

    pub fn club_throttle(&self) -> Throttle {
        Throttle::between_clubs(&self.config.pacing)
    }

    /// Reads a stored dataset, the format coming from the key extension.
    pub async fn read_dataset(&self, object: &ObjectRef) -> Result<Dataset, TouchlineError> {
        let format = format_of(object)?;
        let body = self.store.get(object).await?;
        self.codec.decode(&body, format).await
    }

    pub async fn write_dataset(
        &self,
        object: &ObjectRef,
        dataset: &Dataset,
    ) -> Result<(), TouchlineError> {
        let format = format_of(object)?;
        let body = self.codec.encode(dataset, format).await?;
        self.store.put(object, &body).await
    }

    pub async fn write_json<T: serde::Serialize + Sync>(
        &self,
        object: &ObjectRef,
        value: &T,
    ) -> Result<(), TouchlineError> {
        let body = serde_json::to_vec_pretty(value).map_err(InfrastructureError::from)?;
        self.store.put(object, &body).await
    }
}

fn format_of(object: &ObjectRef) -> Result<DataFormat, TouchlineError> {
    DataFormat::from_key(&object.key)
        .ok_or_else(|| InfrastructureError::UnsupportedFormat(object.to_string()).into())
}

/// In-memory fakes and a ready-made context for use-case tests.
#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
pub(crate) mod testing {
    use super::*;
    use crate::domain::dataset::Cell;
    use crate::domain::schedule::Fixture;
    use crate::ports::source::StatsSource;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use crate::domain::project::{PacingConfig, PipelineConfig};
    use crate::infrastructure::adapters::{DataFusionCodec, DuckDbConnector, LocalObjectStore};
    use tempfile::TempDir;

    pub struct TestBed {
        pub ctx: PipelineContext,
        pub db: Arc<DuckDbConnector>,
        _dir: TempDir,
    }

    pub fn config() -> PipelineConfig {
        let mut cfg: PipelineConfig = serde_yaml::from_str(
            "name: test\ncompetition: { league: ENG-Premier League, season: 2024-25, market_id: GB1, market_season: '2024', stat_types: [summary, keepers] }\n",
        )
        .unwrap();
        cfg.pacing = PacingConfig {
            min_delay_ms: 0,
            max_delay_ms: 0,
            club_min_delay_ms: 0,
            club_max_delay_ms: 0,
        };
        cfg
    }

    pub fn bed() -> TestBed {
        bed_with(config())
    }

    pub fn bed_with(config: PipelineConfig) -> TestBed {
        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(DuckDbConnector::new(":memory:").unwrap());
        let ctx = PipelineContext::new(
            config,
            Arc::new(LocalObjectStore::new(dir.path())),
            Arc::new(DataFusionCodec::new()),
            db.clone(),
            db.clone(),
        )
        .unwrap();
        TestBed { ctx, db, _dir: dir }
    }

    pub fn text(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    pub fn fixture(date: &str, home: &str, away: &str, game_id: &str) -> Fixture {
        Fixture {
            league: String::new(),
            season: String::new(),
            week: None,
            date: date.to_string(),
            time: None,
            home_team: home.to_string(),
            away_team: away.to_string(),
            score: None,
            venue: None,
            game_id: game_id.to_string(),
        }
    }

    /// Statistics source serving canned data and recording calls.
    #[derive(Default)]
    pub struct FakeStats {
        pub fixtures: Vec<Fixture>,
        pub tables: HashMap<(String, String), Dataset>,
        pub calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl StatsSource for FakeStats {
        async fn schedule(
            &self,
            _league: &str,
            _season: &str,
        ) -> Result<Vec<Fixture>, TouchlineError> {
            Ok(self.fixtures.clone())
        }

        async fn player_stats(
            &self,
            match_id: &str,
            stat_type: &str,
        ) -> Result<Dataset, TouchlineError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("{}/{}", match_id, stat_type));
            self.tables
                .get(&(match_id.to_string(), stat_type.to_string()))
                .cloned()
                .ok_or_else(|| TouchlineError::InternalError("upstream 500".to_string()))
        }
    }
}
