// touchline-core/src/infrastructure/adapters/stats_api.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, instrument};

use crate::domain::dataset::{Cell, Dataset};
use crate::domain::schedule::Fixture;
use crate::error::TouchlineError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::StatsSource;

/// Statistics provider behind a small JSON API:
/// `GET /schedule?league=..&season=..` and
/// `GET /matches/{id}/player-stats?stat_type=..`.
pub struct HttpStatsSource {
    client: Client,
    base_url: String,
}

/// Player stats as a column list plus positional rows.
#[derive(Debug, Deserialize)]
struct StatsTable {
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
}

impl HttpStatsSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("touchline/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, InfrastructureError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

pub(crate) fn json_cell(value: Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Bool(b) => Cell::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => n.as_f64().map(Cell::Float).unwrap_or(Cell::Null),
        },
        Value::String(s) => Cell::Text(s),
        other => Cell::Text(other.to_string()),
    }
}

fn table_to_dataset(table: StatsTable) -> Result<Dataset, TouchlineError> {
    let rows = table
        .rows
        .into_iter()
        .map(|row| row.into_iter().map(json_cell).collect())
        .collect();
    Ok(Dataset::from_rows(table.columns, rows)?)
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    #[instrument(skip(self))]
    async fn schedule(&self, league: &str, season: &str) -> Result<Vec<Fixture>, TouchlineError> {
        let url = format!("{}/schedule", self.base_url);
        let mut fixtures: Vec<Fixture> = self
            .get_json(&url, &[("league", league), ("season", season)])
            .await?;

        // The API omits these when they equal the query
        for f in fixtures.iter_mut() {
            if f.league.is_empty() {
                f.league = league.to_string();
            }
            if f.season.is_empty() {
                f.season = season.to_string();
            }
        }
        info!(fixtures = fixtures.len(), "Schedule fetched");
        Ok(fixtures)
    }

    #[instrument(skip(self))]
    async fn player_stats(
        &self,
        match_id: &str,
        stat_type: &str,
    ) -> Result<Dataset, TouchlineError> {
        let url = format!(
            "{}/matches/{}/player-stats",
            self.base_url,
            urlencoding::encode(match_id)
        );
        let table: StatsTable = self.get_json(&url, &[("stat_type", stat_type)]).await?;
        table_to_dataset(table)
    }
}
