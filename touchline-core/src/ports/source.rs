// touchline-core/src/ports/source.rs

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::dataset::Dataset;
use crate::domain::schedule::Fixture;
use crate::error::TouchlineError;

/// Match statistics provider (schedules and per-match player stats).
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn schedule(&self, league: &str, season: &str) -> Result<Vec<Fixture>, TouchlineError>;

    async fn player_stats(
        &self,
        match_id: &str,
        stat_type: &str,
    ) -> Result<Dataset, TouchlineError>;
}

/// A club as listed by the market-value provider. Other provider fields
/// are kept so the clubs snapshot holds the full document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A squad member. Provider fields we do not use are carried through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadPlayer {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Market-value provider (clubs, squads, value histories).
#[async_trait]
pub trait MarketSource: Send + Sync {
    async fn clubs(&self, competition: &str, season: &str) -> Result<Vec<Club>, TouchlineError>;

    async fn club_players(&self, club_id: &str) -> Result<Vec<SquadPlayer>, TouchlineError>;

    /// Raw market-value document; `None` when the provider has nothing.
    async fn market_value(&self, player_id: &str) -> Result<Option<Value>, TouchlineError>;
}
