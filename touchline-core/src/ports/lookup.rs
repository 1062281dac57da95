// touchline-core/src/ports/lookup.rs

use async_trait::async_trait;

use crate::domain::mapping::{PlayerRecord, TeamNameSource};
use crate::error::TouchlineError;

/// Single-item get/put store for team identifiers, name aliases and players.
///
/// Team ids and team names are both unique; inserting a duplicate of either
/// is an error.
#[async_trait]
pub trait LookupStore: Send + Sync {
    async fn team_id(&self, team_name: &str) -> Result<Option<i64>, TouchlineError>;

    async fn max_team_id(&self) -> Result<Option<i64>, TouchlineError>;

    async fn insert_team(&self, team_id: i64, team_name: &str) -> Result<(), TouchlineError>;

    /// Creates or overwrites the alias.
    async fn put_alias(
        &self,
        source: TeamNameSource,
        alias: &str,
        team_id: i64,
    ) -> Result<(), TouchlineError>;

    async fn resolve_alias(
        &self,
        source: TeamNameSource,
        alias: &str,
    ) -> Result<Option<i64>, TouchlineError>;

    /// Every alias registered for `source`, sorted by alias.
    async fn aliases(&self, source: TeamNameSource) -> Result<Vec<(String, i64)>, TouchlineError>;

    /// Creates or overwrites the player keyed by (team_id, player_name).
    async fn put_player(&self, player: &PlayerRecord) -> Result<(), TouchlineError>;

    async fn players(&self, team_id: i64) -> Result<Vec<PlayerRecord>, TouchlineError>;
}
