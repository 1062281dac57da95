// touchline-core/src/infrastructure/adapters/transfermarkt.rs

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::error::TouchlineError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::source::{Club, MarketSource, SquadPlayer};

/// Client for a Transfermarkt-style REST API (ex: transfermarkt-api.fly.dev).
pub struct TransfermarktClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ClubsResponse {
    #[serde(default)]
    clubs: Vec<Club>,
}

#[derive(Debug, Deserialize)]
struct PlayersResponse {
    #[serde(default)]
    players: Vec<SquadPlayer>,
}

impl TransfermarktClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(
                [(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                )]
                .into_iter()
                .collect(),
            )
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, segments: &[&str]) -> String {
        let path: Vec<String> = segments
            .iter()
            .map(|s| urlencoding::encode(s).into_owned())
            .collect();
        format!("{}/{}", self.base_url, path.join("/"))
    }
}

#[async_trait]
impl MarketSource for TransfermarktClient {
    #[instrument(skip(self))]
    async fn clubs(&self, competition: &str, season: &str) -> Result<Vec<Club>, TouchlineError> {
        let url = self.url(&["competitions", competition, "clubs"]);
        let response: ClubsResponse = self
            .client
            .get(&url)
            .query(&[("season_id", season)])
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(InfrastructureError::from)?
            .json()
            .await
            .map_err(InfrastructureError::from)?;
        info!(clubs = response.clubs.len(), "Clubs fetched");
        Ok(response.clubs)
    }

    #[instrument(skip(self))]
    async fn club_players(&self, club_id: &str) -> Result<Vec<SquadPlayer>, TouchlineError> {
        let url = self.url(&["clubs", club_id, "players"]);
        let response: PlayersResponse = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(InfrastructureError::from)?
            .json()
            .await
            .map_err(InfrastructureError::from)?;
        debug!(players = response.players.len(), "Squad fetched");
        Ok(response.players)
    }

    async fn market_value(&self, player_id: &str) -> Result<Option<Value>, TouchlineError> {
        let url = self.url(&["players", player_id, "market_value"]);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(InfrastructureError::from)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let doc: Value = response
            .error_for_status()
            .map_err(InfrastructureError::from)?
            .json()
            .await
            .map_err(InfrastructureError::from)?;

        let empty = doc.is_null() || doc.as_object().is_some_and(|o| o.is_empty());
        Ok(if empty { None } else { Some(doc) })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::test_http::serve;
    use anyhow::Result;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_clubs_players_and_values() -> Result<()> {
        let routes = HashMap::from([
            (
                "/competitions/GB1/clubs?season_id=2024".to_string(),
                (
                    200,
                    r#"{"id":"GB1","clubs":[{"id":"11","name":"Arsenal FC","marketValue":1180000000},{"name":"No Id"}]}"#
                        .to_string(),
                ),
            ),
            (
                "/clubs/11/players".to_string(),
                (
                    200,
                    r#"{"players":[{"id":"433177","name":"Bukayo Saka","position":"Right Winger"}]}"#
                        .to_string(),
                ),
            ),
            (
                "/players/433177/market_value".to_string(),
                (
                    200,
                    r#"{"marketValueHistory":[{"marketValue":140000000,"date":"2024-12-16"}]}"#
                        .to_string(),
                ),
            ),
        ]);
        let server = serve(routes).await?;
        let client = TransfermarktClient::new(&server.base_url, Duration::from_secs(5))?;

        let clubs = client.clubs("GB1", "2024").await?;
        assert_eq!(clubs.len(), 2);
        assert_eq!(clubs[0].id.as_deref(), Some("11"));
        assert!(clubs[1].id.is_none());
        assert_eq!(clubs[0].extra["marketValue"], 1180000000_i64);

        let players = client.club_players("11").await?;
        assert_eq!(players[0].name.as_deref(), Some("Bukayo Saka"));
        assert_eq!(players[0].extra["position"], "Right Winger");

        assert!(client.market_value("433177").await?.is_some());
        assert!(client.market_value("999").await?.is_none());
        assert_eq!(
            server.paths(),
            vec![
                "/competitions/GB1/clubs?season_id=2024".to_string(),
                "/clubs/11/players".to_string(),
                "/players/433177/market_value".to_string(),
                "/players/999/market_value".to_string(),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_server_error_is_propagated() -> Result<()> {
        let routes = HashMap::from([(
            "/clubs/11/players".to_string(),
            (503, "{}".to_string()),
        )]);
        let server = serve(routes).await?;
        let client = TransfermarktClient::new(&server.base_url, Duration::from_secs(5))?;
        assert!(client.club_players("11").await.is_err());
        Ok(())
    }
}
