// touchline-core/src/domain/mapping/team.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::dataset::{Cell, Dataset};

/// Which provider a team name variant comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamNameSource {
    /// The match statistics provider (schedule and player stats).
    Stats,
    /// The market-value provider (clubs and squads).
    Market,
}

impl TeamNameSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeamNameSource::Stats => "stats",
            TeamNameSource::Market => "market",
        }
    }
}

impl fmt::Display for TeamNameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of matching one market club against the stats provider's names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMapping {
    pub club_id: Option<String>,
    pub team_name_market: String,
    pub team_name_stats: Option<String>,
    pub team_id: Option<i64>,
    pub match_score: Option<f64>,
}

impl TeamMapping {
    pub fn is_matched(&self) -> bool {
        self.team_name_stats.is_some()
    }
}

pub fn mappings_to_dataset(mappings: &[TeamMapping]) -> Dataset {
    let rows = mappings
        .iter()
        .map(|m| {
            vec![
                Cell::from(m.club_id.clone()),
                Cell::from(m.team_name_market.as_str()),
                Cell::from(m.team_name_stats.clone()),
                Cell::from(m.team_id),
                Cell::from(m.match_score),
            ]
        })
        .collect();
    Dataset::from_parts(
        [
            "club_id",
            "team_name_market",
            "team_name_stats",
            "team_id",
            "match_score",
        ]
        .iter()
        .map(|c| c.to_string())
        .collect(),
        rows,
    )
}

/// A player seen in a match dataset, keyed by (team_id, player_name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub team_id: i64,
    pub player_name: String,
    pub jersey_number: Option<i64>,
    pub game_time: Option<String>,
}
