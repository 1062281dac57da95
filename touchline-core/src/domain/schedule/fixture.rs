// touchline-core/src/domain/schedule/fixture.rs

use serde::{Deserialize, Serialize};

use crate::domain::dataset::{Cell, Dataset};

pub const DATE_COLUMN: &str = "date";
pub const MATCH_ID_COLUMN: &str = "game_id";
pub const HOME_TEAM_COLUMN: &str = "home_team";

/// One scheduled match as published by the statistics source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fixture {
    #[serde(default)]
    pub league: String,
    #[serde(default)]
    pub season: String,
    #[serde(default)]
    pub week: Option<i64>,
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub venue: Option<String>,
    pub game_id: String,
}

const COLUMNS: [&str; 10] = [
    "league",
    "season",
    "week",
    DATE_COLUMN,
    "time",
    HOME_TEAM_COLUMN,
    "away_team",
    "score",
    "venue",
    MATCH_ID_COLUMN,
];

/// Lays fixtures out as the schedule table written to raw storage.
pub fn fixtures_to_dataset(fixtures: &[Fixture]) -> Dataset {
    let rows = fixtures
        .iter()
        .map(|f| {
            vec![
                Cell::from(f.league.as_str()),
                Cell::from(f.season.as_str()),
                Cell::from(f.week),
                Cell::from(f.date.as_str()),
                Cell::from(f.time.clone()),
                Cell::from(f.home_team.as_str()),
                Cell::from(f.away_team.as_str()),
                Cell::from(f.score.clone()),
                Cell::from(f.venue.clone()),
                Cell::from(f.game_id.as_str()),
            ]
        })
        .collect();
    Dataset::from_parts(COLUMNS.iter().map(|c| c.to_string()).collect(), rows)
}
