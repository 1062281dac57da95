// touchline-core/src/domain/project/configuration.rs

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::cleaning::MissingRulesPolicy;

/// Root of `touchline.yaml`.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct PipelineConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,

    #[validate(nested)]
    pub competition: CompetitionConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub warehouse: WarehouseConfig,

    #[validate(nested)]
    #[serde(default)]
    pub sources: SourcesConfig,

    #[validate(nested)]
    #[serde(default)]
    pub pacing: PacingConfig,

    #[validate(nested)]
    #[serde(default)]
    pub mapping: MappingConfig,

    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct CompetitionConfig {
    /// League name as the statistics provider spells it (ex: "ENG-Premier League").
    pub league: String,
    /// Season label (ex: "2024-25").
    pub season: String,
    /// Competition id on the market-value provider (ex: "GB1").
    #[serde(default)]
    pub market_id: Option<String>,
    /// Season id on the market-value provider (ex: "2024").
    #[serde(default)]
    pub market_season: Option<String>,
    #[validate(length(min = 1, message = "At least one stat type is required"))]
    #[serde(default = "default_stat_types")]
    pub stat_types: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    /// Directory holding one sub-directory per bucket.
    #[serde(default = "default_storage_root")]
    pub root: String,
    #[serde(default = "default_raw_bucket")]
    pub raw_bucket: String,
    #[serde(default = "default_cleaned_bucket")]
    pub cleaned_bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            raw_bucket: default_raw_bucket(),
            cleaned_bucket: default_cleaned_bucket(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RulesConfig {
    #[serde(default = "default_rules_path")]
    pub path: String,
    #[serde(default)]
    pub on_missing: MissingRulesPolicy,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            path: default_rules_path(),
            on_missing: MissingRulesPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WarehouseConfig {
    #[serde(default = "default_warehouse_path")]
    pub path: String,
    #[serde(default = "default_staging_table")]
    pub staging_table: String,
    #[serde(default = "default_team_mapping_table")]
    pub team_mapping_table: String,
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            path: default_warehouse_path(),
            staging_table: default_staging_table(),
            team_mapping_table: default_team_mapping_table(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct SourcesConfig {
    #[validate(url)]
    #[serde(default = "default_stats_url")]
    pub stats_base_url: String,
    #[validate(url)]
    #[serde(default = "default_market_url")]
    pub market_base_url: String,
    #[validate(range(min = 1, max = 600))]
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            stats_base_url: default_stats_url(),
            market_base_url: default_market_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Randomized delays between calls to external sources, in milliseconds.
#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
#[validate(schema(function = "validate_pacing_bounds"))]
pub struct PacingConfig {
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
    #[serde(default = "default_club_min_delay")]
    pub club_min_delay_ms: u64,
    #[serde(default = "default_club_max_delay")]
    pub club_max_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
            club_min_delay_ms: default_club_min_delay(),
            club_max_delay_ms: default_club_max_delay(),
        }
    }
}

fn validate_pacing_bounds(pacing: &PacingConfig) -> Result<(), ValidationError> {
    if pacing.min_delay_ms > pacing.max_delay_ms
        || pacing.club_min_delay_ms > pacing.club_max_delay_ms
    {
        return Err(ValidationError::new("pacing_min_above_max"));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Serialize, Clone, Validate)]
pub struct MappingConfig {
    /// Similarity (0-100) below which a team name is left unmatched.
    #[validate(range(min = 0.0, max = 100.0))]
    #[serde(default = "default_min_score")]
    pub min_score: f64,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
        }
    }
}

/// Object key templates (minijinja). Values are percent-encoded with the
/// `encode` filter.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LayoutConfig {
    #[serde(default = "default_schedule_layout")]
    pub schedule: String,
    #[serde(default = "default_match_stats_layout")]
    pub match_stats: String,
    #[serde(default = "default_clubs_layout")]
    pub clubs: String,
    #[serde(default = "default_players_layout")]
    pub players: String,
    #[serde(default = "default_failed_lookups_layout")]
    pub failed_lookups: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            schedule: default_schedule_layout(),
            match_stats: default_match_stats_layout(),
            clubs: default_clubs_layout(),
            players: default_players_layout(),
            failed_lookups: default_failed_lookups_layout(),
        }
    }
}

fn default_version() -> String {
    "0.1.0".to_string()
}
fn default_stat_types() -> Vec<String> {
    [
        "summary",
        "keepers",
        "passing",
        "passing_types",
        "defense",
        "possession",
        "misc",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_storage_root() -> String {
    "buckets".to_string()
}
fn default_raw_bucket() -> String {
    "football-raw-data".to_string()
}
fn default_cleaned_bucket() -> String {
    "football-cleaned-data".to_string()
}
fn default_rules_path() -> String {
    "configs/validate_config.yml".to_string()
}
fn default_warehouse_path() -> String {
    "touchline.duckdb".to_string()
}
fn default_staging_table() -> String {
    "players_stats.staging_stats_table".to_string()
}
fn default_team_mapping_table() -> String {
    "helpers.team_name_mapping".to_string()
}
fn default_stats_url() -> String {
    "http://localhost:8080".to_string()
}
fn default_market_url() -> String {
    "https://transfermarkt-api.fly.dev".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_min_delay() -> u64 {
    500
}
fn default_max_delay() -> u64 {
    1500
}
fn default_club_min_delay() -> u64 {
    1000
}
fn default_club_max_delay() -> u64 {
    2000
}
fn default_min_score() -> f64 {
    70.0
}
fn default_schedule_layout() -> String {
    "game_schedule/season={{ season | encode }}/league={{ league | encode }}/game_schedule_{{ season | encode }}_{{ league | encode }}.csv".to_string()
}
fn default_match_stats_layout() -> String {
    "match_stats/season={{ season | encode }}/league={{ league | encode }}/match_id={{ match_id | encode }}/{{ stat_type | encode }}.parquet".to_string()
}
fn default_clubs_layout() -> String {
    "teams_json/{{ competition | encode }}_clubs_{{ timestamp }}.json".to_string()
}
fn default_players_layout() -> String {
    "players_json/{{ competition | encode }}_players_{{ timestamp }}.json".to_string()
}
fn default_failed_lookups_layout() -> String {
    "players_json/{{ competition | encode }}_failed_market_values_{{ timestamp }}.json".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_gets_defaults() {
        let yaml = r#"
name: premier-league
competition:
  league: ENG-Premier League
  season: 2024-25
"#;
        let cfg: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.competition.stat_types.len(), 7);
        assert_eq!(cfg.storage.raw_bucket, "football-raw-data");
        assert_eq!(cfg.rules.on_missing, MissingRulesPolicy::Fail);
        assert!((cfg.mapping.min_score - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_inverted_pacing_is_rejected() {
        let yaml = r#"
name: x
competition: { league: L, season: S }
pacing: { min_delay_ms: 900, max_delay_ms: 100 }
"#;
        let cfg: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_score_out_of_range_is_rejected() {
        let yaml = r#"
name: x
competition: { league: L, season: S }
mapping: { min_score: 140 }
"#;
        let cfg: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_empty_stat_types_is_rejected() {
        let yaml = r#"
name: x
competition: { league: L, season: S, stat_types: [] }
"#;
        let cfg: PipelineConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.validate().is_err());
    }
}
