// touchline-core/src/infrastructure/layout.rs

use chrono::{DateTime, TimeZone};
use minijinja::{Environment, Value, context};

use crate::domain::project::LayoutConfig;
use crate::infrastructure::error::InfrastructureError;

/// Renders object keys from the configured minijinja templates.
///
/// Every template gets an `encode` filter that percent-encodes a path
/// component, so `ENG-Premier League` is stored as `ENG-Premier%20League`.
pub struct StorageLayout {
    env: Environment<'static>,
    templates: LayoutConfig,
}

impl StorageLayout {
    pub fn new(templates: &LayoutConfig) -> Result<Self, InfrastructureError> {
        let mut env = Environment::new();
        env.add_filter("encode", |value: &Value| -> String {
            urlencoding::encode(&value.to_string()).into_owned()
        });

        // Surface syntax errors at startup rather than mid-run
        for source in [
            &templates.schedule,
            &templates.match_stats,
            &templates.clubs,
            &templates.players,
            &templates.failed_lookups,
        ] {
            env.render_str(source, context! {})?;
        }

        Ok(Self {
            env,
            templates: templates.clone(),
        })
    }

    pub fn schedule_key(&self, season: &str, league: &str) -> Result<String, InfrastructureError> {
        self.render(&self.templates.schedule, context! { season, league })
    }

    pub fn match_stats_key(
        &self,
        season: &str,
        league: &str,
        match_id: &str,
        stat_type: &str,
    ) -> Result<String, InfrastructureError> {
        self.render(
            &self.templates.match_stats,
            context! { season, league, match_id, stat_type },
        )
    }

    pub fn clubs_key(&self, competition: &str, timestamp: &str) -> Result<String, InfrastructureError> {
        self.render(&self.templates.clubs, context! { competition, timestamp })
    }

    pub fn players_key(
        &self,
        competition: &str,
        timestamp: &str,
    ) -> Result<String, InfrastructureError> {
        self.render(&self.templates.players, context! { competition, timestamp })
    }

    pub fn failed_lookups_key(
        &self,
        competition: &str,
        timestamp: &str,
    ) -> Result<String, InfrastructureError> {
        self.render(&self.templates.failed_lookups, context! { competition, timestamp })
    }

    fn render(&self, template: &str, ctx: Value) -> Result<String, InfrastructureError> {
        let key = self.env.render_str(template, ctx)?;
        Ok(key.trim().trim_start_matches('/').to_string())
    }
}

/// File name of a key without directories and extensions:
/// `match_stats/.../passing_types.parquet` -> `passing_types`.
pub fn dataset_name(key: &str) -> &str {
    let file = key.trim_end_matches('/').rsplit('/').next().unwrap_or(key);
    file.split('.').next().unwrap_or(file)
}

/// Timestamp used in snapshot keys, e.g. `20250312_155944`.
pub fn snapshot_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y%m%d_%H%M%S").to_string()
}
