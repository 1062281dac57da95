// touchline-core/src/infrastructure/config/project.rs

use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::PipelineConfig;
use crate::infrastructure::error::InfrastructureError;

const CONFIG_CANDIDATES: [&str; 2] = ["touchline.yaml", "touchline.yml"];

/// Loads `touchline.yaml` from `project_dir`, applies `TOUCHLINE_*` environment
/// overrides, validates it and resolves relative paths against `project_dir`.
#[instrument(skip(project_dir))]
pub fn load_pipeline_config(project_dir: &Path) -> Result<PipelineConfig, InfrastructureError> {
    // 1. Discovery
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading pipeline configuration");

    // 2. YAML
    let mut config: PipelineConfig = load_fragment(&config_path)?;

    // 3. Layering: TOUCHLINE_SEASON=2023-24 touchline fetch-schedule
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    // 4. Validation after overrides, so an override cannot sneak in a bad value
    config
        .validate()
        .map_err(|e| InfrastructureError::ConfigError(format!("{}: {}", config_path.display(), e)))?;

    resolve_paths(&mut config, project_dir);
    Ok(config)
}

pub(crate) fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, CONFIG_CANDIDATES
    )))
}

/// Reads one typed YAML document.
pub(crate) fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path).map_err(|e| {
        InfrastructureError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
    })?;
    serde_yaml::from_str(&content).map_err(InfrastructureError::from)
}

fn apply_env_overrides<F>(config: &mut PipelineConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("TOUCHLINE_STORAGE_ROOT") {
        info!(old = ?config.storage.root, new = ?val, "Overriding storage root via ENV");
        config.storage.root = val;
    }
    if let Some(val) = lookup("TOUCHLINE_WAREHOUSE_PATH") {
        info!(old = ?config.warehouse.path, new = ?val, "Overriding warehouse path via ENV");
        config.warehouse.path = val;
    }
    if let Some(val) = lookup("TOUCHLINE_SEASON") {
        info!(old = ?config.competition.season, new = ?val, "Overriding season via ENV");
        config.competition.season = val;
    }
    if let Some(val) = lookup("TOUCHLINE_LEAGUE") {
        info!(old = ?config.competition.league, new = ?val, "Overriding league via ENV");
        config.competition.league = val;
    }
}

fn resolve_paths(config: &mut PipelineConfig, project_dir: &Path) {
    let resolve = |value: &str| -> String {
        let p = Path::new(value);
        if p.is_absolute() {
            value.to_string()
        } else {
            project_dir.join(p).to_string_lossy().into_owned()
        }
    };
    config.storage.root = resolve(&config.storage.root);
    config.rules.path = resolve(&config.rules.path);
    if config.warehouse.path != ":memory:" {
        config.warehouse.path = resolve(&config.warehouse.path);
    }
}
