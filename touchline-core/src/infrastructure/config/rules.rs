// touchline-core/src/infrastructure/config/rules.rs

use std::path::Path;
use tracing::{info, instrument};

use crate::domain::cleaning::CleaningRuleSet;
use crate::infrastructure::config::project::load_fragment;
use crate::infrastructure::error::InfrastructureError;

/// Loads the cleaning rule set. A missing file is a configuration error:
/// without rules nothing can be cleaned.
#[instrument]
pub fn load_rules(path: &Path) -> Result<CleaningRuleSet, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(format!(
            "Cleaning rules file {:?} does not exist",
            path
        )));
    }
    let rules: CleaningRuleSet = load_fragment(path)?;
    info!(
        datasets = rules.datasets.len(),
        "  ✅ Cleaning rules loaded"
    );
    Ok(rules)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_rules_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("validate_config.yml");
        fs::write(
            &path,
            "datasets:\n  summary:\n    columns_to_keep: [player, team]\n    critical_columns: [player]\n",
        )?;

        let rules = load_rules(&path)?;
        assert_eq!(rules.dataset_types().collect::<Vec<_>>(), vec!["summary"]);
        Ok(())
    }

    #[test]
    fn test_missing_rules_file() {
        let err = load_rules(Path::new("/nonexistent/validate_config.yml")).unwrap_err();
        assert!(matches!(err, InfrastructureError::ConfigNotFound(_)));
    }

    #[test]
    fn test_malformed_rules_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("validate_config.yml");
        fs::write(&path, "datasets:\n  summary: [not, a, mapping\n")?;
        assert!(matches!(
            load_rules(&path).unwrap_err(),
            InfrastructureError::YamlError(_)
        ));
        Ok(())
    }
}
