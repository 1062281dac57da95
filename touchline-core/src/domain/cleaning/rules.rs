// touchline-core/src/domain/cleaning/rules.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per dataset-type cleaning rules, as written in the rules YAML:
///
/// ```yaml
/// datasets:
///   passing:
///     columns_to_keep: [player, team, Total_Cmp]
///     critical_columns: [player]
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct CleaningRuleSet {
    #[serde(default)]
    pub datasets: BTreeMap<String, DatasetRules>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct DatasetRules {
    #[serde(default)]
    pub columns_to_keep: Vec<String>,
    #[serde(default)]
    pub critical_columns: Vec<String>,
}

/// What the cleaner does when a dataset type has no rules entry.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingRulesPolicy {
    /// Refuse the dataset with a configuration error.
    #[default]
    Fail,
    /// Clean with empty rules, which yields a dataset with no columns.
    PassThrough,
}

impl CleaningRuleSet {
    pub fn rules_for(&self, dataset_type: &str) -> Option<&DatasetRules> {
        self.datasets.get(dataset_type)
    }

    pub fn dataset_types(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }
}
