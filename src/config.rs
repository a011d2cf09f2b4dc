// ⚙️ Session configuration - Tree shape and heap sizing as data
//
// Example (JSON):
// {
//   "initial_capacity": 100,
//   "investment_group": "Investments",
//   "reserved_names": ["admin"],
//   "template": { "groups": [
//     { "name": "Expenses", "polarity": "negative", "leaves": ["health"] },
//     { "name": "Investments", "leaves": ["gold", "stock", "real estate", "others"] }
//   ]}
// }

use crate::entities::{InvestmentKind, TreeTemplate};
use anyhow::{bail, Context as AnyhowContext, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WealthConfig {
    /// Starting heap capacity (clamped to at least 1)
    #[serde(default = "default_capacity")]
    pub initial_capacity: usize,

    /// Shape every new user's tree starts with
    #[serde(default)]
    pub template: TreeTemplate,

    /// Group holding the investment kind leaves
    #[serde(default = "default_investment_group")]
    pub investment_group: String,

    /// Extra names refused at registration (template names are always refused)
    #[serde(default)]
    pub reserved_names: Vec<String>,
}

fn default_capacity() -> usize {
    100
}

fn default_investment_group() -> String {
    "Investments".to_string()
}

impl Default for WealthConfig {
    fn default() -> Self {
        WealthConfig {
            initial_capacity: default_capacity(),
            template: TreeTemplate::default(),
            investment_group: default_investment_group(),
            reserved_names: Vec::new(),
        }
    }
}

impl WealthConfig {
    /// Load and validate a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        Self::from_json_str(&content)
            .with_context(|| format!("Invalid config file: {:?}", path.as_ref()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: WealthConfig =
            serde_json::from_str(json).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Node names must be non-empty and unique; every investment kind
    /// needs its leaf under the investment group.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for name in self.template.names() {
            if name.trim().is_empty() {
                bail!("Template contains an empty node name");
            }
            if !seen.insert(name) {
                bail!("Template node name '{}' is used more than once", name);
            }
        }

        let Some(group) = self
            .template
            .groups
            .iter()
            .find(|group| group.name == self.investment_group)
        else {
            bail!("Investment group '{}' is not in the template", self.investment_group);
        };

        for kind in InvestmentKind::ALL {
            if !group.leaves.iter().any(|leaf| leaf == kind.node_name()) {
                bail!(
                    "Investment group '{}' is missing the '{}' leaf",
                    group.name,
                    kind.node_name()
                );
            }
        }

        Ok(())
    }

    /// Case-insensitive check against template names and `reserved_names`
    pub fn is_reserved(&self, name: &str) -> bool {
        let lowered = name.trim().to_lowercase();
        self.template
            .names()
            .chain(self.reserved_names.iter().map(String::as_str))
            .any(|reserved| reserved.to_lowercase() == lowered)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Polarity;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = WealthConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_capacity, 100);
        assert_eq!(config.investment_group, "Investments");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = WealthConfig::from_json_str(r#"{ "initial_capacity": 8 }"#).unwrap();
        assert_eq!(config.initial_capacity, 8);
        assert_eq!(config.template, TreeTemplate::default());
    }

    #[test]
    fn test_custom_template() {
        let json = r#"{
            "reserved_names": ["admin"],
            "template": { "groups": [
                { "name": "Debts", "polarity": "negative", "leaves": ["mortgage"] },
                { "name": "Investments", "leaves": ["gold", "stock", "real estate", "others", "crypto"] }
            ]}
        }"#;
        let config = WealthConfig::from_json_str(json).unwrap();

        assert_eq!(config.template.groups[0].polarity, Polarity::Negative);
        assert_eq!(config.template.groups[1].polarity, Polarity::Positive);
        assert!(config.is_reserved("ADMIN"));
        assert!(config.is_reserved("Mortgage"));
        assert!(!config.is_reserved("Alice"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let json = r#"{ "template": { "groups": [
            { "name": "Investments", "leaves": ["gold", "stock", "real estate", "others", "gold"] }
        ]}}"#;
        let err = WealthConfig::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_rejects_missing_investment_leaf() {
        let json = r#"{ "template": { "groups": [
            { "name": "Investments", "leaves": ["gold", "stock"] }
        ]}}"#;
        let err = WealthConfig::from_json_str(json).unwrap_err();
        assert!(err.to_string().contains("real estate"));
    }

    #[test]
    fn test_rejects_missing_investment_group() {
        let json = r#"{ "investment_group": "Assets" }"#;
        assert!(WealthConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "initial_capacity": 3 }}"#).unwrap();

        let config = WealthConfig::from_file(file.path()).unwrap();
        assert_eq!(config.initial_capacity, 3);

        assert!(WealthConfig::from_file("/definitely/not/here.json").is_err());
    }

    #[test]
    fn test_template_names_are_reserved() {
        let config = WealthConfig::default();
        assert!(config.is_reserved("investments"));
        assert!(config.is_reserved(" Gold "));
        assert!(config.is_reserved("real estate"));
    }
}
