use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::{RulePack, RuleRegistry};

/// User configuration, read from `config.yaml`.
///
/// Example YAML:
/// ```yaml
/// rule_pack: high-stakes
/// state_file: /srv/traitors/state.json
/// rule_packs:
///   - id: house
///     name: House Rules
///     draft_winner: 12
///     # ...
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Id of the rule pack used when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_pack: Option<String>,

    /// Extra rule packs; a pack reusing a built-in id replaces it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_packs: Option<Vec<RulePack>>,

    /// Game state JSON (defaults to ~/.config/traitors-score/state.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,

    /// Archive history JSON (defaults to ~/.config/traitors-score/history.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,
}

impl Config {
    pub fn custom_rule_packs(&self) -> &[RulePack] {
        self.rule_packs.as_deref().unwrap_or_default()
    }

    /// Registry of built-in and configured packs
    pub fn rule_registry(&self) -> RuleRegistry {
        RuleRegistry::new(self.custom_rule_packs().to_vec(), self.rule_pack.as_deref())
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_file
            .clone()
            .unwrap_or_else(crate::game::get_state_path)
    }

    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(crate::history::get_history_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.custom_rule_packs().is_empty());
        assert_eq!(config.rule_registry().default_pack().id, "classic");
    }

    #[test]
    fn test_partial_config_parse() {
        let yaml = r#"
rule_pack: high-stakes
state_file: /tmp/state.json
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.rule_pack.as_deref(), Some("high-stakes"));
        assert_eq!(config.state_path(), PathBuf::from("/tmp/state.json"));
        assert_eq!(config.rule_registry().default_pack().id, "high-stakes");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "rule_pak: classic\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let mut house = RulePack::classic();
        house.id = "house".to_string();
        house.name = "House Rules".to_string();
        let config = Config {
            rule_pack: Some("house".to_string()),
            rule_packs: Some(vec![house]),
            state_file: None,
            history_file: Some(PathBuf::from("/tmp/history.json")),
        };

        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
        assert_eq!(parsed.rule_registry().default_pack().name, "House Rules");
    }
}
