//! Configuration sections for discovery and propagation.
//!
//! Every section tolerates being absent (`#[serde(default)]`) and rejects unknown keys.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Identity of the current node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NodeConfig {
    /// Overrides the OS hostname when set.
    pub name: Option<String>,
}

/// How content-directory instances are tested for locality.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentLocality {
    /// Any endpoint alias names the current node.
    #[default]
    Aliases,
    /// The instance's base path exists on this node.
    BasePath,
    /// Either of the above.
    Either,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Farm inventory document listing both directories.
    #[serde(default = "default_inventory")]
    pub inventory: PathBuf,

    pub content_locality: ContentLocality,
}

fn default_inventory() -> PathBuf {
    PathBuf::from("inventory.yaml")
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            inventory: default_inventory(),
            content_locality: ContentLocality::default(),
        }
    }
}

/// Separator convention used when joining a base path and the config file name.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathStyle {
    /// The separator of the platform the process runs on.
    #[default]
    Native,
    Windows,
    Unix,
}

impl PathStyle {
    #[must_use]
    pub fn separator(self) -> char {
        match self {
            Self::Native => std::path::MAIN_SEPARATOR,
            Self::Windows => '\\',
            Self::Unix => '/',
        }
    }

    /// Windows paths accept both slashes as a separator.
    #[must_use]
    pub fn is_separator(self, c: char) -> bool {
        match self {
            Self::Native => std::path::is_separator(c),
            Self::Windows => c == '\\' || c == '/',
            Self::Unix => c == '/',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropagationConfig {
    /// Name of the config file inside each instance's base path.
    #[serde(default = "default_config_file_name")]
    pub config_file_name: String,

    pub path_style: PathStyle,

    /// Replace existing config files.
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

fn default_config_file_name() -> String {
    "web.config".to_owned()
}

fn default_overwrite() -> bool {
    true
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            config_file_name: default_config_file_name(),
            path_style: PathStyle::default(),
            overwrite: default_overwrite(),
        }
    }
}

/// One `appSettings` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingEntry {
    pub key: String,
    pub value: String,
    /// Written on install only; edits leave it out.
    #[serde(default)]
    pub install_only: bool,
}

impl SettingEntry {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            install_only: false,
        }
    }

    #[must_use]
    pub fn install_only(mut self) -> Self {
        self.install_only = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayloadConfig {
    pub settings: Vec<SettingEntry>,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_propagation_defaults() {
        let config = PropagationConfig::default();
        assert_eq!(config.config_file_name, "web.config");
        assert_eq!(config.path_style, PathStyle::Native);
        assert!(config.overwrite);
    }

    #[test]
    fn test_discovery_parse_applies_defaults() {
        let yaml = r#"
content_locality: "either"
"#;
        let config: DiscoveryConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.content_locality, ContentLocality::Either);
        assert_eq!(config.inventory, PathBuf::from("inventory.yaml"));
    }

    #[test]
    fn test_propagation_reject_unknown_fields() {
        let yaml = r#"
config_file_name: "app.config"
rollback: true
"#;
        let result: Result<PropagationConfig, _> = serde_saphyr::from_str(yaml);
        assert!(
            result.is_err(),
            "Config should reject unknown fields due to deny_unknown_fields"
        );
    }

    #[test]
    fn test_payload_settings_parse() {
        let yaml = r#"
settings:
  - key: "siteUrl"
    value: "http://search.example"
  - key: "installKey"
    value: "abc"
    install_only: true
"#;
        let config: PayloadConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.settings.len(), 2);
        assert!(!config.settings[0].install_only);
        assert!(config.settings[1].install_only);
    }

    #[test]
    fn test_windows_style_accepts_both_slashes() {
        assert!(PathStyle::Windows.is_separator('\\'));
        assert!(PathStyle::Windows.is_separator('/'));
        assert!(!PathStyle::Unix.is_separator('\\'));
        assert_eq!(PathStyle::Windows.separator(), '\\');
        assert_eq!(PathStyle::Unix.separator(), '/');
    }
}
