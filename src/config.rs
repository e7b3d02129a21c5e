//! Persistent configuration stored in `~/.zap-tui/config.json`

use crate::model::Account;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an alternate config file
pub const CONFIG_ENV: &str = "ZAP_TUI_CONFIG";

/// Which payment collaborator sends the zaps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Simulated wallet, nothing leaves the machine
    DryRun {
        #[serde(default = "default_dry_run_balance")]
        balance_sats: u64,
        #[serde(default = "default_step_delay_ms")]
        step_delay_ms: u64,
    },
    /// External wallet program speaking the progress/error line protocol
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

fn default_dry_run_balance() -> u64 {
    100_000
}

fn default_step_delay_ms() -> u64 {
    300
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::DryRun {
            balance_sats: default_dry_run_balance(),
            step_delay_ms: default_step_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub account: Account,
    /// JSON file with the notes to show; the built-in sample feed when unset
    #[serde(default)]
    pub feed_path: Option<String>,
    #[serde(default)]
    pub backend: BackendConfig,
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".zap-tui"))
    }

    pub fn config_path() -> Option<PathBuf> {
        if let Ok(path) = env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Load the config, `Ok(None)` when no config file exists yet
    pub fn load() -> Result<Option<Config>> {
        let Some(path) = Self::config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().context("Could not determine config path")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create {}", dir.display()))?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ZapType;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.account.default_zap_type, ZapType::Public);
        assert!(matches!(
            config.backend,
            BackendConfig::DryRun { balance_sats: 100_000, .. }
        ));
    }

    #[test]
    fn test_parse_command_backend() {
        let json = r#"{
            "account": { "display_name": "alice", "default_zap_type": "PRIVATE" },
            "feed_path": "/tmp/feed.json",
            "backend": { "kind": "command", "program": "nwc-zap", "args": ["--relay", "wss://r"] }
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.account.display_name, "alice");
        assert_eq!(config.account.default_zap_type, ZapType::Private);
        assert_eq!(config.feed_path.as_deref(), Some("/tmp/feed.json"));
        assert_eq!(
            config.backend,
            BackendConfig::Command {
                program: "nwc-zap".to_string(),
                args: vec!["--relay".to_string(), "wss://r".to_string()],
            }
        );
    }

    #[test]
    fn test_unknown_zap_type_is_rejected() {
        let json = r#"{ "account": { "default_zap_type": "SHOUTED" } }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.account.default_zap_type = ZapType::Anonymous;
        config.feed_path = Some("feed.json".to_string());
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
