use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::Target;

fn default_cities() -> Vec<String> {
    ["Paris", "Sydney", "Seoul", "Los Angeles"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// cities = ["Paris", "Sydney", "Seoul", "Los Angeles"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather API key. Injected into the lookup, never a literal in code.
    pub api_key: Option<String>,

    /// The named-city targets offered alongside "Current Location".
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self { api_key: None, cities: default_cities() }
    }
}

impl Config {
    /// The selectable targets: the device location first, then each
    /// configured city in order.
    pub fn targets(&self) -> Vec<Target> {
        std::iter::once(Target::CurrentLocation)
            .chain(self.cities.iter().cloned().map(Target::NamedCity))
            .collect()
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// API key, or an actionable error when none is configured.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `skycast configure` and enter your API key."
            )
        })
    }

    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_four_cities() {
        let cfg = Config::default();
        assert_eq!(cfg.cities, vec!["Paris", "Sydney", "Seoul", "Los Angeles"]);
    }

    #[test]
    fn targets_lead_with_current_location() {
        let cfg = Config::default();
        let targets = cfg.targets();

        assert_eq!(targets.len(), 5);
        assert_eq!(targets[0], Target::CurrentLocation);
        assert_eq!(targets[1], Target::NamedCity("Paris".into()));
        assert_eq!(targets[4], Target::NamedCity("Los Angeles".into()));
    }

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("Hint: run `skycast configure`"));
    }

    #[test]
    fn require_api_key_rejects_an_empty_key() {
        let mut cfg = Config::default();
        cfg.set_api_key(String::new());

        assert!(cfg.require_api_key().is_err());
    }

    #[test]
    fn api_key_round_trips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        let serialized = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(parsed.require_api_key().unwrap(), "KEY");
        assert_eq!(parsed.cities, cfg.cities);
    }

    #[test]
    fn missing_cities_field_falls_back_to_defaults() {
        let parsed: Config = toml::from_str(r#"api_key = "KEY""#).unwrap();
        assert_eq!(parsed.cities, Config::default().cities);
    }
}
