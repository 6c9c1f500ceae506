use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const WORLD_BANK_BASE_URL: &str = "http://api.worldbank.org/v2";
pub const OECD_BASE_URL: &str = "https://stats.oecd.org/SDMX-JSON";
pub const ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";
pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WorldBankProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OecdProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AlphaVantageProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub world_bank: Option<WorldBankProviderConfig>,
    pub oecd: Option<OecdProviderConfig>,
    pub alpha_vantage: Option<AlphaVantageProviderConfig>,
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            world_bank: Some(WorldBankProviderConfig {
                base_url: WORLD_BANK_BASE_URL.to_string(),
            }),
            oecd: Some(OecdProviderConfig {
                base_url: OECD_BASE_URL.to_string(),
            }),
            alpha_vantage: Some(AlphaVantageProviderConfig {
                base_url: ALPHA_VANTAGE_BASE_URL.to_string(),
                api_key: None,
            }),
            yahoo: Some(YahooProviderConfig {
                base_url: YAHOO_BASE_URL.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "ecodash")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Loads the config file when one exists, falling back to built-in
    /// provider defaults otherwise.
    pub fn load_or_default(config_path: Option<&str>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_path(path),
            None => {
                let path = Self::default_config_path()?;
                if path.exists() {
                    Self::load_from_path(&path)
                } else {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn world_bank_base_url(&self) -> &str {
        self.providers
            .world_bank
            .as_ref()
            .map_or(WORLD_BANK_BASE_URL, |p| &p.base_url)
    }

    pub fn oecd_base_url(&self) -> &str {
        self.providers
            .oecd
            .as_ref()
            .map_or(OECD_BASE_URL, |p| &p.base_url)
    }

    pub fn alpha_vantage_base_url(&self) -> &str {
        self.providers
            .alpha_vantage
            .as_ref()
            .map_or(ALPHA_VANTAGE_BASE_URL, |p| &p.base_url)
    }

    pub fn alpha_vantage_api_key(&self) -> Option<&str> {
        self.providers
            .alpha_vantage
            .as_ref()
            .and_then(|p| p.api_key.as_deref())
    }

    pub fn yahoo_base_url(&self) -> &str {
        self.providers
            .yahoo
            .as_ref()
            .map_or(YAHOO_BASE_URL, |p| &p.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  world_bank:
    base_url: "http://example.com/wb"
  alpha_vantage:
    base_url: "http://example.com/av"
    api_key: "demo"
  oecd: ~
  yahoo: ~
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.world_bank_base_url(), "http://example.com/wb");
        assert_eq!(config.alpha_vantage_base_url(), "http://example.com/av");
        assert_eq!(config.alpha_vantage_api_key(), Some("demo"));
        // Sections absent from the file fall back to the built-in URLs.
        assert_eq!(config.oecd_base_url(), OECD_BASE_URL);
        assert_eq!(config.yahoo_base_url(), YAHOO_BASE_URL);
    }

    #[test]
    fn test_default_config_has_no_api_key() {
        let config = AppConfig::default();
        assert_eq!(config.alpha_vantage_api_key(), None);
        assert_eq!(config.world_bank_base_url(), WORLD_BANK_BASE_URL);
    }
}
