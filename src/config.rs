use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_SEARCH_URL: &str = "http://localhost:8888";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub model: Option<String>,
    pub search_url: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            openai_api_key: None,
            model: None,
            search_url: None,
        }
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&config_content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    fn save_to(&self, config_path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let config_content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, config_content)?;
        Ok(())
    }

    pub fn model(&self) -> String {
        self.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    pub fn search_url(&self) -> String {
        self.search_url.clone().unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string())
    }

    fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("searchbot").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::new();
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.search_url(), DEFAULT_SEARCH_URL);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        // Nested path so save has to create the config directory.
        let path = dir.path().join("searchbot").join("config.json");

        let config = Config {
            openai_api_key: None,
            model: None,
            search_url: Some("http://searx.internal:8080".to_string()),
        };
        config.save_to(&path).unwrap();

        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.search_url(), "http://searx.internal:8080");
        assert_eq!(parsed.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_load_missing_file_gives_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let parsed = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(parsed.openai_api_key.is_none());
        assert_eq!(parsed.model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_roundtrip() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            model: Some("gpt-4o-mini".to_string()),
            search_url: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(parsed.model(), "gpt-4o-mini");
        assert_eq!(parsed.search_url(), DEFAULT_SEARCH_URL);
    }
}
