use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration.
///
/// Everything has a working default so first runs need no config file
/// at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where cache slots live. Defaults to the platform data dir.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Base URL of the external recipe-search API. Defaults to the
    /// public TheMealDB endpoint when unset.
    #[serde(default)]
    pub api_url: Option<String>,
}

impl Config {
    /// Load configuration from the default location, honoring the
    /// `LARDER_CONFIG` environment variable override.
    pub fn load() -> Result<Self> {
        if let Ok(custom_path) = std::env::var("LARDER_CONFIG") {
            return Self::load_from(Path::new(&custom_path));
        }
        let path = Self::default_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Default config file path: `~/.config/larder/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("larder").join("config.toml"))
    }

    /// Resolve the directory holding the cache slots.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir().context("Could not determine data directory")?;
        Ok(data_dir.join("larder"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_need_no_file() {
        let config = Config::default();
        assert!(config.search.api_url.is_none());
        assert!(config.resolve_data_dir().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "data_dir = \"/tmp/larder-test\"").unwrap();
        writeln!(file, "[search]").unwrap();
        writeln!(file, "api_url = \"http://localhost:9999/api\"").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/larder-test")));
        assert_eq!(
            config.search.api_url.as_deref(),
            Some("http://localhost:9999/api")
        );
    }
}
