
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::index::VectorizerConfig;
use crate::interactions::InteractionFormat;
use crate::recommend::RecommendConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub vectorizer: VectorizerConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// Article corpus, relative paths resolve against the config directory
    pub news_path: PathBuf,
    pub interactions_path: PathBuf,
    pub interactions_format: InteractionFormat,
}

impl Default for DataConfig {
    #[inline]
    fn default() -> Self {
        Self {
            news_path: PathBuf::from("data/news.tsv"),
            interactions_path: PathBuf::from("data/interactions.tsv"),
            interactions_format: InteractionFormat::Pairs,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid {0} path (cannot be empty)")]
    EmptyPath(&'static str),
    #[error("Invalid default limit: {0} (must be between 1 and 1000)")]
    InvalidDefaultLimit(usize),
    #[error("Invalid query boost: {0} (must be between 0.0 and 10.0)")]
    InvalidQueryBoost(f32),
    #[error("Invalid min_df: {0} (must be at least 1)")]
    InvalidMinDf(usize),
    #[error("Invalid max_df: {0} (must be greater than 0.0 and at most 1.0)")]
    InvalidMaxDf(f32),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Config {
    /// Default configuration directory, `~/.newsrec`
    #[inline]
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(".newsrec"))
            .or({
                #[cfg(windows)]
                {
                    dirs::data_dir().map(|data| data.join("newsrec"))
                }
                #[cfg(not(windows))]
                {
                    None
                }
            })
            .ok_or(ConfigError::DirectoryError)
    }

    /// Default settings rooted at `base_dir`
    #[inline]
    pub fn with_base_dir<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        if !config_path.exists() {
            return Ok(Self::with_base_dir(config_dir));
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = self.get_base_dir();

        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Get the base directory for the application
    #[inline]
    pub fn get_base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.data.validate()?;
        self.validate_vectorizer_config()?;
        self.validate_recommend_config()?;
        Ok(())
    }

    fn validate_vectorizer_config(&self) -> Result<(), ConfigError> {
        let config = &self.vectorizer;

        if config.min_df == 0 {
            return Err(ConfigError::InvalidMinDf(config.min_df));
        }

        if !(config.max_df > 0.0 && config.max_df <= 1.0) {
            return Err(ConfigError::InvalidMaxDf(config.max_df));
        }

        Ok(())
    }

    fn validate_recommend_config(&self) -> Result<(), ConfigError> {
        let config = &self.recommend;

        if !(1..=1000).contains(&config.default_limit) {
            return Err(ConfigError::InvalidDefaultLimit(config.default_limit));
        }

        // Also rejects NaN
        if !(0.0..=10.0).contains(&config.query_boost) {
            return Err(ConfigError::InvalidQueryBoost(config.query_boost));
        }

        Ok(())
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.get_base_dir().join("config.toml")
    }

    /// Directory holding the fitted index cache
    #[inline]
    pub fn cache_dir_path(&self) -> PathBuf {
        self.get_base_dir().join("cache")
    }

    #[inline]
    pub fn news_path(&self) -> PathBuf {
        self.resolve(&self.data.news_path)
    }

    #[inline]
    pub fn interactions_path(&self) -> PathBuf {
        self.resolve(&self.data.interactions_path)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.get_base_dir().join(path)
        }
    }

    #[inline]
    pub fn set_default_limit(&mut self, limit: usize) -> Result<(), ConfigError> {
        if !(1..=1000).contains(&limit) {
            return Err(ConfigError::InvalidDefaultLimit(limit));
        }
        self.recommend.default_limit = limit;
        Ok(())
    }

    #[inline]
    pub fn set_query_boost(&mut self, boost: f32) -> Result<(), ConfigError> {
        if !(0.0..=10.0).contains(&boost) {
            return Err(ConfigError::InvalidQueryBoost(boost));
        }
        self.recommend.query_boost = boost;
        Ok(())
    }
}

impl DataConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.news_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("news"));
        }

        if self.interactions_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("interactions"));
        }

        Ok(())
    }

    #[inline]
    pub fn set_news_path(&mut self, path: PathBuf) -> Result<(), ConfigError> {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("news"));
        }
        self.news_path = path;
        Ok(())
    }

    #[inline]
    pub fn set_interactions_path(&mut self, path: PathBuf) -> Result<(), ConfigError> {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("interactions"));
        }
        self.interactions_path = path;
        Ok(())
    }
}
