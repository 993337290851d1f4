use anyhow::{Context, Result};
use apod_core::{parse_calendar_date, NormalizerConfig, DEFAULT_FEED_URL};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/apod.db")
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Falls back to the build-dependent default level when unset.
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default = "default_log_dir")]
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: None,
            dir: default_log_dir(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}

/// Window bounds as `YYYY-MM-DD` strings.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct WindowConfig {
    #[serde(default)]
    pub epoch_min: Option<String>,
    #[serde(default)]
    pub default_anchor: Option<String>,
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.logging
            .level
            .as_deref()
            .unwrap_or(apod_core::default_log_level())
    }

    /// Normalizer bounds with configured overrides applied.
    pub fn normalizer_config(&self) -> Result<NormalizerConfig> {
        let mut bounds = NormalizerConfig::default();
        if let Some(raw) = &self.window.epoch_min {
            bounds.epoch_min = parse_config_date("window.epoch_min", raw)?;
        }
        if let Some(raw) = &self.window.default_anchor {
            bounds.default_anchor = parse_config_date("window.default_anchor", raw)?;
        }
        Ok(bounds)
    }
}

fn parse_config_date(field: &str, raw: &str) -> Result<chrono::NaiveDate> {
    parse_calendar_date(raw)
        .with_context(|| format!("{field} must be a YYYY-MM-DD date, got '{raw}'"))
}

/// Reads and validates the config file. A missing file yields defaults.
pub fn load_config(path: &Path) -> Result<Config> {
    let config: Config = if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content).with_context(|| "Failed to parse config file")?
    } else {
        Config::default()
    };

    if config.feed.url.trim().is_empty() {
        anyhow::bail!("feed.url must not be empty");
    }
    if config.feed.timeout_secs == 0 {
        anyhow::bail!("feed.timeout_secs must be > 0");
    }

    let bounds = config.normalizer_config()?;
    if bounds.default_anchor < bounds.epoch_min {
        anyhow::bail!(
            "window.default_anchor ({}) must not precede window.epoch_min ({})",
            bounds.default_anchor,
            bounds.epoch_min
        );
    }

    Ok(config)
}

/// Joins relative paths onto the working directory.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    Ok(cwd.join(path))
}
