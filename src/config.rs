use crate::error::{Result, TransloaderError};
use crate::languages;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default translation endpoint.
pub const DEFAULT_BASE_URL: &str = "https://translate.google.com/translate_a/single";

/// Page the seed pair is scraped from.
pub const DEFAULT_SEED_URL: &str = "https://translate.google.com";

/// One day, matching the upstream client library.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub base_url: String,
    pub seed_url: String,
    pub fetch_seed: bool,
    pub default_target: String,
    pub cache_ttl_secs: u64,
    pub request_timeout_secs: u64,
    pub commands_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            seed_url: DEFAULT_SEED_URL.to_string(),
            fetch_seed: true,
            default_target: "fr".to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            request_timeout_secs: 30,
            commands_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                config = toml::from_str::<Config>(&contents)?;
            }
        }

        config.apply_env();
        Ok(config)
    }

    /// Override fields from `TRANSLOADER_*` environment variables.
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("TRANSLOADER_BASE_URL") {
            self.base_url = url;
        }
        if let Ok(url) = std::env::var("TRANSLOADER_SEED_URL") {
            self.seed_url = url;
        }
        if let Ok(fetch) = std::env::var("TRANSLOADER_FETCH_SEED") {
            if let Ok(f) = fetch.parse() {
                self.fetch_seed = f;
            }
        }
        if let Ok(target) = std::env::var("TRANSLOADER_DEFAULT_TARGET") {
            self.default_target = target;
        }
        if let Ok(ttl) = std::env::var("TRANSLOADER_CACHE_TTL") {
            if let Ok(t) = ttl.parse() {
                self.cache_ttl_secs = t;
            }
        }
        if let Ok(timeout) = std::env::var("TRANSLOADER_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.request_timeout_secs = t;
            }
        }
        if let Ok(dir) = std::env::var("TRANSLOADER_COMMANDS_DIR") {
            self.commands_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(TransloaderError::Config("base_url cannot be empty".to_string()));
        }

        if self.fetch_seed && self.seed_url.trim().is_empty() {
            return Err(TransloaderError::Config(
                "seed_url cannot be empty while fetch_seed is enabled".to_string(),
            ));
        }

        if !languages::is_supported(&self.default_target) {
            return Err(TransloaderError::Config(format!(
                "default_target '{}' is not a supported language",
                self.default_target
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(TransloaderError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("transloader").join("config.toml"))
    }
}
