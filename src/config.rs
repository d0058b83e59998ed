use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

const DEFAULT_ENDPOINT: &str = "http://kateglo.lostfocus.org/api.php";
/// Pause before every lookup, in milliseconds
const DEFAULT_DELAY_MS: u64 = 500;
/// Antonym count at which harvesting stops
const DEFAULT_ANTONYM_LIMIT: usize = 1587;
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 1000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const DEFAULT_ANTONYMS_FILE: &str = "antonims.json";
const DEFAULT_SYNONYMS_FILE: &str = "sinonims.json";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Kateglo api.php endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    #[serde(default = "default_antonym_limit")]
    pub antonym_limit: usize,

    /// Extra attempts for transient failures. 0 disables retrying.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff unit; attempt n waits n * retry_backoff_ms
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_antonyms_file")]
    pub antonyms_file: String,

    #[serde(default = "default_synonyms_file")]
    pub synonyms_file: String,

    /// Only harvest the first N vocabulary words
    #[serde(default)]
    pub vocabulary_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            delay_ms: DEFAULT_DELAY_MS,
            antonym_limit: DEFAULT_ANTONYM_LIMIT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff_ms: DEFAULT_RETRY_BACKOFF_MS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            output_dir: default_output_dir(),
            antonyms_file: default_antonyms_file(),
            synonyms_file: default_synonyms_file(),
            vocabulary_limit: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_antonym_limit() -> usize {
    DEFAULT_ANTONYM_LIMIT
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_backoff_ms() -> u64 {
    DEFAULT_RETRY_BACKOFF_MS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_antonyms_file() -> String {
    DEFAULT_ANTONYMS_FILE.to_string()
}

fn default_synonyms_file() -> String {
    DEFAULT_SYNONYMS_FILE.to_string()
}

impl Config {
    /// Loads `path` if it exists, otherwise falls back to defaults.
    pub fn load_with(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let config_str = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&config_str)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::invalid("endpoint", "must not be empty"));
        }

        if self.request_timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "request_timeout_secs",
                "must be greater than 0",
            ));
        }

        if self.antonyms_file.trim().is_empty() {
            return Err(ConfigError::invalid("antonyms_file", "must not be empty"));
        }
        if self.synonyms_file.trim().is_empty() {
            return Err(ConfigError::invalid("synonyms_file", "must not be empty"));
        }
        if self.antonyms_file == self.synonyms_file {
            return Err(ConfigError::invalid(
                "synonyms_file",
                format!("must differ from antonyms_file ({})", self.antonyms_file),
            ));
        }

        Ok(())
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
