use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use crate::error::NexusError;

/// Environment keys recognised by [`Config::from_env`]; matched case-insensitively.
const ENV_KEYS: &[&str] = &[
    "GEMINI_API_KEY",
    "GEMINI_MODEL",
    "GEMINI_BASE_URL",
    "DATABASE_URL",
    "LISTEN_ADDR",
    "LOGLEVEL",
    "PROXY",
    "REQUEST_TIMEOUT_SECS",
    "MAX_UPLOAD_BYTES",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: Url,
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    pub proxy: Option<Url>,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini_api_key: String::new(),
            gemini_model: "gemini-flash-latest".to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.clone(),
            database_url: "sqlite:idcard.db".to_string(),
            listen_addr: "127.0.0.1:8000".to_string(),
            loglevel: "info".to_string(),
            proxy: None,
            request_timeout_secs: 60,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl Config {
    /// Defaults overlaid with process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, NexusError> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(ENV_KEYS));
        Self::from_figment(figment)
    }

    fn from_figment(figment: Figment) -> Result<Self, NexusError> {
        figment
            .extract()
            .map_err(|e| NexusError::Config(e.to_string()))
    }

    /// Startup checks for values the service cannot run without.
    pub fn validate(&self) -> Result<(), NexusError> {
        if self.gemini_api_key.trim().is_empty() {
            return Err(NexusError::Config("GEMINI_API_KEY is not set".to_string()));
        }
        if self.database_url.trim().is_empty() {
            return Err(NexusError::Config("DATABASE_URL is not set".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(NexusError::Config(
                "REQUEST_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub static DEFAULT_GEMINI_BASE_URL: LazyLock<Url> = LazyLock::new(|| {
    Url::parse("https://generativelanguage.googleapis.com/v1beta/")
        .expect("static Gemini base URL is valid")
});
