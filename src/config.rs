//! Runtime configuration, resolved once at startup from `SYMPTOM_INTEL_*`
//! environment variables and then passed into services.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::pipeline::ollama::DEFAULT_OLLAMA_URL;
use crate::pipeline::retrieval::{RetrievalStrategy, DEFAULT_EMBED_MODEL};

/// Application-level constants
pub const APP_NAME: &str = "Symptom Intelligence Engine API";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_BIND: &str = "SYMPTOM_INTEL_BIND";
pub const ENV_DATA_DIR: &str = "SYMPTOM_INTEL_DATA_DIR";
pub const ENV_OLLAMA_URL: &str = "SYMPTOM_INTEL_OLLAMA_URL";
pub const ENV_MODEL: &str = "SYMPTOM_INTEL_MODEL";
pub const ENV_EMBED_MODEL: &str = "SYMPTOM_INTEL_EMBED_MODEL";
pub const ENV_RETRIEVAL: &str = "SYMPTOM_INTEL_RETRIEVAL";
pub const ENV_TIMEOUT_SECS: &str = "SYMPTOM_INTEL_TIMEOUT_SECS";

const DEFAULT_BIND: &str = "127.0.0.1:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `tracing` filter when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "info,symptom_intel_lib=debug"
}

/// ~/SymptomIntel/, or ./SymptomIntel when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("SymptomIntel")
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Holds optional `protocols.json` and `interactions.json` overrides.
    pub data_dir: PathBuf,
    pub ollama_url: String,
    /// `None` disables LLM extraction.
    pub extraction_model: Option<String>,
    pub embed_model: String,
    pub retrieval: RetrievalStrategy,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            data_dir: default_data_dir(),
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            extraction_model: None,
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            retrieval: RetrievalStrategy::Keyword,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = parse_var(ENV_BIND, get(ENV_BIND).as_deref().unwrap_or(DEFAULT_BIND))?;

        let data_dir = get(ENV_DATA_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let ollama_url = get(ENV_OLLAMA_URL).unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        if !(ollama_url.starts_with("http://") || ollama_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                var: ENV_OLLAMA_URL,
                value: ollama_url,
                reason: "expected an http:// or https:// URL".into(),
            });
        }

        let retrieval = match get(ENV_RETRIEVAL) {
            Some(value) => parse_var(ENV_RETRIEVAL, &value.to_lowercase())?,
            None => RetrievalStrategy::Keyword,
        };

        let timeout_secs: u64 = match get(ENV_TIMEOUT_SECS) {
            Some(value) => parse_var(ENV_TIMEOUT_SECS, &value)?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                var: ENV_TIMEOUT_SECS,
                value: "0".into(),
                reason: "timeout must be at least 1 second".into(),
            });
        }

        Ok(Self {
            bind_addr,
            data_dir,
            ollama_url,
            extraction_model: get(ENV_MODEL),
            embed_model: get(ENV_EMBED_MODEL).unwrap_or_else(|| DEFAULT_EMBED_MODEL.to_string()),
            retrieval,
            timeout_secs,
        })
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
