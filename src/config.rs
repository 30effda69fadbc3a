use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "HealthDesk";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Cannot determine home directory; set HEALTHDESK_DB")]
    NoHomeDirectory,
}

/// Default `RUST_LOG` filter when none is set.
pub fn default_log_filter() -> String {
    "info,healthdesk=debug".to_string()
}

/// Application data directory: ~/HealthDesk/
pub fn app_data_dir() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
    Ok(home.join(APP_NAME))
}

/// Default SQLite database location.
pub fn default_database_path() -> Result<PathBuf, ConfigError> {
    Ok(app_data_dir()?.join("healthdesk.db"))
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
        }
    }
}

/// Settings read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub gemini: GeminiConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = non_empty("HEALTHDESK_BIND").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                var: "HEALTHDESK_BIND",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let database_path = match non_empty("HEALTHDESK_DB") {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        let timeout_secs = match non_empty("LLM_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>().map_err(|e| e.to_string()) {
                Ok(secs) if secs > 0 => secs,
                Ok(_) => {
                    return Err(ConfigError::InvalidValue {
                        var: "LLM_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be greater than zero".into(),
                    })
                }
                Err(reason) => {
                    return Err(ConfigError::InvalidValue {
                        var: "LLM_TIMEOUT_SECS",
                        value: raw,
                        reason,
                    })
                }
            },
            None => DEFAULT_LLM_TIMEOUT_SECS,
        };

        Ok(Self {
            bind_addr,
            database_path,
            gemini: GeminiConfig {
                api_key: non_empty("GEMINI_API_KEY"),
                model: non_empty("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: non_empty("GEMINI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout_secs,
            },
        })
    }
}
