//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `HOST`: bind address (default `0.0.0.0`)
//! - `PORT`: bind port (default `8000`)
//! - `LOG_FORMAT`: `text` (default) | `json`
//!
//! Every loader has a `from_lookup` variant taking a key lookup function so
//! configuration can be tested without mutating the process environment.

use std::env;
use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use thiserror::Error;

/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8000;

// =============================================================================
// Error Types
// =============================================================================

/// Errors raised while reading configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A variable is set but its value is not acceptable.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The variable name.
        key: String,
        /// Why the value was rejected.
        message: String,
    },

    /// A variable required by the selected mode is missing or blank.
    #[error("{0} must be set")]
    MissingValue(String),
}

// =============================================================================
// Log Format
// =============================================================================

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigurationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigurationError::InvalidValue {
                key: "LOG_FORMAT".to_string(),
                message: format!("unknown format '{value}' (expected 'text' or 'json')"),
            }),
        }
    }
}

// =============================================================================
// Server Config
// =============================================================================

/// Listener and logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_format: LogFormat::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidValue`] if `PORT` or `LOG_FORMAT`
    /// is set to something unparseable.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup_trimmed(&lookup, "HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = lookup_parsed(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);
        let log_format = lookup_trimmed(&lookup, "LOG_FORMAT")
            .map(|value| value.parse::<LogFormat>())
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            log_format,
        })
    }

    /// Returns the `host:port` string to bind to. IPv6 literals are
    /// bracketed; host names are passed through for resolution.
    #[must_use]
    pub fn socket_address(&self) -> String {
        let host = self.host.trim_start_matches('[').trim_end_matches(']');
        host.parse::<IpAddr>().map_or_else(
            |_| format!("{}:{}", self.host, self.port),
            |ip| SocketAddr::new(ip, self.port).to_string(),
        )
    }
}

// =============================================================================
// Lookup Helpers
// =============================================================================

/// Returns the trimmed value of `key`, treating blank values as unset.
pub(crate) fn lookup_trimmed<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parses the value of `key` if it is set.
pub(crate) fn lookup_parsed<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup_trimmed(lookup, key)
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|error| ConfigurationError::InvalidValue {
                    key: key.to_string(),
                    message: format!("'{value}': {error}"),
                })
        })
        .transpose()
}
