//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BOOKSTALL_CART_DIR` - Directory holding cart snapshots (default: `.bookstall/carts`)
//! - `BOOKSTALL_CART_QUOTA_BYTES` - Max bytes per snapshot (default: 5242880; `0` disables)
//! - `BOOKSTALL_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `RUST_LOG` - Tracing filter, read by [`crate::telemetry`]

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::storage::{FileStore, StorageError};

/// Default snapshot directory, relative to the working directory.
pub const DEFAULT_CART_DIR: &str = ".bookstall/carts";

/// Per-value budget of browser local storage.
pub const DEFAULT_CART_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, the default.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Storefront cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Directory for the file-backed snapshot store.
    pub cart_dir: PathBuf,
    /// Byte limit per snapshot; `None` means unlimited.
    pub cart_quota_bytes: Option<usize>,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            cart_dir: PathBuf::from(DEFAULT_CART_DIR),
            cart_quota_bytes: Some(DEFAULT_CART_QUOTA_BYTES),
            log_format: LogFormat::Pretty,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let cart_dir = lookup("BOOKSTALL_CART_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_CART_DIR), PathBuf::from);

        let cart_quota_bytes = match lookup("BOOKSTALL_CART_QUOTA_BYTES") {
            None => Some(DEFAULT_CART_QUOTA_BYTES),
            Some(raw) => match parse_var::<usize>("BOOKSTALL_CART_QUOTA_BYTES", &raw)? {
                0 => None,
                bytes => Some(bytes),
            },
        };

        let log_format = lookup("BOOKSTALL_LOG_FORMAT")
            .map(|raw| parse_var::<LogFormat>("BOOKSTALL_LOG_FORMAT", &raw))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            cart_dir,
            cart_quota_bytes,
            log_format,
        })
    }

    /// Open the snapshot store this configuration points at.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    pub fn open_store(&self) -> Result<FileStore, StorageError> {
        Ok(FileStore::open(&self.cart_dir)?.with_quota(self.cart_quota_bytes))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable's value, naming the variable in the error.
fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
