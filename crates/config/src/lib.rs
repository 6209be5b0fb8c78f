//! # Config - tool configuration
//!
//! All settings come from environment variables, with defaults:
//!
//! ```text
//! SETTINGS_BLOB_PATH        blob to decode                  (default: "config.bin")
//! SETTINGS_MAX_KB           refuse blobs larger than this   (default: 16384 = 16 MiB)
//! SETTINGS_LOG              tracing filter directive        (default: "warn")
//! SETTINGS_VALIDATE_FILTERS parse filters while decoding    (default: "true")
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

pub const ENV_BLOB_PATH: &str = "SETTINGS_BLOB_PATH";
pub const ENV_MAX_KB: &str = "SETTINGS_MAX_KB";
pub const ENV_LOG: &str = "SETTINGS_LOG";
pub const ENV_VALIDATE_FILTERS: &str = "SETTINGS_VALIDATE_FILTERS";

const DEFAULT_BLOB_PATH: &str = "config.bin";
const DEFAULT_MAX_KB: u64 = 16 * 1024;
const DEFAULT_LOG: &str = "warn";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the settings blob.
    pub blob_path: PathBuf,
    /// Largest blob accepted, in bytes.
    pub max_blob_bytes: u64,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    /// Whether filter expressions are parsed during decoding. When off,
    /// every filter is accepted as-is.
    pub validate_filters: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blob_path: PathBuf::from(DEFAULT_BLOB_PATH),
            max_blob_bytes: DEFAULT_MAX_KB * 1024,
            log_filter: DEFAULT_LOG.to_string(),
            validate_filters: true,
        }
    }
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric or boolean variable doesn't parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(path) = lookup(ENV_BLOB_PATH) {
            config.blob_path = PathBuf::from(path);
        }
        if let Some(kb) = lookup(ENV_MAX_KB) {
            let kb: u64 = kb
                .trim()
                .parse()
                .with_context(|| format!("invalid {}: {:?}", ENV_MAX_KB, kb))?;
            config.max_blob_bytes = kb
                .checked_mul(1024)
                .with_context(|| format!("{} is too large: {}", ENV_MAX_KB, kb))?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            config.log_filter = filter;
        }
        if let Some(flag) = lookup(ENV_VALIDATE_FILTERS) {
            config.validate_filters = flag
                .trim()
                .parse()
                .with_context(|| format!("invalid {}: {:?}", ENV_VALIDATE_FILTERS, flag))?;
        }
        Ok(config)
    }

    /// Replaces the blob path, e.g. with one given on the command line.
    #[must_use]
    pub fn with_blob_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.blob_path = path.into();
        self
    }
}
