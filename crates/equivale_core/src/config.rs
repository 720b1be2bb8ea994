//! Process configuration resolved from environment variables.
//!
//! # Invariants
//! - Missing or blank variables fall back to defaults; they never fail.
//! - `suggestion_limit` is always within `1..=MAX_SUGGESTION_LIMIT`.

use crate::logging::default_log_level;
use crate::search::suggest::DEFAULT_SUGGESTION_LIMIT;
use log::warn;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "EQUIVALE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "EQUIVALE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "EQUIVALE_LOG_DIR";
pub const ENV_SUGGESTION_LIMIT: &str = "EQUIVALE_SUGGESTION_LIMIT";

pub const DEFAULT_DB_FILE_NAME: &str = "equivale.sqlite3";
pub const MAX_SUGGESTION_LIMIT: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
    /// Names taken from each partition per suggestion request.
    pub suggestion_limit: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: value(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            log_level: value(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: value(ENV_LOG_DIR).map(PathBuf::from),
            suggestion_limit: value(ENV_SUGGESTION_LIMIT)
                .map(|raw| parse_suggestion_limit(&raw))
                .unwrap_or(defaults.suggestion_limit),
        }
    }
}

/// Zero falls back to the default; larger values are capped.
pub fn clamp_suggestion_limit(value: u32) -> u32 {
    match value {
        0 => DEFAULT_SUGGESTION_LIMIT,
        value => value.min(MAX_SUGGESTION_LIMIT),
    }
}

/// Clamps a configured suggestion limit; unparsable values use the default.
pub fn parse_suggestion_limit(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(value) => clamp_suggestion_limit(value),
        Err(_) => {
            warn!(
                "event=config module=core status=invalid key={} fallback={}",
                ENV_SUGGESTION_LIMIT, DEFAULT_SUGGESTION_LIMIT
            );
            DEFAULT_SUGGESTION_LIMIT
        }
    }
}
