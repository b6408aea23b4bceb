//! Engine configuration read from the environment.

use std::time::Duration;

pub const DEFAULT_DB_PATH: &str = "classquest.db";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;
pub const DEFAULT_BATCH_SIZE: u32 = 50;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub db_path: String,
    pub poll_interval: Duration,
    pub batch_size: u32,
    pub max_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            batch_size: DEFAULT_BATCH_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing, empty, zero or unparsable values
    /// fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup("CLASSQUEST_DB")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.into());
        let poll_interval_ms = positive(&lookup, "OUTBOX_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS);
        let batch_size = positive(&lookup, "OUTBOX_BATCH_SIZE", DEFAULT_BATCH_SIZE);
        let max_attempts = positive(&lookup, "OUTBOX_MAX_ATTEMPTS", DEFAULT_MAX_ATTEMPTS);

        Self {
            db_path,
            poll_interval: Duration::from_millis(poll_interval_ms),
            batch_size,
            max_attempts,
        }
    }
}

fn positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + PartialOrd + Default + std::fmt::Display + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) if value > T::default() => value,
            _ => {
                tracing::warn!(key, value = %raw, fallback = %default, "Invalid config value, using default");
                default
            }
        },
    }
}
