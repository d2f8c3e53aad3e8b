//! Domain types and validators for ai-services configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "runtime.binary",
    "runtime.call_timeout_secs",
    "readiness.timeout_secs",
    "readiness.poll_interval_secs",
    "retry.max_attempts",
    "retry.base_delay_ms",
    "retry.max_delay_ms",
    "templates.dir",
];

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.ai-services/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub runtime: RuntimeConfig,
    pub readiness: ReadinessConfig,
    pub retry: RetryConfig,
    pub templates: TemplatesConfig,
}

/// Container runtime settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Runtime CLI to invoke (`podman`).
    pub binary: String,
    /// Per-call timeout; exceeding it counts as the runtime being unavailable.
    pub call_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            binary: "podman".to_string(),
            call_timeout_secs: 60,
        }
    }
}

impl RuntimeConfig {
    #[must_use]
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// Bounded readiness wait after pods are submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReadinessConfig {
    pub timeout_secs: u64,
    pub poll_interval_secs: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            poll_interval_secs: 5,
        }
    }
}

impl ReadinessConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Retry policy for transient runtime failures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 8000,
        }
    }
}

impl RetryConfig {
    /// Backoff before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
    /// capped at `max_delay_ms`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u64
            .checked_shl(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        let ms = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(ms)
    }
}

/// Where application templates come from.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Directory containing `applications/<kind>/*.tmpl`. Unset means the
    /// templates compiled into the binary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<(), ConfigError> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        });
    }
    Ok(())
}

/// Validate `value` for `key` and store it in `config`.
///
/// # Errors
///
/// Returns an error if the key is unknown or the value is not valid for it.
pub fn set_config_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    validate_config_key(key)?;
    match key {
        "runtime.binary" => {
            if value.trim().is_empty() {
                return Err(invalid(key, value, "Expected a program name or path."));
            }
            config.runtime.binary = value.to_string();
        }
        "runtime.call_timeout_secs" => config.runtime.call_timeout_secs = positive(key, value)?,
        "readiness.timeout_secs" => config.readiness.timeout_secs = number(key, value)?,
        "readiness.poll_interval_secs" => {
            config.readiness.poll_interval_secs = positive(key, value)?;
        }
        "retry.max_attempts" => {
            config.retry.max_attempts = u32::try_from(positive(key, value)?)
                .map_err(|_| invalid(key, value, "Expected a positive integer."))?;
        }
        "retry.base_delay_ms" => config.retry.base_delay_ms = number(key, value)?,
        "retry.max_delay_ms" => config.retry.max_delay_ms = number(key, value)?,
        "templates.dir" => {
            config.templates.dir = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        other => {
            return Err(ConfigError::UnknownKey {
                key: other.to_string(),
                valid: VALID_CONFIG_KEYS.join(", "),
            });
        }
    }
    Ok(())
}

fn invalid(key: &str, value: &str, expected: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

fn number(key: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .parse()
        .map_err(|_| invalid(key, value, "Expected a non-negative integer."))
}

fn positive(key: &str, value: &str) -> Result<u64, ConfigError> {
    match number(key, value) {
        Ok(0) | Err(_) => Err(invalid(key, value, "Expected a positive integer.")),
        Ok(n) => Ok(n),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
