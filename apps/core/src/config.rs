//! Runtime configuration, read from the environment (after `.env` is loaded).

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use validator::{Validate, ValidationError};

use crate::error::AppError;
use crate::fs_manager::PortablePathManager;

/// Whether a persona's declared capabilities gate content generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityPolicy {
    /// Every persona can produce every content type; a mismatch is only logged.
    #[default]
    Advisory,
    /// Requests outside the persona's capabilities get a refusal text.
    Enforce,
}

impl std::str::FromStr for CapabilityPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "advisory" => Ok(CapabilityPolicy::Advisory),
            "enforce" => Ok(CapabilityPolicy::Enforce),
            other => Err(AppError::Config(format!(
                "HGPT_CAPABILITY_POLICY must be 'advisory' or 'enforce', got '{}'",
                other
            ))),
        }
    }
}

/// Settings for a chat session and its supervisor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_delay_within_timeout"))]
pub struct ChatConfig {
    /// Simulated thinking time before each reply, in milliseconds.
    #[validate(range(max = 60000))]
    pub response_delay_ms: u64,
    /// Budget for producing one reply (delay included), in seconds. Also
    /// bounds how long a caller waits for room in the supervisor queue.
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,
    pub capability_policy: CapabilityPolicy,
    /// Where saved artifacts are written.
    pub downloads_dir: PathBuf,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            response_delay_ms: 1000,
            request_timeout_secs: 30,
            capability_policy: CapabilityPolicy::Advisory,
            downloads_dir: PortablePathManager::downloads_dir(),
        }
    }
}

/// The simulated delay must leave time for the reply itself.
fn validate_delay_within_timeout(config: &ChatConfig) -> Result<(), ValidationError> {
    if config.response_delay() >= config.request_timeout() {
        let mut err = ValidationError::new("delay_exceeds_timeout");
        err.message = Some(
            format!(
                "response delay {}ms must be shorter than request timeout {}s",
                config.response_delay_ms, config.request_timeout_secs
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

fn parse_u64(key: &str) -> Result<Option<u64>, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{} must be an integer: {}", key, e))),
        Err(_) => Ok(None),
    }
}

impl ChatConfig {
    /// Defaults overridden by `HGPT_*` environment variables, then validated.
    pub fn from_env() -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(delay) = parse_u64("HGPT_RESPONSE_DELAY_MS")? {
            config.response_delay_ms = delay;
        }
        if let Some(timeout) = parse_u64("HGPT_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout_secs = timeout;
        }
        if let Ok(policy) = env::var("HGPT_CAPABILITY_POLICY") {
            config.capability_policy = policy.parse()?;
        }
        if let Ok(dir) = env::var("HGPT_DOWNLOADS_DIR") {
            config.downloads_dir = PathBuf::from(dir);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// No artificial delay; used by tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            response_delay_ms: 0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 4] = [
        "HGPT_RESPONSE_DELAY_MS",
        "HGPT_REQUEST_TIMEOUT_SECS",
        "HGPT_CAPABILITY_POLICY",
        "HGPT_DOWNLOADS_DIR",
    ];

    #[test]
    fn test_defaults_without_env() {
        temp_env::with_vars_unset(KEYS, || {
            let config = ChatConfig::from_env().unwrap();
            assert_eq!(config.response_delay_ms, 1000);
            assert_eq!(config.request_timeout_secs, 30);
            assert_eq!(config.capability_policy, CapabilityPolicy::Advisory);
        });
    }

    #[test]
    fn test_env_overrides() {
        temp_env::with_vars(
            [
                ("HGPT_RESPONSE_DELAY_MS", Some("0")),
                ("HGPT_REQUEST_TIMEOUT_SECS", Some("5")),
                ("HGPT_CAPABILITY_POLICY", Some("Enforce")),
                ("HGPT_DOWNLOADS_DIR", Some("/tmp/hgpt-downloads")),
            ],
            || {
                let config = ChatConfig::from_env().unwrap();
                assert_eq!(config.response_delay(), Duration::ZERO);
                assert_eq!(config.request_timeout(), Duration::from_secs(5));
                assert_eq!(config.capability_policy, CapabilityPolicy::Enforce);
                assert_eq!(config.downloads_dir, PathBuf::from("/tmp/hgpt-downloads"));
            },
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        temp_env::with_var("HGPT_RESPONSE_DELAY_MS", Some("soon"), || {
            assert!(matches!(ChatConfig::from_env(), Err(AppError::Config(_))));
        });
        temp_env::with_var("HGPT_REQUEST_TIMEOUT_SECS", Some("0"), || {
            assert!(matches!(ChatConfig::from_env(), Err(AppError::Validation(_))));
        });
        temp_env::with_var("HGPT_CAPABILITY_POLICY", Some("strict"), || {
            assert!(ChatConfig::from_env().is_err());
        });
    }

    #[test]
    fn test_delay_must_fit_in_timeout() {
        let config = ChatConfig {
            response_delay_ms: 2000,
            request_timeout_secs: 1,
            ..ChatConfig::default()
        };
        assert!(config.validate().is_err());

        let equal = ChatConfig {
            response_delay_ms: 1000,
            request_timeout_secs: 1,
            ..ChatConfig::default()
        };
        assert!(equal.validate().is_err());

        let fits = ChatConfig {
            response_delay_ms: 999,
            request_timeout_secs: 1,
            ..ChatConfig::default()
        };
        assert!(fits.validate().is_ok());

        temp_env::with_vars(
            [
                ("HGPT_RESPONSE_DELAY_MS", Some("60000")),
                ("HGPT_REQUEST_TIMEOUT_SECS", None),
            ],
            || {
                assert!(matches!(ChatConfig::from_env(), Err(AppError::Validation(_))));
            },
        );
    }
}
