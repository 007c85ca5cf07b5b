//! Range checks applied to a loaded `AppConfig`.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

const MAX_BODY_BYTES: u64 = 50 * 1024 * 1024;
const TIMEOUT_RANGE_MS: (u64, u64) = (100, 300_000);
const MAX_REDIRECTS: u64 = 20;

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field: field.to_string(), reason: reason.into() }
    }
}

/// Inclusive range check shared by the numeric settings.
fn check_range(field: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} is outside {min}..={max}")))
    }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` for the first of these that fails:
    /// - `max_bytes` in 1..=50MB
    /// - `timeout_ms` in 100..=300000
    /// - `max_redirects` at most 20
    /// - `user_agent` not blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("max_bytes", self.max_bytes as u64, 1, MAX_BODY_BYTES)?;
        check_range("timeout_ms", self.timeout_ms, TIMEOUT_RANGE_MS.0, TIMEOUT_RANGE_MS.1)?;
        check_range("max_redirects", self.max_redirects as u64, 0, MAX_REDIRECTS)?;

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid("user_agent", "must not be blank"));
        }

        if self.allow_private_hosts {
            tracing::warn!("allow_private_hosts is enabled; loopback and private addresses will be fetched");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_bytes_zero() {
        let config = AppConfig { max_bytes: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_bytes"));
    }

    #[test]
    fn test_validate_timeout_bounds() {
        let too_small = AppConfig { timeout_ms: 50, ..Default::default() };
        assert!(matches!(too_small.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));

        let too_large = AppConfig { timeout_ms: 301_000, ..Default::default() };
        assert!(matches!(too_large.validate(), Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_max_redirects() {
        let config = AppConfig { max_redirects: 21, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_redirects"));

        let config = AppConfig { max_redirects: 0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_blank_user_agent() {
        let config = AppConfig { user_agent: "   ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_invalid_reason_names_range() {
        let config = AppConfig { max_bytes: 60 * 1024 * 1024, ..Default::default() };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_bytes"));
        assert!(err.to_string().contains("1..=52428800"));
    }

    #[test]
    fn test_validate_private_hosts_only_warns() {
        let config = AppConfig { allow_private_hosts: true, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { max_bytes: 1, timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());

        let config = AppConfig { max_bytes: 50 * 1024 * 1024, timeout_ms: 300_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
