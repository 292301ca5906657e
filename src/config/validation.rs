//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, port != 0)
//! - Check the upstream URL and credential are usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a loaded configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::new("listener.host", "must not be empty"));
    }
    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must not be 0"));
    }

    let upstream = &config.upstream;
    match Url::parse(&upstream.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("upstream.url", e.to_string())),
    }
    if upstream.token.is_empty() {
        errors.push(ValidationError::new(
            "upstream.token",
            "must be set (config file or UPSTREAM_TOKEN)",
        ));
    }
    if upstream.default_records.is_empty() {
        errors.push(ValidationError::new("upstream.default_records", "must not be empty"));
    }
    if upstream.probe_records.is_empty() {
        errors.push(ValidationError::new("upstream.probe_records", "must not be empty"));
    }
    if upstream.fetch_timeout_ms == 0 {
        errors.push(ValidationError::new("upstream.fetch_timeout_ms", "must be greater than 0"));
    }
    if upstream.probe_timeout_ms == 0 {
        errors.push(ValidationError::new("upstream.probe_timeout_ms", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            "expected 'pretty' or 'json'",
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a valid socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.upstream.token = "token".into();
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_token_rejected() {
        let config = RelayConfig::default();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "upstream.token");
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.listener.port = 0;
        config.upstream.url = "ftp://example.com/stats".into();
        config.upstream.fetch_timeout_ms = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["listener.port", "upstream.url", "upstream.fetch_timeout_ms"]
        );
        assert!(errors[1].to_string().contains("unsupported scheme 'ftp'"));
    }

    #[test]
    fn test_example_config_is_valid() {
        let config: RelayConfig = toml::from_str(include_str!("../../relay.example.toml")).unwrap();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = valid_config();
        config.observability.metrics_address = "not-an-address".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }
}
