//! Typed configuration from environment variables.
//!
//! Loads once at startup. Every variable has a default, but values that
//! are present must be valid.

use crate::error::{Error, Result};

pub const DEFAULT_SERVICE_NAME: &str = "dedupq";

#[derive(Debug, Clone)]
pub struct Config {
    pub otel_endpoint: Option<String>,
    pub log_level: String,
    pub service_name: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service_name = match lookup("DEDUPQ_SERVICE") {
            Some(name) if name.trim().is_empty() => {
                return Err(Error::Config(
                    "DEDUPQ_SERVICE is set but empty".to_string(),
                ));
            }
            Some(name) => name,
            None => DEFAULT_SERVICE_NAME.to_string(),
        };

        Ok(Self {
            otel_endpoint: lookup("OTEL_ENDPOINT").filter(|e| !e.is_empty()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            service_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config.otel_endpoint, None);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.service_name, DEFAULT_SERVICE_NAME);
    }

    #[test]
    fn reads_all_fields() {
        let config = Config::from_lookup(lookup_in(&[
            ("OTEL_ENDPOINT", "http://localhost:4317"),
            ("LOG_LEVEL", "dedupq=trace"),
            ("DEDUPQ_SERVICE", "walker"),
        ]))
        .unwrap();
        assert_eq!(config.otel_endpoint.as_deref(), Some("http://localhost:4317"));
        assert_eq!(config.log_level, "dedupq=trace");
        assert_eq!(config.service_name, "walker");
    }

    #[test]
    fn empty_endpoint_means_unset() {
        let config = Config::from_lookup(lookup_in(&[("OTEL_ENDPOINT", "")])).unwrap();
        assert!(config.otel_endpoint.is_none());
    }

    #[test]
    fn rejects_blank_service_name() {
        let result = Config::from_lookup(lookup_in(&[("DEDUPQ_SERVICE", "  ")]));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
