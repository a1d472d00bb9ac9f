//! Configuration schema definitions.
//!
//! All sections default, so an empty file (or no file) is a valid
//! configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the publishing API.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// API path layout and listing defaults.
    pub api: ApiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits and CORS.
    pub security: SecurityConfig,

    /// Session and credential settings.
    pub auth: AuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Where the API lives. Links are built from `{prefix}/{version}`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub prefix: String,
    pub version: String,

    /// Applied to listings when the request carries no `limit`.
    pub default_limit: Option<usize>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            version: "v1".to_string(),
            default_limit: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,

    /// Answer CORS preflights for any origin.
    pub cors_allow_any: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 1024 * 1024,
            cors_allow_any: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Lifetime of an issued bearer token.
    pub session_ttl_secs: u64,

    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 3600,
            min_password_len: 8,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api.prefix, "/api");
        assert_eq!(config.auth.min_password_len, 8);
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            version = "v2"
            default_limit = 20

            [timeouts]
            request_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.api.prefix, "/api");
        assert_eq!(config.api.version, "v2");
        assert_eq!(config.api.default_limit, Some(20));
        assert_eq!(config.timeouts.request_secs, 5);
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }
}
