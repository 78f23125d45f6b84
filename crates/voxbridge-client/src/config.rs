//! Bridge configuration loaded from environment variables.
//!
//! All settings have defaults so a development build can run with zero
//! configuration against local services.

use std::time::Duration;

/// Bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL of the backend ledger service.
    /// Env: `VOX_LEDGER_URL`
    /// Default: `http://127.0.0.1:8080`
    pub ledger_url: String,

    /// URL of the storage cluster endpoint advertising buckets.
    /// Env: `VOX_CLUSTER_URL`
    /// Default: `http://127.0.0.1:8081`
    pub cluster_url: String,

    /// Per-request timeout for ledger and storage calls.
    /// Env: `VOX_REQUEST_TIMEOUT_SECS`
    /// Default: 30 seconds.
    pub request_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            ledger_url: "http://127.0.0.1:8080".to_string(),
            cluster_url: "http://127.0.0.1:8081".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl BridgeConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults. Malformed values warn and keep the default, never fail.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("VOX_LEDGER_URL") {
            config.ledger_url = url;
        }

        if let Ok(url) = std::env::var("VOX_CLUSTER_URL") {
            config.cluster_url = url;
        }

        if let Ok(secs) = std::env::var("VOX_REQUEST_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(parsed) if parsed > 0 => {
                    config.request_timeout = Duration::from_secs(parsed);
                }
                _ => {
                    tracing::warn!(
                        value = %secs,
                        "Invalid VOX_REQUEST_TIMEOUT_SECS, using default"
                    );
                }
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.ledger_url, "http://127.0.0.1:8080");
        assert_eq!(config.cluster_url, "http://127.0.0.1:8081");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }
}
