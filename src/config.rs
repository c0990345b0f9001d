//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// API server configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Database ===
    /// PostgreSQL connection string. Required; startup fails without it.
    pub database_url: String,

    /// Maximum connections in the pool.
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    /// Maximum attempts for a transient database failure.
    #[serde(default = "default_db_max_retries")]
    pub db_max_retries: u32,

    /// Cap on the backoff delay between attempts, in seconds.
    #[serde(default = "default_db_max_retry_delay_s")]
    pub db_max_retry_delay_s: u64,

    // === Server Configuration ===
    /// HTTP server port for the API.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Comma-separated origin allow-list. Unset allows any origin.
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    // === Metrics ===
    /// Enable the Prometheus exporter.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Port for the Prometheus scrape endpoint.
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

/// Upstream status proxy configuration.
///
/// Loaded separately so the proxy runs without a database configured, the
/// way it deploys as its own service.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyConfig {
    /// Upstream status API endpoint.
    #[serde(default = "default_upstream_status_url")]
    pub upstream_status_url: String,

    /// Bearer token for the upstream status API.
    #[serde(default)]
    pub upstream_api_key: Option<String>,

    /// HTTP server port for the proxy.
    #[serde(default = "default_proxy_port")]
    pub proxy_port: u16,
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_db_max_retries() -> u32 {
    5
}

fn default_db_max_retry_delay_s() -> u64 {
    30
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_metrics_port() -> u16 {
    9090
}

fn default_upstream_status_url() -> String {
    "https://api.render.com/v1/services".to_string()
}

fn default_proxy_port() -> u16 {
    3001
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("DATABASE_URL is required".to_string());
        }

        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err("DATABASE_URL must be a postgres:// connection string".to_string());
        }

        if self.db_max_retries == 0 {
            return Err("DB_MAX_RETRIES must be at least 1".to_string());
        }

        if let Some(origins) = &self.cors_allowed_origins {
            if origins.split(',').any(|o| o.trim().is_empty()) {
                return Err("CORS_ALLOWED_ORIGINS contains an empty origin".to_string());
            }
        }

        Ok(())
    }

    /// Parsed origin allow-list, or `None` for allow-any.
    pub fn cors_origins(&self) -> Option<Vec<String>> {
        self.cors_allowed_origins
            .as_ref()
            .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
    }
}

impl ProxyConfig {
    /// Load proxy configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            database_url: "postgres://localhost/todo".to_string(),
            db_max_connections: default_db_max_connections(),
            db_max_retries: default_db_max_retries(),
            db_max_retry_delay_s: default_db_max_retry_delay_s(),
            port: default_port(),
            cors_allowed_origins: None,
            rust_log: default_log_level(),
            metrics_enabled: true,
            metrics_port: default_metrics_port(),
        }
    }

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_db_max_retries(), 5);
        assert_eq!(default_db_max_retry_delay_s(), 30);
        assert_eq!(default_port(), 8080);
        assert_eq!(default_proxy_port(), 3001);
        assert!(default_true());
    }

    #[test]
    fn validate_accepts_postgres_url() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_database_url() {
        let config = Config {
            database_url: "".to_string(),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_postgres_scheme() {
        let config = Config {
            database_url: "mysql://localhost/todo".to_string(),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_retry_budget() {
        let config = Config {
            db_max_retries: 0,
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_cors_entry() {
        let config = Config {
            cors_allowed_origins: Some("http://localhost:3000,,".to_string()),
            ..base_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn cors_origins_splits_and_trims() {
        let config = Config {
            cors_allowed_origins: Some(
                "http://localhost:3000, https://todo.example.com".to_string(),
            ),
            ..base_config()
        };
        let origins = config.cors_origins().unwrap();
        assert_eq!(
            origins,
            vec![
                "http://localhost:3000".to_string(),
                "https://todo.example.com".to_string()
            ]
        );
    }

    #[test]
    fn cors_origins_none_means_allow_any() {
        assert!(base_config().cors_origins().is_none());
    }
}
