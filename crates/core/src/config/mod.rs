//! Configuration module for vecmend
//!
//! All configuration comes from environment variables, read once at startup
//! into an immutable [`Config`] that is passed to every component. No other
//! code reads the environment directly.

mod defaults;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

use defaults::*;

/// Vector-index service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaviateConfig {
    /// Base URL of the service, e.g. `http://weaviate:8080`
    #[serde(default = "default_weaviate_endpoint")]
    pub endpoint: String,

    /// Bearer token; `None` disables authentication
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Dataset registry (PostgreSQL) connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_db_host")]
    pub host: String,

    #[serde(default = "default_db_port")]
    pub port: u16,

    #[serde(default = "default_db_user")]
    pub user: String,

    #[serde(default = "default_db_password")]
    pub password: String,

    #[serde(default = "default_db_database")]
    pub database: String,
}

/// Main configuration structure for vecmend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub weaviate: WeaviateConfig,
    pub registry: RegistryConfig,
}

impl Config {
    /// Build the configuration from environment variables.
    ///
    /// | variable              | default                |
    /// |-----------------------|------------------------|
    /// | `WEAVIATE_ENDPOINT`   | `http://weaviate:8080` |
    /// | `WEAVIATE_API_KEY`    | empty (auth disabled)  |
    /// | `DATASET_DB_HOST`     | `db`                   |
    /// | `DATASET_DB_PORT`     | `5432`                 |
    /// | `DATASET_DB_USER`     | `postgres`             |
    /// | `DATASET_DB_PASSWORD` | `postgres`             |
    /// | `DATASET_DB_NAME`     | `datasets`             |
    pub fn from_env() -> Result<Self> {
        let port = match env_var("DATASET_DB_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| Error::config(format!("Invalid DATASET_DB_PORT '{raw}': {e}")))?,
            None => default_db_port(),
        };

        Ok(Self {
            weaviate: WeaviateConfig {
                endpoint: env_var("WEAVIATE_ENDPOINT")
                    .unwrap_or_else(default_weaviate_endpoint),
                api_key: env_var("WEAVIATE_API_KEY"),
            },
            registry: RegistryConfig {
                host: env_var("DATASET_DB_HOST").unwrap_or_else(default_db_host),
                port,
                user: env_var("DATASET_DB_USER").unwrap_or_else(default_db_user),
                password: env_var("DATASET_DB_PASSWORD").unwrap_or_else(default_db_password),
                database: env_var("DATASET_DB_NAME").unwrap_or_else(default_db_database),
            },
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.weaviate.endpoint.is_empty() {
            return Err(Error::config("WEAVIATE_ENDPOINT must not be empty"));
        }
        if !self.weaviate.endpoint.starts_with("http://")
            && !self.weaviate.endpoint.starts_with("https://")
        {
            return Err(Error::config(format!(
                "WEAVIATE_ENDPOINT must be an http(s) URL, got '{}'",
                self.weaviate.endpoint
            )));
        }
        if self.registry.port == 0 {
            return Err(Error::config("DATASET_DB_PORT must not be 0"));
        }
        Ok(())
    }
}

impl RegistryConfig {
    /// Postgres connection URL assembled from the individual settings
    pub fn connection_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

/// Read an environment variable, treating unset and empty as absent
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_config() -> Config {
        Config {
            weaviate: WeaviateConfig {
                endpoint: default_weaviate_endpoint(),
                api_key: None,
            },
            registry: RegistryConfig {
                host: default_db_host(),
                port: default_db_port(),
                user: default_db_user(),
                password: default_db_password(),
                database: default_db_database(),
            },
        }
    }

    #[test]
    fn defaults_produce_a_valid_config() {
        let config = test_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.weaviate.endpoint, "http://weaviate:8080");
        assert_eq!(config.registry.port, 5432);
    }

    #[test]
    fn connection_url_includes_all_parts() {
        let config = test_config();
        assert_eq!(
            config.registry.connection_url(),
            "postgres://postgres:postgres@db:5432/datasets"
        );
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let mut config = test_config();
        config.weaviate.endpoint = "weaviate:8080".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_port_is_rejected() {
        let mut config = test_config();
        config.registry.port = 0;
        assert!(config.validate().is_err());
    }
}
