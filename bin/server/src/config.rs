//! Centralized server configuration.
//!
//! This module provides strongly-typed configuration for the server,
//! loaded via the `config` crate from environment variables.
//!
//! See [`KeycloakConfig`](keycloak_gate_access::KeycloakConfig) for the
//! identity provider settings (`KEYCLOAK__SERVER_URL`, `KEYCLOAK__REALM`, ...).

use keycloak_gate_access::KeycloakConfig;
use serde::Deserialize;

/// Server configuration composed from library configs.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Keycloak realm configuration.
    pub keycloak: KeycloakConfig,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true),
        )
    }

    /// Loads configuration from an arbitrary `config` source.
    ///
    /// # Errors
    ///
    /// Returns an error if required configuration is missing or invalid.
    pub fn from_source<T>(source: T) -> Result<Self, config::ConfigError>
    where
        T: config::Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn loads_keycloak_section_with_defaults() {
        let source = File::from_str(
            r#"{
                "keycloak": {
                    "server_url": "http://localhost:8080",
                    "realm": "dev",
                    "client_id": "gate",
                    "client_secret": "secret"
                }
            }"#,
            FileFormat::Json,
        );

        let config = ServerConfig::from_source(source).expect("config");

        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.keycloak.realm(), "dev");
        assert_eq!(config.keycloak.timeout_seconds(), 10);
    }

    #[test]
    fn missing_keycloak_section_is_an_error() {
        let source = File::from_str(r#"{"bind_addr": "0.0.0.0:9000"}"#, FileFormat::Json);
        assert!(ServerConfig::from_source(source).is_err());
    }
}
