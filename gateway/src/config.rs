//! Configuration for the Scribe gateway
//!
//! Loads settings from:
//! 1. Environment variables
//! 2. .env file (local development)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Upstream data service binding
    pub binding: BindingConfig,

    /// Bearer token configuration
    pub auth: AuthConfig,

    /// GraphQL configuration
    pub graphql: GraphQLConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingConfig {
    /// Data service endpoint, e.g. "http://localhost:4466/scribe/dev"
    pub endpoint: String,
    /// Secret the data service was deployed with
    pub secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign and verify bearer tokens
    pub secret: String,
    /// Lifetime of tokens issued at login, in days
    pub token_expiry_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphQLConfig {
    /// Enable the GraphQL playground page
    pub playground: bool,
    /// Enable introspection
    pub introspection: bool,
}

impl Config {
    /// Load configuration from environment variables, falling back to a
    /// .env file for local development.
    ///
    /// `APP_SECRET` and `DATA_SERVICE_SECRET` are required; everything
    /// else has a default.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(4000),
                workers: env::var("SERVER_WORKERS")
                    .ok()
                    .and_then(|w| w.parse().ok())
                    .unwrap_or_else(num_cpus::get),
            },
            binding: BindingConfig {
                endpoint: env::var("DATA_SERVICE_URL")
                    .unwrap_or_else(|_| "http://localhost:4466/scribe/dev".to_string()),
                secret: env::var("DATA_SERVICE_SECRET")
                    .context("DATA_SERVICE_SECRET must be set")?,
            },
            auth: AuthConfig {
                secret: env::var("APP_SECRET").context("APP_SECRET must be set")?,
                token_expiry_days: env::var("TOKEN_EXPIRY_DAYS")
                    .ok()
                    .and_then(|d| d.parse().ok())
                    .unwrap_or(auth_core::token::DEFAULT_TOKEN_EXPIRY_DAYS),
            },
            graphql: GraphQLConfig {
                playground: env::var("GRAPHQL_PLAYGROUND")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(true),
                introspection: env::var("GRAPHQL_INTROSPECTION")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(true),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test mutating the environment: keeping it alone in this module
    // avoids racing other tests over the same variables.
    #[test]
    fn test_config_defaults_with_required_secrets() {
        env::set_var("APP_SECRET", "test-app-secret");
        env::set_var("DATA_SERVICE_SECRET", "test-binding-secret");

        let config = Config::from_env().expect("config should load with defaults");

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.binding.endpoint, "http://localhost:4466/scribe/dev");
        assert_eq!(config.auth.secret, "test-app-secret");
        assert_eq!(
            config.auth.token_expiry_days,
            auth_core::token::DEFAULT_TOKEN_EXPIRY_DAYS
        );
        assert!(config.graphql.playground);
        assert!(config.graphql.introspection);

        env::remove_var("APP_SECRET");
        env::remove_var("DATA_SERVICE_SECRET");

        // Without the required secrets, loading must fail
        assert!(Config::from_env().is_err());
    }
}
