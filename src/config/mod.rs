//! # Configuration Management
//!
//! Environment-driven configuration for the Lockbox secret store. Every
//! knob has a default so a bare `lockbox serve` works against a local
//! SQLite file; the client registry is the one piece with no useful
//! default and is parsed from a JSON document.

use std::time::Duration;

use serde::Deserialize;

use crate::errors::{Error, Result};

/// Application configuration assembled from `LOCKBOX_*` environment variables
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sweeper: SweeperConfig,
    pub clients: Vec<ClientConfig>,
}

/// HTTP API server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0".to_string(), port: 8080 }
    }
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://lockbox.db".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Expiry sweeper configuration
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    pub interval_secs: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self { interval_secs: 600 }
    }
}

impl SweeperConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// One entry of the injected client registry: a bearer token bound to a
/// caller name and its granted scope set. Identity verification proper is
/// an external collaborator; this registry is its interface boundary.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub client_id: String,
    pub token: String,
    pub scopes: Vec<String>,
}

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("LOCKBOX_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|e| Error::config(format!("Invalid API port: {}", e)))?;

        let bind_address =
            std::env::var("LOCKBOX_BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());

        let database_url = std::env::var("LOCKBOX_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://lockbox.db".to_string());

        let max_connections = std::env::var("LOCKBOX_DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|e| Error::config(format!("Invalid max connections: {}", e)))?;

        let interval_secs = std::env::var("LOCKBOX_SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "600".to_string())
            .parse()
            .map_err(|e| Error::config(format!("Invalid sweep interval: {}", e)))?;

        let clients = match std::env::var("LOCKBOX_CLIENTS") {
            Ok(raw) => parse_clients(&raw)?,
            Err(_) => Vec::new(),
        };

        Ok(Self {
            server: ServerConfig { bind_address, port },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
                ..DatabaseConfig::default()
            },
            sweeper: SweeperConfig { interval_secs },
            clients,
        })
    }
}

/// Parse the client registry document:
/// `[{"clientId": "...", "token": "...", "scopes": ["..."]}]`
pub fn parse_clients(raw: &str) -> Result<Vec<ClientConfig>> {
    let clients: Vec<ClientConfig> = serde_json::from_str(raw)
        .map_err(|e| Error::config(format!("Invalid client registry document: {}", e)))?;

    for client in &clients {
        if client.client_id.is_empty() {
            return Err(Error::config("client registry entry with empty clientId"));
        }
        if client.token.is_empty() {
            return Err(Error::config(format!(
                "client '{}' has an empty token",
                client.client_id
            )));
        }
    }

    Ok(clients)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.url, "sqlite://lockbox.db");
        assert_eq!(config.sweeper.interval_secs, 600);
        assert!(config.clients.is_empty());
    }

    #[test]
    fn test_parse_clients() {
        let raw = r#"[
            {"clientId": "captain-write", "token": "tok-1", "scopes": ["secrets:set:captain:*"]},
            {"clientId": "captain-read", "token": "tok-2", "scopes": ["secrets:get:captain:*"]}
        ]"#;

        let clients = parse_clients(raw).unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].client_id, "captain-write");
        assert_eq!(clients[1].scopes, vec!["secrets:get:captain:*".to_string()]);
    }

    #[test]
    fn test_parse_clients_rejects_empty_token() {
        let raw = r#"[{"clientId": "broken", "token": "", "scopes": []}]"#;
        assert!(parse_clients(raw).is_err());
    }

    #[test]
    fn test_parse_clients_rejects_malformed_document() {
        assert!(parse_clients("not json").is_err());
    }
}
