use std::net::SocketAddr;
use std::path::Path;

use gs_fabric::BroadcastConfig;
use gs_sdk::HubConfig;
use gs_store::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Largest accepted upload request body.
    pub max_upload_bytes: usize,
    pub store: StoreConfig,
    pub broadcast: BroadcastConfig,
}

impl ServerConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> ServerResult<Self> {
        toml::from_str(s).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn hub_config(&self) -> HubConfig {
        HubConfig {
            store: self.store.clone(),
            broadcast: self.broadcast.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5555)),
            max_upload_bytes: 10 * 1024 * 1024,
            store: StoreConfig::default(),
            broadcast: BroadcastConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:5555".parse::<SocketAddr>().unwrap());
        assert_eq!(c.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(c.hub_config(), HubConfig::default());
    }

    #[test]
    fn full_toml() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"
            max_upload_bytes = 1024

            [store]
            mailbox_capacity = 32
            request_timeout_ms = 100

            [broadcast]
            subscriber_capacity = 4
            delivery_timeout_ms = 50
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.max_upload_bytes, 1024);
        assert_eq!(c.store.mailbox_capacity, 32);
        assert_eq!(c.broadcast.delivery_timeout_ms, 50);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(ServerConfig::from_toml_str("").unwrap(), ServerConfig::default());
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 42").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = ServerConfig::load(Path::new("/nonexistent/gifstream.toml")).unwrap_err();
        assert!(matches!(err, ServerError::Io(_)));
    }
}
