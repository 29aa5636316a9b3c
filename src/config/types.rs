use serde::{Deserialize, Serialize};

use super::defaults;
use super::logging::LoggingConfig;
use super::protocol::ProtocolConfig;
use super::server::ServerConfig;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TCP port the HTTP/WebSocket listener binds.
    pub port: u16,
    pub server: ServerConfig,
    pub protocol: ProtocolConfig,
    pub logging: LoggingConfig,
    /// Comma-separated CORS origins, or `*` for permissive.
    pub cors_origins: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: defaults::default_port(),
            server: ServerConfig::default(),
            protocol: ProtocolConfig::default(),
            logging: LoggingConfig::default(),
            cors_origins: defaults::default_cors_origins(),
        }
    }
}
