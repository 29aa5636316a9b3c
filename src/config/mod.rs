//! Configuration module.
//!
//! Configuration is loaded from an optional JSON file (`config.json` or the
//! path in `CHESS_ARBITER_CONFIG`), with environment-variable overrides for
//! the common knobs and code defaults for everything else.

pub mod defaults;
pub mod loader;
pub mod logging;
pub mod protocol;
pub mod server;
pub mod types;

pub use loader::load;
pub use logging::{LogFormat, LogLevel, LoggingConfig};
pub use protocol::ProtocolConfig;
pub use server::ServerConfig;
pub use types::Config;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.port, 3000);
        assert_eq!(config.server.forfeit_window_secs, 60);
        assert_eq!(config.server.default_elo, 1200);
        assert_eq!(config.server.room_sweep_interval_secs, 60);
        assert_eq!(config.server.idle_room_timeout_secs, 3600);

        assert_eq!(config.protocol.room_code_length, 6);
        assert_eq!(config.protocol.max_chat_message_length, 500);
        assert_eq!(config.protocol.max_username_length, 32);

        assert_eq!(config.logging.dir, "logs");
        assert_eq!(config.logging.filename, "server.log");
        assert_eq!(config.logging.rotation, "daily");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&json).unwrap();

        assert_eq!(config.port, deserialized.port);
        assert_eq!(
            config.server.forfeit_window_secs,
            deserialized.server.forfeit_window_secs
        );
        assert_eq!(
            config.protocol.max_chat_message_length,
            deserialized.protocol.max_chat_message_length
        );
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"port": 8080}"#).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.server.forfeit_window_secs, 60);
        assert_eq!(config.protocol.room_code_length, 6);
    }

    #[test]
    fn test_log_level_as_str() {
        assert_eq!(LogLevel::Trace.as_str(), "trace");
        assert_eq!(LogLevel::Debug.as_str(), "debug");
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Warn.as_str(), "warn");
        assert_eq!(LogLevel::Error.as_str(), "error");
    }
}
