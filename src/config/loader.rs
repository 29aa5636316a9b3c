//! Configuration loading and environment parsing.

use std::env;
use std::fs;
use std::path::Path;

use super::Config;

/// Load configuration with the following precedence (highest first):
/// 1) File pointed to by the `CHESS_ARBITER_CONFIG` env var
/// 2) `config.json` in the current working directory
/// 3) Defaults compiled into the binary
///
/// A few common knobs can additionally be overridden by environment
/// variables: `CHESS_ARBITER_PORT`, `CHESS_ARBITER_FORFEIT_WINDOW_SECS`
/// and `CHESS_ARBITER_LOG_LEVEL`.
///
/// Any errors while reading or parsing are printed to stderr and the
/// defaults are used; `load()` always returns a usable `Config`.
#[must_use]
pub fn load() -> Config {
    let mut config = if let Ok(path) = env::var("CHESS_ARBITER_CONFIG") {
        load_file(Path::new(&path)).unwrap_or_default()
    } else {
        load_file(Path::new("config.json")).unwrap_or_default()
    };

    apply_env_overrides(&mut config);
    config
}

fn load_file(path: &Path) -> Option<Config> {
    if !path.exists() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                eprintln!("Failed to parse {}: {e}; using defaults", path.display());
                None
            }
        },
        Err(e) => {
            eprintln!("Failed to read {}: {e}; using defaults", path.display());
            None
        }
    }
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(port) = env::var("CHESS_ARBITER_PORT") {
        match port.parse::<u16>() {
            Ok(port) => config.port = port,
            Err(_) => eprintln!("Ignoring invalid CHESS_ARBITER_PORT value '{port}'"),
        }
    }
    if let Ok(window) = env::var("CHESS_ARBITER_FORFEIT_WINDOW_SECS") {
        match window.parse::<u64>() {
            Ok(secs) => config.server.forfeit_window_secs = secs,
            Err(_) => {
                eprintln!("Ignoring invalid CHESS_ARBITER_FORFEIT_WINDOW_SECS value '{window}'");
            }
        }
    }
    if let Ok(level) = env::var("CHESS_ARBITER_LOG_LEVEL") {
        match serde_json::from_value(serde_json::Value::String(level.to_lowercase())) {
            Ok(level) => config.logging.level = Some(level),
            Err(_) => eprintln!("Ignoring invalid CHESS_ARBITER_LOG_LEVEL value '{level}'"),
        }
    }
}
