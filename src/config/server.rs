use serde::{Deserialize, Serialize};

use super::defaults;

/// Server behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Seconds a disconnected seat may reconnect before forfeiting.
    pub forfeit_window_secs: u64,
    /// Rating assigned to users the store has never seen.
    pub default_elo: i32,
    /// Interval between sweeps for abandoned rooms.
    pub room_sweep_interval_secs: u64,
    /// A room with no activity for this long and no connected seat is
    /// deleted by the sweeper.
    pub idle_room_timeout_secs: u64,
    /// Maximum accepted WebSocket text frame size in bytes.
    pub max_message_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            forfeit_window_secs: defaults::default_forfeit_window_secs(),
            default_elo: defaults::default_elo(),
            room_sweep_interval_secs: defaults::default_room_sweep_interval_secs(),
            idle_room_timeout_secs: defaults::default_idle_room_timeout_secs(),
            max_message_size: defaults::default_max_message_size(),
        }
    }
}
