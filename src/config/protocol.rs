use serde::{Deserialize, Serialize};

use super::defaults;

/// Protocol settings: code format and payload limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolConfig {
    /// Characters in a generated room code.
    pub room_code_length: usize,
    /// Maximum chat message length in characters.
    pub max_chat_message_length: usize,
    /// Maximum username length in characters.
    pub max_username_length: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            room_code_length: defaults::default_room_code_length(),
            max_chat_message_length: defaults::default_max_chat_message_length(),
            max_username_length: defaults::default_max_username_length(),
        }
    }
}
