//! Default value functions referenced by the serde derives.

pub fn default_port() -> u16 {
    3000
}

pub fn default_forfeit_window_secs() -> u64 {
    60
}

pub fn default_room_sweep_interval_secs() -> u64 {
    60
}

pub fn default_idle_room_timeout_secs() -> u64 {
    3600
}

pub fn default_elo() -> i32 {
    1200
}

pub fn default_max_message_size() -> usize {
    64 * 1024
}

pub fn default_room_code_length() -> usize {
    6
}

pub fn default_max_chat_message_length() -> usize {
    500
}

pub fn default_max_username_length() -> usize {
    32
}

pub fn default_cors_origins() -> String {
    "*".to_string()
}

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "server.log".to_string()
}

pub fn default_log_rotation() -> String {
    "daily".to_string()
}
