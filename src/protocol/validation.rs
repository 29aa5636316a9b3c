use crate::config::ProtocolConfig;

use super::error_codes::ErrorCode;

/// Validate a chat line: non-empty after trimming, bounded length.
pub fn validate_chat_message(message: &str, config: &ProtocolConfig) -> Result<(), ErrorCode> {
    if message.trim().is_empty() {
        return Err(ErrorCode::MessageEmpty);
    }
    if message.chars().count() > config.max_chat_message_length {
        return Err(ErrorCode::MessageTooLong);
    }
    Ok(())
}

/// Validate a username: 1..=32 characters, letters/digits/'-'/'_'.
pub fn validate_username(username: &str, config: &ProtocolConfig) -> Result<(), ErrorCode> {
    if username.is_empty() || username.chars().count() > config.max_username_length {
        return Err(ErrorCode::InvalidUsername);
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ErrorCode::InvalidUsername);
    }
    Ok(())
}

/// Normalize a room code for lookup: codes are case-insensitive on join.
pub fn normalize_room_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_rejects_empty_and_whitespace() {
        let cfg = ProtocolConfig::default();
        assert_eq!(validate_chat_message("", &cfg), Err(ErrorCode::MessageEmpty));
        assert_eq!(
            validate_chat_message("   ", &cfg),
            Err(ErrorCode::MessageEmpty)
        );
        assert_eq!(validate_chat_message("gg", &cfg), Ok(()));
    }

    #[test]
    fn chat_enforces_length_cap() {
        let cfg = ProtocolConfig::default();
        let at_limit = "x".repeat(500);
        let over_limit = "x".repeat(501);
        assert_eq!(validate_chat_message(&at_limit, &cfg), Ok(()));
        assert_eq!(
            validate_chat_message(&over_limit, &cfg),
            Err(ErrorCode::MessageTooLong)
        );
    }

    #[test]
    fn username_charset_and_length() {
        let cfg = ProtocolConfig::default();
        assert_eq!(validate_username("magnus_c-64", &cfg), Ok(()));
        assert_eq!(validate_username("", &cfg), Err(ErrorCode::InvalidUsername));
        assert_eq!(
            validate_username("has space", &cfg),
            Err(ErrorCode::InvalidUsername)
        );
        assert_eq!(
            validate_username(&"x".repeat(33), &cfg),
            Err(ErrorCode::InvalidUsername)
        );
    }

    #[test]
    fn room_codes_normalize_to_uppercase() {
        assert_eq!(normalize_room_code(" ab12cd "), "AB12CD");
    }
}
