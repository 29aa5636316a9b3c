use rand::RngExt;

use crate::config::ProtocolConfig;

/// Random room code of the configured length, drawn from `A-Z0-9`.
/// Join requests are uppercased before lookup, so the generated form is
/// the canonical one.
pub fn generate_room_code_with_config(config: &ProtocolConfig) -> String {
    let mut rng = rand::rng();
    (0..config.room_code_length)
        .map(|_| {
            // 36 symbols: the ten digits, then the uppercase alphabet.
            let roll = rng.random_range(0u8..36);
            if roll < 10 {
                char::from(b'0' + roll)
            } else {
                char::from(b'A' + roll - 10)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_have_configured_length_and_charset() {
        let cfg = ProtocolConfig::default();
        for _ in 0..100 {
            let code = generate_room_code_with_config(&cfg);
            assert_eq!(code.len(), 6);
            assert!(code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn both_symbol_classes_eventually_appear() {
        let cfg = ProtocolConfig {
            room_code_length: 64,
            ..ProtocolConfig::default()
        };
        let code = generate_room_code_with_config(&cfg);
        // 64 draws from 36 symbols; a single-class code is vanishingly
        // unlikely and would point at a broken mapping.
        assert!(code.chars().any(|c| c.is_ascii_digit()));
        assert!(code.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn respects_non_default_lengths() {
        let cfg = ProtocolConfig {
            room_code_length: 10,
            ..ProtocolConfig::default()
        };
        assert_eq!(generate_room_code_with_config(&cfg).len(), 10);
    }
}
