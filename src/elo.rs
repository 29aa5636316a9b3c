//! ELO rating calculator. Pure arithmetic, K = 32.

/// Outcome score from one seat's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Loss,
    Draw,
    Win,
}

impl Score {
    fn value(self) -> f64 {
        match self {
            Score::Loss => 0.0,
            Score::Draw => 0.5,
            Score::Win => 1.0,
        }
    }
}

const K_FACTOR: f64 = 32.0;

/// Expected score of a player rated `player` against `opponent`.
pub fn expected_score(player: i32, opponent: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf(f64::from(opponent - player) / 400.0))
}

/// Integer rating delta for `player` after scoring `score` against
/// `opponent`. Bounded by the K factor: |delta| <= 32.
pub fn calculate_elo_change(player: i32, opponent: i32, score: Score) -> i32 {
    let expected = expected_score(player, opponent);
    (K_FACTOR * (score.value() - expected)).round() as i32
}
