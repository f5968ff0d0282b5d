//! Score calculation
//!
//! Pure function of elapsed time, moves and matches so the UI can show a
//! live score mid-game and the engine can finalize it at completion.

/// Starting score before any deductions or bonuses.
pub const BASE_SCORE: i64 = 1000;

/// Score never drops below this floor.
pub const MIN_SCORE: i64 = 100;

/// Points lost per elapsed second.
pub const TIME_PENALTY: i64 = 2;

/// Points lost per completed move (two flips evaluated).
pub const MOVE_PENALTY: i64 = 5;

/// Points gained per matched pair.
pub const MATCH_BONUS: i64 = 20;

/// Compute the score for the given session stats.
///
/// `max(100, 1000 - 2*seconds - 5*moves + 20*matches)`
pub fn compute_score(elapsed_seconds: u32, move_count: u32, match_count: u32) -> u32 {
    let score = BASE_SCORE - TIME_PENALTY * i64::from(elapsed_seconds)
        - MOVE_PENALTY * i64::from(move_count)
        + MATCH_BONUS * i64::from(match_count);
    score.max(MIN_SCORE) as u32
}
