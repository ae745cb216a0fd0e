//! Answer scoring: base points plus a linear speed bonus.

/// Points for any correct answer before the speed bonus.
pub const BASE_POINTS: u32 = 100;
/// Bonus for an instantaneous correct answer.
pub const MAX_SPEED_BONUS: u32 = 50;

/// Score a single answer.
///
/// Incorrect answers score zero. Correct answers earn `BASE_POINTS` plus a
/// bonus proportional to the fraction of the question clock still left,
/// floored to an integer. A full clock therefore scores
/// `BASE_POINTS + MAX_SPEED_BONUS`; an answer on the buzzer scores
/// `BASE_POINTS`.
pub fn score_answer(correct: bool, time_remaining: f64, time_limit: f64) -> u32 {
    if !correct {
        return 0;
    }
    if time_limit <= 0.0 {
        return BASE_POINTS;
    }
    let fraction = time_remaining.clamp(0.0, time_limit) / time_limit;
    let bonus = (fraction * f64::from(MAX_SPEED_BONUS)).floor() as u32;
    BASE_POINTS + bonus.min(MAX_SPEED_BONUS)
}
