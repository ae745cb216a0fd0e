use crate::domain::scoring::{score_answer, BASE_POINTS, MAX_SPEED_BONUS};

const LIMIT: f64 = 24.0;

#[test]
fn incorrect_answer_scores_zero() {
    assert_eq!(score_answer(false, LIMIT, LIMIT), 0);
    assert_eq!(score_answer(false, 0.0, LIMIT), 0);
}

#[test]
fn instant_correct_answer_scores_maximum() {
    // Full clock left: 100 + floor((24/24) * 50) = 150
    assert_eq!(score_answer(true, LIMIT, LIMIT), BASE_POINTS + MAX_SPEED_BONUS);
}

#[test]
fn buzzer_beater_scores_base_points() {
    // No time left: 100 + floor(0 * 50) = 100
    assert_eq!(score_answer(true, 0.0, LIMIT), BASE_POINTS);
}

#[test]
fn midpoint_answer_scores_floored_bonus() {
    // Half the clock left: 100 + floor(0.5 * 50) = 125
    assert_eq!(score_answer(true, 12.0, LIMIT), 125);
    // 10s of 24s left: 100 + floor((10/24) * 50) = 100 + floor(20.833) = 120
    assert_eq!(score_answer(true, 10.0, LIMIT), 120);
}

#[test]
fn bonus_is_floored_not_rounded() {
    // 23s of 24s: floor(47.916) = 47, not 48
    assert_eq!(score_answer(true, 23.0, LIMIT), 147);
}

#[test]
fn time_remaining_is_clamped_to_the_clock() {
    // Reported time beyond the limit cannot exceed the maximum score
    assert_eq!(
        score_answer(true, LIMIT * 10.0, LIMIT),
        BASE_POINTS + MAX_SPEED_BONUS
    );
    // Negative reported time scores as a buzzer beater
    assert_eq!(score_answer(true, -3.0, LIMIT), BASE_POINTS);
}

#[test]
fn degenerate_time_limit_scores_base_points() {
    assert_eq!(score_answer(true, 5.0, 0.0), BASE_POINTS);
    assert_eq!(score_answer(true, 5.0, -1.0), BASE_POINTS);
}
