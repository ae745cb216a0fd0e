//! Property tests for answer scoring (pure domain).
//!
//! Scoring contract:
//! - Incorrect answers always score 0
//! - Correct answers score in [BASE_POINTS, BASE_POINTS + MAX_SPEED_BONUS]
//! - More time left never scores less (monotonicity)

use proptest::prelude::*;

use crate::domain::scoring::{score_answer, BASE_POINTS, MAX_SPEED_BONUS};
use crate::domain::test_prelude;

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: Incorrect answers score zero regardless of timing.
    #[test]
    fn prop_incorrect_always_zero(
        time_remaining in -100.0f64..1000.0f64,
        time_limit in 0.0f64..120.0f64,
    ) {
        prop_assert_eq!(score_answer(false, time_remaining, time_limit), 0);
    }

    /// Property: Correct answers stay within the scoring band, even for
    /// out-of-range reported timings.
    #[test]
    fn prop_correct_within_band(
        time_remaining in -100.0f64..1000.0f64,
        time_limit in 0.1f64..120.0f64,
    ) {
        let points = score_answer(true, time_remaining, time_limit);
        prop_assert!(points >= BASE_POINTS,
            "Correct answer scored {points}, below base {BASE_POINTS}");
        prop_assert!(points <= BASE_POINTS + MAX_SPEED_BONUS,
            "Correct answer scored {points}, above cap {}",
            BASE_POINTS + MAX_SPEED_BONUS);
    }

    /// Property: More time left never scores less.
    #[test]
    fn prop_faster_never_scores_less(
        slower in 0.0f64..24.0f64,
        delta in 0.0f64..24.0f64,
    ) {
        let limit = 24.0;
        let faster = (slower + delta).min(limit);
        prop_assert!(
            score_answer(true, faster, limit) >= score_answer(true, slower, limit),
            "score({faster}) < score({slower})"
        );
    }
}
