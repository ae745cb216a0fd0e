use crate::domain::match_state::{PlayerSlot, Winner};
use crate::domain::quiz::PlayerAnswer;
use crate::domain::test_fixtures::{pending_match, ready_match};
use crate::domain::transfer_plan::plan_transfers;

fn answer(question_id: &str, points: u32) -> PlayerAnswer {
    PlayerAnswer {
        question_id: question_id.to_string(),
        selected_option: 0,
        time_remaining: 10.0,
        correct: points > 0,
        points,
    }
}

#[test]
fn unfinished_match_plans_nothing() {
    assert!(plan_transfers(&pending_match(1)).is_empty());
    assert!(plan_transfers(&ready_match(1)).is_empty());
}

#[test]
fn decisive_finish_plans_one_loser_to_winner_leg() {
    let mut record = ready_match(1);
    record.record_answer(PlayerSlot::A, answer("q-0", 150));
    record.record_answer(PlayerSlot::B, answer("q-0", 0));
    record.advance_or_finish(2_000);
    assert_eq!(record.winner, Some(Winner::A));

    let legs = plan_transfers(&record);
    assert_eq!(legs.len(), 1);
    let leg = &legs[0];
    assert_eq!(leg.from_slot, PlayerSlot::B);
    assert_eq!(leg.to_slot, PlayerSlot::A);
    assert_eq!(leg.from_user_id, "bob");
    assert_eq!(leg.to_user_id, "alice");
    // The loser's stake is the one that moves.
    assert_eq!(leg.asset.token_id, "202");
}

#[test]
fn tie_plans_no_legs() {
    let mut record = ready_match(1);
    record.record_answer(PlayerSlot::A, answer("q-0", 100));
    record.record_answer(PlayerSlot::B, answer("q-0", 100));
    record.advance_or_finish(2_000);
    assert_eq!(record.winner, Some(Winner::Tie));

    assert!(plan_transfers(&record).is_empty());
}

#[test]
fn planning_is_repeatable() {
    let mut record = ready_match(1);
    record.record_answer(PlayerSlot::A, answer("q-0", 0));
    record.record_answer(PlayerSlot::B, answer("q-0", 120));
    record.advance_or_finish(2_000);

    let first = plan_transfers(&record);
    let second = plan_transfers(&record);
    assert_eq!(first, second);
}
