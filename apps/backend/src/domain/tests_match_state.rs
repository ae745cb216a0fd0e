use crate::domain::match_state::{
    MatchStatus, PlayerSlot, TransferState, Winner, NO_ACTIVE_QUESTION,
};
use crate::domain::quiz::PlayerAnswer;
use crate::domain::test_fixtures::{pending_match, player, questions, ready_match, stake};
use crate::domain::Rarity;
use crate::errors::domain::{ConflictKind, DomainError, ValidationKind};

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
fn new_match_is_pending_with_sentinel_index() {
    let record = pending_match(5);
    assert_eq!(record.status, MatchStatus::Pending);
    assert_eq!(record.current_question_index, NO_ACTIVE_QUESTION);
    assert!(record.player_b.is_none());
    assert!(record.current_question().is_none());
    assert_eq!(record.version, 0);
}

#[test]
fn attach_opponent_arms_question_play() {
    let record = ready_match(5);
    assert_eq!(record.status, MatchStatus::Ready);
    assert_eq!(record.current_question_index, 0);
    assert_eq!(record.current_question().map(|q| q.id.as_str()), Some("q-0"));
    assert_eq!(record.slot_of("bob"), Some(PlayerSlot::B));
}

#[test]
fn attach_opponent_rejects_rarity_mismatch() {
    let mut record = pending_match(5);
    let err = record
        .attach_opponent(player("bob"), stake("202", Rarity::Common))
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::RarityMismatch, _)
    ));
    assert_eq!(record.status, MatchStatus::Pending);
}

#[test]
fn attach_opponent_rejects_self_join() {
    let mut record = pending_match(5);
    let err = record
        .attach_opponent(player("alice"), stake("202", Rarity::Epic))
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::SelfJoin, _)
    ));
}

#[test]
fn attach_opponent_rejects_full_match() {
    let mut record = ready_match(5);
    let err = record
        .attach_opponent(player("carol"), stake("303", Rarity::Epic))
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::MatchFull, _)
    ));
}

#[test]
fn require_status_reports_phase_mismatch() {
    let record = pending_match(5);
    assert!(record.require_status(MatchStatus::Pending).is_ok());
    let err = record.require_status(MatchStatus::InProgress).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::PhaseMismatch, _)
    ));
}

#[test]
fn resolve_answer_slot_prefers_acting_player() {
    let record = ready_match(5);
    let slot = record
        .resolve_answer_slot(PlayerSlot::A, None, "q-0")
        .unwrap();
    assert_eq!(slot, PlayerSlot::A);
}

#[test]
fn resolve_answer_slot_falls_through_to_opponent() {
    let mut record = ready_match(5);
    record.record_answer(PlayerSlot::A, answer("q-0", 100));
    // Acting player already answered; the unanswered opponent slot is next.
    let slot = record
        .resolve_answer_slot(PlayerSlot::A, None, "q-0")
        .unwrap();
    assert_eq!(slot, PlayerSlot::B);
}

#[test]
fn resolve_answer_slot_rejects_when_both_answered() {
    let mut record = ready_match(5);
    record.record_answer(PlayerSlot::A, answer("q-0", 100));
    record.record_answer(PlayerSlot::B, answer("q-0", 0));
    let err = record
        .resolve_answer_slot(PlayerSlot::A, None, "q-0")
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::DuplicateAnswer, _)
    ));
}

#[test]
fn resolve_answer_slot_honors_explicit_request() {
    let record = ready_match(5);
    let slot = record
        .resolve_answer_slot(PlayerSlot::A, Some(PlayerSlot::B), "q-0")
        .unwrap();
    assert_eq!(slot, PlayerSlot::B);
}

#[test]
fn resolve_answer_slot_rejects_explicit_duplicate() {
    let mut record = ready_match(5);
    record.record_answer(PlayerSlot::B, answer("q-0", 0));
    let err = record
        .resolve_answer_slot(PlayerSlot::A, Some(PlayerSlot::B), "q-0")
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::DuplicateAnswer, _)
    ));
}

#[test]
fn record_answer_credits_the_right_slot() {
    let mut record = ready_match(5);
    record.record_answer(PlayerSlot::A, answer("q-0", 150));
    record.record_answer(PlayerSlot::B, answer("q-0", 120));
    assert_eq!(record.score_a, 150);
    assert_eq!(record.score_b, 120);
    assert!(record.both_answered("q-0"));
    assert!(!record.both_answered("q-1"));
}

#[test]
fn advance_moves_through_questions_in_order() {
    let mut record = ready_match(3);
    assert_eq!(record.current_question_index, 0);
    record.advance_or_finish(2_000);
    assert_eq!(record.current_question_index, 1);
    record.advance_or_finish(3_000);
    assert_eq!(record.current_question_index, 2);
    assert_eq!(record.status, MatchStatus::Ready);
}

#[test]
fn advancing_past_the_last_question_finishes_the_match() {
    let mut record = ready_match(2);
    record.record_answer(PlayerSlot::A, answer("q-0", 150));
    record.record_answer(PlayerSlot::B, answer("q-0", 0));
    record.advance_or_finish(2_000);
    record.record_answer(PlayerSlot::A, answer("q-1", 100));
    record.record_answer(PlayerSlot::B, answer("q-1", 120));
    record.advance_or_finish(3_000);

    assert_eq!(record.status, MatchStatus::Finished);
    assert_eq!(record.winner, Some(Winner::A));
    assert_eq!(record.finished_at, Some(3_000));
    // Index no longer advances once finished
    assert_eq!(record.current_question_index, 1);
}

#[test]
fn winner_loses_nothing_loser_panel_pends() {
    let mut record = ready_match(1);
    record.record_answer(PlayerSlot::A, answer("q-0", 0));
    record.record_answer(PlayerSlot::B, answer("q-0", 100));
    record.advance_or_finish(2_000);

    assert_eq!(record.winner, Some(Winner::B));
    // Loser (slot A) owes a transfer; winner completes immediately.
    assert_eq!(record.transfer_a.state, TransferState::Pending);
    assert_eq!(record.transfer_b.state, TransferState::Completed);
}

#[test]
fn tie_completes_both_panels() {
    let mut record = ready_match(1);
    record.record_answer(PlayerSlot::A, answer("q-0", 100));
    record.record_answer(PlayerSlot::B, answer("q-0", 100));
    record.advance_or_finish(2_000);

    assert_eq!(record.winner, Some(Winner::Tie));
    assert_eq!(record.transfer_a.state, TransferState::Completed);
    assert_eq!(record.transfer_b.state, TransferState::Completed);
}

#[test]
fn slot_of_unknown_user_is_none() {
    let record = ready_match(1);
    assert_eq!(record.slot_of("mallory"), None);
    assert!(!record.is_participant("mallory"));
    assert!(record.is_participant("alice"));
}

#[test]
fn questions_fixture_ids_are_stable() {
    let qs = questions(3);
    let ids: Vec<_> = qs.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["q-0", "q-1", "q-2"]);
}
