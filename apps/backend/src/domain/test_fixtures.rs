//! Builders for match records used across domain test suites.

use crate::domain::asset::{PlayerInfo, Rarity, StakedAsset};
use crate::domain::match_state::MatchRecord;
use crate::domain::quiz::Question;

pub fn player(user_id: &str) -> PlayerInfo {
    PlayerInfo {
        user_id: user_id.to_string(),
        display_name: format!("Player {user_id}"),
        wallet_address: Some(format!("0x{user_id}")),
    }
}

pub fn player_without_wallet(user_id: &str) -> PlayerInfo {
    PlayerInfo {
        wallet_address: None,
        ..player(user_id)
    }
}

pub fn stake(token_id: &str, rarity: Rarity) -> StakedAsset {
    StakedAsset {
        token_id: token_id.to_string(),
        name: format!("Token #{token_id}"),
        image: None,
        rarity,
        collection: Some("test-collection".to_string()),
    }
}

pub fn questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| Question {
            id: format!("q-{i}"),
            text: format!("Question {i}?"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_option: i % 4,
        })
        .collect()
}

/// A pending match created by `alice` with an epic stake and `count` questions.
pub fn pending_match(count: usize) -> MatchRecord {
    MatchRecord::new(
        "m-1",
        player("alice"),
        stake("101", Rarity::Epic),
        questions(count),
        1_000,
    )
}

/// A match with both players seated, ready to start.
pub fn ready_match(count: usize) -> MatchRecord {
    let mut record = pending_match(count);
    record
        .attach_opponent(player("bob"), stake("202", Rarity::Epic))
        .expect("attach_opponent should succeed on a pending match");
    record
}
