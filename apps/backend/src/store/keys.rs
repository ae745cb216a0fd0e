//! Key layout for the state store.
//!
//! Every persisted record lives under one of these key shapes. Build keys
//! here only; never format them inline at call sites.

use crate::domain::{PlayerSlot, Rarity};

/// Full match record, JSON-encoded.
pub fn match_record(match_id: &str) -> String {
    format!("match:{match_id}")
}

/// Per-rarity automatch bucket (a set of waiting user ids).
pub fn automatch_bucket(rarity: Rarity) -> String {
    format!("automatch:queue:{rarity}")
}

/// A waiting player's queue entry, JSON-encoded.
pub fn automatch_entry(rarity: Rarity, user_id: &str) -> String {
    format!("automatch:entry:{rarity}:{user_id}")
}

/// Pairing pointer left for a waiting player after an opponent claims them.
/// Holds the id of the created match.
pub fn automatch_pairing(rarity: Rarity, user_id: &str) -> String {
    format!("automatch:paired:{rarity}:{user_id}")
}

/// Durable record of one transfer leg's execution.
pub fn transfer_operation(match_id: &str, slot: PlayerSlot) -> String {
    let slot = match slot {
        PlayerSlot::A => "a",
        PlayerSlot::B => "b",
    };
    format!("transfer:{match_id}:{slot}")
}
