//! Settlement planning: which stake moves where once a match is decided.

use serde::{Deserialize, Serialize};

use crate::domain::asset::StakedAsset;
use crate::domain::match_state::{MatchRecord, MatchStatus, PlayerSlot, Winner};

/// One loser-to-winner stake movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferLeg {
    pub from_slot: PlayerSlot,
    pub to_slot: PlayerSlot,
    pub from_user_id: String,
    pub to_user_id: String,
    pub asset: StakedAsset,
}

/// Plan the stake movements for a match.
///
/// Pure and repeatable: reads the record, never mutates it. Produces exactly
/// one leg (the loser's stake to the winner) for a decisive finished match,
/// and no legs for ties, unfinished matches, or records missing a seated
/// opponent.
pub fn plan_transfers(record: &MatchRecord) -> Vec<TransferLeg> {
    if record.status != MatchStatus::Finished {
        return Vec::new();
    }
    let winner_slot = match record.winner {
        Some(Winner::A) => PlayerSlot::A,
        Some(Winner::B) => PlayerSlot::B,
        Some(Winner::Tie) | None => return Vec::new(),
    };
    let loser_slot = winner_slot.other();

    let (Some(from), Some(to), Some(asset)) = (
        record.player(loser_slot),
        record.player(winner_slot),
        record.stake(loser_slot),
    ) else {
        return Vec::new();
    };

    vec![TransferLeg {
        from_slot: loser_slot,
        to_slot: winner_slot,
        from_user_id: from.user_id.clone(),
        to_user_id: to.user_id.clone(),
        asset: asset.clone(),
    }]
}
