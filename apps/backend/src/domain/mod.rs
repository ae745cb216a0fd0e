//! Domain layer: pure match logic types and helpers.

pub mod asset;
pub mod match_state;
pub mod quiz;
pub mod scoring;
pub mod transfer_plan;

#[cfg(test)]
pub mod test_fixtures;
#[cfg(test)]
pub mod test_prelude;
#[cfg(test)]
mod tests_match_state;
#[cfg(test)]
mod tests_props_scoring;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_transfer_plan;

// Re-exports for ergonomics
pub use asset::{PlayerInfo, Rarity, StakedAsset};
pub use match_state::{
    MatchRecord, MatchStatus, PlayerSlot, TransferPanel, TransferState, Winner,
    NO_ACTIVE_QUESTION,
};
pub use quiz::{PlayerAnswer, Question, NO_ANSWER};
pub use transfer_plan::{plan_transfers, TransferLeg};

/// Milliseconds since the Unix epoch.
pub fn now_unix_ms() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
