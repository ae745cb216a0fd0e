//! Automatch: rarity-partitioned queueing and opponent claiming.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::tunables::Tunables;
use crate::domain::{now_unix_ms, MatchRecord, PlayerInfo, Rarity, StakedAsset};
use crate::error::AppError;
use crate::repos::automatch::{self, AutomatchEntry};
use crate::services::match_flow::MatchFlowService;
use crate::services::questions::SharedQuestionSource;
use crate::store::SharedStore;

/// What a join produced: a seat in the queue, or an immediate pairing.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum JoinOutcome {
    #[serde(rename_all = "camelCase")]
    Queued { queue_size: usize },
    Matched {
        #[serde(rename = "match")]
        record: MatchRecord,
    },
}

/// Automatch service.
#[derive(Default)]
pub struct AutomatchService;

impl AutomatchService {
    /// Join the queue for the stake's rarity tier.
    ///
    /// Tries to claim a waiting opponent first. On a claim the waiting player
    /// becomes slot A of a READY match, the caller slot B, and the waiter's
    /// pairing pointer is written so their stream can deliver `match_found`.
    /// Without a claim the caller becomes a waiting entry and is told the
    /// queue size.
    pub async fn join(
        &self,
        store: &SharedStore,
        questions: &SharedQuestionSource,
        tunables: &Tunables,
        player: PlayerInfo,
        asset: StakedAsset,
    ) -> Result<JoinOutcome, AppError> {
        asset.validate()?;
        let rarity = asset.rarity;
        debug!(user_id = %player.user_id, rarity = %rarity, "automatch join");

        // A pointer left over from a pairing this user never picked up is
        // stale by now; joining again starts a fresh search.
        let _ = automatch::take_pairing(store, rarity, &player.user_id).await?;
        // Re-joining replaces any previous entry.
        automatch::remove(store, rarity, &player.user_id).await?;

        if let Some(waiter) = automatch::claim_opponent(store, rarity, &player.user_id).await? {
            let host = PlayerInfo {
                user_id: waiter.user_id.clone(),
                display_name: waiter.display_name.clone(),
                wallet_address: non_empty(waiter.wallet_address.clone()),
            };
            let record = match MatchFlowService
                .create_paired(
                    store,
                    questions,
                    tunables,
                    host,
                    waiter.asset.clone(),
                    player.clone(),
                    asset,
                )
                .await
            {
                Ok(record) => record,
                Err(err) => {
                    // The claim removed the waiter; put them back rather
                    // than dropping them from the queue silently.
                    warn!(
                        user_id = %waiter.user_id,
                        rarity = %rarity,
                        error = %err,
                        "pairing failed after claim; re-queueing waiter"
                    );
                    let _ = automatch::enqueue(store, &waiter).await;
                    return Err(err);
                }
            };
            automatch::write_pairing(store, rarity, &waiter.user_id, &record.id).await?;
            info!(
                match_id = %record.id,
                user_id = %player.user_id,
                opponent = %waiter.user_id,
                rarity = %rarity,
                "automatch paired"
            );
            return Ok(JoinOutcome::Matched { record });
        }

        let entry = AutomatchEntry {
            user_id: player.user_id.clone(),
            display_name: player.display_name.clone(),
            wallet_address: player.wallet_address.clone().unwrap_or_default(),
            asset,
            rarity,
            joined_at: now_unix_ms(),
        };
        let queue_size = automatch::enqueue(store, &entry).await?;
        info!(user_id = %entry.user_id, rarity = %rarity, queue_size, "automatch queued");
        Ok(JoinOutcome::Queued { queue_size })
    }

    /// Leave the queue. Idempotent; returns whether an entry was removed.
    ///
    /// A pairing pointer, if one already exists, is left alone: it means an
    /// opponent claimed this user first and a match is waiting for them.
    pub async fn cancel(
        &self,
        store: &SharedStore,
        rarity: Rarity,
        user_id: &str,
    ) -> Result<bool, AppError> {
        let removed = automatch::remove(store, rarity, user_id).await?;
        info!(user_id, rarity = %rarity, removed, "automatch cancelled");
        Ok(removed)
    }

    /// Current number of waiting players in a rarity bucket.
    pub async fn queue_size(&self, store: &SharedStore, rarity: Rarity) -> Result<usize, AppError> {
        Ok(automatch::queue_size(store, rarity).await?)
    }
}

fn non_empty(raw: String) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw)
    }
}
