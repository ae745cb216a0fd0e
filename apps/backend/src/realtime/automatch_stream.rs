//! Poll loop behind `GET /automatch/stream`.
//!
//! Watches one waiter's place in a rarity bucket. The pairing pointer is
//! checked first on every tick so a freshly made match always beats the
//! search timeout. The queue entry lives and dies with this channel: any
//! exit other than a successful pairing removes it.

use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::events::StreamEvent;
use super::registry::StreamRegistry;
use super::sse::EventSink;
use crate::config::Tunables;
use crate::domain::Rarity;
use crate::error::AppError;
use crate::repos::{automatch, matches};
use crate::store::SharedStore;

/// Ticks the waiter's entry may be absent before the channel gives up on
/// it. Covers the claim window, where the entry is already removed but the
/// pairing pointer has not landed yet.
const MISSING_ENTRY_GRACE_TICKS: u32 = 2;

/// Drive one automatch channel until a match is found, the search times
/// out, or the client goes away.
pub async fn run(
    store: SharedStore,
    tunables: Tunables,
    registry: StreamRegistry,
    channel_id: Uuid,
    cancel: CancellationToken,
    rarity: Rarity,
    user_id: String,
    sink: EventSink,
) -> Result<(), AppError> {
    let outcome = drive(&store, &tunables, &cancel, rarity, &user_id, &sink).await;
    registry.deregister(channel_id);
    outcome
}

async fn drive(
    store: &SharedStore,
    tunables: &Tunables,
    cancel: &CancellationToken,
    rarity: Rarity,
    user_id: &str,
    sink: &EventSink,
) -> Result<(), AppError> {
    if sink.emit(&StreamEvent::connected()).await.is_err() {
        remove_entry(store, rarity, user_id).await;
        return Ok(());
    }

    let mut last_size = match automatch::queue_size(store, rarity).await {
        Ok(size) => {
            if sink.emit(&StreamEvent::queued(size)).await.is_err() {
                remove_entry(store, rarity, user_id).await;
                return Ok(());
            }
            Some(size)
        }
        Err(err) => {
            warn!(rarity = %rarity, error = %err, "automatch stream snapshot failed");
            let _ = sink
                .emit(&StreamEvent::error("queue state temporarily unavailable"))
                .await;
            None
        }
    };

    let started = Instant::now();
    let mut missing_ticks: u32 = 0;
    let mut ticker = interval(tunables.stream_poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.reset();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(rarity = %rarity, user_id, "automatch stream cancelled");
                remove_entry(store, rarity, user_id).await;
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        // A pairing pointer means an opponent already built the match.
        match automatch::take_pairing(store, rarity, user_id).await {
            Ok(Some(found_id)) => {
                match matches::require_match(store, &found_id).await {
                    Ok(record) => {
                        let _ = sink.emit(&StreamEvent::match_found(record)).await;
                    }
                    Err(err) => {
                        warn!(
                            rarity = %rarity,
                            user_id,
                            match_id = found_id,
                            error = %err,
                            "paired match could not be loaded"
                        );
                        let _ = sink
                            .emit(&StreamEvent::error("paired match could not be loaded"))
                            .await;
                    }
                }
                return Ok(());
            }
            Ok(None) => {}
            Err(err) => {
                warn!(rarity = %rarity, user_id, error = %err, "automatch stream poll failed");
                let emitted = sink
                    .emit(&StreamEvent::error("queue state temporarily unavailable"))
                    .await;
                if emitted.is_err() {
                    remove_entry(store, rarity, user_id).await;
                    return Ok(());
                }
                if !err.is_transient() {
                    remove_entry(store, rarity, user_id).await;
                    return Err(err.into());
                }
                continue;
            }
        }

        // Our entry disappearing without a pointer is either the claim
        // window (pointer lands next tick) or a cancel from another session.
        match automatch::find_entry(store, rarity, user_id).await {
            Ok(Some(_)) => missing_ticks = 0,
            Ok(None) => {
                missing_ticks += 1;
                if missing_ticks > MISSING_ENTRY_GRACE_TICKS {
                    debug!(rarity = %rarity, user_id, "queue entry gone, closing stream");
                    return Ok(());
                }
            }
            Err(err) => {
                warn!(rarity = %rarity, user_id, error = %err, "automatch entry check failed");
            }
        }

        if let Ok(size) = automatch::queue_size(store, rarity).await {
            if last_size != Some(size) {
                if sink.emit(&StreamEvent::queue_update(size)).await.is_err() {
                    remove_entry(store, rarity, user_id).await;
                    return Ok(());
                }
                last_size = Some(size);
            }
        }

        if started.elapsed() >= tunables.search_timeout {
            let _ = sink
                .emit(&StreamEvent::timeout("no opponent found in time"))
                .await;
            remove_entry(store, rarity, user_id).await;
            return Ok(());
        }
    }
}

/// Best-effort removal of the waiter's queue entry.
async fn remove_entry(store: &SharedStore, rarity: Rarity, user_id: &str) {
    if let Err(err) = automatch::remove(store, rarity, user_id).await {
        warn!(rarity = %rarity, user_id, error = %err, "failed to remove queue entry");
    }
}
