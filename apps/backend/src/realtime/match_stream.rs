//! Poll loop behind `GET /match/{id}/stream`.
//!
//! One task per connection: re-reads the record every poll tick and pushes
//! deltas to the client. Updates are keyed off the record's optimistic-lock
//! version, coalesced so at most one lands per throttle window, with the
//! newest state always winning. The loop never holds store state across
//! ticks beyond the last version it reported.

use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use super::events::StreamEvent;
use super::registry::StreamRegistry;
use super::sse::EventSink;
use crate::config::Tunables;
use crate::domain::{MatchRecord, MatchStatus};
use crate::error::AppError;
use crate::repos::matches;
use crate::store::SharedStore;

/// What an unsent, coalesced delta will be emitted as once the throttle
/// window opens. Finished outranks plain updates so the terminal event is
/// never swallowed by a later version bump.
enum PendingKind {
    Update,
    Finished,
}

/// Drive one match channel until the client disconnects, the registry
/// cancels it, or the match reaches a terminal condition.
pub async fn run(
    store: SharedStore,
    tunables: Tunables,
    registry: StreamRegistry,
    channel_id: Uuid,
    cancel: CancellationToken,
    match_id: String,
    sink: EventSink,
) -> Result<(), AppError> {
    let outcome = drive(&store, &tunables, &cancel, &match_id, &sink).await;
    registry.deregister(channel_id);
    outcome
}

async fn drive(
    store: &SharedStore,
    tunables: &Tunables,
    cancel: &CancellationToken,
    match_id: &str,
    sink: &EventSink,
) -> Result<(), AppError> {
    if sink.emit(&StreamEvent::connected()).await.is_err() {
        return Ok(());
    }

    let mut last_version: Option<u64> = None;
    let mut finish_seen: Option<Instant> = None;
    let mut pending: Option<(MatchRecord, PendingKind)> = None;
    let mut last_change = Instant::now();
    let mut last_emit = Instant::now();

    // Initial snapshot. The handler checked existence before spawning, so a
    // miss here means the record vanished in between.
    match matches::find_by_id(store, match_id).await {
        Ok(Some(record)) => {
            last_version = Some(record.version);
            if record.status == MatchStatus::Finished {
                finish_seen = Some(Instant::now());
            }
            if sink.emit(&StreamEvent::match_state(record)).await.is_err() {
                return Ok(());
            }
            last_emit = Instant::now();
        }
        Ok(None) => {
            let _ = sink.emit(&StreamEvent::match_deleted()).await;
            return Ok(());
        }
        Err(err) => {
            warn!(match_id, error = %err, "match stream snapshot failed");
            let emitted = sink
                .emit(&StreamEvent::error("match state temporarily unavailable"))
                .await;
            if emitted.is_err() {
                return Ok(());
            }
            if !err.is_transient() {
                return Err(err.into());
            }
        }
    }

    let mut ticker = interval(tunables.stream_poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.reset();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(match_id, "match stream cancelled");
                return Ok(());
            }
            _ = ticker.tick() => {}
        }

        match matches::find_by_id(store, match_id).await {
            Ok(Some(record)) => {
                if last_version != Some(record.version) {
                    last_version = Some(record.version);
                    last_change = Instant::now();
                    let kind = if record.status == MatchStatus::Finished && finish_seen.is_none()
                    {
                        finish_seen = Some(Instant::now());
                        PendingKind::Finished
                    } else {
                        PendingKind::Update
                    };
                    pending = match pending.take() {
                        Some((_, PendingKind::Finished)) => {
                            Some((record, PendingKind::Finished))
                        }
                        _ => Some((record, kind)),
                    };
                }
            }
            Ok(None) => {
                let _ = sink.emit(&StreamEvent::match_deleted()).await;
                return Ok(());
            }
            Err(err) => {
                warn!(match_id, error = %err, "match stream poll failed");
                let emitted = sink
                    .emit(&StreamEvent::error("match state temporarily unavailable"))
                    .await;
                if emitted.is_err() {
                    return Ok(());
                }
                if !err.is_transient() {
                    return Err(err.into());
                }
                continue;
            }
        }

        if let Some((record, kind)) = pending.take() {
            if last_emit.elapsed() >= tunables.stream_throttle {
                let event = match kind {
                    PendingKind::Update => StreamEvent::match_update(record),
                    PendingKind::Finished => StreamEvent::match_finished(record),
                };
                if sink.emit(&event).await.is_err() {
                    debug!(match_id, "match stream client disconnected");
                    return Ok(());
                }
                last_emit = Instant::now();
            } else {
                pending = Some((record, kind));
            }
        }

        if let Some(seen) = finish_seen {
            if seen.elapsed() >= tunables.finish_grace {
                debug!(match_id, "match stream closing after finish grace");
                return Ok(());
            }
        }

        if last_change.elapsed() >= tunables.match_idle_timeout {
            let _ = sink
                .emit(&StreamEvent::timeout("match stream idle limit reached"))
                .await;
            return Ok(());
        }
    }
}
