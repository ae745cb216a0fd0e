//! Automatch HTTP routes: queue join/cancel and the search stream.

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::{Rarity, StakedAsset};
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::realtime::registry::ChannelKind;
use crate::realtime::{automatch_stream, sse};
use crate::services::automatch::AutomatchService;
use crate::state::app_state::AppState;
use crate::tasks;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum AutomatchAction {
    Join,
    Cancel,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AutomatchRequest {
    action: AutomatchAction,
    asset: StakedAsset,
    #[serde(default)]
    wallet_address: Option<String>,
}

#[derive(Debug, Serialize)]
struct CancelResponse {
    status: &'static str,
    removed: bool,
}

/// POST /automatch
///
/// `join` queues the caller for the stake's rarity tier, pairing them on the
/// spot when an opponent is already waiting. `cancel` removes the caller from
/// that tier's queue; it is idempotent.
async fn automatch(
    current_user: CurrentUser,
    body: ValidatedJson<AutomatchRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let AutomatchRequest {
        action,
        asset,
        wallet_address,
    } = body.into_inner();

    match action {
        AutomatchAction::Join => {
            let player = current_user.player_info(wallet_address);
            let outcome = AutomatchService
                .join(
                    &app_state.store,
                    &app_state.questions,
                    &app_state.tunables,
                    player,
                    asset,
                )
                .await?;
            Ok(HttpResponse::Ok().json(outcome))
        }
        AutomatchAction::Cancel => {
            let removed = AutomatchService
                .cancel(&app_state.store, asset.rarity, &current_user.sub)
                .await?;
            Ok(HttpResponse::Ok().json(CancelResponse {
                status: "cancelled",
                removed,
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
struct StreamQuery {
    rarity: String,
}

/// GET /automatch/stream?rarity=...
///
/// SSE channel that watches the caller's place in one rarity bucket and
/// delivers `match_found` the moment an opponent claims them. The caller
/// must already hold a queue entry from POST /automatch; the stream watches,
/// it never claims.
async fn stream(
    current_user: CurrentUser,
    query: web::Query<StreamQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let rarity: Rarity = query.rarity.parse()?;

    let (channel_id, cancel) = app_state.streams.register(ChannelKind::Automatch {
        rarity,
        user_id: current_user.sub.clone(),
    });
    let (sink, body) = sse::channel();
    tasks::spawn_supervised(
        "automatch-stream",
        automatch_stream::run(
            app_state.store.clone(),
            app_state.tunables.clone(),
            app_state.streams.clone(),
            channel_id,
            cancel,
            rarity,
            current_user.sub.clone(),
            sink,
        ),
    );

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(body))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(automatch)));
    cfg.service(web::resource("/stream").route(web::get().to(stream)));
}
