//! Match lifecycle HTTP routes.

use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::domain::{PlayerSlot, StakedAsset};
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::match_id::MatchId;
use crate::extractors::validated_json::ValidatedJson;
use crate::realtime::registry::ChannelKind;
use crate::realtime::{match_stream, sse};
use crate::services::match_flow::MatchFlowService;
use crate::state::app_state::AppState;
use crate::tasks;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMatchRequest {
    asset: StakedAsset,
    #[serde(default)]
    wallet_address: Option<String>,
}

/// POST /match
///
/// Creates a match with the caller in slot A, waiting for an opponent.
async fn create_match(
    current_user: CurrentUser,
    body: ValidatedJson<CreateMatchRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let CreateMatchRequest {
        asset,
        wallet_address,
    } = body.into_inner();
    let player = current_user.player_info(wallet_address);

    let record = MatchFlowService
        .create(
            &app_state.store,
            &app_state.questions,
            &app_state.tunables,
            player,
            asset,
        )
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JoinMatchRequest {
    match_id: String,
    asset: StakedAsset,
    #[serde(default)]
    wallet_address: Option<String>,
}

/// POST /match/join
///
/// Seats the caller in slot B of a pending match. The stakes must be of the
/// same rarity tier, and a player cannot join their own match.
async fn join_match(
    current_user: CurrentUser,
    body: ValidatedJson<JoinMatchRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let JoinMatchRequest {
        match_id,
        asset,
        wallet_address,
    } = body.into_inner();
    let player = current_user.player_info(wallet_address);

    let record = MatchFlowService
        .join(&app_state.store, &match_id, player, asset)
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartMatchRequest {
    match_id: String,
}

/// POST /match/start
///
/// Acknowledges a start press from a participant. The first press begins the
/// intro countdown; the other player's press is a no-op.
async fn start_match(
    current_user: CurrentUser,
    body: ValidatedJson<StartMatchRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let record = MatchFlowService
        .start(
            &app_state.store,
            &app_state.tunables,
            &body.match_id,
            &current_user.sub,
        )
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnswerRequest {
    match_id: String,
    question_id: String,
    selected_option: i32,
    time_remaining: f64,
    /// Slot the answer is for. Optional: without it the answer lands on the
    /// caller's own slot first, then on an opponent who timed out.
    #[serde(default)]
    player: Option<PlayerSlot>,
}

/// POST /match/answer
///
/// Records one answer against the active question and advances the match
/// once both slots have answered.
async fn submit_answer(
    current_user: CurrentUser,
    body: ValidatedJson<AnswerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let AnswerRequest {
        match_id,
        question_id,
        selected_option,
        time_remaining,
        player,
    } = body.into_inner();

    let record = MatchFlowService
        .submit_answer(
            &app_state.store,
            &app_state.tunables,
            &match_id,
            &current_user.sub,
            &question_id,
            player,
            selected_option,
            time_remaining,
        )
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// GET /match/{match_id}
async fn get_match(
    _current_user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let record = MatchFlowService
        .get(&app_state.store, match_id.as_str())
        .await?;
    Ok(HttpResponse::Ok().json(record))
}

/// GET /match/{match_id}/stream
///
/// SSE channel that re-delivers the match state on every change, throttled,
/// with the newest state winning. Closes itself after the post-finish grace
/// or the idle limit.
async fn stream_match(
    current_user: CurrentUser,
    match_id: MatchId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (channel_id, cancel) = app_state.streams.register(ChannelKind::Match {
        match_id: match_id.0.clone(),
        user_id: current_user.sub.clone(),
    });
    let (sink, body) = sse::channel();
    tasks::spawn_supervised(
        "match-stream",
        match_stream::run(
            app_state.store.clone(),
            app_state.tunables.clone(),
            app_state.streams.clone(),
            channel_id,
            cancel,
            match_id.0,
            sink,
        ),
    );

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(body))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(create_match)));
    cfg.service(web::resource("/join").route(web::post().to(join_match)));
    cfg.service(web::resource("/start").route(web::post().to(start_match)));
    cfg.service(web::resource("/answer").route(web::post().to(submit_answer)));
    cfg.service(web::resource("/{match_id}").route(web::get().to(get_match)));
    cfg.service(web::resource("/{match_id}/stream").route(web::get().to(stream_match)));
}
