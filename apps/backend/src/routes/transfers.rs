//! Stake settlement HTTP routes.

use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;
use crate::extractors::validated_json::ValidatedJson;
use crate::services::transfers::TransferService;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteTransferRequest {
    match_id: String,
}

/// POST /match/transfer
///
/// Executes the caller's own transfer leg of a finished match. Custody
/// failures come back as FAILED panels in the settlement view, not as HTTP
/// errors; only a missing custody configuration is an error here.
async fn execute_transfer(
    current_user: CurrentUser,
    body: ValidatedJson<ExecuteTransferRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let custody = app_state
        .custody
        .as_ref()
        .ok_or_else(|| AppError::config("custody service is not configured"))?;

    let status = TransferService
        .execute(
            &app_state.store,
            custody,
            app_state.default_collection.as_deref(),
            &app_state.tunables,
            &body.match_id,
            &current_user.sub,
        )
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransferStatusQuery {
    match_id: String,
}

/// GET /match/transfer?matchId=...
///
/// Read-only settlement view of a match. Requires authentication only; the
/// panels carry no data beyond what the match record already shows its
/// players.
async fn transfer_status(
    _current_user: CurrentUser,
    query: web::Query<TransferStatusQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let status = TransferService
        .status(&app_state.store, &query.match_id)
        .await?;
    Ok(HttpResponse::Ok().json(status))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/transfer")
            .route(web::post().to(execute_transfer))
            .route(web::get().to(transfer_status)),
    );
}
