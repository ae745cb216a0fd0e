use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::repos::matches;
use crate::state::app_state::AppState;

/// Match ID extracted from the route path parameter.
/// Validates the format and that the match exists in the store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MatchId(pub String);

impl MatchId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for MatchId {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // Extract match_id from path parameters
            let match_id = req
                .match_info()
                .get("match_id")
                .ok_or_else(|| {
                    AppError::bad_request(ErrorCode::InvalidMatchId, "Missing match_id parameter")
                })?
                .to_string();

            // Match ids are minted as UUIDs; reject anything else before
            // touching the store.
            if Uuid::parse_str(&match_id).is_err() {
                return Err(AppError::bad_request(
                    ErrorCode::InvalidMatchId,
                    format!("Invalid match id: {match_id}"),
                ));
            }

            let app_state = req
                .app_data::<web::Data<AppState>>()
                .ok_or_else(|| AppError::internal("AppState not available"))?;

            let exists = matches::find_by_id(&app_state.store, &match_id)
                .await?
                .is_some();

            if !exists {
                return Err(AppError::not_found(
                    ErrorCode::MatchNotFound,
                    format!("Match {match_id} not found"),
                ));
            }

            Ok(MatchId(match_id))
        })
    }
}
