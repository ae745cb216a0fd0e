use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::auth::claims::AccessClaims;
use crate::domain::PlayerInfo;
use crate::error::AppError;

/// The authenticated player, read from the claims that the JwtExtract
/// middleware stored in request extensions.
///
/// There is no user table behind this backend; the verified token is the
/// identity source, so this extractor never touches the store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CurrentUser {
    pub sub: String,
    pub display_name: Option<String>,
}

impl CurrentUser {
    /// Name to seat the player under.
    pub fn display_name_or_sub(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.sub.clone())
    }

    /// Shape the user as a match participant.
    pub fn player_info(&self, wallet_address: Option<String>) -> PlayerInfo {
        PlayerInfo {
            user_id: self.sub.clone(),
            display_name: self.display_name_or_sub(),
            wallet_address: wallet_address.filter(|raw| !raw.trim().is_empty()),
        }
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Read AccessClaims from request extensions (stored by JwtExtract middleware)
        let result = req
            .extensions()
            .get::<AccessClaims>()
            .map(|claims| CurrentUser {
                sub: claims.sub.clone(),
                display_name: claims.display_name.clone(),
            })
            .ok_or_else(AppError::unauthorized_missing_bearer);

        ready(result)
    }
}
