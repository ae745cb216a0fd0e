use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::auth::claims::AccessClaims;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Lifetime of tokens minted locally (tests and dev tooling).
const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;

/// Mint a HS256 access token with the default TTL.
///
/// The deployed server only verifies tokens; minting exists for tests and
/// local tooling that need a token without a running auth service.
pub fn mint_access_token(
    sub: &str,
    display_name: Option<&str>,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = now
        .duration_since(UNIX_EPOCH)
        .map_err(|_| AppError::internal("Failed to get current time"))?
        .as_secs() as i64;

    let claims = AccessClaims {
        sub: sub.to_string(),
        display_name: display_name.map(str::to_string),
        iat,
        exp: iat + ACCESS_TOKEN_TTL_SECS,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify a token and return its claims.
///
/// Errors:
/// - Expired token → `AppError::UnauthorizedExpiredJwt`
/// - Invalid signature → `AppError::UnauthorizedInvalidJwt`
/// - Any other decode error → `AppError::UnauthorizedInvalidJwt`
pub fn verify_access_token(
    token: &str,
    security: &SecurityConfig,
) -> Result<AccessClaims, AppError> {
    // Default Validation already checks exp; pin algorithm to configured algorithm.
    let validation = Validation::new(security.algorithm);

    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::unauthorized_expired_jwt(),
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::unauthorized_invalid_jwt(),
        _ => AppError::unauthorized_invalid_jwt(),
    })
}
