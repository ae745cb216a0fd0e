//! JWT claims used across the application.

use serde::{Deserialize, Serialize};

/// Verified access-token claims, inserted into request extensions by the
/// authentication middleware.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// External user identifier.
    pub sub: String,
    /// Name shown to the opponent. Falls back to `sub` when the issuer did
    /// not include one.
    #[serde(
        rename = "displayName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub display_name: Option<String>,
    /// Issued-at (seconds since epoch).
    #[serde(default)]
    pub iat: i64,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

impl AccessClaims {
    /// Display name to seat the player under.
    pub fn display_name_or_sub(&self) -> String {
        self.display_name
            .clone()
            .unwrap_or_else(|| self.sub.clone())
    }
}
