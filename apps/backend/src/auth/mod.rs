//! Access-token verification.
//!
//! The backend never issues session tokens; it verifies tokens minted by the
//! platform's auth service and treats the claims as the player's identity.

pub mod claims;
pub mod jwt;

pub use claims::AccessClaims;
pub use jwt::{mint_access_token, verify_access_token};
