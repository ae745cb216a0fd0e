//! JWT token generation helpers for tests

use std::time::SystemTime;

use backend::auth::jwt::mint_access_token;
use backend::state::security_config::SecurityConfig;

/// Mint a bearer token for the given sub and display name.
pub fn mint_test_token(sub: &str, display_name: Option<&str>, sec: &SecurityConfig) -> String {
    mint_access_token(sub, display_name, SystemTime::now(), sec)
        .expect("should mint token successfully")
}

/// Mint a bearer Authorization header value for the given sub.
pub fn bearer_header(sub: &str, sec: &SecurityConfig) -> String {
    format!("Bearer {}", mint_test_token(sub, Some(sub), sec))
}

/// Mint an expired token for testing expired token scenarios.
///
/// Two hours in the past clears both the access token TTL and the
/// verifier's clock leeway by a wide margin.
pub fn mint_expired_token(sub: &str, sec: &SecurityConfig) -> String {
    let past_time = SystemTime::now()
        .checked_sub(std::time::Duration::from_secs(7200))
        .unwrap();
    mint_access_token(sub, Some(sub), past_time, sec).expect("should mint expired token")
}
