//! Custody service configuration.

use std::env;

use super::must_var;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct CustodyConfig {
    pub api_url: String,
    pub api_key: String,
    /// Collection assumed for staked assets that carry none of their own.
    pub collection_id: Option<String>,
}

/// Load custody settings from the environment.
///
/// Returns `None` when `CUSTODY_API_URL` is unset: matchmaking and gameplay
/// work without settlement configured, and the transfer endpoints report the
/// missing configuration instead.
pub fn custody_config() -> Result<Option<CustodyConfig>, AppError> {
    let api_url = match env::var("CUSTODY_API_URL") {
        Err(_) => return Ok(None),
        Ok(raw) if raw.trim().is_empty() => return Ok(None),
        Ok(raw) => raw,
    };
    let api_key = must_var("CUSTODY_API_KEY")?;
    let collection_id = env::var("CUSTODY_COLLECTION_ID")
        .ok()
        .filter(|raw| !raw.trim().is_empty());
    Ok(Some(CustodyConfig {
        api_url,
        api_key,
        collection_id,
    }))
}
