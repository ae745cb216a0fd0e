//! Environment-driven configuration loaders.

pub mod custody;
pub mod store;
pub mod tunables;

pub use custody::{custody_config, CustodyConfig};
pub use store::{redis_url, store_backend, StoreBackend};
pub use tunables::Tunables;

use crate::error::AppError;

/// Get required environment variable or return error
pub(crate) fn must_var(name: &str) -> Result<String, AppError> {
    std::env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
