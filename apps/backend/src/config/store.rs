//! State store backend selection.
//!
//! The backend is chosen once at startup from `STORE_BACKEND`; the server
//! never probes Redis at runtime to decide where state lives.

use std::env;

use super::must_var;
use crate::error::AppError;

/// Which store implementation backs the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// External Redis instance (`REDIS_URL` required).
    Redis,
    /// In-process memory store. State is lost on restart; fine for dev and
    /// single-instance deployments.
    Memory,
}

impl StoreBackend {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Redis => "redis",
            Self::Memory => "memory",
        }
    }
}

/// Read `STORE_BACKEND`. Unset selects the memory store.
pub fn store_backend() -> Result<StoreBackend, AppError> {
    match env::var("STORE_BACKEND") {
        Err(_) => Ok(StoreBackend::Memory),
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" | "" => Ok(StoreBackend::Memory),
            other => Err(AppError::config(format!(
                "Unknown STORE_BACKEND '{other}' (expected 'redis' or 'memory')"
            ))),
        },
    }
}

/// Redis connection string; required when the redis backend is selected.
pub fn redis_url() -> Result<String, AppError> {
    must_var("REDIS_URL")
}

#[cfg(test)]
mod tests {
    use std::env;

    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn defaults_to_memory() {
        env::remove_var("STORE_BACKEND");
        assert_eq!(store_backend().unwrap(), StoreBackend::Memory);
    }

    #[test]
    #[serial]
    fn selects_redis_case_insensitively() {
        env::set_var("STORE_BACKEND", "Redis");
        assert_eq!(store_backend().unwrap(), StoreBackend::Redis);
        env::remove_var("STORE_BACKEND");
    }

    #[test]
    #[serial]
    fn rejects_unknown_backend() {
        env::set_var("STORE_BACKEND", "postgres");
        let err = store_backend().unwrap_err();
        assert!(err.to_string().contains("postgres"));
        env::remove_var("STORE_BACKEND");
    }

    #[test]
    #[serial]
    fn redis_url_is_required() {
        env::remove_var("REDIS_URL");
        let err = redis_url().unwrap_err();
        assert!(err.to_string().contains("REDIS_URL"));
    }
}
