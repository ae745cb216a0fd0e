//! Key-value state store abstraction.
//!
//! All match, queue and transfer state lives behind [`KvStore`]. Two
//! implementations exist: a Redis-backed store for deployments and an
//! in-process store for development and tests. The backend is selected by
//! configuration at startup; nothing probes or falls back at runtime.

pub mod keys;
pub mod memory;
pub mod redis;

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::DomainError;

/// Minimal key-value plus set contract the backend needs.
///
/// `set_cas` and `set_remove` are the two primitives with atomicity
/// guarantees; optimistic match updates and queue claims are built on them.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Delete a key. Returns true when the key existed.
    async fn del(&self, key: &str) -> Result<bool, DomainError>;

    /// Atomic compare-and-swap on a key's value.
    ///
    /// `expected` of `None` means "create only if absent". Returns false
    /// when the current value does not match `expected`; the key is left
    /// untouched in that case.
    async fn set_cas(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, DomainError>;

    /// Add a member to a set. Returns true when the member was new.
    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError>;

    /// Remove a member from a set as a single atomic step.
    ///
    /// When several callers race on the same member, exactly one sees true.
    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, DomainError>;

    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError>;

    /// Number of members in a set. Missing sets count as empty.
    async fn set_len(&self, key: &str) -> Result<usize, DomainError>;
}

pub type SharedStore = Arc<dyn KvStore>;
