//! In-process state store.
//!
//! Backs development and test deployments. Same atomicity contract as the
//! Redis store: `set_cas` and `set_remove` are single atomic steps, provided
//! here by DashMap's shard locking.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};

use crate::errors::DomainError;
use crate::store::KvStore;

#[derive(Default)]
pub struct MemoryStore {
    kv: DashMap<String, String>,
    sets: DashMap<String, DashSet<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.kv.get(key).map(|v| v.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        self.kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.kv.remove(key).is_some())
    }

    async fn set_cas(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, DomainError> {
        // The entry guard holds the shard lock, making compare+swap atomic.
        match self.kv.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => match expected {
                Some(prev) if occupied.get() == prev => {
                    occupied.insert(value.to_string());
                    Ok(true)
                }
                _ => Ok(false),
            },
            Entry::Vacant(vacant) => {
                if expected.is_none() {
                    vacant.insert(value.to_string());
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        let set = self.sets.entry(key.to_string()).or_default();
        Ok(set.insert(member.to_string()))
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        match self.sets.get(key) {
            Some(set) => Ok(set.remove(member).is_some()),
            None => Ok(false),
        }
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError> {
        Ok(self
            .sets
            .get(key)
            .map(|set| set.iter().map(|m| m.clone()).collect())
            .unwrap_or_default())
    }

    async fn set_len(&self, key: &str) -> Result<usize, DomainError> {
        Ok(self.sets.get(key).map(|set| set.len()).unwrap_or(0))
    }
}
