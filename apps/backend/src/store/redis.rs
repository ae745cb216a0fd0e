//! Redis-backed state store.
//!
//! Uses a multiplexed `ConnectionManager`; each operation clones the manager,
//! which is the cheap, lock-free way to share it. Value compare-and-swap has
//! no native Redis command, so it runs as a small Lua script, which Redis
//! executes atomically. `SREM` already returns the number of members removed,
//! which gives `set_remove` its single-winner guarantee for free.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};

use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::store::KvStore;

/// ARGV[1] is '1' when a current value is expected, '0' for create-if-absent.
static CAS_SCRIPT: Lazy<Script> = Lazy::new(|| {
    Script::new(
        r#"
local cur = redis.call('GET', KEYS[1])
if ARGV[1] == '1' then
  if cur == ARGV[2] then
    redis.call('SET', KEYS[1], ARGV[3])
    return 1
  end
  return 0
end
if cur == false then
  redis.call('SET', KEYS[1], ARGV[3])
  return 1
end
return 0
"#,
    )
});

pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)
            .map_err(|err| AppError::config(format!("Invalid REDIS_URL: {err}")))?;

        let manager = ConnectionManager::new(client).await.map_err(|err| {
            AppError::store_unavailable(format!(
                "Unable to initialize Redis connection manager: {err}"
            ))
        })?;

        Ok(Self { manager })
    }

    fn conn(&self) -> ConnectionManager {
        self.manager.clone()
    }
}

fn store_error(op: &str, err: redis::RedisError) -> DomainError {
    let kind = if err.is_timeout() {
        InfraErrorKind::Timeout
    } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
        InfraErrorKind::StoreUnavailable
    } else {
        InfraErrorKind::Other(format!("{:?}", err.kind()))
    };
    DomainError::infra(kind, format!("redis {op} failed: {err}"))
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.conn();
        conn.get::<_, Option<String>>(key)
            .await
            .map_err(|err| store_error("GET", err))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        let mut conn = self.conn();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|err| store_error("SET", err))
    }

    async fn del(&self, key: &str) -> Result<bool, DomainError> {
        let mut conn = self.conn();
        let removed: i64 = conn
            .del(key)
            .await
            .map_err(|err| store_error("DEL", err))?;
        Ok(removed > 0)
    }

    async fn set_cas(
        &self,
        key: &str,
        expected: Option<&str>,
        value: &str,
    ) -> Result<bool, DomainError> {
        let mut conn = self.conn();
        let applied: i64 = CAS_SCRIPT
            .key(key)
            .arg(if expected.is_some() { "1" } else { "0" })
            .arg(expected.unwrap_or(""))
            .arg(value)
            .invoke_async(&mut conn)
            .await
            .map_err(|err| store_error("EVAL cas", err))?;
        Ok(applied == 1)
    }

    async fn set_add(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        let mut conn = self.conn();
        let added: i64 = conn
            .sadd(key, member)
            .await
            .map_err(|err| store_error("SADD", err))?;
        Ok(added > 0)
    }

    async fn set_remove(&self, key: &str, member: &str) -> Result<bool, DomainError> {
        let mut conn = self.conn();
        let removed: i64 = conn
            .srem(key, member)
            .await
            .map_err(|err| store_error("SREM", err))?;
        Ok(removed > 0)
    }

    async fn set_members(&self, key: &str) -> Result<Vec<String>, DomainError> {
        let mut conn = self.conn();
        conn.smembers::<_, Vec<String>>(key)
            .await
            .map_err(|err| store_error("SMEMBERS", err))
    }

    async fn set_len(&self, key: &str) -> Result<usize, DomainError> {
        let mut conn = self.conn();
        let len: i64 = conn
            .scard(key)
            .await
            .map_err(|err| store_error("SCARD", err))?;
        Ok(len.max(0) as usize)
    }
}
