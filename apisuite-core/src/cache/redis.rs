//! Redis-backed response cache.

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::ResponseCache;
use crate::error::ApiSuiteError;

/// Shared cache over a multiplexed Redis connection.
///
/// Several processes may read and write the same keys; writes are plain
/// overwrites.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(url: &str) -> Result<Self, ApiSuiteError> {
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        Ok(Self { connection })
    }

    pub fn from_connection(connection: ConnectionManager) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl ResponseCache for RedisCache {
    async fn exists(&self, key: &str) -> Result<bool, ApiSuiteError> {
        let mut conn = self.connection.clone();
        Ok(conn.exists(key).await?)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ApiSuiteError> {
        let mut conn = self.connection.clone();
        Ok(conn.get(key).await?)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ApiSuiteError> {
        let mut conn = self.connection.clone();
        let () = conn.set(key, value).await?;
        Ok(())
    }

    async fn expire(&self, key: &str, ttl_seconds: u64) -> Result<(), ApiSuiteError> {
        let Some(seconds) = expire_seconds(ttl_seconds) else {
            // `set` already cleared any previous TTL.
            return Ok(());
        };
        let mut conn = self.connection.clone();
        let _: bool = conn.expire(key, seconds).await?;
        Ok(())
    }
}

/// Redis rejects deadlines that overflow its millisecond clock; beyond
/// this bound the entry is left without a TTL.
const LONGEST_EXPIRE_SECONDS: u64 = 1 << 40;

fn expire_seconds(ttl_seconds: u64) -> Option<i64> {
    if ttl_seconds > LONGEST_EXPIRE_SECONDS {
        return None;
    }
    i64::try_from(ttl_seconds).ok()
}
