use async_trait::async_trait;
use bytes::Bytes;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tracing::{debug, error, trace};

use super::{KvEntry, KvMetadata, KvStore, PutOptions};
use crate::errors::{Result, SluglinkError};

/// Redis-backed store.
///
/// Expiration is carried by Redis itself (`SET ... EXAT`), and reported back
/// through `EXPIRETIME`, so value and metadata cannot drift apart.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| {
            SluglinkError::config(format!("Invalid Redis URL '{}': {}", url, e))
        })?;

        let mut manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to connect to Redis at {}: {}", url, e);
            SluglinkError::store(format!("Redis connection failed: {}", e))
        })?;

        let pong: String = redis::cmd("PING").query_async(&mut manager).await?;
        debug!("Redis connection test successful: {}", pong);

        Ok(Self { manager })
    }

    fn store_error(op: &str, key: &str, err: redis::RedisError) -> SluglinkError {
        error!("Redis {} '{}' failed: {}", op, key, err);
        SluglinkError::store(format!("Redis {} '{}' failed: {}", op, key, err))
    }
}

#[async_trait]
impl KvStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        let mut conn = self.manager.clone();
        let value: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| Self::store_error("GET", key, e))?;
        trace!("Redis GET '{}' hit: {}", key, value.is_some());
        Ok(value.map(Bytes::from))
    }

    async fn get_with_metadata(&self, key: &str) -> Result<Option<KvEntry>> {
        let Some(value) = self.get(key).await? else {
            return Ok(None);
        };

        let mut conn = self.manager.clone();
        // -1: no expiry, -2: key vanished between the two calls
        let expire_time: i64 = redis::cmd("EXPIRETIME")
            .arg(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| Self::store_error("EXPIRETIME", key, e))?;

        if expire_time == -2 {
            return Ok(None);
        }

        Ok(Some(KvEntry {
            value,
            metadata: KvMetadata {
                expiration: (expire_time >= 0).then_some(expire_time),
            },
        }))
    }

    async fn put(&self, key: &str, value: Bytes, options: PutOptions) -> Result<()> {
        let mut conn = self.manager.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value.as_ref());
        if let Some(expiration) = options.expiration() {
            cmd.arg("EXAT").arg(expiration);
        }

        cmd.query_async::<()>(&mut conn)
            .await
            .map_err(|e| Self::store_error("SET", key, e))?;
        trace!("Redis SET '{}' (expiration: {:?})", key, options.expiration());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let removed: i64 = conn
            .del(key)
            .await
            .map_err(|e| Self::store_error("DEL", key, e))?;
        trace!("Redis DEL '{}' removed {}", key, removed);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
