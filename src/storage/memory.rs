use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;
use moka::policy::Expiry;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

use super::{KvEntry, KvMetadata, KvStore, PutOptions};
use crate::errors::Result;

#[derive(Debug, Clone)]
struct StoredValue {
    value: Bytes,
    metadata: KvMetadata,
}

/// 基于 metadata.expiration 计算过期时间
struct MetadataExpiry;

impl MetadataExpiry {
    fn remaining(value: &StoredValue) -> Option<Duration> {
        value.metadata.expiration.map(|expires_at| {
            let now = chrono::Utc::now().timestamp();
            Duration::from_secs(expires_at.saturating_sub(now).max(0) as u64)
        })
    }
}

impl Expiry<String, StoredValue> for MetadataExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &StoredValue,
        _created_at: Instant,
    ) -> Option<Duration> {
        Self::remaining(value)
    }

    // 覆盖写入时重新计算，而不是沿用旧值的剩余时间
    fn expire_after_update(
        &self,
        _key: &String,
        value: &StoredValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Self::remaining(value)
    }
}

/// In-process store with per-entry expiry.
///
/// Unbounded: entries leave only through `delete` or expiration.
#[derive(Clone)]
pub struct MemoryStore {
    inner: Cache<String, StoredValue>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        let inner = Cache::builder().expire_after(MetadataExpiry).build();
        debug!("MemoryStore initialized");
        Self { inner }
    }

    async fn live_entry(&self, key: &str) -> Option<StoredValue> {
        let stored = self.inner.get(key).await?;
        if stored.metadata.is_expired(chrono::Utc::now().timestamp()) {
            trace!("MemoryStore: '{}' expired", key);
            self.inner.invalidate(key).await;
            return None;
        }
        Some(stored)
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>> {
        Ok(self.live_entry(key).await.map(|stored| stored.value))
    }

    async fn get_with_metadata(&self, key: &str) -> Result<Option<KvEntry>> {
        Ok(self.live_entry(key).await.map(|stored| KvEntry {
            value: stored.value,
            metadata: stored.metadata,
        }))
    }

    async fn put(&self, key: &str, value: Bytes, options: PutOptions) -> Result<()> {
        trace!(
            "MemoryStore: put '{}' (expiration: {:?})",
            key,
            options.expiration()
        );
        self.inner
            .insert(
                key.to_string(),
                StoredValue {
                    value,
                    metadata: options.metadata(),
                },
            )
            .await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.invalidate(key).await;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
