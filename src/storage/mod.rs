//! Key-value store adapter
//!
//! The lifecycle core only talks to a store through [`KvStore`]: single-key
//! `get` / `put` / `delete`, no multi-key transactions. Records live under
//! `link:<slug>`.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::StoreConfig;
use crate::errors::{Result, SluglinkError};

pub mod memory;
pub mod models;
pub mod redis;

pub use self::memory::MemoryStore;
pub use self::models::LinkRecord;
pub use self::redis::RedisStore;

/// Prefix of every key this crate writes.
pub const LINK_KEY_PREFIX: &str = "link:";

pub fn link_key(slug: &str) -> String {
    format!("{}{}", LINK_KEY_PREFIX, slug)
}

/// Metadata attached to a stored value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvMetadata {
    pub expiration: Option<i64>,
}

impl KvMetadata {
    pub fn is_expired(&self, now: i64) -> bool {
        self.expiration.is_some_and(|exp| exp <= now)
    }
}

/// Options for [`KvStore::put`]
///
/// The native expiration and `metadata.expiration` always come from the same
/// value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PutOptions {
    expiration: Option<i64>,
    metadata: KvMetadata,
}

impl PutOptions {
    pub fn expiring_at(expiration: Option<i64>) -> Self {
        Self {
            expiration,
            metadata: KvMetadata { expiration },
        }
    }

    /// Absolute expiration in epoch seconds
    pub fn expiration(&self) -> Option<i64> {
        self.expiration
    }

    pub fn metadata(&self) -> KvMetadata {
        self.metadata
    }
}

/// A value read back together with its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    pub value: Bytes,
    pub metadata: KvMetadata,
}

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Bytes>>;
    async fn get_with_metadata(&self, key: &str) -> Result<Option<KvEntry>>;
    async fn put(&self, key: &str, value: Bytes, options: PutOptions) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
    fn backend_name(&self) -> &'static str;
}

pub struct StoreFactory;

impl StoreFactory {
    pub async fn create(config: &StoreConfig) -> Result<Arc<dyn KvStore>> {
        let store: Arc<dyn KvStore> = match config.backend.as_str() {
            "memory" => Arc::new(MemoryStore::new()),
            "redis" => Arc::new(RedisStore::connect(&config.redis.url).await?),
            other => {
                return Err(SluglinkError::config(format!(
                    "Unknown store backend '{}'. Valid: memory, redis",
                    other
                )));
            }
        };

        info!("Using store backend: {}", store.backend_name());
        Ok(store)
    }
}
