//! Old-key removal after a relocation
//!
//! By the time this runs the record already lives under its new slug, so the
//! delete is worth several attempts before the relocation is reported as
//! incomplete.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::errors::Result;
use crate::storage::{KvStore, link_key};

/// Attempts and pacing for the old-key delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanupRetry {
    /// Extra attempts after the first delete fails
    pub retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for CleanupRetry {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl CleanupRetry {
    /// Pause before attempt `attempt + 1`: doubling from the base, capped,
    /// then drawn from the upper half of that window.
    fn pause_after(&self, attempt: u32) -> Duration {
        let window = 1u64
            .checked_shl(attempt.saturating_sub(1))
            .map_or(u64::MAX, |factor| self.base_delay_ms.saturating_mul(factor))
            .min(self.max_delay_ms);
        Duration::from_millis(rand::random_range(window / 2..=window))
    }
}

/// Delete `link:<old_slug>` now that the record sits at `new_slug`.
///
/// Only store failures are retried; the last error is returned once the
/// attempts run out.
pub async fn remove_old_key(
    store: Arc<dyn KvStore>,
    old_slug: &str,
    new_slug: &str,
    retry: CleanupRetry,
) -> Result<()> {
    let key = link_key(old_slug);
    let attempts = retry.retries + 1;
    let mut attempt = 1;

    loop {
        let err = match store.delete(&key).await {
            Ok(()) => {
                if attempt > 1 {
                    info!(
                        "Relocation '{}' -> '{}': old key removed on attempt {}",
                        old_slug, new_slug, attempt
                    );
                }
                return Ok(());
            }
            Err(e) => e,
        };

        if !err.is_retryable() || attempt >= attempts {
            error!(
                "Relocation '{}' -> '{}': giving up on old key after {} attempt(s): {}",
                old_slug, new_slug, attempt, err
            );
            return Err(err);
        }

        let pause = retry.pause_after(attempt);
        warn!(
            "Relocation '{}' -> '{}': removing old key failed ({}/{}), next try in {:?}: {}",
            old_slug, new_slug, attempt, attempts, pause, err
        );
        tokio::time::sleep(pause).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::errors::SluglinkError;
    use crate::storage::{KvEntry, MemoryStore, PutOptions};

    /// Fails the first `failures` deletes with the given error
    struct BrokenDeletes {
        inner: MemoryStore,
        failures: AtomicU32,
        deletes: AtomicU32,
        error: SluglinkError,
    }

    impl BrokenDeletes {
        async fn holding_old_key(failures: u32, error: SluglinkError) -> Arc<Self> {
            let store = Arc::new(Self {
                inner: MemoryStore::new(),
                failures: AtomicU32::new(failures),
                deletes: AtomicU32::new(0),
                error,
            });
            store
                .inner
                .put(&link_key("old"), Bytes::from_static(b"{}"), PutOptions::default())
                .await
                .unwrap();
            store
        }

        async fn old_key_present(&self) -> bool {
            self.inner.get(&link_key("old")).await.unwrap().is_some()
        }
    }

    #[async_trait]
    impl KvStore for BrokenDeletes {
        async fn get(&self, key: &str) -> Result<Option<Bytes>> {
            self.inner.get(key).await
        }

        async fn get_with_metadata(&self, key: &str) -> Result<Option<KvEntry>> {
            self.inner.get_with_metadata(key).await
        }

        async fn put(&self, key: &str, value: Bytes, options: PutOptions) -> Result<()> {
            self.inner.put(key, value, options).await
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            let failing = self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(self.error.clone());
            }
            self.inner.delete(key).await
        }

        fn backend_name(&self) -> &'static str {
            "broken-deletes"
        }
    }

    fn quick() -> CleanupRetry {
        CleanupRetry {
            retries: 2,
            base_delay_ms: 2,
            max_delay_ms: 8,
        }
    }

    #[tokio::test]
    async fn test_first_delete_succeeds() {
        let store = BrokenDeletes::holding_old_key(0, SluglinkError::store("down")).await;

        remove_old_key(store.clone(), "old", "new", quick()).await.unwrap();

        assert_eq!(store.deletes.load(Ordering::SeqCst), 1);
        assert!(!store.old_key_present().await);
    }

    #[tokio::test]
    async fn test_transient_failures_are_ridden_out() {
        let store = BrokenDeletes::holding_old_key(2, SluglinkError::store("timeout")).await;

        remove_old_key(store.clone(), "old", "new", quick()).await.unwrap();

        assert_eq!(store.deletes.load(Ordering::SeqCst), 3);
        assert!(!store.old_key_present().await);
    }

    #[tokio::test]
    async fn test_gives_up_after_all_attempts() {
        let store = BrokenDeletes::holding_old_key(10, SluglinkError::store("down")).await;

        let err = remove_old_key(store.clone(), "old", "new", quick())
            .await
            .unwrap_err();

        assert!(matches!(err, SluglinkError::Store(_)));
        assert_eq!(store.deletes.load(Ordering::SeqCst), 3);
        assert!(store.old_key_present().await);
    }

    #[tokio::test]
    async fn test_non_store_error_not_retried() {
        let store =
            BrokenDeletes::holding_old_key(10, SluglinkError::serialization("bad frame")).await;

        let err = remove_old_key(store.clone(), "old", "new", quick())
            .await
            .unwrap_err();

        assert!(matches!(err, SluglinkError::Serialization(_)));
        assert_eq!(store.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_retries_means_one_attempt() {
        let store = BrokenDeletes::holding_old_key(1, SluglinkError::store("down")).await;
        let once = CleanupRetry {
            retries: 0,
            ..quick()
        };

        assert!(remove_old_key(store.clone(), "old", "new", once).await.is_err());
        assert_eq!(store.deletes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_pause_stays_under_ceiling() {
        let retry = CleanupRetry {
            retries: 40,
            base_delay_ms: 50,
            max_delay_ms: 300,
        };
        for attempt in [1, 3, 39, 64, 200] {
            assert!(retry.pause_after(attempt) <= Duration::from_millis(300));
        }
        assert!(retry.pause_after(1) >= Duration::from_millis(25));
    }
}
