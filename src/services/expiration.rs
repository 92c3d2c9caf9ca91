use crate::errors::{Result, SluglinkError};

/// Minimum lifetime the KV store accepts for an expiring key
pub const DEFAULT_MIN_TTL: u64 = 60;

/// Latest absolute expiration (epoch seconds) a store can represent in
/// milliseconds without overflowing an `i64`
pub const MAX_EXPIRATION: i64 = i64::MAX / 1000;

/// How a record's `expiration` is derived on each write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    /// Preview deployments cap every record's lifetime at this many seconds
    pub preview_ttl: Option<u64>,
    /// Explicit expirations must be at least this far in the future
    pub min_ttl: u64,
    /// Explicit expirations may be at most this far in the future
    pub max_ttl: Option<u64>,
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self {
            preview_ttl: None,
            min_ttl: DEFAULT_MIN_TTL,
            max_ttl: None,
        }
    }
}

impl ExpirationPolicy {
    /// Check a caller-supplied expiration before anything touches the store.
    pub fn validate_requested(&self, expiration: i64, now: i64) -> Result<()> {
        if expiration <= now {
            return Err(SluglinkError::validation(format!(
                "Expiration {} is not in the future",
                expiration
            )));
        }
        if expiration > MAX_EXPIRATION {
            return Err(SluglinkError::validation(format!(
                "Expiration {} is beyond the supported maximum {}",
                expiration, MAX_EXPIRATION
            )));
        }

        let lifetime = expiration.saturating_sub(now) as u64;
        if lifetime < self.min_ttl {
            return Err(SluglinkError::validation(format!(
                "Expiration must be at least {} seconds from now",
                self.min_ttl
            )));
        }
        if let Some(max_ttl) = self.max_ttl
            && lifetime > max_ttl
        {
            return Err(SluglinkError::validation(format!(
                "Expiration must be at most {} seconds from now",
                max_ttl
            )));
        }
        Ok(())
    }

    /// Final expiration for a write, after the preview cap.
    pub fn effective(&self, expiration: Option<i64>, now: i64) -> Option<i64> {
        match self.preview_ttl {
            Some(ttl) => {
                let cap = now
                    .saturating_add(i64::try_from(ttl).unwrap_or(i64::MAX))
                    .min(MAX_EXPIRATION);
                Some(expiration.map_or(cap, |exp| exp.min(cap)))
            }
            None => expiration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_past_and_present() {
        let policy = ExpirationPolicy::default();
        assert!(policy.validate_requested(99, 100).is_err());
        assert!(policy.validate_requested(100, 100).is_err());
    }

    #[test]
    fn test_min_ttl() {
        let policy = ExpirationPolicy::default();
        assert!(policy.validate_requested(159, 100).is_err());
        assert!(policy.validate_requested(160, 100).is_ok());

        let relaxed = ExpirationPolicy {
            min_ttl: 0,
            ..ExpirationPolicy::default()
        };
        assert!(relaxed.validate_requested(101, 100).is_ok());
    }

    #[test]
    fn test_effective_without_preview() {
        let policy = ExpirationPolicy::default();
        assert_eq!(policy.effective(None, 100), None);
        assert_eq!(policy.effective(Some(500), 100), Some(500));
    }

    #[test]
    fn test_preview_caps_expiration() {
        let policy = ExpirationPolicy {
            preview_ttl: Some(86_400),
            ..ExpirationPolicy::default()
        };
        assert_eq!(policy.effective(None, 100), Some(86_500));
        assert_eq!(policy.effective(Some(1_000), 100), Some(1_000));
        assert_eq!(policy.effective(Some(10_000_000), 100), Some(86_500));
    }

    #[test]
    fn test_rejects_unrepresentable_expiration() {
        let policy = ExpirationPolicy::default();
        assert!(matches!(
            policy.validate_requested(i64::MAX, 100),
            Err(SluglinkError::Validation(_))
        ));
        assert!(policy.validate_requested(MAX_EXPIRATION + 1, 100).is_err());
        assert!(policy.validate_requested(MAX_EXPIRATION, 100).is_ok());
    }

    #[test]
    fn test_max_ttl() {
        let policy = ExpirationPolicy {
            max_ttl: Some(3_600),
            ..ExpirationPolicy::default()
        };
        assert!(policy.validate_requested(3_700, 100).is_ok());
        assert!(policy.validate_requested(3_701, 100).is_err());
    }

    #[test]
    fn test_huge_preview_ttl_stays_representable() {
        let policy = ExpirationPolicy {
            preview_ttl: Some(u64::MAX),
            ..ExpirationPolicy::default()
        };
        assert_eq!(policy.effective(None, 100), Some(MAX_EXPIRATION));
    }
}
