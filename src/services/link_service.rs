//! Link lifecycle service
//!
//! Create, fetch and update (including relocation to a new slug) of link
//! records over a [`KvStore`]. The store has no multi-key transactions, so a
//! relocation is an ordered protocol: write the new key, then delete the old
//! one. An interruption between the two steps leaves the record under both
//! keys, never under none.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use super::cleanup::{CleanupRetry, remove_old_key};
use super::expiration::ExpirationPolicy;
use crate::errors::{Result, SluglinkError};
use crate::storage::models::strip_reserved;
use crate::storage::{KvStore, LinkRecord, PutOptions, link_key};
use crate::utils::{SlugPolicy, SlugResolver, now_epoch, validate_target};

// ============ Request DTOs ============

/// Incoming link fields.
///
/// On create every field but `expiration` and the extras is required. On
/// update, absent fields keep their stored value and `slug` is the new slug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Absent: inherit. `null`: never expires. Number: epoch seconds.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration: Option<Option<i64>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

impl LinkPayload {
    pub fn new(slug: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            target: Some(target.into()),
            ..Self::default()
        }
    }

    pub fn with_expiration(mut self, expiration: Option<i64>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Edit body as sent by clients.
///
/// Either `{ oldSlug, newSlug?, ... }` or `{ slug, newSlug?, ... }`, where
/// `slug` names the record being edited.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditLinkRequest {
    #[serde(default)]
    pub old_slug: Option<String>,
    #[serde(default)]
    pub new_slug: Option<String>,
    #[serde(flatten)]
    pub link: LinkPayload,
}

impl EditLinkRequest {
    /// Split into the identifying slug and the payload passed to `update`.
    pub fn into_update(self) -> Result<(String, LinkPayload)> {
        let EditLinkRequest {
            old_slug,
            new_slug,
            mut link,
        } = self;

        let identifying = match non_blank(old_slug) {
            Some(old) => old,
            None => non_blank(link.slug.take()).ok_or_else(|| {
                SluglinkError::validation("Either 'oldSlug' or 'slug' must identify the link")
            })?,
        };

        link.slug = non_blank(new_slug);
        Ok((identifying, link))
    }
}

/// Keys that address a record in an edit request, never stored on it
const ADDRESSING_FIELDS: &[&str] = &["oldSlug", "newSlug"];

/// Extra fields that may be stored on a record
fn user_fields(extra: Map<String, Value>) -> Map<String, Value> {
    let mut fields = strip_reserved(extra);
    fields.retain(|key, _| !ADDRESSING_FIELDS.contains(&key.as_str()));
    fields
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Everything the service needs, passed in explicitly.
#[derive(Debug, Clone, Default)]
pub struct LinkServiceConfig {
    pub slug: SlugPolicy,
    pub expiration: ExpirationPolicy,
    pub cleanup_retry: CleanupRetry,
}

// ============ LinkService Implementation ============

pub struct LinkService {
    store: Arc<dyn KvStore>,
    resolver: SlugResolver,
    expiration: ExpirationPolicy,
    cleanup_retry: CleanupRetry,
}

impl LinkService {
    pub fn new(store: Arc<dyn KvStore>, config: LinkServiceConfig) -> Result<Self> {
        Ok(Self {
            store,
            resolver: SlugResolver::new(config.slug)?,
            expiration: config.expiration,
            cleanup_retry: config.cleanup_retry,
        })
    }

    async fn load(&self, slug: &str) -> Result<Option<LinkRecord>> {
        let key = link_key(slug);
        match self.store.get(&key).await? {
            Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
                error!("LinkService: undecodable record at '{}': {}", key, e);
                SluglinkError::serialization(format!("Corrupt record at '{}': {}", key, e))
            }),
            None => Ok(None),
        }
    }

    async fn write(&self, record: &LinkRecord) -> Result<()> {
        let value = Bytes::from(serde_json::to_vec(record)?);
        self.store
            .put(
                &link_key(&record.slug),
                value,
                PutOptions::expiring_at(record.expiration),
            )
            .await
    }

    fn validate_requested_expiration(&self, payload: &LinkPayload, now: i64) -> Result<()> {
        match payload.expiration {
            Some(Some(expiration)) => self.expiration.validate_requested(expiration, now),
            _ => Ok(()),
        }
    }

    /// Look up a record by slug.
    pub async fn fetch(&self, slug: &str) -> Result<LinkRecord> {
        let not_found = || SluglinkError::not_found(format!("Link '{}' not found", slug));

        // A slug that cannot be resolved can never have been stored
        let resolved = self.resolver.resolve(slug).map_err(|_| not_found())?;
        self.load(&resolved).await?.ok_or_else(not_found)
    }

    /// Create a record at a free slug.
    pub async fn create(&self, payload: LinkPayload) -> Result<LinkRecord> {
        let now = now_epoch();

        let requested = payload
            .slug
            .as_deref()
            .ok_or_else(|| SluglinkError::validation("Slug is required"))?;
        let slug = self.resolver.resolve(requested)?;

        let target = payload
            .target
            .as_deref()
            .ok_or_else(|| SluglinkError::validation("Target URL is required"))?;
        validate_target(target)?;
        self.validate_requested_expiration(&payload, now)?;

        if self.load(&slug).await?.is_some() {
            warn!("LinkService: create rejected, '{}' already exists", slug);
            return Err(SluglinkError::conflict(format!(
                "Link '{}' already exists",
                slug
            )));
        }

        let record = LinkRecord {
            id: uuid::Uuid::new_v4().to_string(),
            slug,
            target: target.trim().to_string(),
            created_at: now,
            updated_at: now,
            expiration: self.expiration.effective(payload.expiration.flatten(), now),
            extra: user_fields(payload.extra),
        };

        self.write(&record).await?;

        info!(
            "LinkService: created '{}' -> '{}' (id: {}, expiration: {:?})",
            record.slug, record.target, record.id, record.expiration
        );
        Ok(record)
    }

    /// Update the record at `identifying_slug`, relocating it when
    /// `payload.slug` names a different slug.
    pub async fn update(&self, identifying_slug: &str, payload: LinkPayload) -> Result<LinkRecord> {
        let now = now_epoch();

        let current = self.resolver.resolve(identifying_slug).map_err(|_| {
            SluglinkError::not_found(format!("Link '{}' not found", identifying_slug))
        })?;
        let target_slug = match payload.slug.as_deref() {
            Some(requested) => self.resolver.resolve(requested)?,
            None => current.clone(),
        };
        if let Some(ref target) = payload.target {
            validate_target(target)?;
        }
        self.validate_requested_expiration(&payload, now)?;

        let existing = self
            .load(&current)
            .await?
            .ok_or_else(|| SluglinkError::not_found(format!("Link '{}' not found", current)))?;

        let relocating = target_slug != current;
        if relocating && let Some(occupant) = self.load(&target_slug).await? {
            if occupant.id != existing.id {
                warn!(
                    "LinkService: cannot move '{}' to '{}', slug taken by {}",
                    current, target_slug, occupant.id
                );
                return Err(SluglinkError::conflict(format!(
                    "Slug '{}' already exists",
                    target_slug
                )));
            }
            warn!(
                "LinkService: '{}' already holds record {}, finishing earlier relocation",
                target_slug, existing.id
            );
        }

        let merged = self.merge(existing, payload, target_slug, now);

        self.write(&merged).await?;

        if relocating {
            self.remove_relocated(&current, &merged.slug).await?;
            info!(
                "LinkService: moved '{}' -> '{}' (id: {})",
                current, merged.slug, merged.id
            );
        } else {
            info!("LinkService: updated '{}' (id: {})", merged.slug, merged.id);
        }

        Ok(merged)
    }

    /// Apply an edit request in either addressing form.
    pub async fn edit(&self, request: EditLinkRequest) -> Result<LinkRecord> {
        let (identifying, payload) = request.into_update()?;
        self.update(&identifying, payload).await
    }

    fn merge(&self, existing: LinkRecord, payload: LinkPayload, slug: String, now: i64) -> LinkRecord {
        let expiration = match payload.expiration {
            Some(requested) => requested,
            None => existing.expiration,
        };

        let mut extra = existing.extra;
        extra.extend(user_fields(payload.extra));

        LinkRecord {
            id: existing.id,
            slug,
            target: payload
                .target
                .map(|t| t.trim().to_string())
                .unwrap_or(existing.target),
            created_at: existing.created_at,
            updated_at: now.max(existing.updated_at),
            expiration: self.expiration.effective(expiration, now),
            extra,
        }
    }

    /// Delete the old key of a relocation.
    ///
    /// Runs detached so a dropped request future cannot cancel it after the
    /// new key has been written.
    async fn remove_relocated(&self, old_slug: &str, new_slug: &str) -> Result<()> {
        let store = Arc::clone(&self.store);
        let retry = self.cleanup_retry;
        let (old, new) = (old_slug.to_string(), new_slug.to_string());

        let task = tokio::spawn(async move { remove_old_key(store, &old, &new, retry).await });

        let outcome = match task.await {
            Ok(result) => result,
            Err(e) => Err(SluglinkError::store(format!("cleanup task failed: {}", e))),
        };

        outcome.map_err(|e| {
            SluglinkError::store(format!(
                "Link moved to '{}' but '{}' could not be removed: {}",
                new_slug,
                old_slug,
                e.message()
            ))
        })
    }
}
