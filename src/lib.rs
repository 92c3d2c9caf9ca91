//! Sluglink - slug-keyed short links over a key-value store
//!
//! A slug maps to at most one link record. Records are created at free
//! slugs, edited in place, or relocated to a new slug with a write-then-delete
//! protocol, and their `expiration` is mirrored into the store's native TTL.
//!
//! # Features
//! - **server**: HTTP API (default)
//!
//! # Architecture
//! - `storage`: key-value store adapter, record model, backends
//! - `services`: link lifecycle (create / fetch / update)
//! - `utils`: slug resolution and target validation
//! - `api`: HTTP boundary
//! - `config`: configuration loading
//! - `system`: logging

#[cfg(feature = "server")]
pub mod api;
pub mod config;
pub mod errors;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
