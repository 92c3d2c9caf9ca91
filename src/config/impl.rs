use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;
use crate::errors::Result;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Only the binary's wiring reads this; the link service receives its
/// settings through `LinkServiceConfig`. Defaults until `init_config` runs.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Initialize the global configuration from `path` plus `SL__*` variables
///
/// Calling it again replaces the stored configuration.
pub fn init_config(path: &str) -> Result<()> {
    let loaded = Arc::new(StaticConfig::load(path)?);
    CONFIG
        .get_or_init(|| ArcSwap::new(loaded.clone()))
        .store(loaded);
    Ok(())
}
