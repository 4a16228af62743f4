//! Store configuration.
//!
//! Loaded from an optional TOML file, then overridden by `MEDKEEPER__*`
//! environment variables (e.g. `MEDKEEPER__EXPIRING_SOON_DAYS=45`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::DEFAULT_EXPIRING_SOON_DAYS;

/// Tunables for the in-memory store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Batches expiring within this many days are flagged "Expiring Soon"
    pub expiring_soon_days: u32,
    /// Maximum undo depth; unbounded when absent
    pub history_limit: Option<usize>,
    /// How far ahead depo reminders are listed
    pub reminder_horizon_days: u32,
    /// Station the patient list opens filtered to
    pub default_station_filter: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days: DEFAULT_EXPIRING_SOON_DAYS,
            history_limit: None,
            reminder_horizon_days: 14,
            default_station_filter: None,
        }
    }
}

impl StoreConfig {
    /// Load configuration from `path` (if given) and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder
            .add_source(
                config::Environment::with_prefix("MEDKEEPER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
