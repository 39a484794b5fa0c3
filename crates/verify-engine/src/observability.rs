//! Tracing setup for hosts embedding the engine

use serde::{Deserialize, Serialize};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level: trace, debug, info, warn or error
    pub level: String,
    pub with_target: bool,
    pub with_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            with_target: true,
            with_thread_ids: true,
        }
    }
}

impl LoggingConfig {
    /// Parsed level, falling back to INFO for unrecognised names
    pub fn max_level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}

/// Install the global fmt subscriber
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one is left in place.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.max_level())
        .with_target(config.with_target)
        .with_thread_ids(config.with_thread_ids)
        .finish();

    let installed = tracing::subscriber::set_global_default(subscriber).is_ok();
    if installed {
        info!(level = %config.max_level(), "Tracing initialized");
    }
    installed
}
