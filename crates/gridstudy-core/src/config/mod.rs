//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate. Each
//! sub-module represents a logical configuration section, and every field
//! carries a default so that an absent file is a valid configuration.

pub mod directory;
pub mod equipment;
pub mod logging;
pub mod realtime;

use serde::{Deserialize, Serialize};

use self::directory::DirectoryConfig;
use self::equipment::EquipmentConfig;
use self::logging::LoggingConfig;
use self::realtime::RealtimeConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged configuration files
/// (default + environment overlay + `GRIDSTUDY__` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Equipment cache settings.
    #[serde(default)]
    pub equipment: EquipmentConfig,
    /// Notification decoding and dispatch settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// Directory explorer settings.
    #[serde(default)]
    pub directory: DirectoryConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges `<dir>/default`, the `<dir>/<env>` overlay, and environment
    /// variables prefixed with `GRIDSTUDY__`.
    pub fn load(dir: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(&format!("{dir}/default")).required(false))
            .add_source(config::File::with_name(&format!("{dir}/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("GRIDSTUDY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        tracing::debug!(dir, env, "Configuration loaded");
        Ok(loaded)
    }
}
