//! Notification handling configuration.

use serde::{Deserialize, Serialize};

/// Notification decoding and dispatch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Maximum accepted size of a raw notification, in bytes.
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Window in milliseconds within which identical notifications are
    /// suppressed. `0` disables deduplication.
    #[serde(default)]
    pub dedup_window_ms: u64,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            max_message_size: default_max_message_size(),
            dedup_window_ms: 0,
        }
    }
}

fn default_max_message_size() -> usize {
    65_536
}
