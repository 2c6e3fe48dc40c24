//! Directory explorer configuration.

use serde::{Deserialize, Serialize};

/// Directory explorer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Rebuild the node map from the roots when a root directory goes away,
    /// purging entries left behind by partial fetches.
    #[serde(default = "default_true")]
    pub purge_on_root_removal: bool,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            purge_on_root_removal: true,
        }
    }
}

fn default_true() -> bool {
    true
}
