//! Equipment cache configuration.

use serde::{Deserialize, Serialize};

use crate::types::EquipmentType;

/// Equipment cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentConfig {
    /// Equipment kinds kept when caches are reset after a computation run.
    #[serde(default = "default_kept_types")]
    pub post_computation_kept_types: Vec<EquipmentType>,
}

impl Default for EquipmentConfig {
    fn default() -> Self {
        Self {
            post_computation_kept_types: default_kept_types(),
        }
    }
}

/// Geometry-stable kinds that are expensive to refetch.
fn default_kept_types() -> Vec<EquipmentType> {
    vec![
        EquipmentType::Substation,
        EquipmentType::VoltageLevel,
        EquipmentType::HvdcLine,
    ]
}
