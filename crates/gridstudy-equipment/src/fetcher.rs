//! Equipment server collaborator.

use async_trait::async_trait;

use gridstudy_core::result::AppResult;
use gridstudy_core::types::{EquipmentType, NodeId};

use crate::model::Equipment;

/// Read access to the network equipment of a study node.
#[async_trait]
pub trait EquipmentFetcher: Send + Sync + 'static {
    /// Fetches the equipments of one kind on `node`.
    ///
    /// With `substations_ids`, only equipments attached to those substations
    /// are returned.
    async fn fetch_equipments(
        &self,
        node: NodeId,
        equipment_type: EquipmentType,
        substations_ids: Option<&[String]>,
    ) -> AppResult<Vec<Equipment>>;
}
