//! Per-type, per-study-node equipment cache.
//!
//! For a given `(equipment type, node)` pair the cache is either absent or
//! holds the complete list of that node's equipments: updates for pairs that
//! were never loaded are dropped rather than stored as a partial list.
//!
//! Snapshots share structure: every type slot and every per-node list sits
//! behind an `Arc` and is copied only when an action actually changes it.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use gridstudy_core::config::equipment::EquipmentConfig;
use gridstudy_core::types::{EquipmentType, NodeId};

use crate::model::Equipment;

/// Equipments of one kind, per study node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquipmentsByNodes {
    /// Loaded nodes; always exactly the key set of `equipments_by_node_id`.
    nodes_id: Vec<NodeId>,
    equipments_by_node_id: HashMap<NodeId, Arc<Vec<Equipment>>>,
}

impl EquipmentsByNodes {
    /// Loaded nodes, in load order.
    pub fn nodes_id(&self) -> &[NodeId] {
        &self.nodes_id
    }

    /// Equipments of `node`, if loaded.
    pub fn get(&self, node: &NodeId) -> Option<&Arc<Vec<Equipment>>> {
        self.equipments_by_node_id.get(node)
    }

    /// Whether `node` is loaded.
    pub fn is_loaded(&self, node: &NodeId) -> bool {
        self.equipments_by_node_id.contains_key(node)
    }

    /// Whether no node is loaded.
    pub fn is_empty(&self) -> bool {
        self.nodes_id.is_empty()
    }

    /// Total number of records across nodes.
    pub fn record_count(&self) -> usize {
        self.equipments_by_node_id.values().map(|v| v.len()).sum()
    }

    fn load(&mut self, node: NodeId, equipments: Vec<Equipment>) {
        if self
            .equipments_by_node_id
            .insert(node, Arc::new(equipments))
            .is_none()
        {
            self.nodes_id.push(node);
        }
    }

    /// Replaces records by id, appending unknown ones. Caller checks the node
    /// is loaded.
    fn upsert(&mut self, node: &NodeId, equipments: Vec<Equipment>) {
        if let Some(list) = self.equipments_by_node_id.get_mut(node) {
            let list = Arc::make_mut(list);
            for equipment in equipments {
                match list.iter_mut().find(|e| e.id() == equipment.id()) {
                    Some(slot) => *slot = equipment,
                    None => list.push(equipment),
                }
            }
        }
    }

    fn remove_ids(&mut self, node: &NodeId, ids: &HashSet<&str>) -> bool {
        let Some(list) = self.equipments_by_node_id.get_mut(node) else {
            return false;
        };
        if !list.iter().any(|e| ids.contains(e.id())) {
            return false;
        }
        Arc::make_mut(list).retain(|e| !ids.contains(e.id()));
        true
    }

    fn remove_nodes(&mut self, nodes: &HashSet<NodeId>) {
        self.nodes_id.retain(|n| !nodes.contains(n));
        self.equipments_by_node_id.retain(|n, _| !nodes.contains(n));
    }

    fn holds_any(&self, nodes: &HashSet<NodeId>) -> bool {
        self.nodes_id.iter().any(|n| nodes.contains(n))
    }
}

/// Reference to an equipment deleted by a network modification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedEquipment {
    pub equipment_type: EquipmentType,
    pub equipment_id: String,
}

/// Actions accepted by the equipment cache.
#[derive(Debug, Clone)]
pub enum EquipmentAction {
    /// Merge complete per-node lists for one kind, overwriting per node.
    LoadEquipments {
        equipment_type: EquipmentType,
        equipments_by_node_id: HashMap<NodeId, Vec<Equipment>>,
    },
    /// Replace or append records of already loaded `(kind, node)` pairs.
    UpdateEquipments {
        equipments: HashMap<EquipmentType, Vec<Equipment>>,
        node_id: NodeId,
    },
    /// Remove records by id on `node_id`.
    DeleteEquipments {
        equipments: Vec<DeletedEquipment>,
        node_id: NodeId,
    },
    /// Clear every kind.
    ResetEquipments,
    /// Clear the listed kinds.
    ResetEquipmentsByTypes(Vec<EquipmentType>),
    /// Clear every kind except the geometry-stable ones.
    ResetEquipmentsPostComputation,
    /// Forget the listed study nodes in every kind.
    RemoveNodeData(Vec<NodeId>),
}

impl EquipmentAction {
    /// Action name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoadEquipments { .. } => "LOAD_EQUIPMENTS",
            Self::UpdateEquipments { .. } => "UPDATE_EQUIPMENTS",
            Self::DeleteEquipments { .. } => "DELETE_EQUIPMENTS",
            Self::ResetEquipments => "RESET_EQUIPMENTS",
            Self::ResetEquipmentsByTypes(_) => "RESET_EQUIPMENTS_BY_TYPES",
            Self::ResetEquipmentsPostComputation => "RESET_EQUIPMENTS_POST_COMPUTATION",
            Self::RemoveNodeData(_) => "REMOVE_NODE_DATA",
        }
    }
}

/// The equipment cache: one [`EquipmentsByNodes`] per equipment kind.
#[derive(Debug, Clone)]
pub struct EquipmentCache {
    by_type: HashMap<EquipmentType, Arc<EquipmentsByNodes>>,
    kept_post_computation: Vec<EquipmentType>,
}

impl Default for EquipmentCache {
    fn default() -> Self {
        Self::new(&EquipmentConfig::default())
    }
}

impl EquipmentCache {
    /// Empty cache with every kind present.
    pub fn new(config: &EquipmentConfig) -> Self {
        Self {
            by_type: EquipmentType::ALL
                .iter()
                .map(|ty| (*ty, Arc::new(EquipmentsByNodes::default())))
                .collect(),
            kept_post_computation: config.post_computation_kept_types.clone(),
        }
    }

    /// Slot of one kind.
    pub fn by_type(&self, equipment_type: EquipmentType) -> Option<&Arc<EquipmentsByNodes>> {
        self.by_type.get(&equipment_type)
    }

    /// Equipments of one kind on one node, if loaded.
    pub fn equipments(
        &self,
        equipment_type: EquipmentType,
        node: &NodeId,
    ) -> Option<Arc<Vec<Equipment>>> {
        self.by_type
            .get(&equipment_type)
            .and_then(|slot| slot.get(node))
            .cloned()
    }

    /// Whether a kind is loaded on a node.
    pub fn is_loaded(&self, equipment_type: EquipmentType, node: &NodeId) -> bool {
        self.by_type
            .get(&equipment_type)
            .is_some_and(|slot| slot.is_loaded(node))
    }

    /// Loaded nodes of one kind.
    pub fn nodes_id(&self, equipment_type: EquipmentType) -> &[NodeId] {
        self.by_type
            .get(&equipment_type)
            .map(|slot| slot.nodes_id())
            .unwrap_or(&[])
    }

    /// Kinds loaded on `node`.
    pub fn loaded_types(&self, node: &NodeId) -> Vec<EquipmentType> {
        EquipmentType::ALL
            .into_iter()
            .filter(|ty| self.is_loaded(*ty, node))
            .collect()
    }

    fn slot_mut(&mut self, equipment_type: EquipmentType) -> &mut EquipmentsByNodes {
        Arc::make_mut(self.by_type.entry(equipment_type).or_default())
    }

    /// Applies `action`. Returns whether the cache changed.
    pub fn reduce(&mut self, action: EquipmentAction) -> bool {
        match action {
            EquipmentAction::LoadEquipments {
                equipment_type,
                equipments_by_node_id,
            } => {
                if equipments_by_node_id.is_empty() {
                    return false;
                }
                let slot = self.slot_mut(equipment_type);
                for (node, equipments) in equipments_by_node_id {
                    slot.load(node, equipments);
                }
                true
            }
            EquipmentAction::UpdateEquipments {
                equipments,
                node_id,
            } => {
                let mut changed = false;
                for (equipment_type, records) in equipments {
                    if equipment_type == EquipmentType::Substation {
                        let voltage_levels = embedded_voltage_levels(&records);
                        if !voltage_levels.is_empty() {
                            changed |=
                                self.update(EquipmentType::VoltageLevel, &node_id, voltage_levels);
                        }
                    }
                    changed |= self.update(equipment_type, &node_id, records);
                }
                changed
            }
            EquipmentAction::DeleteEquipments {
                equipments,
                node_id,
            } => self.delete(&node_id, &equipments),
            EquipmentAction::ResetEquipments => self.reset(|_| true),
            EquipmentAction::ResetEquipmentsByTypes(types) => self.reset(|ty| types.contains(&ty)),
            EquipmentAction::ResetEquipmentsPostComputation => {
                let kept = self.kept_post_computation.clone();
                self.reset(|ty| !kept.contains(&ty))
            }
            EquipmentAction::RemoveNodeData(nodes) => {
                let nodes: HashSet<NodeId> = nodes.into_iter().collect();
                let affected: Vec<EquipmentType> = self
                    .by_type
                    .iter()
                    .filter(|(_, slot)| slot.holds_any(&nodes))
                    .map(|(ty, _)| *ty)
                    .collect();
                for ty in &affected {
                    self.slot_mut(*ty).remove_nodes(&nodes);
                }
                !affected.is_empty()
            }
        }
    }

    fn update(
        &mut self,
        equipment_type: EquipmentType,
        node: &NodeId,
        records: Vec<Equipment>,
    ) -> bool {
        if records.is_empty() {
            return false;
        }
        if !self.is_loaded(equipment_type, node) {
            debug!(
                equipment_type = %equipment_type,
                node = %node,
                "Dropping update for equipments not loaded on node"
            );
            return false;
        }
        self.slot_mut(equipment_type).upsert(node, records);
        true
    }

    fn delete(&mut self, node: &NodeId, deleted: &[DeletedEquipment]) -> bool {
        let mut ids_by_type: HashMap<EquipmentType, HashSet<&str>> = HashMap::new();
        for d in deleted {
            ids_by_type
                .entry(d.equipment_type)
                .or_default()
                .insert(d.equipment_id.as_str());
        }

        let mut changed = false;
        if let Some(voltage_levels) = ids_by_type.get(&EquipmentType::VoltageLevel) {
            changed |= self.strip_from_substations(node, voltage_levels);
        }
        for (equipment_type, ids) in &ids_by_type {
            let has_match = self.by_type.get(equipment_type).is_some_and(|slot| {
                slot.get(node)
                    .is_some_and(|list| list.iter().any(|e| ids.contains(e.id())))
            });
            if has_match {
                changed |= self.slot_mut(*equipment_type).remove_ids(node, ids);
            }
        }
        changed
    }

    /// Removes deleted voltage levels from their substation's embedded list.
    fn strip_from_substations(&mut self, node: &NodeId, voltage_levels: &HashSet<&str>) -> bool {
        let embeds = |e: &Equipment| match e {
            Equipment::Substation(s) => s
                .voltage_levels
                .iter()
                .any(|vl| voltage_levels.contains(vl.id.as_str())),
            _ => false,
        };
        let has_match = self
            .equipments(EquipmentType::Substation, node)
            .is_some_and(|list| list.iter().any(embeds));
        if !has_match {
            return false;
        }

        let slot = self.slot_mut(EquipmentType::Substation);
        if let Some(list) = slot.equipments_by_node_id.get_mut(node) {
            for equipment in Arc::make_mut(list).iter_mut() {
                if let Equipment::Substation(s) = equipment {
                    s.voltage_levels
                        .retain(|vl| !voltage_levels.contains(vl.id.as_str()));
                }
            }
        }
        true
    }

    fn reset(&mut self, matches: impl Fn(EquipmentType) -> bool) -> bool {
        let mut changed = false;
        for (ty, slot) in self.by_type.iter_mut() {
            if matches(*ty) && !slot.is_empty() {
                *slot = Arc::new(EquipmentsByNodes::default());
                changed = true;
            }
        }
        changed
    }
}

/// Voltage levels embedded in updated substations, tagged with their
/// substation id.
fn embedded_voltage_levels(records: &[Equipment]) -> Vec<Equipment> {
    records
        .iter()
        .filter_map(|e| match e {
            Equipment::Substation(s) => Some(s),
            _ => None,
        })
        .flat_map(|s| {
            s.voltage_levels.iter().map(|vl| {
                let mut vl = vl.clone();
                vl.substation_id = Some(s.id.clone());
                Equipment::VoltageLevel(vl)
            })
        })
        .collect()
}
