//! JSON fixture backend.
//!
//! A fixture document looks like:
//!
//! ```json
//! {
//!   "roots": [{ "elementUuid": "...", "elementName": "Root", "type": "DIRECTORY" }],
//!   "directories": { "<directory uuid>": [ ... elements ... ] },
//!   "equipments": { "<node uuid>": { "LOAD": [{ "id": "L1", "p0": 12.0 }] } }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use gridstudy_core::error::{AppError, ErrorKind};
use gridstudy_core::result::AppResult;
use gridstudy_core::types::{ElementId, EquipmentType, NodeId};
use gridstudy_directory::{DirectoryClient, ElementAttributes};
use gridstudy_equipment::{Equipment, EquipmentAction, EquipmentFetcher, StudyStore};

/// Fields tying an equipment record to a substation.
const SUBSTATION_FIELDS: [&str; 3] = ["substationId", "substationId1", "substationId2"];

/// Contents of a fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    #[serde(default)]
    pub roots: Vec<ElementAttributes>,
    #[serde(default)]
    pub directories: HashMap<ElementId, Vec<ElementAttributes>>,
    #[serde(default)]
    pub equipments: HashMap<NodeId, HashMap<EquipmentType, Vec<Value>>>,
}

/// In-memory directory and network server backed by a [`Fixture`].
///
/// The fixture can be edited between calls to simulate server-side changes.
#[derive(Debug, Default)]
pub struct FixtureBackend {
    data: Mutex<Fixture>,
}

impl FixtureBackend {
    pub fn new(fixture: Fixture) -> Self {
        Self {
            data: Mutex::new(fixture),
        }
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Reads a fixture file.
    pub fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read fixture '{}'", path.display()),
                e,
            )
        })?;
        let backend = Self::from_json(&json)?;
        info!(path = %path.display(), "Fixture loaded");
        Ok(backend)
    }

    fn lock(&self) -> MutexGuard<'_, Fixture> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replaces the root folder listing.
    pub fn set_roots(&self, roots: Vec<ElementAttributes>) {
        self.lock().roots = roots;
    }

    /// Replaces the content of one directory.
    pub fn set_directory_content(&self, directory: ElementId, content: Vec<ElementAttributes>) {
        self.lock().directories.insert(directory, content);
    }

    /// Replaces the records of one kind on one node.
    pub fn set_equipments(&self, node: NodeId, equipment_type: EquipmentType, records: Vec<Value>) {
        self.lock()
            .equipments
            .entry(node)
            .or_default()
            .insert(equipment_type, records);
    }

    /// Directories with a content listing, root folders first.
    pub fn directories(&self) -> Vec<ElementId> {
        let data = self.lock();
        let mut ids: Vec<_> = data
            .roots
            .iter()
            .map(|r| r.element_uuid)
            .filter(|id| data.directories.contains_key(id))
            .collect();
        let mut rest: Vec<_> = data
            .directories
            .keys()
            .filter(|id| !ids.contains(id))
            .copied()
            .collect();
        rest.sort();
        ids.extend(rest);
        ids
    }

    /// Every `(node, kind)` pair the fixture holds records for, in a stable order.
    pub fn equipment_slots(&self) -> Vec<(NodeId, EquipmentType)> {
        let data = self.lock();
        let mut slots: Vec<_> = data
            .equipments
            .iter()
            .flat_map(|(node, kinds)| kinds.keys().map(move |ty| (*node, *ty)))
            .collect();
        slots.sort();
        slots
    }

    /// Loads every fixture slot into `store`, through the fetcher interface.
    ///
    /// Returns the number of slots loaded.
    pub async fn preload(&self, store: &StudyStore) -> AppResult<usize> {
        let slots = self.equipment_slots();
        for (node, equipment_type) in &slots {
            let records = self.fetch_equipments(*node, *equipment_type, None).await?;
            store.dispatch(EquipmentAction::LoadEquipments {
                equipment_type: *equipment_type,
                equipments_by_node_id: HashMap::from([(*node, records)]),
            });
        }
        Ok(slots.len())
    }
}

/// Whether `record` is attached to one of `substations_ids`.
fn in_substations(equipment_type: EquipmentType, record: &Value, substations_ids: &[String]) -> bool {
    let listed = |field: &str| {
        record
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|id| substations_ids.iter().any(|s| s == id))
    };
    if equipment_type == EquipmentType::Substation {
        return listed("id");
    }
    SUBSTATION_FIELDS.iter().any(|field| listed(*field))
}

#[async_trait]
impl DirectoryClient for FixtureBackend {
    async fn fetch_root_folders(&self) -> AppResult<Vec<ElementAttributes>> {
        Ok(self.lock().roots.clone())
    }

    async fn fetch_directory_content(
        &self,
        directory: ElementId,
    ) -> AppResult<Vec<ElementAttributes>> {
        self.lock()
            .directories
            .get(&directory)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Directory {} not found", directory)))
    }
}

#[async_trait]
impl EquipmentFetcher for FixtureBackend {
    async fn fetch_equipments(
        &self,
        node: NodeId,
        equipment_type: EquipmentType,
        substations_ids: Option<&[String]>,
    ) -> AppResult<Vec<Equipment>> {
        let records = {
            let data = self.lock();
            let kinds = data
                .equipments
                .get(&node)
                .ok_or_else(|| AppError::not_found(format!("Node {} not found", node)))?;
            let records = kinds.get(&equipment_type).cloned().unwrap_or_default();
            match substations_ids {
                Some(ids) => records
                    .into_iter()
                    .filter(|r| in_substations(equipment_type, r, ids))
                    .collect(),
                None => records,
            }
        };
        debug!(
            node = %node,
            equipment_type = %equipment_type,
            count = records.len(),
            "Fixture equipments fetched"
        );
        Equipment::from_values(equipment_type, records)
    }
}
