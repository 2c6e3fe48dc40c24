//! Notification dispatcher: turns decoded notifications into state updates.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, trace};

use gridstudy_core::config::realtime::RealtimeConfig;
use gridstudy_core::result::AppResult;
use gridstudy_core::types::NodeId;
use gridstudy_directory::DirectoryExplorer;
use gridstudy_equipment::{EquipmentAction, EquipmentFetcher, StudyStore};

use crate::message::serializer::decode;
use crate::message::types::{
    DirectoryNotification, NetworkImpacts, Notification, StudyNotification, StudyUpdateType,
};

use super::dedup::EventDeduplicator;

/// What the dispatcher did with a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// State was updated or refreshed.
    Applied,
    /// The notification kind needs no client-side update.
    Ignored,
    /// Same notification handled less than one dedup window ago.
    Deduplicated,
    /// The notification reported a server-side failure.
    ServerError(String),
}

/// Routes notifications to the equipment store and the directory explorer.
pub struct NotificationDispatcher {
    /// Equipment cache
    store: Arc<StudyStore>,
    /// Equipment server, used to refetch impacted equipments
    fetcher: Arc<dyn EquipmentFetcher>,
    /// Directory session, absent when only a study is open
    explorer: Option<Arc<DirectoryExplorer>>,
    /// Event deduplicator
    dedup: EventDeduplicator,
    /// Configuration
    config: RealtimeConfig,
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("explorer", &self.explorer)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NotificationDispatcher {
    /// Create a dispatcher for a study session
    pub fn new(
        store: Arc<StudyStore>,
        fetcher: Arc<dyn EquipmentFetcher>,
        config: RealtimeConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            explorer: None,
            dedup: EventDeduplicator::new(config.dedup_window_ms),
            config,
        }
    }

    /// Also route directory notifications to `explorer`
    pub fn with_explorer(mut self, explorer: Arc<DirectoryExplorer>) -> Self {
        self.explorer = Some(explorer);
        self
    }

    pub fn store(&self) -> &Arc<StudyStore> {
        &self.store
    }

    /// Validate, decode, and dispatch a raw notification.
    pub async fn handle_raw(&self, raw: &str) -> AppResult<DispatchOutcome> {
        let notification = decode(raw, self.config.max_message_size)?;
        self.dispatch(notification).await
    }

    /// Dispatch a decoded notification.
    pub async fn dispatch(&self, notification: Notification) -> AppResult<DispatchOutcome> {
        if let Some(message) = notification.error() {
            error!(error = message, "Server reported a failure");
            return Ok(DispatchOutcome::ServerError(message.to_string()));
        }

        let key = notification.dedup_key();
        if !self.dedup.should_dispatch(&key) {
            trace!("Notification deduplicated: key='{}'", key);
            return Ok(DispatchOutcome::Deduplicated);
        }

        match notification {
            Notification::Directory(n) => self.on_directory(n).await,
            Notification::Study(n) => self.on_study(n).await,
        }
    }

    async fn on_study(&self, notification: StudyNotification) -> AppResult<DispatchOutcome> {
        let kind = notification.kind;
        match kind {
            StudyUpdateType::NodeDeleted
            | StudyUpdateType::BuildCompleted
            | StudyUpdateType::BuildFailed
            | StudyUpdateType::NodeBuildStatusUpdated => {
                let nodes = notification.target_nodes();
                if nodes.is_empty() {
                    debug!(update_type = %kind, "No node in notification");
                    return Ok(DispatchOutcome::Ignored);
                }
                self.store.dispatch(EquipmentAction::RemoveNodeData(nodes));
                Ok(DispatchOutcome::Applied)
            }
            StudyUpdateType::Study => {
                let Some(node) = notification.node else {
                    debug!("Network modification without a node");
                    return Ok(DispatchOutcome::Ignored);
                };
                let impacts = NetworkImpacts::from_payload(&notification.payload)?;
                if impacts.is_empty() {
                    return Ok(DispatchOutcome::Ignored);
                }
                self.apply_impacts(node, impacts).await?;
                Ok(DispatchOutcome::Applied)
            }
            k if k.is_computation_result() => {
                self.store
                    .dispatch(EquipmentAction::ResetEquipmentsPostComputation);
                Ok(DispatchOutcome::Applied)
            }
            _ => {
                trace!(update_type = %kind, "Study notification ignored");
                Ok(DispatchOutcome::Ignored)
            }
        }
    }

    /// Applies deletions, refetches records of impacted substations for every
    /// kind loaded on `node`, and drops kinds flagged for a full refetch.
    async fn apply_impacts(&self, node: NodeId, impacts: NetworkImpacts) -> AppResult<()> {
        let NetworkImpacts {
            deleted_equipments,
            impacted_substations_ids,
            impacted_element_types,
        } = impacts;

        if !deleted_equipments.is_empty() {
            self.store.dispatch(EquipmentAction::DeleteEquipments {
                equipments: deleted_equipments,
                node_id: node,
            });
        }

        if !impacted_substations_ids.is_empty() {
            let types: Vec<_> = self
                .store
                .state()
                .loaded_types(&node)
                .into_iter()
                .filter(|ty| !impacted_element_types.contains(ty))
                .collect();

            let mut equipments = HashMap::with_capacity(types.len());
            for equipment_type in types {
                let records = self
                    .fetcher
                    .fetch_equipments(node, equipment_type, Some(&impacted_substations_ids))
                    .await
                    .inspect_err(|e| {
                        error!(
                            equipment_type = %equipment_type,
                            node = %node,
                            "Failed to fetch impacted equipments: {}",
                            e
                        )
                    })?;
                equipments.insert(equipment_type, records);
            }

            if !equipments.is_empty() {
                self.store.dispatch(EquipmentAction::UpdateEquipments {
                    equipments,
                    node_id: node,
                });
            }
        }

        if !impacted_element_types.is_empty() {
            self.store
                .dispatch(EquipmentAction::ResetEquipmentsByTypes(impacted_element_types));
        }

        Ok(())
    }

    async fn on_directory(&self, notification: DirectoryNotification) -> AppResult<DispatchOutcome> {
        let Some(explorer) = &self.explorer else {
            return Ok(DispatchOutcome::Ignored);
        };

        if notification.is_root {
            explorer.refresh_roots().await?;
            info!(kind = ?notification.kind, "Root directories refreshed");
            return Ok(DispatchOutcome::Applied);
        }

        let Some(directory) = notification.directory else {
            return Ok(DispatchOutcome::Ignored);
        };
        if !explorer.contains(&directory) {
            trace!(directory = %directory, "Notification for an unknown directory");
            return Ok(DispatchOutcome::Ignored);
        }

        // Reloading the selection also reconciles its subdirectories.
        let selected = explorer.selected_directory() == Some(directory)
            && explorer.refresh_selected().await?;
        if !selected {
            explorer.refresh_directory(directory).await?;
        }
        debug!(directory = %directory, kind = ?notification.kind, "Directory refreshed");
        Ok(DispatchOutcome::Applied)
    }
}
