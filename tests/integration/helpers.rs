//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use serde_json::{Value, json};

use gridstudy::FixtureBackend;
use gridstudy_core::config::AppConfig;
use gridstudy_core::types::{ElementId, NodeId};
use gridstudy_directory::node::{AccessRights, ElementType};
use gridstudy_directory::{DirectoryExplorer, ElementAttributes};
use gridstudy_equipment::StudyStore;
use gridstudy_realtime::{DispatchOutcome, NotificationDispatcher};

/// A study session wired to a fixture backend
pub struct TestStudy {
    pub backend: Arc<FixtureBackend>,
    pub store: Arc<StudyStore>,
    pub explorer: Arc<DirectoryExplorer>,
    pub dispatcher: NotificationDispatcher,
    pub config: AppConfig,
}

impl TestStudy {
    /// Create a session over an empty fixture
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let backend = Arc::new(FixtureBackend::default());
        let store = Arc::new(StudyStore::new(&config.equipment));
        let explorer = Arc::new(DirectoryExplorer::new(backend.clone(), config.directory.clone()));
        let dispatcher =
            NotificationDispatcher::new(store.clone(), backend.clone(), config.realtime.clone())
                .with_explorer(explorer.clone());
        Self {
            backend,
            store,
            explorer,
            dispatcher,
            config,
        }
    }

    /// Feed a raw notification through the dispatcher
    pub async fn notify(&self, notification: Value) -> DispatchOutcome {
        self.dispatcher
            .handle_raw(&notification.to_string())
            .await
            .expect("Notification failed")
    }
}

pub fn directory(id: ElementId, name: &str) -> ElementAttributes {
    element(id, name, ElementType::Directory)
}

pub fn element(id: ElementId, name: &str, element_type: ElementType) -> ElementAttributes {
    ElementAttributes {
        element_uuid: id,
        element_name: name.to_string(),
        element_type,
        access_rights: AccessRights::default(),
        subdirectories_count: 0,
        owner: Some("alice".to_string()),
        description: None,
        last_modification_date: None,
    }
}

/// Directory notification about the content of `directory`
pub fn directory_updated(directory: ElementId) -> Value {
    json!({
        "headers": {
            "notificationType": "UPDATE_DIRECTORY",
            "directoryUuid": directory,
            "isRootDirectory": false
        }
    })
}

/// Directory notification about the root level
pub fn roots_updated() -> Value {
    json!({
        "headers": { "notificationType": "UPDATE_DIRECTORY", "isRootDirectory": true }
    })
}

/// Study notification for `node`
pub fn study_update(update_type: &str, node: NodeId, payload: Value) -> Value {
    json!({
        "headers": { "updateType": update_type, "node": node },
        "payload": payload
    })
}

pub fn names(children: &[ElementAttributes]) -> Vec<&str> {
    children.iter().map(|c| c.element_name.as_str()).collect()
}
