//! Typed notifications.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use gridstudy_core::error::AppError;
use gridstudy_core::result::AppResult;
use gridstudy_core::types::{ElementId, EquipmentType, NodeId, StudyId};
use gridstudy_equipment::DeletedEquipment;

use super::envelope::NotificationEnvelope;

/// Change reported on a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectoryUpdateKind {
    AddDirectory,
    UpdateDirectory,
    DeleteDirectory,
    #[serde(other)]
    Unknown,
}

/// Change reported on a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StudyUpdateType {
    NodeCreated,
    NodeDeleted,
    NodeMoved,
    NodeUpdated,
    SubtreeCreated,
    SubtreeMoved,
    NodeBuildStatusUpdated,
    /// A network modification was applied; the payload lists its impacts.
    Study,
    BuildCompleted,
    BuildFailed,
    LoadflowResult,
    SecurityAnalysisResult,
    SensitivityAnalysisResult,
    ShortCircuitAnalysisResult,
    DynamicSimulationResult,
    VoltageInitResult,
    StateEstimationResult,
    #[serde(other)]
    Unknown,
}

impl StudyUpdateType {
    /// Whether this announces the result of a computation.
    pub fn is_computation_result(&self) -> bool {
        matches!(
            self,
            Self::LoadflowResult
                | Self::SecurityAnalysisResult
                | Self::SensitivityAnalysisResult
                | Self::ShortCircuitAnalysisResult
                | Self::DynamicSimulationResult
                | Self::VoltageInitResult
                | Self::StateEstimationResult
        )
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::NodeCreated => "nodeCreated",
            Self::NodeDeleted => "nodeDeleted",
            Self::NodeMoved => "nodeMoved",
            Self::NodeUpdated => "nodeUpdated",
            Self::SubtreeCreated => "subtreeCreated",
            Self::SubtreeMoved => "subtreeMoved",
            Self::NodeBuildStatusUpdated => "nodeBuildStatusUpdated",
            Self::Study => "study",
            Self::BuildCompleted => "buildCompleted",
            Self::BuildFailed => "buildFailed",
            Self::LoadflowResult => "loadflowResult",
            Self::SecurityAnalysisResult => "securityAnalysisResult",
            Self::SensitivityAnalysisResult => "sensitivityAnalysisResult",
            Self::ShortCircuitAnalysisResult => "shortCircuitAnalysisResult",
            Self::DynamicSimulationResult => "dynamicSimulationResult",
            Self::VoltageInitResult => "voltageInitResult",
            Self::StateEstimationResult => "stateEstimationResult",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StudyUpdateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Impacts of a network modification, carried by `study` notifications.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkImpacts {
    #[serde(default)]
    pub deleted_equipments: Vec<DeletedEquipment>,
    /// Substations whose equipments must be refetched.
    #[serde(default)]
    pub impacted_substations_ids: Vec<String>,
    /// Kinds with too many impacts to patch; they are dropped and refetched.
    #[serde(default)]
    pub impacted_element_types: Vec<EquipmentType>,
}

impl NetworkImpacts {
    /// Reads impacts from a study payload. A null payload means no impacts.
    pub fn from_payload(payload: &Value) -> AppResult<Self> {
        if payload.is_null() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(payload)?)
    }

    pub fn is_empty(&self) -> bool {
        self.deleted_equipments.is_empty()
            && self.impacted_substations_ids.is_empty()
            && self.impacted_element_types.is_empty()
    }
}

/// A directory content change.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryNotification {
    pub kind: DirectoryUpdateKind,
    /// Directory whose content changed.
    pub directory: Option<ElementId>,
    /// Whether the change concerns the root level.
    pub is_root: bool,
    pub element_name: Option<String>,
    pub error: Option<String>,
    pub user_id: Option<String>,
}

/// A study change.
#[derive(Debug, Clone, PartialEq)]
pub struct StudyNotification {
    pub kind: StudyUpdateType,
    pub study: Option<StudyId>,
    pub node: Option<NodeId>,
    pub nodes: Vec<NodeId>,
    pub parent_node: Option<NodeId>,
    pub error: Option<String>,
    pub payload: Value,
}

impl StudyNotification {
    /// `nodes`, falling back to `node` when the list is absent.
    pub fn target_nodes(&self) -> Vec<NodeId> {
        if self.nodes.is_empty() {
            self.node.into_iter().collect()
        } else {
            self.nodes.clone()
        }
    }
}

/// A decoded server push notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Directory(DirectoryNotification),
    Study(StudyNotification),
}

impl Notification {
    /// Server-side failure message, if the notification reports one.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Directory(n) => n.error.as_deref(),
            Self::Study(n) => n.error.as_deref(),
        }
    }

    /// Key identifying repeated notifications for deduplication.
    ///
    /// Study keys carry the payload, so distinct network modifications on the
    /// same node never collapse into one.
    pub fn dedup_key(&self) -> String {
        match self {
            Self::Directory(n) => format!(
                "directory:{:?}:{}:{}",
                n.kind,
                n.directory.map(|d| d.to_string()).unwrap_or_default(),
                n.is_root
            ),
            Self::Study(n) => {
                let mut nodes: Vec<String> =
                    n.target_nodes().iter().map(ToString::to_string).collect();
                nodes.sort();
                let mut key = format!("study:{}:{}", n.kind, nodes.join(","));
                if !n.payload.is_null() {
                    key.push(':');
                    key.push_str(&n.payload.to_string());
                }
                key
            }
        }
    }
}

impl TryFrom<NotificationEnvelope> for Notification {
    type Error = AppError;

    fn try_from(envelope: NotificationEnvelope) -> AppResult<Self> {
        let payload = envelope.payload_value();
        let headers = envelope.headers;

        if let Some(kind) = headers.update_type {
            return Ok(Self::Study(StudyNotification {
                kind,
                study: headers.study_uuid,
                node: headers.node,
                nodes: headers.nodes.unwrap_or_default(),
                parent_node: headers.parent_node,
                error: headers.error,
                payload,
            }));
        }

        if let Some(kind) = headers.notification_type {
            return Ok(Self::Directory(DirectoryNotification {
                kind,
                directory: headers.directory_uuid,
                is_root: headers.is_root_directory.unwrap_or(false),
                element_name: headers.element_name,
                error: headers.error,
                user_id: headers.user_id,
            }));
        }

        Err(AppError::validation(
            "Notification has neither an update type nor a notification type",
        ))
    }
}
