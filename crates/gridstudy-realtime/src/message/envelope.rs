//! Envelope of server push notifications.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use gridstudy_core::types::{ElementId, NodeId, StudyId};

use super::types::{DirectoryUpdateKind, StudyUpdateType};

/// Raw notification as pushed by the server: routing headers plus an opaque
/// payload whose shape depends on the update type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    #[serde(default)]
    pub headers: NotificationHeaders,
    #[serde(default)]
    pub payload: Value,
}

/// Notification headers.
///
/// Directory notifications carry `notificationType`; study notifications carry
/// `updateType`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationHeaders {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_type: Option<DirectoryUpdateKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_root_directory: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_uuid: Option<ElementId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_type: Option<StudyUpdateType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_uuid: Option<StudyId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodes: Option<Vec<NodeId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_node: Option<NodeId>,
    /// Server-side failure message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotificationEnvelope {
    /// The payload, with JSON-in-a-string payloads unwrapped.
    ///
    /// A string that is not JSON is returned as is.
    pub fn payload_value(&self) -> Value {
        match &self.payload {
            Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| self.payload.clone()),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_string_payload_is_unwrapped() {
        let envelope = NotificationEnvelope {
            headers: NotificationHeaders::default(),
            payload: json!("{\"deletedEquipments\":[]}"),
        };
        assert_eq!(envelope.payload_value(), json!({ "deletedEquipments": [] }));
    }

    #[test]
    fn test_plain_string_payload_is_kept() {
        let envelope = NotificationEnvelope {
            headers: NotificationHeaders::default(),
            payload: json!("done"),
        };
        assert_eq!(envelope.payload_value(), json!("done"));
    }

    #[test]
    fn test_headers_are_camel_case() {
        let headers: NotificationHeaders = serde_json::from_value(json!({
            "updateType": "buildCompleted",
            "isRootDirectory": false,
            "parentNode": "6b1d8e4e-0d0b-4d8e-9d55-6c4f6a3a3a01"
        }))
        .unwrap();
        assert_eq!(headers.update_type, Some(StudyUpdateType::BuildCompleted));
        assert_eq!(headers.is_root_directory, Some(false));
        assert!(headers.parent_node.is_some());
    }
}
