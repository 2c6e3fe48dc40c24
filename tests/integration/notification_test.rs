//! Integration tests for notification decoding and dispatch.

mod helpers;

use serde_json::{Value, json};

use gridstudy_core::config::AppConfig;
use gridstudy_core::error::ErrorKind;
use gridstudy_core::types::{EquipmentType, NodeId};
use gridstudy_realtime::DispatchOutcome;

use helpers::{TestStudy, study_update};

async fn two_nodes(study: &TestStudy) -> (NodeId, NodeId) {
    let (n1, n2) = (NodeId::new(), NodeId::new());
    for node in [n1, n2] {
        study
            .backend
            .set_equipments(node, EquipmentType::Load, vec![json!({ "id": "LD1", "p0": 4.5 })]);
        study
            .backend
            .set_equipments(node, EquipmentType::Line, vec![json!({ "id": "L1" })]);
    }
    study.backend.preload(&study.store).await.unwrap();
    (n1, n2)
}

#[tokio::test]
async fn test_build_status_update_forgets_listed_nodes() {
    let study = TestStudy::new();
    let (n1, n2) = two_nodes(&study).await;

    let notification = json!({
        "headers": { "updateType": "nodeBuildStatusUpdated", "nodes": [n1] }
    });
    assert_eq!(study.notify(notification).await, DispatchOutcome::Applied);

    let state = study.store.state();
    assert!(state.loaded_types(&n1).is_empty());
    assert_eq!(state.loaded_types(&n2).len(), 2);
}

#[tokio::test]
async fn test_node_deleted_notifies_subscribers() {
    let study = TestStudy::new();
    let (n1, n2) = two_nodes(&study).await;
    let mut rx = study.store.subscribe();

    let notification = json!({ "headers": { "updateType": "nodeDeleted", "nodes": [n1, n2] } });
    study.notify(notification).await;

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert!(state.nodes_id(EquipmentType::Load).is_empty());

    // A second deletion of the same nodes changes nothing.
    let again = json!({ "headers": { "updateType": "nodeDeleted", "nodes": [n2] } });
    study.notify(again).await;
    assert!(!rx.has_changed().unwrap());
}

#[tokio::test]
async fn test_server_error_is_reported_without_change() {
    let study = TestStudy::new();
    let (n1, _) = two_nodes(&study).await;
    let before = study.store.state();

    let notification = json!({
        "headers": { "updateType": "loadflowResult", "node": n1, "error": "Loadflow diverged" }
    });
    assert_eq!(
        study.notify(notification).await,
        DispatchOutcome::ServerError("Loadflow diverged".to_string())
    );
    assert!(std::sync::Arc::ptr_eq(&before, &study.store.state()));
}

#[tokio::test]
async fn test_duplicates_within_window_are_dropped() {
    let mut config = AppConfig::default();
    config.realtime.dedup_window_ms = 60_000;
    let study = TestStudy::with_config(config);
    let (n1, n2) = two_nodes(&study).await;

    let first = study_update("buildCompleted", n1, Value::Null);
    assert_eq!(study.notify(first.clone()).await, DispatchOutcome::Applied);
    assert_eq!(study.notify(first).await, DispatchOutcome::Deduplicated);
    assert_eq!(
        study.notify(study_update("buildCompleted", n2, Value::Null)).await,
        DispatchOutcome::Applied
    );
}

#[tokio::test]
async fn test_replayed_lines_with_invalid_entries() {
    let mut config = AppConfig::default();
    config.realtime.max_message_size = 256;
    let study = TestStudy::with_config(config);
    let (n1, _) = two_nodes(&study).await;

    let substations = vec!["S".repeat(40); 8];
    let oversized = json!({
        "headers": { "updateType": "study", "node": n1 },
        "payload": { "impactedSubstationsIds": substations }
    })
    .to_string();
    let lines = [
        study_update("nodeCreated", n1, Value::Null).to_string(),
        "not json".to_string(),
        json!({ "headers": {} }).to_string(),
        oversized,
        study_update("voltageInitResult", n1, Value::Null).to_string(),
    ];

    let mut outcomes = Vec::new();
    for line in &lines {
        outcomes.push(study.dispatcher.handle_raw(line).await.map_err(|e| e.kind));
    }
    assert_eq!(
        outcomes,
        vec![
            Ok(DispatchOutcome::Ignored),
            Err(ErrorKind::Serialization),
            Err(ErrorKind::Validation),
            Err(ErrorKind::Validation),
            Ok(DispatchOutcome::Applied),
        ]
    );
    assert!(study.store.state().loaded_types(&n1).is_empty());
}
