//! Integration tests for the equipment cache kept current by study notifications.

mod helpers;

use serde_json::{Value, json};

use gridstudy_core::config::AppConfig;
use gridstudy_core::types::{EquipmentType, NodeId};
use gridstudy_equipment::model::Equipment;
use gridstudy_equipment::{CalculationType, ColumnDef, generate_calculation_rows};
use gridstudy_realtime::DispatchOutcome;

use helpers::{TestStudy, study_update};

async fn grid(study: &TestStudy) -> NodeId {
    let node = NodeId::new();
    study.backend.set_equipments(
        node,
        EquipmentType::Substation,
        vec![
            json!({ "id": "S1", "name": "North", "voltageLevels": [{ "id": "VL1" }, { "id": "VL2" }] }),
            json!({ "id": "S2", "voltageLevels": [{ "id": "VL3" }] }),
        ],
    );
    study.backend.set_equipments(
        node,
        EquipmentType::VoltageLevel,
        vec![
            json!({ "id": "VL1", "substationId": "S1", "nominalV": 400.0 }),
            json!({ "id": "VL2", "substationId": "S1", "nominalV": 225.0 }),
            json!({ "id": "VL3", "substationId": "S2", "nominalV": 63.0 }),
        ],
    );
    study.backend.set_equipments(
        node,
        EquipmentType::Generator,
        vec![
            json!({ "id": "G1", "substationId": "S1", "targetP": 120.0 }),
            json!({ "id": "G2", "substationId": "S2", "targetP": 80.0 }),
        ],
    );
    assert_eq!(study.backend.preload(&study.store).await.unwrap(), 3);
    node
}

fn ids(study: &TestStudy, ty: EquipmentType, node: &NodeId) -> Vec<String> {
    study
        .store
        .state()
        .equipments(ty, node)
        .map(|list| list.iter().map(|e| e.id().to_string()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_deleted_voltage_level_leaves_substation() {
    let study = TestStudy::new();
    let node = grid(&study).await;

    let payload = json!({
        "deletedEquipments": [{ "equipmentType": "VOLTAGE_LEVEL", "equipmentId": "VL2" }]
    });
    assert_eq!(
        study.notify(study_update("study", node, payload)).await,
        DispatchOutcome::Applied
    );

    assert_eq!(ids(&study, EquipmentType::VoltageLevel, &node), vec!["VL1", "VL3"]);
    let state = study.store.state();
    let substations = state.equipments(EquipmentType::Substation, &node).unwrap();
    let Equipment::Substation(s1) = &substations[0] else {
        panic!("expected a substation");
    };
    let embedded: Vec<_> = s1.voltage_levels.iter().map(|vl| vl.id.as_str()).collect();
    assert_eq!(embedded, vec!["VL1"]);
}

#[tokio::test]
async fn test_impacted_substation_is_refetched() {
    let study = TestStudy::new();
    let node = grid(&study).await;

    study.backend.set_equipments(
        node,
        EquipmentType::Substation,
        vec![
            json!({ "id": "S1", "name": "North", "voltageLevels": [{ "id": "VL1" }, { "id": "VL4" }] }),
            json!({ "id": "S2", "voltageLevels": [{ "id": "VL3" }] }),
        ],
    );
    study.backend.set_equipments(
        node,
        EquipmentType::Generator,
        vec![
            json!({ "id": "G1", "substationId": "S1", "targetP": 150.0 }),
            json!({ "id": "G2", "substationId": "S2", "targetP": 10.0 }),
        ],
    );

    let payload = json!({ "impactedSubstationsIds": ["S1"] });
    study.notify(study_update("study", node, payload)).await;

    let state = study.store.state();
    let voltage_levels = state.equipments(EquipmentType::VoltageLevel, &node).unwrap();
    let vl4 = voltage_levels.iter().find(|e| e.id() == "VL4").unwrap();
    let Equipment::VoltageLevel(vl4) = vl4 else {
        panic!("expected a voltage level");
    };
    assert_eq!(vl4.substation_id.as_deref(), Some("S1"));

    let generators = state.equipments(EquipmentType::Generator, &node).unwrap();
    let target_p: Vec<_> = generators
        .iter()
        .map(|g| match g {
            Equipment::Generator(g) => g.target_p,
            _ => None,
        })
        .collect();
    // G2 sits outside the impacted substation and keeps its cached value.
    assert_eq!(target_p, vec![Some(150.0), Some(80.0)]);
}

#[tokio::test]
async fn test_update_for_unloaded_node_is_dropped() {
    let study = TestStudy::new();
    let node = grid(&study).await;
    let other = NodeId::new();
    study
        .backend
        .set_equipments(other, EquipmentType::Line, vec![json!({ "id": "L1", "substationId1": "S1" })]);

    let before = study.store.state();
    let payload = json!({ "impactedSubstationsIds": ["S1"] });
    study.notify(study_update("study", other, payload)).await;

    assert!(std::sync::Arc::ptr_eq(&before, &study.store.state()));
    assert!(!study.store.state().is_loaded(EquipmentType::Line, &other));
    assert_eq!(ids(&study, EquipmentType::Generator, &node), vec!["G1", "G2"]);
}

#[tokio::test]
async fn test_post_computation_reset_honors_configuration() {
    let mut config = AppConfig::default();
    config.equipment.post_computation_kept_types = vec![EquipmentType::Generator];
    let study = TestStudy::with_config(config);
    let node = grid(&study).await;

    study
        .notify(study_update("securityAnalysisResult", node, Value::Null))
        .await;

    let state = study.store.state();
    assert!(state.is_loaded(EquipmentType::Generator, &node));
    assert!(!state.is_loaded(EquipmentType::Substation, &node));
    assert!(!state.is_loaded(EquipmentType::VoltageLevel, &node));
}

#[tokio::test]
async fn test_calculation_rows_over_cached_records() {
    let study = TestStudy::new();
    let node = grid(&study).await;

    let state = study.store.state();
    let rows: Vec<Value> = state
        .equipments(EquipmentType::Generator, &node)
        .unwrap()
        .iter()
        .map(|g| g.to_row().unwrap())
        .collect();

    let calculation_rows = generate_calculation_rows(
        &[CalculationType::Sum, CalculationType::Max],
        &[ColumnDef::numeric("targetP")],
        &rows,
    );
    assert_eq!(calculation_rows.len(), 3);
    assert_eq!(calculation_rows[1].value("targetP").and_then(Value::as_f64), Some(200.0));
    assert_eq!(calculation_rows[2].value("targetP").and_then(Value::as_f64), Some(120.0));
}
