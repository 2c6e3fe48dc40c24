//! Field schemas of the equipment kinds the client knows about.
//!
//! Every record keeps unknown attributes in `extra`, which is where
//! dynamically configured spreadsheet columns find their data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A substation and its embedded voltage levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Substation {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default)]
    pub voltage_levels: Vec<VoltageLevel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A voltage level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoltageLevel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_v: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_voltage_limit: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_voltage_limit: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An AC line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_level_id1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_level_id2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Ratio or phase tap changer of a transformer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TapChanger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_tap_position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tap_position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_tap_position: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regulating: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A two-winding transformer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwoWindingsTransformer {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_level_id1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_level_id2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_u1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_u2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio_tap_changer: Option<TapChanger>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_tap_changer: Option<TapChanger>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generator {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_level_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_q: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage_level_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An HVDC line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HvdcLine {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter_station_id1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter_station_id2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nominal_v: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_power_setpoint: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_p: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Any other equipment kind: an id, an optional name, and free attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericEquipment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
