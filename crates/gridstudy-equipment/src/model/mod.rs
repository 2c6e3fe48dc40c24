//! Typed equipment records.
//!
//! The wire format carries no kind discriminator: the kind is known from the
//! request or the cache slot the record belongs to, so records are decoded
//! with [`Equipment::from_value`].

pub mod records;

use serde::Serialize;
use serde_json::Value;

use gridstudy_core::result::AppResult;
use gridstudy_core::types::EquipmentType;

pub use records::{
    GenericEquipment, Generator, HvdcLine, Line, Load, Substation, TapChanger,
    TwoWindingsTransformer, VoltageLevel,
};

/// One equipment record, in the form matching its kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Equipment {
    Substation(Substation),
    VoltageLevel(VoltageLevel),
    Line(Line),
    TwoWindingsTransformer(TwoWindingsTransformer),
    Generator(Generator),
    Load(Load),
    HvdcLine(HvdcLine),
    /// Kinds without a dedicated schema.
    Generic(GenericEquipment),
}

impl Equipment {
    /// Decodes a record of the given kind.
    pub fn from_value(equipment_type: EquipmentType, value: Value) -> AppResult<Self> {
        let equipment = match equipment_type {
            EquipmentType::Substation => Self::Substation(serde_json::from_value(value)?),
            EquipmentType::VoltageLevel => Self::VoltageLevel(serde_json::from_value(value)?),
            EquipmentType::Line => Self::Line(serde_json::from_value(value)?),
            EquipmentType::TwoWindingsTransformer => {
                Self::TwoWindingsTransformer(serde_json::from_value(value)?)
            }
            EquipmentType::Generator => Self::Generator(serde_json::from_value(value)?),
            EquipmentType::Load => Self::Load(serde_json::from_value(value)?),
            EquipmentType::HvdcLine => Self::HvdcLine(serde_json::from_value(value)?),
            _ => Self::Generic(serde_json::from_value(value)?),
        };
        Ok(equipment)
    }

    /// Decodes a list of records of the given kind.
    pub fn from_values(equipment_type: EquipmentType, values: Vec<Value>) -> AppResult<Vec<Self>> {
        values
            .into_iter()
            .map(|v| Self::from_value(equipment_type, v))
            .collect()
    }

    /// Record id, unique within one kind and one study node.
    pub fn id(&self) -> &str {
        match self {
            Self::Substation(e) => &e.id,
            Self::VoltageLevel(e) => &e.id,
            Self::Line(e) => &e.id,
            Self::TwoWindingsTransformer(e) => &e.id,
            Self::Generator(e) => &e.id,
            Self::Load(e) => &e.id,
            Self::HvdcLine(e) => &e.id,
            Self::Generic(e) => &e.id,
        }
    }

    /// Display name, when the network defines one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Substation(e) => e.name.as_deref(),
            Self::VoltageLevel(e) => e.name.as_deref(),
            Self::Line(e) => e.name.as_deref(),
            Self::TwoWindingsTransformer(e) => e.name.as_deref(),
            Self::Generator(e) => e.name.as_deref(),
            Self::Load(e) => e.name.as_deref(),
            Self::HvdcLine(e) => e.name.as_deref(),
            Self::Generic(e) => e.name.as_deref(),
        }
    }

    /// The record as a spreadsheet row.
    pub fn to_row(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
