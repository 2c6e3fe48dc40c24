//! Shared domain types.

pub mod equipment_type;
pub mod id;

pub use equipment_type::EquipmentType;
pub use id::{ElementId, NodeId, StudyId};
