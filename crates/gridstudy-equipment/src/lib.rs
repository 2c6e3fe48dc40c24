//! # gridstudy-equipment
//!
//! Spreadsheet-side equipment state for a study:
//!
//! - [`model`]: typed equipment records, one form per known equipment kind
//! - [`cache`]: per-type, per-study-node equipment cache and its reducer
//! - [`store`]: single-writer store publishing immutable cache snapshots
//! - [`calculation`]: aggregate rows over the rows displayed in a view
//! - [`fetcher`]: the equipment server collaborator

pub mod cache;
pub mod calculation;
pub mod fetcher;
pub mod model;
pub mod store;

pub use cache::{DeletedEquipment, EquipmentAction, EquipmentCache, EquipmentsByNodes};
pub use calculation::{CalculationRow, CalculationType, ColumnDef, generate_calculation_rows};
pub use fetcher::EquipmentFetcher;
pub use model::Equipment;
pub use store::StudyStore;
