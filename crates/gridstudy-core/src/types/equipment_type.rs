//! Kinds of grid equipment shown in the spreadsheet.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A kind of power-grid equipment. Each kind has its own spreadsheet tab and
/// its own slot in the equipment cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentType {
    /// Substation.
    Substation,
    /// Voltage level, embedded in its substation.
    VoltageLevel,
    /// AC line.
    Line,
    /// Two-winding transformer.
    TwoWindingsTransformer,
    /// Three-winding transformer.
    ThreeWindingsTransformer,
    /// Generator.
    Generator,
    /// Load.
    Load,
    /// Shunt compensator.
    ShuntCompensator,
    /// Static var compensator.
    StaticVarCompensator,
    /// Battery.
    Battery,
    /// HVDC line.
    HvdcLine,
    /// LCC converter station.
    LccConverterStation,
    /// VSC converter station.
    VscConverterStation,
    /// Dangling line.
    DanglingLine,
    /// Tie line.
    TieLine,
    /// Bus.
    Bus,
    /// Busbar section.
    BusbarSection,
}

impl EquipmentType {
    /// Every equipment kind, in spreadsheet tab order.
    pub const ALL: [EquipmentType; 17] = [
        Self::Substation,
        Self::VoltageLevel,
        Self::Line,
        Self::TwoWindingsTransformer,
        Self::ThreeWindingsTransformer,
        Self::Generator,
        Self::Load,
        Self::ShuntCompensator,
        Self::StaticVarCompensator,
        Self::Battery,
        Self::HvdcLine,
        Self::LccConverterStation,
        Self::VscConverterStation,
        Self::DanglingLine,
        Self::TieLine,
        Self::Bus,
        Self::BusbarSection,
    ];

    /// Wire name of the kind, as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Substation => "SUBSTATION",
            Self::VoltageLevel => "VOLTAGE_LEVEL",
            Self::Line => "LINE",
            Self::TwoWindingsTransformer => "TWO_WINDINGS_TRANSFORMER",
            Self::ThreeWindingsTransformer => "THREE_WINDINGS_TRANSFORMER",
            Self::Generator => "GENERATOR",
            Self::Load => "LOAD",
            Self::ShuntCompensator => "SHUNT_COMPENSATOR",
            Self::StaticVarCompensator => "STATIC_VAR_COMPENSATOR",
            Self::Battery => "BATTERY",
            Self::HvdcLine => "HVDC_LINE",
            Self::LccConverterStation => "LCC_CONVERTER_STATION",
            Self::VscConverterStation => "VSC_CONVERTER_STATION",
            Self::DanglingLine => "DANGLING_LINE",
            Self::TieLine => "TIE_LINE",
            Self::Bus => "BUS",
            Self::BusbarSection => "BUSBAR_SECTION",
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
