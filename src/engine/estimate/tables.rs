//! Replaceable configuration data: process → pricing mapping, material
//! categories, quantity heuristics, and labor productivity.

use crate::domain::{PricingProcess, ProcessId, Space, SpaceInfo};
use crate::services::pricing::LaborUnit;

/// Square metres per pyeong
pub const M2_PER_PYEONG: f64 = 3.3;

/// How a required quantity is derived from the home
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuantityRule {
    Fixed(f64),
    /// floor area × factor
    PerArea(f64),
    /// ceil(floor area × factor)
    PerAreaCeil(f64),
    /// ceil(floor area / divisor)
    AreaDivisorCeil(f64),
    /// one per room and per bathroom, at least one
    PerRoom,
}

impl QuantityRule {
    pub fn evaluate(&self, space: &SpaceInfo) -> f64 {
        let area = space.floor_area;
        match *self {
            Self::Fixed(n) => n,
            Self::PerArea(factor) => area * factor,
            Self::PerAreaCeil(factor) => (area * factor).ceil(),
            Self::AreaDivisorCeil(divisor) => (area / divisor).ceil(),
            Self::PerRoom => f64::from((space.rooms + space.bathrooms).max(1)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessPricing {
    pub pricing: PricingProcess,
    pub default_space: Space,
}

pub fn process_pricing(process: ProcessId) -> ProcessPricing {
    let (pricing, default_space) = match process {
        ProcessId::KitchenCore => (PricingProcess::Kitchen, Space::Kitchen),
        ProcessId::BathroomWaterproofing => (PricingProcess::Bathroom, Space::Bathroom),
        ProcessId::StorageSystem => (PricingProcess::Storage, Space::Storage),
        ProcessId::Soundproofing => (PricingProcess::Finish, Space::Living),
        ProcessId::Lighting => (PricingProcess::Electric, Space::Living),
        ProcessId::Flooring => (PricingProcess::Finish, Space::Living),
        ProcessId::Wallpaper => (PricingProcess::Finish, Space::Living),
        ProcessId::Window => (PricingProcess::Window, Space::Living),
        ProcessId::Door => (PricingProcess::Door, Space::Living),
        ProcessId::Demolition => (PricingProcess::Demolition, Space::Common),
        ProcessId::ChildSafety => (PricingProcess::Finish, Space::Living),
    };
    ProcessPricing {
        pricing,
        default_space,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialSpec {
    pub category1: &'static str,
    pub category2: &'static str,
    pub category3: Option<&'static str>,
    pub spec: &'static str,
    pub unit: &'static str,
    pub rule: QuantityRule,
    pub basis: &'static str,
}

/// Material category for a process; `None` means the process is labor-only
pub fn material_spec(process: ProcessId) -> Option<MaterialSpec> {
    let spec = match process {
        ProcessId::KitchenCore => MaterialSpec {
            category1: "kitchen",
            category2: "system_kitchen",
            category3: None,
            spec: "SET",
            unit: "SET",
            rule: QuantityRule::Fixed(1.0),
            basis: "one kitchen set",
        },
        ProcessId::BathroomWaterproofing => MaterialSpec {
            category1: "bathroom",
            category2: "bathroom_set",
            category3: None,
            spec: "SET",
            unit: "SET",
            rule: QuantityRule::Fixed(1.0),
            basis: "one bathroom set",
        },
        ProcessId::StorageSystem => MaterialSpec {
            category1: "furniture",
            category2: "built_in_closet",
            category3: None,
            spec: "EA",
            unit: "EA",
            rule: QuantityRule::Fixed(1.0),
            basis: "one built-in closet",
        },
        ProcessId::Lighting => MaterialSpec {
            category1: "lighting",
            category2: "downlight",
            category3: None,
            spec: "EA",
            unit: "EA",
            rule: QuantityRule::PerAreaCeil(0.5),
            basis: "fixtures per floor area",
        },
        ProcessId::Flooring => MaterialSpec {
            category1: "floor",
            category2: "wood_flooring",
            category3: None,
            spec: "m2",
            unit: "m2",
            rule: QuantityRule::PerArea(M2_PER_PYEONG),
            basis: "floor surface",
        },
        ProcessId::Wallpaper => MaterialSpec {
            category1: "wallpaper",
            category2: "wall_covering",
            category3: None,
            spec: "roll",
            unit: "m2",
            rule: QuantityRule::PerArea(M2_PER_PYEONG * 2.5),
            basis: "wall surface",
        },
        ProcessId::Window => MaterialSpec {
            category1: "window",
            category2: "double_window",
            category3: None,
            spec: "EA",
            unit: "EA",
            rule: QuantityRule::AreaDivisorCeil(8.0),
            basis: "windows per floor area",
        },
        ProcessId::Door => MaterialSpec {
            category1: "door",
            category2: "room_door",
            category3: None,
            spec: "EA",
            unit: "EA",
            rule: QuantityRule::PerRoom,
            basis: "one door per room and bathroom",
        },
        ProcessId::Soundproofing | ProcessId::Demolition | ProcessId::ChildSafety => return None,
    };
    Some(spec)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaborSpec {
    pub unit: LaborUnit,
    pub rule: QuantityRule,
    pub daily_output: f64,
    pub crew_size: u32,
}

pub fn labor_spec(pricing: PricingProcess) -> LaborSpec {
    let (unit, rule, daily_output, crew_size) = match pricing {
        PricingProcess::Finish => (LaborUnit::M2, QuantityRule::PerArea(M2_PER_PYEONG), 40.0, 2),
        PricingProcess::Kitchen => (LaborUnit::Set, QuantityRule::Fixed(1.0), 0.5, 2),
        PricingProcess::Bathroom => (LaborUnit::Set, QuantityRule::Fixed(1.0), 0.7, 2),
        PricingProcess::Demolition => {
            (LaborUnit::M2, QuantityRule::PerArea(M2_PER_PYEONG), 25.0, 3)
        }
        PricingProcess::Electric => (LaborUnit::Ea, QuantityRule::Fixed(10.0), 15.0, 1),
        PricingProcess::Door => (LaborUnit::Ea, QuantityRule::Fixed(3.0), 2.0, 2),
        PricingProcess::Window => (LaborUnit::Ea, QuantityRule::Fixed(5.0), 3.0, 2),
        PricingProcess::Storage => (LaborUnit::Ea, QuantityRule::Fixed(1.0), 1.0, 2),
    };
    LaborSpec {
        unit,
        rule,
        daily_output,
        crew_size,
    }
}
