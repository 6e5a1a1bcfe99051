//! # Settings
//!
//! Constant tables and user-tunable knobs.
//!
//! ## Structure
//!
//! ```text
//! settings
//! ├── InputRange              (min, max, step of one input)
//! ├── tank_ranges(unit)       (length/width, depth per unit)
//! ├── biofilter_ranges(unit)  (width, length, sand depth, freeboard per unit)
//! ├── head_height_range(unit)
//! └── DesignSettings          (unit, overlaps, pricing)
//! ```
//!
//! Ranges are expressed in the display unit. Corner radius has no table entry:
//! it runs from zero to half the shortest side (see [`corner_radius_range`]).

use serde::{Deserialize, Serialize};

use crate::calculations::liner::{LinerOverlap, LinerPricing};
use crate::calculations::tank::TankDimensions;
use crate::units::Unit;

/// Allowed range and step of one numeric input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl InputRange {
    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        InputRange { min, max, step }
    }

    /// Clamp a value into the range. NaN maps to `min`.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Bottom profile, percent
pub const CURVE_DEPTH_RANGE: InputRange = InputRange::new(0.0, 100.0, 1.0);

/// Biofilter floor slope, cm per m
pub const SLOPE_RANGE: InputRange = InputRange::new(2.0, 10.0, 1.0);

/// Tank input ranges for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankRanges {
    /// Length and width
    pub footprint: InputRange,
    pub depth: InputRange,
    /// Step of the corner radius input
    pub radius_step: f64,
}

/// Biofilter input ranges for one unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiofilterRanges {
    pub width: InputRange,
    pub length: InputRange,
    /// Sand depth at the shallow end
    pub shallow_depth: InputRange,
    pub freeboard: InputRange,
}

const TANK_RANGES_M: TankRanges = TankRanges {
    footprint: InputRange::new(0.5, 10.0, 0.01),
    depth: InputRange::new(0.3, 5.0, 0.01),
    radius_step: 0.01,
};

const TANK_RANGES_CM: TankRanges = TankRanges {
    footprint: InputRange::new(50.0, 1000.0, 1.0),
    depth: InputRange::new(30.0, 500.0, 1.0),
    radius_step: 0.5,
};

const TANK_RANGES_IN: TankRanges = TankRanges {
    footprint: InputRange::new(20.0, 394.0, 0.5),
    depth: InputRange::new(12.0, 197.0, 0.5),
    radius_step: 0.25,
};

const TANK_RANGES_FT: TankRanges = TankRanges {
    footprint: InputRange::new(2.0, 33.0, 0.1),
    depth: InputRange::new(1.0, 16.0, 0.1),
    radius_step: 0.1,
};

const BIOFILTER_RANGES_M: BiofilterRanges = BiofilterRanges {
    width: InputRange::new(0.5, 5.0, 0.01),
    length: InputRange::new(1.0, 20.0, 0.01),
    shallow_depth: InputRange::new(0.3, 0.5, 0.01),
    freeboard: InputRange::new(0.0, 0.3, 0.01),
};

const BIOFILTER_RANGES_CM: BiofilterRanges = BiofilterRanges {
    width: InputRange::new(50.0, 500.0, 1.0),
    length: InputRange::new(100.0, 2000.0, 1.0),
    shallow_depth: InputRange::new(30.0, 50.0, 1.0),
    freeboard: InputRange::new(0.0, 30.0, 1.0),
};

const BIOFILTER_RANGES_IN: BiofilterRanges = BiofilterRanges {
    width: InputRange::new(20.0, 200.0, 0.5),
    length: InputRange::new(40.0, 800.0, 1.0),
    shallow_depth: InputRange::new(12.0, 20.0, 0.5),
    freeboard: InputRange::new(0.0, 12.0, 0.5),
};

const BIOFILTER_RANGES_FT: BiofilterRanges = BiofilterRanges {
    width: InputRange::new(2.0, 16.0, 0.1),
    length: InputRange::new(3.0, 65.0, 0.1),
    shallow_depth: InputRange::new(1.0, 2.0, 0.1),
    freeboard: InputRange::new(0.0, 1.0, 0.1),
};

/// Tank input ranges in `unit`
pub fn tank_ranges(unit: Unit) -> &'static TankRanges {
    match unit {
        Unit::M => &TANK_RANGES_M,
        Unit::Cm => &TANK_RANGES_CM,
        Unit::In => &TANK_RANGES_IN,
        Unit::Ft => &TANK_RANGES_FT,
    }
}

/// Biofilter input ranges in `unit`
pub fn biofilter_ranges(unit: Unit) -> &'static BiofilterRanges {
    match unit {
        Unit::M => &BIOFILTER_RANGES_M,
        Unit::Cm => &BIOFILTER_RANGES_CM,
        Unit::In => &BIOFILTER_RANGES_IN,
        Unit::Ft => &BIOFILTER_RANGES_FT,
    }
}

/// Pump head height range in `unit`
pub fn head_height_range(unit: Unit) -> InputRange {
    match unit {
        Unit::M => InputRange::new(0.0, 5.0, 0.01),
        Unit::Cm => InputRange::new(0.0, 500.0, 1.0),
        Unit::In => InputRange::new(0.0, 200.0, 0.5),
        Unit::Ft => InputRange::new(0.0, 16.0, 0.1),
    }
}

/// Corner radius range in `unit`: zero to half the shortest side
pub fn corner_radius_range(tank: &TankDimensions, unit: Unit) -> InputRange {
    InputRange::new(0.0, unit.from_mm(tank.max_corner_radius_mm()), tank_ranges(unit).radius_step)
}

/// Non-dimensional design knobs.
///
/// ## JSON Example
///
/// ```json
/// {
///   "unit": "ft",
///   "tank_overlap": { "enabled": true, "amount": 0.7 },
///   "biofilter_overlap": { "enabled": false, "amount": 0.7 },
///   "pricing": { "enabled": true, "price_per_unit_area": 1.25 }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignSettings {
    /// Display unit
    #[serde(default)]
    pub unit: Unit,
    /// Tank liner overlap, in `unit`
    pub tank_overlap: LinerOverlap,
    /// Biofilter liner overlap, in `unit`
    pub biofilter_overlap: LinerOverlap,
    #[serde(default)]
    pub pricing: LinerPricing,
}

impl DesignSettings {
    /// Defaults for a unit, overlaps at the unit's default margin
    pub fn for_unit(unit: Unit) -> Self {
        DesignSettings {
            unit,
            tank_overlap: LinerOverlap::for_unit(unit),
            biofilter_overlap: LinerOverlap::for_unit(unit),
            pricing: LinerPricing::default(),
        }
    }
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings::for_unit(Unit::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let range = tank_ranges(Unit::M).footprint;
        assert_eq!(range.clamp(0.1), 0.5);
        assert_eq!(range.clamp(12.0), 10.0);
        assert_eq!(range.clamp(2.5), 2.5);
        assert_eq!(range.clamp(f64::NAN), 0.5);
    }

    #[test]
    fn test_ranges_cover_defaults() {
        // Default design is 1.0 × 1.2 × 1.2 m with a 1.2 × 5 m biofilter
        let tank = tank_ranges(Unit::M);
        assert!(tank.footprint.contains(1.0) && tank.footprint.contains(1.2));
        assert!(tank.depth.contains(1.2));

        let bio = biofilter_ranges(Unit::M);
        assert!(bio.width.contains(1.2));
        assert!(bio.length.contains(5.0));
        assert!(bio.shallow_depth.contains(0.3));
        assert!(bio.freeboard.contains(0.0));
        assert!(SLOPE_RANGE.contains(2.0));
    }

    #[test]
    fn test_ranges_roughly_agree_across_units() {
        // Every unit's tank footprint tops out near 10 m
        for unit in Unit::ALL {
            let max_mm = unit.to_mm(tank_ranges(unit).footprint.max);
            assert!((max_mm - 10_000.0).abs() < 200.0, "{unit}: {max_mm}");
        }
    }

    #[test]
    fn test_corner_radius_range() {
        let range = corner_radius_range(&TankDimensions::default(), Unit::Cm);
        assert_eq!(range.min, 0.0);
        assert!((range.max - 50.0).abs() < 1e-9);
        assert_eq!(range.step, 0.5);
    }

    #[test]
    fn test_head_height_range() {
        assert_eq!(head_height_range(Unit::Ft).max, 16.0);
        assert_eq!(head_height_range(Unit::M).min, 0.0);
    }

    #[test]
    fn test_settings_json() {
        let settings = DesignSettings::for_unit(Unit::Ft);
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: DesignSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
        assert!((parsed.tank_overlap.amount - 0.7).abs() < 1e-12);
    }
}
