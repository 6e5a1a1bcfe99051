//! # Liner Sizing
//!
//! Flat-sheet pond liner needed to line the fish tank and the biofilter.
//!
//! ## Models
//!
//! **Simple wrap** (default output): the sheet covers the floor and folds up
//! both walls, plus an optional overlap margin.
//!
//! ```text
//! length = L + 2·wall + overlap
//! width  = W + 2·wall + overlap
//! ```
//!
//! `wall` is the tank depth, or the biofilter container height at its deep
//! end.
//!
//! **Precise wrap** adds material for the rounded corners, the curved tank
//! bottom and the sloped biofilter floor.
//!
//! ## Combined Sheet
//!
//! Both liners can be cut from one sheet, laid either side by side or one
//! after the other. The smaller of the two layouts is chosen.
//!
//! ## Example
//!
//! ```rust
//! use iavs_core::calculations::liner::{combine_sheets, tank_liner, SheetLayout};
//! use iavs_core::calculations::tank::TankDimensions;
//!
//! let liner = tank_liner(&TankDimensions::default(), 0.0);
//! assert_eq!(liner.length_mm, 3400.0);
//! assert_eq!(liner.width_mm, 3600.0);
//!
//! // Two identical sheets tie, and ties go to the stacked layout
//! let sheet = combine_sheets(&liner, &liner);
//! assert_eq!(sheet.layout, SheetLayout::Stacked);
//! ```

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::calculations::biofilter::BiofilterDimensions;
use crate::calculations::tank::TankDimensions;
use crate::units::{Meters, Millimeters, Unit};

/// Extra length for a fully curved tank bottom, as a fraction of depth
pub const CURVE_ALLOWANCE_FRACTION: f64 = 0.15;

/// A rectangular liner sheet (mm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinerDimensions {
    pub length_mm: f64,
    pub width_mm: f64,
}

impl LinerDimensions {
    /// Sheet area (m²)
    pub fn area_m2(&self) -> f64 {
        (Meters::from(Millimeters(self.length_mm)) * Meters::from(Millimeters(self.width_mm))).0
    }

    /// Sheet area in square display units (e.g. ft² when `unit` is feet)
    pub fn area_in(&self, unit: Unit) -> f64 {
        unit.from_mm(self.length_mm) * unit.from_mm(self.width_mm)
    }
}

/// Overlap margin added to a liner.
///
/// The amount is expressed in the active display unit. It is reset to the
/// unit's default when the unit changes, never converted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinerOverlap {
    pub enabled: bool,
    /// Margin in the active display unit
    pub amount: f64,
}

impl LinerOverlap {
    /// Enabled overlap with the unit's default margin
    pub fn for_unit(unit: Unit) -> Self {
        LinerOverlap {
            enabled: true,
            amount: unit.default_overlap(),
        }
    }

    /// Margin in millimetres, zero when disabled
    pub fn margin_mm(&self, unit: Unit) -> f64 {
        if self.enabled {
            unit.to_mm(self.amount)
        } else {
            0.0
        }
    }
}

impl Default for LinerOverlap {
    fn default() -> Self {
        LinerOverlap::for_unit(Unit::default())
    }
}

/// Optional liner pricing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinerPricing {
    pub enabled: bool,
    /// Price per square display unit (e.g. per m² or per ft²)
    pub price_per_unit_area: f64,
}

impl LinerPricing {
    /// Cost of an area given in square display units.
    ///
    /// `None` means costing is switched off; a zero price still yields
    /// `Some(0.0)`.
    pub fn cost(&self, area: f64) -> Option<f64> {
        self.enabled.then(|| area * self.price_per_unit_area)
    }
}

// ============================================================================
// Simple wrap model
// ============================================================================

fn wrap(length_mm: f64, width_mm: f64, wall_mm: f64, overlap_mm: f64) -> LinerDimensions {
    LinerDimensions {
        length_mm: length_mm + 2.0 * wall_mm + overlap_mm,
        width_mm: width_mm + 2.0 * wall_mm + overlap_mm,
    }
}

/// Liner for the fish tank (simple wrap).
pub fn tank_liner(tank: &TankDimensions, overlap_mm: f64) -> LinerDimensions {
    wrap(tank.length, tank.width, tank.depth, overlap_mm)
}

/// Liner for the biofilter (simple wrap), walls as tall as the deep end plus
/// freeboard.
pub fn biofilter_liner(biofilter: &BiofilterDimensions, overlap_mm: f64) -> LinerDimensions {
    wrap(
        biofilter.length,
        biofilter.width,
        biofilter.total_container_height_mm(),
        overlap_mm,
    )
}

// ============================================================================
// Precise wrap model
// ============================================================================

/// Liner for the fish tank including corner and curvature allowances.
///
/// The four fillets add a quarter-circle arc each, `4 × (π/2) × r`, shared
/// between length and width in proportion to each side. A curved bottom adds
/// up to 15 % of the depth along the length.
pub fn precise_tank_liner(tank: &TankDimensions, overlap_mm: f64) -> LinerDimensions {
    let base = tank_liner(tank, overlap_mm);

    let fillet_extra = 4.0 * FRAC_PI_2 * tank.effective_corner_radius_mm();
    let footprint = tank.length + tank.width;
    let (extra_length, extra_width) = if footprint > 0.0 {
        (
            fillet_extra * tank.length / footprint,
            fillet_extra * tank.width / footprint,
        )
    } else {
        (0.0, 0.0)
    };

    let curve_extra = CURVE_ALLOWANCE_FRACTION * tank.depth * (tank.curve_depth / 100.0);

    LinerDimensions {
        length_mm: base.length_mm + extra_length + curve_extra,
        width_mm: base.width_mm + extra_width,
    }
}

/// Liner for the biofilter including the sloped floor.
///
/// The floor runs along the hypotenuse of the slope, so the sheet grows by
/// `√(length² + rise²) − length`.
pub fn precise_biofilter_liner(biofilter: &BiofilterDimensions, overlap_mm: f64) -> LinerDimensions {
    let base = biofilter_liner(biofilter, overlap_mm);
    let slope_extra = biofilter.length.hypot(biofilter.slope_rise_mm()) - biofilter.length;
    LinerDimensions {
        length_mm: base.length_mm + slope_extra,
        width_mm: base.width_mm,
    }
}

// ============================================================================
// Combined sheet
// ============================================================================

/// How two liners are arranged on one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SheetLayout {
    /// `max(l1, l2) × (w1 + w2)`
    SideBySide,
    /// `(l1 + l2) × max(w1, w2)`
    Stacked,
}

/// One sheet large enough for both liners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombinedSheet {
    pub length_mm: f64,
    pub width_mm: f64,
    pub layout: SheetLayout,
}

impl CombinedSheet {
    /// Sheet as plain liner dimensions
    pub fn dimensions(&self) -> LinerDimensions {
        LinerDimensions {
            length_mm: self.length_mm,
            width_mm: self.width_mm,
        }
    }

    /// Sheet area (m²)
    pub fn area_m2(&self) -> f64 {
        self.dimensions().area_m2()
    }
}

/// Pick the smaller single-sheet layout for two liners.
///
/// Side by side wins only when strictly smaller; an exact tie goes to the
/// stacked layout.
pub fn combine_sheets(a: &LinerDimensions, b: &LinerDimensions) -> CombinedSheet {
    let side_length = a.length_mm.max(b.length_mm);
    let side_width = a.width_mm + b.width_mm;
    let side_area = side_length * side_width;

    let stacked_length = a.length_mm + b.length_mm;
    let stacked_width = a.width_mm.max(b.width_mm);
    let stacked_area = stacked_length * stacked_width;

    if side_area < stacked_area {
        CombinedSheet {
            length_mm: side_length,
            width_mm: side_width,
            layout: SheetLayout::SideBySide,
        }
    } else {
        CombinedSheet {
            length_mm: stacked_length,
            width_mm: stacked_width,
            layout: SheetLayout::Stacked,
        }
    }
}

// ============================================================================
// Liner set and costs
// ============================================================================

/// Tank liner, biofilter liner and the combined sheet for one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinerSet {
    pub tank: LinerDimensions,
    pub biofilter: LinerDimensions,
    pub combined: CombinedSheet,
}

impl LinerSet {
    /// Simple-wrap liners
    pub fn simple(tank: &TankDimensions, biofilter: &BiofilterDimensions, tank_overlap_mm: f64, biofilter_overlap_mm: f64) -> Self {
        let tank = tank_liner(tank, tank_overlap_mm);
        let biofilter = biofilter_liner(biofilter, biofilter_overlap_mm);
        LinerSet {
            tank,
            biofilter,
            combined: combine_sheets(&tank, &biofilter),
        }
    }

    /// Precise-wrap liners
    pub fn precise(tank: &TankDimensions, biofilter: &BiofilterDimensions, tank_overlap_mm: f64, biofilter_overlap_mm: f64) -> Self {
        let tank = precise_tank_liner(tank, tank_overlap_mm);
        let biofilter = precise_biofilter_liner(biofilter, biofilter_overlap_mm);
        LinerSet {
            tank,
            biofilter,
            combined: combine_sheets(&tank, &biofilter),
        }
    }

    /// Price every sheet in square display units.
    pub fn costs(&self, unit: Unit, pricing: &LinerPricing) -> LinerCosts {
        let tank = pricing.cost(self.tank.area_in(unit));
        let biofilter = pricing.cost(self.biofilter.area_in(unit));
        LinerCosts {
            tank,
            biofilter,
            separate_total: tank.zip(biofilter).map(|(t, b)| t + b),
            combined_sheet: pricing.cost(self.combined.dimensions().area_in(unit)),
        }
    }
}

/// Liner costs, each `None` when costing is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LinerCosts {
    pub tank: Option<f64>,
    pub biofilter: Option<f64>,
    /// Tank plus biofilter bought as two sheets
    pub separate_total: Option<f64>,
    pub combined_sheet: Option<f64>,
}
