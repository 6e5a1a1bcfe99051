//! # Design Summary
//!
//! One pure function, [`calculate`], that recomputes every derived value from
//! the tank and biofilter dimensions plus the unit, overlap, pricing and
//! head-height inputs. Values flow in dependency order:
//!
//! ```text
//! tank ──┬──────────────► liners ──► costs
//!        ├─► biofilter ──┤
//!        ├─► risk ───────┴─► stocking
//!        └─────────────────► pump
//! ```
//!
//! ## Example
//!
//! ```rust
//! use iavs_core::calculations::summary::{calculate, DesignInput};
//!
//! let summary = calculate(&DesignInput::default());
//! assert_eq!(summary.stocking.adjustment_message, "");
//! assert!(summary.pump.flow.max_lph > summary.pump.flow.min_lph);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::biofilter::{self, BiofilterDimensions, BiofilterResult};
use crate::calculations::liner::{LinerCosts, LinerDimensions, LinerOverlap, LinerPricing, LinerSet};
use crate::calculations::pump::{self, HeadHeight, PumpResult};
use crate::calculations::risk::{self, RiskBand, TankRisk, MIN_TANK_DEPTH_MM, OPTIMAL_RADIUS_FRACTION};
use crate::calculations::stocking::{self, BiofilterAdjustment, StockingInput, StockingResult};
use crate::calculations::tank::{self, TankDimensions, TankResult};
use crate::errors::CalcResult;
use crate::units::Unit;

/// Everything the engine needs for one recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignInput {
    pub tank: TankDimensions,
    pub biofilter: BiofilterDimensions,
    /// Active display unit
    pub unit: Unit,
    pub tank_overlap: LinerOverlap,
    pub biofilter_overlap: LinerOverlap,
    pub pricing: LinerPricing,
    pub head_height: HeadHeight,
}

impl Default for DesignInput {
    fn default() -> Self {
        let unit = Unit::default();
        DesignInput {
            tank: TankDimensions::default(),
            biofilter: BiofilterDimensions::default(),
            unit,
            tank_overlap: LinerOverlap::for_unit(unit),
            biofilter_overlap: LinerOverlap::for_unit(unit),
            pricing: LinerPricing::default(),
            head_height: HeadHeight::default(),
        }
    }
}

/// A design problem worth telling the user about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignWarning {
    BottomProfile,
    DepthRatio,
    ShallowTank,
    CornerRadius,
    AspectRatio,
    SandVolumeCritical,
    SandVolumeLow,
    SurfaceAreaCritical,
    SurfaceAreaOutOfRange,
    LongBiofilter,
    SmallTank,
    StockingReduced,
}

impl DesignWarning {
    /// Severity of the warning
    pub fn band(self) -> RiskBand {
        match self {
            DesignWarning::ShallowTank
            | DesignWarning::SandVolumeCritical
            | DesignWarning::SurfaceAreaCritical
            | DesignWarning::SmallTank => RiskBand::Danger,
            _ => RiskBand::Caution,
        }
    }

    /// Human-readable explanation
    pub fn message(self) -> &'static str {
        match self {
            DesignWarning::BottomProfile => {
                "The Bottom Profile is sub-optimal. A flat bottom may impede waste collection, while a deep curve provides the best stability and cleaning."
            }
            DesignWarning::DepthRatio => {
                "The tank is deeper than its shortest side, which may indicate a high-risk or unstable design."
            }
            DesignWarning::ShallowTank => "A depth of less than 60cm is not recommended for fish welfare.",
            DesignWarning::CornerRadius => {
                "The Corner Radius is sub-optimal. The ideal radius is 25-50% of the shortest side for good water circulation."
            }
            DesignWarning::AspectRatio => {
                "The tank footprint is very elongated or almost square. A length-to-width ratio between 1.2 and 3 circulates best."
            }
            DesignWarning::SandVolumeCritical => {
                "The biofilter sand volume is critically low (less than 30% of target). This will not support the fish load."
            }
            DesignWarning::SandVolumeLow => {
                "The biofilter sand volume is below the recommended target of 2x the tank volume."
            }
            DesignWarning::SurfaceAreaCritical => {
                "The biofilter surface area is critically undersized (more than 20% below target). This poses a high risk to fish health."
            }
            DesignWarning::SurfaceAreaOutOfRange => {
                "The biofilter surface area is outside the optimal range. It should be approximately 6 times the tank volume (m³)."
            }
            DesignWarning::LongBiofilter => {
                "The biofilter is longer than 6m. Additional drainage may be required; consult the iAVs handbook."
            }
            DesignWarning::SmallTank => "A tank volume under 500 Liters is not recommended for stocking fish.",
            DesignWarning::StockingReduced => {
                "The recommended stocking rate has been reduced due to an undersized biofilter."
            }
        }
    }
}

impl fmt::Display for DesignWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Results converted to the active display unit.
///
/// Lengths are in `unit`; volumes are in litres for metric units and US
/// gallons for imperial units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayValues {
    pub unit: Unit,
    /// "Liters" or "Gallons"
    pub volume_label: String,
    pub tank_volume: f64,
    pub biofilter_volume: f64,
    pub biofilter_deep_depth: f64,
    pub biofilter_total_height: f64,
    /// Largest corner radius that fits the footprint
    pub max_corner_radius: f64,
    /// Corner radius window rated optimal
    pub optimal_radius_range: (f64, f64),
    /// Tank liner (length, width)
    pub tank_liner: (f64, f64),
    /// Biofilter liner (length, width)
    pub biofilter_liner: (f64, f64),
    /// Combined sheet (length, width)
    pub combined_sheet: (f64, f64),
    pub head_height: f64,
}

/// Every derived value for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub input: DesignInput,
    pub tank: TankResult,
    pub tank_risk: TankRisk,
    pub biofilter: BiofilterResult,
    /// Simple-wrap liners (the default sizing)
    pub liners: LinerSet,
    /// Liners with corner, curvature and slope allowances
    pub precise_liners: LinerSet,
    pub liner_costs: LinerCosts,
    pub stocking: StockingResult,
    pub pump: PumpResult,
    pub warnings: Vec<DesignWarning>,
    pub display: DisplayValues,
}

impl DesignSummary {
    /// Worst band across the tank and biofilter checks
    pub fn overall_band(&self) -> RiskBand {
        self.tank_risk
            .worst()
            .max(self.biofilter.sand_volume_band)
            .max(self.biofilter.surface_area_band)
    }

    pub fn has_warning(&self, warning: DesignWarning) -> bool {
        self.warnings.contains(&warning)
    }

    /// Pretty-printed JSON bundle for API consumers
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Recompute every derived value.
pub fn calculate(input: &DesignInput) -> DesignSummary {
    let unit = input.unit;

    let tank = tank::calculate(&input.tank);
    let tank_risk = risk::assess_tank(&input.tank);
    let biofilter = biofilter::calculate(&input.biofilter, tank.volume_liters);

    let tank_overlap_mm = input.tank_overlap.margin_mm(unit);
    let biofilter_overlap_mm = input.biofilter_overlap.margin_mm(unit);
    let liners = LinerSet::simple(&input.tank, &input.biofilter, tank_overlap_mm, biofilter_overlap_mm);
    let precise_liners = LinerSet::precise(&input.tank, &input.biofilter, tank_overlap_mm, biofilter_overlap_mm);
    let liner_costs = liners.costs(unit, &input.pricing);

    let stocking = stocking::calculate(&StockingInput {
        tank_volume_liters: tank.volume_liters,
        biofilter_surface_area_m2: biofilter.surface_area_m2,
        efficiency: tank_risk.efficiency,
    });

    let pump = pump::calculate(tank.volume_liters, biofilter.total_container_height_mm, &input.head_height);

    let warnings = collect_warnings(input, &tank, &tank_risk, &biofilter, &stocking);
    let display = display_values(input, &tank, &biofilter, &liners, &pump);

    debug!(
        unit = %unit,
        volume_liters = tank.volume_liters,
        biofilter_area_m2 = biofilter.surface_area_m2,
        min_stock = stocking.min_stock,
        max_stock = stocking.max_stock,
        warnings = warnings.len(),
        "design recomputed"
    );

    DesignSummary {
        input: *input,
        tank,
        tank_risk,
        biofilter,
        liners,
        precise_liners,
        liner_costs,
        stocking,
        pump,
        warnings,
        display,
    }
}

fn collect_warnings(
    input: &DesignInput,
    tank: &TankResult,
    tank_risk: &TankRisk,
    biofilter: &BiofilterResult,
    stocking: &StockingResult,
) -> Vec<DesignWarning> {
    let mut warnings = Vec::new();

    if !tank_risk.curve_depth.is_optimal() {
        warnings.push(DesignWarning::BottomProfile);
    }
    if !tank_risk.depth.is_optimal() && input.tank.depth >= MIN_TANK_DEPTH_MM {
        warnings.push(DesignWarning::DepthRatio);
    }
    if input.tank.depth < MIN_TANK_DEPTH_MM {
        warnings.push(DesignWarning::ShallowTank);
    }
    if !tank_risk.corner_radius.is_optimal() {
        warnings.push(DesignWarning::CornerRadius);
    }
    if !tank_risk.aspect_ratio.is_optimal() {
        warnings.push(DesignWarning::AspectRatio);
    }
    match biofilter.sand_volume_band {
        RiskBand::Danger => warnings.push(DesignWarning::SandVolumeCritical),
        RiskBand::Caution => warnings.push(DesignWarning::SandVolumeLow),
        RiskBand::Optimal => {}
    }
    match biofilter.surface_area_band {
        RiskBand::Danger => warnings.push(DesignWarning::SurfaceAreaCritical),
        RiskBand::Caution => warnings.push(DesignWarning::SurfaceAreaOutOfRange),
        RiskBand::Optimal => {}
    }
    if input.biofilter.needs_extra_drainage() {
        warnings.push(DesignWarning::LongBiofilter);
    }
    if tank.volume_liters < stocking::MIN_STOCKABLE_VOLUME_LITERS {
        warnings.push(DesignWarning::SmallTank);
    }
    if stocking.adjustment == BiofilterAdjustment::Undersized {
        warnings.push(DesignWarning::StockingReduced);
    }

    warnings
}

fn display_values(
    input: &DesignInput,
    tank: &TankResult,
    biofilter: &BiofilterResult,
    liners: &LinerSet,
    pump: &PumpResult,
) -> DisplayValues {
    let unit = input.unit;
    let pair = |liner: LinerDimensions| (unit.from_mm(liner.length_mm), unit.from_mm(liner.width_mm));
    let shd = input.tank.shortest_side_mm();
    let (optimal_from, optimal_to) = OPTIMAL_RADIUS_FRACTION;

    DisplayValues {
        unit,
        volume_label: unit.volume_label().to_string(),
        tank_volume: unit.display_volume(tank.volume_liters),
        biofilter_volume: unit.display_volume(biofilter.total_biofilter_volume_liters),
        biofilter_deep_depth: unit.from_mm(biofilter.deep_depth_mm),
        biofilter_total_height: unit.from_mm(biofilter.total_container_height_mm),
        max_corner_radius: unit.from_mm(input.tank.max_corner_radius_mm()),
        optimal_radius_range: (unit.from_mm(shd * optimal_from), unit.from_mm(shd * optimal_to)),
        tank_liner: pair(liners.tank),
        biofilter_liner: pair(liners.biofilter),
        combined_sheet: pair(liners.combined.dimensions()),
        head_height: unit.from_mm(pump.head_height_mm),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_design() {
        let summary = calculate(&DesignInput::default());

        assert!((summary.tank.volume_liters - 1000.9).abs() < 0.5);
        assert!((summary.biofilter.surface_area_m2 - 6.0).abs() < 1e-9);
        // 1.0009 m³ wants 6.005 m², 6 m² is inside the dead band
        assert_eq!(summary.stocking.stocking_multiplier, 1.0);
        assert_eq!((summary.stocking.min_stock, summary.stocking.max_stock), (80, 100));
        assert!((summary.pump.head_height_mm - 400.0).abs() < 1e-9);
        assert!((summary.pump.flow.min_lph - summary.tank.volume_liters).abs() < 1e-9);

        // default overlap of 0.2 m is applied
        assert!((summary.liners.tank.length_mm - 3600.0).abs() < 1e-9);
        assert!((summary.display.tank_liner.0 - 3.6).abs() < 1e-9);

        assert_eq!(summary.liner_costs.tank, None);
        assert_eq!(summary.warnings, vec![DesignWarning::DepthRatio]);
        assert_eq!(summary.overall_band(), RiskBand::Caution);
    }

    #[test]
    fn test_imperial_display_uses_gallons() {
        let input = DesignInput {
            unit: Unit::Ft,
            tank_overlap: LinerOverlap::for_unit(Unit::Ft),
            biofilter_overlap: LinerOverlap::for_unit(Unit::Ft),
            ..DesignInput::default()
        };
        let summary = calculate(&input);
        assert_eq!(summary.display.volume_label, "Gallons");
        assert!((summary.display.tank_volume - summary.tank.volume_liters / 3.78541).abs() < 1e-9);
        // 0.7 ft of overlap
        assert!((summary.liners.tank.length_mm - (3400.0 + 0.7 * 304.8)).abs() < 1e-9);
    }

    #[test]
    fn test_small_shallow_tank_warnings() {
        let input = DesignInput {
            tank: TankDimensions {
                length: 800.0,
                width: 800.0,
                depth: 500.0,
                corner_radius: 0.0,
                curve_depth: 0.0,
            },
            ..DesignInput::default()
        };
        let summary = calculate(&input);
        assert!(summary.has_warning(DesignWarning::ShallowTank));
        assert!(!summary.has_warning(DesignWarning::DepthRatio));
        assert!(summary.has_warning(DesignWarning::SmallTank));
        assert!(summary.has_warning(DesignWarning::BottomProfile));
        assert!(summary.has_warning(DesignWarning::CornerRadius));
        assert!(summary.has_warning(DesignWarning::AspectRatio));
        assert_eq!(summary.stocking.displayed_range(), (0, 0));
        assert_eq!(summary.overall_band(), RiskBand::Danger);
    }

    #[test]
    fn test_undersized_biofilter_warnings() {
        let input = DesignInput {
            biofilter: BiofilterDimensions {
                length: 1500.0,
                ..BiofilterDimensions::default()
            },
            ..DesignInput::default()
        };
        let summary = calculate(&input);
        assert!(summary.has_warning(DesignWarning::SurfaceAreaCritical));
        assert!(summary.has_warning(DesignWarning::StockingReduced));
        assert!(summary.stocking.max_stock < 100);
    }

    #[test]
    fn test_long_biofilter_warning() {
        let input = DesignInput {
            biofilter: BiofilterDimensions {
                length: 7000.0,
                ..BiofilterDimensions::default()
            },
            ..DesignInput::default()
        };
        assert!(calculate(&input).has_warning(DesignWarning::LongBiofilter));
    }

    #[test]
    fn test_manual_head_height_is_used() {
        let mut input = DesignInput::default();
        input.head_height.set_manual(1500.0);
        let summary = calculate(&input);
        assert_eq!(summary.pump.head_height_mm, 1500.0);
        assert!(summary.pump.head_height_overridden);
        assert!((summary.display.head_height - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_costs_flow_through() {
        let input = DesignInput {
            pricing: LinerPricing {
                enabled: true,
                price_per_unit_area: 10.0,
            },
            ..DesignInput::default()
        };
        let summary = calculate(&input);
        // (3.6 × 3.8) m² × 10
        assert!((summary.liner_costs.tank.unwrap() - 136.8).abs() < 1e-9);
        assert!(summary.liner_costs.combined_sheet.is_some());
    }

    #[test]
    fn test_summary_serializes() {
        let summary = calculate(&DesignInput::default());
        let json = summary.to_json().unwrap();
        assert!(json.contains("\"volume_liters\""));
        assert!(json.contains("\"depth_ratio\""));
        assert!(json.contains("\"container_volume_difference_percent\""));
        let roundtrip: DesignSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.warnings, summary.warnings);
    }
}
