//! # Design-Risk Classification
//!
//! Independent checks that map one geometric ratio to a [`RiskBand`], plus the
//! two continuous efficiency multipliers that feed the stocking rate.
//!
//! ## Bands
//!
//! SHD is the shorter of tank length and width.
//!
//! | Check | Danger | Caution | Optimal |
//! |---|---|---|---|
//! | Depth | < 600 mm, or > 1.5×SHD | SHD < depth ≤ 1.5×SHD | ≤ SHD |
//! | Corner radius | < 0.05×SHD or > 0.5×SHD | 0.05–0.25×SHD | 0.25–0.5×SHD |
//! | Aspect ratio | > 5.0 | < 1.2 or > 3.0 | 1.2–3.0 |
//! | Curve depth | ≤ 25 % | 25–60 % | > 60 % |
//! | Sand volume | < 30 % of 2×tank | 30–100 % | ≥ 100 % |
//! | Surface area | < 80 % of 6 m²/m³ | 80–90 % or > 150 % | 90–150 % |
//!
//! A zero denominator never fails a design: the check falls back to
//! [`RiskBand::Optimal`].
//!
//! Bands are labels for the user. The efficiency multipliers are what
//! actually change the numbers.

use serde::{Deserialize, Serialize};

use crate::calculations::tank::TankDimensions;

/// Shallowest tank considered acceptable for fish welfare (mm)
pub const MIN_TANK_DEPTH_MM: f64 = 600.0;

/// Biofilter surface area required per cubic metre of tank water (m²/m³)
pub const IDEAL_AREA_PER_M3: f64 = 6.0;

/// Sand volume required per litre of tank water
pub const SAND_VOLUME_PER_LITER: f64 = 2.0;

/// Optimal corner radius window as a fraction of SHD
pub const OPTIMAL_RADIUS_FRACTION: (f64, f64) = (0.25, 0.5);

/// Three-level design quality signal.
///
/// Ordered from best to worst so `max` yields the worst band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Optimal,
    Caution,
    Danger,
}

impl RiskBand {
    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            RiskBand::Optimal => "Optimal",
            RiskBand::Caution => "Caution",
            RiskBand::Danger => "Danger",
        }
    }

    pub fn is_optimal(self) -> bool {
        self == RiskBand::Optimal
    }
}

impl std::fmt::Display for RiskBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Tank checks
// ============================================================================

/// Classify tank depth against the shortest side.
pub fn classify_depth(depth_mm: f64, shortest_side_mm: f64) -> RiskBand {
    if depth_mm < MIN_TANK_DEPTH_MM {
        return RiskBand::Danger;
    }
    if shortest_side_mm <= 0.0 {
        return RiskBand::Optimal;
    }
    if depth_mm <= shortest_side_mm {
        RiskBand::Optimal
    } else if depth_mm <= 1.5 * shortest_side_mm {
        RiskBand::Caution
    } else {
        RiskBand::Danger
    }
}

/// Classify the corner radius against the shortest side.
///
/// Uses the radius as entered, so an oversized radius is flagged even though
/// the geometry clamps it.
pub fn classify_corner_radius(radius_mm: f64, shortest_side_mm: f64) -> RiskBand {
    if shortest_side_mm <= 0.0 {
        return RiskBand::Optimal;
    }
    let (optimal_from, optimal_to) = OPTIMAL_RADIUS_FRACTION;
    if radius_mm < 0.05 * shortest_side_mm || radius_mm > optimal_to * shortest_side_mm {
        RiskBand::Danger
    } else if radius_mm < optimal_from * shortest_side_mm {
        RiskBand::Caution
    } else {
        RiskBand::Optimal
    }
}

/// Longer side over shorter side, or `None` for a degenerate footprint
pub fn aspect_ratio(length_mm: f64, width_mm: f64) -> Option<f64> {
    let short = length_mm.min(width_mm);
    if short <= 0.0 {
        return None;
    }
    Some(length_mm.max(width_mm) / short)
}

/// Classify the footprint aspect ratio.
pub fn classify_aspect_ratio(length_mm: f64, width_mm: f64) -> RiskBand {
    match aspect_ratio(length_mm, width_mm) {
        None => RiskBand::Optimal,
        Some(ratio) if ratio > 5.0 => RiskBand::Danger,
        Some(ratio) if !(1.2..=3.0).contains(&ratio) => RiskBand::Caution,
        Some(_) => RiskBand::Optimal,
    }
}

/// Classify the bottom curvature percentage.
pub fn classify_curve_depth(curve_depth: f64) -> RiskBand {
    if curve_depth <= 25.0 {
        RiskBand::Danger
    } else if curve_depth <= 60.0 {
        RiskBand::Caution
    } else {
        RiskBand::Optimal
    }
}

// ============================================================================
// Biofilter checks
// ============================================================================

/// Sand volume the biofilter should hold for a tank (L)
pub fn target_sand_volume_liters(tank_volume_liters: f64) -> f64 {
    tank_volume_liters * SAND_VOLUME_PER_LITER
}

/// Sand surface area the biofilter should have for a tank (m²)
pub fn target_surface_area_m2(tank_volume_liters: f64) -> f64 {
    tank_volume_liters / 1000.0 * IDEAL_AREA_PER_M3
}

/// Classify sand volume against twice the tank volume.
pub fn classify_sand_volume(sand_volume_liters: f64, tank_volume_liters: f64) -> RiskBand {
    let target = target_sand_volume_liters(tank_volume_liters);
    if target <= 1.0 {
        return RiskBand::Optimal;
    }
    if sand_volume_liters < target * 0.3 {
        RiskBand::Danger
    } else if sand_volume_liters < target {
        RiskBand::Caution
    } else {
        RiskBand::Optimal
    }
}

/// Classify biofilter surface area against 6 m² per m³ of tank water.
pub fn classify_surface_area(surface_area_m2: f64, tank_volume_liters: f64) -> RiskBand {
    let target = target_surface_area_m2(tank_volume_liters);
    if target <= 0.1 {
        return RiskBand::Optimal;
    }
    if surface_area_m2 < target * 0.8 {
        RiskBand::Danger
    } else if surface_area_m2 < target * 0.9 || surface_area_m2 > target * 1.5 {
        RiskBand::Caution
    } else {
        RiskBand::Optimal
    }
}

/// Signed difference of the container volume from twice the tank volume (%).
///
/// Negative when the container is short of the target. Zero without a tank.
pub fn container_volume_difference_percent(container_liters: f64, tank_volume_liters: f64) -> f64 {
    let target = target_sand_volume_liters(tank_volume_liters);
    if target <= 0.0 {
        return 0.0;
    }
    (container_liters / target - 1.0) * 100.0
}

/// Classify the whole container volume against twice the tank volume.
///
/// Undersizing is judged more strictly than oversizing: 10 %/30 % short vs.
/// 20 %/50 % over.
pub fn classify_container_volume(container_liters: f64, tank_volume_liters: f64) -> RiskBand {
    if target_sand_volume_liters(tank_volume_liters) <= 0.0 {
        return RiskBand::Optimal;
    }
    let difference = container_volume_difference_percent(container_liters, tank_volume_liters);
    let percent_off = difference.abs();
    let (caution_at, danger_at) = if difference < 0.0 { (10.0, 30.0) } else { (20.0, 50.0) };
    if percent_off >= danger_at {
        RiskBand::Danger
    } else if percent_off >= caution_at {
        RiskBand::Caution
    } else {
        RiskBand::Optimal
    }
}

// ============================================================================
// Efficiency multipliers
// ============================================================================

/// Stocking efficiency of the bottom profile.
///
/// 0.8 at or below 25 %, 1.0 at or above 60 %, linear in between.
pub fn bottom_profile_efficiency(curve_depth: f64) -> f64 {
    if curve_depth >= 60.0 {
        1.0
    } else if curve_depth <= 25.0 {
        0.8
    } else {
        0.8 + (curve_depth - 25.0) * (0.2 / 35.0)
    }
}

/// Stocking efficiency of the corner radius.
///
/// 0.7 below 5 % of SHD, 1.0 from 25 % of SHD, linear in between.
pub fn corner_radius_efficiency(radius_mm: f64, shortest_side_mm: f64) -> f64 {
    let optimal_from = 0.25 * shortest_side_mm;
    let poor_below = 0.05 * shortest_side_mm;
    if radius_mm >= optimal_from {
        1.0
    } else if radius_mm < poor_below {
        0.7
    } else {
        0.7 + (radius_mm - poor_below) * (0.3 / (0.2 * shortest_side_mm))
    }
}

/// Efficiency multipliers derived from the tank shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DesignEfficiency {
    pub bottom_profile: f64,
    pub corner_radius: f64,
    /// Product of the two
    pub total: f64,
}

impl DesignEfficiency {
    /// Stocking reduction caused by the tank shape, in whole percent
    pub fn reduction_percent(&self) -> u32 {
        ((1.0 - self.total) * 100.0).round().max(0.0) as u32
    }
}

/// Compute the design efficiency of a tank.
pub fn design_efficiency(tank: &TankDimensions) -> DesignEfficiency {
    let bottom_profile = bottom_profile_efficiency(tank.curve_depth);
    let corner_radius = corner_radius_efficiency(tank.corner_radius, tank.shortest_side_mm());
    DesignEfficiency {
        bottom_profile,
        corner_radius,
        total: bottom_profile * corner_radius,
    }
}

/// All tank-shape checks for one set of dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankRisk {
    pub depth: RiskBand,
    pub corner_radius: RiskBand,
    pub aspect_ratio: RiskBand,
    pub curve_depth: RiskBand,
    /// Longer over shorter side, absent for a degenerate footprint
    pub aspect_ratio_value: Option<f64>,
    pub efficiency: DesignEfficiency,
}

impl TankRisk {
    /// Worst band across all tank checks
    pub fn worst(&self) -> RiskBand {
        self.depth
            .max(self.corner_radius)
            .max(self.aspect_ratio)
            .max(self.curve_depth)
    }
}

/// Run every tank-shape check.
pub fn assess_tank(tank: &TankDimensions) -> TankRisk {
    let shd = tank.shortest_side_mm();
    TankRisk {
        depth: classify_depth(tank.depth, shd),
        corner_radius: classify_corner_radius(tank.corner_radius, shd),
        aspect_ratio: classify_aspect_ratio(tank.length, tank.width),
        curve_depth: classify_curve_depth(tank.curve_depth),
        aspect_ratio_value: aspect_ratio(tank.length, tank.width),
        efficiency: design_efficiency(tank),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_bands() {
        assert_eq!(classify_depth(500.0, 1000.0), RiskBand::Danger);
        assert_eq!(classify_depth(900.0, 1000.0), RiskBand::Optimal);
        assert_eq!(classify_depth(1000.0, 1000.0), RiskBand::Optimal);
        assert_eq!(classify_depth(1200.0, 1000.0), RiskBand::Caution);
        assert_eq!(classify_depth(1500.0, 1000.0), RiskBand::Caution);
        assert_eq!(classify_depth(1600.0, 1000.0), RiskBand::Danger);
        assert_eq!(classify_depth(800.0, 0.0), RiskBand::Optimal);
    }

    #[test]
    fn test_corner_radius_bands() {
        assert_eq!(classify_corner_radius(40.0, 1000.0), RiskBand::Danger);
        assert_eq!(classify_corner_radius(50.0, 1000.0), RiskBand::Caution);
        assert_eq!(classify_corner_radius(249.0, 1000.0), RiskBand::Caution);
        assert_eq!(classify_corner_radius(250.0, 1000.0), RiskBand::Optimal);
        assert_eq!(classify_corner_radius(500.0, 1000.0), RiskBand::Optimal);
        assert_eq!(classify_corner_radius(501.0, 1000.0), RiskBand::Danger);
        assert_eq!(classify_corner_radius(10.0, 0.0), RiskBand::Optimal);
    }

    #[test]
    fn test_aspect_ratio_bands() {
        assert_eq!(classify_aspect_ratio(1000.0, 1100.0), RiskBand::Caution);
        assert_eq!(classify_aspect_ratio(1000.0, 1200.0), RiskBand::Optimal);
        assert_eq!(classify_aspect_ratio(3000.0, 1000.0), RiskBand::Optimal);
        assert_eq!(classify_aspect_ratio(4000.0, 1000.0), RiskBand::Caution);
        assert_eq!(classify_aspect_ratio(5100.0, 1000.0), RiskBand::Danger);
        assert_eq!(classify_aspect_ratio(0.0, 1000.0), RiskBand::Optimal);
    }

    #[test]
    fn test_curve_depth_bands() {
        assert_eq!(classify_curve_depth(25.0), RiskBand::Danger);
        assert_eq!(classify_curve_depth(26.0), RiskBand::Caution);
        assert_eq!(classify_curve_depth(60.0), RiskBand::Caution);
        assert_eq!(classify_curve_depth(61.0), RiskBand::Optimal);
    }

    #[test]
    fn test_sand_volume_bands() {
        // Target 2000 L for a 1000 L tank
        assert_eq!(classify_sand_volume(500.0, 1000.0), RiskBand::Danger);
        assert_eq!(classify_sand_volume(650.0, 1000.0), RiskBand::Caution);
        assert_eq!(classify_sand_volume(1999.0, 1000.0), RiskBand::Caution);
        assert_eq!(classify_sand_volume(2000.0, 1000.0), RiskBand::Optimal);
        assert_eq!(classify_sand_volume(0.0, 0.0), RiskBand::Optimal);
    }

    #[test]
    fn test_surface_area_bands() {
        // Target 6 m² for a 1000 L tank
        assert_eq!(classify_surface_area(4.7, 1000.0), RiskBand::Danger);
        assert_eq!(classify_surface_area(5.0, 1000.0), RiskBand::Caution);
        assert_eq!(classify_surface_area(5.5, 1000.0), RiskBand::Optimal);
        assert_eq!(classify_surface_area(9.0, 1000.0), RiskBand::Optimal);
        assert_eq!(classify_surface_area(9.5, 1000.0), RiskBand::Caution);
        assert_eq!(classify_surface_area(1.0, 10.0), RiskBand::Optimal);
    }

    #[test]
    fn test_container_volume_is_asymmetric() {
        // Target 2000 L
        assert_eq!(classify_container_volume(1900.0, 1000.0), RiskBand::Optimal);
        assert_eq!(classify_container_volume(1700.0, 1000.0), RiskBand::Caution);
        assert_eq!(classify_container_volume(1300.0, 1000.0), RiskBand::Danger);
        assert_eq!(classify_container_volume(2300.0, 1000.0), RiskBand::Optimal);
        assert_eq!(classify_container_volume(2600.0, 1000.0), RiskBand::Caution);
        assert_eq!(classify_container_volume(3000.0, 1000.0), RiskBand::Danger);
    }

    #[test]
    fn test_container_volume_difference() {
        assert!((container_volume_difference_percent(2400.0, 1000.0) - 20.0).abs() < 1e-9);
        assert!((container_volume_difference_percent(1700.0, 1000.0) + 15.0).abs() < 1e-9);
        assert_eq!(container_volume_difference_percent(500.0, 0.0), 0.0);
    }

    #[test]
    fn test_bottom_profile_efficiency() {
        assert_eq!(bottom_profile_efficiency(0.0), 0.8);
        assert_eq!(bottom_profile_efficiency(25.0), 0.8);
        assert_eq!(bottom_profile_efficiency(60.0), 1.0);
        assert_eq!(bottom_profile_efficiency(100.0), 1.0);
        let mid = bottom_profile_efficiency(42.5);
        assert!((mid - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_corner_radius_efficiency() {
        assert_eq!(corner_radius_efficiency(10.0, 1000.0), 0.7);
        assert_eq!(corner_radius_efficiency(250.0, 1000.0), 1.0);
        let mid = corner_radius_efficiency(150.0, 1000.0);
        assert!((mid - 0.85).abs() < 1e-12);
        assert_eq!(corner_radius_efficiency(0.0, 0.0), 1.0);
    }

    #[test]
    fn test_default_tank_assessment() {
        let risk = assess_tank(&TankDimensions::default());
        // depth 1200 > SHD 1000 but within 1.5×
        assert_eq!(risk.depth, RiskBand::Caution);
        // 320 / 1000 = 0.32
        assert_eq!(risk.corner_radius, RiskBand::Optimal);
        assert_eq!(risk.aspect_ratio, RiskBand::Optimal);
        assert_eq!(risk.curve_depth, RiskBand::Optimal);
        assert_eq!(risk.efficiency.total, 1.0);
        assert_eq!(risk.worst(), RiskBand::Caution);
    }

    #[test]
    fn test_reduction_percent() {
        let tank = TankDimensions {
            curve_depth: 0.0,
            corner_radius: 0.0,
            ..TankDimensions::default()
        };
        let efficiency = design_efficiency(&tank);
        // 0.8 × 0.7 = 0.56
        assert!((efficiency.total - 0.56).abs() < 1e-12);
        assert_eq!(efficiency.reduction_percent(), 44);
    }

    #[test]
    fn test_band_ordering() {
        assert!(RiskBand::Danger > RiskBand::Caution);
        assert_eq!(RiskBand::Optimal.max(RiskBand::Danger), RiskBand::Danger);
        assert_eq!(serde_json::to_string(&RiskBand::Caution).unwrap(), "\"caution\"");
    }
}
