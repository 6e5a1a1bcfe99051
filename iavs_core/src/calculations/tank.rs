//! # Fish Tank Geometry
//!
//! Volume and top surface area of a rounded-rectangle tank with a curved
//! bottom.
//!
//! ## Model
//!
//! The footprint is a rectangle whose four corners are replaced by quarter
//! circles of radius `r`, so the four corner squares are swapped for one full
//! circle:
//!
//! ```text
//! A = l·w − 4r² + πr²
//! ```
//!
//! The bottom sags from flat (`curve_depth = 0`) to a deep catenary-like
//! profile (`curve_depth = 100`). The lost water is modelled by a retention
//! factor interpolated linearly from 1.0 down to 0.75. A catenary is fuller
//! than a parabola (2/3), hence the 0.75 floor.
//!
//! ## Example
//!
//! ```rust
//! use iavs_core::calculations::tank::{calculate, TankDimensions};
//!
//! let tank = TankDimensions::default();
//! let result = calculate(&tank);
//! assert!((result.volume_liters - 1000.9).abs() < 0.5);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{CubicMeters, Liters, Meters, Millimeters};

/// Retention factor of a fully curved bottom (curve depth 100 %)
pub const FULL_CURVE_RETENTION: f64 = 0.75;

/// Dimensions of the fish tank.
///
/// Lengths are in millimetres; `curve_depth` is a percentage.
///
/// ## JSON Example
///
/// ```json
/// {
///   "length": 1000.0,
///   "width": 1200.0,
///   "depth": 1200.0,
///   "corner_radius": 320.0,
///   "curve_depth": 100.0
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankDimensions {
    /// Footprint length (mm)
    pub length: f64,
    /// Footprint width (mm)
    pub width: f64,
    /// Maximum water depth at the deepest point (mm)
    pub depth: f64,
    /// Fillet radius of the footprint corners (mm)
    pub corner_radius: f64,
    /// Bottom curvature: 0 = flat, 100 = deepest curve
    pub curve_depth: f64,
}

impl Default for TankDimensions {
    fn default() -> Self {
        TankDimensions {
            length: 1000.0,
            width: 1200.0,
            depth: 1200.0,
            corner_radius: 320.0,
            curve_depth: 100.0,
        }
    }
}

impl TankDimensions {
    /// Validate raw user input.
    ///
    /// The geometry functions never call this; they accept anything and
    /// degrade to zero. Front ends use it to reject typos early.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("length", self.length),
            ("width", self.width),
            ("depth", self.depth),
            ("corner_radius", self.corner_radius),
        ] {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Value must be a number"));
            }
            if value < 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Value cannot be negative"));
            }
        }
        if !(0.0..=100.0).contains(&self.curve_depth) {
            return Err(CalcError::invalid_input(
                "curve_depth",
                self.curve_depth.to_string(),
                "Curve depth must be between 0 and 100 percent",
            ));
        }
        Ok(())
    }

    /// Shorter of length and width (mm)
    pub fn shortest_side_mm(&self) -> f64 {
        self.length.min(self.width)
    }

    /// Largest corner radius that still fits the footprint (mm)
    pub fn max_corner_radius_mm(&self) -> f64 {
        self.shortest_side_mm() / 2.0
    }

    /// Corner radius actually used by the geometry, clamped to half the
    /// shortest side
    pub fn effective_corner_radius_mm(&self) -> f64 {
        self.corner_radius.min(self.max_corner_radius_mm())
    }

    /// Bottom curvature retention factor, 1.0 (flat) to 0.75 (full curve)
    pub fn curve_correction_factor(&self) -> f64 {
        1.0 - (self.curve_depth / 100.0) * (1.0 - FULL_CURVE_RETENTION)
    }
}

/// Results of the tank geometry calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TankResult {
    /// Water volume (L)
    pub volume_liters: f64,
    /// Top surface area of the rounded footprint (m²)
    pub top_surface_area_m2: f64,
    /// Corner radius used after clamping (mm)
    pub effective_corner_radius_mm: f64,
    /// Volume retention factor of the curved bottom
    pub curve_correction_factor: f64,
}

impl TankResult {
    /// Volume in cubic metres
    pub fn volume_m3(&self) -> f64 {
        CubicMeters::from(Liters(self.volume_liters)).0
    }
}

/// Calculate the tank's top surface area and volume.
pub fn calculate(dimensions: &TankDimensions) -> TankResult {
    let r_mm = dimensions.effective_corner_radius_mm();

    let l = Meters::from(Millimeters(dimensions.length));
    let w = Meters::from(Millimeters(dimensions.width));
    let d = Meters::from(Millimeters(dimensions.depth));
    let r = Meters::from(Millimeters(r_mm));

    // Rectangle minus four corner squares plus one circle from the four fillets
    let area = l * w - (r * r) * 4.0 + (r * r) * std::f64::consts::PI;

    let factor = dimensions.curve_correction_factor();
    let volume: Liters = (area * d * factor).into();

    TankResult {
        volume_liters: volume.0,
        top_surface_area_m2: area.0,
        effective_corner_radius_mm: r_mm,
        curve_correction_factor: factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_tank() {
        let result = calculate(&TankDimensions::default());
        let expected_area = 1.0 * 1.2 - 4.0 * 0.32 * 0.32 + std::f64::consts::PI * 0.32 * 0.32;
        assert_relative_eq!(result.top_surface_area_m2, expected_area, max_relative = 1e-12);
        assert!((result.top_surface_area_m2 - 1.112).abs() < 0.001);
        // 1.112 m² × 1.2 m × 0.75 × 1000
        assert!((result.volume_liters - 1000.8).abs() < 0.5);
    }

    #[test]
    fn test_square_corners_give_plain_rectangle() {
        let tank = TankDimensions {
            corner_radius: 0.0,
            ..TankDimensions::default()
        };
        let result = calculate(&tank);
        assert_eq!(result.top_surface_area_m2, 1.0 * 1.2);
    }

    #[test]
    fn test_radius_is_clamped() {
        let tank = TankDimensions {
            length: 800.0,
            width: 2000.0,
            corner_radius: 900.0,
            ..TankDimensions::default()
        };
        let result = calculate(&tank);
        assert_eq!(result.effective_corner_radius_mm, 400.0);
    }

    #[test]
    fn test_flat_bottom_holds_more() {
        let flat = TankDimensions {
            curve_depth: 0.0,
            ..TankDimensions::default()
        };
        let curved = TankDimensions::default();
        let flat_volume = calculate(&flat).volume_liters;
        let curved_volume = calculate(&curved).volume_liters;
        assert!(flat_volume > curved_volume);
        assert_relative_eq!(curved_volume / flat_volume, 0.75, max_relative = 1e-12);
    }

    #[test]
    fn test_half_curve_factor() {
        let tank = TankDimensions {
            curve_depth: 50.0,
            ..TankDimensions::default()
        };
        assert_eq!(tank.curve_correction_factor(), 0.875);
    }

    #[test]
    fn test_zero_width_degenerates() {
        let tank = TankDimensions {
            width: 0.0,
            ..TankDimensions::default()
        };
        let result = calculate(&tank);
        assert_eq!(result.top_surface_area_m2, 0.0);
        assert_eq!(result.volume_liters, 0.0);
    }

    #[test]
    fn test_validation() {
        assert!(TankDimensions::default().validate().is_ok());
        let bad = TankDimensions {
            depth: -1.0,
            ..TankDimensions::default()
        };
        assert!(bad.validate().is_err());
        let bad_curve = TankDimensions {
            curve_depth: 120.0,
            ..TankDimensions::default()
        };
        assert!(bad_curve.validate().is_err());
    }

    #[test]
    fn test_serialization() {
        let tank = TankDimensions::default();
        let json = serde_json::to_string(&tank).unwrap();
        let roundtrip: TankDimensions = serde_json::from_str(&json).unwrap();
        assert_eq!(tank, roundtrip);
    }
}
