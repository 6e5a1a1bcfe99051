//! # Sand Biofilter Geometry
//!
//! The biofilter is a rectangular sand bed whose bottom drops along its
//! length so water drains toward the deep end. The slope is given in
//! centimetres of drop per metre of length.
//!
//! ```text
//!  inlet                                   outlet
//!    ┌───────────────────────────────────────┐  ─┬─ freeboard
//!    │▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒│   │
//!    │▒▒▒▒▒▒▒▒ sand ▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒│   │ deep depth
//!    └──────────────────────┐▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒▒│   │
//!     shallow depth         └────────────────┘  ─┴─
//! ```
//!
//! The container must be as tall as the deep end plus freeboard; sizing it
//! from the average depth would overflow at the outlet.

use serde::{Deserialize, Serialize};

use crate::calculations::risk::{self, RiskBand};
use crate::errors::{CalcError, CalcResult};
use crate::units::{CubicMeters, Liters, Meters, Millimeters};

/// Dry sand bulk density (tonnes per m³)
pub const SAND_DENSITY_T_PER_M3: f64 = 1.6;

/// Biofilter length beyond which extra drainage is recommended (mm)
pub const LONG_BIOFILTER_MM: f64 = 6000.0;

/// Dimensions of the sand biofilter.
///
/// Lengths are in millimetres; `slope` is centimetres of drop per metre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiofilterDimensions {
    /// Footprint width (mm)
    pub width: f64,
    /// Footprint length, inlet to outlet (mm)
    pub length: f64,
    /// Sand depth at the inlet end (mm)
    pub shallow_depth: f64,
    /// Empty space between sand surface and container rim (mm)
    pub freeboard: f64,
    /// Bottom drop (cm per m of length)
    pub slope: f64,
}

impl Default for BiofilterDimensions {
    fn default() -> Self {
        BiofilterDimensions {
            width: 1200.0,
            length: 5000.0,
            shallow_depth: 300.0,
            freeboard: 0.0,
            slope: 2.0,
        }
    }
}

impl BiofilterDimensions {
    /// Validate raw user input. Zero is accepted everywhere.
    pub fn validate(&self) -> CalcResult<()> {
        for (field, value) in [
            ("width", self.width),
            ("length", self.length),
            ("shallow_depth", self.shallow_depth),
            ("freeboard", self.freeboard),
            ("slope", self.slope),
        ] {
            if !value.is_finite() {
                return Err(CalcError::invalid_input(field, value.to_string(), "Value must be a number"));
            }
            if value < 0.0 {
                return Err(CalcError::invalid_input(field, value.to_string(), "Value cannot be negative"));
            }
        }
        Ok(())
    }

    /// Bottom drop over the whole length (mm)
    pub fn slope_rise_mm(&self) -> f64 {
        self.length * (self.slope / 100.0)
    }

    /// Sand depth at the outlet end (mm).
    ///
    /// Always derived from the shallow depth and slope, never stored.
    pub fn deep_depth_mm(&self) -> f64 {
        self.shallow_depth + self.slope_rise_mm()
    }

    /// Container height at the deepest point, including freeboard (mm)
    pub fn total_container_height_mm(&self) -> f64 {
        self.deep_depth_mm() + self.freeboard
    }

    /// Whether the bed is long enough to need extra drainage
    pub fn needs_extra_drainage(&self) -> bool {
        self.length > LONG_BIOFILTER_MM
    }
}

/// Results of the biofilter calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiofilterResult {
    /// Sand surface area (m²)
    pub surface_area_m2: f64,
    /// Sand depth at the outlet end (mm)
    pub deep_depth_mm: f64,
    /// Container height at the deepest point plus freeboard (mm)
    pub total_container_height_mm: f64,
    /// Volume of the whole container (L)
    pub total_biofilter_volume_liters: f64,
    /// Mean of shallow and deep sand depth (mm)
    pub average_sand_depth_mm: f64,
    /// Sand volume (L)
    pub sand_volume_liters: f64,
    /// Sand weight (t)
    pub sand_weight_tonnes: f64,
    /// Sand weight (kg)
    pub sand_weight_kg: f64,
    /// Target sand volume, twice the tank volume (L)
    pub target_sand_volume_liters: f64,
    /// Target surface area, 6 m² per m³ of tank water
    pub target_surface_area_m2: f64,
    /// Sand volume against its target
    pub sand_volume_band: RiskBand,
    /// Surface area against its target
    pub surface_area_band: RiskBand,
    /// Container volume against twice the tank volume
    pub container_volume_band: RiskBand,
    /// Signed container volume difference from its target (%)
    pub container_volume_difference_percent: f64,
}

/// Calculate the biofilter geometry and compare it with the tank it serves.
///
/// # Arguments
///
/// * `dimensions` - Biofilter dimensions (mm)
/// * `tank_volume_liters` - Volume of the fish tank, used for the target bands
pub fn calculate(dimensions: &BiofilterDimensions, tank_volume_liters: f64) -> BiofilterResult {
    let width = Meters::from(Millimeters(dimensions.width));
    let length = Meters::from(Millimeters(dimensions.length));
    let shallow = Meters::from(Millimeters(dimensions.shallow_depth));
    let freeboard = Meters::from(Millimeters(dimensions.freeboard));
    let slope_m_per_m = dimensions.slope / 100.0;

    let surface_area = width * length;

    let deep = shallow + length * slope_m_per_m;
    let total_height = deep + freeboard;

    let total_volume: Liters = (surface_area * total_height).into();

    let average_sand_depth = (shallow + deep) / 2.0;
    let sand_volume_m3: CubicMeters = surface_area * average_sand_depth;
    let sand_volume: Liters = sand_volume_m3.into();

    let sand_weight_tonnes = sand_volume_m3.0 * SAND_DENSITY_T_PER_M3;

    let target_sand_volume_liters = risk::target_sand_volume_liters(tank_volume_liters);
    let target_surface_area_m2 = risk::target_surface_area_m2(tank_volume_liters);

    BiofilterResult {
        surface_area_m2: surface_area.0,
        deep_depth_mm: Millimeters::from(deep).0,
        total_container_height_mm: Millimeters::from(total_height).0,
        total_biofilter_volume_liters: total_volume.0,
        average_sand_depth_mm: Millimeters::from(average_sand_depth).0,
        sand_volume_liters: sand_volume.0,
        sand_weight_tonnes,
        sand_weight_kg: sand_weight_tonnes * 1000.0,
        target_sand_volume_liters,
        target_surface_area_m2,
        sand_volume_band: risk::classify_sand_volume(sand_volume.0, tank_volume_liters),
        surface_area_band: risk::classify_surface_area(surface_area.0, tank_volume_liters),
        container_volume_band: risk::classify_container_volume(total_volume.0, tank_volume_liters),
        container_volume_difference_percent: risk::container_volume_difference_percent(
            total_volume.0,
            tank_volume_liters,
        ),
    }
}
