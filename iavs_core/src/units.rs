//! # Unit Types
//!
//! Display units and lightweight quantity wrappers.
//!
//! ## Canonical Units
//!
//! Every dimension is stored in millimetres and every volume in litres. The
//! active display [`Unit`] only matters at the edges: when a front end turns a
//! typed value into millimetres, and when results are shown back to the user.
//!
//! - Length: millimetres (mm) internally; m, cm, in or ft for display
//! - Area: square metres (m²)
//! - Volume: litres (L); US gallons for display in imperial units
//!
//! ## Example
//!
//! ```rust
//! use iavs_core::units::{Meters, Millimeters, Unit};
//!
//! let length_mm = Unit::Ft.to_mm(2.0);
//! assert!((length_mm - 609.6).abs() < 1e-9);
//!
//! let m: Meters = Millimeters(1200.0).into();
//! assert_eq!(m.0, 1.2);
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CalcError;

/// Litres in one US gallon
pub const LITERS_PER_GALLON: f64 = 3.78541;

// ============================================================================
// Display Units
// ============================================================================

/// Display unit selected by the user.
///
/// Serializes as its symbol (`"m"`, `"cm"`, `"in"`, `"ft"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    #[serde(rename = "m")]
    M,
    #[serde(rename = "cm")]
    Cm,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "ft")]
    Ft,
}

/// Fixed conversion data for one display unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSpec {
    /// Millimetres per one display unit
    pub mm_per_unit: f64,
    /// Human-readable name, e.g. "Meters (m)"
    pub name: &'static str,
    /// Liner overlap margin applied when the unit becomes active, in this unit
    pub default_overlap: f64,
    /// Decimal places used when printing lengths in this unit
    pub precision: usize,
}

const METERS: UnitSpec = UnitSpec {
    mm_per_unit: 1000.0,
    name: "Meters (m)",
    default_overlap: 0.2,
    precision: 2,
};

const CENTIMETERS: UnitSpec = UnitSpec {
    mm_per_unit: 10.0,
    name: "Centimeters (cm)",
    default_overlap: 20.0,
    precision: 1,
};

const INCHES: UnitSpec = UnitSpec {
    mm_per_unit: 25.4,
    name: "Inches (in)",
    default_overlap: 8.0,
    precision: 1,
};

const FEET: UnitSpec = UnitSpec {
    mm_per_unit: 304.8,
    name: "Feet (ft)",
    default_overlap: 0.7,
    precision: 2,
};

impl Unit {
    /// All units in menu order
    pub const ALL: [Unit; 4] = [Unit::M, Unit::Cm, Unit::In, Unit::Ft];

    /// Conversion data for this unit
    pub fn spec(self) -> &'static UnitSpec {
        match self {
            Unit::M => &METERS,
            Unit::Cm => &CENTIMETERS,
            Unit::In => &INCHES,
            Unit::Ft => &FEET,
        }
    }

    /// Short symbol used in labels and JSON
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::M => "m",
            Unit::Cm => "cm",
            Unit::In => "in",
            Unit::Ft => "ft",
        }
    }

    /// Convert a value in this unit to millimetres
    pub fn to_mm(self, value: f64) -> f64 {
        value * self.spec().mm_per_unit
    }

    /// Convert millimetres to this unit
    pub fn from_mm(self, mm: f64) -> f64 {
        mm / self.spec().mm_per_unit
    }

    /// Default liner overlap margin, expressed in this unit
    pub fn default_overlap(self) -> f64 {
        self.spec().default_overlap
    }

    /// Whether volumes are shown in litres (metric) or gallons (imperial)
    pub fn is_metric(self) -> bool {
        matches!(self, Unit::M | Unit::Cm)
    }

    /// Volume label for this unit system
    pub fn volume_label(self) -> &'static str {
        if self.is_metric() { "Liters" } else { "Gallons" }
    }

    /// Convert canonical litres to the display volume for this unit system
    pub fn display_volume(self, liters: f64) -> f64 {
        if self.is_metric() {
            liters
        } else {
            UsGallons::from(Liters(liters)).0
        }
    }

    /// Area label for this unit system
    pub fn area_label(self) -> &'static str {
        if self.is_metric() { "m²" } else { "ft²" }
    }

    /// Convert canonical m² to the display area for this unit system
    pub fn display_area(self, square_meters: f64) -> f64 {
        if self.is_metric() {
            square_meters
        } else {
            let mm_per_foot = FEET.mm_per_unit;
            square_meters * 1_000_000.0 / (mm_per_foot * mm_per_foot)
        }
    }

    /// Format an m² area for this unit system, e.g. `"64.58 ft²"`
    pub fn format_area(self, square_meters: f64) -> String {
        format!("{:.2} {}", self.display_area(square_meters), self.area_label())
    }

    /// Format a millimetre length in this unit, e.g. `"1.20 m"`
    pub fn format_length(self, mm: f64) -> String {
        format!("{:.*} {}", self.spec().precision, self.from_mm(mm), self.symbol())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" => Ok(Unit::M),
            "cm" => Ok(Unit::Cm),
            "in" => Ok(Unit::In),
            "ft" => Ok(Unit::Ft),
            other => Err(CalcError::unknown_unit(other)),
        }
    }
}

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Area Units
// ============================================================================

/// Area in square metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

impl Mul<Meters> for Meters {
    type Output = SquareMeters;
    fn mul(self, rhs: Meters) -> SquareMeters {
        SquareMeters(self.0 * rhs.0)
    }
}

// ============================================================================
// Volume Units
// ============================================================================

/// Volume in cubic metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

/// Volume in litres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liters(pub f64);

/// Volume in US gallons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsGallons(pub f64);

impl Mul<Meters> for SquareMeters {
    type Output = CubicMeters;
    fn mul(self, rhs: Meters) -> CubicMeters {
        CubicMeters(self.0 * rhs.0)
    }
}

impl From<CubicMeters> for Liters {
    fn from(m3: CubicMeters) -> Self {
        Liters(m3.0 * 1000.0)
    }
}

impl From<Liters> for CubicMeters {
    fn from(l: Liters) -> Self {
        CubicMeters(l.0 / 1000.0)
    }
}

impl From<Liters> for UsGallons {
    fn from(l: Liters) -> Self {
        UsGallons(l.0 / LITERS_PER_GALLON)
    }
}

impl From<UsGallons> for Liters {
    fn from(gal: UsGallons) -> Self {
        Liters(gal.0 * LITERS_PER_GALLON)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(SquareMeters);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(Liters);
impl_arithmetic!(UsGallons);
