//! # Pump Sizing
//!
//! The pump must move 25–30 % of the tank volume during a 15 minute
//! irrigation cycle, i.e. four cycles per hour:
//!
//! ```text
//! flow_min = V × 0.25 × 4 = V × 1.0   (L/h)
//! flow_max = V × 0.30 × 4 = V × 1.2   (L/h)
//! ```
//!
//! Head height starts at the biofilter container height and follows it until
//! the user sets it by hand.

use serde::{Deserialize, Serialize};

/// Hourly flow as a multiple of tank volume, low end
pub const FLOW_FACTOR_MIN: f64 = 1.0;

/// Hourly flow as a multiple of tank volume, high end
pub const FLOW_FACTOR_MAX: f64 = 1.2;

/// Required pump flow range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpFlow {
    /// Minimum flow (L/h)
    pub min_lph: f64,
    /// Maximum flow (L/h)
    pub max_lph: f64,
}

/// Calculate the required flow range for a tank volume in litres.
pub fn flow_range(tank_volume_liters: f64) -> PumpFlow {
    PumpFlow {
        min_lph: tank_volume_liters * FLOW_FACTOR_MIN,
        max_lph: tank_volume_liters * FLOW_FACTOR_MAX,
    }
}

/// Pump head height with a one-way manual override.
///
/// While `user_modified` is false the head height is the biofilter container
/// height. The first manual edit sets the latch, and from then on biofilter
/// changes no longer move the value. Only a full reset clears it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadHeight {
    /// Manually entered head height (mm); ignored until the latch is set
    pub value_mm: f64,
    pub user_modified: bool,
}

impl HeadHeight {
    /// Record a manual edit and latch the override
    pub fn set_manual(&mut self, value_mm: f64) {
        self.value_mm = value_mm;
        self.user_modified = true;
    }

    /// Follow the biofilter height unless the user has taken over
    pub fn track(&mut self, biofilter_height_mm: f64) {
        if !self.user_modified {
            self.value_mm = biofilter_height_mm;
        }
    }

    /// Effective head height for a given biofilter height (mm)
    pub fn resolve(&self, biofilter_height_mm: f64) -> f64 {
        if self.user_modified {
            self.value_mm
        } else {
            biofilter_height_mm
        }
    }
}

/// Pump requirements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PumpResult {
    pub flow: PumpFlow,
    /// Head height in use (mm)
    pub head_height_mm: f64,
    /// Whether the head height was entered by hand
    pub head_height_overridden: bool,
}

/// Calculate pump requirements.
pub fn calculate(tank_volume_liters: f64, biofilter_height_mm: f64, head: &HeadHeight) -> PumpResult {
    PumpResult {
        flow: flow_range(tank_volume_liters),
        head_height_mm: head.resolve(biofilter_height_mm),
        head_height_overridden: head.user_modified,
    }
}
