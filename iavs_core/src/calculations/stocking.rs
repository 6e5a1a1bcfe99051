//! # Initial Stocking Rate
//!
//! Recommended number of fingerlings (about 15 g each) for a tank, scaled by
//! how well the biofilter matches the tank and by the tank-shape efficiency.
//!
//! ## Algorithm
//!
//! 1. Ideal biofilter area is 6 m² per m³ of tank water.
//! 2. `sufficiency = actual area / ideal area` (1.0 when the ideal is zero).
//! 3. Below 0.98 the rate drops to `sufficiency^1.5`.
//! 4. Above 1.0 a diminishing bonus `1 + √(sufficiency − 1) / 2` applies,
//!    capped at 1.25.
//! 5. Between 0.98 and 1.0 nothing changes, so the advice does not flicker
//!    around the boundary.
//! 6. The result is multiplied by the tank design efficiency and applied to a
//!    base rate of 80–100 fingerlings per m³.

use serde::{Deserialize, Serialize};

use crate::calculations::risk::{DesignEfficiency, IDEAL_AREA_PER_M3};

/// Fingerlings per m³ at the low end of the base rate
pub const BASE_STOCKING_MIN: f64 = 80.0;

/// Fingerlings per m³ at the high end of the base rate
pub const BASE_STOCKING_MAX: f64 = 100.0;

/// Sufficiency below which the undersized penalty applies
pub const UNDERSIZED_THRESHOLD: f64 = 0.98;

/// Upper limit of the oversized-biofilter bonus
pub const MAX_STOCKING_MULTIPLIER: f64 = 1.25;

/// Tanks smaller than this are not recommended for fish (L)
pub const MIN_STOCKABLE_VOLUME_LITERS: f64 = 500.0;

pub const UNDERSIZED_MESSAGE: &str =
    "Note: The rate has been adjusted downwards for safety because the biofilter is undersized.";

pub const OVERSIZED_CAPPED_MESSAGE: &str =
    "Note: The rate has been increased due to an oversized biofilter, providing a stability bonus (capped at +25%).";

pub const OVERSIZED_MESSAGE: &str =
    "Note: The rate has been increased due to an oversized biofilter, providing a stability bonus.";

/// How the biofilter size moved the stocking rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiofilterAdjustment {
    /// Biofilter too small, rate reduced
    Undersized,
    /// Within tolerance, no change
    Matched,
    /// Biofilter larger than needed, rate increased
    Oversized,
    /// Bonus hit the 25 % cap
    OversizedCapped,
}

/// Inputs of the stocking calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockingInput {
    /// Tank volume (L)
    pub tank_volume_liters: f64,
    /// Biofilter sand surface area (m²)
    pub biofilter_surface_area_m2: f64,
    /// Tank-shape efficiency
    pub efficiency: DesignEfficiency,
}

/// Recommended stocking range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockingResult {
    /// Minimum recommended fingerlings
    pub min_stock: u32,
    /// Maximum recommended fingerlings
    pub max_stock: u32,
    /// Explanation of any adjustment, empty when none applies
    pub adjustment_message: String,
    /// Total tank design efficiency applied
    pub design_efficiency: f64,
    /// Actual over ideal biofilter area
    pub sufficiency_ratio: f64,
    /// Multiplier from the biofilter size alone
    pub stocking_multiplier: f64,
    /// Biofilter multiplier times design efficiency
    pub final_multiplier: f64,
    pub adjustment: BiofilterAdjustment,
    /// Tank volume the range was computed for (L)
    pub tank_volume_liters: f64,
}

impl StockingResult {
    /// Whether the tank is too small to stock at all
    pub fn is_tank_too_small(&self) -> bool {
        self.tank_volume_liters < MIN_STOCKABLE_VOLUME_LITERS
    }

    /// Range to show the user: zero for tanks under 500 L.
    ///
    /// `min_stock`/`max_stock` keep the computed values regardless.
    pub fn displayed_range(&self) -> (u32, u32) {
        if self.is_tank_too_small() {
            (0, 0)
        } else {
            (self.min_stock, self.max_stock)
        }
    }
}

/// Multiplier and adjustment kind for a biofilter sufficiency ratio.
pub fn biofilter_multiplier(sufficiency_ratio: f64) -> (f64, BiofilterAdjustment) {
    if sufficiency_ratio < UNDERSIZED_THRESHOLD {
        (sufficiency_ratio.powf(1.5), BiofilterAdjustment::Undersized)
    } else if sufficiency_ratio > 1.0 {
        let bonus = (sufficiency_ratio - 1.0).sqrt() / 2.0;
        let multiplier = 1.0 + bonus;
        if multiplier > MAX_STOCKING_MULTIPLIER {
            (MAX_STOCKING_MULTIPLIER, BiofilterAdjustment::OversizedCapped)
        } else if multiplier > 1.0 {
            (multiplier, BiofilterAdjustment::Oversized)
        } else {
            (1.0, BiofilterAdjustment::Matched)
        }
    } else {
        (1.0, BiofilterAdjustment::Matched)
    }
}

/// Calculate the recommended stocking range.
pub fn calculate(input: &StockingInput) -> StockingResult {
    let tank_m3 = input.tank_volume_liters / 1000.0;
    let ideal_area = tank_m3 * IDEAL_AREA_PER_M3;
    let sufficiency_ratio = if ideal_area > 0.0 {
        input.biofilter_surface_area_m2 / ideal_area
    } else {
        1.0
    };

    let (stocking_multiplier, adjustment) = biofilter_multiplier(sufficiency_ratio);
    let mut message = match adjustment {
        BiofilterAdjustment::Undersized => UNDERSIZED_MESSAGE.to_string(),
        BiofilterAdjustment::Oversized => OVERSIZED_MESSAGE.to_string(),
        BiofilterAdjustment::OversizedCapped => OVERSIZED_CAPPED_MESSAGE.to_string(),
        BiofilterAdjustment::Matched => String::new(),
    };

    let efficiency = input.efficiency.total;
    let final_multiplier = stocking_multiplier * efficiency;

    let min_stock = (BASE_STOCKING_MIN * final_multiplier * tank_m3).round().max(0.0) as u32;
    let max_stock = (BASE_STOCKING_MAX * final_multiplier * tank_m3).round().max(0.0) as u32;

    if efficiency < 1.0 {
        let reduction = format!(
            "Note: The rate has been reduced by {}% due to the tank design (bottom profile and corner radius).",
            input.efficiency.reduction_percent()
        );
        if !message.is_empty() {
            message.push(' ');
        }
        message.push_str(&reduction);
    }

    StockingResult {
        min_stock,
        max_stock,
        adjustment_message: message,
        design_efficiency: efficiency,
        sufficiency_ratio,
        stocking_multiplier,
        final_multiplier,
        adjustment,
        tank_volume_liters: input.tank_volume_liters,
    }
}
