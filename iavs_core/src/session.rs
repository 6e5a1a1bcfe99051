//! # Design Session
//!
//! Mutable state behind an interactive front end: the dimensions, the active
//! unit, the liner knobs and the head-height latch. Every derived value comes
//! from [`DesignSession::summary`], which runs the pure calculation on the
//! current state.
//!
//! Dimensions are stored in millimetres. Setters take values in the active
//! display unit, except curve depth (percent) and slope (cm per m), which are
//! stored as entered.
//!
//! ## Example
//!
//! ```rust
//! use iavs_core::session::{DesignSession, TankField};
//! use iavs_core::units::Unit;
//!
//! let mut session = DesignSession::new();
//! session.set_unit(Unit::Cm);
//! session.set_tank_field(TankField::Depth, 90.0).unwrap();
//! assert_eq!(session.tank().depth, 900.0);
//!
//! let summary = session.summary();
//! assert_eq!(summary.display.volume_label, "Liters");
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::biofilter::BiofilterDimensions;
use crate::calculations::pump::HeadHeight;
use crate::calculations::summary::{self, DesignInput, DesignSummary};
use crate::calculations::tank::TankDimensions;
use crate::errors::{CalcError, CalcResult};
use crate::settings::DesignSettings;
use crate::units::Unit;

/// Editable tank input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TankField {
    Length,
    Width,
    Depth,
    CornerRadius,
    /// Percent, never unit-converted
    CurveDepth,
}

/// Editable biofilter input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiofilterField {
    Width,
    Length,
    ShallowDepth,
    Freeboard,
    /// cm per m, never unit-converted
    Slope,
}

/// The whole editable state of one design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSession {
    tank: TankDimensions,
    biofilter: BiofilterDimensions,
    settings: DesignSettings,
    head_height: HeadHeight,
}

impl Default for DesignSession {
    fn default() -> Self {
        let biofilter = BiofilterDimensions::default();
        let mut head_height = HeadHeight::default();
        head_height.track(biofilter.total_container_height_mm());
        DesignSession {
            tank: TankDimensions::default(),
            biofilter,
            settings: DesignSettings::default(),
            head_height,
        }
    }
}

impl DesignSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tank(&self) -> &TankDimensions {
        &self.tank
    }

    pub fn biofilter(&self) -> &BiofilterDimensions {
        &self.biofilter
    }

    pub fn settings(&self) -> &DesignSettings {
        &self.settings
    }

    pub fn unit(&self) -> Unit {
        self.settings.unit
    }

    pub fn head_height(&self) -> &HeadHeight {
        &self.head_height
    }

    /// Current value of a tank field in the display unit
    pub fn tank_field(&self, field: TankField) -> f64 {
        let unit = self.unit();
        match field {
            TankField::Length => unit.from_mm(self.tank.length),
            TankField::Width => unit.from_mm(self.tank.width),
            TankField::Depth => unit.from_mm(self.tank.depth),
            TankField::CornerRadius => unit.from_mm(self.tank.corner_radius),
            TankField::CurveDepth => self.tank.curve_depth,
        }
    }

    /// Current value of a biofilter field in the display unit
    pub fn biofilter_field(&self, field: BiofilterField) -> f64 {
        let unit = self.unit();
        match field {
            BiofilterField::Width => unit.from_mm(self.biofilter.width),
            BiofilterField::Length => unit.from_mm(self.biofilter.length),
            BiofilterField::ShallowDepth => unit.from_mm(self.biofilter.shallow_depth),
            BiofilterField::Freeboard => unit.from_mm(self.biofilter.freeboard),
            BiofilterField::Slope => self.biofilter.slope,
        }
    }

    /// Set a tank field from a display-unit value.
    ///
    /// The state is left unchanged if the new dimensions do not validate.
    pub fn set_tank_field(&mut self, field: TankField, value: f64) -> CalcResult<()> {
        let unit = self.unit();
        let mut tank = self.tank;
        match field {
            TankField::Length => tank.length = unit.to_mm(value),
            TankField::Width => tank.width = unit.to_mm(value),
            TankField::Depth => tank.depth = unit.to_mm(value),
            TankField::CornerRadius => tank.corner_radius = unit.to_mm(value),
            TankField::CurveDepth => tank.curve_depth = value,
        }
        tank.validate()?;
        self.tank = tank;
        Ok(())
    }

    /// Set a biofilter field from a display-unit value.
    ///
    /// The head height follows the new container height unless it has been
    /// set by hand.
    pub fn set_biofilter_field(&mut self, field: BiofilterField, value: f64) -> CalcResult<()> {
        let unit = self.unit();
        let mut biofilter = self.biofilter;
        match field {
            BiofilterField::Width => biofilter.width = unit.to_mm(value),
            BiofilterField::Length => biofilter.length = unit.to_mm(value),
            BiofilterField::ShallowDepth => biofilter.shallow_depth = unit.to_mm(value),
            BiofilterField::Freeboard => biofilter.freeboard = unit.to_mm(value),
            BiofilterField::Slope => biofilter.slope = value,
        }
        biofilter.validate()?;
        self.biofilter = biofilter;
        self.head_height.track(biofilter.total_container_height_mm());
        Ok(())
    }

    /// Switch the display unit.
    ///
    /// Stored dimensions are untouched. Both overlap margins are reset to the
    /// new unit's default, keeping their enabled flags.
    pub fn set_unit(&mut self, unit: Unit) {
        if unit == self.settings.unit {
            return;
        }
        debug!(from = %self.settings.unit, to = %unit, "switching display unit");
        self.settings.unit = unit;
        self.settings.tank_overlap.amount = unit.default_overlap();
        self.settings.biofilter_overlap.amount = unit.default_overlap();
    }

    pub fn set_tank_overlap_enabled(&mut self, enabled: bool) {
        self.settings.tank_overlap.enabled = enabled;
    }

    pub fn set_biofilter_overlap_enabled(&mut self, enabled: bool) {
        self.settings.biofilter_overlap.enabled = enabled;
    }

    /// Tank liner overlap in the display unit
    pub fn set_tank_overlap_amount(&mut self, amount: f64) -> CalcResult<()> {
        self.settings.tank_overlap.amount = non_negative("tank_overlap", amount)?;
        Ok(())
    }

    /// Biofilter liner overlap in the display unit
    pub fn set_biofilter_overlap_amount(&mut self, amount: f64) -> CalcResult<()> {
        self.settings.biofilter_overlap.amount = non_negative("biofilter_overlap", amount)?;
        Ok(())
    }

    pub fn set_pricing_enabled(&mut self, enabled: bool) {
        self.settings.pricing.enabled = enabled;
    }

    /// Liner price per square display unit
    pub fn set_price(&mut self, price_per_unit_area: f64) -> CalcResult<()> {
        self.settings.pricing.price_per_unit_area = non_negative("price", price_per_unit_area)?;
        Ok(())
    }

    /// Set the pump head height in the display unit and latch the override.
    pub fn set_head_height(&mut self, value: f64) -> CalcResult<()> {
        let value = non_negative("head_height", value)?;
        let latched = !self.head_height.user_modified;
        self.head_height.set_manual(self.unit().to_mm(value));
        if latched {
            debug!(head_height_mm = self.head_height.value_mm, "head height set manually");
        }
        Ok(())
    }

    /// Restore every input, including the unit, and clear the head-height
    /// latch.
    pub fn reset_to_defaults(&mut self) {
        debug!("resetting design to defaults");
        *self = DesignSession::default();
    }

    /// Calculation input for the current state
    pub fn input(&self) -> DesignInput {
        DesignInput {
            tank: self.tank,
            biofilter: self.biofilter,
            unit: self.settings.unit,
            tank_overlap: self.settings.tank_overlap,
            biofilter_overlap: self.settings.biofilter_overlap,
            pricing: self.settings.pricing,
            head_height: self.head_height,
        }
    }

    /// Recompute every derived value
    pub fn summary(&self) -> DesignSummary {
        summary::calculate(&self.input())
    }
}

fn non_negative(field: &str, value: f64) -> CalcResult<f64> {
    if !value.is_finite() {
        return Err(CalcError::invalid_input(field, value.to_string(), "Value must be a number"));
    }
    if value < 0.0 {
        return Err(CalcError::invalid_input(field, value.to_string(), "Value cannot be negative"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let session = DesignSession::new();
        assert_eq!(session.unit(), Unit::M);
        assert_eq!(session.head_height().value_mm, 400.0);
        assert!(!session.head_height().user_modified);
        let input = session.input();
        assert_eq!(input.tank, DesignInput::default().tank);
        assert_eq!(input.biofilter, DesignInput::default().biofilter);
    }

    #[test]
    fn test_set_field_converts_units() {
        let mut session = DesignSession::new();
        session.set_unit(Unit::Ft);
        session.set_tank_field(TankField::Length, 5.0).unwrap();
        assert!((session.tank().length - 1524.0).abs() < 1e-9);
        assert!((session.tank_field(TankField::Length) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_curve_and_slope_are_not_converted() {
        let mut session = DesignSession::new();
        session.set_unit(Unit::In);
        session.set_tank_field(TankField::CurveDepth, 40.0).unwrap();
        session.set_biofilter_field(BiofilterField::Slope, 3.0).unwrap();
        assert_eq!(session.tank().curve_depth, 40.0);
        assert_eq!(session.biofilter().slope, 3.0);
        assert_eq!(session.biofilter_field(BiofilterField::Slope), 3.0);
    }

    #[test]
    fn test_invalid_field_leaves_state() {
        let mut session = DesignSession::new();
        let before = *session.tank();
        let err = session.set_tank_field(TankField::CurveDepth, 150.0).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(session.set_tank_field(TankField::Width, -1.0).is_err());
        assert!(session.set_tank_field(TankField::Depth, f64::NAN).is_err());
        assert_eq!(*session.tank(), before);
    }

    #[test]
    fn test_unit_switch_resets_overlap() {
        let mut session = DesignSession::new();
        session.set_tank_overlap_amount(0.5).unwrap();
        session.set_biofilter_overlap_enabled(false);
        session.set_unit(Unit::Cm);

        assert_eq!(session.settings().tank_overlap.amount, 20.0);
        assert_eq!(session.settings().biofilter_overlap.amount, 20.0);
        assert!(!session.settings().biofilter_overlap.enabled);
        // dimensions are stored in mm and do not move
        assert_eq!(session.tank().length, 1000.0);
    }

    #[test]
    fn test_same_unit_keeps_overlap() {
        let mut session = DesignSession::new();
        session.set_tank_overlap_amount(0.5).unwrap();
        session.set_unit(Unit::M);
        assert_eq!(session.settings().tank_overlap.amount, 0.5);
    }

    #[test]
    fn test_head_height_tracks_biofilter() {
        let mut session = DesignSession::new();
        session.set_biofilter_field(BiofilterField::Freeboard, 0.1).unwrap();
        // 400 mm deep end plus 100 mm freeboard
        assert!((session.head_height().value_mm - 500.0).abs() < 1e-9);
        assert!((session.summary().pump.head_height_mm - 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_head_height_latch() {
        let mut session = DesignSession::new();
        session.set_head_height(1.5).unwrap();
        session.set_biofilter_field(BiofilterField::Freeboard, 0.2).unwrap();
        assert_eq!(session.summary().pump.head_height_mm, 1500.0);

        // switching unit does not move a stored head height
        session.set_unit(Unit::Ft);
        assert_eq!(session.summary().pump.head_height_mm, 1500.0);

        session.reset_to_defaults();
        assert!(!session.head_height().user_modified);
        assert_eq!(session.unit(), Unit::M);
        assert_eq!(session.summary().pump.head_height_mm, 400.0);
    }

    #[test]
    fn test_pricing() {
        let mut session = DesignSession::new();
        session.set_pricing_enabled(true);
        session.set_price(2.0).unwrap();
        assert!(session.set_price(-1.0).is_err());
        let costs = session.summary().liner_costs;
        assert!(costs.tank.is_some());
        assert!(costs.combined_sheet.is_some());
    }

    #[test]
    fn test_session_json() {
        let mut session = DesignSession::new();
        session.set_head_height(1.0).unwrap();
        let json = serde_json::to_string(&session).unwrap();
        let parsed: DesignSession = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, session);
    }
}
