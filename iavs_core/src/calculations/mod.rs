//! # iAVs Sizing Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Dimensions` / `*Input` - Input parameters (JSON-serializable)
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input) -> *Result` - Pure calculation function
//!
//! Inputs are validated once at the boundary (see
//! [`TankDimensions::validate`]); the calculations themselves never fail.
//!
//! ## Available Calculations
//!
//! - [`tank`] - Fish tank volume and surface area
//! - [`biofilter`] - Sand bed geometry, volume and weight
//! - [`risk`] - Design-risk bands and tank-shape efficiency
//! - [`liner`] - Liner sheets, combined sheet and costs
//! - [`stocking`] - Initial fingerling stocking range
//! - [`pump`] - Pump flow range and head height
//! - [`summary`] - All of the above in one pass

pub mod biofilter;
pub mod liner;
pub mod pump;
pub mod risk;
pub mod stocking;
pub mod summary;
pub mod tank;

// Re-export commonly used types
pub use biofilter::{BiofilterDimensions, BiofilterResult};
pub use liner::{LinerCosts, LinerDimensions, LinerOverlap, LinerPricing, LinerSet, SheetLayout};
pub use pump::{HeadHeight, PumpFlow, PumpResult};
pub use risk::{DesignEfficiency, RiskBand, TankRisk};
pub use stocking::{BiofilterAdjustment, StockingInput, StockingResult};
pub use summary::{DesignInput, DesignSummary, DesignWarning, DisplayValues};
pub use tank::{TankDimensions, TankResult};
