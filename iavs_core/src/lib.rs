//! # iavs_core - iAVs System Sizing Engine
//!
//! `iavs_core` sizes an integrated Aqua-Vegeculture system: a fish tank paired
//! with a sloped sand biofilter. From the tank and biofilter dimensions it
//! derives volumes, sand quantities, liner sheets and costs, an initial fish
//! stocking range, pump requirements, and design-risk ratings. All inputs and
//! outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Canonical units**: Millimetres, litres and m² inside; display units at the edge
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Total**: Degenerate geometry yields zero or a neutral rating, never a panic
//!
//! ## Quick Start
//!
//! ```rust
//! use iavs_core::calculations::summary::{calculate, DesignInput};
//!
//! let summary = calculate(&DesignInput::default());
//! println!("Tank volume: {:.0} L", summary.tank.volume_liters);
//! println!("Stock {} to {} fingerlings", summary.stocking.min_stock, summary.stocking.max_stock);
//!
//! // Serialize to JSON for a front end
//! let json = serde_json::to_string_pretty(&summary).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Tank, biofilter, liner, stocking, pump and risk calculations
//! - [`session`] - Mutable design state for interactive front ends
//! - [`settings`] - Input ranges and non-dimensional settings
//! - [`units`] - Display units and type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`pdf`] - PDF summary report

pub mod calculations;
pub mod errors;
pub mod pdf;
pub mod session;
pub mod settings;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::summary::{calculate, DesignInput, DesignSummary, DesignWarning};
pub use errors::{CalcError, CalcResult};
pub use session::{BiofilterField, DesignSession, TankField};
pub use settings::DesignSettings;
pub use units::Unit;
