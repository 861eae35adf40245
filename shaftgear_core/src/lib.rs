//! # shaftgear_core - Shaft and Gear Design Engine
//!
//! `shaftgear_core` sizes and checks power-transmission shafts and rates spur
//! and helical gear pairs. All inputs and outputs are JSON-serializable, so
//! the same types drive the command line, project files and exports.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//! - **Warnings, not failures**: Unmet targets are reported on the result
//!
//! ## Quick Start
//!
//! ```rust
//! use shaftgear_core::calculations::shaft::{calculate, ShaftInput};
//! use shaftgear_core::settings::DesignSettings;
//!
//! let input = ShaftInput {
//!     label: "Input shaft".to_string(),
//!     torque_nm: 1000.0,
//!     bending_moment_nm: 500.0,
//!     axial_force_n: 0.0,
//!     length_mm: 500.0,
//!     outer_diameter_mm: None,
//!     inner_diameter_mm: 0.0,
//!     material: "AISI 1045 Steel".to_string(),
//!     target_safety_factor: 2.0,
//! };
//! let result = calculate(&input, &DesignSettings::default()).unwrap();
//! assert!((result.outer_diameter_mm - 38.98).abs() < 0.01);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Shaft and gear pipelines, project items
//! - [`equations`] - Closed-form section, stress, fatigue and gear formulas
//! - [`materials`] - Engineering material catalog
//! - [`units`] - Type-safe unit wrappers and conversion
//! - [`settings`] - Tunable design parameters
//! - [`report`] - Summary tables and CSV/JSON/text export
//! - [`project`] - Project container and metadata
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod materials;
pub mod project;
pub mod report;
pub mod settings;
pub mod units;

pub use calculations::{CalculationItem, CalculationOutcome, DesignWarning};
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock};
pub use project::{Project, ProjectMetadata};
pub use settings::DesignSettings;
