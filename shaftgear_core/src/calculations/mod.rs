//! # Design Calculations
//!
//! Each calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable), with `validate()`
//! - `*Result` - Calculation results (JSON-serializable)
//! - `calculate(input, settings) -> Result<*Result, CalcError>` - Pure calculation function
//!
//! Conditions that do not stop a calculation (material substitution,
//! unmet safety targets, search exhaustion) are reported as
//! [`DesignWarning`]s on the result.
//!
//! ## Available Calculations
//!
//! - [`shaft`] - Solid and hollow shaft sizing and verification
//! - [`gear`] - Spur and helical gear pair rating

pub mod gear;
pub mod shaft;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::equations::stress::SafetyFactor;
use crate::errors::CalcResult;
use crate::materials::{self, MaterialLookup};
use crate::report::SummaryTable;
use crate::settings::DesignSettings;

pub use gear::{GearPairInput, GearPairResult, GearType};
pub use shaft::{ShaftInput, ShaftMode, ShaftResult};

/// Non-fatal condition raised while running a calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum DesignWarning {
    /// Requested material is not in the catalog; the default was used
    MaterialFallback { requested: String, used: String },

    /// Hollow diameter search ran out of iterations
    HollowSearchNotConverged { iterations: u32, last_diameter_mm: f64 },

    /// Lateral deflection is above span / ratio
    DeflectionLimitExceeded { deflection_mm: f64, limit_mm: f64 },

    /// A safety factor is below its required value
    BelowTargetSafetyFactor {
        check: String,
        actual: SafetyFactor,
        required: f64,
    },

    /// Tooth count is past the end of the Lewis table
    LewisFactorClamped { member: String, teeth: u32 },
}

impl fmt::Display for DesignWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignWarning::MaterialFallback { requested, used } => {
                write!(f, "Material '{}' not found, using {}", requested, used)
            }
            DesignWarning::HollowSearchNotConverged {
                iterations,
                last_diameter_mm,
            } => write!(
                f,
                "Hollow shaft search did not converge after {} iterations; last diameter {:.1} mm",
                iterations, last_diameter_mm
            ),
            DesignWarning::DeflectionLimitExceeded {
                deflection_mm,
                limit_mm,
            } => write!(
                f,
                "Deflection {:.3} mm exceeds limit {:.3} mm",
                deflection_mm, limit_mm
            ),
            DesignWarning::BelowTargetSafetyFactor {
                check,
                actual,
                required,
            } => write!(
                f,
                "{} safety factor {:.2} is below required {:.1}",
                check, actual, required
            ),
            DesignWarning::LewisFactorClamped { member, teeth } => write!(
                f,
                "{} has {} teeth; Lewis factor clamped to the 300-tooth value",
                member, teeth
            ),
        }
    }
}

/// Catalog lookup that records a [`DesignWarning::MaterialFallback`] when
/// the name is unknown.
pub(crate) fn resolve_material(name: &str, warnings: &mut Vec<DesignWarning>) -> MaterialLookup {
    let found = materials::lookup(name);
    if found.fallback {
        warnings.push(DesignWarning::MaterialFallback {
            requested: name.to_string(),
            used: found.name.to_string(),
        });
    }
    found
}

/// Enum wrapper for all calculation types, stored in projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    Shaft(ShaftInput),
    GearPair(GearPairInput),
}

impl CalculationItem {
    /// Get the user-provided label for this calculation
    pub fn label(&self) -> &str {
        match self {
            CalculationItem::Shaft(s) => &s.label,
            CalculationItem::GearPair(g) => &g.label,
        }
    }

    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Shaft(_) => "Shaft",
            CalculationItem::GearPair(_) => "Gear Pair",
        }
    }

    /// Run the calculation this item describes
    pub fn evaluate(&self, settings: &DesignSettings) -> CalcResult<CalculationOutcome> {
        let outcome = match self {
            CalculationItem::Shaft(input) => {
                let result = shaft::calculate(input, settings)?;
                CalculationOutcome {
                    label: input.label.clone(),
                    calc_type: self.calc_type().to_string(),
                    passes: result.passes(),
                    summary: result.summary(input),
                    safety: result.safety_rows(),
                    warnings: result.warnings.clone(),
                    result: CalculationResult::Shaft(result),
                }
            }
            CalculationItem::GearPair(input) => {
                let result = gear::calculate(input, settings)?;
                CalculationOutcome {
                    label: input.label.clone(),
                    calc_type: self.calc_type().to_string(),
                    passes: result.passes(),
                    summary: result.summary(input),
                    safety: result.safety_rows(),
                    warnings: result.warnings.clone(),
                    result: CalculationResult::GearPair(result),
                }
            }
        };
        Ok(outcome)
    }
}

/// Typed result of either engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationResult {
    Shaft(ShaftResult),
    GearPair(GearPairResult),
}

/// A calculation's result together with its report tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationOutcome {
    pub label: String,
    pub calc_type: String,
    pub passes: bool,
    pub summary: SummaryTable,
    pub safety: SummaryTable,
    pub warnings: Vec<DesignWarning>,
    pub result: CalculationResult,
}

impl CalculationOutcome {
    /// Names of the materials the calculation used, without duplicates
    pub fn material_names(&self) -> Vec<&str> {
        match &self.result {
            CalculationResult::Shaft(r) => vec![r.material.as_str()],
            CalculationResult::GearPair(r) if r.pinion_material == r.gear_material => {
                vec![r.pinion_material.as_str()]
            }
            CalculationResult::GearPair(r) => vec![r.pinion_material.as_str(), r.gear_material.as_str()],
        }
    }

    /// Warnings rendered as text lines
    pub fn warning_lines(&self) -> Vec<String> {
        self.warnings.iter().map(ToString::to_string).collect()
    }
}
