//! # Design Settings
//!
//! Tunable parameters of the design engines. Defaults reproduce the
//! standard behaviour; a project file or a `--config` JSON file can override
//! them.
//!
//! ```rust
//! use shaftgear_core::settings::DesignSettings;
//!
//! let settings: DesignSettings = serde_json::from_str(r#"{"deflection_limit_ratio": 360.0}"#).unwrap();
//! assert_eq!(settings.deflection_limit_ratio, 360.0);
//! assert_eq!(settings.hollow_search.max_iterations, 100);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{require_positive, CalcError, CalcResult};
use crate::materials::{self, DEFAULT_MATERIAL};

/// Engine-wide settings, stored with each project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignSettings {
    /// Allowable lateral deflection is span / this ratio
    pub deflection_limit_ratio: f64,

    /// Hollow-shaft diameter search parameters
    pub hollow_search: HollowSearch,

    /// Material used when an input leaves its material blank
    pub default_material: String,
}

impl Default for DesignSettings {
    fn default() -> Self {
        DesignSettings {
            deflection_limit_ratio: 250.0,
            hollow_search: HollowSearch::default(),
            default_material: DEFAULT_MATERIAL.to_string(),
        }
    }
}

impl DesignSettings {
    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> CalcResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let settings: DesignSettings = serde_json::from_str(&text).map_err(CalcError::serialization)?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), "loaded design settings");
        Ok(settings)
    }

    /// Check every numeric parameter is usable.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("deflection_limit_ratio", self.deflection_limit_ratio)?;
        self.hollow_search.validate()?;
        materials::try_lookup(&self.default_material)?;
        Ok(())
    }

    /// Resolve a requested material name, substituting the default for blanks
    pub fn material_name<'a>(&'a self, requested: &'a str) -> &'a str {
        if requested.trim().is_empty() {
            &self.default_material
        } else {
            requested
        }
    }
}

/// Upper bound accepted for [`HollowSearch::max_iterations`]
pub const MAX_HOLLOW_ITERATIONS: u32 = 10_000;

/// Bounded linear search used to size hollow shafts.
///
/// Candidates start at `inner + initial_clearance_mm` and grow by
/// `step_mm` for at most `max_iterations` steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HollowSearch {
    pub step_mm: f64,
    pub max_iterations: u32,
    pub initial_clearance_mm: f64,
}

impl Default for HollowSearch {
    fn default() -> Self {
        HollowSearch {
            step_mm: 0.1,
            max_iterations: 100,
            initial_clearance_mm: 10.0,
        }
    }
}

impl HollowSearch {
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("hollow_search.step_mm", self.step_mm)?;
        require_positive("hollow_search.initial_clearance_mm", self.initial_clearance_mm)?;
        if self.max_iterations == 0 || self.max_iterations > MAX_HOLLOW_ITERATIONS {
            return Err(CalcError::invalid_input(
                "hollow_search.max_iterations",
                self.max_iterations.to_string(),
                format!("Iteration count must be between 1 and {}", MAX_HOLLOW_ITERATIONS),
            ));
        }
        Ok(())
    }
}
