//! # Materials Database
//!
//! Read-only catalog of engineering materials for shafts and gears, with
//! name lookup, listing and category filtering.
//!
//! ## Lookup Policy
//!
//! [`lookup`] never fails: an unknown name resolves to
//! [`DEFAULT_MATERIAL`] (AISI 1045 Steel) and the returned
//! [`MaterialLookup`] records that a fallback happened. Callers that must not
//! silently substitute a material use [`try_lookup`] instead.
//!
//! ## Example
//!
//! ```rust
//! use shaftgear_core::materials::{lookup, list_all, MaterialCategory, filter_by_category};
//!
//! let steel = lookup("AISI 4140 Steel");
//! assert!(!steel.fallback);
//! assert_eq!(steel.properties.yield_mpa(), 415.0);
//!
//! let unknown = lookup("Unobtainium");
//! assert!(unknown.fallback);
//! assert_eq!(unknown.name, "AISI 1045 Steel");
//!
//! assert_eq!(list_all().len(), 15);
//! assert_eq!(filter_by_category(MaterialCategory::CastIron).len(), 2);
//! ```

pub mod catalog;

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::units::{Megapascals, Pascals};

pub use catalog::{CatalogEntry, CATALOG, DEFAULT_MATERIAL};

/// Material family, as shown in the catalog browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaterialCategory {
    #[serde(rename = "Carbon Steel")]
    CarbonSteel,
    #[serde(rename = "Alloy Steel")]
    AlloySteel,
    #[serde(rename = "Stainless Steel")]
    StainlessSteel,
    #[serde(rename = "Precipitation Hardening Steel")]
    PrecipitationHardeningSteel,
    #[serde(rename = "Aluminum Alloy")]
    AluminumAlloy,
    #[serde(rename = "Titanium Alloy")]
    TitaniumAlloy,
    #[serde(rename = "Copper Alloy")]
    CopperAlloy,
    #[serde(rename = "Cast Iron")]
    CastIron,
    #[serde(rename = "Superalloy")]
    Superalloy,
    #[serde(rename = "Tool Steel")]
    ToolSteel,
}

impl MaterialCategory {
    /// All categories for UI selection
    pub const ALL: [MaterialCategory; 10] = [
        MaterialCategory::CarbonSteel,
        MaterialCategory::AlloySteel,
        MaterialCategory::StainlessSteel,
        MaterialCategory::PrecipitationHardeningSteel,
        MaterialCategory::AluminumAlloy,
        MaterialCategory::TitaniumAlloy,
        MaterialCategory::CopperAlloy,
        MaterialCategory::CastIron,
        MaterialCategory::Superalloy,
        MaterialCategory::ToolSteel,
    ];

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            MaterialCategory::CarbonSteel => "Carbon Steel",
            MaterialCategory::AlloySteel => "Alloy Steel",
            MaterialCategory::StainlessSteel => "Stainless Steel",
            MaterialCategory::PrecipitationHardeningSteel => "Precipitation Hardening Steel",
            MaterialCategory::AluminumAlloy => "Aluminum Alloy",
            MaterialCategory::TitaniumAlloy => "Titanium Alloy",
            MaterialCategory::CopperAlloy => "Copper Alloy",
            MaterialCategory::CastIron => "Cast Iron",
            MaterialCategory::Superalloy => "Superalloy",
            MaterialCategory::ToolSteel => "Tool Steel",
        }
    }

    /// Parse from the display name, ignoring case and surrounding whitespace
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let wanted = s.trim();
        MaterialCategory::ALL
            .iter()
            .copied()
            .find(|c| c.display_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CalcError::invalid_input("category", s, "Unknown material category"))
    }
}

impl fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Mechanical properties of one material (SI units).
///
/// Immutable once the catalog is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// Tensile yield strength Sy (Pa)
    pub yield_strength_pa: f64,
    /// Ultimate tensile strength Su (Pa)
    pub ultimate_strength_pa: f64,
    /// Young's modulus E (Pa)
    pub elastic_modulus_pa: f64,
    /// Poisson's ratio ν
    pub poisson_ratio: f64,
    /// Density ρ (kg/m³)
    pub density_kg_m3: f64,
    /// Fatigue strength at 10⁶ cycles Se (Pa)
    pub fatigue_strength_pa: f64,
    /// Brinell hardness (HB)
    pub hardness_hb: f64,
    /// Material family
    pub category: MaterialCategory,
}

impl MaterialProperties {
    /// Shear modulus G = E / (2(1 + ν)) in Pa
    pub fn shear_modulus_pa(&self) -> f64 {
        self.elastic_modulus_pa / (2.0 * (1.0 + self.poisson_ratio))
    }

    /// Yield strength as a typed unit
    pub fn yield_strength(&self) -> Pascals {
        Pascals(self.yield_strength_pa)
    }

    /// Yield strength in MPa (the unit gear stresses are computed in)
    pub fn yield_mpa(&self) -> f64 {
        Megapascals::from(self.yield_strength()).0
    }

    /// Ultimate strength in MPa
    pub fn ultimate_mpa(&self) -> f64 {
        Megapascals::from(Pascals(self.ultimate_strength_pa)).0
    }

    /// Young's modulus in MPa
    pub fn elastic_modulus_mpa(&self) -> f64 {
        Megapascals::from(Pascals(self.elastic_modulus_pa)).0
    }

    /// Young's modulus in GPa
    pub fn elastic_modulus_gpa(&self) -> f64 {
        self.elastic_modulus_pa / 1e9
    }

    /// Fatigue strength in MPa
    pub fn fatigue_mpa(&self) -> f64 {
        Megapascals::from(Pascals(self.fatigue_strength_pa)).0
    }
}

/// Outcome of a catalog lookup.
///
/// `fallback` is true when the requested name was not in the catalog and the
/// default material was substituted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialLookup {
    /// Name of the record actually returned
    pub name: &'static str,
    /// Properties of that record
    pub properties: &'static MaterialProperties,
    /// Whether the default material was substituted
    pub fallback: bool,
}

static NAME_INDEX: Lazy<HashMap<&'static str, usize>> = Lazy::new(|| {
    CATALOG
        .iter()
        .enumerate()
        .map(|(i, e)| (e.name, i))
        .collect()
});

fn find(name: &str) -> Option<&'static CatalogEntry> {
    NAME_INDEX.get(name).map(|&i| &CATALOG[i])
}

/// Look up a material by exact name, substituting [`DEFAULT_MATERIAL`] when
/// the name is unknown.
pub fn lookup(name: &str) -> MaterialLookup {
    if let Some(entry) = find(name) {
        return MaterialLookup {
            name: entry.name,
            properties: &entry.properties,
            fallback: false,
        };
    }

    tracing::warn!(requested = name, used = DEFAULT_MATERIAL, "unknown material, using default");
    let default = default_entry();
    MaterialLookup {
        name: default.name,
        properties: &default.properties,
        fallback: true,
    }
}

/// Look up a material by exact name without fallback.
///
/// # Errors
///
/// `MaterialNotFound` when the name is not in the catalog.
pub fn try_lookup(name: &str) -> CalcResult<&'static MaterialProperties> {
    find(name)
        .map(|e| &e.properties)
        .ok_or_else(|| CalcError::material_not_found(name))
}

fn default_entry() -> &'static CatalogEntry {
    // DEFAULT_MATERIAL is a catalog key; see catalog tests
    CATALOG
        .iter()
        .find(|e| e.name == DEFAULT_MATERIAL)
        .unwrap_or(&CATALOG[0])
}

/// All material names in catalog order
pub fn list_all() -> Vec<&'static str> {
    CATALOG.iter().map(|e| e.name).collect()
}

/// Names of the materials in `category`, in catalog order
pub fn filter_by_category(category: MaterialCategory) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|e| e.properties.category == category)
        .map(|e| e.name)
        .collect()
}

/// Distinct categories present in the catalog, sorted by display name
pub fn categories() -> Vec<MaterialCategory> {
    let mut cats: Vec<MaterialCategory> = CATALOG.iter().map(|e| e.properties.category).collect();
    cats.sort_by_key(|c| c.display_name());
    cats.dedup();
    cats
}
