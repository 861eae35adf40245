//! Engineering Materials Catalog
//!
//! Room-temperature mechanical properties for common shaft and gear
//! materials. Values are typical handbook figures for the listed temper and
//! are meant for preliminary sizing, not certification.
//!
//! Fatigue strengths are rotating-beam values at 10⁶ cycles.

use super::{MaterialCategory, MaterialProperties};

/// One named record in the catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogEntry {
    /// Display name, also the lookup key
    pub name: &'static str,
    /// Mechanical properties (SI)
    pub properties: MaterialProperties,
}

/// Name of the material substituted when a lookup misses
pub const DEFAULT_MATERIAL: &str = "AISI 1045 Steel";

/// Builds a catalog entry from handbook units (MPa, GPa).
macro_rules! entry {
    ($name:expr, $sy:expr, $su:expr, $e:expr, $nu:expr, $rho:expr, $se:expr, $hb:expr, $cat:ident $(,)?) => {
        CatalogEntry {
            name: $name,
            properties: MaterialProperties {
                yield_strength_pa: $sy * 1e6,
                ultimate_strength_pa: $su * 1e6,
                elastic_modulus_pa: $e * 1e9,
                poisson_ratio: $nu,
                density_kg_m3: $rho,
                fatigue_strength_pa: $se * 1e6,
                hardness_hb: $hb,
                category: MaterialCategory::$cat,
            },
        }
    };
}

/// Catalog in display order. Order is part of the contract: `list_all`
/// enumerates it unchanged.
pub static CATALOG: [CatalogEntry; 15] = [
    // name, Sy MPa, Su MPa, E GPa, ν, ρ kg/m³, Se MPa, HB, category
    entry!("AISI 1020 Steel", 250.0, 380.0, 200.0, 0.29, 7850.0, 190.0, 111.0, CarbonSteel),
    entry!("AISI 1045 Steel", 310.0, 565.0, 200.0, 0.29, 7850.0, 282.0, 163.0, CarbonSteel),
    entry!("AISI 4140 Steel", 415.0, 655.0, 200.0, 0.29, 7850.0, 380.0, 197.0, AlloySteel),
    entry!("AISI 4340 Steel", 470.0, 745.0, 200.0, 0.29, 7850.0, 425.0, 217.0, AlloySteel),
    entry!("AISI 316 Stainless Steel", 205.0, 515.0, 200.0, 0.30, 8000.0, 240.0, 149.0, StainlessSteel),
    entry!(
        "AISI 17-4 PH Stainless Steel",
        1170.0,
        1310.0,
        196.0,
        0.27,
        7750.0,
        550.0,
        388.0,
        PrecipitationHardeningSteel,
    ),
    entry!("Aluminum 6061-T6", 276.0, 310.0, 69.0, 0.33, 2700.0, 96.0, 95.0, AluminumAlloy),
    entry!("Aluminum 7075-T6", 503.0, 572.0, 71.7, 0.33, 2810.0, 159.0, 150.0, AluminumAlloy),
    entry!("Titanium Ti-6Al-4V", 880.0, 950.0, 114.0, 0.32, 4430.0, 510.0, 334.0, TitaniumAlloy),
    entry!("Brass C36000", 124.0, 310.0, 100.0, 0.33, 8500.0, 110.0, 85.0, CopperAlloy),
    entry!("Bronze C93200", 172.0, 310.0, 103.0, 0.34, 8800.0, 124.0, 75.0, CopperAlloy),
    entry!("Cast Iron ASTM A48 Class 30", 200.0, 207.0, 100.0, 0.26, 7200.0, 68.0, 187.0, CastIron),
    entry!(
        "Ductile Iron ASTM A536 65-45-12",
        310.0,
        448.0,
        169.0,
        0.29,
        7100.0,
        220.0,
        149.0,
        CastIron,
    ),
    entry!("Inconel 718", 1240.0, 1380.0, 200.0, 0.29, 8190.0, 620.0, 388.0, Superalloy),
    entry!("Tool Steel D2", 520.0, 690.0, 210.0, 0.27, 7700.0, 345.0, 217.0, ToolSteel),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = CATALOG.iter().map(|e| e.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_default_material_is_in_catalog() {
        assert!(CATALOG.iter().any(|e| e.name == DEFAULT_MATERIAL));
    }

    #[test]
    fn test_all_records_satisfy_invariants() {
        for e in CATALOG.iter() {
            let p = &e.properties;
            assert!(p.yield_strength_pa > 0.0, "{}", e.name);
            assert!(p.ultimate_strength_pa >= p.yield_strength_pa, "{}", e.name);
            assert!(p.elastic_modulus_pa > 0.0, "{}", e.name);
            assert!(p.fatigue_strength_pa > 0.0, "{}", e.name);
            assert!(p.poisson_ratio > 0.0 && p.poisson_ratio < 0.5, "{}", e.name);
            assert!(p.density_kg_m3 > 0.0, "{}", e.name);
        }
    }
}
