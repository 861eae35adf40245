//! # Rotating Shaft Design
//!
//! Sizes or checks a round shaft (solid or hollow) under combined torsion,
//! bending and axial load, then estimates deflection.
//!
//! ## Pipeline
//!
//! 1. Resolve material (unknown names fall back to the default material)
//! 2. Design mode: solve the required outer diameter from an equivalent moment.
//!    Verify mode: take the given diameter
//! 3. Stresses at the outer fibre and von Mises safety factor
//! 4. Bending deflection, angle of twist, weight per metre
//!
//! ## Assumptions
//!
//! - Sizing uses M_eq = √(M² + (0.75T)²); axial force is not part of it
//! - Checking superposes axial and bending stress at the outer fibre
//! - Deflection treats the shaft as simply supported with a midspan point
//!   load equivalent to the bending moment, F = 4M/L
//!
//! ## Example
//!
//! ```rust
//! use shaftgear_core::calculations::shaft::{calculate, ShaftInput};
//! use shaftgear_core::settings::DesignSettings;
//!
//! let input = ShaftInput {
//!     label: "Drive shaft".to_string(),
//!     torque_nm: 1000.0,
//!     bending_moment_nm: 500.0,
//!     axial_force_n: 0.0,
//!     length_mm: 1000.0,
//!     outer_diameter_mm: None,
//!     inner_diameter_mm: 0.0,
//!     material: "AISI 1045 Steel".to_string(),
//!     target_safety_factor: 2.0,
//! };
//!
//! let result = calculate(&input, &DesignSettings::default()).unwrap();
//! assert!((result.outer_diameter_mm - 38.98).abs() < 0.01);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::{resolve_material, DesignWarning};
use crate::equations::section::{circular_section_modulus, CircularSection};
use crate::equations::stress::{safety_factor, von_mises_plane, SafetyFactor};
use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};
use crate::materials::{self, MaterialProperties};
use crate::report::SummaryTable;
use crate::settings::{DesignSettings, HollowSearch};
use crate::units::{Megapascals, Meters, Millimeters, Pascals};

/// Coefficient on torque in the sizing equivalent moment
const TORQUE_WEIGHT: f64 = 0.75;

/// Loads acting on the critical section
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ShaftLoads {
    /// Torque T (N·m)
    pub torque_nm: f64,
    /// Bending moment M (N·m)
    pub bending_moment_nm: f64,
    /// Axial force F (N), tension positive
    pub axial_force_n: f64,
}

impl ShaftLoads {
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("torque_nm", self.torque_nm)?;
        require_non_negative("bending_moment_nm", self.bending_moment_nm)?;
        require_non_negative("axial_force_n", self.axial_force_n)?;
        Ok(())
    }

    /// M_eq = √(M² + (0.75·T)²) in N·m
    pub fn equivalent_moment_nm(&self) -> f64 {
        (self.bending_moment_nm.powi(2) + (TORQUE_WEIGHT * self.torque_nm).powi(2)).sqrt()
    }
}

/// Input parameters for a shaft calculation.
///
/// Leaving `outer_diameter_mm` out selects design mode: the engine solves for
/// the smallest diameter meeting `target_safety_factor`. Supplying it selects
/// verify mode.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Countershaft",
///   "torque_nm": 1000.0,
///   "bending_moment_nm": 500.0,
///   "length_mm": 1000.0,
///   "outer_diameter_mm": 50.0,
///   "inner_diameter_mm": 20.0,
///   "material": "AISI 4140 Steel",
///   "target_safety_factor": 2.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaftInput {
    /// User label (e.g., "S-1", "Input shaft")
    #[serde(default)]
    pub label: String,

    pub torque_nm: f64,

    pub bending_moment_nm: f64,

    #[serde(default)]
    pub axial_force_n: f64,

    /// Distance between bearings (mm)
    pub length_mm: f64,

    /// Given outer diameter (verify mode); `None` for design mode
    #[serde(default)]
    pub outer_diameter_mm: Option<f64>,

    /// Bore diameter, 0 for a solid shaft
    #[serde(default)]
    pub inner_diameter_mm: f64,

    /// Catalog name; blank uses the settings default
    #[serde(default)]
    pub material: String,

    pub target_safety_factor: f64,
}

impl ShaftInput {
    pub fn loads(&self) -> ShaftLoads {
        ShaftLoads {
            torque_nm: self.torque_nm,
            bending_moment_nm: self.bending_moment_nm,
            axial_force_n: self.axial_force_n,
        }
    }

    pub fn mode(&self) -> ShaftMode {
        if self.outer_diameter_mm.is_some() {
            ShaftMode::Verify
        } else {
            ShaftMode::Design
        }
    }

    pub fn is_hollow(&self) -> bool {
        self.inner_diameter_mm > 0.0
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        self.loads().validate()?;
        require_positive("length_mm", self.length_mm)?;
        require_non_negative("inner_diameter_mm", self.inner_diameter_mm)?;
        require_positive("target_safety_factor", self.target_safety_factor)?;

        match self.outer_diameter_mm {
            Some(outer) => {
                require_positive("outer_diameter_mm", outer)?;
                check_bore(outer, self.inner_diameter_mm)?;
            }
            None => {
                if !self.is_hollow() && self.loads().equivalent_moment_nm() == 0.0 {
                    return Err(CalcError::invalid_input(
                        "bending_moment_nm",
                        "0",
                        "Sizing a solid shaft needs a non-zero torque or bending moment",
                    ));
                }
            }
        }
        Ok(())
    }
}

fn check_bore(outer_mm: f64, inner_mm: f64) -> CalcResult<()> {
    if inner_mm >= outer_mm {
        return Err(CalcError::invalid_input(
            "inner_diameter_mm",
            inner_mm.to_string(),
            format!("Inner diameter must be smaller than outer diameter ({} mm)", outer_mm),
        ));
    }
    Ok(())
}

/// Whether the diameter was solved for or given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaftMode {
    Design,
    Verify,
}

impl ShaftMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShaftMode::Design => "Calculate required diameter",
            ShaftMode::Verify => "Verify given diameter",
        }
    }
}

/// Outcome of the required-diameter solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiameterSolution {
    /// Required outer diameter (mm)
    pub diameter_mm: f64,
    /// False when the hollow search hit its iteration cap
    pub converged: bool,
    /// Search steps taken (0 for the closed-form solid case)
    pub iterations: u32,
    pub equivalent_moment_nm: f64,
    /// σ_allow = Sy / SF (Pa)
    pub allowable_stress_pa: f64,
}

/// Required outer diameter with the default hollow search.
///
/// See [`required_diameter_with`].
pub fn required_diameter(
    loads: &ShaftLoads,
    material: &MaterialProperties,
    safety_factor: f64,
    inner_diameter_mm: f64,
) -> CalcResult<DiameterSolution> {
    required_diameter_with(loads, material, safety_factor, inner_diameter_mm, &HollowSearch::default())
}

/// Required outer diameter so that M_eq/Z ≤ Sy/SF.
///
/// # Formulas
/// - M_eq = √(M² + (0.75T)²)
/// - Solid: d = (32·M_eq/(π·σ_allow))^(1/3)
/// - Hollow: smallest D in the search grid with M_eq / (π(D⁴−d⁴)/(32D)) ≤ σ_allow
///
/// # Errors
///
/// `InvalidInput` for negative loads, a non-positive safety factor or bore,
/// or an allowable stress that is not a positive finite number.
pub fn required_diameter_with(
    loads: &ShaftLoads,
    material: &MaterialProperties,
    safety_factor: f64,
    inner_diameter_mm: f64,
    search: &HollowSearch,
) -> CalcResult<DiameterSolution> {
    loads.validate()?;
    require_positive("safety_factor", safety_factor)?;
    require_non_negative("inner_diameter_mm", inner_diameter_mm)?;

    let allowable = material.yield_strength_pa / safety_factor;
    if !(allowable > 0.0 && allowable.is_finite()) {
        return Err(CalcError::invalid_input(
            "allowable_stress",
            allowable.to_string(),
            "Allowable stress (yield / safety factor) must be positive",
        ));
    }

    let m_eq = loads.equivalent_moment_nm();
    let solution = |diameter_m: f64, converged: bool, iterations: u32| DiameterSolution {
        diameter_mm: Millimeters::from(Meters(diameter_m)).0,
        converged,
        iterations,
        equivalent_moment_nm: m_eq,
        allowable_stress_pa: allowable,
    };

    if inner_diameter_mm == 0.0 {
        let d = (32.0 * m_eq / (PI * allowable)).cbrt();
        return Ok(solution(d, true, 0));
    }

    search.validate()?;
    let inner = Meters::from(Millimeters(inner_diameter_mm)).0;
    let start = inner + Meters::from(Millimeters(search.initial_clearance_mm)).0;
    let step = Meters::from(Millimeters(search.step_mm)).0;

    for i in 0..search.max_iterations {
        let candidate = start + f64::from(i) * step;
        if m_eq / circular_section_modulus(candidate, inner) <= allowable {
            return Ok(solution(candidate, true, i + 1));
        }
    }

    let last = start + f64::from(search.max_iterations - 1) * step;
    tracing::warn!(
        inner_mm = inner_diameter_mm,
        last_mm = last * 1000.0,
        iterations = search.max_iterations,
        "hollow shaft search did not converge"
    );
    Ok(solution(last, false, search.max_iterations))
}

/// Stress state at the outer fibre of the critical section
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShaftStresses {
    /// Section properties in m², m⁴
    pub section: CircularSection,
    /// F/A (Pa)
    pub axial_stress_pa: f64,
    /// M·c/I (Pa)
    pub bending_stress_pa: f64,
    /// T·c/J (Pa)
    pub shear_stress_pa: f64,
    /// √((σa + σb)² + 3τ²) (Pa)
    pub von_mises_pa: f64,
    /// Sy / σ_vm
    pub safety_factor: SafetyFactor,
}

impl ShaftStresses {
    pub fn von_mises_mpa(&self) -> f64 {
        Megapascals::from(Pascals(self.von_mises_pa)).0
    }
}

/// Section properties, outer-fibre stresses and safety factor for a given
/// diameter.
pub fn stress_analysis(
    outer_diameter_mm: f64,
    inner_diameter_mm: f64,
    loads: &ShaftLoads,
    material: &MaterialProperties,
) -> CalcResult<ShaftStresses> {
    require_positive("outer_diameter_mm", outer_diameter_mm)?;
    require_non_negative("inner_diameter_mm", inner_diameter_mm)?;
    check_bore(outer_diameter_mm, inner_diameter_mm)?;
    loads.validate()?;

    let outer = Meters::from(Millimeters(outer_diameter_mm)).0;
    let inner = Meters::from(Millimeters(inner_diameter_mm)).0;
    let section = CircularSection::new(outer, inner);
    let c = outer / 2.0;

    let axial = loads.axial_force_n / section.area;
    let bending = loads.bending_moment_nm * c / section.moment_of_inertia;
    let shear = loads.torque_nm * c / section.polar_moment;
    let von_mises = von_mises_plane(axial + bending, shear);

    Ok(ShaftStresses {
        section,
        axial_stress_pa: axial,
        bending_stress_pa: bending,
        shear_stress_pa: shear,
        von_mises_pa: von_mises,
        safety_factor: safety_factor(material.yield_strength_pa, von_mises),
    })
}

/// Yield safety factor of a given diameter.
///
/// Unbounded when the shaft is unloaded.
pub fn verify_diameter(
    outer_diameter_mm: f64,
    inner_diameter_mm: f64,
    loads: &ShaftLoads,
    material: &MaterialProperties,
) -> CalcResult<SafetyFactor> {
    stress_analysis(outer_diameter_mm, inner_diameter_mm, loads, material).map(|s| s.safety_factor)
}

/// Lateral and torsional deflection estimates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShaftDeflection {
    /// Midspan point load equivalent to the bending moment, 4M/L (N)
    pub equivalent_load_n: f64,
    /// δ = F·L³/(48EI) (mm)
    pub bending_deflection_mm: f64,
    /// θ·D/2 at the surface (mm)
    pub torsional_deflection_mm: f64,
    /// θ = T·L/(G·J) (rad)
    pub angle_of_twist_rad: f64,
    pub angle_of_twist_deg: f64,
    /// Twist rate (°/m), commonly held below 1°/m
    pub twist_per_meter_deg: f64,
    /// L / ratio (mm)
    pub limit_mm: f64,
    pub within_limit: bool,
}

/// Bending deflection, twist and the L/ratio check.
pub fn deflection(
    outer_diameter_mm: f64,
    inner_diameter_mm: f64,
    length_mm: f64,
    loads: &ShaftLoads,
    material: &MaterialProperties,
    limit_ratio: f64,
) -> CalcResult<ShaftDeflection> {
    require_positive("outer_diameter_mm", outer_diameter_mm)?;
    require_non_negative("inner_diameter_mm", inner_diameter_mm)?;
    check_bore(outer_diameter_mm, inner_diameter_mm)?;
    require_positive("length_mm", length_mm)?;
    require_positive("deflection_limit_ratio", limit_ratio)?;
    loads.validate()?;

    let outer = Meters::from(Millimeters(outer_diameter_mm)).0;
    let inner = Meters::from(Millimeters(inner_diameter_mm)).0;
    let length = Meters::from(Millimeters(length_mm)).0;
    let section = CircularSection::new(outer, inner);
    let e = material.elastic_modulus_pa;
    let g = material.shear_modulus_pa();

    let f_eq = 4.0 * loads.bending_moment_nm / length;
    let delta = f_eq * length.powi(3) / (48.0 * e * section.moment_of_inertia);
    let theta = loads.torque_nm * length / (g * section.polar_moment);
    let surface = theta * outer / 2.0;
    let limit = length / limit_ratio;

    Ok(ShaftDeflection {
        equivalent_load_n: f_eq,
        bending_deflection_mm: Millimeters::from(Meters(delta)).0,
        torsional_deflection_mm: Millimeters::from(Meters(surface)).0,
        angle_of_twist_rad: theta,
        angle_of_twist_deg: theta.to_degrees(),
        twist_per_meter_deg: theta.to_degrees() / length,
        limit_mm: Millimeters::from(Meters(limit)).0,
        within_limit: delta <= limit,
    })
}

/// Full result of a shaft calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaftResult {
    pub mode: ShaftMode,
    /// Name of the material actually used
    pub material: String,
    pub outer_diameter_mm: f64,
    pub inner_diameter_mm: f64,
    pub stresses: ShaftStresses,
    pub deflection: ShaftDeflection,
    pub target_safety_factor: f64,
    /// Area × density (kg/m)
    pub weight_per_meter_kg: f64,
    /// Solver details, design mode only
    pub diameter_solution: Option<DiameterSolution>,
    pub warnings: Vec<DesignWarning>,
}

impl ShaftResult {
    /// Safety factor meets target and deflection is within limit
    pub fn passes(&self) -> bool {
        self.stresses.safety_factor.meets(self.target_safety_factor) && self.deflection.within_limit
    }

    /// Parameter/value table for reports
    pub fn summary(&self, input: &ShaftInput) -> SummaryTable {
        let props = materials::lookup(&self.material).properties;
        SummaryTable::new("Shaft Design Summary")
            .with_row("Design Method", self.mode.display_name())
            .with_row("Outer Diameter (mm)", format!("{:.2}", self.outer_diameter_mm))
            .with_row("Inner Diameter (mm)", format!("{:.2}", self.inner_diameter_mm))
            .with_row("Shaft Length (mm)", format!("{:.0}", input.length_mm))
            .with_row("Torque (N·m)", format!("{:.0}", input.torque_nm))
            .with_row("Bending Moment (N·m)", format!("{:.0}", input.bending_moment_nm))
            .with_row("Axial Force (N)", format!("{:.0}", input.axial_force_n))
            .with_row("Axial Stress (MPa)", format!("{:.2}", self.stresses.axial_stress_pa / 1e6))
            .with_row("Bending Stress (MPa)", format!("{:.2}", self.stresses.bending_stress_pa / 1e6))
            .with_row("Shear Stress (MPa)", format!("{:.2}", self.stresses.shear_stress_pa / 1e6))
            .with_row("von Mises Stress (MPa)", format!("{:.2}", self.stresses.von_mises_mpa()))
            .with_row("Safety Factor", format!("{:.2}", self.stresses.safety_factor))
            .with_row("Bending Deflection (mm)", format!("{:.3}", self.deflection.bending_deflection_mm))
            .with_row("Torsional Deflection (mm)", format!("{:.3}", self.deflection.torsional_deflection_mm))
            .with_row("Angle of Twist (°)", format!("{:.3}", self.deflection.angle_of_twist_deg))
            .with_row("Material", self.material.clone())
            .with_row("Yield Strength (MPa)", format!("{:.0}", props.yield_mpa()))
            .with_row("Elastic Modulus (GPa)", format!("{:.0}", props.elastic_modulus_gpa()))
            .with_row("Weight per meter (kg/m)", format!("{:.2}", self.weight_per_meter_kg))
    }

    /// Pass/fail lines for the safety section of a report
    pub fn safety_rows(&self) -> SummaryTable {
        let sf = self.stresses.safety_factor;
        let d = &self.deflection;
        SummaryTable::new("Shaft Safety Assessment")
            .with_row("Target Safety Factor", format!("{:.1}", self.target_safety_factor))
            .with_row(
                "Yield Safety Factor",
                format!("{:.2} {}", sf, status(sf.meets(self.target_safety_factor))),
            )
            .with_row(
                "Bending Deflection",
                format!(
                    "{:.3} mm (limit {:.1} mm) {}",
                    d.bending_deflection_mm,
                    d.limit_mm,
                    status(d.within_limit)
                ),
            )
    }
}

pub(crate) fn status(ok: bool) -> &'static str {
    if ok {
        "OK"
    } else {
        "LOW"
    }
}

/// Run the full shaft pipeline.
///
/// # Errors
///
/// `InvalidInput` from validation or the solver. An unknown material name is
/// not an error: the default material is used and a
/// [`DesignWarning::MaterialFallback`] is attached.
pub fn calculate(input: &ShaftInput, settings: &DesignSettings) -> CalcResult<ShaftResult> {
    input.validate()?;

    let mut warnings = Vec::new();
    let requested = settings.material_name(&input.material);
    let material = resolve_material(requested, &mut warnings);
    let props = material.properties;
    let loads = input.loads();
    tracing::debug!(label = %input.label, material = material.name, mode = ?input.mode(), "shaft calculation");

    let (outer_mm, diameter_solution) = match input.outer_diameter_mm {
        Some(outer) => (outer, None),
        None => {
            let sol = required_diameter_with(
                &loads,
                props,
                input.target_safety_factor,
                input.inner_diameter_mm,
                &settings.hollow_search,
            )?;
            if !sol.converged {
                warnings.push(DesignWarning::HollowSearchNotConverged {
                    iterations: sol.iterations,
                    last_diameter_mm: sol.diameter_mm,
                });
            }
            tracing::debug!(diameter_mm = sol.diameter_mm, iterations = sol.iterations, "solved shaft diameter");
            (sol.diameter_mm, Some(sol))
        }
    };

    let stresses = stress_analysis(outer_mm, input.inner_diameter_mm, &loads, props)?;
    let defl = deflection(
        outer_mm,
        input.inner_diameter_mm,
        input.length_mm,
        &loads,
        props,
        settings.deflection_limit_ratio,
    )?;

    if !stresses.safety_factor.meets(input.target_safety_factor) {
        warnings.push(DesignWarning::BelowTargetSafetyFactor {
            check: "Shaft yield".to_string(),
            actual: stresses.safety_factor,
            required: input.target_safety_factor,
        });
    }
    if !defl.within_limit {
        warnings.push(DesignWarning::DeflectionLimitExceeded {
            deflection_mm: defl.bending_deflection_mm,
            limit_mm: defl.limit_mm,
        });
    }

    Ok(ShaftResult {
        mode: input.mode(),
        material: material.name.to_string(),
        outer_diameter_mm: outer_mm,
        inner_diameter_mm: input.inner_diameter_mm,
        weight_per_meter_kg: stresses.section.area * props.density_kg_m3,
        stresses,
        deflection: defl,
        target_safety_factor: input.target_safety_factor,
        diameter_solution,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::lookup;
    use crate::settings::MAX_HOLLOW_ITERATIONS;
    use proptest::prelude::*;

    fn aisi_1045() -> &'static MaterialProperties {
        lookup("AISI 1045 Steel").properties
    }

    fn example_input() -> ShaftInput {
        ShaftInput {
            label: "S-1".to_string(),
            torque_nm: 1000.0,
            bending_moment_nm: 500.0,
            axial_force_n: 0.0,
            length_mm: 1000.0,
            outer_diameter_mm: None,
            inner_diameter_mm: 0.0,
            material: "AISI 1045 Steel".to_string(),
            target_safety_factor: 2.0,
        }
    }

    #[test]
    fn test_solid_required_diameter_example() {
        let loads = example_input().loads();
        let sol = required_diameter(&loads, aisi_1045(), 2.0, 0.0).unwrap();
        assert!((sol.equivalent_moment_nm - 901.388).abs() < 0.01);
        assert!((sol.allowable_stress_pa - 155e6).abs() < 1.0);
        assert!((sol.diameter_mm - 38.98).abs() < 0.01, "d = {}", sol.diameter_mm);
        assert!(sol.converged);
        assert_eq!(sol.iterations, 0);
    }

    #[test]
    fn test_zero_allowable_stress_is_rejected() {
        let mut weak = *aisi_1045();
        weak.yield_strength_pa = 0.0;
        let err = required_diameter(&example_input().loads(), &weak, 2.0, 0.0).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "allowable_stress"));
    }

    #[test]
    fn test_non_positive_safety_factor_is_rejected() {
        let loads = example_input().loads();
        assert!(required_diameter(&loads, aisi_1045(), 0.0, 0.0).is_err());
        assert!(required_diameter(&loads, aisi_1045(), -1.5, 0.0).is_err());
    }

    #[test]
    fn test_hollow_search_converges_above_bore() {
        let loads = example_input().loads();
        let sol = required_diameter(&loads, aisi_1045(), 2.0, 20.0).unwrap();
        assert!(sol.converged);
        // hollow shaft needs more material than the solid one; 39.9 is the
        // last point of the default 100-step grid starting at 30 mm
        assert!((sol.diameter_mm - 39.9).abs() < 1e-6, "D = {}", sol.diameter_mm);
        assert_eq!(sol.iterations, 100);
        // previous grid point must fail
        let prev_mm = sol.diameter_mm - 0.1;
        let z_prev = circular_section_modulus(prev_mm / 1000.0, 0.02);
        assert!(sol.equivalent_moment_nm / z_prev > sol.allowable_stress_pa);
    }

    #[test]
    fn test_hollow_search_reports_exhaustion() {
        let search = HollowSearch {
            step_mm: 0.5,
            max_iterations: 5,
            initial_clearance_mm: 10.0,
        };
        let loads = ShaftLoads {
            torque_nm: 0.0,
            bending_moment_nm: 50_000.0,
            axial_force_n: 0.0,
        };
        let sol = required_diameter_with(&loads, aisi_1045(), 2.0, 20.0, &search).unwrap();
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 5);
        // last tried: 20 + 10 + 4 × 0.5
        assert!((sol.diameter_mm - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_pure_bending_von_mises_equals_bending_stress() {
        let loads = ShaftLoads {
            torque_nm: 0.0,
            bending_moment_nm: 750.0,
            axial_force_n: 0.0,
        };
        let s = stress_analysis(45.0, 0.0, &loads, aisi_1045()).unwrap();
        assert_eq!(s.von_mises_pa, s.bending_stress_pa);
        assert_eq!(s.axial_stress_pa, 0.0);
    }

    #[test]
    fn test_unloaded_shaft_has_unbounded_safety() {
        let sf = verify_diameter(30.0, 0.0, &ShaftLoads::default(), aisi_1045()).unwrap();
        assert!(sf.is_unbounded());
    }

    #[test]
    fn test_verify_rejects_bore_not_smaller_than_outer() {
        let loads = example_input().loads();
        assert!(verify_diameter(40.0, 40.0, &loads, aisi_1045()).is_err());
        assert!(verify_diameter(40.0, 45.0, &loads, aisi_1045()).is_err());
    }

    #[test]
    fn test_example_with_torque_has_documented_margin() {
        // sizing weights T by 0.75 while von Mises uses √0.75 on the τ term
        let loads = example_input().loads();
        let sol = required_diameter(&loads, aisi_1045(), 2.0, 0.0).unwrap();
        let sf = verify_diameter(sol.diameter_mm, 0.0, &loads, aisi_1045()).unwrap();
        let expected = 2.0 * (loads.equivalent_moment_nm() / (500.0_f64.powi(2) + 0.75 * 1000.0_f64.powi(2)).sqrt());
        assert!((sf.value() - expected).abs() < 1e-9);
        assert!((sf.value() - 1.80).abs() < 0.01);
    }

    #[test]
    fn test_deflection_formulas() {
        let loads = ShaftLoads {
            torque_nm: 200.0,
            bending_moment_nm: 100.0,
            axial_force_n: 0.0,
        };
        let steel = aisi_1045();
        let d = deflection(40.0, 0.0, 800.0, &loads, steel, 250.0).unwrap();

        let sec = CircularSection::new(0.04, 0.0);
        let f = 4.0 * 100.0 / 0.8;
        let delta = f * 0.8_f64.powi(3) / (48.0 * steel.elastic_modulus_pa * sec.moment_of_inertia);
        let theta = 200.0 * 0.8 / (steel.shear_modulus_pa() * sec.polar_moment);

        assert!((d.equivalent_load_n - 500.0).abs() < 1e-9);
        assert!((d.bending_deflection_mm - delta * 1000.0).abs() < 1e-12);
        assert!((d.angle_of_twist_rad - theta).abs() < 1e-15);
        assert!((d.torsional_deflection_mm - theta * 0.02 * 1000.0).abs() < 1e-12);
        assert!((d.limit_mm - 3.2).abs() < 1e-12);
        assert!(d.within_limit);
    }

    #[test]
    fn test_calculate_design_mode() {
        let result = calculate(&example_input(), &DesignSettings::default()).unwrap();
        assert_eq!(result.mode, ShaftMode::Design);
        assert!(result.diameter_solution.is_some());
        // 0.75T sizing leaves SF ≈ 1.80 against a target of 2.0
        assert!(!result.passes());
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, DesignWarning::BelowTargetSafetyFactor { .. })));

        let area = PI * (result.outer_diameter_mm / 1000.0).powi(2) / 4.0;
        assert!((result.weight_per_meter_kg - area * 7850.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_verify_mode_uses_material_density() {
        let mut input = example_input();
        input.outer_diameter_mm = Some(60.0);
        input.material = "Aluminum 6061-T6".to_string();
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        assert_eq!(result.mode, ShaftMode::Verify);
        assert!(result.diameter_solution.is_none());
        let area = PI * 0.06_f64.powi(2) / 4.0;
        assert!((result.weight_per_meter_kg - area * 2700.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_unknown_material_warns() {
        let mut input = example_input();
        input.material = "Vibranium".to_string();
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        assert_eq!(result.material, "AISI 1045 Steel");
        assert!(matches!(
            result.warnings.first(),
            Some(DesignWarning::MaterialFallback { requested, .. }) if requested == "Vibranium"
        ));
    }

    #[test]
    fn test_calculate_blank_material_uses_settings_default() {
        let mut input = example_input();
        input.material = String::new();
        let settings = DesignSettings {
            default_material: "AISI 4140 Steel".to_string(),
            ..DesignSettings::default()
        };
        let result = calculate(&input, &settings).unwrap();
        assert_eq!(result.material, "AISI 4140 Steel");
        assert!(result.warnings.iter().all(|w| !matches!(w, DesignWarning::MaterialFallback { .. })));
    }

    #[test]
    fn test_validation() {
        let mut input = example_input();
        input.torque_nm = -1.0;
        assert!(input.validate().is_err());

        let mut input = example_input();
        input.torque_nm = 0.0;
        input.bending_moment_nm = 0.0;
        assert!(input.validate().is_err());

        let mut input = example_input();
        input.outer_diameter_mm = Some(30.0);
        input.inner_diameter_mm = 30.0;
        assert!(input.validate().is_err());

        let mut input = example_input();
        input.length_mm = 0.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_summary_rows() {
        let input = example_input();
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        let table = result.summary(&input);
        assert_eq!(table.get("Material"), Some("AISI 1045 Steel"));
        assert_eq!(table.get("Torque (N·m)"), Some("1000"));
        assert_eq!(table.get("Yield Strength (MPa)"), Some("310"));
        assert!(result.safety_rows().get("Yield Safety Factor").unwrap().ends_with("LOW"));
    }

    proptest! {
        #[test]
        fn prop_pure_bending_round_trip(m in 1.0f64..50_000.0, sf in 1.0f64..5.0) {
            let loads = ShaftLoads { torque_nm: 0.0, bending_moment_nm: m, axial_force_n: 0.0 };
            let sol = required_diameter(&loads, aisi_1045(), sf, 0.0).unwrap();
            let got = verify_diameter(sol.diameter_mm, 0.0, &loads, aisi_1045()).unwrap();
            prop_assert!(got.value() >= sf * (1.0 - 1e-9));
        }

        #[test]
        fn prop_hollow_pure_bending_round_trip(m in 1.0f64..5_000.0, sf in 1.0f64..4.0, bore in 5.0f64..40.0) {
            let loads = ShaftLoads { torque_nm: 0.0, bending_moment_nm: m, axial_force_n: 0.0 };
            let search = HollowSearch { max_iterations: MAX_HOLLOW_ITERATIONS, ..HollowSearch::default() };
            let sol = required_diameter_with(&loads, aisi_1045(), sf, bore, &search).unwrap();
            prop_assert!(sol.converged);
            let got = verify_diameter(sol.diameter_mm, bore, &loads, aisi_1045()).unwrap();
            prop_assert!(got.value() >= sf * (1.0 - 1e-9));
        }

        #[test]
        fn prop_combined_round_trip_lower_bound(
            t in 0.0f64..20_000.0,
            m in 1.0f64..20_000.0,
            sf in 1.0f64..5.0,
        ) {
            let loads = ShaftLoads { torque_nm: t, bending_moment_nm: m, axial_force_n: 0.0 };
            let sol = required_diameter(&loads, aisi_1045(), sf, 0.0).unwrap();
            let got = verify_diameter(sol.diameter_mm, 0.0, &loads, aisi_1045()).unwrap();
            prop_assert!(got.value() >= sf * 0.75_f64.sqrt() * (1.0 - 1e-9));
            prop_assert!(got.value() <= sf * (1.0 + 1e-9));
        }
    }
}
