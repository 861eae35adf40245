//! # Spur and Helical Gear Pair Rating
//!
//! Rates an external gear pair for tooth bending (Lewis) and surface
//! contact (Hertz).
//!
//! ## Pipeline
//!
//! geometry → bending → contact → summary
//!
//! ## Units
//!
//! Geometry in mm, torque in N·m, speeds in rpm, pitch-line velocity in m/s.
//! Tooth loads in N and stresses in MPa (N/mm²), compared against strengths
//! converted to MPa.
//!
//! ## Simplifications
//!
//! - Ks = 1.0; Kv has a single formula above 5 m/s
//! - Contact strength is approximated as 2.8·Sy
//! - The geometry factor I is a closed-form approximation, floored at 0.1
//!
//! ## Example
//!
//! ```rust
//! use shaftgear_core::calculations::gear::basic_geometry;
//!
//! let g = basic_geometry(20, 40, 3.0, 10.0, 1500.0).unwrap();
//! assert_eq!(g.gear_ratio, 2.0);
//! assert_eq!(g.center_distance_mm, 90.0);
//! assert!((g.pinion_torque_nm - 63.66).abs() < 0.01);
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::shaft::status;
use super::{resolve_material, DesignWarning};
use crate::equations::gear::{
    contact_stress, elastic_coefficient, geometry_factor, lewis_bending_stress, lewis_form_factor_lookup,
    transmitted_load, velocity_factor, LewisFactor, LewisResolution,
};
use crate::equations::stress::{safety_factor, SafetyFactor};
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::materials::MaterialProperties;
use crate::report::SummaryTable;
use crate::settings::DesignSettings;
use crate::units::{Kilowatts, Watts};

/// Smallest tooth count accepted (start of the Lewis table)
pub const MIN_TEETH: u32 = 12;

/// Largest helix angle accepted (degrees)
pub const MAX_HELIX_ANGLE_DEG: f64 = 45.0;

/// Accepted quality grades
pub const QUALITY_GRADES: std::ops::RangeInclusive<u8> = 6..=12;

/// Contact strength as a multiple of yield strength
const CONTACT_STRENGTH_RATIO: f64 = 2.8;

/// Tooth form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GearType {
    #[default]
    #[serde(rename = "Spur Gear")]
    Spur,
    #[serde(rename = "Helical Gear")]
    Helical,
}

impl GearType {
    pub const ALL: [GearType; 2] = [GearType::Spur, GearType::Helical];

    pub fn display_name(&self) -> &'static str {
        match self {
            GearType::Spur => "Spur Gear",
            GearType::Helical => "Helical Gear",
        }
    }

    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spur" | "spur gear" => Ok(GearType::Spur),
            "helical" | "helical gear" => Ok(GearType::Helical),
            _ => Err(CalcError::invalid_input("gear_type", s, "Expected 'spur' or 'helical'")),
        }
    }
}

impl fmt::Display for GearType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

fn default_sf_bending() -> f64 {
    2.0
}

fn default_sf_contact() -> f64 {
    1.5
}

fn default_service_factor() -> f64 {
    1.25
}

fn default_quality_grade() -> u8 {
    9
}

/// Input parameters for a gear pair.
///
/// ## JSON Example
///
/// ```json
/// {
///   "label": "Stage 1",
///   "gear_type": "Spur Gear",
///   "pinion_teeth": 20,
///   "gear_teeth": 40,
///   "module_mm": 3.0,
///   "face_width_mm": 50.0,
///   "power_kw": 10.0,
///   "pinion_rpm": 1500.0,
///   "pinion_material": "AISI 4140 Steel",
///   "gear_material": "AISI 1045 Steel"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearPairInput {
    #[serde(default)]
    pub label: String,

    #[serde(default)]
    pub gear_type: GearType,

    /// Pinion tooth count z1 (≥ 12)
    pub pinion_teeth: u32,

    /// Gear tooth count z2 (≥ 12)
    pub gear_teeth: u32,

    /// Module m (mm)
    pub module_mm: f64,

    /// Helix angle ψ (degrees); ignored for spur gears
    #[serde(default)]
    pub helix_angle_deg: f64,

    /// Face width b (mm)
    pub face_width_mm: f64,

    /// Transmitted power (kW)
    pub power_kw: f64,

    /// Pinion speed (rpm)
    pub pinion_rpm: f64,

    #[serde(default)]
    pub pinion_material: String,

    #[serde(default)]
    pub gear_material: String,

    /// Required bending safety factor
    #[serde(default = "default_sf_bending")]
    pub safety_factor_bending: f64,

    /// Required contact safety factor
    #[serde(default = "default_sf_contact")]
    pub safety_factor_contact: f64,

    /// Overload (service) factor Ko
    #[serde(default = "default_service_factor")]
    pub service_factor: f64,

    /// AGMA-style quality grade (6–12); recorded but not yet used by the
    /// rating formulas
    #[serde(default = "default_quality_grade")]
    pub quality_grade: u8,
}

impl GearPairInput {
    /// Helix angle actually used: zero for spur gears
    pub fn effective_helix_deg(&self) -> f64 {
        match self.gear_type {
            GearType::Spur => 0.0,
            GearType::Helical => self.helix_angle_deg,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        check_teeth("pinion_teeth", self.pinion_teeth)?;
        check_teeth("gear_teeth", self.gear_teeth)?;
        require_positive("module_mm", self.module_mm)?;
        require_positive("face_width_mm", self.face_width_mm)?;
        require_positive("power_kw", self.power_kw)?;
        require_positive("pinion_rpm", self.pinion_rpm)?;
        require_positive("safety_factor_bending", self.safety_factor_bending)?;
        require_positive("safety_factor_contact", self.safety_factor_contact)?;
        require_positive("service_factor", self.service_factor)?;

        if !(0.0..=MAX_HELIX_ANGLE_DEG).contains(&self.helix_angle_deg) {
            return Err(CalcError::invalid_input(
                "helix_angle_deg",
                self.helix_angle_deg.to_string(),
                format!("Helix angle must be between 0 and {}°", MAX_HELIX_ANGLE_DEG),
            ));
        }
        if !QUALITY_GRADES.contains(&self.quality_grade) {
            return Err(CalcError::invalid_input(
                "quality_grade",
                self.quality_grade.to_string(),
                "Quality grade must be between 6 and 12",
            ));
        }
        Ok(())
    }
}

fn check_teeth(field: &str, teeth: u32) -> CalcResult<()> {
    if teeth < MIN_TEETH {
        return Err(CalcError::invalid_input(
            field,
            teeth.to_string(),
            format!("Tooth count must be at least {}", MIN_TEETH),
        ));
    }
    Ok(())
}

/// Kinematics and pitch geometry of the pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearGeometry {
    /// z2 / z1
    pub gear_ratio: f64,
    pub gear_rpm: f64,
    /// d1 = m·z1 (mm)
    pub pinion_pitch_diameter_mm: f64,
    /// d2 = m·z2 (mm)
    pub gear_pitch_diameter_mm: f64,
    /// (d1 + d2)/2 (mm)
    pub center_distance_mm: f64,
    pub pinion_torque_nm: f64,
    pub gear_torque_nm: f64,
    /// π·d1·n/60000 (m/s)
    pub pitch_line_velocity_m_s: f64,
}

/// Ratio, pitch diameters, centre distance, torques and pitch-line velocity.
///
/// # Formulas
/// - T1 = P·60/(2π·n1), P in W
/// - v = π·d1·n1/(60·1000), d1 in mm
pub fn basic_geometry(
    pinion_teeth: u32,
    gear_teeth: u32,
    module_mm: f64,
    power_kw: f64,
    pinion_rpm: f64,
) -> CalcResult<GearGeometry> {
    check_teeth("pinion_teeth", pinion_teeth)?;
    check_teeth("gear_teeth", gear_teeth)?;
    require_positive("module_mm", module_mm)?;
    require_positive("power_kw", power_kw)?;
    require_positive("pinion_rpm", pinion_rpm)?;

    let gear_ratio = f64::from(gear_teeth) / f64::from(pinion_teeth);
    let d1 = module_mm * f64::from(pinion_teeth);
    let d2 = module_mm * f64::from(gear_teeth);
    let power_w = Watts::from(Kilowatts(power_kw)).0;
    let pinion_torque = power_w * 60.0 / (2.0 * PI * pinion_rpm);

    Ok(GearGeometry {
        gear_ratio,
        gear_rpm: pinion_rpm / gear_ratio,
        pinion_pitch_diameter_mm: d1,
        gear_pitch_diameter_mm: d2,
        center_distance_mm: (d1 + d2) / 2.0,
        pinion_torque_nm: pinion_torque,
        gear_torque_nm: pinion_torque * gear_ratio,
        pitch_line_velocity_m_s: PI * d1 * pinion_rpm / (60.0 * 1000.0),
    })
}

/// Lewis bending check of both members
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendingAnalysis {
    pub pinion_lewis: LewisFactor,
    pub gear_lewis: LewisFactor,
    /// Kv
    pub velocity_factor: f64,
    /// Ks
    pub size_factor: f64,
    /// Wt (N)
    pub transmitted_load_n: f64,
    pub pinion_stress_mpa: f64,
    pub gear_stress_mpa: f64,
    /// Yield strength (MPa)
    pub pinion_strength_mpa: f64,
    pub gear_strength_mpa: f64,
    pub pinion_safety: SafetyFactor,
    pub gear_safety: SafetyFactor,
}

/// Lewis bending stress and yield safety factor for pinion and gear.
///
/// σb = Wt·Ko·Kv·Ks/(b·m·Y), each member with its own Y.
///
/// # Errors
///
/// `InvalidInput` when `input` fails [`GearPairInput::validate`].
pub fn bending_stress_analysis(
    input: &GearPairInput,
    geometry: &GearGeometry,
    pinion: &MaterialProperties,
    gear: &MaterialProperties,
) -> CalcResult<BendingAnalysis> {
    input.validate()?;
    let pinion_lewis = lewis_form_factor_lookup(input.pinion_teeth);
    let gear_lewis = lewis_form_factor_lookup(input.gear_teeth);
    let kv = velocity_factor(geometry.pitch_line_velocity_m_s);
    let ks = 1.0;
    let wt = transmitted_load(geometry.pinion_torque_nm, geometry.pinion_pitch_diameter_mm);

    let stress = |y: f64| lewis_bending_stress(wt, input.service_factor, kv, ks, input.face_width_mm, input.module_mm, y);
    let pinion_stress = stress(pinion_lewis.value);
    let gear_stress = stress(gear_lewis.value);
    tracing::debug!(kv, wt, pinion_stress, gear_stress, "gear bending analysis");

    Ok(BendingAnalysis {
        pinion_lewis,
        gear_lewis,
        velocity_factor: kv,
        size_factor: ks,
        transmitted_load_n: wt,
        pinion_stress_mpa: pinion_stress,
        gear_stress_mpa: gear_stress,
        pinion_strength_mpa: pinion.yield_mpa(),
        gear_strength_mpa: gear.yield_mpa(),
        pinion_safety: safety_factor(pinion.yield_mpa(), pinion_stress),
        gear_safety: safety_factor(gear.yield_mpa(), gear_stress),
    })
}

/// Hertzian contact check; one contact stress shared by both members
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactAnalysis {
    pub transmitted_load_n: f64,
    pub velocity_factor: f64,
    /// Cp (√MPa)
    pub elastic_coefficient: f64,
    /// I
    pub geometry_factor: f64,
    pub contact_stress_mpa: f64,
    /// 2.8·Sy (MPa)
    pub pinion_strength_mpa: f64,
    pub gear_strength_mpa: f64,
    pub pinion_safety: SafetyFactor,
    pub gear_safety: SafetyFactor,
}

/// Contact stress σc = Cp·√(Wt·Ko·Kv/(b·d1·I)) and per-member safety factors.
/// Fails like [`bending_stress_analysis`] on an invalid input.
pub fn contact_stress_analysis(
    input: &GearPairInput,
    geometry: &GearGeometry,
    pinion: &MaterialProperties,
    gear: &MaterialProperties,
) -> CalcResult<ContactAnalysis> {
    input.validate()?;
    let wt = transmitted_load(geometry.pinion_torque_nm, geometry.pinion_pitch_diameter_mm);
    let kv = velocity_factor(geometry.pitch_line_velocity_m_s);
    let i = geometry_factor(input.effective_helix_deg(), geometry.gear_ratio);
    let cp = elastic_coefficient(
        pinion.elastic_modulus_mpa(),
        pinion.poisson_ratio,
        gear.elastic_modulus_mpa(),
        gear.poisson_ratio,
    );
    let sigma_c = contact_stress(
        cp,
        wt,
        input.service_factor,
        kv,
        input.face_width_mm,
        geometry.pinion_pitch_diameter_mm,
        i,
    );

    let pinion_strength = CONTACT_STRENGTH_RATIO * pinion.yield_mpa();
    let gear_strength = CONTACT_STRENGTH_RATIO * gear.yield_mpa();

    Ok(ContactAnalysis {
        transmitted_load_n: wt,
        velocity_factor: kv,
        elastic_coefficient: cp,
        geometry_factor: i,
        contact_stress_mpa: sigma_c,
        pinion_strength_mpa: pinion_strength,
        gear_strength_mpa: gear_strength,
        pinion_safety: safety_factor(pinion_strength, sigma_c),
        gear_safety: safety_factor(gear_strength, sigma_c),
    })
}

/// Full result of a gear pair rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearPairResult {
    pub gear_type: GearType,
    /// Name of the pinion material actually used
    pub pinion_material: String,
    pub gear_material: String,
    pub geometry: GearGeometry,
    pub bending: BendingAnalysis,
    pub contact: ContactAnalysis,
    pub required_bending_safety: f64,
    pub required_contact_safety: f64,
    pub warnings: Vec<DesignWarning>,
}

impl GearPairResult {
    pub fn minimum_bending_safety(&self) -> SafetyFactor {
        min_sf(self.bending.pinion_safety, self.bending.gear_safety)
    }

    pub fn minimum_contact_safety(&self) -> SafetyFactor {
        min_sf(self.contact.pinion_safety, self.contact.gear_safety)
    }

    /// All four safety factors meet their targets
    pub fn passes(&self) -> bool {
        self.minimum_bending_safety().meets(self.required_bending_safety)
            && self.minimum_contact_safety().meets(self.required_contact_safety)
    }

    /// Parameter/value table for reports
    pub fn summary(&self, input: &GearPairInput) -> SummaryTable {
        let g = &self.geometry;
        SummaryTable::new("Gear Design Summary")
            .with_row("Gear Type", self.gear_type.display_name())
            .with_row("Pinion Teeth", input.pinion_teeth.to_string())
            .with_row("Gear Teeth", input.gear_teeth.to_string())
            .with_row("Module (mm)", format!("{:.1}", input.module_mm))
            .with_row("Helix Angle (°)", format!("{:.1}", input.effective_helix_deg()))
            .with_row("Face Width (mm)", format!("{:.0}", input.face_width_mm))
            .with_row("Pinion Pitch Diameter (mm)", format!("{:.1}", g.pinion_pitch_diameter_mm))
            .with_row("Gear Pitch Diameter (mm)", format!("{:.1}", g.gear_pitch_diameter_mm))
            .with_row("Center Distance (mm)", format!("{:.1}", g.center_distance_mm))
            .with_row("Gear Ratio", format!("{:.2}", g.gear_ratio))
            .with_row("Power (kW)", format!("{:.1}", input.power_kw))
            .with_row("Pinion Speed (RPM)", format!("{:.0}", input.pinion_rpm))
            .with_row("Gear Speed (RPM)", format!("{:.0}", g.gear_rpm))
            .with_row("Pinion Torque (N·m)", format!("{:.2}", g.pinion_torque_nm))
            .with_row("Gear Torque (N·m)", format!("{:.2}", g.gear_torque_nm))
            .with_row("Pitch Line Velocity (m/s)", format!("{:.2}", g.pitch_line_velocity_m_s))
            .with_row("Transmitted Load (N)", format!("{:.0}", self.bending.transmitted_load_n))
            .with_row("Dynamic Factor (Kv)", format!("{:.2}", self.bending.velocity_factor))
            .with_row("Pinion Lewis Factor", format!("{:.3}", self.bending.pinion_lewis.value))
            .with_row("Gear Lewis Factor", format!("{:.3}", self.bending.gear_lewis.value))
            .with_row("Pinion Bending Stress (MPa)", format!("{:.1}", self.bending.pinion_stress_mpa))
            .with_row("Gear Bending Stress (MPa)", format!("{:.1}", self.bending.gear_stress_mpa))
            .with_row("Elastic Coefficient (Cp)", format!("{:.0}", self.contact.elastic_coefficient))
            .with_row("Geometry Factor (I)", format!("{:.4}", self.contact.geometry_factor))
            .with_row("Contact Stress (MPa)", format!("{:.0}", self.contact.contact_stress_mpa))
            .with_row("Pinion Material", self.pinion_material.clone())
            .with_row("Gear Material", self.gear_material.clone())
    }

    /// Safety factor of each check against its requirement
    pub fn safety_rows(&self) -> SummaryTable {
        let rows = [
            ("Bending (Pinion)", self.bending.pinion_safety, self.required_bending_safety),
            ("Bending (Gear)", self.bending.gear_safety, self.required_bending_safety),
            ("Contact (Pinion)", self.contact.pinion_safety, self.required_contact_safety),
            ("Contact (Gear)", self.contact.gear_safety, self.required_contact_safety),
        ];
        let mut table = SummaryTable::new("Gear Safety Factor Summary");
        for (check, actual, required) in rows {
            table.push(
                check,
                format!("{:.2} (required {:.1}) {}", actual, required, status(actual.meets(required))),
            );
        }
        table
    }
}

fn min_sf(a: SafetyFactor, b: SafetyFactor) -> SafetyFactor {
    if a.value() <= b.value() {
        a
    } else {
        b
    }
}

/// Run the full gear pipeline.
///
/// # Errors
///
/// `InvalidInput` from validation. Unknown material names fall back to the
/// default material with a warning.
pub fn calculate(input: &GearPairInput, settings: &DesignSettings) -> CalcResult<GearPairResult> {
    input.validate()?;

    let mut warnings = Vec::new();
    let pinion = resolve_material(settings.material_name(&input.pinion_material), &mut warnings);
    let gear = resolve_material(settings.material_name(&input.gear_material), &mut warnings);
    tracing::debug!(label = %input.label, pinion = pinion.name, gear = gear.name, "gear pair calculation");

    let geometry = basic_geometry(
        input.pinion_teeth,
        input.gear_teeth,
        input.module_mm,
        input.power_kw,
        input.pinion_rpm,
    )?;
    let bending = bending_stress_analysis(input, &geometry, pinion.properties, gear.properties)?;
    let contact = contact_stress_analysis(input, &geometry, pinion.properties, gear.properties)?;

    for (member, teeth, lewis) in [
        ("pinion", input.pinion_teeth, bending.pinion_lewis),
        ("gear", input.gear_teeth, bending.gear_lewis),
    ] {
        if lewis.resolution == LewisResolution::ClampedHigh {
            warnings.push(DesignWarning::LewisFactorClamped {
                member: member.to_string(),
                teeth,
            });
        }
    }

    let checks = [
        ("Pinion bending", bending.pinion_safety, input.safety_factor_bending),
        ("Gear bending", bending.gear_safety, input.safety_factor_bending),
        ("Pinion contact", contact.pinion_safety, input.safety_factor_contact),
        ("Gear contact", contact.gear_safety, input.safety_factor_contact),
    ];
    for (check, actual, required) in checks {
        if !actual.meets(required) {
            warnings.push(DesignWarning::BelowTargetSafetyFactor {
                check: check.to_string(),
                actual,
                required,
            });
        }
    }

    Ok(GearPairResult {
        gear_type: input.gear_type,
        pinion_material: pinion.name.to_string(),
        gear_material: gear.name.to_string(),
        geometry,
        bending,
        contact,
        required_bending_safety: input.safety_factor_bending,
        required_contact_safety: input.safety_factor_contact,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::lookup;
    use proptest::prelude::*;

    fn example_input() -> GearPairInput {
        GearPairInput {
            label: "G-1".to_string(),
            gear_type: GearType::Spur,
            pinion_teeth: 20,
            gear_teeth: 40,
            module_mm: 3.0,
            helix_angle_deg: 0.0,
            face_width_mm: 50.0,
            power_kw: 10.0,
            pinion_rpm: 1500.0,
            pinion_material: "AISI 1045 Steel".to_string(),
            gear_material: "AISI 1045 Steel".to_string(),
            safety_factor_bending: 2.0,
            safety_factor_contact: 1.5,
            service_factor: 1.25,
            quality_grade: 9,
        }
    }

    #[test]
    fn test_example_geometry() {
        let g = basic_geometry(20, 40, 3.0, 10.0, 1500.0).unwrap();
        assert_eq!(g.gear_ratio, 2.0);
        assert_eq!(g.gear_rpm, 750.0);
        assert_eq!(g.pinion_pitch_diameter_mm, 60.0);
        assert_eq!(g.gear_pitch_diameter_mm, 120.0);
        assert_eq!(g.center_distance_mm, 90.0);
        assert!((g.pinion_torque_nm - 63.662).abs() < 0.001);
        assert!((g.gear_torque_nm - 127.324).abs() < 0.001);
    }

    #[test]
    fn test_pitch_line_velocity_units() {
        // 60 mm at 1500 rpm: π·0.06·25 = 4.712 m/s
        let g = basic_geometry(20, 40, 3.0, 10.0, 1500.0).unwrap();
        assert!((g.pitch_line_velocity_m_s - 4.7124).abs() < 1e-4);
    }

    #[test]
    fn test_geometry_rejects_small_tooth_counts() {
        let err = basic_geometry(11, 40, 3.0, 10.0, 1500.0).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "pinion_teeth"));
        assert!(basic_geometry(20, 40, 0.0, 10.0, 1500.0).is_err());
    }

    #[test]
    fn test_bending_example() {
        let input = example_input();
        let steel = lookup("AISI 1045 Steel").properties;
        let g = basic_geometry(20, 40, 3.0, 10.0, 1500.0).unwrap();
        let b = bending_stress_analysis(&input, &g, steel, steel).unwrap();

        // v < 5 m/s
        assert_eq!(b.velocity_factor, 1.0);
        let wt = 2000.0 * g.pinion_torque_nm / 60.0;
        assert!((b.transmitted_load_n - wt).abs() < 1e-9);

        let expected_pinion = wt * 1.25 / (50.0 * 3.0 * 0.322);
        assert!((b.pinion_stress_mpa - expected_pinion).abs() < 1e-9);
        // gear has more teeth, larger Y, lower stress
        assert!(b.gear_stress_mpa < b.pinion_stress_mpa);
        assert!((b.pinion_safety.value() - 310.0 / expected_pinion).abs() < 1e-9);
    }

    #[test]
    fn test_contact_example() {
        let input = example_input();
        let steel = lookup("AISI 1045 Steel").properties;
        let g = basic_geometry(20, 40, 3.0, 10.0, 1500.0).unwrap();
        let c = contact_stress_analysis(&input, &g, steel, steel).unwrap();

        let i = 20f64.to_radians().sin() / 2.0 * (2.0 / 3.0);
        assert!((c.geometry_factor - i).abs() < 1e-12);
        let expected = c.elastic_coefficient * (c.transmitted_load_n * 1.25 / (50.0 * 60.0 * i)).sqrt();
        assert!((c.contact_stress_mpa - expected).abs() < 1e-9);
        // same material: same safety on both members
        assert_eq!(c.pinion_safety, c.gear_safety);
        assert!((c.pinion_strength_mpa - 868.0).abs() < 1e-9);
    }

    #[test]
    fn test_stress_analyses_reject_invalid_pairs() {
        let steel = lookup("AISI 1045 Steel").properties;
        let g = basic_geometry(20, 40, 3.0, 10.0, 1500.0).unwrap();

        let mut input = example_input();
        input.face_width_mm = 0.0;
        let err = bending_stress_analysis(&input, &g, steel, steel).unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "face_width_mm"));
        assert!(matches!(
            contact_stress_analysis(&input, &g, steel, steel),
            Err(CalcError::InvalidInput { .. })
        ));

        // too few teeth for the Lewis table
        let mut input = example_input();
        input.pinion_teeth = 6;
        assert!(matches!(
            bending_stress_analysis(&input, &g, steel, steel),
            Err(CalcError::InvalidInput { .. })
        ));
        assert!(contact_stress_analysis(&input, &g, steel, steel).is_err());
    }

    #[test]
    fn test_spur_ignores_helix_angle() {
        let mut input = example_input();
        input.helix_angle_deg = 30.0;
        assert_eq!(input.effective_helix_deg(), 0.0);
        input.gear_type = GearType::Helical;
        assert_eq!(input.effective_helix_deg(), 30.0);
    }

    #[test]
    fn test_high_speed_uses_velocity_factor() {
        let mut input = example_input();
        input.pinion_rpm = 6000.0;
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        let v = result.geometry.pitch_line_velocity_m_s;
        assert!(v > 10.0);
        assert!((result.bending.velocity_factor - (5.56 + v.sqrt()) / 5.56).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_example_passes() {
        let result = calculate(&example_input(), &DesignSettings::default()).unwrap();
        assert!(result.passes(), "{:?}", result.warnings);
        assert!(result.warnings.is_empty());
        assert_eq!(result.minimum_bending_safety(), result.bending.pinion_safety);
        let rows = result.safety_rows();
        assert_eq!(rows.len(), 4);
        assert!(rows.get("Contact (Gear)").unwrap().ends_with("OK"));
    }

    #[test]
    fn test_calculate_warns_on_weak_pair() {
        let mut input = example_input();
        input.power_kw = 200.0;
        input.pinion_material = "Brass C36000".to_string();
        input.gear_material = "Brass C36000".to_string();
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        assert!(!result.passes());
        let low: Vec<_> = result
            .warnings
            .iter()
            .filter(|w| matches!(w, DesignWarning::BelowTargetSafetyFactor { .. }))
            .collect();
        assert_eq!(low.len(), 4);
    }

    #[test]
    fn test_calculate_material_fallback_and_clamp_warnings() {
        let mut input = example_input();
        input.gear_teeth = 320;
        input.gear_material = "Mithril".to_string();
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        assert_eq!(result.gear_material, "AISI 1045 Steel");
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, DesignWarning::MaterialFallback { requested, .. } if requested == "Mithril")));
        assert!(result
            .warnings
            .iter()
            .any(|w| matches!(w, DesignWarning::LewisFactorClamped { teeth: 320, .. })));
    }

    #[test]
    fn test_validation() {
        let mut input = example_input();
        input.gear_teeth = 10;
        assert!(input.validate().is_err());

        let mut input = example_input();
        input.helix_angle_deg = 50.0;
        assert!(input.validate().is_err());

        let mut input = example_input();
        input.quality_grade = 13;
        assert!(input.validate().is_err());

        let mut input = example_input();
        input.face_width_mm = -5.0;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_input_defaults_from_json() {
        let json = r#"{
            "pinion_teeth": 18, "gear_teeth": 54, "module_mm": 2.5,
            "face_width_mm": 30.0, "power_kw": 5.0, "pinion_rpm": 1450.0
        }"#;
        let input: GearPairInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.gear_type, GearType::Spur);
        assert_eq!(input.service_factor, 1.25);
        assert_eq!(input.quality_grade, 9);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_summary_rows() {
        let input = example_input();
        let result = calculate(&input, &DesignSettings::default()).unwrap();
        let table = result.summary(&input);
        assert_eq!(table.get("Gear Ratio"), Some("2.00"));
        assert_eq!(table.get("Center Distance (mm)"), Some("90.0"));
        assert_eq!(table.get("Pinion Torque (N·m)"), Some("63.66"));
        assert_eq!(table.get("Gear Torque (N·m)"), Some("127.32"));
    }

    proptest! {
        #[test]
        fn prop_more_power_means_lower_bending_safety(p in 0.5f64..100.0, extra in 0.1f64..50.0) {
            let settings = DesignSettings::default();
            let mut input = example_input();
            input.power_kw = p;
            let low = calculate(&input, &settings).unwrap();
            input.power_kw = p + extra;
            let high = calculate(&input, &settings).unwrap();
            prop_assert!(high.minimum_bending_safety().value() < low.minimum_bending_safety().value());
            prop_assert!(high.minimum_contact_safety().value() < low.minimum_contact_safety().value());
        }

        #[test]
        fn prop_geometry_consistency(z1 in 12u32..100, z2 in 12u32..300, m in 0.5f64..10.0) {
            let g = basic_geometry(z1, z2, m, 10.0, 1000.0).unwrap();
            prop_assert!((g.center_distance_mm - m * f64::from(z1 + z2) / 2.0).abs() < 1e-9);
            prop_assert!((g.gear_torque_nm / g.pinion_torque_nm - g.gear_ratio).abs() < 1e-9);
        }
    }
}
