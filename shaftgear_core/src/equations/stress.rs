//! # Stress Combination and Safety Factors
//!
//! Equivalent-stress measures used to compare a multi-axial stress state
//! against a uniaxial material strength.
//!
//! ## Sign Conventions
//!
//! - Normal stress: positive in tension
//! - Shear stress: sign only matters for principal directions
//!
//! ## References
//!
//! - Shigley's Mechanical Engineering Design, Sections 3-6 and 5-5
//! - Roark's Formulas for Stress and Strain, Chapter 2

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ratio of strength to applied stress.
///
/// Zero applied stress gives the unbounded sentinel (`+∞`) instead of a
/// division fault. JSON has no infinity, so the sentinel serializes as the
/// string `"unbounded"`.
///
/// ```rust
/// use shaftgear_core::equations::stress::{safety_factor, SafetyFactor};
///
/// let sf = safety_factor(310e6, 0.0);
/// assert!(sf.is_unbounded());
/// assert_eq!(serde_json::to_string(&sf).unwrap(), "\"unbounded\"");
///
/// let sf = safety_factor(310e6, 155e6);
/// assert_eq!(sf.value(), 2.0);
/// assert!(sf.meets(2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SafetyFactor(f64);

impl SafetyFactor {
    /// "No limit": the applied stress is zero
    pub const UNBOUNDED: SafetyFactor = SafetyFactor(f64::INFINITY);

    /// Wrap a finite ratio
    pub fn new(value: f64) -> Self {
        SafetyFactor(value)
    }

    /// Raw ratio (`f64::INFINITY` when unbounded)
    pub fn value(self) -> f64 {
        self.0
    }

    /// True for the zero-stress sentinel
    pub fn is_unbounded(self) -> bool {
        self.0.is_infinite() && self.0 > 0.0
    }

    /// True when the ratio reaches `target`
    pub fn meets(self, target: f64) -> bool {
        self.0 >= target
    }
}

impl fmt::Display for SafetyFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unbounded() {
            return write!(f, "unbounded");
        }
        match f.precision() {
            Some(p) => write!(f, "{:.*}", p, self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

impl Serialize for SafetyFactor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_unbounded() {
            serializer.serialize_str("unbounded")
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for SafetyFactor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(v) => Ok(SafetyFactor(v)),
            Repr::Text(s) if s == "unbounded" => Ok(SafetyFactor::UNBOUNDED),
            Repr::Text(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"unbounded\", got \"{}\"",
                s
            ))),
        }
    }
}

/// Strength-to-stress ratio, unbounded when `applied_stress ≤ 0`.
///
/// `strength` and `applied_stress` must be in the same unit.
#[inline]
pub fn safety_factor(strength: f64, applied_stress: f64) -> SafetyFactor {
    if applied_stress <= 0.0 {
        SafetyFactor::UNBOUNDED
    } else {
        SafetyFactor::new(strength / applied_stress)
    }
}

/// Full three-dimensional von Mises equivalent stress
///
/// # Formula
/// σ_vm = √(½[(σx−σy)² + (σy−σz)² + (σz−σx)²] + 3(τxy² + τxz² + τyz²))
#[inline]
pub fn von_mises_3d(sigma_x: f64, sigma_y: f64, sigma_z: f64, tau_xy: f64, tau_xz: f64, tau_yz: f64) -> f64 {
    let normal = 0.5 * ((sigma_x - sigma_y).powi(2) + (sigma_y - sigma_z).powi(2) + (sigma_z - sigma_x).powi(2));
    let shear = 3.0 * (tau_xy.powi(2) + tau_xz.powi(2) + tau_yz.powi(2));
    (normal + shear).sqrt()
}

/// von Mises stress for one normal and one shear component
///
/// This is the shaft-surface case: combined axial+bending stress with
/// torsional shear.
///
/// # Formula
/// σ_vm = √(σ² + 3τ²)
#[inline]
pub fn von_mises_plane(normal: f64, shear: f64) -> f64 {
    (normal.powi(2) + 3.0 * shear.powi(2)).sqrt()
}

/// Principal stresses of a 2D stress state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrincipalStresses {
    /// Maximum principal stress σ1
    pub sigma_1: f64,
    /// Minimum principal stress σ2
    pub sigma_2: f64,
    /// Angle from the x axis to the σ1 direction (rad)
    pub angle_rad: f64,
}

impl PrincipalStresses {
    /// Maximum in-plane shear stress (σ1 − σ2)/2
    pub fn max_shear(&self) -> f64 {
        (self.sigma_1 - self.sigma_2) / 2.0
    }
}

/// Mohr's-circle decomposition of (σx, σy, τxy).
///
/// # Formulas
/// - σ1,2 = (σx+σy)/2 ± √(((σx−σy)/2)² + τxy²)
/// - θp = ½·atan(2τxy/(σx−σy)); ±π/4 when σx = σy
pub fn principal_stresses(sigma_x: f64, sigma_y: f64, tau_xy: f64) -> PrincipalStresses {
    let center = (sigma_x + sigma_y) / 2.0;
    let radius = (((sigma_x - sigma_y) / 2.0).powi(2) + tau_xy.powi(2)).sqrt();

    let diff = sigma_x - sigma_y;
    let angle_rad = if diff != 0.0 {
        0.5 * (2.0 * tau_xy / diff).atan()
    } else if tau_xy > 0.0 {
        std::f64::consts::FRAC_PI_4
    } else {
        -std::f64::consts::FRAC_PI_4
    };

    PrincipalStresses {
        sigma_1: center + radius,
        sigma_2: center - radius,
        angle_rad,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_at_zero_stress() {
        for strength in [1.0, 205e6, 1240e6] {
            assert!(safety_factor(strength, 0.0).is_unbounded());
        }
        assert_eq!(safety_factor(100.0, 0.0).value(), f64::INFINITY);
    }

    #[test]
    fn test_safety_factor_roundtrip_json() {
        let finite = SafetyFactor::new(2.5);
        let json = serde_json::to_string(&finite).unwrap();
        assert_eq!(json, "2.5");
        assert_eq!(serde_json::from_str::<SafetyFactor>(&json).unwrap(), finite);

        let json = serde_json::to_string(&SafetyFactor::UNBOUNDED).unwrap();
        let back: SafetyFactor = serde_json::from_str(&json).unwrap();
        assert!(back.is_unbounded());

        assert!(serde_json::from_str::<SafetyFactor>("\"lots\"").is_err());
    }

    #[test]
    fn test_safety_factor_display() {
        assert_eq!(format!("{:.2}", SafetyFactor::new(1.23456)), "1.23");
        assert_eq!(format!("{:.2}", SafetyFactor::UNBOUNDED), "unbounded");
    }

    #[test]
    fn test_plane_von_mises_pure_bending() {
        let sigma = 123.4e6;
        assert_eq!(von_mises_plane(sigma, 0.0), sigma);
    }

    #[test]
    fn test_plane_von_mises_pure_shear() {
        let tau = 50.0;
        assert!((von_mises_plane(0.0, tau) - 3f64.sqrt() * tau).abs() < 1e-12);
    }

    #[test]
    fn test_3d_reduces_to_plane() {
        let (s, t) = (80.0, 30.0);
        let full = von_mises_3d(s, 0.0, 0.0, t, 0.0, 0.0);
        assert!((full - von_mises_plane(s, t)).abs() < 1e-12);
    }

    #[test]
    fn test_hydrostatic_state_has_zero_von_mises() {
        assert!(von_mises_3d(100.0, 100.0, 100.0, 0.0, 0.0, 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_principal_stresses() {
        // σx=80, σy=-40, τ=25 -> center 20, R = sqrt(60² + 25²) = 65
        let p = principal_stresses(80.0, -40.0, 25.0);
        assert!((p.sigma_1 - 85.0).abs() < 1e-9);
        assert!((p.sigma_2 + 45.0).abs() < 1e-9);
        assert!((p.max_shear() - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_principal_angle_equal_normals() {
        let p = principal_stresses(10.0, 10.0, 5.0);
        assert!((p.angle_rad - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        let p = principal_stresses(10.0, 10.0, -5.0);
        assert!((p.angle_rad + std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }
}
