//! # Fatigue Modifying Factors
//!
//! Stress concentration, Marin surface and size factors, and a simplified
//! S-N life estimate for steel shafts.
//!
//! Strength arguments are in Pa unless noted; diameters in mm.
//!
//! ## References
//!
//! - Shigley's Mechanical Engineering Design, Chapter 6
//! - Peterson's Stress Concentration Factors (curve fits)

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{require_non_negative, require_positive, CalcError, CalcResult};

/// Pa per ksi
const PA_PER_KSI: f64 = 6.895e6;

/// mm per inch
const MM_PER_IN: f64 = 25.4;

/// Geometric feature that raises local stress on a shaft
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StressRaiser {
    /// Plain shaft, Kt = 1
    None,
    /// Stepped shaft with a shoulder fillet
    Shoulder {
        /// Fillet radius r (mm)
        fillet_radius: f64,
        /// Smaller shaft diameter d (mm)
        small_diameter: f64,
        /// Larger shaft diameter D (mm)
        large_diameter: f64,
    },
    /// Profile keyway (conservative constant)
    Keyway,
    /// Transverse cross-drilled hole
    TransverseHole {
        /// Hole diameter (mm)
        hole_diameter: f64,
        /// Shaft diameter (mm)
        shaft_diameter: f64,
    },
}

/// Theoretical stress concentration factor Kt
///
/// # Formulas
/// - Shoulder: Kt = 1 + 0.25·√(D/d − 1)/√(r/d), with r/d ≥ 0.01 and D/d ≥ 1.1
/// - Keyway: Kt = 2.0
/// - Transverse hole: Kt = 3 − 3.13x + 3.66x² − 1.53x³, x = min(a/D, 0.5)
///
/// # Errors
///
/// `InvalidInput` for a non-positive shaft diameter or a negative fillet
/// radius or hole diameter.
///
/// ```rust
/// use shaftgear_core::equations::fatigue::{stress_concentration, StressRaiser};
///
/// assert_eq!(stress_concentration(StressRaiser::Keyway).unwrap(), 2.0);
/// assert_eq!(stress_concentration(StressRaiser::None).unwrap(), 1.0);
/// ```
pub fn stress_concentration(raiser: StressRaiser) -> CalcResult<f64> {
    let kt = match raiser {
        StressRaiser::None => 1.0,
        StressRaiser::Keyway => 2.0,
        StressRaiser::Shoulder {
            fillet_radius,
            small_diameter,
            large_diameter,
        } => {
            require_non_negative("fillet_radius", fillet_radius)?;
            require_positive("small_diameter", small_diameter)?;
            require_positive("large_diameter", large_diameter)?;
            let r_d = (fillet_radius / small_diameter).max(0.01);
            let big_d = (large_diameter / small_diameter).max(1.1);
            1.0 + 0.25 * (big_d - 1.0).sqrt() / r_d.sqrt()
        }
        StressRaiser::TransverseHole {
            hole_diameter,
            shaft_diameter,
        } => {
            require_non_negative("hole_diameter", hole_diameter)?;
            require_positive("shaft_diameter", shaft_diameter)?;
            let x = (hole_diameter / shaft_diameter).min(0.5);
            3.0 - 3.13 * x + 3.66 * x.powi(2) - 1.53 * x.powi(3)
        }
    };
    Ok(kt)
}

/// Surface condition for the Marin surface factor ka
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceFinish {
    MirrorPolished,
    Polished,
    #[default]
    Machined,
    HotRolled,
    AsForged,
}

impl SurfaceFinish {
    pub const ALL: [SurfaceFinish; 5] = [
        SurfaceFinish::MirrorPolished,
        SurfaceFinish::Polished,
        SurfaceFinish::Machined,
        SurfaceFinish::HotRolled,
        SurfaceFinish::AsForged,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SurfaceFinish::MirrorPolished => "Mirror polished",
            SurfaceFinish::Polished => "Polished",
            SurfaceFinish::Machined => "Machined",
            SurfaceFinish::HotRolled => "Hot rolled",
            SurfaceFinish::AsForged => "As forged",
        }
    }

    /// Coefficients (a, b) of ka = a·Sut^b, Sut in ksi
    pub fn coefficients(&self) -> (f64, f64) {
        match self {
            SurfaceFinish::MirrorPolished => (1.58, -0.085),
            SurfaceFinish::Polished | SurfaceFinish::Machined => (4.51, -0.265),
            SurfaceFinish::HotRolled => (57.7, -0.718),
            SurfaceFinish::AsForged => (272.0, -0.995),
        }
    }

    /// Parse "hot rolled", "hot_rolled", "Hot-Rolled", ...
    pub fn from_str_flexible(s: &str) -> CalcResult<Self> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| if c == ' ' || c == '-' { '_' } else { c.to_ascii_lowercase() })
            .collect();
        match key.as_str() {
            "mirror_polished" => Ok(SurfaceFinish::MirrorPolished),
            "polished" => Ok(SurfaceFinish::Polished),
            "machined" => Ok(SurfaceFinish::Machined),
            "hot_rolled" => Ok(SurfaceFinish::HotRolled),
            "as_forged" | "forged" => Ok(SurfaceFinish::AsForged),
            _ => Err(CalcError::invalid_input("surface_finish", s, "Unknown surface finish")),
        }
    }
}

impl fmt::Display for SurfaceFinish {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Marin surface factor ka, never above 1.0
///
/// # Formula
/// ka = a·Sut_ksi^b
pub fn surface_finish_factor(finish: SurfaceFinish, ultimate_strength_pa: f64) -> CalcResult<f64> {
    require_positive("ultimate_strength", ultimate_strength_pa)?;
    let (a, b) = finish.coefficients();
    let sut_ksi = ultimate_strength_pa / PA_PER_KSI;
    Ok((a * sut_ksi.powf(b)).min(1.0))
}

/// Loading mode for the Marin size factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingType {
    #[default]
    Bending,
    Torsion,
    Axial,
}

/// Marin size factor kb for a round section
///
/// Bending and torsion, diameter in inches:
/// - d ≤ 0.3: 1.0
/// - d ≤ 2: (d/0.3)^−0.107
/// - d ≤ 10: 0.91·d^−0.157
/// - larger diameters use the 10 in value
///
/// Axial loading has no size effect. The diameter must be positive for
/// every loading mode.
pub fn size_factor(diameter_mm: f64, loading: LoadingType) -> CalcResult<f64> {
    require_positive("diameter_mm", diameter_mm)?;
    if loading == LoadingType::Axial {
        return Ok(1.0);
    }
    let d_in = diameter_mm / MM_PER_IN;
    let kb = if d_in <= 0.3 {
        1.0
    } else if d_in <= 2.0 {
        (d_in / 0.3).powf(-0.107)
    } else {
        0.91 * d_in.min(10.0).powf(-0.157)
    };
    Ok(kb)
}

/// Estimated number of cycles to failure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "cycles", rename_all = "snake_case")]
pub enum FatigueLife {
    /// Amplitude at or below the endurance limit
    Infinite,
    /// Finite life in cycles (at least 1)
    Cycles(f64),
}

impl FatigueLife {
    pub fn is_infinite(&self) -> bool {
        matches!(self, FatigueLife::Infinite)
    }

    /// Cycles as a float, `f64::INFINITY` for infinite life
    pub fn cycles(&self) -> f64 {
        match self {
            FatigueLife::Infinite => f64::INFINITY,
            FatigueLife::Cycles(n) => *n,
        }
    }
}

impl fmt::Display for FatigueLife {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatigueLife::Infinite => write!(f, "infinite"),
            FatigueLife::Cycles(n) => write!(f, "{:.3e} cycles", n),
        }
    }
}

/// Simplified Basquin S-N life estimate (steel exponent b = −0.12).
///
/// - σa ≤ Se ⇒ infinite life; Se defaults to 0.5·Sut
/// - σa > Sy ⇒ failure in the first cycle
/// - otherwise N = (σa / 0.9·Sut)^(1/b), at least 1
///
/// All stresses in the same unit. Strengths must be positive and the
/// amplitude non-negative.
pub fn fatigue_life(
    stress_amplitude: f64,
    ultimate_strength: f64,
    yield_strength: f64,
    endurance_limit: Option<f64>,
) -> CalcResult<FatigueLife> {
    require_non_negative("stress_amplitude", stress_amplitude)?;
    require_positive("ultimate_strength", ultimate_strength)?;
    require_positive("yield_strength", yield_strength)?;
    if let Some(se) = endurance_limit {
        require_positive("endurance_limit", se)?;
    }

    let endurance = endurance_limit.unwrap_or(0.5 * ultimate_strength);
    if stress_amplitude <= endurance {
        return Ok(FatigueLife::Infinite);
    }
    if stress_amplitude > yield_strength {
        return Ok(FatigueLife::Cycles(1.0));
    }

    const B: f64 = -0.12;
    let coefficient = 0.9 * ultimate_strength;
    let n = (stress_amplitude / coefficient).powf(1.0 / B);
    Ok(FatigueLife::Cycles(n.max(1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shoulder_kt() {
        // r/d = 0.1, D/d = 1.5 -> 1 + 0.25·√0.5/√0.1
        let kt = stress_concentration(StressRaiser::Shoulder {
            fillet_radius: 3.0,
            small_diameter: 30.0,
            large_diameter: 45.0,
        })
        .unwrap();
        let expected = 1.0 + 0.25 * 0.5_f64.sqrt() / 0.1_f64.sqrt();
        assert!((kt - expected).abs() < 1e-12);
    }

    #[test]
    fn test_shoulder_ratios_are_clamped() {
        // sharp corner and tiny step are clamped to r/d = 0.01, D/d = 1.1
        let kt = stress_concentration(StressRaiser::Shoulder {
            fillet_radius: 0.0,
            small_diameter: 40.0,
            large_diameter: 40.0,
        })
        .unwrap();
        let expected = 1.0 + 0.25 * 0.1_f64.sqrt() / 0.1;
        assert!((kt - expected).abs() < 1e-9);
    }

    #[test]
    fn test_transverse_hole_kt() {
        let kt = stress_concentration(StressRaiser::TransverseHole {
            hole_diameter: 0.0,
            shaft_diameter: 20.0,
        })
        .unwrap();
        assert!((kt - 3.0).abs() < 1e-12);

        // ratio above 0.5 uses 0.5
        let big = stress_concentration(StressRaiser::TransverseHole {
            hole_diameter: 18.0,
            shaft_diameter: 20.0,
        })
        .unwrap();
        let half = stress_concentration(StressRaiser::TransverseHole {
            hole_diameter: 10.0,
            shaft_diameter: 20.0,
        })
        .unwrap();
        assert_eq!(big, half);
    }

    #[test]
    fn test_stress_raiser_json_shape() {
        let json = serde_json::to_string(&StressRaiser::Keyway).unwrap();
        assert_eq!(json, r#"{"type":"keyway"}"#);
        let back: StressRaiser =
            serde_json::from_str(r#"{"type":"transverse_hole","hole_diameter":5.0,"shaft_diameter":20.0}"#)
                .unwrap();
        assert!(matches!(back, StressRaiser::TransverseHole { .. }));
    }

    #[test]
    fn test_surface_factor_capped() {
        // soft material gives a > 1 raw value for mirror polish
        assert_eq!(surface_finish_factor(SurfaceFinish::MirrorPolished, 100e6).unwrap(), 1.0);
    }

    #[test]
    fn test_surface_factor_hot_rolled_1045() {
        // Sut = 565 MPa ≈ 81.9 ksi
        let ka = surface_finish_factor(SurfaceFinish::HotRolled, 565e6).unwrap();
        let expected = 57.7 * (565e6 / PA_PER_KSI).powf(-0.718);
        assert!((ka - expected).abs() < 1e-12);
        assert!(ka < 1.0);
    }

    #[test]
    fn test_surface_finish_parsing() {
        assert_eq!(SurfaceFinish::from_str_flexible("Hot Rolled").unwrap(), SurfaceFinish::HotRolled);
        assert_eq!(SurfaceFinish::from_str_flexible("as-forged").unwrap(), SurfaceFinish::AsForged);
        assert!(SurfaceFinish::from_str_flexible("sandblasted").is_err());
    }

    #[test]
    fn test_size_factor_bands() {
        assert_eq!(size_factor(5.0, LoadingType::Bending).unwrap(), 1.0);
        let kb = size_factor(25.4, LoadingType::Torsion).unwrap();
        assert!((kb - (1.0 / 0.3_f64).powf(-0.107)).abs() < 1e-12);
        let kb = size_factor(127.0, LoadingType::Bending).unwrap();
        assert!((kb - 0.91 * 5.0_f64.powf(-0.157)).abs() < 1e-12);
        assert_eq!(size_factor(500.0, LoadingType::Bending).unwrap(), size_factor(254.0, LoadingType::Bending).unwrap());
        assert_eq!(size_factor(500.0, LoadingType::Axial).unwrap(), 1.0);
    }

    #[test]
    fn test_fatigue_life_regions() {
        let (sut, sy) = (565e6, 310e6);
        assert_eq!(fatigue_life(200e6, sut, sy, None).unwrap(), FatigueLife::Infinite);
        assert_eq!(fatigue_life(400e6, sut, sy, None).unwrap(), FatigueLife::Cycles(1.0));

        let life = fatigue_life(300e6, sut, sy, Some(250e6)).unwrap();
        let expected = (300e6 / (0.9 * sut)).powf(1.0 / -0.12);
        match life {
            FatigueLife::Cycles(n) => assert!((n - expected).abs() / expected < 1e-12),
            FatigueLife::Infinite => panic!("expected finite life"),
        }
    }

    #[test]
    fn test_stress_concentration_rejects_bad_geometry() {
        let shoulder = stress_concentration(StressRaiser::Shoulder {
            fillet_radius: 2.0,
            small_diameter: 0.0,
            large_diameter: 40.0,
        });
        assert!(matches!(shoulder, Err(CalcError::InvalidInput { .. })));

        let hole = stress_concentration(StressRaiser::TransverseHole {
            hole_diameter: -5.0,
            shaft_diameter: 20.0,
        });
        assert!(matches!(hole, Err(CalcError::InvalidInput { .. })));

        let fillet = stress_concentration(StressRaiser::Shoulder {
            fillet_radius: f64::NAN,
            small_diameter: 30.0,
            large_diameter: 40.0,
        });
        assert!(fillet.is_err());
    }

    #[test]
    fn test_size_factor_rejects_non_positive_diameter() {
        assert!(size_factor(-10.0, LoadingType::Bending).is_err());
        assert!(size_factor(0.0, LoadingType::Axial).is_err());
    }

    #[test]
    fn test_surface_factor_rejects_zero_strength() {
        assert!(surface_finish_factor(SurfaceFinish::Machined, 0.0).is_err());
    }

    #[test]
    fn test_fatigue_life_rejects_bad_strengths() {
        assert!(matches!(
            fatigue_life(100e6, 0.0, 310e6, None),
            Err(CalcError::InvalidInput { .. })
        ));
        assert!(fatigue_life(-1.0, 565e6, 310e6, None).is_err());
        assert!(fatigue_life(100e6, 565e6, 0.0, None).is_err());
        assert!(fatigue_life(100e6, 565e6, 310e6, Some(-2e6)).is_err());
    }

    #[test]
    fn test_fatigue_life_json() {
        let json = serde_json::to_string(&FatigueLife::Infinite).unwrap();
        assert_eq!(json, r#"{"kind":"infinite"}"#);
    }
}
