//! # Gear Tooth Rating Factors
//!
//! Lewis bending and AGMA-style contact rating factors for external spur and
//! helical gear pairs.
//!
//! ## Units
//!
//! Tooth forces and stresses use the N-mm system: loads in N, lengths in mm,
//! stresses in MPa. The elastic coefficient takes moduli in MPa, giving Cp in
//! √MPa.
//!
//! ## References
//!
//! - Shigley's Mechanical Engineering Design, Chapter 14
//! - AGMA 2001-D04 (simplified)

use serde::{Deserialize, Serialize};

/// Pressure angle of standard involute teeth (degrees)
pub const PRESSURE_ANGLE_DEG: f64 = 20.0;

/// Pitch-line velocity (m/s) up to which the dynamic factor is 1
pub const KV_THRESHOLD_M_S: f64 = 5.0;

/// Lower bound substituted for a non-positive geometry factor
pub const MIN_GEOMETRY_FACTOR: f64 = 0.1;

/// Lewis form factor Y for 20° full-depth teeth, keyed by tooth count
pub const LEWIS_TABLE: [(u32, f64); 23] = [
    (12, 0.245),
    (13, 0.261),
    (14, 0.277),
    (15, 0.290),
    (16, 0.296),
    (17, 0.303),
    (18, 0.309),
    (19, 0.314),
    (20, 0.322),
    (22, 0.331),
    (24, 0.337),
    (26, 0.346),
    (28, 0.353),
    (30, 0.359),
    (34, 0.371),
    (38, 0.384),
    (43, 0.397),
    (50, 0.409),
    (60, 0.422),
    (75, 0.435),
    (100, 0.447),
    (150, 0.460),
    (300, 0.472),
];

/// How a Lewis factor was obtained from the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LewisResolution {
    /// Tooth count is a table key
    Exact,
    /// Linear interpolation between neighbouring keys
    Interpolated,
    /// Below the smallest key; smallest entry used
    ClampedLow,
    /// Above the largest key; largest entry used
    ClampedHigh,
}

/// Lewis factor together with how it was resolved
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LewisFactor {
    pub value: f64,
    pub resolution: LewisResolution,
}

/// Resolve the Lewis form factor for `teeth`, reporting clamping.
///
/// ```rust
/// use shaftgear_core::equations::gear::{lewis_form_factor_lookup, LewisResolution};
///
/// let y = lewis_form_factor_lookup(21);
/// assert_eq!(y.resolution, LewisResolution::Interpolated);
/// assert!((y.value - 0.3265).abs() < 1e-12);
/// ```
pub fn lewis_form_factor_lookup(teeth: u32) -> LewisFactor {
    let (min_t, min_y) = LEWIS_TABLE[0];
    let (max_t, max_y) = LEWIS_TABLE[LEWIS_TABLE.len() - 1];

    if teeth < min_t {
        return LewisFactor {
            value: min_y,
            resolution: LewisResolution::ClampedLow,
        };
    }
    if teeth > max_t {
        return LewisFactor {
            value: max_y,
            resolution: LewisResolution::ClampedHigh,
        };
    }

    match LEWIS_TABLE.binary_search_by_key(&teeth, |&(t, _)| t) {
        Ok(i) => LewisFactor {
            value: LEWIS_TABLE[i].1,
            resolution: LewisResolution::Exact,
        },
        Err(i) => {
            // min_t < teeth < max_t, so 0 < i < len
            let (t1, y1) = LEWIS_TABLE[i - 1];
            let (t2, y2) = LEWIS_TABLE[i];
            let frac = f64::from(teeth - t1) / f64::from(t2 - t1);
            LewisFactor {
                value: y1 + (y2 - y1) * frac,
                resolution: LewisResolution::Interpolated,
            }
        }
    }
}

/// Lewis form factor Y for `teeth`
#[inline]
pub fn lewis_form_factor(teeth: u32) -> f64 {
    lewis_form_factor_lookup(teeth).value
}

/// Dynamic (velocity) factor Kv
///
/// # Formula
/// - v ≤ 5 m/s: Kv = 1
/// - v > 5 m/s: Kv = (5.56 + √v)/5.56
#[inline]
pub fn velocity_factor(pitch_line_velocity_m_s: f64) -> f64 {
    if pitch_line_velocity_m_s <= KV_THRESHOLD_M_S {
        1.0
    } else {
        (5.56 + pitch_line_velocity_m_s.sqrt()) / 5.56
    }
}

/// Tangential (transmitted) load at the pitch circle in N
///
/// # Formula
/// Wt = 2000·T/d, with T in N·m and d in mm
#[inline]
pub fn transmitted_load(torque_nm: f64, pitch_diameter_mm: f64) -> f64 {
    2000.0 * torque_nm / pitch_diameter_mm
}

/// Lewis bending stress in MPa
///
/// # Formula
/// σb = Wt·Ko·Kv·Ks/(b·m·Y)
#[inline]
pub fn lewis_bending_stress(
    transmitted_load_n: f64,
    overload_factor: f64,
    velocity_factor: f64,
    size_factor: f64,
    face_width_mm: f64,
    module_mm: f64,
    lewis_factor: f64,
) -> f64 {
    transmitted_load_n * overload_factor * velocity_factor * size_factor / (face_width_mm * module_mm * lewis_factor)
}

/// Elastic coefficient Cp in √MPa
///
/// # Formula
/// Cp = √(1 / (π·((1−ν1²)/E1 + (1−ν2²)/E2)))
#[inline]
pub fn elastic_coefficient(e1_mpa: f64, nu1: f64, e2_mpa: f64, nu2: f64) -> f64 {
    let compliance = (1.0 - nu1.powi(2)) / e1_mpa + (1.0 - nu2.powi(2)) / e2_mpa;
    (1.0 / (std::f64::consts::PI * compliance)).sqrt()
}

/// Simplified pitting geometry factor I
///
/// # Formula
/// I = cos ψ · sin φ / 2 · mg/(mg + 1), φ = 20°
///
/// Non-positive results (ψ ≥ 90°) are replaced by [`MIN_GEOMETRY_FACTOR`].
pub fn geometry_factor(helix_angle_deg: f64, gear_ratio: f64) -> f64 {
    let i = helix_angle_deg.to_radians().cos() * PRESSURE_ANGLE_DEG.to_radians().sin() / 2.0
        * (gear_ratio / (gear_ratio + 1.0));
    if i <= 0.0 {
        MIN_GEOMETRY_FACTOR
    } else {
        i
    }
}

/// Hertzian contact stress in MPa
///
/// # Formula
/// σc = Cp·√(Wt·Ko·Kv/(b·d1·I))
#[inline]
pub fn contact_stress(
    elastic_coefficient: f64,
    transmitted_load_n: f64,
    overload_factor: f64,
    velocity_factor: f64,
    face_width_mm: f64,
    pinion_diameter_mm: f64,
    geometry_factor: f64,
) -> f64 {
    elastic_coefficient
        * (transmitted_load_n * overload_factor * velocity_factor
            / (face_width_mm * pinion_diameter_mm * geometry_factor))
            .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lewis_exact_keys() {
        assert_eq!(lewis_form_factor(20), 0.322);
        for &(t, y) in LEWIS_TABLE.iter() {
            let f = lewis_form_factor_lookup(t);
            assert_eq!(f.value, y);
            assert_eq!(f.resolution, LewisResolution::Exact);
        }
    }

    #[test]
    fn test_lewis_clamping() {
        let low = lewis_form_factor_lookup(8);
        assert_eq!(low.value, 0.245);
        assert_eq!(low.resolution, LewisResolution::ClampedLow);

        let high = lewis_form_factor_lookup(400);
        assert_eq!(high.value, 0.472);
        assert_eq!(high.resolution, LewisResolution::ClampedHigh);
    }

    #[test]
    fn test_lewis_interpolation() {
        // 40 teeth: between 38 (0.384) and 43 (0.397)
        let y = lewis_form_factor(40);
        assert!((y - (0.384 + 0.013 * 2.0 / 5.0)).abs() < 1e-12);
    }

    #[test]
    fn test_lewis_monotone() {
        let mut prev = 0.0;
        for t in 1..=400 {
            let y = lewis_form_factor(t);
            assert!(y >= prev, "Y({}) = {} < {}", t, y, prev);
            prev = y;
        }
    }

    #[test]
    fn test_velocity_factor() {
        assert_eq!(velocity_factor(0.0), 1.0);
        assert_eq!(velocity_factor(5.0), 1.0);
        let kv = velocity_factor(9.0);
        assert!((kv - (5.56 + 3.0) / 5.56).abs() < 1e-12);
        // same branch above 10 m/s
        let kv = velocity_factor(16.0);
        assert!((kv - (5.56 + 4.0) / 5.56).abs() < 1e-12);
    }

    #[test]
    fn test_transmitted_load() {
        // 63.66 N·m on a 60 mm pitch circle
        assert!((transmitted_load(63.662, 60.0) - 2122.07).abs() < 0.01);
    }

    #[test]
    fn test_elastic_coefficient_steel_on_steel() {
        // ≈ 187 √MPa for E = 200 GPa, ν = 0.29
        let cp = elastic_coefficient(200_000.0, 0.29, 200_000.0, 0.29);
        assert!((cp - 186.9).abs() < 0.5, "Cp = {}", cp);
    }

    #[test]
    fn test_geometry_factor() {
        let i = geometry_factor(0.0, 2.0);
        let expected = 20f64.to_radians().sin() / 2.0 * (2.0 / 3.0);
        assert!((i - expected).abs() < 1e-12);
        assert_eq!(geometry_factor(120.0, 2.0), MIN_GEOMETRY_FACTOR);
    }
}
