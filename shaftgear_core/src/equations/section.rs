//! # Circular Cross-Section Properties
//!
//! Geometric properties of solid and hollow round shafts. A solid shaft is a
//! hollow one with inner diameter zero; every formula below reduces to the
//! solid case exactly when `d = 0`.
//!
//! ## Notation
//!
//! - `D` = Outer diameter
//! - `d` = Inner (bore) diameter, 0 for a solid shaft
//! - `A` = Cross-sectional area
//! - `I` = Second moment of area about a diameter
//! - `J` = Polar moment of area
//! - `Z` = Bending section modulus I/c, with c = D/2
//!
//! ## References
//!
//! - Shigley's Mechanical Engineering Design, Table A-18
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table A.1

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Calculate cross-sectional area of a (hollow) circle
///
/// ```text
///        ╭─────╮
///      ╱  ╭─╮   ╲
///     │   │d│    │ D
///      ╲  ╰─╯   ╱
///        ╰─────╯
/// ```
///
/// # Formula
/// A = π(D² − d²)/4
///
/// # Example
/// ```rust
/// use shaftgear_core::equations::section::circular_area;
///
/// let a = circular_area(0.040, 0.0);
/// assert!((a - 1.2566e-3).abs() < 1e-7);
/// ```
#[inline]
pub fn circular_area(outer: f64, inner: f64) -> f64 {
    PI * (outer.powi(2) - inner.powi(2)) / 4.0
}

/// Second moment of area about a diameter
///
/// # Formula
/// I = π(D⁴ − d⁴)/64
#[inline]
pub fn circular_moment_of_inertia(outer: f64, inner: f64) -> f64 {
    PI * (outer.powi(4) - inner.powi(4)) / 64.0
}

/// Polar moment of area about the shaft axis
///
/// # Formula
/// J = π(D⁴ − d⁴)/32 = 2I
#[inline]
pub fn circular_polar_moment(outer: f64, inner: f64) -> f64 {
    PI * (outer.powi(4) - inner.powi(4)) / 32.0
}

/// Bending section modulus, outer fibre
///
/// # Formula
/// Z = I/(D/2) = π(D⁴ − d⁴)/(32D)
///
/// For a solid shaft this is the familiar πD³/32.
#[inline]
pub fn circular_section_modulus(outer: f64, inner: f64) -> f64 {
    circular_moment_of_inertia(outer, inner) / (outer / 2.0)
}

/// Section properties of a round shaft, in the units of the diameters given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularSection {
    /// Cross-sectional area A
    pub area: f64,
    /// Second moment of area I
    pub moment_of_inertia: f64,
    /// Polar moment of area J
    pub polar_moment: f64,
}

impl CircularSection {
    /// Compute all properties for outer diameter `outer` and bore `inner`
    pub fn new(outer: f64, inner: f64) -> Self {
        CircularSection {
            area: circular_area(outer, inner),
            moment_of_inertia: circular_moment_of_inertia(outer, inner),
            polar_moment: circular_polar_moment(outer, inner),
        }
    }
}
