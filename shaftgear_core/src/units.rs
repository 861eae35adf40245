//! # Unit Types
//!
//! Type-safe wrappers for the engineering units used at the input boundary,
//! plus a general-purpose converter for user-facing unit text.
//!
//! ## Conventions
//!
//! Inputs arrive in the units a mechanical designer types:
//! - Torque and moment: N·m
//! - Lengths and diameters: mm (converted to metres for stress and deflection)
//! - Power: kW (converted to W)
//! - Angles: degrees
//!
//! Material properties are stored in SI base units (Pa, kg/m³). Gear
//! stresses are evaluated in the N-mm system and therefore come out in MPa.
//!
//! ## Example
//!
//! ```rust
//! use shaftgear_core::units::{Meters, Millimeters, Unit, convert};
//!
//! let d = Millimeters(40.0);
//! let d_m: Meters = d.into();
//! assert!((d_m.0 - 0.040).abs() < 1e-12);
//!
//! let psi = convert(1.0, Unit::Ksi, Unit::Psi).unwrap();
//! assert!((psi - 1000.0).abs() < 1e-6);
//! ```

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Force and Moment Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Torque or bending moment in newton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonMeters(pub f64);

// ============================================================================
// Stress Units
// ============================================================================

/// Stress in pascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Megapascals(pub f64);

impl From<Pascals> for Megapascals {
    fn from(pa: Pascals) -> Self {
        Megapascals(pa.0 / 1e6)
    }
}

impl From<Megapascals> for Pascals {
    fn from(mpa: Megapascals) -> Self {
        Pascals(mpa.0 * 1e6)
    }
}

// ============================================================================
// Power Units
// ============================================================================

/// Power in watts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watts(pub f64);

/// Power in kilowatts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilowatts(pub f64);

impl From<Kilowatts> for Watts {
    fn from(kw: Kilowatts) -> Self {
        Watts(kw.0 * 1000.0)
    }
}

impl From<Watts> for Kilowatts {
    fn from(w: Watts) -> Self {
        Kilowatts(w.0 / 1000.0)
    }
}

// ============================================================================
// Angle Units
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Degrees(pub f64);

/// Angle in radians
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Radians(pub f64);

impl From<Degrees> for Radians {
    fn from(deg: Degrees) -> Self {
        Radians(deg.0.to_radians())
    }
}

impl From<Radians> for Degrees {
    fn from(rad: Radians) -> Self {
        Degrees(rad.0.to_degrees())
    }
}

// ============================================================================
// Arithmetic Implementations
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(Newtons);
impl_arithmetic!(NewtonMeters);
impl_arithmetic!(Pascals);
impl_arithmetic!(Megapascals);
impl_arithmetic!(Watts);
impl_arithmetic!(Kilowatts);
impl_arithmetic!(Degrees);
impl_arithmetic!(Radians);

// ============================================================================
// General Unit Conversion
// ============================================================================

/// Physical quantity measured by a [`Unit`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    Length,
    Force,
    Stress,
    Power,
    Torque,
}

/// Units accepted by [`convert`].
///
/// Parsed from the symbols an engineer types ("mm", "kN", "ksi", "lbft", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    // Length (base: m)
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Foot,
    // Force (base: N)
    Newton,
    Kilonewton,
    PoundForce,
    KilogramForce,
    // Stress (base: Pa)
    Pascal,
    Megapascal,
    Gigapascal,
    Psi,
    Ksi,
    // Power (base: W)
    Watt,
    Kilowatt,
    Horsepower,
    // Torque (base: N·m)
    NewtonMeter,
    KilonewtonMeter,
    PoundFoot,
    PoundInch,
}

impl Unit {
    /// Every supported unit, grouped by quantity
    pub const ALL: [Unit; 21] = [
        Unit::Millimeter,
        Unit::Centimeter,
        Unit::Meter,
        Unit::Inch,
        Unit::Foot,
        Unit::Newton,
        Unit::Kilonewton,
        Unit::PoundForce,
        Unit::KilogramForce,
        Unit::Pascal,
        Unit::Megapascal,
        Unit::Gigapascal,
        Unit::Psi,
        Unit::Ksi,
        Unit::Watt,
        Unit::Kilowatt,
        Unit::Horsepower,
        Unit::NewtonMeter,
        Unit::KilonewtonMeter,
        Unit::PoundFoot,
        Unit::PoundInch,
    ];

    /// Quantity this unit measures
    pub fn quantity(&self) -> Quantity {
        match self {
            Unit::Millimeter | Unit::Centimeter | Unit::Meter | Unit::Inch | Unit::Foot => Quantity::Length,
            Unit::Newton | Unit::Kilonewton | Unit::PoundForce | Unit::KilogramForce => Quantity::Force,
            Unit::Pascal | Unit::Megapascal | Unit::Gigapascal | Unit::Psi | Unit::Ksi => Quantity::Stress,
            Unit::Watt | Unit::Kilowatt | Unit::Horsepower => Quantity::Power,
            Unit::NewtonMeter | Unit::KilonewtonMeter | Unit::PoundFoot | Unit::PoundInch => Quantity::Torque,
        }
    }

    /// Multiplier taking a value in this unit to the quantity's SI base unit
    pub fn to_base_factor(&self) -> f64 {
        match self {
            Unit::Millimeter => 0.001,
            Unit::Centimeter => 0.01,
            Unit::Meter => 1.0,
            Unit::Inch => 0.0254,
            Unit::Foot => 0.3048,
            Unit::Newton => 1.0,
            Unit::Kilonewton => 1000.0,
            Unit::PoundForce => 4.448,
            Unit::KilogramForce => 9.807,
            Unit::Pascal => 1.0,
            Unit::Megapascal => 1e6,
            Unit::Gigapascal => 1e9,
            Unit::Psi => 6895.0,
            Unit::Ksi => 6.895e6,
            Unit::Watt => 1.0,
            Unit::Kilowatt => 1000.0,
            Unit::Horsepower => 745.7,
            Unit::NewtonMeter => 1.0,
            Unit::KilonewtonMeter => 1000.0,
            Unit::PoundFoot => 1.356,
            Unit::PoundInch => 0.113,
        }
    }

    /// Short symbol used for parsing and display
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
            Unit::Inch => "in",
            Unit::Foot => "ft",
            Unit::Newton => "N",
            Unit::Kilonewton => "kN",
            Unit::PoundForce => "lbf",
            Unit::KilogramForce => "kgf",
            Unit::Pascal => "Pa",
            Unit::Megapascal => "MPa",
            Unit::Gigapascal => "GPa",
            Unit::Psi => "psi",
            Unit::Ksi => "ksi",
            Unit::Watt => "W",
            Unit::Kilowatt => "kW",
            Unit::Horsepower => "hp",
            Unit::NewtonMeter => "Nm",
            Unit::KilonewtonMeter => "kNm",
            Unit::PoundFoot => "lbft",
            Unit::PoundInch => "lbin",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Unit {
    type Err = CalcError;

    /// Symbols are case-sensitive ("mm" vs "Mm" would be ambiguous in general),
    /// but the common "N·m" / "N-m" spellings of torque are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let normalized = match trimmed {
            "N·m" | "N-m" | "N.m" => "Nm",
            "kN·m" | "kN-m" | "kN.m" => "kNm",
            "lb-ft" | "lbf-ft" | "lbf·ft" => "lbft",
            "lb-in" | "lbf-in" | "lbf·in" => "lbin",
            other => other,
        };
        Unit::ALL
            .iter()
            .copied()
            .find(|u| u.symbol() == normalized)
            .ok_or_else(|| CalcError::UnknownUnit {
                unit: trimmed.to_string(),
            })
    }
}

/// Convert `value` between two units of the same quantity.
///
/// The value is first scaled to the SI base unit, then to the target unit.
///
/// # Errors
///
/// `IncompatibleUnits` when the units measure different quantities
/// (e.g. mm → N).
pub fn convert(value: f64, from: Unit, to: Unit) -> CalcResult<f64> {
    if from.quantity() != to.quantity() {
        return Err(CalcError::IncompatibleUnits {
            from: from.symbol().to_string(),
            to: to.symbol().to_string(),
        });
    }
    let base = value * from.to_base_factor();
    Ok(base / to.to_base_factor())
}

/// Parse both unit symbols and convert. Convenience wrapper for text front ends.
pub fn convert_str(value: f64, from: &str, to: &str) -> CalcResult<f64> {
    convert(value, from.parse()?, to.parse()?)
}
