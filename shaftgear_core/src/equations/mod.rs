//! # Mechanical Design Equations
//!
//! Closed-form formulas shared by the shaft and gear engines. Keeping them
//! here, apart from the calculation pipelines, lets each formula be checked
//! against its handbook source on its own.
//!
//! ## Modules
//!
//! - [`section`] - Circular solid and hollow section properties (A, I, J, Z)
//! - [`stress`] - von Mises, principal stresses, safety factor sentinel
//! - [`fatigue`] - Stress concentration, Marin factors, S-N life
//! - [`gear`] - Lewis table, dynamic factor, Hertzian contact factors
//!
//! ## Units
//!
//! Shaft formulas are unit-agnostic and are called with SI values (m, N,
//! Pa). Gear formulas use the N-mm-MPa system; see [`gear`].
//!
//! ## References
//!
//! - Shigley's Mechanical Engineering Design, 10th Edition
//! - Roark's Formulas for Stress and Strain, 8th Edition
//! - AGMA 2001-D04

pub mod fatigue;
pub mod gear;
pub mod section;
pub mod stress;

pub use section::{
    circular_area,
    circular_moment_of_inertia,
    circular_polar_moment,
    circular_section_modulus,
    CircularSection,
};

pub use stress::{
    principal_stresses,
    safety_factor,
    von_mises_3d,
    von_mises_plane,
    PrincipalStresses,
    SafetyFactor,
};

pub use fatigue::{
    fatigue_life,
    size_factor,
    stress_concentration,
    surface_finish_factor,
    FatigueLife,
    LoadingType,
    StressRaiser,
    SurfaceFinish,
};

pub use gear::{
    elastic_coefficient,
    geometry_factor,
    lewis_form_factor,
    lewis_form_factor_lookup,
    transmitted_load,
    velocity_factor,
    LewisFactor,
    LewisResolution,
};
