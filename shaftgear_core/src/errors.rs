//! # Error Types
//!
//! Structured error types for shaftgear_core. Every variant carries enough
//! context for a caller (human or program) to see which field or file was
//! rejected and why.
//!
//! Degenerate-but-valid numeric situations are *not* errors: a zero stress
//! yields [`SafetyFactor::UNBOUNDED`](crate::equations::stress::SafetyFactor)
//! and a hollow-shaft search that runs out of iterations returns its best
//! candidate together with a warning.
//!
//! ## Example
//!
//! ```rust
//! use shaftgear_core::errors::{CalcError, CalcResult};
//!
//! fn validate_module(module_mm: f64) -> CalcResult<()> {
//!     if module_mm <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "module_mm",
//!             module_mm.to_string(),
//!             "Module must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_module(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for shaftgear_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for design calculations, unit conversion and persistence.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (non-positive dimension, tooth count below
    /// the form-factor table, zero allowable stress, ...)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Material not found in the catalog (strict lookup only)
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// Unit symbol not recognised by the converter
    #[error("Unknown unit: {unit}")]
    UnknownUnit { unit: String },

    /// Conversion requested between two different physical quantities
    #[error("Cannot convert {from} to {to}: units measure different quantities")]
    IncompatibleUnits { from: String, to: String },

    /// Export format not recognised
    #[error("Unsupported export format: {format}")]
    UnknownFormat { format: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Project file is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/CSV serialization or deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Project schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError from any displayable error
    pub fn serialization(err: impl std::fmt::Display) -> Self {
        CalcError::SerializationError {
            reason: err.to_string(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::UnknownUnit { .. } => "UNKNOWN_UNIT",
            CalcError::IncompatibleUnits { .. } => "INCOMPATIBLE_UNITS",
            CalcError::UnknownFormat { .. } => "UNKNOWN_FORMAT",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

/// Reject values that are not strictly positive (NaN included).
pub(crate) fn require_positive(field: &str, value: f64) -> CalcResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Must be greater than zero"))
    }
}

/// Reject negative values (NaN included). Zero is allowed.
pub(crate) fn require_non_negative(field: &str, value: f64) -> CalcResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(CalcError::invalid_input(field, value.to_string(), "Cannot be negative"))
    }
}
