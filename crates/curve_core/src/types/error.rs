//! Error types for structured error handling.
//!
//! This module provides:
//! - `LinalgError`: Errors from dense linear algebra (inversion, shape checks)

use thiserror::Error;

/// Dense linear algebra errors.
///
/// Raised by the checked helpers in [`crate::math::linalg`]. A singular
/// system is always reported, never replaced by a pseudo-inverse.
///
/// # Variants
/// - `DimensionMismatch`: Operand shapes do not agree
/// - `SingularMatrix`: LU pivots collapsed below the singularity tolerance
/// - `NonFinite`: NaN or infinite values encountered
///
/// # Examples
/// ```
/// use curve_core::types::LinalgError;
///
/// let err = LinalgError::SingularMatrix { dim: 3, pivot_ratio: 0.0 };
/// assert!(format!("{}", err).contains("singular"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinalgError {
    /// Operand shapes do not agree.
    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Operation or operand being checked
        context: String,
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        got: usize,
    },

    /// Matrix is singular to working precision.
    #[error("Matrix of dimension {dim} is singular (min/max pivot ratio = {pivot_ratio:e})")]
    SingularMatrix {
        /// Dimension of the square matrix
        dim: usize,
        /// Ratio of smallest to largest absolute LU pivot
        pivot_ratio: f64,
    },

    /// NaN or infinite value encountered.
    #[error("Non-finite value in {context}")]
    NonFinite {
        /// Where the value was found
        context: String,
    },
}

impl LinalgError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(context: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::DimensionMismatch {
            context: context.into(),
            expected,
            got,
        }
    }

    /// Create a non-finite value error.
    pub fn non_finite(context: impl Into<String>) -> Self {
        Self::NonFinite {
            context: context.into(),
        }
    }

    /// Check if this is a singular matrix error.
    pub fn is_singular(&self) -> bool {
        matches!(self, Self::SingularMatrix { .. })
    }
}
