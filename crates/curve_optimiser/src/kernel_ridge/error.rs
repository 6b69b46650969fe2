//! Kernel ridge error types.
//!
//! Structured errors for the fitting pipeline. Failures split into two
//! families: invalid input (caught before any linear algebra runs) and
//! singular systems (the regularised normal equations cannot be inverted).
//! Negative variances from round-off are not errors; they are clipped
//! during projection.

use curve_core::types::LinalgError;
use thiserror::Error;

/// Errors that can occur during a kernel ridge fit.
///
/// # Variants
///
/// - `NegativeRidge`: Ridge penalty below zero or not finite
/// - `ShapeMismatch`: Cashflow, price, weight and kernel dimensions disagree
/// - `EmptySupport`: No candidate day carries a nonzero cashflow
/// - `NonSymmetricKernel`: Leading square block of the kernel is not symmetric
/// - `NonFiniteInput`: NaN or infinite value in an input array
/// - `InvalidWeights`: Negative inverse weight
/// - `InvalidConfig`: Configuration value out of range
/// - `Config`: Configuration text could not be parsed
/// - `SingularSystem`: Regularised normal equations are not invertible
///
/// # Examples
///
/// ```
/// use curve_optimiser::kernel_ridge::KernelRidgeError;
///
/// let err = KernelRidgeError::shape_mismatch("price vector length", 5, 4);
/// assert!(err.is_invalid_input());
/// assert!(format!("{}", err).contains("price vector length"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KernelRidgeError {
    /// Ridge penalty must be a finite non-negative number.
    #[error("Invalid ridge penalty {ridge}: must be finite and >= 0")]
    NegativeRidge {
        /// The rejected ridge value
        ridge: f64,
    },

    /// Input dimensions are inconsistent.
    #[error("Shape mismatch for {what}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// Which dimension was checked
        what: String,
        /// Expected size
        expected: usize,
        /// Actual size
        got: usize,
    },

    /// The cashflow matrix has no column with a nonzero sum.
    #[error("Empty cashflow support: no candidate day has a nonzero cashflow")]
    EmptySupport,

    /// The kernel's leading square block is not symmetric.
    #[error("Kernel matrix is not symmetric at ({row}, {col}): |K[i,j] - K[j,i]| = {difference:e} exceeds tolerance {tolerance:e}")]
    NonSymmetricKernel {
        /// Row of the worst violation
        row: usize,
        /// Column of the worst violation
        col: usize,
        /// Size of the violation
        difference: f64,
        /// Tolerance that was exceeded
        tolerance: f64,
    },

    /// NaN or infinite input value.
    #[error("Non-finite value in {0}")]
    NonFiniteInput(String),

    /// Inverse observation weight is negative.
    #[error("Invalid inverse weight {value} for instrument {index}: must be finite and >= 0")]
    InvalidWeights {
        /// Instrument index
        index: usize,
        /// The rejected value
        value: f64,
    },

    /// Configuration value out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration text could not be parsed.
    #[error("Configuration parse error: {0}")]
    Config(String),

    /// The regularised normal-equations matrix could not be inverted.
    ///
    /// Only possible when the effective ridge contribution is zero and the
    /// cashflow structure is rank-deficient; retry with `ridge > 0`.
    #[error("Singular system: {0}")]
    SingularSystem(LinalgError),
}

impl KernelRidgeError {
    /// Create a shape mismatch error.
    pub fn shape_mismatch(what: impl Into<String>, expected: usize, got: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            got,
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Check if this error rejects the caller's input before solving.
    pub fn is_invalid_input(&self) -> bool {
        !self.is_singular_system()
    }

    /// Check if this is a singular system error.
    pub fn is_singular_system(&self) -> bool {
        matches!(self, Self::SingularSystem(_))
    }
}

impl From<LinalgError> for KernelRidgeError {
    fn from(err: LinalgError) -> Self {
        match err {
            LinalgError::DimensionMismatch {
                context,
                expected,
                got,
            } => Self::ShapeMismatch {
                what: context,
                expected,
                got,
            },
            LinalgError::NonFinite { context } => Self::NonFiniteInput(context),
            singular @ LinalgError::SingularMatrix { .. } => Self::SingularSystem(singular),
        }
    }
}
