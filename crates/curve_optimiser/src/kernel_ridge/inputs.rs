//! Fit inputs and their shape validation.

use curve_core::math::linalg::ensure_finite;
use nalgebra::{DMatrix, DVector};

use super::error::KernelRidgeError;

/// Inverse observation weights `1 / w_i`.
///
/// Enters the fit only as the diagonal scaling of the ridge term,
/// `l_scaled · diag(inv_w)`. A larger inverse weight lets the curve miss
/// that instrument's price by more.
#[derive(Debug, Clone, PartialEq)]
pub enum InverseWeights {
    /// The same inverse weight for every instrument.
    Uniform(f64),

    /// One inverse weight per instrument, row-aligned with the cashflows.
    PerInstrument(DVector<f64>),
}

impl Default for InverseWeights {
    fn default() -> Self {
        Self::Uniform(1.0)
    }
}

impl InverseWeights {
    /// Expand to a vector of length `nt`.
    pub fn to_vector(&self, nt: usize) -> DVector<f64> {
        match self {
            Self::Uniform(value) => DVector::from_element(nt, *value),
            Self::PerInstrument(values) => values.clone(),
        }
    }

    /// Check length against `nt` and every value for `finite && >= 0`.
    pub fn validate(&self, nt: usize) -> Result<(), KernelRidgeError> {
        match self {
            Self::Uniform(value) => check_weight(0, *value),
            Self::PerInstrument(values) => {
                if values.len() != nt {
                    return Err(KernelRidgeError::shape_mismatch(
                        "inverse weight length",
                        nt,
                        values.len(),
                    ));
                }
                values
                    .iter()
                    .enumerate()
                    .try_for_each(|(index, value)| check_weight(index, *value))
            }
        }
    }
}

impl From<f64> for InverseWeights {
    fn from(value: f64) -> Self {
        Self::Uniform(value)
    }
}

impl From<DVector<f64>> for InverseWeights {
    fn from(values: DVector<f64>) -> Self {
        Self::PerInstrument(values)
    }
}

impl From<Vec<f64>> for InverseWeights {
    fn from(values: Vec<f64>) -> Self {
        Self::PerInstrument(DVector::from_vec(values))
    }
}

fn check_weight(index: usize, value: f64) -> Result<(), KernelRidgeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(KernelRidgeError::InvalidWeights { index, value })
    }
}

/// A validated set of fit inputs.
///
/// Borrows the cashflow matrix `C (nt × Nmax)`, price vector `B (nt)` and
/// kernel matrix `K (Nmax × Nmax_y)`; none of them is ever mutated.
///
/// # Shape contract
///
/// - `B.len() == C.nrows()` (instrument axis)
/// - `K.nrows() == C.ncols()` (candidate-day axis)
/// - `K.ncols() >= K.nrows()` (extrapolation horizon)
/// - per-instrument weights have length `nt`
///
/// # Examples
///
/// ```
/// use curve_optimiser::kernel_ridge::{InverseWeights, KernelRidgeError, KernelRidgeProblem};
/// use nalgebra::{DMatrix, DVector};
///
/// let c = DMatrix::from_element(2, 3, 1.0);
/// let b = DVector::from_element(3, 1.0); // wrong length
/// let k = DMatrix::identity(3, 3);
///
/// let err = KernelRidgeProblem::new(&c, &b, InverseWeights::Uniform(1.0), &k).unwrap_err();
/// assert!(matches!(err, KernelRidgeError::ShapeMismatch { .. }));
/// ```
#[derive(Debug, Clone)]
pub struct KernelRidgeProblem<'a> {
    cashflows: &'a DMatrix<f64>,
    prices: &'a DVector<f64>,
    inverse_weights: InverseWeights,
    kernel: &'a DMatrix<f64>,
}

impl<'a> KernelRidgeProblem<'a> {
    /// Validate shapes and finiteness and wrap the inputs.
    ///
    /// Support-dependent checks (empty support, kernel symmetry) run later
    /// in the fitter because they depend on configuration.
    pub fn new(
        cashflows: &'a DMatrix<f64>,
        prices: &'a DVector<f64>,
        inverse_weights: impl Into<InverseWeights>,
        kernel: &'a DMatrix<f64>,
    ) -> Result<Self, KernelRidgeError> {
        let inverse_weights = inverse_weights.into();
        let nt = cashflows.nrows();
        let nmax = cashflows.ncols();

        if nt == 0 {
            return Err(KernelRidgeError::shape_mismatch("instrument count", 1, 0));
        }
        if prices.len() != nt {
            return Err(KernelRidgeError::shape_mismatch(
                "price vector length",
                nt,
                prices.len(),
            ));
        }
        if kernel.nrows() != nmax {
            return Err(KernelRidgeError::shape_mismatch(
                "kernel row count",
                nmax,
                kernel.nrows(),
            ));
        }
        if kernel.ncols() < nmax {
            return Err(KernelRidgeError::shape_mismatch(
                "kernel column count (at least)",
                nmax,
                kernel.ncols(),
            ));
        }
        inverse_weights.validate(nt)?;

        ensure_finite("cashflow matrix", cashflows.iter().copied())?;
        ensure_finite("price vector", prices.iter().copied())?;
        ensure_finite("kernel matrix", kernel.iter().copied())?;

        Ok(Self {
            cashflows,
            prices,
            inverse_weights,
            kernel,
        })
    }

    /// Cashflow matrix `C`.
    pub fn cashflows(&self) -> &DMatrix<f64> {
        self.cashflows
    }

    /// Observed prices `B`.
    pub fn prices(&self) -> &DVector<f64> {
        self.prices
    }

    /// Inverse observation weights.
    pub fn inverse_weights(&self) -> &InverseWeights {
        &self.inverse_weights
    }

    /// Kernel matrix `K`.
    pub fn kernel(&self) -> &DMatrix<f64> {
        self.kernel
    }

    /// Number of instruments `nt`.
    pub fn instrument_count(&self) -> usize {
        self.cashflows.nrows()
    }

    /// Number of candidate cashflow days `Nmax`.
    pub fn day_count(&self) -> usize {
        self.cashflows.ncols()
    }

    /// Extrapolation horizon of the kernel in days `Nmax_y`.
    pub fn horizon_day_count(&self) -> usize {
        self.kernel.ncols()
    }
}
