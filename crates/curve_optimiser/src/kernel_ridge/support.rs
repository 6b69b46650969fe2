//! Cashflow support masking.
//!
//! Restricts the problem to the candidate days on which some instrument
//! actually pays. Days nobody pays on contribute nothing to the normal
//! equations, and dropping them keeps the regularised system small and
//! away from the near-singular rows they would otherwise add.

use curve_core::types::time::day_to_year_fraction;
use nalgebra::DMatrix;

use super::error::KernelRidgeError;

/// Sorted candidate-day indices with a nonzero cashflow column sum.
///
/// # Examples
///
/// ```
/// use curve_optimiser::kernel_ridge::CashflowSupport;
/// use nalgebra::DMatrix;
///
/// let c = DMatrix::from_row_slice(2, 5, &[
///     0.0, 2.0, 0.0, 102.0, 0.0,
///     0.0, 0.0, 0.0, 100.0, 0.0,
/// ]);
/// let support = CashflowSupport::from_cashflows(&c).unwrap();
/// assert_eq!(support.indices(), &[1, 3]);
/// assert_eq!(support.horizon_days(), 4);
/// assert_eq!(support.scaled_ridge(2.0), 0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashflowSupport {
    indices: Vec<usize>,
}

impl CashflowSupport {
    /// Build the support from a cashflow matrix `C (nt × Nmax)`.
    ///
    /// A column belongs to the support when its sum over all instruments is
    /// nonzero, so offsetting cashflows on the same day cancel out.
    ///
    /// # Errors
    ///
    /// * `EmptySupport` - if every column sums to zero
    pub fn from_cashflows(cashflows: &DMatrix<f64>) -> Result<Self, KernelRidgeError> {
        let indices: Vec<usize> = (0..cashflows.ncols())
            .filter(|&day| cashflows.column(day).sum() != 0.0)
            .collect();
        if indices.is_empty() {
            return Err(KernelRidgeError::EmptySupport);
        }
        Ok(Self { indices })
    }

    /// Masked day indices, strictly increasing.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of masked days `Nt`.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Always false; construction rejects an empty support.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Last masked index + 1: the horizon in days to the final cashflow.
    pub fn horizon_days(&self) -> usize {
        self.indices.last().map_or(0, |last| last + 1)
    }

    /// Ridge penalty relative to the horizon, `ridge / horizon_days()`.
    ///
    /// This is the only place the ridge is rescaled.
    pub fn scaled_ridge(&self, ridge: f64) -> f64 {
        ridge / self.horizon_days() as f64
    }

    /// Time to each masked cashflow day in years.
    pub fn year_fractions(&self) -> Vec<f64> {
        self.indices
            .iter()
            .map(|&day| day_to_year_fraction(day))
            .collect()
    }

    /// `C[:, m]`, shape `nt × Nt`.
    pub fn restrict_cashflows(&self, cashflows: &DMatrix<f64>) -> DMatrix<f64> {
        cashflows.select_columns(self.indices.iter())
    }

    /// `K[m, m]`, shape `Nt × Nt`.
    pub fn restrict_kernel(&self, kernel: &DMatrix<f64>) -> DMatrix<f64> {
        kernel
            .select_rows(self.indices.iter())
            .select_columns(self.indices.iter())
    }

    /// `K[:, m]`, shape `Nmax × Nt`.
    pub fn kernel_columns(&self, kernel: &DMatrix<f64>) -> DMatrix<f64> {
        kernel.select_columns(self.indices.iter())
    }

    /// `K[m, :]`, shape `Nt × Nmax_y`.
    pub fn kernel_rows(&self, kernel: &DMatrix<f64>) -> DMatrix<f64> {
        kernel.select_rows(self.indices.iter())
    }
}
