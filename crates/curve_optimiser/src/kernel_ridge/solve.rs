//! Regularised kernel ridge solve.
//!
//! Solves the generalised ridge problem on the masked support:
//!
//! ```text
//! CKC_inv = (C_m K_m C_mᵀ + l · diag(inv_w))⁻¹        (nt × nt)
//! beta    = C_mᵀ · CKC_inv · (B − C_m · 1)            (Nt)
//! ```
//!
//! `C_m` is the cashflow matrix restricted to the support columns and
//! `K_m` the kernel restricted to support rows and columns. The fitted
//! discount curve is `1 + K[:, m] · beta`, so `B − C_m · 1` is the part of
//! the prices not explained by a flat unit discount factor.

use curve_core::math::linalg::invert_checked;
use nalgebra::{DMatrix, DVector};

use super::error::KernelRidgeError;

/// The solved regularised system.
#[derive(Debug, Clone)]
pub struct RegularisedSystem {
    /// `(C_m K_m C_mᵀ + l · diag(inv_w))⁻¹`, shape `nt × nt`.
    pub ckc_inverse: DMatrix<f64>,
    /// Coefficients on the masked support, length `Nt`.
    pub beta: DVector<f64>,
}

impl RegularisedSystem {
    /// Build and solve the regularised normal equations.
    ///
    /// # Arguments
    ///
    /// * `masked_cashflows` - `C_m`, shape `nt × Nt`
    /// * `masked_kernel` - `K_m`, shape `Nt × Nt`
    /// * `prices` - `B`, length `nt`
    /// * `scaled_ridge` - `l = ridge / horizon_days`
    /// * `inverse_weights` - `inv_w`, length `nt`
    /// * `singularity_tolerance` - Minimum LU pivot ratio
    ///
    /// # Errors
    ///
    /// * `ShapeMismatch` - if operand dimensions disagree
    /// * `SingularSystem` - if the regularised matrix cannot be inverted;
    ///   only possible when `l · inv_w` adds no regularisation and the
    ///   cashflows are rank-deficient under the kernel
    pub fn solve(
        masked_cashflows: &DMatrix<f64>,
        masked_kernel: &DMatrix<f64>,
        prices: &DVector<f64>,
        scaled_ridge: f64,
        inverse_weights: &DVector<f64>,
        singularity_tolerance: f64,
    ) -> Result<Self, KernelRidgeError> {
        let nt = masked_cashflows.nrows();
        let support_len = masked_cashflows.ncols();

        if masked_kernel.shape() != (support_len, support_len) {
            return Err(KernelRidgeError::shape_mismatch(
                "masked kernel dimension",
                support_len,
                masked_kernel.nrows(),
            ));
        }
        if prices.len() != nt {
            return Err(KernelRidgeError::shape_mismatch(
                "price vector length",
                nt,
                prices.len(),
            ));
        }
        if inverse_weights.len() != nt {
            return Err(KernelRidgeError::shape_mismatch(
                "inverse weight length",
                nt,
                inverse_weights.len(),
            ));
        }

        let mut system = masked_cashflows * masked_kernel * masked_cashflows.transpose();
        for i in 0..nt {
            system[(i, i)] += scaled_ridge * inverse_weights[i];
        }

        let ckc_inverse = invert_checked(&system, singularity_tolerance)?;

        let unit_prices = masked_cashflows * DVector::from_element(support_len, 1.0);
        let residual = prices - unit_prices;
        let beta = masked_cashflows.transpose() * (&ckc_inverse * residual);

        Ok(Self { ckc_inverse, beta })
    }
}
