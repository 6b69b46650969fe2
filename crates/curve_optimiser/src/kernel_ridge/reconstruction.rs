//! Curve reconstruction from masked coefficients.
//!
//! Expands the support-only coefficients back onto every candidate day and
//! computes the posterior covariance of the curve under the configured
//! [`CovariancePolicy`].

use nalgebra::{DMatrix, DVector};

use super::config::CovariancePolicy;
use super::support::CashflowSupport;

/// `g = 1 + K[:, m] · beta`, one discount factor per candidate day (`Nmax`).
pub fn reconstruct_discount_factors(
    kernel: &DMatrix<f64>,
    support: &CashflowSupport,
    beta: &DVector<f64>,
) -> DVector<f64> {
    let adjustment = support.kernel_columns(kernel) * beta;
    adjustment.add_scalar(1.0)
}

/// `g_y = 1 + K[m, :]ᵀ · beta`, extended to the kernel horizon (`Nmax_y`).
///
/// Agrees with [`reconstruct_discount_factors`] on the first `Nmax` days
/// when the kernel's leading block is symmetric; beyond them the curve is
/// driven purely by kernel extrapolation.
pub fn extrapolate_discount_factors(
    kernel: &DMatrix<f64>,
    support: &CashflowSupport,
    beta: &DVector<f64>,
) -> DVector<f64> {
    let adjustment = support.kernel_rows(kernel).transpose() * beta;
    adjustment.add_scalar(1.0)
}

/// Posterior covariance of the curve values.
///
/// # Arguments
///
/// * `kernel` - `K`, shape `Nmax × Nmax_y`
/// * `support` - Masked support `m`
/// * `cashflows` - Unmasked `C`, shape `nt × Nmax` (legacy policy only)
/// * `masked_cashflows` - `C_m`, shape `nt × Nt`
/// * `ckc_inverse` - Inverse of the regularised system, `nt × nt`
/// * `policy` - Which kernel block enters the covariance
///
/// # Returns
///
/// `Nmax × Nmax_y` under `MaskedSupport`, `Nmax × Nmax` under
/// `PrefixTruncated`. Diagonal entries can carry small negative round-off;
/// callers clip before taking square roots.
pub fn posterior_covariance(
    kernel: &DMatrix<f64>,
    support: &CashflowSupport,
    cashflows: &DMatrix<f64>,
    masked_cashflows: &DMatrix<f64>,
    ckc_inverse: &DMatrix<f64>,
    policy: CovariancePolicy,
) -> DMatrix<f64> {
    match policy {
        CovariancePolicy::MaskedSupport => {
            // K[:, m] C_mᵀ  (Nmax × nt)
            let left = support.kernel_columns(kernel) * masked_cashflows.transpose();
            // C_m K[m, :]  (nt × Nmax_y)
            let right = masked_cashflows * support.kernel_rows(kernel);
            kernel - left * ckc_inverse * right
        }
        CovariancePolicy::PrefixTruncated => {
            let n = cashflows.ncols();
            let leading = kernel.view((0, 0), (n, n)).clone_owned();
            let left = &leading * cashflows.transpose();
            let right = cashflows * &leading;
            &leading - left * ckc_inverse * right
        }
    }
}
