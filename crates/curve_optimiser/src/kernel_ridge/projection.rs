//! Price projection and confidence bands.
//!
//! Maps curve-level discount factors and covariance back to instrument
//! prices through the unmasked cashflow matrix, restricted to its own
//! `Nmax` candidate days:
//!
//! ```text
//! fitted     = C · g[:Nmax]
//! var_price  = C · var[:Nmax, :Nmax] · Cᵀ
//! std_price  = sqrt(max(0, diag(var_price)))
//! band       = fitted ± z · std_price
//! ```
//!
//! Negative variances from round-off are clipped to zero before every
//! square root; they are counted and logged, never reported as errors.

use curve_core::math::linalg::clip_negative;
use nalgebra::{DMatrix, DVector};
use tracing::debug;

/// Curve-level variance and standard deviation over `Nmax` candidate days.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveUncertainty {
    /// `max(0, diag(var))`, length `Nmax`
    pub variance: DVector<f64>,
    /// `sqrt(variance)`, length `Nmax`
    pub std_dev: DVector<f64>,
    /// Number of diagonal entries that were negative before clipping
    pub clipped_count: usize,
}

/// Instrument-level fitted prices and confidence band.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceProjection {
    /// `C · g[:Nmax]`, length `nt`
    pub fitted_prices: DVector<f64>,
    /// `C · var[:Nmax, :Nmax] · Cᵀ`, shape `nt × nt`
    pub price_covariance: DMatrix<f64>,
    /// Clipped square root of the price covariance diagonal, length `nt`
    pub price_std_dev: DVector<f64>,
    /// `fitted − z · std`, length `nt`
    pub lower: DVector<f64>,
    /// `fitted + z · std`, length `nt`
    pub upper: DVector<f64>,
    /// Number of price variances that were negative before clipping
    pub clipped_count: usize,
}

/// Extract the clipped variance and standard deviation of the curve.
///
/// Only the leading `Nmax × Nmax` block of `covariance` is read.
pub fn curve_uncertainty(covariance: &DMatrix<f64>, nmax: usize) -> CurveUncertainty {
    let raw = covariance.view((0, 0), (nmax, nmax)).diagonal();
    let (variance, clipped_count) = clip_negative(&raw);
    if clipped_count > 0 {
        debug!(clipped_count, "clipped negative curve variances to zero");
    }
    let std_dev = variance.map(f64::sqrt);
    CurveUncertainty {
        variance,
        std_dev,
        clipped_count,
    }
}

/// Project the curve and its covariance onto instrument prices.
///
/// # Arguments
///
/// * `cashflows` - Unmasked `C`, shape `nt × Nmax`
/// * `discount_factors` - `g`, length at least `Nmax`
/// * `covariance` - Curve covariance, at least `Nmax × Nmax`
/// * `multiplier` - Band half-width `z` in standard deviations
///
/// # Examples
///
/// ```
/// use curve_optimiser::kernel_ridge::project_prices;
/// use nalgebra::{DMatrix, DVector};
///
/// let c = DMatrix::from_row_slice(1, 2, &[5.0, 105.0]);
/// let g = DVector::from_vec(vec![0.99, 0.95]);
/// let var = DMatrix::from_row_slice(2, 2, &[1e-6, 0.0, 0.0, 4e-6]);
///
/// let projection = project_prices(&c, &g, &var, 2.0);
/// assert!((projection.fitted_prices[0] - (5.0 * 0.99 + 105.0 * 0.95)).abs() < 1e-12);
/// assert!(projection.lower[0] < projection.fitted_prices[0]);
/// ```
pub fn project_prices(
    cashflows: &DMatrix<f64>,
    discount_factors: &DVector<f64>,
    covariance: &DMatrix<f64>,
    multiplier: f64,
) -> PriceProjection {
    let nmax = cashflows.ncols();
    let curve = discount_factors.rows(0, nmax).clone_owned();
    let leading = covariance.view((0, 0), (nmax, nmax)).clone_owned();

    let fitted_prices = cashflows * curve;
    let price_covariance = cashflows * leading * cashflows.transpose();

    let (price_variance, clipped_count) = clip_negative(&price_covariance.diagonal());
    if clipped_count > 0 {
        debug!(clipped_count, "clipped negative price variances to zero");
    }
    let price_std_dev = price_variance.map(f64::sqrt);

    let half_width = &price_std_dev * multiplier;
    let lower = &fitted_prices - &half_width;
    let upper = &fitted_prices + &half_width;

    PriceProjection {
        fitted_prices,
        price_covariance,
        price_std_dev,
        lower,
        upper,
        clipped_count,
    }
}
