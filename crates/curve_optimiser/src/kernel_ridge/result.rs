//! Kernel ridge fit results.

use curve_core::market_data::MarketDataError;
use nalgebra::{DMatrix, DVector};

use super::config::CovariancePolicy;
use super::curve::KernelRidgeCurve;
use super::projection::{CurveUncertainty, PriceProjection};
use super::support::CashflowSupport;

/// The four headline outputs of a fit.
///
/// `variance` and `std_dev` are curve-level (length `Nmax`); `lower95` and
/// `upper95` are instrument-level price bounds (length `nt`).
#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceSummary {
    /// Clipped curve variance per candidate day
    pub variance: DVector<f64>,
    /// Curve standard deviation per candidate day
    pub std_dev: DVector<f64>,
    /// Lower price bound per instrument
    pub lower95: DVector<f64>,
    /// Upper price bound per instrument
    pub upper95: DVector<f64>,
}

impl ConfidenceSummary {
    /// Destructure into `(variance, std_dev, lower95, upper95)`.
    pub fn into_tuple(self) -> (DVector<f64>, DVector<f64>, DVector<f64>, DVector<f64>) {
        (self.variance, self.std_dev, self.lower95, self.upper95)
    }
}

/// Full output of [`KernelRidgeFitter::fit`](super::KernelRidgeFitter::fit).
///
/// Carries every intermediate of the pipeline so that callers can inspect
/// the solve (coefficients, support) as well as the headline bands.
#[derive(Debug, Clone)]
pub struct KernelRidgeFit {
    pub(crate) support: CashflowSupport,
    pub(crate) scaled_ridge: f64,
    pub(crate) covariance_policy: CovariancePolicy,
    pub(crate) beta: DVector<f64>,
    pub(crate) discount_factors: DVector<f64>,
    pub(crate) extrapolated_discount_factors: DVector<f64>,
    pub(crate) covariance: DMatrix<f64>,
    pub(crate) uncertainty: CurveUncertainty,
    pub(crate) projection: PriceProjection,
}

impl KernelRidgeFit {
    /// Masked cashflow support used by the solve.
    pub fn support(&self) -> &CashflowSupport {
        &self.support
    }

    /// Ridge penalty after rescaling by the support horizon.
    pub fn scaled_ridge(&self) -> f64 {
        self.scaled_ridge
    }

    /// Covariance policy the fit ran with.
    pub fn covariance_policy(&self) -> CovariancePolicy {
        self.covariance_policy
    }

    /// Coefficients on the masked support (length `Nt`).
    pub fn beta(&self) -> &DVector<f64> {
        &self.beta
    }

    /// Fitted discount factors `g = 1 + K[:, m] · beta` (length `Nmax`).
    pub fn discount_factors(&self) -> &DVector<f64> {
        &self.discount_factors
    }

    /// Discount factors extended to the kernel horizon (length `Nmax_y`).
    pub fn extrapolated_discount_factors(&self) -> &DVector<f64> {
        &self.extrapolated_discount_factors
    }

    /// Posterior curve covariance (unclipped).
    pub fn covariance(&self) -> &DMatrix<f64> {
        &self.covariance
    }

    /// Clipped curve variance per candidate day (length `Nmax`).
    pub fn variance(&self) -> &DVector<f64> {
        &self.uncertainty.variance
    }

    /// Curve standard deviation per candidate day (length `Nmax`).
    pub fn std_dev(&self) -> &DVector<f64> {
        &self.uncertainty.std_dev
    }

    /// Fitted prices `C · g` (length `nt`).
    pub fn fitted_prices(&self) -> &DVector<f64> {
        &self.projection.fitted_prices
    }

    /// Price covariance `C · var · Cᵀ` (`nt × nt`, unclipped).
    pub fn price_covariance(&self) -> &DMatrix<f64> {
        &self.projection.price_covariance
    }

    /// Price standard deviation per instrument (length `nt`).
    pub fn price_std_dev(&self) -> &DVector<f64> {
        &self.projection.price_std_dev
    }

    /// Lower confidence bound per instrument (length `nt`).
    pub fn lower95(&self) -> &DVector<f64> {
        &self.projection.lower
    }

    /// Upper confidence bound per instrument (length `nt`).
    pub fn upper95(&self) -> &DVector<f64> {
        &self.projection.upper
    }

    /// Price residuals `observed − fitted` for the given observed prices.
    pub fn residuals(&self, prices: &DVector<f64>) -> DVector<f64> {
        prices - &self.projection.fitted_prices
    }

    /// How many curve and price variances were clipped from below zero.
    pub fn clipped_variance_count(&self) -> usize {
        self.uncertainty.clipped_count + self.projection.clipped_count
    }

    /// The fitted curve as a [`YieldCurve`](curve_core::market_data::YieldCurve).
    pub fn curve(&self) -> Result<KernelRidgeCurve, MarketDataError> {
        KernelRidgeCurve::new(self.discount_factors.iter().copied().collect())
    }

    /// The curve extended to the kernel horizon.
    pub fn extrapolated_curve(&self) -> Result<KernelRidgeCurve, MarketDataError> {
        KernelRidgeCurve::new(self.extrapolated_discount_factors.iter().copied().collect())
    }

    /// Clone out the four headline outputs.
    pub fn summary(&self) -> ConfidenceSummary {
        ConfidenceSummary {
            variance: self.uncertainty.variance.clone(),
            std_dev: self.uncertainty.std_dev.clone(),
            lower95: self.projection.lower.clone(),
            upper95: self.projection.upper.clone(),
        }
    }

    /// Consume the fit, keeping only the four headline outputs.
    pub fn into_summary(self) -> ConfidenceSummary {
        ConfidenceSummary {
            variance: self.uncertainty.variance,
            std_dev: self.uncertainty.std_dev,
            lower95: self.projection.lower,
            upper95: self.projection.upper,
        }
    }
}
