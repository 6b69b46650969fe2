//! Fitted discount curve on the candidate day grid.

use curve_core::market_data::{MarketDataError, YieldCurve};
use curve_core::types::time::{day_to_year_fraction, year_fraction_to_day_position};

/// A kernel ridge discount curve sampled on the daily grid.
///
/// Day `i` sits at `t_i = (i + 1) / 365` years. Between grid points, and
/// between valuation (`D(0) = 1`) and the first day, discount factors are
/// linearly interpolated. Queries past the last day are out of bounds.
///
/// # Examples
///
/// ```
/// use curve_core::market_data::YieldCurve;
/// use curve_optimiser::kernel_ridge::KernelRidgeCurve;
///
/// let curve = KernelRidgeCurve::new(vec![0.9999, 0.9998, 0.9997]).unwrap();
/// assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
/// assert!((curve.discount_factor(2.0 / 365.0).unwrap() - 0.9998).abs() < 1e-12);
/// assert!(curve.discount_factor(1.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct KernelRidgeCurve {
    discount_factors: Vec<f64>,
}

impl KernelRidgeCurve {
    /// Wrap per-day discount factors `g`.
    ///
    /// # Errors
    ///
    /// * `InsufficientData` - if `discount_factors` is empty
    pub fn new(discount_factors: Vec<f64>) -> Result<Self, MarketDataError> {
        if discount_factors.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }
        Ok(Self { discount_factors })
    }

    /// Discount factors on the day grid.
    pub fn discount_factors(&self) -> &[f64] {
        &self.discount_factors
    }

    /// Discount factor on a given grid day, if inside the curve.
    pub fn discount_factor_on_day(&self, day: usize) -> Option<f64> {
        self.discount_factors.get(day).copied()
    }

    /// Number of grid days.
    pub fn day_count(&self) -> usize {
        self.discount_factors.len()
    }

    /// Maturity of the last grid day in years.
    pub fn max_maturity(&self) -> f64 {
        day_to_year_fraction(self.discount_factors.len() - 1)
    }
}

impl YieldCurve<f64> for KernelRidgeCurve {
    fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
        if t.is_nan() || t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        let max = self.max_maturity();
        if t > max {
            return Err(MarketDataError::OutOfBounds { x: t, min: 0.0, max });
        }

        let g = &self.discount_factors;
        let position = year_fraction_to_day_position(t);
        if position <= 0.0 {
            // between valuation (position -1, D = 1) and day 0
            let w = position + 1.0;
            return Ok(1.0 + w * (g[0] - 1.0));
        }

        let lo = position.floor() as usize;
        if lo + 1 >= g.len() {
            return Ok(g[g.len() - 1]);
        }
        let w = position - lo as f64;
        Ok(g[lo] + w * (g[lo + 1] - g[lo]))
    }
}
