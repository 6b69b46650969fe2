//! Yield curve trait definition.

use crate::market_data::error::MarketDataError;
use num_traits::Float;

/// Generic yield curve trait for discount factor and rate calculations.
///
/// Generic over `T: Float` so the same trait serves plain `f64` curves and
/// any other floating-point type a downstream crate plugs in.
///
/// # Contract
///
/// - `discount_factor(t)` returns D(t) for maturity `t` in years, with D(0) = 1
/// - `zero_rate(t)` returns the continuously compounded zero rate
/// - `forward_rate(t1, t2)` returns the continuously compounded forward rate
///
/// Fitted curves are not forced to be arbitrage-free: D(t) may exceed one or
/// even turn negative far outside the observed cashflow dates. Rates are
/// only defined where D(t) > 0; elsewhere the default methods return
/// [`MarketDataError::NonPositiveDiscountFactor`].
///
/// # Example
///
/// ```
/// use curve_core::market_data::{MarketDataError, YieldCurve};
///
/// struct Flat(f64);
///
/// impl YieldCurve<f64> for Flat {
///     fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
///         Ok((-self.0 * t).exp())
///     }
/// }
///
/// let curve = Flat(0.03);
/// assert!((curve.zero_rate(2.0).unwrap() - 0.03).abs() < 1e-12);
/// assert!((curve.forward_rate(1.0, 3.0).unwrap() - 0.03).abs() < 1e-12);
/// ```
pub trait YieldCurve<T: Float> {
    /// Return the discount factor for maturity `t` (in years, `t >= 0`).
    fn discount_factor(&self, t: T) -> Result<T, MarketDataError>;

    /// Return the continuously compounded zero rate `-ln D(t) / t`.
    ///
    /// Requires `t > 0` and `D(t) > 0`.
    fn zero_rate(&self, t: T) -> Result<T, MarketDataError> {
        if t <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: t.to_f64().unwrap_or(0.0),
            });
        }
        let df = positive_discount_factor(self, t)?;
        Ok(-df.ln() / t)
    }

    /// Return the forward rate `-ln(D(t2) / D(t1)) / (t2 - t1)`.
    ///
    /// Requires `t2 > t1` and positive discount factors at both ends.
    fn forward_rate(&self, t1: T, t2: T) -> Result<T, MarketDataError> {
        let dt = t2 - t1;
        if dt <= T::zero() {
            return Err(MarketDataError::InvalidMaturity {
                t: dt.to_f64().unwrap_or(0.0),
            });
        }
        let df1 = positive_discount_factor(self, t1)?;
        let df2 = positive_discount_factor(self, t2)?;
        Ok(-(df2 / df1).ln() / dt)
    }
}

fn positive_discount_factor<T, C>(curve: &C, t: T) -> Result<T, MarketDataError>
where
    T: Float,
    C: YieldCurve<T> + ?Sized,
{
    let df = curve.discount_factor(t)?;
    if df <= T::zero() {
        return Err(MarketDataError::NonPositiveDiscountFactor {
            t: t.to_f64().unwrap_or(0.0),
            df: df.to_f64().unwrap_or(0.0),
        });
    }
    Ok(df)
}
