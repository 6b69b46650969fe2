//! Market data error types.

use thiserror::Error;

/// Curve query errors.
///
/// # Variants
///
/// - `InvalidMaturity`: Negative or otherwise unusable time to maturity
/// - `OutOfBounds`: Query beyond the curve's day grid
/// - `NonPositiveDiscountFactor`: Rate requested where `D(t) <= 0`
/// - `InsufficientData`: Not enough points to build a curve
///
/// # Examples
///
/// ```
/// use curve_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarketDataError {
    /// Invalid maturity (negative time).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Query point outside valid domain.
    #[error("Out of bounds: {x} not in [{min}, {max}]")]
    OutOfBounds {
        /// The query point that was out of bounds
        x: f64,
        /// Minimum valid value
        min: f64,
        /// Maximum valid value
        max: f64,
    },

    /// Rate undefined because the discount factor is not positive.
    #[error("Non-positive discount factor {df} at t = {t}")]
    NonPositiveDiscountFactor {
        /// Maturity of the query
        t: f64,
        /// The offending discount factor
        df: f64,
    },

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },
}
