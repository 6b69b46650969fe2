//! Day grid for candidate cashflow dates.
//!
//! Cashflow matrices index candidate payment days by 0-based column. Column
//! `i` is the payment falling `i + 1` calendar days after valuation, and
//! year fractions use an Actual/365 convention on that grid.

/// Days per year on the candidate day grid (Actual/365).
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Convert a 0-based candidate day index to a year fraction.
///
/// # Examples
///
/// ```
/// use curve_core::types::time::day_to_year_fraction;
///
/// assert!((day_to_year_fraction(0) - 1.0 / 365.0).abs() < 1e-15);
/// assert!((day_to_year_fraction(729) - 2.0).abs() < 1e-12);
/// ```
#[inline]
pub fn day_to_year_fraction(day_index: usize) -> f64 {
    (day_index as f64 + 1.0) / DAYS_PER_YEAR
}

/// Convert a year fraction to a (fractional) position on the day grid.
///
/// Inverse of [`day_to_year_fraction`]. Valuation (`t = 0`) maps to `-1`.
#[inline]
pub fn year_fraction_to_day_position(t: f64) -> f64 {
    t * DAYS_PER_YEAR - 1.0
}
