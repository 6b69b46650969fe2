//! Core error and day-grid types.
//!
//! This module provides:
//! - `time`: Day grid conventions mapping candidate cashflow days to year fractions
//! - `error`: Structured error types for dense linear algebra
//!
//! # Re-exports
//!
//! - [`LinalgError`] from `error`
//! - [`day_to_year_fraction`], [`year_fraction_to_day_position`], [`DAYS_PER_YEAR`] from `time`

pub mod error;
pub mod time;

pub use error::LinalgError;
pub use time::{day_to_year_fraction, year_fraction_to_day_position, DAYS_PER_YEAR};
