//! # curve_core: Foundation Layer for Kernel Ridge Curve Fitting
//!
//! ## Layer 1 (Foundation) Role
//!
//! curve_core is the bottom layer of the workspace, providing:
//! - Error types: `LinalgError` (`types::error`), `MarketDataError` (`market_data::error`)
//! - Day grid conventions for candidate cashflow days (`types::time`)
//! - Checked dense linear algebra on `nalgebra` (`math::linalg`)
//! - The generic `YieldCurve` trait (`market_data::curves`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other workspace crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - nalgebra: Dense matrices and LU factorisation
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use curve_core::math::linalg::invert_checked;
//! use curve_core::types::time::day_to_year_fraction;
//! use nalgebra::DMatrix;
//!
//! let m = DMatrix::from_row_slice(2, 2, &[4.0, 1.0, 1.0, 3.0]);
//! let inv = invert_checked(&m, 1e-14).unwrap();
//! let identity = &m * &inv;
//! assert!((identity[(0, 0)] - 1.0).abs() < 1e-12);
//!
//! // Day index 364 is one year after valuation.
//! assert!((day_to_year_fraction(364) - 1.0).abs() < 1e-15);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for error types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
