//! # curve_optimiser
//!
//! Kernel ridge discount curve fitting for Neutryx.
//!
//! Given a bond cashflow matrix, observed prices, a ridge penalty, inverse
//! observation weights and a precomputed kernel matrix, this crate solves
//! for the smoothed discount curve and propagates the posterior covariance
//! to price-level 95% confidence bands.
//!
//! ## Architecture Position
//!
//! Layer 2.5 of the workspace. Depends on `curve_core` (L1) for error types,
//! the `YieldCurve` trait and checked dense linear algebra.
//!
//! ## Modules
//!
//! - `kernel_ridge`: Support masking, regularised solve, curve reconstruction,
//!   price projection, configuration and batch fitting
//!
//! ## Example
//!
//! ```rust
//! use curve_optimiser::kernel_ridge::{
//!     InverseWeights, KernelRidgeConfig, KernelRidgeFitter, KernelRidgeProblem,
//! };
//! use nalgebra::{DMatrix, DVector};
//!
//! // One zero-coupon bond paying 1 on day 0.
//! let cashflows = DMatrix::from_element(1, 1, 1.0);
//! let prices = DVector::from_element(1, 0.99);
//! let kernel = DMatrix::from_element(1, 1, 0.5);
//!
//! let problem = KernelRidgeProblem::new(
//!     &cashflows,
//!     &prices,
//!     InverseWeights::Uniform(1.0),
//!     &kernel,
//! )
//! .unwrap();
//!
//! // Without a ridge penalty a single exactly determined price is reproduced.
//! let fitter = KernelRidgeFitter::new(KernelRidgeConfig::new(0.0)).unwrap();
//! let fit = fitter.fit(&problem).unwrap();
//! assert!((fit.fitted_prices()[0] - 0.99).abs() < 1e-12);
//! assert!(fit.lower95()[0] <= fit.fitted_prices()[0]);
//! assert!(fit.fitted_prices()[0] <= fit.upper95()[0]);
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default): Fit independent problems in parallel via rayon
//! - `serde` (default): Serialisable configuration and TOML parsing

pub mod kernel_ridge;

pub use kernel_ridge::KernelRidgeError;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::kernel_ridge::*;
}
