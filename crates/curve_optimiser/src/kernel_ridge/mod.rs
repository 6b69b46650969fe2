//! Kernel ridge discount curve fitting with confidence bands.
//!
//! Fits a daily discount curve `g` to observed bond prices `B` given a
//! cashflow matrix `C` (instruments × candidate days) and a positive
//! semi-definite kernel `K` over the day grid:
//!
//! ```text
//! g        = 1 + K[:, m] · beta
//! beta     = C_mᵀ (C_m K_m C_mᵀ + l · diag(inv_w))⁻¹ (B − C_m · 1)
//! var      = K − K[:, m] C_mᵀ (…)⁻¹ C_m K[m, :]
//! band     = C·g ± 2 · sqrt(diag(C · var · Cᵀ))
//! ```
//!
//! where `m` is the set of days carrying any cashflow and
//! `l = ridge / (last paid day + 1)`.
//!
//! ## Pipeline
//!
//! - [`CashflowSupport`]: support masking and ridge scaling
//! - [`RegularisedSystem`]: regularised solve on the support
//! - [`reconstruct_discount_factors`] / [`posterior_covariance`]: curve and covariance
//! - [`project_prices`]: fitted prices and confidence band
//!
//! [`KernelRidgeFitter`] runs all four stages; [`kernel_ridge_confidence`]
//! is the one-call form returning `(variance, std_dev, lower95, upper95)`.

mod config;
mod curve;
mod error;
mod fitter;
mod inputs;
mod projection;
mod reconstruction;
mod result;
mod solve;
mod support;

pub use config::{CovariancePolicy, KernelRidgeConfig, KernelRidgeConfigBuilder};
pub use curve::KernelRidgeCurve;
pub use error::KernelRidgeError;
pub use fitter::{kernel_ridge_confidence, KernelRidgeFitter};
pub use inputs::{InverseWeights, KernelRidgeProblem};
pub use projection::{curve_uncertainty, project_prices, CurveUncertainty, PriceProjection};
pub use reconstruction::{
    extrapolate_discount_factors, posterior_covariance, reconstruct_discount_factors,
};
pub use result::{ConfidenceSummary, KernelRidgeFit};
pub use solve::RegularisedSystem;
pub use support::CashflowSupport;
