//! Kernel ridge fitting pipeline.
//!
//! Runs the stages in a fixed order, each consuming only the previous
//! stage's outputs:
//!
//! 1. Support masking ([`CashflowSupport`])
//! 2. Regularised solve ([`RegularisedSystem`])
//! 3. Curve reconstruction ([`reconstruct_discount_factors`], [`posterior_covariance`])
//! 4. Price projection ([`project_prices`])

use curve_core::math::linalg::symmetry_violation;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, trace, warn};

use super::config::KernelRidgeConfig;
use super::error::KernelRidgeError;
use super::inputs::{InverseWeights, KernelRidgeProblem};
use super::projection::{curve_uncertainty, project_prices};
use super::reconstruction::{
    extrapolate_discount_factors, posterior_covariance, reconstruct_discount_factors,
};
use super::result::{ConfidenceSummary, KernelRidgeFit};
use super::solve::RegularisedSystem;
use super::support::CashflowSupport;

/// Kernel ridge discount curve fitter.
///
/// Stateless apart from its configuration; a single fitter can be shared
/// across threads and reused for any number of problems.
///
/// # Examples
///
/// ```
/// use curve_optimiser::kernel_ridge::{KernelRidgeConfig, KernelRidgeFitter, KernelRidgeProblem};
/// use nalgebra::{DMatrix, DVector};
///
/// // Two bonds over four candidate days.
/// let c = DMatrix::from_row_slice(2, 4, &[
///     0.0, 101.0, 0.0, 0.0,
///     0.0, 1.5, 0.0, 101.5,
/// ]);
/// let b = DVector::from_vec(vec![100.9, 102.6]);
/// let k = DMatrix::from_fn(4, 6, |i, j| 1e-3 * (-0.2 * (i as f64 - j as f64).abs()).exp());
///
/// let problem = KernelRidgeProblem::new(&c, &b, 1.0, &k).unwrap();
/// let fit = KernelRidgeFitter::new(KernelRidgeConfig::new(0.1)).unwrap().fit(&problem).unwrap();
///
/// assert_eq!(fit.support().indices(), &[1, 3]);
/// assert_eq!(fit.variance().len(), 4);
/// assert_eq!(fit.lower95().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct KernelRidgeFitter {
    config: KernelRidgeConfig,
}

impl KernelRidgeFitter {
    /// Create a fitter after validating the configuration.
    pub fn new(config: KernelRidgeConfig) -> Result<Self, KernelRidgeError> {
        config.validate()?;
        if config.covariance_policy.is_legacy() {
            warn!("prefix-truncated covariance policy is retained for legacy outputs only");
        }
        Ok(Self { config })
    }

    /// Create a fitter with the default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Get the configuration.
    pub fn config(&self) -> &KernelRidgeConfig {
        &self.config
    }

    /// Fit the curve and its confidence bands.
    ///
    /// # Errors
    ///
    /// * `NonSymmetricKernel` - if the kernel's leading block is asymmetric
    ///   beyond the configured tolerance
    /// * `EmptySupport` - if no candidate day has a nonzero cashflow
    /// * `SingularSystem` - if the regularised system cannot be inverted
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(
            nt = problem.instrument_count(),
            nmax = problem.day_count(),
            nmax_y = problem.horizon_day_count(),
            ridge = self.config.ridge,
        )
    )]
    pub fn fit(&self, problem: &KernelRidgeProblem<'_>) -> Result<KernelRidgeFit, KernelRidgeError> {
        let cashflows = problem.cashflows();
        let kernel = problem.kernel();
        let nt = problem.instrument_count();
        let nmax = problem.day_count();

        self.check_kernel_symmetry(kernel, nmax)?;

        // Stage 1: support masking
        let support = CashflowSupport::from_cashflows(cashflows)?;
        let scaled_ridge = support.scaled_ridge(self.config.ridge);
        debug!(
            support_len = support.len(),
            horizon_days = support.horizon_days(),
            scaled_ridge,
            "masked cashflow support"
        );
        let masked_cashflows = support.restrict_cashflows(cashflows);
        let masked_kernel = support.restrict_kernel(kernel);

        // Stage 2: regularised solve
        let inverse_weights = problem.inverse_weights().to_vector(nt);
        let system = RegularisedSystem::solve(
            &masked_cashflows,
            &masked_kernel,
            problem.prices(),
            scaled_ridge,
            &inverse_weights,
            self.config.singularity_tolerance,
        )
        .map_err(|err| {
            debug!(error = %err, "regularised solve failed");
            err
        })?;
        trace!(beta_norm = system.beta.norm(), "solved coefficients");

        // Stage 3: curve reconstruction
        let discount_factors = reconstruct_discount_factors(kernel, &support, &system.beta);
        let extrapolated_discount_factors =
            extrapolate_discount_factors(kernel, &support, &system.beta);
        let covariance = posterior_covariance(
            kernel,
            &support,
            cashflows,
            &masked_cashflows,
            &system.ckc_inverse,
            self.config.covariance_policy,
        );
        let uncertainty = curve_uncertainty(&covariance, nmax);

        // Stage 4: price projection
        let projection = project_prices(
            cashflows,
            &discount_factors,
            &covariance,
            self.config.confidence_multiplier,
        );
        debug!(
            clipped = uncertainty.clipped_count + projection.clipped_count,
            "projected prices and confidence band"
        );

        Ok(KernelRidgeFit {
            support,
            scaled_ridge,
            covariance_policy: self.config.covariance_policy,
            beta: system.beta,
            discount_factors,
            extrapolated_discount_factors,
            covariance,
            uncertainty,
            projection,
        })
    }

    /// Fit independent problems, in parallel when the `parallel` feature is
    /// enabled.
    ///
    /// Results keep the order of `problems`; one failure does not affect
    /// the others.
    #[cfg(feature = "parallel")]
    pub fn fit_batch(
        &self,
        problems: &[KernelRidgeProblem<'_>],
    ) -> Vec<Result<KernelRidgeFit, KernelRidgeError>> {
        use rayon::prelude::*;

        problems.par_iter().map(|problem| self.fit(problem)).collect()
    }

    /// Sequential fallback when the `parallel` feature is disabled.
    #[cfg(not(feature = "parallel"))]
    pub fn fit_batch(
        &self,
        problems: &[KernelRidgeProblem<'_>],
    ) -> Vec<Result<KernelRidgeFit, KernelRidgeError>> {
        problems.iter().map(|problem| self.fit(problem)).collect()
    }

    fn check_kernel_symmetry(&self, kernel: &DMatrix<f64>, nmax: usize) -> Result<(), KernelRidgeError> {
        let tolerance = self.config.symmetry_tolerance;
        if tolerance.is_infinite() {
            return Ok(());
        }
        let Some(violation) = symmetry_violation(kernel, nmax) else {
            return Ok(());
        };
        let scale = kernel
            .view((0, 0), (nmax, nmax))
            .iter()
            .fold(1.0_f64, |acc, v| acc.max(v.abs()));
        if violation.difference > tolerance * scale {
            return Err(KernelRidgeError::NonSymmetricKernel {
                row: violation.row,
                col: violation.col,
                difference: violation.difference,
                tolerance: tolerance * scale,
            });
        }
        Ok(())
    }
}

/// One-call fit returning `(variance, std_dev, lower95, upper95)`.
///
/// Uses the default configuration with the given ridge: masked-support
/// covariance and a two-standard-deviation band.
///
/// # Examples
///
/// ```
/// use curve_optimiser::kernel_ridge::kernel_ridge_confidence;
/// use nalgebra::{DMatrix, DVector};
///
/// let c = DMatrix::from_element(1, 1, 1.0);
/// let b = DVector::from_element(1, 0.98);
/// let k = DMatrix::from_element(1, 1, 0.01);
///
/// let summary = kernel_ridge_confidence(&c, &b, 0.0, 1.0, &k).unwrap();
/// let (variance, std_dev, lower95, upper95) = summary.into_tuple();
/// assert_eq!(variance.len(), 1);
/// assert!(std_dev[0] >= 0.0);
/// assert!(lower95[0] <= upper95[0]);
/// ```
pub fn kernel_ridge_confidence(
    cashflows: &DMatrix<f64>,
    prices: &DVector<f64>,
    ridge: f64,
    inverse_weights: impl Into<InverseWeights>,
    kernel: &DMatrix<f64>,
) -> Result<ConfidenceSummary, KernelRidgeError> {
    let problem = KernelRidgeProblem::new(cashflows, prices, inverse_weights, kernel)?;
    let fitter = KernelRidgeFitter::new(KernelRidgeConfig::new(ridge))?;
    Ok(fitter.fit(&problem)?.into_summary())
}
