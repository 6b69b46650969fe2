//! Kernel ridge configuration types.
//!
//! The ridge penalty and the covariance policy are caller-supplied
//! constants; nothing in this crate searches over them.

use super::error::KernelRidgeError;

/// Which block of the kernel feeds the posterior covariance.
///
/// Two formulas for the curve covariance exist in earlier versions of this
/// model. Both share the masked solve for the coefficients; they differ only
/// in how the kernel enters the covariance:
///
/// - `MaskedSupport` (default): `K − K[:, m] C_mᵀ (CKC)⁻¹ C_m K[m, :]`, using
///   the kernel restricted to the nonzero-cashflow days `m`, consistent with
///   how the coefficients were solved. Shape `Nmax × Nmax_y`.
/// - `PrefixTruncated` (legacy): `K₀ − K₀ Cᵀ (CKC)⁻¹ C K₀` with
///   `K₀ = K[:Nmax, :Nmax]`. Shape `Nmax × Nmax`. Retained only for
///   reproducing historical outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CovariancePolicy {
    /// Kernel restricted to the masked support (default).
    #[default]
    MaskedSupport,

    /// Leading `Nmax × Nmax` block of the kernel (legacy).
    PrefixTruncated,
}

impl CovariancePolicy {
    /// Check if this is the legacy prefix-truncated policy.
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::PrefixTruncated)
    }
}

/// Configuration for a kernel ridge fit.
///
/// # Examples
///
/// ```
/// use curve_optimiser::kernel_ridge::{CovariancePolicy, KernelRidgeConfig};
///
/// let config = KernelRidgeConfig::builder()
///     .ridge(0.5)
///     .covariance_policy(CovariancePolicy::MaskedSupport)
///     .build()
///     .unwrap();
/// assert_eq!(config.ridge, 0.5);
/// assert_eq!(config.confidence_multiplier, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KernelRidgeConfig {
    /// Ridge penalty (>= 0).
    ///
    /// Rescaled by the support horizon in days before use, so it acts
    /// relative to the longest cashflow date rather than as an absolute
    /// penalty.
    pub ridge: f64,

    /// Kernel block used for the posterior covariance.
    pub covariance_policy: CovariancePolicy,

    /// Half-width of the confidence band in standard deviations.
    ///
    /// Defaults to 2.0 (normal approximation of a 95% band, not 1.96).
    pub confidence_multiplier: f64,

    /// Maximum tolerated asymmetry of the kernel's leading square block,
    /// relative to `max(1, max |K|)`. `f64::INFINITY` disables the check.
    pub symmetry_tolerance: f64,

    /// Minimum smallest/largest LU pivot ratio before the regularised
    /// system is declared singular.
    pub singularity_tolerance: f64,
}

impl Default for KernelRidgeConfig {
    /// Default values:
    /// - `ridge`: 1.0
    /// - `covariance_policy`: `MaskedSupport`
    /// - `confidence_multiplier`: 2.0
    /// - `symmetry_tolerance`: 1e-10
    /// - `singularity_tolerance`: 1e-14
    fn default() -> Self {
        Self {
            ridge: 1.0,
            covariance_policy: CovariancePolicy::MaskedSupport,
            confidence_multiplier: 2.0,
            symmetry_tolerance: 1e-10,
            singularity_tolerance: 1e-14,
        }
    }
}

impl KernelRidgeConfig {
    /// Create a configuration with the given ridge and default settings.
    pub fn new(ridge: f64) -> Self {
        Self {
            ridge,
            ..Self::default()
        }
    }

    /// Create a builder initialised with default values.
    pub fn builder() -> KernelRidgeConfigBuilder {
        KernelRidgeConfigBuilder::new()
    }

    /// Set the ridge penalty.
    pub fn with_ridge(mut self, ridge: f64) -> Self {
        self.ridge = ridge;
        self
    }

    /// Set the covariance policy.
    pub fn with_covariance_policy(mut self, policy: CovariancePolicy) -> Self {
        self.covariance_policy = policy;
        self
    }

    /// Set the confidence band multiplier.
    pub fn with_confidence_multiplier(mut self, multiplier: f64) -> Self {
        self.confidence_multiplier = multiplier;
        self
    }

    /// Set the kernel symmetry tolerance.
    pub fn with_symmetry_tolerance(mut self, tolerance: f64) -> Self {
        self.symmetry_tolerance = tolerance;
        self
    }

    /// Set the singularity tolerance.
    pub fn with_singularity_tolerance(mut self, tolerance: f64) -> Self {
        self.singularity_tolerance = tolerance;
        self
    }

    /// Validate all fields.
    ///
    /// # Errors
    ///
    /// * `NegativeRidge` - if `ridge` is negative or not finite
    /// * `InvalidConfig` - if the multiplier is not positive and finite, or a
    ///   tolerance is negative or NaN
    pub fn validate(&self) -> Result<(), KernelRidgeError> {
        if !self.ridge.is_finite() || self.ridge < 0.0 {
            return Err(KernelRidgeError::NegativeRidge { ridge: self.ridge });
        }
        if !self.confidence_multiplier.is_finite() || self.confidence_multiplier <= 0.0 {
            return Err(KernelRidgeError::invalid_config(format!(
                "confidence_multiplier must be positive and finite, got {}",
                self.confidence_multiplier
            )));
        }
        if self.symmetry_tolerance.is_nan() || self.symmetry_tolerance < 0.0 {
            return Err(KernelRidgeError::invalid_config(format!(
                "symmetry_tolerance must be >= 0, got {}",
                self.symmetry_tolerance
            )));
        }
        if !self.singularity_tolerance.is_finite() || self.singularity_tolerance < 0.0 {
            return Err(KernelRidgeError::invalid_config(format!(
                "singularity_tolerance must be finite and >= 0, got {}",
                self.singularity_tolerance
            )));
        }
        Ok(())
    }

    /// Parse and validate a configuration from TOML text.
    ///
    /// Missing keys take their default values.
    ///
    /// ```
    /// use curve_optimiser::kernel_ridge::{CovariancePolicy, KernelRidgeConfig};
    ///
    /// let config = KernelRidgeConfig::from_toml_str(
    ///     "ridge = 0.1\ncovariance_policy = \"prefix_truncated\"",
    /// )
    /// .unwrap();
    /// assert_eq!(config.ridge, 0.1);
    /// assert_eq!(config.covariance_policy, CovariancePolicy::PrefixTruncated);
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> Result<Self, KernelRidgeError> {
        let config: Self =
            toml::from_str(text).map_err(|e| KernelRidgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Builder for `KernelRidgeConfig`.
#[derive(Debug, Clone, Default)]
pub struct KernelRidgeConfigBuilder {
    config: KernelRidgeConfig,
}

impl KernelRidgeConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self {
            config: KernelRidgeConfig::default(),
        }
    }

    /// Set the ridge penalty.
    pub fn ridge(mut self, ridge: f64) -> Self {
        self.config.ridge = ridge;
        self
    }

    /// Set the covariance policy.
    pub fn covariance_policy(mut self, policy: CovariancePolicy) -> Self {
        self.config.covariance_policy = policy;
        self
    }

    /// Set the confidence band multiplier.
    pub fn confidence_multiplier(mut self, multiplier: f64) -> Self {
        self.config.confidence_multiplier = multiplier;
        self
    }

    /// Set the kernel symmetry tolerance.
    pub fn symmetry_tolerance(mut self, tolerance: f64) -> Self {
        self.config.symmetry_tolerance = tolerance;
        self
    }

    /// Set the singularity tolerance.
    pub fn singularity_tolerance(mut self, tolerance: f64) -> Self {
        self.config.singularity_tolerance = tolerance;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<KernelRidgeConfig, KernelRidgeError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
