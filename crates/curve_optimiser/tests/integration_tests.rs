//! Integration tests for kernel ridge curve fitting.
//!
//! These tests run the full pipeline on a small bond universe priced off a
//! known flat 3% curve, checking repricing, regularisation limits, masking
//! equivalence and the confidence band invariants.

use approx::assert_relative_eq;
use curve_core::market_data::YieldCurve;
use curve_core::types::time::day_to_year_fraction;
use curve_optimiser::kernel_ridge::{
    kernel_ridge_confidence, CovariancePolicy, InverseWeights, KernelRidgeConfig,
    KernelRidgeError, KernelRidgeFitter, KernelRidgeProblem,
};
use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;

const NMAX: usize = 730;
const NMAX_Y: usize = 1095;
const FLAT_RATE: f64 = 0.03;

/// Semi-annual coupon days on the two-year grid.
const COUPON_DAYS: [usize; 4] = [181, 364, 546, 729];
const BILL_DAY: usize = 90;

/// Exponential (Ornstein-Uhlenbeck) kernel with a one-year correlation length.
fn exponential_kernel(nmax: usize, nmax_y: usize) -> DMatrix<f64> {
    DMatrix::from_fn(nmax, nmax_y, |i, j| {
        1e-4 * (-(i as f64 - j as f64).abs() / 365.0).exp()
    })
}

fn true_discount_factor(day: usize) -> f64 {
    (-FLAT_RATE * day_to_year_fraction(day)).exp()
}

/// A 3M bill plus four 4% semi-annual bullets maturing on each coupon day.
fn bond_universe() -> DMatrix<f64> {
    let mut c = DMatrix::zeros(5, NMAX);
    c[(0, BILL_DAY)] = 100.0;
    for (bond, &maturity) in COUPON_DAYS.iter().enumerate() {
        for &day in COUPON_DAYS.iter().filter(|d| **d <= maturity) {
            c[(bond + 1, day)] += 2.0;
        }
        c[(bond + 1, maturity)] += 100.0;
    }
    c
}

fn flat_curve_prices(c: &DMatrix<f64>) -> DVector<f64> {
    let d = DVector::from_fn(c.ncols(), |i, _| true_discount_factor(i));
    c * d
}

fn fit_with_ridge(
    c: &DMatrix<f64>,
    b: &DVector<f64>,
    k: &DMatrix<f64>,
    ridge: f64,
) -> curve_optimiser::kernel_ridge::KernelRidgeFit {
    let problem = KernelRidgeProblem::new(c, b, 1.0, k).unwrap();
    KernelRidgeFitter::new(KernelRidgeConfig::new(ridge))
        .unwrap()
        .fit(&problem)
        .unwrap()
}

// ============================================================================
// End-to-End Fit Tests
// ============================================================================

/// Test that a vanishing ridge reprices every bond and recovers the curve on
/// the paid days.
#[test]
fn test_end_to_end_reprices_bonds() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);

    let fit = fit_with_ridge(&c, &b, &k, 1e-10);

    assert_eq!(fit.support().indices(), &[90, 181, 364, 546, 729]);
    assert_eq!(fit.support().horizon_days(), NMAX);

    for i in 0..5 {
        assert!(
            fit.residuals(&b)[i].abs() < 1e-6,
            "Residual for bond {} should be < 1e-6, got {}",
            i,
            fit.residuals(&b)[i]
        );
    }

    // Five instruments on five paid days: the curve is pinned there
    for &day in fit.support().indices() {
        assert_relative_eq!(
            fit.discount_factors()[day],
            true_discount_factor(day),
            epsilon = 1e-7
        );
    }
}

#[test]
fn test_output_shapes() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);

    let fit = fit_with_ridge(&c, &b, &k, 1.0);

    assert_eq!(fit.variance().len(), NMAX);
    assert_eq!(fit.std_dev().len(), NMAX);
    assert_eq!(fit.lower95().len(), 5);
    assert_eq!(fit.upper95().len(), 5);
    assert_eq!(fit.beta().len(), 5);
    assert_eq!(fit.discount_factors().len(), NMAX);
    assert_eq!(fit.extrapolated_discount_factors().len(), NMAX_Y);
    assert_eq!(fit.covariance().shape(), (NMAX, NMAX_Y));
}

#[test]
fn test_variance_collapses_on_observed_days() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);

    let fit = fit_with_ridge(&c, &b, &k, 1e-10);

    for &day in fit.support().indices() {
        assert!(fit.variance()[day] < 1e-10);
    }
    // Day 0 lies before the first observation and keeps prior uncertainty
    assert!(fit.variance()[0] > 1e-6);
    assert!(fit.std_dev()[0] > 1e-3);
}

#[test]
fn test_band_contains_fit_and_widens_with_ridge() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);

    let tight = fit_with_ridge(&c, &b, &k, 1e-4);
    let loose = fit_with_ridge(&c, &b, &k, 10.0);

    for fit in [&tight, &loose] {
        for i in 0..5 {
            assert!(fit.lower95()[i] <= fit.fitted_prices()[i]);
            assert!(fit.fitted_prices()[i] <= fit.upper95()[i]);
        }
    }
    for i in 0..5 {
        let tight_width = tight.upper95()[i] - tight.lower95()[i];
        let loose_width = loose.upper95()[i] - loose.lower95()[i];
        assert!(
            loose_width > tight_width,
            "Band for bond {} should widen with ridge: {} vs {}",
            i,
            loose_width,
            tight_width
        );
    }
}

#[test]
fn test_extrapolated_curve_extends_fit() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);

    let fit = fit_with_ridge(&c, &b, &k, 0.1);
    let g = fit.discount_factors();
    let g_y = fit.extrapolated_discount_factors();

    for i in 0..NMAX {
        assert_relative_eq!(g[i], g_y[i], epsilon = 1e-14);
    }
    // Far beyond the last observation the kernel decays back toward 1
    assert!(g_y[NMAX_Y - 1] > g_y[NMAX - 1]);
}

// ============================================================================
// Curve Integration Tests
// ============================================================================

#[test]
fn test_fitted_curve_as_yield_curve() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);

    let fit = fit_with_ridge(&c, &b, &k, 1e-10);
    let curve = fit.curve().unwrap();

    assert_eq!(curve.discount_factor(0.0).unwrap(), 1.0);
    assert_relative_eq!(curve.max_maturity(), 2.0, epsilon = 1e-12);
    assert_relative_eq!(curve.zero_rate(2.0).unwrap(), FLAT_RATE, epsilon = 1e-6);
    assert_relative_eq!(curve.zero_rate(1.0).unwrap(), FLAT_RATE, epsilon = 1e-6);
    assert!(curve.discount_factor(2.5).is_err());

    let extended = fit.extrapolated_curve().unwrap();
    assert!(extended.discount_factor(2.5).is_ok());
}

// ============================================================================
// Regularisation Limit Tests
// ============================================================================

#[test]
fn test_infinite_ridge_limit() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);

    let fit = fit_with_ridge(&c, &b, &k, 1e16);
    let unit_prices = &c * DVector::from_element(NMAX, 1.0);

    assert!(fit.beta().amax() < 1e-8);
    for i in 0..5 {
        assert_relative_eq!(fit.fitted_prices()[i], unit_prices[i], epsilon = 1e-6);
    }
    // The posterior reverts to the prior
    for day in [0, 200, 729] {
        assert_relative_eq!(fit.variance()[day], k[(day, day)], epsilon = 1e-9);
    }
}

#[test]
fn test_uniform_and_per_instrument_weights_agree() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);
    let fitter = KernelRidgeFitter::new(KernelRidgeConfig::new(0.5)).unwrap();

    let uniform = KernelRidgeProblem::new(&c, &b, InverseWeights::Uniform(2.0), &k).unwrap();
    let per_instrument = KernelRidgeProblem::new(&c, &b, vec![2.0; 5], &k).unwrap();

    let a = fitter.fit(&uniform).unwrap();
    let p = fitter.fit(&per_instrument).unwrap();
    assert_eq!(a.summary(), p.summary());
}

// ============================================================================
// Masking Tests
// ============================================================================

/// Test that solving on the support matches the dense closed form over all
/// candidate days with the same scaled ridge.
#[test]
fn test_masked_solve_matches_dense_closed_form() {
    let c = bond_universe();
    let b = flat_curve_prices(&c) + DVector::from_vec(vec![0.02, -0.05, 0.03, 0.0, -0.04]);
    let k = exponential_kernel(NMAX, NMAX_Y);
    let ridge = 1.0;

    let fit = fit_with_ridge(&c, &b, &k, ridge);

    let k0 = k.columns(0, NMAX).clone_owned();
    let l = ridge / NMAX as f64;
    let system = &c * &k0 * c.transpose() + DMatrix::identity(5, 5) * l;
    let inverse = system.try_inverse().unwrap();
    let beta_dense = c.transpose() * (&inverse * (&b - &c * DVector::from_element(NMAX, 1.0)));
    let g_dense = (&k0 * &beta_dense).add_scalar(1.0);
    let var_dense = &k0 - &k0 * c.transpose() * &inverse * &c * &k0;

    for (pos, &day) in fit.support().indices().iter().enumerate() {
        assert_relative_eq!(
            fit.beta()[pos],
            beta_dense[day],
            epsilon = 1e-10,
            max_relative = 1e-8
        );
    }
    for day in 0..NMAX {
        assert_relative_eq!(fit.discount_factors()[day], g_dense[day], epsilon = 1e-10);
        assert_relative_eq!(
            fit.variance()[day],
            var_dense[(day, day)].max(0.0),
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_covariance_policies_agree_on_outputs() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);
    let problem = KernelRidgeProblem::new(&c, &b, 1.0, &k).unwrap();

    let masked = KernelRidgeFitter::with_defaults().fit(&problem).unwrap();
    let legacy = KernelRidgeFitter::new(
        KernelRidgeConfig::default().with_covariance_policy(CovariancePolicy::PrefixTruncated),
    )
    .unwrap()
    .fit(&problem)
    .unwrap();

    assert_eq!(legacy.covariance().shape(), (NMAX, NMAX));
    for day in 0..NMAX {
        assert_relative_eq!(masked.variance()[day], legacy.variance()[day], epsilon = 1e-14);
    }
    for i in 0..5 {
        assert_relative_eq!(masked.lower95()[i], legacy.lower95()[i], epsilon = 1e-9);
        assert_relative_eq!(masked.upper95()[i], legacy.upper95()[i], epsilon = 1e-9);
    }
}

// ============================================================================
// Degenerate Case Tests
// ============================================================================

#[test]
fn test_single_zero_coupon_bond() {
    let c = DMatrix::from_element(1, 1, 1.0);
    let b = DVector::from_element(1, 0.995);
    let k = DMatrix::from_element(1, 1, 1e-4);

    let (variance, std_dev, lower95, upper95) =
        kernel_ridge_confidence(&c, &b, 0.0, 1.0, &k).unwrap().into_tuple();

    assert_eq!(variance.len(), 1);
    assert_relative_eq!(variance[0], 0.0, epsilon = 1e-18);
    assert!(std_dev[0] < 1e-8);
    assert_relative_eq!(lower95[0], 0.995, epsilon = 1e-7);
    assert_relative_eq!(upper95[0], 0.995, epsilon = 1e-7);
}

// ============================================================================
// Batch Fitting Tests
// ============================================================================

#[test]
fn test_batch_matches_individual_fits() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let bumped = &b + DVector::from_element(5, 0.1);
    let k = exponential_kernel(NMAX, NMAX_Y);

    let problems = vec![
        KernelRidgeProblem::new(&c, &b, 1.0, &k).unwrap(),
        KernelRidgeProblem::new(&c, &bumped, 1.0, &k).unwrap(),
        KernelRidgeProblem::new(&c, &b, 5.0, &k).unwrap(),
    ];
    let fitter = KernelRidgeFitter::new(KernelRidgeConfig::new(0.2)).unwrap();

    let batch = fitter.fit_batch(&problems);
    assert_eq!(batch.len(), problems.len());
    for (result, problem) in batch.iter().zip(&problems) {
        let single = fitter.fit(problem).unwrap();
        assert_eq!(result.as_ref().unwrap().summary(), single.summary());
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

#[cfg(feature = "serde")]
#[test]
fn test_fit_from_toml_config() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);
    let problem = KernelRidgeProblem::new(&c, &b, 1.0, &k).unwrap();

    let config = KernelRidgeConfig::from_toml_str(
        r#"
        ridge = 0.5
        confidence_multiplier = 1.96
        "#,
    )
    .unwrap();
    let fit = KernelRidgeFitter::new(config).unwrap().fit(&problem).unwrap();

    for i in 0..5 {
        let half_width = fit.upper95()[i] - fit.fitted_prices()[i];
        assert_relative_eq!(half_width, 1.96 * fit.price_std_dev()[i], epsilon = 1e-12);
    }
}

// ============================================================================
// Error Handling Tests
// ============================================================================

#[test]
fn test_error_price_length_mismatch() {
    let c = bond_universe();
    let b = DVector::from_element(4, 100.0);
    let k = exponential_kernel(NMAX, NMAX_Y);

    let err = KernelRidgeProblem::new(&c, &b, 1.0, &k).unwrap_err();
    assert!(matches!(err, KernelRidgeError::ShapeMismatch { .. }));
    assert!(err.is_invalid_input());
}

#[test]
fn test_error_kernel_too_narrow() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX - 1);

    assert!(matches!(
        KernelRidgeProblem::new(&c, &b, 1.0, &k),
        Err(KernelRidgeError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_error_negative_inverse_weight() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);

    assert!(matches!(
        KernelRidgeProblem::new(&c, &b, vec![1.0, 1.0, -1.0, 1.0, 1.0], &k),
        Err(KernelRidgeError::InvalidWeights { index: 2, .. })
    ));
}

#[test]
fn test_error_non_finite_price() {
    let c = bond_universe();
    let mut b = flat_curve_prices(&c);
    b[3] = f64::NAN;
    let k = exponential_kernel(NMAX, NMAX_Y);

    assert!(matches!(
        KernelRidgeProblem::new(&c, &b, 1.0, &k),
        Err(KernelRidgeError::NonFiniteInput(_))
    ));
}

#[test]
fn test_error_negative_ridge() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let k = exponential_kernel(NMAX, NMAX_Y);

    assert!(matches!(
        kernel_ridge_confidence(&c, &b, -0.1, 1.0, &k),
        Err(KernelRidgeError::NegativeRidge { .. })
    ));
}

#[test]
fn test_error_asymmetric_kernel() {
    let c = bond_universe();
    let b = flat_curve_prices(&c);
    let mut k = exponential_kernel(NMAX, NMAX_Y);
    k[(100, 400)] *= 2.0;

    let err = kernel_ridge_confidence(&c, &b, 1.0, 1.0, &k).unwrap_err();
    assert!(matches!(
        err,
        KernelRidgeError::NonSymmetricKernel { row: 100, col: 400, .. }
    ));
}

#[test]
fn test_error_no_cashflows() {
    let c = DMatrix::zeros(2, NMAX);
    let b = DVector::from_element(2, 100.0);
    let k = exponential_kernel(NMAX, NMAX_Y);

    assert_eq!(
        kernel_ridge_confidence(&c, &b, 1.0, 1.0, &k).unwrap_err(),
        KernelRidgeError::EmptySupport
    );
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Random bullet bonds on a short grid keep every band invariant.
    #[test]
    fn test_random_portfolio_invariants(
        maturities in prop::collection::vec(5usize..60, 1..6),
        coupon in 0.0f64..5.0,
        noise in prop::collection::vec(-0.5f64..0.5, 6),
        ridge in 1e-3f64..10.0,
    ) {
        let nmax = 60;
        let nt = maturities.len();
        let mut c = DMatrix::zeros(nt, nmax);
        for (bond, &maturity) in maturities.iter().enumerate() {
            c[(bond, maturity / 2)] += coupon;
            c[(bond, maturity)] += 100.0;
        }
        let d = DVector::from_fn(nmax, |i, _| true_discount_factor(i));
        let b = &c * d + DVector::from_fn(nt, |i, _| noise[i]);
        let k = exponential_kernel(nmax, 90);

        let summary = kernel_ridge_confidence(&c, &b, ridge, 1.0, &k).unwrap();

        prop_assert_eq!(summary.variance.len(), nmax);
        prop_assert_eq!(summary.std_dev.len(), nmax);
        prop_assert_eq!(summary.lower95.len(), nt);
        prop_assert_eq!(summary.upper95.len(), nt);
        prop_assert!(summary.variance.iter().all(|v| *v >= 0.0));
        prop_assert!(summary.std_dev.iter().all(|v| *v >= 0.0));
        for i in 0..nt {
            prop_assert!(summary.lower95[i] <= summary.upper95[i]);
        }
    }
}
