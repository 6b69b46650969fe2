//! Checked dense linear algebra.
//!
//! Thin wrappers over `nalgebra` that turn silent numerical failure modes
//! into [`LinalgError`] values:
//!
//! - [`invert_checked`]: LU inversion that reports singular systems
//! - [`symmetry_violation`]: Largest asymmetry in a leading square block
//! - [`clip_negative`]: Floors floating-point noise on variances at zero
//! - [`ensure_finite`]: Rejects NaN/inf input

use nalgebra::{DMatrix, DVector};

use crate::types::LinalgError;

/// Location and size of the largest asymmetry in a square block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetryViolation {
    /// Row index of the offending entry
    pub row: usize,
    /// Column index of the offending entry
    pub col: usize,
    /// `|m[row, col] - m[col, row]|`
    pub difference: f64,
}

/// Invert a square matrix via LU decomposition with a pivot check.
///
/// The matrix is treated as singular when the ratio of the smallest to the
/// largest absolute LU pivot is `<= tolerance`. A zero tolerance only
/// rejects exactly vanishing pivots.
///
/// # Arguments
///
/// * `m` - Square matrix to invert
/// * `tolerance` - Minimum acceptable pivot ratio
///
/// # Returns
///
/// * `Ok(inverse)` - The inverse matrix
/// * `Err(LinalgError::SingularMatrix)` - If the pivots collapse or the
///   inverse overflows
/// * `Err(LinalgError::DimensionMismatch)` - If `m` is not square or empty
/// * `Err(LinalgError::NonFinite)` - If `m` contains NaN/inf
///
/// # Examples
///
/// ```
/// use curve_core::math::linalg::invert_checked;
/// use nalgebra::DMatrix;
///
/// let singular = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
/// assert!(invert_checked(&singular, 1e-14).unwrap_err().is_singular());
/// ```
pub fn invert_checked(m: &DMatrix<f64>, tolerance: f64) -> Result<DMatrix<f64>, LinalgError> {
    if !m.is_square() {
        return Err(LinalgError::dimension_mismatch(
            "matrix inversion (column count)",
            m.nrows(),
            m.ncols(),
        ));
    }
    let dim = m.nrows();
    if dim == 0 {
        return Err(LinalgError::dimension_mismatch("matrix inversion", 1, 0));
    }
    ensure_finite("matrix to invert", m.iter().copied())?;

    let lu = m.clone().lu();
    let (min_pivot, max_pivot) = lu
        .u()
        .diagonal()
        .iter()
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), p| {
            (lo.min(p.abs()), hi.max(p.abs()))
        });
    let pivot_ratio = if max_pivot > 0.0 {
        min_pivot / max_pivot
    } else {
        0.0
    };
    if pivot_ratio <= tolerance {
        return Err(LinalgError::SingularMatrix { dim, pivot_ratio });
    }

    match lu.try_inverse() {
        Some(inverse) if inverse.iter().all(|x| x.is_finite()) => Ok(inverse),
        _ => Err(LinalgError::SingularMatrix { dim, pivot_ratio }),
    }
}

/// Find the largest asymmetry in the leading `n × n` block of `m`.
///
/// Returns `None` when the block is exactly symmetric. `n` is clamped to the
/// smaller matrix dimension.
pub fn symmetry_violation(m: &DMatrix<f64>, n: usize) -> Option<SymmetryViolation> {
    let n = n.min(m.nrows()).min(m.ncols());
    let mut worst: Option<SymmetryViolation> = None;
    for row in 0..n {
        for col in (row + 1)..n {
            let difference = (m[(row, col)] - m[(col, row)]).abs();
            if difference > 0.0 && worst.map_or(true, |w| difference > w.difference) {
                worst = Some(SymmetryViolation {
                    row,
                    col,
                    difference,
                });
            }
        }
    }
    worst
}

/// Floor every entry at zero, returning the clipped vector and how many
/// entries were negative.
///
/// Used on variances before taking square roots so that round-off never
/// turns into a NaN standard deviation.
///
/// # Examples
///
/// ```
/// use curve_core::math::linalg::clip_negative;
/// use nalgebra::DVector;
///
/// let (clipped, count) = clip_negative(&DVector::from_vec(vec![1.0, -1e-17, 0.0]));
/// assert_eq!(count, 1);
/// assert_eq!(clipped[1], 0.0);
/// ```
pub fn clip_negative(v: &DVector<f64>) -> (DVector<f64>, usize) {
    let clipped_count = v.iter().filter(|x| **x < 0.0).count();
    (v.map(|x| x.max(0.0)), clipped_count)
}

/// Fail with [`LinalgError::NonFinite`] if any value is NaN or infinite.
pub fn ensure_finite<I>(context: &str, values: I) -> Result<(), LinalgError>
where
    I: IntoIterator<Item = f64>,
{
    if values.into_iter().all(f64::is_finite) {
        Ok(())
    } else {
        Err(LinalgError::non_finite(context))
    }
}
