//! Ordinary linear least squares via the normal equations.
//!
//! Solves `min ‖A β − y‖²` by forming `AᵀA β = Aᵀy` and reducing that square
//! system with [`gaussian_elimination`]. When `A` is square and
//! non-singular this is the exact solve.

use hjm_core::{
    ensure,
    errors::{Error, Result},
    Real,
};
use nalgebra::{DMatrix, DVector};

/// Pivots below this fraction of the largest matrix entry are treated as zero.
const PIVOT_TOLERANCE: Real = 1.0e-12;

/// Solve the square system `a x = b` by Gaussian elimination with partial
/// pivoting followed by back-substitution.
///
/// # Errors
/// * `InvalidArgument` if `a` is not square or `b` has the wrong length.
/// * `SingularSystem` if a pivot is (near) zero relative to the largest entry.
pub fn gaussian_elimination(mut a: DMatrix<Real>, mut b: DVector<Real>) -> Result<DVector<Real>> {
    let n = a.nrows();
    ensure!(n > 0 && a.ncols() == n, "matrix must be square and non-empty");
    ensure!(b.len() == n, "right-hand side length {} != {n}", b.len());

    let scale = a.amax();
    if !(scale > 0.0) || !scale.is_finite() {
        return Err(Error::SingularSystem(format!(
            "matrix has no usable entries (max |a_ij| = {scale})"
        )));
    }

    // Forward elimination to row-echelon form.
    for k in 0..n {
        let (offset, pivot) = a
            .view((k, k), (n - k, 1))
            .iter()
            .map(|v| v.abs())
            .enumerate()
            .fold((0, 0.0), |best, (i, v)| if v > best.1 { (i, v) } else { best });
        if pivot <= PIVOT_TOLERANCE * scale {
            return Err(Error::SingularSystem(format!(
                "zero pivot in column {k} (|pivot| = {pivot:e})"
            )));
        }
        let p = k + offset;
        if p != k {
            a.swap_rows(k, p);
            b.swap_rows(k, p);
        }
        for i in (k + 1)..n {
            let factor = a[(i, k)] / a[(k, k)];
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                a[(i, j)] -= factor * a[(k, j)];
            }
            b[i] -= factor * b[k];
        }
    }

    // Back-substitution.
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let tail: Real = ((i + 1)..n).map(|j| a[(i, j)] * x[j]).sum();
        x[i] = (b[i] - tail) / a[(i, i)];
    }
    Ok(x)
}

/// Result of an ordinary least-squares fit.
#[derive(Debug, Clone)]
pub struct LinearLeastSquares {
    coefficients: DVector<Real>,
    residuals: DVector<Real>,
}

impl LinearLeastSquares {
    /// Fit the coefficients for a pre-built design matrix.
    ///
    /// * `a`: the *n × m* design matrix, one row per observation.
    /// * `y`: dependent variable observations (length *n*).
    ///
    /// # Errors
    /// * `InvalidArgument` if `y` does not match the rows of `a`, if there
    ///   are fewer observations than unknowns, or if any input is non-finite.
    /// * `SingularSystem` if the columns of `a` are (near) linearly dependent.
    pub fn from_design_matrix(a: &DMatrix<Real>, y: &[Real]) -> Result<Self> {
        let n = a.nrows();
        let m = a.ncols();
        ensure!(m > 0, "design matrix has no columns");
        ensure!(
            y.len() == n,
            "y length {} must equal number of rows of A ({n})",
            y.len()
        );
        ensure!(n >= m, "more unknowns ({m}) than observations ({n})");
        ensure!(
            a.iter().chain(y).all(|v| v.is_finite()),
            "least-squares inputs must be finite"
        );

        let y = DVector::from_column_slice(y);
        let at = a.transpose();
        let coefficients = gaussian_elimination(&at * a, &at * &y)?;
        let residuals = y - a * &coefficients;
        Ok(Self {
            coefficients,
            residuals,
        })
    }

    /// Fitted coefficients β.
    pub fn coefficients(&self) -> &DVector<Real> {
        &self.coefficients
    }

    /// Residuals (y − A β).
    pub fn residuals(&self) -> &DVector<Real> {
        &self.residuals
    }

    /// Sum of squared residuals.
    pub fn residual_sum_of_squares(&self) -> Real {
        self.residuals.norm_squared()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn elimination_solves_square_system() {
        // 2x + y − z = 8, −3x − y + 2z = −11, −2x + y + 2z = −3 → (2, 3, −1)
        let a = DMatrix::from_row_slice(3, 3, &[2.0, 1.0, -1.0, -3.0, -1.0, 2.0, -2.0, 1.0, 2.0]);
        let b = DVector::from_column_slice(&[8.0, -11.0, -3.0]);
        let x = gaussian_elimination(a, b).unwrap();
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[2], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn elimination_pivots_past_a_leading_zero() {
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let b = DVector::from_column_slice(&[5.0, 7.0]);
        let x = gaussian_elimination(a, b).unwrap();
        assert_abs_diff_eq!(x[0], 7.0, epsilon = 1e-15);
        assert_abs_diff_eq!(x[1], 5.0, epsilon = 1e-15);
    }

    #[test]
    fn elimination_detects_singular_matrix() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_column_slice(&[1.0, 2.0]);
        assert!(matches!(
            gaussian_elimination(a, b),
            Err(Error::SingularSystem(_))
        ));
        let zero = DMatrix::zeros(2, 2);
        assert!(matches!(
            gaussian_elimination(zero, DVector::zeros(2)),
            Err(Error::SingularSystem(_))
        ));
    }

    #[test]
    fn linear_fit() {
        // y = 2 + 3x
        let x: Vec<Real> = (0..20).map(|i| i as Real).collect();
        let y: Vec<Real> = x.iter().map(|&xi| 2.0 + 3.0 * xi).collect();
        let a = DMatrix::from_fn(x.len(), 2, |i, j| if j == 0 { 1.0 } else { x[i] });

        let fit = LinearLeastSquares::from_design_matrix(&a, &y).unwrap();
        let c = fit.coefficients();
        assert_abs_diff_eq!(c[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(c[1], 3.0, epsilon = 1e-10);
        assert!(fit.residual_sum_of_squares() < 1e-18);
    }

    #[test]
    fn noisy_linear_fit() {
        let x: Vec<Real> = (0..100).map(|i| i as Real * 0.1).collect();
        let noise = [0.01, -0.02, 0.015, -0.005, 0.03, -0.01, 0.02, -0.03, 0.005, 0.01];
        let y: Vec<Real> = x
            .iter()
            .enumerate()
            .map(|(i, &xi)| 1.0 + 2.0 * xi + noise[i % noise.len()])
            .collect();
        let a = DMatrix::from_fn(x.len(), 2, |i, j| if j == 0 { 1.0 } else { x[i] });

        let fit = LinearLeastSquares::from_design_matrix(&a, &y).unwrap();
        let c = fit.coefficients();
        assert!((c[0] - 1.0).abs() < 0.1, "intercept = {}", c[0]);
        assert!((c[1] - 2.0).abs() < 0.01, "slope = {}", c[1]);
        // residuals are orthogonal to the columns of A
        let at_r = a.transpose() * fit.residuals();
        assert!(at_r.amax() < 1e-9);
    }

    #[test]
    fn single_column_fit() {
        let a = DMatrix::from_column_slice(3, 1, &[1.0, 2.0, 3.0]);
        let fit = LinearLeastSquares::from_design_matrix(&a, &[2.0, 4.0, 6.0]).unwrap();
        assert_abs_diff_eq!(fit.coefficients()[0], 2.0, epsilon = 1e-14);
    }

    #[test]
    fn too_few_observations() {
        let a = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
        assert!(matches!(
            LinearLeastSquares::from_design_matrix(&a, &[2.0]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn collinear_columns_are_singular() {
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 4.0, 3.0, 6.0]);
        assert!(matches!(
            LinearLeastSquares::from_design_matrix(&a, &[1.0, 2.0, 3.0]),
            Err(Error::SingularSystem(_))
        ));
    }
}
