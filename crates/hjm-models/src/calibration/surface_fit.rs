//! Least-squares fit of `σ1`, `σ2` to a volatility term structure.
//!
//! The model volatility of a bond with maturity `T` is taken as
//! `σ1 + σ2·g(T)` with
//!
//! ```text
//! g(T) = (1 − e^{−λT})·√((1 − e^{−2λT}) / (2λ))
//! ```
//!
//! so each quote contributes a row `[1, g(T)]` to a linear system solved in
//! the least-squares sense.

use super::{check_maturities, VolatilityQuote};
use crate::hjm_model::{check_lambda, VolatilityParameters};
use hjm_core::{ensure, ensure_domain, errors::Result, Real, Time, Volatility};
use hjm_math::LinearLeastSquares;
use nalgebra::DMatrix;
use tracing::info;

/// Calibrated sigmas above `-NEGATIVE_SIGMA_TOLERANCE` are clamped to zero.
const NEGATIVE_SIGMA_TOLERANCE: Real = 1.0e-12;

fn loading(lambda: Real, t: Time) -> Real {
    let decay = -(-lambda * t).exp_m1();
    let spread = (-(-2.0 * lambda * t).exp_m1() / (2.0 * lambda)).sqrt();
    decay * spread
}

/// Model volatility `σ1 + σ2·g(T)` of a bond maturing at `t`.
pub fn model_volatility(params: &VolatilityParameters, t: Time) -> Volatility {
    params.sigma1() + params.sigma2() * loading(params.lambda(), t)
}

fn non_negative(name: &str, sigma: Real) -> Result<Real> {
    ensure_domain!(
        sigma >= -NEGATIVE_SIGMA_TOLERANCE,
        "calibrated {name} = {sigma} is negative; the quotes are inconsistent with the model"
    );
    Ok(sigma.max(0.0))
}

/// Fit `σ1` and `σ2` for a fixed `λ` to quoted volatilities.
///
/// With exactly two quotes the fit is exact.
///
/// # Errors
/// * `InvalidArgument` for fewer than two quotes, non-finite volatilities,
///   or maturities that are not positive and strictly increasing.
/// * `DomainError` for `λ ≈ 0` or a negative calibrated sigma.
/// * `SingularSystem` when the rows are (near) collinear.
pub fn calibrate_to_volatilities(
    quotes: &[VolatilityQuote],
    lambda: Real,
) -> Result<VolatilityParameters> {
    ensure!(
        quotes.len() >= 2,
        "at least two volatility quotes are required, got {}",
        quotes.len()
    );
    check_lambda(lambda)?;
    check_maturities(quotes.iter().map(|q| q.maturity))?;
    ensure!(
        quotes.iter().all(|q| q.volatility.is_finite()),
        "quoted volatilities must be finite"
    );

    let n = quotes.len();
    let design = DMatrix::from_fn(n, 2, |i, j| match j {
        0 => 1.0,
        _ => loading(lambda, quotes[i].maturity),
    });
    let targets: Vec<Real> = quotes.iter().map(|q| q.volatility).collect();
    let fit = LinearLeastSquares::from_design_matrix(&design, &targets)?;
    let coefficients = fit.coefficients();

    let sigma1 = non_negative("sigma1", coefficients[0])?;
    let sigma2 = non_negative("sigma2", coefficients[1])?;
    let params = VolatilityParameters::new(sigma1, sigma2, lambda)?;
    info!(
        sigma1,
        sigma2,
        lambda,
        quotes = n,
        rss = fit.residual_sum_of_squares(),
        "volatility surface fit complete"
    );
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hjm_core::Error;

    fn synthetic(sigma1: Real, sigma2: Real, lambda: Real, maturities: &[Time]) -> Vec<VolatilityQuote> {
        maturities
            .iter()
            .map(|&t| VolatilityQuote::new(t, sigma1 + sigma2 * loading(lambda, t)))
            .collect()
    }

    #[test]
    fn model_volatility_uses_the_loading() {
        let p = VolatilityParameters::new(0.01, 0.02, 0.8).unwrap();
        assert_abs_diff_eq!(model_volatility(&p, 2.0), 0.01 + 0.02 * loading(0.8, 2.0), epsilon = 1e-16);
        assert_eq!(model_volatility(&p, 0.0), 0.01);
    }

    #[test]
    fn recovers_synthetic_parameters() {
        let quotes = synthetic(0.01, 0.02, 0.8, &[0.5, 1.0, 2.0, 5.0, 10.0]);
        let p = calibrate_to_volatilities(&quotes, 0.8).unwrap();
        assert_abs_diff_eq!(p.sigma1(), 0.01, epsilon = 1e-10);
        assert_abs_diff_eq!(p.sigma2(), 0.02, epsilon = 1e-10);
        assert_eq!(p.lambda(), 0.8);
    }

    #[test]
    fn two_quotes_are_an_exact_solve() {
        let quotes = synthetic(0.015, 0.03, 1.5, &[1.0, 3.0]);
        let p = calibrate_to_volatilities(&quotes, 1.5).unwrap();
        assert_abs_diff_eq!(p.sigma1(), 0.015, epsilon = 1e-12);
        assert_abs_diff_eq!(p.sigma2(), 0.03, epsilon = 1e-12);
    }

    #[test]
    fn loading_limits() {
        assert_eq!(loading(0.8, 0.0), 0.0);
        // For large λT the loading tends to 1/√(2λ).
        assert_abs_diff_eq!(loading(2.0, 50.0), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn collinear_rows_are_singular() {
        // With λ = 50 both rows are [1, 0.1] to machine precision.
        let quotes = [VolatilityQuote::new(1.0, 0.01), VolatilityQuote::new(2.0, 0.012)];
        assert!(matches!(
            calibrate_to_volatilities(&quotes, 50.0),
            Err(Error::SingularSystem(_))
        ));
    }

    #[test]
    fn zero_lambda_is_a_domain_error() {
        let quotes = [VolatilityQuote::new(1.0, 0.01), VolatilityQuote::new(2.0, 0.012)];
        assert!(matches!(
            calibrate_to_volatilities(&quotes, 0.0),
            Err(Error::DomainError(_))
        ));
    }

    #[test]
    fn negative_fit_is_a_domain_error() {
        // Volatility falling with maturity forces σ2 < 0.
        let quotes = synthetic(0.05, -0.02, 0.8, &[0.5, 1.0, 2.0]);
        assert!(matches!(
            calibrate_to_volatilities(&quotes, 0.8),
            Err(Error::DomainError(_))
        ));
    }

    #[test]
    fn input_validation() {
        let one = [VolatilityQuote::new(1.0, 0.01)];
        assert!(matches!(
            calibrate_to_volatilities(&one, 0.5),
            Err(Error::InvalidArgument(_))
        ));
        let repeated = [VolatilityQuote::new(1.0, 0.01), VolatilityQuote::new(1.0, 0.01)];
        assert!(matches!(
            calibrate_to_volatilities(&repeated, 0.5),
            Err(Error::InvalidArgument(_))
        ));
        let negative = [VolatilityQuote::new(-1.0, 0.01), VolatilityQuote::new(1.0, 0.01)];
        assert!(matches!(
            calibrate_to_volatilities(&negative, 0.5),
            Err(Error::InvalidArgument(_))
        ));
    }
}
