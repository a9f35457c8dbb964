//! Two-factor Heath–Jarrow–Morton volatility model.
//!
//! The forward-rate volatility has a level component `σ1` and an
//! exponentially decaying component `σ2·e^{−λ(T−t)}`. For an option
//! expiring at `S` on a bond maturing at `T`, the instantaneous variance of
//! the log forward bond price at time `t ≤ S` is
//!
//! ```text
//! v1 = −σ1·(T − S)
//! v2 = −σ2·(e^{−λ(S−t)} − e^{−λ(T−t)}) / λ
//! v(t; S, T) = v1² + v2²
//! ```
//!
//! and its integral over `[0, S]` is the total variance entering the
//! bond-option formula.

use hjm_core::{ensure, ensure_domain, errors::Result, Real, Time, Volatility};
use hjm_math::Integrator;
use std::fmt;

/// Mean-reversion speeds with `|λ|` below this are treated as `λ = 0`.
pub const LAMBDA_EPSILON: Real = 1.0e-12;

/// Check that `lambda` is a usable mean-reversion speed.
///
/// # Errors
/// * `DomainError` if `|λ| < LAMBDA_EPSILON`, where the model divides by zero.
/// * `InvalidArgument` if `λ` is negative or not finite.
pub fn check_lambda(lambda: Real) -> Result<()> {
    ensure!(lambda.is_finite(), "lambda must be finite, got {lambda}");
    ensure_domain!(
        lambda.abs() >= LAMBDA_EPSILON,
        "lambda = {lambda} is too close to zero; the model is undefined at lambda = 0"
    );
    ensure!(lambda > 0.0, "lambda must be positive, got {lambda}");
    Ok(())
}

/// Volatility parameters `{σ1 ≥ 0, σ2 ≥ 0, λ > 0}` of the two-factor model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct VolatilityParameters {
    sigma1: Volatility,
    sigma2: Volatility,
    lambda: Real,
}

impl VolatilityParameters {
    /// Create a validated parameter set.
    ///
    /// # Errors
    /// `InvalidArgument` for negative or non-finite sigmas, plus the errors
    /// of [`check_lambda`].
    pub fn new(sigma1: Volatility, sigma2: Volatility, lambda: Real) -> Result<Self> {
        ensure!(
            sigma1.is_finite() && sigma1 >= 0.0,
            "sigma1 must be non-negative, got {sigma1}"
        );
        ensure!(
            sigma2.is_finite() && sigma2 >= 0.0,
            "sigma2 must be non-negative, got {sigma2}"
        );
        check_lambda(lambda)?;
        Ok(Self {
            sigma1,
            sigma2,
            lambda,
        })
    }

    /// Same `λ` with replaced volatilities.
    pub fn with_sigmas(&self, sigma1: Volatility, sigma2: Volatility) -> Result<Self> {
        Self::new(sigma1, sigma2, self.lambda)
    }

    /// Long-run (level) volatility.
    pub fn sigma1(&self) -> Volatility {
        self.sigma1
    }

    /// Amplitude of the mean-reverting volatility component.
    pub fn sigma2(&self) -> Volatility {
        self.sigma2
    }

    /// Mean-reversion speed.
    pub fn lambda(&self) -> Real {
        self.lambda
    }
}

/// Two-factor HJM model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HjmModel {
    params: VolatilityParameters,
}

impl HjmModel {
    /// Create a new model; see [`VolatilityParameters::new`] for the checks.
    pub fn new(sigma1: Volatility, sigma2: Volatility, lambda: Real) -> Result<Self> {
        Ok(Self::from_parameters(VolatilityParameters::new(
            sigma1, sigma2, lambda,
        )?))
    }

    /// Create a model from an already validated parameter set.
    pub fn from_parameters(params: VolatilityParameters) -> Self {
        Self { params }
    }

    /// Current parameters.
    pub fn parameters(&self) -> VolatilityParameters {
        self.params
    }

    /// Replace the parameters wholesale.
    pub fn set_parameters(&mut self, params: VolatilityParameters) {
        self.params = params;
    }

    /// Instantaneous variance `v1² + v2²` at time `t` for an option expiring
    /// at `s` on a bond maturing at `big_t`.
    pub fn variance_at(&self, t: Time, s: Time, big_t: Time) -> Real {
        let VolatilityParameters {
            sigma1,
            sigma2,
            lambda,
        } = self.params;
        let v1 = -sigma1 * (big_t - s);
        let v2 = -sigma2 * ((-lambda * (s - t)).exp() - (-lambda * (big_t - t)).exp()) / lambda;
        v1 * v1 + v2 * v2
    }

    /// Total variance `∫₀^S v(u; S, T) du` computed with `integrator`.
    ///
    /// # Errors
    /// `InvalidArgument` unless `0 ≤ s ≤ big_t`, plus integrator errors.
    pub fn total_variance<I: Integrator>(&self, s: Time, big_t: Time, integrator: &I) -> Result<Real> {
        ensure!(s >= 0.0, "option maturity must be non-negative, got {s}");
        ensure!(
            big_t >= s,
            "bond maturity {big_t} must not precede option maturity {s}"
        );
        integrator.integrate(|u| self.variance_at(u, s, big_t), 0.0, s)
    }

    /// Closed form of [`total_variance`](Self::total_variance):
    ///
    /// `σ1²(T−S)²S + σ2²·((1 − e^{−λ(T−S)})/λ)²·(1 − e^{−2λS})/(2λ)`
    pub fn integrated_variance(&self, s: Time, big_t: Time) -> Real {
        let VolatilityParameters {
            sigma1,
            sigma2,
            lambda,
        } = self.params;
        let tau = big_t - s;
        let level = sigma1 * sigma1 * tau * tau * s;
        let c = -(-lambda * tau).exp_m1() / lambda;
        let decay = sigma2 * sigma2 * c * c * -(-2.0 * lambda * s).exp_m1() / (2.0 * lambda);
        level + decay
    }
}

impl fmt::Display for HjmModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "HJM parameters:")?;
        writeln!(f, "  Sigma 1: {}", self.params.sigma1)?;
        writeln!(f, "  Sigma 2: {}", self.params.sigma2)?;
        write!(f, "  Lambda: {}", self.params.lambda)
    }
}
