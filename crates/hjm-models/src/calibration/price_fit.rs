//! Fit of `σ1`, `σ2` to observed zero-coupon bond prices.
//!
//! The model price of a bond maturing at `T` is
//!
//! ```text
//! P̂(T) = spot · exp(−r·T + ½·V(T))
//! V(T) = σ1²·a(T) + σ2²·b(T)
//! a(T) = T³/3
//! b(T) = (T − 2(1 − e^{−λT})/λ + (1 − e^{−2λT})/(2λ)) / λ²
//! ```
//!
//! which is the convexity of `E[exp(−∫r)]` for a short rate driven by a
//! Brownian level factor and an independent Ornstein–Uhlenbeck factor with
//! speed `λ`.
//!
//! The objective `E = Σ (P̂(Tᵢ) − Mᵢ)²` is minimised in two stages:
//!
//! 1. `σ1` by Brent's method on the gradient of the profiled objective
//!    `E(σ1, σ2(σ1))`, where `σ2(σ1)` is the stage-2 solve;
//! 2. `σ2` with `σ1` fixed, by linear least squares on the log prices.
//!
//! Each sweep repeats both stages; the fit stops when `σ1` settles between
//! sweeps or the objective rises, and fails once the sweep cap or
//! deadline is reached. This is a local search: the profiled gradient may
//! have several roots and Brent returns the one it brackets first.

use super::{check_maturities, BondPriceQuote, CalibrationSettings};
use crate::hjm_model::{check_lambda, VolatilityParameters};
use hjm_core::{
    ensure,
    errors::{Error, Result},
    Price, Rate, Real, Size, Time,
};
use hjm_math::{brent, expand_bracket, LinearLeastSquares};
use nalgebra::DMatrix;
use std::time::Instant;
use tracing::{debug, info, warn};

// ── Model prices ─────────────────────────────────────────────────────────────

fn level_loading(t: Time) -> Real {
    t * t * t / 3.0
}

fn decay_loading(lambda: Real, t: Time) -> Real {
    let one = -(-lambda * t).exp_m1() / lambda;
    let two = -(-2.0 * lambda * t).exp_m1() / (2.0 * lambda);
    (t - 2.0 * one + two) / (lambda * lambda)
}

/// Model price of a zero-coupon bond maturing at `t`.
pub fn model_bond_price(params: &VolatilityParameters, spot: Price, short_rate: Rate, t: Time) -> Price {
    let variance = params.sigma1().powi(2) * level_loading(t)
        + params.sigma2().powi(2) * decay_loading(params.lambda(), t);
    spot * (-short_rate * t + 0.5 * variance).exp()
}

// ── Report ───────────────────────────────────────────────────────────────────

/// Outcome of a successful price fit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PriceFitReport {
    /// Calibrated parameters.
    pub parameters: VolatilityParameters,
    /// Number of sweeps performed.
    pub iterations: Size,
    /// Objective `Σ (P̂ − M)²` at `parameters`.
    pub sum_squared_error: Real,
}

// ── Calibrator ───────────────────────────────────────────────────────────────

/// Price-fit calibrator for a fixed `λ`.
#[derive(Debug, Clone)]
pub struct PriceCalibrator {
    spot: Price,
    short_rate: Rate,
    lambda: Real,
    maturities: Vec<Time>,
    prices: Vec<Price>,
    level: Vec<Real>,
    decay: Vec<Real>,
    market_variance: Vec<Real>,
    settings: CalibrationSettings,
}

impl PriceCalibrator {
    /// Validate the inputs and precompute the variance loadings.
    ///
    /// # Errors
    /// * `InvalidArgument` for empty quotes, non-positive prices or spot, a
    ///   non-finite short rate, maturities that are not positive and
    ///   strictly increasing, or unusable settings.
    /// * `DomainError` for `λ ≈ 0`.
    pub fn new(
        spot: Price,
        quotes: &[BondPriceQuote],
        short_rate: Rate,
        lambda: Real,
        settings: CalibrationSettings,
    ) -> Result<Self> {
        ensure!(!quotes.is_empty(), "at least one bond price quote is required");
        ensure!(
            spot.is_finite() && spot > 0.0,
            "spot must be positive, got {spot}"
        );
        ensure!(short_rate.is_finite(), "short rate must be finite");
        check_lambda(lambda)?;
        check_maturities(quotes.iter().map(|q| q.maturity))?;
        for q in quotes {
            ensure!(
                q.price.is_finite() && q.price > 0.0,
                "bond prices must be positive, got {} at maturity {}",
                q.price,
                q.maturity
            );
        }

        check_settings(&settings)?;

        let maturities: Vec<Time> = quotes.iter().map(|q| q.maturity).collect();
        let market_variance = quotes
            .iter()
            .map(|q| 2.0 * ((q.price / spot).ln() + short_rate * q.maturity))
            .collect();
        Ok(Self {
            spot,
            short_rate,
            lambda,
            prices: quotes.iter().map(|q| q.price).collect(),
            level: maturities.iter().map(|&t| level_loading(t)).collect(),
            decay: maturities.iter().map(|&t| decay_loading(lambda, t)).collect(),
            market_variance,
            maturities,
            settings,
        })
    }

    /// The settings in use.
    pub fn settings(&self) -> &CalibrationSettings {
        &self.settings
    }

    fn model_price(&self, i: usize, sigma1: Real, sigma2: Real) -> Price {
        let variance = sigma1 * sigma1 * self.level[i] + sigma2 * sigma2 * self.decay[i];
        self.spot * (-self.short_rate * self.maturities[i] + 0.5 * variance).exp()
    }

    /// Objective `Σ (P̂ − M)²`.
    fn objective(&self, sigma1: Real, sigma2: Real) -> Real {
        self.prices
            .iter()
            .enumerate()
            .map(|(i, m)| (self.model_price(i, sigma1, sigma2) - m).powi(2))
            .sum()
    }

    /// Unclamped stage-2 estimate of `σ2²` for a given `σ1`, and its
    /// derivative with respect to `σ1²`.
    fn profiled_decay(&self, sigma1: Real) -> (Real, Real) {
        let (mut bv, mut ab, mut bb) = (0.0, 0.0, 0.0);
        for ((v, a), b) in self.market_variance.iter().zip(&self.level).zip(&self.decay) {
            bv += b * v;
            ab += a * b;
            bb += b * b;
        }
        ((bv - sigma1 * sigma1 * ab) / bb, -ab / bb)
    }

    /// `dE(σ1, σ2(σ1))/dσ1` divided by `2σ1`.
    fn reduced_gradient(&self, sigma1: Real) -> Real {
        let (decay_variance, slope) = self.profiled_decay(sigma1);
        let (q, dq) = if decay_variance > 0.0 {
            (decay_variance, slope)
        } else {
            (0.0, 0.0)
        };
        let sigma2 = q.sqrt();
        self.prices
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let p = self.model_price(i, sigma1, sigma2);
                (p - m) * p * (self.level[i] + dq * self.decay[i])
            })
            .sum()
    }

    fn search_sigma1(&self) -> Result<Real> {
        let h = |s: Real| self.reduced_gradient(s);
        if h(0.0) >= 0.0 {
            return Ok(0.0);
        }
        let hi = expand_bracket(
            h,
            0.0,
            self.settings.sigma_upper_bound,
            self.settings.max_bracket_expansions,
        )?;
        brent(h, 0.0, hi, self.settings.solver_accuracy)
    }

    fn solve_sigma2(&self, sigma1: Real) -> Result<Real> {
        let targets: Vec<Real> = self
            .market_variance
            .iter()
            .zip(&self.level)
            .map(|(v, a)| v - sigma1 * sigma1 * a)
            .collect();
        let design = DMatrix::from_column_slice(self.decay.len(), 1, &self.decay);
        let fit = LinearLeastSquares::from_design_matrix(&design, &targets)?;
        Ok(fit.coefficients()[0].max(0.0).sqrt())
    }

    /// Run the two-stage sweeps.
    ///
    /// # Errors
    /// `ConvergenceFailure` when `max_iterations` sweeps pass without
    /// settling or the deadline elapses; solver errors are propagated.
    pub fn run(&self) -> Result<PriceFitReport> {
        let start = Instant::now();
        let mut previous_sigma1: Option<Real> = None;
        let mut best: Option<PriceFitReport> = None;

        for iteration in 1..=self.settings.max_iterations {
            if let Some(deadline) = self.settings.deadline {
                if start.elapsed() >= deadline {
                    warn!(iteration, ?deadline, "price fit deadline reached");
                    return Err(Error::ConvergenceFailure(format!(
                        "price fit did not converge within {deadline:?}"
                    )));
                }
            }

            let sigma1 = self.search_sigma1()?;
            let sigma2 = self.solve_sigma2(sigma1)?;
            let error = self.objective(sigma1, sigma2);
            debug!(iteration, sigma1, sigma2, error, "price fit sweep");

            if let Some(report) = best {
                if error > report.sum_squared_error {
                    info!(
                        iterations = iteration,
                        sigma1 = report.parameters.sigma1(),
                        sigma2 = report.parameters.sigma2(),
                        error = report.sum_squared_error,
                        "price fit stopped improving"
                    );
                    return Ok(PriceFitReport {
                        iterations: iteration,
                        ..report
                    });
                }
            }

            let report = PriceFitReport {
                parameters: VolatilityParameters::new(sigma1, sigma2, self.lambda)?,
                iterations: iteration,
                sum_squared_error: error,
            };
            if previous_sigma1.is_some_and(|p| (sigma1 - p).abs() < self.settings.tolerance) {
                info!(iterations = iteration, sigma1, sigma2, error, "price fit converged");
                return Ok(report);
            }
            best = Some(report);
            previous_sigma1 = Some(sigma1);
        }

        warn!(
            max_iterations = self.settings.max_iterations,
            "price fit reached the iteration cap"
        );
        Err(Error::ConvergenceFailure(format!(
            "price fit did not converge in {} sweeps",
            self.settings.max_iterations
        )))
    }
}

fn check_settings(settings: &CalibrationSettings) -> Result<()> {
    ensure!(
        settings.tolerance.is_finite() && settings.tolerance > 0.0,
        "tolerance must be positive, got {}",
        settings.tolerance
    );
    ensure!(settings.max_iterations > 0, "max_iterations must be at least 1");
    ensure!(
        settings.sigma_upper_bound.is_finite() && settings.sigma_upper_bound > 0.0,
        "sigma_upper_bound must be positive, got {}",
        settings.sigma_upper_bound
    );
    ensure!(
        settings.solver_accuracy.is_finite() && settings.solver_accuracy > 0.0,
        "solver_accuracy must be positive, got {}",
        settings.solver_accuracy
    );
    Ok(())
}

/// Fit `σ1`, `σ2` for a fixed `λ` to observed bond prices.
///
/// See [`PriceCalibrator::run`] for the iteration count and final error.
pub fn calibrate_to_prices(
    spot: Price,
    quotes: &[BondPriceQuote],
    short_rate: Rate,
    lambda: Real,
    settings: &CalibrationSettings,
) -> Result<VolatilityParameters> {
    PriceCalibrator::new(spot, quotes, short_rate, lambda, *settings)?
        .run()
        .map(|report| report.parameters)
}
