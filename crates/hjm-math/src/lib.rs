//! # hjm-math
//!
//! Mathematical utilities: linear interpolation, composite trapezoid
//! quadrature, the normal CDF (via statrs), Gaussian elimination
//! and linear least squares (over nalgebra), and 1D root finding.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Probability distributions.
pub mod distributions;

/// Numerical integration.
pub mod integrals;

/// 1D interpolation schemes.
pub mod interpolations;

/// Gaussian elimination and ordinary least squares.
pub mod linear_least_squares;

/// 1D root-finding solvers.
pub mod solvers1d;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use distributions::normal_cdf;
pub use integrals::{trapezoid, Integrator, TrapezoidIntegral, DEFAULT_INTERVALS};
pub use interpolations::{Interpolation1D, LinearInterpolation};
pub use linear_least_squares::{gaussian_elimination, LinearLeastSquares};
pub use solvers1d::{brent, expand_bracket};
