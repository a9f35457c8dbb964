//! Standard normal distribution.

use hjm_core::Real;
use std::f64::consts::SQRT_2;

/// The standard normal cumulative distribution function Φ(x).
///
/// `Φ(x) = ½·(1 + erf(x/√2))`, with `erf` from statrs.
#[inline]
pub fn normal_cdf(x: Real) -> Real {
    0.5 * (1.0 + statrs::function::erf::erf(x / SQRT_2))
}
