//! Numerical integration.
//!
//! Provides the fixed-step composite trapezoidal rule used to integrate the
//! HJM variance function, both as a free function and behind the
//! [`Integrator`] trait so that pricing engines can be parameterised by
//! quadrature fidelity.

use hjm_core::{ensure, errors::Result, Real, Size};

/// Number of sub-intervals used when no fidelity is specified.
pub const DEFAULT_INTERVALS: Size = 1000;

/// A numerical integrator.
pub trait Integrator {
    /// Integrate `f` on `[a, b]`.
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real>;
}

/// Composite trapezoidal rule with `n` equal sub-intervals:
///
/// `h·[½f(a) + ½f(b) + Σ_{i=1}^{n-1} f(a + i·h)]`, `h = (b - a)/n`.
///
/// # Errors
/// `InvalidArgument` if `n == 0`, `a > b`, or either bound is not finite.
pub fn trapezoid<F>(f: F, a: Real, b: Real, n: Size) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    ensure!(n > 0, "trapezoid: number of intervals must be positive");
    ensure!(
        a.is_finite() && b.is_finite(),
        "trapezoid: bounds must be finite, got [{a}, {b}]"
    );
    ensure!(a <= b, "trapezoid: lower bound {a} exceeds upper bound {b}");
    if a == b {
        return Ok(0.0);
    }

    let h = (b - a) / n as Real;
    let mut sum = 0.5 * (f(a) + f(b));
    for i in 1..n {
        sum += f(a + i as Real * h);
    }
    Ok(sum * h)
}

// ── Trapezoid ─────────────────────────────────────────────────────────────────

/// Fixed-step composite trapezoidal integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrapezoidIntegral {
    intervals: Size,
}

impl TrapezoidIntegral {
    /// Create a trapezoidal integrator with the given number of sub-intervals.
    ///
    /// A zero count is accepted here and reported by [`Integrator::integrate`].
    pub fn new(intervals: Size) -> Self {
        Self { intervals }
    }

    /// Number of sub-intervals.
    pub fn intervals(&self) -> Size {
        self.intervals
    }
}

impl Default for TrapezoidIntegral {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVALS)
    }
}

impl Integrator for TrapezoidIntegral {
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real> {
        trapezoid(f, a, b, self.intervals)
    }
}
