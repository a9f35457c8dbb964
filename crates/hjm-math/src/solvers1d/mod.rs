//! 1D root-finding solvers.

use hjm_core::{
    errors::{Error, Result},
    Real,
};

const MAX_ITERATIONS: u32 = 100;
const DEFAULT_ACCURACY: Real = 1.0e-11;

// ── Bracketing ────────────────────────────────────────────────────────────────

/// Grow the upper end of `[x_min, x_max]` until `f` changes sign over it.
///
/// The interval width is doubled at most `max_expansions` times. Returns the
/// first upper bound `x` with `f(x_min)·f(x) ≤ 0`.
///
/// # Errors
/// `ConvergenceFailure` if no sign change is found.
pub fn expand_bracket<F>(f: F, x_min: Real, x_max: Real, max_expansions: u32) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let f_lo = f(x_min);
    let mut hi = x_max;
    let mut width = x_max - x_min;
    for _ in 0..=max_expansions {
        if f_lo * f(hi) <= 0.0 {
            return Ok(hi);
        }
        width *= 2.0;
        hi = x_min + width;
    }
    Err(Error::ConvergenceFailure(format!(
        "no sign change found on [{x_min}, {hi}] after {max_expansions} expansions"
    )))
}

// ── Brent ─────────────────────────────────────────────────────────────────────

/// Brent's method for finding a root of `f(x)` in `[x_min, x_max]`.
///
/// Combines bisection, secant, and inverse quadratic interpolation.
///
/// # Errors
/// * `InvalidArgument` if `f(x_min)` and `f(x_max)` have the same sign.
/// * `ConvergenceFailure` if the iteration cap is reached.
pub fn brent<F>(f: F, x_min: Real, x_max: Real, accuracy: Real) -> Result<Real>
where
    F: Fn(Real) -> Real,
{
    let acc = if accuracy > 0.0 {
        accuracy
    } else {
        DEFAULT_ACCURACY
    };
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa * fb > 0.0 {
        return Err(Error::InvalidArgument(format!(
            "Brent: f({a}) and f({b}) must have opposite signs"
        )));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..MAX_ITERATIONS {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * acc;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                let p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                let q = (q - 1.0) * (r - 1.0) * (s - 1.0);
                (p, q)
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = f(b);
    }
    Err(Error::ConvergenceFailure(
        "Brent solver: maximum iterations reached".into(),
    ))
}
