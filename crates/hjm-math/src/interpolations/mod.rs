//! 1D interpolation trait and the linear scheme used by discount curves.

use hjm_core::{ensure, errors::Result, Real};

/// A 1D interpolation function `f: R → R` defined by a set of known points.
pub trait Interpolation1D: std::fmt::Debug + Send + Sync {
    /// Evaluate the interpolation at `x` without a range check.
    ///
    /// Points outside the domain are evaluated on the nearest end segment.
    fn operator(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Evaluate the interpolation at `x`, refusing to extrapolate.
    ///
    /// # Errors
    /// `InvalidArgument` if `x` lies outside `[x_min, x_max]` or is NaN.
    fn value(&self, x: Real) -> Result<Real> {
        ensure!(
            x >= self.x_min(),
            "{x} is less than the smallest node {}",
            self.x_min()
        );
        ensure!(
            x <= self.x_max(),
            "{x} is greater than the largest node {}",
            self.x_max()
        );
        ensure!(!x.is_nan(), "cannot interpolate at NaN");
        Ok(self.operator(x))
    }
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Linear interpolation.
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])`
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
}

impl LinearInterpolation {
    /// Construct a linear interpolation from strictly increasing `xs` and
    /// corresponding `ys`.
    ///
    /// # Errors
    /// `InvalidArgument` if the slices have different lengths, fewer than 2
    /// points, non-finite entries, or `xs` is not strictly increasing.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        ensure!(xs.len() >= 2, "need at least 2 points for interpolation");
        ensure!(
            xs.len() == ys.len(),
            "xs and ys must have the same length ({} vs {})",
            xs.len(),
            ys.len()
        );
        ensure!(
            xs.iter().chain(ys).all(|v| v.is_finite()),
            "interpolation nodes must be finite"
        );
        ensure!(
            xs.windows(2).all(|w| w[0] < w[1]),
            "xs must be strictly increasing"
        );
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// The interpolation nodes.
    pub fn xs(&self) -> &[Real] {
        &self.xs
    }

    /// The values at the nodes.
    pub fn ys(&self) -> &[Real] {
        &self.ys
    }

    /// Index `i` of the segment `[x[i], x[i+1]]` used for `x`.
    fn locate(&self, x: Real) -> usize {
        let n = self.xs.len();
        if x <= self.xs[0] {
            return 0;
        }
        if x >= self.xs[n - 1] {
            return n - 2;
        }
        // largest i with xs[i] <= x
        let mut lo = 0;
        let mut hi = n - 1;
        while hi - lo > 1 {
            let mid = (lo + hi) / 2;
            if self.xs[mid] <= x {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        lo
    }
}

impl Interpolation1D for LinearInterpolation {
    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    fn operator(&self, x: Real) -> Real {
        let i = self.locate(x);
        let slope = (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i]);
        self.ys[i] + slope * (x - self.xs[i])
    }
}
