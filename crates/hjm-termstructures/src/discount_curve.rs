//! `DiscountCurve`: a yield term structure defined by discount factors at
//! known tenors.
//!
//! The curve stores (tenor, discount-factor) knots and interpolates the
//! discount factors linearly in time between the two bracketing knots.
//! There is no extrapolation: asking for a time before the first tenor or
//! after the last one is an error.

use crate::yield_term_structure::YieldTermStructure;
use hjm_core::{errors::Result, DiscountFactor, Real, Time};
use hjm_math::{Interpolation1D, LinearInterpolation};
use std::fmt;

/// A yield curve defined by discount factors at strictly increasing tenors.
#[derive(Debug, Clone)]
pub struct DiscountCurve {
    interp: LinearInterpolation,
}

impl DiscountCurve {
    /// Build a discount curve from tenors (in years) and discount factors.
    ///
    /// Discount factors are conventionally in (0, 1] but this is not
    /// enforced.
    ///
    /// # Errors
    /// `InvalidArgument` if there are fewer than 2 knots, the lengths differ,
    /// an entry is not finite, or the tenors are not strictly increasing.
    pub fn new(tenors: &[Time], discounts: &[DiscountFactor]) -> Result<Self> {
        Ok(Self {
            interp: LinearInterpolation::new(tenors, discounts)?,
        })
    }

    /// Discount factor at maturity `t`, linearly interpolated.
    ///
    /// # Errors
    /// `InvalidArgument` if `t` is before the first tenor, after the last
    /// tenor, or NaN.
    pub fn at(&self, t: Time) -> Result<DiscountFactor> {
        self.interp.value(t)
    }

    /// Return the knot tenors.
    pub fn tenors(&self) -> &[Time] {
        self.interp.xs()
    }

    /// Return the knot discount factors.
    pub fn discounts(&self) -> &[DiscountFactor] {
        self.interp.ys()
    }
}

impl YieldTermStructure for DiscountCurve {
    fn discount(&self, t: Time) -> Result<DiscountFactor> {
        self.at(t)
    }

    fn min_time(&self) -> Time {
        self.interp.x_min()
    }

    fn max_time(&self) -> Time {
        self.interp.x_max()
    }
}

impl fmt::Display for DiscountCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Discount curve:")?;
        let knots: Vec<String> = self
            .tenors()
            .iter()
            .zip(self.discounts())
            .map(|(t, p): (&Real, &Real)| format!("{t}: {p}"))
            .collect();
        write!(f, "{}", knots.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use hjm_core::Error;
    use proptest::prelude::*;

    fn market_curve() -> DiscountCurve {
        DiscountCurve::new(
            &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            &[1.0, 0.97, 0.94, 0.91, 0.9, 0.88],
        )
        .unwrap()
    }

    #[test]
    fn discount_curve_at_pillars() {
        let curve = market_curve();
        for (&t, &p) in curve.tenors().iter().zip(curve.discounts()) {
            assert_abs_diff_eq!(curve.at(t).unwrap(), p, epsilon = 1e-15);
        }
    }

    #[test]
    fn discount_curve_between_pillars() {
        let curve = market_curve();
        assert_abs_diff_eq!(curve.at(1.5).unwrap(), 0.955, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.at(4.5).unwrap(), 0.89, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.at(3.1).unwrap(), 0.909, epsilon = 1e-15);
    }

    #[test]
    fn discount_curve_refuses_to_extrapolate() {
        let curve = DiscountCurve::new(&[1.0, 2.0, 3.0], &[0.97, 0.95, 0.91]).unwrap();
        assert!(matches!(curve.at(0.5), Err(Error::InvalidArgument(_))));
        assert!(matches!(curve.at(3.0001), Err(Error::InvalidArgument(_))));
        assert_abs_diff_eq!(curve.at(3.0).unwrap(), 0.91, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.at(1.0).unwrap(), 0.97, epsilon = 1e-15);
    }

    #[test]
    fn construction_errors() {
        assert!(matches!(
            DiscountCurve::new(&[1.0], &[0.97]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            DiscountCurve::new(&[1.0, 2.0, 3.0], &[0.97, 0.95]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            DiscountCurve::new(&[1.0, 3.0, 2.0], &[0.97, 0.95, 0.91]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn trait_view_matches_curve() {
        let curve = market_curve();
        let ts: &dyn YieldTermStructure = &curve;
        assert_eq!(ts.min_time(), 0.0);
        assert_eq!(ts.max_time(), 5.0);
        assert_eq!(ts.discount(2.5).unwrap(), curve.at(2.5).unwrap());
        assert!(matches!(ts.discount(5.5), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn display_lists_knots() {
        let curve = DiscountCurve::new(&[0.0, 1.0], &[1.0, 0.97]).unwrap();
        assert_eq!(curve.to_string(), "Discount curve:\n0: 1, 1: 0.97");
    }

    fn knots() -> impl Strategy<Value = (Vec<Real>, Vec<Real>)> {
        prop::collection::vec((0.01f64..2.0, 0.5f64..1.0), 2..12).prop_map(|steps| {
            let mut t = 0.0;
            steps
                .into_iter()
                .map(|(dt, p)| {
                    t += dt;
                    (t, p)
                })
                .unzip()
        })
    }

    proptest! {
        #[test]
        fn knots_are_reproduced((tenors, values) in knots()) {
            let curve = DiscountCurve::new(&tenors, &values).unwrap();
            for (t, p) in tenors.iter().zip(&values) {
                prop_assert!((curve.at(*t).unwrap() - p).abs() < 1e-12);
            }
        }

        #[test]
        fn interior_points_are_convex_combinations(
            (tenors, values) in knots(),
            seg in 0usize..11,
            w in 0.0f64..1.0,
        ) {
            let i = seg % (tenors.len() - 1);
            let t = tenors[i] + w * (tenors[i + 1] - tenors[i]);
            prop_assume!(t < tenors[i + 1]);
            let curve = DiscountCurve::new(&tenors, &values).unwrap();
            let expected = values[i] + (t - tenors[i]) / (tenors[i + 1] - tenors[i])
                * (values[i + 1] - values[i]);
            let p = curve.at(t).unwrap();
            prop_assert!((p - expected).abs() < 1e-12);
            prop_assert!(p >= values[i].min(values[i + 1]) - 1e-12);
            prop_assert!(p <= values[i].max(values[i + 1]) + 1e-12);
        }
    }
}
