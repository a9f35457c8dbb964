//! Analytic engine for European options on zero-coupon bonds under the
//! two-factor HJM model.
//!
//! With `Σ = ∫₀^S v(u; S, T) du` the total variance of the forward bond
//! price, the option is valued in closed form:
//!
//! $$C = P(T)\,N(d_1) - K\,P(S)\,N(d_2)$$
//! $$P = K\,P(S)\,N(-d_2) - P(T)\,N(-d_1)$$
//!
//! where $d_{1,2} = \frac{\ln(P(T)/(K P(S))) \pm \Sigma/2}{\sqrt{\Sigma}}$.

use hjm_core::{ensure_domain, errors::Result, DiscountFactor, Price, Real};
use hjm_instruments::{OptionType, PricingEngine, PricingResults, ZeroCouponBondOption};
use hjm_math::{normal_cdf, Integrator, TrapezoidIntegral};
use hjm_models::HjmModel;
use hjm_termstructures::YieldTermStructure;
use tracing::trace;

use std::sync::Arc;

/// Inputs and outputs of a single closed-form valuation.
#[derive(Debug, Clone, Copy)]
struct Valuation {
    npv: Price,
    total_variance: Real,
    d1: Real,
    d2: Real,
    discount_option: DiscountFactor,
    discount_bond: DiscountFactor,
}

fn value<I: Integrator>(
    curve: &dyn YieldTermStructure,
    model: &HjmModel,
    option: &ZeroCouponBondOption,
    integrator: &I,
) -> Result<Valuation> {
    let s = option.option_maturity();
    let big_t = option.bond_maturity();
    let strike = option.strike();

    let discount_option = curve.discount(s)?;
    let discount_bond = curve.discount(big_t)?;
    let total_variance = model.total_variance(s, big_t, integrator)?;
    ensure_domain!(
        total_variance.is_finite() && total_variance > 0.0,
        "total variance must be positive, got {total_variance}"
    );

    let std_dev = total_variance.sqrt();
    let moneyness = (discount_bond / (discount_option * strike)).ln();
    let d1 = (moneyness + 0.5 * total_variance) / std_dev;
    let d2 = (moneyness - 0.5 * total_variance) / std_dev;

    let npv = match option.option_type() {
        OptionType::Call => {
            discount_bond * normal_cdf(d1) - strike * discount_option * normal_cdf(d2)
        }
        OptionType::Put => {
            strike * discount_option * (1.0 - normal_cdf(d2))
                - discount_bond * (1.0 - normal_cdf(d1))
        }
    };
    trace!(total_variance, d1, d2, npv, "HJM bond option valuation");

    Ok(Valuation {
        npv,
        total_variance,
        d1,
        d2,
        discount_option,
        discount_bond,
    })
}

/// Price a bond option with the default trapezoid rule (1000 intervals).
///
/// # Errors
/// * `InvalidArgument` if either maturity lies outside the curve.
/// * `DomainError` if the total variance is not positive.
pub fn bond_option_price(
    curve: &dyn YieldTermStructure,
    model: &HjmModel,
    option: &ZeroCouponBondOption,
) -> Result<Price> {
    value(curve, model, option, &TrapezoidIntegral::default()).map(|v| v.npv)
}

/// Analytic pricing engine for [`ZeroCouponBondOption`].
#[derive(Debug, Clone)]
pub struct AnalyticHjmBondOptionEngine {
    curve: Arc<dyn YieldTermStructure>,
    model: Arc<HjmModel>,
    integrator: TrapezoidIntegral,
}

impl AnalyticHjmBondOptionEngine {
    /// Create an engine integrating with the default trapezoid rule.
    pub fn new(curve: Arc<dyn YieldTermStructure>, model: Arc<HjmModel>) -> Self {
        Self::with_integrator(curve, model, TrapezoidIntegral::default())
    }

    /// Create an engine with a specific quadrature.
    pub fn with_integrator(
        curve: Arc<dyn YieldTermStructure>,
        model: Arc<HjmModel>,
        integrator: TrapezoidIntegral,
    ) -> Self {
        Self {
            curve,
            model,
            integrator,
        }
    }

    /// The discount curve.
    pub fn curve(&self) -> &Arc<dyn YieldTermStructure> {
        &self.curve
    }

    /// The volatility model.
    pub fn model(&self) -> &Arc<HjmModel> {
        &self.model
    }
}

impl PricingEngine<ZeroCouponBondOption> for AnalyticHjmBondOptionEngine {
    fn calculate(&self, args: &ZeroCouponBondOption) -> Result<PricingResults> {
        let v = value(self.curve.as_ref(), &self.model, args, &self.integrator)?;
        Ok(PricingResults::from_npv(v.npv)
            .with_result("total_variance", v.total_variance)
            .with_result("d1", v.d1)
            .with_result("d2", v.d2)
            .with_result("discount_option_maturity", v.discount_option)
            .with_result("discount_bond_maturity", v.discount_bond))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use hjm_core::Error;
    use hjm_termstructures::DiscountCurve;

    fn reference_curve() -> DiscountCurve {
        DiscountCurve::new(
            &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
            &[1.0, 0.97, 0.94, 0.91, 0.9, 0.88],
        )
        .unwrap()
    }

    fn reference_model() -> HjmModel {
        HjmModel::new(0.3, 0.2, 2.0).unwrap()
    }

    #[test]
    fn reference_call_price() {
        let option = ZeroCouponBondOption::european(0.5, 1.5, 4.5, true).unwrap();
        let price = bond_option_price(&reference_curve(), &reference_model(), &option).unwrap();
        assert_abs_diff_eq!(price, 0.531_181_105_848_502_2, epsilon = 1e-10);
    }

    #[test]
    fn reference_put_price() {
        let option = ZeroCouponBondOption::european(0.5, 1.5, 4.5, false).unwrap();
        let price = bond_option_price(&reference_curve(), &reference_model(), &option).unwrap();
        assert_abs_diff_eq!(price, 0.118_681_105_848_502_21, epsilon = 1e-10);
    }

    #[test]
    fn put_call_parity() {
        let curve = reference_curve();
        let model = HjmModel::new(0.01, 0.015, 0.7).unwrap();
        for &(strike, s, t) in &[(0.9, 1.0, 3.0), (0.95, 0.5, 5.0), (1.0, 2.0, 2.5)] {
            let call = ZeroCouponBondOption::european(strike, s, t, true).unwrap();
            let c = bond_option_price(&curve, &model, &call).unwrap();
            let p = bond_option_price(&curve, &model, &call.flipped()).unwrap();
            let forward = curve.at(t).unwrap() - strike * curve.at(s).unwrap();
            assert_abs_diff_eq!(c - p, forward, epsilon = 1e-12);
        }
    }

    #[test]
    fn engine_reports_additional_results() {
        let engine = AnalyticHjmBondOptionEngine::new(
            Arc::new(reference_curve()),
            Arc::new(reference_model()),
        );
        let option = ZeroCouponBondOption::european(0.5, 1.5, 4.5, true).unwrap();
        let results = option.price(&engine).unwrap();
        assert_abs_diff_eq!(results.npv, 0.531_181_105_848_502_2, epsilon = 1e-10);
        assert_abs_diff_eq!(results.result("discount_option_maturity").unwrap(), 0.955, epsilon = 1e-15);
        assert_abs_diff_eq!(results.result("discount_bond_maturity").unwrap(), 0.89, epsilon = 1e-15);
        let variance = results.result("total_variance").unwrap();
        assert_relative_eq!(
            variance,
            reference_model().integrated_variance(1.5, 4.5),
            max_relative = 1e-7
        );
        let d1 = results.result("d1").unwrap();
        let d2 = results.result("d2").unwrap();
        assert_abs_diff_eq!(d1 - d2, variance.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn quadrature_fidelity_is_configurable() {
        let coarse = AnalyticHjmBondOptionEngine::with_integrator(
            Arc::new(reference_curve()),
            Arc::new(reference_model()),
            TrapezoidIntegral::new(10),
        );
        let option = ZeroCouponBondOption::european(0.5, 1.5, 4.5, true).unwrap();
        let price = coarse.calculate(&option).unwrap().npv;
        assert_abs_diff_eq!(price, 0.531_181_105_848_502_2, epsilon = 1e-3);
        assert!((price - 0.531_181_105_848_502_2).abs() > 1e-10);
    }

    #[test]
    fn fast_mean_reversion_prices() {
        let engine = AnalyticHjmBondOptionEngine::new(
            Arc::new(reference_curve()),
            Arc::new(HjmModel::new(0.3, 0.2, 500.0).unwrap()),
        );
        let option = ZeroCouponBondOption::european(0.5, 1.5, 4.5, true).unwrap();
        let results = engine.calculate(&option).unwrap();
        assert!(results.npv.is_finite() && results.npv > 0.0);
        // Only the level factor survives: Σ ≈ σ1²(T − S)²S.
        assert_abs_diff_eq!(results.result("total_variance").unwrap(), 1.215, epsilon = 1e-8);
    }

    #[test]
    fn maturities_beyond_curve_fail() {
        let option = ZeroCouponBondOption::european(0.5, 1.5, 6.0, true).unwrap();
        assert!(matches!(
            bond_option_price(&reference_curve(), &reference_model(), &option),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn zero_variance_is_a_domain_error() {
        let model = HjmModel::new(0.0, 0.0, 1.0).unwrap();
        let option = ZeroCouponBondOption::european(0.5, 1.5, 4.5, true).unwrap();
        assert!(matches!(
            bond_option_price(&reference_curve(), &model, &option),
            Err(Error::DomainError(_))
        ));
    }
}
