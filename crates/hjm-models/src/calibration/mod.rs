//! Calibration of `σ1` and `σ2` for a fixed mean-reversion speed `λ`.
//!
//! Two procedures are provided:
//!
//! * [`calibrate_to_volatilities`]: a linear least-squares fit of the
//!   model's volatility term structure to quoted bond volatilities.
//! * [`calibrate_to_prices`]: a two-stage search matching
//!   model zero-coupon bond prices to observed prices.

mod price_fit;
mod settings;
mod surface_fit;

pub use price_fit::{calibrate_to_prices, model_bond_price, PriceCalibrator, PriceFitReport};
pub use settings::CalibrationSettings;
pub use surface_fit::{calibrate_to_volatilities, model_volatility};

use hjm_core::{ensure, errors::Result, Price, Time, Volatility};

/// A quoted volatility for bonds of a given maturity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolatilityQuote {
    /// Bond maturity in years.
    pub maturity: Time,
    /// Quoted volatility.
    pub volatility: Volatility,
}

impl VolatilityQuote {
    /// Create a new quote.
    pub fn new(maturity: Time, volatility: Volatility) -> Self {
        Self {
            maturity,
            volatility,
        }
    }
}

/// An observed zero-coupon bond price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondPriceQuote {
    /// Bond maturity in years.
    pub maturity: Time,
    /// Observed price.
    pub price: Price,
}

impl BondPriceQuote {
    /// Create a new quote.
    pub fn new(maturity: Time, price: Price) -> Self {
        Self { maturity, price }
    }
}

/// Maturities must be finite, positive and strictly increasing.
pub(crate) fn check_maturities(maturities: impl IntoIterator<Item = Time>) -> Result<()> {
    let mut previous: Option<Time> = None;
    for t in maturities {
        ensure!(
            t.is_finite() && t > 0.0,
            "maturities must be positive, got {t}"
        );
        if let Some(p) = previous {
            ensure!(
                t > p,
                "maturities must be strictly increasing, got {p} then {t}"
            );
        }
        previous = Some(t);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maturity_checks() {
        assert!(check_maturities([0.5, 1.0, 2.0]).is_ok());
        assert!(check_maturities([1.0, 1.0]).is_err());
        assert!(check_maturities([2.0, 1.0]).is_err());
        assert!(check_maturities([0.0, 1.0]).is_err());
        assert!(check_maturities([1.0, f64::NAN]).is_err());
    }
}
