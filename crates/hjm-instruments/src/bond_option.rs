//! European option on a zero-coupon bond.
//!
//! The option expires at `S` and is written on a zero-coupon bond maturing
//! at `T > S`. Times are in years from the valuation date.

use crate::instrument::{PricingEngine, PricingResults};
use crate::option_type::OptionType;
use hjm_core::{ensure, errors::Result, Real, Time};
use std::fmt;

/// A European call or put on a zero-coupon bond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroCouponBondOption {
    option_type: OptionType,
    strike: Real,
    option_maturity: Time,
    bond_maturity: Time,
}

impl ZeroCouponBondOption {
    /// Create a new bond option.
    ///
    /// # Errors
    /// `InvalidArgument` unless `strike > 0`, `option_maturity > 0` and
    /// `bond_maturity > option_maturity` (all finite).
    pub fn new(
        option_type: OptionType,
        strike: Real,
        option_maturity: Time,
        bond_maturity: Time,
    ) -> Result<Self> {
        ensure!(
            strike.is_finite() && strike > 0.0,
            "strike must be positive, got {strike}"
        );
        ensure!(
            option_maturity.is_finite() && option_maturity > 0.0,
            "option maturity must be positive, got {option_maturity}"
        );
        ensure!(
            bond_maturity.is_finite() && bond_maturity > option_maturity,
            "bond maturity {bond_maturity} must be after option maturity {option_maturity}"
        );
        Ok(Self {
            option_type,
            strike,
            option_maturity,
            bond_maturity,
        })
    }

    /// Convenience: a call when `is_call` is true, a put otherwise.
    pub fn european(
        strike: Real,
        option_maturity: Time,
        bond_maturity: Time,
        is_call: bool,
    ) -> Result<Self> {
        Self::new(
            OptionType::from_is_call(is_call),
            strike,
            option_maturity,
            bond_maturity,
        )
    }

    /// The strike price.
    pub fn strike(&self) -> Real {
        self.strike
    }

    /// The option type (call/put).
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Whether this is a call.
    pub fn is_call(&self) -> bool {
        self.option_type == OptionType::Call
    }

    /// Option expiry `S`.
    pub fn option_maturity(&self) -> Time {
        self.option_maturity
    }

    /// Maturity `T` of the underlying bond.
    pub fn bond_maturity(&self) -> Time {
        self.bond_maturity
    }

    /// The same contract with the opposite option type.
    pub fn flipped(&self) -> Self {
        Self {
            option_type: self.option_type.opposite(),
            ..*self
        }
    }

    /// Price this option using the given engine.
    pub fn price(&self, engine: &dyn PricingEngine<ZeroCouponBondOption>) -> Result<PricingResults> {
        engine.calculate(self)
    }
}

impl fmt::Display for ZeroCouponBondOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Option on zero-coupon bond:")?;
        writeln!(f, "  Strike: {}", self.strike())?;
        writeln!(f, "  Option maturity: {}", self.option_maturity)?;
        writeln!(f, "  Bond maturity: {}", self.bond_maturity)?;
        write!(f, "  Type: {}", self.option_type())
    }
}
