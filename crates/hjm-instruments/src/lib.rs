//! # hjm-instruments
//!
//! Instrument definitions: European options on zero-coupon bonds and the
//! pricing-engine interface.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bond_option;
pub mod instrument;
pub mod option_type;

pub use bond_option::ZeroCouponBondOption;
pub use instrument::{PricingEngine, PricingResults};
pub use option_type::OptionType;
