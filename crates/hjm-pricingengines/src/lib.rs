//! # hjm-pricingengines
//!
//! Pricing engines for options on zero-coupon bonds.
//!
//! ## Engines
//!
//! - [`AnalyticHjmBondOptionEngine`]: closed form over the quadrature of
//!   the two-factor HJM variance
//! - [`bond_option_price`]: the same valuation as a free function

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analytic_hjm_bond_option_engine;

pub use analytic_hjm_bond_option_engine::{bond_option_price, AnalyticHjmBondOptionEngine};
