//! # hjm
//!
//! Pricing and calibration of European options on zero-coupon bonds under a
//! two-factor Heath–Jarrow–Morton model.
//!
//! This crate is a **façade** that re-exports the workspace crates.
//! Application code should depend on this crate rather than the individual
//! `hjm-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use hjm::instruments::ZeroCouponBondOption;
//! use hjm::models::HjmModel;
//! use hjm::pricingengines::bond_option_price;
//! use hjm::termstructures::DiscountCurve;
//!
//! let curve = DiscountCurve::new(
//!     &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0],
//!     &[1.0, 0.97, 0.94, 0.91, 0.9, 0.88],
//! )?;
//! let model = HjmModel::new(0.3, 0.2, 2.0)?;
//! let option = ZeroCouponBondOption::european(0.5, 1.5, 4.5, true)?;
//! let price = bond_option_price(&curve, &model, &option)?;
//! assert!((price - 0.5311811058485022).abs() < 1e-10);
//! # Ok::<(), hjm::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use hjm_core as core;

/// Interpolation, quadrature, least squares, and root finding.
pub use hjm_math as math;

/// Discount curves.
pub use hjm_termstructures as termstructures;

/// Bond options and the pricing-engine interface.
pub use hjm_instruments as instruments;

/// The two-factor HJM model and its calibration.
pub use hjm_models as models;

/// Pricing engines.
pub use hjm_pricingengines as pricingengines;
