//! # hjm-termstructures
//!
//! Yield term structures: the [`YieldTermStructure`] trait consumed by the
//! pricing engines and the linearly interpolated [`DiscountCurve`] built
//! from market zero-coupon bond prices.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// `YieldTermStructure`: discount-factor term structures.
pub mod yield_term_structure;

/// `DiscountCurve`: discount factors interpolated linearly in time.
pub mod discount_curve;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use discount_curve::DiscountCurve;
pub use yield_term_structure::YieldTermStructure;
