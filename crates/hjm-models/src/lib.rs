//! # hjm-models
//!
//! The two-factor HJM volatility model and its calibration.
//!
//! ```text
//! VolatilityParameters ──► HjmModel
//!          ▲
//!          └── calibration
//!              ├── surface_fit  → calibrate_to_volatilities
//!              └── price_fit    → calibrate_to_prices / PriceCalibrator
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Model ────────────────────────────────────────────────────────────────
pub mod hjm_model;

// ── Calibration ──────────────────────────────────────────────────────────
pub mod calibration;

// ── Re-exports ───────────────────────────────────────────────────────────
pub use calibration::{
    calibrate_to_prices, calibrate_to_volatilities, model_bond_price, model_volatility,
    BondPriceQuote, CalibrationSettings, PriceCalibrator, PriceFitReport, VolatilityQuote,
};
pub use hjm_model::{check_lambda, HjmModel, VolatilityParameters, LAMBDA_EPSILON};
