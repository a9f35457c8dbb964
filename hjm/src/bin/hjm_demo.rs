//! hjm-demo: price and calibrate bond options from the command line.
//!
//! # Commands
//!
//! - `hjm-demo price` - price an option on a zero-coupon bond
//! - `hjm-demo calibrate-surface` - fit `σ1`, `σ2` to a volatility term structure
//!
//! Logging goes through `tracing`; set `RUST_LOG=debug` for detail.

use clap::{Parser, Subcommand};
use hjm::instruments::{OptionType, PricingEngine, ZeroCouponBondOption};
use hjm::math::TrapezoidIntegral;
use hjm::models::{
    calibrate_to_volatilities, model_volatility, HjmModel, VolatilityParameters, VolatilityQuote,
};
use hjm::pricingengines::AnalyticHjmBondOptionEngine;
use hjm::termstructures::DiscountCurve;
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const REFERENCE_TENORS: [f64; 6] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
const REFERENCE_DISCOUNTS: [f64; 6] = [1.0, 0.97, 0.94, 0.91, 0.9, 0.88];
const SYNTHETIC_MATURITIES: [f64; 5] = [0.5, 1.0, 2.0, 5.0, 10.0];

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Hjm(#[from] hjm::core::Error),

    #[error("json output failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

type Result<T> = std::result::Result<T, CliError>;

/// Two-factor HJM bond option pricer
#[derive(Parser)]
#[command(name = "hjm-demo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a European option on a zero-coupon bond
    Price {
        /// Curve tenors in years (defaults to the reference curve)
        #[arg(long, value_delimiter = ',')]
        tenors: Vec<f64>,

        /// Discount factors matching `--tenors`
        #[arg(long, value_delimiter = ',')]
        discounts: Vec<f64>,

        /// Level volatility
        #[arg(long, default_value_t = 0.3)]
        sigma1: f64,

        /// Mean-reverting volatility amplitude
        #[arg(long, default_value_t = 0.2)]
        sigma2: f64,

        /// Mean-reversion speed
        #[arg(long, default_value_t = 2.0)]
        lambda: f64,

        /// Strike price
        #[arg(short, long, default_value_t = 0.5)]
        strike: f64,

        /// Option expiry in years
        #[arg(long, default_value_t = 1.5)]
        option_maturity: f64,

        /// Bond maturity in years
        #[arg(long, default_value_t = 4.5)]
        bond_maturity: f64,

        /// Price a put instead of a call
        #[arg(long)]
        put: bool,

        /// Trapezoid sub-intervals for the variance integral
        #[arg(long, default_value_t = 1000)]
        intervals: usize,

        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },

    /// Fit sigma1 and sigma2 to quoted volatilities for a fixed lambda
    CalibrateSurface {
        /// Quote maturities in years (synthetic quotes when omitted)
        #[arg(long, value_delimiter = ',')]
        maturities: Vec<f64>,

        /// Quoted volatilities matching `--maturities`
        #[arg(long, value_delimiter = ',')]
        vols: Vec<f64>,

        /// Mean-reversion speed
        #[arg(long, default_value_t = 0.8)]
        lambda: f64,

        /// Print the parameters as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct PriceReport {
    option_type: String,
    strike: f64,
    option_maturity: f64,
    bond_maturity: f64,
    parameters: VolatilityParameters,
    intervals: usize,
    npv: f64,
    total_variance: Option<f64>,
    d1: Option<f64>,
    d2: Option<f64>,
}

fn build_curve(tenors: &[f64], discounts: &[f64]) -> Result<DiscountCurve> {
    match (tenors.is_empty(), discounts.is_empty()) {
        (true, true) => Ok(DiscountCurve::new(&REFERENCE_TENORS, &REFERENCE_DISCOUNTS)?),
        (false, false) => Ok(DiscountCurve::new(tenors, discounts)?),
        _ => Err(CliError::Usage(
            "--tenors and --discounts must be given together".into(),
        )),
    }
}

fn price(
    tenors: &[f64],
    discounts: &[f64],
    params: VolatilityParameters,
    option: ZeroCouponBondOption,
    intervals: usize,
    json: bool,
) -> Result<()> {
    let curve = build_curve(tenors, discounts)?;
    let model = HjmModel::from_parameters(params);
    if !json {
        println!("{curve}");
        println!("{model}");
        println!("{option}");
    }

    let engine = AnalyticHjmBondOptionEngine::with_integrator(
        Arc::new(curve),
        Arc::new(model),
        TrapezoidIntegral::new(intervals),
    );
    let results = engine.calculate(&option)?;
    info!(npv = results.npv, "priced bond option");

    if json {
        let report = PriceReport {
            option_type: option.option_type().to_string(),
            strike: option.strike(),
            option_maturity: option.option_maturity(),
            bond_maturity: option.bond_maturity(),
            parameters: params,
            intervals,
            npv: results.npv,
            total_variance: results.result("total_variance"),
            d1: results.result("d1"),
            d2: results.result("d2"),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Price: {}", results.npv);
    }
    Ok(())
}

fn calibrate_surface(maturities: &[f64], vols: &[f64], lambda: f64, json: bool) -> Result<()> {
    let quotes: Vec<VolatilityQuote> = if maturities.is_empty() && vols.is_empty() {
        let truth = VolatilityParameters::new(0.01, 0.02, lambda)?;
        info!(
            sigma1 = truth.sigma1(),
            sigma2 = truth.sigma2(),
            "using synthetic volatility quotes"
        );
        SYNTHETIC_MATURITIES
            .iter()
            .map(|&t| VolatilityQuote::new(t, model_volatility(&truth, t)))
            .collect()
    } else if maturities.len() == vols.len() {
        maturities
            .iter()
            .zip(vols)
            .map(|(&t, &v)| VolatilityQuote::new(t, v))
            .collect()
    } else {
        return Err(CliError::Usage(format!(
            "{} maturities but {} volatilities",
            maturities.len(),
            vols.len()
        )));
    };

    let params = calibrate_to_volatilities(&quotes, lambda)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&params)?);
    } else {
        println!("{}", HjmModel::from_parameters(params));
        for q in &quotes {
            println!(
                "  T = {:>5}: quoted {:.6}, fitted {:.6}",
                q.maturity,
                q.volatility,
                model_volatility(&params, q.maturity)
            );
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Price {
            tenors,
            discounts,
            sigma1,
            sigma2,
            lambda,
            strike,
            option_maturity,
            bond_maturity,
            put,
            intervals,
            json,
        } => {
            let params = VolatilityParameters::new(sigma1, sigma2, lambda)?;
            let option_type = if put {
                OptionType::Put
            } else {
                OptionType::Call
            };
            let option =
                ZeroCouponBondOption::new(option_type, strike, option_maturity, bond_maturity)?;
            price(&tenors, &discounts, params, option, intervals, json)
        }
        Commands::CalibrateSurface {
            maturities,
            vols,
            lambda,
            json,
        } => calibrate_surface(&maturities, &vols, lambda, json),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
