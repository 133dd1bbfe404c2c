//! # `mguard baseline` — One-Shot Baseline Calculation
//!
//! Calculates a merchant's expected-revenue profile from an order-history
//! JSON file (an array of `{ "date": "YYYY-MM-DD", "revenue": n }` rows)
//! and prints the resulting baseline as pretty JSON.

use std::path::PathBuf;

use clap::Args;

use mguard_baseline::{BaselineCalculator, DailyRevenue};
use mguard_core::MerchantId;

use crate::{read_file, resolve_clock};

/// Arguments for `mguard baseline`.
#[derive(Args, Debug)]
pub struct BaselineArgs {
    /// Merchant UUID the baseline belongs to.
    #[arg(long)]
    pub merchant: String,

    /// Path to the order-history JSON file.
    #[arg(long)]
    pub orders: PathBuf,

    /// Lookback window length in days.
    #[arg(long, default_value_t = 90)]
    pub lookback: u32,

    /// Calculation clock as UTC ISO8601. Defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

/// Run the calculation and print the resulting baseline.
pub fn run_baseline(args: &BaselineArgs) -> anyhow::Result<u8> {
    let merchant = MerchantId::parse(&args.merchant)?;
    let now = resolve_clock(args.at.as_deref())?;
    let rows: Vec<DailyRevenue> = serde_json::from_str(&read_file(&args.orders)?)?;

    let calculator = BaselineCalculator::with_lookback(args.lookback);
    let baseline = calculator.calculate(merchant, &rows, now);
    tracing::debug!(
        used = baseline.data_points_used,
        excluded = baseline.anomalies_excluded,
        "baseline calculated"
    );
    println!("{}", serde_json::to_string_pretty(&baseline)?);
    Ok(0)
}
