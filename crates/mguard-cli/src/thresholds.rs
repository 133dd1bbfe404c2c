//! # `mguard thresholds` — Inspect and Validate Threshold Configuration
//!
//! Prints the active threshold table (stock, or loaded from a YAML file)
//! as YAML or JSON. Loading a file validates every entry, so this doubles
//! as a config check in deploy pipelines.

use std::path::PathBuf;

use clap::Args;

use mguard_gate::ThresholdTable;

use crate::read_file;

/// Arguments for `mguard thresholds`.
#[derive(Args, Debug)]
pub struct ThresholdsArgs {
    /// Threshold table YAML to load instead of the stock table.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print JSON instead of YAML.
    #[arg(long)]
    pub json: bool,
}

/// Print the table, validating a loaded config along the way.
pub fn run_thresholds(args: &ThresholdsArgs) -> anyhow::Result<u8> {
    let table = match &args.config {
        Some(path) => ThresholdTable::from_yaml(&read_file(path)?)?,
        None => ThresholdTable::default(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        println!("{}", table.to_yaml()?);
    }
    Ok(0)
}
