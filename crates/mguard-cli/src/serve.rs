//! # `mguard serve` — HTTP API Server
//!
//! Serves the Merchant Guard API over in-memory stores. Intended for
//! local development and integration environments; production deployments
//! wire durable store implementations into [`mguard_api::AppState`].

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Args;

use mguard_api::{app, AppState};
use mguard_gate::ThresholdTable;

use crate::read_file;

/// Arguments for `mguard serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Socket address to bind.
    #[arg(long, default_value = "127.0.0.1:8620")]
    pub bind: SocketAddr,

    /// Threshold table YAML overriding the stock configuration.
    #[arg(long)]
    pub thresholds: Option<PathBuf>,
}

/// Run the server until interrupted.
pub fn run_serve(args: &ServeArgs) -> anyhow::Result<u8> {
    let table = match &args.thresholds {
        Some(path) => ThresholdTable::from_yaml(&read_file(path)?)?,
        None => ThresholdTable::default(),
    };

    let state = AppState::with_thresholds(table);
    let router = app(state);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async {
        let listener = tokio::net::TcpListener::bind(args.bind).await?;
        tracing::info!(bind = %args.bind, "mguard API listening");
        axum::serve(listener, router).await?;
        Ok::<_, anyhow::Error>(())
    })?;
    Ok(0)
}
