// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::Parser;
use log::{debug, error, info, LevelFilter};

use hw_onboard::FlowOptions;
use hw_onboard_core::WalletKindChoice;
use hw_onboard_sim::*;

/// Hardware wallet onboarding simulator
///
/// Runs the connection flow against a simulated transport, wallet store
/// and UI described by a TOML scenario.
#[derive(Clone, PartialEq, Debug, Parser)]
struct Options {
    /// Scenario file
    #[clap(long, env = "SCENARIO")]
    scenario: PathBuf,

    #[clap(flatten)]
    flow: FlowOptions,

    /// Subcommand to execute
    #[clap(subcommand)]
    cmd: Actions,

    /// Log level
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Clone, PartialEq, Debug, Parser)]
enum Actions {
    /// List available devices
    List,

    /// Run the connection flow for a device
    Connect {
        /// Device index (as reported by `list`)
        #[clap(long, default_value = "0")]
        device: usize,

        /// Dismiss firmware verification
        #[clap(long)]
        cancel_verification: bool,

        /// Wallet kind chosen when prompted (standard, hidden, cancelled)
        #[clap(long)]
        wallet_kind: Option<WalletKindChoice>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = Options::parse();

    // Setup logging
    let _ = simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default());

    // Load scenario and apply overrides
    let mut scenario = Scenario::load(&args.scenario)?;

    if let Actions::Connect {
        cancel_verification,
        wallet_kind,
        ..
    } = &args.cmd
    {
        if *cancel_verification {
            scenario.answers.verify = false;
        }
        if let Some(k) = wallet_kind {
            scenario.answers.wallet_kind = *k;
        }
    }

    debug!("Using scenario: {:?}", scenario);

    let sim = Sim::new(&scenario);
    let flow = sim.flow(args.flow.clone());

    // Wait for the first scan result
    let listener = Arc::new(RecordingListener::default());
    flow.start_listing(listener.clone()).await;

    let timeout = args.flow.scan_interval() + Duration::from_secs(5);
    listener
        .wait_for(timeout, |l| l.latest().is_some() || !l.errors().is_empty())
        .await;

    if let Some((e, c)) = listener.errors().first() {
        flow.stop_listing().await;
        return Err(anyhow::anyhow!("Scan failed: {} ({})", e, c.recovery));
    }

    let devices = match listener.latest() {
        Some(d) if !d.is_empty() => d,
        _ => {
            flow.stop_listing().await;
            return Err(anyhow::anyhow!("No devices found"));
        }
    };

    let index = match args.cmd {
        Actions::List => {
            flow.stop_listing().await;

            info!("Devices:");
            for (i, d) in devices.iter().enumerate() {
                info!("  {}: {}", i, d);
            }

            return Ok(());
        }
        Actions::Connect { device, .. } => device,
    };

    // Select device by index
    let device = match devices.get(index) {
        Some(d) => d.clone(),
        None => {
            flow.stop_listing().await;
            return Err(anyhow::anyhow!(
                "Invalid device index: {} (max: {})",
                index,
                devices.len() - 1
            ));
        }
    };

    info!("Connecting to device {}: {}", index, device);

    let r = flow.select(device).await;

    flow.stop_listing().await;

    match r {
        Ok(o) => info!("Flow outcome: {:?}", o),
        Err(e) => {
            error!("Flow failed: {}", e);
            return Err(e.into());
        }
    }

    for w in sim.store.wallets() {
        info!("Wallet: {} ({})", w.record.id, w.record.kind);
    }

    Ok(())
}
