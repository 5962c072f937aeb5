// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::sync::Arc;

use hw_onboard::{FlowOutcome, Handoff};
use hw_onboard_core::WalletKind;
use hw_onboard_sim::{RecordingListener, Scenario, Sim};

mod helpers;
use helpers::*;

const SCENARIO: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../sim/scenarios/usb.toml");

#[tokio::test]
async fn usb_scenario() -> anyhow::Result<()> {
    setup();

    let s = Scenario::load(SCENARIO)?;
    let sim = Sim::new(&s);
    let flow = sim.flow(options());

    let l = Arc::new(RecordingListener::default());
    flow.start_listing(l.clone()).await;
    assert!(l.wait_ticks(1, TIMEOUT).await);

    let devices = l.latest().unwrap();
    let names: Vec<_> = devices.iter().map(|d| d.sort_key()).collect();
    assert_eq!(names, vec!["Classic", "pro 2", "Pro 10"]);

    // Bootloader device hands off, listing resumes
    let o = flow.select(devices[0].clone()).await?;
    assert_eq!(
        o,
        FlowOutcome::Handoff(Handoff::FirmwareRecovery {
            connect_id: "usb-3".to_string(),
            firmware_present: false,
        })
    );
    assert!(flow.is_scanning().await);

    // Existing standard wallet with passphrase enabled yields a hidden wallet
    flow.select(devices[1].clone()).await?;

    // No standard wallet and no passphrase yields a standard wallet
    flow.select(devices[2].clone()).await?;

    let wallets = sim.store.wallets();
    assert_eq!(wallets.len(), 2);
    assert_eq!(wallets[0].connect_id, "usb-2");
    assert_eq!(wallets[0].record.kind, WalletKind::Hidden);
    assert_eq!(wallets[1].connect_id, "usb-1");
    assert_eq!(wallets[1].record.kind, WalletKind::Standard);

    assert_eq!(sim.telemetry.started().len(), 3);
    assert_eq!(sim.telemetry.added().len(), 2);

    Ok(())
}
