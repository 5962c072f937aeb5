// Copyright (c) 2022-2023 The MobileCoin Foundation

use hw_onboard::{
    telemetry::Status, CloseMode, ConnectionSession, Error, FirmwareGate, FlowOutcome,
    Provisioner, Verification,
};
use hw_onboard_core::{DeviceType, WalletCreationStrategy};
use hw_onboard_sim::{FixedPolicy, Sim, StoreCall, UiEvent};

mod helpers;
use helpers::*;

#[tokio::test]
async fn failed_creation_rolls_back() {
    setup();

    let d = device("Pro", "c1", DeviceType::Pro);

    let mut s = scenario(vec![d.clone()]);
    s.fail_create = true;

    let sim = Sim::new(&s);
    let flow = sim.flow(options());

    let r = flow.select(d.candidate.clone()).await;
    assert!(matches!(r, Err(Error::Store(_))));

    assert!(sim.store.wallets().is_empty());
    assert_eq!(creates(&sim), 1);
    assert!(!sim
        .store
        .calls()
        .iter()
        .any(|c| matches!(c, StoreCall::MarkDeprecated { .. })));

    // Progress reverted before the dialog closes
    let events = sim.ui.events();
    let n = events.len();
    assert_eq!(
        &events[n - 3..],
        &[
            UiEvent::Finalizing,
            UiEvent::RevertFinalizing,
            UiEvent::CloseDialog("c1".to_string(), CloseMode::FINAL),
        ]
    );
    assert_eq!(opens(&sim), closes(&sim));

    let added = sim.telemetry.added();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].status, Status::Failure);
    assert!(added[0].firmware_version.is_some());
}

#[tokio::test]
async fn deprecation_prefers_feature_device_id() -> anyhow::Result<()> {
    setup();

    let mut d = device("Pro", "c1", DeviceType::Pro);
    d.candidate.device_id = Some("candidate-id".to_string());
    d.features.device_id = Some("feature-id".to_string());

    let mut e = device("Pro", "c2", DeviceType::Pro);
    e.candidate.device_id = Some("candidate-id".to_string());
    e.features.device_id = None;

    let sim = Sim::new(&scenario(vec![d.clone(), e.clone()]));
    let flow = sim.flow(options());

    flow.select(d.candidate.clone()).await?;
    flow.select(e.candidate.clone()).await?;

    let deprecated: Vec<_> = sim
        .store
        .calls()
        .into_iter()
        .filter(|c| matches!(c, StoreCall::MarkDeprecated { .. }))
        .collect();

    assert_eq!(
        deprecated,
        vec![
            StoreCall::MarkDeprecated {
                connect_id: "c1".to_string(),
                device_id: "feature-id".to_string(),
            },
            StoreCall::MarkDeprecated {
                connect_id: "c2".to_string(),
                device_id: "candidate-id".to_string(),
            },
        ]
    );

    Ok(())
}

#[tokio::test]
async fn deprecation_failure_is_not_fatal() -> anyhow::Result<()> {
    setup();

    let d = device("Pro", "c1", DeviceType::Pro);

    let mut s = scenario(vec![d.clone()]);
    s.fail_deprecate = true;

    let sim = Sim::new(&s);
    let flow = sim.flow(options());

    let o = flow.select(d.candidate.clone()).await?;
    assert!(matches!(o, FlowOutcome::Provisioned(_)));

    assert_eq!(sim.store.wallets().len(), 1);
    assert_eq!(sim.telemetry.added()[0].status, Status::Success);

    Ok(())
}

#[tokio::test]
async fn onboarding_wallet_params() -> anyhow::Result<()> {
    setup();

    let d = device("Pro", "c1", DeviceType::Pro);
    let sim = Sim::new(&scenario(vec![d.clone()]));
    let flow = sim.flow(options());

    let o = flow.select(d.candidate.clone()).await?;

    let wallets = sim.store.wallets();
    assert_eq!(o, FlowOutcome::Provisioned(wallets[0].record.id.clone()));

    let p = &wallets[0].params;
    assert!(!p.firmware_verified);
    assert!(p.default_is_temp);
    assert!(p.hide_checking_device_loading);
    assert_eq!(p.device, d.candidate);

    Ok(())
}

#[tokio::test]
async fn cancelled_strategy_is_noop() -> anyhow::Result<()> {
    setup();

    let d = device("Pro", "c1", DeviceType::Pro);
    let sim = Sim::new(&scenario(vec![d.clone()]));
    let opts = options();

    let p = Provisioner::new(
        sim.store.clone(),
        sim.ui.clone(),
        sim.telemetry.clone(),
        false,
    );

    let mut session =
        ConnectionSession::open(&*sim.transport, &*sim.ui, d.candidate.clone(), &opts);

    let r = p
        .provision(
            &mut session,
            WalletCreationStrategy::UserCancelled,
            &d.features,
            false,
        )
        .await?;
    assert_eq!(r, None);

    assert!(!p.is_busy());
    assert!(sim.store.calls().is_empty());
    assert!(sim.telemetry.added().is_empty());
    assert_eq!(sim.ui.count(|e| *e == UiEvent::Finalizing), 0);

    // Session still holds its dialog, closed on drop
    assert!(session.is_checking());
    drop(session);
    assert_eq!(opens(&sim), closes(&sim));

    Ok(())
}

#[tokio::test]
async fn firmware_gate_runs_once() {
    setup();

    let d = device("Pro", "c1", DeviceType::Pro);
    let sim = Sim::new(&scenario(vec![d.clone()]));
    let opts = options();

    let policy = FixedPolicy(true);
    let gate = FirmwareGate::new(&policy, &*sim.ui);

    let mut session =
        ConnectionSession::open(&*sim.transport, &*sim.ui, d.candidate.clone(), &opts);

    let a = gate.run(&mut session, &d.features).await;
    let b = gate.run(&mut session, &d.features).await;

    assert_eq!(a, Verification::Continue { verified: true });
    assert_eq!(a, b);

    assert_eq!(sim.ui.count(|e| matches!(e, UiEvent::VerifyFirmware(_))), 1);

    // Checking dialog released for verification
    assert!(!session.is_checking());
    assert_eq!(opens(&sim), closes(&sim));
}

#[tokio::test]
async fn firmware_gate_skipped_without_policy() {
    setup();

    let d = device("Pro", "c1", DeviceType::Pro);
    let sim = Sim::new(&scenario(vec![d.clone()]));
    let opts = options();

    let policy = FixedPolicy(false);
    let gate = FirmwareGate::new(&policy, &*sim.ui);

    let mut session =
        ConnectionSession::open(&*sim.transport, &*sim.ui, d.candidate.clone(), &opts);

    let v = gate.run(&mut session, &d.features).await;
    assert_eq!(v, Verification::Continue { verified: false });

    assert_eq!(sim.ui.count(|e| matches!(e, UiEvent::VerifyFirmware(_))), 0);
    assert!(session.is_checking());
}

#[tokio::test]
async fn cancelled_select_completes_write() -> anyhow::Result<()> {
    setup();

    let d = device("Pro", "c1", DeviceType::Pro);

    let mut s = scenario(vec![d.clone()]);
    s.create_delay_ms = 300;

    let sim = Sim::new(&s);
    let flow = sim.flow(options());

    // Caller gives up while the store write is pending
    let r = tokio::time::timeout(
        std::time::Duration::from_millis(100),
        flow.select(d.candidate.clone()),
    )
    .await;
    assert!(r.is_err());

    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    assert_eq!(sim.store.wallets().len(), 1);
    assert!(sim
        .store
        .calls()
        .iter()
        .any(|c| matches!(c, StoreCall::MarkDeprecated { .. })));

    let added = sim.telemetry.added();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].status, Status::Success);

    assert_eq!(sim.ui.count(|e| matches!(e, UiEvent::Finalizing)), 1);
    assert_eq!(
        sim.ui.events().last(),
        Some(&UiEvent::CloseDialog("c1".to_string(), CloseMode::FINAL))
    );
    assert_eq!(opens(&sim), closes(&sim));

    Ok(())
}

#[tokio::test]
async fn cancelled_select_still_rolls_back() -> anyhow::Result<()> {
    setup();

    let d = device("Pro", "c1", DeviceType::Pro);

    let mut s = scenario(vec![d.clone()]);
    s.create_delay_ms = 300;
    s.fail_create = true;

    let sim = Sim::new(&s);
    let flow = sim.flow(options());

    let r = tokio::time::timeout(
        std::time::Duration::from_millis(100),
        flow.select(d.candidate.clone()),
    )
    .await;
    assert!(r.is_err());

    tokio::time::sleep(std::time::Duration::from_millis(500)).await;

    assert!(sim.store.wallets().is_empty());
    assert_eq!(sim.ui.count(|e| matches!(e, UiEvent::RevertFinalizing)), 1);
    assert_eq!(opens(&sim), closes(&sim));

    let added = sim.telemetry.added();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].status, Status::Failure);

    Ok(())
}
