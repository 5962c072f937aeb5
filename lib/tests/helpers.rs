// Copyright (c) 2022-2023 The MobileCoin Foundation

#![allow(dead_code)]

use std::{str::FromStr, time::Duration};

use log::LevelFilter;
use simplelog::SimpleLogger;

use hw_onboard::FlowOptions;
use hw_onboard_core::{
    CandidateDevice, DeviceFeatures, DeviceType, FirmwareVersion, TransportKind,
};
use hw_onboard_sim::{Scenario, Sim, SimDevice, StoreCall, UiEvent};

/// Timeout for awaiting scan events
pub const TIMEOUT: Duration = Duration::from_secs(2);

/// Setup logging, level from `LOG_LEVEL`
pub fn setup() {
    let log_level = match std::env::var("LOG_LEVEL").map(|v| LevelFilter::from_str(&v)) {
        Ok(Ok(l)) => l,
        _ => LevelFilter::Debug,
    };

    let _ = SimpleLogger::init(log_level, simplelog::Config::default());
}

/// Flow options with short intervals for testing
pub fn options() -> FlowOptions {
    FlowOptions {
        scan_interval_ms: 10,
        connect_timeout_s: 1,
        unlock_timeout_s: 1,
        software_wallet_only_user: false,
    }
}

/// Normal mode device, initialised and locked
pub fn device(name: &str, connect_id: &str, device_type: DeviceType) -> SimDevice {
    SimDevice {
        candidate: CandidateDevice {
            name: Some(name.to_string()),
            connect_id: Some(connect_id.to_string()),
            device_id: Some(format!("dev-{connect_id}")),
            uuid: format!("uuid-{connect_id}"),
            transport: TransportKind::Bridge,
            device_type,
            ..Default::default()
        },
        features: DeviceFeatures {
            device_id: Some(format!("dev-{connect_id}")),
            device_type,
            firmware_version: Some(FirmwareVersion::new(3, 5, 0)),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Scenario with the provided devices
pub fn scenario(devices: Vec<SimDevice>) -> Scenario {
    Scenario {
        devices,
        ..Default::default()
    }
}

/// Count wallet creation calls made against the store
pub fn creates(sim: &Sim) -> usize {
    sim.store
        .calls()
        .iter()
        .filter(|c| matches!(c, StoreCall::Create { .. }))
        .count()
}

/// Count dialog close events
pub fn closes(sim: &Sim) -> usize {
    sim.ui.count(|e| matches!(e, UiEvent::CloseDialog(..)))
}

/// Count dialogs opened (checking device and processing)
pub fn opens(sim: &Sim) -> usize {
    sim.ui
        .count(|e| matches!(e, UiEvent::CheckingDevice(_) | UiEvent::Processing(_)))
}
