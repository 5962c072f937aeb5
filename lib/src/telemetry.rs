// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Wallet onboarding telemetry events

use log::{info, warn};
use serde::Serialize;
use strum::Display;

use hw_onboard_core::{CandidateDevice, DeviceFeatures, DeviceType, FirmwareVersion};

/// Add method reported for hardware wallet onboarding
pub const ADD_METHOD: &str = "ConnectHWWallet";

/// Outcome of a wallet connection attempt
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

/// Emitted once when the user selects a device
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWalletStarted {
    pub add_method: &'static str,
    pub communication: &'static str,
    pub is_software_wallet_only_user: bool,
}

impl AddWalletStarted {
    pub fn new(device: &CandidateDevice, is_software_wallet_only_user: bool) -> Self {
        Self {
            add_method: ADD_METHOD,
            communication: device.transport.communication(),
            is_software_wallet_only_user,
        }
    }
}

/// Emitted once per flow outcome
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletAdded {
    pub status: Status,
    pub add_method: &'static str,
    pub communication: &'static str,
    pub device_type: DeviceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<FirmwareVersion>,
    pub is_software_wallet_only_user: bool,
}

impl WalletAdded {
    /// Build an event for a device, with features where they were fetched
    pub fn new(
        status: Status,
        device: &CandidateDevice,
        features: Option<&DeviceFeatures>,
        is_software_wallet_only_user: bool,
    ) -> Self {
        let device_type = match features {
            Some(f) => f.resolve_device_type(device),
            None => device.device_type,
        };

        Self {
            status,
            add_method: ADD_METHOD,
            communication: device.transport.communication(),
            device_type,
            firmware_version: features.and_then(|f| f.firmware_version),
            is_software_wallet_only_user,
        }
    }
}

/// Telemetry sink
pub trait Telemetry: Send + Sync {
    fn add_wallet_started(&self, event: &AddWalletStarted);

    fn wallet_added(&self, event: &WalletAdded);
}

/// [Telemetry] sink writing JSON events to the log
#[derive(Copy, Clone, Debug, Default)]
pub struct LogTelemetry;

impl LogTelemetry {
    fn emit(name: &str, event: &impl Serialize) {
        match serde_json::to_string(event) {
            Ok(v) => info!("telemetry {}: {}", name, v),
            Err(e) => warn!("telemetry {}: encoding failed: {}", name, e),
        }
    }
}

impl Telemetry for LogTelemetry {
    fn add_wallet_started(&self, event: &AddWalletStarted) {
        Self::emit("addWalletStarted", event)
    }

    fn wallet_added(&self, event: &WalletAdded) {
        Self::emit("walletAdded", event)
    }
}
