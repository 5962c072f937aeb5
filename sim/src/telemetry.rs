// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::sync::Mutex;

use hw_onboard::{
    telemetry::{AddWalletStarted, WalletAdded},
    LogTelemetry, Telemetry,
};

use crate::lock;

/// Telemetry sink recording events, forwarding them to [LogTelemetry]
#[derive(Debug, Default)]
pub struct RecordingTelemetry {
    started: Mutex<Vec<AddWalletStarted>>,
    added: Mutex<Vec<WalletAdded>>,
}

impl RecordingTelemetry {
    /// Recorded `addWalletStarted` events
    pub fn started(&self) -> Vec<AddWalletStarted> {
        lock(&self.started).clone()
    }

    /// Recorded `walletAdded` events
    pub fn added(&self) -> Vec<WalletAdded> {
        lock(&self.added).clone()
    }
}

impl Telemetry for RecordingTelemetry {
    fn add_wallet_started(&self, event: &AddWalletStarted) {
        LogTelemetry.add_wallet_started(event);
        lock(&self.started).push(event.clone());
    }

    fn wallet_added(&self, event: &WalletAdded) {
        LogTelemetry.wallet_added(event);
        lock(&self.added).push(event.clone());
    }
}
