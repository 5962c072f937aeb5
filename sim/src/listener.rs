// Copyright (c) 2022-2023 The MobileCoin Foundation

use std::{sync::Mutex, time::Duration};

use log::debug;
use tokio::sync::Notify;

use hw_onboard::{ScanListener, ScanState, TransportError};
use hw_onboard_core::{CandidateDevice, Classification};

use crate::lock;

/// Scan listener recording ticks, states and errors
#[derive(Debug, Default)]
pub struct RecordingListener {
    ticks: Mutex<Vec<Vec<CandidateDevice>>>,
    states: Mutex<Vec<ScanState>>,
    errors: Mutex<Vec<(TransportError, Classification)>>,
    notify: Notify,
}

impl RecordingListener {
    /// Device lists delivered, one per tick
    pub fn ticks(&self) -> Vec<Vec<CandidateDevice>> {
        lock(&self.ticks).clone()
    }

    /// Most recent device list
    pub fn latest(&self) -> Option<Vec<CandidateDevice>> {
        lock(&self.ticks).last().cloned()
    }

    /// Scan states delivered
    pub fn states(&self) -> Vec<ScanState> {
        lock(&self.states).clone()
    }

    /// Errors delivered
    pub fn errors(&self) -> Vec<(TransportError, Classification)> {
        lock(&self.errors).clone()
    }

    /// Drop recorded ticks
    pub fn clear_ticks(&self) {
        lock(&self.ticks).clear();
    }

    /// Wait until `f` holds, re-checking on each listener event.
    ///
    /// Returns whether `f` held before the timeout elapsed.
    pub async fn wait_for(&self, timeout: Duration, f: impl Fn(&Self) -> bool) -> bool {
        let wait = async {
            while !f(self) {
                self.notify.notified().await;
            }
        };

        tokio::time::timeout(timeout, wait).await.is_ok()
    }

    /// Wait for at least `n` device ticks
    pub async fn wait_ticks(&self, n: usize, timeout: Duration) -> bool {
        self.wait_for(timeout, |l| lock(&l.ticks).len() >= n).await
    }
}

impl ScanListener for RecordingListener {
    fn devices(&self, devices: Vec<CandidateDevice>) {
        debug!("Scan tick: {} devices", devices.len());
        lock(&self.ticks).push(devices);
        self.notify.notify_one();
    }

    fn state(&self, state: ScanState) {
        debug!("Scan state: {}", state);
        lock(&self.states).push(state);
        self.notify.notify_one();
    }

    fn error(&self, error: &TransportError, classification: Classification) {
        debug!("Scan error: {} ({:?})", error, classification);
        lock(&self.errors).push((error.clone(), classification));
        self.notify.notify_one();
    }
}
