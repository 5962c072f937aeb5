// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Simulated transport

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use log::debug;

use hw_onboard::{Transport, TransportError};
use hw_onboard_core::{CandidateDevice, DeviceFeatures, ErrorCode, TransportKind};

use crate::{lock, Scenario, SimDevice};

/// Snapshot of transport call counts
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Calls {
    pub search: usize,
    pub stop_search: usize,
    pub connect: usize,
    pub unlock: usize,
}

#[derive(Debug, Default)]
struct Counters {
    search: AtomicUsize,
    stop_search: AtomicUsize,
    connect: AtomicUsize,
    unlock: AtomicUsize,
}

/// Transport serving devices from a [Scenario]
#[derive(Debug)]
pub struct SimTransport {
    kind: TransportKind,
    devices: Mutex<Vec<SimDevice>>,
    scan_errors: Mutex<VecDeque<ErrorCode>>,
    counters: Counters,
}

impl SimTransport {
    /// Create a transport for the provided scenario
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            kind: scenario.transport,
            devices: Mutex::new(scenario.devices.clone()),
            scan_errors: Mutex::new(scenario.scan_errors.iter().cloned().collect()),
            counters: Counters::default(),
        }
    }

    /// Replace the visible devices
    pub fn set_devices(&self, devices: Vec<SimDevice>) {
        *lock(&self.devices) = devices;
    }

    /// Queue an error for the next scan tick
    pub fn push_scan_error(&self, code: ErrorCode) {
        lock(&self.scan_errors).push_back(code);
    }

    /// Fetch transport call counts
    pub fn calls(&self) -> Calls {
        Calls {
            search: self.counters.search.load(Ordering::SeqCst),
            stop_search: self.counters.stop_search.load(Ordering::SeqCst),
            connect: self.counters.connect.load(Ordering::SeqCst),
            unlock: self.counters.unlock.load(Ordering::SeqCst),
        }
    }

    fn find(&self, device: &CandidateDevice) -> Result<SimDevice, TransportError> {
        lock(&self.devices)
            .iter()
            .find(|d| d.candidate.connect_id == device.connect_id)
            .cloned()
            .ok_or_else(|| TransportError::new(ErrorCode::Unknown, "device not found"))
    }
}

#[async_trait]
impl Transport for SimTransport {
    fn kind(&self) -> TransportKind {
        self.kind
    }

    async fn search(&self) -> Result<Vec<CandidateDevice>, TransportError> {
        self.counters.search.fetch_add(1, Ordering::SeqCst);

        if let Some(code) = lock(&self.scan_errors).pop_front() {
            debug!("Search error: {}", code);
            return Err(TransportError::new(code, "simulated scan error"));
        }

        Ok(lock(&self.devices)
            .iter()
            .map(|d| d.candidate.clone())
            .collect())
    }

    async fn stop_search(&self) {
        self.counters.stop_search.fetch_add(1, Ordering::SeqCst);
    }

    async fn connect(&self, device: &CandidateDevice) -> Result<DeviceFeatures, TransportError> {
        self.counters.connect.fetch_add(1, Ordering::SeqCst);

        let d = self.find(device)?;

        if d.connect_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(d.connect_delay_ms)).await;
        }

        match d.connect_error {
            Some(code) => Err(TransportError::new(code, "simulated connect error")),
            None => Ok(d.features),
        }
    }

    async fn features_with_unlock(
        &self,
        device: &CandidateDevice,
    ) -> Result<DeviceFeatures, TransportError> {
        self.counters.unlock.fetch_add(1, Ordering::SeqCst);

        let d = self.find(device)?;

        match d.unlock_error {
            Some(code) => Err(TransportError::new(code, "simulated unlock error")),
            None => Ok(d.unlocked_features.unwrap_or(d.features)),
        }
    }
}
