// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transport scanner, running discovery as a cancellable background task.
//!
//! Each tick delivers the full, naturally sorted device list. Transport
//! errors are classified: automatic recoveries are logged and scanning
//! continues, other errors are delivered to the [ScanListener] once until
//! the next successful tick, and non-retryable errors stop the scan.

use std::{sync::Arc, time::Duration};

use log::{debug, warn};
use strum::Display;
use tokio::task::JoinHandle;

use hw_onboard_core::{sort_candidates, CandidateDevice, Category, Classification};

use crate::{Transport, TransportError};

/// Scan state reported to listeners
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display)]
pub enum ScanState {
    Started,
    Stopped,
}

/// Receiver for scan results
pub trait ScanListener: Send + Sync {
    /// Refreshed, sorted device list
    fn devices(&self, devices: Vec<CandidateDevice>);

    /// Scan started or stopped
    fn state(&self, _state: ScanState) {}

    /// Transport error requiring caller attention
    fn error(&self, error: &TransportError, classification: Classification);
}

/// Device scanner, owned by a single flow instance
pub struct Scanner {
    transport: Arc<dyn Transport>,
    interval: Duration,
    /// Listener for the current (or last) scan, kept for restarts
    listener: Option<Arc<dyn ScanListener>>,
    task: Option<JoinHandle<()>>,
    focused: bool,
}

impl Scanner {
    /// Create a new scanner over the provided transport
    pub fn new(transport: Arc<dyn Transport>, interval: Duration) -> Self {
        Self {
            transport,
            interval,
            listener: None,
            task: None,
            focused: true,
        }
    }

    /// Check whether a scan task is currently running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Start scanning, delivering results to `listener`.
    ///
    /// A call while already running is a no-op. Returns whether a new
    /// scan was started.
    pub fn start(&mut self, listener: Arc<dyn ScanListener>) -> bool {
        if self.is_running() {
            debug!("Scan already running");
            return false;
        }

        self.listener = Some(listener);
        self.spawn()
    }

    /// Restart scanning with the last listener, where one was set
    pub fn resume(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        self.spawn()
    }

    fn spawn(&mut self) -> bool {
        let listener = match (&self.listener, self.focused) {
            (Some(l), true) => l.clone(),
            (None, _) => return false,
            (_, false) => {
                debug!("Scan deferred until focused");
                return false;
            }
        };

        debug!("Starting device scan ({:?} interval)", self.interval);

        self.task = Some(tokio::spawn(scan_task(
            self.transport.clone(),
            listener,
            self.interval,
        )));

        true
    }

    /// Stop scanning.
    ///
    /// Returns once the scan task has fully exited, no further ticks are
    /// delivered from the stopped scan.
    pub async fn stop(&mut self) {
        let task = match self.task.take() {
            Some(t) => t,
            None => return,
        };

        let was_running = !task.is_finished();

        debug!("Stopping device scan");

        task.abort();
        let _ = task.await;

        if was_running {
            self.transport.stop_search().await;

            if let Some(l) = &self.listener {
                l.state(ScanState::Stopped);
            }
        }
    }

    /// Update focus of the hosting context.
    ///
    /// Losing focus stops scanning, regaining it starts a fresh scan.
    pub async fn set_focused(&mut self, focused: bool) {
        if self.focused == focused {
            return;
        }
        self.focused = focused;

        match focused {
            true => {
                self.resume();
            }
            false => self.stop().await,
        }
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        if let Some(t) = self.task.take() {
            t.abort();
        }
    }
}

async fn scan_task(
    transport: Arc<dyn Transport>,
    listener: Arc<dyn ScanListener>,
    interval: Duration,
) {
    listener.state(ScanState::Started);

    // Category reported since the last successful tick
    let mut reported: Option<Category> = None;

    loop {
        match transport.search().await {
            Ok(mut devices) => {
                reported = None;

                sort_candidates(&mut devices);

                debug!("Found {} devices", devices.len());

                listener.devices(devices);
            }
            Err(e) => {
                let c = e.classify();

                if c.is_automatic() {
                    debug!("Scan error: {}, resuming", e);
                } else if !c.retryable {
                    warn!("Scan error: {} ({}), stopping", e, c.recovery);

                    transport.stop_search().await;
                    listener.error(&e, c);
                    listener.state(ScanState::Stopped);

                    return;
                } else if reported == Some(c.category) {
                    debug!("Scan error: {} (already reported)", e);
                } else {
                    warn!("Scan error: {} ({})", e, c.recovery);

                    reported = Some(c.category);
                    listener.error(&e, c);
                }
            }
        }

        tokio::time::sleep(interval).await;
    }
}
