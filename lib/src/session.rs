// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Connection session for a single physical device interaction
//!
//! A session holds the selected candidate, the most recent features
//! snapshot and the hardware dialog currently shown for the device. The
//! dialog is held as a scoped guard and closed exactly once, whichever
//! way the session ends.

use std::time::Duration;

use log::{debug, warn};

use hw_onboard_core::{CandidateDevice, DeviceFeatures, ErrorCode};

use crate::{
    gate::Verification,
    ui::{CloseMode, DialogGuard, HardwareUi},
    Error, FlowOptions, Transport, TransportError,
};

/// Connection session, exclusively owned by one flow instance
pub struct ConnectionSession<'a> {
    transport: &'a dyn Transport,
    ui: &'a dyn HardwareUi,

    device: CandidateDevice,
    features: Option<DeviceFeatures>,

    /// Hardware dialog currently shown for this device
    dialog: Option<DialogGuard<'a>>,
    /// Firmware gate outcome, set once per session
    pub(crate) verification: Option<Verification>,

    connect_timeout: Duration,
    unlock_timeout: Duration,
}

impl<'a> ConnectionSession<'a> {
    /// Open a session for the provided candidate, showing the checking device dialog
    pub fn open(
        transport: &'a dyn Transport,
        ui: &'a dyn HardwareUi,
        device: CandidateDevice,
        opts: &FlowOptions,
    ) -> Self {
        debug!("Opening session for: {}", device);

        ui.show_checking_device(device.connect_id());
        let dialog = Some(DialogGuard::new(ui, device.connect_id()));

        Self {
            transport,
            ui,
            device,
            features: None,
            dialog,
            verification: None,
            connect_timeout: opts.connect_timeout(),
            unlock_timeout: opts.unlock_timeout(),
        }
    }

    /// Candidate this session was opened for
    pub fn device(&self) -> &CandidateDevice {
        &self.device
    }

    /// Latest features snapshot, if connected
    pub fn features(&self) -> Option<&DeviceFeatures> {
        self.features.as_ref()
    }

    /// Check whether a hardware dialog is held by this session
    pub fn is_checking(&self) -> bool {
        self.dialog.is_some()
    }

    /// Connect to the device and fetch features.
    ///
    /// Failures are classified: errors the transport layer already
    /// presented are not reported again, all others are reported once
    /// as a generic error. Both return `None`.
    pub async fn connect(&mut self) -> Option<DeviceFeatures> {
        let r = match tokio::time::timeout(
            self.connect_timeout,
            self.transport.connect(&self.device),
        )
        .await
        {
            Ok(r) => r,
            Err(_) => Err(TransportError::new(
                ErrorCode::ConnectTimeout,
                format!("no response within {:?}", self.connect_timeout),
            )),
        };

        match r {
            Ok(f) => {
                debug!("Connected: {:?}", f);
                self.features = Some(f.clone());
                Some(f)
            }
            Err(e) if e.classify().surfaced_upstream => {
                debug!("Connect failed: {} (already surfaced)", e);
                None
            }
            Err(e) => {
                warn!("Connect failed: {}", e);
                self.ui.report_error(&Error::Transport(e));
                None
            }
        }
    }

    /// Re-fetch features, with on-device PIN entry where required.
    ///
    /// Failures are not retried.
    pub async fn features_with_unlock(&mut self) -> Result<DeviceFeatures, Error> {
        let r = match tokio::time::timeout(
            self.unlock_timeout,
            self.transport.features_with_unlock(&self.device),
        )
        .await
        {
            Ok(r) => r,
            Err(_) => Err(TransportError::new(
                ErrorCode::MethodCallTimeout,
                format!("no response within {:?}", self.unlock_timeout),
            )),
        };

        match r {
            Ok(f) => {
                debug!("Unlocked features: {:?}", f);
                self.features = Some(f.clone());
                Ok(f)
            }
            Err(e) => {
                warn!("Fetching features with unlock failed: {}", e);
                Err(Error::Unlock(e))
            }
        }
    }

    /// Close the current hardware dialog (if any) with the provided mode
    pub fn release_dialog(&mut self, mode: CloseMode) {
        if let Some(mut d) = self.dialog.take() {
            d.set_mode(mode);
        }
    }

    /// Show the device processing dialog, replacing any current dialog
    pub fn acquire_processing_dialog(&mut self) {
        self.release_dialog(CloseMode::ABORT);

        self.ui.show_processing(self.device.connect_id());
        self.dialog = Some(DialogGuard::new(self.ui, self.device.connect_id()));
    }

    /// Take the current dialog, to be closed with `mode` when the guard drops
    pub(crate) fn take_dialog(&mut self, mode: CloseMode) -> Option<DialogGuard<'a>> {
        self.dialog.take().map(|mut d| {
            d.set_mode(mode);
            d
        })
    }
}

impl<'a> Drop for ConnectionSession<'a> {
    fn drop(&mut self) {
        debug!("Closing session for: {}", self.device);
    }
}
