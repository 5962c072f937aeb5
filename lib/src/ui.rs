// Copyright (c) 2022-2023 The MobileCoin Foundation

//! UI collaborator interface.
//!
//! Progress indicators and hand-offs are fire-and-forget, prompts are
//! awaited and resolve to tagged results.

use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use hw_onboard_core::{
    CandidateDevice, DeviceFeatures, DeviceType, RecoveryAction, WalletKindChoice,
};

use crate::{gate::Verification, Error, TransportError};

/// Screens control is handed to when the flow cannot provision a wallet
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Handoff {
    /// Device is in bootloader mode, firmware recovery required
    FirmwareRecovery {
        connect_id: String,
        firmware_present: bool,
    },
    /// Device has no seed, user chooses to create or restore
    ActivateDevice { device_type: DeviceType },
    /// Device is in backup mode, report and end the flow
    BackupMode { device_type: DeviceType },
}

impl Handoff {
    /// Whether control navigates away from the connection screen.
    ///
    /// Only device activation replaces the screen, firmware recovery and
    /// backup mode return to device listing once dismissed.
    pub const fn leaves_screen(&self) -> bool {
        matches!(self, Handoff::ActivateDevice { .. })
    }
}

/// How hardware dialogs are closed
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct CloseMode {
    /// Close regardless of pending device interaction
    pub hard: bool,
    /// Close immediately rather than after the usual delay
    pub skip_delay: bool,
}

impl CloseMode {
    /// Hand the screen to another dialog (firmware verification)
    pub const SOFT: CloseMode = CloseMode {
        hard: false,
        skip_delay: true,
    };

    /// Flow ended early
    pub const ABORT: CloseMode = CloseMode {
        hard: true,
        skip_delay: true,
    };

    /// Flow completed provisioning
    pub const FINAL: CloseMode = CloseMode {
        hard: true,
        skip_delay: false,
    };
}

/// UI collaborator used by the connection flow
#[async_trait]
pub trait HardwareUi: Send + Sync {
    /// Show the "checking device" progress dialog
    fn show_checking_device(&self, connect_id: &str);

    /// Show the device processing dialog while state is re-queried
    fn show_processing(&self, connect_id: &str);

    /// Close the current hardware dialog
    fn close_dialog(&self, connect_id: &str, mode: CloseMode);

    /// Enter the "finalizing wallet" progress state
    fn show_finalizing(&self);

    /// Leave the "finalizing wallet" progress state after a failure
    fn revert_finalizing(&self);

    /// Surface a single generic error
    fn report_error(&self, error: &Error);

    /// Present a blocking recovery action for a transport error
    fn show_recovery(&self, action: RecoveryAction, error: &TransportError);

    /// Hand control to another screen
    fn handoff(&self, handoff: &Handoff);

    /// Ask the user to verify device firmware
    async fn verify_firmware(
        &self,
        device: &CandidateDevice,
        features: &DeviceFeatures,
    ) -> Verification;

    /// Ask the user which kind of wallet to create
    async fn choose_wallet_kind(&self) -> WalletKindChoice;
}

/// Scoped hardware dialog, closed exactly once when dropped
pub(crate) struct DialogGuard<'a> {
    ui: &'a dyn HardwareUi,
    connect_id: String,
    mode: CloseMode,
    armed: bool,
}

impl<'a> DialogGuard<'a> {
    pub(crate) fn new(ui: &'a dyn HardwareUi, connect_id: &str) -> Self {
        Self {
            ui,
            connect_id: connect_id.to_string(),
            mode: CloseMode::ABORT,
            armed: true,
        }
    }

    /// Set the mode used when this dialog closes
    pub(crate) fn set_mode(&mut self, mode: CloseMode) {
        self.mode = mode;
    }

    /// Hand the dialog to an owner that may outlive the session
    pub(crate) fn detach(mut self, ui: Arc<dyn HardwareUi>) -> OwnedDialog {
        self.armed = false;

        OwnedDialog {
            ui,
            connect_id: std::mem::take(&mut self.connect_id),
            mode: self.mode,
        }
    }
}

impl<'a> Drop for DialogGuard<'a> {
    fn drop(&mut self) {
        if self.armed {
            debug!("Closing dialog for '{}' ({:?})", self.connect_id, self.mode);
            self.ui.close_dialog(&self.connect_id, self.mode);
        }
    }
}

/// Detached hardware dialog, closed exactly once when dropped
pub(crate) struct OwnedDialog {
    ui: Arc<dyn HardwareUi>,
    connect_id: String,
    mode: CloseMode,
}

impl Drop for OwnedDialog {
    fn drop(&mut self) {
        debug!("Closing dialog for '{}' ({:?})", self.connect_id, self.mode);
        self.ui.close_dialog(&self.connect_id, self.mode);
    }
}
