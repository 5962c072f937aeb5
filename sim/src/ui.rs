// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Scripted hardware UI, answering prompts from a scenario and recording
//! every interaction

use std::sync::Mutex;

use async_trait::async_trait;
use log::{debug, info, warn};

use hw_onboard::{CloseMode, Error, Handoff, HardwareUi, TransportError, Verification};
use hw_onboard_core::{CandidateDevice, DeviceFeatures, RecoveryAction, WalletKindChoice};

use crate::{lock, Answers};

/// Interaction recorded by [ScriptedUi]
#[derive(Clone, PartialEq, Debug)]
pub enum UiEvent {
    CheckingDevice(String),
    Processing(String),
    CloseDialog(String, CloseMode),
    Finalizing,
    RevertFinalizing,
    Error(String),
    Recovery(RecoveryAction),
    Handoff(Handoff),
    VerifyFirmware(String),
    ChooseWalletKind,
}

/// UI answering prompts with fixed [Answers]
#[derive(Debug, Default)]
pub struct ScriptedUi {
    answers: Answers,
    events: Mutex<Vec<UiEvent>>,
}

impl ScriptedUi {
    pub fn new(answers: Answers) -> Self {
        Self {
            answers,
            events: Mutex::new(vec![]),
        }
    }

    /// Recorded interactions, in order
    pub fn events(&self) -> Vec<UiEvent> {
        lock(&self.events).clone()
    }

    /// Count recorded interactions matching a filter
    pub fn count(&self, f: impl Fn(&UiEvent) -> bool) -> usize {
        lock(&self.events).iter().filter(|e| f(e)).count()
    }

    fn push(&self, e: UiEvent) {
        debug!("UI: {:?}", e);
        lock(&self.events).push(e);
    }
}

#[async_trait]
impl HardwareUi for ScriptedUi {
    fn show_checking_device(&self, connect_id: &str) {
        self.push(UiEvent::CheckingDevice(connect_id.to_string()));
    }

    fn show_processing(&self, connect_id: &str) {
        self.push(UiEvent::Processing(connect_id.to_string()));
    }

    fn close_dialog(&self, connect_id: &str, mode: CloseMode) {
        self.push(UiEvent::CloseDialog(connect_id.to_string(), mode));
    }

    fn show_finalizing(&self) {
        self.push(UiEvent::Finalizing);
    }

    fn revert_finalizing(&self) {
        self.push(UiEvent::RevertFinalizing);
    }

    fn report_error(&self, error: &Error) {
        warn!("Error: {}", error);
        self.push(UiEvent::Error(error.to_string()));
    }

    fn show_recovery(&self, action: RecoveryAction, error: &TransportError) {
        warn!("Recovery required: {} ({})", action, error);
        self.push(UiEvent::Recovery(action));
    }

    fn handoff(&self, handoff: &Handoff) {
        info!("Handoff: {:?}", handoff);
        self.push(UiEvent::Handoff(handoff.clone()));
    }

    async fn verify_firmware(
        &self,
        device: &CandidateDevice,
        _features: &DeviceFeatures,
    ) -> Verification {
        self.push(UiEvent::VerifyFirmware(device.connect_id().to_string()));
        self.answers.verification()
    }

    async fn choose_wallet_kind(&self) -> WalletKindChoice {
        self.push(UiEvent::ChooseWalletKind);
        self.answers.wallet_kind
    }
}
