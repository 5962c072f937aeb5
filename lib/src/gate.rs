// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Firmware trust gate.
//!
//! Where the [TrustPolicy] requires it, the flow suspends on the firmware
//! verification dialog until the user continues or dismisses it. There is
//! no timeout. The gate runs at most once per [ConnectionSession].

use async_trait::async_trait;
use log::debug;

use hw_onboard_core::{CandidateDevice, DeviceFeatures};

use crate::{
    session::ConnectionSession,
    ui::{CloseMode, HardwareUi},
};

/// Result of the firmware verification step
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Verification {
    /// Continue onboarding, carrying whether firmware was verified
    Continue { verified: bool },
    /// User dismissed verification, the flow ends
    Cancelled,
}

/// Decides whether firmware authenticity must be verified for a device
#[async_trait]
pub trait TrustPolicy: Send + Sync {
    async fn requires_verification(&self, device: &CandidateDevice) -> bool;
}

/// [TrustPolicy] that never requires verification
#[derive(Copy, Clone, Debug, Default)]
pub struct NoVerification;

#[async_trait]
impl TrustPolicy for NoVerification {
    async fn requires_verification(&self, _device: &CandidateDevice) -> bool {
        false
    }
}

/// Firmware trust gate
pub struct FirmwareGate<'a> {
    policy: &'a dyn TrustPolicy,
    ui: &'a dyn HardwareUi,
}

impl<'a> FirmwareGate<'a> {
    pub fn new(policy: &'a dyn TrustPolicy, ui: &'a dyn HardwareUi) -> Self {
        Self { policy, ui }
    }

    /// Run the gate for a session.
    ///
    /// Repeat calls on the same session return the first outcome without
    /// consulting the policy or the user again.
    pub async fn run(
        &self,
        session: &mut ConnectionSession<'_>,
        features: &DeviceFeatures,
    ) -> Verification {
        if let Some(v) = session.verification {
            debug!("Firmware gate already ran: {:?}", v);
            return v;
        }

        let v = match self.policy.requires_verification(session.device()).await {
            true => {
                debug!("Firmware verification required");

                // Verification dialog replaces the checking device dialog
                session.release_dialog(CloseMode::SOFT);

                self.ui.verify_firmware(session.device(), features).await
            }
            false => Verification::Continue { verified: false },
        };

        debug!("Firmware gate: {:?}", v);

        session.verification = Some(v);
        v
    }
}
