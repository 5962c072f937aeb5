// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Simulated collaborators for hardware wallet onboarding.
//!
//! A [Scenario] describes the devices visible to a [SimTransport], the
//! wallets already held by a [MemoryWalletStore] and the answers given by
//! a [ScriptedUi]. [Sim] wires these into a [ConnectFlow] for tests and the
//! `hw-onboard-sim` CLI.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use hw_onboard::{Collaborators, ConnectFlow, FlowOptions, TrustPolicy};
use hw_onboard_core::CandidateDevice;

mod scenario;
pub use scenario::{Answers, Scenario, SimDevice};

mod transport;
pub use transport::{Calls, SimTransport};

mod store;
pub use store::{MemoryWalletStore, StoreCall, StoredWallet};

mod ui;
pub use ui::{ScriptedUi, UiEvent};

mod telemetry;
pub use telemetry::RecordingTelemetry;

mod listener;
pub use listener::RecordingListener;

/// Lock a mutex, recovering the value where a holder panicked
pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

/// [TrustPolicy] with a fixed answer for all devices
#[derive(Copy, Clone, Debug, Default)]
pub struct FixedPolicy(pub bool);

#[async_trait]
impl TrustPolicy for FixedPolicy {
    async fn requires_verification(&self, _device: &CandidateDevice) -> bool {
        self.0
    }
}

/// Simulated collaborators for a [Scenario]
#[derive(Clone)]
pub struct Sim {
    pub transport: Arc<SimTransport>,
    pub store: Arc<MemoryWalletStore>,
    pub ui: Arc<ScriptedUi>,
    pub telemetry: Arc<RecordingTelemetry>,
    pub policy: FixedPolicy,
}

impl Sim {
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            transport: Arc::new(SimTransport::new(scenario)),
            store: Arc::new(MemoryWalletStore::new(scenario)),
            ui: Arc::new(ScriptedUi::new(scenario.answers)),
            telemetry: Arc::new(RecordingTelemetry::default()),
            policy: FixedPolicy(scenario.requires_verification),
        }
    }

    /// Collaborators for a [ConnectFlow]
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            store: self.store.clone(),
            ui: self.ui.clone(),
            telemetry: self.telemetry.clone(),
            policy: Arc::new(self.policy),
        }
    }

    /// Build a [ConnectFlow] over the simulated transport
    pub fn flow(&self, options: FlowOptions) -> ConnectFlow {
        ConnectFlow::new(self.transport.clone(), self.collaborators(), options)
    }
}
