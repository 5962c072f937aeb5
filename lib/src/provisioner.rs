// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Wallet provisioner.
//!
//! Creates exactly one wallet per resolved strategy. Once started,
//! provisioning runs on its own task through to completion or failure.
//! Dropping the caller does not abort the write and does not leave
//! transient UI state behind.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use log::{debug, error, warn};

use hw_onboard_core::{CandidateDevice, DeviceFeatures, WalletCreationStrategy, WalletKind};

use crate::{
    session::ConnectionSession,
    telemetry::{Status, Telemetry, WalletAdded},
    ui::{CloseMode, HardwareUi, OwnedDialog},
    CreateWalletParams, Error, WalletId, WalletStore,
};

/// Single in-flight marker, cleared on drop
pub(crate) struct InFlight(Arc<AtomicBool>);

impl InFlight {
    /// Acquire the marker, returning `None` where it is already held
    pub(crate) fn acquire(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Wallet provisioner, one per flow instance
pub struct Provisioner {
    store: Arc<dyn WalletStore>,
    ui: Arc<dyn HardwareUi>,
    telemetry: Arc<dyn Telemetry>,
    software_wallet_only_user: bool,
    in_flight: Arc<AtomicBool>,
}

impl Provisioner {
    pub fn new(
        store: Arc<dyn WalletStore>,
        ui: Arc<dyn HardwareUi>,
        telemetry: Arc<dyn Telemetry>,
        software_wallet_only_user: bool,
    ) -> Self {
        Self {
            store,
            ui,
            telemetry,
            software_wallet_only_user,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check whether provisioning is currently running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Provision a wallet for the session's device.
    ///
    /// Returns `Ok(None)` without side effects for [WalletCreationStrategy::UserCancelled],
    /// and [Error::ProvisionInFlight] where another call is outstanding.
    ///
    /// The write runs on a spawned task holding the session's dialog.
    /// If the returned future is dropped the task still completes and
    /// closes the dialog last.
    pub async fn provision(
        &self,
        session: &mut ConnectionSession<'_>,
        strategy: WalletCreationStrategy,
        features: &DeviceFeatures,
        verified: bool,
    ) -> Result<Option<WalletId>, Error> {
        let kind = match strategy.kind() {
            Some(k) => k,
            None => {
                debug!("Wallet creation cancelled by user");
                return Ok(None);
            }
        };

        let in_flight = match InFlight::acquire(&self.in_flight) {
            Some(v) => v,
            None => {
                debug!("Provisioning already in flight, ignoring");
                return Err(Error::ProvisionInFlight);
            }
        };

        let dialog = session
            .take_dialog(CloseMode::FINAL)
            .map(|d| d.detach(self.ui.clone()));

        let job = Provision {
            store: self.store.clone(),
            ui: self.ui.clone(),
            telemetry: self.telemetry.clone(),
            software_wallet_only_user: self.software_wallet_only_user,
            kind,
            device: session.device().clone(),
            features: features.clone(),
            verified,
        };

        let task = tokio::spawn(async move {
            // Dropped in reverse order, dialog closes after the marker clears
            let _dialog = dialog;
            let _in_flight = in_flight;

            job.run().await
        });

        match task.await {
            Ok(r) => r.map(Some),
            Err(e) => {
                error!("Provisioning task failed: {}", e);
                Err(Error::Store(e.into()))
            }
        }
    }
}

/// Provisioning job, owned by the spawned task
struct Provision {
    store: Arc<dyn WalletStore>,
    ui: Arc<dyn HardwareUi>,
    telemetry: Arc<dyn Telemetry>,
    software_wallet_only_user: bool,

    kind: WalletKind,
    device: CandidateDevice,
    features: DeviceFeatures,
    verified: bool,
}

impl Provision {
    async fn run(self) -> Result<WalletId, Error> {
        let device = &self.device;
        let features = &self.features;

        self.ui.show_finalizing();

        let params = CreateWalletParams::onboarding(device, features, self.verified);

        debug!("Creating {} wallet for: {}", self.kind, device);

        let r = match self.kind {
            WalletKind::Standard => self.store.create_standard_wallet(params).await,
            WalletKind::Hidden => self.store.create_hidden_wallet(params).await,
        };

        match r {
            Ok(record) => {
                debug!("Created wallet: {}", record.id);

                let device_id = features.resolve_device_id(device);
                if let Err(e) = self
                    .store
                    .mark_deprecated_wallets(device.connect_id(), device_id)
                    .await
                {
                    warn!("Failed to mark deprecated wallets: {:?}", e);
                }

                self.track(Status::Success);

                Ok(record.id)
            }
            Err(e) => {
                error!("Wallet creation failed: {:?}", e);

                self.ui.revert_finalizing();
                self.track(Status::Failure);

                Err(Error::Store(e))
            }
        }
    }

    fn track(&self, status: Status) {
        self.telemetry.wallet_added(&WalletAdded::new(
            status,
            &self.device,
            Some(&self.features),
            self.software_wallet_only_user,
        ));
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn in_flight_marker() {
        let f = Arc::new(AtomicBool::new(false));

        let a = InFlight::acquire(&f);
        assert!(a.is_some());
        assert!(InFlight::acquire(&f).is_none());

        drop(a);
        assert!(InFlight::acquire(&f).is_some());
    }
}
