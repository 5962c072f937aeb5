// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Connection flow, from device selection to a provisioned wallet.
//!
//! A [ConnectFlow] owns the scanner and at most one open
//! [ConnectionSession]. Selecting a device stops scanning, connects,
//! classifies the device, runs the [FirmwareGate], resolves the wallet
//! strategy and provisions the wallet. Scanning resumes unless the flow
//! ends by leaving the screen (a created wallet or device activation).

use std::sync::{atomic::AtomicBool, Arc};

use log::{debug, error};
use tokio::sync::Mutex;

use hw_onboard_core::{
    classify, firmware_present, CandidateDevice, Classification, DeviceFeatures, DeviceMode,
    DeviceType,
};

use crate::{
    gate::{FirmwareGate, TrustPolicy, Verification},
    provisioner::{InFlight, Provisioner},
    resolver::resolve_strategy,
    scanner::{ScanListener, ScanState, Scanner},
    session::ConnectionSession,
    telemetry::{AddWalletStarted, Status, Telemetry, WalletAdded},
    ui::{Handoff, HardwareUi},
    Error, FlowOptions, Transport, TransportError, WalletId, WalletStore,
};

/// How a connection flow ended
#[derive(Clone, PartialEq, Debug)]
pub enum FlowOutcome {
    /// Wallet created
    Provisioned(WalletId),
    /// Control handed to another screen
    Handoff(Handoff),
    /// User dismissed firmware verification
    VerificationCancelled,
    /// User dismissed the wallet kind chooser
    WalletKindCancelled,
}

impl FlowOutcome {
    /// Whether the flow navigated away from the connection screen
    pub fn leaves_screen(&self) -> bool {
        match self {
            FlowOutcome::Provisioned(_) => true,
            FlowOutcome::Handoff(h) => h.leaves_screen(),
            _ => false,
        }
    }
}

/// Collaborators used by a [ConnectFlow]
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn WalletStore>,
    pub ui: Arc<dyn HardwareUi>,
    pub telemetry: Arc<dyn Telemetry>,
    pub policy: Arc<dyn TrustPolicy>,
}

/// Hardware wallet connection flow instance
pub struct ConnectFlow {
    transport: Arc<dyn Transport>,
    store: Arc<dyn WalletStore>,
    ui: Arc<dyn HardwareUi>,
    telemetry: Arc<dyn Telemetry>,
    policy: Arc<dyn TrustPolicy>,

    options: FlowOptions,

    scanner: Mutex<Scanner>,
    session_open: Arc<AtomicBool>,
    provisioner: Provisioner,
}

impl ConnectFlow {
    /// Create a new flow over the provided transport
    pub fn new(
        transport: impl Transport + 'static,
        collaborators: Collaborators,
        options: FlowOptions,
    ) -> Self {
        let transport: Arc<dyn Transport> = Arc::new(transport);
        let Collaborators {
            store,
            ui,
            telemetry,
            policy,
        } = collaborators;

        Self {
            scanner: Mutex::new(Scanner::new(transport.clone(), options.scan_interval())),
            provisioner: Provisioner::new(
                store.clone(),
                ui.clone(),
                telemetry.clone(),
                options.software_wallet_only_user,
            ),
            session_open: Arc::new(AtomicBool::new(false)),
            transport,
            store,
            ui,
            telemetry,
            policy,
            options,
        }
    }

    /// Start listing devices.
    ///
    /// Scan errors requiring user action are presented via
    /// [HardwareUi::show_recovery] before reaching `listener`.
    pub async fn start_listing(&self, listener: Arc<dyn ScanListener>) -> bool {
        let listener = Arc::new(RecoveryListener {
            inner: listener,
            ui: self.ui.clone(),
        });

        self.scanner.lock().await.start(listener)
    }

    /// Stop listing devices
    pub async fn stop_listing(&self) {
        self.scanner.lock().await.stop().await
    }

    /// Check whether device scanning is running
    pub async fn is_scanning(&self) -> bool {
        self.scanner.lock().await.is_running()
    }

    /// Update focus of the hosting screen
    pub async fn set_focused(&self, focused: bool) {
        self.scanner.lock().await.set_focused(focused).await
    }

    /// Run the flow for a selected device.
    ///
    /// Duplicate selections while a session is open are rejected with
    /// [Error::Busy] rather than queued.
    pub async fn select(&self, device: CandidateDevice) -> Result<FlowOutcome, Error> {
        self.telemetry.add_wallet_started(&AddWalletStarted::new(
            &device,
            self.options.software_wallet_only_user,
        ));

        if device.device_type == DeviceType::Unknown {
            let e = Error::UnknownDevice;
            self.ui.report_error(&e);
            return Err(e);
        }

        let _session_slot = match InFlight::acquire(&self.session_open) {
            Some(v) => v,
            None => {
                debug!("Session already open, ignoring selection of: {}", device);
                return Err(Error::Busy);
            }
        };

        // Scanning and an active session never overlap
        self.scanner.lock().await.stop().await;

        let r = self.run(device).await;

        match &r {
            Ok(o) if o.leaves_screen() => debug!("Flow complete: {:?}", o),
            Ok(o) => {
                debug!("Flow ended: {:?}, resuming scan", o);
                self.scanner.lock().await.resume();
            }
            Err(e) => {
                error!("Flow failed: {}, resuming scan", e);
                self.scanner.lock().await.resume();
            }
        }

        r
    }

    async fn run(&self, device: CandidateDevice) -> Result<FlowOutcome, Error> {
        let mut session =
            ConnectionSession::open(&*self.transport, &*self.ui, device, &self.options);

        // Devices advertising bootloader mode are not connected
        if session.device().bootloader_mode {
            return Ok(self.handoff(Handoff::FirmwareRecovery {
                connect_id: session.device().connect_id().to_string(),
                firmware_present: firmware_present(None, session.device()),
            }));
        }

        let features = match session.connect().await {
            Some(f) => f,
            None => {
                self.track(Status::Failure, session.device(), None);
                return Err(Error::ConnectFailed);
            }
        };

        let device_type = features.resolve_device_type(session.device());
        let mode = classify(&features, session.device());

        debug!("Device {} in mode: {}", device_type, mode);

        match mode {
            DeviceMode::Bootloader => {
                return Ok(self.handoff(Handoff::FirmwareRecovery {
                    connect_id: session.device().connect_id().to_string(),
                    firmware_present: firmware_present(Some(&features), session.device()),
                }));
            }
            DeviceMode::BackupMode => {
                self.track(Status::Failure, session.device(), Some(&features));
                return Ok(self.handoff(Handoff::BackupMode { device_type }));
            }
            DeviceMode::NotInitialized => {
                return Ok(self.handoff(Handoff::ActivateDevice { device_type }));
            }
            DeviceMode::Normal => (),
        }

        let verified = match FirmwareGate::new(&*self.policy, &*self.ui)
            .run(&mut session, &features)
            .await
        {
            Verification::Continue { verified } => verified,
            Verification::Cancelled => return Ok(FlowOutcome::VerificationCancelled),
        };

        session.acquire_processing_dialog();

        let features = session.features_with_unlock().await?;

        let strategy =
            resolve_strategy(&features, session.device(), &*self.store, &*self.ui).await?;

        match self
            .provisioner
            .provision(&mut session, strategy, &features, verified)
            .await?
        {
            Some(id) => Ok(FlowOutcome::Provisioned(id)),
            None => Ok(FlowOutcome::WalletKindCancelled),
        }
    }

    fn handoff(&self, handoff: Handoff) -> FlowOutcome {
        debug!("Handing off: {:?}", handoff);
        self.ui.handoff(&handoff);
        FlowOutcome::Handoff(handoff)
    }

    fn track(&self, status: Status, device: &CandidateDevice, features: Option<&DeviceFeatures>) {
        self.telemetry.wallet_added(&WalletAdded::new(
            status,
            device,
            features,
            self.options.software_wallet_only_user,
        ));
    }
}

/// Presents recovery actions for scan errors the transport did not surface
struct RecoveryListener {
    inner: Arc<dyn ScanListener>,
    ui: Arc<dyn HardwareUi>,
}

impl ScanListener for RecoveryListener {
    fn devices(&self, devices: Vec<CandidateDevice>) {
        self.inner.devices(devices)
    }

    fn state(&self, state: ScanState) {
        self.inner.state(state)
    }

    fn error(&self, error: &TransportError, classification: Classification) {
        if !classification.surfaced_upstream {
            self.ui.show_recovery(classification.recovery, error);
        }

        self.inner.error(error, classification)
    }
}
