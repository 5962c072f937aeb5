// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Hardware wallet onboarding library
//!
//! Takes a transport-discovered device through connection, mode
//! classification and optional firmware verification, resolves which kind
//! of wallet may be created and provisions exactly one wallet.
//!
//! Platform transports implement [Transport], host applications provide
//! the [WalletStore], [HardwareUi], [Telemetry] and [TrustPolicy]
//! collaborators and drive a [ConnectFlow].

/// Re-export `hw-onboard-core` for consumers
pub use hw_onboard_core;

mod transport;
pub use transport::Transport;

mod error;
pub use error::{Error, TransportError};

mod config;
pub use config::FlowOptions;

pub mod scanner;
pub use scanner::{ScanListener, ScanState, Scanner};

pub mod session;
pub use session::ConnectionSession;

pub mod gate;
pub use gate::{FirmwareGate, NoVerification, TrustPolicy, Verification};

mod resolver;
pub use resolver::resolve_strategy;

pub mod provisioner;
pub use provisioner::Provisioner;

pub mod store;
pub use store::{CreateWalletParams, WalletId, WalletRecord, WalletStore};

pub mod ui;
pub use ui::{CloseMode, Handoff, HardwareUi};

pub mod telemetry;
pub use telemetry::{LogTelemetry, Telemetry};

mod flow;
pub use flow::{Collaborators, ConnectFlow, FlowOutcome};
