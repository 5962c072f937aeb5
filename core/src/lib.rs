// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Hardware wallet onboarding decisions.
//!
//! This crate holds the synchronous, IO-free parts of connecting a hardware
//! wallet: the [device] data model, [mode] classification, the wallet
//! [strategy] decision tree and the transport [error] taxonomy.
//!
//! Async orchestration over real transports lives in the `hw-onboard` crate,
//! which drives these decisions and performs the lookups / prompts they ask for.

pub mod device;
pub use device::{
    CandidateDevice, DeviceFeatures, DeviceType, FirmwareVersion, TransportKind,
};

pub mod mode;
pub use mode::{classify, firmware_present, DeviceMode};

pub mod strategy;
pub use strategy::{Decision, UnlockState, WalletCreationStrategy, WalletKind, WalletKindChoice};

pub mod error;
pub use error::{classify_error, Category, Classification, ErrorCode, RecoveryAction};

mod sort;
pub use sort::{natural_cmp, sort_candidates};
