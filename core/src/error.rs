// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transport error taxonomy.
//!
//! Raw transport failures carry an [ErrorCode], [classify_error] maps each
//! code to exactly one [Classification] describing how the flow recovers.

use num_enum::{FromPrimitive, IntoPrimitive};
use strum::{Display, EnumIter, EnumString};

/// Raw error codes reported by transports
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Debug, EnumString, EnumIter, FromPrimitive, IntoPrimitive,
)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum ErrorCode {
    /// Unknown / not-yet defined error (placeholder)
    #[cfg_attr(feature = "thiserror", error("unknown transport error"))]
    #[num_enum(default)]
    Unknown = 0x00,

    /// Vendor bridge daemon is not installed
    #[cfg_attr(feature = "thiserror", error("bridge not installed"))]
    BridgeNotInstalled = 0x01,

    /// Vendor bridge did not respond in time
    #[cfg_attr(feature = "thiserror", error("bridge timeout"))]
    BridgeTimeout = 0x02,

    /// Bluetooth permission not granted
    #[cfg_attr(feature = "thiserror", error("bluetooth permission missing"))]
    BlePermission = 0x10,

    /// Location services disabled (required for BLE scanning on some platforms)
    #[cfg_attr(feature = "thiserror", error("location service disabled"))]
    BleLocationService = 0x11,

    /// Bluetooth adapter turned off
    #[cfg_attr(feature = "thiserror", error("bluetooth turned off"))]
    BluetoothOff = 0x12,

    /// Timeout connecting to device
    #[cfg_attr(feature = "thiserror", error("connect timeout"))]
    ConnectTimeout = 0x20,

    /// Timeout waiting for a device method call
    #[cfg_attr(feature = "thiserror", error("device method call timeout"))]
    MethodCallTimeout = 0x21,

    /// Transport initialisation failed to load
    #[cfg_attr(feature = "thiserror", error("transport init load failed"))]
    InitLoadFailed = 0x30,

    /// Transport initialisation timed out
    #[cfg_attr(feature = "thiserror", error("transport init timeout"))]
    InitTimeout = 0x31,

    /// Device firmware must be upgraded before use
    #[cfg_attr(feature = "thiserror", error("firmware upgrade required"))]
    FirmwareUpgradeRequired = 0x40,
}

/// Error categories, see [classify_error]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, EnumString, EnumIter)]
pub enum Category {
    BridgeMissing,
    BluetoothPermissionMissing,
    BluetoothDisabled,
    BluetoothLocationServiceDisabled,
    ConnectTimeout,
    MethodCallTimeout,
    TransportInitFailure,
    Unclassified,
}

/// Action required to recover from a classified error
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Display, EnumString, EnumIter)]
pub enum RecoveryAction {
    /// Prompt installation of the vendor bridge
    InstallBridge,
    /// Prompt for the OS bluetooth permission
    GrantBluetoothPermission,
    /// Prompt to enable bluetooth
    EnableBluetooth,
    /// Prompt to enable location services
    EnableLocationService,
    /// Nothing to show, scanning resumes
    ResumeScanning,
    /// Surface a generic connectivity error
    ReportConnectivityError,
    /// Surface a generic error
    ReportError,
}

/// Classification of a raw transport error
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Classification {
    pub category: Category,
    pub recovery: RecoveryAction,
    pub retryable: bool,
    /// The transport layer already presented this error to the user
    pub surfaced_upstream: bool,
}

impl Classification {
    const fn new(category: Category, recovery: RecoveryAction, retryable: bool) -> Self {
        Self {
            category,
            recovery,
            retryable,
            surfaced_upstream: false,
        }
    }

    const fn surfaced(mut self) -> Self {
        self.surfaced_upstream = true;
        self
    }

    /// Scanning recovers without user involvement
    pub const fn is_automatic(&self) -> bool {
        matches!(self.recovery, RecoveryAction::ResumeScanning)
    }
}

/// Map a raw [ErrorCode] to its [Classification]
pub const fn classify_error(code: ErrorCode) -> Classification {
    use Category::*;
    use RecoveryAction::*;

    match code {
        ErrorCode::BridgeNotInstalled => Classification::new(BridgeMissing, InstallBridge, false),
        ErrorCode::BlePermission => {
            Classification::new(BluetoothPermissionMissing, GrantBluetoothPermission, false)
                .surfaced()
        }
        ErrorCode::BluetoothOff => Classification::new(BluetoothDisabled, EnableBluetooth, false),
        ErrorCode::BleLocationService => Classification::new(
            BluetoothLocationServiceDisabled,
            EnableLocationService,
            false,
        )
        .surfaced(),
        ErrorCode::ConnectTimeout | ErrorCode::BridgeTimeout => {
            Classification::new(Category::ConnectTimeout, ResumeScanning, true)
        }
        ErrorCode::MethodCallTimeout => {
            Classification::new(Category::MethodCallTimeout, ResumeScanning, true)
        }
        ErrorCode::InitLoadFailed | ErrorCode::InitTimeout => {
            Classification::new(TransportInitFailure, ReportConnectivityError, true)
        }
        ErrorCode::FirmwareUpgradeRequired => {
            Classification::new(Unclassified, ReportError, true).surfaced()
        }
        ErrorCode::Unknown => Classification::new(Unclassified, ReportError, true),
    }
}
