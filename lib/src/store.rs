// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Wallet store collaborator, owning durable wallet records

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use hw_onboard_core::{CandidateDevice, DeviceFeatures, WalletKind};

/// Identifier of a stored wallet
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct WalletId(pub String);

impl std::fmt::Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wallet created by the store
#[derive(Clone, PartialEq, Debug)]
pub struct WalletRecord {
    pub id: WalletId,
    pub kind: WalletKind,
}

/// Parameters for hardware wallet creation
#[derive(Clone, PartialEq, Debug)]
pub struct CreateWalletParams {
    pub device: CandidateDevice,
    pub features: DeviceFeatures,
    /// Firmware authenticity was verified during onboarding
    pub firmware_verified: bool,
    /// Create as temporary until onboarding completes
    pub default_is_temp: bool,
    /// Onboarding shows its own progress, suppress the store's checking dialog
    pub hide_checking_device_loading: bool,
}

impl CreateWalletParams {
    /// Parameters used for onboarding-created wallets
    pub fn onboarding(device: &CandidateDevice, features: &DeviceFeatures, verified: bool) -> Self {
        Self {
            device: device.clone(),
            features: features.clone(),
            firmware_verified: verified,
            default_is_temp: true,
            hide_checking_device_loading: true,
        }
    }
}

/// Account storage collaborator
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// Check whether a standard (no passphrase) wallet exists for a device
    async fn has_standard_wallet(&self, connect_id: &str) -> anyhow::Result<bool>;

    /// Create the standard wallet for a device
    async fn create_standard_wallet(&self, params: CreateWalletParams) -> anyhow::Result<WalletRecord>;

    /// Create a hidden (passphrase) wallet for a device
    async fn create_hidden_wallet(&self, params: CreateWalletParams) -> anyhow::Result<WalletRecord>;

    /// Mark prior duplicate hardware wallets for this device as deprecated
    async fn mark_deprecated_wallets(&self, connect_id: &str, device_id: &str) -> anyhow::Result<()>;
}
