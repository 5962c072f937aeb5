// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transport capability abstraction, implemented once per platform
//! (BLE stack, WebUSB, bridge daemon) and selected at startup.

use std::sync::Arc;

use async_trait::async_trait;

use hw_onboard_core::{CandidateDevice, DeviceFeatures, TransportKind};

use crate::TransportError;

/// Transport used to discover and talk to hardware wallets
#[async_trait]
pub trait Transport: Send + Sync {
    /// Kind of transport (reported in telemetry)
    fn kind(&self) -> TransportKind;

    /// Run one discovery pass, returning all currently visible devices
    async fn search(&self) -> Result<Vec<CandidateDevice>, TransportError>;

    /// Halt any in-progress discovery (best effort)
    async fn stop_search(&self) {}

    /// Connect to a device and fetch its features
    async fn connect(&self, device: &CandidateDevice) -> Result<DeviceFeatures, TransportError>;

    /// Re-fetch features, prompting for on-device PIN entry where required
    async fn features_with_unlock(
        &self,
        device: &CandidateDevice,
    ) -> Result<DeviceFeatures, TransportError>;
}

/// Shared transports are transports
#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn kind(&self) -> TransportKind {
        T::kind(self)
    }

    async fn search(&self) -> Result<Vec<CandidateDevice>, TransportError> {
        T::search(self).await
    }

    async fn stop_search(&self) {
        T::stop_search(self).await
    }

    async fn connect(&self, device: &CandidateDevice) -> Result<DeviceFeatures, TransportError> {
        T::connect(self, device).await
    }

    async fn features_with_unlock(
        &self,
        device: &CandidateDevice,
    ) -> Result<DeviceFeatures, TransportError> {
        T::features_with_unlock(self, device).await
    }
}
