// Copyright (c) 2022-2023 The MobileCoin Foundation

//! In-memory wallet store

use std::{sync::Mutex, time::Duration};

use anyhow::anyhow;
use async_trait::async_trait;
use log::debug;

use hw_onboard::{CreateWalletParams, WalletId, WalletRecord, WalletStore};
use hw_onboard_core::WalletKind;

use crate::{lock, Scenario};

/// Wallet held by a [MemoryWalletStore]
#[derive(Clone, PartialEq, Debug)]
pub struct StoredWallet {
    pub record: WalletRecord,
    pub connect_id: String,
    pub params: CreateWalletParams,
}

/// Calls made against a [MemoryWalletStore]
#[derive(Clone, PartialEq, Debug)]
pub enum StoreCall {
    HasStandardWallet { connect_id: String },
    Create { kind: WalletKind, connect_id: String },
    MarkDeprecated { connect_id: String, device_id: String },
}

/// Wallet store keeping records in memory
#[derive(Debug, Default)]
pub struct MemoryWalletStore {
    standard: Vec<String>,
    fail_create: bool,
    create_delay: Duration,
    fail_deprecate: bool,
    wallets: Mutex<Vec<StoredWallet>>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryWalletStore {
    /// Create a store seeded from the provided scenario
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            standard: scenario.standard_wallets.clone(),
            fail_create: scenario.fail_create,
            create_delay: Duration::from_millis(scenario.create_delay_ms),
            fail_deprecate: scenario.fail_deprecate,
            ..Default::default()
        }
    }

    /// Wallets created through this store
    pub fn wallets(&self) -> Vec<StoredWallet> {
        lock(&self.wallets).clone()
    }

    /// Calls made against this store, in order
    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: StoreCall) {
        debug!("Store call: {:?}", call);
        lock(&self.calls).push(call);
    }

    async fn create(
        &self,
        kind: WalletKind,
        params: CreateWalletParams,
    ) -> anyhow::Result<WalletRecord> {
        let connect_id = params.device.connect_id().to_string();

        self.record(StoreCall::Create {
            kind,
            connect_id: connect_id.clone(),
        });

        if !self.create_delay.is_zero() {
            tokio::time::sleep(self.create_delay).await;
        }

        if self.fail_create {
            return Err(anyhow!("simulated wallet creation failure"));
        }

        let mut wallets = lock(&self.wallets);

        let record = WalletRecord {
            id: WalletId(format!("hw-{}-{}", connect_id, wallets.len())),
            kind,
        };

        wallets.push(StoredWallet {
            record: record.clone(),
            connect_id,
            params,
        });

        Ok(record)
    }
}

#[async_trait]
impl WalletStore for MemoryWalletStore {
    async fn has_standard_wallet(&self, connect_id: &str) -> anyhow::Result<bool> {
        self.record(StoreCall::HasStandardWallet {
            connect_id: connect_id.to_string(),
        });

        let created = lock(&self.wallets)
            .iter()
            .any(|w| w.connect_id == connect_id && w.record.kind == WalletKind::Standard);

        Ok(created || self.standard.iter().any(|c| c == connect_id))
    }

    async fn create_standard_wallet(
        &self,
        params: CreateWalletParams,
    ) -> anyhow::Result<WalletRecord> {
        self.create(WalletKind::Standard, params).await
    }

    async fn create_hidden_wallet(&self, params: CreateWalletParams) -> anyhow::Result<WalletRecord> {
        self.create(WalletKind::Hidden, params).await
    }

    async fn mark_deprecated_wallets(&self, connect_id: &str, device_id: &str) -> anyhow::Result<()> {
        self.record(StoreCall::MarkDeprecated {
            connect_id: connect_id.to_string(),
            device_id: device_id.to_string(),
        });

        match self.fail_deprecate {
            true => Err(anyhow!("simulated deprecation failure")),
            false => Ok(()),
        }
    }
}
