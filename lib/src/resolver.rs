// Copyright (c) 2022-2023 The MobileCoin Foundation

use log::debug;

use hw_onboard_core::{CandidateDevice, Decision, DeviceFeatures, UnlockState, WalletCreationStrategy};

use crate::{ui::HardwareUi, Error, WalletStore};

/// Resolve which kind of wallet may be created for a device.
///
/// Drives [UnlockState::decide], performing the wallet lookup and (at most
/// one) chooser prompt it asks for.
pub async fn resolve_strategy(
    features: &DeviceFeatures,
    device: &CandidateDevice,
    store: &dyn WalletStore,
    ui: &dyn HardwareUi,
) -> Result<WalletCreationStrategy, Error> {
    let state = UnlockState::from(features);
    let mut standard_exists = None;

    loop {
        match state.decide(standard_exists) {
            Decision::Resolved(s) => {
                debug!("Resolved strategy {} for {:?}", s, state);
                return Ok(s);
            }
            Decision::CheckStandardWallet => {
                let exists = store.has_standard_wallet(device.connect_id()).await?;
                debug!("Standard wallet exists: {}", exists);

                standard_exists = Some(exists);
            }
            Decision::PromptWalletKind => {
                let choice = ui.choose_wallet_kind().await;
                debug!("Wallet kind chosen: {}", choice);

                return Ok(choice.into());
            }
        }
    }
}
