// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Wallet creation strategy decision tree.
//!
//! The tree is evaluated without IO. Where it needs outside knowledge it
//! returns a [Decision] asking the caller to look up existing wallets or
//! prompt the user, and is re-evaluated once the answer is known.

use strum::{Display, EnumIter, EnumString};

use crate::device::DeviceFeatures;

/// Kind of wallet that may be created on a device
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WalletKind {
    /// Derived from the base seed, no passphrase
    Standard,
    /// Passphrase-derived
    Hidden,
}

/// Answer from the wallet kind chooser
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(ascii_case_insensitive)]
pub enum WalletKindChoice {
    Standard,
    Hidden,
    /// Chooser dismissed
    Cancelled,
}

/// Outcome of strategy resolution, computed once per flow
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumString, EnumIter)]
pub enum WalletCreationStrategy {
    StandardOnly,
    HiddenOnly,
    UserCancelled,
}

impl WalletCreationStrategy {
    /// Wallet kind to create, `None` where the user cancelled
    pub const fn kind(&self) -> Option<WalletKind> {
        match self {
            WalletCreationStrategy::StandardOnly => Some(WalletKind::Standard),
            WalletCreationStrategy::HiddenOnly => Some(WalletKind::Hidden),
            WalletCreationStrategy::UserCancelled => None,
        }
    }

    /// Hidden where passphrase protection is enabled, otherwise standard
    const fn by_passphrase(passphrase_enabled: bool) -> Self {
        match passphrase_enabled {
            true => WalletCreationStrategy::HiddenOnly,
            false => WalletCreationStrategy::StandardOnly,
        }
    }
}

impl From<WalletKindChoice> for WalletCreationStrategy {
    fn from(c: WalletKindChoice) -> Self {
        match c {
            WalletKindChoice::Standard => WalletCreationStrategy::StandardOnly,
            WalletKindChoice::Hidden => WalletCreationStrategy::HiddenOnly,
            WalletKindChoice::Cancelled => WalletCreationStrategy::UserCancelled,
        }
    }
}

/// Unlock / passphrase state relevant to strategy resolution
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct UnlockState {
    pub unlocked: bool,
    pub unlocked_attach_pin: bool,
    pub passphrase_enabled: bool,
}

impl From<&DeviceFeatures> for UnlockState {
    fn from(f: &DeviceFeatures) -> Self {
        Self {
            unlocked: f.unlocked,
            unlocked_attach_pin: f.unlocked_attach_pin,
            passphrase_enabled: f.passphrase_protection,
        }
    }
}

/// Next step of strategy resolution
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Decision {
    /// Strategy resolved
    Resolved(WalletCreationStrategy),
    /// Caller must check whether a standard wallet exists for this device
    CheckStandardWallet,
    /// Caller must ask the user which kind of wallet to create
    PromptWalletKind,
}

impl UnlockState {
    /// Evaluate the decision tree.
    ///
    /// `standard_exists` is `None` until the caller has performed the
    /// lookup requested by [Decision::CheckStandardWallet].
    pub fn decide(&self, standard_exists: Option<bool>) -> Decision {
        #[cfg(feature = "log")]
        log::trace!("decide {:?} (standard exists: {:?})", self, standard_exists);

        // A locked device only yields the primary PIN-protected wallet
        if !self.unlocked {
            return Decision::Resolved(WalletCreationStrategy::StandardOnly);
        }

        if self.unlocked_attach_pin {
            return Decision::Resolved(WalletCreationStrategy::by_passphrase(
                self.passphrase_enabled,
            ));
        }

        match standard_exists {
            None => Decision::CheckStandardWallet,
            Some(true) => Decision::Resolved(WalletCreationStrategy::by_passphrase(
                self.passphrase_enabled,
            )),
            Some(false) if !self.passphrase_enabled => {
                Decision::Resolved(WalletCreationStrategy::StandardOnly)
            }
            Some(false) => Decision::PromptWalletKind,
        }
    }
}
