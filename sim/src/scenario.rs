// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Simulation scenarios, loaded from TOML

use std::path::Path;

use serde::{Deserialize, Serialize};

use hw_onboard::Verification;
use hw_onboard_core::{
    CandidateDevice, DeviceFeatures, ErrorCode, TransportKind, WalletKindChoice,
};

/// Simulated device, as seen by the transport
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimDevice {
    /// Candidate reported on each scan tick
    pub candidate: CandidateDevice,

    /// Features returned on connect
    pub features: DeviceFeatures,

    /// Features returned once unlocked, defaults to `features`
    pub unlocked_features: Option<DeviceFeatures>,

    /// Error returned on connect
    pub connect_error: Option<ErrorCode>,

    /// Error returned when re-querying features with unlock
    pub unlock_error: Option<ErrorCode>,

    /// Delay before connect completes
    pub connect_delay_ms: u64,
}

/// User answers to hardware prompts
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Answers {
    /// Continue (or dismiss) firmware verification
    pub verify: bool,

    /// Whether firmware verification succeeds when continued
    pub verified: bool,

    /// Wallet kind chosen when prompted
    pub wallet_kind: WalletKindChoice,
}

impl Default for Answers {
    fn default() -> Self {
        Self {
            verify: true,
            verified: true,
            wallet_kind: WalletKindChoice::Standard,
        }
    }
}

impl Answers {
    /// Outcome of the firmware verification dialog
    pub fn verification(&self) -> Verification {
        match self.verify {
            true => Verification::Continue {
                verified: self.verified,
            },
            false => Verification::Cancelled,
        }
    }
}

/// Simulation scenario
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Transport devices are discovered on
    pub transport: TransportKind,

    /// Devices visible to the transport
    pub devices: Vec<SimDevice>,

    /// Errors returned by successive scan ticks before devices are listed
    pub scan_errors: Vec<ErrorCode>,

    /// Firmware verification required for all devices
    pub requires_verification: bool,

    /// Connect ids with an existing standard wallet
    pub standard_wallets: Vec<String>,

    /// Wallet creation fails
    pub fail_create: bool,

    /// Delay before wallet creation completes
    pub create_delay_ms: u64,

    /// Marking deprecated wallets fails
    pub fail_deprecate: bool,

    /// User answers to prompts
    pub answers: Answers,
}

impl Scenario {
    /// Parse a scenario from TOML
    pub fn from_toml(s: &str) -> anyhow::Result<Self> {
        let mut v: Scenario = toml::from_str(s)?;

        // Candidates inherit the scenario transport
        for d in &mut v.devices {
            d.candidate.transport = v.transport;
        }

        Ok(v)
    }

    /// Load a scenario from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&s)
    }
}

#[cfg(test)]
mod test {
    use hw_onboard_core::{DeviceType, FirmwareVersion};

    use super::*;

    const SCENARIO: &str = r#"
transport = "ble"
scan_errors = [ "BluetoothOff" ]
requires_verification = true
standard_wallets = [ "c2" ]

[answers]
wallet_kind = "hidden"

[[devices]]
connect_delay_ms = 10

[devices.candidate]
name = "Pro 1"
connect_id = "c1"
uuid = "u1"
device_type = "pro"

[devices.features]
device_id = "d1"
firmware_version = "3.4.0"
unlocked = true

[[devices]]
unlock_error = "MethodCallTimeout"

[devices.candidate]
name = "Classic"
connect_id = "c2"
uuid = "u2"
device_type = "classic"
"#;

    #[test]
    fn parse_scenario() {
        let s = Scenario::from_toml(SCENARIO).unwrap();

        assert_eq!(s.transport, TransportKind::Ble);
        assert_eq!(s.scan_errors, vec![ErrorCode::BluetoothOff]);
        assert!(s.requires_verification);
        assert_eq!(s.answers.wallet_kind, WalletKindChoice::Hidden);
        assert!(s.answers.verify);

        assert_eq!(s.devices.len(), 2);

        let d = &s.devices[0];
        assert_eq!(d.candidate.transport, TransportKind::Ble);
        assert_eq!(d.candidate.device_type, DeviceType::Pro);
        assert_eq!(d.features.firmware_version, Some(FirmwareVersion::new(3, 4, 0)));
        assert!(d.features.initialized);
        assert_eq!(d.connect_delay_ms, 10);

        assert_eq!(s.devices[1].unlock_error, Some(ErrorCode::MethodCallTimeout));
    }
}
