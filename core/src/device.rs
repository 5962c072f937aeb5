// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Device data model: transport-reported candidates and queried features

use core::{fmt, str::FromStr};

use strum::{Display, EnumIter, EnumString};

/// Physical / link-layer channel used to reach a device
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum TransportKind {
    /// Bluetooth LE
    Ble,
    /// USB via WebUSB
    WebUsb,
    /// USB via the vendor bridge daemon
    #[default]
    Bridge,
}

impl TransportKind {
    /// Communication name reported in telemetry events
    pub const fn communication(&self) -> &'static str {
        match self {
            TransportKind::Ble => "Bluetooth",
            TransportKind::WebUsb => "WebUSB",
            TransportKind::Bridge => "USB",
        }
    }
}

/// Raw hardware model reported by the transport or device features
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, Display, EnumString, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum DeviceType {
    Classic,
    Classic1s,
    Mini,
    Touch,
    Pro,
    #[default]
    Unknown,
}

/// Device identity reported by a transport scan, not yet connected.
///
/// Candidates are rebuilt on every scan tick and must not be reused
/// once scanning stops or a session begins.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CandidateDevice {
    /// Display name (advertised BLE name or USB product string)
    pub name: Option<String>,
    /// Transport connect identifier
    pub connect_id: Option<String>,
    /// Device serial identifier, where the transport exposes it
    pub device_id: Option<String>,
    /// Transport-local unique identifier
    pub uuid: String,
    /// Transport the device was discovered on
    pub transport: TransportKind,
    /// Raw device type as advertised
    pub device_type: DeviceType,
    /// Device advertised itself in bootloader mode
    pub bootloader_mode: bool,
    /// Whether firmware is installed, when the transport can tell
    pub firmware_present: Option<bool>,
}

/// Treat empty strings like missing values when picking identifiers
fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.is_empty())
}

impl CandidateDevice {
    /// Key used to order candidate lists: name, else connect id, else device id, else uuid
    pub fn sort_key(&self) -> &str {
        non_empty(&self.name)
            .or_else(|| non_empty(&self.connect_id))
            .or_else(|| non_empty(&self.device_id))
            .unwrap_or(&self.uuid)
    }

    /// Connect identifier, empty where the transport did not report one
    pub fn connect_id(&self) -> &str {
        self.connect_id.as_deref().unwrap_or("")
    }
}

impl fmt::Display for CandidateDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:16} ({}, {}, {})",
            self.sort_key(),
            self.transport.communication(),
            self.device_type,
            self.connect_id.as_deref().unwrap_or("UNKNOWN"),
        )
    }
}

/// Snapshot of device state, queried once per connection attempt.
///
/// Never cached across sessions.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeviceFeatures {
    pub device_id: Option<String>,
    pub device_type: DeviceType,
    pub label: Option<String>,
    pub firmware_version: Option<FirmwareVersion>,

    /// Device is running its bootloader
    pub bootloader_mode: bool,
    /// Firmware is installed (only meaningful in bootloader mode)
    pub firmware_present: Option<bool>,
    /// Device has a seed
    pub initialized: bool,
    /// Device is in backup-only mode
    pub no_backup: bool,

    /// Main PIN has been entered
    pub unlocked: bool,
    /// Unlocked via attach-PIN, entering a passphrase wallet directly
    pub unlocked_attach_pin: bool,
    /// Passphrase protection is enabled
    pub passphrase_protection: bool,
}

impl Default for DeviceFeatures {
    fn default() -> Self {
        Self {
            device_id: None,
            device_type: DeviceType::Unknown,
            label: None,
            firmware_version: None,
            bootloader_mode: false,
            firmware_present: None,
            initialized: true,
            no_backup: false,
            unlocked: false,
            unlocked_attach_pin: false,
            passphrase_protection: false,
        }
    }
}

impl DeviceFeatures {
    /// Device type from features, falling back to the candidate's advertised type
    pub fn resolve_device_type(&self, candidate: &CandidateDevice) -> DeviceType {
        match self.device_type {
            DeviceType::Unknown => candidate.device_type,
            t => t,
        }
    }

    /// Device identifier for housekeeping, preferring features over the candidate
    pub fn resolve_device_id<'a>(&'a self, candidate: &'a CandidateDevice) -> &'a str {
        non_empty(&self.device_id)
            .or_else(|| non_empty(&candidate.device_id))
            .unwrap_or("")
    }
}

/// Firmware version triple
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct FirmwareVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl FirmwareVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Firmware version string was not of the form `major.minor.patch`
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[cfg_attr(feature = "thiserror", error("invalid firmware version '{0}'"))]
pub struct InvalidVersion(pub String);

impl FromStr for FirmwareVersion {
    type Err = InvalidVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('.').map(u32::from_str);

        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(Ok(major)), Some(Ok(minor)), Some(Ok(patch)), None) => {
                Ok(Self::new(major, minor, patch))
            }
            _ => Err(InvalidVersion(s.to_string())),
        }
    }
}

impl TryFrom<String> for FirmwareVersion {
    type Error = InvalidVersion;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<FirmwareVersion> for String {
    fn from(v: FirmwareVersion) -> Self {
        v.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sort_key_fallbacks() {
        let mut d = CandidateDevice {
            uuid: "uuid-1".to_string(),
            ..Default::default()
        };
        assert_eq!(d.sort_key(), "uuid-1");

        d.device_id = Some("dev".to_string());
        assert_eq!(d.sort_key(), "dev");

        d.connect_id = Some(String::new());
        assert_eq!(d.sort_key(), "dev");

        d.connect_id = Some("conn".to_string());
        d.name = Some("Pro 7A".to_string());
        assert_eq!(d.sort_key(), "Pro 7A");
    }

    #[test]
    fn device_type_fallback() {
        let c = CandidateDevice {
            device_type: DeviceType::Touch,
            ..Default::default()
        };

        let mut f = DeviceFeatures::default();
        assert_eq!(f.resolve_device_type(&c), DeviceType::Touch);

        f.device_type = DeviceType::Pro;
        assert_eq!(f.resolve_device_type(&c), DeviceType::Pro);
    }

    #[test]
    fn device_id_fallback() {
        let mut c = CandidateDevice::default();
        let mut f = DeviceFeatures::default();
        assert_eq!(f.resolve_device_id(&c), "");

        c.device_id = Some("from-scan".to_string());
        assert_eq!(f.resolve_device_id(&c), "from-scan");

        f.device_id = Some("from-features".to_string());
        assert_eq!(f.resolve_device_id(&c), "from-features");
    }

    #[test]
    fn firmware_version_parse() {
        assert_eq!(
            "4.10.1".parse::<FirmwareVersion>(),
            Ok(FirmwareVersion::new(4, 10, 1))
        );
        assert_eq!(FirmwareVersion::new(3, 0, 12).to_string(), "3.0.12");

        assert!("4.10".parse::<FirmwareVersion>().is_err());
        assert!("4.10.1.2".parse::<FirmwareVersion>().is_err());
        assert!("a.b.c".parse::<FirmwareVersion>().is_err());

        #[cfg(feature = "thiserror")]
        assert_eq!(
            "4.10".parse::<FirmwareVersion>().unwrap_err().to_string(),
            "invalid firmware version '4.10'"
        );
    }

    #[test]
    fn communication_names() {
        assert_eq!(TransportKind::Ble.communication(), "Bluetooth");
        assert_eq!(TransportKind::WebUsb.communication(), "WebUSB");
        assert_eq!(TransportKind::Bridge.communication(), "USB");
    }
}
