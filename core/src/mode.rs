// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Device operating mode classification

use strum::{Display, EnumIter, EnumString};

use crate::device::{CandidateDevice, DeviceFeatures};

/// Operating mode derived from [DeviceFeatures] and candidate metadata.
///
/// Never stored, always recomputed from a fresh features snapshot.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Display, EnumString, EnumIter)]
pub enum DeviceMode {
    /// Firmware recovery mode, requires the firmware update flow
    Bootloader,
    /// No seed on the device, requires activation (create or restore)
    NotInitialized,
    /// Backup-only mode, unusable for onboarding
    BackupMode,
    /// Ready for wallet creation
    Normal,
}

impl DeviceMode {
    /// Whether wallet provisioning may follow this mode
    pub const fn can_provision(&self) -> bool {
        matches!(self, DeviceMode::Normal)
    }
}

/// Classify a connected device.
///
/// Checks apply in order: bootloader (from features or the candidate
/// advertisement), then uninitialised, then backup mode, otherwise normal.
pub fn classify(features: &DeviceFeatures, candidate: &CandidateDevice) -> DeviceMode {
    let mode = if features.bootloader_mode || candidate.bootloader_mode {
        DeviceMode::Bootloader
    } else if !features.initialized {
        DeviceMode::NotInitialized
    } else if features.no_backup {
        DeviceMode::BackupMode
    } else {
        DeviceMode::Normal
    };

    #[cfg(feature = "log")]
    log::trace!("classified {} as {}", candidate.sort_key(), mode);

    mode
}

/// Whether a bootloader-mode device still has firmware installed.
///
/// Features are authoritative when available, otherwise the candidate
/// advertisement is used. Unknown is treated as absent.
pub fn firmware_present(features: Option<&DeviceFeatures>, candidate: &CandidateDevice) -> bool {
    features
        .and_then(|f| f.firmware_present)
        .or(candidate.firmware_present)
        .unwrap_or(false)
}

#[cfg(test)]
mod test {
    use super::*;

    fn normal() -> DeviceFeatures {
        DeviceFeatures {
            initialized: true,
            ..Default::default()
        }
    }

    #[test]
    fn classify_normal() {
        assert_eq!(
            classify(&normal(), &CandidateDevice::default()),
            DeviceMode::Normal
        );
    }

    #[test]
    fn bootloader_takes_precedence() {
        let f = DeviceFeatures {
            bootloader_mode: true,
            initialized: false,
            no_backup: true,
            ..Default::default()
        };
        assert_eq!(
            classify(&f, &CandidateDevice::default()),
            DeviceMode::Bootloader
        );

        // Candidate advertisement alone is enough
        let c = CandidateDevice {
            bootloader_mode: true,
            ..Default::default()
        };
        assert_eq!(classify(&normal(), &c), DeviceMode::Bootloader);
    }

    #[test]
    fn uninitialised_before_backup() {
        let f = DeviceFeatures {
            initialized: false,
            no_backup: true,
            ..Default::default()
        };
        assert_eq!(
            classify(&f, &CandidateDevice::default()),
            DeviceMode::NotInitialized
        );
    }

    #[test]
    fn backup_mode() {
        let f = DeviceFeatures {
            no_backup: true,
            ..normal()
        };
        let m = classify(&f, &CandidateDevice::default());

        assert_eq!(m, DeviceMode::BackupMode);
        assert!(!m.can_provision());
    }

    #[test]
    fn firmware_presence() {
        let mut c = CandidateDevice::default();
        assert!(!firmware_present(None, &c));

        c.firmware_present = Some(true);
        assert!(firmware_present(None, &c));

        let f = DeviceFeatures {
            firmware_present: Some(false),
            ..Default::default()
        };
        assert!(!firmware_present(Some(&f), &c));
    }
}
