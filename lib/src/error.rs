// Copyright (c) 2022-2023 The MobileCoin Foundation

use hw_onboard_core::{classify_error, Classification, ErrorCode};

/// Raw transport failure, carrying the transport's error code
#[derive(Clone, PartialEq, Debug, thiserror::Error)]
#[error("{code} ({message})")]
pub struct TransportError {
    pub code: ErrorCode,
    pub message: String,
}

impl TransportError {
    /// Create a new transport error with the provided code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Classify this error, see [classify_error]
    pub fn classify(&self) -> Classification {
        classify_error(self.code)
    }
}

impl From<ErrorCode> for TransportError {
    fn from(code: ErrorCode) -> Self {
        Self {
            code,
            message: String::new(),
        }
    }
}

/// Hardware onboarding flow error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Connection returned no device features
    #[error("Connect device failed, no features returned")]
    ConnectFailed,

    /// Re-querying features with on-device unlock failed
    #[error("Device unlock failed: {0}")]
    Unlock(TransportError),

    /// Candidate reported an unknown device type
    #[error("Unknown device type")]
    UnknownDevice,

    /// A connection session is already open for this flow
    #[error("Connection already in progress")]
    Busy,

    /// Wallet provisioning already in progress
    #[error("Wallet provisioning already in progress")]
    ProvisionInFlight,

    /// Wallet store operation failed
    #[error("Wallet store error: {0}")]
    Store(anyhow::Error),
}

impl From<anyhow::Error> for Error {
    fn from(e: anyhow::Error) -> Self {
        Error::Store(e)
    }
}
