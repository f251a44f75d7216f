use dnsver_core::{DnsverError, ProbeFailure};
use thiserror::Error;

/// Result type alias for probe operations
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

/// Errors from sending a probe and reading its response
#[derive(Error, Debug)]
pub enum ProbeError {
    /// No response within the probe timeout
    #[error("probe timed out")]
    Timeout,

    /// Socket error
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// Query could not be serialized
    #[error("failed to encode query: {0}")]
    Encode(String),

    /// Response could not be parsed
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Response does not belong to our query
    #[error("response id {actual} does not match query id {expected}")]
    Mismatch {
        /// Id sent
        expected: u16,
        /// Id received
        actual: u16,
    },

    /// Probe option cannot be expressed on the wire
    #[error("invalid probe option: {0}")]
    InvalidOption(String),
}

impl ProbeError {
    /// Marker recorded in the signature for this failure
    #[must_use]
    pub const fn failure(&self) -> ProbeFailure {
        match self {
            Self::Timeout => ProbeFailure::Timeout,
            Self::Network(_) => ProbeFailure::Io,
            Self::Encode(_) | Self::Decode(_) | Self::InvalidOption(_) => ProbeFailure::Malformed,
            Self::Mismatch { .. } => ProbeFailure::Mismatch,
        }
    }

    /// Returns true if a retry might succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_))
    }
}

impl From<ProbeError> for DnsverError {
    fn from(err: ProbeError) -> Self {
        match err {
            ProbeError::Network(e) => Self::Io(e),
            other => Self::Probe(other.to_string()),
        }
    }
}
