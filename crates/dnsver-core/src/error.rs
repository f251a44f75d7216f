use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fingerprinting operations
pub type Result<T> = std::result::Result<T, DnsverError>;

/// Errors that can occur while loading artifacts or classifying targets
#[derive(Error, Debug)]
pub enum DnsverError {
    /// Input line is not an IPv4 or IPv6 address
    #[error("invalid IP address: {0:?}")]
    InvalidIp(String),

    /// Decision tree artifact is structurally invalid
    #[error("invalid model: {0}")]
    Model(String),

    /// Feature vector width does not match the model
    #[error("feature vector has {actual} features, model expects {expected}")]
    Schema {
        /// Feature count declared by the model
        expected: usize,
        /// Feature count of the vector passed in
        actual: usize,
    },

    /// Probe-name list is empty or unusable
    #[error("invalid probe list: {0}")]
    ProbeList(String),

    /// A required artifact could not be read
    #[error("failed to read {}: {source}", path.display())]
    Artifact {
        /// Path of the artifact
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Probe construction or dispatch failed
    #[error("probe error: {0}")]
    Probe(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error on input or output streams
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DnsverError {
    /// Returns true if the error must abort a scan run
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidIp(_))
    }
}
