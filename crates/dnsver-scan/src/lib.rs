//! Scan orchestration for DNS software fingerprinting.
//!
//! A scan reads targets in chunks of at most `workers` lines and, per chunk,
//! validates the addresses, probes every valid target concurrently, encodes
//! the signatures against the model schema, classifies each target and
//! appends one NDJSON record per target to the output.
//!
//! Besides scanning, this crate loads the per-granularity artifacts, collects
//! raw signatures for training corpora, and plans the provisioning images
//! listed in a software manifest.

#![doc(html_root_url = "https://docs.rs/dnsver-scan/0.1.0")]

pub mod artifacts;
pub mod config;
pub mod corpus;
pub mod manifest;
pub mod orchestrator;

pub use artifacts::{ArtifactPaths, Artifacts};
pub use config::ScanConfig;
pub use corpus::{collect, CorpusRecord};
pub use manifest::{
    parse_manifest, plan_images, ImagePlan, ImageStrategy, ManifestEntry, PlannedImage, PullSource,
};
pub use orchestrator::{ChunkReport, ScanSummary, Scanner};
