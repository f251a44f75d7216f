//! Command implementations.

pub mod collect;
pub mod plan;
pub mod probe;
pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use dnsver_core::Granularity;
use dnsver_probe::default_dimensions;
use dnsver_scan::{ArtifactPaths, Artifacts, ScanConfig};

use crate::cli::args::ProbeOptions;
use crate::config::Config;

/// Data directory used when neither the flag nor the config names one
const DEFAULT_DATA_DIR: &str = "data";

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,

    /// Artifact locations
    pub paths: ArtifactPaths,
}

impl Context {
    /// Resolve the data directory: flag, then config, then `./data`.
    pub fn new(config: Config, data_dir: Option<PathBuf>) -> Self {
        let data_dir = data_dir
            .or_else(|| config.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        Self {
            config,
            paths: ArtifactPaths::new(data_dir),
        }
    }

    /// Scan settings: flags override the config file, which overrides defaults.
    pub fn scan_config(&self, threads: Option<usize>, probe: &ProbeOptions) -> anyhow::Result<ScanConfig> {
        let mut scan = ScanConfig::default();
        if let Some(workers) = threads.or(self.config.threads) {
            scan = scan.workers(workers);
        }
        if let Some(ms) = probe.timeout_ms.or(self.config.timeout_ms) {
            scan = scan.timeout(Duration::from_millis(ms));
        }
        if let Some(retries) = probe.retries.or(self.config.retries) {
            scan = scan.retries(retries);
        }
        if let Some(port) = probe.port.or(self.config.port) {
            scan = scan.port(port);
        }
        scan.validate()?;
        Ok(scan)
    }

    /// Load the model and probe list for a granularity.
    pub fn artifacts(&self, granularity: Granularity) -> anyhow::Result<Artifacts> {
        tracing::debug!(
            model = %self.paths.model(granularity).display(),
            probes = %self.paths.probe_names(granularity).display(),
            "loading artifacts"
        );
        Ok(Artifacts::load(&self.paths, granularity, &default_dimensions())?)
    }
}
