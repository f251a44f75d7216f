//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use dnsver_scan::ImageStrategy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// CLI configuration, read from `config.toml`.
///
/// ```toml
/// data_dir = "/var/lib/dnsver"
/// threads = 200
/// timeout_ms = 1500
/// retries = 1
///
/// [strategies.microsoft]
/// kind = "skip"
///
/// [strategies.knot-resolver]
/// kind = "build"
/// fallback = { repository = "cznic/knot-resolver", tag_prefix = "v" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory holding `models/` and `queries/`.
    pub data_dir: Option<PathBuf>,

    /// Default worker bound.
    pub threads: Option<usize>,

    /// Per-probe timeout in milliseconds.
    pub timeout_ms: Option<u64>,

    /// Retries for probes that time out.
    pub retries: Option<u32>,

    /// DNS port to probe.
    pub port: Option<u16>,

    /// Per-vendor image strategies for `plan`.
    #[serde(default)]
    pub strategies: HashMap<String, ImageStrategy>,
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "dnssoftver", "dnsver")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let config: Config = toml::from_str(
            r#"
            data_dir = "/srv/dnsver"
            threads = 250
            timeout_ms = 1500

            [strategies.microsoft]
            kind = "skip"

            [strategies.knot-resolver]
            kind = "build"
            fallback = { repository = "cznic/knot-resolver", tag_prefix = "v" }
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/dnsver")));
        assert_eq!(config.threads, Some(250));
        assert_eq!(config.retries, None);
        assert_eq!(config.strategies.get("microsoft"), Some(&ImageStrategy::Skip));
        assert!(matches!(
            config.strategies.get("knot-resolver"),
            Some(ImageStrategy::Build { fallback: Some(_) })
        ));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(toml::from_str::<Config>("thread = 5").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 5353").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.port, Some(5353));
    }

    #[test]
    fn test_load_missing_explicit_file() {
        assert!(Config::load(Some(Path::new("/nonexistent/dnsver.toml"))).is_err());
    }
}
