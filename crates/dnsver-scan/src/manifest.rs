//! Image planning for corpus provisioning.
//!
//! A manifest lists one `vendor/<dir>/version` path per line, relative to a
//! software directory holding one Dockerfile directory per entry. How each
//! vendor's image is obtained is configured per vendor instead of being
//! decided by name: build from the Dockerfile (optionally falling back to a
//! published image when the directory is missing), always pull, or skip.
//!
//! Only the plan is produced here. Building, running and removing
//! containers is left to the provisioning tooling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use dnsver_core::{DnsverError, Result};

/// A published image to pull instead of building
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullSource {
    /// Image repository, e.g. `cznic/knot-resolver`
    pub repository: String,
    /// Prefix put before the version to form the tag, e.g. `v`
    #[serde(default)]
    pub tag_prefix: String,
}

/// How a vendor's images are obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageStrategy {
    /// Build from the entry's Dockerfile directory
    Build {
        /// Image to pull when the directory does not exist
        #[serde(default)]
        fallback: Option<PullSource>,
    },
    /// Always pull a published image
    Pull {
        /// Where to pull from
        #[serde(flatten)]
        source: PullSource,
    },
    /// No image for this vendor
    Skip,
}

impl Default for ImageStrategy {
    fn default() -> Self {
        Self::Build { fallback: None }
    }
}

/// One manifest line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Software vendor
    pub vendor: String,
    /// Version string
    pub version: String,
    /// Dockerfile directory relative to the software directory
    pub path: String,
}

/// How to obtain the image for one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ImagePlan {
    /// `docker build <context> -t <tag>`
    Build {
        /// Build context directory
        context: PathBuf,
        /// Resulting image reference
        image: String,
    },
    /// `docker pull <image>`
    Pull {
        /// Image reference to pull
        image: String,
    },
    /// Nothing to provision
    Skip {
        /// Why the entry is skipped
        reason: String,
    },
}

/// A manifest entry with its plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedImage {
    /// The manifest entry
    #[serde(flatten)]
    pub entry: ManifestEntry,
    /// What to do for it
    pub plan: ImagePlan,
}

/// Parse a manifest; blank lines and `#` comments are ignored
pub fn parse_manifest(content: &str) -> Result<Vec<ManifestEntry>> {
    content
        .lines()
        .enumerate()
        .map(|(n, line)| (n + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            let parts: Vec<&str> = line.split('/').collect();
            match parts.as_slice() {
                [vendor, _, version] if !vendor.is_empty() && !version.is_empty() => Ok(ManifestEntry {
                    vendor: (*vendor).to_string(),
                    version: (*version).to_string(),
                    path: line.to_string(),
                }),
                _ => Err(DnsverError::Config(format!(
                    "manifest line {n}: expected vendor/<dir>/version, got {line:?}"
                ))),
            }
        })
        .collect()
}

/// Plan the image for every entry.
///
/// Vendors missing from `strategies` are built from their Dockerfile.
#[must_use]
pub fn plan_images(
    entries: &[ManifestEntry],
    strategies: &HashMap<String, ImageStrategy>,
    software_dir: &Path,
) -> Vec<PlannedImage> {
    let default = ImageStrategy::default();
    entries
        .iter()
        .map(|entry| {
            let strategy = strategies.get(&entry.vendor).unwrap_or(&default);
            let plan = plan_entry(entry, strategy, software_dir);
            if let ImagePlan::Skip { reason } = &plan {
                tracing::info!(vendor = %entry.vendor, version = %entry.version, %reason, "skipping entry");
            }
            PlannedImage {
                entry: entry.clone(),
                plan,
            }
        })
        .collect()
}

fn plan_entry(entry: &ManifestEntry, strategy: &ImageStrategy, software_dir: &Path) -> ImagePlan {
    let pull = |source: &PullSource| ImagePlan::Pull {
        image: format!("{}:{}{}", source.repository, source.tag_prefix, entry.version),
    };

    match strategy {
        ImageStrategy::Skip => ImagePlan::Skip {
            reason: "vendor configured to skip".into(),
        },
        ImageStrategy::Pull { source } => pull(source),
        ImageStrategy::Build { fallback } => {
            let context = software_dir.join(&entry.path);
            if context.is_dir() {
                ImagePlan::Build {
                    context,
                    image: format!("{}-{}:latest", entry.vendor, entry.version),
                }
            } else if let Some(source) = fallback {
                pull(source)
            } else {
                tracing::warn!(path = %context.display(), "no Dockerfile directory and no fallback image");
                ImagePlan::Skip {
                    reason: format!("missing {}", context.display()),
                }
            }
        }
    }
}
