//! Per-granularity artifacts produced by the training pipeline.
//!
//! ```text
//! <data_dir>/models/model_<granularity>.json
//! <data_dir>/queries/queries_<granularity>.txt
//! ```

use std::path::{Path, PathBuf};

use dnsver_core::{Classifier, DecisionTree, Dimension, DnsverError, Granularity, Result};
use dnsver_probe::{parse_probe_names, ProbeCatalog};

/// Locates artifacts under a data directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    data_dir: PathBuf,
}

impl ArtifactPaths {
    /// Artifacts rooted at `data_dir`
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// The data directory
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Decision tree for a granularity
    #[must_use]
    pub fn model(&self, granularity: Granularity) -> PathBuf {
        self.data_dir
            .join("models")
            .join(format!("model_{granularity}.json"))
    }

    /// Required probe names for a granularity
    #[must_use]
    pub fn probe_names(&self, granularity: Granularity) -> PathBuf {
        self.data_dir
            .join("queries")
            .join(format!("queries_{granularity}.txt"))
    }

    /// Read the probe-name list for a granularity
    pub fn load_probe_names(&self, granularity: Granularity) -> Result<Vec<String>> {
        let path = self.probe_names(granularity);
        let content = std::fs::read_to_string(&path)
            .map_err(|source| DnsverError::Artifact { path, source })?;
        parse_probe_names(&content)
    }
}

/// Everything a scan needs that is loaded once at startup
#[derive(Debug, Clone)]
pub struct Artifacts {
    /// Granularity the artifacts were trained for
    pub granularity: Granularity,
    /// Classifier wrapping the decision tree
    pub classifier: Classifier,
    /// Probes the model needs
    pub catalog: ProbeCatalog,
}

impl Artifacts {
    /// Load the model and probe list for `granularity`.
    ///
    /// Any missing or invalid artifact is an error; a scan must not start
    /// without them.
    pub fn load(paths: &ArtifactPaths, granularity: Granularity, dimensions: &[Dimension]) -> Result<Self> {
        let tree = DecisionTree::load(paths.model(granularity))?;
        let classifier = Classifier::new(tree)?;

        let needed = paths.load_probe_names(granularity)?;
        let catalog = ProbeCatalog::select(dimensions, &needed);
        if catalog.is_empty() {
            return Err(DnsverError::ProbeList(format!(
                "none of the {} probe names for {granularity} match the option dimensions",
                needed.len()
            )));
        }

        tracing::info!(
            %granularity,
            probes = catalog.len(),
            features = classifier.schema().len(),
            "loaded artifacts"
        );

        Ok(Self {
            granularity,
            classifier,
            catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnsver_probe::default_dimensions;

    const TREE: &str = r#"{
        "features": ["rd_()"],
        "classes": ["unbound"],
        "nodes": [{"leaf": {"class": 0}}]
    }"#;

    fn write_artifacts(dir: &Path, probes: &str) {
        std::fs::create_dir_all(dir.join("models")).unwrap();
        std::fs::create_dir_all(dir.join("queries")).unwrap();
        std::fs::write(dir.join("models/model_major.json"), TREE).unwrap();
        std::fs::write(dir.join("queries/queries_major.txt"), probes).unwrap();
    }

    #[test]
    fn test_paths() {
        let paths = ArtifactPaths::new("/data");
        assert_eq!(paths.model(Granularity::Minor), PathBuf::from("/data/models/model_minor.json"));
        assert_eq!(paths.probe_names(Granularity::Build), PathBuf::from("/data/queries/queries_build.txt"));
    }

    #[test]
    fn test_load() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "rd\nversion.bind_edns0\n");
        let artifacts = Artifacts::load(&ArtifactPaths::new(dir.path()), Granularity::Major, &default_dimensions()).unwrap();
        assert_eq!(artifacts.catalog.len(), 2);
        assert_eq!(artifacts.classifier.schema().len(), 1);
    }

    #[test]
    fn test_missing_model_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = Artifacts::load(&ArtifactPaths::new(dir.path()), Granularity::Vendor, &default_dimensions()).unwrap_err();
        assert!(matches!(err, DnsverError::Artifact { .. }));
    }

    #[test]
    fn test_unmatched_probe_list_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_artifacts(dir.path(), "no_such_probe\n");
        let err = Artifacts::load(&ArtifactPaths::new(dir.path()), Granularity::Major, &default_dimensions()).unwrap_err();
        assert!(matches!(err, DnsverError::ProbeList(_)));
    }
}
