//! Pre-trained decision tree, consumed read-only.
//!
//! The training pipeline exports the tree as JSON:
//!
//! ```json
//! {
//!   "features": ["version.bind_(('rcode', 0),)", "..."],
//!   "classes": ["bind-9.16|bind-9.18", "unbound"],
//!   "nodes": [
//!     {"split": {"feature": 0, "threshold": 0.5, "left": 1, "right": 2}},
//!     {"leaf": {"class": 1}},
//!     {"leaf": {"class": 0}}
//!   ]
//! }
//! ```
//!
//! Evaluation starts at node 0 and goes left when `x[feature] <= threshold`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::error::{DnsverError, Result};
use crate::types::FeatureVector;

/// A classifier over fixed-schema feature vectors.
///
/// Implementations are immutable once loaded and shared read-only by every
/// worker of a scan.
pub trait Model: Send + Sync {
    /// Ordered feature names the model was trained on
    fn feature_names(&self) -> &[String];

    /// Predict the label for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<&str>;
}

/// One node of a [`DecisionTree`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeNode {
    /// Internal node
    Split {
        /// Index into the feature list
        feature: usize,
        /// Go left when the feature value is at most this
        threshold: f64,
        /// Left child index
        left: usize,
        /// Right child index
        right: usize,
    },
    /// Terminal node
    Leaf {
        /// Index into the class list
        class: usize,
    },
}

/// A binary decision tree with named features and classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TreeArtifact")]
pub struct DecisionTree {
    features: Vec<String>,
    classes: Vec<String>,
    nodes: Vec<TreeNode>,
}

#[derive(Deserialize)]
struct TreeArtifact {
    features: Vec<String>,
    classes: Vec<String>,
    nodes: Vec<TreeNode>,
}

impl TryFrom<TreeArtifact> for DecisionTree {
    type Error = DnsverError;

    fn try_from(artifact: TreeArtifact) -> Result<Self> {
        Self::new(artifact.features, artifact.classes, artifact.nodes)
    }
}

impl DecisionTree {
    /// Build a tree, validating its structure.
    ///
    /// Children must have a higher index than their parent, so every path
    /// from the root terminates.
    pub fn new(features: Vec<String>, classes: Vec<String>, nodes: Vec<TreeNode>) -> Result<Self> {
        if nodes.is_empty() {
            return Err(DnsverError::Model("tree has no nodes".into()));
        }

        let mut seen = HashSet::with_capacity(features.len());
        for name in &features {
            if !seen.insert(name.as_str()) {
                return Err(DnsverError::Model(format!("duplicate feature {name:?}")));
            }
        }

        for (index, node) in nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    left,
                    right,
                    ..
                } => {
                    if feature >= features.len() {
                        return Err(DnsverError::Model(format!(
                            "node {index} splits on feature {feature}, only {} declared",
                            features.len()
                        )));
                    }
                    for child in [left, right] {
                        if child <= index || child >= nodes.len() {
                            return Err(DnsverError::Model(format!(
                                "node {index} has invalid child {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { class } => {
                    if class >= classes.len() {
                        return Err(DnsverError::Model(format!(
                            "node {index} predicts class {class}, only {} declared",
                            classes.len()
                        )));
                    }
                }
            }
        }

        Ok(Self {
            features,
            classes,
            nodes,
        })
    }

    /// Parse a tree from its JSON artifact
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a tree from a JSON artifact on disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| DnsverError::Artifact {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            features = tree.features.len(),
            classes = tree.classes.len(),
            nodes = tree.nodes.len(),
            "loaded decision tree"
        );
        Ok(tree)
    }

    /// Class labels, possibly merged with [`crate::LABEL_DELIMITER`]
    #[must_use]
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Tree nodes, root first
    #[must_use]
    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }
}

impl Model for DecisionTree {
    fn feature_names(&self) -> &[String] {
        &self.features
    }

    fn predict(&self, features: &FeatureVector) -> Result<&str> {
        if features.len() != self.features.len() {
            return Err(DnsverError::Schema {
                expected: self.features.len(),
                actual: features.len(),
            });
        }

        let mut index = 0;
        loop {
            match self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.value(feature).unwrap_or(0.0);
                    index = if value <= threshold { left } else { right };
                }
                TreeNode::Leaf { class } => return Ok(&self.classes[class]),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn sample_tree() -> DecisionTree {
        DecisionTree::new(
            names(&["a", "b"]),
            names(&["unbound", "bind-9.16|bind-9.18", "knot"]),
            vec![
                TreeNode::Split { feature: 0, threshold: 0.5, left: 1, right: 2 },
                TreeNode::Leaf { class: 0 },
                TreeNode::Split { feature: 1, threshold: 0.5, left: 3, right: 4 },
                TreeNode::Leaf { class: 2 },
                TreeNode::Leaf { class: 1 },
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_predict_walks_tree() {
        let tree = sample_tree();
        assert_eq!(tree.predict(&vec![false, false].into()).unwrap(), "unbound");
        assert_eq!(tree.predict(&vec![true, false].into()).unwrap(), "knot");
        assert_eq!(tree.predict(&vec![true, true].into()).unwrap(), "bind-9.16|bind-9.18");
    }

    #[test]
    fn test_predict_rejects_wrong_width() {
        let tree = sample_tree();
        let err = tree.predict(&vec![true].into()).unwrap_err();
        assert!(matches!(err, DnsverError::Schema { expected: 2, actual: 1 }));
    }

    #[test]
    fn test_rejects_backward_child() {
        let err = DecisionTree::new(
            names(&["a"]),
            names(&["x"]),
            vec![
                TreeNode::Split { feature: 0, threshold: 0.5, left: 1, right: 0 },
                TreeNode::Leaf { class: 0 },
            ],
        )
        .unwrap_err();
        assert!(matches!(err, DnsverError::Model(_)));
    }

    #[test]
    fn test_rejects_out_of_range_indices() {
        assert!(DecisionTree::new(names(&["a"]), names(&["x"]), vec![TreeNode::Leaf { class: 1 }]).is_err());
        assert!(DecisionTree::new(
            names(&["a"]),
            names(&["x"]),
            vec![
                TreeNode::Split { feature: 3, threshold: 0.5, left: 1, right: 2 },
                TreeNode::Leaf { class: 0 },
                TreeNode::Leaf { class: 0 },
            ],
        )
        .is_err());
        assert!(DecisionTree::new(names(&["a", "a"]), names(&["x"]), vec![TreeNode::Leaf { class: 0 }]).is_err());
        assert!(DecisionTree::new(names(&["a"]), names(&["x"]), Vec::new()).is_err());
    }

    #[test]
    fn test_json_artifact() {
        let json = r#"{
            "features": ["a"],
            "classes": ["x", "y"],
            "nodes": [
                {"split": {"feature": 0, "threshold": 0.5, "left": 1, "right": 2}},
                {"leaf": {"class": 0}},
                {"leaf": {"class": 1}}
            ]
        }"#;
        let tree = DecisionTree::from_json(json).unwrap();
        assert_eq!(tree.feature_names(), &["a".to_string()]);
        assert_eq!(tree.predict(&vec![true].into()).unwrap(), "y");
    }

    #[test]
    fn test_json_artifact_is_validated() {
        let json = r#"{"features": [], "classes": [], "nodes": [{"leaf": {"class": 0}}]}"#;
        assert!(DecisionTree::from_json(json).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = DecisionTree::load("/nonexistent/model_vendor.json").unwrap_err();
        assert!(matches!(err, DnsverError::Artifact { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let tree = sample_tree();
        write!(file, "{}", serde_json::to_string(&tree).unwrap()).unwrap();
        let loaded = DecisionTree::load(file.path()).unwrap();
        assert_eq!(loaded, tree);
    }
}
