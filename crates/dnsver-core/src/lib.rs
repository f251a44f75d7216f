//! Core types and classification for DNS software fingerprinting.
//!
//! This crate provides the pieces of the fingerprinting pipeline that do not
//! touch the network:
//!
//! - **Types**: probes, signatures, validated targets and classification results
//! - **Model**: the pre-trained decision tree, loaded read-only from a JSON artifact
//! - **Encoding**: one-hot feature vectors aligned to the model's feature list
//! - **Classification**: mapping a feature vector to one or more version labels
//!
//! # Example
//!
//! ```rust,ignore
//! use dnsver_core::{Classifier, DecisionTree};
//!
//! let tree = DecisionTree::load("data/models/model_vendor.json")?;
//! let classifier = Classifier::new(tree)?;
//! let encoded = classifier.schema().encode(&batch);
//! for row in &encoded.rows {
//!     println!("{} -> {}", row.ip, classifier.classify(&row.features)?);
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/dnsver-core/0.1.0")]

pub mod classifier;
pub mod encoder;
mod error;
pub mod model;
pub mod types;

pub use classifier::Classifier;
pub use encoder::{EncodedBatch, EncodedRow, FeatureSchema};
pub use error::{DnsverError, Result};
pub use model::{DecisionTree, Model, TreeNode};
pub use types::*;
