//! One-hot encoding of probe signatures against a fixed feature schema.
//!
//! Each probe is a column and each canonical signature a category, so a
//! feature is named `<probe>_<canonical signature>`. The schema comes from
//! the model: batch features the model never saw are dropped, and model
//! features absent from the batch stay false. Rows always come out in the
//! model's feature order.

use std::collections::HashMap;
use std::net::IpAddr;

use crate::error::{DnsverError, Result};
use crate::model::Model;
use crate::types::{CanonicalSignature, FeatureVector, IpSignatures};

/// Feature name for one probe column and one observed signature
#[must_use]
pub fn feature_name(probe: &str, signature: &CanonicalSignature) -> String {
    format!("{probe}_{signature}")
}

/// Ordered feature list with a name-to-index lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

/// Feature vector for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRow {
    /// Probed address
    pub ip: IpAddr,
    /// One-hot features in schema order
    pub features: FeatureVector,
}

/// Output of encoding one scan chunk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedBatch {
    /// One row per target, in input order
    pub rows: Vec<EncodedRow>,
    /// Batch features with no column in the schema
    pub dropped: usize,
}

impl FeatureSchema {
    /// Build a schema from an ordered feature list
    pub fn new(names: &[String]) -> Result<Self> {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(DnsverError::Model(format!("duplicate feature {name:?}")));
            }
        }
        Ok(Self {
            names: names.to_vec(),
            index,
        })
    }

    /// Schema declared by a model
    pub fn from_model(model: &impl Model) -> Result<Self> {
        Self::new(model.feature_names())
    }

    /// Number of features
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the schema declares no features
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Feature names in order
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Position of a feature, if the schema declares it
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Encode the signatures of one target.
    ///
    /// Returns the row and the number of features dropped as unknown.
    #[must_use]
    pub fn encode_row(&self, entry: &IpSignatures) -> (EncodedRow, usize) {
        let mut features = FeatureVector::zeroed(self.len());
        let mut dropped = 0;

        for (probe, signature) in &entry.signatures {
            let name = feature_name(probe, &signature.canonicalize());
            match self.position(&name) {
                Some(i) => features.set(i),
                None => {
                    tracing::debug!(ip = %entry.ip, feature = %name, "feature not in model schema, dropped");
                    dropped += 1;
                }
            }
        }

        (
            EncodedRow {
                ip: entry.ip,
                features,
            },
            dropped,
        )
    }

    /// Encode every target of a chunk
    #[must_use]
    pub fn encode(&self, batch: &[IpSignatures]) -> EncodedBatch {
        let mut encoded = EncodedBatch {
            rows: Vec::with_capacity(batch.len()),
            dropped: 0,
        };
        for entry in batch {
            let (row, dropped) = self.encode_row(entry);
            encoded.rows.push(row);
            encoded.dropped += dropped;
        }
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ProbeFailure, Signature, SignatureValue};

    fn schema(names: &[&str]) -> FeatureSchema {
        let names: Vec<String> = names.iter().map(|s| (*s).to_string()).collect();
        FeatureSchema::new(&names).unwrap()
    }

    fn entry(ip: &str, probes: Vec<(&str, Signature)>) -> IpSignatures {
        let mut entry = IpSignatures::new(ip.parse().unwrap());
        for (name, sig) in probes {
            entry.signatures.insert(name.to_string(), sig);
        }
        entry
    }

    fn rcode(code: i64) -> Signature {
        [("rcode", SignatureValue::Int(code))].into_iter().collect()
    }

    #[test]
    fn test_feature_name() {
        assert_eq!(feature_name("rd", &rcode(0).canonicalize()), "rd_(('rcode', 0),)");
    }

    #[test]
    fn test_schema_parity() {
        let schema = schema(&["rd_(('rcode', 0),)", "rd_(('rcode', 5),)", "cd_(('error', 'timeout'),)"]);
        let batch = vec![
            entry("192.0.2.1", vec![("rd", rcode(0))]),
            entry("192.0.2.2", vec![("rd", rcode(2)), ("cd", Signature::failure(ProbeFailure::Timeout))]),
            entry("192.0.2.3", vec![]),
        ];
        let encoded = schema.encode(&batch);
        assert_eq!(encoded.rows.len(), 3);
        for row in &encoded.rows {
            assert_eq!(row.features.len(), schema.len());
        }
        assert_eq!(encoded.rows[0].features.as_slice(), &[true, false, false]);
        assert_eq!(encoded.rows[1].features.as_slice(), &[false, false, true]);
        assert_eq!(encoded.rows[2].features.as_slice(), &[false, false, false]);
        assert_eq!(encoded.dropped, 1);
    }

    #[test]
    fn test_row_follows_schema_order() {
        let forward = schema(&["a_()", "b_()"]);
        let reverse = schema(&["b_()", "a_()"]);
        let batch = vec![entry("192.0.2.9", vec![("a", Signature::new())])];
        assert_eq!(forward.encode(&batch).rows[0].features.as_slice(), &[true, false]);
        assert_eq!(reverse.encode(&batch).rows[0].features.as_slice(), &[false, true]);
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let a: Signature = [("aa", SignatureValue::Bool(true)), ("rcode", SignatureValue::Int(0))]
            .into_iter()
            .collect();
        let b: Signature = [("rcode", SignatureValue::Int(0)), ("aa", SignatureValue::Bool(true))]
            .into_iter()
            .collect();
        let name = feature_name("p", &a.canonicalize());
        let schema = schema(&[name.as_str()]);
        let rows = schema.encode(&[entry("192.0.2.1", vec![("p", a)]), entry("192.0.2.2", vec![("p", b)])]).rows;
        assert_eq!(rows[0].features, rows[1].features);
        assert_eq!(rows[0].features.hot_count(), 1);
    }

    #[test]
    fn test_duplicate_feature_rejected() {
        let names = vec!["x".to_string(), "x".to_string()];
        assert!(FeatureSchema::new(&names).is_err());
    }
}
