//! Data types shared across the fingerprinting pipeline.

mod feature;
mod granularity;
mod probe;
mod result;
mod signature;
mod target;

pub use feature::FeatureVector;
pub use granularity::Granularity;
pub use probe::{Dimension, Opcode, OptionValue, ProbeDefinition, QueryClass, QueryOption};
pub use result::{ClassificationResult, LABEL_DELIMITER};
pub use signature::{CanonicalSignature, IpSignatures, ProbeFailure, Signature, SignatureValue};
pub use target::IpTarget;
