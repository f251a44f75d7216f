use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Write};
use std::net::IpAddr;

/// Attribute key used for failure markers
const ERROR_KEY: &str = "error";

/// Value of one response attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignatureValue {
    /// Header bit or presence flag
    Bool(bool),
    /// Numeric field (rcode, counts, sizes)
    Int(i64),
    /// Textual field
    Text(String),
}

impl From<bool> for SignatureValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for SignatureValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u8> for SignatureValue {
    fn from(v: u8) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u16> for SignatureValue {
    fn from(v: u16) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for SignatureValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for SignatureValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

/// Why a probe produced no usable response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeFailure {
    /// No response within the timeout
    Timeout,
    /// Socket error, including ICMP unreachable / refused
    Io,
    /// Response could not be decoded
    Malformed,
    /// Response did not answer our query
    Mismatch,
}

impl ProbeFailure {
    /// Marker value stored in the signature
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Io => "io",
            Self::Malformed => "malformed",
            Self::Mismatch => "mismatch",
        }
    }
}

/// Response attributes observed for one probe against one target.
///
/// Attribute order is not meaningful. Equality compares the (key, value)
/// pairs only; use [`Signature::canonicalize`] before deriving features.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature {
    attributes: HashMap<String, SignatureValue>,
}

impl Signature {
    /// Create an empty signature
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker signature for a failed probe
    #[must_use]
    pub fn failure(kind: ProbeFailure) -> Self {
        let mut signature = Self::new();
        signature.insert(ERROR_KEY, kind.as_str());
        signature
    }

    /// Record an attribute, replacing any previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<SignatureValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Look up an attribute
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&SignatureValue> {
        self.attributes.get(key)
    }

    /// Number of attributes
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True when no attribute was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// The failure marker, if this signature records one
    #[must_use]
    pub fn failure_kind(&self) -> Option<&str> {
        match self.attributes.get(ERROR_KEY) {
            Some(SignatureValue::Text(kind)) => Some(kind),
            _ => None,
        }
    }

    /// Sort attributes by key into a canonical form.
    #[must_use]
    pub fn canonicalize(&self) -> CanonicalSignature {
        let mut pairs: Vec<(String, SignatureValue)> = self
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.sort();
        CanonicalSignature(pairs)
    }
}

impl<K: Into<String>, V: Into<SignatureValue>> FromIterator<(K, V)> for Signature {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut signature = Self::new();
        for (k, v) in iter {
            signature.insert(k, v);
        }
        signature
    }
}

/// A signature as a key-sorted sequence of (attribute, value) pairs.
///
/// Displays in the tuple notation used for one-hot feature names, e.g.
/// `(('aa', True), ('rcode', 0))`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalSignature(Vec<(String, SignatureValue)>);

impl CanonicalSignature {
    /// Sorted (attribute, value) pairs
    #[must_use]
    pub fn pairs(&self) -> &[(String, SignatureValue)] {
        &self.0
    }
}

impl fmt::Display for CanonicalSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('(')?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_char('(')?;
            write_quoted(f, key)?;
            f.write_str(", ")?;
            match value {
                SignatureValue::Bool(true) => f.write_str("True")?,
                SignatureValue::Bool(false) => f.write_str("False")?,
                SignatureValue::Int(n) => write!(f, "{n}")?,
                SignatureValue::Text(s) => write_quoted(f, s)?,
            }
            f.write_char(')')?;
        }
        if self.0.len() == 1 {
            f.write_char(',')?;
        }
        f.write_char(')')
    }
}

impl Serialize for CanonicalSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// Single quotes unless the text holds a single quote and no double quote.
fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    f.write_char(quote)?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}

/// All raw signatures collected for one target, keyed by probe name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpSignatures {
    /// Probed address
    pub ip: IpAddr,
    /// Probe name to raw signature
    pub signatures: BTreeMap<String, Signature>,
}

impl IpSignatures {
    /// Create an empty entry for `ip`
    #[must_use]
    pub const fn new(ip: IpAddr) -> Self {
        Self {
            ip,
            signatures: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_ignores_insertion_order() {
        let a: Signature = [("rcode", SignatureValue::Int(0)), ("aa", SignatureValue::Bool(true))]
            .into_iter()
            .collect();
        let b: Signature = [("aa", SignatureValue::Bool(true)), ("rcode", SignatureValue::Int(0))]
            .into_iter()
            .collect();
        assert_eq!(a, b);
        assert_eq!(a.canonicalize(), b.canonicalize());
        assert_eq!(a.canonicalize().pairs()[0].0, "aa");
    }

    #[test]
    fn test_tuple_notation() {
        let sig: Signature = [
            ("rcode", SignatureValue::Int(5)),
            ("aa", SignatureValue::Bool(false)),
            ("answer_types", SignatureValue::Text("TXT".into())),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            sig.canonicalize().to_string(),
            "(('aa', False), ('answer_types', 'TXT'), ('rcode', 5))"
        );
    }

    #[test]
    fn test_tuple_notation_single_and_empty() {
        assert_eq!(Signature::failure(ProbeFailure::Timeout).canonicalize().to_string(), "(('error', 'timeout'),)");
        assert_eq!(Signature::new().canonicalize().to_string(), "()");
    }

    #[test]
    fn test_quote_selection() {
        let sig: Signature = [("v", "it's")].into_iter().collect();
        assert_eq!(sig.canonicalize().to_string(), "(('v', \"it's\"),)");
        let sig: Signature = [("v", "a'b\"c")].into_iter().collect();
        assert_eq!(sig.canonicalize().to_string(), "(('v', 'a\\'b\"c'),)");
    }

    #[test]
    fn test_failure_kind() {
        assert_eq!(Signature::failure(ProbeFailure::Io).failure_kind(), Some("io"));
        let ok: Signature = [("rcode", 0_i64)].into_iter().collect();
        assert_eq!(ok.failure_kind(), None);
    }

    #[test]
    fn test_canonical_serializes_sorted_map() {
        let sig: Signature = [("tc", SignatureValue::Bool(false)), ("an", SignatureValue::Int(1))]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&sig.canonicalize()).unwrap();
        assert_eq!(json, r#"{"an":1,"tc":false}"#);
    }
}
