use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Separator between merged training classes in a model label
pub const LABEL_DELIMITER: char = '|';

/// Classification output for one target, one NDJSON line per record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Classified address
    pub ip: IpAddr,
    /// Candidate versions; more than one when the model merged classes
    pub versions: Vec<String>,
}

impl ClassificationResult {
    /// Build a result from a possibly merged model label
    #[must_use]
    pub fn from_label(ip: IpAddr, label: &str) -> Self {
        Self {
            ip,
            versions: label.split(LABEL_DELIMITER).map(str::to_string).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_label_splits() {
        let ip: IpAddr = "198.51.100.7".parse().unwrap();
        let result = ClassificationResult::from_label(ip, "bind-9.16|bind-9.18");
        assert_eq!(result.versions, vec!["bind-9.16", "bind-9.18"]);
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"ip":"198.51.100.7","versions":["bind-9.16","bind-9.18"]}"#
        );
    }

    #[test]
    fn test_single_label() {
        let ip: IpAddr = "2001:db8::1".parse().unwrap();
        let result = ClassificationResult::from_label(ip, "unbound");
        assert_eq!(result.versions, vec!["unbound"]);
    }
}
