use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DnsverError;

/// Resolution level of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Software vendor only
    #[default]
    Vendor,
    /// Major version
    Major,
    /// Minor version
    Minor,
    /// Exact build
    Build,
}

impl Granularity {
    /// All levels, coarsest first
    pub const ALL: [Self; 4] = [Self::Vendor, Self::Major, Self::Minor, Self::Build];

    /// Name used in artifact file names
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vendor => "vendor",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Build => "build",
        }
    }
}

impl FromStr for Granularity {
    type Err = DnsverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vendor" => Ok(Self::Vendor),
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "build" => Ok(Self::Build),
            _ => Err(DnsverError::Config(format!(
                "unknown granularity {s:?}, expected one of vendor, major, minor, build"
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
