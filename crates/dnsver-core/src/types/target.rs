use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::DnsverError;

/// A validated IPv4 or IPv6 address to fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IpTarget(IpAddr);

impl IpTarget {
    /// Parse one input line, ignoring surrounding whitespace
    pub fn parse(line: &str) -> crate::Result<Self> {
        line.parse()
    }

    /// The underlying address
    #[must_use]
    pub const fn addr(self) -> IpAddr {
        self.0
    }
}

impl FromStr for IpTarget {
    type Err = DnsverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<IpAddr>()
            .map(Self)
            .map_err(|_| DnsverError::InvalidIp(trimmed.to_string()))
    }
}

impl From<IpAddr> for IpTarget {
    fn from(ip: IpAddr) -> Self {
        Self(ip)
    }
}

impl From<IpTarget> for IpAddr {
    fn from(target: IpTarget) -> Self {
        target.0
    }
}

impl fmt::Display for IpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
