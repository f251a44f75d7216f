//! dnsver - DNS software fingerprinting
//!
//! Identifies the DNS server software behind IP addresses.

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    dnsver_cli::run().await
}
