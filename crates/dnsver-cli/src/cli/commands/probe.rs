//! `dnsver probe` - Classify a single address.

use anyhow::Result;
use dnsver_probe::UdpTransport;
use dnsver_scan::Scanner;

use super::Context;
use crate::cli::args::ProbeArgs;

pub async fn execute(ctx: &Context, args: ProbeArgs) -> Result<()> {
    let config = ctx.scan_config(Some(1), &args.probe)?;
    let artifacts = ctx.artifacts(args.granularity)?;

    let scanner = Scanner::new(
        config.executor(UdpTransport::new()),
        &artifacts.catalog,
        &artifacts.classifier,
        1,
    )?;
    let result = scanner.scan_one(args.ip).await?;

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
