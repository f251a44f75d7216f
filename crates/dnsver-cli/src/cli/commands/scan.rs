//! `dnsver scan` - Classify every address of an input file.

use anyhow::{Context as _, Result};
use colored::Colorize;
use dnsver_probe::UdpTransport;
use dnsver_scan::Scanner;
use tokio::fs::{File, OpenOptions};
use tokio::io::BufReader;

use super::Context;
use crate::cli::args::ScanArgs;

pub async fn execute(ctx: &Context, args: ScanArgs) -> Result<()> {
    let config = ctx.scan_config(args.threads, &args.probe)?;
    let artifacts = ctx.artifacts(args.granularity)?;

    let input = File::open(&args.input_file)
        .await
        .with_context(|| format!("failed to open input {}", args.input_file.display()))?;
    let mut output = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.output_file)
        .await
        .with_context(|| format!("failed to open output {}", args.output_file.display()))?;

    let scanner = Scanner::new(
        config.executor(UdpTransport::new()),
        &artifacts.catalog,
        &artifacts.classifier,
        config.workers,
    )?;
    tracing::info!(
        input = %args.input_file.display(),
        output = %args.output_file.display(),
        workers = config.workers,
        probes = artifacts.catalog.len(),
        "starting scan"
    );
    let summary = scanner.run(BufReader::new(input), &mut output).await?;

    eprintln!(
        "{} {} addresses classified in {} chunks ({} invalid lines, {:.1}s)",
        "Done:".green().bold(),
        summary.classified(),
        summary.chunks.len(),
        summary.invalid(),
        summary.elapsed().as_secs_f64(),
    );

    Ok(())
}
