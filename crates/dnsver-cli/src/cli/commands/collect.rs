//! `dnsver collect` - Dump raw probe signatures for a training corpus.

use anyhow::{Context as _, Result};
use colored::Colorize;
use dnsver_probe::{default_dimensions, ProbeCatalog, UdpTransport};
use tokio::fs::OpenOptions;

use super::Context;
use crate::cli::args::CollectArgs;

pub async fn execute(ctx: &Context, args: CollectArgs) -> Result<()> {
    let config = ctx.scan_config(Some(1), &args.probe)?;
    let dimensions = default_dimensions();
    let catalog = match args.granularity {
        Some(granularity) => {
            let needed = ctx.paths.load_probe_names(granularity)?;
            ProbeCatalog::select(&dimensions, &needed)
        }
        None => ProbeCatalog::full(&dimensions),
    };
    let executor = config.executor(UdpTransport::new());

    let failed = match &args.output_file {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .await
                .with_context(|| format!("failed to open output {}", path.display()))?;
            dnsver_scan::collect(&executor, &catalog, args.ip, &mut file).await?
        }
        None => dnsver_scan::collect(&executor, &catalog, args.ip, &mut tokio::io::stdout()).await?,
    };

    if failed > 0 {
        eprintln!(
            "{} {failed} of {} probes got no usable response from {}",
            "Warning:".yellow().bold(),
            catalog.len(),
            args.ip
        );
    }
    Ok(())
}
