//! `dnsver plan` - Plan provisioning images for a software manifest.

use anyhow::{Context as _, Result};
use dnsver_scan::{parse_manifest, plan_images};
use std::path::Path;

use super::Context;
use crate::cli::args::PlanArgs;

pub fn execute(ctx: &Context, args: &PlanArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.manifest)
        .with_context(|| format!("failed to read manifest {}", args.manifest.display()))?;
    let entries = parse_manifest(&content)?;

    let software_dir = args
        .software_dir
        .as_deref()
        .or_else(|| args.manifest.parent())
        .unwrap_or_else(|| Path::new("."));

    for planned in plan_images(&entries, &ctx.config.strategies, software_dir) {
        println!("{}", serde_json::to_string(&planned)?);
    }
    Ok(())
}
