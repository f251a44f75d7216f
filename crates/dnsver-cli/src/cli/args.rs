//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use dnsver_core::{Granularity, IpTarget};
use std::path::PathBuf;

/// Identify the DNS server software behind IP addresses
///
/// Sends a curated set of DNS queries to each address and classifies the
/// responses with a pre-trained decision tree.
#[derive(Parser, Debug)]
#[command(name = "dnsver")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(short, long, env = "DNSVER_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding models/ and queries/
    #[arg(short, long, env = "DNSVER_DATA_DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Classify every address listed in a file
    Scan(ScanArgs),

    /// Classify a single address
    Probe(ProbeArgs),

    /// Dump raw probe signatures of one address
    Collect(CollectArgs),

    /// Plan provisioning images for a software manifest
    Plan(PlanArgs),
}

/// Options shared by commands that send probes
#[derive(Args, Debug, Clone, Default)]
pub struct ProbeOptions {
    /// Per-probe timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Retries for probes that time out or fail
    #[arg(long)]
    pub retries: Option<u32>,

    /// DNS port to probe
    #[arg(long)]
    pub port: Option<u16>,
}

// ============================================================================
// Scan command
// ============================================================================

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Input file with one IP address per line
    #[arg(short, long = "input_file", visible_alias = "input-file")]
    pub input_file: PathBuf,

    /// Output file; NDJSON results are appended
    #[arg(short, long = "output_file", visible_alias = "output-file")]
    pub output_file: PathBuf,

    /// Number of concurrent targets, also the chunk size [default: 100]
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Fingerprinting granularity: vendor, major, minor or build
    #[arg(short, long)]
    pub granularity: Granularity,

    #[command(flatten)]
    pub probe: ProbeOptions,
}

// ============================================================================
// Probe command
// ============================================================================

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Address to fingerprint
    pub ip: IpTarget,

    /// Fingerprinting granularity: vendor, major, minor or build
    #[arg(short, long)]
    pub granularity: Granularity,

    #[command(flatten)]
    pub probe: ProbeOptions,
}

// ============================================================================
// Collect command
// ============================================================================

#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Address of a provisioned DNS software instance
    pub ip: IpTarget,

    /// Only send the probes this granularity needs (default: every probe)
    #[arg(short, long)]
    pub granularity: Option<Granularity>,

    /// Append records to this file instead of stdout
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,

    #[command(flatten)]
    pub probe: ProbeOptions,
}

// ============================================================================
// Plan command
// ============================================================================

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Manifest with one vendor/<dir>/version line per entry
    pub manifest: PathBuf,

    /// Directory holding the Dockerfile directories (default: manifest's directory)
    #[arg(short, long)]
    pub software_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_flags() {
        let cli = Cli::parse_from([
            "dnsver", "scan", "--input_file", "ips.txt", "--output-file", "out.json", "-t", "50", "-g", "minor",
        ]);
        let Commands::Scan(args) = cli.command else {
            panic!("expected scan");
        };
        assert_eq!(args.input_file, PathBuf::from("ips.txt"));
        assert_eq!(args.output_file, PathBuf::from("out.json"));
        assert_eq!(args.threads, Some(50));
        assert_eq!(args.granularity, Granularity::Minor);
    }

    #[test]
    fn test_rejects_bad_granularity_and_ip() {
        assert!(Cli::try_parse_from(["dnsver", "probe", "192.0.2.1", "-g", "patch"]).is_err());
        assert!(Cli::try_parse_from(["dnsver", "probe", "not-an-ip", "-g", "vendor"]).is_err());
    }
}
