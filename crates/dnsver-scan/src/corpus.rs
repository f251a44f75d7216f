//! Raw signature collection for training corpora.
//!
//! Probes a provisioned instance with a catalog and emits one record per
//! probe. The training pipeline labels these with the instance's version.

use serde::Serialize;
use std::net::IpAddr;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use dnsver_core::{CanonicalSignature, IpTarget, Result};
use dnsver_probe::{ProbeCatalog, Prober};

/// One probe's canonical signature for one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusRecord {
    /// Probed address
    pub ip: IpAddr,
    /// Probe name
    pub probe: String,
    /// Canonical response attributes
    pub signature: CanonicalSignature,
}

/// Run every catalog probe against `target` and write the records as NDJSON.
///
/// Returns the number of probes that failed (timeouts, socket errors,
/// undecodable responses).
pub async fn collect<P, W>(prober: &P, catalog: &ProbeCatalog, target: IpTarget, output: &mut W) -> Result<usize>
where
    P: Prober + ?Sized,
    W: AsyncWrite + Unpin,
{
    let ip = target.addr();
    let entry = prober.probe_all(ip, catalog.probes()).await;

    let mut failed = 0;
    let mut buf = Vec::new();
    for (probe, signature) in entry.signatures {
        if signature.failure_kind().is_some() {
            failed += 1;
        }
        let record = CorpusRecord {
            ip,
            probe,
            signature: signature.canonicalize(),
        };
        serde_json::to_writer(&mut buf, &record)?;
        buf.push(b'\n');
    }

    output.write_all(&buf).await?;
    output.flush().await?;

    tracing::info!(%ip, probes = catalog.len(), failed, "collected signatures");
    Ok(failed)
}
