//! Chunked scan loop.
//!
//! Per chunk: `READ -> VALIDATE -> DISPATCH -> AGGREGATE -> ENCODE ->
//! CLASSIFY -> APPEND`. Chunks run strictly one after another, so at most
//! one chunk of signatures is held in memory and only one writer touches
//! the output.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Semaphore;

use dnsver_core::{
    ClassificationResult, Classifier, DecisionTree, DnsverError, IpSignatures, IpTarget, Model,
    ProbeDefinition, Result,
};
use dnsver_probe::{ProbeCatalog, Prober};

/// What happened to one chunk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkReport {
    /// Zero-based chunk number
    pub index: usize,
    /// Input lines read
    pub lines: usize,
    /// Distinct valid addresses probed
    pub valid: usize,
    /// Lines rejected as invalid addresses
    pub invalid: usize,
    /// Records appended to the output
    pub classified: usize,
}

/// Outcome of a whole scan run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    /// Per-chunk reports in order
    pub chunks: Vec<ChunkReport>,
    /// When the run started
    pub started: DateTime<Utc>,
    /// When the last chunk was appended
    pub finished: DateTime<Utc>,
}

impl ScanSummary {
    /// Records written across all chunks
    #[must_use]
    pub fn classified(&self) -> usize {
        self.chunks.iter().map(|c| c.classified).sum()
    }

    /// Invalid lines across all chunks
    #[must_use]
    pub fn invalid(&self) -> usize {
        self.chunks.iter().map(|c| c.invalid).sum()
    }

    /// Wall-clock duration of the run; zero if the clock went backwards
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        (self.finished - self.started).to_std().unwrap_or_default()
    }
}

/// Drives probing and classification over a list of targets.
///
/// The prober and probe list are shared read-only with the worker tasks;
/// the classifier is borrowed for the lifetime of the scanner.
pub struct Scanner<'a, P, M = DecisionTree> {
    prober: Arc<P>,
    probes: Arc<[ProbeDefinition]>,
    classifier: &'a Classifier<M>,
    workers: usize,
}

impl<'a, P, M> Scanner<'a, P, M>
where
    P: Prober + 'static,
    M: Model,
{
    /// Create a scanner bounded to `workers` concurrent targets
    pub fn new(prober: P, catalog: &ProbeCatalog, classifier: &'a Classifier<M>, workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(DnsverError::Config("worker count must be at least 1".into()));
        }
        Ok(Self {
            prober: Arc::new(prober),
            probes: catalog.probes().into(),
            classifier,
            workers,
        })
    }

    /// Scan every line of `input`, appending NDJSON records to `output`.
    ///
    /// Invalid lines are logged and skipped. I/O errors on either stream and
    /// classification errors abort the run.
    pub async fn run<R, W>(&self, mut input: R, output: &mut W) -> Result<ScanSummary>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let started = Utc::now();
        let mut chunks = Vec::new();

        loop {
            let chunk = read_chunk(&mut input, self.workers).await?;
            if chunk.is_empty() {
                break;
            }

            let index = chunks.len();
            let (targets, invalid) = validate(&chunk);
            let mut report = ChunkReport {
                index,
                lines: chunk.len(),
                valid: targets.len(),
                invalid,
                classified: 0,
            };

            if !targets.is_empty() {
                let batch = self.dispatch(&targets).await;
                let results = self.classify(&batch)?;
                append(output, &results).await?;
                report.classified = results.len();
            }

            tracing::info!(
                chunk = index,
                lines = report.lines,
                valid = report.valid,
                invalid = report.invalid,
                classified = report.classified,
                "chunk complete"
            );
            chunks.push(report);
        }

        Ok(ScanSummary {
            chunks,
            started,
            finished: Utc::now(),
        })
    }

    /// Probe and classify a single target
    pub async fn scan_one(&self, target: IpTarget) -> Result<ClassificationResult> {
        let batch = self.dispatch(&[target.addr()]).await;
        self.classify(&batch)?
            .pop()
            .ok_or_else(|| DnsverError::Probe(format!("probing {target} produced no result")))
    }

    /// Probe every target concurrently, one task per target, and wait for
    /// all of them. Results keep the order of `targets`.
    async fn dispatch(&self, targets: &[IpAddr]) -> Vec<IpSignatures> {
        let limit = self.workers.min(targets.len());
        let semaphore = Arc::new(Semaphore::new(limit));

        let handles: Vec<_> = targets
            .iter()
            .map(|&ip| {
                let sem = semaphore.clone();
                let prober = self.prober.clone();
                let probes = self.probes.clone();
                tokio::spawn(async move {
                    let _permit = sem.acquire_owned().await.ok()?;
                    Some(prober.probe_all(ip, &probes).await)
                })
            })
            .collect();

        // A lost worker still yields a row, with no probe answered.
        let mut batch = Vec::with_capacity(targets.len());
        for (&ip, joined) in targets.iter().zip(futures_util::future::join_all(handles).await) {
            match joined {
                Ok(Some(entry)) => batch.push(entry),
                Ok(None) => {
                    tracing::error!(%ip, "worker pool closed before target was probed");
                    batch.push(IpSignatures::new(ip));
                }
                Err(e) => {
                    tracing::error!(%ip, error = %e, "probe worker failed");
                    batch.push(IpSignatures::new(ip));
                }
            }
        }
        batch
    }

    /// Encode a chunk against the model schema and classify every row
    fn classify(&self, batch: &[IpSignatures]) -> Result<Vec<ClassificationResult>> {
        let encoded = self.classifier.schema().encode(batch);
        if encoded.dropped > 0 {
            tracing::debug!(dropped = encoded.dropped, "batch features unknown to the model");
        }

        encoded
            .rows
            .iter()
            .map(|row| {
                let label = self.classifier.classify(&row.features)?;
                Ok::<_, DnsverError>(ClassificationResult::from_label(row.ip, label))
            })
            .collect()
    }
}

/// Read up to `size` raw lines; an empty chunk means end of input.
///
/// Lines are kept as bytes so a non-UTF-8 line is rejected by
/// [`validate`] instead of failing the read.
async fn read_chunk<R>(input: &mut R, size: usize) -> Result<Vec<Vec<u8>>>
where
    R: AsyncBufRead + Unpin,
{
    let mut chunk = Vec::with_capacity(size);
    while chunk.len() < size {
        let mut line = Vec::new();
        if input.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        chunk.push(line);
    }
    Ok(chunk)
}

/// Parse each line as an address.
///
/// Returns distinct valid targets in input order and the count of rejected
/// lines. Blank lines are skipped without counting as invalid.
fn validate(chunk: &[Vec<u8>]) -> (Vec<IpAddr>, usize) {
    let mut seen = HashSet::new();
    let mut targets = Vec::with_capacity(chunk.len());
    let mut invalid = 0;

    for raw in chunk {
        let Ok(line) = std::str::from_utf8(raw) else {
            tracing::warn!(line = %String::from_utf8_lossy(raw), "skipping input line that is not UTF-8");
            invalid += 1;
            continue;
        };
        if line.trim().is_empty() {
            continue;
        }
        match IpTarget::parse(line) {
            Ok(target) => {
                if seen.insert(target) {
                    targets.push(target.addr());
                } else {
                    tracing::debug!(ip = %target, "duplicate address in chunk");
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "skipping input line");
                invalid += 1;
            }
        }
    }
    (targets, invalid)
}

/// Write one JSON line per result and flush
async fn append<W>(output: &mut W, results: &[ClassificationResult]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();
    for result in results {
        serde_json::to_writer(&mut buf, result)?;
        buf.push(b'\n');
    }
    output.write_all(&buf).await?;
    output.flush().await?;
    Ok(())
}
