//! The job runner: one PDF in, one artifact stream out.
//!
//! ```text
//!  spawn_blocking                         async task
//! ┌──────────────────────────┐  mpsc   ┌─────────────────────────┐
//! │ open ─▶ PageCount        │ ──────▶ │ ArtifactEncoder ─▶ pipe │
//! │ page 1..=N ─▶ artifacts  │ bounded │                         │
//! └──────────────────────────┘         └─────────────────────────┘
//! ```
//!
//! PDFium is not async-safe, so all backend work happens on one blocking
//! thread. Artifacts cross to the async side through a bounded channel;
//! together with the pipe this gives end-to-end backpressure: a slow
//! consumer stalls the writer, which stalls the channel, which stalls the
//! backend.
//!
//! When the stream write fails (the consumer went away) the receiving end
//! is dropped, the backend's next send fails with
//! [`ProducerError::Cancelled`], and the job returns
//! [`ProducerError::StreamWrite`].

use crate::artifact::Artifact;
use crate::codec::ArtifactEncoder;
use crate::config::JobConfig;
use crate::error::{OpenError, ProducerError};
use crate::pipeline::backend::RenderingBackend;
use crate::pipeline::input::check_readable;
use crate::pipeline::page::process_page;
use crate::progress::{NoopProgressCallback, ProgressCallback};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// How a job ended. Both outcomes produce a complete, well-formed stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobOutcome {
    /// Every page was processed (some possibly degraded).
    Completed,
    /// The document could not be opened; the stream carries one `JobError`.
    Failed(OpenError),
}

/// What a finished job did.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub input: PathBuf,
    /// `None` when the document never opened.
    pub page_count: Option<u32>,
    /// Pages that hit at least one recoverable error.
    pub degraded_pages: u32,
    /// Artifact frames written, excluding the end-of-stream frame.
    pub frames_written: u64,
    /// Stream bytes written before the end-of-stream frame.
    pub bytes_written: u64,
    pub outcome: JobOutcome,
}

/// The backend thread's view of the job, before the stream is finished.
#[derive(Debug)]
struct JobReport {
    page_count: Option<u32>,
    degraded_pages: u32,
    outcome: JobOutcome,
}

/// Run one job: open `input` with `backend`, extract every page, and write
/// the framed artifact stream to `writer`.
///
/// Returns `Ok` both when the job completed and when the document could
/// not be opened (that failure is data, carried in the stream). Returns
/// `Err` only when the stream itself could not be produced.
///
/// # Example
/// ```rust,no_run
/// use pdf_processor::{run_job, JobConfig, PdfiumBackend};
/// use std::path::Path;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = PdfiumBackend::bind(None)?;
///     let config = JobConfig::default();
///     let summary = run_job(backend, Path::new("input.pdf"), &config, tokio::io::stdout()).await?;
///     eprintln!("{summary:?}");
///     Ok(())
/// }
/// ```
pub async fn run_job<B, W>(
    backend: B,
    input: &Path,
    config: &JobConfig,
    writer: W,
) -> Result<JobSummary, ProducerError>
where
    B: RenderingBackend,
    W: AsyncWrite + Unpin,
{
    info!(input = %input.display(), mode = ?config.mode, "starting job");

    let (tx, rx) = mpsc::channel(config.channel_capacity);
    let path = input.to_path_buf();
    let job_config = config.clone();
    let worker = tokio::task::spawn_blocking(move || {
        let mut sink = tx;
        drive_job(&backend, &path, &job_config, &mut sink)
    });

    // ── Encode artifacts as they arrive ──────────────────────────────────
    let mut encoder = ArtifactEncoder::new(writer);
    let mut artifacts = ReceiverStream::new(rx);
    let mut write_error = None;
    while let Some(artifact) = artifacts.next().await {
        if let Err(e) = encoder.write_artifact(&artifact).await {
            warn!(error = %e, "artifact stream write failed, cancelling job");
            write_error = Some(e);
            break;
        }
    }
    // Closing the receiver stops the backend at its next send.
    drop(artifacts);

    let report = worker
        .await
        .map_err(|e| ProducerError::Internal(format!("job worker failed: {e}")))?;
    if let Some(e) = write_error {
        return Err(ProducerError::StreamWrite(e));
    }
    let report = report?;

    // ── Finish the stream ────────────────────────────────────────────────
    let frames_written = encoder.frames_written();
    let bytes_written = encoder.bytes_written();
    encoder.finish().await.map_err(ProducerError::StreamWrite)?;

    let summary = JobSummary {
        input: input.to_path_buf(),
        page_count: report.page_count,
        degraded_pages: report.degraded_pages,
        frames_written,
        bytes_written,
        outcome: report.outcome,
    };
    info!(
        pages = ?summary.page_count,
        degraded = summary.degraded_pages,
        frames = summary.frames_written,
        bytes = summary.bytes_written,
        "job finished"
    );
    Ok(summary)
}

/// Where the backend thread hands its artifacts.
trait ArtifactSink {
    fn emit(&mut self, artifact: Artifact) -> Result<(), ProducerError>;
}

impl ArtifactSink for mpsc::Sender<Artifact> {
    fn emit(&mut self, artifact: Artifact) -> Result<(), ProducerError> {
        let page = artifact.page().unwrap_or(0);
        self.blocking_send(artifact)
            .map_err(|_| ProducerError::Cancelled { page })
    }
}

/// The job state machine, run synchronously on the backend thread.
fn drive_job<B: RenderingBackend>(
    backend: &B,
    path: &Path,
    config: &JobConfig,
    sink: &mut impl ArtifactSink,
) -> Result<JobReport, ProducerError> {
    let progress: ProgressCallback = config
        .progress_callback
        .clone()
        .unwrap_or_else(|| Arc::new(NoopProgressCallback));

    // ── Opening ──────────────────────────────────────────────────────────
    let opened =
        check_readable(path).and_then(|()| backend.open(path, config.password.as_deref()));
    let document = match opened {
        Ok(document) => document,
        Err(e) => {
            let message = e.to_string();
            warn!(input = %path.display(), error = %message, "job failed");
            progress.on_job_failed(&message);
            sink.emit(Artifact::JobError(message))?;
            return Ok(JobReport {
                page_count: None,
                degraded_pages: 0,
                outcome: JobOutcome::Failed(e),
            });
        }
    };

    // ── Counting ─────────────────────────────────────────────────────────
    let total = document.page_count();
    debug!(pages = total, "document opened");
    progress.on_job_start(total);
    sink.emit(Artifact::PageCount(total))?;

    // ── Pages ────────────────────────────────────────────────────────────
    let mut degraded_pages = 0;
    for page in 1..=total {
        progress.on_page_start(page, total);
        let output = process_page(&*document, page, config);

        for e in &output.errors {
            progress.on_page_error(page, total, &e.to_string());
        }
        if output.is_degraded() {
            degraded_pages += 1;
        }

        let emitted = output.artifacts.len();
        for artifact in output.artifacts {
            sink.emit(artifact)?;
        }
        progress.on_page_complete(page, total, emitted);
    }

    progress.on_job_complete(total, degraded_pages);
    Ok(JobReport {
        page_count: Some(total),
        degraded_pages,
        outcome: JobOutcome::Completed,
    })
}
