//! # pdf-processor
//!
//! Split a PDF into per-page artifacts and stream them to a consumer.
//!
//! A *producer* opens one document with PDFium and extracts, page by page,
//! the text layer, an "is this a scan?" flag, a PNG thumbnail and, in split
//! mode, a standalone single-page PDF. Everything is written to one framed
//! byte stream. A *consumer* reads that stream and writes one file per
//! artifact into a directory.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Open     PDFium load; a failure becomes a single JobError artifact
//!  ├─ 2. Count    PageCount(N)
//!  ├─ 3. Pages    text, is-ocr, thumbnail, split PDF (spawn_blocking)
//!  ├─ 4. Encode   framed artifact stream ─▶ stdout / any AsyncWrite
//!  └─ 5. Dump     decode, validate order, one file per artifact
//! ```
//!
//! Failures come in two tiers. A document that cannot be opened is
//! *job-fatal* and produces only `error.txt`. A page whose extraction fails
//! is *page-recoverable*: it degrades (empty text, missing thumbnail) and
//! the job continues. See [`error`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_processor::{dump_stream, run_job, JobConfig, PdfiumBackend};
//! use pdf_processor::codec::frame::DEFAULT_MAX_PAYLOAD_LEN;
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = PdfiumBackend::bind(None)?;
//!     let config = JobConfig::default();
//!
//!     // Producer and consumer in one process, joined by an in-memory pipe.
//!     let (writer, reader) = tokio::io::duplex(64 * 1024);
//!     let (job, dump) = tokio::join!(
//!         run_job(backend, Path::new("document.pdf"), &config, writer),
//!         dump_stream(reader, Path::new("out"), DEFAULT_MAX_PAYLOAD_LEN),
//!     );
//!     eprintln!("{:?}", job?);
//!     eprintln!("{:?}", dump?);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables both binaries (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-processor = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod artifact;
pub mod codec;
pub mod config;
pub mod consumer;
pub mod error;
pub mod pipeline;
pub mod producer;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use artifact::{Artifact, ArtifactKind};
pub use codec::{ArtifactDecoder, ArtifactEncoder};
pub use config::{ExtractMode, JobConfig, JobConfigBuilder, ThumbnailPages};
pub use consumer::{dump_stream, DumpSummary};
pub use error::{DumpError, OpenError, PageError, ProducerError, StreamError};
pub use pipeline::backend::{DocumentHandle, RenderingBackend};
pub use pipeline::render::PdfiumBackend;
pub use producer::{run_job, JobOutcome, JobSummary};
pub use progress::{JobProgressCallback, NoopProgressCallback, ProgressCallback};
