//! Producer binary: extract one PDF and write its artifact stream to stdout.
//!
//! A thin shim over the library crate that maps CLI flags to `JobConfig`.
//! Only the framed stream goes to stdout; all diagnostics go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_processor::{
    run_job, ExtractMode, JobConfig, JobOutcome, JobProgressCallback, PdfiumBackend,
    ProgressCallback, ThumbnailPages,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"OUTPUT:
  A binary artifact stream on stdout. Pipe it into
  dump-split-pdf-and-extract-text-output to get one file per artifact:

    split-pdf-and-extract-text --only-extract=true in.pdf \
      | dump-split-pdf-and-extract-text-output out/

  A document that cannot be opened is not a process failure: the stream
  carries its error message and the exit status is 0.

PDFIUM:
  The pdfium shared library is looked up at --pdfium-lib / PDFIUM_LIB_PATH,
  then in the working directory, then on the system library path.
"#;

/// Split a PDF into per-page text, thumbnails, OCR flags and single-page PDFs.
#[derive(Parser, Debug)]
#[command(
    name = "split-pdf-and-extract-text",
    version,
    about = "Split a PDF into per-page artifacts streamed to stdout",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input PDF file.
    input: PathBuf,

    /// `true`: text, OCR flags and thumbnails only. `false`: also one PDF per page.
    #[arg(long, required = true, action = clap::ArgAction::Set, value_name = "true|false")]
    only_extract: bool,

    /// Which pages get a PNG thumbnail [default: first with
    /// --only-extract=true, all with --only-extract=false].
    #[arg(long, value_enum)]
    thumbnails_for_page: Option<ThumbnailArg>,

    /// Longest thumbnail edge in pixels.
    #[arg(long, default_value_t = pdf_processor::config::DEFAULT_THUMBNAIL_DIMENSION,
          value_parser = clap::value_parser!(u32).range(16..=10_000))]
    thumbnail_size: u32,

    /// Per-page text cap, in characters.
    #[arg(long, default_value_t = pdf_processor::config::DEFAULT_MAX_TEXT_CHARS)]
    max_text_chars: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF_PROCESSOR_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// pdfium shared library, or the directory containing it.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all diagnostics except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ThumbnailArg {
    First,
    All,
    None,
}

impl From<ThumbnailArg> for ThumbnailPages {
    fn from(v: ThumbnailArg) -> Self {
        match v {
            ThumbnailArg::First => ThumbnailPages::First,
            ThumbnailArg::All => ThumbnailPages::All,
            ThumbnailArg::None => ThumbnailPages::None,
        }
    }
}

/// Progress events as tracing lines on stderr.
struct LogProgress;

impl JobProgressCallback for LogProgress {
    fn on_job_start(&self, total_pages: u32) {
        info!(pages = total_pages, "document opened");
    }

    fn on_page_start(&self, page: u32, total_pages: u32) {
        debug!("page {page}/{total_pages}");
    }

    fn on_page_error(&self, page: u32, total_pages: u32, error: &str) {
        warn!("page {page}/{total_pages} degraded: {error}");
    }

    fn on_job_failed(&self, error: &str) {
        warn!("{error}");
    }
}

fn job_config(cli: &Cli) -> Result<JobConfig> {
    let mut builder = JobConfig::builder()
        .mode(ExtractMode::from_only_extract(cli.only_extract))
        .thumbnail_dimension(cli.thumbnail_size)
        .max_text_chars(cli.max_text_chars)
        .progress_callback(Arc::new(LogProgress) as ProgressCallback);
    if let Some(pages) = cli.thumbnails_for_page {
        builder = builder.thumbnails(pages.into());
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    builder.build().context("Invalid configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = job_config(&cli)?;
    debug!(?config, "configuration");

    // ── Run ──────────────────────────────────────────────────────────────
    let backend = PdfiumBackend::bind(cli.pdfium_lib.as_deref())
        .context("Failed to load the pdfium library")?;

    let stdout = tokio::io::BufWriter::new(tokio::io::stdout());
    let summary = run_job(backend, &cli.input, &config, stdout)
        .await
        .with_context(|| format!("Failed to process {}", cli.input.display()))?;

    match &summary.outcome {
        JobOutcome::Completed => info!(
            pages = ?summary.page_count,
            degraded = summary.degraded_pages,
            bytes = summary.bytes_written,
            "done"
        ),
        JobOutcome::Failed(e) => info!(error = %e, "done, job error reported in stream"),
    }
    Ok(())
}
