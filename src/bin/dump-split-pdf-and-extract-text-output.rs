//! Consumer binary: read an artifact stream from stdin and write its files.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_processor::codec::frame::DEFAULT_MAX_PAYLOAD_LEN;
use pdf_processor::dump_stream;
use std::io;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"FILES:
  n-pages        page count, in decimal
  p<N>.txt       text of page N
  p<N>.is-ocr    "true" when page N looks like a scan
  p<N>.png       thumbnail of page N
  p<N>.pdf       page N as a standalone PDF (split mode)
  error.txt      why the document could not be opened

  Existing files in OUTDIR are kept. The exit status is non-zero when the
  stream is malformed or truncated.
"#;

/// Write the artifacts of a split-pdf-and-extract-text stream into a directory.
#[derive(Parser, Debug)]
#[command(
    name = "dump-split-pdf-and-extract-text-output",
    version,
    about = "Demultiplex an artifact stream from stdin into one file per artifact",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Output directory; created if missing.
    outdir: PathBuf,

    /// Print a JSON summary of the files written to stdout.
    #[arg(long)]
    json: bool,

    /// Reject frames with a larger payload.
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD_LEN)]
    max_payload_bytes: u32,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all diagnostics except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

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

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let summary = dump_stream(stdin, &cli.outdir, cli.max_payload_bytes)
        .await
        .with_context(|| format!("Failed to dump artifact stream into {}", cli.outdir.display()))?;

    info!(files = summary.files.len(), "done");
    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{json}");
    }
    Ok(())
}
