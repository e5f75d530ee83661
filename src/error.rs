//! Error types for the pdf-processor library.
//!
//! Failures fall into disjoint tiers, and each tier has its own type:
//!
//! * [`OpenError`] — **Job-fatal**: the document could not be opened at all
//!   (password, not a PDF, unreadable). Detected once, before any page is
//!   touched, and reported downstream as a single `JobError` artifact whose
//!   text is exactly this error's `Display`.
//!
//! * [`PageError`] — **Page-recoverable**: one page failed after the
//!   document opened. Never escalated; the page processor degrades the page
//!   and the job moves on.
//!
//! * [`ProducerError`] — the producer *process* cannot continue (PDFium
//!   failed to bind, the output pipe closed). Maps to a non-zero exit.
//!
//! * [`StreamError`] / [`DumpError`] — the consumer received a malformed or
//!   truncated stream, or could not write its output files.

use std::path::PathBuf;
use thiserror::Error;

/// A failure to open the input document.
///
/// The `Display` text is the exact message written to `error.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpenError {
    /// The document has a user password and none (or a wrong one) was given.
    #[error("Failed to open PDF: file is password-protected")]
    PasswordProtected,

    /// The file is not structurally a PDF.
    #[error("Failed to open PDF: file is not a valid PDF")]
    InvalidFormat,

    /// The file is missing or cannot be read.
    #[error("Failed to open PDF: file not found or could not be opened")]
    FileUnreadable,

    /// Encrypted with a security handler the backend does not implement.
    #[error("Failed to open PDF: unsupported security scheme")]
    UnsupportedSecurity,

    /// Anything else the backend reports while loading.
    #[error("Failed to open PDF: unknown error: {0}")]
    Unknown(String),
}

/// A non-fatal error for a single page.
///
/// Logged and reported to the progress callback; the page still counts
/// toward the document's page count.
#[derive(Debug, Clone, PartialEq, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// The page could not be loaded or its text layer could not be read.
    #[error("Page {page}: text extraction failed: {detail}")]
    TextFailed { page: u32, detail: String },

    /// Rasterising or PNG-encoding the thumbnail failed.
    #[error("Page {page}: thumbnail rendering failed: {detail}")]
    RenderFailed { page: u32, detail: String },

    /// Inspecting page objects for the scanned-page heuristic failed.
    #[error("Page {page}: scan detection failed: {detail}")]
    ScanFailed { page: u32, detail: String },

    /// Copying the page into a standalone document failed.
    #[error("Page {page}: single-page split failed: {detail}")]
    SplitFailed { page: u32, detail: String },
}

impl PageError {
    /// The 1-based page number this error belongs to.
    pub fn page(&self) -> u32 {
        match self {
            PageError::TextFailed { page, .. }
            | PageError::RenderFailed { page, .. }
            | PageError::ScanFailed { page, .. }
            | PageError::SplitFailed { page, .. } => *page,
        }
    }
}

/// Fatal errors of the producer process.
#[derive(Debug, Error)]
pub enum ProducerError {
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Set PDFIUM_LIB_PATH (or pass --pdfium-lib) to the directory containing\n\
libpdfium, place the library in the working directory, or install it on\n\
the system library path.\n"
    )]
    PdfiumBindingFailed(String),

    /// Writing the artifact stream failed, usually because the consumer
    /// closed its end of the pipe.
    #[error("Failed to write artifact stream: {0}")]
    StreamWrite(#[source] std::io::Error),

    /// The encoder side hung up while the backend was still producing.
    #[error("Job cancelled: artifact stream closed before page {page}")]
    Cancelled { page: u32 },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while decoding an artifact stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The underlying reader failed.
    #[error("Failed to read artifact stream: {0}")]
    Io(#[source] std::io::Error),

    /// The input ended before the end-of-stream frame.
    #[error("Artifact stream truncated while reading {context}")]
    Truncated { context: &'static str },

    /// The input does not start with the stream magic.
    #[error("Not an artifact stream: bad magic {found:?}")]
    BadMagic { found: [u8; 4] },

    /// The stream was written by an incompatible encoder.
    #[error("Unsupported artifact stream version {0}")]
    UnsupportedVersion(u8),

    /// A frame carries a tag this decoder does not know.
    #[error("Unknown frame tag 0x{0:02x}")]
    UnknownTag(u8),

    /// A frame declares a payload larger than the configured limit.
    #[error("Frame payload of {len} bytes exceeds the {max}-byte limit")]
    PayloadTooLarge { len: u32, max: u32 },

    /// A frame's payload does not fit its tag.
    #[error("Malformed {kind} frame: {detail}")]
    InvalidPayload { kind: &'static str, detail: String },

    /// Frames arrived in an order the producer never emits.
    #[error("Out-of-order artifact stream: {0}")]
    OutOfOrder(String),

    /// Bytes follow the end-of-stream frame.
    #[error("Artifact stream has extra bytes after its end-of-stream frame")]
    TrailingBytes,
}

impl From<std::io::Error> for StreamError {
    fn from(e: std::io::Error) -> Self {
        StreamError::Io(e)
    }
}

/// Fatal errors of the consumer.
#[derive(Debug, Error)]
pub enum DumpError {
    /// The incoming stream was malformed or truncated.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// The output directory could not be created.
    #[error("Failed to create output directory '{path}': {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
