//! The typed units of output that flow from producer to consumer.
//!
//! A successful job is one `PageCount` followed by page artifacts in
//! ascending page order; a failed job is a single `JobError`. The two
//! shapes never mix.

use std::fmt;

/// One typed unit of output.
///
/// Page numbers are 1-based.
#[derive(Clone, PartialEq, Eq)]
pub enum Artifact {
    /// Number of pages in the document. First artifact of a successful job.
    PageCount(u32),
    /// Extracted text for a page; may be empty.
    PageText { page: u32, text: String },
    /// PNG thumbnail for a page.
    PageThumbnail { page: u32, png: Vec<u8> },
    /// Whether the page looks like a scanned image.
    PageIsOcr { page: u32, is_ocr: bool },
    /// A standalone single-page PDF.
    PageSplitPdf { page: u32, pdf: Vec<u8> },
    /// Job-fatal error; the only artifact of a failed job.
    JobError(String),
}

/// The discriminant of an [`Artifact`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    PageCount,
    PageText,
    PageThumbnail,
    PageIsOcr,
    PageSplitPdf,
    JobError,
}

impl ArtifactKind {
    /// Human-readable name used in logs and error messages.
    pub fn name(self) -> &'static str {
        match self {
            ArtifactKind::PageCount => "page-count",
            ArtifactKind::PageText => "page-text",
            ArtifactKind::PageThumbnail => "page-thumbnail",
            ArtifactKind::PageIsOcr => "page-is-ocr",
            ArtifactKind::PageSplitPdf => "page-split-pdf",
            ArtifactKind::JobError => "job-error",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Artifact {
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::PageCount(_) => ArtifactKind::PageCount,
            Artifact::PageText { .. } => ArtifactKind::PageText,
            Artifact::PageThumbnail { .. } => ArtifactKind::PageThumbnail,
            Artifact::PageIsOcr { .. } => ArtifactKind::PageIsOcr,
            Artifact::PageSplitPdf { .. } => ArtifactKind::PageSplitPdf,
            Artifact::JobError(_) => ArtifactKind::JobError,
        }
    }

    /// The page this artifact belongs to, or `None` for document-level ones.
    pub fn page(&self) -> Option<u32> {
        match self {
            Artifact::PageCount(_) | Artifact::JobError(_) => None,
            Artifact::PageText { page, .. }
            | Artifact::PageThumbnail { page, .. }
            | Artifact::PageIsOcr { page, .. }
            | Artifact::PageSplitPdf { page, .. } => Some(*page),
        }
    }

    /// Size of the artifact's payload in bytes.
    pub fn payload_len(&self) -> usize {
        match self {
            Artifact::PageCount(_) => 4,
            Artifact::PageText { text, .. } => text.len(),
            Artifact::PageThumbnail { png, .. } => png.len(),
            Artifact::PageIsOcr { .. } => 1,
            Artifact::PageSplitPdf { pdf, .. } => pdf.len(),
            Artifact::JobError(message) => message.len(),
        }
    }
}

// Binary payloads can be megabytes; keep Debug output to a summary.
impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::PageCount(n) => f.debug_tuple("PageCount").field(n).finish(),
            Artifact::PageText { page, text } => f
                .debug_struct("PageText")
                .field("page", page)
                .field("text", text)
                .finish(),
            Artifact::PageThumbnail { page, png } => f
                .debug_struct("PageThumbnail")
                .field("page", page)
                .field("bytes", &png.len())
                .finish(),
            Artifact::PageIsOcr { page, is_ocr } => f
                .debug_struct("PageIsOcr")
                .field("page", page)
                .field("is_ocr", is_ocr)
                .finish(),
            Artifact::PageSplitPdf { page, pdf } => f
                .debug_struct("PageSplitPdf")
                .field("page", page)
                .field("bytes", &pdf.len())
                .finish(),
            Artifact::JobError(message) => f.debug_tuple("JobError").field(message).finish(),
        }
    }
}
