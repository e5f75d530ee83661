//! Per-page extraction with failure isolation.
//!
//! A page always yields its text and OCR flag, in that order, followed by
//! a thumbnail (when the thumbnail policy selects the page) and a
//! single-page PDF (split mode). Backend failures degrade the page instead
//! of failing the job:
//!
//! | failing step      | what is emitted                               |
//! |-------------------|-----------------------------------------------|
//! | text extraction   | empty text, `is-ocr = false`, nothing else    |
//! | scan detection    | `is-ocr = false`                              |
//! | thumbnail / split | everything except the failed artifact         |

use crate::artifact::Artifact;
use crate::config::JobConfig;
use crate::error::PageError;
use crate::pipeline::backend::DocumentHandle;
use tracing::{debug, warn};

/// What one page produced.
#[derive(Debug, Default)]
pub struct PageOutput {
    /// Artifacts in emission order.
    pub artifacts: Vec<Artifact>,
    /// Recoverable failures encountered along the way.
    pub errors: Vec<PageError>,
}

impl PageOutput {
    pub fn is_degraded(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Run every extraction step for the 1-based `page`.
pub fn process_page(doc: &dyn DocumentHandle, page: u32, config: &JobConfig) -> PageOutput {
    let mut out = PageOutput::default();

    let text = match doc.extract_text(page) {
        Ok(raw) => normalize_text(&raw, config.max_text_chars),
        Err(e) => {
            warn!(page, error = %e, "text extraction failed, page degraded to empty text");
            out.errors.push(e);
            out.artifacts.push(Artifact::PageText {
                page,
                text: String::new(),
            });
            out.artifacts.push(Artifact::PageIsOcr {
                page,
                is_ocr: false,
            });
            return out;
        }
    };
    out.artifacts.push(Artifact::PageText { page, text });

    let is_ocr = doc.detect_scanned(page).unwrap_or_else(|e| {
        warn!(page, error = %e, "scan detection failed, assuming born-digital");
        out.errors.push(e);
        false
    });
    out.artifacts.push(Artifact::PageIsOcr { page, is_ocr });

    if config.thumbnails.includes(page) {
        match doc.render_thumbnail(page, config.thumbnail_dimension) {
            Ok(png) => out.artifacts.push(Artifact::PageThumbnail { page, png }),
            Err(e) => {
                warn!(page, error = %e, "thumbnail skipped");
                out.errors.push(e);
            }
        }
    }

    if config.mode.splits_pages() {
        match doc.split_single_page(page) {
            Ok(pdf) => out.artifacts.push(Artifact::PageSplitPdf { page, pdf }),
            Err(e) => {
                warn!(page, error = %e, "single-page PDF skipped");
                out.errors.push(e);
            }
        }
    }

    debug!(
        page,
        artifacts = out.artifacts.len(),
        errors = out.errors.len(),
        "page processed"
    );
    out
}

/// Replace form feeds with spaces and cap the text at `max_chars` characters.
pub fn normalize_text(raw: &str, max_chars: usize) -> String {
    let mut text: String = raw
        .chars()
        .take(max_chars)
        .map(|c| if c == '\u{c}' { ' ' } else { c })
        .collect();
    text.shrink_to_fit();
    text
}
