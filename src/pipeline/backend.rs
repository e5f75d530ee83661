//! The rendering-backend seam.
//!
//! The job runner never talks to PDFium directly; it opens documents
//! through [`RenderingBackend`] and works page by page through
//! [`DocumentHandle`]. [`crate::pipeline::render::PdfiumBackend`] is the
//! production implementation; tests plug in an in-memory one.
//!
//! Page numbers are 1-based throughout.

use crate::error::{OpenError, PageError};
use std::path::Path;

/// Opens documents.
///
/// Implementations are moved onto a blocking worker thread for the
/// duration of a job, hence `Send + 'static`.
pub trait RenderingBackend: Send + 'static {
    /// Open the document at `path`.
    ///
    /// Documents that restrict permissions but carry no user password must
    /// open normally.
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn DocumentHandle + 'a>, OpenError>;
}

/// Per-page operations on an open document.
///
/// Calls are sequential; a handle is never shared between threads.
pub trait DocumentHandle {
    fn page_count(&self) -> u32;

    /// Extract the page's text layer, including invisible (OCR) text.
    fn extract_text(&self, page: u32) -> Result<String, PageError>;

    /// Render the page as a PNG whose longest edge is `max_dimension` px.
    fn render_thumbnail(&self, page: u32, max_dimension: u32) -> Result<Vec<u8>, PageError>;

    /// Whether the page looks like a scanned image rather than born-digital.
    fn detect_scanned(&self, page: u32) -> Result<bool, PageError>;

    /// A standalone PDF containing only this page.
    fn split_single_page(&self, page: u32) -> Result<Vec<u8>, PageError>;
}
