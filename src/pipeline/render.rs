//! PDFium rendering backend.
//!
//! ## Why a blocking thread?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which keeps
//! global state and is not safe to call from async contexts. The job runner
//! therefore drives this backend from `tokio::task::spawn_blocking`, one
//! page at a time. The backend is bound on the async side and moved onto
//! that thread, which needs `pdfium-render`'s `sync` feature.
//!
//! ## Owner vs. user passwords
//!
//! PDFium only refuses to load a document when a *user* password is needed.
//! Owner-password documents (print/copy restrictions only) load normally and
//! are extracted like any other document.

use crate::error::{OpenError, PageError, ProducerError};
use crate::pipeline::backend::{DocumentHandle, RenderingBackend};
use crate::pipeline::encode::{encode_png, thumbnail_dimensions};
use crate::pipeline::scan::ScanEvidence;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// [`RenderingBackend`] backed by a bound PDFium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind to the PDFium shared library.
    ///
    /// `library` may name the library file itself or the directory holding
    /// it. Without one, the working directory is tried first, then the
    /// system library path.
    pub fn bind(library: Option<&Path>) -> Result<Self, ProducerError> {
        let bindings = match library {
            Some(path) => {
                let path = if path.is_dir() {
                    path.join(platform_library_name())
                } else {
                    path.to_path_buf()
                };
                debug!(path = %path.display(), "binding pdfium");
                Pdfium::bind_to_library(&path)
            }
            None => Pdfium::bind_to_library(Path::new(".").join(platform_library_name()))
                .or_else(|_| Pdfium::bind_to_system_library()),
        }
        .map_err(|e| ProducerError::PdfiumBindingFailed(format!("{e:?}")))?;

        info!("pdfium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

/// File name of the pdfium shared library on this platform.
fn platform_library_name() -> PathBuf {
    PathBuf::from(format!(
        "{}pdfium{}",
        std::env::consts::DLL_PREFIX,
        std::env::consts::DLL_SUFFIX
    ))
}

impl RenderingBackend for PdfiumBackend {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn DocumentHandle + 'a>, OpenError> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, password)
            .map_err(classify_load_error)?;
        info!(
            path = %path.display(),
            pages = document.pages().len(),
            "PDF loaded"
        );
        Ok(Box::new(PdfiumDocument {
            pdfium: &self.pdfium,
            document,
        }))
    }
}

/// Map PDFium's load failure onto the job-fatal taxonomy.
fn classify_load_error(e: PdfiumError) -> OpenError {
    match e {
        PdfiumError::PdfiumLibraryInternalError(internal) => match internal {
            PdfiumInternalError::PasswordError => OpenError::PasswordProtected,
            PdfiumInternalError::FormatError => OpenError::InvalidFormat,
            PdfiumInternalError::FileError => OpenError::FileUnreadable,
            PdfiumInternalError::SecurityError => OpenError::UnsupportedSecurity,
            other => OpenError::Unknown(format!("{other:?}")),
        },
        other => OpenError::Unknown(format!("{other:?}")),
    }
}

struct PdfiumDocument<'a> {
    pdfium: &'a Pdfium,
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    fn load_page(&self, page: u32) -> Result<PdfPage<'a>, PdfiumError> {
        self.document.pages().get(page_index(page))
    }
}

fn page_index(page: u32) -> u16 {
    page.saturating_sub(1) as u16
}

impl DocumentHandle for PdfiumDocument<'_> {
    fn page_count(&self) -> u32 {
        self.document.pages().len() as u32
    }

    fn extract_text(&self, page: u32) -> Result<String, PageError> {
        let failed = |e: PdfiumError| PageError::TextFailed {
            page,
            detail: format!("{e:?}"),
        };
        let pdf_page = self.load_page(page).map_err(failed)?;
        let text = pdf_page.text().map_err(failed)?;
        Ok(text.all())
    }

    fn render_thumbnail(&self, page: u32, max_dimension: u32) -> Result<Vec<u8>, PageError> {
        let failed = |detail: String| PageError::RenderFailed { page, detail };
        let pdf_page = self.load_page(page).map_err(|e| failed(format!("{e:?}")))?;

        let (width, height) = thumbnail_dimensions(
            pdf_page.width().value,
            pdf_page.height().value,
            max_dimension,
        );
        let render_config = PdfRenderConfig::new().set_target_size(width as i32, height as i32);
        let bitmap = pdf_page
            .render_with_config(&render_config)
            .map_err(|e| failed(format!("{e:?}")))?;

        let image = bitmap.as_image();
        debug!(page, width = image.width(), height = image.height(), "rendered thumbnail");
        encode_png(&image).map_err(|e| failed(format!("PNG encoding failed: {e}")))
    }

    fn detect_scanned(&self, page: u32) -> Result<bool, PageError> {
        let pdf_page = self.load_page(page).map_err(|e| PageError::ScanFailed {
            page,
            detail: format!("{e:?}"),
        })?;

        let page_width = pdf_page.width().value;
        let page_height = pdf_page.height().value;
        let mut evidence = ScanEvidence {
            page_area: page_width * page_height,
            ..ScanEvidence::default()
        };

        for object in pdf_page.objects().iter() {
            match object.object_type() {
                PdfPageObjectType::Image => {
                    let w = object.width().map(|p| p.value).unwrap_or(0.0);
                    let h = object.height().map(|p| p.value).unwrap_or(0.0);
                    let area = w.clamp(0.0, page_width) * h.clamp(0.0, page_height);
                    evidence.largest_image_area = evidence.largest_image_area.max(area);
                }
                PdfPageObjectType::Text => {
                    if let Some(text) = object.as_text_object() {
                        if matches!(text.render_mode(), PdfPageTextRenderMode::Invisible) {
                            evidence.invisible_text_objects += 1;
                        } else {
                            evidence.visible_text_objects += 1;
                        }
                    }
                }
                _ => {}
            }
        }

        debug!(page, ?evidence, coverage = evidence.image_coverage(), "scan evidence");
        Ok(evidence.is_probably_scanned())
    }

    fn split_single_page(&self, page: u32) -> Result<Vec<u8>, PageError> {
        let failed = |e: PdfiumError| PageError::SplitFailed {
            page,
            detail: format!("{e:?}"),
        };
        let mut single = self.pdfium.create_new_pdf().map_err(failed)?;
        single
            .pages_mut()
            .copy_page_from_document(&self.document, page_index(page), 0)
            .map_err(failed)?;
        single.save_to_bytes().map_err(failed)
    }
}
