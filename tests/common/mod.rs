//! Shared helpers for the integration tests.
//!
//! [`FakeBackend`] stands in for PDFium. It recognises inputs by file name
//! and models the behaviour of the real sample documents, so the whole
//! producer → pipe → consumer path runs without a pdfium library.

#![allow(dead_code)]

use pdf_processor::codec::frame::DEFAULT_MAX_PAYLOAD_LEN;
use pdf_processor::{
    dump_stream, run_job, DocumentHandle, DumpError, DumpSummary, JobConfig, JobSummary,
    OpenError, PageError, ProducerError, RenderingBackend,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PASSWORD: &str = "s3cret";

#[derive(Clone)]
struct FakePage {
    /// `None` models a page whose content stream is broken.
    text: Option<&'static str>,
    scanned: bool,
}

impl FakePage {
    fn text(text: &'static str) -> Self {
        Self {
            text: Some(text),
            scanned: false,
        }
    }

    fn scanned(ocr_text: &'static str) -> Self {
        Self {
            text: Some(ocr_text),
            scanned: true,
        }
    }

    fn broken() -> Self {
        Self {
            text: None,
            scanned: false,
        }
    }
}

/// In-memory documents keyed by input file name.
pub struct FakeBackend;

impl RenderingBackend for FakeBackend {
    fn open<'a>(
        &'a self,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Box<dyn DocumentHandle + 'a>, OpenError> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        let pages = match name {
            "2-pages.pdf" => vec![FakePage::text("Page 1"), FakePage::text("Page 2")],
            "empty-page-encrypted.pdf" if password == Some(PASSWORD) => {
                vec![FakePage::text("")]
            }
            "empty-page-encrypted.pdf" => return Err(OpenError::PasswordProtected),
            "not-a-pdf.pdf" => return Err(OpenError::InvalidFormat),
            "owner-protected.pdf" => vec![FakePage::text("foo")],
            "empty-page.pdf" => vec![FakePage::text("")],
            "2nd-page-invalid.pdf" => vec![FakePage::text("Page 1"), FakePage::broken()],
            "ocr-on-p1.pdf" => vec![FakePage::scanned("Page 1"), FakePage::text("Page 2")],
            "form-feed.pdf" => vec![FakePage::text("one\u{c}two")],
            "zero-pages.pdf" => vec![],
            "long.pdf" => vec![FakePage::text("lorem ipsum"); 40],
            other => return Err(OpenError::Unknown(format!("no fake for {other}"))),
        };
        Ok(Box::new(FakeDoc { pages }))
    }
}

struct FakeDoc {
    pages: Vec<FakePage>,
}

impl FakeDoc {
    fn page(&self, page: u32) -> &FakePage {
        &self.pages[(page - 1) as usize]
    }
}

impl DocumentHandle for FakeDoc {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn extract_text(&self, page: u32) -> Result<String, PageError> {
        self.page(page)
            .text
            .map(str::to_string)
            .ok_or(PageError::TextFailed {
                page,
                detail: "content stream is not valid".into(),
            })
    }

    fn render_thumbnail(&self, page: u32, max_dimension: u32) -> Result<Vec<u8>, PageError> {
        Ok(fake_png(page, max_dimension))
    }

    fn detect_scanned(&self, page: u32) -> Result<bool, PageError> {
        Ok(self.page(page).scanned)
    }

    fn split_single_page(&self, page: u32) -> Result<Vec<u8>, PageError> {
        Ok(fake_pdf(page))
    }
}

pub fn fake_png(page: u32, max_dimension: u32) -> Vec<u8> {
    format!("\u{89}PNG page {page} @ {max_dimension}px").into_bytes()
}

pub fn fake_pdf(page: u32) -> Vec<u8> {
    format!("%PDF-1.7\n% page {page}\n%%EOF\n").into_bytes()
}

/// Everything a pipeline run left behind.
pub struct Run {
    pub job: Result<JobSummary, ProducerError>,
    pub dump: Result<DumpSummary, DumpError>,
    pub out: TempDir,
    _inputs: TempDir,
}

impl Run {
    pub fn path(&self, name: &str) -> PathBuf {
        self.out.path().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.path(name))
            .unwrap_or_else(|e| panic!("{name} should exist ({e}); files: {:?}", self.files()))
    }

    pub fn read_bytes(&self, name: &str) -> Vec<u8> {
        std::fs::read(self.path(name))
            .unwrap_or_else(|e| panic!("{name} should exist ({e}); files: {:?}", self.files()))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path(name).is_file()
    }

    pub fn files(&self) -> Vec<String> {
        list_files(self.out.path())
    }
}

/// Sorted file names in `dir`.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Run producer and consumer concurrently over an in-memory pipe, the way
/// the two binaries run over a shell pipe.
pub async fn run_pipeline(fixture: &str, config: &JobConfig) -> Run {
    let inputs = tempfile::tempdir().expect("input dir");
    let input = inputs.path().join(fixture);
    std::fs::write(&input, b"%PDF-1.7 fake body").expect("write input");
    let out = tempfile::tempdir().expect("output dir");

    // A small pipe makes the producer wait on the consumer.
    let (writer, reader) = tokio::io::duplex(256);
    let (job, dump) = tokio::join!(
        run_job(FakeBackend, &input, config, writer),
        dump_stream(reader, out.path(), DEFAULT_MAX_PAYLOAD_LEN),
    );

    Run {
        job,
        dump,
        out,
        _inputs: inputs,
    }
}

/// Encode a job's stream into memory instead of a pipe.
pub async fn produce_bytes(fixture: &str, config: &JobConfig) -> Vec<u8> {
    let inputs = tempfile::tempdir().expect("input dir");
    let input = inputs.path().join(fixture);
    std::fs::write(&input, b"%PDF-1.7 fake body").expect("write input");
    let mut bytes = Vec::new();
    run_job(FakeBackend, &input, config, &mut bytes)
        .await
        .expect("job should produce a stream");
    bytes
}
