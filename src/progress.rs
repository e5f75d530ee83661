//! Progress-callback trait for per-page job events.
//!
//! Inject an [`Arc<dyn JobProgressCallback>`] via
//! [`crate::config::JobConfigBuilder::progress_callback`] to observe a job
//! as it runs. Callbacks fire on the backend thread, in page order.
//!
//! # Example
//!
//! ```rust
//! use pdf_processor::{JobConfig, JobProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     degraded: AtomicUsize,
//! }
//!
//! impl JobProgressCallback for CountingCallback {
//!     fn on_page_error(&self, page: u32, total_pages: u32, error: &str) {
//!         self.degraded.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("page {page}/{total_pages} degraded: {error}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { degraded: AtomicUsize::new(0) });
//!
//! let config = JobConfig::builder()
//!     .progress_callback(counter as Arc<dyn JobProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the job runner as it processes each page.
///
/// All methods default to no-ops so implementations override only what
/// they need. Implementations must be `Send + Sync` because the runner
/// calls them from a blocking worker thread.
pub trait JobProgressCallback: Send + Sync {
    /// Called once after the document opened and was counted.
    fn on_job_start(&self, total_pages: u32) {
        let _ = total_pages;
    }

    /// Called before the backend is asked for a page.
    fn on_page_start(&self, page: u32, total_pages: u32) {
        let _ = (page, total_pages);
    }

    /// Called after a page's artifacts were handed to the stream.
    ///
    /// * `artifacts` — number of artifacts emitted for the page
    fn on_page_complete(&self, page: u32, total_pages: u32, artifacts: usize) {
        let _ = (page, total_pages, artifacts);
    }

    /// Called for every recoverable failure on a page. A page may report
    /// more than one (e.g. thumbnail and split both failing).
    fn on_page_error(&self, page: u32, total_pages: u32, error: &str) {
        let _ = (page, total_pages, error);
    }

    /// Called once after the last page.
    ///
    /// * `degraded_pages` — pages that reported at least one error
    fn on_job_complete(&self, total_pages: u32, degraded_pages: u32) {
        let _ = (total_pages, degraded_pages);
    }

    /// Called instead of everything above when the document cannot be opened.
    fn on_job_failed(&self, error: &str) {
        let _ = error;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl JobProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::JobConfig`].
pub type ProgressCallback = Arc<dyn JobProgressCallback>;
