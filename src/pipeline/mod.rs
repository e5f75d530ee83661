//! Pipeline stages for turning one PDF into page artifacts.
//!
//! Each submodule implements exactly one step. The job runner
//! ([`crate::producer`]) drives them on a blocking thread.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ backend/render ──▶ page ──▶ (artifact channel)
//! (path)    (pdfium open)      (text, is-ocr, thumbnail, split)
//! ```
//!
//! 1. [`input`]   — make sure the path names a readable file
//! 2. [`backend`] — the seam between the job runner and a PDF library
//! 3. [`render`]  — the PDFium implementation of that seam; runs in
//!    `spawn_blocking` because pdfium is not async-safe
//! 4. [`encode`]  — PNG encoding and thumbnail geometry
//! 5. [`scan`]    — the scanned-page heuristic
//! 6. [`page`]    — per-page extraction with failure isolation

pub mod backend;
pub mod encode;
pub mod input;
pub mod page;
pub mod render;
pub mod scan;
