//! Scanned-page heuristic.
//!
//! A scanned page is a picture of paper: one image covering (nearly) the
//! whole page, and no text that is actually painted. OCR tools add an
//! invisible text layer on top so the page stays searchable; that text is
//! still extracted, but it does not make the page born-digital.

/// Fraction of the page area an image must cover to count as a scan.
pub const PAGE_COVERAGE_THRESHOLD: f32 = 0.8;

/// What a backend observed on a page, reduced to what the heuristic needs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScanEvidence {
    /// Page area in square points.
    pub page_area: f32,
    /// Area of the largest image object, in square points, clipped to the page.
    pub largest_image_area: f32,
    /// Text objects painted with a visible render mode.
    pub visible_text_objects: usize,
    /// Text objects with the invisible render mode (typical OCR layer).
    pub invisible_text_objects: usize,
}

impl ScanEvidence {
    /// Share of the page covered by its largest image, `0.0..=1.0`.
    pub fn image_coverage(&self) -> f32 {
        if self.page_area <= 0.0 {
            return 0.0;
        }
        (self.largest_image_area / self.page_area).clamp(0.0, 1.0)
    }

    pub fn is_probably_scanned(&self) -> bool {
        self.visible_text_objects == 0 && self.image_coverage() >= PAGE_COVERAGE_THRESHOLD
    }
}
