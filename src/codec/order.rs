//! Ordering rules for a well-formed artifact stream.
//!
//! The decoder feeds every artifact through [`StreamOrder::check`] so the
//! consumer can rely on the producer's guarantees without re-checking them:
//! one `PageCount` first, pages within range and non-decreasing, each kind
//! at most once per page, and `JobError` only as the sole artifact.
//! [`StreamOrder::finish`] checks at the end-of-stream frame that the job
//! actually finished: a page count or job error was seen, and every page
//! got its text and OCR flag.

use crate::artifact::{Artifact, ArtifactKind};
use crate::error::StreamError;
use std::collections::HashSet;

#[derive(Debug, Default)]
enum Phase {
    #[default]
    Start,
    Pages {
        total: u32,
        current: u32,
        seen: HashSet<ArtifactKind>,
        /// Pages that received both their text and their OCR flag.
        complete: u32,
    },
    Failed,
}

/// Tracks stream position and rejects artifacts that break ordering.
#[derive(Debug, Default)]
pub struct StreamOrder {
    phase: Phase,
}

impl StreamOrder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the next artifact against everything seen so far.
    pub fn check(&mut self, artifact: &Artifact) -> Result<(), StreamError> {
        let next = match &mut self.phase {
            Phase::Start => match artifact {
                Artifact::PageCount(total) => Phase::Pages {
                    total: *total,
                    current: 0,
                    seen: HashSet::new(),
                    complete: 0,
                },
                Artifact::JobError(_) => Phase::Failed,
                other => {
                    return Err(out_of_order(format!(
                        "{} for page {} before the page count",
                        other.kind(),
                        other.page().unwrap_or(0)
                    )))
                }
            },
            Phase::Failed => {
                return Err(out_of_order(format!(
                    "{} after the job error",
                    artifact.kind()
                )))
            }
            Phase::Pages {
                total,
                current,
                seen,
                complete,
            } => {
                check_page(artifact, *total, current, seen)?;
                if seen.contains(&ArtifactKind::PageText)
                    && seen.contains(&ArtifactKind::PageIsOcr)
                    && matches!(artifact.kind(), ArtifactKind::PageText | ArtifactKind::PageIsOcr)
                {
                    *complete += 1;
                }
                return Ok(());
            }
        };
        self.phase = next;
        Ok(())
    }

    /// Validate that the stream may end here.
    pub fn finish(&self) -> Result<(), StreamError> {
        match &self.phase {
            Phase::Start => Err(out_of_order(
                "stream ended before the page count or a job error".to_string(),
            )),
            Phase::Failed => Ok(()),
            Phase::Pages {
                total, complete, ..
            } if complete < total => Err(out_of_order(format!(
                "stream ended after {complete} of {total} complete pages"
            ))),
            Phase::Pages { .. } => Ok(()),
        }
    }

    /// The page count announced by the stream, once seen.
    pub fn page_count(&self) -> Option<u32> {
        match &self.phase {
            Phase::Pages { total, .. } => Some(*total),
            _ => None,
        }
    }
}

fn check_page(
    artifact: &Artifact,
    total: u32,
    current: &mut u32,
    seen: &mut HashSet<ArtifactKind>,
) -> Result<(), StreamError> {
    let kind = artifact.kind();
    let page = match artifact {
        Artifact::PageCount(_) => return Err(out_of_order("second page count".to_string())),
        Artifact::JobError(_) => {
            return Err(out_of_order("job error after the page count".to_string()))
        }
        other => other.page().unwrap_or(0),
    };
    if page == 0 || page > total {
        return Err(out_of_order(format!(
            "{kind} for page {page} outside 1..={total}"
        )));
    }
    if page < *current {
        return Err(out_of_order(format!(
            "{kind} for page {page} after page {current}"
        )));
    }
    if page > *current {
        *current = page;
        seen.clear();
    }
    if !seen.insert(kind) {
        return Err(out_of_order(format!("duplicate {kind} for page {page}")));
    }
    Ok(())
}

fn out_of_order(detail: String) -> StreamError {
    StreamError::OutOfOrder(detail)
}
