//! Input validation: make sure the job's path names a readable file.
//!
//! PDFium reports a missing file and an unreadable one with the same error
//! code, and only after the library is loaded. Checking up front lets the
//! job fail with a clear `FileUnreadable` before any backend work.

use crate::error::OpenError;
use std::path::Path;
use tracing::{debug, warn};

/// Check that `path` is an existing, readable regular file.
pub fn check_readable(path: &Path) -> Result<(), OpenError> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "input not accessible");
            return Err(OpenError::FileUnreadable);
        }
    };
    if !metadata.is_file() {
        warn!(path = %path.display(), "input is not a regular file");
        return Err(OpenError::FileUnreadable);
    }

    // Permission problems only show up on open.
    if let Err(e) = std::fs::File::open(path) {
        warn!(path = %path.display(), error = %e, "input not readable");
        return Err(OpenError::FileUnreadable);
    }

    debug!(path = %path.display(), bytes = metadata.len(), "input resolved");
    Ok(())
}
