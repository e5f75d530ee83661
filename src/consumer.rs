//! The demultiplexer: one artifact stream in, one file per artifact out.
//!
//! | artifact               | file          | contents                 |
//! |------------------------|---------------|--------------------------|
//! | `PageCount(n)`         | `n-pages`     | `n` in decimal           |
//! | `PageText(p, s)`       | `p{p}.txt`    | `s` verbatim             |
//! | `PageThumbnail(p, b)`  | `p{p}.png`    | `b`                      |
//! | `PageIsOcr(p, f)`      | `p{p}.is-ocr` | `true` / `false`         |
//! | `PageSplitPdf(p, b)`   | `p{p}.pdf`    | `b`                      |
//! | `JobError(s)`          | `error.txt`   | `s` verbatim             |
//!
//! Files are written as artifacts arrive, each one atomically (hidden
//! temporary sibling, then rename), so a stream that breaks off halfway
//! leaves only complete files behind. Existing files in the output
//! directory are never cleared.

use crate::artifact::Artifact;
use crate::codec::ArtifactDecoder;
use crate::error::DumpError;
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tokio::io::AsyncRead;
use tracing::{debug, info, warn};

/// What a consumer run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DumpSummary {
    pub output_dir: PathBuf,
    /// File names written, in stream order.
    pub files: Vec<String>,
    pub page_count: Option<u32>,
    /// The job's error message, when the producer could not open the input.
    pub error: Option<String>,
}

/// Read an artifact stream from `reader` and write its files into `out_dir`.
///
/// `out_dir` is created if needed. Fails on the first malformed frame,
/// truncation, end frame before every announced page is complete, or
/// file-system error; files written before that stay.
pub async fn dump_stream<R>(
    reader: R,
    out_dir: &Path,
    max_payload_len: u32,
) -> Result<DumpSummary, DumpError>
where
    R: AsyncRead + Unpin,
{
    tokio::fs::create_dir_all(out_dir)
        .await
        .map_err(|source| DumpError::CreateDirFailed {
            path: out_dir.to_path_buf(),
            source,
        })?;

    let mut decoder = ArtifactDecoder::new(reader).with_max_payload_len(max_payload_len);
    let mut summary = DumpSummary {
        output_dir: out_dir.to_path_buf(),
        ..DumpSummary::default()
    };

    while let Some(artifact) = decoder.next_artifact().await? {
        let name = file_name(&artifact);
        write_atomic(&out_dir.join(&name), &file_contents(&artifact)).await?;
        debug!(file = %name, bytes = artifact.payload_len(), "wrote artifact");

        match artifact {
            Artifact::PageCount(n) => summary.page_count = Some(n),
            Artifact::JobError(message) => {
                warn!(error = %message, "producer reported a job error");
                summary.error = Some(message);
            }
            _ => {}
        }
        summary.files.push(name);
    }

    info!(
        dir = %out_dir.display(),
        files = summary.files.len(),
        pages = ?summary.page_count,
        "stream consumed"
    );
    Ok(summary)
}

/// The output file an artifact is written to.
pub fn file_name(artifact: &Artifact) -> String {
    match artifact {
        Artifact::PageCount(_) => "n-pages".to_string(),
        Artifact::PageText { page, .. } => format!("p{page}.txt"),
        Artifact::PageThumbnail { page, .. } => format!("p{page}.png"),
        Artifact::PageIsOcr { page, .. } => format!("p{page}.is-ocr"),
        Artifact::PageSplitPdf { page, .. } => format!("p{page}.pdf"),
        Artifact::JobError(_) => "error.txt".to_string(),
    }
}

fn file_contents(artifact: &Artifact) -> Cow<'_, [u8]> {
    match artifact {
        Artifact::PageCount(n) => Cow::Owned(n.to_string().into_bytes()),
        Artifact::PageText { text, .. } => Cow::Borrowed(text.as_bytes()),
        Artifact::PageThumbnail { png, .. } => Cow::Borrowed(png.as_slice()),
        Artifact::PageIsOcr { is_ocr, .. } => {
            Cow::Borrowed(if *is_ocr { &b"true"[..] } else { &b"false"[..] })
        }
        Artifact::PageSplitPdf { pdf, .. } => Cow::Borrowed(pdf.as_slice()),
        Artifact::JobError(message) => Cow::Borrowed(message.as_bytes()),
    }
}

/// Write to a hidden temporary sibling, then rename into place.
async fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), DumpError> {
    let tmp_path = temp_sibling(path);
    let result = async {
        tokio::fs::write(&tmp_path, contents).await?;
        tokio::fs::rename(&tmp_path, path).await
    }
    .await;

    if let Err(source) = result {
        // Best effort; the write error is the one reported.
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(DumpError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
