//! Artifact stream encoder.
//!
//! Each artifact is written as one frame the moment it is handed over, so
//! the producer never holds more than one page's output in memory. The
//! stream header is written lazily with the first frame; [`ArtifactEncoder::finish`]
//! appends the end-of-stream frame and flushes.

use super::frame::{FrameHeader, FrameTag, STREAM_MAGIC, STREAM_VERSION};
use crate::artifact::Artifact;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Writes [`Artifact`]s as framed bytes to an async writer.
pub struct ArtifactEncoder<W> {
    writer: W,
    header_written: bool,
    frames: u64,
    bytes: u64,
}

impl<W: AsyncWrite + Unpin> ArtifactEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            header_written: false,
            frames: 0,
            bytes: 0,
        }
    }

    /// Number of artifact frames written so far (excluding the end frame).
    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    /// Number of bytes written so far, header included.
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    /// Encode one artifact as a frame.
    pub async fn write_artifact(&mut self, artifact: &Artifact) -> std::io::Result<()> {
        self.ensure_header().await?;

        let tag = FrameTag::from_kind(artifact.kind());
        let page = artifact.page().unwrap_or(0);
        match artifact {
            Artifact::PageCount(n) => self.write_frame(tag, page, &n.to_be_bytes()).await?,
            Artifact::PageText { text, .. } => self.write_frame(tag, page, text.as_bytes()).await?,
            Artifact::PageThumbnail { png, .. } => self.write_frame(tag, page, png).await?,
            Artifact::PageIsOcr { is_ocr, .. } => {
                self.write_frame(tag, page, &[u8::from(*is_ocr)]).await?
            }
            Artifact::PageSplitPdf { pdf, .. } => self.write_frame(tag, page, pdf).await?,
            Artifact::JobError(message) => {
                self.write_frame(tag, page, message.as_bytes()).await?
            }
        }
        self.frames += 1;
        debug!(kind = %artifact.kind(), page, len = artifact.payload_len(), "frame written");
        Ok(())
    }

    /// Write the end-of-stream frame, flush, and hand back the writer.
    pub async fn finish(mut self) -> std::io::Result<W> {
        self.ensure_header().await?;
        self.write_frame(FrameTag::End, 0, &[]).await?;
        self.writer.flush().await?;
        Ok(self.writer)
    }

    async fn ensure_header(&mut self) -> std::io::Result<()> {
        if !self.header_written {
            self.writer.write_all(&STREAM_MAGIC).await?;
            self.writer.write_u8(STREAM_VERSION).await?;
            self.header_written = true;
            self.bytes += STREAM_MAGIC.len() as u64 + 1;
        }
        Ok(())
    }

    async fn write_frame(&mut self, tag: FrameTag, page: u32, payload: &[u8]) -> std::io::Result<()> {
        let len = u32::try_from(payload.len()).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("payload of {} bytes does not fit a frame", payload.len()),
            )
        })?;
        let header = FrameHeader { tag, page, len }.to_bytes();
        self.writer.write_all(&header).await?;
        self.writer.write_all(payload).await?;
        self.bytes += header.len() as u64 + payload.len() as u64;
        Ok(())
    }
}
