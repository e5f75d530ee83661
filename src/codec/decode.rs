//! Artifact stream decoder.
//!
//! Reads one frame at a time from an async reader. Every failure mode of a
//! pipe whose writer died (short header, short payload, missing end frame)
//! becomes [`StreamError::Truncated`]; bytes after the end frame are
//! rejected so two concatenated streams are never mistaken for one. An end
//! frame that arrives before every announced page is complete is rejected
//! as out of order.

use super::frame::{
    FrameHeader, FrameTag, DEFAULT_MAX_PAYLOAD_LEN, FRAME_HEADER_LEN, STREAM_MAGIC,
    STREAM_VERSION,
};
use super::order::StreamOrder;
use crate::artifact::Artifact;
use crate::error::StreamError;
use futures::stream::{self, Stream};
use std::io::ErrorKind;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, trace};

/// Reads [`Artifact`]s from framed bytes.
pub struct ArtifactDecoder<R> {
    reader: R,
    max_payload_len: u32,
    order: StreamOrder,
    started: bool,
    finished: bool,
}

impl<R: AsyncRead + Unpin> ArtifactDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
            order: StreamOrder::new(),
            started: false,
            finished: false,
        }
    }

    /// Reject frames whose payload exceeds `max` bytes.
    pub fn with_max_payload_len(mut self, max: u32) -> Self {
        self.max_payload_len = max;
        self
    }

    /// The page count announced by the stream, once it has been read.
    pub fn page_count(&self) -> Option<u32> {
        self.order.page_count()
    }

    /// Read the next artifact.
    ///
    /// Returns `Ok(None)` once the end-of-stream frame has been read and the
    /// input is confirmed to be exhausted.
    pub async fn next_artifact(&mut self) -> Result<Option<Artifact>, StreamError> {
        if self.finished {
            return Ok(None);
        }
        if !self.started {
            self.read_stream_header().await?;
            self.started = true;
        }

        let mut raw = [0u8; FRAME_HEADER_LEN];
        read_exact(&mut self.reader, &mut raw, "frame header").await?;
        let header = FrameHeader::parse(&raw)?;
        trace!(?header, "frame header read");

        if header.tag == FrameTag::End {
            if header.page != 0 || header.len != 0 {
                return Err(StreamError::InvalidPayload {
                    kind: "end-of-stream",
                    detail: format!("page {} len {}", header.page, header.len),
                });
            }
            self.order.finish()?;
            self.expect_eof().await?;
            self.finished = true;
            debug!("end of artifact stream");
            return Ok(None);
        }

        if header.len > self.max_payload_len {
            return Err(StreamError::PayloadTooLarge {
                len: header.len,
                max: self.max_payload_len,
            });
        }
        let mut payload = vec![0u8; header.len as usize];
        read_exact(&mut self.reader, &mut payload, "frame payload").await?;

        let artifact = build_artifact(header, payload)?;
        self.order.check(&artifact)?;
        Ok(Some(artifact))
    }

    /// Adapt the decoder into a `Stream` of artifacts.
    ///
    /// The stream ends after the end-of-stream frame, or after yielding the
    /// first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Artifact, StreamError>> {
        stream::try_unfold(self, |mut decoder| async move {
            Ok(decoder
                .next_artifact()
                .await?
                .map(|artifact| (artifact, decoder)))
        })
    }

    async fn read_stream_header(&mut self) -> Result<(), StreamError> {
        let mut magic = [0u8; 4];
        read_exact(&mut self.reader, &mut magic, "stream header").await?;
        if magic != STREAM_MAGIC {
            return Err(StreamError::BadMagic { found: magic });
        }
        let mut version = [0u8; 1];
        read_exact(&mut self.reader, &mut version, "stream header").await?;
        if version[0] != STREAM_VERSION {
            return Err(StreamError::UnsupportedVersion(version[0]));
        }
        Ok(())
    }

    async fn expect_eof(&mut self) -> Result<(), StreamError> {
        let mut probe = [0u8; 1];
        match self.reader.read(&mut probe).await? {
            0 => Ok(()),
            _ => Err(StreamError::TrailingBytes),
        }
    }
}

async fn read_exact<R: AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
    context: &'static str,
) -> Result<(), StreamError> {
    match reader.read_exact(buf).await {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(StreamError::Truncated { context }),
        Err(e) => Err(StreamError::Io(e)),
    }
}

fn build_artifact(header: FrameHeader, payload: Vec<u8>) -> Result<Artifact, StreamError> {
    let page = header.page;
    let artifact = match header.tag {
        FrameTag::PageCount => {
            let bytes: [u8; 4] =
                payload
                    .as_slice()
                    .try_into()
                    .map_err(|_| StreamError::InvalidPayload {
                        kind: "page-count",
                        detail: format!("expected 4 bytes, got {}", payload.len()),
                    })?;
            Artifact::PageCount(u32::from_be_bytes(bytes))
        }
        FrameTag::PageText => Artifact::PageText {
            page,
            text: utf8(payload, "page-text")?,
        },
        FrameTag::PageThumbnail => Artifact::PageThumbnail { page, png: payload },
        FrameTag::PageIsOcr => {
            let is_ocr = match payload.as_slice() {
                [0] => false,
                [1] => true,
                other => {
                    return Err(StreamError::InvalidPayload {
                        kind: "page-is-ocr",
                        detail: format!("expected a single 0x00 or 0x01 byte, got {other:?}"),
                    })
                }
            };
            Artifact::PageIsOcr { page, is_ocr }
        }
        FrameTag::PageSplitPdf => Artifact::PageSplitPdf { page, pdf: payload },
        FrameTag::JobError => Artifact::JobError(utf8(payload, "job-error")?),
        FrameTag::End => {
            return Err(StreamError::InvalidPayload {
                kind: "end-of-stream",
                detail: "end frame decoded as an artifact".to_string(),
            })
        }
    };

    if artifact.page().is_none() && page != 0 {
        return Err(StreamError::InvalidPayload {
            kind: artifact.kind().name(),
            detail: format!("document-level frame carries page {page}"),
        });
    }
    Ok(artifact)
}

fn utf8(payload: Vec<u8>, kind: &'static str) -> Result<String, StreamError> {
    String::from_utf8(payload).map_err(|e| StreamError::InvalidPayload {
        kind,
        detail: e.to_string(),
    })
}
