//! Wire layout shared by the encoder and decoder.
//!
//! ```text
//! stream := "PDFA" | version u8 | frame* | end-frame
//! frame  := tag u8 | page u32 BE | len u32 BE | payload[len]
//! ```
//!
//! The explicit length means binary payloads (PNG, PDF) may contain any
//! byte value without ambiguity. Document-level frames carry page 0.

use crate::artifact::ArtifactKind;
use crate::error::StreamError;

/// Leading bytes of every artifact stream.
pub const STREAM_MAGIC: [u8; 4] = *b"PDFA";

/// Current wire format version.
pub const STREAM_VERSION: u8 = 1;

/// Bytes in a frame header: tag + page + len.
pub const FRAME_HEADER_LEN: usize = 9;

/// Default cap on a single payload accepted by the decoder (1 GiB).
pub const DEFAULT_MAX_PAYLOAD_LEN: u32 = 1 << 30;

/// Frame type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FrameTag {
    End = 0x00,
    PageCount = 0x01,
    PageText = 0x02,
    PageThumbnail = 0x03,
    PageIsOcr = 0x04,
    PageSplitPdf = 0x05,
    JobError = 0x06,
}

impl FrameTag {
    pub fn from_kind(kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::PageCount => FrameTag::PageCount,
            ArtifactKind::PageText => FrameTag::PageText,
            ArtifactKind::PageThumbnail => FrameTag::PageThumbnail,
            ArtifactKind::PageIsOcr => FrameTag::PageIsOcr,
            ArtifactKind::PageSplitPdf => FrameTag::PageSplitPdf,
            ArtifactKind::JobError => FrameTag::JobError,
        }
    }
}

impl TryFrom<u8> for FrameTag {
    type Error = StreamError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            0x00 => FrameTag::End,
            0x01 => FrameTag::PageCount,
            0x02 => FrameTag::PageText,
            0x03 => FrameTag::PageThumbnail,
            0x04 => FrameTag::PageIsOcr,
            0x05 => FrameTag::PageSplitPdf,
            0x06 => FrameTag::JobError,
            other => return Err(StreamError::UnknownTag(other)),
        })
    }
}

/// A decoded frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub tag: FrameTag,
    pub page: u32,
    pub len: u32,
}

impl FrameHeader {
    pub fn to_bytes(self) -> [u8; FRAME_HEADER_LEN] {
        let mut out = [0u8; FRAME_HEADER_LEN];
        out[0] = self.tag as u8;
        out[1..5].copy_from_slice(&self.page.to_be_bytes());
        out[5..9].copy_from_slice(&self.len.to_be_bytes());
        out
    }

    pub fn parse(bytes: &[u8; FRAME_HEADER_LEN]) -> Result<Self, StreamError> {
        let tag = FrameTag::try_from(bytes[0])?;
        let page = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        let len = u32::from_be_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]);
        Ok(Self { tag, page, len })
    }
}
