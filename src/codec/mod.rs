//! Framing for the producer → consumer artifact stream.
//!
//! ```text
//! producer ──▶ ArtifactEncoder ──▶ pipe ──▶ ArtifactDecoder ──▶ consumer
//!              (frame per artifact)          (frame + order checks)
//! ```
//!
//! * [`frame`]  — tags, header layout, stream magic and version
//! * [`encode`] — writes artifacts as frames to any `AsyncWrite`
//! * [`decode`] — reads frames from any `AsyncRead`, detecting truncation
//! * [`order`]  — the ordering rules every decoded stream must satisfy

pub mod decode;
pub mod encode;
pub mod frame;
pub mod order;

pub use decode::ArtifactDecoder;
pub use encode::ArtifactEncoder;
pub use order::StreamOrder;
