//! Configuration for a split/extract job.
//!
//! All producer behaviour is controlled through [`JobConfig`], built via
//! [`JobConfigBuilder`]. The CLI maps its flags onto the builder; library
//! callers set only what they care about and rely on the defaults.

use crate::error::ProducerError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest thumbnail edge in pixels.
pub const DEFAULT_THUMBNAIL_DIMENSION: u32 = 700;

/// Per-page text cap, in characters.
pub const DEFAULT_MAX_TEXT_CHARS: usize = 100_000;

/// Artifacts buffered between the backend thread and the stream writer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 4;

/// Configuration for one producer job.
///
/// # Example
/// ```rust
/// use pdf_processor::{ExtractMode, JobConfig, ThumbnailPages};
///
/// let config = JobConfig::builder()
///     .mode(ExtractMode::Split)
///     .thumbnails(ThumbnailPages::All)
///     .build()
///     .unwrap();
/// assert!(config.mode.splits_pages());
/// ```
#[derive(Clone)]
pub struct JobConfig {
    /// Whether to emit a single-page PDF for every page. Default: extract only.
    pub mode: ExtractMode,

    /// Which pages get a thumbnail. Default: the first page in extract-only
    /// mode, every page in split mode (see [`ThumbnailPages::for_mode`]).
    pub thumbnails: ThumbnailPages,

    /// Longest thumbnail edge in pixels; the other edge keeps the page's
    /// aspect ratio. Default: 700.
    pub thumbnail_dimension: u32,

    /// Text beyond this many characters per page is dropped. Default: 100 000.
    pub max_text_chars: usize,

    /// User password for encrypted documents. Without it, a document that
    /// needs one fails the job as password-protected.
    pub password: Option<String>,

    /// Bound of the artifact channel between the backend thread and the
    /// stream writer. Default: 4.
    pub channel_capacity: usize,

    /// Receives per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            mode: ExtractMode::default(),
            thumbnails: ThumbnailPages::default(),
            thumbnail_dimension: DEFAULT_THUMBNAIL_DIMENSION,
            max_text_chars: DEFAULT_MAX_TEXT_CHARS,
            password: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for JobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobConfig")
            .field("mode", &self.mode)
            .field("thumbnails", &self.thumbnails)
            .field("thumbnail_dimension", &self.thumbnail_dimension)
            .field("max_text_chars", &self.max_text_chars)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("channel_capacity", &self.channel_capacity)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn JobProgressCallback>"),
            )
            .finish()
    }
}

impl JobConfig {
    /// Create a new builder for `JobConfig`.
    pub fn builder() -> JobConfigBuilder {
        JobConfigBuilder {
            config: Self::default(),
            thumbnails: None,
        }
    }
}

/// Builder for [`JobConfig`].
pub struct JobConfigBuilder {
    config: JobConfig,
    /// Explicit thumbnail policy; otherwise derived from the mode at build.
    thumbnails: Option<ThumbnailPages>,
}

impl JobConfigBuilder {
    pub fn mode(mut self, mode: ExtractMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn thumbnails(mut self, pages: ThumbnailPages) -> Self {
        self.thumbnails = Some(pages);
        self
    }

    pub fn thumbnail_dimension(mut self, px: u32) -> Self {
        self.config.thumbnail_dimension = px;
        self
    }

    pub fn max_text_chars(mut self, n: usize) -> Self {
        self.config.max_text_chars = n;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn channel_capacity(mut self, n: usize) -> Self {
        self.config.channel_capacity = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(mut self) -> Result<JobConfig, ProducerError> {
        let mode = self.config.mode;
        self.config.thumbnails = self
            .thumbnails
            .unwrap_or_else(|| ThumbnailPages::for_mode(mode));
        let c = &self.config;
        if !(16..=10_000).contains(&c.thumbnail_dimension) {
            return Err(ProducerError::InvalidConfig(format!(
                "Thumbnail dimension must be 16–10000 px, got {}",
                c.thumbnail_dimension
            )));
        }
        if c.channel_capacity == 0 {
            return Err(ProducerError::InvalidConfig(
                "Channel capacity must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// What the job produces beyond text, OCR flags and thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractMode {
    /// Text, OCR flag and thumbnails only (`--only-extract=true`).
    #[default]
    ExtractOnly,
    /// Additionally a standalone PDF per page (`--only-extract=false`).
    Split,
}

impl ExtractMode {
    /// Map the CLI's `--only-extract=<bool>` onto a mode.
    pub fn from_only_extract(only_extract: bool) -> Self {
        if only_extract {
            ExtractMode::ExtractOnly
        } else {
            ExtractMode::Split
        }
    }

    pub fn splits_pages(self) -> bool {
        self == ExtractMode::Split
    }
}

/// Which pages receive a PNG thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThumbnailPages {
    /// Page 1 only. (default in extract-only mode)
    #[default]
    First,
    /// Every page.
    All,
    /// No thumbnails at all.
    None,
}

impl ThumbnailPages {
    /// The policy used when none is chosen: page 1 when only extracting,
    /// every page when splitting.
    pub fn for_mode(mode: ExtractMode) -> Self {
        match mode {
            ExtractMode::ExtractOnly => ThumbnailPages::First,
            ExtractMode::Split => ThumbnailPages::All,
        }
    }

    /// Whether the 1-based `page` should get a thumbnail.
    pub fn includes(self, page: u32) -> bool {
        match self {
            ThumbnailPages::First => page == 1,
            ThumbnailPages::All => true,
            ThumbnailPages::None => false,
        }
    }
}
