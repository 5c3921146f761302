//! Parameter types for raster operations.
//!
//! These structs describe *what* to do to pixels, not *how*. They sit
//! between the [`pipeline`](crate::pipeline) (which decides what each
//! variant needs) and the [`backend`](super::backend) (which does the
//! decoding, resampling, and encoding), so backends can be swapped — e.g.
//! for a recording mock in tests — without touching any decision logic.

use crate::geometry::{CropWindow, ImageDimensions};
use serde::{Deserialize, Serialize};

/// Target encoding format for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
    Gif,
    Avif,
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
            OutputFormat::Gif => "image/gif",
            OutputFormat::Avif => "image/avif",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
            OutputFormat::Gif => "gif",
            OutputFormat::Avif => "avif",
        }
    }

    /// Format inferred from a file extension, used to keep a variant in the
    /// source's own format when none is configured.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::Webp),
            "gif" => Some(OutputFormat::Gif),
            "avif" => Some(OutputFormat::Avif),
            _ => None,
        }
    }
}

/// Quality setting for lossy encoding (1-100), clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Encoding format plus its knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    pub format: OutputFormat,
    #[serde(default)]
    pub quality: Quality,
}

impl FormatOptions {
    pub fn new(format: OutputFormat) -> Self {
        Self { format, quality: Quality::default() }
    }
}

/// Uniform-border trim: strip edge rows/columns whose pixels stay within
/// `threshold` per channel of the corner color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimOptions {
    pub threshold: u8,
}

impl Default for TrimOptions {
    fn default() -> Self {
        Self { threshold: 10 }
    }
}

/// The full set of deferred operations for one variant, applied in order by
/// [`materialize`](super::materialize): resize → extract → trim → encode.
///
/// An explicit immutable value threaded through one call — never state
/// accumulated on a mutated builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingOperations {
    pub resize: Option<ImageDimensions>,
    pub extract: Option<CropWindow>,
    pub trim: Option<TrimOptions>,
    pub format: Option<FormatOptions>,
}
