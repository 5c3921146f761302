//! Raster backend trait and shared types.
//!
//! [`RasterBackend`] is the seam between the pure geometry/decision core
//! and actual pixel work. The production implementation is
//! [`ImageCrateBackend`](super::image_backend::ImageCrateBackend); tests use
//! the recording [`MockBackend`](tests::MockBackend).

use super::params::{OutputFormat, Quality, TrimOptions};
use crate::geometry::{CropWindow, ImageDimensions};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("failed to decode image: {0}")]
    Decode(String),
    #[error("failed to encode image: {0}")]
    Encode(String),
    #[error("crop {0:?} lies outside the {1}x{2} image")]
    CropOutOfBounds(CropWindow, u32, u32),
    #[error("animated source with multiple frames is not supported by this backend")]
    AnimatedUnsupported,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Header-probed dimensions, available without a full decode.
///
/// `pages` is greater than 1 only for engines that represent an animated
/// source as vertically stacked frames, in which case `height` is the
/// stacked total. Consumers divide by `pages` to get per-frame height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbedDimensions {
    pub width: u32,
    pub height: u32,
    pub pages: u32,
}

/// Result of encoding a raster image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    /// Actual encoded pixel width (stacked height for animated engines).
    pub width: u32,
    pub height: u32,
    /// Format actually used; differs from the requested one when the
    /// backend substituted its fallback.
    pub format: OutputFormat,
}

impl EncodedImage {
    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Pixel engine capability set required by the variant pipeline.
///
/// Implementations must be `Sync`: the pipeline fans out one rayon task per
/// variant and every task shares one backend reference.
pub trait RasterBackend: Sync {
    /// Decoded in-memory image handle.
    type Image: Send;

    /// Probe width/height (and page count) from headers only.
    fn probe(&self, bytes: &[u8]) -> Result<ProbedDimensions, RasterError>;

    /// Fully decode the source bytes.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, RasterError>;

    /// True pixel dimensions of a decoded or resized handle.
    fn dimensions(&self, image: &Self::Image) -> ImageDimensions;

    /// Resample to exactly `width`x`height`.
    fn resize(&self, image: &Self::Image, width: u32, height: u32) -> Result<Self::Image, RasterError>;

    /// Extract a window; the window must lie within the image.
    fn crop(&self, image: &Self::Image, window: CropWindow) -> Result<Self::Image, RasterError>;

    /// Strip uniform borders.
    fn trim(&self, image: &Self::Image, options: TrimOptions) -> Result<Self::Image, RasterError>;

    /// Encode in the given format. Callers resolve the format through
    /// [`resolve_format`](Self::resolve_format) first, so `format` is
    /// always one the backend supports.
    fn encode(&self, image: &Self::Image, format: OutputFormat, quality: Quality) -> Result<EncodedImage, RasterError>;

    /// Capability table: can this backend encode `format`?
    fn supports(&self, format: OutputFormat) -> bool;

    /// Map a requested format onto one the backend can actually encode.
    ///
    /// The fallback is PNG — lossless and supported by every backend.
    /// Substitution is never silent: the encoded result carries the actual
    /// format, and this method makes the mapping testable per backend.
    fn resolve_format(&self, requested: OutputFormat) -> OutputFormat {
        if self.supports(requested) {
            requested
        } else {
            OutputFormat::Png
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock backend over synthetic "images" that are just dimension pairs.
    /// Records operations behind a Mutex so it is Sync for rayon.
    ///
    /// Models a stacked-frame engine: handles carry the full stacked
    /// height, resize and crop take per-frame coordinates, and results
    /// stack back up. With `pages == 1` this reduces to a plain engine.
    pub struct MockBackend {
        pub probed: ProbedDimensions,
        pub unsupported: Vec<OutputFormat>,
        pub fail_encode: bool,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    /// Fake pixel handle: stacked dimensions plus the frame count.
    #[derive(Debug, Clone, Copy)]
    pub struct FakeImage {
        pub width: u32,
        pub height: u32,
        pub pages: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Probe,
        Decode,
        Resize { width: u32, height: u32 },
        Crop(CropWindow),
        Trim,
        Encode { format: OutputFormat, quality: u8 },
    }

    impl MockBackend {
        pub fn new(width: u32, height: u32) -> Self {
            Self::animated(width, height, 1)
        }

        /// A stacked-frame animated source: probed height is the full
        /// stacked total.
        pub fn animated(width: u32, height: u32, pages: u32) -> Self {
            Self {
                probed: ProbedDimensions { width, height, pages },
                unsupported: Vec::new(),
                fail_encode: false,
                operations: Mutex::new(Vec::new()),
            }
        }

        pub fn without_support_for(mut self, format: OutputFormat) -> Self {
            self.unsupported.push(format);
            self
        }

        /// Every encode call fails, for exercising error propagation.
        pub fn with_failing_encode(mut self) -> Self {
            self.fail_encode = true;
            self
        }

        pub fn recorded(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        fn record(&self, op: RecordedOp) {
            self.operations.lock().unwrap().push(op);
        }
    }

    impl RasterBackend for MockBackend {
        type Image = FakeImage;

        fn probe(&self, _bytes: &[u8]) -> Result<ProbedDimensions, RasterError> {
            self.record(RecordedOp::Probe);
            Ok(self.probed)
        }

        fn decode(&self, bytes: &[u8]) -> Result<Self::Image, RasterError> {
            self.record(RecordedOp::Decode);
            if bytes.is_empty() {
                return Err(RasterError::Decode("empty input".to_string()));
            }
            Ok(FakeImage {
                width: self.probed.width,
                height: self.probed.height,
                pages: self.probed.pages,
            })
        }

        fn dimensions(&self, image: &Self::Image) -> ImageDimensions {
            ImageDimensions::new(image.width, image.height)
        }

        fn resize(&self, image: &Self::Image, width: u32, height: u32) -> Result<Self::Image, RasterError> {
            self.record(RecordedOp::Resize { width, height });
            Ok(FakeImage { width, height: height * image.pages, pages: image.pages })
        }

        fn crop(&self, image: &Self::Image, window: CropWindow) -> Result<Self::Image, RasterError> {
            self.record(RecordedOp::Crop(window));
            let frame_height = image.height / image.pages;
            if window.left + window.width > image.width || window.top + window.height > frame_height {
                return Err(RasterError::CropOutOfBounds(window, image.width, frame_height));
            }
            Ok(FakeImage {
                width: window.width,
                height: window.height * image.pages,
                pages: image.pages,
            })
        }

        fn trim(&self, image: &Self::Image, _options: TrimOptions) -> Result<Self::Image, RasterError> {
            self.record(RecordedOp::Trim);
            Ok(*image)
        }

        fn encode(&self, image: &Self::Image, format: OutputFormat, quality: Quality) -> Result<EncodedImage, RasterError> {
            self.record(RecordedOp::Encode { format, quality: quality.value() });
            if self.fail_encode {
                return Err(RasterError::Encode("injected encoder failure".to_string()));
            }
            Ok(EncodedImage {
                // One byte per fake pixel keeps filesize assertions simple
                bytes: vec![0u8; (image.width * image.height) as usize],
                width: image.width,
                height: image.height,
                format,
            })
        }

        fn supports(&self, format: OutputFormat) -> bool {
            !self.unsupported.contains(&format)
        }
    }

    #[test]
    fn mock_records_operations_in_order() {
        let backend = MockBackend::new(800, 600);
        let image = backend.decode(b"x").unwrap();
        let resized = backend.resize(&image, 400, 300).unwrap();
        backend
            .encode(&resized, OutputFormat::Jpeg, Quality::new(85))
            .unwrap();

        let ops = backend.recorded();
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[0], RecordedOp::Decode));
        assert!(matches!(ops[1], RecordedOp::Resize { width: 400, height: 300 }));
        assert!(matches!(ops[2], RecordedOp::Encode { format: OutputFormat::Jpeg, quality: 85 }));
    }

    #[test]
    fn mock_rejects_out_of_bounds_crop() {
        let backend = MockBackend::new(100, 100);
        let image = backend.decode(b"x").unwrap();
        let window = CropWindow { left: 50, top: 0, width: 60, height: 100 };
        assert!(matches!(
            backend.crop(&image, window),
            Err(RasterError::CropOutOfBounds(..))
        ));
    }

    #[test]
    fn resolve_format_substitutes_png() {
        let backend = MockBackend::new(10, 10).without_support_for(OutputFormat::Avif);
        assert_eq!(backend.resolve_format(OutputFormat::Avif), OutputFormat::Png);
        assert_eq!(backend.resolve_format(OutputFormat::Jpeg), OutputFormat::Jpeg);
    }
}
