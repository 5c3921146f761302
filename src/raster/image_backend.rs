//! Production backend on the `image` crate — pure Rust, statically linked.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Probe | `ImageReader::with_guessed_format` + `into_dimensions` (header-only) |
//! | Decode (JPEG, PNG, GIF, WebP) | `image::load_from_memory` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` |
//! | Crop | `DynamicImage::crop_imm` |
//! | Trim | uniform-border scan + crop |
//! | Encode | per-format encoders (`JpegEncoder` carries quality) |
//!
//! This backend operates on single-frame images only: `probe` rejects GIFs
//! with more than one frame rather than letting `decode` silently drop
//! frames. Stacked-frame metadata normalization applies to engines that
//! keep animation frames stacked in one buffer; this one reports `pages: 1`
//! for everything it accepts.

use super::backend::{EncodedImage, ProbedDimensions, RasterBackend, RasterError};
use super::params::{OutputFormat, Quality, TrimOptions};
use crate::geometry::{CropWindow, ImageDimensions};
use image::codecs::gif::GifDecoder;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, DynamicImage, ImageFormat, ImageReader, Rgba};
use std::io::Cursor;

/// Backend over the `image` crate's pure-Rust codecs.
///
/// AVIF is deliberately not in the capability table: the `image` crate's
/// AVIF encoder needs rav1e, which this build leaves out. Requests for it
/// resolve to the PNG fallback.
#[derive(Default)]
pub struct ImageCrateBackend;

impl ImageCrateBackend {
    pub fn new() -> Self {
        Self
    }
}

fn image_format(format: OutputFormat) -> Option<ImageFormat> {
    match format {
        OutputFormat::Jpeg => Some(ImageFormat::Jpeg),
        OutputFormat::Png => Some(ImageFormat::Png),
        OutputFormat::Webp => Some(ImageFormat::WebP),
        OutputFormat::Gif => Some(ImageFormat::Gif),
        OutputFormat::Avif => None,
    }
}

impl RasterBackend for ImageCrateBackend {
    type Image = DynamicImage;

    fn probe(&self, bytes: &[u8]) -> Result<ProbedDimensions, RasterError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(RasterError::Io)?;
        let format = reader.format();
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| RasterError::Decode(e.to_string()))?;
        if format == Some(ImageFormat::Gif) {
            // decode() keeps only the first frame, so a multi-frame GIF
            // must be refused here instead of silently truncated.
            let decoder = GifDecoder::new(Cursor::new(bytes))
                .map_err(|e| RasterError::Decode(e.to_string()))?;
            if decoder.into_frames().nth(1).is_some() {
                return Err(RasterError::AnimatedUnsupported);
            }
        }
        Ok(ProbedDimensions { width, height, pages: 1 })
    }

    fn decode(&self, bytes: &[u8]) -> Result<Self::Image, RasterError> {
        image::load_from_memory(bytes).map_err(|e| RasterError::Decode(e.to_string()))
    }

    fn dimensions(&self, image: &Self::Image) -> ImageDimensions {
        ImageDimensions::new(image.width(), image.height())
    }

    fn resize(&self, image: &Self::Image, width: u32, height: u32) -> Result<Self::Image, RasterError> {
        Ok(image.resize_exact(width, height, FilterType::Lanczos3))
    }

    fn crop(&self, image: &Self::Image, window: CropWindow) -> Result<Self::Image, RasterError> {
        let (w, h) = (image.width(), image.height());
        if window.left + window.width > w || window.top + window.height > h {
            return Err(RasterError::CropOutOfBounds(window, w, h));
        }
        Ok(image.crop_imm(window.left, window.top, window.width, window.height))
    }

    fn trim(&self, image: &Self::Image, options: TrimOptions) -> Result<Self::Image, RasterError> {
        let rgba = image.to_rgba8();
        let (w, h) = rgba.dimensions();
        let reference = *rgba.get_pixel(0, 0);
        let close = |p: &Rgba<u8>| {
            p.0.iter()
                .zip(reference.0.iter())
                .all(|(a, b)| a.abs_diff(*b) <= options.threshold)
        };

        let mut top = 0;
        while top < h && (0..w).all(|x| close(rgba.get_pixel(x, top))) {
            top += 1;
        }
        if top == h {
            // Entire image matches the border color; nothing to keep.
            return Ok(image.clone());
        }
        let mut bottom = h;
        while bottom > top && (0..w).all(|x| close(rgba.get_pixel(x, bottom - 1))) {
            bottom -= 1;
        }
        let mut left = 0;
        while left < w && (top..bottom).all(|y| close(rgba.get_pixel(left, y))) {
            left += 1;
        }
        let mut right = w;
        while right > left && (top..bottom).all(|y| close(rgba.get_pixel(right - 1, y))) {
            right -= 1;
        }

        Ok(image.crop_imm(left, top, right - left, bottom - top))
    }

    fn encode(&self, image: &Self::Image, format: OutputFormat, quality: Quality) -> Result<EncodedImage, RasterError> {
        let mut bytes = Vec::new();
        match format {
            OutputFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
                let mut cursor = Cursor::new(&mut bytes);
                let encoder = JpegEncoder::new_with_quality(&mut cursor, quality.value());
                rgb.write_with_encoder(encoder)
                    .map_err(|e| RasterError::Encode(e.to_string()))?;
            }
            other => {
                let target = image_format(other)
                    .ok_or_else(|| RasterError::Encode(format!("{other:?} encoder not compiled in")))?;
                image
                    .write_to(&mut Cursor::new(&mut bytes), target)
                    .map_err(|e| RasterError::Encode(e.to_string()))?;
            }
        }
        Ok(EncodedImage {
            bytes,
            width: image.width(),
            height: image.height(),
            format,
        })
    }

    fn supports(&self, format: OutputFormat) -> bool {
        image_format(format).is_some()
    }
}
