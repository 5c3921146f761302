//! The raster-engine seam: trait, parameter types, and the `image`-crate
//! production backend.
//!
//! The module is split into:
//! - **params**: operation-describing value types ([`PendingOperations`],
//!   [`FormatOptions`], [`TrimOptions`], [`Quality`], [`OutputFormat`])
//! - **backend**: the [`RasterBackend`] trait plus the recording mock used
//!   by pipeline tests
//! - **image_backend**: [`ImageCrateBackend`], the pure-Rust production
//!   implementation

pub mod backend;
pub mod image_backend;
mod params;

pub use backend::{EncodedImage, ProbedDimensions, RasterBackend, RasterError};
pub use image_backend::ImageCrateBackend;
pub use params::{FormatOptions, OutputFormat, PendingOperations, Quality, TrimOptions};

/// Apply one variant's pending operations in a single pass:
/// resize → extract → trim → encode.
///
/// The operations value is explicit and immutable; this function is the
/// only place the sequence lives. The requested format is resolved through
/// the backend's capability table, so the encoded result's `format` field
/// is the source of truth for what was actually produced.
pub fn materialize<B: RasterBackend>(
    backend: &B,
    image: B::Image,
    ops: &PendingOperations,
) -> Result<EncodedImage, RasterError> {
    let mut current = image;
    if let Some(dims) = ops.resize {
        current = backend.resize(&current, dims.width, dims.height)?;
    }
    if let Some(window) = ops.extract {
        current = backend.crop(&current, window)?;
    }
    if let Some(trim) = ops.trim {
        current = backend.trim(&current, trim)?;
    }
    let format = ops.format.unwrap_or(FormatOptions::new(OutputFormat::Png));
    let actual = backend.resolve_format(format.format);
    backend.encode(&current, actual, format.quality)
}

#[cfg(test)]
mod tests {
    use super::backend::tests::{MockBackend, RecordedOp};
    use super::*;
    use crate::geometry::{CropWindow, ImageDimensions};

    #[test]
    fn materialize_applies_operations_in_order() {
        let backend = MockBackend::new(1000, 500);
        let image = backend.decode(b"x").unwrap();
        let ops = PendingOperations {
            resize: Some(ImageDimensions::new(600, 300)),
            extract: Some(CropWindow { left: 300, top: 0, width: 300, height: 300 }),
            trim: Some(TrimOptions::default()),
            format: Some(FormatOptions::new(OutputFormat::Webp)),
        };
        let encoded = materialize(&backend, image, &ops).unwrap();
        assert_eq!(encoded.format, OutputFormat::Webp);
        assert_eq!((encoded.width, encoded.height), (300, 300));

        let recorded = backend.recorded();
        let kinds: Vec<_> = recorded
            .iter()
            .map(|op| match op {
                RecordedOp::Decode => "decode",
                RecordedOp::Resize { .. } => "resize",
                RecordedOp::Crop(_) => "crop",
                RecordedOp::Trim => "trim",
                RecordedOp::Encode { .. } => "encode",
                RecordedOp::Probe => "probe",
            })
            .collect();
        assert_eq!(kinds, vec!["decode", "resize", "crop", "trim", "encode"]);
    }

    #[test]
    fn materialize_skips_absent_operations() {
        let backend = MockBackend::new(100, 100);
        let image = backend.decode(b"x").unwrap();
        let ops = PendingOperations {
            format: Some(FormatOptions::new(OutputFormat::Jpeg)),
            ..PendingOperations::default()
        };
        let encoded = materialize(&backend, image, &ops).unwrap();
        assert_eq!((encoded.width, encoded.height), (100, 100));
        assert_eq!(backend.recorded().len(), 2); // decode + encode only
    }

    #[test]
    fn materialize_substitutes_unsupported_format() {
        let backend = MockBackend::new(100, 100).without_support_for(OutputFormat::Avif);
        let image = backend.decode(b"x").unwrap();
        let ops = PendingOperations {
            format: Some(FormatOptions::new(OutputFormat::Avif)),
            ..PendingOperations::default()
        };
        let encoded = materialize(&backend, image, &ops).unwrap();
        assert_eq!(encoded.format, OutputFormat::Png);
    }
}
