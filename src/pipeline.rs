//! The variant pipeline: decide, calculate, materialize, aggregate.
//!
//! One run consumes the original image bytes plus a list of variant specs
//! and produces a name-keyed map of [`VariantResult`]s along with the
//! encoded payloads for persistence. The flow per variant:
//!
//! ```text
//! sanitize → decide ──┬─ Omit                → all-null result, no raster work
//!                     ├─ Resize              → calculate_dimensions → materialize
//!                     └─ ResizeWithFocalPoint → prescale → true dims → crop window → materialize
//! ```
//!
//! ## Concurrency
//!
//! Variants are independent: the pipeline fans out one [rayon] task per
//! spec, each task decoding its own image handle from the shared source
//! bytes. Tasks never observe each other's state; the orchestrator merges
//! completed results into the final map. Collection into `Result` makes the
//! join fail-fast — the first failing variant aborts the run with its spec
//! name attached.
//!
//! ## Animated sources
//!
//! Engines that stack animation frames vertically report the stacked total
//! as their height. All geometry runs on per-frame dimensions, and reported
//! heights are divided by the page count; `filesize` stays the full
//! multi-frame payload length.

use crate::geometry::{
    self, FitAction, FocalPoint, ImageDimensions, InvalidRegion, OperationKind,
};
use crate::naming::{NameContext, default_variant_name};
use crate::raster::{
    FormatOptions, OutputFormat, PendingOperations, RasterBackend, RasterError, materialize,
};
use crate::variant::VariantSpec;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// The source bytes are unreadable; fatal, nothing can be computed.
    #[error("failed to read source image: {0}")]
    Decode(#[source] RasterError),
    #[error("variant '{name}': {source}")]
    Variant {
        name: String,
        #[source]
        source: RasterError,
    },
    #[error("variant '{name}': {source}")]
    Region {
        name: String,
        #[source]
        source: InvalidRegion,
    },
}

/// Positional edits supplied alongside an upload.
///
/// `width_in_pixels`/`height_in_pixels` describe the dimensions left by an
/// upstream crop operation; when present they replace the probed dimensions
/// for every geometry decision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadEdits {
    /// Percent-space origin of the upstream crop; carried through for the
    /// caller's bookkeeping, not interpreted by this crate. The crop's
    /// effect arrives via `width_in_pixels`/`height_in_pixels`.
    pub crop: Option<CropPercent>,
    pub width_in_pixels: Option<u32>,
    pub height_in_pixels: Option<u32>,
    pub focal_point: Option<FocalPoint>,
}

/// Percent-space origin of an upstream crop.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CropPercent {
    pub x: f64,
    pub y: f64,
}

/// Per-variant outcome. All-null fields signal an omitted variant.
///
/// Serialized in camelCase, matching the casing of the consumed
/// configuration and edits interfaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantResult {
    pub name: String,
    pub filename: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub filesize: Option<u64>,
    pub mime_type: Option<String>,
}

impl VariantResult {
    fn omitted(name: &str) -> Self {
        Self {
            name: name.to_string(),
            filename: None,
            width: None,
            height: None,
            filesize: None,
            mime_type: None,
        }
    }
}

/// Encoded payload plus its destination filename, handed to the caller's
/// persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Aggregated output of one pipeline run.
#[derive(Debug, Default)]
pub struct GeneratedVariants {
    /// Name-keyed results, one entry per configured spec.
    pub sizes: BTreeMap<String, VariantResult>,
    /// Payloads for persistence; omitted variants contribute none.
    pub files: Vec<VariantFile>,
}

/// One pipeline invocation's inputs.
pub struct PipelineInput<'a> {
    pub source: &'a [u8],
    /// Original filename, used for default variant naming and the
    /// same-format fallback.
    pub original_name: &'a str,
    pub specs: &'a [VariantSpec],
    pub edits: UploadEdits,
    /// Focal point persisted by the caller's document store, if any.
    pub stored_focal_point: Option<FocalPoint>,
    pub operation: OperationKind,
}

/// Run the full pipeline over every configured variant.
pub fn generate_variants<B: RasterBackend>(
    backend: &B,
    input: &PipelineInput<'_>,
) -> Result<GeneratedVariants, PipelineError> {
    let probed = backend.probe(input.source).map_err(PipelineError::Decode)?;
    let pages = probed.pages.max(1);

    // Frame-normalized original, overridden by an upstream crop's pixel
    // dimensions when the upload carried one.
    let original = ImageDimensions::new(
        input.edits.width_in_pixels.unwrap_or(probed.width).max(1),
        input
            .edits
            .height_in_pixels
            .unwrap_or(probed.height / pages)
            .max(1),
    );

    let focal = geometry::resolve_focal_point(
        input.edits.focal_point,
        input.stored_focal_point,
        input.operation,
    );

    let per_variant: Vec<(VariantResult, Option<VariantFile>)> = input
        .specs
        .par_iter()
        .map(|spec| build_variant(backend, input, pages, original, focal, spec))
        .collect::<Result<_, _>>()?;

    // Only the orchestrator writes the final map; tasks hand results over.
    let mut generated = GeneratedVariants::default();
    for (result, file) in per_variant {
        generated.sizes.insert(result.name.clone(), result);
        generated.files.extend(file);
    }
    Ok(generated)
}

fn build_variant<B: RasterBackend>(
    backend: &B,
    input: &PipelineInput<'_>,
    pages: u32,
    original: ImageDimensions,
    focal: Option<FocalPoint>,
    spec: &VariantSpec,
) -> Result<(VariantResult, Option<VariantFile>), PipelineError> {
    let spec = spec.sanitized();

    match geometry::decide(original, &spec, focal.is_some()) {
        FitAction::Omit => Ok((VariantResult::omitted(&spec.name), None)),
        FitAction::Resize => {
            let dims = geometry::calculate_dimensions(original, &spec.resize_request());
            let image = backend.decode(input.source).map_err(PipelineError::Decode)?;
            let ops = PendingOperations {
                resize: Some(dims),
                extract: None,
                trim: spec.trim,
                format: Some(output_format(&spec, input.original_name)),
            };
            let encoded = materialize(backend, image, &ops).map_err(|e| PipelineError::Variant {
                name: spec.name.clone(),
                source: e,
            })?;
            Ok(finish_variant(input, pages, &spec, encoded))
        }
        FitAction::ResizeWithFocalPoint => {
            // decide() only returns this action when a focal point exists
            let focal = focal.unwrap_or(FocalPoint::CENTER);
            let request = spec.resize_request();
            let (target_w, target_h) = geometry::focal::resolve_targets(original, &request);
            let prescale = geometry::focal::prescale_dimensions(original, target_w, target_h);

            let image = backend.decode(input.source).map_err(PipelineError::Decode)?;
            let prescaled = backend
                .resize(&image, prescale.width, prescale.height)
                .map_err(|e| PipelineError::Variant { name: spec.name.clone(), source: e })?;

            // The engine's true post-resize dimensions absorb any rounding
            // drift; the crop window is computed against those, per frame.
            let stacked = backend.dimensions(&prescaled);
            let true_dims = ImageDimensions::new(stacked.width, (stacked.height / pages).max(1));
            let window = geometry::focal::crop_window(true_dims, target_w, target_h, focal)
                .map_err(|e| PipelineError::Region { name: spec.name.clone(), source: e })?;

            let ops = PendingOperations {
                resize: None,
                extract: Some(window),
                trim: spec.trim,
                format: Some(output_format(&spec, input.original_name)),
            };
            let encoded = materialize(backend, prescaled, &ops).map_err(|e| {
                PipelineError::Variant { name: spec.name.clone(), source: e }
            })?;
            Ok(finish_variant(input, pages, &spec, encoded))
        }
    }
}

/// Pick the variant's encode format: configured options win, otherwise stay
/// in the source's own format, with PNG covering unknown extensions.
fn output_format(spec: &VariantSpec, original_name: &str) -> FormatOptions {
    if let Some(options) = spec.format {
        return options;
    }
    let source_format = original_name
        .rsplit('.')
        .next()
        .and_then(OutputFormat::from_extension)
        .unwrap_or(OutputFormat::Png);
    FormatOptions::new(source_format)
}

/// Turn an encode result into the reported metadata and payload pair.
fn finish_variant(
    input: &PipelineInput<'_>,
    pages: u32,
    spec: &VariantSpec,
    encoded: crate::raster::EncodedImage,
) -> (VariantResult, Option<VariantFile>) {
    let width = encoded.width;
    let height = (encoded.height / pages).max(1);
    let extension = encoded.format.extension();

    let filename = match &spec.generate_name {
        Some(template) => template(&NameContext {
            extension,
            height,
            original_name: input.original_name,
            size_name: &spec.name,
            width,
        }),
        None => default_variant_name(input.original_name, width, height, extension),
    };

    let result = VariantResult {
        name: spec.name.clone(),
        filename: Some(filename.clone()),
        width: Some(width),
        height: Some(height),
        filesize: Some(encoded.size_bytes()),
        mime_type: Some(encoded.format.mime_type().to_string()),
    };
    let file = VariantFile { filename, bytes: encoded.bytes };
    (result, Some(file))
}
