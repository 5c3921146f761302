//! Focal-point resolution, pre-scale sizing, and crop-window planning.
//!
//! A focal crop happens in two stages: a cover-style pre-scale that makes
//! one axis exactly match its target (the other spills over), then a crop
//! window centered on the focal point and clamped so it always stays inside
//! the scaled image. The window is recomputed against the raster engine's
//! *actual* post-prescale dimensions to absorb rounding drift, so
//! [`crop_window`] is exposed separately from the combined [`plan`].

use super::{CropWindow, ImageDimensions, InvalidRegion, ResizeRequest, round_dim};
use serde::{Deserialize, Serialize};

/// Percentage-based anchor biasing which region survives a focal crop.
///
/// Coordinates are not validated against [0, 100]; the crop-window clamp
/// absorbs out-of-range values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FocalPoint {
    pub x: f64,
    pub y: f64,
}

impl FocalPoint {
    /// Center of the image, the default for newly created images.
    pub const CENTER: FocalPoint = FocalPoint { x: 50.0, y: 50.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinates rounded to the nearest whole percent, the form in which
    /// request-supplied focal points are stored and used.
    pub fn rounded(self) -> Self {
        Self { x: self.x.round(), y: self.y.round() }
    }
}

/// The document operation a focal-point resolution runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    Update,
    Duplicate,
}

/// Determine the effective focal point for the current operation.
///
/// - A request-supplied focal point always wins, rounded to whole percents.
/// - An update with no new positional data resolves to `None`, so a plain
///   save never triggers an implicit refocus.
/// - A duplicate inherits the stored value.
/// - A create with nothing supplied defaults to center.
pub fn resolve_focal_point(
    incoming: Option<FocalPoint>,
    stored: Option<FocalPoint>,
    operation: OperationKind,
) -> Option<FocalPoint> {
    if let Some(point) = incoming {
        return Some(point.rounded());
    }
    match operation {
        OperationKind::Create => Some(FocalPoint::CENTER),
        OperationKind::Update => None,
        OperationKind::Duplicate => stored,
    }
}

/// Fully computed focal-crop geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocalCropPlan {
    /// Dimensions the whole image is scaled to before cropping.
    pub prescale: ImageDimensions,
    /// Window to extract from the pre-scaled image.
    pub window: CropWindow,
}

/// Fill in missing target axes from the original aspect ratio.
///
/// Mirrors the single-axis rule of
/// [`calculate_dimensions`](super::calculate_dimensions); with neither axis
/// set, the original's own dimensions are the target.
pub fn resolve_targets(original: ImageDimensions, request: &ResizeRequest) -> (u32, u32) {
    let aspect = original.aspect();
    match (request.width, request.height) {
        (Some(w), Some(h)) => (w.max(1), h.max(1)),
        (Some(w), None) => (w.max(1), round_dim(w as f64 / aspect)),
        (None, Some(h)) => (round_dim(h as f64 * aspect), h.max(1)),
        (None, None) => (original.width, original.height),
    }
}

/// Cover-style pre-scale size for a focal crop.
///
/// When the target box is narrower than the original (relative to aspect),
/// height is pinned to the target and width spills over uncapped, giving
/// the crop window horizontal room to follow the focal point; otherwise
/// width is pinned and height spills.
pub fn prescale_dimensions(original: ImageDimensions, target_w: u32, target_h: u32) -> ImageDimensions {
    let aspect = original.aspect();
    let prioritize_height = (target_w as f64 / target_h as f64) < aspect;
    if prioritize_height {
        ImageDimensions::new(round_dim(target_h as f64 * aspect), target_h)
    } else {
        ImageDimensions::new(target_w, round_dim(target_w as f64 / aspect))
    }
}

/// Compute the clamped crop window within a pre-scaled image.
///
/// `prescale` must be the raster engine's true post-resize dimensions
/// (frame-normalized for animated sources), not the computed estimate.
/// The window edge is pulled back before the low bound is applied, so the
/// result can never extend past either edge.
pub fn crop_window(
    prescale: ImageDimensions,
    target_w: u32,
    target_h: u32,
    focal: FocalPoint,
) -> Result<CropWindow, InvalidRegion> {
    let width = target_w.min(prescale.width);
    let height = target_h.min(prescale.height);
    if width == 0 || height == 0 {
        return Err(InvalidRegion {
            width,
            height,
            bound_width: prescale.width,
            bound_height: prescale.height,
        });
    }

    Ok(CropWindow {
        left: clamped_origin(prescale.width, width, focal.x),
        top: clamped_origin(prescale.height, height, focal.y),
        width,
        height,
    })
}

/// One axis of the window placement: center on the focal percent, pull back
/// from the far edge, clamp at zero, floor to a pixel.
fn clamped_origin(extent: u32, window: u32, focal_percent: f64) -> u32 {
    let focal_center = extent as f64 * focal_percent / 100.0;
    let mut origin = focal_center - window as f64 / 2.0;
    if origin + window as f64 > extent as f64 {
        origin = (extent - window) as f64;
    }
    if origin < 0.0 {
        origin = 0.0;
    }
    origin.floor() as u32
}

/// Plan a full focal crop from the computed pre-scale estimate.
///
/// The pipeline re-runs [`crop_window`] with the engine's true post-resize
/// dimensions; this combined form exists for callers that only need the
/// deterministic geometry.
pub fn plan(
    original: ImageDimensions,
    request: &ResizeRequest,
    focal: FocalPoint,
) -> Result<FocalCropPlan, InvalidRegion> {
    let (target_w, target_h) = resolve_targets(original, request);
    let prescale = prescale_dimensions(original, target_w, target_h);
    let window = crop_window(prescale, target_w, target_h, focal)?;
    Ok(FocalCropPlan { prescale, window })
}
