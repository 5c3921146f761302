//! Pure geometry: fit decisions, dimension math, focal crop planning.
//!
//! Everything in this module is a pure function over plain values — no I/O,
//! no pixels, no backend handles. The [`pipeline`](crate::pipeline) feeds
//! these functions the probed original dimensions and a variant spec, and
//! they answer three questions:
//!
//! - **Should this variant exist at all?** → [`fit::decide`]
//! - **What size does a plain resize produce?** → [`dimensions::calculate_dimensions`]
//! - **Where does a focal crop land?** → [`focal::plan`]
//!
//! The module is split into:
//! - **fit**: the ordered decision table mapping (original, spec) to a [`FitAction`]
//! - **dimensions**: per-fit-mode output dimension calculation
//! - **focal**: focal-point resolution, pre-scale sizing, and crop-window clamping

pub mod dimensions;
pub mod fit;
pub mod focal;

pub use dimensions::calculate_dimensions;
pub use fit::{FitAction, decide};
pub use focal::{FocalCropPlan, FocalPoint, OperationKind, plan, resolve_focal_point};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pixel dimensions of an image. Both axes are always ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width-to-height ratio as a float, the comparison basis for every
    /// fit-mode branch.
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height as f64
    }
}

/// Policy for reconciling a target box with the original aspect ratio.
///
/// Matches the conventional CSS `object-fit` vocabulary. `Cover` is the
/// default when both target axes are given and no other rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Fill the box, cropping overflow; aspect preserved.
    #[default]
    Cover,
    /// Fit entirely within the box; aspect preserved.
    Contain,
    /// Exactly the box; aspect not preserved.
    Fill,
    /// Like contain, but also guarantees both axes ≤ their targets after rounding.
    Inside,
    /// Aspect preserved, both axes ≥ their targets.
    Outside,
}

/// A single resize request after boundary normalization.
///
/// Both the legacy two-number form and the options-object form of the
/// consumed configuration collapse into this one shape before any geometry
/// logic runs; nothing downstream ever sees two signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Fit,
}

/// A pixel-space rectangle extracted from a (possibly pre-scaled) image.
///
/// Invariant, guaranteed by construction in [`focal::crop_window`]:
/// `left + width ≤ bounds.width` and `top + height ≤ bounds.height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropWindow {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// A crop window collapsed to an empty region even after clamping.
///
/// Rounding drift is always resolved by clamping and never surfaces as an
/// error; this fires only when no positive region exists at all.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("crop region {width}x{height} is empty within {bound_width}x{bound_height} image")]
pub struct InvalidRegion {
    pub width: u32,
    pub height: u32,
    pub bound_width: u32,
    pub bound_height: u32,
}

/// Round-half-up on a floating intermediate, clamped to a positive pixel count.
///
/// All dimension math funnels through here so the rounding rule is applied
/// in exactly one place.
pub(crate) fn round_dim(value: f64) -> u32 {
    (value.round() as u32).max(1)
}
