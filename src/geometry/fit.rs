//! The fit decision: omit, plain resize, or focal crop.
//!
//! One ordered rule table, first match wins. The function is total — every
//! valid input terminates with exactly one action — and referentially
//! transparent, so it needs no synchronization under the rayon fan-out.

use super::{Fit, ImageDimensions};
use crate::variant::VariantSpec;

/// What the pipeline should do with one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAction {
    /// Skip the variant entirely; no raster work, all-null result.
    Omit,
    /// Uniform resize to calculated dimensions.
    Resize,
    /// Cover-style pre-scale followed by a focal-point crop.
    ResizeWithFocalPoint,
}

/// Decide the action for one variant.
///
/// `spec` must already be sanitized (see [`VariantSpec::sanitized`]).
/// An unset target axis never makes the original count as "smaller" on
/// that axis — the original system substituted 0 for the missing target,
/// making the comparison vacuously false, and that behavior is kept
/// as is.
pub fn decide(original: ImageDimensions, spec: &VariantSpec, has_focal_point: bool) -> FitAction {
    let smaller_w = spec.width.is_some_and(|w| original.width < w);
    let smaller_h = spec.height.is_some_and(|h| original.height < h);

    // Enlargement guard: only when withoutEnlargement is unset, not
    // explicitly false.
    if spec.without_enlargement.is_none() {
        let omit = match (spec.width, spec.height) {
            (Some(_), Some(_)) => smaller_w && smaller_h,
            (Some(_), None) => smaller_w,
            (None, Some(_)) => smaller_h,
            (None, None) => false,
        };
        if omit {
            return FitAction::Omit;
        }
    }

    if matches!(spec.fit(), Fit::Contain | Fit::Inside) {
        return FitAction::Resize;
    }

    if spec.width.is_none() && spec.height.is_none() {
        return FitAction::Resize;
    }

    // Missing axes fall back to 1 in the aspect comparison.
    let target_aspect = spec.width.unwrap_or(1) as f64 / spec.height.unwrap_or(1) as f64;
    if target_aspect == original.aspect() {
        return FitAction::Resize;
    }

    if spec.without_enlargement == Some(true) && (smaller_w || smaller_h) {
        return FitAction::Resize;
    }

    if spec.without_reduction == Some(true) && !(smaller_w || smaller_h) {
        return FitAction::Resize;
    }

    if has_focal_point {
        FitAction::ResizeWithFocalPoint
    } else {
        FitAction::Resize
    }
}
