//! Output dimension calculation for every fit mode.
//!
//! Pure and testable without any I/O or pixels. All rounding is
//! round-half-up on the floating intermediate (`f64::round`), and results
//! are never smaller than 1x1.

use super::{Fit, ImageDimensions, ResizeRequest, round_dim};

/// Calculate the final output dimensions for a plain (non-focal) resize.
///
/// - Neither axis set: the original passes through unchanged.
/// - One axis set: the other follows from the original aspect ratio.
/// - Both set: behavior branches on the fit mode; see [`Fit`].
pub fn calculate_dimensions(original: ImageDimensions, request: &ResizeRequest) -> ImageDimensions {
    let aspect = original.aspect();

    match (request.width, request.height) {
        (None, None) => original,
        (Some(w), None) => ImageDimensions::new(w.max(1), round_dim(w as f64 / aspect)),
        (None, Some(h)) => ImageDimensions::new(round_dim(h as f64 * aspect), h.max(1)),
        (Some(w), Some(h)) => {
            let (w, h) = (w.max(1), h.max(1));
            match request.fit {
                Fit::Fill => ImageDimensions::new(w, h),
                Fit::Contain | Fit::Inside => {
                    let mut out = fit_within(original, w, h);
                    if request.fit == Fit::Inside {
                        // Rounding on the unconstrained axis can overshoot by a
                        // pixel; re-derive from the other axis until both fit.
                        if out.width > w {
                            out = ImageDimensions::new(w, round_dim(w as f64 / aspect));
                        }
                        if out.height > h {
                            out = ImageDimensions::new(round_dim(h as f64 * aspect), h);
                        }
                    }
                    out
                }
                Fit::Cover => cover_box(original, w, h),
                Fit::Outside => {
                    let covered = cover_box(original, w, h);
                    ImageDimensions::new(covered.width.max(w), covered.height.max(h))
                }
            }
        }
    }
}

/// Largest aspect-preserving size that fits inside `w`x`h`.
fn fit_within(original: ImageDimensions, w: u32, h: u32) -> ImageDimensions {
    let aspect = original.aspect();
    let target_aspect = w as f64 / h as f64;
    if aspect > target_aspect {
        // Original is wider than the box: width limits.
        ImageDimensions::new(w, round_dim(w as f64 / aspect))
    } else {
        ImageDimensions::new(round_dim(h as f64 * aspect), h)
    }
}

/// Smallest aspect-preserving size that covers `w`x`h`; one axis matches
/// the target, the other may exceed it.
fn cover_box(original: ImageDimensions, w: u32, h: u32) -> ImageDimensions {
    let aspect = original.aspect();
    let target_aspect = w as f64 / h as f64;
    if aspect > target_aspect {
        // Original is wider than the box: height limits, width spills over.
        ImageDimensions::new(round_dim(h as f64 * aspect), h)
    } else {
        ImageDimensions::new(w, round_dim(w as f64 / aspect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: u32, h: u32) -> ImageDimensions {
        ImageDimensions::new(w, h)
    }

    fn request(w: Option<u32>, h: Option<u32>, fit: Fit) -> ResizeRequest {
        ResizeRequest { width: w, height: h, fit }
    }

    // =========================================================================
    // Single-axis and pass-through
    // =========================================================================

    #[test]
    fn no_targets_returns_original() {
        let out = calculate_dimensions(dims(640, 480), &request(None, None, Fit::Cover));
        assert_eq!(out, dims(640, 480));
    }

    #[test]
    fn width_only_scales_height_by_aspect() {
        // 800x600 at width 400 → 400x300
        let out = calculate_dimensions(dims(800, 600), &request(Some(400), None, Fit::Cover));
        assert_eq!(out, dims(400, 300));
    }

    #[test]
    fn height_only_scales_width_by_aspect() {
        let out = calculate_dimensions(dims(800, 600), &request(None, Some(300), Fit::Cover));
        assert_eq!(out, dims(400, 300));
    }

    #[test]
    fn single_axis_rounds_half_up() {
        // 3:2 at width 101 → height 67.33 rounds to 67; at width 100 → 66.67 rounds to 67
        let out = calculate_dimensions(dims(3, 2), &request(Some(100), None, Fit::Cover));
        assert_eq!(out, dims(100, 67));
    }

    // =========================================================================
    // fill
    // =========================================================================

    #[test]
    fn fill_hits_target_exactly() {
        let out = calculate_dimensions(dims(800, 600), &request(Some(123), Some(457), Fit::Fill));
        assert_eq!(out, dims(123, 457));
    }

    // =========================================================================
    // contain / inside
    // =========================================================================

    #[test]
    fn contain_wider_source_is_width_limited() {
        // 800x600 (4:3) into 400x500 → 400x300
        let out = calculate_dimensions(dims(800, 600), &request(Some(400), Some(500), Fit::Contain));
        assert_eq!(out, dims(400, 300));
    }

    #[test]
    fn contain_taller_source_is_height_limited() {
        // 600x800 (3:4) into 500x400 → 300x400
        let out = calculate_dimensions(dims(600, 800), &request(Some(500), Some(400), Fit::Contain));
        assert_eq!(out, dims(300, 400));
    }

    #[test]
    fn contain_preserves_aspect_within_a_pixel() {
        let original = dims(1237, 845);
        let out = calculate_dimensions(original, &request(Some(300), Some(300), Fit::Contain));
        let expected_h = (out.width as f64 / original.aspect()).round() as u32;
        assert!(out.height.abs_diff(expected_h) <= 1);
    }

    #[test]
    fn inside_never_exceeds_either_target() {
        // Awkward ratios where rounding could overshoot one axis
        for (ow, oh, tw, th) in [(997, 331, 250, 83), (331, 997, 83, 250), (1000, 999, 100, 100)] {
            let out = calculate_dimensions(dims(ow, oh), &request(Some(tw), Some(th), Fit::Inside));
            assert!(out.width <= tw, "{ow}x{oh} into {tw}x{th} gave width {}", out.width);
            assert!(out.height <= th, "{ow}x{oh} into {tw}x{th} gave height {}", out.height);
        }
    }

    // =========================================================================
    // cover / outside
    // =========================================================================

    #[test]
    fn cover_wider_source_matches_height_and_spills_width() {
        // 800x600 (4:3) covering 400x500 → 667x500
        let out = calculate_dimensions(dims(800, 600), &request(Some(400), Some(500), Fit::Cover));
        assert_eq!(out, dims(667, 500));
    }

    #[test]
    fn cover_taller_source_matches_width_and_spills_height() {
        // 600x800 (3:4) covering 500x400 → 500x667
        let out = calculate_dimensions(dims(600, 800), &request(Some(500), Some(400), Fit::Cover));
        assert_eq!(out, dims(500, 667));
    }

    #[test]
    fn cover_same_aspect_is_exact() {
        let out = calculate_dimensions(dims(800, 600), &request(Some(400), Some(300), Fit::Cover));
        assert_eq!(out, dims(400, 300));
    }

    #[test]
    fn outside_covers_both_targets() {
        for (ow, oh, tw, th) in [(800, 600, 400, 500), (600, 800, 500, 400), (999, 333, 100, 100)] {
            let out = calculate_dimensions(dims(ow, oh), &request(Some(tw), Some(th), Fit::Outside));
            assert!(out.width >= tw);
            assert!(out.height >= th);
        }
    }

    // =========================================================================
    // Floors
    // =========================================================================

    #[test]
    fn extreme_downscale_never_collapses_to_zero() {
        // 10000:1 strip shrunk hard; the short axis must stay at 1
        let out = calculate_dimensions(dims(10000, 10), &request(Some(50), None, Fit::Cover));
        assert_eq!(out.width, 50);
        assert!(out.height >= 1);
    }
}
