//! Variant filename construction.
//!
//! The default convention is `{stem}-{width}x{height}.{ext}`, built from the
//! *actual* encoded dimensions after rounding, never the requested targets.
//! Callers can override it per variant with a name template, which receives
//! the same post-encode values through [`NameContext`].

/// Everything a custom name template may want to interpolate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameContext<'a> {
    /// File extension of the encoded output (no dot).
    pub extension: &'a str,
    /// Actual encoded height (frame-normalized for animated sources).
    pub height: u32,
    /// Original filename as supplied by the caller, extension included.
    pub original_name: &'a str,
    /// The variant's name key.
    pub size_name: &'a str,
    /// Actual encoded width.
    pub width: u32,
}

/// Filename stem of the original: everything before the last dot.
///
/// A leading dot is not an extension separator, so `.hidden` stays whole.
pub fn file_stem(original_name: &str) -> &str {
    match original_name.rfind('.') {
        Some(0) | None => original_name,
        Some(pos) => &original_name[..pos],
    }
}

/// Default variant filename: `{stem}-{width}x{height}.{ext}`.
pub fn default_variant_name(original_name: &str, width: u32, height: u32, extension: &str) -> String {
    format!("{}-{}x{}.{}", file_stem(original_name), width, height, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_strips_last_extension_only() {
        assert_eq!(file_stem("photo.final.jpg"), "photo.final");
        assert_eq!(file_stem("photo.jpg"), "photo");
    }

    #[test]
    fn stem_without_extension_is_the_whole_name() {
        assert_eq!(file_stem("photo"), "photo");
    }

    #[test]
    fn stem_keeps_hidden_files_whole() {
        assert_eq!(file_stem(".hidden"), ".hidden");
    }

    #[test]
    fn default_name_uses_actual_dimensions() {
        assert_eq!(
            default_variant_name("dawn.jpg", 667, 500, "webp"),
            "dawn-667x500.webp"
        );
    }

    #[test]
    fn default_name_survives_multi_dot_sources() {
        assert_eq!(
            default_variant_name("a.b.png", 10, 20, "png"),
            "a.b-10x20.png"
        );
    }
}
