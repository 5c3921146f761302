//! Variant specifications: one declared output size per entry.
//!
//! A [`VariantSpec`] describes *what* to produce, not *how* — the geometry
//! layer decides the action and dimensions, the raster backend does the
//! pixel work. Specs are immutable for the duration of one pipeline run;
//! the sanitize step returns an adjusted copy rather than mutating.

use crate::geometry::{Fit, ResizeRequest};
use crate::naming::NameContext;
use std::fmt;
use std::sync::Arc;

use crate::raster::{FormatOptions, TrimOptions};

/// Caller-supplied filename template, invoked with the actual encoded
/// dimensions after the variant is materialized.
pub type NameTemplate = Arc<dyn Fn(&NameContext<'_>) -> String + Send + Sync>;

/// One declared derived-image configuration.
///
/// `name` is the unique key the result map is indexed by. Unset
/// `without_enlargement` and explicitly-false `without_enlargement` behave
/// differently in the fit decision, which is why both guards are
/// `Option<bool>` rather than `bool`.
#[derive(Clone, Default)]
pub struct VariantSpec {
    pub name: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Option<Fit>,
    /// Gravity hint for engines that crop internally on `cover`; carried
    /// through, not interpreted by this crate.
    pub position: Option<String>,
    pub without_enlargement: Option<bool>,
    pub without_reduction: Option<bool>,
    pub format: Option<FormatOptions>,
    pub trim: Option<TrimOptions>,
    pub generate_name: Option<NameTemplate>,
}

impl VariantSpec {
    /// A spec with only its name set; targets and policies default to unset.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Effective fit mode: `cover` unless configured otherwise.
    pub fn fit(&self) -> Fit {
        self.fit.unwrap_or_default()
    }

    /// Inject defaults a reduction-guarded spec relies on: `contain` keeps
    /// the image whole and `left top` anchors it predictably when the
    /// original is smaller than the box.
    pub fn sanitized(&self) -> VariantSpec {
        let mut spec = self.clone();
        if spec.without_reduction.is_some() {
            spec.fit.get_or_insert(Fit::Contain);
            spec.position.get_or_insert_with(|| "left top".to_string());
        }
        spec
    }

    /// Normalize the spec's target box into the single request shape the
    /// geometry layer consumes.
    pub fn resize_request(&self) -> ResizeRequest {
        ResizeRequest {
            width: self.width,
            height: self.height,
            fit: self.fit(),
        }
    }
}

impl fmt::Debug for VariantSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantSpec")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fit", &self.fit)
            .field("position", &self.position)
            .field("without_enlargement", &self.without_enlargement)
            .field("without_reduction", &self.without_reduction)
            .field("format", &self.format)
            .field("trim", &self.trim)
            .field("generate_name", &self.generate_name.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
