//! Variant configuration loading.
//!
//! The CLI consumes a JSON document listing the variants to generate. The
//! serde-facing [`VariantConfig`] is kept separate from the library's
//! [`VariantSpec`] so the spec type can carry a non-serializable name
//! template closure while the on-disk format stays plain data.
//!
//! ```json
//! [
//!   { "name": "thumbnail", "width": 400, "height": 300 },
//!   { "name": "card", "width": 768, "fit": "inside",
//!     "format": { "format": "webp", "quality": 80 } }
//! ]
//! ```

use crate::geometry::Fit;
use crate::raster::{FormatOptions, TrimOptions};
use crate::variant::VariantSpec;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid variant config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("variant name '{0}' declared more than once")]
    DuplicateName(String),
    #[error("variant at index {0} has an empty name")]
    EmptyName(usize),
}

/// One variant entry as it appears in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VariantConfig {
    pub name: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fit: Option<Fit>,
    pub position: Option<String>,
    pub without_enlargement: Option<bool>,
    pub without_reduction: Option<bool>,
    pub format: Option<FormatOptions>,
    pub trim: Option<TrimOptions>,
}

impl VariantConfig {
    pub fn into_spec(self) -> VariantSpec {
        VariantSpec {
            name: self.name,
            width: self.width,
            height: self.height,
            fit: self.fit,
            position: self.position,
            without_enlargement: self.without_enlargement,
            without_reduction: self.without_reduction,
            format: self.format,
            trim: self.trim,
            generate_name: None,
        }
    }
}

/// Parse a variant list, rejecting duplicate or empty names — names are the
/// unique key of the result map.
pub fn parse_variants(json: &str) -> Result<Vec<VariantSpec>, ConfigError> {
    let configs: Vec<VariantConfig> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    for (index, config) in configs.iter().enumerate() {
        if config.name.is_empty() {
            return Err(ConfigError::EmptyName(index));
        }
        if !seen.insert(config.name.clone()) {
            return Err(ConfigError::DuplicateName(config.name.clone()));
        }
    }
    Ok(configs.into_iter().map(VariantConfig::into_spec).collect())
}

/// Load and parse a variant config file.
pub fn load_variants(path: &Path) -> Result<Vec<VariantSpec>, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse_variants(&json)
}

/// A documented starter config, printed by `focalmill gen-config`.
pub fn stock_config() -> &'static str {
    r#"[
  { "name": "thumbnail", "width": 400, "height": 300 },
  { "name": "card", "width": 768, "fit": "inside" },
  { "name": "hero", "width": 1920, "height": 600,
    "format": { "format": "webp", "quality": 80 } },
  { "name": "original-size", "withoutReduction": true,
    "width": 1200, "height": 1200 }
]
"#
}
