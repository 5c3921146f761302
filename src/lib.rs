//! # focalmill
//!
//! A deterministic image variant engine. Given an original image and a
//! declared set of output variants — each with a target box, a fit mode,
//! and enlargement/reduction guards — focalmill decides whether each
//! variant should be skipped, uniformly resized, or resized with a
//! focal-point-aware crop, computes the exact pixel geometry for each case,
//! and drives a pluggable raster backend to materialize the pixels.
//!
//! # Architecture: Pure Core, Pluggable Edges
//!
//! ```text
//! VariantSpec list ─┐
//!                   ├─ geometry (pure) ── decisions, dimensions, crop windows
//! probed original ──┘         │
//!                             ▼
//!                    pipeline (rayon fan-out, one task per variant)
//!                             │
//!                             ▼
//!                    RasterBackend (image crate, or a mock in tests)
//! ```
//!
//! Every decision — omit vs. resize vs. focal crop, output dimensions,
//! crop-window placement — is a pure function in [`geometry`], unit
//! testable without touching pixels. The [`pipeline`] orchestrates those
//! decisions across all variants concurrently and aggregates a name-keyed
//! result map plus the encoded payloads for persistence. All pixel work
//! happens behind the [`raster::RasterBackend`] trait.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`geometry`] | Pure math: fit decisions, dimension calculation, focal crop planning |
//! | [`variant`] | Variant specifications and their sanitize/normalize steps |
//! | [`raster`] | Backend trait, operation parameters, and the `image`-crate implementation |
//! | [`pipeline`] | Per-variant fan-out, result aggregation, error propagation |
//! | [`naming`] | Default `{stem}-{w}x{h}.{ext}` filenames and name-template context |
//! | [`config`] | JSON variant-spec loading for the CLI |
//!
//! # Design Decisions
//!
//! ## Geometry Never Touches Pixels
//!
//! Subtle rounding and clamping errors in this domain silently corrupt
//! output images, so everything that can go wrong lives in pure functions
//! with worked-example tests. The raster backend only ever receives
//! already-decided coordinates.
//!
//! ## Explicit Pending Operations
//!
//! A variant's deferred work is carried as an immutable
//! [`raster::PendingOperations`] value applied by one `materialize` call —
//! resize, extract, trim, encode, in that order — rather than state
//! accumulated on a mutated builder.
//!
//! ## Observable Format Fallback
//!
//! Backends expose a capability table. A requested format the backend
//! cannot encode is substituted with PNG, and the substitution is visible
//! in the result's actual format and MIME type — never silently reported
//! as the requested format.
//!
//! ## Fail-Fast Variants
//!
//! Variants are independent until the join: the first failure aborts the
//! run with the failing variant's name attached, and sibling results are
//! discarded rather than half-persisted.

pub mod config;
pub mod geometry;
pub mod naming;
pub mod pipeline;
pub mod raster;
pub mod variant;

pub use geometry::{
    CropWindow, Fit, FitAction, FocalPoint, ImageDimensions, OperationKind, ResizeRequest,
};
pub use pipeline::{
    GeneratedVariants, PipelineError, PipelineInput, UploadEdits, VariantFile, VariantResult,
    generate_variants,
};
pub use raster::{ImageCrateBackend, RasterBackend};
pub use variant::VariantSpec;
