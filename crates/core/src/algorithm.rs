//! Algorithm trait and static descriptor types
//!
//! Every kernel declares an [`AlgorithmMetadata`] record once: the serving
//! pipeline reads it to validate caller-supplied tiles before invocation
//! and to render self-documenting API schemas. The record is a read-only
//! contract, never negotiated at runtime.

use serde::Serialize;

use crate::error::Result;
use crate::tile::{PixelType, TileImage};

/// Semantic role of one expected input band.
#[derive(Debug, Clone, Serialize)]
pub struct BandRole {
    /// Short label, e.g. "Green band"
    pub title: &'static str,
    /// What the band should contain
    pub description: &'static str,
    /// Whether the band must be present
    pub required: bool,
}

/// Static metadata declared once per algorithm variant.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmMetadata {
    /// Human-readable title
    pub title: &'static str,
    /// One-line description of what the algorithm computes
    pub description: &'static str,
    /// Minimum number of input bands the kernel enforces
    pub input_nbands: usize,
    /// Semantic roles of the expected input bands
    pub input_bands: Vec<BandRole>,
    /// Free-form note on how input bands are consumed
    pub input_description: &'static str,
    /// Number of output bands produced
    pub output_nbands: usize,
    /// Storage type of the output values
    pub output_dtype: PixelType,
    /// Per-output-band minimum value
    pub output_min: Vec<f64>,
    /// Per-output-band maximum value
    pub output_max: Vec<f64>,
    /// Free-form note on what the output values mean
    pub output_description: &'static str,
    /// Rendering hint for the serving pipeline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_colormap_name: Option<&'static str>,
    /// Unit of the output values, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_unit: Option<&'static str>,
}

/// A per-tile raster kernel.
///
/// Implementations are pure functions over an immutable input tile:
/// no I/O, no shared mutable state, no internal suspension points.
/// The serving pipeline may call `apply` from many worker threads at
/// once, one call per in-flight tile request.
pub trait TileAlgorithm: Send + Sync {
    /// Static descriptor for validation and schema rendering
    fn metadata(&self) -> &AlgorithmMetadata;

    /// Compute the derived tile
    fn apply(&self, img: &TileImage) -> Result<TileImage>;
}
