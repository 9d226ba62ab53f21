//! # tilemath algorithms
//!
//! Per-tile band-math kernels for a dynamic tile server, plus the
//! registry that exposes them to the routing layer.
//!
//! ## Available kernels
//!
//! - **change**: rapid change assessment over a before/after band pair,
//!   binary and signed-percentage variants
//! - **flood**: MNDWI water index with automatic Otsu thresholding
//!
//! Each kernel is a pure function over one [`TileImage`]: the serving
//! pipeline fetches, mosaicks and reprojects the source bands, calls the
//! kernel once per tile request, and encodes the returned tile for
//! transport. Kernels never perform I/O.
//!
//! [`TileImage`]: tilemath_core::TileImage

pub mod change;
pub mod flood;
pub mod registry;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::change::{PercentChange, PercentChangeParams, RapidChange, RapidChangeParams};
    pub use crate::flood::{otsu_threshold, FloodDetection, FloodDetectionParams};
    pub use crate::registry::{AlgorithmEntry, AlgorithmFactory, Registry};
    pub use tilemath_core::prelude::*;
}
