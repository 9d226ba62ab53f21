//! # tilemath core
//!
//! Core types for the tilemath raster algorithm kernels.
//!
//! This crate provides:
//! - `TileImage`: multi-band tile with validity mask and pass-through
//!   geospatial metadata
//! - `TileAlgorithm`: trait implemented by every per-tile kernel
//! - `AlgorithmMetadata`: static descriptor consumed by the serving
//!   pipeline for validation and schema rendering
//! - Error taxonomy shared across the workspace

pub mod algorithm;
pub mod bounds;
pub mod crs;
pub mod error;
pub mod tile;

pub use algorithm::{AlgorithmMetadata, BandRole, TileAlgorithm};
pub use bounds::BoundingBox;
pub use crs::Crs;
pub use error::{Error, Result};
pub use tile::{PixelType, TileImage};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::algorithm::{AlgorithmMetadata, BandRole, TileAlgorithm};
    pub use crate::bounds::BoundingBox;
    pub use crate::crs::Crs;
    pub use crate::error::{Error, Result};
    pub use crate::tile::{PixelType, TileImage};
}
