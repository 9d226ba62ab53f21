//! Spatial bounding box
//!
//! Like the CRS, bounds are opaque to the kernels: they describe where a
//! tile sits, not how its pixels are computed, and are forwarded unchanged
//! to output tiles.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in the tile's CRS units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum X (west edge)
    pub minx: f64,
    /// Minimum Y (south edge)
    pub miny: f64,
    /// Maximum X (east edge)
    pub maxx: f64,
    /// Maximum Y (north edge)
    pub maxy: f64,
}

impl BoundingBox {
    /// Create a new bounding box
    pub fn new(minx: f64, miny: f64, maxx: f64, maxy: f64) -> Self {
        Self {
            minx,
            miny,
            maxx,
            maxy,
        }
    }

    /// As a `[minx, miny, maxx, maxy]` array, the order used by tile APIs
    pub fn to_array(&self) -> [f64; 4] {
        [self.minx, self.miny, self.maxx, self.maxy]
    }

    /// Width of the box in CRS units
    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }

    /// Height of the box in CRS units
    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }
}
