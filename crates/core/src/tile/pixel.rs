//! Declared pixel storage types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage type a tile's values are meant to be encoded with.
///
/// Band values are held as `f64` in memory; `PixelType` records the type
/// the serving pipeline should use when encoding the tile for transport.
/// Kernels producing classification rasters declare `UInt8`, the signed
/// percentage kernel declares `Int8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelType {
    UInt8,
    Int8,
    Float32,
    Float64,
}

impl PixelType {
    /// Representable value range of the declared type
    pub fn range(&self) -> (f64, f64) {
        match self {
            PixelType::UInt8 => (u8::MIN as f64, u8::MAX as f64),
            PixelType::Int8 => (i8::MIN as f64, i8::MAX as f64),
            PixelType::Float32 => (f32::MIN as f64, f32::MAX as f64),
            PixelType::Float64 => (f64::MIN, f64::MAX),
        }
    }

    /// Whether `value` is exactly representable in the declared type
    pub fn contains(&self, value: f64) -> bool {
        let (lo, hi) = self.range();
        value >= lo && value <= hi
    }
}

impl fmt::Display for PixelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PixelType::UInt8 => "uint8",
            PixelType::Int8 => "int8",
            PixelType::Float32 => "float32",
            PixelType::Float64 => "float64",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert_eq!(PixelType::UInt8.range(), (0.0, 255.0));
        assert_eq!(PixelType::Int8.range(), (-128.0, 127.0));
        assert!(PixelType::Int8.contains(-100.0));
        assert!(!PixelType::UInt8.contains(-1.0));
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PixelType::UInt8).unwrap();
        assert_eq!(json, "\"uint8\"");
    }
}
