//! Coordinate Reference System identifier
//!
//! The kernel never reprojects; the CRS is an opaque label carried from
//! input tile to output tile so the serving pipeline can round-trip it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque CRS identifier in `AUTHORITY:CODE` form (e.g. `"EPSG:3857"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crs(String);

impl Crs {
    /// Create a CRS from an authority string
    pub fn new(ident: impl Into<String>) -> Self {
        Self(ident.into())
    }

    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self(format!("EPSG:{code}"))
    }

    /// Web Mercator (EPSG:3857), the usual tile-serving CRS
    pub fn web_mercator() -> Self {
        Self::from_epsg(3857)
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// The raw identifier string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// EPSG code, if the identifier is EPSG-authority
    pub fn epsg(&self) -> Option<u32> {
        self.0
            .strip_prefix("EPSG:")
            .and_then(|code| code.parse().ok())
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsg_roundtrip() {
        let crs = Crs::from_epsg(3857);
        assert_eq!(crs.as_str(), "EPSG:3857");
        assert_eq!(crs.epsg(), Some(3857));
    }

    #[test]
    fn test_non_epsg_identifier() {
        let crs = Crs::new("ESRI:54009");
        assert_eq!(crs.epsg(), None);
    }
}
