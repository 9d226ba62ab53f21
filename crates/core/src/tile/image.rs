//! Multi-band tile image
//!
//! `TileImage` is the unit of work for the algorithm kernels: a stack of
//! equally-shaped 2D bands with an explicit validity mask and pass-through
//! geospatial metadata. The serving pipeline decodes, mosaicks and
//! reprojects source imagery into one of these per tile request; kernels
//! consume it immutably and produce a fresh `TileImage`.

use ndarray::Array2;

use crate::bounds::BoundingBox;
use crate::crs::Crs;
use crate::error::{Error, Result};
use crate::tile::PixelType;

/// One multi-band image tile with validity mask and provenance metadata.
///
/// Invariants, enforced at construction:
/// - at least one band;
/// - all bands share one `(rows, cols)` shape;
/// - the mask has that same shape;
/// - `band_names` has one entry per band.
#[derive(Debug, Clone)]
pub struct TileImage {
    /// Band data in (rows, cols) layout, one array per band
    bands: Vec<Array2<f64>>,
    /// Human-readable provenance label per band
    band_names: Vec<String>,
    /// Validity mask, `true` where the pixel carries a real measurement
    mask: Array2<bool>,
    /// Coordinate reference system, opaque pass-through
    crs: Option<Crs>,
    /// Spatial bounding box, opaque pass-through
    bounds: Option<BoundingBox>,
    /// Source asset identifiers, opaque pass-through
    assets: Vec<String>,
    /// Storage type the values are meant to be encoded with
    dtype: PixelType,
}

impl TileImage {
    /// Create a tile image from bands, names and a validity mask.
    pub fn new(
        bands: Vec<Array2<f64>>,
        band_names: Vec<String>,
        mask: Array2<bool>,
    ) -> Result<Self> {
        let first = bands.first().ok_or(Error::BandCount {
            required: 1,
            provided: 0,
        })?;
        let (rows, cols) = first.dim();

        for band in &bands[1..] {
            let (ar, ac) = band.dim();
            if (ar, ac) != (rows, cols) {
                return Err(Error::SizeMismatch {
                    er: rows,
                    ec: cols,
                    ar,
                    ac,
                });
            }
        }

        let (mr, mc) = mask.dim();
        if (mr, mc) != (rows, cols) {
            return Err(Error::SizeMismatch {
                er: rows,
                ec: cols,
                ar: mr,
                ac: mc,
            });
        }

        if band_names.len() != bands.len() {
            return Err(Error::BandNameCount {
                names: band_names.len(),
                bands: bands.len(),
            });
        }

        Ok(Self {
            bands,
            band_names,
            mask,
            crs: None,
            bounds: None,
            assets: Vec::new(),
            dtype: PixelType::Float64,
        })
    }

    /// Create a tile image with generated band names (`b1`, `b2`, ...)
    /// and an all-valid mask.
    pub fn from_bands(bands: Vec<Array2<f64>>) -> Result<Self> {
        let first = bands.first().ok_or(Error::BandCount {
            required: 1,
            provided: 0,
        })?;
        let mask = Array2::from_elem(first.dim(), true);
        let names = (1..=bands.len()).map(|i| format!("b{i}")).collect();
        Self::new(bands, names, mask)
    }

    /// Set the CRS (builder style)
    pub fn with_crs(mut self, crs: Crs) -> Self {
        self.crs = Some(crs);
        self
    }

    /// Set the bounds (builder style)
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Set the asset list (builder style)
    pub fn with_assets(mut self, assets: Vec<String>) -> Self {
        self.assets = assets;
        self
    }

    /// Set the declared storage type (builder style)
    pub fn with_dtype(mut self, dtype: PixelType) -> Self {
        self.dtype = dtype;
        self
    }

    /// Build a single-band output tile carrying this tile's geospatial
    /// metadata. This is how kernels return derived products: new data,
    /// new mask, new name and dtype, same crs/bounds/assets.
    pub fn derive(
        &self,
        data: Array2<f64>,
        mask: Array2<bool>,
        band_name: impl Into<String>,
        dtype: PixelType,
    ) -> Result<Self> {
        let mut out = Self::new(vec![data], vec![band_name.into()], mask)?;
        out.crs = self.crs.clone();
        out.bounds = self.bounds;
        out.assets = self.assets.clone();
        out.dtype = dtype;
        Ok(out)
    }

    // Dimensions

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.bands[0].dim()
    }

    /// Number of pixel rows
    pub fn height(&self) -> usize {
        self.shape().0
    }

    /// Number of pixel columns
    pub fn width(&self) -> usize {
        self.shape().1
    }

    /// Number of bands
    pub fn nbands(&self) -> usize {
        self.bands.len()
    }

    // Data access

    /// Get band `index` (checked)
    pub fn band(&self, index: usize) -> Result<&Array2<f64>> {
        self.bands.get(index).ok_or(Error::BandIndexOutOfBounds {
            index,
            nbands: self.bands.len(),
        })
    }

    /// All bands in order
    pub fn bands(&self) -> &[Array2<f64>] {
        &self.bands
    }

    /// Band names in band order
    pub fn band_names(&self) -> &[String] {
        &self.band_names
    }

    /// Validity mask
    pub fn mask(&self) -> &Array2<bool> {
        &self.mask
    }

    /// Number of valid pixels
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&v| v).count()
    }

    // Metadata

    /// Coordinate reference system
    pub fn crs(&self) -> Option<&Crs> {
        self.crs.as_ref()
    }

    /// Spatial bounding box
    pub fn bounds(&self) -> Option<&BoundingBox> {
        self.bounds.as_ref()
    }

    /// Source asset identifiers
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// Declared storage type
    pub fn dtype(&self) -> PixelType {
        self.dtype
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(rows: usize, cols: usize, value: f64) -> Array2<f64> {
        Array2::from_elem((rows, cols), value)
    }

    #[test]
    fn test_construction() {
        let img = TileImage::from_bands(vec![band(4, 6, 1.0), band(4, 6, 2.0)]).unwrap();
        assert_eq!(img.shape(), (4, 6));
        assert_eq!(img.nbands(), 2);
        assert_eq!(img.band_names(), &["b1".to_string(), "b2".to_string()]);
        assert_eq!(img.valid_count(), 24);
        assert_eq!(img.dtype(), PixelType::Float64);
    }

    #[test]
    fn test_band_shape_mismatch() {
        let result = TileImage::from_bands(vec![band(4, 4, 1.0), band(4, 5, 2.0)]);
        assert!(matches!(result, Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn test_mask_shape_mismatch() {
        let mask = Array2::from_elem((3, 3), true);
        let result = TileImage::new(vec![band(4, 4, 1.0)], vec!["b1".into()], mask);
        assert!(matches!(result, Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn test_band_name_count_mismatch() {
        let mask = Array2::from_elem((2, 2), true);
        let result = TileImage::new(vec![band(2, 2, 1.0)], vec![], mask);
        assert!(matches!(result, Err(Error::BandNameCount { .. })));
    }

    #[test]
    fn test_empty_tile_rejected() {
        assert!(TileImage::from_bands(vec![]).is_err());
    }

    #[test]
    fn test_checked_band_access() {
        let img = TileImage::from_bands(vec![band(2, 2, 1.0)]).unwrap();
        assert!(img.band(0).is_ok());
        assert!(matches!(
            img.band(3),
            Err(Error::BandIndexOutOfBounds { index: 3, nbands: 1 })
        ));
    }

    #[test]
    fn test_derive_carries_metadata() {
        let img = TileImage::from_bands(vec![band(2, 2, 5.0)])
            .unwrap()
            .with_crs(Crs::web_mercator())
            .with_bounds(BoundingBox::new(0.0, 0.0, 10.0, 10.0))
            .with_assets(vec!["cog.tif".into()]);

        let out = img
            .derive(
                band(2, 2, 1.0),
                Array2::from_elem((2, 2), true),
                "water",
                PixelType::UInt8,
            )
            .unwrap();

        assert_eq!(out.crs(), Some(&Crs::web_mercator()));
        assert_eq!(out.bounds().unwrap().to_array(), [0.0, 0.0, 10.0, 10.0]);
        assert_eq!(out.assets(), &["cog.tif".to_string()]);
        assert_eq!(out.dtype(), PixelType::UInt8);
        assert_eq!(out.band_names(), &["water".to_string()]);
    }
}
