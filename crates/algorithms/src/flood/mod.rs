//! Flood detection via MNDWI and Otsu thresholding
//!
//! Computes the Modified Normalized Difference Water Index from a
//! green/SWIR band pair and classifies surface water by automatic
//! histogram thresholding (credit for the approach in the original
//! service: Sashka Warner).

mod otsu;

use std::sync::OnceLock;

use ndarray::Array2;
use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

use tilemath_core::{
    AlgorithmMetadata, BandRole, Error, PixelType, Result, TileAlgorithm, TileImage,
};

pub use otsu::otsu_threshold;

/// Parameters for flood detection. The kernel is fully automatic, so
/// there are none; the empty struct keeps the registry plumbing uniform.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FloodDetectionParams {}

/// MNDWI + Otsu flood detection kernel
#[derive(Debug, Clone, Default)]
pub struct FloodDetection {
    _params: FloodDetectionParams,
}

impl FloodDetection {
    pub fn new(params: FloodDetectionParams) -> Result<Self> {
        Ok(Self { _params: params })
    }

    /// Static descriptor for this algorithm
    pub fn descriptor() -> AlgorithmMetadata {
        AlgorithmMetadata {
            title: "Flood detection",
            description: "Calculate the Modified Normalized Difference Water Index (MNDWI) \
                          and apply Otsu thresholding to identify surface water",
            input_nbands: 2,
            input_bands: vec![
                BandRole {
                    title: "Green band",
                    description: "The green band with the wavelength between 0.53µm - 0.59µm",
                    required: true,
                },
                BandRole {
                    title: "Short wave infrared band",
                    description: "The SWIR band with wavelength between 0.9µm - 1.7µm",
                    required: true,
                },
            ],
            input_description: "The bands that will be used to make this calculation",
            output_nbands: 1,
            output_dtype: PixelType::UInt8,
            output_min: vec![-1.0],
            output_max: vec![1.0],
            output_description: "1 where the MNDWI is at or above the Otsu threshold",
            output_colormap_name: Some("viridis"),
            output_unit: None,
        }
    }
}

/// Modified Normalized Difference Water Index:
/// `(green - swir) / (green + swir)`, defined as 0 where the
/// denominator is exactly 0.
pub fn mndwi(green: &Array2<f64>, swir: &Array2<f64>) -> Result<Array2<f64>> {
    let (rows, cols) = green.dim();
    if swir.dim() != (rows, cols) {
        return Err(Error::SizeMismatch {
            er: rows,
            ec: cols,
            ar: swir.dim().0,
            ac: swir.dim().1,
        });
    }

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = Vec::with_capacity(cols);
            for col in 0..cols {
                let g = green[[row, col]];
                let s = swir[[row, col]];
                let denom = g + s;
                row_data.push(if denom == 0.0 { 0.0 } else { (g - s) / denom });
            }
            row_data
        })
        .collect();

    Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))
}

impl TileAlgorithm for FloodDetection {
    fn metadata(&self) -> &AlgorithmMetadata {
        static METADATA: OnceLock<AlgorithmMetadata> = OnceLock::new();
        METADATA.get_or_init(Self::descriptor)
    }

    fn apply(&self, img: &TileImage) -> Result<TileImage> {
        if img.nbands() < 2 {
            return Err(Error::BandCount {
                required: 2,
                provided: img.nbands(),
            });
        }

        let green = img.band(0)?;
        let swir = img.band(1)?;
        let mask = img.mask();

        let index = mndwi(green, swir)?;

        // Threshold over the valid pixels only; a constant or fully
        // masked tile has no meaningful split and classifies as no water
        let valid_values: Vec<f64> = index
            .iter()
            .zip(mask.iter())
            .filter(|(_, &ok)| ok)
            .map(|(&v, _)| v)
            .collect();

        let classified = match otsu_threshold(&valid_values) {
            Some(t) => {
                debug!(threshold = t, pixels = valid_values.len(), "otsu threshold selected");
                index.mapv(|v| if v >= t { 1.0 } else { 0.0 })
            }
            None => {
                debug!(pixels = valid_values.len(), "degenerate mndwi, all-zero fallback");
                Array2::zeros(index.dim())
            }
        };

        // Input mask passes through unchanged
        img.derive(classified, mask.clone(), "water", PixelType::UInt8)
    }
}
