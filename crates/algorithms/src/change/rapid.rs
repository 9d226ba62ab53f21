//! Rapid change assessment, binary variant
//!
//! Flags pixels whose value changed significantly between two
//! observations of the same scene, using the relative change ratio
//! `|after - before| / (|after| + |before|)`. Optional cloud-indicator
//! bands and a nodata sentinel remove contaminated pixels from the
//! result.

use std::sync::OnceLock;

use ndarray::Array2;
use rayon::prelude::*;
use serde::Deserialize;

use tilemath_core::{
    AlgorithmMetadata, BandRole, Error, PixelType, Result, TileAlgorithm, TileImage,
};

/// Parameters for the binary rapid change assessment
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RapidChangeParams {
    /// Relative change ratio above which a pixel is flagged.
    /// Must lie in [0, 1).
    pub threshold: f64,
    /// Remove cloud-contaminated pixels using indicator bands 3 and 4
    pub cloud_mask: bool,
    /// A cloud-indicator value strictly greater than this marks the
    /// pixel as contaminated. Must lie in [0, 255].
    pub cloud_mask_threshold: i64,
    /// Sentinel marking missing input in either comparison band,
    /// compared by float equality
    pub nodata: Option<f64>,
}

impl Default for RapidChangeParams {
    fn default() -> Self {
        Self {
            threshold: 0.8,
            cloud_mask: false,
            cloud_mask_threshold: 1,
            nodata: None,
        }
    }
}

impl RapidChangeParams {
    /// Check declared bounds. Out-of-range values fail here, before any
    /// pixel computation; nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(Error::InvalidParameter {
                name: "threshold",
                value: self.threshold.to_string(),
                reason: "must lie in [0, 1)".into(),
            });
        }
        if !(0..=255).contains(&self.cloud_mask_threshold) {
            return Err(Error::InvalidParameter {
                name: "cloud_mask_threshold",
                value: self.cloud_mask_threshold.to_string(),
                reason: "must lie in [0, 255]".into(),
            });
        }
        Ok(())
    }
}

/// Binary rapid change assessment kernel
#[derive(Debug, Clone)]
pub struct RapidChange {
    params: RapidChangeParams,
}

impl RapidChange {
    /// Create the kernel, validating parameter bounds
    pub fn new(params: RapidChangeParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Static descriptor for this variant
    pub fn descriptor() -> AlgorithmMetadata {
        AlgorithmMetadata {
            title: "Rapid Change Assessment Tool",
            description: "Quick assessment to detect changes by comparing two bands",
            input_nbands: 2,
            input_bands: vec![
                BandRole {
                    title: "Before",
                    description: "Observation at the earlier date",
                    required: true,
                },
                BandRole {
                    title: "After",
                    description: "Observation at the later date",
                    required: true,
                },
                BandRole {
                    title: "Cloud indicator (before)",
                    description: "Cloud probability or QA band for the earlier date",
                    required: false,
                },
                BandRole {
                    title: "Cloud indicator (after)",
                    description: "Cloud probability or QA band for the later date",
                    required: false,
                },
            ],
            input_description: "the first two bands are compared; the last two bands, \
                                when present and cloud masking is enabled, mask the result",
            output_nbands: 1,
            output_dtype: PixelType::UInt8,
            output_min: vec![0.0],
            output_max: vec![1.0],
            output_description: "1 where the relative change exceeds the threshold",
            output_colormap_name: None,
            output_unit: None,
        }
    }
}

impl TileAlgorithm for RapidChange {
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

        let (rows, cols) = img.shape();
        let before = img.band(0)?;
        let after = img.band(1)?;
        let mask = img.mask();

        // Cloud indicator bands are optional even when masking is enabled
        let clouds: Vec<&Array2<f64>> = if self.params.cloud_mask {
            (2..img.nbands().min(4))
                .map(|i| img.band(i))
                .collect::<Result<_>>()?
        } else {
            Vec::new()
        };

        let threshold = self.params.threshold;
        let cloud_cutoff = self.params.cloud_mask_threshold as f64;
        let nodata = self.params.nodata;

        let (data, valid): (Vec<f64>, Vec<bool>) = (0..rows)
            .into_par_iter()
            .flat_map(|row| {
                let mut out = Vec::with_capacity(cols);
                for col in 0..cols {
                    let b = before[[row, col]];
                    let a = after[[row, col]];

                    let is_nodata = match nodata {
                        Some(nd) => b == nd || a == nd,
                        None => false,
                    };
                    let is_cloud = clouds.iter().any(|c| c[[row, col]] > cloud_cutoff);
                    let ok = mask[[row, col]] && !is_nodata && !is_cloud;

                    // total == 0 is defined as ratio 0, never a fault
                    let diff = (a - b).abs();
                    let total = a.abs() + b.abs();
                    let ratio = if total == 0.0 { 0.0 } else { diff / total };

                    let flagged = ok && ratio > threshold;
                    out.push((if flagged { 1.0 } else { 0.0 }, ok));
                }
                out
            })
            .unzip();

        let names = img.band_names();
        let label = format!(
            "(abs({after} - {before}) / ({after} + {before})) > {threshold}",
            after = names[1],
            before = names[0],
        );

        let data = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        let valid = Array2::from_shape_vec((rows, cols), valid)
            .map_err(|e| Error::Other(e.to_string()))?;

        img.derive(data, valid, label, PixelType::UInt8)
    }
}
