//! Rapid change assessment, signed percentage variant
//!
//! Instead of a binary flag, this variant reports the signed change as a
//! percentage of each band's own dynamic range: both bands are normalized
//! by their maximum absolute value, differenced, and scaled to
//! [-100, 100]. A
//! narrow dead-zone around zero suppresses sensor noise and is always
//! applied, independent of the `threshold` parameter.
//!
//! Masking semantics deliberately differ from the binary variant: the
//! cloud cutoff is inclusive and the nodata sentinel is compared after
//! integer truncation. The two variants are kept as distinct, separately
//! tested algorithms rather than merged behind extra switches.

use std::sync::OnceLock;

use ndarray::Array2;
use rayon::prelude::*;
use serde::Deserialize;

use tilemath_core::{
    AlgorithmMetadata, BandRole, Error, PixelType, Result, TileAlgorithm, TileImage,
};

/// Parameters for the percentage-difference change assessment
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PercentChangeParams {
    /// Normalized differences with absolute value at or below this are
    /// masked out. Must lie in [0, 1).
    pub threshold: f64,
    /// Half-width of the symmetric dead-zone on the normalized
    /// difference, always applied. Must lie in (0, 1).
    pub epsilon: f64,
    /// Keep only decreases; pixels that increased are masked out
    pub only_negative: bool,
    /// Remove cloud-contaminated pixels using indicator bands 3 and 4
    pub cloud_mask: bool,
    /// A cloud-indicator value at or above this marks the pixel as
    /// contaminated (inclusive). Must lie in [0, 255].
    pub cloud_mask_threshold: i64,
    /// Sentinel marking missing input, compared after truncation to an
    /// integer
    pub nodata: Option<f64>,
}

impl Default for PercentChangeParams {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            epsilon: 0.1,
            only_negative: false,
            cloud_mask: false,
            cloud_mask_threshold: 1,
            nodata: None,
        }
    }
}

impl PercentChangeParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.threshold) {
            return Err(Error::InvalidParameter {
                name: "threshold",
                value: self.threshold.to_string(),
                reason: "must lie in [0, 1)".into(),
            });
        }
        if self.epsilon <= 0.0 || self.epsilon >= 1.0 {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                value: self.epsilon.to_string(),
                reason: "must lie in (0, 1)".into(),
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

/// Percentage-difference change assessment kernel
#[derive(Debug, Clone)]
pub struct PercentChange {
    params: PercentChangeParams,
}

impl PercentChange {
    /// Create the kernel, validating parameter bounds
    pub fn new(params: PercentChangeParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Static descriptor for this variant
    pub fn descriptor() -> AlgorithmMetadata {
        AlgorithmMetadata {
            title: "Rapid Change Assessment Tool (percentage)",
            description: "Signed change between two bands as a percentage of their \
                          normalized range",
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
            output_dtype: PixelType::Int8,
            output_min: vec![-100.0],
            output_max: vec![100.0],
            output_description: "signed change in percent; small changes fall into a \
                                 dead-zone and are masked",
            output_colormap_name: Some("rdbu_r"),
            output_unit: Some("percent"),
        }
    }

    /// Largest absolute value among the valid, finite pixels of a band.
    /// Dividing by it keeps every normalized value in [-1, 1] whatever
    /// the band's sign. `None` when the band has no usable pixel.
    fn band_scale(&self, band: &Array2<f64>, mask: &Array2<bool>) -> Option<f64> {
        let mut max: Option<f64> = None;
        for (value, &ok) in band.iter().zip(mask.iter()) {
            if !ok || !value.is_finite() || self.is_nodata(*value) {
                continue;
            }
            let magnitude = value.abs();
            max = Some(match max {
                Some(m) if m >= magnitude => m,
                _ => magnitude,
            });
        }
        max
    }

    fn is_nodata(&self, value: f64) -> bool {
        match self.params.nodata {
            Some(nd) => value.trunc() == nd.trunc(),
            None => false,
        }
    }
}

impl TileAlgorithm for PercentChange {
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

        let clouds: Vec<&Array2<f64>> = if self.params.cloud_mask {
            (2..img.nbands().min(4))
                .map(|i| img.band(i))
                .collect::<Result<_>>()?
        } else {
            Vec::new()
        };

        // max(|b|) == 0 degrades to an all-zero normalized band, same
        // rule as the zero-denominator case in the ratio formulas
        let before_scale = self.band_scale(before, mask).unwrap_or(0.0);
        let after_scale = self.band_scale(after, mask).unwrap_or(0.0);

        let threshold = self.params.threshold;
        let epsilon = self.params.epsilon;
        let only_negative = self.params.only_negative;
        let cloud_cutoff = self.params.cloud_mask_threshold as f64;

        let (data, valid): (Vec<f64>, Vec<bool>) = (0..rows)
            .into_par_iter()
            .flat_map(|row| {
                let mut out = Vec::with_capacity(cols);
                for col in 0..cols {
                    let b = before[[row, col]];
                    let a = after[[row, col]];

                    let b_norm = if before_scale == 0.0 { 0.0 } else { b / before_scale };
                    let a_norm = if after_scale == 0.0 { 0.0 } else { a / after_scale };
                    let d = a_norm - b_norm;

                    let is_cloud = clouds.iter().any(|c| c[[row, col]] >= cloud_cutoff);
                    let ok = mask[[row, col]]
                        && !self.is_nodata(b)
                        && !self.is_nodata(a)
                        && !is_cloud
                        && d.abs() >= epsilon
                        && d.abs() > threshold
                        && (!only_negative || d < 0.0);

                    // Opposite-sign bands can push |d| past 1; the
                    // declared int8 domain wins over the raw difference
                    let pct = (d * 100.0).round().clamp(-100.0, 100.0);
                    out.push((if ok { pct } else { 0.0 }, ok));
                }
                out
            })
            .unzip();

        let label = if only_negative { "decrease" } else { "changes" };

        let data = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;
        let valid = Array2::from_shape_vec((rows, cols), valid)
            .map_err(|e| Error::Other(e.to_string()))?;

        img.derive(data, valid, label, PixelType::Int8)
    }
}
