//! Otsu automatic thresholding
//!
//! Histogram-based threshold selection maximizing the between-class
//! variance of a bimodal value distribution. Used by the flood kernel to
//! separate water from non-water MNDWI values without a hand-picked
//! cutoff.

/// Number of histogram bins. Fixed so that identical input always
/// yields the identical threshold.
const BINS: usize = 256;

/// Select the threshold that best splits `values` into two classes.
///
/// Builds a 256-bin histogram over the finite values and returns the
/// lower edge of the first bin of the upper class, i.e. the split `t`
/// maximizing the between-class variance of the populations below and
/// at-or-above `t`. Ties resolve to the lowest candidate threshold.
///
/// Returns `None` when the input has no finite values or all finite
/// values are equal: a constant distribution has no meaningful split,
/// and the caller must apply its documented fallback.
pub fn otsu_threshold(values: &[f64]) -> Option<f64> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut count = 0usize;
    for &v in values {
        if !v.is_finite() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
        count += 1;
    }
    if count == 0 || min == max {
        return None;
    }

    let width = (max - min) / BINS as f64;
    let mut histogram = [0usize; BINS];
    for &v in values {
        if !v.is_finite() {
            continue;
        }
        let bin = (((v - min) / width) as usize).min(BINS - 1);
        histogram[bin] += 1;
    }

    // Bin-center weighted totals for the class means
    let total = count as f64;
    let center = |bin: usize| min + (bin as f64 + 0.5) * width;
    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(bin, &n)| n as f64 * center(bin))
        .sum();

    let mut best_split = 0usize;
    let mut best_variance = f64::NEG_INFINITY;
    let mut below_count = 0.0;
    let mut below_sum = 0.0;

    // Candidate split after bin `t`: bins 0..=t below, the rest above
    for (t, &n) in histogram.iter().enumerate().take(BINS - 1) {
        below_count += n as f64;
        below_sum += n as f64 * center(t);

        let above_count = total - below_count;
        if below_count == 0.0 || above_count == 0.0 {
            continue;
        }

        let mean_below = below_sum / below_count;
        let mean_above = (weighted_total - below_sum) / above_count;
        let variance =
            below_count * above_count * (mean_below - mean_above) * (mean_below - mean_above);

        if variance > best_variance {
            best_variance = variance;
            best_split = t;
        }
    }

    if best_variance.is_finite() {
        Some(min + (best_split as f64 + 1.0) * width)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bimodal_split() {
        let mut values = vec![0.1; 50];
        values.extend(vec![0.9; 50]);
        let t = otsu_threshold(&values).unwrap();
        assert!(t > 0.1 && t <= 0.9, "threshold {t} should separate the modes");
    }

    #[test]
    fn test_constant_input_has_no_threshold() {
        assert_eq!(otsu_threshold(&[0.5; 100]), None);
        assert_eq!(otsu_threshold(&[]), None);
    }

    #[test]
    fn test_nan_values_are_ignored() {
        let mut values = vec![0.0; 20];
        values.extend(vec![1.0; 20]);
        values.push(f64::NAN);
        let t = otsu_threshold(&values).unwrap();
        assert!(t > 0.0 && t <= 1.0);
    }

    #[test]
    fn test_deterministic() {
        let values: Vec<f64> = (0..1000).map(|i| ((i * 37) % 101) as f64 / 100.0).collect();
        let first = otsu_threshold(&values).unwrap();
        for _ in 0..5 {
            assert_eq!(otsu_threshold(&values).unwrap(), first);
        }
    }

    #[test]
    fn test_unbalanced_classes() {
        // A small bright population should still split off
        let mut values = vec![-0.8; 900];
        values.extend(vec![0.7; 100]);
        let t = otsu_threshold(&values).unwrap();
        assert!(t > -0.8 && t <= 0.7);
        assert!(values.iter().filter(|&&v| v >= t).count() == 100);
    }
}
