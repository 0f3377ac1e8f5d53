//! Boxplot and histogram figures.

use crate::report::types::{Distribution, Histogram};
use crate::report::utility::quantile;

pub const DEFAULT_BINS: usize = 20;

/// Tukey fence multiplier.
const WHISKER_IQR: f64 = 1.5;

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

/// Five-number summary with whiskers at the most extreme values inside
/// `[q1 − 1.5·IQR, q3 + 1.5·IQR]`. `None` for empty input.
pub fn distribution(values: &[f64]) -> Option<Distribution> {
    let v = sorted(values);
    let (min, max) = (*v.first()?, *v.last()?);
    let q1 = quantile(&v, 0.25)?;
    let median = quantile(&v, 0.5)?;
    let q3 = quantile(&v, 0.75)?;

    let iqr = q3 - q1;
    let (low_fence, high_fence) = (q1 - WHISKER_IQR * iqr, q3 + WHISKER_IQR * iqr);

    // v is sorted, so the first/last values past each fence are the whiskers
    let lower_whisker = v.iter().copied().find(|x| *x >= low_fence).unwrap_or(min);
    let upper_whisker = v.iter().rev().copied().find(|x| *x <= high_fence).unwrap_or(max);
    let outliers = v.iter().filter(|x| **x < low_fence || **x > high_fence).count();

    Some(Distribution {
        min,
        q1,
        median,
        q3,
        max,
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Equal-width histogram over `[min, max]`; the last bin includes `max`.
///
/// All values equal collapse to a single bin. `None` for empty input or zero bins.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    if bins == 0 {
        return None;
    }
    let v = sorted(values);
    let (min, max) = (*v.first()?, *v.last()?);

    if min == max {
        return Some(Histogram {
            edges: vec![min, max],
            counts: vec![v.len()],
        });
    }

    let width = (max - min) / bins as f64;
    let edges = (0..=bins)
        .map(|i| if i == bins { max } else { min + width * i as f64 })
        .collect();

    let mut counts = vec![0; bins];
    for x in &v {
        let idx = (((x - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Some(Histogram { edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_without_outliers() {
        let d = distribution(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_eq!(d.min, 1.0);
        assert_eq!(d.q1, 2.0);
        assert_eq!(d.median, 3.0);
        assert_eq!(d.q3, 4.0);
        assert_eq!(d.max, 5.0);
        assert_eq!(d.lower_whisker, 1.0);
        assert_eq!(d.upper_whisker, 5.0);
        assert_eq!(d.outliers, 0);
    }

    #[test]
    fn test_distribution_flags_outlier() {
        let d = distribution(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(d.outliers, 1);
        assert_eq!(d.upper_whisker, 5.0);
        assert_eq!(d.max, 100.0);
    }

    #[test]
    fn test_distribution_empty() {
        assert!(distribution(&[]).is_none());
    }

    #[test]
    fn test_histogram_counts_all_values() {
        let values = [0.0, 1.0, 2.0, 3.0, 4.0, 10.0];
        let h = histogram(&values, 5).unwrap();

        assert_eq!(h.edges.len(), 6);
        assert_eq!(h.edges[0], 0.0);
        assert_eq!(h.edges[5], 10.0);
        assert_eq!(h.counts, vec![2, 2, 1, 0, 1]);
        assert_eq!(h.counts.iter().sum::<usize>(), values.len());
    }

    #[test]
    fn test_histogram_constant_values() {
        let h = histogram(&[7.0, 7.0, 7.0], DEFAULT_BINS).unwrap();
        assert_eq!(h.counts, vec![3]);
        assert_eq!(h.edges, vec![7.0, 7.0]);
    }

    #[test]
    fn test_histogram_degenerate_inputs() {
        assert!(histogram(&[], 10).is_none());
        assert!(histogram(&[1.0, 2.0], 0).is_none());
    }
}
