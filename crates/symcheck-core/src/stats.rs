//! Ratio aggregation and verdicts
//!
//! Reduces per-pixel contrast ratios into summary statistics and a
//! pass/fail verdict per background, then combines verdicts across
//! backgrounds.

use crate::models::{AnalyzeOptions, BackgroundStats, RatioSample};

/// Interpolated order statistic at fraction `p` of an ascending-sorted
/// slice: linear interpolation between the order statistics at
/// floor((n-1)p) and ceil((n-1)p).
///
/// Panics on an empty slice; callers handle the empty case explicitly.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    let idx = (sorted.len() - 1) as f64 * p;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    let frac = idx - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Summarize the ratios scored against one background.
///
/// An empty sample set never passes: an image with no sampled edge
/// pixels cannot be certified compliant.
pub fn summarize(samples: &[RatioSample], options: &AnalyzeOptions) -> BackgroundStats {
    if samples.is_empty() {
        return BackgroundStats {
            count: 0,
            min: 0.0,
            percentile: 0.0,
            median: 0.0,
            percent_below_threshold: 0.0,
            pass: false,
            worst: None,
        };
    }

    let mut ratios: Vec<f64> = samples.iter().map(|s| s.ratio).collect();
    ratios.sort_by(|a, b| a.total_cmp(b));

    let count = ratios.len();
    let min = ratios[0];
    let at_percentile = percentile(&ratios, options.percentile);
    let median = percentile(&ratios, 0.5);

    let below = ratios
        .iter()
        .filter(|&&r| r < options.contrast_threshold)
        .count();
    let percent_below = 100.0 * below as f64 / count as f64;

    // Samples arrive in row-major order, and only a strictly smaller
    // ratio replaces the current worst, so ties resolve to the first
    // occurrence in scan order regardless of how the masks were built.
    let mut worst = &samples[0];
    for sample in &samples[1..] {
        if sample.ratio < worst.ratio {
            worst = sample;
        }
    }

    let pass = at_percentile >= options.contrast_threshold
        && percent_below <= options.max_percent_below_threshold;

    BackgroundStats {
        count,
        min,
        percentile: at_percentile,
        median,
        percent_below_threshold: percent_below,
        pass,
        worst: Some(worst.clone()),
    }
}

/// Combine per-background verdicts: AND when every background must be
/// satisfied, OR (the default) when clearing any one candidate is
/// enough.
pub fn combine_verdicts(passes: &[bool], require_all: bool) -> bool {
    if passes.is_empty() {
        return false;
    }
    if require_all {
        passes.iter().all(|&p| p)
    } else {
        passes.iter().any(|&p| p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ratio: f64, x: u32, y: u32) -> RatioSample {
        RatioSample {
            ratio,
            x,
            y,
            rgba: [0, 0, 0, 255],
        }
    }

    // ========================================================================
    // percentile Tests
    // ========================================================================

    #[test]
    fn test_percentile_endpoints() {
        let data = [1.0, 2.0, 5.0, 9.0];
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 1.0), 9.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 3.0];
        assert!((percentile(&data, 0.5) - 2.0).abs() < 1e-12);

        let data = [0.0, 10.0, 20.0, 30.0, 40.0];
        // idx = 4 * 0.3 = 1.2 -> 10 + 0.2 * 10
        assert!((percentile(&data, 0.3) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_percentile_single_element() {
        assert_eq!(percentile(&[7.0], 0.0), 7.0);
        assert_eq!(percentile(&[7.0], 0.5), 7.0);
        assert_eq!(percentile(&[7.0], 1.0), 7.0);
    }

    #[test]
    fn test_percentile_monotonic_in_p() {
        let data = [1.0, 1.5, 2.0, 4.0, 4.5, 8.0, 21.0];
        let mut last = f64::NEG_INFINITY;
        for i in 0..=20 {
            let p = i as f64 / 20.0;
            let v = percentile(&data, p);
            assert!(v >= last);
            last = v;
        }
    }

    // ========================================================================
    // summarize Tests
    // ========================================================================

    #[test]
    fn test_empty_input_never_passes() {
        let stats = summarize(&[], &AnalyzeOptions::default());
        assert_eq!(stats.count, 0);
        assert!(!stats.pass);
        assert!(stats.worst.is_none());
    }

    #[test]
    fn test_uniform_high_ratios_pass() {
        let samples: Vec<RatioSample> = (0..50).map(|i| sample(21.0, i, 0)).collect();
        let stats = summarize(&samples, &AnalyzeOptions::default());

        assert_eq!(stats.count, 50);
        assert_eq!(stats.min, 21.0);
        assert_eq!(stats.median, 21.0);
        assert_eq!(stats.percent_below_threshold, 0.0);
        assert!(stats.pass);
    }

    #[test]
    fn test_all_below_threshold_fails() {
        let samples: Vec<RatioSample> = (0..10).map(|i| sample(2.0, i, 0)).collect();
        let stats = summarize(&samples, &AnalyzeOptions::default());

        assert_eq!(stats.percent_below_threshold, 100.0);
        assert!(!stats.pass);
    }

    #[test]
    fn test_percentile_rule_tolerates_outliers() {
        // 1 outlier in 100 samples: p05 stays above threshold and the
        // 1% below-threshold share is under the default 2% cap
        let mut samples: Vec<RatioSample> = (0..99).map(|i| sample(5.0, i, 0)).collect();
        samples.push(sample(1.2, 99, 0));
        let stats = summarize(&samples, &AnalyzeOptions::default());

        assert!((stats.percent_below_threshold - 1.0).abs() < 1e-9);
        assert!(stats.pass);
        assert_eq!(stats.worst.as_ref().unwrap().x, 99);
    }

    #[test]
    fn test_too_many_below_threshold_fails_despite_percentile() {
        // 4% below threshold exceeds the 2% cap even if the percentile
        // metric clears the bar
        let mut samples: Vec<RatioSample> = (0..96).map(|i| sample(5.0, i, 0)).collect();
        for i in 0..4 {
            samples.push(sample(2.9, 96 + i, 0));
        }
        let opts = AnalyzeOptions {
            percentile: 0.05,
            ..Default::default()
        };
        let stats = summarize(&samples, &opts);

        assert!((stats.percent_below_threshold - 4.0).abs() < 1e-9);
        assert!(!stats.pass);
    }

    #[test]
    fn test_percent_below_monotonic_in_threshold() {
        let samples: Vec<RatioSample> =
            [1.0, 2.0, 3.0, 4.0, 5.0, 21.0]
                .iter()
                .enumerate()
                .map(|(i, &r)| sample(r, i as u32, 0))
                .collect();

        let mut last = -1.0;
        for threshold in [1.0, 1.5, 2.5, 3.0, 4.5, 10.0, 21.0] {
            let opts = AnalyzeOptions {
                contrast_threshold: threshold,
                ..Default::default()
            };
            let stats = summarize(&samples, &opts);
            assert!(stats.percent_below_threshold >= last);
            last = stats.percent_below_threshold;
        }
    }

    #[test]
    fn test_worst_tie_breaks_to_first_in_scan_order() {
        let samples = vec![sample(3.0, 5, 1), sample(1.5, 2, 3), sample(1.5, 9, 0)];
        let stats = summarize(&samples, &AnalyzeOptions::default());
        let worst = stats.worst.unwrap();
        assert_eq!((worst.x, worst.y), (2, 3));
    }

    // ========================================================================
    // combine_verdicts Tests
    // ========================================================================

    #[test]
    fn test_combine_or_passes_on_any() {
        assert!(combine_verdicts(&[true, false], false));
        assert!(!combine_verdicts(&[false, false], false));
    }

    #[test]
    fn test_combine_and_requires_all() {
        assert!(!combine_verdicts(&[true, false], true));
        assert!(combine_verdicts(&[true, true], true));
    }

    #[test]
    fn test_combine_empty_fails() {
        assert!(!combine_verdicts(&[], false));
        assert!(!combine_verdicts(&[], true));
    }
}
