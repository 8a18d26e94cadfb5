//! Data models for symcheck
//!
//! Core data structures for pixel buffers, background specifications,
//! analysis options, and analysis results.

use serde::{Deserialize, Serialize};

/// A decoded RGBA8 pixel buffer (unassociated alpha, top-left origin).
///
/// Owned by the decoder; the analysis core only borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Interleaved RGBA bytes, row-major, 4 bytes per pixel
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap raw RGBA bytes, validating dimensions against the data length.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("Image has zero dimension: {}x{}", width, height));
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(format!(
                "Pixel data length {} does not match {}x{} RGBA ({} bytes expected)",
                data.len(),
                width,
                height,
                expected
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// RGBA channels of the pixel at (x, y).
    #[inline]
    pub fn rgba(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width as usize + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// RGB channels of the pixel at (x, y), alpha dropped.
    #[inline]
    pub fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width as usize + x) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}

/// A candidate background: display label plus an opaque RGB color.
///
/// Used both as the segmentation reference color and as an evaluation
/// target the artwork is scored against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundSpec {
    /// Display label (e.g., "white", "#336699")
    pub label: String,

    /// Opaque RGB color
    pub rgb: [u8; 3],
}

impl BackgroundSpec {
    pub fn new(label: impl Into<String>, rgb: [u8; 3]) -> Self {
        Self {
            label: label.into(),
            rgb,
        }
    }

    pub fn white() -> Self {
        Self::new("white", [255, 255, 255])
    }

    pub fn black() -> Self {
        Self::new("black", [0, 0, 0])
    }
}

/// Which foreground pixels get scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SampleMode {
    /// Silhouette-adjacent pixels: foreground within `band_radius` of
    /// the background mask (default)
    #[default]
    Band,

    /// Every foreground pixel
    All,

    /// Edge band restricted to dark pixels (own luminance at most
    /// `stroke_luminance_max`)
    Stroke,
}

/// Options for one contrast analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzeOptions {
    /// Euclidean RGB distance below which a pixel counts as
    /// background-like during segmentation
    pub near_bg_distance: f64,

    /// Pixels with alpha at or below this are always background-like
    pub alpha_background_cutoff: u8,

    /// Chebyshev radius of the edge band
    pub band_radius: usize,

    /// Reference color for the near-background predicate
    pub segmentation_background: BackgroundSpec,

    /// Colors the artwork is tested against (at least one)
    pub evaluation_backgrounds: Vec<BackgroundSpec>,

    /// Minimum acceptable contrast ratio
    pub contrast_threshold: f64,

    /// Maximum tolerated percentage of sampled pixels below the threshold
    pub max_percent_below_threshold: f64,

    /// Percentile fraction (0-1) used as the primary pass metric
    pub percentile: f64,

    /// Pixels below this alpha are excluded from sampling entirely
    pub minimum_alpha: u8,

    /// Sample-mask construction mode
    pub sample_mode: SampleMode,

    /// Luminance ceiling for Stroke mode (0-1)
    pub stroke_luminance_max: f64,

    /// Combine per-background verdicts with AND instead of OR
    pub require_all_backgrounds_to_pass: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            near_bg_distance: default_near_bg_distance(),
            alpha_background_cutoff: default_alpha_background_cutoff(),
            band_radius: default_band_radius(),
            segmentation_background: BackgroundSpec::white(),
            evaluation_backgrounds: vec![BackgroundSpec::white(), BackgroundSpec::black()],
            contrast_threshold: default_contrast_threshold(),
            max_percent_below_threshold: default_max_percent_below_threshold(),
            percentile: default_percentile(),
            minimum_alpha: 0,
            sample_mode: SampleMode::Band,
            stroke_luminance_max: default_stroke_luminance_max(),
            require_all_backgrounds_to_pass: false,
        }
    }
}

// Default value functions for serde
pub(crate) fn default_near_bg_distance() -> f64 {
    160.0
}

pub(crate) fn default_alpha_background_cutoff() -> u8 {
    10
}

pub(crate) fn default_band_radius() -> usize {
    2
}

pub(crate) fn default_contrast_threshold() -> f64 {
    3.0
}

pub(crate) fn default_max_percent_below_threshold() -> f64 {
    2.0
}

pub(crate) fn default_percentile() -> f64 {
    0.05
}

pub(crate) fn default_stroke_luminance_max() -> f64 {
    0.3
}

impl AnalyzeOptions {
    /// Reject out-of-range option values before any image is touched.
    pub fn validate(&self) -> Result<(), String> {
        if !self.near_bg_distance.is_finite() || self.near_bg_distance < 0.0 {
            return Err(format!(
                "near-background distance must be >= 0, got {}",
                self.near_bg_distance
            ));
        }
        if !self.contrast_threshold.is_finite() || self.contrast_threshold <= 0.0 {
            return Err(format!(
                "contrast threshold must be > 0, got {}",
                self.contrast_threshold
            ));
        }
        if !(0.0..=100.0).contains(&self.max_percent_below_threshold) {
            return Err(format!(
                "max percent below threshold must be in 0-100, got {}",
                self.max_percent_below_threshold
            ));
        }
        if !(0.0..=1.0).contains(&self.percentile) {
            return Err(format!(
                "percentile must be in 0.0-1.0, got {}",
                self.percentile
            ));
        }
        if !(0.0..=1.0).contains(&self.stroke_luminance_max) {
            return Err(format!(
                "stroke luminance ceiling must be in 0.0-1.0, got {}",
                self.stroke_luminance_max
            ));
        }
        if self.evaluation_backgrounds.is_empty() {
            return Err("At least one evaluation background is required".to_string());
        }
        Ok(())
    }
}

/// One scored pixel: its contrast ratio plus enough provenance to
/// point at it in diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSample {
    /// WCAG contrast ratio, in [1, 21]
    pub ratio: f64,

    /// Pixel x coordinate
    pub x: u32,

    /// Pixel y coordinate
    pub y: u32,

    /// Raw RGBA of the originating pixel
    pub rgba: [u8; 4],
}

/// Summary statistics for one evaluation background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundStats {
    /// Number of sampled pixels scored against this background
    pub count: usize,

    /// Lowest ratio (0.0 when count is zero)
    pub min: f64,

    /// Interpolated ratio at the configured percentile
    pub percentile: f64,

    /// Median ratio
    pub median: f64,

    /// Percentage of ratios strictly below the threshold
    pub percent_below_threshold: f64,

    /// Whether this background satisfies the pass rule.
    /// Always false when count is zero.
    pub pass: bool,

    /// Worst (lowest-ratio) sample, row-major first occurrence on ties
    pub worst: Option<RatioSample>,
}

/// Stats for one background, keyed by its display label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundOutcome {
    pub label: String,
    pub stats: BackgroundStats,
}

/// Complete result of one image analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// Pixels classified as background
    pub background_pixels: usize,

    /// Pixels selected for scoring
    pub sample_pixels: usize,

    /// Per-background statistics, in evaluation order
    pub backgrounds: Vec<BackgroundOutcome>,

    /// Combined verdict across all evaluation backgrounds
    pub overall_pass: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_buffer_rejects_zero_dimensions() {
        assert!(PixelBuffer::from_rgba8(0, 5, vec![]).is_err());
        assert!(PixelBuffer::from_rgba8(5, 0, vec![]).is_err());
    }

    #[test]
    fn test_pixel_buffer_rejects_bad_length() {
        let result = PixelBuffer::from_rgba8(2, 2, vec![0u8; 15]);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("16 bytes expected"));
    }

    #[test]
    fn test_pixel_buffer_accessors() {
        let mut data = vec![0u8; 2 * 2 * 4];
        // pixel (1, 0) = (10, 20, 30, 40)
        data[4..8].copy_from_slice(&[10, 20, 30, 40]);
        let buf = PixelBuffer::from_rgba8(2, 2, data).unwrap();
        assert_eq!(buf.rgba(1, 0), [10, 20, 30, 40]);
        assert_eq!(buf.rgb(1, 0), [10, 20, 30]);
        assert_eq!(buf.rgba(0, 1), [0, 0, 0, 0]);
    }

    #[test]
    fn test_default_options() {
        let opts = AnalyzeOptions::default();
        assert_eq!(opts.near_bg_distance, 160.0);
        assert_eq!(opts.band_radius, 2);
        assert_eq!(opts.contrast_threshold, 3.0);
        assert_eq!(opts.max_percent_below_threshold, 2.0);
        assert_eq!(opts.percentile, 0.05);
        assert_eq!(opts.alpha_background_cutoff, 10);
        assert_eq!(opts.sample_mode, SampleMode::Band);
        assert!(!opts.require_all_backgrounds_to_pass);
        assert_eq!(opts.evaluation_backgrounds.len(), 2);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ranges() {
        let mut opts = AnalyzeOptions {
            percentile: 1.5,
            ..Default::default()
        };
        assert!(opts.validate().is_err());

        opts.percentile = 0.05;
        opts.contrast_threshold = 0.0;
        assert!(opts.validate().is_err());

        opts.contrast_threshold = 3.0;
        opts.evaluation_backgrounds.clear();
        assert!(opts.validate().is_err());
    }
}
