//! Runtime configuration
//!
//! Global verbose flag and the optional `symcheck.yml` defaults file.
//! The file is loaded lazily once per process; out-of-range values are
//! clamped with warnings rather than rejected, since the file supplies
//! defaults rather than an explicit request.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

// Global verbose flag for controlling debug output
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set the global verbose flag. When true, debug messages will be printed.
pub fn set_verbose(verbose: bool) {
    VERBOSE.store(verbose, Ordering::SeqCst);
}

/// Check if verbose mode is enabled.
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

/// Print a message to stderr only if verbose mode is enabled.
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if $crate::config::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Canonical list of candidate defaults file names searched on disk.
const CONFIG_FILENAMES: &[&str] = &["symcheck.yml", "symcheck.yaml"];

/// Tunable defaults that a `symcheck.yml` may override.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalyzerDefaults {
    /// Euclidean RGB distance for the near-background predicate
    pub near_bg_distance: f64,

    /// Chebyshev radius of the edge band
    pub band_radius: usize,

    /// Minimum acceptable contrast ratio
    pub contrast_threshold: f64,

    /// Maximum tolerated percentage of ratios below the threshold
    pub max_percent_below_threshold: f64,

    /// Percentile fraction used as the primary pass metric
    pub percentile: f64,

    /// Alpha at or below which a pixel is always background-like
    pub alpha_background_cutoff: u8,

    /// Alpha below which a pixel is never sampled
    pub minimum_alpha: u8,

    /// Luminance ceiling for stroke-mode sampling
    pub stroke_luminance_max: f64,

    /// Combine verdicts with AND instead of OR
    pub require_all_backgrounds_to_pass: bool,

    /// Candidate background colors, as `parse_color` strings
    pub backgrounds: Vec<String>,

    /// Segmentation reference color; defaults to white when unset
    pub segmentation_background: Option<String>,
}

impl Default for AnalyzerDefaults {
    fn default() -> Self {
        Self {
            near_bg_distance: crate::models::default_near_bg_distance(),
            band_radius: crate::models::default_band_radius(),
            contrast_threshold: crate::models::default_contrast_threshold(),
            max_percent_below_threshold: crate::models::default_max_percent_below_threshold(),
            percentile: crate::models::default_percentile(),
            alpha_background_cutoff: crate::models::default_alpha_background_cutoff(),
            minimum_alpha: 0,
            stroke_luminance_max: crate::models::default_stroke_luminance_max(),
            require_all_backgrounds_to_pass: false,
            backgrounds: vec!["white".to_string(), "black".to_string()],
            segmentation_background: None,
        }
    }
}

impl AnalyzerDefaults {
    /// Clamp out-of-range values, reporting each adjustment.
    pub(crate) fn sanitize(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self.near_bg_distance.is_finite() || self.near_bg_distance < 0.0 {
            warnings.push(format!(
                "near_bg_distance {} is invalid, using {}",
                self.near_bg_distance,
                crate::models::default_near_bg_distance()
            ));
            self.near_bg_distance = crate::models::default_near_bg_distance();
        }
        if !self.contrast_threshold.is_finite() || self.contrast_threshold <= 0.0 {
            warnings.push(format!(
                "contrast_threshold {} is invalid, using {}",
                self.contrast_threshold,
                crate::models::default_contrast_threshold()
            ));
            self.contrast_threshold = crate::models::default_contrast_threshold();
        }
        if !(0.0..=100.0).contains(&self.max_percent_below_threshold) {
            let clamped = self.max_percent_below_threshold.clamp(0.0, 100.0);
            warnings.push(format!(
                "max_percent_below_threshold {} clamped to {}",
                self.max_percent_below_threshold, clamped
            ));
            self.max_percent_below_threshold = clamped;
        }
        if !(0.0..=1.0).contains(&self.percentile) {
            let clamped = self.percentile.clamp(0.0, 1.0);
            warnings.push(format!(
                "percentile {} clamped to {}",
                self.percentile, clamped
            ));
            self.percentile = clamped;
        }
        if !(0.0..=1.0).contains(&self.stroke_luminance_max) {
            let clamped = self.stroke_luminance_max.clamp(0.0, 1.0);
            warnings.push(format!(
                "stroke_luminance_max {} clamped to {}",
                self.stroke_luminance_max, clamped
            ));
            self.stroke_luminance_max = clamped;
        }
        if self.backgrounds.is_empty() {
            warnings.push("backgrounds list is empty, using white and black".to_string());
            self.backgrounds = vec!["white".to_string(), "black".to_string()];
        }

        warnings
    }
}

/// Defaults file wrapper; mirrors the on-disk structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct DefaultsFile {
    defaults: AnalyzerDefaults,
}

/// Loaded defaults plus their source path and any sanitization warnings.
#[derive(Debug, Clone)]
pub struct DefaultsHandle {
    pub defaults: AnalyzerDefaults,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Load defaults from disk, optionally forcing a specific path.
/// A missing file is not an error; a malformed one is reported as a
/// warning and the built-in defaults apply.
pub fn load_defaults(custom_path: Option<&Path>) -> DefaultsHandle {
    let mut warnings = Vec::new();

    let candidates: Vec<PathBuf> = match custom_path {
        Some(path) => vec![path.to_path_buf()],
        None => CONFIG_FILENAMES.iter().map(PathBuf::from).collect(),
    };

    for candidate in candidates {
        if !candidate.is_file() {
            if custom_path.is_some() {
                warnings.push(format!(
                    "Defaults file not found: {}",
                    candidate.display()
                ));
            }
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<DefaultsFile>(&contents) {
                Ok(file) => {
                    let mut defaults = file.defaults;
                    warnings.extend(defaults.sanitize());
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return DefaultsHandle {
                        defaults,
                        source: Some(source),
                        warnings,
                    };
                }
                Err(e) => {
                    warnings.push(format!(
                        "Failed to parse {}: {}",
                        candidate.display(),
                        e
                    ));
                }
            },
            Err(e) => {
                warnings.push(format!("Failed to read {}: {}", candidate.display(), e));
            }
        }
    }

    DefaultsHandle {
        defaults: AnalyzerDefaults::default(),
        source: None,
        warnings,
    }
}

static DEFAULTS: OnceLock<DefaultsHandle> = OnceLock::new();

/// Process-wide defaults, loaded lazily on first use.
pub fn defaults() -> &'static DefaultsHandle {
    DEFAULTS.get_or_init(|| load_defaults(None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_falls_back_to_builtin() {
        let dir = tempdir().unwrap();
        let handle = load_defaults(Some(&dir.path().join("nope.yml")));

        assert!(handle.source.is_none());
        assert_eq!(handle.defaults.near_bg_distance, 160.0);
        assert_eq!(handle.warnings.len(), 1);
    }

    #[test]
    fn test_loads_overrides_from_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("symcheck.yml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "defaults:\n  contrast_threshold: 4.5\n  backgrounds:\n    - \"#336699\"\n    - white"
        )
        .unwrap();

        let handle = load_defaults(Some(&path));
        assert!(handle.source.is_some());
        assert_eq!(handle.defaults.contrast_threshold, 4.5);
        assert_eq!(handle.defaults.backgrounds.len(), 2);
        // Untouched fields keep built-in defaults
        assert_eq!(handle.defaults.band_radius, 2);
        assert!(handle.warnings.is_empty());
    }

    #[test]
    fn test_sanitize_clamps_with_warnings() {
        let mut defaults = AnalyzerDefaults {
            percentile: 3.0,
            max_percent_below_threshold: -5.0,
            ..Default::default()
        };
        let warnings = defaults.sanitize();

        assert_eq!(defaults.percentile, 1.0);
        assert_eq!(defaults.max_percent_below_threshold, 0.0);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_malformed_yaml_warns_and_uses_builtin() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("symcheck.yml");
        std::fs::write(&path, "defaults: [not, a, mapping]").unwrap();

        let handle = load_defaults(Some(&path));
        assert!(handle.source.is_none());
        assert_eq!(handle.defaults.contrast_threshold, 3.0);
        assert!(!handle.warnings.is_empty());
    }
}
