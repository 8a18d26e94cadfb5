//! Analysis pipeline
//!
//! Orchestrates segmentation, sample-mask construction, per-background
//! contrast evaluation, and aggregation into one result. The pipeline
//! is purely functional: identical pixel bytes and options always
//! produce identical output.

use crate::color::{composite_over, contrast_ratio_from_luminance, relative_luminance};
use crate::mask::Mask;
use crate::models::{
    AnalysisResult, AnalyzeOptions, BackgroundOutcome, BackgroundSpec, PixelBuffer, RatioSample,
};
use crate::sample::build_sample_mask;
use crate::segment::segment;
use crate::stats::{combine_verdicts, summarize};

/// An analysis result together with the masks that produced it, for
/// diagnostic rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutput {
    pub result: AnalysisResult,
    pub background_mask: Mask,
    pub sample_mask: Mask,
    pub failing_mask: Mask,
}

/// Score every sampled pixel against one background color, in
/// row-major order.
///
/// Each pixel is alpha-composited onto the opaque background before
/// its luminance is taken, so translucent edge pixels are judged as
/// they would actually render.
pub fn evaluate_against(
    pixels: &PixelBuffer,
    sample_mask: &Mask,
    background: &BackgroundSpec,
) -> Vec<RatioSample> {
    let background_luminance = relative_luminance(background.rgb);
    let mut samples = Vec::new();

    for y in 0..pixels.height as usize {
        for x in 0..pixels.width as usize {
            if !sample_mask.get(x, y) {
                continue;
            }
            let rgba = pixels.rgba(x, y);
            let composite = composite_over(rgba, background.rgb);
            let luminance = relative_luminance(composite);
            samples.push(RatioSample {
                ratio: contrast_ratio_from_luminance(luminance, background_luminance),
                x: x as u32,
                y: y as u32,
                rgba,
            });
        }
    }

    samples
}

/// Run the full analysis and keep the intermediate masks.
pub fn analyze_image_detailed(pixels: &PixelBuffer, options: &AnalyzeOptions) -> AnalysisOutput {
    let width = pixels.width as usize;
    let height = pixels.height as usize;

    let segmentation = segment(pixels, options);
    let sample_mask = build_sample_mask(pixels, &segmentation, options);

    let background_count = options.evaluation_backgrounds.len();
    let mut outcomes = Vec::with_capacity(background_count);
    let mut fail_counts = vec![0usize; width * height];

    for background in &options.evaluation_backgrounds {
        let samples = evaluate_against(pixels, &sample_mask, background);
        for sample in &samples {
            if sample.ratio < options.contrast_threshold {
                fail_counts[sample.y as usize * width + sample.x as usize] += 1;
            }
        }
        outcomes.push(BackgroundOutcome {
            label: background.label.clone(),
            stats: summarize(&samples, options),
        });
    }

    let passes: Vec<bool> = outcomes.iter().map(|o| o.stats.pass).collect();
    let overall_pass = combine_verdicts(&passes, options.require_all_backgrounds_to_pass);

    // A sampled pixel is flagged failing when its shortfall would sink
    // the verdict: below threshold against every background under the
    // OR rule, against any background under require-all.
    let needed = if options.require_all_backgrounds_to_pass {
        1
    } else {
        background_count
    };
    let mut failing_mask = Mask::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if sample_mask.get(x, y) && fail_counts[y * width + x] >= needed {
                failing_mask.set(x, y, true);
            }
        }
    }

    AnalysisOutput {
        result: AnalysisResult {
            width: pixels.width,
            height: pixels.height,
            background_pixels: segmentation.mask.count(),
            sample_pixels: sample_mask.count(),
            backgrounds: outcomes,
            overall_pass,
        },
        background_mask: segmentation.mask,
        sample_mask,
        failing_mask,
    }
}

/// The sole entry point for callers that only need the verdict and
/// statistics.
pub fn analyze_image(pixels: &PixelBuffer, options: &AnalyzeOptions) -> AnalysisResult {
    analyze_image_detailed(pixels, options).result
}
