//! Sample-mask construction
//!
//! Derives the set of foreground pixels that actually get scored,
//! according to the configured sampling mode.

use crate::color::relative_luminance;
use crate::mask::Mask;
use crate::models::{AnalyzeOptions, PixelBuffer, SampleMode};
use crate::segment::{Segmentation, SegmentationTier};

/// Build the sample mask over the foreground.
///
/// Band keeps foreground pixels with background within `band_radius`
/// (Chebyshev); All keeps every foreground pixel; Stroke is Band
/// restricted to pixels whose own luminance is at most
/// `stroke_luminance_max`. All modes drop pixels below `minimum_alpha`.
///
/// When segmentation abstained there is no foreground/background split
/// to work from, and the sample mask degrades to a fixed border band of
/// thickness `band_radius`, independent of the sampling mode.
pub fn build_sample_mask(
    pixels: &PixelBuffer,
    segmentation: &Segmentation,
    options: &AnalyzeOptions,
) -> Mask {
    let width = pixels.width as usize;
    let height = pixels.height as usize;

    if segmentation.tier == SegmentationTier::Abstained {
        return border_band(width, height, options.band_radius);
    }

    let background = &segmentation.mask;
    let mut sample = Mask::new(width, height);

    for y in 0..height {
        for x in 0..width {
            if background.get(x, y) {
                continue;
            }
            let rgba = pixels.rgba(x, y);
            if rgba[3] < options.minimum_alpha {
                continue;
            }

            let include = match options.sample_mode {
                SampleMode::All => true,
                SampleMode::Band => background.any_in_neighborhood(x, y, options.band_radius),
                SampleMode::Stroke => {
                    background.any_in_neighborhood(x, y, options.band_radius)
                        && relative_luminance([rgba[0], rgba[1], rgba[2]])
                            <= options.stroke_luminance_max
                }
            };
            if include {
                sample.set(x, y, true);
            }
        }
    }

    sample
}

/// Last-resort approximation of "near the outer boundary": all pixels
/// within `radius` of any grid edge.
fn border_band(width: usize, height: usize, radius: usize) -> Mask {
    let mut mask = Mask::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if x < radius || y < radius || x >= width - radius || y >= height - radius {
                mask.set(x, y, true);
            }
        }
    }
    mask
}
