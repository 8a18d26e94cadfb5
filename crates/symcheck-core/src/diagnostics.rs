//! Diagnostic mask output
//!
//! Saves the analysis masks as PNGs so a failing verdict can be traced
//! back to the pixels that caused it.

use crate::analyze::AnalysisOutput;
use crate::mask::Mask;
use crate::models::PixelBuffer;
use std::path::Path;

/// Save a mask as a grayscale PNG (white = set).
pub fn save_mask_png<P: AsRef<Path>>(mask: &Mask, path: P) -> Result<(), String> {
    let img = image::GrayImage::from_fn(mask.width() as u32, mask.height() as u32, |x, y| {
        if mask.get(x as usize, y as usize) {
            image::Luma([255u8])
        } else {
            image::Luma([0u8])
        }
    });
    img.save(path.as_ref())
        .map_err(|e| format!("Failed to write {}: {}", path.as_ref().display(), e))
}

/// Save the artwork dimmed to half brightness with failing pixels
/// painted solid red.
pub fn save_failing_overlay<P: AsRef<Path>>(
    pixels: &PixelBuffer,
    failing: &Mask,
    path: P,
) -> Result<(), String> {
    let img = image::RgbaImage::from_fn(pixels.width, pixels.height, |x, y| {
        if failing.get(x as usize, y as usize) {
            image::Rgba([255, 0, 0, 255])
        } else {
            let [r, g, b, a] = pixels.rgba(x as usize, y as usize);
            image::Rgba([r / 2, g / 2, b / 2, a])
        }
    });
    img.save(path.as_ref())
        .map_err(|e| format!("Failed to write {}: {}", path.as_ref().display(), e))
}

/// Save all diagnostic visualizations for one analysis.
pub fn save_analysis_masks<P: AsRef<Path>>(
    pixels: &PixelBuffer,
    output: &AnalysisOutput,
    output_dir: P,
) -> Result<(), String> {
    let output_dir = output_dir.as_ref();
    std::fs::create_dir_all(output_dir)
        .map_err(|e| format!("Failed to create {}: {}", output_dir.display(), e))?;

    save_mask_png(&output.background_mask, output_dir.join("background_mask.png"))?;
    save_mask_png(&output.sample_mask, output_dir.join("sample_mask.png"))?;
    save_mask_png(&output.failing_mask, output_dir.join("failing_mask.png"))?;
    save_failing_overlay(
        pixels,
        &output.failing_mask,
        output_dir.join("failing_overlay.png"),
    )?;

    crate::verbose_println!("Diagnostic masks saved to {}", output_dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::analyze_image_detailed;
    use crate::models::AnalyzeOptions;
    use tempfile::tempdir;

    fn checkerboard(width: u32, height: u32) -> PixelBuffer {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height as usize {
            for x in 0..width as usize {
                if (x + y) % 2 == 0 {
                    data.extend_from_slice(&[255, 255, 255, 255]);
                } else {
                    data.extend_from_slice(&[0, 0, 0, 255]);
                }
            }
        }
        PixelBuffer::from_rgba8(width, height, data).unwrap()
    }

    #[test]
    fn test_save_mask_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mask.png");

        let mut mask = Mask::new(4, 4);
        mask.set(1, 2, true);
        save_mask_png(&mask, &path).unwrap();

        let img = image::open(&path).unwrap().to_luma8();
        assert_eq!(img.dimensions(), (4, 4));
        assert_eq!(img.get_pixel(1, 2).0, [255]);
        assert_eq!(img.get_pixel(0, 0).0, [0]);
    }

    #[test]
    fn test_save_analysis_masks_writes_all_files() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("masks");

        let pixels = checkerboard(8, 8);
        let output = analyze_image_detailed(&pixels, &AnalyzeOptions::default());
        save_analysis_masks(&pixels, &output, &out).unwrap();

        for name in [
            "background_mask.png",
            "sample_mask.png",
            "failing_mask.png",
            "failing_overlay.png",
        ] {
            assert!(out.join(name).exists(), "{} should exist", name);
        }
    }
}
