//! Input handling and per-image processing.

use std::path::{Path, PathBuf};
use symcheck_core::diagnostics::save_analysis_masks;
use symcheck_core::models::{AnalysisResult, AnalyzeOptions};
use symcheck_core::{analyze_image, analyze_image_detailed, decoders};

/// Supported image extensions for batch processing
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "svg",
];

/// Expand a list of inputs (files and directories) into a list of image files.
///
/// Directories are scanned for supported image files. If `recursive` is
/// true, subdirectories are also scanned.
pub fn expand_inputs(inputs: &[PathBuf], recursive: bool) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            collect_images_from_dir(input, recursive, &mut files)?;
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(format!("Path not found: {}", input.display()));
        }
    }

    // Sort for consistent ordering
    files.sort();
    Ok(files)
}

/// Recursively collect image files from a directory.
fn collect_images_from_dir(
    dir: &Path,
    recursive: bool,
    files: &mut Vec<PathBuf>,
) -> Result<(), String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {}: {}", dir.display(), e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Error reading directory entry: {}", e))?;
        let path = entry.path();

        if path.is_dir() && recursive {
            collect_images_from_dir(&path, recursive, files)?;
        } else if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }
    Ok(())
}

/// Decode and audit a single image. When `debug_masks` is set, the
/// diagnostic masks land in a subdirectory named after the file stem.
pub fn process_single_image(
    path: &Path,
    options: &AnalyzeOptions,
    debug_masks: Option<&Path>,
) -> Result<AnalysisResult, String> {
    let pixels = decoders::decode_image(path)?;

    match debug_masks {
        Some(dir) => {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "image".to_string());
            let output = analyze_image_detailed(&pixels, options);
            save_analysis_masks(&pixels, &output, dir.join(stem))?;
            Ok(output.result)
        }
        None => Ok(analyze_image(&pixels, options)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn write_png(path: &Path, color: Rgba<u8>) {
        let img = RgbaImage::from_pixel(8, 8, color);
        img.save(path).unwrap();
    }

    #[test]
    fn test_expand_inputs_scans_directories() {
        let dir = tempdir().unwrap();
        write_png(&dir.path().join("b.png"), Rgba([255, 255, 255, 255]));
        write_png(&dir.path().join("a.png"), Rgba([255, 255, 255, 255]));
        std::fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        write_png(&sub.join("c.png"), Rgba([255, 255, 255, 255]));

        let flat = expand_inputs(&[dir.path().to_path_buf()], false).unwrap();
        assert_eq!(flat.len(), 2);
        assert!(flat[0].ends_with("a.png"), "results must be sorted");

        let deep = expand_inputs(&[dir.path().to_path_buf()], true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_expand_inputs_missing_path() {
        let result = expand_inputs(&[PathBuf::from("/no/such/path")], false);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Path not found"));
    }

    #[test]
    fn test_process_single_image_with_masks() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("glyph.png");

        // White canvas with a black center block
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        for y in 3..7 {
            for x in 3..7 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
            }
        }
        img.save(&path).unwrap();

        let masks_dir = dir.path().join("masks");
        let result =
            process_single_image(&path, &AnalyzeOptions::default(), Some(&masks_dir)).unwrap();

        assert!(result.overall_pass);
        assert!(masks_dir.join("glyph").join("sample_mask.png").exists());
    }

    #[test]
    fn test_process_single_image_decode_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        let result = process_single_image(&path, &AnalyzeOptions::default(), None);
        assert!(result.is_err());
    }
}
