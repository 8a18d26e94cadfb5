//! Image decoders
//!
//! Raster formats decode through the `image` crate; SVG goes through an
//! external rasterizer resolved once per process.

use crate::models::PixelBuffer;
use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

/// Raster extensions handled directly by the `image` crate.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff"];

/// Decode an image file into an RGBA8 pixel buffer.
pub fn decode_image<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, String> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| format!("No file extension found: {}", path.display()))?;

    match extension.as_str() {
        "svg" => decode_svg(path),
        ext if RASTER_EXTENSIONS.contains(&ext) => decode_raster(path),
        _ => Err(format!("Unsupported file format: {}", extension)),
    }
}

/// Decode a raster file and normalize it to RGBA8.
fn decode_raster(path: &Path) -> Result<PixelBuffer, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to decode {}: {}", path.display(), e))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_rgba8(width, height, rgba.into_raw())
}

/// Command names probed for SVG rasterization, in preference order.
const SVG_RASTERIZERS: &[&str] = &["rsvg-convert", "inkscape"];

/// External rasterizer command, resolved lazily once per process and
/// held immutable thereafter.
static SVG_RASTERIZER: OnceLock<Option<&'static str>> = OnceLock::new();

fn svg_rasterizer() -> Option<&'static str> {
    *SVG_RASTERIZER.get_or_init(|| {
        SVG_RASTERIZERS.iter().copied().find(|tool| {
            Command::new(tool)
                .arg("--version")
                .output()
                .map(|out| out.status.success())
                .unwrap_or(false)
        })
    })
}

/// Rasterize an SVG file via the external tool and decode the
/// resulting PNG bytes.
fn decode_svg(path: &Path) -> Result<PixelBuffer, String> {
    let tool = svg_rasterizer().ok_or_else(|| {
        "No SVG rasterizer available (install rsvg-convert or inkscape)".to_string()
    })?;

    let output = match tool {
        "rsvg-convert" => Command::new(tool)
            .arg("--format=png")
            .arg(path)
            .output(),
        _ => Command::new(tool)
            .arg("--export-type=png")
            .arg("--export-filename=-")
            .arg(path)
            .output(),
    }
    .map_err(|e| format!("Failed to run {}: {}", tool, e))?;

    if !output.status.success() {
        return Err(format!(
            "{} failed on {}: {}",
            tool,
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    let img = image::load_from_memory(&output.stdout)
        .map_err(|e| format!("Failed to decode rasterized SVG {}: {}", path.display(), e))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_rgba8(width, height, rgba.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn test_decode_png_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("glyph.png");

        let mut img = RgbaImage::new(4, 3);
        img.put_pixel(1, 2, Rgba([10, 20, 30, 40]));
        img.save(&path).unwrap();

        let buf = decode_image(&path).unwrap();
        assert_eq!(buf.width, 4);
        assert_eq!(buf.height, 3);
        assert_eq!(buf.rgba(1, 2), [10, 20, 30, 40]);
        assert_eq!(buf.rgba(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn test_decode_missing_file() {
        let result = decode_image("does_not_exist.png");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to decode"));
    }

    #[test]
    fn test_unsupported_extension() {
        let result = decode_image("artwork.xyz");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Unsupported file format"));
    }

    #[test]
    fn test_missing_extension() {
        let result = decode_image("artwork");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("No file extension"));
    }
}
