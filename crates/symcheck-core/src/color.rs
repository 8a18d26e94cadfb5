//! Color parsing and WCAG 2.1 contrast math
//!
//! sRGB linearization, relative luminance, alpha compositing, and the
//! standard (L1 + 0.05) / (L2 + 0.05) contrast ratio.

use crate::models::BackgroundSpec;

/// Named colors accepted by `parse_color`.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("black", [0, 0, 0]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
];

/// Parse a background color specification.
///
/// Accepts color names (`white`, `black`, ...), 3- or 6-digit hex
/// (`#fff`, `#ffffff`), `rgb(r,g,b)`, or bare `r,g,b`. Out-of-range
/// channel values in the numeric forms are clamped to 0-255.
/// Unrecognized syntax is a configuration error.
pub fn parse_color(input: &str) -> Result<BackgroundSpec, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Empty color specification".to_string());
    }

    let lower = trimmed.to_lowercase();
    if let Some((name, rgb)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Ok(BackgroundSpec::new(*name, *rgb));
    }

    if let Some(hex) = trimmed.strip_prefix('#') {
        let rgb = parse_hex_rgb(hex)?;
        return Ok(BackgroundSpec::new(trimmed, rgb));
    }

    if lower.starts_with("rgb(") && trimmed.ends_with(')') {
        let inner = &trimmed[4..trimmed.len() - 1];
        let rgb = parse_channel_triple(inner)?;
        return Ok(BackgroundSpec::new(trimmed, rgb));
    }

    if trimmed.contains(',') {
        let rgb = parse_channel_triple(trimmed)?;
        return Ok(BackgroundSpec::new(trimmed, rgb));
    }

    Err(format!(
        "Unrecognized color: {} (expected a name, #hex, rgb(r,g,b), or r,g,b)",
        trimmed
    ))
}

/// Parse a 3- or 6-digit hex color body (no leading '#').
fn parse_hex_rgb(hex: &str) -> Result<[u8; 3], String> {
    // Reject non-hex bytes up front so the pairwise slicing below can
    // never land inside a multi-byte character
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("Invalid hex digit in #{}", hex));
    }
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c
                    .to_digit(16)
                    .ok_or_else(|| format!("Invalid hex digit in #{}", hex))?
                    as u8;
                rgb[i] = v * 17;
            }
            Ok(rgb)
        }
        6 => {
            let mut rgb = [0u8; 3];
            for i in 0..3 {
                rgb[i] = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16)
                    .map_err(|_| format!("Invalid hex digit in #{}", hex))?;
            }
            Ok(rgb)
        }
        _ => Err(format!(
            "Hex colors must have 3 or 6 digits, got #{}",
            hex
        )),
    }
}

/// Parse "r,g,b" with clamping to 0-255.
fn parse_channel_triple(input: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = input.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Color must have exactly three channels (r,g,b), got: {}",
            input
        ));
    }

    let mut rgb = [0u8; 3];
    for (i, part) in parts.iter().enumerate() {
        let value = part
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("Invalid channel value: {}", part.trim()))?;
        rgb[i] = value.clamp(0, 255) as u8;
    }
    Ok(rgb)
}

/// Convert an sRGB channel (0-255) to linear light.
/// sRGB -> linear: if V <= 0.04045: V/12.92, else ((V+0.055)/1.055)^2.4
fn srgb_to_linear(channel: u8) -> f64 {
    let v = channel as f64 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance per WCAG 2.1.
/// L = 0.2126 * R + 0.7152 * G + 0.0722 * B (linear channels)
pub fn relative_luminance(rgb: [u8; 3]) -> f64 {
    0.2126 * srgb_to_linear(rgb[0])
        + 0.7152 * srgb_to_linear(rgb[1])
        + 0.0722 * srgb_to_linear(rgb[2])
}

/// Alpha-composite an RGBA pixel onto an opaque background color.
/// Per channel: round(a * fg + (1 - a) * bg) with a = alpha / 255.
/// The rounding to the nearest integer channel is part of the contract.
pub fn composite_over(rgba: [u8; 4], background: [u8; 3]) -> [u8; 3] {
    let a = rgba[3] as f64 / 255.0;
    let blend = |fg: u8, bg: u8| -> u8 { (fg as f64 * a + bg as f64 * (1.0 - a)).round() as u8 };
    [
        blend(rgba[0], background[0]),
        blend(rgba[1], background[1]),
        blend(rgba[2], background[2]),
    ]
}

/// WCAG 2.1 contrast ratio between two luminances.
/// ratio = (L1 + 0.05) / (L2 + 0.05) where L1 >= L2, so the result is
/// always >= 1 and symmetric in its arguments.
pub fn contrast_ratio_from_luminance(l_a: f64, l_b: f64) -> f64 {
    let (lighter, darker) = if l_a > l_b { (l_a, l_b) } else { (l_b, l_a) };
    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG 2.1 contrast ratio between two opaque colors.
pub fn contrast_ratio(rgb_a: [u8; 3], rgb_b: [u8; 3]) -> f64 {
    contrast_ratio_from_luminance(relative_luminance(rgb_a), relative_luminance(rgb_b))
}
