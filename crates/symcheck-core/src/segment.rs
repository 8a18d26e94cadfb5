//! Background segmentation
//!
//! Classifies every pixel as background or foreground: a border-seeded
//! flood fill over a color-distance predicate, with defined fallback
//! tiers for artwork that defeats it.

use crate::mask::Mask;
use crate::models::{AnalyzeOptions, PixelBuffer};
use std::collections::VecDeque;

/// Which tier produced the background mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationTier {
    /// Border-seeded flood fill (primary)
    FloodFill,

    /// Global predicate scan, no connectivity (full-bleed artwork)
    GlobalPredicate,

    /// No detectable background; the mask is empty and sampling falls
    /// back to a fixed border band
    Abstained,
}

/// Background mask plus the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    pub mask: Mask,
    pub tier: SegmentationTier,
}

/// Per-pixel background-likeness test: low alpha, or RGB close enough
/// to the segmentation reference color.
#[inline]
fn near_background(rgba: [u8; 4], options: &AnalyzeOptions) -> bool {
    if rgba[3] <= options.alpha_background_cutoff {
        return true;
    }
    let reference = options.segmentation_background.rgb;
    let dr = rgba[0] as f64 - reference[0] as f64;
    let dg = rgba[1] as f64 - reference[1] as f64;
    let db = rgba[2] as f64 - reference[2] as f64;
    // Compare squared distances; avoids the sqrt without changing the cut
    dr * dr + dg * dg + db * db <= options.near_bg_distance * options.near_bg_distance
}

/// Segment the image into background and foreground.
///
/// Tier 1 marks everything reachable from the image border through a
/// contiguous run of background-like pixels (4-connected BFS, explicit
/// FIFO worklist). Background-colored holes enclosed by foreground stay
/// foreground: reachability from the border is the defining property.
/// Tier 2 drops connectivity when tier 1 marks nothing; tier 3 abstains
/// when the predicate matches nothing at all.
pub fn segment(pixels: &PixelBuffer, options: &AnalyzeOptions) -> Segmentation {
    let width = pixels.width as usize;
    let height = pixels.height as usize;
    let mut mask = Mask::new(width, height);
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    // Seed from the full perimeter. Pixels are marked when enqueued so
    // nothing is ever queued twice.
    let seed = |x: usize, y: usize, mask: &mut Mask, queue: &mut VecDeque<(usize, usize)>| {
        if !mask.get(x, y) && near_background(pixels.rgba(x, y), options) {
            mask.set(x, y, true);
            queue.push_back((x, y));
        }
    };
    for x in 0..width {
        seed(x, 0, &mut mask, &mut queue);
        seed(x, height - 1, &mut mask, &mut queue);
    }
    for y in 0..height {
        seed(0, y, &mut mask, &mut queue);
        seed(width - 1, y, &mut mask, &mut queue);
    }

    while let Some((x, y)) = queue.pop_front() {
        let neighbors = [
            (x, y.wrapping_sub(1)),
            (x, y + 1),
            (x.wrapping_sub(1), y),
            (x + 1, y),
        ];
        for (nx, ny) in neighbors {
            if nx >= width || ny >= height {
                continue;
            }
            if !mask.get(nx, ny) && near_background(pixels.rgba(nx, ny), options) {
                mask.set(nx, ny, true);
                queue.push_back((nx, ny));
            }
        }
    }

    if !mask.is_empty() {
        return Segmentation {
            mask,
            tier: SegmentationTier::FloodFill,
        };
    }

    // Tier 2: the artwork touches the whole border with non-background
    // color. Apply the predicate globally, ignoring connectivity.
    for y in 0..height {
        for x in 0..width {
            if near_background(pixels.rgba(x, y), options) {
                mask.set(x, y, true);
            }
        }
    }

    if !mask.is_empty() {
        return Segmentation {
            mask,
            tier: SegmentationTier::GlobalPredicate,
        };
    }

    // Tier 3: no detectable background at all.
    Segmentation {
        mask,
        tier: SegmentationTier::Abstained,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a buffer from a closure over (x, y).
    fn buffer_from_fn(
        width: u32,
        height: u32,
        f: impl Fn(usize, usize) -> [u8; 4],
    ) -> PixelBuffer {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height as usize {
            for x in 0..width as usize {
                data.extend_from_slice(&f(x, y));
            }
        }
        PixelBuffer::from_rgba8(width, height, data).unwrap()
    }

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn test_flood_fill_marks_border_connected_background() {
        // White border surrounding a black 4x4 center square
        let pixels = buffer_from_fn(10, 10, |x, y| {
            if (3..7).contains(&x) && (3..7).contains(&y) {
                BLACK
            } else {
                WHITE
            }
        });
        let seg = segment(&pixels, &AnalyzeOptions::default());

        assert_eq!(seg.tier, SegmentationTier::FloodFill);
        assert_eq!(seg.mask.count(), 100 - 16);
        assert!(seg.mask.get(0, 0));
        assert!(!seg.mask.get(4, 4));
    }

    #[test]
    fn test_enclosed_hole_stays_foreground() {
        // Black ring with a white 1x1 hole at the center: the hole has
        // no border-connected path, so it must not be background
        let pixels = buffer_from_fn(7, 7, |x, y| {
            if x == 3 && y == 3 {
                WHITE
            } else if (2..5).contains(&x) && (2..5).contains(&y) {
                BLACK
            } else {
                WHITE
            }
        });
        let seg = segment(&pixels, &AnalyzeOptions::default());

        assert_eq!(seg.tier, SegmentationTier::FloodFill);
        assert!(!seg.mask.get(3, 3), "enclosed hole must stay foreground");
        assert!(seg.mask.get(0, 0));
    }

    #[test]
    fn test_transparent_image_is_all_background() {
        let pixels = buffer_from_fn(5, 5, |_, _| [0, 0, 0, 0]);
        let seg = segment(&pixels, &AnalyzeOptions::default());

        assert_eq!(seg.tier, SegmentationTier::FloodFill);
        assert_eq!(seg.mask.count(), 25);
    }

    #[test]
    fn test_global_fallback_when_border_is_covered() {
        // Opaque red frame touching every border pixel, white interior:
        // tier 1 finds no seeds, tier 2 marks the interior whites
        let pixels = buffer_from_fn(6, 6, |x, y| {
            if x == 0 || y == 0 || x == 5 || y == 5 {
                [200, 0, 0, 255]
            } else {
                WHITE
            }
        });
        let seg = segment(&pixels, &AnalyzeOptions::default());

        assert_eq!(seg.tier, SegmentationTier::GlobalPredicate);
        assert_eq!(seg.mask.count(), 16);
        assert!(seg.mask.get(2, 2));
        assert!(!seg.mask.get(0, 0));
    }

    #[test]
    fn test_abstains_when_nothing_matches() {
        // Uniform opaque red, white segmentation reference: no pixel is
        // background-like anywhere
        let pixels = buffer_from_fn(4, 4, |_, _| [200, 0, 0, 255]);
        let seg = segment(&pixels, &AnalyzeOptions::default());

        assert_eq!(seg.tier, SegmentationTier::Abstained);
        assert!(seg.mask.is_empty());
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let pixels = buffer_from_fn(12, 9, |x, y| {
            if (x * 7 + y * 3) % 5 == 0 {
                BLACK
            } else {
                WHITE
            }
        });
        let opts = AnalyzeOptions::default();
        assert_eq!(segment(&pixels, &opts), segment(&pixels, &opts));
    }
}
