//! Binary pixel masks
//!
//! Flat row-major boolean grids used for background, sample, and
//! failing-pixel classification.

/// A width x height boolean grid, one entry per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    /// Create an empty (all-false) mask.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.bits[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: bool) {
        self.bits[y * self.width + x] = value;
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.bits.iter().any(|&b| b)
    }

    /// True if any set pixel lies within the Chebyshev `radius`
    /// neighborhood of (x, y), clipped at grid bounds. The square
    /// neighborhood includes (x, y) itself.
    pub fn any_in_neighborhood(&self, x: usize, y: usize, radius: usize) -> bool {
        let x_lo = x.saturating_sub(radius);
        let y_lo = y.saturating_sub(radius);
        let x_hi = (x + radius).min(self.width - 1);
        let y_hi = (y + radius).min(self.height - 1);

        for ny in y_lo..=y_hi {
            for nx in x_lo..=x_hi {
                if self.bits[ny * self.width + nx] {
                    return true;
                }
            }
        }
        false
    }
}
