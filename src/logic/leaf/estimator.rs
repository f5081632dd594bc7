//! Leaf Color Chart estimation from a decoded photo.
//!
//! Each pixel is converted to HSV and classified independently, so the
//! aggregation is a map-reduce over [`HueTally`] values. Large buffers are
//! reduced on the rayon thread pool.

use super::hsv::{pixel_to_hsv, rgb_to_hsv};
use crate::error::{Result, RiceFertError};
use crate::models::{HsvSample, LeafColorEstimate, PixelLayout, PixelSample};
use rayon::prelude::*;
use tracing::debug;

/// Absolute floor on leaf pixels, independent of image resolution.
pub const MIN_LEAF_PIXELS: usize = 100;

/// Pixel count at which reduction switches to rayon.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64 * 1024;

const LEAF_HUE_MIN: f64 = 70.0;
const LEAF_HUE_MAX: f64 = 160.0;
const LEAF_SATURATION_MIN: f64 = 0.25;
const LEAF_VALUE_MIN: f64 = 0.2;
const LEAF_VALUE_MAX: f64 = 0.95;

/// Green to yellow-green tissue, excluding near-gray and badly exposed pixels.
pub fn is_leaf_pixel(hsv: &HsvSample) -> bool {
    (LEAF_HUE_MIN..=LEAF_HUE_MAX).contains(&hsv.hue)
        && hsv.saturation > LEAF_SATURATION_MIN
        && hsv.value > LEAF_VALUE_MIN
        && hsv.value < LEAF_VALUE_MAX
}

/// Partial aggregate over a set of pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HueTally {
    pub total_pixels: usize,
    pub leaf_pixels: usize,
    pub hue_sum: f64,
}

impl HueTally {
    pub fn observe(hsv: HsvSample) -> Self {
        if is_leaf_pixel(&hsv) {
            Self {
                total_pixels: 1,
                leaf_pixels: 1,
                hue_sum: hsv.hue,
            }
        } else {
            Self {
                total_pixels: 1,
                leaf_pixels: 0,
                hue_sum: 0.0,
            }
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            total_pixels: self.total_pixels + other.total_pixels,
            leaf_pixels: self.leaf_pixels + other.leaf_pixels,
            hue_sum: self.hue_sum + other.hue_sum,
        }
    }

    pub fn mean_hue(&self) -> Option<f64> {
        if self.leaf_pixels == 0 {
            None
        } else {
            Some(self.hue_sum / self.leaf_pixels as f64)
        }
    }
}

/// Piecewise-linear map from mean leaf hue to the LCC scale.
///
/// Bands [70,85) and [85,100) span 2 points each, [100,120) spans 3 and
/// [120,160] spans 2. The result is clamped to [1, 10].
pub fn hue_to_lcc(hue: f64) -> f64 {
    let score = if hue < 85.0 {
        1.0 + (hue - 70.0) / 15.0 * 2.0
    } else if hue < 100.0 {
        3.0 + (hue - 85.0) / 15.0 * 2.0
    } else if hue < 120.0 {
        5.0 + (hue - 100.0) / 20.0 * 3.0
    } else {
        8.0 + (hue - 120.0) / 40.0 * 2.0
    };
    score.min(10.0).max(1.0)
}

pub struct LeafColorEstimator {
    parallel_threshold: usize,
}

impl LeafColorEstimator {
    pub fn new() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn with_parallel_threshold(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    pub fn estimate(&self, pixels: &[PixelSample]) -> Result<LeafColorEstimate> {
        let tally = if pixels.len() >= self.parallel_threshold {
            pixels
                .par_iter()
                .map(|p| HueTally::observe(pixel_to_hsv(*p)))
                .reduce(HueTally::default, HueTally::merge)
        } else {
            pixels
                .iter()
                .map(|p| HueTally::observe(pixel_to_hsv(*p)))
                .fold(HueTally::default(), HueTally::merge)
        };
        finish(tally)
    }

    /// Estimate from a raw decoded buffer in RGB or RGBA order.
    pub fn estimate_bytes(&self, bytes: &[u8], layout: PixelLayout) -> Result<LeafColorEstimate> {
        let stride = layout.stride();
        if bytes.len() % stride != 0 {
            return Err(RiceFertError::InvalidPixelBuffer {
                len: bytes.len(),
                stride,
            });
        }

        let observe = |px: &[u8]| HueTally::observe(rgb_to_hsv(px[0], px[1], px[2]));
        let tally = if bytes.len() / stride >= self.parallel_threshold {
            bytes
                .par_chunks_exact(stride)
                .map(observe)
                .reduce(HueTally::default, HueTally::merge)
        } else {
            bytes
                .chunks_exact(stride)
                .map(observe)
                .fold(HueTally::default(), HueTally::merge)
        };
        finish(tally)
    }
}

impl Default for LeafColorEstimator {
    fn default() -> Self {
        Self::new()
    }
}

fn finish(tally: HueTally) -> Result<LeafColorEstimate> {
    debug!(
        total_pixels = tally.total_pixels,
        leaf_pixels = tally.leaf_pixels,
        "Leaf segmentation complete"
    );

    let mean_hue = match tally.mean_hue() {
        Some(hue) if tally.leaf_pixels >= MIN_LEAF_PIXELS => hue,
        _ => {
            return Err(RiceFertError::InsufficientLeafArea {
                leaf_pixels: tally.leaf_pixels,
                minimum: MIN_LEAF_PIXELS,
            })
        }
    };

    Ok(LeafColorEstimate {
        score: hue_to_lcc(mean_hue),
        mean_hue,
        leaf_pixels: tally.leaf_pixels,
        total_pixels: tally.total_pixels,
    })
}
