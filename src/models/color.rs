use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PixelSample {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HsvSample {
    /// Degrees in [0, 360)
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}

/// Channel layout of a decoded pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    /// Alpha is ignored
    Rgba,
}

impl PixelLayout {
    pub fn stride(&self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeafColorEstimate {
    /// LCC score in [1, 10]
    pub score: f64,
    pub mean_hue: f64,
    pub leaf_pixels: usize,
    pub total_pixels: usize,
}

impl LeafColorEstimate {
    pub fn leaf_fraction(&self) -> f64 {
        if self.total_pixels == 0 {
            0.0
        } else {
            self.leaf_pixels as f64 / self.total_pixels as f64
        }
    }
}
