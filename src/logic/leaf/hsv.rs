use crate::models::{HsvSample, PixelSample};

/// Convert an 8-bit RGB pixel to HSV.
///
/// When two channels share the maximum, the hue branch is chosen in
/// r, g, b order. Pixel classification depends on this exact dispatch.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> HsvSample {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let saturation = if max == 0.0 { 0.0 } else { d / max };

    let sector = match (r, g, b) {
        _ if max == min => None,
        (r, g, b) if r == max => Some((g - b) / d + if g < b { 6.0 } else { 0.0 }),
        (r, g, b) if g == max => Some((b - r) / d + 2.0),
        (r, g, _) => Some((r - g) / d + 4.0),
    };

    let hue = match sector {
        Some(h) => h / 6.0 * 360.0,
        None => 0.0,
    };

    HsvSample {
        hue,
        saturation,
        value: max,
    }
}

pub fn pixel_to_hsv(pixel: PixelSample) -> HsvSample {
    rgb_to_hsv(pixel.r, pixel.g, pixel.b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_hsv(actual: HsvSample, hue: f64, saturation: f64, value: f64) {
        assert_abs_diff_eq!(actual.hue, hue, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.saturation, saturation, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.value, value, epsilon = 1e-9);
    }

    #[test]
    fn primaries() {
        assert_hsv(rgb_to_hsv(255, 0, 0), 0.0, 1.0, 1.0);
        assert_hsv(rgb_to_hsv(0, 255, 0), 120.0, 1.0, 1.0);
        assert_hsv(rgb_to_hsv(0, 0, 255), 240.0, 1.0, 1.0);
    }

    #[test]
    fn black_has_no_saturation() {
        let hsv = rgb_to_hsv(0, 0, 0);
        assert_eq!(hsv.hue, 0.0);
        assert_eq!(hsv.saturation, 0.0);
        assert_eq!(hsv.value, 0.0);
    }

    #[test]
    fn grays_are_achromatic() {
        for level in [1u8, 64, 128, 255] {
            let hsv = rgb_to_hsv(level, level, level);
            assert_eq!(hsv.hue, 0.0);
            assert_eq!(hsv.saturation, 0.0);
            assert_abs_diff_eq!(hsv.value, level as f64 / 255.0);
        }
    }

    #[test]
    fn secondaries_resolve_ties_in_channel_order() {
        // yellow: r == g == max, red branch wins
        assert_hsv(rgb_to_hsv(255, 255, 0), 60.0, 1.0, 1.0);
        // cyan: g == b == max, green branch wins
        assert_hsv(rgb_to_hsv(0, 255, 255), 180.0, 1.0, 1.0);
        // magenta: r == b == max, red branch wins with wrap
        assert_hsv(rgb_to_hsv(255, 0, 255), 300.0, 1.0, 1.0);
    }

    #[test]
    fn red_branch_wraps_negative_hue() {
        // g < b in the red sector lands just below 360
        let hsv = rgb_to_hsv(255, 0, 51);
        assert_abs_diff_eq!(hsv.hue, 348.0, epsilon = 1e-9);
        assert!(hsv.hue < 360.0);
    }

    #[test]
    fn leaf_green() {
        // hue 115, saturation 0.5
        let hsv = rgb_to_hsv(104, 192, 96);
        assert_hsv(hsv, 115.0, 0.5, 192.0 / 255.0);
    }

    #[test]
    fn pixel_to_hsv_matches_components() {
        let pixel = PixelSample::new(30, 140, 60);
        assert_eq!(pixel_to_hsv(pixel), rgb_to_hsv(30, 140, 60));
    }
}
