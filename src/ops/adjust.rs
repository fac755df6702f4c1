//! Color adjustments: brightness, contrast, saturation, hue rotation.
//!
//! The four stages compose in that fixed order. Channel arithmetic happens
//! in normalized [0, 1] floats, clamped after every stage so an overflow in
//! one stage cannot leak into the next. Each parameter defaults to its
//! identity value (1.0 for the multiplicative factors, 0 degrees for hue),
//! so a descriptor can adjust any subset independently. Alpha is untouched.

use super::AdjustSpec;
use image::RgbaImage;

/// Apply brightness, contrast, saturation and hue rotation in order.
///
/// Infallible: parameter ranges are enforced during request validation.
pub fn apply(image: &mut RgbaImage, spec: &AdjustSpec) {
    for pixel in image.pixels_mut() {
        let mut rgb = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        ];

        for c in &mut rgb {
            *c = (*c * spec.brightness).clamp(0.0, 1.0);
        }
        for c in &mut rgb {
            *c = ((*c - 0.5) * spec.contrast + 0.5).clamp(0.0, 1.0);
        }
        let luma = super::luma601(rgb[0], rgb[1], rgb[2]);
        for c in &mut rgb {
            *c = (luma + (*c - luma) * spec.saturation).clamp(0.0, 1.0);
        }
        if spec.hue_rotation != 0.0 {
            rgb = rotate_hue(rgb, spec.hue_rotation);
        }

        pixel[0] = (rgb[0] * 255.0).round() as u8;
        pixel[1] = (rgb[1] * 255.0).round() as u8;
        pixel[2] = (rgb[2] * 255.0).round() as u8;
    }
}

/// Rotate hue by `degrees` via an HSL round trip, channels in [0, 1].
fn rotate_hue(rgb: [f32; 3], degrees: f32) -> [f32; 3] {
    let (h, s, l) = rgb_to_hsl(rgb);
    hsl_to_rgb(((h + degrees).rem_euclid(360.0), s, l))
}

fn rgb_to_hsl([r, g, b]: [f32; 3]) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let h = if max == r {
        60.0 * (((g - b) / delta).rem_euclid(6.0))
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    (h, s, l)
}

fn hsl_to_rgb((h, s, l): (f32, f32, f32)) -> [f32; 3] {
    if s == 0.0 {
        return [l, l, l];
    }

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [
        (r + m).clamp(0.0, 1.0),
        (g + m).clamp(0.0, 1.0),
        (b + m).clamp(0.0, 1.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn solid(pixel: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(3, 3, Rgba(pixel))
    }

    fn adjusted(pixel: [u8; 4], spec: AdjustSpec) -> Rgba<u8> {
        let mut image = solid(pixel);
        apply(&mut image, &spec);
        *image.get_pixel(0, 0)
    }

    #[test]
    fn identity_spec_leaves_pixels_unchanged() {
        let p = adjusted([47, 111, 203, 255], AdjustSpec::default());
        assert_eq!(p, Rgba([47, 111, 203, 255]));
    }

    #[test]
    fn brightness_zero_is_black() {
        let p = adjusted(
            [200, 150, 100, 255],
            AdjustSpec {
                brightness: 0.0,
                ..Default::default()
            },
        );
        assert_eq!(p, Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn brightness_scales_channels() {
        let p = adjusted(
            [100, 50, 20, 255],
            AdjustSpec {
                brightness: 2.0,
                ..Default::default()
            },
        );
        assert_eq!(p, Rgba([200, 100, 40, 255]));
    }

    #[test]
    fn brightness_clamps_instead_of_wrapping() {
        let p = adjusted(
            [200, 200, 200, 255],
            AdjustSpec {
                brightness: 3.0,
                ..Default::default()
            },
        );
        assert_eq!(p, Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn contrast_zero_collapses_to_mid_gray() {
        let p = adjusted(
            [30, 128, 240, 255],
            AdjustSpec {
                contrast: 0.0,
                ..Default::default()
            },
        );
        assert_eq!(p, Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn contrast_pushes_values_from_midpoint() {
        let p = adjusted(
            [64, 192, 128, 255],
            AdjustSpec {
                contrast: 2.0,
                ..Default::default()
            },
        );
        assert!(p[0] <= 1);
        assert_eq!(p[1], 255);
        // Near-midpoint value stays near the midpoint.
        assert!((p[2] as i32 - 128).abs() <= 2);
    }

    #[test]
    fn saturation_zero_is_luma_gray() {
        let p = adjusted(
            [255, 0, 0, 255],
            AdjustSpec {
                saturation: 0.0,
                ..Default::default()
            },
        );
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
        assert_eq!(p[0], 76); // Rec.601 luma of pure red
    }

    #[test]
    fn saturation_boost_spreads_channels() {
        let p = adjusted(
            [150, 100, 100, 255],
            AdjustSpec {
                saturation: 2.0,
                ..Default::default()
            },
        );
        assert!(p[0] > 150);
        assert!(p[1] < 100);
    }

    #[test]
    fn hue_rotation_120_turns_red_green() {
        let p = adjusted(
            [255, 0, 0, 255],
            AdjustSpec {
                hue_rotation: 120.0,
                ..Default::default()
            },
        );
        assert_eq!(p, Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn negative_hue_rotation_wraps() {
        // -120 from red wraps to 240 degrees: blue.
        let p = adjusted(
            [255, 0, 0, 255],
            AdjustSpec {
                hue_rotation: -120.0,
                ..Default::default()
            },
        );
        assert_eq!(p, Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn hue_rotation_preserves_gray() {
        let p = adjusted(
            [128, 128, 128, 255],
            AdjustSpec {
                hue_rotation: 90.0,
                ..Default::default()
            },
        );
        assert_eq!(p, Rgba([128, 128, 128, 255]));
    }

    #[test]
    fn alpha_is_never_touched() {
        let p = adjusted(
            [10, 200, 90, 77],
            AdjustSpec {
                brightness: 2.5,
                contrast: 0.4,
                saturation: 1.8,
                hue_rotation: 45.0,
            },
        );
        assert_eq!(p[3], 77);
    }

    #[test]
    fn hsl_roundtrip_is_stable() {
        for rgb in [[1.0, 0.0, 0.0], [0.3, 0.6, 0.9], [0.5, 0.5, 0.5], [0.0, 0.0, 0.0]] {
            let back = hsl_to_rgb(rgb_to_hsl(rgb));
            for i in 0..3 {
                assert!(
                    (back[i] - rgb[i]).abs() < 1e-5,
                    "roundtrip drifted for {rgb:?}: {back:?}"
                );
            }
        }
    }
}
