/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Luma extraction and hue tint reconstruction
//!
//! Encoding collapses a pixel into a single luma byte plus an opacity
//! decision, decoding expands the luma byte back into RGBA using one
//! global hue for the whole image.
use zune_core::bit_depth::BitDepth;
use zune_core::colorspace::ColorSpace;

use crate::constants::{LUMA_WEIGHT_B, LUMA_WEIGHT_G, LUMA_WEIGHT_R, LUMA_WEIGHT_SUM};

/// Anything that may be expressed as an 8 bit RGBA color
///
/// Returning `None` is not an error, such colors are encoded
/// as transparent black.
pub trait ToRgba8 {
    fn to_rgba8(&self) -> Option<[u8; 4]>;
}

impl ToRgba8 for [u8; 4] {
    fn to_rgba8(&self) -> Option<[u8; 4]> {
        Some(*self)
    }
}

impl<T: ToRgba8> ToRgba8 for Option<T> {
    fn to_rgba8(&self) -> Option<[u8; 4]> {
        self.as_ref().and_then(ToRgba8::to_rgba8)
    }
}

/// Memory layout of the pixels handed to the encoder
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PixelLayout {
    colorspace: ColorSpace,
    depth:      BitDepth
}

impl PixelLayout {
    pub const fn new(colorspace: ColorSpace, depth: BitDepth) -> PixelLayout {
        PixelLayout { colorspace, depth }
    }
    /// Number of bytes a single pixel occupies
    ///
    /// Returns `None` when the bit depth is unknown
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self.depth {
            BitDepth::Unknown => None,
            depth => Some(self.colorspace.num_components() * depth.size_of())
        }
    }
    /// Whether pixels in this layout can be turned into RGBA
    pub fn is_supported(&self) -> bool {
        match self.bytes_per_pixel() {
            Some(size) => self.pixel(&[0; 16][..size.min(16)]).to_rgba8().is_some(),
            None => false
        }
    }
    /// View a single pixel of this layout
    pub const fn pixel<'a>(&self, bytes: &'a [u8]) -> LayoutPixel<'a> {
        LayoutPixel {
            layout: *self,
            bytes
        }
    }
}

/// A pixel borrowed from the encoder input
#[derive(Copy, Clone)]
pub struct LayoutPixel<'a> {
    layout: PixelLayout,
    bytes:  &'a [u8]
}

impl<'a> ToRgba8 for LayoutPixel<'a> {
    fn to_rgba8(&self) -> Option<[u8; 4]> {
        // 16 bit samples are big endian, keep the most significant byte
        let stride = match self.layout.depth {
            BitDepth::Eight => 1,
            BitDepth::Sixteen => 2,
            _ => return None
        };
        let s = |component: usize| -> Option<u8> { self.bytes.get(component * stride).copied() };

        match self.layout.colorspace {
            ColorSpace::Luma => {
                let l = s(0)?;
                Some([l, l, l, 255])
            }
            ColorSpace::LumaA => {
                let l = s(0)?;
                Some([l, l, l, s(1)?])
            }
            ColorSpace::RGB => Some([s(0)?, s(1)?, s(2)?, 255]),
            ColorSpace::RGBA => Some([s(0)?, s(1)?, s(2)?, s(3)?]),
            ColorSpace::BGR => Some([s(2)?, s(1)?, s(0)?, 255]),
            ColorSpace::BGRA => Some([s(2)?, s(1)?, s(0)?, s(3)?]),
            ColorSpace::ARGB => Some([s(1)?, s(2)?, s(3)?, s(0)?]),
            _ => None
        }
    }
}

/// Convert a color to a luma byte and an opacity decision
///
/// Luma uses the Rec.601 integer weights, rounded to nearest.
/// A pixel is opaque only if its alpha is strictly greater than `threshold`.
///
/// Colors that cannot be expressed as RGBA become transparent with luma `0`
pub fn color_to_gray<C: ToRgba8 + ?Sized>(color: &C, threshold: u8) -> (u8, bool) {
    let Some([r, g, b, a]) = color.to_rgba8() else {
        return (0, false);
    };

    let weighted = u32::from(r) * LUMA_WEIGHT_R
        + u32::from(g) * LUMA_WEIGHT_G
        + u32::from(b) * LUMA_WEIGHT_B;
    // max is 255*1000, so the result always fits in a u8
    let luma = ((weighted + LUMA_WEIGHT_SUM / 2) / LUMA_WEIGHT_SUM) as u8;

    (luma, a > threshold)
}

/// Reconstruct an RGBA color from a luma byte
///
/// - Transparent pixels have alpha `0` and carry the untinted gray value.
/// - Opaque pixels have alpha `255`, with `hue_shift == 0` they are pure gray,
///   otherwise luma is the HSV value of a fully saturated color whose hue is
///   `hue_shift/256` of a full turn.
pub fn gray_to_color(luma: u8, opaque: bool, hue_shift: u8) -> [u8; 4] {
    if !opaque {
        return [luma, luma, luma, 0];
    }
    if hue_shift == 0 {
        // exact grayscale, no float round trip
        return [luma, luma, luma, 255];
    }
    let h = f64::from(hue_shift) / 256.0;
    let v = f64::from(luma) / 255.0;

    let [r, g, b] = saturated_hsv_to_rgb(h, v);

    [to_u8(r), to_u8(g), to_u8(b), 255]
}

#[inline(always)]
fn to_u8(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

/// HSV to RGB at full saturation, value in `0.0..=1.0`, hue in turns
#[inline(always)]
fn saturated_hsv_to_rgb(h: f64, v: f64) -> [f64; 3] {
    let i = (h * 6.0) as i32;
    let f = (h * 6.0) - f64::from(i);
    // with s = 1, p is always zero
    let q = v * (1.0 - f);
    let t = v * f;

    match i % 6 {
        0 => [v, t, 0.0],
        1 => [q, v, 0.0],
        2 => [0.0, v, t],
        3 => [0.0, q, v],
        4 => [t, 0.0, v],
        _ => [v, 0.0, q]
    }
}

#[cfg(test)]
mod tests {
    use zune_core::bit_depth::BitDepth;
    use zune_core::colorspace::ColorSpace;

    use crate::color::{color_to_gray, gray_to_color, PixelLayout};

    #[test]
    fn test_luma_weights() {
        assert_eq!(color_to_gray(&[255, 255, 255, 255], 0), (255, true));
        assert_eq!(color_to_gray(&[0, 0, 0, 255], 0), (0, true));
        // 299*255/1000 = 76.245
        assert_eq!(color_to_gray(&[255, 0, 0, 255], 0).0, 76);
        // 587*255/1000 = 149.685
        assert_eq!(color_to_gray(&[0, 255, 0, 255], 0).0, 150);
        // 114*255/1000 = 29.07
        assert_eq!(color_to_gray(&[0, 0, 255, 255], 0).0, 29);
        // (299*10+587*20+114*30)/1000 = 18.15
        assert_eq!(color_to_gray(&[10, 20, 30, 255], 0).0, 18);
    }

    #[test]
    fn test_threshold_boundary() {
        assert_eq!(color_to_gray(&[9, 9, 9, 100], 100), (9, false));
        assert_eq!(color_to_gray(&[9, 9, 9, 101], 100), (9, true));
        // zero alpha is never opaque
        assert!(!color_to_gray(&[9, 9, 9, 0], 0).1);
    }

    #[test]
    fn test_unconvertible_is_transparent_black() {
        let cmyk = PixelLayout::new(ColorSpace::CMYK, BitDepth::Eight);
        assert!(!cmyk.is_supported());
        assert_eq!(color_to_gray(&cmyk.pixel(&[1, 2, 3, 4]), 0), (0, false));

        let hsv = PixelLayout::new(ColorSpace::HSV, BitDepth::Eight);
        assert_eq!(color_to_gray(&hsv.pixel(&[10, 200, 200]), 0), (0, false));

        assert!(!PixelLayout::new(ColorSpace::RGB, BitDepth::Unknown).is_supported());

        assert_eq!(color_to_gray(&None::<[u8; 4]>, 0), (0, false));
    }

    #[test]
    fn test_layouts() {
        let bgra = PixelLayout::new(ColorSpace::BGRA, BitDepth::Eight);
        assert_eq!(color_to_gray(&bgra.pixel(&[255, 0, 0, 7]), 6), (29, true));

        let luma_a = PixelLayout::new(ColorSpace::LumaA, BitDepth::Eight);
        assert_eq!(color_to_gray(&luma_a.pixel(&[77, 0]), 0), (77, false));

        let argb = PixelLayout::new(ColorSpace::ARGB, BitDepth::Eight);
        assert_eq!(color_to_gray(&argb.pixel(&[255, 0, 0, 255]), 0), (29, true));

        let rgb16 = PixelLayout::new(ColorSpace::RGB, BitDepth::Sixteen);
        assert_eq!(rgb16.bytes_per_pixel(), Some(6));
        assert_eq!(
            color_to_gray(&rgb16.pixel(&[255, 1, 255, 2, 255, 3]), 0),
            (255, true)
        );
    }

    #[test]
    fn test_hue_zero_is_exact_gray() {
        for luma in 0..=255 {
            assert_eq!(gray_to_color(luma, true, 0), [luma, luma, luma, 255]);
        }
    }

    #[test]
    fn test_masked_pixels_are_untinted() {
        assert_eq!(gray_to_color(200, false, 128), [200, 200, 200, 0]);
        assert_eq!(gray_to_color(13, false, 0), [13, 13, 13, 0]);
    }

    #[test]
    fn test_hue_tint() {
        // 180 degrees, cyan
        assert_eq!(gray_to_color(200, true, 128), [0, 200, 200, 255]);
        // 90 degrees, chartreuse
        assert_eq!(gray_to_color(200, true, 64), [100, 200, 0, 255]);
        // 270 degrees, violet
        assert_eq!(gray_to_color(255, true, 192), [128, 0, 255, 255]);
        // 45 degrees, orange
        assert_eq!(gray_to_color(200, true, 32), [200, 150, 0, 255]);
        // just short of 300 degrees
        assert_eq!(gray_to_color(255, true, 213), [253, 0, 255, 255]);
        // black stays black whatever the hue
        assert_eq!(gray_to_color(0, true, 99), [0, 0, 0, 255]);
    }
}
