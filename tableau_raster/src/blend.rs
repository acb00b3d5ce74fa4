// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Packed ARGB pixels and source-over blending.

/// Packs channels into a `0xAARRGGBB` pixel.
#[inline]
#[must_use]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Composites `src` over an opaque `dst`.
///
/// Fully opaque sources replace the destination and fully transparent ones
/// leave it untouched. The result is always opaque.
#[inline]
#[must_use]
pub const fn blend_over(src: u32, dst: u32) -> u32 {
    let sa = (src >> 24) & 0xFF;
    if sa == 0xFF {
        return src;
    }
    if sa == 0 {
        return dst;
    }

    let inv_sa = 255 - sa;
    let r = (((src >> 16) & 0xFF) * sa + ((dst >> 16) & 0xFF) * inv_sa) / 255;
    let g = (((src >> 8) & 0xFF) * sa + ((dst >> 8) & 0xFF) * inv_sa) / 255;
    let b = ((src & 0xFF) * sa + (dst & 0xFF) * inv_sa) / 255;

    0xFF00_0000 | (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_channels() {
        assert_eq!(argb(0x12, 0x34, 0x56, 0x78), 0x1234_5678);
    }

    #[test]
    fn opaque_and_transparent_extremes() {
        let dst = argb(255, 10, 20, 30);
        assert_eq!(blend_over(argb(255, 1, 2, 3), dst), argb(255, 1, 2, 3));
        assert_eq!(blend_over(argb(0, 1, 2, 3), dst), dst);
    }

    #[test]
    fn half_alpha_mixes() {
        let out = blend_over(argb(128, 255, 0, 0), argb(255, 0, 0, 255));
        assert_eq!(out >> 24, 0xFF);
        assert_eq!((out >> 16) & 0xFF, 128);
        assert_eq!(out & 0xFF, 127);
    }
}
