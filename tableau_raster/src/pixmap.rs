// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! ARGB pixel buffers.

use tableau_core::image::{Image, rotated_dimensions};
use tableau_core::{Error, Result};

/// Why raw pixel data could not be turned into a [`Pixmap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer does not hold exactly `width * height` RGBA pixels.
    #[error("expected {expected} bytes of RGBA data, got {actual}")]
    Length {
        /// Bytes required by the declared dimensions.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
}

/// A row-major buffer of `0xAARRGGBB` pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl std::fmt::Debug for Pixmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pixmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Pixmap {
    /// Creates a fully transparent pixmap.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, 0)
    }

    /// Creates a pixmap with every pixel set to `color`.
    #[must_use]
    pub fn filled(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    /// Decodes tightly packed 8-bit RGBA data.
    ///
    /// Fails with an asset-load [`Error`] carrying a [`DecodeError`] when the
    /// buffer length does not match the dimensions.
    pub fn from_rgba8(width: u32, height: u32, data: &[u8]) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(Error::asset_load(DecodeError::Length {
                expected,
                actual: data.len(),
            }));
        }
        let pixels = data
            .chunks_exact(4)
            .map(|p| crate::argb(p[3], p[0], p[1], p[2]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Returns the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns all pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the pixmap.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    /// Sets the pixel at `(x, y)`; writes outside the pixmap are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: u32) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.pixels[i] = color;
        }
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Exact quarter turn: each destination pixel maps to one source pixel.
    fn rotate_quarter(&self, turns: u32) -> Self {
        let (w, h) = (self.width, self.height);
        let (nw, nh) = if turns % 2 == 1 { (h, w) } else { (w, h) };
        let mut out = Self::new(nw, nh);
        for y in 0..nh {
            for x in 0..nw {
                let (sx, sy) = match turns {
                    1 => (w - 1 - y, x),
                    2 => (w - 1 - x, h - 1 - y),
                    _ => (y, h - 1 - x),
                };
                let i = out.index(x, y);
                out.pixels[i] = self.pixels[self.index(sx, sy)];
            }
        }
        out
    }
}

impl Image for Pixmap {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Nearest-neighbour resample.
    fn resize(&self, width: u32, height: u32) -> Self {
        let mut out = Self::new(width, height);
        if self.width == 0 || self.height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = scale_index(y, self.height, height);
            for x in 0..width {
                let sx = scale_index(x, self.width, width);
                let i = out.index(x, y);
                out.pixels[i] = self.pixels[self.index(sx, sy)];
            }
        }
        out
    }

    /// Counter-clockwise rotation about the centre. Quarter turns are exact;
    /// other angles sample the nearest source pixel, leaving corners
    /// transparent.
    fn rotate(&self, degrees: u32) -> Self {
        let degrees = degrees % 360;
        if degrees % 90 == 0 {
            return if degrees == 0 {
                self.clone()
            } else {
                self.rotate_quarter(degrees / 90)
            };
        }

        let (nw, nh) = rotated_dimensions(self.dimensions(), degrees);
        let mut out = Self::new(nw, nh);
        let (s, c) = f64::from(degrees).to_radians().sin_cos();
        let (cx, cy) = (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0);
        let (ncx, ncy) = (f64::from(nw) / 2.0, f64::from(nh) / 2.0);
        for y in 0..nh {
            let dy = f64::from(y) + 0.5 - ncy;
            for x in 0..nw {
                let dx = f64::from(x) + 0.5 - ncx;
                // Inverse of a counter-clockwise turn with y pointing down.
                let sx = (dx * c - dy * s + cx).floor();
                let sy = (dx * s + dy * c + cy).floor();
                if sx >= 0.0 && sy >= 0.0 && sx < f64::from(self.width) && sy < f64::from(self.height) {
                    let i = out.index(x, y);
                    out.pixels[i] = self.pixels[self.index(to_u32(sx), to_u32(sy))];
                }
            }
        }
        out
    }
}

/// Maps a destination index to the source index that covers it.
#[expect(
    clippy::cast_possible_truncation,
    reason = "result is below src_len, which is a u32"
)]
fn scale_index(dst: u32, src_len: u32, dst_len: u32) -> u32 {
    (u64::from(dst) * u64::from(src_len) / u64::from(dst_len)) as u32
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "callers check the value is a whole number within the pixmap"
)]
fn to_u32(v: f64) -> u32 {
    v as u32
}
