// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image primitives supplied by a graphics backend.
//!
//! The core never touches pixels. It asks a backend image for its dimensions
//! and for resized or rotated copies, and relies on the backend to honor the
//! exact output dimensions given by [`scaled_dimensions`] and
//! [`rotated_dimensions`], so that bounding boxes can be computed without
//! materializing pixels.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// A backend-owned pixel buffer with an intrinsic size.
///
/// Implementations must preserve per-pixel alpha through both transforms.
pub trait Image {
    /// Returns `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Returns a copy resampled to exactly `width` × `height` pixels.
    ///
    /// The resampling filter is up to the backend.
    #[must_use]
    fn resize(&self, width: u32, height: u32) -> Self
    where
        Self: Sized;

    /// Returns a copy rotated counter-clockwise by `degrees` (`0..360`).
    ///
    /// The result is expanded to the rotated extent, i.e. it has exactly
    /// [`rotated_dimensions`]`(self.dimensions(), degrees)` pixels. Uncovered
    /// corners are transparent.
    #[must_use]
    fn rotate(&self, degrees: u32) -> Self
    where
        Self: Sized;
}

/// Dimensions of an image of size `(width, height)` after scaling by `scale`.
///
/// Each side is `round(side * scale)`.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "pixel sides are rounded and saturate at the u32 range"
)]
pub fn scaled_dimensions((width, height): (u32, u32), scale: f64) -> (u32, u32) {
    let w = (f64::from(width) * scale).round();
    let h = (f64::from(height) * scale).round();
    (w as u32, h as u32)
}

/// Dimensions of the axis-aligned extent of an image of size
/// `(width, height)` rotated by `degrees`.
///
/// Quarter turns are exact (sides swap on 90 and 270). Other angles take the
/// extent of the rotated rectangle, truncated to whole pixels.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "rotated extents are truncated to whole pixels"
)]
pub fn rotated_dimensions((width, height): (u32, u32), degrees: u32) -> (u32, u32) {
    match degrees % 360 {
        0 | 180 => (width, height),
        90 | 270 => (height, width),
        d => {
            let radians = f64::from(d).to_radians();
            #[cfg(feature = "std")]
            let (s, c) = radians.sin_cos();
            #[cfg(not(feature = "std"))]
            let (s, c) = (radians.sin(), radians.cos());
            let (w, h) = (f64::from(width), f64::from(height));
            let new_w = (w * c).abs() + (h * s).abs();
            let new_h = (w * s).abs() + (h * c).abs();
            (new_w.trunc() as u32, new_h.trunc() as u32)
        }
    }
}
