// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lazily rendered sprite images.
//!
//! A [`TransformEngine`] owns a sprite's raw image together with the scale
//! and rotation applied to it. Setters only record the new values and mark
//! the cached rendered image stale; the cache is rebuilt on the next read.
//! Scaling is always applied before rotation.

use crate::error::{Error, Result};
use crate::image::{Image, rotated_dimensions, scaled_dimensions};

/// Raw image plus scale and rotation, with a cached rendered image.
#[derive(Clone, Debug)]
pub struct TransformEngine<I> {
    asset: Option<I>,
    scale: f64,
    rotation: u32,
    /// Transformed copy of `asset`; `None` when no transform applies.
    rendered: Option<I>,
    stale: bool,
}

impl<I> Default for TransformEngine<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> TransformEngine<I> {
    /// Creates an engine with no image, scale `1.0` and rotation `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            asset: None,
            scale: 1.0,
            rotation: 0,
            rendered: None,
            stale: false,
        }
    }

    /// Returns the raw, untransformed image.
    #[must_use]
    pub fn asset(&self) -> Option<&I> {
        self.asset.as_ref()
    }

    /// Returns the scale factor.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the rotation in degrees, always in `0..360`.
    #[must_use]
    pub const fn rotation(&self) -> u32 {
        self.rotation
    }

    /// Returns `true` if a setter ran since the rendered image was last built.
    #[must_use]
    pub const fn is_stale(&self) -> bool {
        self.stale
    }

    /// Returns `true` if reading the rendered image needs no transform.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.scale == 1.0 && self.rotation == 0
    }

    /// Replaces the raw image and drops the cached rendered image.
    pub fn set_asset(&mut self, asset: Option<I>) {
        self.asset = asset;
        self.invalidate();
    }

    /// Sets the scale factor.
    ///
    /// Fails with [`Error::NonPositiveScale`] unless `factor` is finite and
    /// greater than zero; the previous scale is kept in that case.
    pub fn set_scale(&mut self, factor: f64) -> Result<()> {
        check_scale(factor)?;
        self.scale = factor;
        self.invalidate();
        Ok(())
    }

    /// Sets the rotation, normalized into `0..360` (so `-10` becomes `350`).
    pub fn set_rotation(&mut self, degrees: i64) {
        self.rotation = normalize_degrees(degrees);
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.rendered = None;
        self.stale = true;
    }
}

impl<I: Image> TransformEngine<I> {
    /// Returns the rendered image, rebuilding it first if stale.
    ///
    /// Returns `None` when no image is set.
    pub fn rendered_image(&mut self) -> Option<&I> {
        self.refresh();
        self.rendered()
    }

    /// Rebuilds the rendered image if a setter ran since the last build.
    pub fn refresh(&mut self) {
        if !self.stale {
            return;
        }
        self.stale = false;
        self.rendered = self.render();
    }

    /// Returns the rendered image as of the last [`refresh`](Self::refresh).
    #[must_use]
    pub fn rendered(&self) -> Option<&I> {
        self.rendered.as_ref().or(self.asset.as_ref())
    }

    /// Returns the dimensions of the rendered image as of the last refresh.
    #[must_use]
    pub fn rendered_dimensions(&self) -> Option<(u32, u32)> {
        self.rendered().map(Image::dimensions)
    }

    /// Computes the dimensions the rendered image has, or will have, without
    /// building it.
    #[must_use]
    pub fn size_after_transform(&self) -> Option<(u32, u32)> {
        let raw = self.asset.as_ref()?.dimensions();
        let scaled = if self.scale == 1.0 {
            raw
        } else {
            scaled_dimensions(raw, self.scale)
        };
        Some(rotated_dimensions(scaled, self.rotation))
    }

    fn render(&self) -> Option<I> {
        let asset = self.asset.as_ref()?;
        if self.is_identity() {
            return None;
        }
        let scaled = (self.scale != 1.0).then(|| {
            let (w, h) = scaled_dimensions(asset.dimensions(), self.scale);
            asset.resize(w, h)
        });
        if self.rotation == 0 {
            return scaled;
        }
        Some(scaled.as_ref().unwrap_or(asset).rotate(self.rotation))
    }
}

/// Normalizes any integer angle into `0..360`.
#[inline]
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "rem_euclid(360) is always in 0..360"
)]
pub const fn normalize_degrees(degrees: i64) -> u32 {
    degrees.rem_euclid(360) as u32
}

/// Accepts finite, strictly positive scale factors.
pub(crate) fn check_scale(factor: f64) -> Result<()> {
    if factor.is_finite() && factor > 0.0 {
        Ok(())
    } else {
        Err(Error::NonPositiveScale(factor))
    }
}
