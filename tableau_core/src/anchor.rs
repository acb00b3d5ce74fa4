// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor points for sprite placement.
//!
//! A sprite's position names where its anchor lands on the surface. The
//! bounding box's top-left corner is `position - anchor offset`.

use kurbo::{Size, Vec2};

use crate::error::{Error, Result};

/// The point of a sprite's bounding box that aligns with its position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Anchor {
    /// Top-left corner; offset `(0, 0)`.
    #[default]
    TopLeft,
    /// Top-right corner; offset `(w, 0)`.
    TopRight,
    /// Bottom-left corner; offset `(0, h)`.
    BottomLeft,
    /// Bottom-right corner; offset `(w, h)`.
    BottomRight,
    /// Center; offset `(w / 2, h / 2)`.
    Center,
    /// An explicit offset from the top-left corner, independent of size.
    Offset(Vec2),
}

impl Anchor {
    /// Creates an explicit offset anchor.
    #[inline]
    #[must_use]
    pub const fn offset(x: f64, y: f64) -> Self {
        Self::Offset(Vec2::new(x, y))
    }

    /// Returns `true` for anchors whose offset depends on the bounding box.
    #[inline]
    #[must_use]
    pub const fn is_named(self) -> bool {
        !matches!(self, Self::Offset(_))
    }

    /// Resolves the offset against a bounding box of the given size.
    ///
    /// Explicit offsets are returned unchanged.
    #[must_use]
    pub fn resolve(self, size: Size) -> Vec2 {
        let (w, h) = (size.width, size.height);
        match self {
            Self::TopLeft => Vec2::ZERO,
            Self::TopRight => Vec2::new(w, 0.0),
            Self::BottomLeft => Vec2::new(0.0, h),
            Self::BottomRight => Vec2::new(w, h),
            Self::Center => Vec2::new(w / 2.0, h / 2.0),
            Self::Offset(v) => v,
        }
    }

    /// Rejects explicit offsets with NaN or infinite components.
    pub(crate) fn validate(self) -> Result<Self> {
        match self {
            Self::Offset(v) if !v.is_finite() => Err(Error::MalformedAnchor),
            _ => Ok(self),
        }
    }
}

impl From<(f64, f64)> for Anchor {
    fn from((x, y): (f64, f64)) -> Self {
        Self::offset(x, y)
    }
}

impl From<Vec2> for Anchor {
    fn from(v: Vec2) -> Self {
        Self::Offset(v)
    }
}
