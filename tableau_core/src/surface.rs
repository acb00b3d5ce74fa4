// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend contract for render surfaces.
//!
//! A graphics backend provides an [`Image`] type and a [`Surface`] that can
//! blit those images. The core only ever asks a surface to copy an image (or a
//! sub-area of one) to a point, and records the rectangle the surface reports
//! as touched.
//!
//! # Frame loop pseudocode
//!
//! ```rust,ignore
//! loop {
//!     // Erase what the previous frame drew, using the old regions.
//!     scene.clear_group(group, &mut screen, &mut Background::Image(&backdrop));
//!
//!     // Per-sprite behavior.
//!     scene.update_group(group, &frame_args);
//!
//!     // Draw and record this frame's regions.
//!     let damage = scene.draw_group(group, &mut screen);
//!     present(&screen, damage.rects());
//! }
//! ```

use core::fmt;

use kurbo::{Point, Rect};

use crate::image::Image;

/// A mutable render target that images can be blitted onto.
pub trait Surface {
    /// The image type this surface can draw.
    type Image: Image;

    /// Draws `image` with its top-left corner at `top_left` and returns the
    /// affected rectangle (clipped to the surface).
    fn blit(&mut self, image: &Self::Image, top_left: Point) -> Rect;

    /// Draws only the `area` sub-rectangle of `image` (in image coordinates)
    /// with its top-left corner at `top_left`, returning the affected
    /// rectangle.
    fn blit_area(&mut self, image: &Self::Image, top_left: Point, area: Rect) -> Rect;
}

/// How [`clear_group`](crate::scene::Scene::clear_group) repaints a region.
pub enum Background<'a, S: Surface + ?Sized> {
    /// A full-surface image; the same area of it is copied into each region.
    Image(&'a S::Image),
    /// A caller-supplied painter, for procedural or animated backdrops.
    Paint(&'a mut dyn FnMut(&mut S, Rect)),
}

impl<S: Surface + ?Sized> Background<'_, S> {
    /// Repaints `region` of `surface`.
    pub fn repaint(&mut self, surface: &mut S, region: Rect) {
        match self {
            Self::Image(image) => {
                surface.blit_area(*image, region.origin(), region);
            }
            Self::Paint(paint) => (*paint)(surface, region),
        }
    }
}

impl<S: Surface + ?Sized> fmt::Debug for Background<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(_) => f.write_str("Background::Image"),
            Self::Paint(_) => f.write_str("Background::Paint"),
        }
    }
}
