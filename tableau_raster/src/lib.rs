// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Software raster backend for tableau.
//!
//! [`Pixmap`] is an ARGB pixel buffer implementing
//! [`Image`](tableau_core::image::Image): nearest-neighbour resize and
//! counter-clockwise rotation with expanded bounds, both preserving per-pixel
//! alpha. [`Canvas`] implements [`Surface`](tableau_core::surface::Surface)
//! on top of a pixmap, with clipped source-over blits.
//!
//! Pixels are packed `0xAARRGGBB` in a `u32`; see [`argb`].

mod blend;
mod canvas;
mod pixmap;

pub use blend::{argb, blend_over};
pub use canvas::Canvas;
pub use pixmap::{DecodeError, Pixmap};
