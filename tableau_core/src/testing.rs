// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles for the backend contract.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use kurbo::{Point, Rect, Size};

use crate::image::{Image, rotated_dimensions};
use crate::surface::Surface;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// An image that only tracks its dimensions and how it was produced.
#[derive(Clone, Debug)]
pub(crate) struct TestImage {
    width: u32,
    height: u32,
    id: u64,
    history: Vec<String>,
}

impl TestImage {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            history: Vec::new(),
        }
    }

    /// Unique per produced image, so cache hits can be told from rebuilds.
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn history(&self) -> &[String] {
        &self.history
    }

    pub(crate) fn transforms(&self) -> usize {
        self.history.len()
    }

    fn derive(&self, width: u32, height: u32, step: String) -> Self {
        let mut out = Self::new(width, height);
        out.history = self.history.clone();
        out.history.push(step);
        out
    }
}

impl Image for TestImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn resize(&self, width: u32, height: u32) -> Self {
        self.derive(width, height, format!("resize {width}x{height}"))
    }

    fn rotate(&self, degrees: u32) -> Self {
        let (w, h) = rotated_dimensions(self.dimensions(), degrees);
        self.derive(w, h, format!("rotate {degrees}"))
    }
}

/// One call made against a [`RecordingSurface`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Blit {
    Image { top_left: Point, size: Size },
    Area { top_left: Point, area: Rect },
}

/// An unbounded surface that records every blit.
#[derive(Debug, Default)]
pub(crate) struct RecordingSurface {
    pub(crate) blits: Vec<Blit>,
}

impl RecordingSurface {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Areas repainted through [`Surface::blit_area`], in call order.
    pub(crate) fn repainted(&self) -> Vec<Rect> {
        self.blits
            .iter()
            .filter_map(|b| match b {
                Blit::Area { area, .. } => Some(*area),
                Blit::Image { .. } => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    type Image = TestImage;

    fn blit(&mut self, image: &TestImage, top_left: Point) -> Rect {
        let (w, h) = image.dimensions();
        let size = Size::new(f64::from(w), f64::from(h));
        self.blits.push(Blit::Image { top_left, size });
        Rect::from_origin_size(top_left, size)
    }

    fn blit_area(&mut self, _image: &TestImage, top_left: Point, area: Rect) -> Rect {
        self.blits.push(Blit::Area { top_left, area });
        Rect::from_origin_size(top_left, area.size())
    }
}
