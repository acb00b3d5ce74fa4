// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial damage tracking for partial presentation.

use alloc::vec::Vec;

use kurbo::Rect;

/// Default cap on the number of rectangles before damage collapses into a
/// single bounding box.
pub const DEFAULT_MAX_RECTS: usize = 16;

/// Screen areas that changed during a draw pass.
///
/// Backends can present only these areas instead of the whole surface.
/// Overlapping rectangles are merged as they are added; once more than
/// `max_rects` disjoint rectangles accumulate they collapse into their
/// bounding box.
#[derive(Clone, Debug, PartialEq)]
pub struct Damage {
    rects: Vec<Rect>,
    max_rects: usize,
}

impl Default for Damage {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECTS)
    }
}

impl Damage {
    /// Creates empty damage that collapses beyond `max_rects` rectangles.
    #[must_use]
    pub fn new(max_rects: usize) -> Self {
        Self {
            rects: Vec::new(),
            max_rects: max_rects.max(1),
        }
    }

    /// Returns `true` if nothing needs presenting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Returns the damaged rectangles.
    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    /// Returns the bounding box of all damage, if any.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.rects.iter().copied().reduce(|a, b| a.union(b))
    }

    /// Adds a damaged rectangle. Zero-area rectangles are ignored.
    pub fn add(&mut self, rect: Rect) {
        if rect.is_zero_area() {
            return;
        }
        // A merged rect can grow into others, so keep absorbing until it
        // overlaps nothing left in the list.
        let mut rect = rect;
        while let Some(pos) = self
            .rects
            .iter()
            .position(|r| !r.intersect(rect).is_zero_area())
        {
            rect = rect.union(self.rects.swap_remove(pos));
        }
        self.rects.push(rect);
        if self.rects.len() > self.max_rects {
            self.collapse();
        }
    }

    /// Merges another damage set into this one.
    pub fn merge(&mut self, other: &Self) {
        for &rect in &other.rects {
            self.add(rect);
        }
    }

    /// Clears all damage for reuse.
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Replaces all rectangles by their bounding box.
    fn collapse(&mut self) {
        if let Some(bounds) = self.bounds() {
            self.rects.clear();
            self.rects.push(bounds);
        }
    }
}
