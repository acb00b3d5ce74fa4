// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! group passes ([`update`](crate::scene::Scene::update_group_traced),
//! [`clear`](crate::scene::Scene::clear_group_traced) and
//! [`draw`](crate::scene::Scene::draw_group_traced)) call as they finish. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates the per-draw damage rectangle
//!   event.

#[cfg(feature = "trace-rich")]
use kurbo::Rect;

use crate::scene::GroupId;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a group forwarded `update` to its members.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupUpdateEvent {
    /// The group that was updated.
    pub group: GroupId,
    /// Number of members whose behavior ran.
    pub updated: u32,
}

/// Emitted after a group repainted its previous regions with the background.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupClearEvent {
    /// The group that was cleared.
    pub group: GroupId,
    /// Regions repainted for sprites that left the group or stopped drawing.
    pub lost: u32,
    /// Regions repainted for current members' previous draws.
    pub previous: u32,
}

/// Emitted after a group drew its members and recorded their regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupDrawEvent {
    /// The group that was drawn.
    pub group: GroupId,
    /// Members that produced a region.
    pub drawn: u32,
    /// Members that drew nothing (hidden, no image, or not placed).
    pub skipped: u32,
    /// Lost regions discarded by this draw.
    pub lost_discarded: u32,
    /// Rectangles in the resulting damage.
    pub damage_rects: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from group passes.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a group update pass.
    fn on_group_update(&mut self, e: &GroupUpdateEvent) {
        _ = e;
    }

    /// Called after a group clear pass.
    fn on_group_clear(&mut self, e: &GroupClearEvent) {
        _ = e;
    }

    /// Called after a group draw pass.
    fn on_group_draw(&mut self, e: &GroupDrawEvent) {
        _ = e;
    }

    /// Called with the damage rectangles of a draw pass (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_damage_rects(&mut self, group: GroupId, rects: &[Rect]) {
        _ = (group, rects);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`GroupUpdateEvent`].
    #[inline]
    pub fn group_update(&mut self, e: &GroupUpdateEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_group_update(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`GroupClearEvent`].
    #[inline]
    pub fn group_clear(&mut self, e: &GroupClearEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_group_clear(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`GroupDrawEvent`].
    #[inline]
    pub fn group_draw(&mut self, e: &GroupDrawEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_group_draw(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits damage rectangles (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn damage_rects(&mut self, group: GroupId, rects: &[Rect]) {
        if let Some(s) = &mut self.sink {
            s.on_damage_rects(group, rects);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
