// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprite state, transforms, and group membership for retained-mode 2D drawing.
//!
//! `tableau_core` keeps a set of visible objects (*sprites*) with position,
//! scale, rotation and visibility, and organizes them into *groups* that batch
//! update, erase and draw passes against a render surface. It is `no_std`
//! compatible (with `alloc`) and stores sprites struct-of-arrays behind
//! generational index handles.
//!
//! # Architecture
//!
//! Each frame the caller erases what the previous frame drew, runs per-sprite
//! behavior, then draws and records the new regions:
//!
//! ```text
//!   Scene::set_*() ──► dirty flag + stale transform cache
//!                                  │
//!   Scene::clear_group() ◄─────────┘  repaints lost + previously drawn rects
//!           │
//!           ▼
//!   Scene::update_group() ──► Behavior::update(scene, sprite, args)
//!           │
//!           ▼
//!   Scene::draw_group() ──► Surface::blit() ──► Damage
//! ```
//!
//! **[`scene`]**: The sprite arena and group membership index. Sprites and
//! groups reference each other through non-owning handles; every membership
//! change updates both sides.
//!
//! **[`transform`]**: Per-sprite raw image plus scale and rotation, with a
//! lazily recomputed rendered image.
//!
//! **[`anchor`]**: Which point of a sprite's bounding box lands on its
//! position.
//!
//! **[`image`]** and **[`surface`]**: The contract a graphics backend
//! implements: image resize/rotate primitives and blitting onto a surface.
//!
//! **[`damage`]**: Screen areas touched by a draw pass.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-draw
//!   damage-rect events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod anchor;
pub mod damage;
pub mod error;
pub mod image;
pub mod scene;
pub mod surface;
pub mod trace;
pub mod transform;

#[cfg(test)]
mod testing;

pub use error::{Error, ErrorKind, Result};
