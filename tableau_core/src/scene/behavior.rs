// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame sprite behavior.

use super::id::SpriteId;
use super::store::Scene;

/// Per-frame logic attached to a sprite (movement, animation, ...).
///
/// [`Scene::update_group`] calls [`update`](Self::update) on every member
/// with the caller's frame arguments, forwarded unchanged. The behavior
/// receives the whole scene, so it may move, restyle, or even kill its own
/// sprite.
///
/// Any `FnMut(&mut Scene<I, A>, SpriteId, &A)` closure is a behavior.
pub trait Behavior<I, A> {
    /// Runs one frame of logic for `sprite`.
    fn update(&mut self, scene: &mut Scene<I, A>, sprite: SpriteId, args: &A);
}

impl<I, A, F> Behavior<I, A> for F
where
    F: FnMut(&mut Scene<I, A>, SpriteId, &A),
{
    fn update(&mut self, scene: &mut Scene<I, A>, sprite: SpriteId, args: &A) {
        self(scene, sprite, args);
    }
}
