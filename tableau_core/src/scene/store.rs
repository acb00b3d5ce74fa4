// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays sprite storage with allocation, composition, and visual
//! state management.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashSet;
use kurbo::{Point, Rect, Size, Vec2};

use super::behavior::Behavior;
use super::group::Group;
use super::id::{GroupId, SpriteId};
use crate::anchor::Anchor;
use crate::damage::DEFAULT_MAX_RECTS;
use crate::error::{Error, Result};
use crate::image::Image;
use crate::transform::{TransformEngine, check_scale};

/// Scene-wide settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneConfig {
    /// Disjoint damage rectangles a draw pass reports before collapsing them
    /// into one bounding box.
    pub max_damage_rects: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            max_damage_rects: DEFAULT_MAX_RECTS,
        }
    }
}

/// Whether a sprite draws its own image or a sequence of children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    /// Draws its rendered image.
    Leaf,
    /// Draws its children in order and forwards transform and visibility
    /// changes to them.
    Composite,
}

/// Arena holding every sprite and group.
///
/// Sprites are addressed by [`SpriteId`] and groups by [`GroupId`]. Sprite
/// state lives in parallel columns indexed by slot; destroyed slots are
/// recycled via a free list and generation counters reject stale handles.
///
/// `I` is the backend image type. `A` is whatever the caller passes to
/// [`update_group`](Self::update_group) each frame.
///
/// # Panics
///
/// Every method taking a handle panics if the handle is stale, except
/// [`is_alive`](Self::is_alive), [`is_group_alive`](Self::is_group_alive),
/// and the removal and containment queries, which treat a destroyed sprite
/// as a non-member.
pub struct Scene<I, A = ()> {
    // -- Visual state --
    pub(crate) engine: Vec<TransformEngine<I>>,
    pub(crate) anchor: Vec<Anchor>,
    pub(crate) position: Vec<Option<Point>>,
    /// Bounding box top-left, derived from `position` and the anchor.
    pub(crate) origin: Vec<Option<Point>>,
    pub(crate) visible: Vec<bool>,
    pub(crate) dirty: Vec<bool>,

    // -- Composition --
    pub(crate) children: Vec<Option<Vec<SpriteId>>>,

    // -- Per-frame logic --
    pub(crate) behavior: Vec<Option<Box<dyn Behavior<I, A>>>>,
    /// Bumped whenever the behavior slot is set or cleared.
    pub(crate) behavior_epoch: Vec<u32>,

    // -- Membership (sprite side) --
    pub(crate) memberships: Vec<HashSet<GroupId>>,

    // -- Sprite allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Groups --
    pub(crate) groups: Vec<Group>,
    pub(crate) group_generation: Vec<u32>,
    pub(crate) group_free_list: Vec<u32>,

    pub(crate) config: SceneConfig,
}

impl<I, A> fmt::Debug for Scene<I, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("sprites", &(self.len as usize - self.free_list.len()))
            .field(
                "groups",
                &(self.groups.len() - self.group_free_list.len()),
            )
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<I, A> Default for Scene<I, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I, A> Scene<I, A> {
    /// Creates an empty scene with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Creates an empty scene.
    #[must_use]
    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            engine: Vec::new(),
            anchor: Vec::new(),
            position: Vec::new(),
            origin: Vec::new(),
            visible: Vec::new(),
            dirty: Vec::new(),
            children: Vec::new(),
            behavior: Vec::new(),
            behavior_epoch: Vec::new(),
            memberships: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            groups: Vec::new(),
            group_generation: Vec::new(),
            group_free_list: Vec::new(),
            config,
        }
    }

    /// Returns the scene configuration.
    #[must_use]
    pub const fn config(&self) -> SceneConfig {
        self.config
    }

    // -- Allocation API --

    /// Creates a leaf sprite with no image, not yet placed.
    ///
    /// The sprite starts visible, dirty, with scale `1.0`, rotation `0` and
    /// a top-left anchor.
    pub fn create_sprite(&mut self) -> SpriteId {
        self.allocate(None)
    }

    /// Creates a leaf sprite showing `image`.
    pub fn create_sprite_with_image(&mut self, image: I) -> SpriteId {
        let id = self.allocate(None);
        self.engine[id.idx as usize].set_asset(Some(image));
        id
    }

    /// Creates a composite sprite with no children.
    pub fn create_composite(&mut self) -> SpriteId {
        self.allocate(Some(Vec::new()))
    }

    /// Destroys a sprite, freeing its slot for reuse.
    ///
    /// The sprite is first [killed](Self::kill), so every group it was in
    /// keeps its last drawn region for the next erase, and it is dropped
    /// from every composite that listed it. A composite's children are not
    /// destroyed with it.
    pub fn destroy_sprite(&mut self, id: SpriteId) {
        self.validate(id);
        self.kill(id);

        for list in self.children.iter_mut().flatten() {
            list.retain(|&c| c != id);
        }

        let i = id.idx as usize;
        self.engine[i] = TransformEngine::new();
        self.children[i] = None;
        self.behavior[i] = None;
        self.position[i] = None;
        self.origin[i] = None;

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.free_list.push(id.idx);
    }

    /// Returns whether the given handle refers to a live sprite.
    #[must_use]
    pub fn is_alive(&self, id: SpriteId) -> bool {
        id.idx < self.len && self.generation[id.idx as usize] == id.generation
    }

    /// Returns every live sprite, in slot order.
    #[must_use]
    pub fn sprites(&self) -> Vec<SpriteId> {
        let free: HashSet<u32> = self.free_list.iter().copied().collect();
        (0..self.len)
            .filter(|idx| !free.contains(idx))
            .map(|idx| self.id_at(idx))
            .collect()
    }

    /// Returns every live sprite whose dirty flag is set.
    #[must_use]
    pub fn dirty_sprites(&self) -> Vec<SpriteId> {
        self.sprites()
            .into_iter()
            .filter(|id| self.dirty[id.idx as usize])
            .collect()
    }

    // -- Composition API --

    /// Returns whether a sprite is a leaf or a composite.
    #[must_use]
    pub fn kind(&self, id: SpriteId) -> SpriteKind {
        self.validate(id);
        if self.children[id.idx as usize].is_some() {
            SpriteKind::Composite
        } else {
            SpriteKind::Leaf
        }
    }

    /// Appends `child` to a composite's children.
    ///
    /// Earlier transform or visibility changes on the composite are not
    /// applied to the new child.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `parent` is not a composite, or
    /// if `parent` is `child` itself or one of its descendants.
    pub fn add_child(&mut self, parent: SpriteId, child: SpriteId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.children[parent.idx as usize].is_some(),
            "sprite is not a composite: {parent:?}"
        );
        assert!(
            !self.subtree(child.idx).contains(&parent.idx),
            "child would create a cycle"
        );
        if let Some(list) = &mut self.children[parent.idx as usize] {
            list.push(child);
        }
    }

    /// Returns the children of a composite, in draw order (empty for leaves).
    #[must_use]
    pub fn children(&self, id: SpriteId) -> &[SpriteId] {
        self.validate(id);
        self.children[id.idx as usize].as_deref().unwrap_or(&[])
    }

    // -- Property getters (no dirty marking) --

    /// Returns the raw, untransformed image.
    #[must_use]
    pub fn image(&self, id: SpriteId) -> Option<&I> {
        self.validate(id);
        self.engine[id.idx as usize].asset()
    }

    /// Returns the scale factor.
    #[must_use]
    pub fn scale(&self, id: SpriteId) -> f64 {
        self.validate(id);
        self.engine[id.idx as usize].scale()
    }

    /// Returns the rotation in degrees, in `0..360`.
    #[must_use]
    pub fn rotation(&self, id: SpriteId) -> u32 {
        self.validate(id);
        self.engine[id.idx as usize].rotation()
    }

    /// Returns the anchor.
    #[must_use]
    pub fn anchor(&self, id: SpriteId) -> Anchor {
        self.validate(id);
        self.anchor[id.idx as usize]
    }

    /// Returns the position, or `None` if the sprite has not been placed.
    #[must_use]
    pub fn position(&self, id: SpriteId) -> Option<Point> {
        self.validate(id);
        self.position[id.idx as usize]
    }

    /// Returns whether the sprite is drawn.
    #[must_use]
    pub fn is_visible(&self, id: SpriteId) -> bool {
        self.validate(id);
        self.visible[id.idx as usize]
    }

    /// Returns whether the sprite changed since its dirty flag was last
    /// cleared.
    #[must_use]
    pub fn is_dirty(&self, id: SpriteId) -> bool {
        self.validate(id);
        self.dirty[id.idx as usize]
    }

    /// Acknowledges the sprite's visual changes.
    ///
    /// Nothing in the scene clears the flag on its own; this belongs to
    /// whatever pipeline consumes it.
    pub fn clear_dirty(&mut self, id: SpriteId) {
        self.validate(id);
        self.dirty[id.idx as usize] = false;
    }

    // -- Mutation API (marks dirty) --
    //
    // Scale, rotation, position and visibility setters apply to the sprite
    // and then, for composites, to every current descendant in pre-order.
    // Fallible setters check every target before changing any of them.

    /// Replaces the sprite's raw image. Not forwarded to children.
    pub fn set_image(&mut self, id: SpriteId, image: Option<I>) {
        self.validate(id);
        let i = id.idx as usize;
        self.engine[i].set_asset(image);
        self.dirty[i] = true;
    }

    /// Sets the scale factor.
    ///
    /// Fails with [`Error::NonPositiveScale`] unless `factor` is finite and
    /// greater than zero.
    pub fn set_scale(&mut self, id: SpriteId, factor: f64) -> Result<()> {
        self.validate(id);
        check_scale(factor)?;
        for t in self.subtree(id.idx) {
            self.engine[t as usize].set_scale(factor)?;
            self.dirty[t as usize] = true;
        }
        Ok(())
    }

    /// Adds `delta` to the scale factor of the sprite and each descendant.
    ///
    /// Fails with [`Error::NonPositiveScale`], changing nothing, if any
    /// resulting factor would not be positive.
    pub fn scale_by(&mut self, id: SpriteId, delta: f64) -> Result<()> {
        self.validate(id);
        let targets = self.subtree(id.idx);
        for &t in &targets {
            check_scale(self.engine[t as usize].scale() + delta)?;
        }
        for t in targets {
            let engine = &mut self.engine[t as usize];
            engine.set_scale(engine.scale() + delta)?;
            self.dirty[t as usize] = true;
        }
        Ok(())
    }

    /// Sets the rotation; any integer is accepted and stored modulo 360.
    pub fn set_rotation(&mut self, id: SpriteId, degrees: i64) {
        self.validate(id);
        for t in self.subtree(id.idx) {
            self.engine[t as usize].set_rotation(degrees);
            self.dirty[t as usize] = true;
        }
    }

    /// Adds `delta` degrees to the rotation of the sprite and each
    /// descendant.
    pub fn rotate_by(&mut self, id: SpriteId, delta: i64) {
        self.validate(id);
        for t in self.subtree(id.idx) {
            let engine = &mut self.engine[t as usize];
            engine.set_rotation(i64::from(engine.rotation()) + delta.rem_euclid(360));
            self.dirty[t as usize] = true;
        }
    }

    /// Shows or hides the sprite. Position, scale and rotation are kept.
    pub fn set_visible(&mut self, id: SpriteId, visible: bool) {
        self.validate(id);
        for t in self.subtree(id.idx) {
            self.visible[t as usize] = visible;
            self.dirty[t as usize] = true;
        }
    }

    /// Flips the visibility of the sprite and of each descendant.
    pub fn toggle_visibility(&mut self, id: SpriteId) {
        self.validate(id);
        for t in self.subtree(id.idx) {
            self.visible[t as usize] = !self.visible[t as usize];
            self.dirty[t as usize] = true;
        }
    }

    /// Sets the anchor used by later position changes.
    ///
    /// The sprite does not move; the new anchor applies from the next
    /// [`set_position`](Self::set_position) or transform change. Fails with
    /// [`Error::MalformedAnchor`] for non-finite explicit offsets.
    pub fn set_anchor(&mut self, id: SpriteId, anchor: impl Into<Anchor>) -> Result<()> {
        self.validate(id);
        self.anchor[id.idx as usize] = anchor.into().validate()?;
        Ok(())
    }

    // -- Helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: SpriteId) {
        assert!(
            self.is_alive(id),
            "stale SpriteId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    pub(crate) fn id_at(&self, idx: u32) -> SpriteId {
        SpriteId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Returns `idx` followed by its descendants in pre-order.
    ///
    /// A sprite reachable along several paths is listed once, at its first
    /// visit.
    pub(crate) fn subtree(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            if !seen.insert(i) {
                continue;
            }
            out.push(i);
            if let Some(list) = &self.children[i as usize] {
                stack.extend(list.iter().rev().map(|c| c.idx));
            }
        }
        out
    }

    fn allocate(&mut self, children: Option<Vec<SpriteId>>) -> SpriteId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped on destroy.
            let i = idx as usize;
            self.engine[i] = TransformEngine::new();
            self.anchor[i] = Anchor::default();
            self.position[i] = None;
            self.origin[i] = None;
            self.visible[i] = true;
            self.dirty[i] = true;
            self.children[i] = children;
            self.behavior[i] = None;
            self.memberships[i].clear();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.engine.push(TransformEngine::new());
            self.anchor.push(Anchor::default());
            self.position.push(None);
            self.origin.push(None);
            self.visible.push(true);
            self.dirty.push(true);
            self.children.push(children);
            self.behavior.push(None);
            self.behavior_epoch.push(0);
            self.memberships.push(HashSet::new());
            self.generation.push(0);
            idx
        };
        self.id_at(idx)
    }
}

impl<I: Image, A> Scene<I, A> {
    /// Places the sprite so that its anchor lands on `position`, or clears
    /// its placement with `None`.
    ///
    /// Composites forward the same position to every descendant. A named
    /// anchor needs an image to resolve against: if any leaf in the subtree
    /// has none, this fails with [`Error::NoImage`] and nothing moves. A
    /// composite without an image of its own records the position but has no
    /// bounding box.
    ///
    /// An unplaced sprite is skipped when drawn.
    pub fn set_position(&mut self, id: SpriteId, position: Option<Point>) -> Result<()> {
        self.validate(id);
        let targets = self.subtree(id.idx);
        let Some(point) = position else {
            for t in targets {
                let t = t as usize;
                self.position[t] = None;
                self.origin[t] = None;
                self.dirty[t] = true;
            }
            return Ok(());
        };

        let mut offsets = Vec::with_capacity(targets.len());
        for &t in &targets {
            let t = t as usize;
            self.refresh(t);
            let offset = match self.resolve_anchor(t) {
                Ok(offset) => Some(offset),
                Err(_) if self.children[t].is_some() => None,
                Err(err) => return Err(err),
            };
            offsets.push(offset);
        }
        for (t, offset) in targets.into_iter().zip(offsets) {
            let t = t as usize;
            self.position[t] = Some(point);
            self.origin[t] = offset.map(|o| point - o);
            self.dirty[t] = true;
        }
        Ok(())
    }

    /// Shorthand for [`set_position`](Self::set_position) with `Some`.
    pub fn move_to(&mut self, id: SpriteId, position: Point) -> Result<()> {
        self.set_position(id, Some(position))
    }

    /// Resolves the anchor against the current bounding box size.
    ///
    /// Explicit offsets are returned as-is; named anchors fail with
    /// [`Error::NoImage`] until the sprite has an image.
    pub fn anchor_offset(&mut self, id: SpriteId) -> Result<Vec2> {
        self.validate(id);
        self.refresh(id.idx as usize);
        self.resolve_anchor(id.idx as usize)
    }

    /// Returns the image as drawn: scaled, then rotated.
    ///
    /// Rebuilt only if the image, scale or rotation changed since the last
    /// read.
    pub fn rendered_image(&mut self, id: SpriteId) -> Option<&I> {
        self.validate(id);
        let i = id.idx as usize;
        self.refresh(i);
        self.engine[i].rendered()
    }

    /// Returns the pixel dimensions of the rendered image without building
    /// it.
    #[must_use]
    pub fn size_after_transform(&self, id: SpriteId) -> Option<(u32, u32)> {
        self.validate(id);
        self.engine[id.idx as usize].size_after_transform()
    }

    /// Returns the axis-aligned box the sprite's rendered image occupies.
    ///
    /// Fails with [`Error::NoImage`] if there is nothing to draw and with
    /// [`Error::NotPlaced`] if the sprite has no position.
    pub fn bounding_box(&mut self, id: SpriteId) -> Result<Rect> {
        self.validate(id);
        let i = id.idx as usize;
        self.refresh(i);
        let (w, h) = self.engine[i].rendered_dimensions().ok_or(Error::NoImage)?;
        let origin = self.origin[i].ok_or(Error::NotPlaced)?;
        Ok(Rect::from_origin_size(
            origin,
            Size::new(f64::from(w), f64::from(h)),
        ))
    }

    /// Rebuilds a stale rendered image and re-applies the position, so the
    /// bounding box always matches the image last read.
    pub(crate) fn refresh(&mut self, i: usize) {
        if !self.engine[i].is_stale() {
            return;
        }
        self.engine[i].refresh();
        if let Some(point) = self.position[i] {
            self.origin[i] = self.resolve_anchor(i).ok().map(|o| point - o);
        }
    }

    /// Resolves the anchor, assuming the engine is fresh.
    fn resolve_anchor(&self, i: usize) -> Result<Vec2> {
        match self.anchor[i] {
            Anchor::Offset(v) => Ok(v),
            named => {
                let (w, h) = self.engine[i].rendered_dimensions().ok_or(Error::NoImage)?;
                Ok(named.resolve(Size::new(f64::from(w), f64::from(h))))
            }
        }
    }
}

impl<I, A> Scene<I, A> {
    /// Installs the per-frame update hook, replacing any previous one.
    pub fn set_behavior(&mut self, id: SpriteId, behavior: impl Behavior<I, A> + 'static) {
        self.validate(id);
        let i = id.idx as usize;
        self.behavior[i] = Some(Box::new(behavior));
        self.behavior_epoch[i] = self.behavior_epoch[i].wrapping_add(1);
    }

    /// Removes the per-frame update hook; updates become no-ops.
    pub fn clear_behavior(&mut self, id: SpriteId) {
        self.validate(id);
        let i = id.idx as usize;
        self.behavior[i] = None;
        self.behavior_epoch[i] = self.behavior_epoch[i].wrapping_add(1);
    }

    /// Runs the sprite's behavior with `args`. Sprites without one ignore
    /// the call.
    pub fn update_sprite(&mut self, id: SpriteId, args: &A) {
        self.validate(id);
        let i = id.idx as usize;
        let Some(mut behavior) = self.behavior[i].take() else {
            return;
        };
        let epoch = self.behavior_epoch[i];
        behavior.update(self, id, args);
        // The behavior may have destroyed its sprite, or set or cleared the
        // slot itself; only restore it into an untouched live slot.
        if self.is_alive(id) && self.behavior_epoch[i] == epoch {
            self.behavior[i] = Some(behavior);
        }
    }
}
