// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sprite arena and group membership index.
//!
//! A [`Scene`] owns every sprite and every group. Sprites are stored
//! struct-of-arrays and addressed by generational [`SpriteId`] handles;
//! groups are addressed by [`GroupId`].
//!
//! # Sprites
//!
//! A sprite carries an optional image, a scale factor, a rotation, an anchor,
//! an optional position, and a visibility flag. Setters mark the sprite dirty
//! and invalidate its cached rendered image, which is rebuilt on the next
//! read. The bounding box is derived from the rendered image size, the
//! position, and the anchor.
//!
//! A composite sprite ([`Scene::create_composite`]) has children instead of an
//! image of its own. Scale, rotation, position and visibility changes on a
//! composite are applied to it and then to every descendant with the same
//! arguments; drawing a composite draws its children in order.
//!
//! # Groups
//!
//! A group is an unordered set of sprites. Membership is recorded on both
//! sides: the group maps each member to the region it covered at the last
//! draw, and each sprite knows which groups contain it. When a drawn sprite
//! leaves a group its region is kept as a *lost region* until the next draw,
//! so [`Scene::clear_group`] can erase it.

mod behavior;
mod frame;
mod group;
mod id;
mod member;
mod store;

pub use behavior::Behavior;
pub use id::{GroupId, SpriteId};
pub use member::Member;
pub use store::{Scene, SceneConfig, SpriteKind};
