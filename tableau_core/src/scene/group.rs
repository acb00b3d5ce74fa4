// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group membership: the two-sided sprite/group index and its lost regions.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kurbo::Rect;

use super::id::{GroupId, SpriteId};
use super::member::Member;
use super::store::Scene;

/// Per-group state.
#[derive(Clone, Debug, Default)]
pub(crate) struct Group {
    /// Members and the region each covered at its last draw (`None` until
    /// drawn, or when the draw produced nothing).
    pub(crate) members: HashMap<SpriteId, Option<Rect>>,
    /// Regions that held a member at the last draw but no longer do.
    pub(crate) lost: Vec<Rect>,
}

impl Group {
    /// Forgets `sprite`, keeping its last region for the next erase.
    fn detach(&mut self, sprite: SpriteId) -> bool {
        match self.members.remove(&sprite) {
            Some(region) => {
                self.lost.extend(region);
                true
            }
            None => false,
        }
    }
}

impl<I, A> Scene<I, A> {
    // -- Group lifecycle --

    /// Creates an empty group.
    pub fn create_group(&mut self) -> GroupId {
        let idx = if let Some(idx) = self.group_free_list.pop() {
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "group count is bounded well below u32::MAX in practice"
            )]
            let idx = self.groups.len() as u32;
            self.groups.push(Group::default());
            self.group_generation.push(0);
            idx
        };
        GroupId {
            idx,
            generation: self.group_generation[idx as usize],
        }
    }

    /// Creates a group already holding `members`.
    pub fn create_group_with(&mut self, members: impl Into<Member>) -> GroupId {
        let group = self.create_group();
        self.group_add(group, members);
        group
    }

    /// Creates a new group with the same members as `group`.
    ///
    /// Drawn and lost regions are not copied.
    pub fn copy_group(&mut self, group: GroupId) -> GroupId {
        self.create_group_with(Member::Group(group))
    }

    /// Destroys a group, freeing its slot for reuse.
    ///
    /// Members leave the group without recording lost regions.
    pub fn destroy_group(&mut self, group: GroupId) {
        self.validate_group(group);
        let i = group.idx as usize;
        let state = core::mem::take(&mut self.groups[i]);
        for sprite in state.members.into_keys() {
            self.memberships[sprite.idx as usize].remove(&group);
        }
        self.group_generation[i] += 1;
        self.group_free_list.push(group.idx);
    }

    /// Returns whether the given handle refers to a live group.
    #[must_use]
    pub fn is_group_alive(&self, group: GroupId) -> bool {
        (group.idx as usize) < self.groups.len()
            && self.group_generation[group.idx as usize] == group.generation
    }

    // -- Membership, group side --

    /// Adds sprites to a group.
    ///
    /// Sprites already in the group are left untouched, including their last
    /// drawn region.
    ///
    /// # Panics
    ///
    /// Panics if the group or any named sprite is stale.
    pub fn group_add(&mut self, group: GroupId, members: impl Into<Member>) {
        self.validate_group(group);
        for sprite in self.flatten(members.into()) {
            self.validate(sprite);
            let state = &mut self.groups[group.idx as usize];
            if !state.members.contains_key(&sprite) {
                state.members.insert(sprite, None);
                self.memberships[sprite.idx as usize].insert(group);
            }
        }
    }

    /// Removes sprites from a group.
    ///
    /// Each removed sprite's last drawn region is kept as a lost region so the
    /// next [`clear_group`](Self::clear_group) erases it. Non-members,
    /// including destroyed sprites, are ignored.
    pub fn group_remove(&mut self, group: GroupId, members: impl Into<Member>) {
        self.validate_group(group);
        for sprite in self.flatten(members.into()) {
            if self.is_alive(sprite) && self.groups[group.idx as usize].detach(sprite) {
                self.memberships[sprite.idx as usize].remove(&group);
            }
        }
    }

    /// Returns `true` if every named sprite is a member.
    ///
    /// Naming no sprites at all (an empty list or an empty group) yields
    /// `false`.
    #[must_use]
    pub fn group_contains(&self, group: GroupId, members: impl Into<Member>) -> bool {
        self.validate_group(group);
        let sprites = self.flatten(members.into());
        let state = &self.groups[group.idx as usize];
        !sprites.is_empty()
            && sprites
                .iter()
                .all(|s| self.is_alive(*s) && state.members.contains_key(s))
    }

    /// Removes every member without recording lost regions.
    ///
    /// Call [`clear_group`](Self::clear_group) first if the members' last
    /// drawn regions still need erasing.
    pub fn empty_group(&mut self, group: GroupId) {
        self.validate_group(group);
        let members = core::mem::take(&mut self.groups[group.idx as usize].members);
        for sprite in members.into_keys() {
            self.memberships[sprite.idx as usize].remove(&group);
        }
    }

    /// Returns the number of members.
    #[must_use]
    pub fn group_len(&self, group: GroupId) -> usize {
        self.validate_group(group);
        self.groups[group.idx as usize].members.len()
    }

    /// Returns `true` if the group has no members.
    ///
    /// Lost regions do not count as members.
    #[must_use]
    pub fn group_is_empty(&self, group: GroupId) -> bool {
        self.group_len(group) == 0
    }

    /// Iterates over the members in no particular order.
    pub fn group_sprites(&self, group: GroupId) -> impl Iterator<Item = SpriteId> + '_ {
        self.validate_group(group);
        self.groups[group.idx as usize].members.keys().copied()
    }

    /// Returns the regions waiting to be erased for sprites that left the
    /// group since its last draw.
    #[must_use]
    pub fn lost_regions(&self, group: GroupId) -> &[Rect] {
        self.validate_group(group);
        &self.groups[group.idx as usize].lost
    }

    /// Returns the region `sprite` covered at the group's last draw, or
    /// `None` if it is not a member or drew nothing.
    #[must_use]
    pub fn drawn_region(&self, group: GroupId, sprite: SpriteId) -> Option<Rect> {
        self.validate_group(group);
        self.groups[group.idx as usize]
            .members
            .get(&sprite)
            .copied()
            .flatten()
    }

    // -- Membership, sprite side --

    /// Adds `sprite` to `group`. Same as [`group_add`](Self::group_add).
    pub fn add_to_group(&mut self, sprite: SpriteId, group: GroupId) {
        self.group_add(group, sprite);
    }

    /// Removes `sprite` from `group`. Same as
    /// [`group_remove`](Self::group_remove).
    pub fn remove_from_group(&mut self, sprite: SpriteId, group: GroupId) {
        self.group_remove(group, sprite);
    }

    /// Adds `sprite` to each of `groups`.
    pub fn add_to_groups(&mut self, sprite: SpriteId, groups: impl IntoIterator<Item = GroupId>) {
        for group in groups {
            self.group_add(group, sprite);
        }
    }

    /// Removes `sprite` from each of `groups`.
    pub fn remove_from_groups(
        &mut self,
        sprite: SpriteId,
        groups: impl IntoIterator<Item = GroupId>,
    ) {
        for group in groups {
            self.group_remove(group, sprite);
        }
    }

    /// Removes the sprite from every group it belongs to.
    ///
    /// Each group keeps the sprite's last drawn region as a lost region. The
    /// sprite itself is unchanged and may join groups again.
    pub fn kill(&mut self, sprite: SpriteId) {
        self.validate(sprite);
        let groups = core::mem::take(&mut self.memberships[sprite.idx as usize]);
        for group in groups {
            self.groups[group.idx as usize].detach(sprite);
        }
    }

    /// Returns every group the sprite belongs to, in no particular order.
    #[must_use]
    pub fn groups_of(&self, sprite: SpriteId) -> Vec<GroupId> {
        self.validate(sprite);
        self.memberships[sprite.idx as usize].iter().copied().collect()
    }

    /// Returns `true` if the sprite belongs to at least one group.
    #[must_use]
    pub fn in_any_group(&self, sprite: SpriteId) -> bool {
        self.validate(sprite);
        !self.memberships[sprite.idx as usize].is_empty()
    }

    // -- Helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate_group(&self, group: GroupId) {
        assert!(
            self.is_group_alive(group),
            "stale GroupId: {group:?} (current gen: {})",
            self.group_generation
                .get(group.idx as usize)
                .copied()
                .unwrap_or(u32::MAX)
        );
    }

    /// Resolves a [`Member`] into the set of sprites it names.
    fn flatten(&self, member: Member) -> HashSet<SpriteId> {
        let mut out = HashSet::new();
        let mut stack = alloc::vec![member];
        while let Some(m) = stack.pop() {
            match m {
                Member::Sprite(id) => {
                    out.insert(id);
                }
                Member::Group(group) => {
                    self.validate_group(group);
                    out.extend(self.groups[group.idx as usize].members.keys().copied());
                }
                Member::Many(items) => stack.extend(items),
            }
        }
        out
    }
}
