// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arguments accepted by batch membership operations.

use alloc::vec::Vec;

use super::id::{GroupId, SpriteId};

/// One or more sprites named in a membership operation.
///
/// [`Scene::group_add`](super::Scene::group_add),
/// [`group_remove`](super::Scene::group_remove) and
/// [`group_contains`](super::Scene::group_contains) flatten a `Member`
/// recursively: a [`Group`](Self::Group) stands for that group's current
/// members and [`Many`](Self::Many) for the union of its entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Member {
    /// A single sprite.
    Sprite(SpriteId),
    /// Every sprite currently in a group.
    Group(GroupId),
    /// A nested collection.
    Many(Vec<Member>),
}

impl From<SpriteId> for Member {
    fn from(id: SpriteId) -> Self {
        Self::Sprite(id)
    }
}

impl From<GroupId> for Member {
    fn from(id: GroupId) -> Self {
        Self::Group(id)
    }
}

impl From<&[SpriteId]> for Member {
    fn from(ids: &[SpriteId]) -> Self {
        Self::Many(ids.iter().copied().map(Self::Sprite).collect())
    }
}

impl<T: Into<Self>> From<Vec<T>> for Member {
    fn from(items: Vec<T>) -> Self {
        Self::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>, const N: usize> From<[T; N]> for Member {
    fn from(items: [T; N]) -> Self {
        Self::Many(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> FromIterator<T> for Member {
    fn from_iter<It: IntoIterator<Item = T>>(iter: It) -> Self {
        Self::Many(iter.into_iter().map(Into::into).collect())
    }
}
