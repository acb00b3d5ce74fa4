// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles for sprites and groups.
//!
//! A handle is a slot number paired with the generation the slot had when
//! the handle was issued. Destroying a sprite or group bumps its slot's
//! generation, so handles kept past that point stop resolving even after the
//! slot is handed out again.

use core::fmt;

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) idx: u32,
            pub(crate) generation: u32,
        }

        impl $name {
            /// Slot number. Only meaningful next to [`generation`](Self::generation).
            #[inline]
            #[must_use]
            pub const fn index(self) -> u32 {
                self.idx
            }

            /// Generation of the slot when this handle was issued.
            #[inline]
            #[must_use]
            pub const fn generation(self) -> u32 {
                self.generation
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}.{})", stringify!($name), self.idx, self.generation)
            }
        }
    };
}

handle! {
    /// Names a sprite in a [`Scene`](super::Scene).
    ///
    /// Cheap to copy and hash; groups key their members by it.
    SpriteId
}

handle! {
    /// Names a group in a [`Scene`](super::Scene). Groups have their own
    /// slots, independent of sprites.
    GroupId
}
