// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for fallible sprite operations.
//!
//! Setters validate their input before touching any state, so an `Err` always
//! means nothing changed. Membership operations never fail; drawing a sprite
//! that cannot be drawn is skipped rather than reported.

use alloc::boxed::Box;

use thiserror::Error;

/// Broad classification of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed a value outside the accepted domain.
    InvalidArgument,
    /// The sprite is not in a state where the request can be answered.
    InvalidState,
    /// The graphics backend could not load or decode an image.
    AssetLoadFailure,
}

/// Errors produced by sprite setters and queries.
#[derive(Debug, Error)]
pub enum Error {
    /// Scale factors must be finite and strictly positive.
    #[error("scale factor must be positive, got {0}")]
    NonPositiveScale(f64),

    /// An explicit anchor offset had a non-finite component.
    #[error("anchor offset must be finite")]
    MalformedAnchor,

    /// A named anchor or bounding box was resolved before any image was set.
    #[error("sprite has no image")]
    NoImage,

    /// The bounding box was requested before the sprite was given a position.
    #[error("sprite has not been placed")]
    NotPlaced,

    /// An image could not be loaded; the backend's error is the source.
    #[error("failed to load asset")]
    AssetLoad(#[source] Box<dyn core::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wraps a backend loading error.
    pub fn asset_load(source: impl core::error::Error + Send + Sync + 'static) -> Self {
        Self::AssetLoad(Box::new(source))
    }

    /// Returns the broad kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NonPositiveScale(_) | Self::MalformedAnchor => ErrorKind::InvalidArgument,
            Self::NoImage | Self::NotPlaced => ErrorKind::InvalidState,
            Self::AssetLoad(_) => ErrorKind::AssetLoadFailure,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
