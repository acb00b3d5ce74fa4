// Copyright 2026 the Tableau Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics for tableau frame passes.
//!
//! This crate provides [`TraceSink`](tableau_core::trace::TraceSink)
//! implementations for development:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.

pub mod pretty;
