// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for vitrine
//! diagnostics.
//!
//! This crate provides [`TraceSink`](vitrine_core::trace::TraceSink)
//! implementations and other tools for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output,
//!   plus [`pretty::dump_tree`] for the view hierarchy.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//! - [`canvas::RecordingCanvas`]: a [`Canvas`](vitrine_core::canvas::Canvas)
//!   that records what a render pass draws instead of drawing it.

pub mod canvas;
pub mod chrome;
pub mod pretty;
pub mod recorder;
