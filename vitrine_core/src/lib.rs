// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph and drawing contracts for a touch-driven GL gallery UI.
//!
//! `vitrine_core` is `no_std` compatible (with `alloc`). It holds the view
//! tree and the collaborator contracts the tree is driven through; the GL
//! context, the frame clock and the render request queue live with the
//! embedder behind [`RootController`](root::RootController).
//!
//! # Architecture
//!
//! ```text
//!   RootController (frame clock, GL thread)
//!       │ render(now)                    ▲ request_render / request_layout
//!       ▼                                │
//!   ViewTree ──► ViewBehavior hooks ──► Canvas ──► Texture
//!       ▲
//!       │ dispatch_touch_event
//!   TouchEvent (input thread)
//! ```
//!
//! **[`view`]**: Struct-of-arrays view tree with generational handles:
//! measurement, layout, render traversal, touch capture, root attachment.
//!
//! **[`animation`]**: The [`CanvasAnimation`](animation::CanvasAnimation)
//! contract applied during render, plus fade and scale animations.
//!
//! **[`canvas`]**: The [`Canvas`](canvas::Canvas) and
//! [`Texture`](canvas::Texture) capabilities drawing is delegated to.
//!
//! **[`root`]**: The root controller contract and the scoped
//! [`RenderLock`](root::RenderLock).
//!
//! **[`input`]**: Touch events.
//!
//! **[`time`]**: Host time, durations and timebase conversion.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod animation;
pub mod canvas;
pub mod input;
pub mod root;
pub mod time;
pub mod trace;
pub mod view;
