// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! The view tree and the texture manager never emit events themselves: their
//! operations return plain statistics ([`RenderStats`], upload steps, recycle
//! counts) and the frame loop that drives them forwards those to a
//! [`TraceSink`]. All sink methods default to no-ops.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::time::HostTime;
use crate::view::{RenderStats, ViewId};

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of a frame is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Measure and layout of the content pane.
    Layout,
    /// Render traversal of the view tree.
    Render,
    /// Incremental texture upload.
    Upload,
}

impl PhaseKind {
    /// Short lowercase label, used by text and JSON exporters.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Render => "render",
            Self::Upload => "upload",
        }
    }
}

/// What a single upload step did with the tile under the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UploadOutcome {
    /// The tile's pending pixels were copied and submitted.
    Uploaded,
    /// The tile's pixels were already consumed (or recycled); nothing to do.
    Skipped,
    /// Every tile was already uploaded; the cursor did not move.
    AlreadyReady,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted at the start of a frame phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Which phase.
    pub phase: PhaseKind,
    /// When the phase began.
    pub timestamp: HostTime,
}

/// Emitted at the end of a frame phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Which phase.
    pub phase: PhaseKind,
    /// When the phase ended.
    pub timestamp: HostTime,
}

/// Emitted after a render traversal.
#[derive(Clone, Copy, Debug)]
pub struct RenderPassEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Number of views whose render ran.
    pub views_rendered: u32,
    /// Animations still running after this pass.
    pub animations_running: u32,
    /// Animations that finished and were detached in this pass.
    pub animations_finished: u32,
}

impl RenderPassEvent {
    /// Builds the event from the statistics a render pass returned.
    #[must_use]
    pub fn new(frame_index: u64, stats: &RenderStats) -> Self {
        Self {
            frame_index,
            views_rendered: stats.views_rendered,
            animations_running: stats.animations_running,
            animations_finished: stats.animations_finished,
        }
    }
}

/// Emitted after one incremental upload step of a tiled texture.
#[derive(Clone, Copy, Debug)]
pub struct TileUploadEvent {
    /// Identity of the tiled texture.
    pub texture: u64,
    /// Index of the tile the step looked at.
    pub tile_index: u32,
    /// What the step did.
    pub outcome: UploadOutcome,
    /// Upload cursor after the step.
    pub cursor: u32,
    /// Total number of tiles.
    pub tile_count: u32,
}

/// Emitted when a tiled texture returns its tiles to the pool.
#[derive(Clone, Copy, Debug)]
pub struct RecycleEvent {
    /// Identity of the tiled texture.
    pub texture: u64,
    /// Number of tiles returned by this call.
    pub tiles_returned: u32,
    /// Length of the shared free list afterwards.
    pub free_count: u32,
}

/// Emitted when a view gains or loses its touch-captured child.
#[derive(Clone, Copy, Debug)]
pub struct TouchCaptureEvent {
    /// The view holding the capture slot.
    pub parent: ViewId,
    /// The child that was captured or released.
    pub child: ViewId,
    /// `true` on capture, `false` on release.
    pub captured: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receiver for frame-loop diagnostics.
pub trait TraceSink {
    /// A phase began.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// A phase ended.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// A render traversal completed.
    fn on_render_pass(&mut self, e: &RenderPassEvent) {
        _ = e;
    }

    /// A tiled texture advanced its upload.
    fn on_tile_upload(&mut self, e: &TileUploadEvent) {
        _ = e;
    }

    /// A tiled texture was recycled.
    fn on_texture_recycle(&mut self, e: &RecycleEvent) {
        _ = e;
    }

    /// A touch capture changed.
    fn on_touch_capture(&mut self, e: &TouchCaptureEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A sink that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Optional, feature-gated handle to a [`TraceSink`].
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

macro_rules! forward {
    ($(#[$doc:meta])* $name:ident, $method:ident, $event:ty) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that forwards to `sink`.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer with no sink.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Forwards a [`PhaseBeginEvent`].
        phase_begin, on_phase_begin, PhaseBeginEvent
    );
    forward!(
        /// Forwards a [`PhaseEndEvent`].
        phase_end, on_phase_end, PhaseEndEvent
    );
    forward!(
        /// Forwards a [`RenderPassEvent`].
        render_pass, on_render_pass, RenderPassEvent
    );
    forward!(
        /// Forwards a [`TileUploadEvent`].
        tile_upload, on_tile_upload, TileUploadEvent
    );
    forward!(
        /// Forwards a [`RecycleEvent`].
        texture_recycle, on_texture_recycle, RecycleEvent
    );
    forward!(
        /// Forwards a [`TouchCaptureEvent`].
        touch_capture, on_touch_capture, TouchCaptureEvent
    );
}
