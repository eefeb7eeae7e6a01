// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to microseconds using a [`Timebase`].
//!
//! [`dump_tree`] prints a view hierarchy, one view per line.

use std::io::{self, Write};

use vitrine_core::time::{HostTime, Timebase};
use vitrine_core::trace::{
    PhaseBeginEvent, PhaseEndEvent, RecycleEvent, RenderPassEvent, TileUploadEvent,
    TouchCaptureEvent, TraceSink,
};
use vitrine_core::view::{ViewId, ViewTree};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self {
            writer: Box::new(io::stderr()),
            timebase,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self { writer, timebase }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn host_us(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1000.0
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.label(),
            self.host_us(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.1}µs",
            e.frame_index,
            e.phase.label(),
            self.host_us(e.timestamp),
        );
    }

    fn on_render_pass(&mut self, e: &RenderPassEvent) {
        let _ = writeln!(
            self.writer,
            "[render] frame={} views={} running={} finished={}",
            e.frame_index, e.views_rendered, e.animations_running, e.animations_finished,
        );
    }

    fn on_tile_upload(&mut self, e: &TileUploadEvent) {
        let _ = writeln!(
            self.writer,
            "[upload] texture={} tile={} {:?} {}/{}",
            e.texture, e.tile_index, e.outcome, e.cursor, e.tile_count,
        );
    }

    fn on_texture_recycle(&mut self, e: &RecycleEvent) {
        let _ = writeln!(
            self.writer,
            "[recycle] texture={} returned={} free={}",
            e.texture, e.tiles_returned, e.free_count,
        );
    }

    fn on_touch_capture(&mut self, e: &TouchCaptureEvent) {
        let verb = if e.captured { "capture" } else { "release" };
        let _ = writeln!(
            self.writer,
            "[touch] {verb} parent={:?} child={:?}",
            e.parent, e.child,
        );
    }
}

/// Writes the hierarchy rooted at `id`, one view per line, indented with
/// four dots per level.
///
/// # Panics
///
/// Panics if `id` is stale.
pub fn dump_tree(tree: &ViewTree, id: ViewId, writer: &mut dyn Write) -> io::Result<()> {
    dump_level(tree, id, 0, writer)
}

fn dump_level(tree: &ViewTree, id: ViewId, depth: usize, writer: &mut dyn Write) -> io::Result<()> {
    writeln!(writer, "{}{}", "....".repeat(depth), tree.name(id))?;
    for child in tree.children(id) {
        dump_level(tree, child, depth + 1, writer)?;
    }
    Ok(())
}
