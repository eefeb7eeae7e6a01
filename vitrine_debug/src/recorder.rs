// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! View handles are opaque outside the core crate, so touch-capture records
//! keep the raw slot index and generation.

use vitrine_core::time::HostTime;
use vitrine_core::trace::{
    PhaseBeginEvent, PhaseEndEvent, PhaseKind, RecycleEvent, RenderPassEvent, TileUploadEvent,
    TouchCaptureEvent, TraceSink, UploadOutcome,
};

const TAG_PHASE_BEGIN: u8 = 1;
const TAG_PHASE_END: u8 = 2;
const TAG_RENDER_PASS: u8 = 3;
const TAG_TILE_UPLOAD: u8 = 4;
const TAG_RECYCLE: u8 = 5;
const TAG_TOUCH_CAPTURE: u8 = 6;

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Layout => 0,
            PhaseKind::Render => 1,
            PhaseKind::Upload => 2,
        });
    }

    fn write_outcome(&mut self, o: UploadOutcome) {
        self.write_u8(match o {
            UploadOutcome::Uploaded => 0,
            UploadOutcome::Skipped => 1,
            UploadOutcome::AlreadyReady => 2,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.ticks());
    }

    fn on_render_pass(&mut self, e: &RenderPassEvent) {
        self.write_u8(TAG_RENDER_PASS);
        self.write_u64(e.frame_index);
        self.write_u32(e.views_rendered);
        self.write_u32(e.animations_running);
        self.write_u32(e.animations_finished);
    }

    fn on_tile_upload(&mut self, e: &TileUploadEvent) {
        self.write_u8(TAG_TILE_UPLOAD);
        self.write_u64(e.texture);
        self.write_u32(e.tile_index);
        self.write_outcome(e.outcome);
        self.write_u32(e.cursor);
        self.write_u32(e.tile_count);
    }

    fn on_texture_recycle(&mut self, e: &RecycleEvent) {
        self.write_u8(TAG_RECYCLE);
        self.write_u64(e.texture);
        self.write_u32(e.tiles_returned);
        self.write_u32(e.free_count);
    }

    fn on_touch_capture(&mut self, e: &TouchCaptureEvent) {
        self.write_u8(TAG_TOUCH_CAPTURE);
        self.write_u32(e.parent.index());
        self.write_u32(e.parent.generation());
        self.write_u32(e.child.index());
        self.write_u32(e.child.generation());
        self.write_u8(u8::from(e.captured));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`RenderPassEvent`].
    RenderPass(RenderPassEvent),
    /// A [`TileUploadEvent`].
    TileUpload(TileUploadEvent),
    /// A [`RecycleEvent`].
    Recycle(RecycleEvent),
    /// A [`TouchCaptureEvent`], with raw view handles.
    TouchCapture {
        /// Slot index of the capturing parent.
        parent_index: u32,
        /// Generation of the capturing parent.
        parent_generation: u32,
        /// Slot index of the captured child.
        child_index: u32,
        /// Generation of the captured child.
        child_generation: u32,
        /// `true` on capture, `false` on release.
        captured: bool,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Decoding stops at the first truncated record or unknown tag.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?;
        self.pos += N;
        bytes.try_into().ok()
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Layout,
            1 => PhaseKind::Render,
            _ => PhaseKind::Upload,
        })
    }

    fn read_outcome(&mut self) -> Option<UploadOutcome> {
        Some(match self.read_u8()? {
            0 => UploadOutcome::Uploaded,
            1 => UploadOutcome::Skipped,
            _ => UploadOutcome::AlreadyReady,
        })
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_render_pass(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::RenderPass(RenderPassEvent {
            frame_index: self.read_u64()?,
            views_rendered: self.read_u32()?,
            animations_running: self.read_u32()?,
            animations_finished: self.read_u32()?,
        }))
    }

    fn decode_tile_upload(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TileUpload(TileUploadEvent {
            texture: self.read_u64()?,
            tile_index: self.read_u32()?,
            outcome: self.read_outcome()?,
            cursor: self.read_u32()?,
            tile_count: self.read_u32()?,
        }))
    }

    fn decode_recycle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Recycle(RecycleEvent {
            texture: self.read_u64()?,
            tiles_returned: self.read_u32()?,
            free_count: self.read_u32()?,
        }))
    }

    fn decode_touch_capture(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TouchCapture {
            parent_index: self.read_u32()?,
            parent_generation: self.read_u32()?,
            child_index: self.read_u32()?,
            child_generation: self.read_u32()?,
            captured: self.read_u8()? != 0,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_RENDER_PASS => self.decode_render_pass(),
            TAG_TILE_UPLOAD => self.decode_tile_upload(),
            TAG_RECYCLE => self.decode_recycle(),
            TAG_TOUCH_CAPTURE => self.decode_touch_capture(),
            _ => None,
        }
    }
}
