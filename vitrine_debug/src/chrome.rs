// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Frame phases become duration events on thread 0. Texture events carry no
//! timestamp of their own; they are stamped with the most recent phase
//! timestamp and placed on thread 1 so they line up under the upload phase
//! that produced them. Touch captures go on thread 2.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use vitrine_core::time::Timebase;

use crate::recorder::{RecordedEvent, decode};

const TID_FRAME: u32 = 0;
const TID_TEXTURE: u32 = 1;
const TID_INPUT: u32 = 2;

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut last_ts = 0.0;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::PhaseBegin(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "B",
                    "name": e.phase.label(),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FRAME,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                last_ts = ticks_to_us(e.timestamp.ticks(), timebase);
                events.push(json!({
                    "ph": "E",
                    "name": e.phase.label(),
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FRAME,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::RenderPass(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "RenderPass",
                    "cat": "Frame",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_FRAME,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "views_rendered": e.views_rendered,
                        "animations_running": e.animations_running,
                        "animations_finished": e.animations_finished,
                    }
                }));
            }
            RecordedEvent::TileUpload(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "TileUpload",
                    "cat": "Texture",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_TEXTURE,
                    "s": "t",
                    "args": {
                        "texture": e.texture,
                        "tile_index": e.tile_index,
                        "outcome": format!("{:?}", e.outcome),
                        "cursor": e.cursor,
                        "tile_count": e.tile_count,
                    }
                }));
            }
            RecordedEvent::Recycle(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Recycle",
                    "cat": "Texture",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_TEXTURE,
                    "s": "t",
                    "args": {
                        "texture": e.texture,
                        "tiles_returned": e.tiles_returned,
                        "free_count": e.free_count,
                    }
                }));
            }
            RecordedEvent::TouchCapture {
                parent_index,
                child_index,
                captured,
                ..
            } => {
                events.push(json!({
                    "ph": "i",
                    "name": if captured { "Capture" } else { "Release" },
                    "cat": "Input",
                    "ts": last_ts,
                    "pid": 0,
                    "tid": TID_INPUT,
                    "s": "t",
                    "args": {
                        "parent": parent_index,
                        "child": child_index,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn ticks_to_us(ticks: u64, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(ticks) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use vitrine_core::time::HostTime;
    use vitrine_core::trace::{
        PhaseBeginEvent, PhaseEndEvent, PhaseKind, TileUploadEvent, TraceSink, UploadOutcome,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 0,
            phase: PhaseKind::Upload,
            timestamp: HostTime(2_000_000),
        });
        rec.on_tile_upload(&TileUploadEvent {
            texture: 1,
            tile_index: 0,
            outcome: UploadOutcome::Uploaded,
            cursor: 1,
            tile_count: 2,
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 0,
            phase: PhaseKind::Upload,
            timestamp: HostTime(2_500_000),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["ph"], "B");
        assert_eq!(parsed[0]["name"], "upload");
        assert_eq!(parsed[0]["ts"], 2000.0);

        assert_eq!(parsed[1]["ph"], "i");
        assert_eq!(parsed[1]["name"], "TileUpload");
        assert_eq!(parsed[1]["ts"], 2000.0, "stamped with the enclosing phase");
        assert_eq!(parsed[1]["tid"], TID_TEXTURE);
        assert_eq!(parsed[1]["args"]["outcome"], "Uploaded");

        assert_eq!(parsed[2]["ph"], "E");
        assert_eq!(parsed[2]["ts"], 2500.0);
    }

    #[test]
    fn millisecond_timebase_scales_timestamps() {
        let mut rec = RecorderSink::new();
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 1,
            phase: PhaseKind::Render,
            timestamp: HostTime(16),
        });
        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::MILLIS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["ts"], 16_000.0);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert!(parsed.is_empty(), "no events, empty array");
    }
}
