// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A canvas that records instead of drawing.
//!
//! [`RecordingCanvas`] keeps the transform and alpha state a real canvas
//! would, so each recorded draw carries the device-space rectangle and the
//! effective alpha it would have been drawn with.

use kurbo::{Rect, Vec2};
use vitrine_core::canvas::{Canvas, Color, SaveFlags, Texture, TextureKey};

/// One recorded canvas operation.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasOp {
    /// [`Canvas::translate`].
    Translate(Vec2),
    /// [`Canvas::scale`].
    Scale(Vec2),
    /// [`Canvas::multiply_alpha`].
    MultiplyAlpha(f32),
    /// [`Canvas::save`].
    Save(SaveFlags),
    /// [`Canvas::restore`].
    Restore,
    /// [`Canvas::draw_texture`].
    Draw(DrawOp),
    /// [`Canvas::draw_mixed`].
    Mixed {
        /// The texture draw.
        draw: DrawOp,
        /// Blend color.
        color: Color,
        /// Blend ratio.
        ratio: f32,
    },
    /// [`Canvas::upload_texture`].
    Upload {
        /// Texture receiving the pixels.
        key: TextureKey,
        /// Width of the submitted pixels.
        width: u32,
        /// Height of the submitted pixels.
        height: u32,
    },
}

/// A recorded texture draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawOp {
    /// Texture drawn.
    pub key: TextureKey,
    /// Source rectangle in texture space.
    pub src: Rect,
    /// Destination rectangle as passed in, in current local space.
    pub dst: Rect,
    /// Destination rectangle after the current transform.
    pub device: Rect,
    /// Effective alpha.
    pub alpha: f32,
    /// Whether the texture was loaded; an unloaded draw produces nothing on
    /// a real canvas.
    pub loaded: bool,
}

#[derive(Clone, Copy, Debug)]
struct State {
    origin: Vec2,
    scale: Vec2,
    alpha: f32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            origin: Vec2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            alpha: 1.0,
        }
    }
}

/// A [`Canvas`] that records every call as a [`CanvasOp`].
///
/// Uploaded pixels are not kept, only their dimensions; use
/// [`last_upload`](Self::last_upload) to inspect the most recent one.
///
/// # Panics
///
/// [`restore`](Canvas::restore) panics when there is no matching
/// [`save`](Canvas::save).
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<CanvasOp>,
    state: State,
    stack: Vec<(SaveFlags, State)>,
    last_upload: Vec<u32>,
}

impl RecordingCanvas {
    /// Creates an empty recording with identity transform and full alpha.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded operations, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[CanvasOp] {
        &self.ops
    }

    /// Takes the recorded operations, leaving the state untouched.
    pub fn take_ops(&mut self) -> Vec<CanvasOp> {
        std::mem::take(&mut self.ops)
    }

    /// Every recorded draw, plain or mixed, in order.
    pub fn draws(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter_map(|op| match op {
            CanvasOp::Draw(draw) | CanvasOp::Mixed { draw, .. } => Some(draw),
            _ => None,
        })
    }

    /// Number of recorded uploads.
    #[must_use]
    pub fn upload_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, CanvasOp::Upload { .. }))
            .count()
    }

    /// Pixels of the most recent upload.
    #[must_use]
    pub fn last_upload(&self) -> &[u32] {
        &self.last_upload
    }

    /// Number of saves not yet restored.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Current translation, in device space.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.state.origin
    }

    /// Current effective alpha.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.state.alpha
    }

    fn to_device(&self, r: Rect) -> Rect {
        let s = self.state;
        Rect::new(
            s.origin.x + r.x0 * s.scale.x,
            s.origin.y + r.y0 * s.scale.y,
            s.origin.x + r.x1 * s.scale.x,
            s.origin.y + r.y1 * s.scale.y,
        )
    }

    fn draw_op(&self, texture: &dyn Texture, src: Rect, dst: Rect) -> DrawOp {
        DrawOp {
            key: texture.key(),
            src,
            dst,
            device: self.to_device(dst),
            alpha: self.state.alpha,
            loaded: texture.is_loaded(),
        }
    }
}

impl Canvas for RecordingCanvas {
    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.origin += Vec2::new(dx * self.state.scale.x, dy * self.state.scale.y);
        self.ops.push(CanvasOp::Translate(Vec2::new(dx, dy)));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.scale = Vec2::new(self.state.scale.x * sx, self.state.scale.y * sy);
        self.ops.push(CanvasOp::Scale(Vec2::new(sx, sy)));
    }

    fn multiply_alpha(&mut self, alpha: f32) {
        self.state.alpha *= alpha;
        self.ops.push(CanvasOp::MultiplyAlpha(alpha));
    }

    fn save(&mut self, flags: SaveFlags) {
        self.stack.push((flags, self.state));
        self.ops.push(CanvasOp::Save(flags));
    }

    fn restore(&mut self) {
        let Some((flags, saved)) = self.stack.pop() else {
            panic!("restore without a matching save");
        };
        if flags.matrix {
            self.state.origin = saved.origin;
            self.state.scale = saved.scale;
        }
        if flags.alpha {
            self.state.alpha = saved.alpha;
        }
        self.ops.push(CanvasOp::Restore);
    }

    fn draw_texture(&mut self, texture: &dyn Texture, src: Rect, dst: Rect) {
        let draw = self.draw_op(texture, src, dst);
        self.ops.push(CanvasOp::Draw(draw));
    }

    fn draw_mixed(
        &mut self,
        texture: &dyn Texture,
        color: Color,
        ratio: f32,
        src: Rect,
        dst: Rect,
    ) {
        let draw = self.draw_op(texture, src, dst);
        self.ops.push(CanvasOp::Mixed { draw, color, ratio });
    }

    fn upload_texture(&mut self, key: TextureKey, width: u32, height: u32, pixels: &[u32]) {
        self.last_upload.clear();
        self.last_upload.extend_from_slice(pixels);
        self.ops.push(CanvasOp::Upload { key, width, height });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Solid {
        loaded: bool,
    }

    impl Texture for Solid {
        fn key(&self) -> TextureKey {
            TextureKey(42)
        }
        fn width(&self) -> u32 {
            8
        }
        fn height(&self) -> u32 {
            8
        }
        fn is_opaque(&self) -> bool {
            true
        }
        fn is_loaded(&self) -> bool {
            self.loaded
        }
        fn trigger_upload(&mut self, _canvas: &mut dyn Canvas) {
            self.loaded = true;
        }
    }

    #[test]
    fn draws_carry_transform_and_alpha() {
        let mut canvas = RecordingCanvas::new();
        let tex = Solid { loaded: true };
        canvas.translate(10.0, 20.0);
        canvas.save(SaveFlags::ALL);
        canvas.scale(2.0, 2.0);
        canvas.translate(5.0, 0.0);
        canvas.multiply_alpha(0.5);
        canvas.draw_texture(&tex, Rect::new(0.0, 0.0, 8.0, 8.0), Rect::new(0.0, 0.0, 8.0, 8.0));

        let draw = *canvas.draws().next().unwrap();
        assert_eq!(draw.device, Rect::new(20.0, 20.0, 36.0, 36.0));
        assert_eq!(draw.alpha, 0.5);
        assert!(draw.loaded);

        canvas.restore();
        assert_eq!(canvas.translation(), Vec2::new(10.0, 20.0), "restored");
        assert_eq!(canvas.alpha(), 1.0);
        assert_eq!(canvas.save_depth(), 0);
    }

    #[test]
    fn restore_only_resets_saved_parts() {
        let mut canvas = RecordingCanvas::new();
        canvas.save(SaveFlags::ALPHA);
        canvas.translate(3.0, 4.0);
        canvas.multiply_alpha(0.25);
        canvas.restore();
        assert_eq!(canvas.translation(), Vec2::new(3.0, 4.0), "matrix was not saved");
        assert_eq!(canvas.alpha(), 1.0, "alpha was saved");
    }

    #[test]
    fn unloaded_and_mixed_draws_are_recorded() {
        let mut canvas = RecordingCanvas::new();
        let tex = Solid { loaded: false };
        let r = Rect::new(0.0, 0.0, 1.0, 1.0);
        canvas.draw_mixed(&tex, Color::WHITE, 0.3, r, r);
        canvas.upload_texture(TextureKey(42), 1, 2, &[7, 8]);

        assert!(!canvas.draws().next().unwrap().loaded);
        assert_eq!(canvas.upload_count(), 1);
        assert_eq!(canvas.last_upload(), &[7, 8]);
        assert!(matches!(canvas.ops()[0], CanvasOp::Mixed { ratio, .. } if ratio == 0.3));
    }

    #[test]
    #[should_panic(expected = "restore without a matching save")]
    fn unbalanced_restore_panics() {
        RecordingCanvas::new().restore();
    }
}
