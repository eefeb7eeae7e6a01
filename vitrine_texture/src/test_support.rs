// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas double for texture tests.

use kurbo::Rect;
use vitrine_core::canvas::{Canvas, Color, SaveFlags, Texture, TextureKey};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Draw {
        src: Rect,
        dst: Rect,
    },
    Mixed {
        src: Rect,
        dst: Rect,
        color: Color,
        ratio: f32,
    },
}

/// Records uploads and draws; ignores transforms.
#[derive(Debug, Default)]
pub(crate) struct UploadLog {
    pub(crate) uploads: Vec<(TextureKey, u32, u32)>,
    pub(crate) ops: Vec<Op>,
}

impl Canvas for UploadLog {
    fn translate(&mut self, _dx: f64, _dy: f64) {}

    fn scale(&mut self, _sx: f64, _sy: f64) {}

    fn multiply_alpha(&mut self, _alpha: f32) {}

    fn save(&mut self, _flags: SaveFlags) {}

    fn restore(&mut self) {}

    fn draw_texture(&mut self, _texture: &dyn Texture, src: Rect, dst: Rect) {
        self.ops.push(Op::Draw { src, dst });
    }

    fn draw_mixed(&mut self, _texture: &dyn Texture, color: Color, ratio: f32, src: Rect, dst: Rect) {
        self.ops.push(Op::Mixed {
            src,
            dst,
            color,
            ratio,
        });
    }

    fn upload_texture(&mut self, key: TextureKey, width: u32, height: u32, pixels: &[u32]) {
        assert_eq!(pixels.len(), width as usize * height as usize);
        self.uploads.push((key, width, height));
    }
}
