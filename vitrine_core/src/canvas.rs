// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing-surface contract.
//!
//! The scene graph and the tiled-texture manager never touch the GPU
//! themselves. They describe what to draw through a [`Canvas`], which a
//! backend implements on top of its GL context, and they identify pixel
//! sources through the [`Texture`] capability.
//!
//! All rectangles are `kurbo::Rect` in canvas units. Source rectangles are
//! in the texture's own pixel space; destination rectangles are in the
//! canvas space current at the time of the call (after any
//! [`translate`](Canvas::translate) and [`scale`](Canvas::scale)).

use core::fmt;

use kurbo::Rect;

/// Which parts of the canvas state [`Canvas::save`] must preserve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SaveFlags {
    /// Save the current transform (translation and scale).
    pub matrix: bool,
    /// Save the current alpha multiplier.
    pub alpha: bool,
}

impl SaveFlags {
    /// Save nothing.
    pub const NONE: Self = Self {
        matrix: false,
        alpha: false,
    };
    /// Save only the transform.
    pub const MATRIX: Self = Self {
        matrix: true,
        alpha: false,
    };
    /// Save only the alpha multiplier.
    pub const ALPHA: Self = Self {
        matrix: false,
        alpha: true,
    };
    /// Save everything.
    pub const ALL: Self = Self {
        matrix: true,
        alpha: true,
    };

    /// Returns the union of two flag sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            matrix: self.matrix || other.matrix,
            alpha: self.alpha || other.alpha,
        }
    }
}

/// A non-premultiplied ARGB color packed as `0xAARRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    /// Opaque black.
    pub const BLACK: Self = Self(0xFF00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xFFFF_FFFF);

    /// Packs the given channels.
    #[must_use]
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    /// Returns the alpha channel.
    #[must_use]
    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color(#{:08X})", self.0)
    }
}

/// Opaque identity of a GPU texture object.
///
/// Keys are assigned by whoever creates the texture (the tile pool assigns
/// one per tile) and passed through to the canvas without interpretation.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureKey(pub u64);

impl fmt::Debug for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TextureKey({})", self.0)
    }
}

/// A drawable unit backed by a GPU texture.
pub trait Texture {
    /// Identity of the backing texture object.
    fn key(&self) -> TextureKey;

    /// Drawable width in pixels.
    fn width(&self) -> u32;

    /// Drawable height in pixels.
    fn height(&self) -> u32;

    /// Whether every pixel is fully opaque, allowing blending to be skipped.
    fn is_opaque(&self) -> bool;

    /// Whether the texture content has been uploaded.
    ///
    /// A canvas must not sample a texture that is not loaded; such a draw
    /// produces nothing.
    fn is_loaded(&self) -> bool;

    /// Uploads any pending content through `canvas`.
    ///
    /// Does nothing when there is no pending content.
    fn trigger_upload(&mut self, canvas: &mut dyn Canvas);
}

/// The drawing surface the scene graph renders into.
///
/// A canvas keeps a stack of saved states. Every [`save`](Self::save) must
/// be balanced by one [`restore`](Self::restore).
pub trait Canvas {
    /// Offsets subsequent drawing by `(dx, dy)`.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Scales subsequent drawing by `(sx, sy)` about the current origin.
    fn scale(&mut self, sx: f64, sy: f64);

    /// Multiplies the current alpha by `alpha` (0.0–1.0).
    fn multiply_alpha(&mut self, alpha: f32);

    /// Pushes the parts of the current state named by `flags`.
    fn save(&mut self, flags: SaveFlags);

    /// Pops the most recently saved state.
    fn restore(&mut self);

    /// Draws the `src` region of `texture` into `dst`.
    fn draw_texture(&mut self, texture: &dyn Texture, src: Rect, dst: Rect);

    /// Draws the `src` region of `texture` into `dst`, blended with a flat
    /// color: `texture * (1 - ratio) + color * ratio`.
    fn draw_mixed(
        &mut self,
        texture: &dyn Texture,
        color: Color,
        ratio: f32,
        src: Rect,
        dst: Rect,
    );

    /// Uploads `pixels` (premultiplied ARGB, row-major, `width * height`
    /// entries) as the full content of the texture `key`.
    fn upload_texture(&mut self, key: TextureKey, width: u32, height: u32, pixels: &[u32]);
}
