// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single bordered tile.

use std::sync::{Arc, Weak};

use kurbo::Rect;
use vitrine_core::canvas::{Canvas, Texture, TextureKey};

use crate::bitmap::Bitmap;
use crate::pool::TilePool;
use crate::{BORDER_SIZE, TILE_SIZE};

/// Whether a tile's GPU texture holds its current content.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UploadState {
    /// Content not uploaded (or invalidated by recycling).
    #[default]
    NotLoaded,
    /// Content uploaded.
    Loaded,
}

/// A `TILE_SIZE` square texture holding up to `CONTENT_SIZE` square of a
/// source bitmap plus a one-pixel border.
///
/// Tiles are obtained from and returned to a [`TilePool`]; they are never
/// shared between two tiled textures at once.
pub struct Tile {
    key: TextureKey,
    pub(crate) offset_x: u32,
    pub(crate) offset_y: u32,
    pub(crate) content_width: u32,
    pub(crate) content_height: u32,
    pub(crate) bitmap: Option<Arc<Bitmap>>,
    pub(crate) state: UploadState,
    pool: Weak<TilePool>,
    pub(crate) next_free: Option<Box<Tile>>,
}

impl core::fmt::Debug for Tile {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tile")
            .field("key", &self.key)
            .field("offset", &(self.offset_x, self.offset_y))
            .field("content", &(self.content_width, self.content_height))
            .field("pending", &self.bitmap.is_some())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Tile {
    pub(crate) fn new(key: TextureKey, pool: Weak<TilePool>) -> Self {
        Self {
            key,
            offset_x: 0,
            offset_y: 0,
            content_width: 0,
            content_height: 0,
            bitmap: None,
            state: UploadState::NotLoaded,
            pool,
            next_free: None,
        }
    }

    /// Points the tile at a region of `bitmap`; its content is uploaded
    /// later.
    pub(crate) fn assign(&mut self, bitmap: Arc<Bitmap>, x: u32, y: u32, width: u32, height: u32) {
        self.offset_x = x;
        self.offset_y = y;
        self.content_width = width;
        self.content_height = height;
        self.bitmap = Some(bitmap);
        self.state = UploadState::NotLoaded;
    }

    /// Drops the pending bitmap and invalidates uploaded content.
    pub(crate) fn reset(&mut self) {
        self.bitmap = None;
        self.state = UploadState::NotLoaded;
    }

    /// Offset of the tile's content within the source bitmap.
    #[must_use]
    pub fn offset(&self) -> (u32, u32) {
        (self.offset_x, self.offset_y)
    }

    /// Size of the tile's true content, excluding the border.
    #[must_use]
    pub fn content_size(&self) -> (u32, u32) {
        (self.content_width, self.content_height)
    }

    /// Whether the tile still holds a bitmap waiting to be uploaded.
    #[must_use]
    pub fn has_pending_bitmap(&self) -> bool {
        self.bitmap.is_some()
    }

    /// Upload state of the tile.
    #[must_use]
    pub fn state(&self) -> UploadState {
        self.state
    }

    /// Physical texture side, identical for every tile.
    #[must_use]
    pub const fn texture_size(&self) -> u32 {
        TILE_SIZE
    }

    /// Consumes the pending bitmap, renders it through the pool's scratch
    /// buffer, and submits it.
    ///
    /// Returns `false` without side effects on the GPU when there is nothing
    /// to upload: the bitmap was already consumed (or the tile recycled), or
    /// the pool has been torn down.
    pub(crate) fn upload(&mut self, pool: &TilePool, canvas: &mut dyn Canvas) -> bool {
        let Some(bitmap) = self.bitmap.take() else {
            return false;
        };
        let uploaded = pool.with_scratch(|buffer| {
            buffer.render_tile(&bitmap, self.offset_x, self.offset_y);
            canvas.upload_texture(self.key, TILE_SIZE, TILE_SIZE, buffer.pixels());
        });
        if uploaded.is_some() {
            self.state = UploadState::Loaded;
        }
        uploaded.is_some()
    }

    /// Draws the whole tile, border included, with its top-left at `(x, y)`.
    pub(crate) fn draw_at(&self, canvas: &mut dyn Canvas, x: f64, y: f64) {
        let w = f64::from(self.width());
        let h = f64::from(self.height());
        canvas.draw_texture(self, Rect::new(0.0, 0.0, w, h), Rect::new(x, y, x + w, y + h));
    }
}

impl Texture for Tile {
    fn key(&self) -> TextureKey {
        self.key
    }

    fn width(&self) -> u32 {
        self.content_width + 2 * BORDER_SIZE
    }

    fn height(&self) -> u32 {
        self.content_height + 2 * BORDER_SIZE
    }

    fn is_opaque(&self) -> bool {
        false
    }

    fn is_loaded(&self) -> bool {
        self.state == UploadState::Loaded
    }

    fn trigger_upload(&mut self, canvas: &mut dyn Canvas) {
        if let Some(pool) = self.pool.upgrade() {
            self.upload(&pool, canvas);
        }
    }
}
