// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Source bitmaps and the tile-sized upload surface.

use crate::{BORDER_SIZE, TILE_SIZE};

/// An immutable, decoded image: premultiplied ARGB, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl core::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Bitmap({}x{})", self.width, self.height)
    }
}

impl Bitmap {
    /// Wraps decoded pixels.
    ///
    /// # Panics
    ///
    /// Panics if `pixels.len() != width * height`.
    #[must_use]
    pub fn new(width: u32, height: u32, pixels: Vec<u32>) -> Self {
        assert_eq!(
            pixels.len(),
            width as usize * height as usize,
            "pixel count does not match {width}x{height}"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Creates a bitmap filled with one color.
    #[must_use]
    pub fn filled(width: u32, height: u32, argb: u32) -> Self {
        Self::new(width, height, vec![argb; width as usize * height as usize])
    }

    /// Creates a bitmap whose pixels are computed from their coordinates.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u32) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(f(x, y));
            }
        }
        Self::new(width, height, pixels)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// All pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }
}

/// The `TILE_SIZE` square scratch surface a tile is rendered into before
/// upload.
///
/// Shared by every tile of a pool; contents from a previous tile are only
/// overwritten where the next tile samples.
#[derive(Clone)]
pub struct UploadBuffer {
    pixels: Vec<u32>,
}

impl core::fmt::Debug for UploadBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("UploadBuffer").finish_non_exhaustive()
    }
}

impl Default for UploadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

const SIDE: usize = TILE_SIZE as usize;

impl UploadBuffer {
    /// Creates a transparent buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pixels: vec![0; SIDE * SIDE],
        }
    }

    /// The buffer's pixels, row-major, `TILE_SIZE` wide.
    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at `(x, y)` of the buffer.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * SIDE + x as usize]
    }

    /// Renders the tile whose content starts at `(offset_x, offset_y)` of
    /// `bitmap`.
    ///
    /// The bitmap is copied so that its pixel `(offset_x, offset_y)` lands at
    /// `(BORDER_SIZE, BORDER_SIZE)`, which includes a one-pixel apron of the
    /// neighboring content. Where the image ends inside the buffer the apron
    /// is cleared to transparent.
    pub fn render_tile(&mut self, bitmap: &Bitmap, offset_x: u32, offset_y: u32) {
        let x = i64::from(BORDER_SIZE) - i64::from(offset_x);
        let y = i64::from(BORDER_SIZE) - i64::from(offset_y);
        let right = i64::from(bitmap.width()) + x;
        let bottom = i64::from(bitmap.height()) + y;
        let side = i64::from(TILE_SIZE);

        let col0 = x.max(0);
        let col1 = right.min(side);
        let row0 = y.max(0);
        let row1 = bottom.min(side);
        if col0 < col1 {
            let stride = bitmap.width() as usize;
            for row in row0..row1 {
                let src_row = clamp_index(row - y);
                let src_start = src_row * stride + clamp_index(col0 - x);
                let len = clamp_index(col1 - col0);
                let dst_start = clamp_index(row) * SIDE + clamp_index(col0);
                self.pixels[dst_start..dst_start + len]
                    .copy_from_slice(&bitmap.pixels()[src_start..src_start + len]);
            }
        }

        if x > 0 {
            self.clear_col(x - 1);
        }
        if y > 0 {
            self.clear_row(y - 1);
        }
        if right < side {
            self.clear_col(right);
        }
        if bottom < side {
            self.clear_row(bottom);
        }
    }

    fn clear_col(&mut self, col: i64) {
        let col = clamp_index(col);
        for row in 0..SIDE {
            self.pixels[row * SIDE + col] = 0;
        }
    }

    fn clear_row(&mut self, row: i64) {
        let start = clamp_index(row) * SIDE;
        self.pixels[start..start + SIDE].fill(0);
    }
}

/// Converts a coordinate already known to be in `0..TILE_SIZE` (or a source
/// index already known to be non-negative) to an index.
fn clamp_index(v: i64) -> usize {
    usize::try_from(v.max(0)).unwrap_or(0)
}
