// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pooled, incrementally uploaded tiled textures.
//!
//! A [`TiledTexture`] splits a large [`Bitmap`] into `CONTENT_SIZE` square
//! tiles, each uploaded as a `TILE_SIZE` square texture with a
//! `BORDER_SIZE` apron on every side so bilinear sampling never bleeds
//! across a seam. Tiles come from a shared [`TilePool`] and return to it on
//! recycle, so textures of different images reuse the same GPU objects.
//!
//! ```text
//!   Bitmap ──► TiledTexture::new ──► [Tile; n] ◄──► TilePool (free list)
//!                    │
//!                    │ upload_next_tile (one tile per frame)
//!                    ▼
//!              UploadBuffer ──► Canvas::upload_texture
//! ```
//!
//! Drawing maps each tile's content rectangle into the target rectangle and
//! hands the [`Tile`] to the [`Canvas`](vitrine_core::canvas::Canvas) as a
//! [`Texture`](vitrine_core::canvas::Texture); tiles not yet uploaded are
//! drawn as transparent by the canvas.

mod bitmap;
mod pool;
#[cfg(test)]
mod test_support;
mod tile;
mod tiled;
mod view;

pub use bitmap::{Bitmap, UploadBuffer};
pub use pool::TilePool;
pub use tile::{Tile, UploadState};
pub use tiled::{RecycleStats, TiledTexture, UploadStep};
pub use view::TiledTextureView;

use kurbo::Point;

/// Side of the square region of the source bitmap one tile holds.
pub const CONTENT_SIZE: u32 = 254;

/// Apron added on each side of a tile's content.
pub const BORDER_SIZE: u32 = 1;

/// Physical side of every tile texture.
pub const TILE_SIZE: u32 = CONTENT_SIZE + 2 * BORDER_SIZE;

/// Where a freshly uploaded tile is drawn once to warm it up.
pub const WARMUP_ORIGIN: Point = Point::new(100.0, 100.0);
