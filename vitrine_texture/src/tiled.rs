// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Large bitmaps split into pooled tiles.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kurbo::{Point, Rect};
use vitrine_core::canvas::{Canvas, Color, Texture};
use vitrine_core::trace::{RecycleEvent, TileUploadEvent, UploadOutcome};

use crate::bitmap::Bitmap;
use crate::pool::TilePool;
use crate::tile::Tile;
use crate::{BORDER_SIZE, CONTENT_SIZE, WARMUP_ORIGIN};

/// Result of one [`TiledTexture::step_upload`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UploadStep {
    /// Identity of the texture.
    pub texture: u64,
    /// Index of the tile the step looked at (the cursor before the step).
    pub tile_index: u32,
    /// What the step did.
    pub outcome: UploadOutcome,
    /// Cursor after the step.
    pub cursor: u32,
    /// Total number of tiles.
    pub tile_count: u32,
}

impl UploadStep {
    /// Whether every tile has been uploaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.cursor == self.tile_count
    }

    /// The trace event describing this step.
    #[must_use]
    pub fn to_event(&self) -> TileUploadEvent {
        TileUploadEvent {
            texture: self.texture,
            tile_index: self.tile_index,
            outcome: self.outcome,
            cursor: self.cursor,
            tile_count: self.tile_count,
        }
    }
}

/// Result of one [`TiledTexture::recycle`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecycleStats {
    /// Identity of the texture.
    pub texture: u64,
    /// Tiles returned to the pool by this call.
    pub tiles_returned: u32,
    /// Length of the pool's free list afterwards.
    pub free_count: u32,
}

impl RecycleStats {
    /// The trace event describing this recycle.
    #[must_use]
    pub fn to_event(&self) -> RecycleEvent {
        RecycleEvent {
            texture: self.texture,
            tiles_returned: self.tiles_returned,
            free_count: self.free_count,
        }
    }
}

#[derive(Debug)]
struct Tiles {
    tiles: Vec<Box<Tile>>,
    cursor: u32,
}

/// A bitmap split into `CONTENT_SIZE` square tiles, each uploaded as its own
/// bordered texture.
///
/// Uploading tile by tile, one per frame, takes longer overall than uploading
/// the whole bitmap at once but bounds the work done in any one frame.
///
/// The texture may be shared between the render thread (uploading and
/// drawing) and another thread (recycling). The tile array is guarded by its
/// own lock; see [`TilePool`] for the pool's locks. Lock order is tile array,
/// then pool scratch buffer; the pool's free-list lock is taken last and
/// released before any other lock is acquired.
#[derive(Debug)]
pub struct TiledTexture {
    id: u64,
    pool: Arc<TilePool>,
    width: u32,
    height: u32,
    tile_count: u32,
    state: Mutex<Tiles>,
}

/// Maps `src` from a space whose origin is `(x0, y0)` into one whose origin
/// is `(x, y)`, scaling each axis independently.
fn map_rect(src: Rect, x0: f64, y0: f64, x: f64, y: f64, scale_x: f64, scale_y: f64) -> Rect {
    Rect::new(
        x + (src.x0 - x0) * scale_x,
        y + (src.y0 - y0) * scale_y,
        x + (src.x1 - x0) * scale_x,
        y + (src.y1 - y0) * scale_y,
    )
}

impl Tile {
    /// The tile's content rectangle in source bitmap coordinates.
    fn source_rect(&self) -> Rect {
        let x = f64::from(self.offset_x);
        let y = f64::from(self.offset_y);
        Rect::new(
            x,
            y,
            x + f64::from(self.content_width),
            y + f64::from(self.content_height),
        )
    }

    /// Converts a rectangle in source bitmap coordinates to the tile's own
    /// texture coordinates, skipping the border.
    fn to_texture_space(&self, r: Rect) -> Rect {
        let dx = f64::from(BORDER_SIZE) - f64::from(self.offset_x);
        let dy = f64::from(BORDER_SIZE) - f64::from(self.offset_y);
        Rect::new(r.x0 + dx, r.y0 + dy, r.x1 + dx, r.y1 + dy)
    }
}

impl TiledTexture {
    /// Splits `bitmap` into tiles obtained from `pool`.
    ///
    /// Tiles are laid out column by column; each tile covers up to
    /// `CONTENT_SIZE` square of the bitmap. No pixels are uploaded yet.
    #[must_use]
    pub fn new(pool: Arc<TilePool>, bitmap: Arc<Bitmap>) -> Self {
        let width = bitmap.width();
        let height = bitmap.height();
        let mut tiles = Vec::with_capacity(
            width.div_ceil(CONTENT_SIZE) as usize * height.div_ceil(CONTENT_SIZE) as usize,
        );
        for x in (0..width).step_by(CONTENT_SIZE as usize) {
            for y in (0..height).step_by(CONTENT_SIZE as usize) {
                let mut tile = pool.obtain_tile();
                tile.assign(
                    bitmap.clone(),
                    x,
                    y,
                    CONTENT_SIZE.min(width - x),
                    CONTENT_SIZE.min(height - y),
                );
                tiles.push(tile);
            }
        }
        let tile_count = u32::try_from(tiles.len()).unwrap_or(u32::MAX);
        Self {
            id: pool.next_texture_key().0,
            pool,
            width,
            height,
            tile_count,
            state: Mutex::new(Tiles { tiles, cursor: 0 }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tiles> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Identity used in trace events.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Width of the source bitmap.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the source bitmap.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of tiles the bitmap was split into.
    #[must_use]
    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    /// Number of tiles the upload has gone past.
    #[must_use]
    pub fn upload_cursor(&self) -> u32 {
        self.lock().cursor
    }

    /// Whether every tile has been uploaded.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.upload_cursor() == self.tile_count
    }

    /// Uploads the tile under the cursor and advances the cursor.
    ///
    /// Returns whether every tile has now been uploaded. Once ready, further
    /// calls do nothing and return `true`.
    pub fn upload_next_tile(&self, canvas: &mut dyn Canvas) -> bool {
        self.step_upload(canvas).is_ready()
    }

    /// Like [`upload_next_tile`](Self::upload_next_tile), reporting what the
    /// step did.
    ///
    /// A tile whose bitmap was already consumed (for instance because the
    /// texture was recycled after the step was scheduled) is skipped. A tile
    /// uploaded for the first time is drawn once at `WARMUP_ORIGIN` so its
    /// first on-screen draw does not stall.
    pub fn step_upload(&self, canvas: &mut dyn Canvas) -> UploadStep {
        let mut state = self.lock();
        let index = state.cursor;
        if index >= self.tile_count {
            return UploadStep {
                texture: self.id,
                tile_index: index,
                outcome: UploadOutcome::AlreadyReady,
                cursor: index,
                tile_count: self.tile_count,
            };
        }
        state.cursor += 1;

        let mut outcome = UploadOutcome::Skipped;
        if let Some(tile) = state.tiles.get_mut(index as usize) {
            let was_loaded = tile.is_loaded();
            if tile.upload(&self.pool, canvas) {
                outcome = UploadOutcome::Uploaded;
                if !was_loaded {
                    tile.draw_at(canvas, WARMUP_ORIGIN.x, WARMUP_ORIGIN.y);
                }
            }
        }

        UploadStep {
            texture: self.id,
            tile_index: index,
            outcome,
            cursor: state.cursor,
            tile_count: self.tile_count,
        }
    }

    /// Returns every tile to the pool.
    ///
    /// Afterwards the texture draws nothing and reports itself ready. The
    /// cursor jumps to the tile count, so [`is_ready`](Self::is_ready) turns
    /// true here without the usual one `upload_next_tile` call per tile.
    /// Calling it again returns no further tiles.
    pub fn recycle(&self) -> RecycleStats {
        let mut state = self.lock();
        let tiles = std::mem::take(&mut state.tiles);
        state.cursor = self.tile_count;
        let tiles_returned = u32::try_from(tiles.len()).unwrap_or(u32::MAX);
        for tile in tiles {
            self.pool.free_tile(tile);
        }
        drop(state);
        RecycleStats {
            texture: self.id,
            tiles_returned,
            free_count: self.pool.free_count(),
        }
    }

    /// Draws the whole texture at native size with its top-left at `at`.
    ///
    /// Returns the number of tile draws issued.
    pub fn draw(&self, canvas: &mut dyn Canvas, at: Point) -> u32 {
        let size = Rect::new(
            at.x,
            at.y,
            at.x + f64::from(self.width),
            at.y + f64::from(self.height),
        );
        self.draw_scaled(canvas, size)
    }

    /// Draws the whole texture stretched onto `target`.
    ///
    /// Returns the number of tile draws issued.
    pub fn draw_scaled(&self, canvas: &mut dyn Canvas, target: Rect) -> u32 {
        self.draw_tiles(canvas, target, |canvas, tile, src, dst| {
            canvas.draw_texture(tile, src, dst);
        })
    }

    /// Draws the whole texture onto `target`, blended with `color`:
    /// `texture * (1 - ratio) + color * ratio`.
    ///
    /// Returns the number of tile draws issued.
    pub fn draw_mixed(&self, canvas: &mut dyn Canvas, color: Color, ratio: f32, target: Rect) -> u32 {
        self.draw_tiles(canvas, target, |canvas, tile, src, dst| {
            canvas.draw_mixed(tile, color, ratio, src, dst);
        })
    }

    /// Draws the `source` region of the bitmap onto `target`.
    ///
    /// Tiles whose content does not overlap `source` are skipped; a region
    /// entirely outside the bitmap draws nothing. Returns the number of tile
    /// draws issued.
    pub fn draw_region(&self, canvas: &mut dyn Canvas, source: Rect, target: Rect) -> u32 {
        if source.width() <= 0.0 || source.height() <= 0.0 {
            return 0;
        }
        let scale_x = target.width() / source.width();
        let scale_y = target.height() / source.height();
        let state = self.lock();
        let mut draws = 0;
        for tile in &state.tiles {
            let src = tile.source_rect().intersect(source);
            if src.is_zero_area() {
                continue;
            }
            let dst = map_rect(src, source.x0, source.y0, target.x0, target.y0, scale_x, scale_y);
            canvas.draw_texture(&**tile, tile.to_texture_space(src), dst);
            draws += 1;
        }
        draws
    }

    fn draw_tiles(
        &self,
        canvas: &mut dyn Canvas,
        target: Rect,
        mut draw: impl FnMut(&mut dyn Canvas, &dyn Texture, Rect, Rect),
    ) -> u32 {
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        let scale_x = target.width() / f64::from(self.width);
        let scale_y = target.height() / f64::from(self.height);
        let state = self.lock();
        let mut draws = 0;
        for tile in &state.tiles {
            let src = tile.source_rect();
            let dst = map_rect(src, 0.0, 0.0, target.x0, target.y0, scale_x, scale_y);
            draw(&mut *canvas, &**tile, tile.to_texture_space(src), dst);
            draws += 1;
        }
        draws
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use vitrine_core::canvas::TextureKey;

    use super::*;
    use crate::test_support::{Op, UploadLog};
    use crate::TILE_SIZE;

    fn texture(w: u32, h: u32) -> (Arc<TilePool>, TiledTexture) {
        let pool = TilePool::new();
        pool.prepare();
        let bitmap = Arc::new(Bitmap::filled(w, h, 0xFF00_00FF));
        (pool.clone(), TiledTexture::new(pool, bitmap))
    }

    #[test]
    fn tile_count_matches_grid() {
        for (w, h, expected) in [
            (1, 1, 1),
            (254, 254, 1),
            (255, 254, 2),
            (600, 300, 6),
            (508, 509, 6),
            (0, 100, 0),
        ] {
            let (_pool, t) = texture(w, h);
            assert_eq!(t.tile_count(), expected, "{w}x{h}");
        }
    }

    #[test]
    fn tiles_cover_bitmap_column_by_column() {
        let (_pool, t) = texture(300, 600);
        let state = t.lock();
        let layout: Vec<_> = state
            .tiles
            .iter()
            .map(|tile| (tile.offset(), tile.content_size()))
            .collect();
        assert_eq!(
            layout,
            vec![
                ((0, 0), (254, 254)),
                ((0, 254), (254, 254)),
                ((0, 508), (254, 92)),
                ((254, 0), (46, 254)),
                ((254, 254), (46, 254)),
                ((254, 508), (46, 92)),
            ]
        );
        for tile in &state.tiles {
            assert_eq!(tile.texture_size(), TILE_SIZE);
            let (cw, ch) = tile.content_size();
            assert!(cw <= CONTENT_SIZE && ch <= CONTENT_SIZE);
        }
    }

    #[test]
    fn ready_after_exactly_tile_count_steps() {
        let (_pool, t) = texture(600, 300);
        let mut canvas = UploadLog::default();
        for i in 0..t.tile_count() {
            assert!(!t.is_ready(), "not ready before step {i}");
            let done = t.upload_next_tile(&mut canvas);
            assert_eq!(done, i + 1 == t.tile_count());
        }
        assert!(t.is_ready());
        assert_eq!(canvas.uploads.len(), 6, "one upload per tile");

        let step = t.step_upload(&mut canvas);
        assert_eq!(step.outcome, UploadOutcome::AlreadyReady);
        assert!(t.upload_next_tile(&mut canvas), "idempotent once ready");
        assert_eq!(t.upload_cursor(), 6);
        assert_eq!(canvas.uploads.len(), 6, "no extra uploads");
    }

    #[test]
    fn first_upload_warms_up_with_one_draw() {
        let (_pool, t) = texture(10, 10);
        let mut canvas = UploadLog::default();
        let step = t.step_upload(&mut canvas);
        assert_eq!(step.outcome, UploadOutcome::Uploaded);
        assert_eq!(step.to_event().cursor, 1);
        assert_eq!(
            canvas.ops,
            vec![Op::Draw {
                src: Rect::new(0.0, 0.0, 12.0, 12.0),
                dst: Rect::new(100.0, 100.0, 112.0, 112.0),
            }]
        );
    }

    #[test]
    fn recycle_returns_every_tile_clean() {
        let (pool, t) = texture(600, 300);
        let keys: Vec<TextureKey> = t.lock().tiles.iter().map(|tile| tile.key()).collect();

        let stats = t.recycle();
        assert_eq!(stats.tiles_returned, 6);
        assert_eq!(stats.free_count, 6);
        for key in &keys {
            assert!(pool.is_free(*key), "{key:?} back in the pool");
        }
        assert!(pool.free_tiles_are_clean(), "no bitmap survives recycling");

        assert_eq!(t.recycle().tiles_returned, 0, "second recycle is a no-op");
        assert!(t.is_ready());

        let other = TiledTexture::new(pool.clone(), Arc::new(Bitmap::filled(5, 5, 1)));
        let reused = other.lock().tiles[0].key();
        assert!(keys.contains(&reused), "another texture reuses a freed tile");
        assert_eq!(pool.free_count(), 5);
    }

    #[test]
    fn upload_after_recycle_is_silent() {
        let (_pool, t) = texture(300, 300);
        let mut canvas = UploadLog::default();
        t.upload_next_tile(&mut canvas);
        assert!(!t.is_ready());
        t.recycle();
        assert!(t.is_ready(), "recycle completes the upload early");
        assert_eq!(t.upload_cursor(), t.tile_count());
        assert!(t.upload_next_tile(&mut canvas));
        assert_eq!(t.draw(&mut canvas, Point::ZERO), 0, "recycled texture draws nothing");
    }

    #[test]
    fn draw_maps_content_and_skips_border() {
        let (_pool, t) = texture(300, 100);
        let mut canvas = UploadLog::default();
        let draws = t.draw_scaled(&mut canvas, Rect::new(10.0, 20.0, 160.0, 70.0));
        assert_eq!(draws, 2);
        assert_eq!(
            canvas.ops,
            vec![
                Op::Draw {
                    src: Rect::new(1.0, 1.0, 255.0, 101.0),
                    dst: Rect::new(10.0, 20.0, 137.0, 70.0),
                },
                Op::Draw {
                    src: Rect::new(1.0, 1.0, 47.0, 101.0),
                    dst: Rect::new(137.0, 20.0, 160.0, 70.0),
                },
            ]
        );
    }

    #[test]
    fn draw_region_clips_to_overlapping_tiles() {
        let (_pool, t) = texture(600, 300);
        let mut canvas = UploadLog::default();
        let source = Rect::new(250.0, 0.0, 260.0, 10.0);
        let draws = t.draw_region(&mut canvas, source, Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(draws, 2, "region straddles one vertical seam");
        assert_eq!(
            canvas.ops[0],
            Op::Draw {
                src: Rect::new(251.0, 1.0, 255.0, 11.0),
                dst: Rect::new(0.0, 0.0, 8.0, 20.0),
            }
        );
        assert_eq!(
            canvas.ops[1],
            Op::Draw {
                src: Rect::new(1.0, 1.0, 7.0, 11.0),
                dst: Rect::new(8.0, 0.0, 20.0, 20.0),
            }
        );
    }

    #[test]
    fn region_outside_bitmap_draws_nothing() {
        let (_pool, t) = texture(600, 300);
        let mut canvas = UploadLog::default();
        let target = Rect::new(0.0, 0.0, 50.0, 50.0);
        assert_eq!(t.draw_region(&mut canvas, Rect::new(700.0, 0.0, 800.0, 100.0), target), 0);
        assert_eq!(t.draw_region(&mut canvas, Rect::new(0.0, 300.0, 100.0, 400.0), target), 0);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn draw_mixed_uses_same_mapping() {
        let (_pool, t) = texture(300, 100);
        let mut plain = UploadLog::default();
        let mut mixed = UploadLog::default();
        let target = Rect::new(0.0, 0.0, 300.0, 100.0);
        t.draw_scaled(&mut plain, target);
        t.draw_mixed(&mut mixed, Color::WHITE, 0.5, target);
        assert_eq!(plain.ops.len(), mixed.ops.len());
        for (p, m) in plain.ops.iter().zip(&mixed.ops) {
            let (Op::Draw { src, dst }, Op::Mixed { src: ms, dst: md, color, ratio }) = (p, m)
            else {
                panic!("unexpected ops {p:?} / {m:?}");
            };
            assert_eq!((src, dst), (ms, md));
            assert_eq!(*color, Color::WHITE);
            assert_eq!(*ratio, 0.5);
        }
    }

    #[test]
    fn recycle_races_with_upload() {
        let (pool, t) = texture(2000, 2000);
        let t = Arc::new(t);
        let uploader = {
            let t = t.clone();
            thread::spawn(move || {
                let mut canvas = UploadLog::default();
                while !t.upload_next_tile(&mut canvas) {}
                canvas.uploads.len()
            })
        };
        let stats = t.recycle();
        let uploaded = uploader.join().expect("uploader thread panicked");

        assert!(uploaded <= t.tile_count() as usize);
        assert_eq!(stats.tiles_returned, t.tile_count());
        assert!(pool.free_tiles_are_clean());
        assert!(t.is_ready());
    }
}
