// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared tile free list and upload scratch buffer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use vitrine_core::canvas::{Texture, TextureKey};

use crate::bitmap::UploadBuffer;
use crate::tile::Tile;

/// Intrusive LIFO of recycled tiles.
#[derive(Debug, Default)]
struct FreeList {
    head: Option<Box<Tile>>,
    len: u32,
}

impl FreeList {
    fn push(&mut self, mut tile: Box<Tile>) {
        tile.next_free = self.head.take();
        self.head = Some(tile);
        self.len += 1;
    }

    fn pop(&mut self) -> Option<Box<Tile>> {
        let mut tile = self.head.take()?;
        self.head = tile.next_free.take();
        self.len -= 1;
        Some(tile)
    }

    fn clear(&mut self) {
        while self.pop().is_some() {}
    }
}

impl Drop for FreeList {
    fn drop(&mut self) {
        // Unlink one node at a time so a long list cannot overflow the stack.
        self.clear();
    }
}

/// Process-wide pool shared by every [`TiledTexture`](crate::TiledTexture)
/// of one rendering context.
///
/// Tiles all have the same physical size, so a tile released by one texture
/// can be reused by any other. The pool also owns the scratch buffer tiles
/// are rendered into before upload; it exists between [`prepare`] and
/// [`teardown`], which track the lifetime of the GL context.
///
/// The free list and the scratch buffer are guarded by separate locks. The
/// free-list lock is never held while another lock is acquired.
///
/// [`prepare`]: Self::prepare
/// [`teardown`]: Self::teardown
#[derive(Debug)]
pub struct TilePool {
    free: Mutex<FreeList>,
    scratch: Mutex<Option<UploadBuffer>>,
    next_key: AtomicU64,
    this: Weak<Self>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TilePool {
    /// Creates an empty, unprepared pool.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            free: Mutex::new(FreeList::default()),
            scratch: Mutex::new(None),
            next_key: AtomicU64::new(1),
            this: this.clone(),
        })
    }

    /// Allocates the scratch buffer. Called when the rendering context is
    /// created; calling it again keeps the existing buffer.
    pub fn prepare(&self) {
        let mut scratch = lock(&self.scratch);
        if scratch.is_none() {
            *scratch = Some(UploadBuffer::new());
        }
    }

    /// Releases the scratch buffer and discards every free tile. Called when
    /// the rendering context is destroyed.
    pub fn teardown(&self) {
        *lock(&self.scratch) = None;
        lock(&self.free).clear();
    }

    /// Whether [`prepare`](Self::prepare) has run since the last teardown.
    #[must_use]
    pub fn is_prepared(&self) -> bool {
        lock(&self.scratch).is_some()
    }

    /// Takes the most recently freed tile, or allocates a new one.
    #[must_use]
    pub fn obtain_tile(&self) -> Box<Tile> {
        if let Some(tile) = lock(&self.free).pop() {
            return tile;
        }
        Box::new(Tile::new(self.next_texture_key(), self.this.clone()))
    }

    /// Resets `tile` and pushes it onto the free list.
    pub fn free_tile(&self, mut tile: Box<Tile>) {
        tile.reset();
        lock(&self.free).push(tile);
    }

    /// Number of tiles currently on the free list.
    #[must_use]
    pub fn free_count(&self) -> u32 {
        lock(&self.free).len
    }

    /// Whether a tile with `key` is on the free list.
    #[must_use]
    pub fn is_free(&self, key: TextureKey) -> bool {
        let free = lock(&self.free);
        let mut cursor = free.head.as_deref();
        while let Some(tile) = cursor {
            if tile.key() == key {
                return true;
            }
            cursor = tile.next_free.as_deref();
        }
        false
    }

    /// Returns `true` if no free tile holds a pending bitmap.
    #[must_use]
    pub fn free_tiles_are_clean(&self) -> bool {
        let free = lock(&self.free);
        let mut cursor = free.head.as_deref();
        while let Some(tile) = cursor {
            if tile.has_pending_bitmap() {
                return false;
            }
            cursor = tile.next_free.as_deref();
        }
        true
    }

    /// Hands out a fresh texture identity.
    pub(crate) fn next_texture_key(&self) -> TextureKey {
        TextureKey(self.next_key.fetch_add(1, Ordering::Relaxed))
    }

    /// Runs `f` on the scratch buffer; `None` when the pool is torn down.
    pub(crate) fn with_scratch<R>(&self, f: impl FnOnce(&mut UploadBuffer) -> R) -> Option<R> {
        lock(&self.scratch).as_mut().map(f)
    }
}
