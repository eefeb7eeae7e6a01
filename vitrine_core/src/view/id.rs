// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View identity.

use core::fmt;

/// Sentinel value indicating "no view" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a view in a [`ViewTree`](super::ViewTree).
///
/// Contains both a slot index and a generation counter so that handles to a
/// destroyed view are detected after its slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewId {
    pub(crate) idx: u32,
    pub(crate) generation: u32,
}

impl ViewId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({}@gen{})", self.idx, self.generation)
    }
}
