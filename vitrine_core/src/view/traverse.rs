// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child iteration.

use core::iter::FusedIterator;
use core::slice;

use super::id::ViewId;
use super::store::ViewTree;

/// An iterator over the direct children of a view, in index (render) order.
///
/// Created by [`ViewTree::children`]. Double-ended, so `.rev()` yields
/// children topmost-first, the order used for hit testing.
#[derive(Debug)]
pub struct Children<'a> {
    tree: &'a ViewTree,
    inner: slice::Iter<'a, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a ViewTree, children: &'a [u32]) -> Self {
        Self {
            tree,
            inner: children.iter(),
        }
    }

    fn handle(&self, idx: u32) -> ViewId {
        ViewId {
            idx,
            generation: self.tree.generation[idx as usize],
        }
    }
}

impl Iterator for Children<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        let idx = *self.inner.next()?;
        Some(self.handle(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<ViewId> {
        let idx = *self.inner.next_back()?;
        Some(self.handle(idx))
    }
}

impl ExactSizeIterator for Children<'_> {}

impl FusedIterator for Children<'_> {}
