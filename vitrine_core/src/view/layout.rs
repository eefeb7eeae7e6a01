// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measurement and layout.
//!
//! Measurement is two-phase: a parent calls [`ViewTree::measure`] on each
//! child with the constraints it offers, reads back
//! [`ViewTree::measured_size`], and then places the child with
//! [`ViewTree::layout`]. Measurement is memoized on the constraint pair and
//! invalidated by [`ViewTree::request_layout`].

use kurbo::{Point, Rect, Size};

use super::id::{INVALID, ViewId};
use super::store::ViewTree;

/// A constraint offered to a view along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MeasureSpec {
    /// The view may be any size.
    #[default]
    Unspecified,
    /// The view must be exactly this size.
    Exactly(f64),
    /// The view may be at most this size.
    AtMost(f64),
}

impl MeasureSpec {
    /// Resolves a preferred size against this constraint.
    #[must_use]
    pub fn resolve(self, preferred: f64) -> f64 {
        match self {
            Self::Unspecified => preferred,
            Self::Exactly(size) => size,
            Self::AtMost(max) => preferred.min(max),
        }
    }
}

impl ViewTree {
    /// Measures a view against the given constraints.
    ///
    /// A no-op when the constraints equal those of the previous call and no
    /// layout was requested since. Otherwise the behavior's
    /// [`on_measure`](super::ViewBehavior::on_measure) runs.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, or if `on_measure` returns without
    /// recording a measured size.
    pub fn measure(&mut self, id: ViewId, width: MeasureSpec, height: MeasureSpec) {
        self.validate(id);
        let i = id.idx as usize;
        if self.last_spec[i] == Some((width, height)) && !self.flags[i].layout_requested {
            return;
        }
        self.last_spec[i] = Some((width, height));
        self.flags[i].measured_size_set = false;

        self.with_behavior(id, |b, cx| b.on_measure(cx, width, height));
        assert!(
            self.flags[i].measured_size_set,
            "{} must call set_measured_size in on_measure",
            self.name(id)
        );
    }

    /// Returns the size recorded by the last measurement.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn measured_size(&self, id: ViewId) -> Size {
        self.validate(id);
        self.measured[id.idx as usize]
    }

    /// Records the measured size of a view.
    ///
    /// Normally called from [`on_measure`](super::ViewBehavior::on_measure)
    /// through [`ViewCx::set_measured_size`](super::ViewCx::set_measured_size).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_measured_size(&mut self, id: ViewId, size: Size) {
        self.validate(id);
        let i = id.idx as usize;
        self.measured[i] = size;
        self.flags[i].measured_size_set = true;
    }

    /// Places a view at `bounds` (in its parent's coordinates).
    ///
    /// Always runs [`on_layout`](super::ViewBehavior::on_layout), even when
    /// the size did not change: children may need rearranging regardless.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn layout(&mut self, id: ViewId, bounds: Rect) {
        self.validate(id);
        let i = id.idx as usize;
        let old = self.bounds[i];
        let size_changed = old.size() != bounds.size();
        self.bounds[i] = bounds;
        self.flags[i].layout_requested = false;
        self.with_behavior(id, |b, cx| b.on_layout(cx, size_changed, bounds));
    }

    /// Invalidates the memoized measurement of a view and of each ancestor.
    ///
    /// When the chain reaches a parentless view, the root (if attached) is
    /// asked to lay out its content pane.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn request_layout(&mut self, id: ViewId) {
        self.validate(id);
        let mut idx = id.idx;
        loop {
            let i = idx as usize;
            self.flags[i].layout_requested = true;
            let parent = self.parent[i];
            if parent == INVALID {
                if let Some(root) = self.root(self.handle(idx)) {
                    root.request_layout_content_pane();
                }
                return;
            }
            idx = parent;
        }
    }

    /// Whether a layout was requested since the view was last laid out.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_layout_requested(&self, id: ViewId) -> bool {
        self.validate(id);
        self.flags[id.idx as usize].layout_requested
    }

    /// Returns the bounds of `descendant` in the coordinate space of
    /// `ancestor`'s children, or `None` if it is not a descendant.
    ///
    /// Scroll offsets of intermediate views are subtracted, matching where
    /// the view is drawn. Passing the same view twice returns its own bounds.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    #[must_use]
    pub fn bounds_of(&self, ancestor: ViewId, descendant: ViewId) -> Option<Rect> {
        self.validate(ancestor);
        self.validate(descendant);
        let bounds = self.bounds[descendant.idx as usize];
        let mut origin = Point::ORIGIN;
        let mut idx = descendant.idx;
        while idx != ancestor.idx {
            let parent = self.parent[idx as usize];
            if parent == INVALID {
                return None;
            }
            if parent != ancestor.idx {
                let p = parent as usize;
                origin += self.bounds[p].origin().to_vec2() - self.scroll[p];
            }
            idx = parent;
        }
        Some(bounds + origin.to_vec2())
    }
}
