// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view behavior hooks.
//!
//! The [`ViewTree`] owns all shared bookkeeping (bounds, children, root
//! linkage, touch capture, animations). What differs between a container
//! and a leaf that draws a photo is expressed by a [`ViewBehavior`]
//! installed when the view is created.
//!
//! While a hook runs, the behavior is temporarily moved out of the tree so
//! that the hook can freely mutate the tree through its [`ViewCx`]. A hook
//! that re-enters the tree on its *own* view therefore finds no behavior
//! there: the nested call skips the hook.

use alloc::boxed::Box;

use kurbo::{Insets, Rect, Size};

use super::id::ViewId;
use super::layout::MeasureSpec;
use super::store::{ViewTree, Visibility};
use crate::canvas::Canvas;
use crate::input::TouchEvent;

/// Behavior of one view; every method has a default.
pub trait ViewBehavior {
    /// Short name used in diagnostics and tree dumps.
    fn name(&self) -> &str {
        "View"
    }

    /// Computes the measured size for the given constraints.
    ///
    /// Must call [`ViewCx::set_measured_size`] exactly once; the default
    /// does not, so views that are measured must override it.
    fn on_measure(&mut self, cx: &mut ViewCx<'_>, width: MeasureSpec, height: MeasureSpec) {
        _ = (cx, width, height);
    }

    /// Arranges children after the view's bounds were set to `bounds`.
    ///
    /// Called on every layout, even when `size_changed` is false.
    fn on_layout(&mut self, cx: &mut ViewCx<'_>, size_changed: bool, bounds: Rect) {
        _ = (cx, size_changed, bounds);
    }

    /// Draws the view's own content before its children, in view-local
    /// coordinates.
    fn render_background(&mut self, cx: &mut ViewCx<'_>, canvas: &mut dyn Canvas) {
        _ = (cx, canvas);
    }

    /// Handles a touch event no child consumed. Returns whether it was
    /// consumed.
    fn on_touch(&mut self, cx: &mut ViewCx<'_>, event: &TouchEvent) -> bool {
        _ = (cx, event);
        false
    }

    /// Called when the visibility of this view or of a visible ancestor
    /// changed to `visibility`.
    fn on_visibility_changed(&mut self, cx: &mut ViewCx<'_>, visibility: Visibility) {
        _ = (cx, visibility);
    }

    /// Called after the view adopted a root, before its children do.
    fn on_attach_to_root(&mut self, cx: &mut ViewCx<'_>) {
        _ = cx;
    }

    /// Called after the view's children released the root, before the view
    /// itself does.
    fn on_detach_from_root(&mut self, cx: &mut ViewCx<'_>) {
        _ = cx;
    }
}

/// Access to the tree from inside a behavior hook.
#[derive(Debug)]
pub struct ViewCx<'a> {
    pub(crate) tree: &'a mut ViewTree,
    pub(crate) id: ViewId,
}

impl ViewCx<'_> {
    /// The view whose hook is running.
    #[must_use]
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Shared access to the tree.
    #[must_use]
    pub fn tree(&self) -> &ViewTree {
        self.tree
    }

    /// Mutable access to the tree, e.g. to measure or lay out children.
    pub fn tree_mut(&mut self) -> &mut ViewTree {
        self.tree
    }

    /// Records the measured size of the view.
    pub fn set_measured_size(&mut self, size: Size) {
        self.tree.set_measured_size(self.id, size);
    }

    /// Bounds of the view in its parent's coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.tree.bounds(self.id)
    }

    /// Inset region of the view.
    #[must_use]
    pub fn paddings(&self) -> Insets {
        self.tree.paddings(self.id)
    }

    /// Requests another frame.
    pub fn invalidate(&self) {
        self.tree.invalidate(self.id);
    }
}

/// A plain container that stacks its children on top of each other.
///
/// Measures each child with the incoming constraints and takes the largest
/// child plus paddings; lays every child out to fill the padded bounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct Group;

impl Group {
    /// Returns a boxed [`Group`] ready for [`ViewTree::create_view`].
    #[must_use]
    pub fn boxed() -> Box<dyn ViewBehavior> {
        Box::new(Self)
    }
}

impl ViewBehavior for Group {
    fn name(&self) -> &str {
        "Group"
    }

    fn on_measure(&mut self, cx: &mut ViewCx<'_>, width: MeasureSpec, height: MeasureSpec) {
        let pad = cx.paddings();
        let children: alloc::vec::Vec<ViewId> = cx.tree().children(cx.id()).collect();
        let mut content = Size::ZERO;
        for child in children {
            let tree = cx.tree_mut();
            tree.measure(child, width, height);
            let size = tree.measured_size(child);
            content.width = content.width.max(size.width);
            content.height = content.height.max(size.height);
        }
        cx.set_measured_size(Size::new(
            width.resolve(content.width + pad.x_value()),
            height.resolve(content.height + pad.y_value()),
        ));
    }

    fn on_layout(&mut self, cx: &mut ViewCx<'_>, _size_changed: bool, bounds: Rect) {
        let pad = cx.paddings();
        let inner = Rect::new(
            pad.x0,
            pad.y0,
            bounds.width() - pad.x1,
            bounds.height() - pad.y1,
        );
        let children: alloc::vec::Vec<ViewId> = cx.tree().children(cx.id()).collect();
        for child in children {
            cx.tree_mut().layout(child, inner);
        }
    }
}
