// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays view storage with allocation, topology, root linkage,
//! and property management.

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Insets, Rect, Size, Vec2};

use super::behavior::{ViewBehavior, ViewCx};
use super::id::{INVALID, ViewId};
use super::layout::MeasureSpec;
use super::touch::Capture;
use super::traverse::Children;
use crate::animation::CanvasAnimation;
use crate::root::{RenderLock, RootController};

/// Whether a view takes part in rendering and hit testing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Rendered and hit-tested.
    #[default]
    Visible,
    /// Skipped by rendering (unless animating) and by hit testing.
    Invisible,
}

/// Per-view boolean state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ViewFlags {
    pub(crate) invisible: bool,
    pub(crate) measured_size_set: bool,
    pub(crate) layout_requested: bool,
}

/// Struct-of-arrays storage for a forest of views.
///
/// Views are addressed by [`ViewId`] handles. Each view occupies a slot in
/// parallel arrays; destroyed views are recycled via a free list, and
/// generation counters make stale handles panic instead of aliasing a new
/// view.
///
/// Parent/child linkage is bidirectional: a view appears in exactly one
/// parent's child list iff its parent field names that parent.
pub struct ViewTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,

    // -- Geometry --
    pub(crate) bounds: Vec<Rect>,
    pub(crate) paddings: Vec<Insets>,
    pub(crate) scroll: Vec<Vec2>,
    pub(crate) measured: Vec<Size>,
    pub(crate) last_spec: Vec<Option<(MeasureSpec, MeasureSpec)>>,
    pub(crate) flags: Vec<ViewFlags>,

    // -- Behavior and transient state --
    pub(crate) behavior: Vec<Option<Box<dyn ViewBehavior>>>,
    pub(crate) animation: Vec<Option<Box<dyn CanvasAnimation>>>,
    pub(crate) capture: Vec<Capture>,
    pub(crate) root: Vec<Option<Weak<dyn RootController>>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,
}

impl fmt::Debug for ViewTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewTree")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            children: Vec::new(),
            bounds: Vec::new(),
            paddings: Vec::new(),
            scroll: Vec::new(),
            measured: Vec::new(),
            last_spec: Vec::new(),
            flags: Vec::new(),
            behavior: Vec::new(),
            animation: Vec::new(),
            capture: Vec::new(),
            root: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    // -- Allocation API --

    /// Creates a detached, parentless, visible view with empty bounds.
    pub fn create_view(&mut self, behavior: Box<dyn ViewBehavior>) -> ViewId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.children[i].clear();
            self.bounds[i] = Rect::ZERO;
            self.paddings[i] = Insets::ZERO;
            self.scroll[i] = Vec2::ZERO;
            self.measured[i] = Size::ZERO;
            self.last_spec[i] = None;
            self.flags[i] = ViewFlags::default();
            self.behavior[i] = Some(behavior);
            self.animation[i] = None;
            self.capture[i] = Capture::Idle;
            self.root[i] = None;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.children.push(Vec::new());
            self.bounds.push(Rect::ZERO);
            self.paddings.push(Insets::ZERO);
            self.scroll.push(Vec2::ZERO);
            self.measured.push(Size::ZERO);
            self.last_spec.push(None);
            self.flags.push(ViewFlags::default());
            self.behavior.push(Some(behavior));
            self.animation.push(None);
            self.capture.push(Capture::Idle);
            self.root.push(None);
            self.generation.push(0);
            idx
        };

        ViewId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a view, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, or if the view still has children, a
    /// parent, or a root.
    pub fn destroy_view(&mut self, id: ViewId) {
        self.validate(id);
        let i = id.idx as usize;
        assert!(
            self.children[i].is_empty(),
            "cannot destroy view with children"
        );
        assert!(
            self.parent[i] == INVALID,
            "cannot destroy view that still has a parent"
        );
        assert!(
            self.root[i].is_none(),
            "cannot destroy view that is attached to a root"
        );

        self.behavior[i] = None;
        self.animation[i] = None;
        self.generation[i] += 1;
        self.free_list.push(id.idx);
    }

    /// Returns whether the given handle refers to a live view.
    #[must_use]
    pub fn is_alive(&self, id: ViewId) -> bool {
        id.idx < self.len && self.generation[id.idx as usize] == id.generation
    }

    // -- Topology API --

    /// Appends `child` to the children of `parent`.
    ///
    /// If `parent` is attached to a root, `child` and its subtree are
    /// attached to the same root immediately (pre-order).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent,
    /// or if `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        assert!(
            !self.is_ancestor_or_self(c, p),
            "cannot add a view to its own subtree"
        );

        self.children[p as usize].push(c);
        self.parent[c as usize] = p;

        if let Some(root) = self.root[p as usize].clone() {
            self.attach_subtree(c, &root);
        }
    }

    /// Removes `child` from the children of `parent`.
    ///
    /// If `child` holds the touch capture of `parent`, a cancel event is
    /// dispatched through `parent` first. Then `child`'s subtree releases its
    /// root (post-order) and the link is cut.
    ///
    /// Returns `false` (and does nothing) if `child` is not a child of
    /// `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn remove_child(&mut self, parent: ViewId, child: ViewId) -> bool {
        self.validate(parent);
        self.validate(child);
        if !self.children[parent.idx as usize].contains(&child.idx) {
            return false;
        }
        self.release_child(parent, child);
        self.children[parent.idx as usize].retain(|&c| c != child.idx);
        true
    }

    /// Removes every child of `parent`, in index order, through the same
    /// steps as [`remove_child`](Self::remove_child).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_all_children(&mut self, parent: ViewId) {
        self.validate(parent);
        let children: Vec<ViewId> = self.children(parent).collect();
        for child in children {
            self.release_child(parent, child);
        }
        self.children[parent.idx as usize].clear();
    }

    /// Returns the parent of a view, if any.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.handle(p))
    }

    /// Returns an iterator over the direct children of a view.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn children(&self, id: ViewId) -> Children<'_> {
        self.validate(id);
        Children::new(self, &self.children[id.idx as usize])
    }

    /// Returns the number of children of a view.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn child_count(&self, id: ViewId) -> usize {
        self.validate(id);
        self.children[id.idx as usize].len()
    }

    /// Returns the child at `index`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `index` is out of range.
    #[must_use]
    pub fn child_at(&self, id: ViewId, index: usize) -> ViewId {
        self.validate(id);
        let children = &self.children[id.idx as usize];
        assert!(
            index < children.len(),
            "child index {index} out of range (count {})",
            children.len()
        );
        self.handle(children[index])
    }

    // -- Root linkage --

    /// Attaches a parentless view and its subtree to `root`, pre-order.
    ///
    /// Only the content pane (the topmost view) is attached this way; views
    /// added beneath it later are attached by [`add_child`](Self::add_child).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, the view has a parent, or the view is
    /// already attached.
    pub fn attach_to_root(&mut self, id: ViewId, root: &Rc<dyn RootController>) {
        self.validate(id);
        assert!(
            self.parent[id.idx as usize] == INVALID,
            "only a parentless view can be attached to a root"
        );
        assert!(
            self.root[id.idx as usize].is_none(),
            "view is already attached to a root"
        );
        self.attach_subtree(id.idx, &Rc::downgrade(root));
    }

    /// Detaches a parentless, attached view and its subtree, post-order.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, the view has a parent, or the view is
    /// not attached.
    pub fn detach_from_root(&mut self, id: ViewId) {
        self.validate(id);
        assert!(
            self.parent[id.idx as usize] == INVALID,
            "only a parentless view can be detached from a root"
        );
        assert!(
            self.root[id.idx as usize].is_some(),
            "view is not attached to a root"
        );
        self.detach_subtree(id.idx);
    }

    /// Whether the view (through itself or an ancestor) is attached.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_attached(&self, id: ViewId) -> bool {
        self.validate(id);
        self.root[id.idx as usize].is_some()
    }

    /// Returns the root controller the view is attached to, if it is still
    /// alive.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn root(&self, id: ViewId) -> Option<Rc<dyn RootController>> {
        self.validate(id);
        self.root[id.idx as usize].as_ref()?.upgrade()
    }

    /// Requests another frame from the root, if attached.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn invalidate(&self, id: ViewId) {
        if let Some(root) = self.root(id) {
            root.request_render();
        }
    }

    /// Blocks the render thread until the returned guard is dropped.
    ///
    /// Returns `None` when the view is not attached.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn lock_rendering(&self, id: ViewId) -> Option<RenderLock> {
        self.root(id).map(RenderLock::acquire)
    }

    // -- Property API --

    /// Returns the bounds of a view in its parent's coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn bounds(&self, id: ViewId) -> Rect {
        self.validate(id);
        self.bounds[id.idx as usize]
    }

    /// Returns the width of the view's bounds.
    #[must_use]
    pub fn width(&self, id: ViewId) -> f64 {
        self.bounds(id).width()
    }

    /// Returns the height of the view's bounds.
    #[must_use]
    pub fn height(&self, id: ViewId) -> f64 {
        self.bounds(id).height()
    }

    /// Returns the paddings of a view.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn paddings(&self, id: ViewId) -> Insets {
        self.validate(id);
        self.paddings[id.idx as usize]
    }

    /// Sets the paddings of a view.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_paddings(&mut self, id: ViewId, paddings: Insets) {
        self.validate(id);
        self.paddings[id.idx as usize] = paddings;
    }

    /// Returns the scroll offset applied to the view's children.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn scroll_offset(&self, id: ViewId) -> Vec2 {
        self.validate(id);
        self.scroll[id.idx as usize]
    }

    /// Sets the scroll offset applied to the view's children and requests a
    /// frame.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_scroll_offset(&mut self, id: ViewId, offset: Vec2) {
        self.validate(id);
        self.scroll[id.idx as usize] = offset;
        self.invalidate(id);
    }

    /// Returns the visibility of a view.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn visibility(&self, id: ViewId) -> Visibility {
        self.validate(id);
        if self.flags[id.idx as usize].invisible {
            Visibility::Invisible
        } else {
            Visibility::Visible
        }
    }

    /// Sets the visibility of a view.
    ///
    /// Setting the current value is a no-op. Otherwise the view and its
    /// visible descendants are notified through
    /// [`on_visibility_changed`](ViewBehavior::on_visibility_changed) and a
    /// frame is requested.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_visibility(&mut self, id: ViewId, visibility: Visibility) {
        if visibility == self.visibility(id) {
            return;
        }
        self.flags[id.idx as usize].invisible = visibility == Visibility::Invisible;
        self.notify_visibility_changed(id, visibility);
        self.invalidate(id);
    }

    /// Starts `animation` on a view, replacing any running one.
    ///
    /// The animation is rewound, registered with the root, and a frame is
    /// requested. It is advanced and applied whenever the view's parent
    /// renders it.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the view is not attached.
    pub fn start_animation(&mut self, id: ViewId, mut animation: Box<dyn CanvasAnimation>) {
        self.validate(id);
        assert!(
            self.root[id.idx as usize].is_some(),
            "cannot start an animation on a view that is not attached"
        );
        animation.start();
        if let Some(root) = self.root(id) {
            root.register_active_animation(animation.as_mut());
        }
        self.animation[id.idx as usize] = Some(animation);
        self.invalidate(id);
    }

    /// Whether the view currently has an animation attached.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn has_animation(&self, id: ViewId) -> bool {
        self.validate(id);
        self.animation[id.idx as usize].is_some()
    }

    /// Returns the diagnostic name of the view's behavior.
    ///
    /// Returns `"?"` while the behavior is checked out by one of its own
    /// hooks.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn name(&self, id: ViewId) -> &str {
        self.validate(id);
        self.behavior[id.idx as usize]
            .as_deref()
            .map_or("?", |b| b.name())
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: ViewId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale ViewId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    pub(crate) fn handle(&self, idx: u32) -> ViewId {
        ViewId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Runs `f` with the view's behavior checked out of the tree.
    ///
    /// Returns `None` without calling `f` when the behavior is already
    /// checked out (a hook re-entering its own view).
    pub(crate) fn with_behavior<R>(
        &mut self,
        id: ViewId,
        f: impl FnOnce(&mut dyn ViewBehavior, &mut ViewCx<'_>) -> R,
    ) -> Option<R> {
        let mut behavior = self.behavior[id.idx as usize].take()?;
        let result = f(behavior.as_mut(), &mut ViewCx { tree: self, id });
        if self.is_alive(id) {
            self.behavior[id.idx as usize] = Some(behavior);
        }
        Some(result)
    }

    fn is_ancestor_or_self(&self, ancestor: u32, mut idx: u32) -> bool {
        while idx != INVALID {
            if idx == ancestor {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }

    /// Cancels capture held by `child`, detaches its subtree, and clears its
    /// parent link. Leaves `parent`'s child list to the caller.
    fn release_child(&mut self, parent: ViewId, child: ViewId) {
        if self.capture[parent.idx as usize] == Capture::Captured(child) {
            self.cancel_capture(parent);
        }
        if self.root[child.idx as usize].is_some() {
            self.detach_subtree(child.idx);
        }
        self.parent[child.idx as usize] = INVALID;
    }

    fn attach_subtree(&mut self, idx: u32, root: &Weak<dyn RootController>) {
        self.root[idx as usize] = Some(root.clone());
        let id = self.handle(idx);
        self.with_behavior(id, |b, cx| b.on_attach_to_root(cx));
        let children = self.children[idx as usize].clone();
        for child in children {
            self.attach_subtree(child, root);
        }
    }

    fn detach_subtree(&mut self, idx: u32) {
        let children = self.children[idx as usize].clone();
        for child in children {
            self.detach_subtree(child);
        }
        let id = self.handle(idx);
        self.with_behavior(id, |b, cx| b.on_detach_from_root(cx));
        self.root[idx as usize] = None;
    }

    fn notify_visibility_changed(&mut self, id: ViewId, visibility: Visibility) {
        self.with_behavior(id, |b, cx| b.on_visibility_changed(cx, visibility));
        let children: Vec<ViewId> = self.children(id).collect();
        for child in children {
            if self.visibility(child) == Visibility::Visible {
                self.notify_visibility_changed(child, visibility);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::view::behavior::Group;
    use crate::view::test_support::{Probe, TestRoot, probe};

    fn assert_linkage(tree: &ViewTree, views: &[ViewId]) {
        for &v in views {
            for child in tree.children(v) {
                assert_eq!(tree.parent(child), Some(v), "child points back at parent");
            }
            if let Some(p) = tree.parent(v) {
                let count = tree.children(p).filter(|&c| c == v).count();
                assert_eq!(count, 1, "parent lists child exactly once");
            }
        }
    }

    #[test]
    fn create_and_destroy() {
        let mut tree = ViewTree::new();
        let id = tree.create_view(Group::boxed());
        assert!(tree.is_alive(id));
        tree.destroy_view(id);
        assert!(!tree.is_alive(id));
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut tree = ViewTree::new();
        let a = tree.create_view(Group::boxed());
        tree.destroy_view(a);
        let b = tree.create_view(Group::boxed());
        assert!(!tree.is_alive(a));
        assert!(tree.is_alive(b));
        assert_eq!(a.index(), b.index());
        assert_ne!(a.generation(), b.generation());
    }

    #[test]
    #[should_panic(expected = "stale ViewId")]
    fn destroyed_handle_panics() {
        let mut tree = ViewTree::new();
        let id = tree.create_view(Group::boxed());
        tree.destroy_view(id);
        let _ = tree.bounds(id);
    }

    #[test]
    fn add_and_remove_keep_linkage() {
        let mut tree = ViewTree::new();
        let root = tree.create_view(Group::boxed());
        let a = tree.create_view(Group::boxed());
        let b = tree.create_view(Group::boxed());
        let c = tree.create_view(Group::boxed());
        let all = [root, a, b, c];

        tree.add_child(root, a);
        assert_linkage(&tree, &all);
        tree.add_child(root, b);
        assert_linkage(&tree, &all);
        tree.add_child(b, c);
        assert_linkage(&tree, &all);

        let kids: Vec<_> = tree.children(root).collect();
        assert_eq!(kids, vec![a, b]);
        assert_eq!(tree.child_at(root, 1), b);
        assert_eq!(tree.child_count(b), 1);

        assert!(tree.remove_child(root, a));
        assert_linkage(&tree, &all);
        assert_eq!(tree.parent(a), None);
        assert!(!tree.remove_child(root, a), "already removed");

        tree.add_child(c, a);
        assert_linkage(&tree, &all);
        tree.remove_all_children(root);
        assert_linkage(&tree, &all);
        assert_eq!(tree.child_count(root), 0);
        assert_eq!(tree.parent(b), None);
        assert_eq!(tree.parent(c), Some(b), "grandchildren stay linked");
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn adding_owned_child_panics() {
        let mut tree = ViewTree::new();
        let p1 = tree.create_view(Group::boxed());
        let p2 = tree.create_view(Group::boxed());
        let child = tree.create_view(Group::boxed());
        tree.add_child(p1, child);
        tree.add_child(p2, child);
    }

    #[test]
    #[should_panic(expected = "cannot add a view to its own subtree")]
    fn adding_ancestor_panics() {
        let mut tree = ViewTree::new();
        let top = tree.create_view(Group::boxed());
        let mid = tree.create_view(Group::boxed());
        tree.add_child(top, mid);
        tree.add_child(mid, top);
    }

    #[test]
    #[should_panic(expected = "cannot destroy view with children")]
    fn destroy_with_children_panics() {
        let mut tree = ViewTree::new();
        let p = tree.create_view(Group::boxed());
        let c = tree.create_view(Group::boxed());
        tree.add_child(p, c);
        tree.destroy_view(p);
    }

    #[test]
    #[should_panic(expected = "child index 0 out of range")]
    fn child_at_out_of_range_panics() {
        let mut tree = ViewTree::new();
        let p = tree.create_view(Group::boxed());
        let _ = tree.child_at(p, 0);
    }

    #[test]
    fn attach_is_pre_order_and_detach_is_post_order() {
        let log = Probe::new_log();
        let mut tree = ViewTree::new();
        let top = tree.create_view(probe("top", &log));
        let mid = tree.create_view(probe("mid", &log));
        let leaf = tree.create_view(probe("leaf", &log));
        tree.add_child(top, mid);
        tree.add_child(mid, leaf);

        let root = TestRoot::new();
        let dyn_root: Rc<dyn RootController> = root.clone();
        tree.attach_to_root(top, &dyn_root);
        assert!(tree.is_attached(leaf));
        assert_eq!(
            log.take(),
            vec!["attach top", "attach mid", "attach leaf"],
            "parent adopts root before children"
        );

        tree.detach_from_root(top);
        assert!(!tree.is_attached(top));
        assert!(!tree.is_attached(leaf));
        assert_eq!(
            log.take(),
            vec!["detach leaf", "detach mid", "detach top"],
            "children release root before parent"
        );
    }

    #[test]
    fn add_child_to_attached_parent_attaches_subtree() {
        let log = Probe::new_log();
        let mut tree = ViewTree::new();
        let top = tree.create_view(probe("top", &log));
        let root = TestRoot::new();
        let dyn_root: Rc<dyn RootController> = root.clone();
        tree.attach_to_root(top, &dyn_root);
        let _ = log.take();

        let sub = tree.create_view(probe("sub", &log));
        let leaf = tree.create_view(probe("leaf", &log));
        tree.add_child(sub, leaf);
        assert!(!tree.is_attached(leaf));

        tree.add_child(top, sub);
        assert!(tree.is_attached(sub));
        assert!(tree.is_attached(leaf));
        assert_eq!(log.take(), vec!["attach sub", "attach leaf"]);

        tree.remove_child(top, sub);
        assert!(!tree.is_attached(sub));
        assert!(!tree.is_attached(leaf));
        assert_eq!(log.take(), vec!["detach leaf", "detach sub"]);
    }

    #[test]
    #[should_panic(expected = "only a parentless view can be attached to a root")]
    fn attaching_child_view_panics() {
        let mut tree = ViewTree::new();
        let top = tree.create_view(Group::boxed());
        let child = tree.create_view(Group::boxed());
        tree.add_child(top, child);
        let root: Rc<dyn RootController> = TestRoot::new();
        tree.attach_to_root(child, &root);
    }

    #[test]
    #[should_panic(expected = "only a parentless view can be detached from a root")]
    fn detaching_child_view_panics() {
        let mut tree = ViewTree::new();
        let top = tree.create_view(Group::boxed());
        let child = tree.create_view(Group::boxed());
        tree.add_child(top, child);
        let root: Rc<dyn RootController> = TestRoot::new();
        tree.attach_to_root(top, &root);
        tree.detach_from_root(child);
    }

    #[test]
    #[should_panic(expected = "view is not attached to a root")]
    fn detaching_unattached_view_panics() {
        let mut tree = ViewTree::new();
        let top = tree.create_view(Group::boxed());
        tree.detach_from_root(top);
    }

    #[test]
    fn visibility_round_trips_and_notifies_once() {
        let log = Probe::new_log();
        let mut tree = ViewTree::new();
        let top = tree.create_view(probe("top", &log));
        let shown = tree.create_view(probe("shown", &log));
        let hidden = tree.create_view(probe("hidden", &log));
        tree.add_child(top, shown);
        tree.add_child(top, hidden);
        tree.set_visibility(hidden, Visibility::Invisible);
        assert_eq!(log.take(), vec!["visibility hidden Invisible"]);

        tree.set_visibility(top, Visibility::Invisible);
        assert_eq!(tree.visibility(top), Visibility::Invisible);
        assert_eq!(
            log.take(),
            vec!["visibility top Invisible", "visibility shown Invisible"],
            "invisible children are not notified"
        );

        tree.set_visibility(top, Visibility::Invisible);
        assert!(log.take().is_empty(), "same value twice is a no-op");

        tree.set_visibility(top, Visibility::Visible);
        assert_eq!(tree.visibility(top), Visibility::Visible);
    }

    #[test]
    fn visibility_change_requests_render_when_attached() {
        let mut tree = ViewTree::new();
        let top = tree.create_view(Group::boxed());
        let root = TestRoot::new();
        let dyn_root: Rc<dyn RootController> = root.clone();
        tree.attach_to_root(top, &dyn_root);

        tree.set_visibility(top, Visibility::Invisible);
        assert_eq!(root.renders(), 1);
        tree.set_visibility(top, Visibility::Invisible);
        assert_eq!(root.renders(), 1, "no-op does not invalidate");
    }

    #[test]
    fn render_lock_is_scoped() {
        let mut tree = ViewTree::new();
        let top = tree.create_view(Group::boxed());
        assert!(tree.lock_rendering(top).is_none(), "detached views cannot lock");

        let root = TestRoot::new();
        let dyn_root: Rc<dyn RootController> = root.clone();
        tree.attach_to_root(top, &dyn_root);
        {
            let _lock = tree.lock_rendering(top);
            assert!(root.is_render_locked());
        }
        assert!(!root.is_render_locked(), "dropping the guard unlocks");
    }

    #[test]
    fn start_animation_registers_and_invalidates() {
        let mut tree = ViewTree::new();
        let top = tree.create_view(Group::boxed());
        let root = TestRoot::new();
        let dyn_root: Rc<dyn RootController> = root.clone();
        tree.attach_to_root(top, &dyn_root);

        tree.start_animation(top, crate::view::test_support::steps(2));
        assert!(tree.has_animation(top));
        assert_eq!(root.animations(), 1);
        assert_eq!(root.renders(), 1);
    }

    #[test]
    #[should_panic(expected = "cannot start an animation on a view that is not attached")]
    fn start_animation_requires_root() {
        let mut tree = ViewTree::new();
        let top = tree.create_view(Group::boxed());
        tree.start_animation(top, crate::view::test_support::steps(1));
    }
}
