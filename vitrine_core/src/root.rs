// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root controller contract.
//!
//! The root controller owns the GL context, the frame clock, and the render
//! request queue. It lives outside this crate; views only hold a weak
//! reference to it while attached (see
//! [`ViewTree::attach_to_root`](crate::view::ViewTree::attach_to_root)) and
//! call back into it through [`RootController`].
//!
//! All methods take `&self`: the controller is shared between every view of
//! an attached tree and is expected to use interior mutability.

use alloc::rc::Rc;
use core::fmt;

use crate::animation::CanvasAnimation;

/// Callbacks a view tree makes into the controller that drives it.
pub trait RootController {
    /// Schedules another frame.
    fn request_render(&self);

    /// Schedules a layout pass of the content pane (the topmost view).
    fn request_layout_content_pane(&self);

    /// Notifies the controller that `animation` has just been started, so it
    /// can keep frames coming while the animation runs.
    fn register_active_animation(&self, animation: &mut dyn CanvasAnimation);

    /// Blocks frame production until [`unlock_render_thread`] is called.
    ///
    /// [`unlock_render_thread`]: Self::unlock_render_thread
    fn lock_render_thread(&self);

    /// Releases a lock taken by [`lock_render_thread`].
    ///
    /// [`lock_render_thread`]: Self::lock_render_thread
    fn unlock_render_thread(&self);
}

/// Scoped render exclusion; releases the render thread when dropped.
///
/// Obtained from [`ViewTree::lock_rendering`](crate::view::ViewTree::lock_rendering).
/// Hold it only around a short structural mutation: frames stall while it is
/// alive.
#[must_use = "rendering is unlocked as soon as the guard is dropped"]
pub struct RenderLock {
    root: Rc<dyn RootController>,
}

impl RenderLock {
    pub(crate) fn acquire(root: Rc<dyn RootController>) -> Self {
        root.lock_render_thread();
        Self { root }
    }
}

impl Drop for RenderLock {
    fn drop(&mut self) {
        self.root.unlock_render_thread();
    }
}

impl fmt::Debug for RenderLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderLock").finish_non_exhaustive()
    }
}
