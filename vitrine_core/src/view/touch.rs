// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch dispatch.
//!
//! Each view holds a capture slot: [`Capture::Idle`] or
//! [`Capture::Captured`] naming the one child that receives every event of
//! the ongoing gesture. Transitions:
//!
//! | state       | event        | effect                                             | next        |
//! |-------------|--------------|----------------------------------------------------|-------------|
//! | Captured(c) | Down         | synthesized Cancel to `c`, then hit-test as Idle   | see Idle    |
//! | Captured(c) | Move         | delivered to `c`                                   | Captured(c) |
//! | Captured(c) | Up / Cancel  | delivered to `c`                                   | Idle        |
//! | Idle        | Down         | hit-test children topmost-first; first consumer    | Captured    |
//! | Idle        | other / miss | the view's own `on_touch`                          | Idle        |

use alloc::vec::Vec;

use kurbo::Point;

use super::id::ViewId;
use super::store::{ViewTree, Visibility};
use crate::input::{TouchAction, TouchEvent};
use crate::time::HostTime;

/// Touch capture state of one view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Capture {
    /// No child holds the gesture.
    #[default]
    Idle,
    /// The named child receives every event until the gesture ends.
    Captured(ViewId),
}

impl ViewTree {
    /// Dispatches a touch event to a view, in that view's coordinates.
    ///
    /// Returns whether the event was consumed. The event position is shifted
    /// while descending into children and always restored before returning.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn dispatch_touch_event(&mut self, id: ViewId, event: &mut TouchEvent) -> bool {
        self.validate(id);
        let i = id.idx as usize;

        if let Capture::Captured(target) = self.capture[i] {
            if !self.is_child(id, target) {
                // The captured child is gone; start over.
                self.capture[i] = Capture::Idle;
            } else if event.action == TouchAction::Down {
                let mut cancel = event.with_action(TouchAction::Cancel);
                self.dispatch_to_child(id, target, &mut cancel, false);
                self.capture[i] = Capture::Idle;
            } else {
                self.dispatch_to_child(id, target, event, false);
                if event.action.ends_gesture() {
                    self.capture[i] = Capture::Idle;
                }
                return true;
            }
        }

        if event.action == TouchAction::Down {
            let children: Vec<ViewId> = self.children(id).rev().collect();
            for child in children {
                if self.visibility(child) != Visibility::Visible {
                    continue;
                }
                if self.dispatch_to_child(id, child, event, true) {
                    self.capture[i] = Capture::Captured(child);
                    return true;
                }
            }
        }

        let event = *event;
        self.with_behavior(id, |b, cx| b.on_touch(cx, &event))
            .unwrap_or(false)
    }

    /// Returns the child currently capturing touch input on this view.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn captured_child(&self, id: ViewId) -> Option<ViewId> {
        self.validate(id);
        match self.capture[id.idx as usize] {
            Capture::Idle => None,
            Capture::Captured(child) => Some(child),
        }
    }

    /// Sends a cancel through the view's normal dispatch path, releasing its
    /// capture.
    pub(crate) fn cancel_capture(&mut self, id: ViewId) {
        let mut cancel = TouchEvent::new(TouchAction::Cancel, Point::ZERO, HostTime::default());
        self.dispatch_touch_event(id, &mut cancel);
    }

    /// Delivers `event` to `child` in child-local coordinates.
    ///
    /// With `check_bounds`, the event is only delivered when it lands inside
    /// the child's bounds. The event position is restored either way.
    fn dispatch_to_child(
        &mut self,
        parent: ViewId,
        child: ViewId,
        event: &mut TouchEvent,
        check_bounds: bool,
    ) -> bool {
        let scroll = self.scroll[parent.idx as usize];
        let bounds = self.bounds[child.idx as usize];
        let local = event.position + scroll;
        if check_bounds && !bounds.contains(local) {
            return false;
        }
        let saved = event.position;
        event.offset(scroll - bounds.origin().to_vec2());
        let consumed = self.dispatch_touch_event(child, event);
        // Offsetting back is not exact in f64.
        event.position = saved;
        consumed
    }

    fn is_child(&self, parent: ViewId, child: ViewId) -> bool {
        self.is_alive(child) && self.parent[child.idx as usize] == parent.idx
    }
}
