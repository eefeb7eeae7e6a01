// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch input events.

use kurbo::{Point, Vec2};

use crate::time::HostTime;

/// Phase of a touch gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchAction {
    /// First contact; starts a gesture.
    Down,
    /// Contact moved.
    Move,
    /// Contact lifted; ends the gesture.
    Up,
    /// Gesture aborted; ends the gesture without a result.
    Cancel,
}

impl TouchAction {
    /// Whether this action ends a gesture.
    #[must_use]
    pub const fn ends_gesture(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// A single-pointer touch event.
///
/// The position is expressed in the coordinate space of the view the event
/// is currently being delivered to; dispatch shifts it with
/// [`offset`](Self::offset) on the way down the tree and back on the way up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    /// Gesture phase.
    pub action: TouchAction,
    /// Contact position.
    pub position: Point,
    /// Time the platform reported the event.
    pub time: HostTime,
}

impl TouchEvent {
    /// Creates an event.
    #[must_use]
    pub const fn new(action: TouchAction, position: Point, time: HostTime) -> Self {
        Self {
            action,
            position,
            time,
        }
    }

    /// Shifts the position by `delta`.
    pub fn offset(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Returns a copy of this event with a different action.
    #[must_use]
    pub const fn with_action(self, action: TouchAction) -> Self {
        Self { action, ..self }
    }
}
