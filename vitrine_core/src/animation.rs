// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view canvas animations.
//!
//! A [`CanvasAnimation`] is attached to one view with
//! [`ViewTree::start_animation`](crate::view::ViewTree::start_animation) and
//! is driven by the render traversal: each time the owning view's parent
//! renders it, the animation is advanced against the frame clock and applied
//! to the canvas just before the view draws.
//!
//! An animation that reports "still running" keeps the frame loop busy by
//! requesting another render. One that reports "finished" is applied one
//! last time and then detached from the view; anything it left behind lives
//! on only through whatever state it changed, not through per-frame
//! transforms.
//!
//! [`Timeline`] and [`Easing`] cover the usual fixed-duration progression,
//! and [`FadeAnimation`] / [`ScaleAnimation`] are ready-made transforms.

use kurbo::Point;

use crate::canvas::{Canvas, SaveFlags};
use crate::time::{Duration, HostTime};

/// A transform applied to one view during a render pass.
pub trait CanvasAnimation {
    /// Canvas state that must be saved before [`apply`](Self::apply) and
    /// restored after the view has rendered.
    fn save_flags(&self) -> SaveFlags;

    /// Rewinds the animation so that the next [`advance`](Self::advance)
    /// becomes its start time.
    fn start(&mut self) {}

    /// Moves the animation to `now`.
    ///
    /// Returns `true` while the animation still has progress to make and the
    /// view must be rendered again next frame.
    fn advance(&mut self, now: HostTime) -> bool;

    /// Applies the current transform to `canvas`.
    fn apply(&self, canvas: &mut dyn Canvas);
}

/// Maps linear progress onto a curve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Easing {
    /// Progress equals elapsed fraction.
    #[default]
    Linear,
    /// Fast start, gentle finish (quadratic).
    EaseOut,
}

impl Easing {
    /// Applies the curve to `t` in `0.0..=1.0`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Progress reported by [`Timeline::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    /// Eased progress in `0.0..=1.0`.
    pub value: f64,
    /// Whether the full duration has elapsed.
    pub finished: bool,
}

/// Fixed-duration progression whose start is latched on first use.
#[derive(Clone, Copy, Debug)]
pub struct Timeline {
    duration: Duration,
    easing: Easing,
    start: Option<HostTime>,
}

impl Timeline {
    /// Creates a timeline of the given length.
    #[must_use]
    pub const fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            easing,
            start: None,
        }
    }

    /// Forgets the latched start time.
    pub fn restart(&mut self) {
        self.start = None;
    }

    /// Returns the latched start time, if the timeline has been advanced.
    #[must_use]
    pub fn start_time(&self) -> Option<HostTime> {
        self.start
    }

    /// Returns the configured duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Advances to `now`, latching the start time on the first call.
    pub fn advance(&mut self, now: HostTime) -> Progress {
        let start = *self.start.get_or_insert(now);
        if self.duration == Duration::ZERO {
            return Progress {
                value: self.easing.apply(1.0),
                finished: true,
            };
        }
        let elapsed = now.saturating_duration_since(start).ticks();
        let t = (elapsed as f64 / self.duration.ticks() as f64).min(1.0);
        Progress {
            value: self.easing.apply(t),
            finished: elapsed >= self.duration.ticks(),
        }
    }
}

/// Interpolates the canvas alpha between two values.
#[derive(Clone, Debug)]
pub struct FadeAnimation {
    from: f32,
    to: f32,
    timeline: Timeline,
    current: f32,
}

impl FadeAnimation {
    /// Creates a fade from `from` to `to` alpha.
    #[must_use]
    pub const fn new(from: f32, to: f32, timeline: Timeline) -> Self {
        Self {
            from,
            to,
            timeline,
            current: from,
        }
    }

    /// Returns the alpha the next [`apply`](CanvasAnimation::apply) uses.
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.current
    }
}

impl CanvasAnimation for FadeAnimation {
    fn save_flags(&self) -> SaveFlags {
        SaveFlags::ALPHA
    }

    fn start(&mut self) {
        self.timeline.restart();
        self.current = self.from;
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "progress is in 0..=1; f32 precision is plenty for alpha"
    )]
    fn advance(&mut self, now: HostTime) -> bool {
        let progress = self.timeline.advance(now);
        let t = progress.value as f32;
        self.current = self.from + (self.to - self.from) * t;
        !progress.finished
    }

    fn apply(&self, canvas: &mut dyn Canvas) {
        canvas.multiply_alpha(self.current);
    }
}

/// Scales the view uniformly about a pivot in view-local coordinates.
#[derive(Clone, Debug)]
pub struct ScaleAnimation {
    from: f64,
    to: f64,
    pivot: Point,
    timeline: Timeline,
    current: f64,
}

impl ScaleAnimation {
    /// Creates a scale animation from `from` to `to` about `pivot`.
    #[must_use]
    pub const fn new(from: f64, to: f64, pivot: Point, timeline: Timeline) -> Self {
        Self {
            from,
            to,
            pivot,
            timeline,
            current: from,
        }
    }

    /// Returns the scale the next [`apply`](CanvasAnimation::apply) uses.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.current
    }
}

impl CanvasAnimation for ScaleAnimation {
    fn save_flags(&self) -> SaveFlags {
        SaveFlags::MATRIX
    }

    fn start(&mut self) {
        self.timeline.restart();
        self.current = self.from;
    }

    fn advance(&mut self, now: HostTime) -> bool {
        let progress = self.timeline.advance(now);
        self.current = self.from + (self.to - self.from) * progress.value;
        !progress.finished
    }

    fn apply(&self, canvas: &mut dyn Canvas) {
        canvas.translate(self.pivot.x, self.pivot.y);
        canvas.scale(self.current, self.current);
        canvas.translate(-self.pivot.x, -self.pivot.y);
    }
}
