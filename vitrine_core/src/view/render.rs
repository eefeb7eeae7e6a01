// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render traversal.

use alloc::vec::Vec;

use super::id::ViewId;
use super::store::{ViewTree, Visibility};
use crate::canvas::Canvas;
use crate::time::HostTime;

/// Counters collected by one [`ViewTree::render`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Number of views whose render ran.
    pub views_rendered: u32,
    /// Animations that are still running after this pass.
    pub animations_running: u32,
    /// Animations that finished and were detached during this pass.
    pub animations_finished: u32,
}

impl ViewTree {
    /// Renders a view and its subtree onto `canvas`, in the view's local
    /// coordinates.
    ///
    /// The view's background is drawn first, then each child in index order.
    /// A child is skipped when it is invisible and not animating. Children
    /// are drawn translated by their origin minus this view's scroll offset.
    ///
    /// A child's animation is advanced to `now` and applied between a save
    /// and a restore of the canvas. An animation that is still running
    /// requests another frame and stays attached; one that finished is
    /// applied a last time and then detached.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn render(&mut self, id: ViewId, canvas: &mut dyn Canvas, now: HostTime) -> RenderStats {
        self.validate(id);
        let mut stats = RenderStats::default();
        self.render_view(id, canvas, now, &mut stats);
        stats
    }

    fn render_view(
        &mut self,
        id: ViewId,
        canvas: &mut dyn Canvas,
        now: HostTime,
        stats: &mut RenderStats,
    ) {
        stats.views_rendered += 1;
        self.with_behavior(id, |b, cx| b.render_background(cx, canvas));

        let scroll = self.scroll[id.idx as usize];
        let children: Vec<ViewId> = self.children(id).collect();
        for child in children {
            let c = child.idx as usize;
            if self.visibility(child) == Visibility::Invisible && self.animation[c].is_none() {
                continue;
            }
            let offset = self.bounds[c].origin().to_vec2() - scroll;
            canvas.translate(offset.x, offset.y);

            if let Some(mut animation) = self.animation[c].take() {
                canvas.save(animation.save_flags());
                if animation.advance(now) {
                    stats.animations_running += 1;
                    self.invalidate(child);
                    animation.apply(canvas);
                    self.animation[c] = Some(animation);
                } else {
                    stats.animations_finished += 1;
                    animation.apply(canvas);
                }
                self.render_view(child, canvas, now, stats);
                canvas.restore();
            } else {
                self.render_view(child, canvas, now, stats);
            }

            canvas.translate(-offset.x, -offset.y);
        }
    }
}
