// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A leaf view that paints a tiled texture.

use std::sync::Arc;

use kurbo::{Rect, Size};
use vitrine_core::canvas::{Canvas, Color};
use vitrine_core::view::{MeasureSpec, ViewBehavior, ViewCx};

use crate::tiled::TiledTexture;

/// Paints a [`TiledTexture`] stretched over the view's bounds, optionally
/// blended with a flat highlight color.
///
/// Measures to the texture's native size, within the offered constraints.
#[derive(Debug)]
pub struct TiledTextureView {
    texture: Arc<TiledTexture>,
    highlight: Option<(Color, f32)>,
}

impl TiledTextureView {
    /// Creates a view over `texture`.
    #[must_use]
    pub fn new(texture: Arc<TiledTexture>) -> Self {
        Self {
            texture,
            highlight: None,
        }
    }

    /// Blends `color` over the texture by `ratio` (`None` to clear).
    pub fn set_highlight(&mut self, highlight: Option<(Color, f32)>) {
        self.highlight = highlight;
    }

    /// The texture being painted.
    #[must_use]
    pub fn texture(&self) -> &Arc<TiledTexture> {
        &self.texture
    }
}

impl ViewBehavior for TiledTextureView {
    fn name(&self) -> &str {
        "TiledTextureView"
    }

    fn on_measure(&mut self, cx: &mut ViewCx<'_>, width: MeasureSpec, height: MeasureSpec) {
        cx.set_measured_size(Size::new(
            width.resolve(f64::from(self.texture.width())),
            height.resolve(f64::from(self.texture.height())),
        ));
    }

    fn render_background(&mut self, cx: &mut ViewCx<'_>, canvas: &mut dyn Canvas) {
        let target = Rect::from_origin_size((0.0, 0.0), cx.bounds().size());
        match self.highlight {
            Some((color, ratio)) => self.texture.draw_mixed(canvas, color, ratio, target),
            None => self.texture.draw_scaled(canvas, target),
        };
    }
}
