// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Test doubles shared by the view tests.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Rect;

use super::behavior::{ViewBehavior, ViewCx};
use super::store::Visibility;
use crate::animation::CanvasAnimation;
use crate::canvas::{Canvas, Color, SaveFlags, Texture, TextureKey};
use crate::input::TouchEvent;
use crate::root::RootController;
use crate::time::HostTime;

/// Root controller that counts every callback.
#[derive(Default)]
pub(crate) struct TestRoot {
    renders: Cell<u32>,
    layouts: Cell<u32>,
    animations: Cell<u32>,
    lock_depth: Cell<u32>,
}

impl TestRoot {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn renders(&self) -> u32 {
        self.renders.get()
    }

    pub(crate) fn layouts(&self) -> u32 {
        self.layouts.get()
    }

    pub(crate) fn animations(&self) -> u32 {
        self.animations.get()
    }

    pub(crate) fn is_render_locked(&self) -> bool {
        self.lock_depth.get() > 0
    }
}

impl RootController for TestRoot {
    fn request_render(&self) {
        self.renders.set(self.renders.get() + 1);
    }

    fn request_layout_content_pane(&self) {
        self.layouts.set(self.layouts.get() + 1);
    }

    fn register_active_animation(&self, _animation: &mut dyn CanvasAnimation) {
        self.animations.set(self.animations.get() + 1);
    }

    fn lock_render_thread(&self) {
        self.lock_depth.set(self.lock_depth.get() + 1);
    }

    fn unlock_render_thread(&self) {
        self.lock_depth.set(self.lock_depth.get() - 1);
    }
}

/// Shared event log written by [`probe`] behaviors.
#[derive(Clone, Default)]
pub(crate) struct Probe(Rc<RefCell<Vec<String>>>);

impl Probe {
    pub(crate) fn new_log() -> Self {
        Self::default()
    }

    pub(crate) fn take(&self) -> Vec<String> {
        core::mem::take(&mut *self.0.borrow_mut())
    }

    fn push(&self, line: String) {
        self.0.borrow_mut().push(line);
    }
}

struct Recording {
    name: &'static str,
    log: Probe,
    consume: bool,
}

impl ViewBehavior for Recording {
    fn name(&self) -> &str {
        self.name
    }

    fn render_background(&mut self, _cx: &mut ViewCx<'_>, _canvas: &mut dyn Canvas) {
        self.log.push(format!("background {}", self.name));
    }

    fn on_touch(&mut self, _cx: &mut ViewCx<'_>, event: &TouchEvent) -> bool {
        self.log.push(format!(
            "touch {} {:?} {},{}",
            self.name, event.action, event.position.x, event.position.y
        ));
        self.consume
    }

    fn on_visibility_changed(&mut self, _cx: &mut ViewCx<'_>, visibility: Visibility) {
        self.log
            .push(format!("visibility {} {visibility:?}", self.name));
    }

    fn on_attach_to_root(&mut self, _cx: &mut ViewCx<'_>) {
        self.log.push(format!("attach {}", self.name));
    }

    fn on_detach_from_root(&mut self, _cx: &mut ViewCx<'_>) {
        self.log.push(format!("detach {}", self.name));
    }
}

/// A leaf that logs every hook and consumes every touch.
pub(crate) fn probe(name: &'static str, log: &Probe) -> Box<dyn ViewBehavior> {
    Box::new(Recording {
        name,
        log: log.clone(),
        consume: true,
    })
}

/// A leaf that logs every hook and declines every touch.
pub(crate) fn passive(name: &'static str, log: &Probe) -> Box<dyn ViewBehavior> {
    Box::new(Recording {
        name,
        log: log.clone(),
        consume: false,
    })
}

/// Animation that finishes on its `n`th advance and applies its step count
/// as an alpha.
struct Steps {
    n: u32,
    taken: u32,
}

impl CanvasAnimation for Steps {
    fn save_flags(&self) -> SaveFlags {
        SaveFlags::ALPHA
    }

    fn start(&mut self) {
        self.taken = 0;
    }

    fn advance(&mut self, _now: HostTime) -> bool {
        self.taken += 1;
        self.taken < self.n
    }

    fn apply(&self, canvas: &mut dyn Canvas) {
        canvas.multiply_alpha(self.taken as f32);
    }
}

pub(crate) fn steps(n: u32) -> Box<dyn CanvasAnimation> {
    Box::new(Steps { n, taken: 0 })
}

/// Canvas that logs transform and state ops as text.
#[derive(Default)]
pub(crate) struct LogCanvas {
    pub(crate) ops: Vec<String>,
}

impl Canvas for LogCanvas {
    fn translate(&mut self, dx: f64, dy: f64) {
        // `+ 0.0` folds negative zero.
        self.ops.push(format!("translate {},{}", dx + 0.0, dy + 0.0));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(format!("scale {sx},{sy}"));
    }

    fn multiply_alpha(&mut self, alpha: f32) {
        self.ops.push(format!("alpha {alpha}"));
    }

    fn save(&mut self, _flags: SaveFlags) {
        self.ops.push("save".into());
    }

    fn restore(&mut self) {
        self.ops.push("restore".into());
    }

    fn draw_texture(&mut self, texture: &dyn Texture, _src: Rect, dst: Rect) {
        self.ops.push(format!("draw {:?} {dst:?}", texture.key()));
    }

    fn draw_mixed(&mut self, texture: &dyn Texture, color: Color, _ratio: f32, _src: Rect, dst: Rect) {
        self.ops
            .push(format!("mixed {:?} {color:?} {dst:?}", texture.key()));
    }

    fn upload_texture(&mut self, key: TextureKey, width: u32, height: u32, _pixels: &[u32]) {
        self.ops.push(format!("upload {key:?} {width}x{height}"));
    }
}
