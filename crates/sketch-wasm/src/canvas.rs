//! The browser `Canvas` handle: one `<canvas>` element plus DOM listeners
//! and window timers.

use crate::page::{self, CanvasId, dom_error};
use crate::paint::paint_op;
use sketch_core::{Color, Draw, DrawOp, KeyEvent, MouseEvent, WHITE};
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// A fixed-size drawing surface on the page.
///
/// Handles are `Copy`; all copies refer to the same element. Operations on
/// a closed canvas do nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    id: CanvasId,
    width: i32,
    height: i32,
    background: Color,
}

impl Canvas {
    /// Append a canvas to the page body and erase it.
    pub fn try_new(width: i32, height: i32, background: Color) -> sketch_core::Result<Self> {
        let font = page::with(|p| p.config.css_font(p.config.font_size));
        let surface = page::create_surface(width, height, &font)?;
        let id = page::with(|p| {
            let id = p.next_id();
            p.registry.register(id);
            p.surfaces.insert(id, surface);
            id
        });
        log::info!("canvas {id:?} opened ({width}x{height}, {background})");
        let canvas = Self {
            id,
            width,
            height,
            background,
        };
        canvas.erase();
        Ok(canvas)
    }

    /// Like [`Canvas::try_new`]; a canvas that can't be created is logged
    /// and behaves as already closed.
    pub fn new(width: i32, height: i32, background: Color) -> Self {
        Self::try_new(width, height, background).unwrap_or_else(|err| {
            log::error!("can't create canvas: {err}");
            Self {
                id: page::with(|p| p.next_id()),
                width,
                height,
                background,
            }
        })
    }

    pub fn with_size(width: i32, height: i32) -> Self {
        Self::new(width, height, WHITE)
    }

    pub fn id(&self) -> CanvasId {
        self.id
    }

    pub fn is_open(&self) -> bool {
        page::with(|p| p.registry.contains(self.id))
    }

    /// Running intervals and pending timeouts.
    pub fn active_timers(&self) -> usize {
        page::with(|p| p.timers.get(&self.id).map_or(0, |t| t.len()))
    }

    fn element(&self) -> Option<web_sys::HtmlCanvasElement> {
        page::with(|p| p.surfaces.get(&self.id).map(|s| s.element.clone()))
    }

    // ─── Listeners ───────────────────────────────────────────────────────

    pub fn on_mouse_down(&self, mut handler: impl FnMut(MouseEvent) + 'static) {
        let Some(element) = self.element() else {
            return;
        };
        let listener = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
            handler(MouseEvent::new(e.offset_x(), e.offset_y(), true));
        })
        .into_js_value();
        element.set_onmousedown(Some(listener.unchecked_ref()));
        log::debug!("canvas {:?}: mouse-down handler set", self.id);
    }

    /// Drags arrive with `down == true`.
    pub fn on_mouse_move(&self, mut handler: impl FnMut(MouseEvent) + 'static) {
        let Some(element) = self.element() else {
            return;
        };
        let listener = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(move |e: web_sys::MouseEvent| {
            handler(MouseEvent::new(e.offset_x(), e.offset_y(), primary_down(e.buttons())));
        })
        .into_js_value();
        element.set_onmousemove(Some(listener.unchecked_ref()));
        log::debug!("canvas {:?}: mouse-move handler set", self.id);
    }

    /// Keys are listened for on the whole window, so the last handler set by
    /// any canvas wins.
    pub fn on_key_pressed(&self, mut handler: impl FnMut(KeyEvent) + 'static) {
        let Ok(window) = page::window() else {
            return;
        };
        let listener = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
            handler(KeyEvent::from_key_name(&e.key()));
        })
        .into_js_value();
        window.set_onkeydown(Some(listener.unchecked_ref()));
        log::debug!("canvas {:?}: key handler set", self.id);
    }

    pub fn clear_key_pressed(&self) {
        if let Ok(window) = page::window() {
            window.set_onkeydown(None);
        }
    }

    // ─── Timers ──────────────────────────────────────────────────────────

    /// Call `handler` every `period_ms` with the milliseconds elapsed since
    /// registration.
    pub fn on_time_progress(&self, period_ms: u32, mut handler: impl FnMut(u64) + 'static) -> TimerCtrl {
        let started = js_sys::Date::now();
        let tick = Closure::<dyn FnMut()>::new(move || handler(elapsed_ms(started, js_sys::Date::now())))
            .into_js_value();
        let handle = page::window().and_then(|w| {
            w.set_interval_with_callback_and_timeout_and_arguments_0(tick.unchecked_ref(), clamp_ms(period_ms))
                .map_err(dom_error)
        });
        match handle {
            Ok(handle) => {
                page::with(|p| p.timers_mut(self.id).intervals.push(handle));
                log::debug!("canvas {:?}: interval {handle} every {period_ms} ms", self.id);
                TimerCtrl {
                    canvas: self.id,
                    handle: Some(handle),
                }
            }
            Err(err) => {
                log::error!("can't start timer: {err}");
                TimerCtrl {
                    canvas: self.id,
                    handle: None,
                }
            }
        }
    }

    /// Call `handler` once after `delay_ms`.
    pub fn on_time(&self, delay_ms: u32, handler: impl FnOnce() + 'static) {
        let id = self.id;
        let own_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let slot = own_handle.clone();
        let fire = Closure::once_into_js(move || {
            if let Some(handle) = slot.get() {
                page::with(|p| p.forget_timeout(id, handle));
            }
            handler();
        });
        let handle = page::window().and_then(|w| {
            w.set_timeout_with_callback_and_timeout_and_arguments_0(fire.unchecked_ref(), clamp_ms(delay_ms))
                .map_err(dom_error)
        });
        match handle {
            Ok(handle) => {
                own_handle.set(Some(handle));
                page::with(|p| p.timers_mut(id).timeouts.push(handle));
                log::debug!("canvas {id:?}: timeout {handle} in {delay_ms} ms");
            }
            Err(err) => log::error!("can't start timer: {err}"),
        }
    }

    /// Stop this canvas' timers and remove its element. The window closes
    /// with the last canvas.
    pub fn close(&self) {
        page::close_canvas(self.id);
    }
}

impl Draw for Canvas {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn background(&self) -> Color {
        self.background
    }

    fn submit(&self, op: DrawOp) {
        page::with(|p| {
            if let Some(surface) = p.surfaces.get(&self.id) {
                paint_op(&surface.ctx, &op, &p.config);
            }
        });
    }
}

/// Handle to a periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerCtrl {
    canvas: CanvasId,
    handle: Option<i32>,
}

impl TimerCtrl {
    /// Cancel the timer. Stopping twice does nothing.
    pub fn stop(&self) {
        let Some(handle) = self.handle else {
            return;
        };
        if let Ok(window) = page::window() {
            window.clear_interval_with_handle(handle);
        }
        if page::with(|p| p.forget_interval(self.canvas, handle)) {
            log::debug!("interval {handle} stopped");
        }
    }
}

/// Only the primary button counts as a drag.
pub(crate) fn primary_down(buttons: u16) -> bool {
    buttons & 1 == 1
}

pub(crate) fn elapsed_ms(started: f64, now: f64) -> u64 {
    (now - started).max(0.0) as u64
}

fn clamp_ms(ms: u32) -> i32 {
    ms.min(i32::MAX as u32) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn primary_button_means_drag() {
        assert!(primary_down(1));
        assert!(primary_down(3));
        assert!(!primary_down(0));
        assert!(!primary_down(2));
    }

    #[test]
    fn elapsed_never_negative() {
        assert_eq!(elapsed_ms(1000.0, 3500.7), 2500);
        assert_eq!(elapsed_ms(1000.0, 999.0), 0);
    }

    #[test]
    fn long_delays_are_clamped() {
        assert_eq!(clamp_ms(10_500), 10_500);
        assert_eq!(clamp_ms(u32::MAX), i32::MAX);
    }
}
