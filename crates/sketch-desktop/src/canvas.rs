//! The desktop `Canvas` handle.

use crate::state::{self, CanvasId};
use sketch_core::{Color, Draw, DrawOp, KeyEvent, MouseEvent, TimerId, WHITE};
use std::time::{Duration, Instant};

/// A fixed-size drawing surface inside the desktop window.
///
/// Handles are cheap to copy; every copy refers to the same canvas. Methods
/// on a closed canvas are harmless no-ops, except that timers may still be
/// registered on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    id: CanvasId,
    width: i32,
    height: i32,
    background: Color,
}

impl Canvas {
    /// Create a canvas, attach it to the window and erase it.
    pub fn new(width: i32, height: i32, background: Color) -> Self {
        let id = state::with(|d| d.attach(width, height));
        log::info!("canvas {id:?} opened ({width}x{height}, {background})");
        let canvas = Self {
            id,
            width,
            height,
            background,
        };
        canvas.erase();
        canvas
    }

    /// A canvas with a white background.
    pub fn with_size(width: i32, height: i32) -> Self {
        Self::new(width, height, WHITE)
    }

    pub fn id(&self) -> CanvasId {
        self.id
    }

    pub fn is_open(&self) -> bool {
        state::with(|d| d.registry.contains(self.id))
    }

    /// Periodic and pending one-shot timers still registered.
    pub fn active_timers(&self) -> usize {
        state::with(|d| d.timers.count_owner(self.id))
    }

    // ─── Listeners ───────────────────────────────────────────────────────

    /// Replace the mouse-down handler.
    pub fn on_mouse_down(&self, handler: impl FnMut(MouseEvent) + 'static) {
        log::debug!("canvas {:?}: mouse-down handler set", self.id);
        state::replace_handler(self.id, state::mouse_down_slot, Some(Box::new(handler)));
    }

    /// Replace the mouse-move handler. Drags arrive with `down == true`.
    pub fn on_mouse_move(&self, handler: impl FnMut(MouseEvent) + 'static) {
        log::debug!("canvas {:?}: mouse-move handler set", self.id);
        state::replace_handler(self.id, state::mouse_move_slot, Some(Box::new(handler)));
    }

    /// Replace the key handler and give this canvas keyboard focus.
    pub fn on_key_pressed(&self, handler: impl FnMut(KeyEvent) + 'static) {
        log::debug!("canvas {:?}: key handler set", self.id);
        state::replace_handler(self.id, state::key_pressed_slot, Some(Box::new(handler)));
        state::with(|d| {
            if d.slot_mut(self.id).is_some() {
                d.focus = Some(self.id);
            }
        });
    }

    /// Remove the key handler.
    pub fn clear_key_pressed(&self) {
        state::replace_handler(self.id, state::key_pressed_slot, None);
    }

    // ─── Timers ──────────────────────────────────────────────────────────

    /// Call `handler` every `period_ms` with the milliseconds elapsed since
    /// registration.
    pub fn on_time_progress(&self, period_ms: u32, handler: impl FnMut(u64) + 'static) -> TimerCtrl {
        let id = state::with(|d| {
            d.timers.every(
                self.id,
                Duration::from_millis(period_ms.into()),
                Instant::now(),
                Box::new(handler),
            )
        });
        log::debug!("canvas {:?}: periodic timer {} every {period_ms} ms", self.id, id.raw());
        TimerCtrl { id }
    }

    /// Call `handler` once after `delay_ms`.
    pub fn on_time(&self, delay_ms: u32, handler: impl FnOnce() + 'static) {
        let id = state::with(|d| {
            d.timers.after(
                self.id,
                Duration::from_millis(delay_ms.into()),
                Instant::now(),
                Box::new(handler),
            )
        });
        log::debug!("canvas {:?}: one-shot timer {} in {delay_ms} ms", self.id, id.raw());
    }

    /// Stop this canvas' timers and detach it from the window. The window
    /// closes with its last canvas.
    pub fn close(&self) {
        state::close_canvas(self.id);
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
        state::with(|d| d.draw(self.id, &op));
    }
}

/// Handle to a periodic timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerCtrl {
    id: TimerId,
}

impl TimerCtrl {
    /// Cancel the timer. Stopping twice does nothing.
    pub fn stop(&self) {
        let cancelled = state::with(|d| d.timers.cancel(self.id));
        if let Some(timer) = cancelled {
            log::debug!("timer {} stopped", timer.id.raw());
        }
    }

    pub fn is_active(&self) -> bool {
        state::with(|d| d.timers.is_active(self.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{dispatch, fire_due_timers, mouse_down_slot, request_window_close};
    use pretty_assertions::assert_eq;
    use sketch_core::{CYAN, RED};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    // Each test runs on its own thread, so each gets a fresh desktop state.

    #[test]
    fn new_canvas_is_registered_and_erased() {
        let cv = Canvas::new(600, 400, CYAN);
        assert!(cv.is_open());
        let ops = state::with(|d| d.slot_mut(cv.id()).map(|s| s.layer.op_count()));
        assert_eq!(ops, Some(1));

        cv.draw_circle(10, 10, 5, RED, 2);
        cv.erase();
        let ops = state::with(|d| d.slot_mut(cv.id()).map(|s| s.layer.op_count()));
        assert_eq!(ops, Some(1));
    }

    #[test]
    fn stopping_a_timer_twice_is_harmless() {
        let cv = Canvas::with_size(10, 10);
        let ctrl = cv.on_time_progress(1000, |_| {});
        cv.on_time(500, || {});
        assert_eq!(cv.active_timers(), 2);
        ctrl.stop();
        ctrl.stop();
        assert!(!ctrl.is_active());
        assert_eq!(cv.active_timers(), 1);
    }

    #[test]
    fn one_shot_timer_leaves_active_set_after_firing() {
        let cv = Canvas::with_size(10, 10);
        let hit = Rc::new(Cell::new(false));
        let h = hit.clone();
        cv.on_time(0, move || h.set(true));
        assert_eq!(fire_due_timers(Instant::now() + Duration::from_millis(1)), 1);
        assert!(hit.get());
        assert_eq!(cv.active_timers(), 0);
    }

    #[test]
    fn close_stops_timers_and_runs_finish_hook_once() {
        let finished = Rc::new(Cell::new(0));
        let f = finished.clone();
        state::with(|d| d.registry.set_on_finish(Box::new(move || f.set(f.get() + 1))));

        let a = Canvas::with_size(10, 10);
        let b = Canvas::with_size(10, 10);
        a.on_time_progress(10, |_| {});
        b.on_time(10, || {});

        a.close();
        assert!(!a.is_open());
        assert_eq!(a.active_timers(), 0);
        assert_eq!(b.active_timers(), 1);
        assert_eq!(finished.get(), 0);

        b.close();
        b.close();
        assert_eq!(finished.get(), 1);
        assert!(state::with(|d| d.exit_requested));
    }

    #[test]
    fn handler_can_close_its_own_canvas() {
        let cv = Canvas::with_size(10, 10);
        let other = Canvas::with_size(10, 10);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        cv.on_mouse_down(move |e| {
            s.borrow_mut().push(e);
            cv.close();
        });
        dispatch(cv.id(), mouse_down_slot, MouseEvent::new(3, 4, true));
        dispatch(cv.id(), mouse_down_slot, MouseEvent::new(5, 6, true));
        assert_eq!(*seen.borrow(), vec![MouseEvent::new(3, 4, true)]);
        assert!(!cv.is_open());
        assert!(other.is_open());
    }

    #[test]
    fn handler_replacing_itself_is_not_restored() {
        let cv = Canvas::with_size(10, 10);
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = log.clone();
        cv.on_mouse_down(move |_| {
            l.borrow_mut().push("first");
            let l2 = l.clone();
            cv.on_mouse_down(move |_| l2.borrow_mut().push("second"));
        });
        for _ in 0..2 {
            dispatch(cv.id(), mouse_down_slot, MouseEvent::new(0, 0, true));
        }
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn window_close_is_ignored_without_finish_hook() {
        let cv = Canvas::with_size(10, 10);
        assert!(!request_window_close());
        assert!(cv.is_open());
    }

    #[test]
    fn key_handler_takes_focus() {
        let a = Canvas::with_size(10, 10);
        let b = Canvas::with_size(10, 10);
        b.on_key_pressed(|_| {});
        a.on_key_pressed(|_| {});
        assert_eq!(state::with(|d| d.focus), Some(a.id()));
        a.close();
        assert_eq!(state::with(|d| d.focus), None);
    }

    #[test]
    fn window_close_runs_hook_and_closes_every_canvas() {
        let finished = Rc::new(Cell::new(0));
        let f = finished.clone();
        state::with(|d| d.registry.set_on_finish(Box::new(move || f.set(f.get() + 1))));

        let a = Canvas::with_size(10, 10);
        let b = Canvas::with_size(10, 10);
        a.on_time_progress(10, |_| {});
        b.on_time_progress(20, |_| {});
        b.on_time(30, || {});

        assert!(request_window_close());
        assert_eq!(finished.get(), 1);
        assert_eq!(a.active_timers(), 0);
        assert_eq!(b.active_timers(), 0);
        assert!(!a.is_open());
        assert!(!b.is_open());
        assert!(state::with(|d| d.exit_requested));

        assert!(!request_window_close());
        assert_eq!(finished.get(), 1);
    }

    /// Touches the desktop state when dropped, like a closure capturing a
    /// value whose destructor uses a canvas.
    struct ChecksOnDrop {
        cv: Canvas,
        drops: Rc<Cell<u32>>,
    }

    impl Drop for ChecksOnDrop {
        fn drop(&mut self) {
            let _ = self.cv.is_open();
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[test]
    fn evicted_handlers_are_dropped_outside_the_state_borrow() {
        let cv = Canvas::with_size(10, 10);
        let drops = Rc::new(Cell::new(0));
        let guard = || ChecksOnDrop {
            cv,
            drops: drops.clone(),
        };

        let g = guard();
        cv.on_mouse_down(move |_| {
            let _held = &g;
        });
        cv.on_mouse_down(|_| {});
        assert_eq!(drops.get(), 1);

        let g = guard();
        cv.on_key_pressed(move |_| {
            let _held = &g;
        });
        cv.clear_key_pressed();
        assert_eq!(drops.get(), 2);

        let g = guard();
        let ctrl = cv.on_time_progress(1000, move |_| {
            let _held = &g;
        });
        ctrl.stop();
        assert_eq!(drops.get(), 3);

        let g = guard();
        let own: Rc<Cell<Option<TimerCtrl>>> = Rc::new(Cell::new(None));
        let o = own.clone();
        let ctrl = cv.on_time_progress(0, move |_| {
            let _held = &g;
            if let Some(ctrl) = o.get() {
                ctrl.stop();
            }
        });
        own.set(Some(ctrl));
        assert_eq!(fire_due_timers(Instant::now() + Duration::from_millis(5)), 1);
        assert_eq!(drops.get(), 4);

        let g = guard();
        cv.on_time(1000, move || drop(g));
        cv.close();
        assert_eq!(drops.get(), 5);
    }
}
