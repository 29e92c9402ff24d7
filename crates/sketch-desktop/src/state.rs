//! Per-UI-thread desktop state.
//!
//! Canvases are `Copy` handles; everything they point at lives here: the
//! retained layers, the listener slots, the timer queue and the registry.
//! The state is only ever borrowed for short, non-reentrant sections:
//! handlers are leased out and run after the borrow is released, so they
//! may call back into any canvas.

use sketch_core::{
    Cancelled, CloseOutcome, DrawOp, Fired, Handler, HandlerSlot, KeyEvent, MouseEvent, Registry,
    Shape, TimerQueue, WindowConfig,
};
use sketch_render::{Arrangement, GlyphFont, Layer, flow_layout, hit_test};
use std::cell::RefCell;
use std::time::Instant;

/// Identifies a desktop canvas for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanvasId(u32);

pub(crate) struct Slot {
    pub id: CanvasId,
    pub layer: Layer,
    pub mouse_down: HandlerSlot<MouseEvent>,
    pub mouse_move: HandlerSlot<MouseEvent>,
    pub key_pressed: HandlerSlot<KeyEvent>,
}

impl Slot {
    fn new(id: CanvasId, layer: Layer) -> Self {
        Self {
            id,
            layer,
            mouse_down: HandlerSlot::new(),
            mouse_move: HandlerSlot::new(),
            key_pressed: HandlerSlot::new(),
        }
    }
}

enum FontState {
    NotLoaded,
    Loaded(Option<GlyphFont>),
}

pub(crate) struct Desktop {
    pub config: WindowConfig,
    pub registry: Registry<CanvasId>,
    /// Canvases attached to the window, in layout order.
    pub slots: Vec<Slot>,
    pub timers: TimerQueue<CanvasId>,
    /// Canvas receiving key events.
    pub focus: Option<CanvasId>,
    /// Something was drawn since the last frame.
    pub dirty: bool,
    /// A canvas was attached or detached since the window was last sized.
    pub layout_changed: bool,
    pub exit_requested: bool,
    font: FontState,
    next_id: u32,
}

impl Desktop {
    fn new() -> Self {
        Self {
            config: WindowConfig::default(),
            registry: Registry::new(),
            slots: Vec::new(),
            timers: TimerQueue::new(),
            focus: None,
            dirty: false,
            layout_changed: false,
            exit_requested: false,
            font: FontState::NotLoaded,
            next_id: 1,
        }
    }

    pub fn slot_mut(&mut self, id: CanvasId) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.id == id)
    }

    pub fn attach(&mut self, width: i32, height: i32) -> CanvasId {
        let id = CanvasId(self.next_id);
        self.next_id += 1;
        self.registry.register(id);
        let layer = Layer::new(width, height, self.config.font_size);
        self.slots.push(Slot::new(id, layer));
        self.layout_changed = true;
        self.dirty = true;
        id
    }

    pub fn draw(&mut self, id: CanvasId, op: &DrawOp) {
        if matches!(op.shape, Shape::Text { .. }) {
            self.ensure_font();
        }
        let font = match &self.font {
            FontState::Loaded(font) => font.as_ref(),
            FontState::NotLoaded => None,
        };
        if let Some(slot) = self.slots.iter_mut().find(|s| s.id == id) {
            slot.layer.apply(op, font);
            self.dirty = true;
        }
    }

    fn ensure_font(&mut self) {
        if let FontState::Loaded(_) = self.font {
            return;
        }
        let font = match &self.config.font_path {
            Some(path) => GlyphFont::load(path)
                .map_err(|err| log::warn!("can't load font {}: {err}", path.display()))
                .ok(),
            None => GlyphFont::find_system(&self.config.font_family),
        };
        if font.is_none() {
            log::warn!("no font available for `{}`; text will not be drawn", self.config.font_family);
        }
        self.font = FontState::Loaded(font);
    }

    /// Current layout of the attached canvases.
    pub fn arrangement(&self) -> Arrangement {
        let sizes: Vec<(i32, i32)> = self.slots.iter().map(|s| s.layer.size()).collect();
        flow_layout(&sizes, self.config.gap as f64)
    }

    /// Canvas under the window point (`px`, `py`) and the point in its
    /// local pixels.
    pub fn canvas_at(&self, px: f64, py: f64) -> Option<(CanvasId, i32, i32)> {
        let arrangement = self.arrangement();
        let (index, x, y) = hit_test(&arrangement.placements, px, py)?;
        Some((self.slots.get(index)?.id, x, y))
    }

    /// Window point in the local pixels of canvas `id`, even outside it.
    pub fn local_point(&self, id: CanvasId, px: f64, py: f64) -> Option<(i32, i32)> {
        let index = self.slots.iter().position(|s| s.id == id)?;
        let arrangement = self.arrangement();
        arrangement.placements.get(index).map(|p| p.to_local(px, py))
    }

    /// Apply the registry's decision for closing `id`.
    fn close(&mut self, id: CanvasId) -> Closed {
        let outcome = self.registry.close(id);
        let mut stopped = Vec::new();
        if outcome.stops_timers() {
            stopped = self.timers.cancel_owner(id);
            log::debug!("canvas {id:?}: stopped {} timer(s)", stopped.len());
        }
        let mut detached = None;
        if outcome.detaches() {
            if let Some(pos) = self.slots.iter().position(|s| s.id == id) {
                detached = Some(self.slots.remove(pos));
            }
            if self.focus == Some(id) {
                self.focus = None;
            }
            self.layout_changed = true;
            self.dirty = true;
            log::info!("canvas {id:?} closed");
        }
        let hook = if outcome == CloseOutcome::DetachLast {
            log::info!("last canvas closed; closing window");
            self.exit_requested = true;
            self.registry.take_on_finish()
        } else {
            None
        };
        Closed {
            hook,
            detached,
            stopped,
        }
    }
}

/// What closing a canvas took out of the state: the finish hook when the
/// last canvas went away, the detached slot, and the stopped timers. The
/// slot and timers own user closures and are dropped outside the borrow.
struct Closed {
    hook: Option<Box<dyn FnOnce()>>,
    detached: Option<Slot>,
    stopped: Vec<Cancelled>,
}

thread_local! {
    static DESKTOP: RefCell<Desktop> = RefCell::new(Desktop::new());
}

pub(crate) fn with<R>(f: impl FnOnce(&mut Desktop) -> R) -> R {
    DESKTOP.with(|d| f(&mut d.borrow_mut()))
}

pub(crate) fn set_config(config: WindowConfig) {
    with(|d| {
        d.config = config;
        d.font = FontState::NotLoaded;
    });
}

pub(crate) fn close_canvas(id: CanvasId) {
    let Closed {
        hook,
        detached,
        stopped,
    } = with(|d| d.close(id));
    drop(detached);
    drop(stopped);
    if let Some(fx) = hook {
        fx();
    }
}

/// Window close button. Ignored unless a finish hook is set; otherwise
/// runs the hook, closes every canvas and asks the event loop to exit.
pub(crate) fn request_window_close() -> bool {
    let Some(fx) = with(|d| d.registry.take_on_finish()) else {
        log::debug!("close request ignored: no finish hook");
        return false;
    };
    fx();
    let open = with(|d| d.registry.begin_closing());
    for id in open {
        close_canvas(id);
    }
    with(|d| {
        d.registry.clear();
        d.exit_requested = true;
    });
    log::info!("window closed");
    true
}

pub(crate) type Pick<E> = fn(&mut Slot) -> &mut HandlerSlot<E>;

/// Install or remove the handler picked by `pick` on canvas `id`. The
/// previous handler is dropped after the borrow ends.
pub(crate) fn replace_handler<E>(id: CanvasId, pick: Pick<E>, handler: Option<Handler<E>>) {
    let old = with(|d| d.slot_mut(id).and_then(|s| pick(s).set(handler)));
    drop(old);
}

pub(crate) fn mouse_down_slot(slot: &mut Slot) -> &mut HandlerSlot<MouseEvent> {
    &mut slot.mouse_down
}

pub(crate) fn mouse_move_slot(slot: &mut Slot) -> &mut HandlerSlot<MouseEvent> {
    &mut slot.mouse_move
}

pub(crate) fn key_pressed_slot(slot: &mut Slot) -> &mut HandlerSlot<KeyEvent> {
    &mut slot.key_pressed
}

/// Run the handler picked by `pick` on canvas `id`, if any.
pub(crate) fn dispatch<E>(id: CanvasId, pick: Pick<E>, event: E) {
    let lease = with(|d| d.slot_mut(id).and_then(|s| pick(s).take()));
    let Some(mut lease) = lease else {
        return;
    };
    lease.call(event);
    // A replaced or closed handler comes back out here and is dropped
    // after the borrow ends.
    let stale = with(|d| match d.slot_mut(id) {
        Some(s) => pick(s).restore(lease).err(),
        None => Some(lease),
    });
    drop(stale);
}

/// Run every timer due at `now`. Returns how many fired.
pub(crate) fn fire_due_timers(now: Instant) -> usize {
    let mut fired = 0;
    while let Some(timer) = with(|d| d.timers.pop_due(now)) {
        fired += 1;
        match timer {
            Fired::Periodic {
                id,
                elapsed_ms,
                mut handler,
            } => {
                handler(elapsed_ms);
                let stale = with(|d| d.timers.restore(id, handler).err());
                drop(stale);
            }
            Fired::Once { handler, .. } => handler(),
        }
    }
    fired
}
