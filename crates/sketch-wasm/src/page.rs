//! Page-wide state of the browser backend.
//!
//! The DOM owns the canvases, listeners and timers; this module only
//! remembers which canvases are open and which timer handles each of them
//! holds, so closing a canvas (or leaving the page) can cancel them.

use sketch_core::{CanvasError, CloseOutcome, Registry, WindowConfig};
use std::cell::RefCell;
use std::collections::HashMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Identifies a browser canvas for the lifetime of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanvasId(u32);

pub(crate) struct Surface {
    pub element: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
}

/// Timer handles returned by `setInterval` / `setTimeout`.
#[derive(Debug, Default)]
pub(crate) struct Timers {
    pub intervals: Vec<i32>,
    pub timeouts: Vec<i32>,
}

impl Timers {
    pub fn len(&self) -> usize {
        self.intervals.len() + self.timeouts.len()
    }

    fn cancel_all(&mut self, window: &web_sys::Window) {
        for handle in self.intervals.drain(..) {
            window.clear_interval_with_handle(handle);
        }
        for handle in self.timeouts.drain(..) {
            window.clear_timeout_with_handle(handle);
        }
    }
}

pub(crate) struct Page {
    pub config: WindowConfig,
    pub registry: Registry<CanvasId>,
    pub surfaces: HashMap<CanvasId, Surface>,
    pub timers: HashMap<CanvasId, Timers>,
    next_id: u32,
}

impl Page {
    fn new() -> Self {
        Self {
            config: WindowConfig::default(),
            registry: Registry::new(),
            surfaces: HashMap::new(),
            timers: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn next_id(&mut self) -> CanvasId {
        let id = CanvasId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn timers_mut(&mut self, id: CanvasId) -> &mut Timers {
        self.timers.entry(id).or_default()
    }

    pub fn forget_interval(&mut self, id: CanvasId, handle: i32) -> bool {
        let Some(timers) = self.timers.get_mut(&id) else {
            return false;
        };
        let before = timers.intervals.len();
        timers.intervals.retain(|&h| h != handle);
        timers.intervals.len() != before
    }

    pub fn forget_timeout(&mut self, id: CanvasId, handle: i32) {
        if let Some(timers) = self.timers.get_mut(&id) {
            timers.timeouts.retain(|&h| h != handle);
        }
    }

    /// Apply the registry's decision for closing `id`. Returns the finish
    /// hook and `true` when the last canvas went away.
    fn close(&mut self, id: CanvasId) -> (Option<Box<dyn FnOnce()>>, bool) {
        let outcome = self.registry.close(id);
        if outcome.stops_timers()
            && let Some(window) = web_sys::window()
            && let Some(timers) = self.timers.get_mut(&id)
        {
            log::debug!("canvas {id:?}: stopping {} timer(s)", timers.len());
            timers.cancel_all(&window);
        }
        if outcome.detaches()
            && let Some(surface) = self.surfaces.remove(&id)
        {
            surface.element.remove();
            log::info!("canvas {id:?} closed");
        }
        if outcome == CloseOutcome::DetachLast {
            (self.registry.take_on_finish(), true)
        } else {
            (None, false)
        }
    }
}

thread_local! {
    static PAGE: RefCell<Page> = RefCell::new(Page::new());
}

pub(crate) fn with<R>(f: impl FnOnce(&mut Page) -> R) -> R {
    PAGE.with(|p| f(&mut p.borrow_mut()))
}

pub(crate) fn dom_error(err: JsValue) -> CanvasError {
    CanvasError::Dom(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

pub(crate) fn window() -> Result<web_sys::Window, CanvasError> {
    web_sys::window().ok_or_else(|| CanvasError::Dom("no global window".into()))
}

/// Create a `<canvas>` element, append it to the body and prepare its 2D
/// context with `font`.
pub(crate) fn create_surface(width: i32, height: i32, font: &str) -> Result<Surface, CanvasError> {
    let document = window()?
        .document()
        .ok_or_else(|| CanvasError::Dom("no document".into()))?;
    let element: HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(dom_error)?
        .dyn_into()
        .map_err(|_| CanvasError::Dom("created element is not a canvas".into()))?;
    element.set_width(width.max(0) as u32);
    element.set_height(height.max(0) as u32);
    element.set_class_name("canvas");

    let body = document
        .body()
        .ok_or_else(|| CanvasError::Dom("document has no body".into()))?;
    body.append_child(&element).map_err(dom_error)?;

    let ctx: CanvasRenderingContext2d = element
        .get_context("2d")
        .map_err(dom_error)?
        .ok_or_else(|| CanvasError::Dom("2d context unavailable".into()))?
        .dyn_into()
        .map_err(|_| CanvasError::Dom("unexpected 2d context type".into()))?;
    ctx.set_font(font);
    Ok(Surface { element, ctx })
}

pub(crate) fn close_canvas(id: CanvasId) {
    let (hook, last) = with(|p| p.close(id));
    if let Some(fx) = hook {
        fx();
    }
    if last {
        log::info!("last canvas closed; closing window");
        if let Ok(window) = window() {
            let _ = window.close();
        }
    }
}

/// The page is going away: run the finish hook, stop every canvas' timers
/// and forget all canvases.
pub(crate) fn page_closing() {
    if let Some(fx) = with(|p| p.registry.take_on_finish()) {
        fx();
    }
    let open = with(|p| p.registry.begin_closing());
    for id in open {
        close_canvas(id);
    }
    with(|p| {
        p.registry.clear();
        p.surfaces.clear();
    });
    log::info!("page closed");
}
