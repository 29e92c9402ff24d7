//! Browser backend for Sketchpad.
//!
//! Each canvas is an HTML `<canvas>` element appended to the page body.
//! Compiled via `wasm-pack build --target web`; the program's setup goes in
//! [`on_start`], which runs once the page has loaded.

mod canvas;
mod console;
#[cfg(feature = "demo")]
mod demo;
mod page;
mod paint;
mod sound;

pub use canvas::{Canvas, TimerCtrl};
pub use console::init_logging;
pub use page::CanvasId;
pub use paint::TEXT_MAX_WIDTH;
pub use sketch_core::*;
pub use sound::{load_sounds, play_sound};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// Run `fx` once the page is loaded (right away if it already is). Leaving
/// the page runs the finish hook and stops every canvas.
pub fn on_start(fx: impl FnOnce() + 'static) -> Result<()> {
    console::panic_hook_setup();
    let window = page::window()?;

    let leave = Closure::<dyn FnMut()>::new(page::page_closing).into_js_value();
    window.set_onpagehide(Some(leave.unchecked_ref()));

    let loaded = window
        .document()
        .and_then(|doc| js_sys::Reflect::get(&doc, &JsValue::from_str("readyState")).ok())
        .and_then(|state| state.as_string())
        .is_some_and(|state| state == "complete");
    if loaded {
        fx();
    } else {
        let start = Closure::once_into_js(fx);
        window.set_onload(Some(start.unchecked_ref()));
    }
    Ok(())
}

/// Run `fx` when the page closes, or when the last canvas is closed.
pub fn on_finish(fx: impl FnOnce() + 'static) {
    page::with(|p| p.registry.set_on_finish(Box::new(fx)));
}

/// Replace the page settings. Only the title and font apply in the
/// browser; call before creating canvases.
pub fn configure(config: WindowConfig) {
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        doc.set_title(&config.title);
    }
    page::with(|p| p.config = config);
}
