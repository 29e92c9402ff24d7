//! Desktop backend for Sketchpad.
//!
//! Canvases live in a single native window, laid out left to right. The
//! program's setup runs in [`Window::on_start`] once the event loop is up:
//!
//! ```no_run
//! use sketch_desktop::{Canvas, Draw, RED, Window};
//!
//! Window::new()
//!     .on_start(|| {
//!         let cv = Canvas::with_size(300, 200);
//!         cv.on_mouse_down(move |e| cv.draw_circle(e.x, e.y, 10, RED, 2));
//!     })
//!     .run()
//!     .unwrap();
//! ```

mod app;
mod canvas;
mod keys;
mod sound;
mod state;

pub use canvas::{Canvas, TimerCtrl};
pub use keys::{key_event, key_name};
pub use sketch_core::*;
pub use sound::{find_sound, load_sounds, play_sound};
pub use state::CanvasId;

use app::App;
use std::path::Path;
use winit::event_loop::EventLoop;

/// Environment variable naming a JSON [`WindowConfig`] file.
pub const CONFIG_ENV: &str = "SKETCHPAD_CONFIG";

/// Builder for the window hosting the canvases.
pub struct Window {
    config: WindowConfig,
    start: Option<Box<dyn FnOnce()>>,
    finish: Option<Box<dyn FnOnce()>>,
}

impl Window {
    /// Default settings, overridden by the file named in `SKETCHPAD_CONFIG`
    /// when it is set and readable.
    pub fn new() -> Self {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => load_config(Path::new(&path)).unwrap_or_else(|err| {
                log::warn!("ignoring {}: {err}", Path::new(&path).display());
                WindowConfig::default()
            }),
            None => WindowConfig::default(),
        };
        Self::with_config(config)
    }

    pub fn with_config(config: WindowConfig) -> Self {
        Self {
            config,
            start: None,
            finish: None,
        }
    }

    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Run `fx` once the window system is ready. Create canvases here.
    pub fn on_start(mut self, fx: impl FnOnce() + 'static) -> Self {
        self.start = Some(Box::new(fx));
        self
    }

    /// Run `fx` when the window closes. Also enables the close button.
    pub fn on_finish(mut self, fx: impl FnOnce() + 'static) -> Self {
        self.finish = Some(Box::new(fx));
        self
    }

    /// Open the window and block until it closes.
    pub fn run(self) -> Result<()> {
        state::set_config(self.config);
        if let Some(fx) = self.finish {
            state::with(|d| d.registry.set_on_finish(fx));
        }
        let event_loop = EventLoop::new().map_err(|err| CanvasError::EventLoop(err.to_string()))?;
        let mut app = App::new(self.start);
        event_loop
            .run_app(&mut app)
            .map_err(|err| CanvasError::EventLoop(err.to_string()))?;
        log::info!("event loop finished");
        app.into_result()
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a JSON [`WindowConfig`] file.
pub fn load_config(path: &Path) -> Result<WindowConfig> {
    let text = std::fs::read_to_string(path)?;
    WindowConfig::from_json(&text)
}

/// Open a default window and run `fx` in it. Blocks until the window closes.
pub fn on_start(fx: impl FnOnce() + 'static) -> Result<()> {
    Window::new().on_start(fx).run()
}

/// Run `fx` when the window closes. Until this is called the window's close
/// button does nothing. Call it from the start hook.
pub fn on_finish(fx: impl FnOnce() + 'static) {
    state::with(|d| d.registry.set_on_finish(Box::new(fx)));
}
