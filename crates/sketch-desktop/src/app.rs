//! winit application driving the desktop window.
//!
//! One window hosts every canvas. Input is routed to the canvas under the
//! pointer (drags stay with the canvas the press started on), keys go to the
//! focused canvas, timers fire from `about_to_wait`, and a frame is drawn
//! whenever something changed.

use crate::keys::key_event;
use crate::state::{self, CanvasId};
use sketch_core::{CanvasError, MouseEvent};
use sketch_render::{compose, to_peniko};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;
use vello::util::{RenderContext, RenderSurface};
use vello::{AaConfig, AaSupport, RenderParams, Renderer, RendererOptions, Scene, wgpu};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

// ─── GPU state ───────────────────────────────────────────────────────────

struct Gfx {
    window: Arc<Window>,
    context: RenderContext,
    surface: RenderSurface<'static>,
    renderer: Renderer,
    scene: Scene,
}

impl Gfx {
    async fn new(window: Arc<Window>) -> Result<Self, CanvasError> {
        let size = window.inner_size();
        let mut context = RenderContext::new();
        let surface = context
            .create_surface(
                window.clone(),
                size.width.max(1),
                size.height.max(1),
                wgpu::PresentMode::AutoVsync,
            )
            .await
            .map_err(|err| CanvasError::Surface(err.to_string()))?;
        let device = &context.devices[surface.dev_id].device;
        let renderer = Renderer::new(
            device,
            RendererOptions {
                use_cpu: false,
                antialiasing_support: AaSupport::area_only(),
                num_init_threads: NonZeroUsize::new(1),
                pipeline_cache: None,
            },
        )
        .map_err(|err| CanvasError::Surface(err.to_string()))?;
        Ok(Self {
            window,
            context,
            surface,
            renderer,
            scene: Scene::new(),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.context
            .resize_surface(&mut self.surface, size.width, size.height);
    }

    /// Compose every canvas layer and present one frame.
    fn render(&mut self) -> Result<(), CanvasError> {
        let scale = self.window.scale_factor();
        let scene = &mut self.scene;
        scene.reset();
        let base_color = state::with(|d| {
            let arrangement = d.arrangement();
            let layers = d
                .slots
                .iter()
                .map(|s| &s.layer)
                .zip(arrangement.placements.iter().copied());
            compose(scene, layers, scale);
            d.dirty = false;
            to_peniko(d.config.background)
        });

        let handle = &self.context.devices[self.surface.dev_id];
        let frame = self
            .surface
            .surface
            .get_current_texture()
            .map_err(|err| CanvasError::Surface(err.to_string()))?;
        self.renderer
            .render_to_texture(
                &handle.device,
                &handle.queue,
                &self.scene,
                &self.surface.target_view,
                &RenderParams {
                    base_color,
                    width: self.surface.config.width,
                    height: self.surface.config.height,
                    antialiasing_method: AaConfig::Area,
                },
            )
            .map_err(|err| CanvasError::Surface(err.to_string()))?;

        let mut encoder = handle
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sketchpad blit"),
            });
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.surface.blitter.copy(
            &handle.device,
            &mut encoder,
            &self.surface.target_view,
            &frame_view,
        );
        handle.queue.submit([encoder.finish()]);
        frame.present();
        handle.device.poll(wgpu::Maintain::Poll);
        Ok(())
    }
}

// ─── Application ─────────────────────────────────────────────────────────

pub(crate) struct App {
    start: Option<Box<dyn FnOnce()>>,
    gfx: Option<Gfx>,
    /// Last pointer position in logical window pixels.
    cursor: Option<LogicalPosition<f64>>,
    /// Canvas a drag started on.
    pressed_on: Option<CanvasId>,
    error: Option<CanvasError>,
}

impl App {
    pub fn new(start: Option<Box<dyn FnOnce()>>) -> Self {
        Self {
            start,
            gfx: None,
            cursor: None,
            pressed_on: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn into_result(self) -> Result<(), CanvasError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: CanvasError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn window_size() -> LogicalSize<f64> {
        let arrangement = state::with(|d| d.arrangement());
        LogicalSize::new(arrangement.width.max(1.0), arrangement.height.max(1.0))
    }

    fn mouse_moved(&mut self, at: LogicalPosition<f64>) {
        self.cursor = Some(at);
        if let Some(id) = self.pressed_on {
            if let Some((x, y)) = state::with(|d| d.local_point(id, at.x, at.y)) {
                state::dispatch(id, state::mouse_move_slot, MouseEvent::new(x, y, true));
            }
        } else if let Some((id, x, y)) = state::with(|d| d.canvas_at(at.x, at.y)) {
            state::dispatch(id, state::mouse_move_slot, MouseEvent::new(x, y, false));
        }
    }

    /// Any button press reaches the canvas under the pointer. Only the
    /// primary button starts and ends a drag.
    fn mouse_input(&mut self, pressed: ElementState, button: MouseButton) {
        match pressed {
            ElementState::Pressed => {
                let Some(at) = self.cursor else {
                    return;
                };
                if let Some((id, x, y)) = state::with(|d| d.canvas_at(at.x, at.y)) {
                    if button == MouseButton::Left {
                        self.pressed_on = Some(id);
                    }
                    log::trace!("{button:?} press -> canvas {id:?}");
                    state::dispatch(id, state::mouse_down_slot, MouseEvent::new(x, y, true));
                }
            }
            ElementState::Released if button == MouseButton::Left => self.pressed_on = None,
            ElementState::Released => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gfx.is_some() {
            return;
        }
        if let Some(start) = self.start.take() {
            log::info!("running start hook");
            start();
        }
        if state::with(|d| d.exit_requested) {
            event_loop.exit();
            return;
        }

        let title = state::with(|d| d.config.title.clone());
        let attrs = Window::default_attributes()
            .with_title(title)
            .with_inner_size(Self::window_size())
            .with_resizable(false);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, CanvasError::EventLoop(err.to_string())),
        };
        match pollster::block_on(Gfx::new(window)) {
            Ok(gfx) => {
                log::info!("window opened");
                state::with(|d| d.layout_changed = false);
                gfx.window.request_redraw();
                self.gfx = Some(gfx);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if state::request_window_close() {
                    event_loop.exit();
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(gfx) = &mut self.gfx {
                    gfx.resize(size);
                    gfx.window.request_redraw();
                }
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(gfx) = &self.gfx {
                    gfx.window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.gfx.as_ref().map_or(1.0, |g| g.window.scale_factor());
                self.mouse_moved(position.to_logical(scale));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseInput { state: pressed, button, .. } => self.mouse_input(pressed, button),
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let focus = state::with(|d| d.focus);
                if let (Some(id), Some(key)) = (focus, key_event(&event.logical_key)) {
                    log::trace!("key {:?} -> canvas {id:?}", key.text);
                    state::dispatch(id, state::key_pressed_slot, key);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(gfx) = &mut self.gfx
                    && let Err(err) = gfx.render()
                {
                    log::error!("frame dropped: {err}");
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        state::fire_due_timers(Instant::now());
        if state::with(|d| d.exit_requested) {
            event_loop.exit();
            return;
        }

        if let Some(gfx) = &mut self.gfx {
            if state::with(|d| std::mem::take(&mut d.layout_changed)) {
                if let Some(size) = gfx.window.request_inner_size(Self::window_size()) {
                    gfx.resize(size);
                }
                state::with(|d| d.dirty = true);
            }
            if state::with(|d| d.dirty) {
                gfx.window.request_redraw();
            }
        }

        match state::with(|d| d.timers.next_deadline()) {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Canvas;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorded(cv: Canvas) -> (Rc<RefCell<Vec<MouseEvent>>>, Rc<RefCell<Vec<MouseEvent>>>) {
        let (downs, moves) = (Rc::new(RefCell::new(Vec::new())), Rc::new(RefCell::new(Vec::new())));
        let d = downs.clone();
        cv.on_mouse_down(move |e| d.borrow_mut().push(e));
        let m = moves.clone();
        cv.on_mouse_move(move |e| m.borrow_mut().push(e));
        (downs, moves)
    }

    #[test]
    fn every_button_presses_but_only_primary_drags() {
        let cv = Canvas::with_size(100, 100);
        let (downs, moves) = recorded(cv);
        let mut app = App::new(None);

        app.mouse_moved(LogicalPosition::new(15.0, 25.0));
        app.mouse_input(ElementState::Pressed, MouseButton::Right);
        app.mouse_input(ElementState::Pressed, MouseButton::Middle);
        assert_eq!(*downs.borrow(), vec![MouseEvent::new(10, 20, true); 2]);
        assert_eq!(app.pressed_on, None);

        app.mouse_input(ElementState::Pressed, MouseButton::Left);
        assert_eq!(downs.borrow().len(), 3);
        assert_eq!(app.pressed_on, Some(cv.id()));

        app.mouse_input(ElementState::Released, MouseButton::Right);
        assert_eq!(app.pressed_on, Some(cv.id()));
        app.mouse_moved(LogicalPosition::new(200.0, 25.0));
        assert_eq!(moves.borrow().last(), Some(&MouseEvent::new(195, 20, true)));

        app.mouse_input(ElementState::Released, MouseButton::Left);
        assert_eq!(app.pressed_on, None);
    }

    #[test]
    fn press_outside_every_canvas_is_dropped() {
        let cv = Canvas::with_size(100, 100);
        let (downs, _) = recorded(cv);
        let mut app = App::new(None);

        app.mouse_input(ElementState::Pressed, MouseButton::Left);
        app.mouse_moved(LogicalPosition::new(1.0, 1.0));
        app.mouse_input(ElementState::Pressed, MouseButton::Left);
        assert!(downs.borrow().is_empty());
        assert_eq!(app.pressed_on, None);
    }
}
