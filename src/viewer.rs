//! Standalone visualization window backed by winit.
//!
//! ```no_run
//! # use detview::{scene::Scene, viewer::Viewer};
//! Viewer::builder()
//!     .with_scene(Scene::new())
//!     .with_title("Event 42")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, TouchPhase, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    engine::ViewEngine,
    error::ViewerError,
    gpu::{render_context::RenderContext, scene_renderer::SceneRenderer},
    input::{CanvasId, InputEvent, MouseButton},
    options::Options,
    picking::SelectionEvent,
    scene::Scene,
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    scene: Option<Scene>,
    options: Option<Options>,
    title: String,
    selecting: bool,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            scene: None,
            options: None,
            title: "detview".into(),
            selecting: true,
        }
    }

    /// Scene to display. Defaults to an empty scene.
    #[must_use]
    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Start with selection mode on or off (on by default).
    #[must_use]
    pub fn with_selecting(mut self, selecting: bool) -> Self {
        self.selecting = selecting;
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            scene: self.scene.unwrap_or_default(),
            options: self.options.unwrap_or_default(),
            title: self.title,
            selecting: self.selecting,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window that displays one scene.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    scene: Scene,
    options: Options,
    title: String,
    selecting: bool,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Viewer`] if the event loop cannot start.
    pub fn run(self) -> Result<(), ViewerError> {
        let event_loop =
            EventLoop::new().map_err(|e| ViewerError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            pending: Some((self.scene, self.options)),
            title: self.title,
            selecting: self.selecting,
            cursor: (0.0, 0.0),
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ViewerError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<ViewEngine<SceneRenderer>>,
    /// Scene and options waiting for the window to exist.
    pending: Option<(Scene, Options)>,
    title: String,
    selecting: bool,
    /// Last cursor position; winit reports buttons without one.
    cursor: (f32, f32),
}

fn viewport_size(inner: winit::dpi::PhysicalSize<u32>) -> (u32, u32) {
    (inner.width.max(1), inner.height.max(1))
}

impl ViewerApp {
    fn create_engine(
        &mut self,
        window: &Arc<Window>,
    ) -> Result<ViewEngine<SceneRenderer>, ViewerError> {
        let viewport = viewport_size(window.inner_size());
        let context =
            pollster::block_on(RenderContext::new(window.clone(), viewport))?;
        let renderer = SceneRenderer::new(context)?;
        let (scene, options) = self.pending.take().unwrap_or_default();
        let mut engine =
            ViewEngine::new(renderer, scene, viewport, options, Instant::now());
        engine.set_selecting(self.selecting);
        Ok(engine)
    }

    fn input(&mut self, event: &InputEvent) {
        let Some(engine) = &mut self.engine else {
            return;
        };
        match engine.handle_input(event, Instant::now()) {
            Some(SelectionEvent::DoubleClick { hit, .. }) => {
                log::debug!("double-click at {:?}", hit.point);
            }
            Some(other) => log::debug!("selection: {other:?}"),
            None => {}
        }
        if let Some(w) = &self.window {
            w.request_redraw();
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self.create_engine(&window) {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                log::error!("Failed to initialize engine: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(engine) = &mut self.engine {
                engine.dispose();
            }
            event_loop.exit();
            return;
        }

        if self.window.is_none() || self.engine.is_none() {
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                let (width, height) = viewport_size(size);
                self.input(&InputEvent::Resized {
                    canvas: CanvasId::Main,
                    width,
                    height,
                });
            }

            WindowEvent::RedrawRequested => {
                if let Some(engine) = &mut self.engine {
                    let _ = engine.frame(Instant::now());
                }
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let (x, y) = self.cursor;
                let button = MouseButton::from(button);
                let event = if state == ElementState::Pressed {
                    InputEvent::PointerDown {
                        canvas: CanvasId::Main,
                        x,
                        y,
                        button,
                    }
                } else {
                    InputEvent::PointerUp {
                        canvas: CanvasId::Main,
                        x,
                        y,
                        button,
                    }
                };
                self.input(&event);
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                self.input(&InputEvent::PointerMove {
                    canvas: CanvasId::Main,
                    x: self.cursor.0,
                    y: self.cursor.1,
                });
            }

            WindowEvent::Touch(touch) if touch.phase == TouchPhase::Started => {
                self.input(&InputEvent::TouchStart {
                    canvas: CanvasId::Main,
                    x: touch.location.x as f32,
                    y: touch.location.y as f32,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                self.input(&InputEvent::Scroll {
                    canvas: CanvasId::Main,
                    delta,
                });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.input(&InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let key_str = format!("{code:?}");
                if let Some(engine) = &mut self.engine {
                    if let Some(action) =
                        engine.handle_key(&key_str, Instant::now())
                    {
                        log::debug!("{key_str} -> {action:?}");
                    }
                }
            }

            _ => (),
        }
    }
}
