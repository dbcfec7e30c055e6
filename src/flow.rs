//! Application event loop.
//!
//! [`App`] drives the winit event loop. Once the window exists it builds an [`AppState`], which
//! owns the GPU context, the world, the camera and the lights. Every redraw runs the same
//! sequence:
//!
//! 1. Collect window/device events into the input buffer
//! 2. Let the camera controller consume the buffered input
//! 3. Record one draw per entity via [`render_world`]
//! 4. Submit and present the frame
//! 5. Leave the loop if a close was requested or Escape is held

use std::sync::Arc;

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{CursorGrabMode, Window},
};

use crate::{
    camera::{Camera, CameraController, Projection},
    config::Config,
    context::Context,
    data_structures::{
        material::MaterialTable,
        scene::{STREET_SCENE, World},
    },
    input::InputState,
    pipelines::light::SceneLights,
    render::{FrameParams, render_world},
    resources::load_material_textures,
};

/// Everything the running scene owns.
#[derive(Debug)]
pub struct AppState {
    pub(crate) ctx: Context,
    pub world: World,
    pub materials: MaterialTable,
    pub camera: Camera,
    pub controller: CameraController,
    pub projection: Projection,
    pub lights: SceneLights,
    pub input: InputState,
}

impl AppState {
    async fn new(window: Arc<Window>, config: &Config) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config).await?;
        Self::with_context(ctx, config).await
    }

    /// Builds the street world and loads the material textures on an existing context.
    pub async fn with_context(mut ctx: Context, config: &Config) -> anyhow::Result<Self> {
        let world = World::build(&mut ctx, &STREET_SCENE)?;
        let materials = load_material_textures(&mut ctx, &config.asset_root).await;
        let unbound = materials.unbound_kinds();
        if !unbound.is_empty() {
            log::warn!("Materials without texture, drawn black: {unbound:?}");
        }

        Ok(Self {
            ctx,
            world,
            materials,
            camera: Camera::from_config(&config.camera),
            controller: CameraController::new(&config.camera),
            projection: Projection::from_config(config),
            lights: SceneLights::default(),
            input: InputState::new(),
        })
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    /// Applies the input buffered since the last frame.
    pub fn update(&mut self, dt: Duration) {
        self.controller.update(&mut self.camera, &mut self.input, dt);
    }

    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.begin_frame();
        let frame = FrameParams::new(&self.camera, &self.controller, &self.projection);
        render_world(&mut self.ctx, &self.world, &self.materials, &self.lights, &frame);
        self.ctx.end_frame()
    }

    /// Releases every mesh and texture.
    pub fn destroy(&mut self) {
        std::mem::take(&mut self.world).destroy(&mut self.ctx);
        std::mem::take(&mut self.materials).destroy(&mut self.ctx);
    }
}

pub struct App {
    async_runtime: tokio::runtime::Runtime,
    config: Config,
    state: Option<AppState>,
    last_time: Instant,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            state: None,
            last_time: Instant::now(),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Arc<Window>> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(LogicalSize::new(self.config.window.width, self.config.window.height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        // Mouse look: hide the pointer and keep it in the window.
        if let Err(e) = window
            .set_cursor_grab(CursorGrabMode::Confined)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Locked))
        {
            log::warn!("Could not grab the cursor: {e}");
        }
        window.set_cursor_visible(false);
        Ok(window)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = match self.create_window(event_loop) {
            Ok(window) => window,
            Err(e) => return self.fail(event_loop, e.context("Failed to create the window")),
        };

        match self
            .async_runtime
            .block_on(AppState::new(window.clone(), &self.config))
        {
            Ok(state) => {
                self.state = Some(state);
                self.last_time = Instant::now();
                window.request_redraw();
            }
            Err(e) => self.fail(event_loop, e.context("App initialization failed")),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let Some(state) = &mut self.state {
            state.input.handle_device_event(&event);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.input.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.ctx.resize(size.width, size.height),
            WindowEvent::Focused(true) => state.controller.reset_first_mouse(),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                state.update(dt);
                match state.render() {
                    Ok(()) => {}
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(window) = state.ctx.window() {
                            let size = window.inner_size();
                            state.ctx.resize(size.width, size.height);
                        }
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }

                if state.input.should_close() {
                    log::info!("Leaving the scene");
                    event_loop.exit();
                } else if let Some(window) = state.ctx.window() {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut state) = self.state.take() {
            state.destroy();
        }
    }
}

/// Installs the `RUST_LOG` driven logger. Call before anything that logs.
pub fn init_logger() {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };
}

/// Opens the window and renders the street scene until it is closed.
pub fn run(config: Config) -> anyhow::Result<()> {
    log::info!("Reading textures from {}", config.asset_root.display());

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config)?;
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
