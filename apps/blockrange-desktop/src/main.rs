mod keymap;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use blockrange_common::Tuning;
use blockrange_input::{InputEvent, InputState, KeyBindings};
use blockrange_kernel::{FrameSimulator, SimEvent, SimState};
use blockrange_render::RenderView;
use blockrange_render_wgpu::{Projection, WgpuRenderer};
use blockrange_tools::{FpsCounter, StateInspector};
use clap::Parser;
use egui::Context as EguiContext;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

#[derive(Parser)]
#[command(name = "blockrange-desktop", about = "Blockrange desktop demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Tuning file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rebind a key, e.g. `--bind q=fire` or `--bind space=w` (repeatable)
    #[arg(short, long = "bind", value_name = "KEY=NAME")]
    bind: Vec<String>,
}

fn key_bindings(overrides: &[String]) -> Result<KeyBindings> {
    let mut bindings = KeyBindings::default();
    for binding in overrides {
        bindings
            .apply_override(binding)
            .with_context(|| format!("applying --bind {binding}"))?;
    }
    Ok(bindings)
}

/// Simulation plus everything the shell tracks between frames.
struct AppState {
    sim: FrameSimulator,
    state: SimState,
    input: InputState,
    view: RenderView,
    projection: Projection,
    fps: FpsCounter,
    show_inspector: bool,
}

impl AppState {
    fn new(sim: FrameSimulator, bindings: KeyBindings) -> Self {
        let state = sim.initial_state();
        let view = RenderView::from_rig(&sim.camera_rig(&state));
        Self {
            sim,
            state,
            input: InputState::new(bindings),
            view,
            projection: Projection::default(),
            fps: FpsCounter::new(),
            show_inspector: false,
        }
    }

    /// One simulation tick per rendered frame.
    fn step(&mut self) {
        let frame = self.input.take_frame();
        let out = self.sim.tick(&mut self.state, &frame);
        for event in &out.events {
            match event {
                SimEvent::Recovered | SimEvent::PlayerReset => {
                    tracing::info!(tick = self.state.tick, ?event, "player back at spawn")
                }
                _ => tracing::debug!(tick = self.state.tick, ?event, "sim event"),
            }
        }
        self.view = RenderView::from_rig(&out.rig);
        self.fps.frame(Instant::now());
    }

    fn draw_ui(&self, ctx: &EguiContext) {
        let text = |s: String| egui::RichText::new(s).monospace().color(egui::Color32::BLACK);

        egui::Area::new(egui::Id::new("fps"))
            .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(text(format!("FPS: {}", self.fps.fps())));
            });

        egui::Area::new(egui::Id::new("version"))
            .anchor(egui::Align2::LEFT_BOTTOM, [10.0, -10.0])
            .interactable(false)
            .show(ctx, |ui| {
                ui.label(text(format!("v{}", env!("CARGO_PKG_VERSION"))));
            });

        if self.show_inspector {
            let summary = StateInspector::summary(&self.state);
            egui::Window::new("Inspector")
                .default_pos([10.0, 10.0])
                .resizable(false)
                .show(ctx, |ui| {
                    let p = summary.player_position;
                    ui.label(format!("Tick: {}", summary.tick));
                    ui.label(format!("Player: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z));
                    ui.label(format!(
                        "vy: {:.3}  grounded: {}",
                        summary.velocity_y, summary.grounded
                    ));
                    ui.label(format!(
                        "Yaw: {:.1}  Pitch: {:.1}",
                        summary.yaw_degrees, summary.pitch_degrees
                    ));
                    ui.label(format!(
                        "Gun: {}",
                        if summary.gun_held { "held" } else { "dropped" }
                    ));
                    ui.label(format!("Projectiles: {}", summary.projectile_count));
                    if let Some(d) = summary.nearest_projectile {
                        ui.label(format!("Nearest projectile: {d:.1}"));
                    }
                    ui.separator();
                    ui.small("Click: lock + fire | Esc: release | Q: drop | R: reset | F3: hide");
                });
        }
    }
}

/// Surface, device and the two renderers drawing into it.
struct Gpu {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(window: Arc<Window>, egui_ctx: &EguiContext) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible GPU adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("blockrange_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("creating device")?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = WgpuRenderer::new(&device, format, config.width, config.height);
        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            backend = adapter.get_info().backend.to_str(),
            ?format,
            "GPU initialized"
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
        self.renderer
            .resize(&self.device, self.config.width, self.config.height);
    }

    fn frame(&mut self, window: &Window, egui_ctx: &EguiContext, app: &AppState) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.render(
            &self.device,
            &self.queue,
            &target,
            &app.projection,
            &app.state,
            &app.view,
        );

        let raw_input = self.egui_winit.take_egui_input(window);
        let full_output = egui_ctx.run(raw_input, |ctx| app.draw_ui(ctx));
        self.egui_winit
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("overlay_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("overlay_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    app: AppState,
    window: Option<Arc<Window>>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
}

impl GpuApp {
    fn new(app: AppState) -> Self {
        Self {
            app,
            window: None,
            gpu: None,
            egui_ctx: EguiContext::default(),
        }
    }

    fn lock_pointer(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let grabbed = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
        match grabbed {
            Ok(()) => {
                window.set_cursor_visible(false);
                self.app
                    .input
                    .process_event(&InputEvent::PointerLockChanged { locked: true });
                tracing::debug!("pointer locked");
            }
            Err(e) => tracing::warn!("pointer lock unavailable: {e}"),
        }
    }

    fn release_pointer(&mut self) {
        if let Some(window) = &self.window {
            if let Err(e) = window.set_cursor_grab(CursorGrabMode::None) {
                tracing::warn!("failed to release pointer: {e}");
            }
            window.set_cursor_visible(true);
        }
        self.app
            .input
            .process_event(&InputEvent::PointerLockChanged { locked: false });
        tracing::debug!("pointer released");
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("Blockrange")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match Gpu::new(window.clone(), &self.egui_ctx) {
            Ok(gpu) => {
                let size = window.inner_size();
                self.app.projection.resize(size.width, size.height);
                self.gpu = Some(gpu);
                self.window = Some(window);
            }
            Err(e) => {
                tracing::error!("GPU setup failed: {e:#}");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let (Some(gpu), Some(window)) = (&mut self.gpu, &self.window) {
            if gpu.egui_winit.on_window_event(window, &event).consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.app.projection.resize(new_size.width, new_size.height);
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size);
                }
            }
            WindowEvent::Focused(false) => {
                self.app.input.process_event(&InputEvent::FocusLost);
                self.release_pointer();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => {
                if state == ElementState::Pressed {
                    match code {
                        KeyCode::Escape => self.release_pointer(),
                        KeyCode::F3 => self.app.show_inspector = !self.app.show_inspector,
                        _ => {}
                    }
                }
                if let Some(event) = keymap::key_event(code, state) {
                    self.app.input.process_event(&event);
                }
            }
            WindowEvent::MouseInput { button, state, .. } => {
                if state == ElementState::Pressed
                    && button == winit::event::MouseButton::Left
                    && !self.app.input.pointer_locked()
                {
                    self.lock_pointer();
                }
                if let Some(event) = keymap::button_event(button, state) {
                    self.app.input.process_event(&event);
                }
            }
            WindowEvent::RedrawRequested => {
                self.app.step();
                if let (Some(gpu), Some(window)) = (&mut self.gpu, &self.window) {
                    gpu.frame(window, &self.egui_ctx, &self.app);
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.app.input.process_event(&InputEvent::MouseMove {
                dx: delta.0 as f32,
                dy: delta.1 as f32,
            });
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let tuning = match &cli.config {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning from {}", path.display()))?,
        None => Tuning::default(),
    };
    let bindings = key_bindings(&cli.bind)?;

    tracing::info!("blockrange-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let sim = FrameSimulator::new(tuning)?;
    let mut app = GpuApp::new(AppState::new(sim, bindings));
    event_loop.run_app(&mut app)?;

    Ok(())
}
