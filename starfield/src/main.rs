//! Galaxy Starfield
//!
//! Star clusters drifting around the viewer, drawn as short motion trails:
//! - Softened gravity between galaxies and their stars
//! - Mouse-driven attractor that drags nearby stars along
//! - Escaped stars recycled back into view
//!
//! Controls:
//! - Left mouse hold: Attractor under the cursor
//! - Right mouse drag: Look around
//! - Space: New galaxies
//! - P: Pause/resume
//! - T: Toggle trails
//! - R: Reset view

mod renderer;
mod equations_ui;

use common::{EyeCamera, GraphicsContext};
use equations_ui::{draw_equations_sidebar, STARFIELD_EQUATIONS, STARFIELD_VARIABLES};
use glam::Vec2;
use renderer::Renderer;
use starfield::constants::{NUM_GALAXIES, NUM_STARS};
use starfield::state::Eye;
use starfield::{EventAction, SceneConfig, SpaceLayer};
use winit::{
    event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent},
    event_loop::ControlFlow,
    keyboard::{KeyCode, PhysicalKey},
};

/// Attractor slot driven by the mouse
const MOUSE_TIP: usize = 0;

/// Distance in front of the eye where the mouse attractor sits
const TIP_DEPTH: f32 = 1.0;

struct EguiState {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

struct App {
    ctx: GraphicsContext,
    renderer: Renderer,
    layer: SpaceLayer,
    camera: EyeCamera,
    paused: bool,
    show_trails: bool,
    attracting: bool,
    looking: bool,
    cursor: Option<(f64, f64)>,
    last_look_pos: Option<(f64, f64)>,
    egui: EguiState,
}

impl App {
    fn new(ctx: GraphicsContext, config: &SceneConfig) -> Self {
        let camera = EyeCamera::new(config.eye_position, ctx.aspect_ratio());
        let layer = SpaceLayer::new(config, eye_of(&camera));
        let renderer = Renderer::new(&ctx, &camera, NUM_STARS);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &ctx.window,
            Some(ctx.window.scale_factor() as f32),
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &ctx.device,
            ctx.config.format,
            None,
            1,
        );

        Self {
            ctx,
            renderer,
            layer,
            camera,
            paused: false,
            show_trails: true,
            attracting: false,
            looking: false,
            cursor: None,
            last_look_pos: None,
            egui: EguiState {
                ctx: egui_ctx,
                state: egui_state,
                renderer: egui_renderer,
            },
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        self.ctx.resize(new_size);
        self.camera.update_aspect_ratio(self.ctx.aspect_ratio());
    }

    /// Cursor position in normalized device coordinates
    fn cursor_ndc(&self) -> Option<Vec2> {
        let (x, y) = self.cursor?;
        let width = self.ctx.size.width.max(1) as f64;
        let height = self.ctx.size.height.max(1) as f64;
        Some(Vec2::new(
            (2.0 * x / width - 1.0) as f32,
            (1.0 - 2.0 * y / height) as f32,
        ))
    }

    fn update_attractor(&mut self) {
        match (self.attracting, self.cursor_ndc()) {
            (true, Some(ndc)) => {
                let point = self.camera.cursor_point(ndc, TIP_DEPTH);
                self.layer.attractors_mut().set(MOUSE_TIP, point);
            }
            _ => self.layer.attractors_mut().release(MOUSE_TIP),
        }
    }

    fn update(&mut self, dt: f32) {
        self.layer.set_eye(eye_of(&self.camera));
        self.update_attractor();
        if !self.paused {
            self.layer.update(dt);
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer.update_camera(&self.ctx.queue, &self.camera);
        self.renderer.upload_trail(&self.ctx.queue, self.layer.trail());

        let readout = [
            ("Galaxies", NUM_GALAXIES.to_string()),
            ("Stars", NUM_STARS.to_string()),
            ("Attractors", self.layer.attractors().active_count().to_string()),
            ("Frame", self.layer.frame().to_string()),
            ("Seed", self.layer.seed().to_string()),
            ("State", if self.paused { "PAUSED" } else { "RUNNING" }.to_string()),
        ];

        // Build egui UI
        let raw_input = self.egui.state.take_egui_input(&self.ctx.window);
        let full_output = self.egui.ctx.run(raw_input, |ctx| {
            draw_equations_sidebar(
                ctx,
                "Galaxy Starfield",
                &readout,
                STARFIELD_EQUATIONS,
                STARFIELD_VARIABLES,
            );
        });

        self.egui.state.handle_platform_output(&self.ctx.window, full_output.platform_output);
        let tris = self.egui.ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui.renderer.update_texture(&self.ctx.device, &self.ctx.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.ctx.size.width, self.ctx.size.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.renderer
            .render(&mut encoder, &view, self.layer.trail(), self.show_trails);

        self.egui.renderer.update_buffers(
            &self.ctx.device,
            &self.ctx.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.egui.renderer.render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui.renderer.free_texture(id);
        }

        self.ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode, state: ElementState) {
        if self.layer.handle_key(key, state) == EventAction::Consume {
            return;
        }
        if state != ElementState::Pressed {
            return;
        }

        match key {
            KeyCode::KeyP => self.paused = !self.paused,
            KeyCode::KeyT => self.show_trails = !self.show_trails,
            KeyCode::KeyR => self.camera.reset_view(),
            _ => {}
        }
    }

    fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.attracting = pressed,
            MouseButton::Right => {
                self.looking = pressed;
                if !pressed {
                    self.last_look_pos = None;
                }
            }
            _ => {}
        }
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
        if self.looking {
            if let Some((last_x, last_y)) = self.last_look_pos {
                let dx = (x - last_x) as f32 * 0.005;
                let dy = (y - last_y) as f32 * 0.005;
                self.camera.look(-dx, -dy);
            }
            self.last_look_pos = Some((x, y));
        }
    }

    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        self.egui.state.on_window_event(&self.ctx.window, event).consumed
    }
}

fn eye_of(camera: &EyeCamera) -> Eye {
    Eye::new(camera.position, camera.view_rotation())
}

fn main() {
    let window = SceneConfig::default();
    let (ctx, event_loop) = pollster::block_on(GraphicsContext::new(
        &window.title,
        window.width,
        window.height,
    ));

    // Read after the logger is up so a bad seed gets reported
    let config = SceneConfig::from_env();

    let mut app = App::new(ctx, &config);
    let mut last_time = std::time::Instant::now();

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { ref event, .. } => {
                    let consumed = app.handle_window_event(event);

                    if !consumed {
                        match event {
                            WindowEvent::CloseRequested => elwt.exit(),
                            WindowEvent::Resized(size) => app.resize(*size),
                            WindowEvent::MouseInput { state, button, .. } => {
                                app.handle_mouse_button(*button, *state);
                            }
                            WindowEvent::CursorMoved { position, .. } => {
                                app.handle_mouse_move(position.x, position.y);
                            }
                            WindowEvent::CursorLeft { .. } => app.cursor = None,
                            WindowEvent::KeyboardInput {
                                event:
                                    KeyEvent {
                                        physical_key: PhysicalKey::Code(key),
                                        state,
                                        ..
                                    },
                                ..
                            } => app.handle_key(*key, *state),
                            WindowEvent::RedrawRequested => {
                                let now = std::time::Instant::now();
                                let dt = (now - last_time).as_secs_f32().min(0.1);
                                last_time = now;

                                app.update(dt);
                                match app.render() {
                                    Ok(_) => {}
                                    Err(wgpu::SurfaceError::Lost) => app.resize(app.ctx.size),
                                    Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                    Err(e) => log::error!("Render error: {:?}", e),
                                }
                            }
                            _ => {}
                        }
                    }
                }
                Event::AboutToWait => {
                    app.ctx.window.request_redraw();
                }
                _ => {}
            }
        })
        .expect("Event loop error");
}
