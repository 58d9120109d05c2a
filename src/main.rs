//! Demo driver: a fire fountain rendered with one instanced draw call.
//!
//! Controls: drag to orbit, scroll to zoom, Space toggles circle/square
//! particles, P pauses the clock.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use plume::error::AppError;
use plume::prelude::*;
use plume::Uniforms;

const PARTICLE_COUNT: usize = 1000;

/// Configure a fire-like fountain: warm colors, disc spawn area, upward
/// velocity with per-axis jitter, gentle gravity.
fn fountain_emitter() -> ParticleEmitter {
    let mut emitter = ParticleEmitter::new(PARTICLE_COUNT);
    emitter.spawn_shape = SpawnShape::Disc { radius: 0.4 };
    emitter.velocity = Vec3::new(0.0, 2.0, 0.0);
    emitter.delta_velocity0 = Vec3::new(-0.4, -0.5, -0.4);
    emitter.delta_velocity1 = Vec3::new(0.4, 0.5, 0.4);
    emitter.gravity = Vec3::new(0.0, -0.8, 0.0);
    emitter.color0 = Vec3::new(1.0, 0.25, 0.02);
    emitter.color1 = Vec3::new(1.0, 0.85, 0.3);
    emitter.lifespan0 = 0.8;
    emitter.lifespan1 = 2.2;
    emitter.size0 = 0.08;
    emitter.size1 = 0.2;
    emitter.rotation0 = 0.0;
    emitter.rotation1 = std::f32::consts::TAU;
    emitter.alpha0 = 0.3;
    emitter.alpha1 = 0.9;
    emitter
}

struct Scene {
    gpu: GpuContext,
    uniform_buffer: wgpu::Buffer,
    emitter: ParticleEmitter,
    renderer: InstancedParticleRenderer,
    camera: Camera,
    time: Time,
}

impl Scene {
    fn new(gpu: GpuContext) -> Self {
        let emitter = fountain_emitter();

        let uniforms = Uniforms {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            time: 0.0,
            delta_time: 0.0,
            _padding: [0.0; 2],
        };
        let uniform_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Uniform Buffer"),
                contents: bytemuck::bytes_of(&uniforms),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let renderer = InstancedParticleRenderer::new(
            &gpu.device,
            gpu.config.format,
            &uniform_buffer,
            &emitter,
        );

        Self {
            gpu,
            uniform_buffer,
            emitter,
            renderer,
            camera: Camera::new(),
            time: Time::new(),
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let dt = self.time.update();
        self.emitter.update(dt);

        let aspect = self.gpu.config.width as f32 / self.gpu.config.height as f32;
        let uniforms = Uniforms {
            view_proj: self.camera.view_proj(aspect).to_cols_array_2d(),
            time: self.time.elapsed(),
            delta_time: dt,
            _padding: [0.0; 2],
        };
        self.gpu
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        self.renderer.prepare(&self.gpu.queue, &self.emitter);

        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if self.emitter.active {
                self.renderer.draw(&mut render_pass);
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn toggle_shape(&mut self) {
        let next = match self.renderer.shape() {
            ParticleShape::Circle => ParticleShape::Square,
            ParticleShape::Square => ParticleShape::Circle,
        };
        self.renderer.set_shape(&self.gpu.queue, next);
    }
}

struct App {
    window: Option<Arc<Window>>,
    scene: Option<Scene>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
}

impl App {
    fn new() -> Self {
        Self {
            window: None,
            scene: None,
            mouse_pressed: false,
            last_mouse_pos: None,
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let Some(scene) = &mut self.scene else { return };
        match key {
            KeyCode::Space => scene.toggle_shape(),
            KeyCode::KeyP => scene.time.toggle_pause(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("plume - particle playground")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                eprintln!("{}", AppError::from(e));
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(GpuContext::new(window.clone())) {
            Ok(gpu) => {
                self.window = Some(window);
                self.scene = Some(Scene::new(gpu));
            }
            Err(e) => {
                eprintln!("{}", AppError::from(e));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(scene) = &mut self.scene {
                    scene.gpu.resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.handle_key(key);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        if let Some(scene) = &mut self.scene {
                            scene.camera.orbit(dx, dy);
                        }
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(scene) = &mut self.scene {
                    scene.camera.zoom(scroll);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(scene) = &mut self.scene {
                    match scene.render() {
                        Ok(_) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            let (w, h) = (scene.gpu.config.width, scene.gpu.config.height);
                            scene.gpu.resize(w, h);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

fn main() -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;
    Ok(())
}
