//! One-draw-call instanced particle rendering.
//!
//! The renderer is a per-frame projection of an emitter's pool into two
//! per-instance vertex buffers (a 4x4 transform and an RGBA color per
//! slot). It never mutates particle state and has no concept of liveness:
//! every slot becomes an instance every frame, dead or not, and both
//! buffers are re-uploaded in full. Pool sizes are small enough (hundreds
//! to low thousands) that full blocking uploads beat any delta scheme in
//! complexity-adjusted terms.
//!
//! The CPU side of the marshalling ([`write_instances`]) is a pure
//! function over the particle slice, so the transform/color math is
//! testable without a device.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use super::DEPTH_FORMAT;
use crate::emitter::ParticleEmitter;
use crate::particle::Particle;

/// Fragment-stage silhouette for every particle quad.
///
/// A closed two-variant enum rather than any string-keyed shader lookup;
/// the choice reaches the fragment shader as a small uniform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParticleShape {
    /// Discard fragments outside the inscribed circle.
    #[default]
    Circle,
    /// Keep the full quad.
    Square,
}

impl ParticleShape {
    fn index(self) -> u32 {
        match self {
            ParticleShape::Circle => 0,
            ParticleShape::Square => 1,
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct ShapeParams {
    shape: u32,
    _pad: [u32; 3],
}

/// Quad vertex: corner position and texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    uv: [f32; 2],
}

/// Unit quad, two triangles, uv in `[0, 1]`.
const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex { position: [-0.5, -0.5], uv: [0.0, 0.0] },
    QuadVertex { position: [0.5, -0.5], uv: [1.0, 0.0] },
    QuadVertex { position: [0.5, 0.5], uv: [1.0, 1.0] },
    QuadVertex { position: [-0.5, -0.5], uv: [0.0, 0.0] },
    QuadVertex { position: [0.5, 0.5], uv: [1.0, 1.0] },
    QuadVertex { position: [-0.5, 0.5], uv: [0.0, 1.0] },
];

/// Per-instance transform for one particle:
/// `translate(position) * rotate_y(rotation) * scale(scale * size)`.
pub fn instance_transform(particle: &Particle) -> Mat4 {
    Mat4::from_translation(particle.position)
        * Mat4::from_rotation_y(particle.rotation)
        * Mat4::from_scale(particle.scale * particle.size)
}

/// Per-instance color for one particle: `(rgb, alpha)`.
pub fn instance_color(particle: &Particle) -> Vec4 {
    particle.color.extend(particle.alpha)
}

/// Rebuild both per-instance arrays from a particle slice.
///
/// Writes one entry per slot regardless of liveness. All three slices
/// must have the same length.
pub fn write_instances(particles: &[Particle], transforms: &mut [Mat4], colors: &mut [Vec4]) {
    debug_assert_eq!(particles.len(), transforms.len());
    debug_assert_eq!(particles.len(), colors.len());
    for (i, particle) in particles.iter().enumerate() {
        transforms[i] = instance_transform(particle);
        colors[i] = instance_color(particle);
    }
}

/// WGSL source for the particle quad pipeline.
pub const SHADER_SOURCE: &str = r#"struct Uniforms {
    view_proj: mat4x4<f32>,
    time: f32,
    delta_time: f32,
};

struct ShapeParams {
    shape: u32,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
@group(0) @binding(1) var<uniform> params: ShapeParams;

struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) uv: vec2<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * model * vec4<f32>(vertex.position, 0.0, 1.0);
    out.uv = vertex.uv * 2.0 - 1.0;
    out.color = instance.color;
    return out;
}

const SHAPE_CIRCLE: u32 = 0u;

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    if params.shape == SHAPE_CIRCLE && length(in.uv) > 1.0 {
        discard;
    }
    return in.color;
}
"#;

/// Draws an emitter's whole pool with a single instanced draw call.
///
/// Capacity is captured from the emitter at construction and the GPU
/// buffers are sized once; if the emitter is swapped for one of a
/// different size, construct a new renderer.
pub struct InstancedParticleRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    quad_buffer: wgpu::Buffer,
    transform_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    shape_buffer: wgpu::Buffer,
    transforms: Vec<Mat4>,
    colors: Vec<Vec4>,
    capacity: u32,
    shape: ParticleShape,
}

impl InstancedParticleRenderer {
    /// Build the pipeline and instance buffers for `emitter`'s capacity.
    ///
    /// `uniform_buffer` is the frame-global [`Uniforms`] buffer owned by
    /// the driver.
    ///
    /// [`Uniforms`]: super::Uniforms
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        uniform_buffer: &wgpu::Buffer,
        emitter: &ParticleEmitter,
    ) -> Self {
        let capacity = emitter.len() as u32;

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Quad Buffer"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let transforms = vec![Mat4::IDENTITY; capacity as usize];
        let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Transform Buffer"),
            contents: bytemuck::cast_slice(&transforms),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let colors = vec![Vec4::ZERO; capacity as usize];
        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Color Buffer"),
            contents: bytemuck::cast_slice(&colors),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        });

        let shape = ParticleShape::default();
        let shape_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Shape Buffer"),
            contents: bytemuck::bytes_of(&ShapeParams {
                shape: shape.index(),
                _pad: [0; 3],
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADER_SOURCE.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Bind Group Layout"),
            entries: &[
                // Frame uniforms (view_proj, time)
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Shape params
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shape_buffer.as_entire_binding(),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[
                    // Quad geometry
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &[
                            wgpu::VertexAttribute {
                                offset: 0,
                                shader_location: 0,
                                format: wgpu::VertexFormat::Float32x2,
                            },
                            wgpu::VertexAttribute {
                                offset: 8,
                                shader_location: 1,
                                format: wgpu::VertexFormat::Float32x2,
                            },
                        ],
                    },
                    // Per-instance transform, one vec4 per matrix column
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Mat4>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[
                            wgpu::VertexAttribute {
                                offset: 0,
                                shader_location: 2,
                                format: wgpu::VertexFormat::Float32x4,
                            },
                            wgpu::VertexAttribute {
                                offset: 16,
                                shader_location: 3,
                                format: wgpu::VertexFormat::Float32x4,
                            },
                            wgpu::VertexAttribute {
                                offset: 32,
                                shader_location: 4,
                                format: wgpu::VertexFormat::Float32x4,
                            },
                            wgpu::VertexAttribute {
                                offset: 48,
                                shader_location: 5,
                                format: wgpu::VertexFormat::Float32x4,
                            },
                        ],
                    },
                    // Per-instance color
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vec4>() as wgpu::BufferAddress,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &[wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 6,
                            format: wgpu::VertexFormat::Float32x4,
                        }],
                    },
                ],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                // Translucent quads read depth but do not write it
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            bind_group,
            quad_buffer,
            transform_buffer,
            color_buffer,
            shape_buffer,
            transforms,
            colors,
            capacity,
            shape,
        }
    }

    /// Number of instances drawn every call, equal to the emitter capacity
    /// this renderer was built against.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Current fragment silhouette.
    #[inline]
    pub fn shape(&self) -> ParticleShape {
        self.shape
    }

    /// Switch between circle and square silhouettes.
    pub fn set_shape(&mut self, queue: &wgpu::Queue, shape: ParticleShape) {
        self.shape = shape;
        queue.write_buffer(
            &self.shape_buffer,
            0,
            bytemuck::bytes_of(&ShapeParams {
                shape: shape.index(),
                _pad: [0; 3],
            }),
        );
    }

    /// Rebuild and upload both per-instance buffers from the emitter's
    /// current pool. Call after `emitter.update` and before `draw`.
    ///
    /// # Panics
    ///
    /// Debug-asserts that the emitter still has the capacity this renderer
    /// was built for.
    pub fn prepare(&mut self, queue: &wgpu::Queue, emitter: &ParticleEmitter) {
        debug_assert_eq!(
            emitter.len(),
            self.capacity as usize,
            "renderer was built for a different emitter capacity"
        );
        write_instances(emitter.particles(), &mut self.transforms, &mut self.colors);
        queue.write_buffer(
            &self.transform_buffer,
            0,
            bytemuck::cast_slice(&self.transforms),
        );
        queue.write_buffer(&self.color_buffer, 0, bytemuck::cast_slice(&self.colors));
    }

    /// Record the single instanced draw covering every slot.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
        render_pass.set_vertex_buffer(1, self.transform_buffer.slice(..));
        render_pass.set_vertex_buffer(2, self.color_buffer.slice(..));
        render_pass.draw(0..QUAD_VERTICES.len() as u32, 0..self.capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_instance_transform_composition() {
        let particle = Particle {
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: 0.7,
            scale: Vec3::new(2.0, 1.0, 1.0),
            size: 0.5,
            ..Particle::dead()
        };
        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_y(0.7)
            * Mat4::from_scale(Vec3::new(1.0, 0.5, 0.5));
        assert_eq!(instance_transform(&particle), expected);
    }

    #[test]
    fn test_instance_transform_places_origin_at_position() {
        let particle = Particle {
            position: Vec3::new(-4.0, 0.5, 9.0),
            rotation: 1.3,
            ..Particle::dead()
        };
        let origin = instance_transform(&particle).transform_point3(Vec3::ZERO);
        assert!((origin - particle.position).length() < 1e-5);
    }

    #[test]
    fn test_instance_color_packs_alpha() {
        let particle = Particle {
            color: Vec3::new(0.2, 0.4, 0.6),
            alpha: 0.25,
            ..Particle::dead()
        };
        assert_eq!(instance_color(&particle), Vec4::new(0.2, 0.4, 0.6, 0.25));
    }

    #[test]
    fn test_write_instances_covers_every_slot() {
        let mut emitter = ParticleEmitter::with_seed(7, 3);
        emitter.update(0.016);
        let mut transforms = vec![Mat4::ZERO; emitter.len()];
        let mut colors = vec![Vec4::ZERO; emitter.len()];
        write_instances(emitter.particles(), &mut transforms, &mut colors);
        // Every slot written, dead or alive.
        assert!(transforms.iter().all(|m| *m != Mat4::ZERO));
    }

    #[test]
    fn test_dead_particles_are_not_culled() {
        // A never-updated emitter is all dead slots; they still marshal.
        let emitter = ParticleEmitter::with_seed(4, 1);
        let mut transforms = vec![Mat4::ZERO; emitter.len()];
        let mut colors = vec![Vec4::ZERO; emitter.len()];
        write_instances(emitter.particles(), &mut transforms, &mut colors);
        assert_eq!(transforms.len(), 4);
        for m in &transforms {
            assert_eq!(*m, instance_transform(&Particle::dead()));
        }
    }

    #[test]
    fn test_shape_indices_are_stable() {
        assert_eq!(ParticleShape::Circle.index(), 0);
        assert_eq!(ParticleShape::Square.index(), 1);
    }
}
