//! Render pipelines for light sectors and outlines

use glam::DVec2;

use super::context::GpuContext;
use crate::render::{Primitive, RenderTarget};

/// One vertex of a light triangle or outline segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneVertex {
    pub position: [f32; 2],
    /// Light origin the falloff is measured from (unused by outlines)
    pub origin: [f32; 2],
    pub color: [f32; 4],
}

impl SceneVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SceneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Uniform data: window size for pixel to clip space conversion
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ScreenUniforms {
    size: [f32; 2],
    _padding: [f32; 2],
}

/// Vertices collected from the engine for one frame.
#[derive(Debug, Default)]
pub struct FrameBatch {
    pub lights: Vec<SceneVertex>,
    pub lines: Vec<SceneVertex>,
    pub outline_color: [f32; 4],
}

impl FrameBatch {
    pub fn new() -> Self {
        Self {
            outline_color: [1.0, 0.0, 0.0, 1.0],
            ..Default::default()
        }
    }

    pub fn clear(&mut self) {
        self.lights.clear();
        self.lines.clear();
    }
}

impl RenderTarget for FrameBatch {
    fn submit(&mut self, primitive: Primitive, verts: &[DVec2]) {
        let to_f32 = |v: DVec2| [v.x as f32, v.y as f32];

        match primitive {
            Primitive::Light { color, origin } => {
                let (r, g, b) = color.to_rgb();
                let origin = to_f32(origin);
                self.lights.extend(verts.iter().map(|&v| SceneVertex {
                    position: to_f32(v),
                    origin,
                    color: [r, g, b, 1.0],
                }));
            }
            Primitive::SectorOutline | Primitive::ObstacleOutline => {
                let color = self.outline_color;
                self.lines.extend(verts.iter().map(|&v| SceneVertex {
                    position: to_f32(v),
                    origin: [0.0; 2],
                    color,
                }));
            }
        }
    }
}

/// Growable vertex buffer, recreated when a frame outgrows it.
struct VertexBuffer {
    label: &'static str,
    buffer: wgpu::Buffer,
    capacity: usize,
}

impl VertexBuffer {
    fn new(device: &wgpu::Device, label: &'static str, capacity: usize) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<SceneVertex>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { label, buffer, capacity }
    }

    fn upload(&mut self, ctx: &GpuContext, verts: &[SceneVertex]) {
        if verts.len() > self.capacity {
            *self = Self::new(&ctx.device, self.label, verts.len().next_power_of_two());
        }
        if !verts.is_empty() {
            ctx.queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(verts));
        }
    }
}

/// Draws a [`FrameBatch`]: light triangles blended additively, then outlines on top.
pub struct ScenePipeline {
    light_pipeline: wgpu::RenderPipeline,
    outline_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    light_vertices: VertexBuffer,
    line_vertices: VertexBuffer,
}

impl ScenePipeline {
    pub fn new(ctx: &GpuContext) -> Self {
        let device = &ctx.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Light Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/light.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Scene Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent::OVER,
        };

        let make_pipeline = |label: &str,
                             fragment: &str,
                             topology: wgpu::PrimitiveTopology,
                             blend: wgpu::BlendState| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[SceneVertex::layout()],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(fragment),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: ctx.format(),
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let light_pipeline = make_pipeline(
            "Light Render Pipeline",
            "fs_light",
            wgpu::PrimitiveTopology::TriangleList,
            additive,
        );
        let outline_pipeline = make_pipeline(
            "Outline Render Pipeline",
            "fs_outline",
            wgpu::PrimitiveTopology::LineList,
            wgpu::BlendState::REPLACE,
        );

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Screen Uniforms"),
            size: std::mem::size_of::<ScreenUniforms>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Scene Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            light_pipeline,
            outline_pipeline,
            uniform_buffer,
            bind_group,
            light_vertices: VertexBuffer::new(device, "Light Vertices", 4096),
            line_vertices: VertexBuffer::new(device, "Outline Vertices", 1024),
        }
    }

    /// Upload the batch and draw it to the screen
    pub fn render(&mut self, ctx: &GpuContext, batch: &FrameBatch) -> Result<(), wgpu::SurfaceError> {
        let uniforms = ScreenUniforms {
            size: [ctx.size.0 as f32, ctx.size.1 as f32],
            _padding: [0.0; 2],
        };
        ctx.queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        self.light_vertices.upload(ctx, &batch.lights);
        self.line_vertices.upload(ctx, &batch.lines);

        let (output, view) = ctx.acquire_frame()?;

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_bind_group(0, &self.bind_group, &[]);

            if !batch.lights.is_empty() {
                render_pass.set_pipeline(&self.light_pipeline);
                render_pass.set_vertex_buffer(0, self.light_vertices.buffer.slice(..));
                render_pass.draw(0..batch.lights.len() as u32, 0..1);
            }

            if !batch.lines.is_empty() {
                render_pass.set_pipeline(&self.outline_pipeline);
                render_pass.set_vertex_buffer(0, self.line_vertices.buffer.slice(..));
                render_pass.draw(0..batch.lines.len() as u32, 0..1);
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::RayColor;

    #[test]
    fn test_batch_collects_vertices() {
        let mut batch = FrameBatch::new();
        batch.submit(
            Primitive::Light { color: RayColor::RED | RayColor::BLUE, origin: DVec2::new(1.0, 2.0) },
            &[DVec2::ZERO, DVec2::X, DVec2::Y],
        );
        batch.submit(Primitive::ObstacleOutline, &[DVec2::ZERO, DVec2::new(3.0, 4.0)]);

        assert_eq!(batch.lights.len(), 3);
        assert_eq!(batch.lights[1].position, [1.0, 0.0]);
        assert_eq!(batch.lights[2].origin, [1.0, 2.0]);
        assert_eq!(batch.lights[0].color, [1.0, 0.0, 1.0, 1.0]);

        assert_eq!(batch.lines.len(), 2);
        assert_eq!(batch.lines[1].color, batch.outline_color);

        batch.clear();
        assert!(batch.lights.is_empty() && batch.lines.is_empty());
    }

    #[test]
    fn test_vertex_layout_matches_struct() {
        assert_eq!(std::mem::size_of::<SceneVertex>(), 32);
        assert_eq!(SceneVertex::layout().array_stride, 32);
        assert_eq!(std::mem::size_of::<ScreenUniforms>(), 16);
    }
}
