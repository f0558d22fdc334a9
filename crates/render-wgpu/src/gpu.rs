use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use glint_assets::TextureHandle;
use glint_common::{Color, Rect};
use glint_render::{RenderBackend, RenderError, ShapePainter, SpriteBatch, SpriteDraw};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct SpriteVertex {
    position: [f32; 2],
    uv: [f32; 2],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct ShapeVertex {
    position: [f32; 2],
    color: [f32; 4],
}

/// One contiguous slice of the frame's vertex data, drawn with a single
/// pipeline and bind group. Runs replay in submission order so sprites and
/// shapes interleave exactly as the compositor issued them.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Run {
    Sprite {
        texture: TextureHandle,
        blend: bool,
        start: u32,
        count: u32,
    },
    Shape {
        start: u32,
        count: u32,
    },
}

/// Extend the previous sprite run when texture and blend state match,
/// otherwise start a new one.
fn push_sprite_run(runs: &mut Vec<Run>, texture: TextureHandle, blend: bool, start: u32, count: u32) {
    if let Some(Run::Sprite {
        texture: last_texture,
        blend: last_blend,
        count: last_count,
        ..
    }) = runs.last_mut()
    {
        if *last_texture == texture && *last_blend == blend {
            *last_count += count;
            return;
        }
    }
    runs.push(Run::Sprite {
        texture,
        blend,
        start,
        count,
    });
}

fn push_shape_run(runs: &mut Vec<Run>, start: u32, count: u32) {
    if let Some(Run::Shape {
        count: last_count, ..
    }) = runs.last_mut()
    {
        *last_count += count;
        return;
    }
    runs.push(Run::Shape { start, count });
}

fn rotate_around(p: Vec2, pivot: Vec2, sin: f32, cos: f32) -> Vec2 {
    let d = p - pivot;
    pivot + Vec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Expand one sprite command into two triangles, rotating the quad around
/// the pivot and mapping the texel region onto [0, 1] uv space.
fn quad_vertices(cmd: &SpriteDraw, tex_width: u32, tex_height: u32) -> [SpriteVertex; 6] {
    let Rect {
        x,
        y,
        width,
        height,
    } = cmd.dst;
    let pivot = Vec2::new(x, y) + cmd.origin;
    let (sin, cos) = cmd.rotation.sin_cos();

    let corners = [
        Vec2::new(x, y),
        Vec2::new(x + width, y),
        Vec2::new(x + width, y + height),
        Vec2::new(x, y + height),
    ]
    .map(|p| rotate_around(p, pivot, sin, cos));

    let tw = tex_width as f32;
    let th = tex_height as f32;
    let u0 = cmd.region.x as f32 / tw;
    let u1 = (cmd.region.x + cmd.region.width) as f32 / tw;
    // Texel row 0 is the top of the image; world y grows upward.
    let v0 = (cmd.region.y + cmd.region.height) as f32 / th;
    let v1 = cmd.region.y as f32 / th;

    let color = [cmd.tint.r, cmd.tint.g, cmd.tint.b, cmd.tint.a];
    let vertex = |p: Vec2, uv: [f32; 2]| SpriteVertex {
        position: [p.x, p.y],
        uv,
        color,
    };

    let bl = vertex(corners[0], [u0, v0]);
    let br = vertex(corners[1], [u1, v0]);
    let tr = vertex(corners[2], [u1, v1]);
    let tl = vertex(corners[3], [u0, v1]);
    [bl, br, tr, tr, tl, bl]
}

struct GpuTexture {
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

/// wgpu implementation of the compositor backend.
///
/// Draws into an offscreen RGBA target. Draw commands are collected
/// CPU-side during the session and replayed as pipeline runs on `end`,
/// so a blend switch or texture change is a batch break and nothing more.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    target: wgpu::Texture,
    target_view: wgpu::TextureView,
    width: u32,
    height: u32,
    sprite_opaque_pipeline: wgpu::RenderPipeline,
    sprite_blend_pipeline: wgpu::RenderPipeline,
    shape_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: BTreeMap<TextureHandle, GpuTexture>,
    sprite_vertices: Vec<SpriteVertex>,
    shape_vertices: Vec<ShapeVertex>,
    runs: Vec<Run>,
    blend: bool,
    active: bool,
    disposed: bool,
}

impl WgpuBackend {
    /// Create a backend on the first available adapter, rendering into an
    /// offscreen target of the given pixel size.
    pub fn headless(width: u32, height: u32) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("glint_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .map_err(|e| RenderError::DeviceRequest(e.to_string()))?;

        tracing::debug!(adapter = %adapter.get_info().name, "wgpu backend ready");
        Ok(Self::with_device(device, queue, width, height))
    }

    /// Build a backend on an existing device, for hosts that own the
    /// adapter themselves.
    pub fn with_device(device: wgpu::Device, queue: wgpu::Queue, width: u32, height: u32) -> Self {
        let target = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("glint_target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let target_view = target.create_view(&wgpu::TextureViewDescriptor::default());

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite_sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let sprite_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SPRITE_SHADER.into()),
        });
        let sprite_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let sprite_pipeline = |label: &str, blend: Option<wgpu::BlendState>| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&sprite_layout),
                vertex: wgpu::VertexState {
                    module: &sprite_shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<SpriteVertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x2,
                            1 => Float32x2,
                            2 => Float32x4,
                        ],
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &sprite_shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: TARGET_FORMAT,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };

        let sprite_opaque_pipeline =
            sprite_pipeline("sprite_opaque_pipeline", Some(wgpu::BlendState::REPLACE));
        let sprite_blend_pipeline = sprite_pipeline(
            "sprite_blend_pipeline",
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );

        let shape_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("shape_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SHAPE_SHADER.into()),
        });
        let shape_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shape_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });
        let shape_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shape_pipeline"),
            layout: Some(&shape_layout),
            vertex: wgpu::VertexState {
                module: &shape_shader,
                entry_point: Some("vs_shape"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ShapeVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x2,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shape_shader,
                entry_point: Some("fs_shape"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        Self {
            device,
            queue,
            target,
            target_view,
            width,
            height,
            sprite_opaque_pipeline,
            sprite_blend_pipeline,
            shape_pipeline,
            uniform_buffer,
            uniform_bind_group,
            texture_layout,
            sampler,
            textures: BTreeMap::new(),
            sprite_vertices: Vec::new(),
            shape_vertices: Vec::new(),
            runs: Vec::new(),
            blend: false,
            active: false,
            disposed: false,
        }
    }

    /// Upload RGBA8 pixel data under a texture handle. Re-uploading an
    /// existing handle replaces its contents.
    pub fn upload_texture(&mut self, handle: TextureHandle, width: u32, height: u32, pixels: &[u8]) {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("sprite_texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite_texture_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });
        self.textures.insert(
            handle,
            GpuTexture {
                bind_group,
                width,
                height,
            },
        );
        tracing::debug!(handle = handle.0, width, height, "texture uploaded");
    }

    /// Upload a 1x1 white texture, the canonical fill for flat quads.
    pub fn upload_white(&mut self, handle: TextureHandle) {
        self.upload_texture(handle, 1, 1, &[255, 255, 255, 255]);
    }

    pub fn has_texture(&self, handle: TextureHandle) -> bool {
        self.textures.contains_key(&handle)
    }

    /// Copy the offscreen target back to the CPU as tightly packed RGBA8
    /// rows.
    pub fn read_rgba(&self) -> Result<Vec<u8>, RenderError> {
        let bytes_per_row = 4 * self.width;
        let padded = bytes_per_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback_buffer"),
            size: (padded * self.height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("readback_encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.target,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|e| RenderError::Readback(e.to_string()))?
            .map_err(|e| RenderError::Readback(e.to_string()))?;

        let data = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((bytes_per_row * self.height) as usize);
        for row in 0..self.height {
            let offset = (row * padded) as usize;
            pixels.extend_from_slice(&data[offset..offset + bytes_per_row as usize]);
        }
        drop(data);
        buffer.unmap();
        Ok(pixels)
    }

    fn check_active(&self) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        if !self.active {
            return Err(RenderError::SessionNotActive);
        }
        Ok(())
    }
}

impl SpriteBatch for WgpuBackend {
    fn draw(&mut self, cmd: &SpriteDraw) -> Result<(), RenderError> {
        self.check_active()?;
        let gpu = self
            .textures
            .get(&cmd.texture)
            .ok_or(RenderError::UnknownTexture(cmd.texture))?;
        let start = self.sprite_vertices.len() as u32;
        self.sprite_vertices
            .extend_from_slice(&quad_vertices(cmd, gpu.width, gpu.height));
        push_sprite_run(&mut self.runs, cmd.texture, self.blend, start, 6);
        Ok(())
    }
}

impl ShapePainter for WgpuBackend {
    fn fill_rect(&mut self, rect: Rect, color: Color) -> Result<(), RenderError> {
        self.fill_polygon(
            &[
                Vec2::new(rect.x, rect.y),
                Vec2::new(rect.x + rect.width, rect.y),
                Vec2::new(rect.x + rect.width, rect.y + rect.height),
                Vec2::new(rect.x, rect.y + rect.height),
            ],
            color,
        )
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) -> Result<(), RenderError> {
        self.check_active()?;
        if points.len() < 3 {
            return Ok(());
        }
        let rgba = [color.r, color.g, color.b, color.a];
        let start = self.shape_vertices.len() as u32;
        // Fan triangulation; callers supply convex outlines.
        for i in 1..points.len() - 1 {
            for p in [points[0], points[i], points[i + 1]] {
                self.shape_vertices.push(ShapeVertex {
                    position: [p.x, p.y],
                    color: rgba,
                });
            }
        }
        let count = self.shape_vertices.len() as u32 - start;
        push_shape_run(&mut self.runs, start, count);
        Ok(())
    }
}

impl RenderBackend for WgpuBackend {
    fn clear(&mut self, color: Color) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("clear_encoder"),
            });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.target_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: color.r as f64,
                        g: color.g as f64,
                        b: color.b as f64,
                        a: color.a as f64,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.queue.submit(Some(encoder.finish()));
    }

    fn set_projection(&mut self, view_proj: Mat4) {
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: view_proj.to_cols_array_2d(),
            }),
        );
    }

    fn begin(&mut self) -> Result<(), RenderError> {
        if self.disposed {
            return Err(RenderError::Disposed);
        }
        if self.active {
            return Err(RenderError::SessionActive);
        }
        self.sprite_vertices.clear();
        self.shape_vertices.clear();
        self.runs.clear();
        // The blend flag deliberately survives across sessions; the
        // compositor only reports transitions.
        self.active = true;
        Ok(())
    }

    fn set_blending(&mut self, enabled: bool) {
        self.blend = enabled;
    }

    fn end(&mut self) -> Result<(), RenderError> {
        self.check_active()?;
        self.active = false;
        if self.runs.is_empty() {
            return Ok(());
        }

        let sprite_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("sprite_vertex_buffer"),
                contents: bytemuck::cast_slice(&self.sprite_vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let shape_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("shape_vertex_buffer"),
                contents: bytemuck::cast_slice(&self.shape_vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frame_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target_view,
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
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);

            for run in &self.runs {
                match run {
                    Run::Sprite {
                        texture,
                        blend,
                        start,
                        count,
                    } => {
                        let Some(gpu) = self.textures.get(texture) else {
                            continue;
                        };
                        let pipeline = if *blend {
                            &self.sprite_blend_pipeline
                        } else {
                            &self.sprite_opaque_pipeline
                        };
                        pass.set_pipeline(pipeline);
                        pass.set_bind_group(1, &gpu.bind_group, &[]);
                        pass.set_vertex_buffer(0, sprite_buffer.slice(..));
                        pass.draw(*start..start + count, 0..1);
                    }
                    Run::Shape { start, count } => {
                        pass.set_pipeline(&self.shape_pipeline);
                        pass.set_vertex_buffer(0, shape_buffer.slice(..));
                        pass.draw(*start..start + count, 0..1);
                    }
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        tracing::trace!(
            runs = self.runs.len(),
            sprites = self.sprite_vertices.len() / 6,
            "frame submitted"
        );
        Ok(())
    }

    fn dispose(&mut self) {
        self.textures.clear();
        self.sprite_vertices.clear();
        self.shape_vertices.clear();
        self.runs.clear();
        self.disposed = true;
    }

    fn as_sprite_batch(&mut self) -> &mut dyn SpriteBatch {
        self
    }

    fn as_shape_painter(&mut self) -> &mut dyn ShapePainter {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_common::TexRegion;

    fn draw(dst: Rect) -> SpriteDraw {
        SpriteDraw::new(TextureHandle(1), TexRegion::new(0, 0, 16, 16), dst)
    }

    #[test]
    fn unrotated_quad_covers_the_destination() {
        let verts = quad_vertices(&draw(Rect::new(10.0, 20.0, 30.0, 40.0)), 32, 32);
        assert_eq!(verts[0].position, [10.0, 20.0]);
        assert_eq!(verts[1].position, [40.0, 20.0]);
        assert_eq!(verts[2].position, [40.0, 60.0]);
        assert_eq!(verts[4].position, [10.0, 60.0]);
    }

    #[test]
    fn uv_maps_the_region_into_unit_space() {
        let mut cmd = draw(Rect::new(0.0, 0.0, 16.0, 16.0));
        cmd.region = TexRegion::new(16, 0, 16, 16);
        let verts = quad_vertices(&cmd, 32, 32);
        // Bottom-left of the quad samples the bottom-left of the region.
        assert_eq!(verts[0].uv, [0.5, 0.5]);
        assert_eq!(verts[2].uv, [1.0, 0.0]);
    }

    #[test]
    fn quarter_turn_rotates_around_the_pivot() {
        let mut cmd = draw(Rect::new(0.0, 0.0, 2.0, 2.0));
        cmd.origin = Vec2::new(1.0, 1.0);
        cmd.rotation = std::f32::consts::FRAC_PI_2;
        let verts = quad_vertices(&cmd, 16, 16);
        // Bottom-left corner (0,0) lands at (2,0) after a CCW quarter turn
        // around (1,1).
        assert!((verts[0].position[0] - 2.0).abs() < 1e-5);
        assert!(verts[0].position[1].abs() < 1e-5);
    }

    #[test]
    fn sprite_runs_merge_only_when_state_matches() {
        let mut runs = Vec::new();
        push_sprite_run(&mut runs, TextureHandle(1), false, 0, 6);
        push_sprite_run(&mut runs, TextureHandle(1), false, 6, 6);
        assert_eq!(runs.len(), 1);
        assert!(matches!(runs[0], Run::Sprite { count: 12, .. }));

        push_sprite_run(&mut runs, TextureHandle(1), true, 12, 6);
        push_sprite_run(&mut runs, TextureHandle(2), true, 18, 6);
        assert_eq!(runs.len(), 3);
    }

    #[test]
    fn shape_runs_break_on_interleaved_sprites() {
        let mut runs = Vec::new();
        push_shape_run(&mut runs, 0, 6);
        push_shape_run(&mut runs, 6, 3);
        assert_eq!(runs.len(), 1);
        assert!(matches!(runs[0], Run::Shape { count: 9, .. }));

        push_sprite_run(&mut runs, TextureHandle(1), false, 0, 6);
        push_shape_run(&mut runs, 9, 3);
        assert_eq!(runs.len(), 3);
    }
}
