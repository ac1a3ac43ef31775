//! # Wgpu Backend
//!
//! Executes [`DrawCall`]s with wgpu, headless: the backbuffer is an ordinary
//! texture the host can copy or present however it likes, so the backend
//! works the same under a windowed swapchain or in an offline renderer.
//!
//! Two pipelines share one shader module: solid shapes (no texture bind
//! group) and textured quads. Batches arrive as raw vertex bytes; each submit
//! uploads them with `create_buffer_init` and records one render pass that
//! loads the existing target contents, so call order is preserved exactly as
//! the batchers flushed it.

use wgpu::util::DeviceExt;

use crate::render2d::backend::{BatchBinding, DrawBackend, DrawCall, RenderTargetId, TextureId};
use crate::render2d::color::Color;
use crate::render2d::vertex::{ImageVertex, ShapeVertex};

const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Errors from backend initialization.
#[derive(Debug)]
pub enum GpuError {
    Adapter(String),
    Device(String),
}

impl std::fmt::Display for GpuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuError::Adapter(msg) => write!(f, "failed to acquire a GPU adapter: {msg}"),
            GpuError::Device(msg) => write!(f, "failed to create the GPU device: {msg}"),
        }
    }
}

impl std::error::Error for GpuError {}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ProjectionUniform {
    matrix: [[f32; 4]; 4],
}

struct TextureEntry {
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

struct TargetEntry {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
}

pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    shape_pipeline: wgpu::RenderPipeline,
    image_pipeline: wgpu::RenderPipeline,
    projection_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    textures: Vec<TextureEntry>,
    targets: Vec<TargetEntry>,
    backbuffer: TargetEntry,
    bound: Option<RenderTargetId>,
    encoder: Option<wgpu::CommandEncoder>,
}

impl WgpuBackend {
    /// Create a headless backend with a backbuffer of the given size.
    pub fn new(width: u32, height: u32) -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|err| GpuError::Adapter(err.to_string()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("ember device".into()),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            ..Default::default()
        }))
        .map_err(|err| GpuError::Device(err.to_string()))?;

        log::info!("wgpu backend on {}", adapter.get_info().name);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("batch shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });

        let projection_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("projection bind group layout"),
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

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture bind group layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
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

        let shape_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shape pipeline layout"),
            bind_group_layouts: &[&projection_layout],
            push_constant_ranges: &[],
        });

        let image_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("image pipeline layout"),
            bind_group_layouts: &[&projection_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let shape_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shape pipeline"),
            layout: Some(&shape_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_shape"),
                buffers: &[ShapeVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_shape"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // 2D geometry is double-sided
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let image_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("image pipeline"),
            layout: Some(&image_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_image"),
                buffers: &[ImageVertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_image"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TARGET_FORMAT,
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("batch sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let backbuffer = create_target_entry(&device, &texture_layout, &sampler, width, height, "backbuffer");

        Ok(Self {
            device,
            queue,
            shape_pipeline,
            image_pipeline,
            projection_layout,
            texture_layout,
            sampler,
            textures: Vec::new(),
            targets: Vec::new(),
            backbuffer,
            bound: None,
            encoder: None,
        })
    }

    /// The texture the backbuffer renders into, for presenting or readback.
    pub fn backbuffer_texture(&self) -> &wgpu::Texture {
        &self.backbuffer.texture
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

impl DrawBackend for WgpuBackend {
    fn create_texture(&mut self, width: u32, height: u32, pixels: &[u8]) -> TextureId {
        let texture = self.device.create_texture_with_data(
            &self.queue,
            &wgpu::TextureDescriptor {
                label: Some("batch texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: TARGET_FORMAT,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            pixels,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("batch texture bind group"),
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

        self.textures.push(TextureEntry {
            bind_group,
            width,
            height,
        });
        TextureId(self.textures.len() as u32 - 1)
    }

    fn create_target(&mut self, width: u32, height: u32) -> RenderTargetId {
        let entry = create_target_entry(
            &self.device,
            &self.texture_layout,
            &self.sampler,
            width,
            height,
            "render target",
        );
        self.targets.push(entry);
        RenderTargetId(self.targets.len() as u32 - 1)
    }

    fn target_size(&self, target: RenderTargetId) -> (u32, u32) {
        let entry = &self.targets[target.0 as usize];
        (entry.width, entry.height)
    }

    fn backbuffer_size(&self) -> (u32, u32) {
        (self.backbuffer.width, self.backbuffer.height)
    }

    fn begin_frame(&mut self) {
        self.bound = None;
        self.encoder = Some(
            self.device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("frame encoder"),
                }),
        );
    }

    fn bind_target(&mut self, target: Option<RenderTargetId>) {
        self.bound = target;
    }

    fn clear(&mut self, color: Color) {
        let view = match self.bound {
            Some(target) => &self.targets[target.0 as usize].view,
            None => &self.backbuffer.view,
        };
        let encoder = self
            .encoder
            .as_mut()
            .expect("clear called outside begin_frame/end_frame");
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                depth_slice: None,
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
    }

    fn submit(&mut self, call: DrawCall<'_>) {
        if call.index_count == 0 {
            return;
        }

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("batch vertex buffer"),
                contents: call.vertex_data,
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("batch index buffer"),
                contents: bytemuck::cast_slice(call.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        // One small uniform buffer per batch. Batches are few by design, and
        // this keeps every pass self-contained instead of racing a shared
        // buffer between queued passes.
        let uniform = ProjectionUniform {
            matrix: call.projection.to_cols_array_2d(),
        };
        let projection_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("projection buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        let projection_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("projection bind group"),
            layout: &self.projection_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: projection_buffer.as_entire_binding(),
            }],
        });

        let view = match self.bound {
            Some(target) => &self.targets[target.0 as usize].view,
            None => &self.backbuffer.view,
        };
        let encoder = self
            .encoder
            .as_mut()
            .expect("submit called outside begin_frame/end_frame");

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("batch pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                depth_slice: None,
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

        match call.binding {
            None => {
                pass.set_pipeline(&self.shape_pipeline);
                pass.set_bind_group(0, &projection_bind_group, &[]);
            }
            Some(BatchBinding::Texture(texture)) => {
                pass.set_pipeline(&self.image_pipeline);
                pass.set_bind_group(0, &projection_bind_group, &[]);
                pass.set_bind_group(1, &self.textures[texture.0 as usize].bind_group, &[]);
            }
            Some(BatchBinding::Target(target)) => {
                pass.set_pipeline(&self.image_pipeline);
                pass.set_bind_group(0, &projection_bind_group, &[]);
                pass.set_bind_group(1, &self.targets[target.0 as usize].bind_group, &[]);
            }
        }

        pass.set_vertex_buffer(0, vertex_buffer.slice(..));
        pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..call.index_count, 0, 0..1);
    }

    fn end_frame(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            self.queue.submit(std::iter::once(encoder.finish()));
        }
    }
}

fn create_target_entry(
    device: &wgpu::Device,
    texture_layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    width: u32,
    height: u32,
    label: &str,
) -> TargetEntry {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT
            | wgpu::TextureUsages::TEXTURE_BINDING
            | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout: texture_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    });

    TargetEntry {
        texture,
        view,
        bind_group,
        width: width.max(1),
        height: height.max(1),
    }
}
