//! Renderer: wgpu init + depth, normalized scene upload, key-light shadow pass, then
//! floor shadow, grid and solid/wireframe model in the main pass.
//! wgpu = 0.26.x, winit = 0.30.x

pub mod frame;
pub mod grid;
pub mod scene_mesh;

pub use frame::{FrameView, Globals, SHADOW_MAP_SIZE, clear_color, light_view_proj};
pub use grid::{GRID_HALF_EXTENT, GRID_SECTION_EVERY, LineVertex, grid_lines};
pub use scene_mesh::{GpuVertex, IndexBatch, SceneMesh, build_scene_mesh, framing_offset};

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use asset::{SceneGraph, TextureImage};
use glam::Vec3;
use wgpu::{
    AddressMode, BindGroup, BindGroupLayout, BindGroupLayoutDescriptor, BindGroupLayoutEntry,
    BindingResource, BindingType, BlendState, Buffer, BufferBindingType, BufferUsages,
    ColorTargetState, ColorWrites, CommandEncoderDescriptor, CompareFunction, CompositeAlphaMode,
    DepthBiasState, DepthStencilState, Device, DeviceDescriptor, Extent3d, Features, FilterMode,
    FragmentState, Instance, InstanceDescriptor, Limits, LoadOp, Operations, PipelineLayout,
    PipelineLayoutDescriptor, PowerPreference, PresentMode, PrimitiveTopology, Queue,
    RenderPassColorAttachment, RenderPassDescriptor, RenderPipeline, RenderPipelineDescriptor,
    Sampler, SamplerBindingType, SamplerDescriptor, ShaderModule, ShaderModuleDescriptor,
    ShaderSource, ShaderStages, StoreOp, Surface, SurfaceConfiguration, SurfaceError,
    TextureDescriptor, TextureDimension, TextureFormat, TextureSampleType, TextureUsages,
    TextureView, TextureViewDescriptor, TextureViewDimension, VertexBufferLayout, VertexState,
    util::{DeviceExt, TextureDataOrder},
};
use winit::{dpi::PhysicalSize, window::Window};

const DEPTH_FORMAT: TextureFormat = TextureFormat::Depth32Float;

/// Uploaded model buffers.
struct GpuMesh {
    vertex_buf: Buffer,
    solid: Option<(Buffer, u32)>,
    batches: Vec<IndexBatch>,
    wire: Option<(Buffer, u32)>,
    shadow: Option<(Buffer, u32)>,
    /// One bind group per scene texture, indexed like `SceneGraph::textures`.
    textures: Vec<BindGroup>,
    bounds: Option<(Vec3, Vec3)>,
}

pub struct GpuState {
    // Surface
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,

    // Device/queue
    device: Device,
    queue: Queue,

    // Pipelines
    solid_pipeline: RenderPipeline,
    wire_pipeline: RenderPipeline,
    grid_pipeline: RenderPipeline,
    ground_pipeline: RenderPipeline,
    shadow_pipeline: RenderPipeline,

    // Globals UBO (+ shadow map for the main pass)
    globals_bg: BindGroup,
    shadow_globals_bg: BindGroup,
    globals_buf: Buffer,

    // Shadow map
    shadow_view: TextureView,

    // Base colour textures
    material_bgl: BindGroupLayout,
    material_sampler: Sampler,
    white_bg: BindGroup,

    // Geometry
    grid_buf: Buffer,
    grid_vertex_count: u32,
    mesh: Option<GpuMesh>,

    // Depth
    depth_view: TextureView,

    // Size cache
    width: u32,
    height: u32,
}

impl GpuState {
    /// Create GPU state bound to an Arc<Window>.
    pub async fn new(window: Arc<Window>, backends: wgpu::Backends) -> Result<Self> {
        let PhysicalSize { width, height } = window.inner_size();
        let width = width.max(1);
        let height = height.max(1);

        // Instance & surface
        let instance = Instance::new(&InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface: Surface<'static> = instance
            .create_surface(window.clone())
            .context("create_surface failed")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("No suitable GPU adapter: {e}"))?;
        let info = adapter.get_info();
        log::info!("Adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&DeviceDescriptor {
                label: Some("Meshview Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| anyhow!("request_device failed: {e}"))?;

        // Surface format (prefer sRGB)
        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let surface_config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        let depth_view = create_depth_view(&device, &surface_config);

        // ==== Shaders ====
        let shader = device.create_shader_module(ShaderModuleDescriptor {
            label: Some("Mesh WGSL"),
            source: ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        // ==== Globals BGL/BG ====
        let globals_entry = BindGroupLayoutEntry {
            binding: 0,
            visibility: ShaderStages::VERTEX_FRAGMENT,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<Globals>() as u64),
            },
            count: None,
        };
        let globals_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Globals BGL"),
            entries: &[
                globals_entry,
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Depth,
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 2,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        // The shadow pass renders into the shadow map, so it cannot bind it.
        let shadow_globals_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Shadow Globals BGL"),
            entries: &[globals_entry],
        });
        let globals_init =
            Globals::new(&FrameView::default(), width as f32 / height as f32, None);
        let globals_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals UBO"),
            contents: bytemuck::bytes_of(&globals_init),
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
        });

        // ==== Shadow map ====
        let shadow_view = create_shadow_view(&device);
        let shadow_sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("Shadow Sampler"),
            address_mode_u: AddressMode::ClampToEdge,
            address_mode_v: AddressMode::ClampToEdge,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            compare: Some(CompareFunction::LessEqual),
            ..Default::default()
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals BG"),
            layout: &globals_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: BindingResource::TextureView(&shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });
        let shadow_globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Globals BG"),
            layout: &shadow_globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buf.as_entire_binding(),
            }],
        });

        // ==== Base colour textures ====
        let material_bgl = device.create_bind_group_layout(&BindGroupLayoutDescriptor {
            label: Some("Material BGL"),
            entries: &[
                BindGroupLayoutEntry {
                    binding: 0,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Texture {
                        sample_type: TextureSampleType::Float { filterable: true },
                        view_dimension: TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                BindGroupLayoutEntry {
                    binding: 1,
                    visibility: ShaderStages::FRAGMENT,
                    ty: BindingType::Sampler(SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let material_sampler = device.create_sampler(&SamplerDescriptor {
            label: Some("Base Colour Sampler"),
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            ..Default::default()
        });
        let white_bg = create_texture_bind_group(
            &device,
            &queue,
            &material_bgl,
            &material_sampler,
            "White Texture",
            &TextureImage::solid([255; 4]),
        );

        // ==== Pipelines ====
        let layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Mesh PipelineLayout"),
            bind_group_layouts: &[&globals_bgl, &material_bgl],
            push_constant_ranges: &[],
        });
        let pipelines = PipelineFactory {
            device: &device,
            layout: &layout,
            shader: &shader,
            format: surface_format,
        };
        let solid_pipeline = pipelines.create(
            "Solid Pipeline",
            ("vs_main", "fs_main"),
            &[GpuVertex::LAYOUT],
            PrimitiveTopology::TriangleList,
            BlendState::REPLACE,
        );
        let wire_pipeline = pipelines.create(
            "Wireframe Pipeline",
            ("vs_main", "fs_main"),
            &[GpuVertex::LAYOUT],
            PrimitiveTopology::LineList,
            BlendState::REPLACE,
        );
        let grid_pipeline = pipelines.create(
            "Grid Pipeline",
            ("vs_line", "fs_line"),
            &[LineVertex::LAYOUT],
            PrimitiveTopology::LineList,
            BlendState::REPLACE,
        );
        let ground_pipeline = pipelines.create(
            "Ground Shadow Pipeline",
            ("vs_ground", "fs_ground"),
            &[],
            PrimitiveTopology::TriangleList,
            BlendState::ALPHA_BLENDING,
        );
        let shadow_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
            label: Some("Shadow PipelineLayout"),
            bind_group_layouts: &[&shadow_globals_bgl],
            push_constant_ranges: &[],
        });
        let shadow_pipeline = create_shadow_pipeline(&device, &shadow_layout, &shader);

        // ==== Geometry: floor grid ====
        let grid = grid_lines(GRID_HALF_EXTENT, GRID_SECTION_EVERY);
        let grid_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grid VB"),
            contents: bytemuck::cast_slice(&grid),
            usage: BufferUsages::VERTEX,
        });

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
            solid_pipeline,
            wire_pipeline,
            grid_pipeline,
            ground_pipeline,
            shadow_pipeline,
            globals_bg,
            shadow_globals_bg,
            globals_buf,
            shadow_view,
            material_bgl,
            material_sampler,
            white_bg,
            grid_buf,
            grid_vertex_count: grid.len() as u32,
            mesh: None,
            depth_view,
            width,
            height,
        })
    }

    /// Replace the drawn model. `None` clears it.
    pub fn upload_scene(&mut self, scene: Option<&SceneGraph>) {
        let Some(scene) = scene else {
            self.mesh = None;
            return;
        };
        let mesh = build_scene_mesh(scene);
        if mesh.is_empty() {
            log::warn!("Scene has no drawable surfaces");
            self.mesh = None;
            return;
        }
        let vertex_buf = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model VB"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: BufferUsages::VERTEX,
            });
        let textures = scene
            .textures
            .iter()
            .map(|image| {
                create_texture_bind_group(
                    &self.device,
                    &self.queue,
                    &self.material_bgl,
                    &self.material_sampler,
                    "Base Colour Texture",
                    image,
                )
            })
            .collect();
        let uploaded = GpuMesh {
            vertex_buf,
            solid: self.index_buffer("Model IB", &mesh.solid_indices),
            batches: mesh.batches,
            wire: self.index_buffer("Wireframe IB", &mesh.wire_indices),
            shadow: self.index_buffer("Shadow IB", &mesh.shadow_indices),
            textures,
            bounds: mesh.bounds,
        };
        self.mesh = Some(uploaded);
    }

    fn index_buffer(&self, label: &str, indices: &[u32]) -> Option<(Buffer, u32)> {
        if indices.is_empty() {
            return None;
        }
        let buf = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: BufferUsages::INDEX,
            });
        Some((buf, indices.len() as u32))
    }

    /// Resize: reconfigure surface & recreate depth view.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width.max(1);
        self.height = height.max(1);
        self.surface_config.width = self.width;
        self.surface_config.height = self.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = create_depth_view(&self.device, &self.surface_config);
    }

    /// Render one frame: update globals, fill the shadow map, clear to the preset
    /// background, draw floor shadow + grid + model.
    pub fn render(&mut self, view: &FrameView) -> Result<(), SurfaceError> {
        let aspect = self.width as f32 / self.height as f32;
        let bounds = self.mesh.as_ref().and_then(|m| m.bounds);
        let globals = Globals::new(view, aspect, bounds);
        self.queue
            .write_buffer(&self.globals_buf, 0, bytemuck::bytes_of(&globals));

        let frame = self.surface.get_current_texture()?;
        let target = frame.texture.create_view(&Default::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("MainEncoder"),
            });

        {
            let mut spass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("ShadowPass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            let casters = self
                .mesh
                .as_ref()
                .and_then(|m| m.shadow.as_ref().map(|shadow| (m, shadow)));
            if let Some((mesh, (buf, count))) = casters {
                spass.set_pipeline(&self.shadow_pipeline);
                spass.set_bind_group(0, &self.shadow_globals_bg, &[]);
                spass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                spass.set_index_buffer(buf.slice(..), wgpu::IndexFormat::Uint32);
                spass.draw_indexed(0..*count, 0, 0..1);
            }
        }

        {
            let mut rpass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("MainPass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(clear_color(view.environment)),
                        store: StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            rpass.set_bind_group(0, &self.globals_bg, &[]);
            rpass.set_bind_group(1, &self.white_bg, &[]);

            if self.mesh.as_ref().is_some_and(|m| m.shadow.is_some()) {
                rpass.set_pipeline(&self.ground_pipeline);
                rpass.draw(0..6, 0..1);
            }

            if view.show_grid {
                rpass.set_pipeline(&self.grid_pipeline);
                rpass.set_vertex_buffer(0, self.grid_buf.slice(..));
                rpass.draw(0..self.grid_vertex_count, 0..1);
            }

            if let Some(mesh) = &self.mesh {
                rpass.set_vertex_buffer(0, mesh.vertex_buf.slice(..));
                if let Some((buf, _)) = &mesh.solid {
                    rpass.set_pipeline(&self.solid_pipeline);
                    rpass.set_index_buffer(buf.slice(..), wgpu::IndexFormat::Uint32);
                    for batch in &mesh.batches {
                        let texture = batch.texture.and_then(|t| mesh.textures.get(t));
                        rpass.set_bind_group(1, texture.unwrap_or(&self.white_bg), &[]);
                        rpass.draw_indexed(batch.range.clone(), 0, 0..1);
                    }
                }
                if let Some((buf, count)) = &mesh.wire {
                    rpass.set_pipeline(&self.wire_pipeline);
                    rpass.set_bind_group(1, &self.white_bg, &[]);
                    rpass.set_index_buffer(buf.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..*count, 0, 0..1);
                }
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    pub fn is_surface_lost(err: &SurfaceError) -> bool {
        matches!(err, SurfaceError::Lost | SurfaceError::Outdated)
    }

    pub fn recreate_surface(&mut self) {
        self.resize(self.width, self.height);
    }
}

/// Shared state for building the main-pass pipelines.
struct PipelineFactory<'a> {
    device: &'a Device,
    layout: &'a PipelineLayout,
    shader: &'a ShaderModule,
    format: TextureFormat,
}

impl PipelineFactory<'_> {
    fn create(
        &self,
        label: &str,
        (vs, fs): (&str, &str),
        buffers: &[VertexBufferLayout<'static>],
        topology: PrimitiveTopology,
        blend: BlendState,
    ) -> RenderPipeline {
        // Blended passes draw over what is already there and leave depth alone.
        let depth_write_enabled = blend == BlendState::REPLACE;
        self.device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(self.layout),
                vertex: VertexState {
                    module: self.shader,
                    entry_point: Some(vs),
                    buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: self.shader,
                    entry_point: Some(fs),
                    targets: &[Some(ColorTargetState {
                        format: self.format,
                        blend: Some(blend),
                        write_mask: ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                // Single-sided surfaces discard back faces in the fragment shader.
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled,
                    depth_compare: CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
    }
}

/// Create a depth texture view matching the surface config.
fn create_depth_view(device: &Device, sc: &SurfaceConfiguration) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("DepthTex"),
        size: Extent3d {
            width: sc.width.max(1),
            height: sc.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}

/// Depth-only pipeline rendering shadow casters from the key light.
fn create_shadow_pipeline(
    device: &Device,
    layout: &PipelineLayout,
    shader: &ShaderModule,
) -> RenderPipeline {
    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("Shadow Pipeline"),
        layout: Some(layout),
        vertex: VertexState {
            module: shader,
            entry_point: Some("vs_shadow"),
            buffers: &[GpuVertex::LAYOUT],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: None,
        primitive: wgpu::PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: DepthBiasState {
                constant: 2,
                slope_scale: 2.0,
                clamp: 0.0,
            },
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_shadow_view(device: &Device) -> TextureView {
    let tex = device.create_texture(&TextureDescriptor {
        label: Some("ShadowMap"),
        size: Extent3d {
            width: SHADOW_MAP_SIZE,
            height: SHADOW_MAP_SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    tex.create_view(&TextureViewDescriptor::default())
}

/// Upload an sRGB RGBA8 image and bind it with the base colour sampler.
fn create_texture_bind_group(
    device: &Device,
    queue: &Queue,
    layout: &BindGroupLayout,
    sampler: &Sampler,
    label: &str,
    image: &TextureImage,
) -> BindGroup {
    let texture = device.create_texture_with_data(
        queue,
        &TextureDescriptor {
            label: Some(label),
            size: Extent3d {
                width: image.width.max(1),
                height: image.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &image.rgba,
    );
    let view = texture.create_view(&TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: BindingResource::Sampler(sampler),
            },
        ],
    })
}
