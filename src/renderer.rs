// renderer.rs - wgpu scene renderer with the egui overlay on top
//
// One box mesh is drawn once per tagged surface with its own uniform buffer
// and bind group; the floor is a disc. The egui pass runs after the scene
// pass on the same frame, as a second render pass.

use crate::config::hex_to_rgb;
use crate::gallery::Gallery;
use crate::hover::SlotVisual;
use crate::layout::{ControlSide, RingLayout, SurfaceId, SurfaceRole};
use crate::lights::SceneUniform;
use crate::mesh::{build_disc, build_unit_box, Mesh, Vertex};
use crate::textures::{arrow_image, fit_to_limit, placeholder, LoadedImage, TextureSlot};
use glam::{Mat4, Vec3};
use image::RgbaImage;
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::window::Window;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const FLOOR_RADIUS: f32 = 40.0;
const FLOOR_Y: f32 = -1.1;
const ALPHA_CUTOFF: f32 = 0.05;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable graphics adapter")]
    NoAdapter,
    #[error("failed to open device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// rgb (sRGB), opacity
    pub base_color: [f32; 4],
    /// rgb (sRGB), intensity
    pub emissive: [f32; 4],
    /// metalness, roughness, texture weight, alpha cutoff
    pub material: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Material {
    color: u32,
    emissive: u32,
    emissive_intensity: f32,
    metalness: f32,
    roughness: f32,
    textured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Floor,
    Surface(SurfaceId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextureRef {
    White,
    Artwork(usize),
    Arrow(ControlSide),
}

impl From<TextureSlot> for TextureRef {
    fn from(slot: TextureSlot) -> Self {
        match slot {
            TextureSlot::Artwork(i) => TextureRef::Artwork(i),
            TextureSlot::Arrow(side) => TextureRef::Arrow(side),
        }
    }
}

fn material(role: Option<SurfaceRole>, visual: Option<&SlotVisual>) -> Material {
    match role {
        None => Material {
            color: 0x202020,
            emissive: 0x000000,
            emissive_intensity: 0.0,
            metalness: 0.6,
            roughness: 0.25,
            textured: false,
        },
        Some(SurfaceRole::Border) => Material {
            color: visual.map(|v| v.border_color).unwrap_or(0x888888),
            emissive: 0x000000,
            emissive_intensity: 0.0,
            metalness: 0.7,
            roughness: 0.4,
            textured: false,
        },
        Some(SurfaceRole::Artwork) => Material {
            color: 0xffffff,
            emissive: visual.map(|v| v.artwork_emissive).unwrap_or(0x000000),
            emissive_intensity: 1.0,
            metalness: 0.0,
            roughness: 1.0,
            textured: true,
        },
        Some(SurfaceRole::Control(_)) => Material {
            color: 0xffffff,
            emissive: 0xffffff,
            emissive_intensity: 0.7,
            metalness: 0.8,
            roughness: 0.2,
            textured: true,
        },
    }
}

/// Per-object uniform for the current ring angle and hover visuals.
pub fn object_uniform(layout: &RingLayout, visuals: &[SlotVisual], kind: ObjectKind, ring_rotation: f32) -> ObjectUniform {
    let (model, role, visual) = match kind {
        ObjectKind::Floor => (Mat4::from_translation(Vec3::new(0.0, FLOOR_Y, 0.0)), None, None),
        ObjectKind::Surface(id) => {
            let surface = layout.surface(id);
            let visual = surface.and_then(|s| visuals.get(s.slot));
            let pose = match (surface, visual) {
                (Some(s), Some(v)) if s.role == SurfaceRole::Artwork => v.artwork_pose,
                _ => Default::default(),
            };
            (
                layout.surface_model(id, ring_rotation, pose),
                surface.map(|s| s.role),
                visual,
            )
        }
    };
    let m = material(role, visual);
    let [r, g, b] = hex_to_rgb(m.color);
    let [er, eg, eb] = hex_to_rgb(m.emissive);

    ObjectUniform {
        model: model.to_cols_array_2d(),
        normal_matrix: model.inverse().transpose().to_cols_array_2d(),
        base_color: [r, g, b, 1.0],
        emissive: [er, eg, eb, m.emissive_intensity],
        material: [
            m.metalness,
            m.roughness,
            if m.textured { 1.0 } else { 0.0 },
            ALPHA_CUTOFF,
        ],
    }
}

/// Floor first, then borders, artworks and controls.
pub fn draw_order(layout: &RingLayout) -> Vec<ObjectKind> {
    let mut order = vec![ObjectKind::Floor];
    if layout.is_empty() {
        return order;
    }
    for role in [SurfaceRole::Border, SurfaceRole::Artwork] {
        order.extend(
            layout
                .surfaces()
                .iter()
                .enumerate()
                .filter(|(_, s)| s.role == role)
                .map(|(id, _)| ObjectKind::Surface(id)),
        );
    }
    order.extend(layout.controls().iter().map(|&id| ObjectKind::Surface(id)));
    order
}

fn texture_ref(layout: &RingLayout, kind: ObjectKind) -> TextureRef {
    match kind {
        ObjectKind::Floor => TextureRef::White,
        ObjectKind::Surface(id) => match layout.surface(id) {
            Some(s) => match s.role {
                SurfaceRole::Border => TextureRef::White,
                SurfaceRole::Artwork => TextureRef::Artwork(s.slot),
                SurfaceRole::Control(side) => TextureRef::Arrow(side),
            },
            None => TextureRef::White,
        },
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

struct GpuTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl GpuTexture {
    fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, img: &RgbaImage, label: &str) -> Self {
        let (width, height) = img.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            label: Some(label),
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            img,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

struct DrawObject {
    kind: ObjectKind,
    texture: TextureRef,
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

fn create_depth_view(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

pub struct Renderer {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pub size: winit::dpi::PhysicalSize<u32>,
    render_pipeline: wgpu::RenderPipeline,
    depth_view: wgpu::TextureView,

    scene_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,

    box_mesh: GpuMesh,
    floor_mesh: GpuMesh,

    white: GpuTexture,
    placeholder: GpuTexture,
    artworks: Vec<Option<GpuTexture>>,
    left_arrow: GpuTexture,
    right_arrow: GpuTexture,

    objects: Vec<DrawObject>,

    // UI
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, layout: &RingLayout) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        // SAFETY: the window is kept alive by the event loop for as long as the renderer
        let surface = unsafe { instance.create_surface(window.as_ref()) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RenderError::NoAdapter)?;
        info!("adapter: {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default().using_resolution(adapter.limits())
                    },
                    label: None,
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .unwrap_or(wgpu::TextureFormat::Bgra8UnormSrgb);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, &config);

        // --- uniforms and layouts ---
        let camera = crate::camera::Camera::new(Vec3::new(0.0, 1.0, 4.0), Vec3::ZERO, 60.0, 1.0);
        let scene_uniform = SceneUniform::build(&camera, layout, 0.0, 0.0);
        let scene_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("scene_buffer"),
            contents: bytemuck::cast_slice(&[scene_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let scene_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("scene_bind_group_layout"),
        });
        let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &scene_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
            label: Some("scene_bind_group"),
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some("object_bind_group_layout"),
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        // --- textures ---
        let white = GpuTexture::from_image(
            &device,
            &queue,
            &RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255])),
            "white_texture",
        );
        let placeholder = GpuTexture::from_image(&device, &queue, &placeholder(256, 8), "placeholder_texture");
        let left_arrow = GpuTexture::from_image(&device, &queue, &arrow_image(ControlSide::Left, 128), "left_arrow");
        let right_arrow =
            GpuTexture::from_image(&device, &queue, &arrow_image(ControlSide::Right, 128), "right_arrow");

        // --- pipeline ---
        let shader = device.create_shader_module(wgpu::include_wgsl!("shader_gallery.wgsl"));
        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&scene_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
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
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        let box_mesh = GpuMesh::upload(&device, &build_unit_box(), "box_mesh");
        let floor_mesh = GpuMesh::upload(&device, &build_disc(FLOOR_RADIUS, 64), "floor_mesh");

        // --- egui ---
        let egui_ctx = egui::Context::default();
        crate::ui::setup_fonts(&egui_ctx);

        // egui-winit 0.23 needs the scale factor set explicitly on high-DPI screens
        let mut egui_state = egui_winit::State::new(window.as_ref());
        egui_state.set_pixels_per_point(window.scale_factor() as f32);

        let egui_renderer = egui_wgpu::Renderer::new(&device, config.format, None, 1);

        let mut renderer = Self {
            surface,
            device,
            queue,
            config,
            size,
            render_pipeline,
            depth_view,
            scene_buffer,
            scene_bind_group,
            object_layout,
            sampler,
            box_mesh,
            floor_mesh,
            white,
            placeholder,
            artworks: (0..layout.len()).map(|_| None).collect(),
            left_arrow,
            right_arrow,
            objects: Vec::new(),
            egui_ctx,
            egui_state,
            egui_renderer,
        };
        renderer.build_objects(layout);
        Ok(renderer)
    }

    fn view_for(&self, texture: TextureRef) -> &wgpu::TextureView {
        match texture {
            TextureRef::White => &self.white.view,
            TextureRef::Artwork(i) => match self.artworks.get(i) {
                Some(Some(t)) => &t.view,
                _ => &self.placeholder.view,
            },
            TextureRef::Arrow(ControlSide::Left) => &self.left_arrow.view,
            TextureRef::Arrow(ControlSide::Right) => &self.right_arrow.view,
        }
    }

    fn object_bind_group(&self, buffer: &wgpu::Buffer, texture: TextureRef) -> wgpu::BindGroup {
        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.object_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(self.view_for(texture)),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some("object_bind_group"),
        })
    }

    fn build_objects(&mut self, layout: &RingLayout) {
        let mut objects = Vec::new();
        for kind in draw_order(layout) {
            let texture = texture_ref(layout, kind);
            let uniform = object_uniform(layout, &[], kind, 0.0);
            let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("object_buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
            let bind_group = self.object_bind_group(&buffer, texture);
            objects.push(DrawObject {
                kind,
                texture,
                buffer,
                bind_group,
            });
        }
        self.objects = objects;
    }

    fn rebind(&mut self, texture: TextureRef) {
        let groups: Vec<(usize, wgpu::BindGroup)> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.texture == texture)
            .map(|(i, o)| (i, self.object_bind_group(&o.buffer, texture)))
            .collect();
        for (i, group) in groups {
            self.objects[i].bind_group = group;
        }
    }

    /// Uploads a decoded image; failures keep the placeholder.
    pub fn upload_image(&mut self, loaded: LoadedImage) {
        let img = match loaded.result {
            Ok(img) => img,
            Err(e) => {
                warn!(
                    "{}",
                    crate::i18n::tr_with("error.decode_image", &[("err", e.to_string())])
                );
                return;
            }
        };
        let img = fit_to_limit(img, self.device.limits().max_texture_dimension_2d);
        let texture = TextureRef::from(loaded.slot);

        match loaded.slot {
            TextureSlot::Artwork(i) => {
                let Some(entry) = self.artworks.get_mut(i) else {
                    warn!("image for unknown slot {}", i);
                    return;
                };
                *entry = Some(GpuTexture::from_image(&self.device, &self.queue, &img, "artwork_texture"));
            }
            TextureSlot::Arrow(ControlSide::Left) => {
                self.left_arrow = GpuTexture::from_image(&self.device, &self.queue, &img, "left_arrow");
            }
            TextureSlot::Arrow(ControlSide::Right) => {
                self.right_arrow = GpuTexture::from_image(&self.device, &self.queue, &img, "right_arrow");
            }
        }
        self.rebind(texture);
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, &self.config);
        }
    }

    /// Writes this frame's scene and object uniforms; `time` in seconds.
    pub fn update(&mut self, gallery: &Gallery, time: f32) {
        let rotation = gallery.rotation().current();
        let scene = SceneUniform::build(gallery.camera(), gallery.layout(), rotation, time);
        self.queue
            .write_buffer(&self.scene_buffer, 0, bytemuck::cast_slice(&[scene]));

        for object in &self.objects {
            let uniform = object_uniform(gallery.layout(), gallery.visuals(), object.kind, rotation);
            self.queue
                .write_buffer(&object.buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }

    pub fn render_with_ui(&mut self, window: &Window, run_ui: impl FnOnce(&egui::Context)) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // 1. scene
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });

            render_pass.set_pipeline(&self.render_pipeline);
            render_pass.set_bind_group(0, &self.scene_bind_group, &[]);
            for object in &self.objects {
                let mesh = match object.kind {
                    ObjectKind::Floor => &self.floor_mesh,
                    ObjectKind::Surface(_) => &self.box_mesh,
                };
                render_pass.set_bind_group(1, &object.bind_group, &[]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        // 2. UI
        let raw_input = self.egui_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, run_ui);

        self.egui_state
            .handle_platform_output(window, &self.egui_ctx, full_output.platform_output);
        let clipped_primitives = self.egui_ctx.tessellate(full_output.shapes);

        let screen_descriptor = egui_wgpu::renderer::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        for (id, delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, delta);
        }

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &clipped_primitives,
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
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            self.egui_renderer
                .render(&mut render_pass, &clipped_primitives, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SurfacePose;

    #[test]
    fn uniform_size_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 176);
    }

    #[test]
    fn draw_order_is_floor_borders_artworks_controls() {
        let layout = RingLayout::build(3, 4.0);
        let order = draw_order(&layout);
        assert_eq!(order.len(), 1 + 3 * 4);
        assert_eq!(order[0], ObjectKind::Floor);

        let roles: Vec<SurfaceRole> = order[1..]
            .iter()
            .filter_map(|k| match k {
                ObjectKind::Surface(id) => layout.surface(*id).map(|s| s.role),
                ObjectKind::Floor => None,
            })
            .collect();
        assert!(roles[..3].iter().all(|r| *r == SurfaceRole::Border));
        assert!(roles[3..6].iter().all(|r| *r == SurfaceRole::Artwork));
        assert!(roles[6..].iter().all(|r| matches!(r, SurfaceRole::Control(_))));
    }

    #[test]
    fn empty_ring_draws_only_the_floor() {
        let layout = RingLayout::build(0, 4.0);
        assert_eq!(draw_order(&layout), vec![ObjectKind::Floor]);
    }

    #[test]
    fn floor_sits_below_the_frames() {
        let layout = RingLayout::build(1, 4.0);
        let u = object_uniform(&layout, &[], ObjectKind::Floor, 0.0);
        assert_eq!(u.model[3][1], FLOOR_Y);
        assert_eq!(u.material[2], 0.0);
    }

    #[test]
    fn border_takes_its_visual_color() {
        let layout = RingLayout::build(2, 4.0);
        let mut visuals = vec![SlotVisual::resting(0x888888); 2];
        visuals[1].border_color = 0xffff00;
        let border = layout.slots()[1].border;
        let u = object_uniform(&layout, &visuals, ObjectKind::Surface(border), 0.0);
        assert_eq!(&u.base_color[..3], &[1.0, 1.0, 0.0]);
        assert_eq!(u.material[0], 0.7);
    }

    #[test]
    fn popped_artwork_is_scaled_and_glows() {
        let layout = RingLayout::build(1, 4.0);
        let mut visuals = vec![SlotVisual::resting(0x888888)];
        visuals[0].artwork_pose = SurfacePose {
            scale: 1.04,
            forward: 0.04,
        };
        visuals[0].artwork_emissive = 0x333300;
        let art = layout.slots()[0].artwork;

        let rest = object_uniform(&layout, &[SlotVisual::resting(0x888888)], ObjectKind::Surface(art), 0.0);
        let popped = object_uniform(&layout, &visuals, ObjectKind::Surface(art), 0.0);
        assert!(popped.model[0][0] > rest.model[0][0]);
        assert!(popped.emissive[0] > 0.0);
        assert_eq!(rest.emissive[0], 0.0);
        assert_eq!(popped.material[2], 1.0);
    }

    #[test]
    fn controls_glow_and_alpha_test() {
        let layout = RingLayout::build(1, 4.0);
        let right = layout.slots()[0].right;
        let u = object_uniform(&layout, &[], ObjectKind::Surface(right), 0.0);
        assert_eq!(u.emissive, [1.0, 1.0, 1.0, 0.7]);
        assert_eq!(u.material[3], ALPHA_CUTOFF);
        assert_eq!(
            texture_ref(&layout, ObjectKind::Surface(right)),
            TextureRef::Arrow(ControlSide::Right)
        );
    }
}
