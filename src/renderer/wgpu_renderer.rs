use crate::assets::Assets;
use crate::game_repr::Piece;
use crate::geometry::Rect;
use crate::renderer::scene::{DrawCommand, Rgba, Scene};
use crate::renderer::{Renderer, RendererError};
use glyphon::{
    Attrs, Buffer, Cache, Family, FontSystem, Metrics, Resolution, Shaping, SwashCache, TextArea,
    TextAtlas, TextBounds, TextRenderer, Viewport,
};
use image::RgbaImage;
use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;
use wgpu::util::DeviceExt;
use winit::window::Window;

// WGSL Shaders

const FILL_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    output.clip_position = vec4<f32>(input.position, 0.0, 1.0);
    output.color = input.color;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return input.color;
}
"#;

const SPRITE_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) tex_coords: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) tex_coords: vec2<f32>,
}

@group(0) @binding(0)
var texture: texture_2d<f32>;
@group(0) @binding(1)
var texture_sampler: sampler;

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    output.clip_position = vec4<f32>(input.position, 0.0, 1.0);
    output.tex_coords = input.tex_coords;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(texture, texture_sampler, input.tex_coords);
}
"#;

// Quad covering the disc's bounding box; `local` runs from -1 to 1 across it.
const DISC_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec2<f32>,
    @location(1) local: vec2<f32>,
    @location(2) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) local: vec2<f32>,
    @location(1) color: vec4<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var output: VertexOutput;
    output.clip_position = vec4<f32>(input.position, 0.0, 1.0);
    output.local = input.local;
    output.color = input.color;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    if (dot(input.local, input.local) > 1.0) {
        discard;
    }
    return input.color;
}
"#;

/// Line height of banner text relative to its font size.
const BANNER_LINE_HEIGHT: f32 = 1.2;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct FillVertex {
    position: [f32; 2],
    color: [f32; 4],
}

impl FillVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<FillVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct TexturedVertex {
    position: [f32; 2],
    tex_coords: [f32; 2],
}

impl TexturedVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TexturedVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct DiscVertex {
    position: [f32; 2],
    local: [f32; 2],
    color: [f32; 4],
}

impl DiscVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<DiscVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// An uploaded image, ready to bind.
struct GpuTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Which bound texture a sprite samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Sprite {
    Background,
    Piece(Piece),
}

/// One scene command turned into GPU work.
enum PreparedDraw {
    Fill(wgpu::Buffer),
    Sprite(Sprite, wgpu::Buffer),
    Disc(wgpu::Buffer),
}

/// Banner text state. The buffer is reshaped only when the text changes.
struct TextState {
    font_system: FontSystem,
    swash_cache: SwashCache,
    viewport: Viewport,
    atlas: TextAtlas,
    renderer: TextRenderer,
    buffer: Buffer,
    shaped: Option<(String, f32)>,
}

pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    _window: Arc<Window>,

    fill_pipeline: wgpu::RenderPipeline,
    sprite_pipeline: wgpu::RenderPipeline,
    disc_pipeline: wgpu::RenderPipeline,

    index_buffer: wgpu::Buffer,

    sprites: HashMap<Sprite, GpuTexture>,
    text: TextState,

    window_size: (u32, u32),
}

impl WgpuRenderer {
    /// Open the GPU for `window` and upload every image in `assets`.
    ///
    /// # Errors
    ///
    /// Fails if no adapter can present to the window or the device cannot
    /// be opened.
    pub async fn new(window: Arc<Window>, assets: &Assets) -> Result<Self, RendererError> {
        let size = window.inner_size();
        let window_size = (size.width.max(1), size.height.max(1));

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    label: None,
                    memory_hints: Default::default(),
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
            .ok_or(RendererError::NoSurfaceFormat)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: window_size.0,
            height: window_size.1,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Create texture bind group layout
        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                label: Some("texture_bind_group_layout"),
            });

        let fill_pipeline = create_pipeline(
            &device,
            config.format,
            "Fill",
            FILL_SHADER,
            &[],
            FillVertex::desc(),
        );
        let sprite_pipeline = create_pipeline(
            &device,
            config.format,
            "Sprite",
            SPRITE_SHADER,
            &[&texture_bind_group_layout],
            TexturedVertex::desc(),
        );
        let disc_pipeline = create_pipeline(
            &device,
            config.format,
            "Disc",
            DISC_SHADER,
            &[],
            DiscVertex::desc(),
        );

        // Create index buffer (shared across all quads)
        // Counter-clockwise winding: top-left, bottom-left, top-right, then top-right, bottom-left, bottom-right
        let indices: [u16; 6] = [0, 2, 1, 1, 2, 3];
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // Linear filtering scales the glyph images to whatever the tile size is
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let mut sprites = HashMap::new();
        let upload = |image: &RgbaImage, label: &str| {
            upload_texture(&device, &queue, &texture_bind_group_layout, &sampler, image, label)
        };
        sprites.insert(Sprite::Background, upload(assets.background(), "background"));
        for piece in Piece::all() {
            let label = Assets::glyph_file_stem(piece);
            sprites.insert(Sprite::Piece(piece), upload(assets.glyph(piece), &label));
        }

        let text = TextState::new(&device, &queue, config.format);

        debug!(
            "Renderer ready: {}x{}, format {:?}",
            window_size.0, window_size.1, config.format
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            _window: window,
            fill_pipeline,
            sprite_pipeline,
            disc_pipeline,
            index_buffer,
            sprites,
            text,
            window_size,
        })
    }

    fn prepare(&self, command: &DrawCommand) -> Option<PreparedDraw> {
        match command {
            DrawCommand::Background => {
                let (w, h) = self.window_size;
                let rect = Rect::new(0.0, 0.0, w as f32, h as f32);
                let vertices = self.textured_quad(&rect);
                Some(PreparedDraw::Sprite(
                    Sprite::Background,
                    self.vertex_buffer("Background Vertex Buffer", &vertices),
                ))
            }
            DrawCommand::Fill { rect, color } => {
                let color = linear_color(*color);
                let vertices = self
                    .to_ndc(rect)
                    .map(|position| FillVertex { position, color });
                Some(PreparedDraw::Fill(
                    self.vertex_buffer("Fill Vertex Buffer", &vertices),
                ))
            }
            DrawCommand::Glyph { piece, rect } => {
                let vertices = self.textured_quad(rect);
                Some(PreparedDraw::Sprite(
                    Sprite::Piece(*piece),
                    self.vertex_buffer("Glyph Vertex Buffer", &vertices),
                ))
            }
            DrawCommand::Disc {
                center,
                radius,
                color,
            } => {
                let bounds = Rect::new(
                    center.0 - radius,
                    center.1 - radius,
                    radius * 2.0,
                    radius * 2.0,
                );
                let color = linear_color(*color);
                let locals = [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0]];
                let positions = self.to_ndc(&bounds);
                let vertices: [DiscVertex; 4] = std::array::from_fn(|i| DiscVertex {
                    position: positions[i],
                    local: locals[i],
                    color,
                });
                Some(PreparedDraw::Disc(
                    self.vertex_buffer("Disc Vertex Buffer", &vertices),
                ))
            }
            DrawCommand::Banner { .. } => None,
        }
    }

    fn textured_quad(&self, rect: &Rect) -> [TexturedVertex; 4] {
        let tex_coords = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let positions = self.to_ndc(rect);
        std::array::from_fn(|i| TexturedVertex {
            position: positions[i],
            tex_coords: tex_coords[i],
        })
    }

    /// Pixel rectangle corners in normalized device coordinates.
    fn to_ndc(&self, rect: &Rect) -> [[f32; 2]; 4] {
        let (w, h) = (self.window_size.0 as f32, self.window_size.1 as f32);
        rect.corners()
            .map(|[x, y]| [x / w * 2.0 - 1.0, 1.0 - y / h * 2.0])
    }

    fn vertex_buffer<T: bytemuck::Pod>(&self, label: &str, vertices: &[T]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

impl Renderer for WgpuRenderer {
    fn draw(&mut self, scene: &Scene) -> Result<(), RendererError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.reconfigure();
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draws: Vec<PreparedDraw> = scene
            .commands()
            .iter()
            .filter_map(|command| self.prepare(command))
            .collect();

        let banner = scene.commands().iter().find_map(|command| match command {
            DrawCommand::Banner { text, color, size } => Some((text.as_str(), *color, *size)),
            _ => None,
        });
        let has_banner = banner.is_some();
        if let Some((text, color, size)) = banner {
            self.text.prepare(&self.device, &self.queue, self.window_size, text, color, size)?;
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for draw in &draws {
                match draw {
                    PreparedDraw::Fill(buffer) => {
                        render_pass.set_pipeline(&self.fill_pipeline);
                        render_pass.set_vertex_buffer(0, buffer.slice(..));
                    }
                    PreparedDraw::Sprite(sprite, buffer) => {
                        let Some(texture) = self.sprites.get(sprite) else {
                            warn!("No texture uploaded for {sprite:?}");
                            continue;
                        };
                        render_pass.set_pipeline(&self.sprite_pipeline);
                        render_pass.set_bind_group(0, &texture.bind_group, &[]);
                        render_pass.set_vertex_buffer(0, buffer.slice(..));
                    }
                    PreparedDraw::Disc(buffer) => {
                        render_pass.set_pipeline(&self.disc_pipeline);
                        render_pass.set_vertex_buffer(0, buffer.slice(..));
                    }
                }
                render_pass.draw_indexed(0..6, 0, 0..1);
            }

            // The banner is always the last command, so text goes on top
            if has_banner {
                self.text
                    .renderer
                    .render(&self.text.atlas, &self.text.viewport, &mut render_pass)?;
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.text.atlas.trim();

        Ok(())
    }

    fn resize(&mut self, new_size: (u32, u32)) {
        if new_size.0 > 0 && new_size.1 > 0 {
            self.window_size = new_size;
            self.config.width = new_size.0;
            self.config.height = new_size.1;
            self.reconfigure();
            debug!("Resized surface to {}x{}", new_size.0, new_size.1);
        }
    }

    fn window_size(&self) -> (u32, u32) {
        self.window_size
    }
}

impl TextState {
    fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let mut font_system = FontSystem::new();
        let swash_cache = SwashCache::new();
        let cache = Cache::new(device);
        let viewport = Viewport::new(device, &cache);
        let mut atlas = TextAtlas::new(device, queue, &cache, format);
        let renderer = TextRenderer::new(&mut atlas, device, wgpu::MultisampleState::default(), None);
        let buffer = Buffer::new(&mut font_system, Metrics::new(48.0, 48.0 * BANNER_LINE_HEIGHT));

        Self {
            font_system,
            swash_cache,
            viewport,
            atlas,
            renderer,
            buffer,
            shaped: None,
        }
    }

    /// Lay out `text` centered in the window and queue its glyphs.
    fn prepare(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        window_size: (u32, u32),
        text: &str,
        color: Rgba,
        size: f32,
    ) -> Result<(), RendererError> {
        let (width, height) = (window_size.0 as f32, window_size.1 as f32);
        let line_height = size * BANNER_LINE_HEIGHT;

        let up_to_date = self
            .shaped
            .as_ref()
            .is_some_and(|(shaped, shaped_size)| shaped == text && *shaped_size == size);
        if !up_to_date {
            self.buffer
                .set_metrics(&mut self.font_system, Metrics::new(size, line_height));
            self.buffer
                .set_size(&mut self.font_system, Some(width), Some(height));
            self.buffer.set_text(
                &mut self.font_system,
                text,
                Attrs::new().family(Family::SansSerif),
                Shaping::Advanced,
            );
            self.buffer.shape_until_scroll(&mut self.font_system, false);
            self.shaped = Some((text.to_string(), size));
        } else {
            self.buffer
                .set_size(&mut self.font_system, Some(width), Some(height));
        }

        let text_width = self
            .buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0, f32::max);

        self.viewport.update(
            queue,
            Resolution {
                width: window_size.0,
                height: window_size.1,
            },
        );

        let [r, g, b, a] = color;
        self.renderer.prepare(
            device,
            queue,
            &mut self.font_system,
            &mut self.atlas,
            &self.viewport,
            [TextArea {
                buffer: &self.buffer,
                left: (width - text_width) / 2.0,
                top: (height - line_height) / 2.0,
                scale: 1.0,
                bounds: TextBounds {
                    left: 0,
                    top: 0,
                    right: window_size.0 as i32,
                    bottom: window_size.1 as i32,
                },
                default_color: glyphon::Color::rgba(r, g, b, a),
                custom_glyphs: &[],
            }],
            &mut self.swash_cache,
        )?;

        Ok(())
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    name: &str,
    source: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    vertex_layout: wgpu::VertexBufferLayout<'static>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{name} Shader")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{name} Pipeline Layout")),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{name} Pipeline")),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    })
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    image: &RgbaImage,
    label: &str,
) -> GpuTexture {
    let dimensions = image.dimensions();

    let texture_size = wgpu::Extent3d {
        width: dimensions.0,
        height: dimensions.1,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(&format!("{label} Texture")),
        size: texture_size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        image,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * dimensions.0),
            rows_per_image: Some(dimensions.1),
        },
        texture_size,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
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
        label: Some(&format!("{label} Bind Group")),
    });

    GpuTexture {
        _texture: texture,
        bind_group,
    }
}

/// sRGB palette color to the linear values an sRGB surface expects.
fn linear_color(color: Rgba) -> [f32; 4] {
    let channel = |c: u8| {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    [
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3] as f32 / 255.0,
    ]
}
