use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::config::{MAX_KERNEL_RADIUS, PLACEHOLDER_TEXEL};
use crate::coords::{ColorRgba, PixelViewport};
use crate::device::Gpu;
use crate::render::{GpuBackend, InitError, RegionDraw, RenderError};

use super::common::{
    QUAD_INDICES, QUAD_POSITIONS, QUAD_TEXCOORDS, QuadPosition, QuadTexCoord, align_to,
    linear_clamp_sampler, premul_alpha_blend, sampler_entry, texture_entry,
};

/// Regions the uniform buffer holds before it has to grow.
const INITIAL_REGION_CAPACITY: usize = 16;

/// Full WGSL source of the blur program, with the kernel bound injected.
pub fn blur_shader_source() -> String {
    format!(
        "const MAX_RADIUS: i32 = {MAX_KERNEL_RADIUS};\n{}",
        include_str!("shaders/blur.wgsl")
    )
}

/// Compiles and validates a blur program without a device.
///
/// Parse and validation failures map to [`InitError::ShaderCompile`]; a
/// module lacking the `vs_main`/`fs_main` pair maps to
/// [`InitError::ProgramLink`].
pub fn validate_program(source: &str) -> Result<(), InitError> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| InitError::ShaderCompile(e.emit_to_string(source)))?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    )
    .validate(&module)
    .map_err(|e| InitError::ShaderCompile(e.emit_to_string(source)))?;

    for (name, stage) in [
        ("vs_main", naga::ShaderStage::Vertex),
        ("fs_main", naga::ShaderStage::Fragment),
    ] {
        if !module
            .entry_points
            .iter()
            .any(|ep| ep.name == name && ep.stage == stage)
        {
            return Err(InitError::ProgramLink(format!(
                "missing {stage:?} entry point `{name}`"
            )));
        }
    }
    Ok(())
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct RegionUniform {
    shape: [f32; 4],
    resolution: [f32; 2],
    corner_radius: f32,
    strength: f32,
}

impl From<&RegionDraw> for RegionUniform {
    fn from(d: &RegionDraw) -> Self {
        Self {
            shape: d.shape,
            resolution: d.resolution,
            corner_radius: d.corner_radius,
            strength: d.strength,
        }
    }
}

/// Persistent canvas backing store.
///
/// Never cleared implicitly: the previous frame stays readable until the
/// next `begin_frame`.
struct Canvas {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

/// Borrowed view of the canvas for compositing.
///
/// `generation` changes whenever the backing texture is recreated.
#[derive(Copy, Clone)]
pub struct CanvasView<'a> {
    pub texture: &'a wgpu::Texture,
    pub view: &'a wgpu::TextureView,
    pub generation: u64,
    pub width: u32,
    pub height: u32,
}

/// wgpu implementation of [`GpuBackend`].
///
/// Draws every region as one full-canvas quad; the fragment stage discards
/// pixels outside the region and blurs the 1x1 source texture inside it.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,

    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,

    position_vbo: wgpu::Buffer,
    texcoord_vbo: wgpu::Buffer,
    quad_ibo: wgpu::Buffer,

    source_view: wgpu::TextureView,
    source_sampler: wgpu::Sampler,

    region_ubo: wgpu::Buffer,
    region_stride: u64,
    region_capacity: usize,

    canvas: Option<Canvas>,
    canvas_generation: u64,
    viewport: PixelViewport,

    // `Some` between begin_frame and end_frame.
    frame_clear: Option<ColorRgba>,
    draws: Vec<RegionUniform>,
}

impl WgpuBackend {
    /// Builds the program and every static resource.
    ///
    /// The canvas itself is created lazily by the first `resize_canvas`.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
    ) -> Result<Self, InitError> {
        let source = blur_shader_source();
        validate_program(&source)?;

        let limits = device.limits();
        let uniform_size = std::mem::size_of::<RegionUniform>() as u64;
        if uniform_size > limits.max_uniform_buffer_binding_size as u64 {
            return Err(InitError::Resource("region uniform buffer"));
        }
        let region_stride = align_to(
            uniform_size,
            limits.min_uniform_buffer_offset_alignment as u64,
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("frost blur shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frost blur bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(uniform_size),
                    },
                    count: None,
                },
                texture_entry(1),
                sampler_entry(2),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("frost blur pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("frost blur pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadPosition::layout(), QuadTexCoord::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(premul_alpha_blend()),
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
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let position_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frost quad positions"),
            contents: bytemuck::cast_slice(&QUAD_POSITIONS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let texcoord_vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frost quad texcoords"),
            contents: bytemuck::cast_slice(&QUAD_TEXCOORDS),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_ibo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("frost quad indices"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let source = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("frost blur source"),
                size: wgpu::Extent3d {
                    width: 1,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &PLACEHOLDER_TEXEL,
        );
        let source_view = source.create_view(&wgpu::TextureViewDescriptor::default());
        let source_sampler = linear_clamp_sampler(device, "frost blur source sampler");

        let region_ubo = create_region_ubo(device, region_stride, INITIAL_REGION_CAPACITY);
        let bind_group = create_bind_group(
            device,
            &bind_group_layout,
            &region_ubo,
            uniform_size,
            &source_view,
            &source_sampler,
        );

        log::debug!(
            "WgpuBackend: program ready (format {format:?}, uniform stride {region_stride})"
        );

        Ok(Self {
            device: device.clone(),
            queue: queue.clone(),
            format,
            pipeline,
            bind_group_layout,
            bind_group,
            position_vbo,
            texcoord_vbo,
            quad_ibo,
            source_view,
            source_sampler,
            region_ubo,
            region_stride,
            region_capacity: INITIAL_REGION_CAPACITY,
            canvas: None,
            canvas_generation: 0,
            viewport: PixelViewport::new(0, 0, 0, 0),
            frame_clear: None,
            draws: Vec::new(),
        })
    }

    /// Canvas texture format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// The canvas as last rendered, if it has a non-zero size.
    pub fn canvas(&self) -> Option<CanvasView<'_>> {
        self.canvas.as_ref().map(|c| CanvasView {
            texture: &c.texture,
            view: &c.view,
            generation: self.canvas_generation,
            width: c.width,
            height: c.height,
        })
    }

    pub fn viewport(&self) -> PixelViewport {
        self.viewport
    }

    fn ensure_region_capacity(&mut self, required: usize) {
        if required <= self.region_capacity {
            return;
        }
        let new_cap = required.next_power_of_two();
        self.region_ubo = create_region_ubo(&self.device, self.region_stride, new_cap);
        self.bind_group = create_bind_group(
            &self.device,
            &self.bind_group_layout,
            &self.region_ubo,
            std::mem::size_of::<RegionUniform>() as u64,
            &self.source_view,
            &self.source_sampler,
        );
        self.region_capacity = new_cap;
        log::debug!("WgpuBackend: region capacity grown to {new_cap}");
    }

    fn upload_regions(&self) {
        let stride = self.region_stride as usize;
        let mut bytes = vec![0u8; self.draws.len() * stride];
        for (i, u) in self.draws.iter().enumerate() {
            let src = bytemuck::bytes_of(u);
            bytes[i * stride..i * stride + src.len()].copy_from_slice(src);
        }
        self.queue.write_buffer(&self.region_ubo, 0, &bytes);
    }
}

impl GpuBackend for WgpuBackend {
    fn resize_canvas(&mut self, width: u32, height: u32) {
        let max = self.device.limits().max_texture_dimension_2d;
        let (w, h) = (width.min(max), height.min(max));
        if (w, h) != (width, height) {
            log::warn!("WgpuBackend: canvas {width}x{height} clamped to {w}x{h}");
        }

        let unchanged = match self.canvas.as_ref() {
            Some(c) => c.width == w && c.height == h,
            None => w == 0 || h == 0,
        };
        if unchanged {
            return;
        }

        if w == 0 || h == 0 {
            self.canvas = None;
            self.canvas_generation += 1;
            return;
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("frost canvas"),
            size: wgpu::Extent3d {
                width: w,
                height: h,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        self.canvas = Some(Canvas {
            texture,
            view,
            width: w,
            height: h,
        });
        self.canvas_generation += 1;
    }

    fn set_viewport(&mut self, viewport: PixelViewport) {
        self.viewport = viewport;
    }

    fn begin_frame(&mut self, clear: ColorRgba) -> Result<(), RenderError> {
        self.frame_clear = Some(clear);
        self.draws.clear();
        Ok(())
    }

    fn draw_region(&mut self, draw: &RegionDraw) -> Result<(), RenderError> {
        if self.frame_clear.is_none() {
            return Err(RenderError::NoActiveFrame);
        }
        self.draws.push(RegionUniform::from(draw));
        Ok(())
    }

    fn end_frame(&mut self) -> Result<(), RenderError> {
        let clear = self.frame_clear.take().ok_or(RenderError::NoActiveFrame)?;

        // Zero-sized canvas: nothing to draw into.
        if self.canvas.is_none() {
            return Ok(());
        }

        self.ensure_region_capacity(self.draws.len());
        if !self.draws.is_empty() {
            self.upload_regions();
        }

        let canvas = self
            .canvas
            .as_ref()
            .ok_or(RenderError::ResourcesMissing("canvas"))?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frost blur encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("frost blur pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &canvas.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            let vp = self.viewport;
            let vw = vp.width.min(canvas.width.saturating_sub(vp.x));
            let vh = vp.height.min(canvas.height.saturating_sub(vp.y));
            if vw > 0 && vh > 0 {
                rpass.set_viewport(vp.x as f32, vp.y as f32, vw as f32, vh as f32, 0.0, 1.0);

                rpass.set_pipeline(&self.pipeline);
                rpass.set_vertex_buffer(0, self.position_vbo.slice(..));
                rpass.set_vertex_buffer(1, self.texcoord_vbo.slice(..));
                rpass.set_index_buffer(self.quad_ibo.slice(..), wgpu::IndexFormat::Uint16);

                for i in 0..self.draws.len() {
                    let offset = (i as u64 * self.region_stride) as u32;
                    rpass.set_bind_group(0, &self.bind_group, &[offset]);
                    rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
                }
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }
}

fn create_region_ubo(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("frost region ubo"),
        size: stride * capacity.max(1) as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    region_ubo: &wgpu::Buffer,
    uniform_size: u64,
    source_view: &wgpu::TextureView,
    source_sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("frost blur bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: region_ubo,
                    offset: 0,
                    size: wgpu::BufferSize::new(uniform_size),
                }),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(source_view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(source_sampler),
            },
        ],
    })
}

/// Creates [`WgpuBackend`]s on an existing device.
///
/// Holds cloned device/queue handles so the effect can build its backend
/// lazily, after the window and surface already exist.
#[derive(Clone)]
pub struct WgpuBackendFactory {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
}

impl WgpuBackendFactory {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        Self {
            device: device.clone(),
            queue: queue.clone(),
            format,
        }
    }

    /// Factory rendering in the window surface's format.
    pub fn for_gpu(gpu: &Gpu<'_>) -> Self {
        Self::new(gpu.device(), gpu.queue(), gpu.surface_format())
    }

    /// Factory on a device of its own, with no surface attached.
    pub fn headless(format: wgpu::TextureFormat) -> Result<Self, InitError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .map_err(|e| InitError::ContextUnavailable(e.to_string()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("frost headless device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .map_err(|e| InitError::ContextUnavailable(e.to_string()))?;

        Ok(Self {
            device,
            queue,
            format,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

impl crate::render::BackendFactory for WgpuBackendFactory {
    type Backend = WgpuBackend;

    fn create(&mut self) -> Result<WgpuBackend, InitError> {
        WgpuBackend::new(&self.device, &self.queue, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CLEAR_COLOR;
    use crate::render::BackendFactory;

    const W: u32 = 128;
    const H: u32 = 64;

    #[test]
    fn blur_program_validates() {
        validate_program(&blur_shader_source()).unwrap();
    }

    #[test]
    fn kernel_bound_is_injected() {
        let src = blur_shader_source();
        let header = format!("const MAX_RADIUS: i32 = {MAX_KERNEL_RADIUS};");
        assert!(src.starts_with(&header));
    }

    #[test]
    fn syntax_error_is_compile_failure() {
        let err = validate_program("fn broken( {").unwrap_err();
        assert!(matches!(err, InitError::ShaderCompile(_)), "{err:?}");
    }

    #[test]
    fn missing_undefined_constant_is_compile_failure() {
        // The raw file relies on the injected bound.
        let err = validate_program(include_str!("shaders/blur.wgsl")).unwrap_err();
        assert!(matches!(err, InitError::ShaderCompile(_)), "{err:?}");
    }

    #[test]
    fn missing_fragment_stage_is_link_failure() {
        let src = "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec4<f32>(0.0); }";
        let err = validate_program(src).unwrap_err();
        assert!(matches!(err, InitError::ProgramLink(_)), "{err:?}");
    }

    #[test]
    fn uniform_layout_matches_wgsl() {
        // vec4 + vec2 + f32 + f32, no padding.
        assert_eq!(std::mem::size_of::<RegionUniform>(), 32);
    }

    #[test]
    fn present_shader_validates() {
        let src = include_str!("shaders/present.wgsl");
        let module = naga::front::wgsl::parse_str(src).unwrap();
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .unwrap();
    }

    fn headless() -> Option<WgpuBackendFactory> {
        match WgpuBackendFactory::headless(wgpu::TextureFormat::Rgba8Unorm) {
            Ok(factory) => Some(factory),
            Err(InitError::ContextUnavailable(reason)) => {
                eprintln!("no gpu adapter, skipping: {reason}");
                None
            }
            Err(e) => panic!("{e}"),
        }
    }

    fn read_canvas(factory: &WgpuBackendFactory, backend: &WgpuBackend) -> Vec<u8> {
        let (device, queue) = (factory.device(), factory.queue());
        let canvas = backend.canvas().unwrap();
        let row = canvas.width as usize * 4;
        let padded = align_to(row as u64, wgpu::COPY_BYTES_PER_ROW_ALIGNMENT as u64);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frost canvas readback"),
            size: padded * canvas.height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frost readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            canvas.texture.as_image_copy(),
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded as u32),
                    rows_per_image: Some(canvas.height),
                },
            },
            wgpu::Extent3d {
                width: canvas.width,
                height: canvas.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(std::iter::once(encoder.finish()));

        let slice = buffer.slice(..);
        slice.map_async(wgpu::MapMode::Read, |r| r.unwrap());
        device.poll(wgpu::PollType::wait_indefinitely()).unwrap();

        let mut pixels = Vec::with_capacity(row * canvas.height as usize);
        {
            let data = slice.get_mapped_range();
            for line in data.chunks(padded as usize) {
                pixels.extend_from_slice(&line[..row]);
            }
        }
        buffer.unmap();
        pixels
    }

    fn texel(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
        let i = ((y * W + x) * 4) as usize;
        [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
    }

    fn assert_texel(actual: [u8; 4], expected: [u8; 4]) {
        let close = actual
            .iter()
            .zip(expected)
            .all(|(&a, e)| a.abs_diff(e) <= 1);
        assert!(close, "texel {actual:?}, expected {expected:?}");
    }

    #[test]
    fn gpu_regions_show_placeholder_and_discard_outside() {
        let Some(mut factory) = headless() else {
            return;
        };
        let mut backend = factory.create().unwrap();
        backend.resize_canvas(W, H);
        backend.set_viewport(PixelViewport::new(0, 0, W, H));

        // A row of small boxes along the top edge, more than the initial
        // uniform capacity. Shape y is bottom-left based.
        let regions = 20;
        backend.begin_frame(CLEAR_COLOR).unwrap();
        for i in 0..regions {
            let draw = RegionDraw {
                shape: [4.0 + 6.0 * i as f32, H as f32 - 4.0, 2.0, 2.0],
                corner_radius: 0.0,
                resolution: [W as f32, H as f32],
                strength: 1.0,
            };
            backend.draw_region(&draw).unwrap();
        }
        backend.end_frame().unwrap();
        assert!(backend.region_capacity >= regions);
        assert!(backend.region_capacity > INITIAL_REGION_CAPACITY);

        let pixels = read_canvas(&factory, &backend);

        let [r, g, b, a] = PLACEHOLDER_TEXEL;
        let premul = |c: u8| ((c as f32 * a as f32) / 255.0).round() as u8;
        let inside = [premul(r), premul(g), premul(b), a];
        let clear = [0, 0, 0, 0];

        // First and last slot of the dynamic uniform buffer.
        assert_texel(texel(&pixels, 4, 3), inside);
        assert_texel(texel(&pixels, 118, 3), inside);

        // Same columns mirrored to the bottom edge stay clear.
        assert_texel(texel(&pixels, 4, H - 4), clear);
        assert_texel(texel(&pixels, 118, H - 4), clear);
        // Between two boxes.
        assert_texel(texel(&pixels, 7, 3), clear);
        assert_texel(texel(&pixels, W / 2, H / 2), clear);
    }

    #[test]
    fn gpu_zero_sized_canvas_skips_frames() {
        let Some(mut factory) = headless() else {
            return;
        };
        let mut backend = factory.create().unwrap();
        backend.resize_canvas(W, H);
        let first = backend.canvas().unwrap().generation;

        backend.resize_canvas(0, H);
        assert!(backend.canvas().is_none());

        backend.begin_frame(CLEAR_COLOR).unwrap();
        let draw = RegionDraw {
            shape: [8.0, 8.0, 4.0, 4.0],
            corner_radius: 0.0,
            resolution: [0.0, H as f32],
            strength: 1.0,
        };
        backend.draw_region(&draw).unwrap();
        backend.end_frame().unwrap();

        backend.resize_canvas(W, H);
        assert!(backend.canvas().unwrap().generation > first);
    }
}
