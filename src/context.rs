//! The wgpu rendering context.
//!
//! [`Context`] owns the device, queue, pipeline and every GPU resource of the scene, and
//! implements [`GraphicsDevice`] on top of them. Draws recorded between [`Context::begin_frame`]
//! and [`Context::end_frame`] are replayed into a single render pass: every draw gets its own
//! slot in a dynamic-offset uniform buffer holding the uniforms that were current when it was
//! recorded.
//!
//! A context renders either into a window surface or into an offscreen texture that can be read
//! back with [`Context::read_pixels`].

use std::{iter, ops::Range, sync::Arc};

use anyhow::{Context as _, ensure};
use instant::Duration;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::{
    config::Config,
    data_structures::{model::ModelVertex, texture::Texture},
    pipelines::basic::{self, ObjectUniform},
    render::{GraphicsDevice, MeshHandle, TextureHandle, Uniform, UniformValue},
    resources::texture::diffuse_layout,
};

/// Draws the uniform buffer has room for before it has to grow.
const INITIAL_DRAW_CAPACITY: u64 = 32;

#[derive(Debug)]
pub enum RenderTarget {
    Surface {
        window: Arc<Window>,
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
        is_configured: bool,
    },
    Offscreen {
        texture: wgpu::Texture,
    },
}

#[derive(Debug)]
struct GpuMesh {
    buffer: wgpu::Buffer,
    num_vertices: u32,
}

#[derive(Debug)]
struct GpuTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
struct DrawCall {
    mesh: MeshHandle,
    texture: TextureHandle,
    vertices: Range<u32>,
    uniform: ObjectUniform,
}

#[derive(Debug)]
pub struct Context {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub clear_colour: wgpu::Color,
    target: RenderTarget,
    format: wgpu::TextureFormat,
    size: [u32; 2],
    depth_texture: Texture,
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    object_capacity: u64,
    uniform_stride: u64,
    meshes: Vec<Option<GpuMesh>>,
    textures: Vec<Option<GpuTexture>>,
    /// Sampled for [`TextureHandle::UNBOUND`].
    fallback: GpuTexture,
    bound_mesh: Option<MeshHandle>,
    bound_texture: TextureHandle,
    pending: ObjectUniform,
    draws: Vec<DrawCall>,
}

impl Context {
    /// Creates a context presenting to `window`.
    pub async fn new(window: Arc<Window>, config: &Config) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
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
            .context("No graphics adapter can present to the window")?;
        let (device, queue) = request_device(&adapter).await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = pick_surface_format(&surface_caps.formats)
            .context("The window surface supports no texture format on this adapter")?;
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let is_configured = size.width > 0 && size.height > 0;
        if is_configured {
            surface.configure(&device, &surface_config);
        }
        let target = RenderTarget::Surface {
            window,
            surface,
            config: surface_config,
            is_configured,
        };

        let mut ctx = Self::with_target(device, queue, target, surface_format, [size.width, size.height]);
        ctx.clear_colour = config.clear_colour;
        Ok(ctx)
    }

    /// Creates a context rendering into a `width` x `height` texture, no window required.
    pub async fn new_headless(width: u32, height: u32) -> anyhow::Result<Self> {
        ensure!(width > 0 && height > 0, "Offscreen target must not be empty");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("No graphics adapter available")?;
        let (device, queue) = request_device(&adapter).await?;

        let format = Texture::COLOR_FORMAT;
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Ok(Self::with_target(
            device,
            queue,
            RenderTarget::Offscreen { texture },
            format,
            [width, height],
        ))
    }

    fn with_target(
        device: wgpu::Device,
        queue: wgpu::Queue,
        target: RenderTarget,
        format: wgpu::TextureFormat,
        size: [u32; 2],
    ) -> Self {
        let depth_texture = Texture::create_depth_texture(&device, size, "depth_texture");
        let texture_layout = diffuse_layout(&device);
        let object_layout = basic::object_uniform_layout(&device);
        let pipeline = basic::mk_scene_pipeline(&device, format, &texture_layout, &object_layout);

        let uniform_stride = basic::uniform_stride(device.limits().min_uniform_buffer_offset_alignment);
        let (object_buffer, object_bind_group) =
            mk_object_buffer(&device, &object_layout, uniform_stride, INITIAL_DRAW_CAPACITY);

        let fallback_texture = Texture::create_solid(&device, &queue, 1, 1, [0, 0, 0, 255], "unbound texture");
        let fallback = GpuTexture {
            bind_group: mk_texture_bind_group(&device, &texture_layout, &fallback_texture, "unbound texture"),
            texture: fallback_texture,
        };

        Self {
            device,
            queue,
            clear_colour: wgpu::Color::BLACK,
            target,
            format,
            size,
            depth_texture,
            pipeline,
            texture_layout,
            object_layout,
            object_buffer,
            object_bind_group,
            object_capacity: INITIAL_DRAW_CAPACITY,
            uniform_stride,
            meshes: Vec::new(),
            textures: Vec::new(),
            fallback,
            bound_mesh: None,
            bound_texture: TextureHandle::UNBOUND,
            pending: ObjectUniform::new(),
            draws: Vec::new(),
        }
    }

    pub fn window(&self) -> Option<&Arc<Window>> {
        match &self.target {
            RenderTarget::Surface { window, .. } => Some(window),
            RenderTarget::Offscreen { .. } => None,
        }
    }

    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Reconfigures the surface and depth buffer. Offscreen targets keep their size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let RenderTarget::Surface {
            surface,
            config,
            is_configured,
            ..
        } = &mut self.target
        {
            config.width = width;
            config.height = height;
            surface.configure(&self.device, config);
            *is_configured = true;
            self.size = [width, height];
            self.depth_texture = Texture::create_depth_texture(&self.device, self.size, "depth_texture");
        }
    }

    /// Forgets the draws of the previous frame.
    pub fn begin_frame(&mut self) {
        self.draws.clear();
        self.bound_mesh = None;
        self.bound_texture = TextureHandle::UNBOUND;
    }

    /// Number of draws recorded since [`Context::begin_frame`].
    pub fn recorded_draws(&self) -> usize {
        self.draws.len()
    }

    /// Replays the recorded draws into one render pass and presents the result.
    pub fn end_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let output = match &self.target {
            RenderTarget::Surface {
                is_configured: false,
                ..
            } => return Ok(()),
            RenderTarget::Surface { surface, .. } => Some(surface.get_current_texture()?),
            RenderTarget::Offscreen { .. } => None,
        };
        let view = match (&output, &self.target) {
            (Some(output), _) => output.texture.create_view(&wgpu::TextureViewDescriptor::default()),
            (None, RenderTarget::Offscreen { texture }) => {
                texture.create_view(&wgpu::TextureViewDescriptor::default())
            }
            (None, RenderTarget::Surface { .. }) => return Ok(()),
        };

        self.upload_uniforms();

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            for (slot, draw) in self.draws.iter().enumerate() {
                let Some(Some(mesh)) = self.meshes.get(draw.mesh.0) else {
                    log::warn!("Skipping a draw of released mesh {:?}", draw.mesh);
                    continue;
                };
                if draw.vertices.end > mesh.num_vertices {
                    log::warn!(
                        "Skipping a draw of {:?} beyond the {} vertices of {:?}",
                        draw.vertices,
                        mesh.num_vertices,
                        draw.mesh
                    );
                    continue;
                }
                let offset = slot as u64 * self.uniform_stride;
                render_pass.set_bind_group(0, &self.texture_for(draw.texture).bind_group, &[]);
                render_pass.set_bind_group(1, &self.object_bind_group, &[offset as wgpu::DynamicOffset]);
                render_pass.set_vertex_buffer(0, mesh.buffer.slice(..));
                render_pass.draw(draw.vertices.clone(), 0..1);
            }
        }
        self.queue.submit(iter::once(encoder.finish()));

        if let Some(output) = output {
            if let RenderTarget::Surface { window, .. } = &self.target {
                window.pre_present_notify();
            }
            output.present();
        }
        Ok(())
    }

    fn texture_for(&self, handle: TextureHandle) -> &GpuTexture {
        if handle == TextureHandle::UNBOUND {
            return &self.fallback;
        }
        match self.textures.get(handle.0 as usize - 1) {
            Some(Some(texture)) => texture,
            _ => &self.fallback,
        }
    }

    fn upload_uniforms(&mut self) {
        let needed = self.draws.len() as u64;
        if needed > self.object_capacity {
            let capacity = needed.next_power_of_two();
            log::debug!("Growing the per-draw uniform buffer to {capacity} draws");
            let (buffer, bind_group) =
                mk_object_buffer(&self.device, &self.object_layout, self.uniform_stride, capacity);
            self.object_buffer.destroy();
            self.object_buffer = buffer;
            self.object_bind_group = bind_group;
            self.object_capacity = capacity;
        }
        if self.draws.is_empty() {
            return;
        }

        let stride = self.uniform_stride as usize;
        let mut bytes = vec![0u8; stride * self.draws.len()];
        for (slot, draw) in self.draws.iter().enumerate() {
            let start = slot * stride;
            bytes[start..start + ObjectUniform::SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(&draw.uniform));
        }
        self.queue.write_buffer(&self.object_buffer, 0, &bytes);
    }

    /// Copies the offscreen target into an image. Fails for window surfaces.
    pub async fn read_pixels(&self) -> anyhow::Result<image::RgbaImage> {
        let RenderTarget::Offscreen { texture } = &self.target else {
            anyhow::bail!("Only offscreen targets can be read back");
        };
        let [width, height] = self.size;
        let u32_size = std::mem::size_of::<u32>() as u32;
        let unpadded_row = u32_size * width;
        let padded_row = unpadded_row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;

        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            size: u64::from(padded_row) * u64::from(height),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            label: Some("Readback Buffer"),
            mapped_at_creation: false,
        });

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Readback Encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(iter::once(encoder.finish()));

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            // The receiver is awaited below, a failed send only means it was dropped.
            let _ = tx.send(result);
        });
        self.device.poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: Some(Duration::from_secs(3)),
        })?;
        rx.receive()
            .await
            .context("The readback buffer was never mapped")??;

        let data = buffer_slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((unpadded_row * height) as usize);
        for row in data.chunks(padded_row as usize) {
            pixels.extend_from_slice(&row[..unpadded_row as usize]);
        }
        drop(data);
        output_buffer.unmap();

        image::RgbaImage::from_raw(width, height, pixels).context("Readback size mismatch")
    }
}

/// Prefers a format without sRGB encoding so texel values reach the screen unconverted.
pub fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
}

async fn request_device(adapter: &wgpu::Adapter) -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
            ..Default::default()
        })
        .await?;
    Ok((device, queue))
}

fn mk_object_buffer(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    stride: u64,
    capacity: u64,
) -> (wgpu::Buffer, wgpu::BindGroup) {
    let buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Object Uniform Buffer"),
        size: stride * capacity,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: &buffer,
                offset: 0,
                size: wgpu::BufferSize::new(ObjectUniform::SIZE),
            }),
        }],
        label: Some("object_bind_group"),
    });
    (buffer, bind_group)
}

fn mk_texture_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    label: &str,
) -> wgpu::BindGroup {
    let sampler = texture
        .sampler
        .clone()
        .unwrap_or_else(|| crate::data_structures::texture::create_default_sampler(device));
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
        ],
        label: Some(label),
    })
}

impl GraphicsDevice for Context {
    fn create_mesh(&mut self, label: &str, vertices: &[ModelVertex]) -> MeshHandle {
        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        self.meshes.push(Some(GpuMesh {
            buffer,
            num_vertices: vertices.len() as u32,
        }));
        MeshHandle(self.meshes.len() - 1)
    }

    fn destroy_mesh(&mut self, mesh: MeshHandle) {
        if let Some(gpu_mesh) = self.meshes.get_mut(mesh.0).and_then(Option::take) {
            gpu_mesh.buffer.destroy();
        }
    }

    fn create_texture(&mut self, label: &str, image: &image::DynamicImage) -> anyhow::Result<TextureHandle> {
        ensure!(
            image.width() > 0 && image.height() > 0,
            "{label}: cannot upload an empty image"
        );
        let texture = Texture::from_image(&self.device, &self.queue, image, Some(label));
        let bind_group = mk_texture_bind_group(&self.device, &self.texture_layout, &texture, label);
        self.textures.push(Some(GpuTexture { texture, bind_group }));
        // Handle 0 is reserved for UNBOUND.
        Ok(TextureHandle(u32::try_from(self.textures.len())?))
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        if texture == TextureHandle::UNBOUND {
            return;
        }
        let slot = self.textures.get_mut(texture.0 as usize - 1).and_then(Option::take);
        if let Some(gpu_texture) = slot {
            gpu_texture.texture.texture.destroy();
        }
    }

    fn bind_mesh(&mut self, mesh: MeshHandle) {
        self.bound_mesh = Some(mesh);
    }

    fn set_uniform(&mut self, uniform: Uniform, value: UniformValue) {
        self.pending.set(uniform, value);
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.bound_texture = texture;
    }

    fn draw(&mut self, vertices: Range<u32>) {
        let Some(mesh) = self.bound_mesh else {
            log::warn!("Draw of {vertices:?} without a bound mesh");
            return;
        };
        self.draws.push(DrawCall {
            mesh,
            texture: self.bound_texture,
            vertices,
            uniform: self.pending,
        });
    }

    fn unbind(&mut self) {
        self.bound_mesh = None;
        self.bound_texture = TextureHandle::UNBOUND;
    }
}
