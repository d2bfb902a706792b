pub mod error;
pub mod surface;

use wgpu::util::DeviceExt;

pub use wgpu::CommandEncoder;

/// Pixel data for every mip level of a 2D texture, largest level first.
#[derive(Debug, Clone, Copy)]
pub struct MipLevels<'a> {
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: u32,
    pub levels: &'a [Vec<u8>],
}

#[derive(Debug)]
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,

    pub instance: wgpu::Instance,
    pub adapter: wgpu::Adapter,
}

impl GpuContext {
    pub async fn new() -> Result<Self, error::GpuContextCreateError> {
        let instance = wgpu::Instance::default();

        let adapter = instance
            .request_adapter(
                &(wgpu::RequestAdapterOptions {
                    power_preference: wgpu::PowerPreference::default(),
                    force_fallback_adapter: false,
                    compatible_surface: None,
                }),
            )
            .await
            .ok_or(error::GpuContextCreateError::AdapterMissing)?;

        let info = adapter.get_info();
        log::info!("Using adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &(wgpu::DeviceDescriptor {
                    label: Some("GPUContext device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                        .using_resolution(adapter.limits()),
                    memory_hints: wgpu::MemoryHints::MemoryUsage,
                }),
                None,
            )
            .await
            .map_err(error::GpuContextCreateError::RequestDeviceError)?;

        Ok(Self {
            device,
            queue,
            instance,
            adapter,
        })
    }

    pub fn create_command_encoder(&self, label: Option<&str>) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&(wgpu::CommandEncoderDescriptor { label }))
    }

    pub fn create_shader_labeled(&self, source: &str, label: &str) -> wgpu::ShaderModule {
        self.device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            })
    }

    /// Highest sample count up to `requested` the adapter supports for `format`.
    pub fn supported_sample_count(&self, format: wgpu::TextureFormat, requested: u32) -> u32 {
        let flags = self.adapter.get_texture_format_features(format).flags;
        if requested > 1 && flags.sample_count_supported(requested) {
            requested
        } else {
            1
        }
    }

    pub fn min_uniform_alignment(&self) -> u64 {
        self.device.limits().min_uniform_buffer_offset_alignment as u64
    }

    pub fn create_vertex_buffer_init(&self, label: &str, contents: &[u8]) -> wgpu::Buffer {
        self.device.create_buffer_init(
            &(wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            }),
        )
    }

    pub fn create_index_buffer_init(&self, label: &str, contents: &[u8]) -> wgpu::Buffer {
        self.device.create_buffer_init(
            &(wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            }),
        )
    }

    pub fn create_vertex_buffer(&self, size: u64) -> wgpu::Buffer {
        self.device.create_buffer(
            &(wgpu::BufferDescriptor {
                label: Some("stardrift_vertex_buffer"),
                mapped_at_creation: false,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                size,
            }),
        )
    }

    pub fn create_index_buffer(&self, size: u64) -> wgpu::Buffer {
        self.device.create_buffer(
            &(wgpu::BufferDescriptor {
                label: Some("stardrift_index_buffer"),
                mapped_at_creation: false,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                size,
            }),
        )
    }

    pub fn create_uniform_buffer(&self, label: &str, size: u64) -> wgpu::Buffer {
        self.device.create_buffer(
            &(wgpu::BufferDescriptor {
                label: Some(label),
                mapped_at_creation: false,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                size,
            }),
        )
    }

    pub fn create_attachment(
        &self,
        label: &str,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> wgpu::TextureView {
        let texture = self.device.create_texture(
            &(wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            }),
        );

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    pub fn create_texture_init(
        &self,
        label: &str,
        format: wgpu::TextureFormat,
        mips: MipLevels<'_>,
    ) -> wgpu::Texture {
        let texture_size = wgpu::Extent3d {
            width: mips.width,
            height: mips.height,
            depth_or_array_layers: 1,
        };

        let texture = self.device.create_texture(
            &(wgpu::TextureDescriptor {
                label: Some(label),
                size: texture_size,
                mip_level_count: mips.levels.len().max(1) as u32,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            }),
        );

        for (level, data) in mips.levels.iter().enumerate() {
            let width = (mips.width >> level).max(1);
            let height = (mips.height >> level).max(1);

            self.queue.write_texture(
                wgpu::ImageCopyTexture {
                    texture: &texture,
                    aspect: wgpu::TextureAspect::All,
                    mip_level: level as u32,
                    origin: wgpu::Origin3d::ZERO,
                },
                data,
                wgpu::ImageDataLayout {
                    offset: 0,
                    bytes_per_row: Some(mips.bytes_per_pixel * width),
                    rows_per_image: None,
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        texture
    }
}
