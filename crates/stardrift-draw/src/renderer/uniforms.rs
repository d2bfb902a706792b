use std::{marker::PhantomData, num::NonZeroU64};

use crate::GpuContext;

pub const MAX_LIGHTS: usize = 4;

#[derive(Default, Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
pub struct LightUniform {
    pub position: [f32; 4],
    pub color: [f32; 4],
}

#[derive(Default, Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
pub struct FrameUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// width, height, unused, 1.0 when the shader must encode sRGB itself
    pub viewport: [f32; 4],
    /// light count, elapsed seconds
    pub info: [f32; 4],
    pub lights: [LightUniform; MAX_LIGHTS],
}

#[derive(Default, Debug, Clone, Copy, PartialEq, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// metalness, roughness, clearcoat, clearcoat roughness
    pub pbr: [f32; 4],
    /// normal scale xy, uv repeat xy
    pub maps: [f32; 4],
    /// point size, alpha test, opacity, environment max lod
    pub extra: [f32; 4],
    /// vertex colors, size attenuation, normal map, unused
    pub flags: [u32; 4],
}

/// Single uniform struct bound at binding 0, written only when changed.
#[derive(Debug)]
pub struct UniformBuffer<T: bytemuck::Pod> {
    pub data: T,
    pub gpu_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    dirty: bool,
}

impl<T: bytemuck::Pod> UniformBuffer<T> {
    pub fn new(gpu: &GpuContext, label: &str, data: T) -> Self {
        let gpu_buffer =
            gpu.create_uniform_buffer(label, std::mem::size_of::<T>() as wgpu::BufferAddress);

        let layout = gpu.device.create_bind_group_layout(
            &(wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
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
            }),
        );

        let bind_group = gpu.device.create_bind_group(
            &(wgpu::BindGroupDescriptor {
                label: Some(label),
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: gpu_buffer.as_entire_binding(),
                }],
            }),
        );

        Self {
            data,
            gpu_buffer,
            bind_group,
            bind_group_layout: layout,
            dirty: true,
        }
    }

    pub fn set_data(&mut self, data: T) {
        self.data = data;
        self.dirty = true;
    }

    pub fn sync(&mut self, gpu: &GpuContext) {
        if !self.dirty {
            return;
        }

        gpu.queue
            .write_buffer(&self.gpu_buffer, 0, bytemuck::bytes_of(&self.data));

        self.dirty = false;
    }
}

/// Per-draw uniforms packed at aligned offsets into one buffer, selected with
/// a dynamic offset. Grows by doubling.
#[derive(Debug)]
pub struct DynamicUniforms<T: bytemuck::Pod> {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    layout: wgpu::BindGroupLayout,
    stride: u64,
    capacity: usize,
    staging: Vec<u8>,
    _marker: PhantomData<T>,
}

pub(crate) fn aligned_stride(size: u64, alignment: u64) -> u64 {
    let alignment = alignment.max(1);
    size.div_ceil(alignment) * alignment
}

impl<T: bytemuck::Pod> DynamicUniforms<T> {
    const INITIAL_CAPACITY: usize = 64;

    pub fn new(gpu: &GpuContext) -> Self {
        let stride = aligned_stride(std::mem::size_of::<T>() as u64, gpu.min_uniform_alignment());

        let layout = gpu.device.create_bind_group_layout(
            &(wgpu::BindGroupLayoutDescriptor {
                label: Some("draw uniforms layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
                    },
                    count: None,
                }],
            }),
        );

        let capacity = Self::INITIAL_CAPACITY;
        let (buffer, bind_group) = Self::allocate(gpu, &layout, stride, capacity);

        Self {
            buffer,
            bind_group,
            layout,
            stride,
            capacity,
            staging: Vec::new(),
            _marker: PhantomData,
        }
    }

    fn allocate(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = gpu.create_uniform_buffer("draw uniforms", stride * capacity as u64);

        let bind_group = gpu.device.create_bind_group(
            &(wgpu::BindGroupDescriptor {
                label: Some("draw uniforms bind group"),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &buffer,
                        offset: 0,
                        size: NonZeroU64::new(std::mem::size_of::<T>() as u64),
                    }),
                }],
            }),
        );

        (buffer, bind_group)
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub fn clear(&mut self) {
        self.staging.clear();
    }

    pub fn len(&self) -> usize {
        self.staging.len() / self.stride as usize
    }

    pub fn is_empty(&self) -> bool {
        self.staging.is_empty()
    }

    /// Queues `data` and returns its dynamic offset.
    pub fn push(&mut self, data: &T) -> u32 {
        let offset = self.staging.len();
        self.staging.extend_from_slice(bytemuck::bytes_of(data));
        self.staging.resize(offset + self.stride as usize, 0);
        offset as u32
    }

    pub fn upload(&mut self, gpu: &GpuContext) {
        if self.staging.is_empty() {
            return;
        }

        let needed = self.len();
        if needed > self.capacity {
            self.capacity = (self.capacity * 2).max(needed);
            let (buffer, bind_group) = Self::allocate(gpu, &self.layout, self.stride, self.capacity);
            self.buffer = buffer;
            self.bind_group = bind_group;
            log::trace!("draw uniforms grown to {} entries", self.capacity);
        }

        gpu.queue.write_buffer(&self.buffer, 0, &self.staging);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_are_aligned() {
        assert_eq!(aligned_stride(208, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(300, 256), 512);
        assert_eq!(aligned_stride(10, 0), 10);
    }

    #[test]
    fn uniform_layouts_match_shader() {
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 208);
        assert_eq!(std::mem::size_of::<LightUniform>(), 32);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 176 + 32 * MAX_LIGHTS);
        assert_eq!(std::mem::size_of::<FrameUniforms>() % 16, 0);
    }
}
