use std::sync::Arc;

use crate::{
    gpu::CommandEncoder,
    math::{Mat4, Rect, Size, Vec2},
    renderer::uniforms::UniformBuffer,
    Color, GpuContext,
};

static INITIAL_VERTEX_BUFFER_SIZE: u64 = (std::mem::size_of::<OverlayVertex>() * 256) as u64;
static INITIAL_INDEX_BUFFER_SIZE: u64 = (std::mem::size_of::<u32>() * 256 * 3 / 2) as u64;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Zeroable, bytemuck::Pod)]
pub struct OverlayVertex {
    /// Logical pixels, origin top left.
    pub pos: [f32; 2],
    /// sRGB encoded.
    pub color: [u8; 4],
}

impl OverlayVertex {
    pub fn new(pos: Vec2, color: Color) -> Self {
        Self {
            pos: pos.to_array(),
            color: color.into(),
        }
    }
}

/// Batches flat 2D shapes into one indexed triangle list.
#[derive(Debug, Default, Clone)]
pub struct OverlayList {
    vertices: Vec<OverlayVertex>,
    indices: Vec<u32>,
}

impl OverlayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertices(&self) -> &[OverlayVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Quad with one color per corner: top left, top right, bottom right, bottom left.
    pub fn quad(&mut self, rect: Rect, colors: [Color; 4]) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }

        let min = rect.min();
        let max = rect.max();
        let corners = [
            Vec2::new(min.x, min.y),
            Vec2::new(max.x, min.y),
            Vec2::new(max.x, max.y),
            Vec2::new(min.x, max.y),
        ];

        let base = self.vertices.len() as u32;
        self.vertices.extend(
            corners
                .into_iter()
                .zip(colors)
                .map(|(pos, color)| OverlayVertex::new(pos, color)),
        );
        self.indices
            .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn rect(&mut self, rect: Rect, color: Color) {
        self.quad(rect, [color; 4]);
    }

    pub fn horizontal_gradient(&mut self, rect: Rect, left: Color, right: Color) {
        self.quad(rect, [left, right, right, left]);
    }

    pub fn vertical_gradient(&mut self, rect: Rect, top: Color, bottom: Color) {
        self.quad(rect, [top, top, bottom, bottom]);
    }

    /// Border drawn inside `rect`.
    pub fn outline(&mut self, rect: Rect, thickness: f32, color: Color) {
        let t = thickness.min(rect.width() * 0.5).min(rect.height() * 0.5);
        if t <= 0.0 {
            return;
        }

        let (x, y, w, h) = (rect.x(), rect.y(), rect.width(), rect.height());
        self.rect(Rect::xywh(x, y, w, t), color);
        self.rect(Rect::xywh(x, y + h - t, w, t), color);
        self.rect(Rect::xywh(x, y + t, t, h - 2.0 * t), color);
        self.rect(Rect::xywh(x + w - t, y + t, t, h - 2.0 * t), color);
    }
}

#[derive(Default, Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
struct OverlayGlobals {
    proj: [[f32; 4]; 4],
    flags: [f32; 4],
}

#[derive(Debug)]
struct BatchBuffer {
    buffer: wgpu::Buffer,
    capacity: wgpu::BufferAddress,
}

impl BatchBuffer {
    fn reserve(&mut self, required: u64, create: impl FnOnce(u64) -> wgpu::Buffer) {
        if self.capacity < required {
            self.capacity = (self.capacity * 2).max(required);
            self.buffer = create(self.capacity);
        }
    }
}

fn overlay_projection(logical: Size<f32>) -> Mat4 {
    Mat4::orthographic_rh(0.0, logical.width.max(1.0), logical.height.max(1.0), 0.0, -1.0, 1.0)
}

/// Draws an [`OverlayList`] over whatever the target already holds.
#[derive(Debug)]
pub struct OverlayRenderer {
    gpu: Arc<GpuContext>,
    globals: UniformBuffer<OverlayGlobals>,
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: BatchBuffer,
    index_buffer: BatchBuffer,
}

impl OverlayRenderer {
    pub fn new(gpu: Arc<GpuContext>, format: wgpu::TextureFormat, logical: Size<f32>) -> Self {
        let globals = UniformBuffer::new(
            &gpu,
            "overlay globals",
            OverlayGlobals {
                proj: overlay_projection(logical).to_cols_array_2d(),
                flags: [if format.is_srgb() { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
            },
        );

        let shader =
            gpu.create_shader_labeled(include_str!("./resources/overlay.wgsl"), "Overlay Shader");

        let layout = gpu.device.create_pipeline_layout(
            &(wgpu::PipelineLayoutDescriptor {
                label: Some("Overlay pipeline layout"),
                bind_group_layouts: &[&globals.bind_group_layout],
                push_constant_ranges: &[],
            }),
        );

        let vbo_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Unorm8x4],
        };

        let blend = Some(wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                operation: wgpu::BlendOperation::Add,
            },
        });

        let pipeline = gpu.device.create_render_pipeline(
            &(wgpu::RenderPipelineDescriptor {
                label: Some("Overlay pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[vbo_layout],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs"),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::default(),
                    cull_mode: None,
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
            }),
        );

        let vertex_buffer = BatchBuffer {
            buffer: gpu.create_vertex_buffer(INITIAL_VERTEX_BUFFER_SIZE),
            capacity: INITIAL_VERTEX_BUFFER_SIZE,
        };

        let index_buffer = BatchBuffer {
            buffer: gpu.create_index_buffer(INITIAL_INDEX_BUFFER_SIZE),
            capacity: INITIAL_INDEX_BUFFER_SIZE,
        };

        Self {
            gpu,
            globals,
            pipeline,
            vertex_buffer,
            index_buffer,
        }
    }

    pub fn resize(&mut self, logical: Size<f32>) {
        let mut data = self.globals.data;
        data.proj = overlay_projection(logical).to_cols_array_2d();
        self.globals.set_data(data);
    }

    pub fn render(&mut self, list: &OverlayList, encoder: &mut CommandEncoder, target: &wgpu::TextureView) {
        if list.is_empty() {
            return;
        }

        let gpu = &self.gpu;
        self.globals.sync(gpu);

        let vertex_bytes: &[u8] = bytemuck::cast_slice(list.vertices());
        let index_bytes: &[u8] = bytemuck::cast_slice(list.indices());

        self.vertex_buffer
            .reserve(vertex_bytes.len() as u64, |size| gpu.create_vertex_buffer(size));
        self.index_buffer
            .reserve(index_bytes.len() as u64, |size| gpu.create_index_buffer(size));

        gpu.queue.write_buffer(&self.vertex_buffer.buffer, 0, vertex_bytes);
        gpu.queue.write_buffer(&self.index_buffer.buffer, 0, index_bytes);

        log::trace!("Overlay: {} indices", list.indices().len());

        let mut pass = encoder.begin_render_pass(
            &(wgpu::RenderPassDescriptor {
                label: Some("stardrift overlay pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            }),
        );

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.globals.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.buffer.slice(..vertex_bytes.len() as u64));
        pass.set_index_buffer(
            self.index_buffer.buffer.slice(..index_bytes.len() as u64),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..list.indices().len() as u32, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;

    #[test]
    fn quads_share_one_index_stream() {
        let mut list = OverlayList::new();
        list.rect(Rect::xywh(0.0, 0.0, 10.0, 10.0), Color::RED);
        list.rect(Rect::xywh(20.0, 0.0, 5.0, 5.0), Color::BLUE);

        assert_eq!(list.vertices().len(), 8);
        assert_eq!(list.indices(), &[0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert_eq!(list.vertices()[4].pos, [20.0, 0.0]);
        assert_eq!(list.vertices()[6].pos, [25.0, 5.0]);
    }

    #[test]
    fn gradients_color_the_right_corners() {
        let mut list = OverlayList::new();
        let rect = Rect::xywh(0.0, 0.0, 4.0, 4.0);
        list.horizontal_gradient(rect, Color::WHITE, Color::RED);
        list.vertical_gradient(rect, Color::TRANSPARENT, Color::BLACK);

        let colors: Vec<[u8; 4]> = list.vertices().iter().map(|v| v.color).collect();
        let white: [u8; 4] = Color::WHITE.into();
        let red: [u8; 4] = Color::RED.into();
        let clear: [u8; 4] = Color::TRANSPARENT.into();
        let black: [u8; 4] = Color::BLACK.into();

        assert_eq!(&colors[..4], &[white, red, red, white]);
        assert_eq!(&colors[4..], &[clear, clear, black, black]);
    }

    #[test]
    fn outline_emits_four_bars() {
        let mut list = OverlayList::new();
        list.outline(Rect::xywh(0.0, 0.0, 10.0, 10.0), 1.0, Color::WHITE);
        assert_eq!(list.vertices().len(), 16);
        assert_eq!(list.indices().len(), 24);

        list.clear();
        list.outline(Rect::xywh(0.0, 0.0, 10.0, 10.0), 0.0, Color::WHITE);
        assert!(list.is_empty());
    }

    #[test]
    fn degenerate_rects_are_skipped() {
        let mut list = OverlayList::new();
        list.rect(Rect::xywh(0.0, 0.0, 0.0, 10.0), Color::RED);
        assert!(list.is_empty());
    }

    #[test]
    fn projection_maps_top_left_and_bottom_right() {
        let proj = overlay_projection(Size::new(200.0, 100.0));
        let top_left = proj * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = proj * Vec4::new(200.0, 100.0, 0.0, 1.0);

        assert!((top_left.x + 1.0).abs() < 1e-6 && (top_left.y - 1.0).abs() < 1e-6);
        assert!((bottom_right.x - 1.0).abs() < 1e-6 && (bottom_right.y + 1.0).abs() < 1e-6);
    }
}
