use ahash::AHashMap;

use crate::{scene::LineMode, GpuContext};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const ALPHA_BLEND: wgpu::BlendState = wgpu::BlendState {
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
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinePipelineKey {
    pub mode: LineMode,
    pub depth_write: bool,
    pub blended: bool,
}

#[derive(Debug)]
pub struct BindGroupLayouts {
    pub points_textures: wgpu::BindGroupLayout,
    pub mesh_textures: wgpu::BindGroupLayout,
}

impl BindGroupLayouts {
    pub fn new(gpu: &GpuContext) -> Self {
        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let sampler_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        };

        let points_textures = gpu.device.create_bind_group_layout(
            &(wgpu::BindGroupLayoutDescriptor {
                label: Some("points texture bindgroup layout"),
                entries: &[texture_entry(0), sampler_entry(1)],
            }),
        );

        let mesh_textures = gpu.device.create_bind_group_layout(
            &(wgpu::BindGroupLayoutDescriptor {
                label: Some("mesh texture bindgroup layout"),
                entries: &[
                    texture_entry(0),
                    sampler_entry(1),
                    texture_entry(2),
                    sampler_entry(3),
                ],
            }),
        );

        Self {
            points_textures,
            mesh_textures,
        }
    }
}

#[derive(Debug)]
pub struct ScenePipes {
    pub points: wgpu::RenderPipeline,
    pub mesh: wgpu::RenderPipeline,
    lines: AHashMap<LinePipelineKey, wgpu::RenderPipeline>,

    line_shader: wgpu::ShaderModule,
    line_layout: wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    sample_count: u32,
}

struct PipelineSpecs<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    vs: &'a str,
    fs: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    topology: wgpu::PrimitiveTopology,
    cull_mode: Option<wgpu::Face>,
    blend: Option<wgpu::BlendState>,
    depth_write: bool,
}

fn shader_source(body: &str) -> String {
    format!("{}\n{}", include_str!("../resources/common.wgsl"), body)
}

impl ScenePipes {
    pub fn new(
        gpu: &GpuContext,
        frame_layout: &wgpu::BindGroupLayout,
        draw_layout: &wgpu::BindGroupLayout,
        textures: &BindGroupLayouts,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let points_shader = gpu.create_shader_labeled(
            &shader_source(include_str!("../resources/points.wgsl")),
            "Points Shader",
        );
        let mesh_shader = gpu.create_shader_labeled(
            &shader_source(include_str!("../resources/physical.wgsl")),
            "Physical Shader",
        );
        let line_shader = gpu.create_shader_labeled(
            &shader_source(include_str!("../resources/lines.wgsl")),
            "Lines Shader",
        );

        let pipeline_layout = |label, layouts: &[&wgpu::BindGroupLayout]| {
            gpu.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some(label),
                    bind_group_layouts: layouts,
                    push_constant_ranges: &[],
                })
        };

        let points_layout = pipeline_layout(
            "Points pipeline layout",
            &[frame_layout, draw_layout, &textures.points_textures],
        );
        let mesh_layout = pipeline_layout(
            "Mesh pipeline layout",
            &[frame_layout, draw_layout, &textures.mesh_textures],
        );
        let line_layout = pipeline_layout("Lines pipeline layout", &[frame_layout, draw_layout]);

        let instance_attrs = [
            wgpu::vertex_attr_array![0 => Float32x3],
            wgpu::vertex_attr_array![1 => Float32x3],
        ];
        let point_buffers = instance_attrs.each_ref().map(|attributes| wgpu::VertexBufferLayout {
            array_stride: wgpu::VertexFormat::Float32x3.size(),
            step_mode: wgpu::VertexStepMode::Instance,
            attributes,
        });

        let points = Self::create_pipeline(
            gpu,
            format,
            sample_count,
            &PipelineSpecs {
                label: "Scene pipeline Points",
                layout: &points_layout,
                shader: &points_shader,
                vs: "vs_points",
                fs: "fs_points",
                buffers: &point_buffers,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                blend: Some(ALPHA_BLEND),
                depth_write: true,
            },
        );

        let mesh_attrs = [
            (wgpu::vertex_attr_array![0 => Float32x3], wgpu::VertexFormat::Float32x3),
            (wgpu::vertex_attr_array![1 => Float32x3], wgpu::VertexFormat::Float32x3),
            (wgpu::vertex_attr_array![2 => Float32x2], wgpu::VertexFormat::Float32x2),
            (wgpu::vertex_attr_array![3 => Float32x4], wgpu::VertexFormat::Float32x4),
        ];
        let mesh_buffers = mesh_attrs
            .each_ref()
            .map(|(attributes, vertex_format)| wgpu::VertexBufferLayout {
                array_stride: vertex_format.size(),
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            });

        let mesh = Self::create_pipeline(
            gpu,
            format,
            sample_count,
            &PipelineSpecs {
                label: "Scene pipeline Mesh",
                layout: &mesh_layout,
                shader: &mesh_shader,
                vs: "vs_mesh",
                fs: "fs_mesh",
                buffers: &mesh_buffers,
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                blend: None,
                depth_write: true,
            },
        );

        Self {
            points,
            mesh,
            lines: AHashMap::default(),
            line_shader,
            line_layout,
            format,
            sample_count,
        }
    }

    /// Line pipelines are built on first use per variant.
    pub fn ensure_line(&mut self, gpu: &GpuContext, key: LinePipelineKey) {
        if self.lines.contains_key(&key) {
            return;
        }

        let line_attrs = [
            wgpu::vertex_attr_array![0 => Float32x3],
            wgpu::vertex_attr_array![1 => Float32x3],
        ];
        let buffers = line_attrs.each_ref().map(|attributes| wgpu::VertexBufferLayout {
            array_stride: wgpu::VertexFormat::Float32x3.size(),
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes,
        });

        let topology = match key.mode {
            LineMode::Strip => wgpu::PrimitiveTopology::LineStrip,
            LineMode::Segments => wgpu::PrimitiveTopology::LineList,
        };

        log::trace!("Creating line pipeline {key:?}");

        let pipeline = Self::create_pipeline(
            gpu,
            self.format,
            self.sample_count,
            &PipelineSpecs {
                label: "Scene pipeline Lines",
                layout: &self.line_layout,
                shader: &self.line_shader,
                vs: "vs_lines",
                fs: "fs_lines",
                buffers: &buffers,
                topology,
                cull_mode: None,
                blend: key.blended.then_some(ALPHA_BLEND),
                depth_write: key.depth_write,
            },
        );

        self.lines.insert(key, pipeline);
    }

    pub fn line(&self, key: &LinePipelineKey) -> Option<&wgpu::RenderPipeline> {
        self.lines.get(key)
    }

    fn create_pipeline(
        gpu: &GpuContext,
        format: wgpu::TextureFormat,
        sample_count: u32,
        specs: &PipelineSpecs<'_>,
    ) -> wgpu::RenderPipeline {
        gpu.device.create_render_pipeline(
            &(wgpu::RenderPipelineDescriptor {
                label: Some(specs.label),
                layout: Some(specs.layout),
                vertex: wgpu::VertexState {
                    module: specs.shader,
                    entry_point: Some(specs.vs),
                    buffers: specs.buffers,
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: specs.shader,
                    entry_point: Some(specs.fs),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: specs.blend,
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: specs.topology,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: specs.cull_mode,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: specs.depth_write,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: sample_count,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            }),
        )
    }
}
