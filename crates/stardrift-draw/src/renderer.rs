pub mod pipelines;
pub mod uniforms;

use std::{borrow::Cow, sync::Arc};

use ahash::AHashMap;

use crate::{
    camera::PerspectiveCamera,
    geometry::{AttributeKind, BufferGeometry, GeometryId},
    gpu::{CommandEncoder, MipLevels},
    math::{Mat4, Size, Vec2},
    scene::{LineMode, NodeKind, Scene},
    texture::{Texture, TextureId},
    Color, GpuContext, Rgba,
};

use pipelines::{BindGroupLayouts, LinePipelineKey, ScenePipes, DEPTH_FORMAT};
use uniforms::{DrawUniforms, DynamicUniforms, FrameUniforms, LightUniform, UniformBuffer, MAX_LIGHTS};

#[derive(Debug, Clone)]
pub struct SceneRendererSpecs {
    pub width: u32,
    pub height: u32,
    pub format: wgpu::TextureFormat,
    /// Requested MSAA sample count, lowered to what the adapter supports.
    pub sample_count: u32,
    pub clear_color: Color,
}

/// Which part of the frame a draw lands in. Draws are issued in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DrawPass {
    Opaque,
    Lines,
    Transparent,
}

impl DrawPass {
    pub fn of(kind: &NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Mesh { .. } | NodeKind::Axes { .. } => Some(Self::Opaque),
            NodeKind::Line { .. } => Some(Self::Lines),
            NodeKind::Points { material, .. } => Some(if material.transparent {
                Self::Transparent
            } else {
                Self::Opaque
            }),
            NodeKind::Group | NodeKind::PointLight(_) => None,
        }
    }
}

/// Returns the attribute data or `default` repeated for every vertex.
pub(crate) fn attribute_or<'a>(
    geometry: &'a BufferGeometry,
    kind: AttributeKind,
    default: &[f32],
) -> Cow<'a, [f32]> {
    match geometry.attribute(kind) {
        Some(data) => Cow::Borrowed(data),
        None => Cow::Owned(default.repeat(geometry.vertex_count())),
    }
}

#[derive(Debug)]
struct GpuGeometry {
    generation: u64,
    vertex_count: u32,
    position: wgpu::Buffer,
    color: wgpu::Buffer,
    normal: wgpu::Buffer,
    uv: wgpu::Buffer,
    tangent: wgpu::Buffer,
    index: Option<(wgpu::Buffer, u32)>,
}

impl GpuGeometry {
    fn upload(gpu: &GpuContext, geometry: &BufferGeometry) -> Self {
        let buffer = |label: &str, kind: AttributeKind, default: &[f32]| {
            let data = attribute_or(geometry, kind, default);
            // wgpu rejects empty vertex buffers
            let data: &[f32] = if data.is_empty() { default } else { &data };
            gpu.create_vertex_buffer_init(label, bytemuck::cast_slice(data))
        };

        let index = geometry.index().filter(|index| !index.is_empty()).map(|index| {
            (
                gpu.create_index_buffer_init("geometry index", bytemuck::cast_slice(index)),
                index.len() as u32,
            )
        });

        Self {
            generation: geometry.generation(),
            vertex_count: geometry.vertex_count() as u32,
            position: buffer("geometry position", AttributeKind::Position, &[0.0; 3]),
            color: buffer("geometry color", AttributeKind::Color, &[1.0; 3]),
            normal: buffer("geometry normal", AttributeKind::Normal, &[0.0, 1.0, 0.0]),
            uv: buffer("geometry uv", AttributeKind::Uv, &[0.0; 2]),
            tangent: buffer("geometry tangent", AttributeKind::Tangent, &[1.0, 0.0, 0.0, 1.0]),
            index,
        }
    }
}

#[derive(Debug)]
struct GpuTexture {
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    max_lod: f32,
}

impl GpuTexture {
    fn upload(gpu: &GpuContext, label: &str, texture: &Texture) -> Self {
        let size = texture.size();
        let handle = gpu.create_texture_init(
            label,
            texture.data.format(),
            MipLevels {
                width: size.width,
                height: size.height,
                bytes_per_pixel: 4,
                levels: texture.data.levels(),
            },
        );

        let options = &texture.options;
        let sampler = gpu.device.create_sampler(
            &(wgpu::SamplerDescriptor {
                label: Some("stardrift texture sampler"),
                address_mode_u: options.address_mode_u,
                address_mode_v: options.address_mode_v,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: options.mag_filter,
                min_filter: options.min_filter,
                mipmap_filter: options.mipmap_filter,
                lod_min_clamp: 0.0,
                lod_max_clamp: 32.0,
                compare: None,
                anisotropy_clamp: 1,
                border_color: None,
            }),
        );

        Self {
            view: handle.create_view(&wgpu::TextureViewDescriptor::default()),
            sampler,
            max_lod: texture.mip_level_count().saturating_sub(1) as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MaterialBinding {
    Points {
        alpha_map: Option<TextureId>,
    },
    Mesh {
        normal_map: Option<TextureId>,
        env_map: Option<TextureId>,
    },
}

#[derive(Debug)]
struct DefaultTextures {
    white: GpuTexture,
    flat_normal: GpuTexture,
    environment: GpuTexture,
}

#[derive(Debug, Clone, Copy)]
enum DrawCommand {
    Points { instances: u32 },
    Line { key: LinePipelineKey },
    Mesh,
}

#[derive(Debug, Clone, Copy)]
struct DrawCall {
    pass: DrawPass,
    geometry: GeometryId,
    command: DrawCommand,
    binding: Option<MaterialBinding>,
    offset: u32,
}

#[derive(Debug)]
struct Attachments {
    depth: wgpu::TextureView,
    msaa: Option<wgpu::TextureView>,
}

impl Attachments {
    fn new(gpu: &GpuContext, format: wgpu::TextureFormat, size: Size<u32>, samples: u32) -> Self {
        let depth = gpu.create_attachment(
            "stardrift depth",
            DEPTH_FORMAT,
            size.width,
            size.height,
            samples,
        );
        let msaa = (samples > 1).then(|| {
            gpu.create_attachment("stardrift msaa", format, size.width, size.height, samples)
        });
        Self { depth, msaa }
    }
}

/// Draws a [`Scene`] through a [`PerspectiveCamera`] into a color view.
#[derive(Debug)]
pub struct SceneRenderer {
    gpu: Arc<GpuContext>,
    size: Size<u32>,
    format: wgpu::TextureFormat,
    sample_count: u32,
    clear_color: Color,

    frame_uniforms: UniformBuffer<FrameUniforms>,
    draw_uniforms: DynamicUniforms<DrawUniforms>,
    layouts: BindGroupLayouts,
    pipes: ScenePipes,
    attachments: Attachments,

    geometries: AHashMap<GeometryId, GpuGeometry>,
    textures: AHashMap<TextureId, GpuTexture>,
    bind_groups: AHashMap<MaterialBinding, wgpu::BindGroup>,
    defaults: DefaultTextures,

    draws: Vec<DrawCall>,
}

impl SceneRenderer {
    pub fn new(gpu: Arc<GpuContext>, specs: &SceneRendererSpecs) -> Self {
        let sample_count = gpu.supported_sample_count(specs.format, specs.sample_count);
        if sample_count != specs.sample_count {
            log::warn!(
                "MSAA x{} unsupported for {:?}, using x{}",
                specs.sample_count,
                specs.format,
                sample_count
            );
        }

        let size = Size::new(specs.width.max(1), specs.height.max(1));

        let frame_uniforms = UniformBuffer::new(&gpu, "frame uniforms", FrameUniforms::default());
        let draw_uniforms = DynamicUniforms::new(&gpu);
        let layouts = BindGroupLayouts::new(&gpu);

        let pipes = ScenePipes::new(
            &gpu,
            &frame_uniforms.bind_group_layout,
            draw_uniforms.layout(),
            &layouts,
            specs.format,
            sample_count,
        );

        let attachments = Attachments::new(&gpu, specs.format, size, sample_count);

        let defaults = DefaultTextures {
            white: GpuTexture::upload(&gpu, "white", &Texture::solid([255; 4], false)),
            flat_normal: GpuTexture::upload(
                &gpu,
                "flat normal",
                &Texture::solid([128, 128, 255, 255], false),
            ),
            environment: GpuTexture::upload(
                &gpu,
                "default environment",
                &Texture::solid([0, 0, 0, 255], false),
            ),
        };

        Self {
            gpu,
            size,
            format: specs.format,
            sample_count,
            clear_color: specs.clear_color,
            frame_uniforms,
            draw_uniforms,
            layouts,
            pipes,
            attachments,
            geometries: AHashMap::default(),
            textures: AHashMap::default(),
            bind_groups: AHashMap::default(),
            defaults,
            draws: Vec::new(),
        }
    }

    pub fn gpu(&self) -> &Arc<GpuContext> {
        &self.gpu
    }

    pub fn size(&self) -> Size<u32> {
        self.size
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let size = Size::new(width.max(1), height.max(1));
        if size == self.size {
            return;
        }

        self.size = size;
        self.attachments = Attachments::new(&self.gpu, self.format, size, self.sample_count);
        log::trace!("Scene renderer resized to {}x{}", size.width, size.height);
    }

    fn sync_geometry(&mut self, scene: &Scene, id: GeometryId) -> bool {
        let Some(geometry) = scene.geometry(id) else {
            return false;
        };

        let stale = self
            .geometries
            .get(&id)
            .map_or(true, |cached| cached.generation != geometry.generation());

        if stale {
            log::trace!("Uploading geometry {id:?} ({} vertices)", geometry.vertex_count());
            self.geometries
                .insert(id, GpuGeometry::upload(&self.gpu, geometry));
        }

        true
    }

    fn sync_texture(&mut self, scene: &Scene, id: Option<TextureId>) {
        let Some(id) = id else {
            return;
        };

        if self.textures.contains_key(&id) {
            return;
        }

        match scene.texture(id) {
            Some(texture) => {
                let size = texture.size();
                log::trace!("Uploading texture {id:?} ({}x{})", size.width, size.height);
                let uploaded = GpuTexture::upload(&self.gpu, "scene texture", texture);
                self.textures.insert(id, uploaded);
            }
            None => log::warn!("Texture {id:?} is not registered in the scene"),
        }
    }

    fn texture_or<'a>(&'a self, id: Option<TextureId>, fallback: &'a GpuTexture) -> &'a GpuTexture {
        id.and_then(|id| self.textures.get(&id)).unwrap_or(fallback)
    }

    fn sync_binding(&mut self, binding: MaterialBinding) {
        if self.bind_groups.contains_key(&binding) {
            return;
        }

        let bind_group = match binding {
            MaterialBinding::Points { alpha_map } => {
                let alpha = self.texture_or(alpha_map, &self.defaults.white);
                self.gpu.device.create_bind_group(
                    &(wgpu::BindGroupDescriptor {
                        label: Some("points texture bind group"),
                        layout: &self.layouts.points_textures,
                        entries: &[
                            wgpu::BindGroupEntry {
                                binding: 0,
                                resource: wgpu::BindingResource::TextureView(&alpha.view),
                            },
                            wgpu::BindGroupEntry {
                                binding: 1,
                                resource: wgpu::BindingResource::Sampler(&alpha.sampler),
                            },
                        ],
                    }),
                )
            }
            MaterialBinding::Mesh {
                normal_map,
                env_map,
            } => {
                let normal = self.texture_or(normal_map, &self.defaults.flat_normal);
                let env = self.texture_or(env_map, &self.defaults.environment);
                self.gpu.device.create_bind_group(
                    &(wgpu::BindGroupDescriptor {
                        label: Some("mesh texture bind group"),
                        layout: &self.layouts.mesh_textures,
                        entries: &[
                            wgpu::BindGroupEntry {
                                binding: 0,
                                resource: wgpu::BindingResource::TextureView(&normal.view),
                            },
                            wgpu::BindGroupEntry {
                                binding: 1,
                                resource: wgpu::BindingResource::Sampler(&normal.sampler),
                            },
                            wgpu::BindGroupEntry {
                                binding: 2,
                                resource: wgpu::BindingResource::TextureView(&env.view),
                            },
                            wgpu::BindGroupEntry {
                                binding: 3,
                                resource: wgpu::BindingResource::Sampler(&env.sampler),
                            },
                        ],
                    }),
                )
            }
        };

        self.bind_groups.insert(binding, bind_group);
    }

    fn frame_data(&self, scene: &Scene, camera: &PerspectiveCamera, elapsed: f32) -> FrameUniforms {
        let mut lights = [LightUniform::default(); MAX_LIGHTS];
        let scene_lights = scene.point_lights();
        if scene_lights.len() > MAX_LIGHTS {
            log::debug!(
                "{} point lights in scene, only the first {MAX_LIGHTS} are used",
                scene_lights.len()
            );
        }

        let light_count = scene_lights.len().min(MAX_LIGHTS);
        for (slot, world_light) in lights.iter_mut().zip(&scene_lights) {
            *slot = LightUniform {
                position: world_light.position.extend(1.0).to_array(),
                color: Rgba::from_srgb(world_light.light.color)
                    .scale_rgb(world_light.light.intensity)
                    .into(),
            };
        }

        let encode_srgb = if self.format.is_srgb() { 0.0 } else { 1.0 };

        FrameUniforms {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            viewport: [
                self.size.width as f32,
                self.size.height as f32,
                0.0,
                encode_srgb,
            ],
            info: [light_count as f32, elapsed, 0.0, 0.0],
            lights,
        }
    }

    /// Uploads what the visible scene needs and records per-draw uniforms.
    fn prepare(&mut self, scene: &Scene, camera: &PerspectiveCamera, elapsed: f32) {
        self.draws.clear();
        self.draw_uniforms.clear();

        let frame = self.frame_data(scene, camera, elapsed);
        self.frame_uniforms.set_data(frame);
        self.frame_uniforms.sync(&self.gpu);

        for drawable in scene.drawables() {
            let (Some(geometry), Some(pass)) = (drawable.kind.geometry(), DrawPass::of(drawable.kind))
            else {
                continue;
            };

            if !self.sync_geometry(scene, geometry) {
                log::warn!("Node {:?} references a missing geometry", drawable.node);
                continue;
            }

            let model = drawable.world;
            let mut uniforms = DrawUniforms {
                model: model.to_cols_array_2d(),
                normal_matrix: normal_matrix(model).to_cols_array_2d(),
                ..Default::default()
            };

            let (command, binding) = match drawable.kind {
                NodeKind::Points { material, .. } => {
                    self.sync_texture(scene, material.alpha_map);
                    uniforms.color = Rgba::from_srgb(material.color).into();
                    uniforms.extra = [material.size, material.alpha_test, 1.0, 0.0];
                    uniforms.flags = [
                        material.vertex_colors as u32,
                        material.size_attenuation as u32,
                        0,
                        0,
                    ];

                    let instances = self
                        .geometries
                        .get(&geometry)
                        .map_or(0, |cached| cached.vertex_count);

                    (
                        DrawCommand::Points { instances },
                        Some(MaterialBinding::Points {
                            alpha_map: material.alpha_map,
                        }),
                    )
                }
                NodeKind::Line { material, mode, .. } => {
                    uniforms.color = Rgba::from_srgb(material.color).into();
                    uniforms.extra = [0.0, 0.0, material.opacity, 0.0];

                    let key = LinePipelineKey {
                        mode: *mode,
                        depth_write: material.depth_write,
                        blended: material.opacity < 1.0,
                    };
                    (DrawCommand::Line { key }, None)
                }
                NodeKind::Axes { .. } => {
                    uniforms.color = Rgba::WHITE.into();
                    uniforms.extra = [0.0, 0.0, 1.0, 0.0];
                    uniforms.flags = [1, 0, 0, 0];

                    let key = LinePipelineKey {
                        mode: LineMode::Segments,
                        depth_write: true,
                        blended: false,
                    };
                    (DrawCommand::Line { key }, None)
                }
                NodeKind::Mesh { material, .. } => {
                    self.sync_texture(scene, material.normal_map);
                    self.sync_texture(scene, material.env_map);

                    let repeat = material
                        .normal_map
                        .and_then(|id| scene.texture(id))
                        .map_or(Vec2::ONE, |texture| texture.options.repeat);

                    let env_max_lod = material
                        .env_map
                        .and_then(|id| self.textures.get(&id))
                        .map_or(0.0, |texture| texture.max_lod);

                    uniforms.color = Rgba::from_srgb(material.color).into();
                    uniforms.pbr = [
                        material.metalness,
                        material.roughness,
                        material.clearcoat,
                        material.clearcoat_roughness,
                    ];
                    uniforms.maps = [
                        material.normal_scale.x,
                        material.normal_scale.y,
                        repeat.x,
                        repeat.y,
                    ];
                    uniforms.extra = [0.0, 0.0, 1.0, env_max_lod];
                    uniforms.flags = [0, 0, material.normal_map.is_some() as u32, 0];

                    (
                        DrawCommand::Mesh,
                        Some(MaterialBinding::Mesh {
                            normal_map: material.normal_map,
                            env_map: material.env_map,
                        }),
                    )
                }
                NodeKind::Group | NodeKind::PointLight(_) => continue,
            };

            if let DrawCommand::Line { key } = command {
                self.pipes.ensure_line(&self.gpu, key);
            }

            if let Some(binding) = binding {
                self.sync_binding(binding);
            }

            let offset = self.draw_uniforms.push(&uniforms);
            self.draws.push(DrawCall {
                pass,
                geometry,
                command,
                binding,
                offset,
            });
        }

        // stable, so insertion order holds within a pass
        self.draws.sort_by_key(|draw| draw.pass);
        self.draw_uniforms.upload(&self.gpu);
    }

    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        encoder: &mut CommandEncoder,
        target: &wgpu::TextureView,
        elapsed: f32,
    ) {
        self.prepare(scene, camera, elapsed);

        let (view, resolve_target) = match &self.attachments.msaa {
            Some(msaa) => (msaa, Some(target)),
            None => (target, None),
        };

        let mut pass = encoder.begin_render_pass(
            &(wgpu::RenderPassDescriptor {
                label: Some("stardrift scene pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color.into()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.attachments.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            }),
        );

        if self.draws.is_empty() {
            return;
        }

        log::trace!("Rendering {} draws", self.draws.len());

        pass.set_bind_group(0, &self.frame_uniforms.bind_group, &[]);

        for draw in &self.draws {
            let Some(geometry) = self.geometries.get(&draw.geometry) else {
                continue;
            };

            if geometry.vertex_count == 0 {
                continue;
            }

            pass.set_bind_group(1, self.draw_uniforms.bind_group(), &[draw.offset]);

            if let Some(binding) = &draw.binding {
                match self.bind_groups.get(binding) {
                    Some(bind_group) => pass.set_bind_group(2, bind_group, &[]),
                    None => {
                        log::error!("Missing texture bind group for {binding:?}, skipping");
                        continue;
                    }
                }
            }

            match draw.command {
                DrawCommand::Points { instances } => {
                    pass.set_pipeline(&self.pipes.points);
                    pass.set_vertex_buffer(0, geometry.position.slice(..));
                    pass.set_vertex_buffer(1, geometry.color.slice(..));
                    pass.draw(0..6, 0..instances);
                }
                DrawCommand::Line { key } => {
                    let Some(pipeline) = self.pipes.line(&key) else {
                        log::error!("Line pipeline {key:?} was not created, skipping");
                        continue;
                    };
                    pass.set_pipeline(pipeline);
                    pass.set_vertex_buffer(0, geometry.position.slice(..));
                    pass.set_vertex_buffer(1, geometry.color.slice(..));
                    match &geometry.index {
                        Some((index, count)) => {
                            pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
                            pass.draw_indexed(0..*count, 0, 0..1);
                        }
                        None => pass.draw(0..geometry.vertex_count, 0..1),
                    }
                }
                DrawCommand::Mesh => {
                    pass.set_pipeline(&self.pipes.mesh);
                    pass.set_vertex_buffer(0, geometry.position.slice(..));
                    pass.set_vertex_buffer(1, geometry.normal.slice(..));
                    pass.set_vertex_buffer(2, geometry.uv.slice(..));
                    pass.set_vertex_buffer(3, geometry.tangent.slice(..));
                    match &geometry.index {
                        Some((index, count)) => {
                            pass.set_index_buffer(index.slice(..), wgpu::IndexFormat::Uint32);
                            pass.draw_indexed(0..*count, 0, 0..1);
                        }
                        None => pass.draw(0..geometry.vertex_count, 0..1),
                    }
                }
            }
        }
    }
}

/// Inverse transpose of `model`, keeps normals perpendicular under non-uniform scale.
pub fn normal_matrix(model: Mat4) -> Mat4 {
    model.inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        material::{LineBasicMaterial, PhysicalMaterial, PointsMaterial},
        math::Vec3,
        scene::Node,
    };

    #[test]
    fn passes_order_opaque_lines_transparent() {
        let geometry = GeometryId::default();

        let mesh = NodeKind::Mesh {
            geometry,
            material: PhysicalMaterial::default(),
        };
        let line = NodeKind::Line {
            geometry,
            material: LineBasicMaterial::default(),
            mode: LineMode::Strip,
        };
        let points = NodeKind::Points {
            geometry,
            material: PointsMaterial {
                transparent: true,
                ..Default::default()
            },
        };

        let mut passes: Vec<DrawPass> = [&points, &line, &mesh, &NodeKind::Axes { geometry }]
            .into_iter()
            .filter_map(DrawPass::of)
            .collect();
        passes.sort();

        assert_eq!(
            passes,
            vec![
                DrawPass::Opaque,
                DrawPass::Opaque,
                DrawPass::Lines,
                DrawPass::Transparent
            ]
        );
        assert_eq!(DrawPass::of(&NodeKind::Group), None);
    }

    #[test]
    fn opaque_points_draw_with_meshes() {
        let points = NodeKind::Points {
            geometry: GeometryId::default(),
            material: PointsMaterial::default(),
        };
        assert_eq!(DrawPass::of(&points), Some(DrawPass::Opaque));
    }

    #[test]
    fn missing_attributes_are_filled() {
        let mut scene = Scene::new();
        let id = scene.add_geometry(BufferGeometry::axes(1.0));
        scene.add(Node::new(NodeKind::Axes { geometry: id }));

        let Some(geometry) = scene.geometry(id) else {
            panic!("geometry not registered");
        };

        let normals = attribute_or(geometry, AttributeKind::Normal, &[0.0, 1.0, 0.0]);
        assert_eq!(normals.len(), geometry.vertex_count() * 3);
        assert_eq!(&normals[..3], &[0.0, 1.0, 0.0]);

        let colors = attribute_or(geometry, AttributeKind::Color, &[1.0; 3]);
        assert!(matches!(colors, Cow::Borrowed(_)));
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let n = normal_matrix(model).transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        assert!((n.x - 0.5).abs() < 1e-6);
        assert!((n.y - 1.0).abs() < 1e-6);
    }
}
