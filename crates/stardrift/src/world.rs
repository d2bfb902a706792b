use anyhow::Context;
use rand::Rng;
use stardrift_draw::{
    texture::TextureOptions, vec2, vec3, BufferGeometry, Color, FlakesTexture, HdrEnvironment,
    LineBasicMaterial, LineMode, Node, NodeId, NodeKind, PerspectiveCamera, PhysicalMaterial,
    PointLight, PointsMaterial, Scene, Texture, TextureLoader, Transform,
};

use crate::config::SceneConfig;

pub const SPHERE_COLOR: Color = Color::from_rgb(0x0bcee9);

/// Everything on screen plus the pending environment load.
pub struct World {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    group: NodeId,
    sphere: Option<NodeId>,
    environment: Option<flume::Receiver<Texture>>,
}

impl World {
    /// Builds the static part of the scene and starts loading the environment.
    pub fn new(config: &SceneConfig, rng: &mut impl Rng) -> anyhow::Result<Self> {
        let mut world = Self::assemble(config, rng)?;
        world.environment = Some(HdrEnvironment::load_async(
            config.environment_path(),
            SceneConfig::ENVIRONMENT_MAX_WIDTH,
        ));
        Ok(world)
    }

    fn assemble(config: &SceneConfig, rng: &mut impl Rng) -> anyhow::Result<Self> {
        let mut scene = Scene::new();

        let axes = scene.add_geometry(BufferGeometry::axes(1.0));
        scene.add(Node::new(NodeKind::Axes { geometry: axes }).named("axes"));

        scene.add(
            Node::new(NodeKind::PointLight(PointLight {
                color: Color::WHITE,
                intensity: 1.0,
            }))
            .named("light")
            .with_transform(Transform::from_position(vec3(200.0, 200.0, 200.0))),
        );

        let cloud = scene.add_geometry(BufferGeometry::random_cloud(
            config.count,
            config.distance,
            rng,
        ));

        let loader = TextureLoader::new(&config.assets);
        let alpha_map = scene.add_texture(loader.load_or_else(
            SceneConfig::ALPHA_MAP,
            false,
            TextureOptions::default(),
            || TextureLoader::disc_alpha_map(64),
        ));

        let group = scene.add(Node::group().named("cloud"));

        scene
            .add_child(
                group,
                Node::new(NodeKind::Points {
                    geometry: cloud,
                    material: PointsMaterial {
                        size: config.point_size,
                        size_attenuation: true,
                        vertex_colors: true,
                        alpha_map: Some(alpha_map),
                        alpha_test: 0.5,
                        transparent: true,
                        ..Default::default()
                    },
                })
                .named("points"),
            )
            .context("cloud group vanished")?;

        scene
            .add_child(
                group,
                Node::new(NodeKind::Line {
                    geometry: cloud,
                    material: LineBasicMaterial {
                        color: Color::BLACK,
                        opacity: 0.05,
                        depth_write: false,
                    },
                    mode: LineMode::Strip,
                })
                .named("wireframe"),
            )
            .context("cloud group vanished")?;

        log::info!(
            "Scene assembled: {} points within ±{}",
            config.count,
            config.distance
        );

        Ok(Self {
            scene,
            camera: PerspectiveCamera::default(),
            group,
            sphere: None,
            environment: None,
        })
    }

    /// Adds the sphere once the environment map arrives. Returns true on the
    /// frame it appears.
    pub fn poll_environment(&mut self, rng: &mut impl Rng) -> bool {
        let Some(receiver) = &self.environment else {
            return false;
        };

        match receiver.try_recv() {
            Ok(env_map) => {
                self.environment = None;
                self.add_sphere(env_map, rng);
                true
            }
            Err(flume::TryRecvError::Empty) => false,
            Err(flume::TryRecvError::Disconnected) => {
                log::error!("Environment loader stopped without a result");
                self.environment = None;
                false
            }
        }
    }

    /// `env_map` is the packed environment delivered by the loader.
    pub fn add_sphere(&mut self, env_map: Texture, rng: &mut impl Rng) -> NodeId {
        let env_map = self.scene.add_texture(env_map);
        let normal_map = self.scene.add_texture(FlakesTexture::texture(rng, 10.0, 6.0));
        let geometry = self.scene.add_geometry(BufferGeometry::sphere(1.0, 32, 16));

        let sphere = self.scene.add(
            Node::new(NodeKind::Mesh {
                geometry,
                material: PhysicalMaterial {
                    color: SPHERE_COLOR,
                    metalness: 0.9,
                    roughness: 0.5,
                    clearcoat: 1.0,
                    clearcoat_roughness: 0.1,
                    normal_map: Some(normal_map),
                    normal_scale: vec2(0.15, 0.15),
                    env_map: Some(env_map),
                },
            })
            .named("sphere"),
        );

        log::info!("Environment ready, sphere added");
        self.sphere = Some(sphere);
        sphere
    }

    pub fn sphere_color(&self) -> Option<Color> {
        let node = self.scene.node(self.sphere?)?;
        match &node.kind {
            NodeKind::Mesh { material, .. } => Some(material.color),
            _ => None,
        }
    }

    pub fn set_sphere_color(&mut self, color: Color) {
        let Some(node) = self.sphere.and_then(|id| self.scene.node_mut(id)) else {
            return;
        };

        if let NodeKind::Mesh { material, .. } = &mut node.kind {
            material.color = color;
        }
    }

    pub fn set_group_rotation(&mut self, rotation_y: f32) {
        if let Some(group) = self.scene.node_mut(self.group) {
            group.transform.rotation.y = rotation_y;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use stardrift_draw::{texture::TextureData, Size};

    fn world() -> World {
        let config = SceneConfig {
            assets: "does/not/exist".into(),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1);
        World::assemble(&config, &mut rng).unwrap()
    }

    #[test]
    fn cloud_group_holds_points_and_wireframe() {
        let world = world();
        let group = world.scene.node(world.group).unwrap();
        assert_eq!(group.children().len(), 2);

        let points = world.scene.find_by_name("points").unwrap();
        let wireframe = world.scene.find_by_name("wireframe").unwrap();
        let points_geometry = world.scene.node(points).unwrap().kind.geometry();
        let wireframe_geometry = world.scene.node(wireframe).unwrap().kind.geometry();
        assert_eq!(points_geometry, wireframe_geometry);

        let geometry = world.scene.geometry(points_geometry.unwrap()).unwrap();
        assert_eq!(geometry.vertex_count(), 100);
    }

    #[test]
    fn light_sits_far_up_and_right() {
        let world = world();
        let lights = world.scene.point_lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].position, vec3(200.0, 200.0, 200.0));
    }

    #[test]
    fn missing_alpha_map_falls_back_to_disc() {
        let world = world();
        let points = world.scene.find_by_name("points").unwrap();
        let NodeKind::Points { material, .. } = &world.scene.node(points).unwrap().kind else {
            panic!("points node has the wrong kind");
        };

        let texture = world.scene.texture(material.alpha_map.unwrap()).unwrap();
        assert!(matches!(texture.data, TextureData::Rgba8 { .. }));
        assert_eq!(texture.size(), Size::new(64, 64));
    }

    #[test]
    fn sphere_appears_when_environment_arrives() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(world.sphere_color(), None);

        let (tx, rx) = flume::bounded(1);
        world.environment = Some(rx);
        assert!(!world.poll_environment(&mut rng));

        tx.send(HdrEnvironment::procedural().into_texture()).unwrap();
        assert!(world.poll_environment(&mut rng));
        assert_eq!(world.sphere_color(), Some(SPHERE_COLOR));
        assert!(!world.poll_environment(&mut rng));

        world.set_sphere_color(Color::RED);
        assert_eq!(world.sphere_color(), Some(Color::RED));
    }

    #[test]
    fn group_rotation_moves_children() {
        let mut world = world();
        world.set_group_rotation(std::f32::consts::FRAC_PI_2);

        let points = world.scene.find_by_name("points").unwrap();
        let matrix = world.scene.world_matrix(points).unwrap();
        let x = matrix.transform_point3(vec3(1.0, 0.0, 0.0));
        assert!(x.x.abs() < 1e-5);
        assert!((x.z + 1.0).abs() < 1e-5);
    }
}
