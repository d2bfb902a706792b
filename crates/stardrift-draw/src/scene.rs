use slotmap::SlotMap;

use crate::{
    geometry::{BufferGeometry, GeometryId},
    material::{LineBasicMaterial, PhysicalMaterial, PointsMaterial},
    math::{EulerRot, Mat4, Quat, Vec3},
    texture::{Texture, TextureId},
    Color,
};

slotmap::new_key_type! {
    pub struct NodeId;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineMode {
    /// Consecutive vertices joined into one polyline.
    Strip,
    /// Each vertex pair is a separate segment.
    Segments,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Points {
        geometry: GeometryId,
        material: PointsMaterial,
    },
    Line {
        geometry: GeometryId,
        material: LineBasicMaterial,
        mode: LineMode,
    },
    Mesh {
        geometry: GeometryId,
        material: PhysicalMaterial,
    },
    /// Colored line list drawn with its own vertex colors.
    Axes {
        geometry: GeometryId,
    },
    PointLight(PointLight),
}

impl NodeKind {
    pub fn geometry(&self) -> Option<GeometryId> {
        match self {
            Self::Points { geometry, .. }
            | Self::Line { geometry, .. }
            | Self::Mesh { geometry, .. }
            | Self::Axes { geometry } => Some(*geometry),
            Self::Group | Self::PointLight(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            transform: Transform::default(),
            visible: true,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A node flattened into world space, ready to draw.
#[derive(Debug, Clone, Copy)]
pub struct Drawable<'a> {
    pub node: NodeId,
    pub world: Mat4,
    pub kind: &'a NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldLight {
    pub position: Vec3,
    pub light: PointLight,
}

/// Scene graph owning nodes, geometries and textures.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
    geometries: SlotMap<GeometryId, BufferGeometry>,
    textures: SlotMap<TextureId, Texture>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node` at the top level.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        self.roots.push(id);
        id
    }

    /// Adds `node` under `parent`. Returns `None` if the parent does not exist.
    pub fn add_child(&mut self, parent: NodeId, mut node: Node) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            return None;
        }

        node.parent = Some(parent);
        let id = self.nodes.insert(node);
        self.nodes.get_mut(parent)?.children.push(id);
        Some(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name.as_deref() == Some(name))
            .map(|(id, _)| id)
    }

    pub fn add_geometry(&mut self, geometry: BufferGeometry) -> GeometryId {
        self.geometries.insert(geometry)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&BufferGeometry> {
        self.geometries.get(id)
    }

    pub fn geometry_mut(&mut self, id: GeometryId) -> Option<&mut BufferGeometry> {
        self.geometries.get_mut(id)
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.insert(texture)
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(id)
    }

    /// Product of the local matrices from the root down to `id`.
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(id)?;
        let mut world = node.transform.matrix();

        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            world = node.transform.matrix() * world;
        }

        Some(world)
    }

    /// Depth-first walk from the roots in insertion order, skipping hidden
    /// subtrees. `f` receives each visible node and its world matrix.
    pub fn traverse<'a>(&'a self, mut f: impl FnMut(NodeId, &'a Node, Mat4)) {
        let mut stack: Vec<(NodeId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|id| (*id, Mat4::IDENTITY))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };

            if !node.visible {
                continue;
            }

            let world = parent_world * node.transform.matrix();
            f(id, node, world);

            stack.extend(node.children.iter().rev().map(|child| (*child, world)));
        }
    }

    pub fn drawables(&self) -> Vec<Drawable<'_>> {
        let mut drawables = Vec::new();
        self.traverse(|id, node, world| {
            if node.kind.geometry().is_some() {
                drawables.push(Drawable {
                    node: id,
                    world,
                    kind: &node.kind,
                });
            }
        });
        drawables
    }

    pub fn point_lights(&self) -> Vec<WorldLight> {
        let mut lights = Vec::new();
        self.traverse(|_, node, world| {
            if let NodeKind::PointLight(light) = node.kind {
                lights.push(WorldLight {
                    position: world.transform_point3(Vec3::ZERO),
                    light,
                });
            }
        });
        lights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn children_inherit_parent_rotation() {
        let mut scene = Scene::new();
        let group = scene.add(Node::group());
        let child = scene
            .add_child(
                group,
                Node::group().with_transform(Transform::from_position(Vec3::X)),
            )
            .unwrap();

        scene.node_mut(group).unwrap().transform.rotation.y = FRAC_PI_2;

        let world = scene.world_matrix(child).unwrap();
        let origin = world.transform_point3(Vec3::ZERO);
        // +X rotated a quarter turn about Y lands on -Z
        assert!(approx(origin, -Vec3::Z), "{origin:?}");
    }

    #[test]
    fn add_child_requires_parent() {
        let mut scene = Scene::new();
        let ghost = {
            let mut other = Scene::new();
            other.add(Node::group());
            other.add(Node::group())
        };
        assert!(scene.add_child(ghost, Node::group()).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn drawables_follow_insertion_order_and_visibility() {
        let mut scene = Scene::new();
        let geometry = scene.add_geometry(BufferGeometry::axes(1.0));

        let axes = scene.add(Node::new(NodeKind::Axes { geometry }));
        let group = scene.add(Node::group());
        let points = scene
            .add_child(
                group,
                Node::new(NodeKind::Points {
                    geometry,
                    material: PointsMaterial::default(),
                }),
            )
            .unwrap();
        let line = scene
            .add_child(
                group,
                Node::new(NodeKind::Line {
                    geometry,
                    material: LineBasicMaterial::default(),
                    mode: LineMode::Strip,
                }),
            )
            .unwrap();

        let order: Vec<NodeId> = scene.drawables().iter().map(|d| d.node).collect();
        assert_eq!(order, vec![axes, points, line]);

        scene.node_mut(group).unwrap().visible = false;
        let order: Vec<NodeId> = scene.drawables().iter().map(|d| d.node).collect();
        assert_eq!(order, vec![axes]);
    }

    #[test]
    fn lights_are_reported_in_world_space() {
        let mut scene = Scene::new();
        let group = scene.add(
            Node::group().with_transform(Transform::from_position(Vec3::new(1.0, 0.0, 0.0))),
        );
        scene.add_child(
            group,
            Node::new(NodeKind::PointLight(PointLight {
                color: Color::WHITE,
                intensity: 1.0,
            }))
            .with_transform(Transform::from_position(Vec3::splat(200.0))),
        );

        let lights = scene.point_lights();
        assert_eq!(lights.len(), 1);
        assert!(approx(lights[0].position, Vec3::new(201.0, 200.0, 200.0)));
    }

    #[test]
    fn nodes_can_be_found_by_name() {
        let mut scene = Scene::new();
        let id = scene.add(Node::group().named("cloud"));
        assert_eq!(scene.find_by_name("cloud"), Some(id));
        assert_eq!(scene.find_by_name("sphere"), None);
    }
}
