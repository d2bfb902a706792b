use std::f32::consts::PI;

use ahash::AHashMap;
use rand::Rng;
use thiserror::Error;

use crate::math::{vec3, Vec3};

slotmap::new_key_type! {
    pub struct GeometryId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Position,
    Normal,
    Uv,
    Tangent,
    Color,
}

impl AttributeKind {
    pub const fn item_size(self) -> usize {
        match self {
            Self::Position | Self::Normal | Self::Color => 3,
            Self::Uv => 2,
            Self::Tangent => 4,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Normal => "normal",
            Self::Uv => "uv",
            Self::Tangent => "tangent",
            Self::Color => "color",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    #[error("attribute `{name}` has {len} floats, not a multiple of {item_size}")]
    Misaligned {
        name: &'static str,
        len: usize,
        item_size: usize,
    },
    #[error("attribute `{name}` holds {count} items but the geometry has {expected} vertices")]
    CountMismatch {
        name: &'static str,
        count: usize,
        expected: usize,
    },
}

/// Flat float attributes plus optional indices. Mutations bump `generation`
/// so renderers know to re-upload.
#[derive(Debug, Clone, Default)]
pub struct BufferGeometry {
    attributes: AHashMap<AttributeKind, Vec<f32>>,
    indices: Option<Vec<u32>>,
    generation: u64,
}

impl BufferGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_attribute(
        &mut self,
        kind: AttributeKind,
        data: Vec<f32>,
    ) -> Result<&mut Self, GeometryError> {
        let item_size = kind.item_size();
        if data.len() % item_size != 0 {
            return Err(GeometryError::Misaligned {
                name: kind.name(),
                len: data.len(),
                item_size,
            });
        }

        if kind != AttributeKind::Position {
            if let Some(positions) = self.attributes.get(&AttributeKind::Position) {
                let expected = positions.len() / AttributeKind::Position.item_size();
                let count = data.len() / item_size;
                if count != expected {
                    return Err(GeometryError::CountMismatch {
                        name: kind.name(),
                        count,
                        expected,
                    });
                }
            }
        }

        self.attributes.insert(kind, data);
        self.generation += 1;
        Ok(self)
    }

    pub fn attribute(&self, kind: AttributeKind) -> Option<&[f32]> {
        self.attributes.get(&kind).map(Vec::as_slice)
    }

    pub fn has_attribute(&self, kind: AttributeKind) -> bool {
        self.attributes.contains_key(&kind)
    }

    pub fn set_index(&mut self, indices: Vec<u32>) -> &mut Self {
        self.indices = Some(indices);
        self.generation += 1;
        self
    }

    pub fn index(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.attribute(AttributeKind::Position)
            .map(|p| p.len() / AttributeKind::Position.item_size())
            .unwrap_or(0)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// `count` points spread uniformly in a cube of half-extent `|distance|`,
    /// each with a light random vertex color.
    pub fn random_cloud(count: usize, distance: f32, rng: &mut impl Rng) -> Self {
        let distance = distance.abs();
        let len = count * 3;
        let mut positions = Vec::with_capacity(len);
        let mut colors = Vec::with_capacity(len);

        for _ in 0..len {
            let position = if distance > 0.0 {
                rng.gen_range(-distance..distance)
            } else {
                0.0
            };
            positions.push(position);
            colors.push(rng.gen::<f32>() * 0.5 + 0.5);
        }

        Self::from_parts([
            (AttributeKind::Position, positions),
            (AttributeKind::Color, colors),
        ])
    }

    /// UV sphere centered at the origin. Pole rows get a single triangle per segment.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);

        let row_len = (width_segments + 1) as usize;
        let vertex_count = row_len * (height_segments + 1) as usize;

        let mut positions = Vec::with_capacity(vertex_count * 3);
        let mut normals = Vec::with_capacity(vertex_count * 3);
        let mut uvs = Vec::with_capacity(vertex_count * 2);
        let mut tangents = Vec::with_capacity(vertex_count * 4);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;

            let u_offset = if iy == 0 {
                0.5 / width_segments as f32
            } else if iy == height_segments {
                -0.5 / width_segments as f32
            } else {
                0.0
            };

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let phi = u * PI * 2.0;
                let theta = v * PI;

                let position = vec3(
                    -radius * phi.cos() * theta.sin(),
                    radius * theta.cos(),
                    radius * phi.sin() * theta.sin(),
                );
                let normal = position.try_normalize().unwrap_or(Vec3::Y);

                positions.extend_from_slice(&position.to_array());
                normals.extend_from_slice(&normal.to_array());
                uvs.extend_from_slice(&[u + u_offset, 1.0 - v]);
                // d(position)/du, well defined at the poles too
                tangents.extend_from_slice(&[phi.sin(), 0.0, phi.cos(), 1.0]);
            }
        }

        let mut indices = Vec::with_capacity((width_segments * (height_segments - 1) * 6) as usize);
        let at = |ix: u32, iy: u32| iy * (width_segments + 1) + ix;

        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = at(ix + 1, iy);
                let b = at(ix, iy);
                let c = at(ix, iy + 1);
                let d = at(ix + 1, iy + 1);

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        let mut geometry = Self::from_parts([
            (AttributeKind::Position, positions),
            (AttributeKind::Normal, normals),
            (AttributeKind::Uv, uvs),
            (AttributeKind::Tangent, tangents),
        ]);
        geometry.set_index(indices);
        geometry
    }

    /// Line list of the three unit axes, X red, Y green, Z blue.
    pub fn axes(size: f32) -> Self {
        #[rustfmt::skip]
        let positions = vec![
            0.0, 0.0, 0.0,  size, 0.0, 0.0,
            0.0, 0.0, 0.0,  0.0, size, 0.0,
            0.0, 0.0, 0.0,  0.0, 0.0, size,
        ];

        #[rustfmt::skip]
        let colors = vec![
            1.0, 0.0, 0.0,  1.0, 0.6, 0.0,
            0.0, 1.0, 0.0,  0.6, 1.0, 0.0,
            0.0, 0.0, 1.0,  0.0, 0.6, 1.0,
        ];

        Self::from_parts([
            (AttributeKind::Position, positions),
            (AttributeKind::Color, colors),
        ])
    }

    fn from_parts(parts: impl IntoIterator<Item = (AttributeKind, Vec<f32>)>) -> Self {
        Self {
            attributes: parts.into_iter().collect(),
            indices: None,
            generation: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn cloud_stays_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let cloud = BufferGeometry::random_cloud(100, 4.0, &mut rng);

        assert_eq!(cloud.vertex_count(), 100);

        let positions = cloud.attribute(AttributeKind::Position).unwrap();
        assert!(positions.iter().all(|p| (-4.0..4.0).contains(p)));

        let colors = cloud.attribute(AttributeKind::Color).unwrap();
        assert_eq!(colors.len(), 300);
        assert!(colors.iter().all(|c| (0.5..1.0).contains(c)));
    }

    #[test]
    fn cloud_is_reproducible_with_a_seed() {
        let a = BufferGeometry::random_cloud(10, 4.0, &mut StdRng::seed_from_u64(42));
        let b = BufferGeometry::random_cloud(10, 4.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(
            a.attribute(AttributeKind::Position),
            b.attribute(AttributeKind::Position)
        );
    }

    #[test]
    fn zero_distance_collapses_to_origin() {
        let cloud = BufferGeometry::random_cloud(5, 0.0, &mut StdRng::seed_from_u64(1));
        let positions = cloud.attribute(AttributeKind::Position).unwrap();
        assert!(positions.iter().all(|p| *p == 0.0));
    }

    #[test]
    fn negative_distance_still_spreads() {
        let cloud = BufferGeometry::random_cloud(50, -4.0, &mut StdRng::seed_from_u64(3));
        let positions = cloud.attribute(AttributeKind::Position).unwrap();
        assert!(positions.iter().all(|p| (-4.0..4.0).contains(p)));
        assert!(positions.iter().any(|p| *p != 0.0));
    }

    #[test]
    fn sphere_counts() {
        let sphere = BufferGeometry::sphere(1.0, 32, 16);
        assert_eq!(sphere.vertex_count(), 33 * 17);
        assert_eq!(sphere.index().unwrap().len(), 2 * 32 * 15 * 3);
        assert_eq!(sphere.attribute(AttributeKind::Uv).unwrap().len(), 33 * 17 * 2);
        assert_eq!(
            sphere.attribute(AttributeKind::Tangent).unwrap().len(),
            33 * 17 * 4
        );

        let max_index = *sphere.index().unwrap().iter().max().unwrap();
        assert!((max_index as usize) < sphere.vertex_count());
    }

    #[test]
    fn sphere_vertices_lie_on_the_surface() {
        let sphere = BufferGeometry::sphere(2.0, 8, 4);
        let positions = sphere.attribute(AttributeKind::Position).unwrap();
        let normals = sphere.attribute(AttributeKind::Normal).unwrap();

        for (p, n) in positions.chunks(3).zip(normals.chunks(3)) {
            let p = Vec3::from_slice(p);
            let n = Vec3::from_slice(n);
            assert!((p.length() - 2.0).abs() < 1e-5);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn sphere_tangents_are_orthogonal_to_normals() {
        let sphere = BufferGeometry::sphere(1.0, 12, 6);
        let normals = sphere.attribute(AttributeKind::Normal).unwrap();
        let tangents = sphere.attribute(AttributeKind::Tangent).unwrap();

        for (n, t) in normals.chunks(3).zip(tangents.chunks(4)) {
            let n = Vec3::from_slice(n);
            let t = Vec3::from_slice(&t[..3]);
            assert!(n.dot(t).abs() < 1e-5);
        }
    }

    #[test]
    fn segment_counts_are_clamped() {
        let sphere = BufferGeometry::sphere(1.0, 1, 1);
        assert_eq!(sphere.vertex_count(), 4 * 3);
    }

    #[test]
    fn axes_are_three_segments() {
        let axes = BufferGeometry::axes(1.0);
        assert_eq!(axes.vertex_count(), 6);
        assert!(axes.index().is_none());
    }

    #[test]
    fn attributes_are_validated() {
        let mut geometry = BufferGeometry::new();
        assert!(matches!(
            geometry.set_attribute(AttributeKind::Position, vec![0.0; 4]),
            Err(GeometryError::Misaligned { .. })
        ));

        geometry
            .set_attribute(AttributeKind::Position, vec![0.0; 6])
            .unwrap();
        assert!(matches!(
            geometry.set_attribute(AttributeKind::Color, vec![0.0; 9]),
            Err(GeometryError::CountMismatch { .. })
        ));
    }

    #[test]
    fn mutations_bump_generation() {
        let mut geometry = BufferGeometry::axes(1.0);
        let before = geometry.generation();
        geometry.set_index(vec![0, 1]);
        assert!(geometry.generation() > before);
    }
}
