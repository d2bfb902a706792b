use crate::{math::Vec2, Color, TextureId};

/// Screen-facing sprites, one per vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsMaterial {
    /// World-space size when `size_attenuation` is set, pixels otherwise.
    pub size: f32,
    pub size_attenuation: bool,
    pub vertex_colors: bool,
    pub color: Color,
    /// Green channel scales the sprite alpha.
    pub alpha_map: Option<TextureId>,
    /// Fragments with alpha below this are discarded.
    pub alpha_test: f32,
    pub transparent: bool,
}

impl Default for PointsMaterial {
    fn default() -> Self {
        Self {
            size: 1.0,
            size_attenuation: true,
            vertex_colors: false,
            color: Color::WHITE,
            alpha_map: None,
            alpha_test: 0.0,
            transparent: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineBasicMaterial {
    pub color: Color,
    pub opacity: f32,
    pub depth_write: bool,
}

impl Default for LineBasicMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            opacity: 1.0,
            depth_write: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalMaterial {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub normal_map: Option<TextureId>,
    pub normal_scale: Vec2,
    pub env_map: Option<TextureId>,
}

impl Default for PhysicalMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            metalness: 0.0,
            roughness: 1.0,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            normal_map: None,
            normal_scale: Vec2::ONE,
            env_map: None,
        }
    }
}
