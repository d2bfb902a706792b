use crate::math::{Mat4, Vec3};

#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            fov: 75.0,
            aspect: 1.0,
            near: 0.95,
            far: 1000.0,
            position: Vec3::new(0.5, 0.2, 3.5),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            ..Default::default()
        }
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Right handed, depth mapped to `[0, 1]`.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec4;

    #[test]
    fn target_projects_to_center() {
        let camera = PerspectiveCamera::default();
        let clip = camera.view_projection() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn near_and_far_planes_map_to_depth_range() {
        let camera = PerspectiveCamera {
            position: Vec3::new(0.0, 0.0, 10.0),
            ..Default::default()
        };

        let depth = |distance: f32| {
            let clip = camera.view_projection() * Vec4::new(0.0, 0.0, 10.0 - distance, 1.0);
            clip.z / clip.w
        };

        assert!(depth(camera.near).abs() < 1e-4);
        assert!((depth(camera.far) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn aspect_follows_window() {
        let mut camera = PerspectiveCamera::default();
        camera.set_aspect(1600, 800);
        assert_eq!(camera.aspect, 2.0);

        camera.set_aspect(100, 0);
        assert_eq!(camera.aspect, 100.0);
    }
}
