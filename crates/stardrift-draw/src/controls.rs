use std::f32::consts::PI;

use crate::{
    camera::PerspectiveCamera,
    math::{Size, Vec2, Vec3},
};

const POLAR_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitButton {
    /// Rotates around the target.
    Primary,
    /// Pans the target in the view plane.
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum DragState {
    #[default]
    Idle,
    Rotate,
    Pan,
}

/// Spherical position of the camera around its target, `theta` about +Y
/// measured from +Z, `phi` down from +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self {
                radius,
                theta: 0.0,
                phi: 0.0,
            };
        }

        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }
}

/// Mouse driven orbit around the camera target. Input accumulates until the
/// next [`OrbitControls::update`].
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub enabled: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    state: DragState,
    cursor: Option<Vec2>,

    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_pixels: Vec2,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: true,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            state: DragState::Idle,
            cursor: None,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_pixels: Vec2::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.state != DragState::Idle
    }

    pub fn pointer_down(&mut self, button: OrbitButton) {
        if !self.enabled {
            return;
        }

        self.state = match button {
            OrbitButton::Primary => DragState::Rotate,
            OrbitButton::Secondary => DragState::Pan,
        };
    }

    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    /// Tracks the cursor; drags turn into pending rotation or pan.
    pub fn pointer_moved(&mut self, position: Vec2, viewport: Size<u32>) {
        let previous = self.cursor.replace(position);

        let Some(previous) = previous else {
            return;
        };

        if !self.enabled {
            return;
        }

        let delta = position - previous;
        let height = viewport.height.max(1) as f32;

        match self.state {
            DragState::Idle => {}
            DragState::Rotate => {
                self.theta_delta -= 2.0 * PI * delta.x / height * self.rotate_speed;
                self.phi_delta -= 2.0 * PI * delta.y / height * self.rotate_speed;
            }
            DragState::Pan => {
                self.pan_pixels += delta * self.pan_speed;
            }
        }
    }

    /// Positive `lines` scrolls away from the user and moves closer.
    pub fn wheel(&mut self, lines: f32) {
        if !self.enabled || lines == 0.0 {
            return;
        }

        let step = 0.95f32.powf(self.zoom_speed);
        self.scale *= step.powf(lines);
    }

    /// Applies pending input to `camera`. Returns whether it moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera, viewport: Size<u32>) -> bool {
        let idle = self.theta_delta == 0.0
            && self.phi_delta == 0.0
            && self.scale == 1.0
            && self.pan_pixels == Vec2::ZERO;

        if idle {
            return false;
        }

        let offset = camera.position - camera.target;
        let mut spherical = Spherical::from_offset(offset);

        spherical.theta += self.theta_delta;
        spherical.phi = (spherical.phi + self.phi_delta).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        let pan = self.pan_offset(camera, offset.length(), viewport);
        camera.target += pan;
        camera.position = camera.target + spherical.to_offset();

        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
        self.pan_pixels = Vec2::ZERO;

        true
    }

    fn pan_offset(&self, camera: &PerspectiveCamera, distance: f32, viewport: Size<u32>) -> Vec3 {
        if self.pan_pixels == Vec2::ZERO {
            return Vec3::ZERO;
        }

        let target_distance = distance * (camera.fov.to_radians() / 2.0).tan();
        let height = viewport.height.max(1) as f32;

        let view = camera.view_matrix().inverse();
        let right = view.x_axis.truncate();
        let up = view.y_axis.truncate();

        let left = -right * (2.0 * self.pan_pixels.x * target_distance / height);
        let upward = up * (2.0 * self.pan_pixels.y * target_distance / height);

        left + upward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size<u32> = Size {
        width: 800,
        height: 600,
    };

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera {
            position: Vec3::new(0.0, 0.0, 5.0),
            ..Default::default()
        }
    }

    #[test]
    fn spherical_roundtrip() {
        let offset = Vec3::new(0.5, 0.2, 3.5);
        let back = Spherical::from_offset(offset).to_offset();
        assert!((offset - back).length() < 1e-5);
    }

    #[test]
    fn idle_controls_do_nothing() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();
        assert!(!controls.update(&mut cam, VIEWPORT));
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn drag_rotates_around_target() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();

        controls.pointer_moved(Vec2::new(100.0, 100.0), VIEWPORT);
        controls.pointer_down(OrbitButton::Primary);
        controls.pointer_moved(Vec2::new(250.0, 100.0), VIEWPORT);
        controls.pointer_up();

        assert!(controls.update(&mut cam, VIEWPORT));
        assert!((cam.position.length() - 5.0).abs() < 1e-4);
        // dragging right swings the camera to the left
        assert!(cam.position.x < 0.0);
        assert_eq!(cam.target, Vec3::ZERO);
    }

    #[test]
    fn hover_without_button_does_not_rotate() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();

        controls.pointer_moved(Vec2::new(0.0, 0.0), VIEWPORT);
        controls.pointer_moved(Vec2::new(300.0, 300.0), VIEWPORT);
        assert!(!controls.update(&mut cam, VIEWPORT));
    }

    #[test]
    fn polar_angle_is_clamped() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();

        controls.pointer_moved(Vec2::ZERO, VIEWPORT);
        controls.pointer_down(OrbitButton::Primary);
        controls.pointer_moved(Vec2::new(0.0, 10_000.0), VIEWPORT);
        controls.update(&mut cam, VIEWPORT);

        assert!(cam.position.y > 4.99 && cam.position.y <= 5.0);
        assert!(cam.position.x.abs() < 1e-3 && cam.position.z.abs() < 1e-3);
    }

    #[test]
    fn wheel_dollies_within_bounds() {
        let mut controls = OrbitControls {
            min_distance: 4.0,
            ..Default::default()
        };
        let mut cam = camera();

        controls.wheel(1.0);
        controls.update(&mut cam, VIEWPORT);
        assert!((cam.position.length() - 4.75).abs() < 1e-4);

        controls.wheel(50.0);
        controls.update(&mut cam, VIEWPORT);
        assert!((cam.position.length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut controls = OrbitControls::new();
        let mut cam = camera();

        controls.pointer_moved(Vec2::ZERO, VIEWPORT);
        controls.pointer_down(OrbitButton::Secondary);
        controls.pointer_moved(Vec2::new(60.0, 0.0), VIEWPORT);
        controls.update(&mut cam, VIEWPORT);

        assert!(cam.target.x < 0.0);
        assert!(((cam.position - cam.target) - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let mut controls = OrbitControls {
            enabled: false,
            ..Default::default()
        };
        controls.pointer_down(OrbitButton::Primary);
        controls.wheel(3.0);
        assert!(!controls.is_dragging());
        assert!(!controls.update(&mut camera(), VIEWPORT));
    }
}
