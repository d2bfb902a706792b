pub use glam::{vec2, vec3, vec4, EulerRot, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size<T> {
    pub width: T,
    pub height: T,
}

impl<T> Size<T> {
    pub fn new(width: T, height: T) -> Self {
        Self { width, height }
    }
}

impl Size<u32> {
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    pub fn to_f32(self) -> Size<f32> {
        Size {
            width: self.width as f32,
            height: self.height as f32,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Size<f32>,
}

impl Rect {
    pub fn xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: vec2(x, y),
            size: Size { width, height },
        }
    }

    #[inline(always)]
    pub fn x(&self) -> f32 {
        self.origin.x
    }

    #[inline(always)]
    pub fn y(&self) -> f32 {
        self.origin.y
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.size.width
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn min(&self) -> Vec2 {
        self.origin
    }

    pub fn max(&self) -> Vec2 {
        self.origin + vec2(self.size.width, self.size.height)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.origin.x && point.y >= self.origin.y && point.x < max.x && point.y < max.y
    }

    /// Maps `point` into `[0, 1]²` relative to this rect, clamped at the edges.
    pub fn normalized_point(&self, point: Vec2) -> Vec2 {
        let local = point - self.origin;
        vec2(
            (local.x / self.size.width.max(f32::EPSILON)).clamp(0.0, 1.0),
            (local.y / self.size.height.max(f32::EPSILON)).clamp(0.0, 1.0),
        )
    }

    pub fn inset(&self, amount: f32) -> Self {
        Self::xywh(
            self.origin.x + amount,
            self.origin.y + amount,
            (self.size.width - amount * 2.0).max(0.0),
            (self.size.height - amount * 2.0).max(0.0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::xywh(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(vec2(10.0, 10.0)));
        assert!(rect.contains(vec2(29.9, 29.9)));
        assert!(!rect.contains(vec2(30.0, 15.0)));
        assert!(!rect.contains(vec2(9.9, 15.0)));
    }

    #[test]
    fn normalized_point_clamps() {
        let rect = Rect::xywh(0.0, 0.0, 100.0, 50.0);
        assert_eq!(rect.normalized_point(vec2(50.0, 25.0)), vec2(0.5, 0.5));
        assert_eq!(rect.normalized_point(vec2(-10.0, 80.0)), vec2(0.0, 1.0));
    }

    #[test]
    fn inset_shrinks_on_all_sides() {
        let rect = Rect::xywh(0.0, 0.0, 10.0, 10.0).inset(2.0);
        assert_eq!(rect, Rect::xywh(2.0, 2.0, 6.0, 6.0));
        assert_eq!(Rect::xywh(0.0, 0.0, 2.0, 2.0).inset(2.0).width(), 0.0);
    }

    #[test]
    fn aspect_never_divides_by_zero() {
        assert_eq!(Size::new(1920u32, 1080).aspect(), 1920.0 / 1080.0);
        assert_eq!(Size::new(10u32, 0).aspect(), 10.0);
    }
}
