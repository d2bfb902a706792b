use std::f32::consts::PI;

/// Radians per second the point group spins on its own.
pub const SPIN_SPEED: f32 = 0.07;
/// Share of π the cursor sways the group at the window edges.
pub const MOUSE_SWAY: f32 = 0.1;

/// Cursor x mapped to `[-1, 1]` across the window.
pub fn mouse_ratio(mouse_x: f32, window_width: f32) -> f32 {
    if window_width <= 0.0 {
        return 0.0;
    }
    (mouse_x / window_width - 0.5) * 2.0
}

pub fn group_rotation_y(elapsed: f32, ratio: f32) -> f32 {
    elapsed * SPIN_SPEED + ratio * PI * MOUSE_SWAY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_spans_the_window() {
        assert_eq!(mouse_ratio(0.0, 800.0), -1.0);
        assert_eq!(mouse_ratio(400.0, 800.0), 0.0);
        assert_eq!(mouse_ratio(800.0, 800.0), 1.0);
        assert_eq!(mouse_ratio(10.0, 0.0), 0.0);
    }

    #[test]
    fn rotation_combines_time_and_cursor() {
        assert_eq!(group_rotation_y(0.0, 0.0), 0.0);
        assert!((group_rotation_y(10.0, 0.0) - 0.7).abs() < 1e-6);
        assert!((group_rotation_y(0.0, 1.0) - PI * 0.1).abs() < 1e-6);
        assert!((group_rotation_y(10.0, -1.0) - (0.7 - PI * 0.1)).abs() < 1e-6);
    }
}
