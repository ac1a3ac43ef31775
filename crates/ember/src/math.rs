//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. The engine works in screen pixels with Y pointing
//! down and angles in degrees at the API surface.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// An axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Does the rectangle contain the point (edges inclusive)?
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// Degrees to radians.
pub fn to_rad(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

/// Radians to degrees.
pub fn to_deg(radians: f32) -> f32 {
    radians * (180.0 / std::f32::consts::PI)
}

/// Build a 2D model matrix from rotation (radians), translation, and scale.
///
/// Equivalent to `T * R * S` without going through a quaternion.
pub fn mat4_from_2d(rotation: f32, x: f32, y: f32, scale_x: f32, scale_y: f32) -> Mat4 {
    let (sin, cos) = rotation.sin_cos();
    Mat4::from_cols(
        Vec4::new(cos * scale_x, sin * scale_x, 0.0, 0.0),
        Vec4::new(-sin * scale_y, cos * scale_y, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(x, y, 0.0, 1.0),
    )
}

/// Rotate a point around a pivot by an angle in degrees.
pub fn rotate_around(point: Vec2, pivot: Vec2, degrees: f32) -> Vec2 {
    let (sin, cos) = to_rad(degrees).sin_cos();
    let local = point - pivot;
    Vec2::new(
        local.x * cos - local.y * sin + pivot.x,
        local.x * sin + local.y * cos + pivot.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(rect.contains(Vec2::new(10.0, 20.0)));
        assert!(rect.contains(Vec2::new(40.0, 60.0)));
        assert!(!rect.contains(Vec2::new(40.1, 30.0)));
    }

    #[test]
    fn model_matrix_matches_trs() {
        let m = mat4_from_2d(to_rad(30.0), 5.0, -3.0, 2.0, 0.5);
        let reference = Mat4::from_translation(Vec3::new(5.0, -3.0, 0.0))
            * Mat4::from_rotation_z(to_rad(30.0))
            * Mat4::from_scale(Vec3::new(2.0, 0.5, 1.0));
        assert!(m.abs_diff_eq(reference, 1e-5));
    }

    #[test]
    fn rotate_around_quarter_turn() {
        let rotated = rotate_around(Vec2::new(2.0, 1.0), Vec2::new(1.0, 1.0), 90.0);
        assert!((rotated.x - 1.0).abs() < 1e-5);
        assert!((rotated.y - 2.0).abs() < 1e-5);
    }
}
