//! Transform component for ECS entities.

use glam::Vec2;

/// World-space placement of a body.
///
/// Bodies have fixed rotation, so a transform is just a position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub position: Vec2,
}

impl Transform2D {
    /// Create an identity transform.
    pub fn identity() -> Self {
        Self {
            position: Vec2::ZERO,
        }
    }

    /// Create a transform from a position.
    pub fn from_position(position: Vec2) -> Self {
        Self { position }
    }

    /// Create a transform from x/y coordinates.
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec2::new(x, y))
    }

    /// Transform a point from body-local space to world space.
    #[inline]
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        self.position + local
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}
