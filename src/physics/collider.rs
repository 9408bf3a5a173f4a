//! Collider shape bounds for broadphase collision detection.

use glam::Vec2;

use crate::ecs::components::physics::ColliderShape;

/// Axis-aligned bounding box for broadphase collision detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsAabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl PhysicsAabb {
    /// Test whether two AABBs overlap.
    #[inline]
    pub fn overlaps(&self, other: &PhysicsAabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        (self.max - self.min) * 0.5
    }
}

impl ColliderShape {
    /// Compute the world-space AABB for this shape centered at `center`.
    #[inline]
    pub fn compute_aabb(&self, center: Vec2) -> PhysicsAabb {
        match self {
            ColliderShape::Circle { radius } => PhysicsAabb {
                min: center - Vec2::splat(*radius),
                max: center + Vec2::splat(*radius),
            },
            ColliderShape::Rect { half_extents } => PhysicsAabb {
                min: center - *half_extents,
                max: center + *half_extents,
            },
            ColliderShape::Chain { points } => {
                if points.is_empty() {
                    return PhysicsAabb {
                        min: center,
                        max: center,
                    };
                }
                let mut min = Vec2::splat(f32::MAX);
                let mut max = Vec2::splat(f32::MIN);
                for p in points {
                    let wp = center + *p;
                    min = min.min(wp);
                    max = max.max(wp);
                }
                PhysicsAabb { min, max }
            }
        }
    }
}
