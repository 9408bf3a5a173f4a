//! Physics components for ECS entities.

use glam::Vec2;

use crate::physics::filter::CollisionFilter;

/// Rigid body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RigidBodyType {
    /// Affected by forces and collisions.
    Dynamic,
    /// Immovable.
    Static,
    /// Position controlled by user, but affects dynamic bodies.
    Kinematic,
}

/// Rigid body component.
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub body_type: RigidBodyType,
    pub mass: f32,
    pub linear_velocity: Vec2,
    pub force_accumulator: Vec2,
    /// Linear damping factor (default: 0.01).
    pub linear_damping: f32,
    /// Coefficient of restitution (0.0 - 1.0).
    pub restitution: f32,
    /// Friction coefficient (0.0 - 1.0).
    pub friction: f32,
    /// Gravity scale (default: 1.0).
    pub gravity_scale: f32,
    /// Disabled bodies are neither integrated nor considered for contacts.
    pub enabled: bool,
}

impl RigidBody {
    /// Create a new dynamic rigid body with the given mass.
    pub fn new_dynamic(mass: f32) -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            mass,
            linear_velocity: Vec2::ZERO,
            force_accumulator: Vec2::ZERO,
            linear_damping: 0.01,
            restitution: 0.0,
            friction: 0.5,
            gravity_scale: 1.0,
            enabled: true,
        }
    }

    /// Create a new static rigid body.
    pub fn new_static() -> Self {
        Self {
            body_type: RigidBodyType::Static,
            mass: 0.0,
            linear_velocity: Vec2::ZERO,
            force_accumulator: Vec2::ZERO,
            linear_damping: 0.0,
            restitution: 0.0,
            friction: 0.5,
            gravity_scale: 0.0,
            enabled: true,
        }
    }

    /// Create a new kinematic rigid body moving at `velocity`.
    pub fn new_kinematic(velocity: Vec2) -> Self {
        Self {
            body_type: RigidBodyType::Kinematic,
            linear_velocity: velocity,
            ..Self::new_static()
        }
    }

    /// Inverse mass, zero for anything that is not a dynamic body.
    #[inline]
    pub fn inv_mass(&self) -> f32 {
        if self.body_type == RigidBodyType::Dynamic && self.mass > 0.0 {
            1.0 / self.mass
        } else {
            0.0
        }
    }

    /// Apply a linear impulse at the center of mass.
    pub fn apply_linear_impulse(&mut self, impulse: Vec2) {
        self.linear_velocity += impulse * self.inv_mass();
    }
}

/// Collider shape.
#[derive(Debug, Clone)]
pub enum ColliderShape {
    Circle { radius: f32 },
    /// Axis-aligned rectangle.
    Rect { half_extents: Vec2 },
    /// Open polyline used for level geometry. Only collides with circles and rects.
    Chain { points: Vec<Vec2> },
}

impl ColliderShape {
    pub fn is_chain(&self) -> bool {
        matches!(self, ColliderShape::Chain { .. })
    }
}

/// Collision detection component, attached to a fixture entity.
#[derive(Debug, Clone)]
pub struct Collider {
    /// The body entity this fixture is attached to.
    pub body: hecs::Entity,
    pub shape: ColliderShape,
    /// Offset from the body's position.
    pub offset: Vec2,
    /// If true, generates contact events but no physics response.
    pub is_sensor: bool,
    pub filter: CollisionFilter,
}

impl Collider {
    pub fn new(body: hecs::Entity, shape: ColliderShape) -> Self {
        Self {
            body,
            shape,
            offset: Vec2::ZERO,
            is_sensor: false,
            filter: CollisionFilter::default(),
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inv_mass() {
        assert_eq!(RigidBody::new_dynamic(2.0).inv_mass(), 0.5);
        assert_eq!(RigidBody::new_static().inv_mass(), 0.0);
        assert_eq!(RigidBody::new_kinematic(Vec2::X).inv_mass(), 0.0);
    }

    #[test]
    fn test_apply_linear_impulse() {
        let mut rb = RigidBody::new_dynamic(2.0);
        rb.apply_linear_impulse(Vec2::new(0.0, 1.0));
        assert_eq!(rb.linear_velocity, Vec2::new(0.0, 0.5));

        let mut ground = RigidBody::new_static();
        ground.apply_linear_impulse(Vec2::new(0.0, 1.0));
        assert_eq!(ground.linear_velocity, Vec2::ZERO);
    }

    #[test]
    fn test_collider_builder() {
        let mut world = hecs::World::new();
        let body = world.spawn((RigidBody::new_static(),));
        let collider = Collider::new(body, ColliderShape::Circle { radius: 0.5 })
            .with_offset(Vec2::new(0.0, -1.0))
            .sensor();
        assert!(collider.is_sensor);
        assert_eq!(collider.offset, Vec2::new(0.0, -1.0));
        assert!(!collider.shape.is_chain());
    }
}
