//! Rigid body integration functions.

use glam::Vec2;

use crate::ecs::components::physics::{RigidBody, RigidBodyType};
use crate::ecs::components::transform::Transform2D;

#[inline]
fn is_simulated(rb: &RigidBody) -> bool {
    rb.enabled && rb.body_type == RigidBodyType::Dynamic && rb.mass > 0.0
}

/// Apply gravity force to all enabled dynamic rigid bodies.
pub fn apply_gravity(world: &mut hecs::World, gravity: Vec2) {
    for (_, rb) in world.query_mut::<&mut RigidBody>() {
        if is_simulated(rb) {
            rb.force_accumulator += gravity * rb.mass * rb.gravity_scale;
        }
    }
}

/// Integrate velocities using semi-implicit Euler: v += (F/m) * dt.
pub fn integrate_velocities(world: &mut hecs::World, dt: f32) {
    for (_, rb) in world.query_mut::<&mut RigidBody>() {
        if !is_simulated(rb) {
            continue;
        }

        rb.linear_velocity += rb.force_accumulator * rb.inv_mass() * dt;

        // Apply damping
        rb.linear_velocity *= (1.0 - rb.linear_damping).max(0.0);
    }
}

/// Integrate positions: p += v * dt.
///
/// Kinematic bodies move along their velocity as well; static and disabled
/// bodies stay put.
pub fn integrate_positions(world: &mut hecs::World, dt: f32) {
    for (_, (rb, transform)) in world.query_mut::<(&RigidBody, &mut Transform2D)>() {
        if !rb.enabled || rb.body_type == RigidBodyType::Static {
            continue;
        }
        transform.position += rb.linear_velocity * dt;
    }
}

/// Clear force accumulators on all rigid bodies.
pub fn clear_forces(world: &mut hecs::World) {
    for (_, rb) in world.query_mut::<&mut RigidBody>() {
        rb.force_accumulator = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(world: &mut hecs::World, steps: usize) {
        let gravity = Vec2::new(0.0, -9.81);
        let dt = 1.0 / 60.0;
        for _ in 0..steps {
            apply_gravity(world, gravity);
            integrate_velocities(world, dt);
            integrate_positions(world, dt);
            clear_forces(world);
        }
    }

    #[test]
    fn test_free_fall() {
        let mut world = hecs::World::new();
        let entity = world.spawn((Transform2D::from_xy(0.0, 10.0), RigidBody::new_dynamic(1.0)));

        // Simulate 1 second (60 steps)
        run(&mut world, 60);

        let transform = world.get::<&Transform2D>(entity).unwrap();

        // After 1 second of free fall from y=10: y = 10 - 0.5*9.81*1^2 ≈ 5.095
        // With damping and discrete steps, should be somewhere below 10
        assert!(
            transform.position.y < 10.0,
            "Body should have fallen: y = {}",
            transform.position.y
        );
        assert!(
            transform.position.y > 0.0,
            "Body should not have fallen too far in 1 second: y = {}",
            transform.position.y
        );
        assert!(transform.position.x.abs() < 1e-5);
    }

    #[test]
    fn test_static_and_disabled_bodies_unaffected() {
        let mut world = hecs::World::new();
        let fixed = world.spawn((Transform2D::identity(), RigidBody::new_static()));
        let mut rb = RigidBody::new_dynamic(1.0);
        rb.enabled = false;
        let parked = world.spawn((Transform2D::from_xy(3.0, 3.0), rb));

        run(&mut world, 60);

        assert_eq!(world.get::<&Transform2D>(fixed).unwrap().position, Vec2::ZERO);
        assert_eq!(
            world.get::<&Transform2D>(parked).unwrap().position,
            Vec2::new(3.0, 3.0)
        );
        assert_eq!(
            world.get::<&RigidBody>(parked).unwrap().linear_velocity,
            Vec2::ZERO
        );
    }

    #[test]
    fn test_kinematic_moves_without_gravity() {
        let mut world = hecs::World::new();
        let platform = world.spawn((Transform2D::identity(), RigidBody::new_kinematic(Vec2::X)));

        run(&mut world, 60);

        let transform = world.get::<&Transform2D>(platform).unwrap();
        assert!((transform.position.x - 1.0).abs() < 1e-3, "x = {}", transform.position.x);
        assert!(transform.position.y.abs() < 1e-6);
    }

    #[test]
    fn test_clear_forces() {
        let mut world = hecs::World::new();
        let entity = world.spawn((Transform2D::identity(), {
            let mut rb = RigidBody::new_dynamic(1.0);
            rb.force_accumulator = Vec2::new(10.0, 20.0);
            rb
        }));

        clear_forces(&mut world);

        let rb = world.get::<&RigidBody>(entity).unwrap();
        assert_eq!(rb.force_accumulator, Vec2::ZERO);
    }
}
