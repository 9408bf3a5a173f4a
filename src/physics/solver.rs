//! Sequential impulse constraint solver.
//!
//! Bodies do not rotate, so only linear terms appear. Each manifold point
//! keeps its accumulated normal and tangent impulse; those totals are what
//! `post_solve` listeners see.

use glam::Vec2;

use crate::ecs::components::physics::RigidBody;

use super::contact::{Contact, ContactSet};
use super::PhysicsConfig;

/// Solve every enabled, non-sensor contact in `contacts`.
pub fn solve_contacts(
    contacts: &mut ContactSet,
    world: &mut hecs::World,
    config: &PhysicsConfig,
    dt: f32,
) {
    for contact in contacts.iter_mut() {
        for point in &mut contact.manifold.points {
            point.normal_impulse = 0.0;
            point.tangent_impulse = 0.0;
        }
    }

    for _ in 0..config.solver_iterations {
        for contact in contacts.iter_mut() {
            if !is_solvable(contact) {
                continue;
            }
            solve_contact(contact, world, config, dt);
        }
    }
}

/// Whether the solver acts on this contact at all.
#[inline]
pub fn is_solvable(contact: &Contact) -> bool {
    contact.enabled && !contact.is_sensor() && !contact.manifold.points.is_empty()
}

fn solve_contact(contact: &mut Contact, world: &mut hecs::World, config: &PhysicsConfig, dt: f32) {
    let (Some(a), Some(b)) = (
        RbData::read(world, contact.a.body),
        RbData::read(world, contact.b.body),
    ) else {
        return;
    };

    let inv_mass_sum = a.inv_mass + b.inv_mass;
    // Skip if both are static/kinematic
    if inv_mass_sum <= 0.0 {
        return;
    }

    let normal = contact.manifold.normal;
    let tangent = Vec2::new(normal.y, -normal.x);
    let restitution = (a.restitution + b.restitution) * 0.5;
    let friction = (a.friction + b.friction) * 0.5;

    let mut vel_a = a.linear_velocity;
    let mut vel_b = b.linear_velocity;

    for point in &mut contact.manifold.points {
        let contact_velocity = (vel_b - vel_a).dot(normal);

        // Baumgarte position correction
        let bias = config.baumgarte / dt * (point.penetration - config.penetration_slop).max(0.0);

        let j_normal = (-(1.0 + restitution) * contact_velocity + bias) / inv_mass_sum;

        // Clamp accumulated normal impulse
        let old_impulse = point.normal_impulse;
        point.normal_impulse = (old_impulse + j_normal).max(0.0);
        let j_normal = point.normal_impulse - old_impulse;

        let impulse = normal * j_normal;
        vel_a -= impulse * a.inv_mass;
        vel_b += impulse * b.inv_mass;

        // Friction, driving the relative tangent velocity towards the surface speed
        let tangent_velocity = (vel_b - vel_a).dot(tangent) - contact.tangent_speed;
        let j_tangent = -tangent_velocity / inv_mass_sum;

        // Coulomb friction: |Jt| <= mu * |Jn|
        let max_friction = friction * point.normal_impulse;
        let old_tangent = point.tangent_impulse;
        point.tangent_impulse = (old_tangent + j_tangent).clamp(-max_friction, max_friction);
        let j_tangent = point.tangent_impulse - old_tangent;

        let friction_impulse = tangent * j_tangent;
        vel_a -= friction_impulse * a.inv_mass;
        vel_b += friction_impulse * b.inv_mass;
    }

    write_velocity(world, contact.a.body, vel_a);
    write_velocity(world, contact.b.body, vel_b);
}

/// Helper struct to cache rigid body data for solver calculations.
struct RbData {
    inv_mass: f32,
    linear_velocity: Vec2,
    restitution: f32,
    friction: f32,
}

impl RbData {
    fn read(world: &hecs::World, body: hecs::Entity) -> Option<Self> {
        let rb = world.get::<&RigidBody>(body).ok()?;
        Some(Self {
            inv_mass: rb.inv_mass(),
            linear_velocity: rb.linear_velocity,
            restitution: rb.restitution,
            friction: rb.friction,
        })
    }
}

fn write_velocity(world: &mut hecs::World, body: hecs::Entity, velocity: Vec2) {
    if let Ok(mut rb) = world.get::<&mut RigidBody>(body) {
        if rb.inv_mass() > 0.0 {
            rb.linear_velocity = velocity;
        }
    }
}
