//! Broadphase collision detection using sort-and-sweep over x.

use glam::Vec2;

use crate::ecs::components::physics::{Collider, RigidBody, RigidBodyType};
use crate::ecs::components::transform::Transform2D;

use super::collider::PhysicsAabb;

#[derive(Debug, Clone, Copy)]
struct Entry {
    fixture: hecs::Entity,
    body: hecs::Entity,
    aabb: PhysicsAabb,
    body_type: RigidBodyType,
}

/// Sweep-and-prune broadphase over fixture AABBs.
#[derive(Debug, Default)]
pub struct SweepAndPrune {
    entries: Vec<Entry>,
}

impl SweepAndPrune {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Find all pairs of fixtures whose AABBs overlap.
    ///
    /// Sensors take part. Pairs are skipped when both fixtures belong to the
    /// same body, when neither body is dynamic, when either body is disabled,
    /// or when their collision filters reject each other.
    pub fn find_pairs(&mut self, world: &hecs::World) -> Vec<(hecs::Entity, hecs::Entity)> {
        self.entries.clear();

        for (fixture, collider) in world.query::<&Collider>().iter() {
            let Ok(transform) = world.get::<&Transform2D>(collider.body) else {
                continue;
            };
            let Ok(rb) = world.get::<&RigidBody>(collider.body) else {
                continue;
            };
            if !rb.enabled {
                continue;
            }

            let center = transform.transform_point(collider.offset);
            self.entries.push(Entry {
                fixture,
                body: collider.body,
                aabb: collider.shape.compute_aabb(center),
                body_type: rb.body_type,
            });
        }

        self.entries
            .sort_by(|a, b| a.aabb.min.x.total_cmp(&b.aabb.min.x));

        let mut pairs = Vec::new();

        for i in 0..self.entries.len() {
            let a = self.entries[i];
            for b in &self.entries[i + 1..] {
                // Sorted by min.x: nothing further right can overlap
                if b.aabb.min.x > a.aabb.max.x {
                    break;
                }

                if a.body == b.body {
                    continue;
                }
                if a.body_type != RigidBodyType::Dynamic && b.body_type != RigidBodyType::Dynamic {
                    continue;
                }
                if !a.aabb.overlaps(&b.aabb) {
                    continue;
                }
                if !filters_accept(world, a.fixture, b.fixture) {
                    continue;
                }

                pairs.push((a.fixture, b.fixture));
            }
        }

        pairs
    }
}

fn filters_accept(world: &hecs::World, a: hecs::Entity, b: hecs::Entity) -> bool {
    match (world.get::<&Collider>(a), world.get::<&Collider>(b)) {
        (Ok(ca), Ok(cb)) => ca.filter.should_collide(&cb.filter),
        _ => false,
    }
}

/// World-space center of a fixture, if its body still exists.
pub fn fixture_center(world: &hecs::World, collider: &Collider) -> Option<Vec2> {
    world
        .get::<&Transform2D>(collider.body)
        .ok()
        .map(|t| t.transform_point(collider.offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::physics::ColliderShape;
    use crate::physics::filter::{CollisionFilter, CATEGORY_ENEMY_WALK_THROUGH};

    fn spawn(world: &mut hecs::World, pos: Vec2, rb: RigidBody) -> (hecs::Entity, hecs::Entity) {
        let body = world.spawn((Transform2D::from_position(pos), rb));
        let fixture = world.spawn((Collider::new(body, ColliderShape::Circle { radius: 1.0 }),));
        (body, fixture)
    }

    #[test]
    fn test_broadphase_overlapping() {
        let mut world = hecs::World::new();
        spawn(&mut world, Vec2::ZERO, RigidBody::new_dynamic(1.0));
        spawn(&mut world, Vec2::new(1.5, 0.0), RigidBody::new_dynamic(1.0));

        let pairs = SweepAndPrune::new().find_pairs(&world);
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_broadphase_separated() {
        let mut world = hecs::World::new();
        spawn(&mut world, Vec2::ZERO, RigidBody::new_dynamic(1.0));
        spawn(&mut world, Vec2::new(5.0, 0.0), RigidBody::new_dynamic(1.0));

        assert!(SweepAndPrune::new().find_pairs(&world).is_empty());
    }

    #[test]
    fn test_broadphase_skips_static_pairs_and_same_body() {
        let mut world = hecs::World::new();
        spawn(&mut world, Vec2::ZERO, RigidBody::new_static());
        spawn(&mut world, Vec2::new(0.5, 0.0), RigidBody::new_kinematic(Vec2::X));

        let (body, _) = spawn(&mut world, Vec2::new(20.0, 0.0), RigidBody::new_dynamic(1.0));
        world.spawn((Collider::new(body, ColliderShape::Circle { radius: 0.5 }).sensor(),));

        assert!(SweepAndPrune::new().find_pairs(&world).is_empty());
    }

    #[test]
    fn test_broadphase_includes_sensors() {
        let mut world = hecs::World::new();
        let (body, _) = spawn(&mut world, Vec2::ZERO, RigidBody::new_dynamic(1.0));
        world.spawn((Collider::new(body, ColliderShape::Circle { radius: 0.2 })
            .with_offset(Vec2::new(0.0, -1.0))
            .sensor(),));
        spawn(&mut world, Vec2::new(0.0, -1.9), RigidBody::new_static());

        // body circle and foot sensor both reach the ground circle
        assert_eq!(SweepAndPrune::new().find_pairs(&world).len(), 2);
    }

    #[test]
    fn test_broadphase_respects_filters_and_disabled_bodies() {
        let mut world = hecs::World::new();
        let (_, fixture) = spawn(&mut world, Vec2::ZERO, RigidBody::new_dynamic(1.0));
        world
            .get::<&mut Collider>(fixture)
            .unwrap()
            .filter = CollisionFilter::new(0x01, !CATEGORY_ENEMY_WALK_THROUGH);
        let (_, ghost) = spawn(&mut world, Vec2::new(0.5, 0.0), RigidBody::new_dynamic(1.0));
        world.get::<&mut Collider>(ghost).unwrap().filter =
            CollisionFilter::category(CATEGORY_ENEMY_WALK_THROUGH);
        assert!(SweepAndPrune::new().find_pairs(&world).is_empty());

        let mut world = hecs::World::new();
        spawn(&mut world, Vec2::ZERO, RigidBody::new_dynamic(1.0));
        let (disabled, _) = spawn(&mut world, Vec2::new(0.5, 0.0), RigidBody::new_dynamic(1.0));
        world.get::<&mut RigidBody>(disabled).unwrap().enabled = false;
        assert!(SweepAndPrune::new().find_pairs(&world).is_empty());
    }
}
