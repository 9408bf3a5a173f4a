//! Spawn helpers tying bodies, fixtures and gameplay tags together.

use crate::contacts::tag::FixtureTag;
use crate::ecs::components::physics::{Collider, RigidBody};
use crate::ecs::components::transform::Transform2D;

/// Spawn a body entity with a transform and a rigid body.
pub fn spawn_body(world: &mut hecs::World, transform: Transform2D, body: RigidBody) -> hecs::Entity {
    world.spawn((transform, body))
}

/// Spawn a fixture entity for `collider.body`.
///
/// Fixtures created by gameplay code carry exactly one [`FixtureTag`];
/// decorative fixtures may omit it and are then ignored by contact handling.
pub fn attach_fixture(
    world: &mut hecs::World,
    collider: Collider,
    tag: Option<FixtureTag>,
) -> hecs::Entity {
    match tag {
        Some(tag) => world.spawn((collider, tag)),
        None => world.spawn((collider,)),
    }
}

/// Collect all fixture entities attached to `body`.
pub fn fixtures_of(world: &hecs::World, body: hecs::Entity) -> Vec<hecs::Entity> {
    world
        .query::<&Collider>()
        .iter()
        .filter(|(_, collider)| collider.body == body)
        .map(|(entity, _)| entity)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::tag::ObjectType;
    use crate::ecs::components::physics::ColliderShape;

    #[test]
    fn test_attach_and_collect_fixtures() {
        let mut world = hecs::World::new();
        let body = spawn_body(&mut world, Transform2D::identity(), RigidBody::new_dynamic(1.0));
        let other = spawn_body(&mut world, Transform2D::identity(), RigidBody::new_static());

        let tagged = attach_fixture(
            &mut world,
            Collider::new(body, ColliderShape::Circle { radius: 0.5 }),
            Some(FixtureTag::new(ObjectType::Player)),
        );
        let plain = attach_fixture(
            &mut world,
            Collider::new(body, ColliderShape::Circle { radius: 0.2 }),
            None,
        );
        attach_fixture(
            &mut world,
            Collider::new(other, ColliderShape::Circle { radius: 0.2 }),
            None,
        );

        let mut fixtures = fixtures_of(&world, body);
        fixtures.sort();
        let mut expected = vec![tagged, plain];
        expected.sort();
        assert_eq!(fixtures, expected);
        assert!(world.get::<&FixtureTag>(tagged).is_ok());
        assert!(world.get::<&FixtureTag>(plain).is_err());
    }
}
