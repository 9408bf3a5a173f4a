//! Scene builders shared by the benchmarks.

use glam::Vec2;
use ledge::contacts::{ContactClassifier, FixtureTag, ObjectType};
use ledge::ecs::bridge::{attach_fixture, spawn_body};
use ledge::ecs::components::{Collider, ColliderShape, RigidBody, Transform2D};
use ledge::gameplay::{HealthScript, ScriptedEnemy};
use ledge::physics::PhysicsWorld;

/// Static chain ground spanning `width` around the origin.
pub fn spawn_ground(world: &mut hecs::World, width: f32) -> hecs::Entity {
    let body = spawn_body(world, Transform2D::identity(), RigidBody::new_static());
    attach_fixture(
        world,
        Collider::new(
            body,
            ColliderShape::Chain {
                points: vec![Vec2::new(-width * 0.5, 0.0), Vec2::new(width * 0.5, 0.0)],
            },
        ),
        Some(FixtureTag::new(ObjectType::Solid)),
    );
    body
}

/// `n` dynamic circles in a loose grid above the ground.
pub fn setup_circle_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    let columns = (n as f32).sqrt().ceil().max(1.0) as usize;
    spawn_ground(&mut world, columns as f32 * 1.5 + 2.0);

    for i in 0..n {
        let x = (i % columns) as f32 * 1.5 - columns as f32 * 0.75;
        let y = 0.45 + (i / columns) as f32 * 0.95;
        let body = spawn_body(&mut world, Transform2D::from_xy(x, y), RigidBody::new_dynamic(1.0));
        attach_fixture(
            &mut world,
            Collider::new(body, ColliderShape::Circle { radius: 0.5 }),
            Some(FixtureTag::new(ObjectType::MoveableBox)),
        );
    }
    world
}

/// Same as [`setup_circle_world`], spread out so that almost nothing touches.
pub fn setup_sparse_world(n: usize) -> hecs::World {
    let mut world = hecs::World::new();
    for i in 0..n {
        let body = spawn_body(
            &mut world,
            Transform2D::from_xy(i as f32 * 5.0, 10.0),
            RigidBody::new_dynamic(1.0),
        );
        attach_fixture(
            &mut world,
            Collider::new(body, ColliderShape::Circle { radius: 0.5 }),
            None,
        );
    }
    world
}

/// A player with foot and body fixtures plus `enemies` smashable enemies.
pub struct PlatformerScene {
    pub world: hecs::World,
    pub physics: PhysicsWorld,
    pub classifier: ContactClassifier,
    pub player: hecs::Entity,
    pub foot: hecs::Entity,
    pub player_fixture: hecs::Entity,
    pub enemies: Vec<(hecs::Entity, hecs::Entity)>,
}

pub fn setup_platformer(enemies: usize) -> anyhow::Result<PlatformerScene> {
    let mut world = hecs::World::new();
    spawn_ground(&mut world, 200.0);

    let player = spawn_body(&mut world, Transform2D::from_xy(0.0, 0.5), RigidBody::new_dynamic(1.0));
    let player_fixture = attach_fixture(
        &mut world,
        Collider::new(
            player,
            ColliderShape::Rect {
                half_extents: Vec2::new(0.3, 0.5),
            },
        ),
        Some(FixtureTag::new(ObjectType::Player)),
    );
    let foot = attach_fixture(
        &mut world,
        Collider::new(player, ColliderShape::Circle { radius: 0.2 })
            .with_offset(Vec2::new(0.0, -0.5))
            .sensor(),
        Some(FixtureTag::new(ObjectType::PlayerFootSensor)),
    );

    let mut spawned = Vec::with_capacity(enemies);
    for i in 0..enemies {
        let x = (i as f32 - enemies as f32 * 0.5) * 1.2;
        let body = spawn_body(&mut world, Transform2D::from_xy(x, 0.4), RigidBody::new_dynamic(1.0));
        world.insert_one(body, ScriptedEnemy::new(HealthScript::new(10)).smashable())?;
        let fixture = attach_fixture(
            &mut world,
            Collider::new(body, ColliderShape::Circle { radius: 0.4 }),
            Some(
                FixtureTag::new(ObjectType::Enemy)
                    .with_owner(body)
                    .with_property("damage", 1),
            ),
        );
        spawned.push((body, fixture));
    }

    let mut classifier = ContactClassifier::default();
    classifier.set_player(Some(player));

    Ok(PlatformerScene {
        world,
        physics: PhysicsWorld::default(),
        classifier,
        player,
        foot,
        player_fixture,
        enemies: spawned,
    })
}

/// Step the scene `steps` times at 60 Hz, draining events after each step.
pub fn run_platformer(scene: &mut PlatformerScene, steps: usize) {
    for i in 0..steps {
        scene.classifier.begin_tick(i as f32 / 60.0);
        scene
            .physics
            .step(&mut scene.world, 1.0 / 60.0, &mut scene.classifier);
        scene.classifier.process_events(&mut scene.world);
    }
}
