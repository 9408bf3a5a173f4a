#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use ledge::contacts::{ContactClassifier, ContactConfig, FixtureTag, ObjectType};
use ledge::ecs::bridge::{attach_fixture, spawn_body};
use ledge::ecs::components::{Collider, ColliderShape, RigidBody, Transform2D};
use ledge::gameplay::{EnemyScript, PlayerHooks, ScriptedEnemy};
use ledge::glam::Vec2;
use ledge::hecs;
use ledge::physics::contact::Contact;
use ledge::physics::filter::{
    CollisionFilter, CATEGORY_ENEMY_COLLIDE_WITH, CATEGORY_ENEMY_WALK_THROUGH,
};
use ledge::physics::listener::ContactListener;

/// Shared call log of a [`RecordingPlayer`].
#[derive(Debug, Default)]
pub struct PlayerLog {
    pub damage_calls: AtomicUsize,
    pub damage: Mutex<Vec<i32>>,
    pub impulses: Mutex<Vec<f32>>,
    pub ground_body: Mutex<Option<hecs::Entity>>,
    pub platform_body: Mutex<Option<hecs::Entity>>,
    pub belt_velocity: Mutex<Option<f32>>,
}

/// Player double recording every notification.
#[derive(Debug, Clone, Default)]
pub struct RecordingPlayer {
    pub log: Arc<PlayerLog>,
}

impl PlayerHooks for RecordingPlayer {
    fn damage(&mut self, amount: i32) {
        self.log.damage_calls.fetch_add(1, Ordering::SeqCst);
        self.log.damage.lock().unwrap().push(amount);
    }

    fn impulse(&mut self, magnitude: f32) {
        self.log.impulses.lock().unwrap().push(magnitude);
    }

    fn set_ground_body(&mut self, body: Option<hecs::Entity>) {
        *self.log.ground_body.lock().unwrap() = body;
    }

    fn set_platform_body(&mut self, body: Option<hecs::Entity>) {
        *self.log.platform_body.lock().unwrap() = body;
    }

    fn set_belt_velocity(&mut self, velocity: Option<f32>) {
        *self.log.belt_velocity.lock().unwrap() = velocity;
    }
}

/// Shared call log of a [`RecordingScript`].
#[derive(Debug, Default)]
pub struct EnemyLog {
    pub hits: Mutex<Vec<i32>>,
    pub smashed: AtomicUsize,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingScript {
    pub log: Arc<EnemyLog>,
}

impl EnemyScript for RecordingScript {
    fn hit(&mut self, damage: i32) {
        self.log.hits.lock().unwrap().push(damage);
    }

    fn smashed(&mut self) {
        self.log.smashed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn circle(radius: f32) -> ColliderShape {
    ColliderShape::Circle { radius }
}

pub fn rect(hx: f32, hy: f32) -> ColliderShape {
    ColliderShape::Rect {
        half_extents: Vec2::new(hx, hy),
    }
}

/// A world with a player body carrying body, foot, head and arm fixtures,
/// and a classifier listening to it. Contacts are fed by hand.
pub struct Level {
    pub world: hecs::World,
    pub classifier: ContactClassifier<RecordingPlayer>,
    pub log: Arc<PlayerLog>,
    pub player: hecs::Entity,
    pub player_fixture: hecs::Entity,
    pub foot: hecs::Entity,
    pub head: hecs::Entity,
    pub left_arm: hecs::Entity,
    pub right_arm: hecs::Entity,
}

impl Level {
    pub fn new() -> Self {
        let mut world = hecs::World::new();
        let player = spawn_body(&mut world, Transform2D::identity(), RigidBody::new_dynamic(1.0));
        let sensor = |world: &mut hecs::World, object_type| {
            attach_fixture(
                world,
                Collider::new(player, circle(0.1)).sensor(),
                Some(FixtureTag::new(object_type)),
            )
        };
        let foot = sensor(&mut world, ObjectType::PlayerFootSensor);
        let head = sensor(&mut world, ObjectType::PlayerHeadSensor);
        let left_arm = sensor(&mut world, ObjectType::PlayerLeftArmSensor);
        let right_arm = sensor(&mut world, ObjectType::PlayerRightArmSensor);
        let player_fixture = attach_fixture(
            &mut world,
            Collider::new(player, rect(0.3, 0.5)),
            Some(FixtureTag::new(ObjectType::Player)),
        );

        let recording = RecordingPlayer::default();
        let log = recording.log.clone();
        let mut classifier = ContactClassifier::new(ContactConfig::default(), recording);
        classifier.set_player(Some(player));

        Self {
            world,
            classifier,
            log,
            player,
            player_fixture,
            foot,
            head,
            left_arm,
            right_arm,
        }
    }

    pub fn set_player_velocity(&mut self, velocity: Vec2) {
        self.world
            .get::<&mut RigidBody>(self.player)
            .unwrap()
            .linear_velocity = velocity;
    }

    pub fn player_velocity(&self) -> Vec2 {
        self.world.get::<&RigidBody>(self.player).unwrap().linear_velocity
    }

    /// Static level geometry with a single chain fixture.
    pub fn ground(&mut self) -> (hecs::Entity, hecs::Entity) {
        let body = spawn_body(&mut self.world, Transform2D::identity(), RigidBody::new_static());
        let fixture = attach_fixture(
            &mut self.world,
            Collider::new(
                body,
                ColliderShape::Chain {
                    points: vec![Vec2::new(-10.0, 0.0), Vec2::new(10.0, 0.0)],
                },
            ),
            Some(FixtureTag::new(ObjectType::Solid)),
        );
        (body, fixture)
    }

    /// A static fixture of `object_type`.
    pub fn static_fixture(&mut self, object_type: ObjectType) -> (hecs::Entity, hecs::Entity) {
        let body = spawn_body(&mut self.world, Transform2D::identity(), RigidBody::new_static());
        let fixture = attach_fixture(
            &mut self.world,
            Collider::new(body, rect(1.0, 0.5)),
            Some(FixtureTag::new(object_type).with_owner(body)),
        );
        (body, fixture)
    }

    /// A smashable scripted enemy with one fixture.
    pub fn enemy(&mut self, walk_through: bool, damage: i32) -> (hecs::Entity, hecs::Entity, Arc<EnemyLog>) {
        let script = RecordingScript::default();
        let log = script.log.clone();
        let body = spawn_body(&mut self.world, Transform2D::identity(), RigidBody::new_dynamic(1.0));
        self.world
            .insert_one(body, ScriptedEnemy::new(script).smashable())
            .unwrap();
        let category = if walk_through {
            CATEGORY_ENEMY_WALK_THROUGH
        } else {
            CATEGORY_ENEMY_COLLIDE_WITH
        };
        let fixture = attach_fixture(
            &mut self.world,
            Collider::new(body, circle(0.4)).with_filter(CollisionFilter::category(category)),
            Some(
                FixtureTag::new(ObjectType::Enemy)
                    .with_owner(body)
                    .with_property("damage", damage),
            ),
        );
        (body, fixture, log)
    }

    pub fn contact(&self, a: hecs::Entity, b: hecs::Entity) -> Contact {
        Contact::between(&self.world, a, b).unwrap()
    }

    pub fn begin(&mut self, a: hecs::Entity, b: hecs::Entity) -> Contact {
        let mut contact = self.contact(a, b);
        self.classifier.begin_contact(&self.world, &mut contact);
        contact
    }

    pub fn end(&mut self, contact: &mut Contact) {
        self.classifier.end_contact(&self.world, contact);
    }

    pub fn process_events(&mut self) -> usize {
        self.classifier.process_events(&mut self.world)
    }
}
