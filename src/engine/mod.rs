//! Fixed-timestep simulation driving physics and contact classification.
//!
//! [`Simulation`] is the explicit context object tying the ECS world, the
//! physics world and the [`ContactClassifier`] together. Each fixed tick runs:
//!
//! 1. `ContactClassifier::begin_tick`
//! 2. `PhysicsWorld::step` with the classifier as listener
//! 3. `ContactClassifier::process_events`
//! 4. Projectile cleanup (removal, embedding)
//! 5. Mechanism updates

use glam::Vec2;
use tracing::{debug, info};

use crate::contacts::{ContactClassifier, ContactConfig, FixtureTag};
use crate::ecs::bridge;
use crate::ecs::components::physics::{Collider, RigidBody};
use crate::ecs::components::transform::Transform2D;
use crate::gameplay::mechanisms::ContactReceiver;
use crate::gameplay::player::{PlayerHooks, PlayerState};
use crate::gameplay::projectile::Projectile;
use crate::physics::{PhysicsConfig, PhysicsWorld};

/// Game loop configuration.
#[derive(Debug, Clone)]
pub struct GameLoopConfig {
    /// Fixed timestep for physics (seconds). Default: 1/60.
    pub fixed_timestep: f64,
    /// Maximum physics substeps per frame. Default: 4.
    pub max_substeps: u32,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_substeps: 4,
        }
    }
}

/// A running level.
pub struct Simulation<P: PlayerHooks = PlayerState> {
    world: hecs::World,
    physics: PhysicsWorld,
    classifier: ContactClassifier<P>,
    config: GameLoopConfig,
    accumulator: f64,
    elapsed_time: f64,
}

impl<P: PlayerHooks> Simulation<P> {
    pub fn new(
        config: GameLoopConfig,
        physics: PhysicsConfig,
        contacts: ContactConfig,
        player: P,
    ) -> Self {
        Self {
            world: hecs::World::new(),
            physics: PhysicsWorld::new(physics),
            classifier: ContactClassifier::new(contacts, player),
            config,
            accumulator: 0.0,
            elapsed_time: 0.0,
        }
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    /// Mutable world access for level setup between ticks.
    pub fn world_mut(&mut self) -> &mut hecs::World {
        &mut self.world
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn classifier(&self) -> &ContactClassifier<P> {
        &self.classifier
    }

    pub fn classifier_mut(&mut self) -> &mut ContactClassifier<P> {
        &mut self.classifier
    }

    pub fn config(&self) -> &GameLoopConfig {
        &self.config
    }

    /// Simulated time in seconds.
    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn spawn_body(&mut self, position: Vec2, body: RigidBody) -> hecs::Entity {
        bridge::spawn_body(&mut self.world, Transform2D::from_position(position), body)
    }

    pub fn attach_fixture(&mut self, collider: Collider, tag: Option<FixtureTag>) -> hecs::Entity {
        bridge::attach_fixture(&mut self.world, collider, tag)
    }

    pub fn set_player(&mut self, body: Option<hecs::Entity>) {
        self.classifier.set_player(body);
    }

    /// Advance by a variable frame time, running as many fixed ticks as fit.
    ///
    /// Returns the number of ticks run. Time beyond `max_substeps` ticks is
    /// dropped.
    pub fn update(&mut self, delta_time: f64) -> u32 {
        self.accumulator += delta_time;
        let mut substeps = 0u32;
        while self.accumulator >= self.config.fixed_timestep && substeps < self.config.max_substeps {
            self.tick(self.config.fixed_timestep as f32);
            self.accumulator -= self.config.fixed_timestep;
            substeps += 1;
        }

        // Avoid spiral of death
        if substeps == self.config.max_substeps && self.accumulator >= self.config.fixed_timestep {
            debug!("dropping {:.4}s of simulation time", self.accumulator);
            self.accumulator = 0.0;
        }

        substeps
    }

    /// Run a single fixed tick of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed_time += f64::from(dt);
        self.classifier.begin_tick(self.elapsed_time as f32);

        self.physics.step(&mut self.world, dt, &mut self.classifier);
        self.classifier.process_events(&mut self.world);

        self.cleanup_projectiles();
        self.update_mechanisms(dt);
    }

    /// Embedded projectiles are frozen in place, the rest of the scheduled
    /// ones are destroyed.
    fn cleanup_projectiles(&mut self) {
        let mut doomed = Vec::new();
        let mut embedded = Vec::new();
        for (entity, projectile) in self.world.query::<&mut Projectile>().iter() {
            if projectile.scheduled_for_inactivity {
                projectile.scheduled_for_inactivity = false;
                projectile.scheduled_for_removal = false;
                embedded.push(entity);
            } else if projectile.scheduled_for_removal {
                doomed.push(entity);
            }
        }

        for entity in embedded {
            if let Ok(mut rb) = self.world.get::<&mut RigidBody>(entity) {
                rb.enabled = false;
                rb.linear_velocity = Vec2::ZERO;
            }
        }

        for entity in doomed {
            self.physics
                .destroy_body(&mut self.world, entity, &mut self.classifier);
        }
    }

    fn update_mechanisms(&mut self, dt: f32) {
        for (_, (receiver, rb)) in self.world.query_mut::<(&mut ContactReceiver, &mut RigidBody)>() {
            if let Some(enabled) = receiver.0.update(dt) {
                rb.enabled = enabled;
            }
        }
    }

    /// Drop every entity and contact and start from an empty level.
    ///
    /// Queued events survive; stale ones are skipped when processed.
    pub fn reload_level(&mut self) {
        info!("reloading level");
        self.world.clear();
        self.physics.clear();
        self.classifier.reset();
        self.classifier.set_player(None);
        self.accumulator = 0.0;
    }
}

impl Default for Simulation<PlayerState> {
    fn default() -> Self {
        Self::new(
            GameLoopConfig::default(),
            PhysicsConfig::default(),
            ContactConfig::default(),
            PlayerState::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::ObjectType;
    use crate::ecs::components::physics::ColliderShape;
    use crate::gameplay::mechanisms::CollapsingPlatform;

    fn ground(sim: &mut Simulation) -> hecs::Entity {
        let body = sim.spawn_body(Vec2::ZERO, RigidBody::new_static());
        sim.attach_fixture(
            Collider::new(
                body,
                ColliderShape::Chain {
                    points: vec![Vec2::new(-20.0, 0.0), Vec2::new(20.0, 0.0)],
                },
            ),
            Some(FixtureTag::new(ObjectType::Solid)),
        );
        body
    }

    #[test]
    fn test_game_loop_config_default() {
        let config = GameLoopConfig::default();
        assert!((config.fixed_timestep - 1.0 / 60.0).abs() < 1e-12);
        assert_eq!(config.max_substeps, 4);
    }

    #[test]
    fn test_update_runs_fixed_substeps() {
        let mut sim = Simulation::default();
        assert_eq!(sim.update(0.5 / 60.0), 0);
        assert_eq!(sim.update(1.0 / 60.0), 1);
        // capped, excess time dropped
        assert_eq!(sim.update(1.0), 4);
        assert_eq!(sim.update(0.0), 0);
        assert!((sim.elapsed_time() - 5.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_sticky_projectile_is_destroyed() {
        let mut sim = Simulation::default();
        ground(&mut sim);
        let bullet = sim.spawn_body(Vec2::new(0.0, 0.3), RigidBody::new_dynamic(0.1));
        sim.world_mut().insert_one(bullet, Projectile::new(false)).unwrap();
        let fixture = sim.attach_fixture(
            Collider::new(bullet, ColliderShape::Circle { radius: 0.1 }),
            Some(FixtureTag::new(ObjectType::Projectile)),
        );

        for _ in 0..30 {
            sim.tick(1.0 / 60.0);
        }

        assert!(!sim.world().contains(bullet));
        assert!(!sim.world().contains(fixture));
        assert!(sim.physics().contacts().is_empty());
    }

    #[test]
    fn test_sticky_projectile_embeds_in_ground() {
        let mut sim = Simulation::default();
        ground(&mut sim);
        let arrow = sim.spawn_body(Vec2::new(0.0, 0.3), RigidBody::new_dynamic(0.1));
        sim.world_mut().insert_one(arrow, Projectile::new(true)).unwrap();
        sim.attach_fixture(
            Collider::new(arrow, ColliderShape::Circle { radius: 0.1 }),
            Some(FixtureTag::new(ObjectType::Projectile)),
        );

        for _ in 0..30 {
            sim.tick(1.0 / 60.0);
        }

        let world = sim.world();
        assert!(world.contains(arrow));
        assert!(world.get::<&Projectile>(arrow).unwrap().hit_something);
        assert!(!world.get::<&RigidBody>(arrow).unwrap().enabled);
        assert!(sim.physics().contacts().is_empty());
    }

    #[test]
    fn test_collapsing_platform_disables_body() {
        let mut sim = Simulation::default();
        let platform = sim.spawn_body(Vec2::ZERO, RigidBody::new_static());
        sim.world_mut()
            .insert_one(platform, ContactReceiver::new(CollapsingPlatform::new(0.5)))
            .unwrap();
        sim.attach_fixture(
            Collider::new(
                platform,
                ColliderShape::Rect {
                    half_extents: Vec2::new(2.0, 0.25),
                },
            ),
            Some(FixtureTag::new(ObjectType::CollapsingPlatform)),
        );
        let crate_body = sim.spawn_body(Vec2::new(0.0, 0.7), RigidBody::new_dynamic(1.0));
        sim.attach_fixture(
            Collider::new(crate_body, ColliderShape::Circle { radius: 0.5 }),
            Some(FixtureTag::new(ObjectType::MoveableBox)),
        );

        for _ in 0..20 {
            sim.tick(1.0 / 60.0);
        }
        assert!(sim.world().get::<&RigidBody>(platform).unwrap().enabled);

        for _ in 0..40 {
            sim.tick(1.0 / 60.0);
        }
        assert!(!sim.world().get::<&RigidBody>(platform).unwrap().enabled);
    }

    #[test]
    fn test_reload_level_resets_state() {
        let mut sim = Simulation::default();
        ground(&mut sim);
        let player = sim.spawn_body(Vec2::new(0.0, 0.6), RigidBody::new_dynamic(1.0));
        sim.attach_fixture(
            Collider::new(player, ColliderShape::Circle { radius: 0.2 })
                .with_offset(Vec2::new(0.0, -0.5))
                .sensor(),
            Some(FixtureTag::new(ObjectType::PlayerFootSensor)),
        );
        sim.set_player(Some(player));

        sim.tick(1.0 / 60.0);
        assert_eq!(sim.classifier().foot_contacts(), 1);

        sim.reload_level();
        assert_eq!(sim.classifier().foot_contacts(), 0);
        assert_eq!(sim.classifier().player_body(), None);
        assert!(sim.physics().contacts().is_empty());
        assert_eq!(sim.world().len(), 0);
    }
}
