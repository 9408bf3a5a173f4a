//! CPU 2D physics engine with persistent contacts and contact callbacks.
//!
//! # Architecture
//!
//! Each call to [`PhysicsWorld::step`] runs:
//!
//! 1. Apply forces (gravity)
//! 2. Integrate velocities
//! 3. Broadphase collision detection (sort-and-sweep)
//! 4. Narrowphase, updating the persistent [`ContactSet`] and firing
//!    `begin_contact` / `end_contact`
//! 5. `pre_solve` for touching non-sensor contacts
//! 6. Solve contact constraints (sequential impulse)
//! 7. `post_solve` with the resolved impulses
//! 8. Integrate positions and clear force accumulators
//!
//! The world is locked for the whole step. Listeners only get a shared
//! `&hecs::World`, so they can read and write component values but cannot
//! add or remove entities.

pub mod broadphase;
pub mod collider;
pub mod contact;
pub mod filter;
pub mod listener;
pub mod narrowphase;
pub mod rigid_body;
pub mod solver;

use std::collections::BTreeMap;

use glam::Vec2;
use tracing::debug;

use crate::ecs::bridge::fixtures_of;
use crate::ecs::components::physics::Collider;

use self::broadphase::{fixture_center, SweepAndPrune};
use self::contact::{Contact, ContactImpulse, ContactKey, ContactSet, FixtureRef, Manifold};
use self::listener::ContactListener;
use self::narrowphase::detect_collision;

/// Configuration for the physics simulation.
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector. Default: (0, -9.81).
    pub gravity: Vec2,
    /// Number of constraint solver iterations. Default: 8.
    pub solver_iterations: u32,
    /// Baumgarte stabilization factor. Default: 0.2.
    pub baumgarte: f32,
    /// Penetration allowed before position correction kicks in. Default: 0.005.
    pub penetration_slop: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            solver_iterations: 8,
            baumgarte: 0.2,
            penetration_slop: 0.005,
        }
    }
}

/// The physics world managing contact state between steps.
///
/// Bodies and fixtures live in the caller's `hecs::World`; this type only
/// owns what has to persist across steps.
#[derive(Debug)]
pub struct PhysicsWorld {
    config: PhysicsConfig,
    broadphase: SweepAndPrune,
    contacts: ContactSet,
    locked: bool,
}

impl PhysicsWorld {
    /// Create a new physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            broadphase: SweepAndPrune::new(),
            contacts: ContactSet::new(),
            locked: false,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// All currently touching fixture pairs.
    pub fn contacts(&self) -> &ContactSet {
        &self.contacts
    }

    /// Whether a step is in progress.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Advance the simulation by one fixed step of `dt` seconds.
    pub fn step<L: ContactListener>(&mut self, world: &mut hecs::World, dt: f32, listener: &mut L) {
        self.locked = true;

        rigid_body::apply_gravity(world, self.config.gravity);
        rigid_body::integrate_velocities(world, dt);

        let old_manifolds = self.update_contacts(world, listener);

        for contact in self.contacts.iter_mut() {
            if contact.is_sensor() {
                continue;
            }
            let old = old_manifolds.get(&contact.key()).cloned().unwrap_or_default();
            listener.pre_solve(world, contact, &old);
        }

        solver::solve_contacts(&mut self.contacts, world, &self.config, dt);

        for contact in self.contacts.iter() {
            if !solver::is_solvable(contact) {
                continue;
            }
            let impulse = ContactImpulse {
                normal_impulses: contact.manifold.points.iter().map(|p| p.normal_impulse).collect(),
                tangent_impulses: contact.manifold.points.iter().map(|p| p.tangent_impulse).collect(),
            };
            listener.post_solve(world, contact, &impulse);
        }

        rigid_body::integrate_positions(world, dt);
        rigid_body::clear_forces(world);

        self.locked = false;
    }

    /// Refresh the contact set from the current body positions.
    ///
    /// Returns the manifolds the surviving contacts had before this step.
    fn update_contacts<L: ContactListener>(
        &mut self,
        world: &hecs::World,
        listener: &mut L,
    ) -> BTreeMap<ContactKey, Manifold> {
        let mut touching = BTreeMap::new();
        for (f1, f2) in self.broadphase.find_pairs(world) {
            let key = ContactKey::new(f1, f2);
            if let Some(found) = touch(world, key) {
                touching.insert(key, found);
            }
        }

        // Ended contacts, including ones whose fixture or body went away
        for key in self.contacts.keys() {
            if touching.contains_key(&key) {
                continue;
            }
            if let Some(mut contact) = self.contacts.remove(&key) {
                if world.get::<&Collider>(key.0).is_err() || world.get::<&Collider>(key.1).is_err() {
                    debug!("fixture of contact {:?} vanished before end_contact", key);
                }
                listener.end_contact(world, &mut contact);
            }
        }

        let mut old_manifolds = BTreeMap::new();
        for (key, (a, b, manifold)) in touching {
            match self.contacts.get_mut(&key) {
                Some(contact) => {
                    let old = std::mem::replace(&mut contact.manifold, manifold);
                    old_manifolds.insert(key, old);
                }
                None => {
                    let mut contact = Contact::new(a, b);
                    contact.manifold = manifold;
                    listener.begin_contact(world, &mut contact);
                    self.contacts.insert(contact);
                }
            }
        }

        old_manifolds
    }

    /// Destroy a body and all of its fixtures.
    ///
    /// Every contact the body takes part in is ended first, firing
    /// `end_contact` so that listeners can unwind their state.
    pub fn destroy_body<L: ContactListener>(
        &mut self,
        world: &mut hecs::World,
        body: hecs::Entity,
        listener: &mut L,
    ) {
        for key in self.contacts.keys_for_body(body) {
            if let Some(mut contact) = self.contacts.remove(&key) {
                listener.end_contact(world, &mut contact);
            }
        }

        for fixture in fixtures_of(world, body) {
            let _ = world.despawn(fixture);
        }
        if world.despawn(body).is_err() {
            debug!("destroy_body: {:?} was already gone", body);
        }
    }

    /// Drop every contact without notifying anyone.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

/// Narrowphase test for the fixture pair `key`, in key order.
fn touch(world: &hecs::World, key: ContactKey) -> Option<(FixtureRef, FixtureRef, Manifold)> {
    let ca = world.get::<&Collider>(key.0).ok()?;
    let cb = world.get::<&Collider>(key.1).ok()?;
    let center_a = fixture_center(world, &ca)?;
    let center_b = fixture_center(world, &cb)?;

    let info = detect_collision(&ca.shape, center_a, &cb.shape, center_b)?;
    Some((
        FixtureRef::new(key.0, &ca),
        FixtureRef::new(key.1, &cb),
        Manifold::from_info(&info),
    ))
}
