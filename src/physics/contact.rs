//! Contact data structures for collision response.

use std::collections::BTreeMap;

use glam::Vec2;

use crate::ecs::components::physics::Collider;

use super::filter::CollisionFilter;

/// Information about a single contact between two shapes.
#[derive(Debug, Clone, Copy)]
pub struct ContactInfo {
    /// Contact normal (from shape A to shape B).
    pub normal: Vec2,
    /// Penetration depth.
    pub penetration: f32,
    /// Contact point in world space.
    pub point: Vec2,
}

impl ContactInfo {
    /// The same contact seen from shape B.
    #[inline]
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// A single contact point with accumulated impulse data.
#[derive(Debug, Clone, Copy)]
pub struct ManifoldPoint {
    /// Contact position in world space.
    pub position: Vec2,
    /// Penetration depth.
    pub penetration: f32,
    /// Accumulated normal impulse.
    pub normal_impulse: f32,
    /// Accumulated tangent (friction) impulse.
    pub tangent_impulse: f32,
}

/// Contact points sharing one normal.
#[derive(Debug, Clone, Default)]
pub struct Manifold {
    /// Contact normal (from A to B).
    pub normal: Vec2,
    pub points: Vec<ManifoldPoint>,
}

impl Manifold {
    pub fn from_info(info: &ContactInfo) -> Self {
        Self {
            normal: info.normal,
            points: vec![ManifoldPoint {
                position: info.point,
                penetration: info.penetration,
                normal_impulse: 0.0,
                tangent_impulse: 0.0,
            }],
        }
    }
}

/// One side of a contact, as seen by contact listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureRef {
    pub fixture: hecs::Entity,
    pub body: hecs::Entity,
    pub is_sensor: bool,
    pub filter: CollisionFilter,
    /// Whether the fixture's shape is a chain (level geometry).
    pub is_chain: bool,
}

impl FixtureRef {
    pub fn new(fixture: hecs::Entity, collider: &Collider) -> Self {
        Self {
            fixture,
            body: collider.body,
            is_sensor: collider.is_sensor,
            filter: collider.filter,
            is_chain: collider.shape.is_chain(),
        }
    }

    /// Describe a fixture entity, if it still has a collider.
    pub fn of(world: &hecs::World, fixture: hecs::Entity) -> Option<Self> {
        let collider = world.get::<&Collider>(fixture).ok()?;
        Some(Self::new(fixture, &collider))
    }
}

/// Resolved impulses of one solved contact, one entry per manifold point.
#[derive(Debug, Clone, Default)]
pub struct ContactImpulse {
    pub normal_impulses: Vec<f32>,
    pub tangent_impulses: Vec<f32>,
}

/// A persistent contact between two fixtures.
///
/// Lives from the first step the fixtures touch until the first step they
/// don't. The `enabled` flag starts out `true` and is only ever changed by
/// contact listeners; the engine never refreshes it between steps.
#[derive(Debug, Clone)]
pub struct Contact {
    pub a: FixtureRef,
    pub b: FixtureRef,
    pub manifold: Manifold,
    /// Disabled contacts are kept and reported but not solved.
    pub enabled: bool,
    /// Target relative surface speed along the tangent (conveyor belts).
    pub tangent_speed: f32,
}

impl Contact {
    pub fn new(a: FixtureRef, b: FixtureRef) -> Self {
        Self {
            a,
            b,
            manifold: Manifold::default(),
            enabled: true,
            tangent_speed: 0.0,
        }
    }

    /// A fresh contact between two fixture entities, without a manifold.
    pub fn between(world: &hecs::World, a: hecs::Entity, b: hecs::Entity) -> Option<Self> {
        Some(Self::new(FixtureRef::of(world, a)?, FixtureRef::of(world, b)?))
    }

    /// Sensor contacts report overlap only.
    #[inline]
    pub fn is_sensor(&self) -> bool {
        self.a.is_sensor || self.b.is_sensor
    }

    #[inline]
    pub fn key(&self) -> ContactKey {
        ContactKey::new(self.a.fixture, self.b.fixture)
    }
}

/// Canonical fixture pair key (smaller entity first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactKey(pub hecs::Entity, pub hecs::Entity);

impl ContactKey {
    pub fn new(a: hecs::Entity, b: hecs::Entity) -> Self {
        if a < b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// All live contacts, keyed by fixture pair.
#[derive(Debug, Default)]
pub struct ContactSet {
    contacts: BTreeMap<ContactKey, Contact>,
}

impl ContactSet {
    pub fn new() -> Self {
        Self {
            contacts: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn get(&self, key: &ContactKey) -> Option<&Contact> {
        self.contacts.get(key)
    }

    pub fn get_mut(&mut self, key: &ContactKey) -> Option<&mut Contact> {
        self.contacts.get_mut(key)
    }

    pub fn insert(&mut self, contact: Contact) {
        self.contacts.insert(contact.key(), contact);
    }

    pub fn remove(&mut self, key: &ContactKey) -> Option<Contact> {
        self.contacts.remove(key)
    }

    pub fn keys(&self) -> Vec<ContactKey> {
        self.contacts.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Contact> {
        self.contacts.values_mut()
    }

    /// Keys of every contact one of whose fixtures is attached to `body`.
    pub fn keys_for_body(&self, body: hecs::Entity) -> Vec<ContactKey> {
        self.contacts
            .iter()
            .filter(|(_, c)| c.a.body == body || c.b.body == body)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Drop all contacts without notifying anyone.
    pub fn clear(&mut self) {
        self.contacts.clear();
    }
}
