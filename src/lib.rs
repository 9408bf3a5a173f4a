//! Ledge
//!
//! Contact classification and deferred event arbitration for 2D platformers.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **ecs** - hecs components for bodies and fixtures, spawn helpers
//! 2. **physics** - Small 2D rigid-body engine with persistent contacts and
//!    a [`ContactListener`](physics::listener::ContactListener) callback trait
//! 3. **gameplay** - Player, enemies, projectiles and level mechanisms
//! 4. **contacts** - The [`ContactClassifier`] listener: sensor counters,
//!    one-way walls, impulse checks and the deferred event queue
//! 5. **engine** - Fixed-timestep [`Simulation`] wiring it all together

pub mod contacts;
pub mod ecs;
pub mod engine;
pub mod gameplay;
pub mod physics;

// Re-export commonly used types
pub use contacts::{
    ContactClassifier, ContactConfig, ContactError, DeferredEvent, DeferredEventQueue,
    FixtureFlags, FixtureTag, ObjectType, OneWayWallGate, SensorStateCounters,
};

pub use ecs::prelude::*;

pub use engine::{GameLoopConfig, Simulation};

pub use gameplay::{PlayerHooks, PlayerState, Projectile, ScriptedEnemy};

pub use physics::{PhysicsConfig, PhysicsWorld};

// Re-export glam and hecs for convenience
pub use glam;
pub use hecs;
