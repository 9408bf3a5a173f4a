//! Contact classification and deferred gameplay effects.
//!
//! [`ContactClassifier`] is the [`ContactListener`](crate::physics::listener::ContactListener)
//! the simulation hands to the physics step. During the step it:
//!
//! - keeps [`SensorStateCounters`] up to date (foot, head, arms, hazards...),
//! - gates one-way walls through [`OneWayWallGate`],
//! - turns post-solve impulses into impacts via [`ImpulseEvaluator`],
//! - queues anything that would touch physics state on the
//!   [`DeferredEventQueue`].
//!
//! After the step, [`ContactClassifier::process_events`] drains the queue.

pub mod classifier;
pub mod config;
pub mod error;
pub mod events;
pub mod impulse;
pub mod one_way_wall;
pub mod sensors;
pub mod tag;

pub use classifier::ContactClassifier;
pub use config::ContactConfig;
pub use error::ContactError;
pub use events::{DeferredEvent, DeferredEventQueue, EventContext};
pub use impulse::{ImpulseEvaluator, ProjectileImpact};
pub use one_way_wall::OneWayWallGate;
pub use sensors::{SensorCategory, SensorStateCounters};
pub use tag::{CollisionCallback, FixtureFlags, FixtureTag, ObjectType, PropertyValue};
