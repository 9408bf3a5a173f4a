//! Contact callbacks fired from inside [`PhysicsWorld::step`](super::PhysicsWorld::step).
//!
//! Callbacks receive a shared `&hecs::World`: component values can be read and,
//! through hecs' dynamic borrow checking, written, but nothing can be spawned
//! or despawned while the step holds the world. Structural changes have to be
//! queued and applied after the step returns.

use super::contact::{Contact, ContactImpulse, Manifold};

/// Receives contact notifications for every touching fixture pair.
///
/// `begin_contact` always precedes `end_contact` for a pair; `pre_solve` and
/// `post_solve` only happen between the two, for non-sensor contacts. The
/// relative order of notifications for different pairs is unspecified.
pub trait ContactListener {
    /// Two fixtures started touching.
    fn begin_contact(&mut self, _world: &hecs::World, _contact: &mut Contact) {}

    /// Two fixtures stopped touching, or one of them is being destroyed.
    fn end_contact(&mut self, _world: &hecs::World, _contact: &mut Contact) {}

    /// Called before the solver runs on a touching non-sensor contact.
    fn pre_solve(&mut self, _world: &hecs::World, _contact: &mut Contact, _old_manifold: &Manifold) {}

    /// Called after the solver, with the impulses it resolved.
    fn post_solve(&mut self, _world: &hecs::World, _contact: &Contact, _impulse: &ContactImpulse) {}
}

/// Listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl ContactListener for NoopListener {}
