//! Gate for solids that only block from above.

use std::collections::BTreeSet;

use glam::Vec2;

use crate::physics::contact::{Contact, ContactKey};

/// Decides, once per overlap, whether a one-way-wall contact is solid.
///
/// The decision is made at begin-contact and stored in the contact's
/// `enabled` flag. The physics engine never refreshes that flag, so a contact
/// disabled while jumping up stays disabled until the overlap ends, even if
/// the mover starts falling in between.
#[derive(Debug, Default)]
pub struct OneWayWallGate {
    active: BTreeSet<ContactKey>,
}

impl OneWayWallGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate a new contact between a one-way wall and a mover.
    ///
    /// Head sensors never make the wall solid. Anything else does only when
    /// it is moving down.
    pub fn begin_contact(&mut self, contact: &mut Contact, mover_is_head_sensor: bool, mover_velocity: Vec2) {
        contact.enabled = !mover_is_head_sensor && mover_velocity.y < 0.0;
        self.active.insert(contact.key());
    }

    /// Re-enable the contact so the next overlap starts from the default.
    pub fn end_contact(&mut self, contact: &mut Contact) {
        contact.enabled = true;
        self.active.remove(&contact.key());
    }

    /// Whether any gated contact is currently active.
    pub fn has_contacts(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}
