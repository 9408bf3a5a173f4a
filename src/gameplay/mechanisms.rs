//! Level mechanisms reacting to contacts.
//!
//! The classifier never needs to know a mechanism's concrete type. It talks
//! to two capabilities stored on the mechanism's entity: [`Activator`] for
//! things that fire once on touch, and [`ContactReceiver`] for things that
//! track who is touching them.

use std::fmt;

use glam::Vec2;

use crate::contacts::ContactConfig;

/// Something that fires when touched.
pub trait Activatable: Send + Sync {
    /// Fire at time `now` (seconds). Returns the impulse to apply to the
    /// activating body, or `None` if nothing happens.
    fn activate(&mut self, now: f32) -> Option<Vec2>;
}

/// Something that follows begin/end contacts of other bodies.
pub trait ContactSink: Send + Sync {
    fn begin_contact(&mut self, _other: hecs::Entity) {}

    fn end_contact(&mut self, _other: hecs::Entity) {}

    /// Relative speed this surface imposes on bodies touching it.
    fn surface_speed(&self) -> Option<f32> {
        None
    }

    /// Advance by `dt` seconds. Returns the enabled state the mechanism's
    /// body should switch to, if it changed.
    fn update(&mut self, _dt: f32) -> Option<bool> {
        None
    }
}

/// Capability component for [`Activatable`] mechanisms.
pub struct Activator(pub Box<dyn Activatable>);

impl Activator {
    pub fn new(mechanism: impl Activatable + 'static) -> Self {
        Self(Box::new(mechanism))
    }
}

impl fmt::Debug for Activator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Activator")
    }
}

/// Capability component for [`ContactSink`] mechanisms.
pub struct ContactReceiver(pub Box<dyn ContactSink>);

impl ContactReceiver {
    pub fn new(mechanism: impl ContactSink + 'static) -> Self {
        Self(Box::new(mechanism))
    }
}

impl fmt::Debug for ContactReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ContactReceiver")
    }
}

/// Direction a bouncer pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    PointsUp,
    PointsDown,
    PointsLeft,
    PointsRight,
    PointsNowhere,
}

impl Alignment {
    pub fn direction(self) -> Vec2 {
        match self {
            Alignment::PointsUp => Vec2::Y,
            Alignment::PointsDown => Vec2::NEG_Y,
            Alignment::PointsLeft => Vec2::NEG_X,
            Alignment::PointsRight => Vec2::X,
            Alignment::PointsNowhere => Vec2::ZERO,
        }
    }
}

/// Spring pad that kicks the player along its alignment.
#[derive(Debug, Clone)]
pub struct Bouncer {
    pub alignment: Alignment,
    /// Seconds between activations.
    pub cooldown: f32,
    pub impulse: f32,
    last_activation: Option<f32>,
}

impl Bouncer {
    pub fn new(alignment: Alignment, cooldown: f32, impulse: f32) -> Self {
        Self {
            alignment,
            cooldown,
            impulse,
            last_activation: None,
        }
    }

    /// A bouncer with the level-wide cooldown and impulse.
    pub fn from_config(alignment: Alignment, config: &ContactConfig) -> Self {
        Self::new(alignment, config.bouncer_cooldown, config.bouncer_impulse)
    }
}

impl Activatable for Bouncer {
    fn activate(&mut self, now: f32) -> Option<Vec2> {
        if let Some(last) = self.last_activation {
            if now - last < self.cooldown {
                return None;
            }
        }
        self.last_activation = Some(now);
        Some(self.alignment.direction() * self.impulse)
    }
}

/// Belt moving everything on it along x.
#[derive(Debug, Clone)]
pub struct ConveyorBelt {
    pub velocity: f32,
    pub enabled: bool,
}

impl ConveyorBelt {
    pub fn new(velocity: f32) -> Self {
        Self {
            velocity,
            enabled: true,
        }
    }
}

impl ContactSink for ConveyorBelt {
    fn surface_speed(&self) -> Option<f32> {
        self.enabled.then_some(self.velocity)
    }
}

/// Block that pops while something stands on it.
#[derive(Debug, Clone, Default)]
pub struct BubbleCube {
    contacts: i32,
}

impl BubbleCube {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_occupied(&self) -> bool {
        self.contacts > 0
    }
}

impl ContactSink for BubbleCube {
    fn begin_contact(&mut self, _other: hecs::Entity) {
        self.contacts += 1;
    }

    fn end_contact(&mut self, _other: hecs::Entity) {
        self.contacts -= 1;
    }
}

/// Platform that collapses after being stood on for a while.
#[derive(Debug, Clone)]
pub struct CollapsingPlatform {
    /// Seconds of contact before the platform gives way.
    pub collapse_time: f32,
    contacts: i32,
    elapsed: f32,
    collapsed: bool,
}

impl CollapsingPlatform {
    pub fn new(collapse_time: f32) -> Self {
        Self {
            collapse_time,
            contacts: 0,
            elapsed: 0.0,
            collapsed: false,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn contact_count(&self) -> i32 {
        self.contacts
    }
}

impl Default for CollapsingPlatform {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl ContactSink for CollapsingPlatform {
    fn begin_contact(&mut self, _other: hecs::Entity) {
        if !self.collapsed {
            self.contacts += 1;
        }
    }

    fn end_contact(&mut self, _other: hecs::Entity) {
        if !self.collapsed {
            self.contacts -= 1;
        }
    }

    fn update(&mut self, dt: f32) -> Option<bool> {
        if self.collapsed {
            return None;
        }
        if self.contacts > 0 {
            self.elapsed += dt;
            if self.elapsed > self.collapse_time {
                self.collapsed = true;
                return Some(false);
            }
        } else {
            self.elapsed = 0.0;
        }
        None
    }
}
