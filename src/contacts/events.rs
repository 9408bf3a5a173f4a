//! Gameplay effects deferred until the physics step has returned.

use std::collections::HashSet;

use glam::Vec2;
use tracing::debug;

use crate::ecs::components::physics::RigidBody;
use crate::gameplay::enemy::ScriptedEnemy;
use crate::gameplay::player::PlayerHooks;

use super::config::ContactConfig;
use super::error::ContactError;

/// An effect queued from inside a contact callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredEvent {
    /// An enemy touched the player.
    Damage { enemy: hecs::Entity, damage: i32 },
    /// The player landed on a smashable enemy.
    Smash { enemy: hecs::Entity },
    /// A mechanism kicked `body`.
    Bounce { body: hecs::Entity, impulse: Vec2 },
}

/// Everything the deferred phase needs to touch.
pub struct EventContext<'a, P: PlayerHooks> {
    pub world: &'a mut hecs::World,
    pub player: &'a mut P,
    pub player_body: Option<hecs::Entity>,
    pub config: &'a ContactConfig,
}

/// FIFO of deferred effects, drained once per tick.
#[derive(Debug, Default)]
pub struct DeferredEventQueue {
    events: Vec<DeferredEvent>,
}

impl DeferredEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event. No deduplication happens here.
    pub fn enqueue(&mut self, event: DeferredEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeferredEvent> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Run all queued events and leave the queue empty.
    ///
    /// Damage from an enemy that is smashed in the same batch is dropped.
    /// Everything else runs in the order it was queued. Events that fail (for
    /// example because their entity is gone) are logged and skipped. Returns
    /// the number of events that ran successfully.
    pub fn process<P: PlayerHooks>(&mut self, ctx: &mut EventContext<'_, P>) -> usize {
        let events = std::mem::take(&mut self.events);

        let smashed: HashSet<hecs::Entity> = events
            .iter()
            .filter_map(|event| match event {
                DeferredEvent::Smash { enemy } => Some(*enemy),
                _ => None,
            })
            .collect();

        let mut executed = 0;
        for event in events {
            if let DeferredEvent::Damage { enemy, .. } = event {
                if smashed.contains(&enemy) {
                    debug!("dropping damage from smashed enemy {:?}", enemy);
                    continue;
                }
            }

            match execute(&event, ctx) {
                Ok(()) => executed += 1,
                Err(err) => debug!("skipping {:?}: {}", event, err),
            }
        }

        executed
    }
}

fn execute<P: PlayerHooks>(event: &DeferredEvent, ctx: &mut EventContext<'_, P>) -> Result<(), ContactError> {
    match *event {
        DeferredEvent::Damage { enemy, damage } => {
            if !ctx.world.contains(enemy) {
                return Err(ContactError::StaleEntity(enemy));
            }
            ctx.player.damage(damage);
            Ok(())
        }
        DeferredEvent::Smash { enemy } => {
            let fired = ctx
                .world
                .get::<&mut ScriptedEnemy>(enemy)
                .map_err(|e| ContactError::lookup(enemy, "ScriptedEnemy", e))?
                .smash();
            if !fired {
                return Ok(());
            }
            let body = ctx.player_body.ok_or(ContactError::NoPlayerBody)?;
            bounce(ctx.world, body, Vec2::Y * ctx.config.smash_impulse)
        }
        DeferredEvent::Bounce { body, impulse } => bounce(ctx.world, body, impulse),
    }
}

/// Zero the vertical velocity of `body`, then apply `impulse`.
fn bounce(world: &mut hecs::World, body: hecs::Entity, impulse: Vec2) -> Result<(), ContactError> {
    let mut rb = world
        .get::<&mut RigidBody>(body)
        .map_err(|e| ContactError::lookup(body, "RigidBody", e))?;
    rb.linear_velocity.y = 0.0;
    rb.apply_linear_impulse(impulse);
    Ok(())
}
