//! What the contact layer tells the player about.

use tracing::debug;

/// Notifications the contact classifier sends to the player.
///
/// Velocity changes are not part of this trait: they go through the player's
/// `RigidBody` in the deferred phase, after the physics step.
pub trait PlayerHooks {
    /// Take `amount` points of damage.
    fn damage(&mut self, amount: i32);

    /// A hard impact (landing, getting hit) with the given normal impulse.
    fn impulse(&mut self, magnitude: f32);

    /// The static body the player last stood on.
    fn set_ground_body(&mut self, body: Option<hecs::Entity>);

    /// The moving platform or death block the player is touching.
    fn set_platform_body(&mut self, body: Option<hecs::Entity>);

    /// Surface speed of the conveyor belt under the player this tick.
    fn set_belt_velocity(&mut self, velocity: Option<f32>);
}

/// Stock player state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub health: i32,
    pub ground_body: Option<hecs::Entity>,
    pub platform_body: Option<hecs::Entity>,
    pub belt_velocity: Option<f32>,
    /// Strongest impact impulse seen since the last [`take_impact`](Self::take_impact).
    pub last_impact: Option<f32>,
}

impl PlayerState {
    pub fn new(health: i32) -> Self {
        Self {
            health,
            ground_body: None,
            platform_body: None,
            belt_velocity: None,
            last_impact: None,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn take_impact(&mut self) -> Option<f32> {
        self.last_impact.take()
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(100)
    }
}

impl PlayerHooks for PlayerState {
    fn damage(&mut self, amount: i32) {
        self.health = (self.health - amount).max(0);
        debug!("player took {} damage, health {}", amount, self.health);
    }

    fn impulse(&mut self, magnitude: f32) {
        self.last_impact = Some(self.last_impact.map_or(magnitude, |m| m.max(magnitude)));
    }

    fn set_ground_body(&mut self, body: Option<hecs::Entity>) {
        self.ground_body = body;
    }

    fn set_platform_body(&mut self, body: Option<hecs::Entity>) {
        self.platform_body = body;
    }

    fn set_belt_velocity(&mut self, velocity: Option<f32>) {
        self.belt_velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut player = PlayerState::new(15);
        player.damage(10);
        assert_eq!(player.health, 5);
        player.damage(10);
        assert_eq!(player.health, 0);
        assert!(player.is_dead());
    }

    #[test]
    fn test_impulse_keeps_strongest() {
        let mut player = PlayerState::default();
        player.impulse(0.5);
        player.impulse(2.0);
        player.impulse(1.0);
        assert_eq!(player.take_impact(), Some(2.0));
        assert_eq!(player.take_impact(), None);
    }
}
