/// Tuning values for contact handling.
///
/// Velocities and impulses use the physics world's units with y pointing up.
#[derive(Debug, Clone)]
pub struct ContactConfig {
    /// Player impulses below this are ordinary ground contact. Default: 0.03.
    pub player_impulse_threshold: f32,
    /// Sticky projectiles hitting harder than this embed and go inactive. Default: 0.0003.
    pub projectile_embed_threshold: f32,
    /// Downward speed the player needs to smash an enemy. Default: 1.0.
    pub smash_velocity: f32,
    /// Upward impulse the player gets after a smash. Default: 0.6.
    pub smash_impulse: f32,
    /// Seconds before a bouncer can fire again. Default: 0.3.
    pub bouncer_cooldown: f32,
    /// Impulse a bouncer applies along its alignment. Default: 0.6.
    pub bouncer_impulse: f32,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            player_impulse_threshold: 0.03,
            projectile_embed_threshold: 0.0003,
            smash_velocity: 1.0,
            smash_impulse: 0.6,
            bouncer_cooldown: 0.3,
            bouncer_impulse: 0.6,
        }
    }
}
