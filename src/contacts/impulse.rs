//! Post-solve impulse checks.
//!
//! Only the first manifold point's normal impulse is looked at.

use crate::gameplay::projectile::Projectile;

use super::config::ContactConfig;

/// What a projectile impact did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileImpact {
    /// Not sticky, or already handled.
    Ignored,
    /// Stuck and scheduled for removal.
    Hit,
    /// Hit hard enough to embed; also scheduled for inactivity.
    Embedded,
}

/// Turns resolved contact impulses into gameplay effects.
#[derive(Debug, Clone, Copy)]
pub struct ImpulseEvaluator {
    player_threshold: f32,
    embed_threshold: f32,
}

impl ImpulseEvaluator {
    pub fn new(config: &ContactConfig) -> Self {
        Self {
            player_threshold: config.player_impulse_threshold,
            embed_threshold: config.projectile_embed_threshold,
        }
    }

    /// The impulse to forward to the player, or `None` for ordinary ground contact.
    pub fn player_impact(&self, impulse: f32) -> Option<f32> {
        (impulse >= self.player_threshold).then_some(impulse)
    }

    /// Apply a post-solve impulse to a sticky projectile.
    ///
    /// The first call marks the hit; later calls for the same projectile do
    /// nothing.
    pub fn projectile_impact(&self, projectile: &mut Projectile, impulse: f32) -> ProjectileImpact {
        if !projectile.sticky || projectile.hit_something {
            return ProjectileImpact::Ignored;
        }

        projectile.hit_something = true;
        projectile.scheduled_for_removal = true;

        if impulse > self.embed_threshold {
            projectile.scheduled_for_inactivity = true;
            ProjectileImpact::Embedded
        } else {
            ProjectileImpact::Hit
        }
    }
}

impl Default for ImpulseEvaluator {
    fn default() -> Self {
        Self::new(&ContactConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_threshold() {
        let evaluator = ImpulseEvaluator::default();
        assert_eq!(evaluator.player_impact(0.01), None);
        assert_eq!(evaluator.player_impact(0.029), None);
        assert_eq!(evaluator.player_impact(0.03), Some(0.03));
        assert_eq!(evaluator.player_impact(1.5), Some(1.5));
    }

    #[test]
    fn test_sticky_projectile_is_one_shot() {
        let evaluator = ImpulseEvaluator::default();
        let mut arrow = Projectile::new(true);

        assert_eq!(evaluator.projectile_impact(&mut arrow, 0.0001), ProjectileImpact::Hit);
        assert!(arrow.hit_something);
        assert!(arrow.scheduled_for_removal);
        assert!(!arrow.scheduled_for_inactivity);

        // a harder follow-up impulse no longer embeds it
        assert_eq!(evaluator.projectile_impact(&mut arrow, 1.0), ProjectileImpact::Ignored);
        assert!(!arrow.scheduled_for_inactivity);
    }

    #[test]
    fn test_hard_hit_embeds() {
        let evaluator = ImpulseEvaluator::default();
        let mut arrow = Projectile::new(true);
        assert_eq!(evaluator.projectile_impact(&mut arrow, 0.5), ProjectileImpact::Embedded);
        assert!(arrow.scheduled_for_inactivity);
    }

    #[test]
    fn test_plain_projectile_ignored() {
        let evaluator = ImpulseEvaluator::default();
        let mut bullet = Projectile::new(false);
        assert_eq!(evaluator.projectile_impact(&mut bullet, 1.0), ProjectileImpact::Ignored);
        assert_eq!(bullet, Projectile::new(false));
    }
}
