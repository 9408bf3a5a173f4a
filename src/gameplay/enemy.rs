//! Scripted enemies.

use std::fmt;

/// Entry points of an enemy's behavior script.
pub trait EnemyScript: Send + Sync {
    /// Hit by a projectile.
    fn hit(&mut self, damage: i32);

    /// Stomped by the player. Called at most once per enemy.
    fn smashed(&mut self);
}

/// Enemy component living on the enemy's body entity.
pub struct ScriptedEnemy {
    /// Whether landing on this enemy smashes it.
    pub smashable: bool,
    smashed: bool,
    script: Box<dyn EnemyScript>,
}

impl ScriptedEnemy {
    pub fn new(script: impl EnemyScript + 'static) -> Self {
        Self {
            smashable: false,
            smashed: false,
            script: Box::new(script),
        }
    }

    pub fn smashable(mut self) -> Self {
        self.smashable = true;
        self
    }

    pub fn is_smashed(&self) -> bool {
        self.smashed
    }

    pub fn hit(&mut self, damage: i32) {
        self.script.hit(damage);
    }

    /// Smash the enemy. Returns `false` if it was already smashed.
    pub fn smash(&mut self) -> bool {
        if self.smashed {
            return false;
        }
        self.smashed = true;
        self.script.smashed();
        true
    }
}

impl fmt::Debug for ScriptedEnemy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedEnemy")
            .field("smashable", &self.smashable)
            .field("smashed", &self.smashed)
            .finish_non_exhaustive()
    }
}

/// A script that only tracks hit points.
#[derive(Debug, Clone, Default)]
pub struct HealthScript {
    pub health: i32,
}

impl HealthScript {
    pub fn new(health: i32) -> Self {
        Self { health }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }
}

impl EnemyScript for HealthScript {
    fn hit(&mut self, damage: i32) {
        self.health -= damage;
    }

    fn smashed(&mut self) {
        self.health = 0;
    }
}
