//! Gameplay objects the contact layer talks to.

pub mod enemy;
pub mod mechanisms;
pub mod player;
pub mod projectile;

pub use enemy::{EnemyScript, HealthScript, ScriptedEnemy};
pub use mechanisms::{
    Activatable, Activator, Alignment, Bouncer, BubbleCube, CollapsingPlatform, ContactReceiver,
    ContactSink, ConveyorBelt,
};
pub use player::{PlayerHooks, PlayerState};
pub use projectile::Projectile;
