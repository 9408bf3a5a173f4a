/// Projectile component living on the projectile's body entity.
///
/// The flags are set during contact callbacks and acted upon after the step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projectile {
    /// Sticky projectiles (arrows) stay in the world after a hit.
    pub sticky: bool,
    pub hit_something: bool,
    pub scheduled_for_removal: bool,
    /// Embedded in whatever it hit; the body should stop simulating.
    pub scheduled_for_inactivity: bool,
}

impl Projectile {
    pub fn new(sticky: bool) -> Self {
        Self {
            sticky,
            ..Default::default()
        }
    }
}
