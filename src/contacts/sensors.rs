//! Begin/end contact counters answering "is the player grounded, blocked, touching X".

use tracing::{debug, warn};

use crate::physics::filter::CollisionFilter;

/// A counted contact category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorCategory {
    Foot,
    Head,
    /// Head contacts with fixtures that are neither friendly nor walk-through.
    HeadColliding,
    ArmLeft,
    ArmLeftColliding,
    ArmRight,
    ArmRightColliding,
    Player,
    MovingPlatform,
    DeathBlock,
    Deadly,
}

const CATEGORY_COUNT: usize = 11;

impl SensorCategory {
    pub const ALL: [SensorCategory; CATEGORY_COUNT] = [
        SensorCategory::Foot,
        SensorCategory::Head,
        SensorCategory::HeadColliding,
        SensorCategory::ArmLeft,
        SensorCategory::ArmLeftColliding,
        SensorCategory::ArmRight,
        SensorCategory::ArmRightColliding,
        SensorCategory::Player,
        SensorCategory::MovingPlatform,
        SensorCategory::DeathBlock,
        SensorCategory::Deadly,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// The "colliding" counterpart of a head or arm category.
    pub fn colliding(self) -> Option<SensorCategory> {
        match self {
            SensorCategory::Head => Some(SensorCategory::HeadColliding),
            SensorCategory::ArmLeft => Some(SensorCategory::ArmLeftColliding),
            SensorCategory::ArmRight => Some(SensorCategory::ArmRightColliding),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SensorCategory::Foot => "foot",
            SensorCategory::Head => "head",
            SensorCategory::HeadColliding => "head colliding",
            SensorCategory::ArmLeft => "left arm",
            SensorCategory::ArmLeftColliding => "left arm colliding",
            SensorCategory::ArmRight => "right arm",
            SensorCategory::ArmRightColliding => "right arm colliding",
            SensorCategory::Player => "player",
            SensorCategory::MovingPlatform => "moving platform",
            SensorCategory::DeathBlock => "death block",
            SensorCategory::Deadly => "deadly",
        }
    }
}

/// Contact counters for every [`SensorCategory`], plus the "player smashed" flag.
///
/// Each counter equals the number of begin notifications minus the number of
/// end notifications seen since the last [`reset`](Self::reset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SensorStateCounters {
    counts: [i32; CATEGORY_COUNT],
    smashed: bool,
}

impl SensorStateCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, category: SensorCategory) {
        self.counts[category.index()] += 1;
    }

    pub fn decrement(&mut self, category: SensorCategory) {
        let count = &mut self.counts[category.index()];
        *count -= 1;
        if *count < 0 {
            warn!(
                "{} contact count dropped to {} (unpaired end contact)",
                category.name(),
                *count
            );
        }
    }

    /// Count a head or arm contact, and its colliding counterpart unless the
    /// other fixture is a harmless overlap.
    pub fn begin_blocking(&mut self, category: SensorCategory, other: &CollisionFilter) {
        self.increment(category);
        if let Some(colliding) = category.colliding() {
            if !other.is_harmless() {
                self.increment(colliding);
            }
        }
    }

    /// Undo [`begin_blocking`](Self::begin_blocking).
    pub fn end_blocking(&mut self, category: SensorCategory, other: &CollisionFilter) {
        self.decrement(category);
        if let Some(colliding) = category.colliding() {
            if !other.is_harmless() {
                self.decrement(colliding);
            }
        }
    }

    #[inline]
    pub fn get(&self, category: SensorCategory) -> i32 {
        self.counts[category.index()]
    }

    pub fn foot_contacts(&self) -> i32 {
        self.get(SensorCategory::Foot)
    }

    pub fn head_contacts(&self) -> i32 {
        self.get(SensorCategory::Head)
    }

    pub fn head_contacts_colliding(&self) -> i32 {
        self.get(SensorCategory::HeadColliding)
    }

    pub fn arm_left_contacts(&self) -> i32 {
        self.get(SensorCategory::ArmLeft)
    }

    pub fn arm_left_contacts_colliding(&self) -> i32 {
        self.get(SensorCategory::ArmLeftColliding)
    }

    pub fn arm_right_contacts(&self) -> i32 {
        self.get(SensorCategory::ArmRight)
    }

    pub fn arm_right_contacts_colliding(&self) -> i32 {
        self.get(SensorCategory::ArmRightColliding)
    }

    pub fn player_contacts(&self) -> i32 {
        self.get(SensorCategory::Player)
    }

    pub fn moving_platform_contacts(&self) -> i32 {
        self.get(SensorCategory::MovingPlatform)
    }

    pub fn death_block_contacts(&self) -> i32 {
        self.get(SensorCategory::DeathBlock)
    }

    pub fn deadly_contacts(&self) -> i32 {
        self.get(SensorCategory::Deadly)
    }

    pub fn is_on_ground(&self) -> bool {
        self.foot_contacts() > 0
    }

    pub fn is_smashed(&self) -> bool {
        self.smashed
    }

    pub fn set_smashed(&mut self) {
        self.smashed = true;
    }

    /// Zero every counter and clear the smashed flag.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Dump all counters at debug level.
    pub fn debug(&self) {
        for category in SensorCategory::ALL {
            debug!("{} contacts: {}", category.name(), self.get(category));
        }
        debug!("player smashed: {}", self.smashed);
    }
}
