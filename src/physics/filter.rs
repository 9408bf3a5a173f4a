//! Collision filtering with category/mask bits and groups.
//!
//! Two fixtures collide iff they are not in the same non-zero group with a
//! negative index, and each one's category is accepted by the other's mask.
//! A shared positive group index always collides.

/// Level geometry.
pub const CATEGORY_BOUNDARY: u16 = 0x01;
/// Objects that never hurt or block the player in a meaningful way.
pub const CATEGORY_FRIENDLY: u16 = 0x02;
/// Enemies the player walks through.
pub const CATEGORY_ENEMY_WALK_THROUGH: u16 = 0x04;
/// Enemies the player collides with and can stand on.
pub const CATEGORY_ENEMY_COLLIDE_WITH: u16 = 0x08;

/// Per-fixture collision filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    /// Which categories this fixture belongs to.
    pub category_bits: u16,
    /// Which categories this fixture accepts collisions with.
    pub mask_bits: u16,
    /// Non-zero groups override the bits: positive always collides, negative never does.
    pub group_index: i16,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category_bits: CATEGORY_BOUNDARY,
            mask_bits: u16::MAX,
            group_index: 0,
        }
    }
}

impl CollisionFilter {
    /// Create a filter from category and mask bits.
    #[inline]
    pub const fn new(category_bits: u16, mask_bits: u16) -> Self {
        Self {
            category_bits,
            mask_bits,
            group_index: 0,
        }
    }

    /// Filter with the given category that accepts everything.
    #[inline]
    pub const fn category(category_bits: u16) -> Self {
        Self::new(category_bits, u16::MAX)
    }

    /// Returns a copy with the given group index.
    #[inline]
    pub const fn with_group(mut self, group_index: i16) -> Self {
        self.group_index = group_index;
        self
    }

    /// Check whether two fixtures with these filters should generate contacts.
    #[inline]
    pub fn should_collide(&self, other: &CollisionFilter) -> bool {
        if self.group_index == other.group_index && self.group_index != 0 {
            return self.group_index > 0;
        }
        (self.mask_bits & other.category_bits) != 0 && (self.category_bits & other.mask_bits) != 0
    }

    /// Whether the category marks a harmless overlap (friendly or walk-through).
    #[inline]
    pub fn is_harmless(&self) -> bool {
        self.category_bits & (CATEGORY_FRIENDLY | CATEGORY_ENEMY_WALK_THROUGH) != 0
    }

    /// Whether the category marks an enemy that is solid to the player.
    #[inline]
    pub fn is_enemy_collide_with(&self) -> bool {
        self.category_bits & CATEGORY_ENEMY_COLLIDE_WITH != 0
    }
}
