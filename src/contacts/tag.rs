//! Per-fixture gameplay metadata.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;

/// What a fixture represents to the contact classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Invalid,
    Player,
    PlayerFootSensor,
    PlayerHeadSensor,
    PlayerLeftArmSensor,
    PlayerRightArmSensor,
    Enemy,
    Projectile,
    Bouncer,
    Crusher,
    ConveyorBelt,
    DeathBlock,
    /// Spikes, lasers and other instant hazards.
    Deadly,
    MovingPlatform,
    BubbleCube,
    CollapsingPlatform,
    Door,
    Solid,
    SolidOneWay,
    MoveableBox,
}

bitflags! {
    /// Boolean fixture properties.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FixtureFlags: u8 {
        const HEAD_SENSOR = 1 << 0;
    }
}

impl FixtureFlags {
    /// Flags implied by an object type.
    pub fn for_type(object_type: ObjectType) -> Self {
        match object_type {
            ObjectType::PlayerHeadSensor => Self::HEAD_SENSOR,
            _ => Self::empty(),
        }
    }
}

/// A value in a fixture's property map.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Int(i32),
    Float(f32),
    Bool(bool),
    Text(String),
}

impl PropertyValue {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for PropertyValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// Called with the player's body when the tagged fixture touches the player.
pub type CollisionCallback = Arc<dyn Fn(hecs::Entity) + Send + Sync>;

/// Gameplay metadata attached to a fixture entity.
///
/// `owner` is the gameplay object (usually the body entity) that created the
/// fixture. It is a plain id: a despawned owner simply fails to resolve.
#[derive(Clone)]
pub struct FixtureTag {
    pub object_type: ObjectType,
    pub owner: Option<hecs::Entity>,
    pub flags: FixtureFlags,
    pub properties: HashMap<String, PropertyValue>,
    pub on_player_collision: Option<CollisionCallback>,
}

impl FixtureTag {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_type,
            owner: None,
            flags: FixtureFlags::for_type(object_type),
            properties: HashMap::new(),
            on_player_collision: None,
        }
    }

    pub fn with_owner(mut self, owner: hecs::Entity) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn with_flags(mut self, flags: FixtureFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.to_owned(), value.into());
        self
    }

    pub fn with_collision_callback(mut self, callback: impl Fn(hecs::Entity) + Send + Sync + 'static) -> Self {
        self.on_player_collision = Some(Arc::new(callback));
        self
    }

    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn int_property(&self, key: &str) -> Option<i32> {
        self.property(key).and_then(PropertyValue::as_int)
    }

    #[inline]
    pub fn is_head_sensor(&self) -> bool {
        self.flags.contains(FixtureFlags::HEAD_SENSOR)
    }

    /// Run the collision callback, if any.
    pub fn collision_with_player(&self, player_body: hecs::Entity) {
        if let Some(callback) = &self.on_player_collision {
            callback(player_body);
        }
    }
}

impl fmt::Debug for FixtureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureTag")
            .field("object_type", &self.object_type)
            .field("owner", &self.owner)
            .field("flags", &self.flags)
            .field("properties", &self.properties)
            .field("on_player_collision", &self.on_player_collision.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_head_sensor_flag_follows_type() {
        assert!(FixtureTag::new(ObjectType::PlayerHeadSensor).is_head_sensor());
        assert!(!FixtureTag::new(ObjectType::Player).is_head_sensor());
        assert!(FixtureTag::new(ObjectType::Player)
            .with_flags(FixtureFlags::HEAD_SENSOR)
            .is_head_sensor());
    }

    #[test]
    fn test_properties() {
        let tag = FixtureTag::new(ObjectType::Projectile)
            .with_property("damage", 10)
            .with_property("sticky", true);
        assert_eq!(tag.int_property("damage"), Some(10));
        assert_eq!(tag.int_property("sticky"), None);
        assert_eq!(tag.property("sticky"), Some(&PropertyValue::Bool(true)));
        assert_eq!(tag.int_property("missing"), None);
    }

    #[test]
    fn test_collision_callback() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let tag = FixtureTag::new(ObjectType::Enemy).with_collision_callback(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let mut world = hecs::World::new();
        let player = world.spawn(());
        tag.collision_with_player(player);
        FixtureTag::new(ObjectType::Enemy).collision_with_player(player);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
