//! Per-object-type contact dispatch.
//!
//! Every begin and end notification is handled twice, once from each side
//! that carries a [`FixtureTag`]. Each pass dispatches on its own side's
//! [`ObjectType`] and may look at the other side. Nothing in here assumes an
//! order between the two passes.

use std::collections::BTreeMap;

use glam::Vec2;
use tracing::debug;

use crate::ecs::components::physics::RigidBody;
use crate::gameplay::enemy::ScriptedEnemy;
use crate::gameplay::mechanisms::{Activator, ContactReceiver};
use crate::gameplay::player::{PlayerHooks, PlayerState};
use crate::gameplay::projectile::Projectile;
use crate::physics::contact::{Contact, ContactImpulse, ContactKey, FixtureRef, Manifold};
use crate::physics::listener::ContactListener;

use super::config::ContactConfig;
use super::events::{DeferredEvent, DeferredEventQueue, EventContext};
use super::impulse::ImpulseEvaluator;
use super::one_way_wall::OneWayWallGate;
use super::sensors::{SensorCategory, SensorStateCounters};
use super::tag::{FixtureTag, ObjectType};

/// What end handlers need to know about a tag, captured at begin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TagSummary {
    object_type: ObjectType,
    owner: Option<hecs::Entity>,
    head_sensor: bool,
}

impl From<&FixtureTag> for TagSummary {
    fn from(tag: &FixtureTag) -> Self {
        Self {
            object_type: tag.object_type,
            owner: tag.owner,
            head_sensor: tag.is_head_sensor(),
        }
    }
}

/// Tag summaries of a begun contact, in [`ContactKey`] order.
#[derive(Debug, Clone, Copy)]
struct BegunContact {
    first: Option<TagSummary>,
    second: Option<TagSummary>,
    /// Begins not yet matched by an end.
    open: u32,
}

/// One side of a contact as seen by a handler.
///
/// `tag` is only available while both fixtures are alive (begin and solve
/// callbacks). End handlers work from `summary` alone.
#[derive(Clone, Copy)]
struct Side<'t> {
    fixture: FixtureRef,
    summary: Option<TagSummary>,
    tag: Option<&'t FixtureTag>,
}

impl<'t> Side<'t> {
    fn live(fixture: FixtureRef, tag: Option<&'t FixtureTag>) -> Self {
        Self {
            fixture,
            summary: tag.map(TagSummary::from),
            tag,
        }
    }

    fn recorded(fixture: FixtureRef, summary: Option<TagSummary>) -> Self {
        Self {
            fixture,
            summary,
            tag: None,
        }
    }

    fn object_type(&self) -> Option<ObjectType> {
        self.summary.map(|t| t.object_type)
    }

    fn is_enemy(&self) -> bool {
        self.object_type() == Some(ObjectType::Enemy)
    }

    fn is_head_sensor(&self) -> bool {
        self.summary.is_some_and(|t| t.head_sensor)
    }

    /// The gameplay object behind this fixture.
    fn owner(&self) -> hecs::Entity {
        self.summary.and_then(|t| t.owner).unwrap_or(self.fixture.body)
    }
}

/// Contact listener classifying contacts into gameplay effects.
///
/// Owns the sensor counters, the one-way-wall gate and the deferred event
/// queue. Effects that would change physics state are queued during the step
/// and applied by [`process_events`](Self::process_events) afterwards.
#[derive(Debug)]
pub struct ContactClassifier<P: PlayerHooks = PlayerState> {
    config: ContactConfig,
    player: P,
    player_body: Option<hecs::Entity>,
    counters: SensorStateCounters,
    one_way_wall: OneWayWallGate,
    impulses: ImpulseEvaluator,
    events: DeferredEventQueue,
    begun: BTreeMap<ContactKey, BegunContact>,
    now: f32,
}

impl<P: PlayerHooks> ContactClassifier<P> {
    pub fn new(config: ContactConfig, player: P) -> Self {
        Self {
            impulses: ImpulseEvaluator::new(&config),
            config,
            player,
            player_body: None,
            counters: SensorStateCounters::new(),
            one_way_wall: OneWayWallGate::new(),
            events: DeferredEventQueue::new(),
            begun: BTreeMap::new(),
            now: 0.0,
        }
    }

    /// Register the player's body. Fixtures on this body count as "the player".
    pub fn set_player(&mut self, body: Option<hecs::Entity>) {
        self.player_body = body;
    }

    pub fn player_body(&self) -> Option<hecs::Entity> {
        self.player_body
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn config(&self) -> &ContactConfig {
        &self.config
    }

    pub fn counters(&self) -> &SensorStateCounters {
        &self.counters
    }

    pub fn one_way_wall(&self) -> &OneWayWallGate {
        &self.one_way_wall
    }

    pub fn events(&self) -> &DeferredEventQueue {
        &self.events
    }

    /// Prepare for a new physics step at time `now` (seconds).
    pub fn begin_tick(&mut self, now: f32) {
        self.now = now;
        self.player.set_belt_velocity(None);
    }

    /// Run deferred events. Call once per tick, after the physics step.
    pub fn process_events(&mut self, world: &mut hecs::World) -> usize {
        let mut ctx = EventContext {
            world,
            player: &mut self.player,
            player_body: self.player_body,
            config: &self.config,
        };
        self.events.process(&mut ctx)
    }

    /// Zero all counters and clear the one-way-wall state (level reload).
    pub fn reset(&mut self) {
        self.counters.reset();
        self.one_way_wall.clear();
        self.begun.clear();
    }

    pub fn debug(&self) {
        self.counters.debug();
        debug!("one-way wall contacts: {}", self.one_way_wall.has_contacts());
        debug!("queued events: {}", self.events.len());
    }

    pub fn foot_contacts(&self) -> i32 {
        self.counters.foot_contacts()
    }

    pub fn head_contacts(&self) -> i32 {
        self.counters.head_contacts()
    }

    pub fn head_contacts_colliding(&self) -> i32 {
        self.counters.head_contacts_colliding()
    }

    pub fn arm_left_contacts(&self) -> i32 {
        self.counters.arm_left_contacts()
    }

    pub fn arm_left_contacts_colliding(&self) -> i32 {
        self.counters.arm_left_contacts_colliding()
    }

    pub fn arm_right_contacts(&self) -> i32 {
        self.counters.arm_right_contacts()
    }

    pub fn arm_right_contacts_colliding(&self) -> i32 {
        self.counters.arm_right_contacts_colliding()
    }

    pub fn player_contacts(&self) -> i32 {
        self.counters.player_contacts()
    }

    pub fn moving_platform_contacts(&self) -> i32 {
        self.counters.moving_platform_contacts()
    }

    pub fn death_block_contacts(&self) -> i32 {
        self.counters.death_block_contacts()
    }

    pub fn deadly_contacts(&self) -> i32 {
        self.counters.deadly_contacts()
    }

    /// Whether a moving platform or death block pushed the player's head
    /// while the player was standing on something.
    pub fn is_player_smashed(&self) -> bool {
        self.counters.is_smashed()
    }

    /// Player moving up with at least one one-way wall contact active.
    pub fn is_jumping_through_one_way_wall(&self, world: &hecs::World) -> bool {
        self.player_velocity(world).is_some_and(|v| v.y > 0.0) && self.one_way_wall.has_contacts()
    }

    fn is_player(&self, fixture: &FixtureRef) -> bool {
        self.player_body == Some(fixture.body)
    }

    fn player_velocity(&self, world: &hecs::World) -> Option<Vec2> {
        let body = self.player_body?;
        world.get::<&RigidBody>(body).ok().map(|rb| rb.linear_velocity)
    }

    fn remember(&mut self, contact: &Contact, a: Option<TagSummary>, b: Option<TagSummary>) {
        let key = contact.key();
        let (first, second) = if key.0 == contact.a.fixture { (a, b) } else { (b, a) };
        self.begun
            .entry(key)
            .and_modify(|begun| begun.open += 1)
            .or_insert(BegunContact {
                first,
                second,
                open: 1,
            });
    }

    /// The summaries recorded when `contact` began, in `(a, b)` order.
    ///
    /// Contacts begun before the last reset fall back to whatever tags the
    /// fixtures still carry.
    fn forget(&mut self, world: &hecs::World, contact: &Contact) -> (Option<TagSummary>, Option<TagSummary>) {
        let key = contact.key();
        let Some(begun) = self.begun.get_mut(&key) else {
            let summary = |fixture: hecs::Entity| tag_of(world, fixture).map(|t| TagSummary::from(&*t));
            return (summary(contact.a.fixture), summary(contact.b.fixture));
        };

        let recorded = if key.0 == contact.a.fixture {
            (begun.first, begun.second)
        } else {
            (begun.second, begun.first)
        };
        begun.open -= 1;
        if begun.open == 0 {
            self.begun.remove(&key);
        }
        recorded
    }

    fn begin(&mut self, world: &hecs::World, contact: &mut Contact, this: Side, other: Side) {
        let Some(object_type) = this.object_type() else {
            return;
        };

        match object_type {
            ObjectType::Crusher | ObjectType::Deadly => {
                if self.is_player(&other.fixture) {
                    self.counters.increment(SensorCategory::Deadly);
                }
            }
            ObjectType::PlayerFootSensor => self.begin_foot(world, other),
            ObjectType::PlayerHeadSensor => self.begin_blocking(SensorCategory::Head, other),
            ObjectType::PlayerLeftArmSensor => self.begin_blocking(SensorCategory::ArmLeft, other),
            ObjectType::PlayerRightArmSensor => self.begin_blocking(SensorCategory::ArmRight, other),
            ObjectType::Projectile => self.begin_projectile(world, this, other),
            ObjectType::SolidOneWay => {
                if self.is_player(&other.fixture) {
                    let velocity = self.player_velocity(world).unwrap_or(Vec2::ZERO);
                    self.one_way_wall
                        .begin_contact(contact, other.is_head_sensor(), velocity);
                }
            }
            ObjectType::Player => self.counters.increment(SensorCategory::Player),
            ObjectType::MovingPlatform => self.begin_platform(SensorCategory::MovingPlatform, this, other),
            ObjectType::DeathBlock => self.begin_platform(SensorCategory::DeathBlock, this, other),
            ObjectType::Bouncer => self.begin_bouncer(world, this, other),
            ObjectType::Enemy => self.begin_enemy(world, this, other),
            ObjectType::BubbleCube | ObjectType::CollapsingPlatform => {
                match world.get::<&mut ContactReceiver>(this.owner()) {
                    Ok(mut receiver) => receiver.0.begin_contact(other.fixture.body),
                    Err(_) => debug!("{:?} {:?} has no contact receiver", object_type, this.owner()),
                }
            }
            ObjectType::ConveyorBelt
            | ObjectType::Door
            | ObjectType::MoveableBox
            | ObjectType::Solid
            | ObjectType::Invalid => {}
        }
    }

    fn end(&mut self, world: &hecs::World, contact: &mut Contact, this: Side, other: Side) {
        let Some(object_type) = this.object_type() else {
            return;
        };

        match object_type {
            ObjectType::Crusher | ObjectType::Deadly => {
                if self.is_player(&other.fixture) {
                    self.counters.decrement(SensorCategory::Deadly);
                }
            }
            ObjectType::PlayerFootSensor => {
                if other.fixture.is_sensor {
                    return;
                }
                if other.is_enemy() && !other.fixture.filter.is_enemy_collide_with() {
                    return;
                }
                self.counters.decrement(SensorCategory::Foot);
            }
            ObjectType::PlayerHeadSensor => self.end_blocking(SensorCategory::Head, other),
            ObjectType::PlayerLeftArmSensor => self.end_blocking(SensorCategory::ArmLeft, other),
            ObjectType::PlayerRightArmSensor => self.end_blocking(SensorCategory::ArmRight, other),
            ObjectType::Player => self.counters.decrement(SensorCategory::Player),
            ObjectType::SolidOneWay => self.one_way_wall.end_contact(contact),
            ObjectType::MovingPlatform => self.end_platform(SensorCategory::MovingPlatform, other),
            ObjectType::DeathBlock => self.end_platform(SensorCategory::DeathBlock, other),
            ObjectType::BubbleCube | ObjectType::CollapsingPlatform => {
                if let Ok(mut receiver) = world.get::<&mut ContactReceiver>(this.owner()) {
                    receiver.0.end_contact(other.fixture.body);
                }
            }
            ObjectType::Projectile
            | ObjectType::Bouncer
            | ObjectType::Enemy
            | ObjectType::ConveyorBelt
            | ObjectType::Door
            | ObjectType::MoveableBox
            | ObjectType::Solid
            | ObjectType::Invalid => {}
        }
    }

    fn begin_foot(&mut self, world: &hecs::World, other: Side) {
        if other.fixture.is_sensor {
            return;
        }

        // Enemies are not something to jump off, unless they are solid
        if other.is_enemy() && !other.fixture.filter.is_enemy_collide_with() {
            self.try_smash(world, other);
            return;
        }

        if other.fixture.is_chain {
            self.player.set_ground_body(Some(other.fixture.body));
        }

        self.counters.increment(SensorCategory::Foot);
    }

    fn try_smash(&mut self, world: &hecs::World, enemy_side: Side) {
        let enemy = enemy_side.owner();
        let Ok(scripted) = world.get::<&ScriptedEnemy>(enemy) else {
            debug!("enemy {:?} has no script, cannot be smashed", enemy);
            return;
        };
        if !scripted.smashable || scripted.is_smashed() {
            return;
        }

        let Some(velocity) = self.player_velocity(world) else {
            debug!("no player body to smash enemy {:?} with", enemy);
            return;
        };
        if velocity.y < -self.config.smash_velocity {
            self.events.enqueue(DeferredEvent::Smash { enemy });
        }
    }

    fn begin_blocking(&mut self, category: SensorCategory, other: Side) {
        if !other.fixture.is_sensor {
            self.counters.begin_blocking(category, &other.fixture.filter);
        }
    }

    fn end_blocking(&mut self, category: SensorCategory, other: Side) {
        if !other.fixture.is_sensor {
            self.counters.end_blocking(category, &other.fixture.filter);
        }
    }

    fn begin_platform(&mut self, category: SensorCategory, this: Side, other: Side) {
        if !self.is_player(&other.fixture) {
            return;
        }

        if other.is_head_sensor() && self.counters.is_on_ground() {
            self.counters.set_smashed();
        }

        if other.fixture.is_sensor {
            return;
        }

        self.player.set_platform_body(Some(this.fixture.body));
        self.counters.increment(category);
    }

    fn end_platform(&mut self, category: SensorCategory, other: Side) {
        if !self.is_player(&other.fixture) || other.fixture.is_sensor {
            return;
        }

        self.counters.decrement(category);
        self.player.set_platform_body(None);
    }

    fn begin_projectile(&mut self, world: &hecs::World, this: Side, other: Side) {
        let damage = this.tag.and_then(|t| t.int_property("damage")).unwrap_or(0);

        let mut hit_recipient = false;
        if self.is_player(&other.fixture) {
            self.player.damage(damage);
            hit_recipient = true;
        } else if other.is_enemy() {
            if let Ok(mut enemy) = world.get::<&mut ScriptedEnemy>(other.owner()) {
                enemy.hit(damage);
            }
            hit_recipient = true;
        }

        let Ok(mut projectile) = world.get::<&mut Projectile>(this.owner()) else {
            debug!("projectile fixture without Projectile on {:?}", this.owner());
            return;
        };

        // Sticky projectiles leave `hit_something` to post-solve so a hard
        // hit can still embed them
        if !projectile.sticky || hit_recipient {
            projectile.scheduled_for_removal = true;
        }
    }

    fn begin_bouncer(&mut self, world: &hecs::World, this: Side, other: Side) {
        if !self.is_player(&other.fixture) {
            return;
        }

        let impulse = match world.get::<&mut Activator>(this.owner()) {
            Ok(mut activator) => activator.0.activate(self.now),
            Err(_) => {
                debug!("bouncer {:?} has no activator", this.owner());
                return;
            }
        };

        if let Some(impulse) = impulse {
            self.events.enqueue(DeferredEvent::Bounce {
                body: other.fixture.body,
                impulse,
            });
        }
    }

    fn begin_enemy(&mut self, world: &hecs::World, this: Side, other: Side) {
        if !self.is_player(&other.fixture) {
            return;
        }

        let damage = this.tag.and_then(|t| t.int_property("damage")).unwrap_or(0);
        if let Some(tag) = this.tag {
            tag.collision_with_player(other.fixture.body);
        }

        let enemy = this.owner();
        if world.get::<&ScriptedEnemy>(enemy).is_ok() {
            self.events.enqueue(DeferredEvent::Damage { enemy, damage });
        } else {
            self.player.damage(damage);
        }
    }

    fn surface_speed(&mut self, world: &hecs::World, contact: &mut Contact, this: Side, other: Side) {
        if this.object_type() != Some(ObjectType::ConveyorBelt) {
            return;
        }

        let speed = match world.get::<&ContactReceiver>(this.owner()) {
            Ok(receiver) => receiver.0.surface_speed(),
            Err(_) => None,
        };
        let Some(speed) = speed else {
            return;
        };

        if self.is_player(&other.fixture) {
            self.player.set_belt_velocity(Some(speed));
        } else {
            contact.tangent_speed = speed;
        }
    }
}

impl Default for ContactClassifier<PlayerState> {
    fn default() -> Self {
        Self::new(ContactConfig::default(), PlayerState::default())
    }
}

fn tag_of(world: &hecs::World, fixture: hecs::Entity) -> Option<hecs::Ref<'_, FixtureTag>> {
    world.get::<&FixtureTag>(fixture).ok()
}

impl<P: PlayerHooks> ContactListener for ContactClassifier<P> {
    fn begin_contact(&mut self, world: &hecs::World, contact: &mut Contact) {
        let tag_a = tag_of(world, contact.a.fixture);
        let tag_b = tag_of(world, contact.b.fixture);
        let a = Side::live(contact.a, tag_a.as_deref());
        let b = Side::live(contact.b, tag_b.as_deref());
        if a.summary.is_none() && b.summary.is_none() {
            return;
        }

        self.remember(contact, a.summary, b.summary);
        if a.summary.is_some() {
            self.begin(world, contact, a, b);
        }
        if b.summary.is_some() {
            self.begin(world, contact, b, a);
        }
    }

    // Either fixture may be gone by now, so dispatch on what was seen at begin
    fn end_contact(&mut self, world: &hecs::World, contact: &mut Contact) {
        let (summary_a, summary_b) = self.forget(world, contact);
        let a = Side::recorded(contact.a, summary_a);
        let b = Side::recorded(contact.b, summary_b);

        if a.summary.is_some() {
            self.end(world, contact, a, b);
        }
        if b.summary.is_some() {
            self.end(world, contact, b, a);
        }
    }

    fn pre_solve(&mut self, world: &hecs::World, contact: &mut Contact, _old_manifold: &Manifold) {
        let tag_a = tag_of(world, contact.a.fixture);
        let tag_b = tag_of(world, contact.b.fixture);
        let a = Side::live(contact.a, tag_a.as_deref());
        let b = Side::live(contact.b, tag_b.as_deref());

        self.surface_speed(world, contact, a, b);
        self.surface_speed(world, contact, b, a);
    }

    fn post_solve(&mut self, world: &hecs::World, contact: &Contact, impulse: &ContactImpulse) {
        let normal_impulse = impulse.normal_impulses.first().copied().unwrap_or(0.0);

        for fixture in [contact.a, contact.b] {
            let Some(tag) = tag_of(world, fixture.fixture) else {
                continue;
            };
            match tag.object_type {
                ObjectType::Player => {
                    if let Some(magnitude) = self.impulses.player_impact(normal_impulse) {
                        self.player.impulse(magnitude);
                    }
                }
                ObjectType::Projectile => {
                    let owner = tag.owner.unwrap_or(fixture.body);
                    if let Ok(mut projectile) = world.get::<&mut Projectile>(owner) {
                        self.impulses.projectile_impact(&mut projectile, normal_impulse);
                    }
                }
                _ => {}
            }
        }
    }
}
