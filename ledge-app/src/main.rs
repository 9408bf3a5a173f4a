use glam::Vec2;
use ledge::contacts::{FixtureTag, ObjectType};
use ledge::ecs::components::{Collider, ColliderShape, RigidBody};
use ledge::gameplay::{
    Activator, Alignment, Bouncer, ContactReceiver, ConveyorBelt, HealthScript, ScriptedEnemy,
};
use ledge::physics::filter::{CollisionFilter, CATEGORY_ENEMY_WALK_THROUGH};
use ledge::{GameLoopConfig, Simulation};

const FRAME_TIME: f64 = 1.0 / 60.0;

struct Demo {
    player: hecs::Entity,
    enemy: hecs::Entity,
}

fn build_level(sim: &mut Simulation) -> anyhow::Result<Demo> {
    // Ground
    let ground = sim.spawn_body(Vec2::ZERO, RigidBody::new_static());
    sim.attach_fixture(
        Collider::new(
            ground,
            ColliderShape::Chain {
                points: vec![Vec2::new(-20.0, 0.0), Vec2::new(20.0, 0.0)],
            },
        ),
        Some(FixtureTag::new(ObjectType::Solid)),
    );

    // One-way platform above the spawn point
    let shelf = sim.spawn_body(Vec2::new(0.0, 2.5), RigidBody::new_static());
    sim.attach_fixture(
        Collider::new(
            shelf,
            ColliderShape::Rect {
                half_extents: Vec2::new(1.5, 0.1),
            },
        ),
        Some(FixtureTag::new(ObjectType::SolidOneWay)),
    );

    // Conveyor belt to the right
    let belt = sim.spawn_body(Vec2::new(6.0, 0.25), RigidBody::new_static());
    sim.world_mut()
        .insert_one(belt, ContactReceiver::new(ConveyorBelt::new(-2.0)))?;
    sim.attach_fixture(
        Collider::new(
            belt,
            ColliderShape::Rect {
                half_extents: Vec2::new(2.0, 0.25),
            },
        ),
        Some(FixtureTag::new(ObjectType::ConveyorBelt).with_owner(belt)),
    );

    // Spring pad past the enemy
    let pad = sim.spawn_body(Vec2::new(-6.0, 0.1), RigidBody::new_static());
    let bouncer = Bouncer::from_config(Alignment::PointsUp, sim.classifier().config());
    sim.world_mut().insert_one(pad, Activator::new(bouncer))?;
    sim.attach_fixture(
        Collider::new(
            pad,
            ColliderShape::Rect {
                half_extents: Vec2::new(0.5, 0.1),
            },
        ),
        Some(FixtureTag::new(ObjectType::Bouncer).with_owner(pad)),
    );

    // Smashable enemy the player will land on
    let enemy = sim.spawn_body(Vec2::new(-3.0, 0.4), RigidBody::new_dynamic(1.0));
    sim.world_mut()
        .insert_one(enemy, ScriptedEnemy::new(HealthScript::new(10)).smashable())?;
    sim.attach_fixture(
        Collider::new(enemy, ColliderShape::Circle { radius: 0.4 })
            .with_filter(CollisionFilter::category(CATEGORY_ENEMY_WALK_THROUGH)),
        Some(
            FixtureTag::new(ObjectType::Enemy)
                .with_owner(enemy)
                .with_property("damage", 10),
        ),
    );

    // Player: body, feet and head
    let mut body = RigidBody::new_dynamic(1.0);
    body.linear_velocity = Vec2::new(-1.0, 6.0);
    let player = sim.spawn_body(Vec2::new(0.0, 1.0), body);
    sim.attach_fixture(
        Collider::new(
            player,
            ColliderShape::Rect {
                half_extents: Vec2::new(0.3, 0.5),
            },
        )
        .with_filter(CollisionFilter::new(0x01, !CATEGORY_ENEMY_WALK_THROUGH)),
        Some(FixtureTag::new(ObjectType::Player)),
    );
    sim.attach_fixture(
        Collider::new(player, ColliderShape::Circle { radius: 0.2 })
            .with_offset(Vec2::new(0.0, -0.5))
            .sensor(),
        Some(FixtureTag::new(ObjectType::PlayerFootSensor)),
    );
    sim.attach_fixture(
        Collider::new(player, ColliderShape::Circle { radius: 0.2 })
            .with_offset(Vec2::new(0.0, 0.5))
            .sensor(),
        Some(FixtureTag::new(ObjectType::PlayerHeadSensor)),
    );
    sim.set_player(Some(player));

    Ok(Demo { player, enemy })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut sim = Simulation::default();
    let demo = build_level(&mut sim)?;
    let config: GameLoopConfig = sim.config().clone();
    log::info!(
        "running 3s at {:.1} Hz, at most {} substeps per frame",
        1.0 / config.fixed_timestep,
        config.max_substeps
    );

    let mut was_grounded = false;
    for frame in 0..180 {
        sim.update(FRAME_TIME);

        let grounded = sim.classifier().counters().is_on_ground();
        if grounded != was_grounded {
            log::info!("frame {}: grounded = {}", frame, grounded);
            was_grounded = grounded;
        }
        if sim.classifier().is_jumping_through_one_way_wall(sim.world()) {
            log::debug!("frame {}: jumping through the one-way platform", frame);
        }
    }

    sim.classifier().debug();

    let smashed = sim
        .world()
        .get::<&ScriptedEnemy>(demo.enemy)
        .map(|enemy| enemy.is_smashed())
        .unwrap_or(false);
    let position = sim
        .world()
        .get::<&ledge::Transform2D>(demo.player)
        .map(|t| t.position)?;
    let player = sim.classifier().player();
    log::info!(
        "player at {:?}, health {}, ground body {:?}, enemy smashed: {}",
        position,
        player.health,
        player.ground_body,
        smashed
    );

    Ok(())
}
