//! Полёт снарядов через sandbox физику: multi-hit, бумеранг, AOE по lifetime, terrain

mod common;

use arcfall_combat::config::{AoeConfig, ClassStats, MultiHitConfig};
use arcfall_combat::projectile::KinematicPhase;
use arcfall_combat::sandbox::{Aabb, CombatantSpawn};
use arcfall_combat::{presets, AbilityConfig, ClassLoadout, EffectConfig, ProjectileConfig, Slot};
use bevy::prelude::*;
use common::Arena;

fn single_shot(settings: ProjectileConfig) -> ClassLoadout {
    ClassLoadout {
        class: "Tester".into(),
        stats: ClassStats::default(),
        abilities: vec![AbilityConfig::new(
            "Shot",
            Slot::Primary,
            5.0,
            EffectConfig::Projectile(settings),
        )],
    }
}

/// Нажать primary на один тик и отпустить
fn fire_once(arena: &mut Arena, caster: arcfall_combat::CombatantId) {
    arena.press(caster, true, false);
    arena.step();
    arena.press(caster, false, false);
}

#[test]
fn test_piercing_dart_stops_after_hit_budget() {
    let mut arena = Arena::new();
    let caster = arena.spawn(CombatantSpawn::new("caster", Vec3::new(0.0, 1.0, 0.0)));
    let first = arena.spawn(CombatantSpawn::new("first", Vec3::new(0.0, 1.0, 3.0)));
    let second = arena.spawn(CombatantSpawn::new("second", Vec3::new(0.0, 1.0, 6.0)));
    let third = arena.spawn(CombatantSpawn::new("third", Vec3::new(0.0, 1.0, 9.0)));

    let dart = ProjectileConfig {
        max_range: Some(20.0),
        gravity_scale: 0.0,
        sensor: true,
        multi_hit: Some(MultiHitConfig {
            max_hits: 2,
            hit_cooldown: 0.2,
        }),
        ..ProjectileConfig::new(20.0, 10.0, 0.1)
    };
    arena.arm(caster, &single_shot(dart));

    fire_once(&mut arena, caster);
    arena.run(64);

    assert_eq!(arena.world.health(first), 90.0);
    assert_eq!(arena.world.health(second), 90.0);
    assert_eq!(arena.world.health(third), 100.0);
    assert!(arena.engine.projectiles().is_empty());
    assert_eq!(arena.world.damage_log().len(), 2);
}

#[test]
fn test_boomerang_axe_hits_twice() {
    let mut arena = Arena::new();
    let fighter = arena.spawn(CombatantSpawn::new("fighter", Vec3::new(0.0, 1.0, 0.0)));
    let dummy = arena.spawn(CombatantSpawn::new("dummy", Vec3::new(0.0, 1.0, 6.0)));
    arena.arm(fighter, &presets::fighter());

    fire_once(&mut arena, fighter);

    // Outbound: первое попадание и отброс от бойца
    arena.run(24);
    assert_eq!(arena.world.health(dummy), 85.0);
    let axe = arena.engine.projectiles().iter().next().expect("axe in flight");
    assert_eq!(axe.phase(arena.engine.now()), KinematicPhase::Outbound);
    assert_eq!(axe.hits(), 1);

    // После 0.6s летит обратно через ту же цель
    arena.run(24);
    let axe = arena.engine.projectiles().iter().next().expect("axe returning");
    assert_eq!(axe.phase(arena.engine.now()), KinematicPhase::Returning);

    arena.run(40);
    assert_eq!(arena.world.health(dummy), 70.0);
    assert_eq!(arena.world.health(fighter), 200.0);
    assert!(arena.engine.projectiles().is_empty());
}

#[test]
fn test_timed_blast_applies_falloff() {
    let mut arena = Arena::new();
    let caster = arena.spawn(CombatantSpawn::new("caster", Vec3::new(0.0, 1.0, 0.0)));
    let center = arena.spawn(CombatantSpawn::new("center", Vec3::new(0.0, 1.0, 5.0)));
    let edge = arena.spawn(CombatantSpawn::new("edge", Vec3::new(1.0, 1.0, 5.0)));
    let outside = arena.spawn(CombatantSpawn::new("outside", Vec3::new(3.0, 1.0, 5.0)));

    let grenade = ProjectileConfig {
        max_range: None,
        life_time: Some(0.5),
        gravity_scale: 0.0,
        no_hit_on_entity: true,
        aoe: Some(AoeConfig {
            radius: 2.0,
            damage: 20.0,
            knockback: 0.0,
            falloff: true,
        }),
        ..ProjectileConfig::new(10.0, 0.0, 0.2)
    };
    arena.arm(caster, &single_shot(grenade));

    fire_once(&mut arena, caster);

    // 32 шага физики по 10/64 м → ровно z = 5
    arena.run(31);
    assert_eq!(arena.engine.projectiles().len(), 1);
    assert_eq!(arena.world.health(center), 100.0);

    arena.step();
    assert!(arena.engine.projectiles().is_empty());
    assert_eq!(arena.world.health(center), 80.0);
    assert_eq!(arena.world.health(edge), 90.0);
    assert_eq!(arena.world.health(outside), 100.0);
    assert_eq!(arena.world.health(caster), 100.0);
}

#[test]
fn test_wall_stops_plain_bolt() {
    let mut arena = Arena::new();
    let caster = arena.spawn(CombatantSpawn::new("caster", Vec3::new(0.0, 1.0, 0.0)));
    let hidden = arena.spawn(CombatantSpawn::new("hidden", Vec3::new(0.0, 1.0, 8.0)));
    arena
        .world
        .add_terrain(Aabb::from_center(Vec3::new(0.0, 1.0, 4.0), Vec3::new(2.0, 2.0, 0.25)));

    let bolt = ProjectileConfig {
        max_range: Some(20.0),
        gravity_scale: 0.0,
        ..ProjectileConfig::new(20.0, 15.0, 0.2)
    };
    arena.arm(caster, &single_shot(bolt));

    fire_once(&mut arena, caster);
    arena.run(20);

    assert!(arena.engine.projectiles().is_empty());
    assert_eq!(arena.world.health(hidden), 100.0);
    assert!(arena.world.free_bodies().next().is_none());
}

#[test]
fn test_arrow_drops_under_gravity() {
    let mut arena = Arena::new();
    let archer = arena.spawn(CombatantSpawn::new("archer", Vec3::new(0.0, 10.0, 0.0)));
    arena.arm(archer, &presets::archer());

    // Короткий заряд → медленная тяжёлая стрела
    arena.press(archer, true, false);
    arena.step();
    arena.press(archer, false, false);
    arena.step();

    let arrow = arena.engine.projectiles().iter().next().expect("arrow").body;
    arena.run(16);

    let (_, body) = arena
        .world
        .free_bodies()
        .find(|(handle, _)| *handle == arrow)
        .expect("arrow body");
    assert!(body.position.z > 4.0);
    assert!(body.position.y < 10.0);
    assert!(body.velocity.y < 0.0);
    // face_velocity: нос стрелы смотрит вдоль скорости
    let nose = body.rotation * Vec3::Z;
    assert!(nose.dot(body.velocity.normalize()) > 0.99);
}
