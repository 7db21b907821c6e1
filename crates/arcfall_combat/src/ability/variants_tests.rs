//! Tests for ability variants (projectile launch, hitscan, heal, blink, beam).

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use bevy::prelude::*;

    use crate::ability::{
        build_ability, Ability, BeamAbility, BlinkAbility, Cast, PhysicsProjectileAbility, RaycastAbility,
        TargetedHealAbility,
    };
    use crate::config::{presets, AbilityConfig, BeamConfig, EffectConfig, ResourceKind, Slot};
    use crate::engine::CombatEngine;
    use crate::sandbox::{Aabb, CombatantSpawn, SandboxWorld};
    use crate::world::{CombatantId, CombatantRegistry, FeedbackEvent, PhysicsWorld};

    struct Arena {
        engine: CombatEngine,
        world: SandboxWorld,
        caster: CombatantId,
        target: CombatantId,
    }

    /// Кастер в начале координат, цель в 5м по +Z
    fn arena() -> Arena {
        let mut world = SandboxWorld::new();
        let caster = world.spawn_combatant(CombatantSpawn::new("caster", Vec3::new(0.0, 1.0, 0.0)));
        let target = world.spawn_combatant(CombatantSpawn::new("target", Vec3::new(0.0, 1.0, 5.0)));
        Arena {
            engine: CombatEngine::default(),
            world,
            caster,
            target,
        }
    }

    fn forward(source: CombatantId) -> Cast {
        Cast {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::Z,
            source,
        }
    }

    fn hitscan(damage: f32) -> AbilityConfig {
        AbilityConfig::new(
            "Spark",
            Slot::Primary,
            0.5,
            EffectConfig::Raycast {
                damage,
                max_range: 20.0,
            },
        )
    }

    #[test]
    fn test_build_ability_picks_variant() {
        let wizard = presets::wizard();
        for config in wizard.abilities {
            let name = config.name.clone();
            let ability = build_ability(config);
            assert_eq!(ability.name(), name);
        }

        assert_eq!(build_ability(presets::fire_beam()).core().slot(), Slot::Secondary);
        assert_eq!(build_ability(presets::teleport()).name(), "Teleport");
    }

    #[test]
    fn test_projectile_launch_uses_charged_params() {
        let mut arena = arena();
        let archer = presets::archer();
        let arrow = archer.ability(Slot::Primary).cloned().expect("arrow");
        let mut ability = PhysicsProjectileAbility::new(arrow);

        let mut ctx = arena.engine.context(&mut arena.world);
        ability.start_charge(&mut ctx, arena.caster);
        // max_charge_time 0.8 → level 0.5
        ctx.now = 0.4;
        ability.use_ability(&mut ctx, forward(arena.caster));

        assert!(!ability.core().is_charging());

        let projectile = arena.engine.projectiles().iter().next().expect("projectile launched");
        assert_eq!(projectile.source, arena.caster);
        assert_eq!(projectile.spawned_at, 0.4);
        assert_relative_eq!(projectile.launch.speed, 46.5, epsilon = 1e-4);
        assert_relative_eq!(projectile.launch.damage, 42.5, epsilon = 1e-4);
        assert_relative_eq!(projectile.launch.gravity_scale, 0.205, epsilon = 1e-4);
        assert_relative_eq!(projectile.lifetime, 100.0 / 46.5, epsilon = 1e-4);

        let body = arena.world.body(projectile.body).expect("body spawned");
        assert_relative_eq!(body.velocity.z, 46.5, epsilon = 1e-4);
        assert_relative_eq!(body.gravity_scale, 0.205, epsilon = 1e-4);
        assert_relative_eq!(body.radius, 0.3);
        assert_eq!(body.label, "Arrow Projectile");
    }

    #[test]
    fn test_projectile_size_bonus_and_charged_dash() {
        let mut arena = arena();
        let fighter = presets::fighter();
        let slash = fighter.ability(Slot::Secondary).cloned().expect("slash");
        let mut ability = PhysicsProjectileAbility::new(slash);

        let mut ctx = arena.engine.context(&mut arena.world);
        ability.start_charge(&mut ctx, arena.caster);
        ctx.now = 1.0;
        ability.use_ability(&mut ctx, forward(arena.caster));

        let projectile = arena.engine.projectiles().iter().next().expect("projectile launched");
        // radius 0.6 * (1 + 1.3 / 0.6)
        let body = arena.world.body(projectile.body).expect("body spawned");
        assert_relative_eq!(body.radius, 1.9, epsilon = 1e-5);
        assert_relative_eq!(projectile.launch.damage, 50.0);

        // backward * (-11) = рывок вперёд, set + impulse
        let caster_body = arena.world.combatant_body(arena.caster).expect("caster body");
        let velocity = arena.world.body_velocity(caster_body).unwrap_or(Vec3::ZERO);
        assert_relative_eq!(velocity.z, 22.0, epsilon = 1e-4);
    }

    #[test]
    fn test_projectile_launch_feedback() {
        let mut arena = arena();
        let wizard = presets::wizard();
        let fireball = wizard.ability(Slot::Primary).cloned().expect("fireball");
        let mut ability = PhysicsProjectileAbility::new(fireball);

        let mut ctx = arena.engine.context(&mut arena.world);
        ability.use_ability(&mut ctx, forward(arena.caster));

        let sounds: Vec<_> = arena
            .engine
            .feedback()
            .events()
            .iter()
            .filter_map(|event| match event {
                FeedbackEvent::Sound { uri, volume, pitch, .. } => Some((uri.clone(), *volume, *pitch)),
                _ => None,
            })
            .collect();

        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].0, "audio/sfx/fire/Fire Spell 01.wav");
        assert_eq!(sounds[0].1, 0.6);
        assert!((0.8..1.0).contains(&sounds[0].2));
    }

    #[test]
    fn test_raycast_damages_first_combatant() {
        let mut arena = arena();
        let mut ability = RaycastAbility::new(hitscan(15.0));

        let mut ctx = arena.engine.context(&mut arena.world);
        ability.use_ability(&mut ctx, forward(arena.caster));

        assert_eq!(arena.world.health(arena.target), 85.0);
        assert_eq!(arena.world.health(arena.caster), 100.0);
        assert_eq!(arena.world.damage_log()[0].attacker, Some(arena.caster));
        assert!(arena.engine.feedback().events().iter().any(|event| matches!(
            event,
            FeedbackEvent::Effect { effect, .. } if effect == crate::projectile::BLOOD_HIT_EFFECT
        )));
    }

    #[test]
    fn test_raycast_blocked_by_terrain() {
        let mut arena = arena();
        arena
            .world
            .add_terrain(Aabb::new(Vec3::new(-2.0, 0.0, 2.0), Vec3::new(2.0, 3.0, 3.0)));
        let mut ability = RaycastAbility::new(hitscan(15.0));

        let mut ctx = arena.engine.context(&mut arena.world);
        ability.use_ability(&mut ctx, forward(arena.caster));

        assert_eq!(arena.world.health(arena.target), 100.0);
    }

    #[test]
    fn test_raycast_out_of_range() {
        let mut arena = arena();
        let config = AbilityConfig::new(
            "Short",
            Slot::Primary,
            0.0,
            EffectConfig::Raycast {
                damage: 15.0,
                max_range: 3.0,
            },
        );
        let mut ability = RaycastAbility::new(config);

        let mut ctx = arena.engine.context(&mut arena.world);
        ability.use_ability(&mut ctx, forward(arena.caster));

        assert_eq!(arena.world.health(arena.target), 100.0);
    }

    #[test]
    fn test_targeted_heal() {
        let mut arena = arena();
        arena.world.take_damage(arena.target, 50.0, None);

        let config = AbilityConfig::new(
            "Mend",
            Slot::Secondary,
            1.0,
            EffectConfig::TargetedHeal {
                healing: 30.0,
                max_range: 10.0,
            },
        );
        let mut ability = TargetedHealAbility::new(config);

        let mut ctx = arena.engine.context(&mut arena.world);
        ability.use_ability(&mut ctx, forward(arena.caster));

        assert_eq!(arena.world.health(arena.target), 80.0);
    }

    #[test]
    fn test_blink_full_distance() {
        let mut arena = arena();
        // Цель не на пути: луч чуть выше
        let cast = Cast {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::X,
            source: arena.caster,
        };
        let mut ability = BlinkAbility::new(presets::teleport());

        let mut ctx = arena.engine.context(&mut arena.world);
        ability.use_ability(&mut ctx, cast);

        let position = arena.world.combatant_position(arena.caster).unwrap_or(Vec3::ZERO);
        assert_relative_eq!(position.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(position.y, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_blink_stops_short_of_obstacle() {
        let mut arena = arena();
        arena
            .world
            .add_terrain(Aabb::new(Vec3::new(8.0, 0.0, -2.0), Vec3::new(9.0, 3.0, 2.0)));
        let cast = Cast {
            origin: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::X,
            source: arena.caster,
        };
        let mut ability = BlinkAbility::new(presets::teleport());

        let mut ctx = arena.engine.context(&mut arena.world);
        ability.use_ability(&mut ctx, cast);

        let position = arena.world.combatant_position(arena.caster).unwrap_or(Vec3::ZERO);
        assert_relative_eq!(position.x, 6.0, epsilon = 1e-5);
    }

    #[test]
    fn test_blink_cancelled_by_close_obstacle() {
        let mut arena = arena();
        // Цель в 5м по +Z: поверхность сферы на 4.5м — дальше 2.5, блинк на 2.5м
        let mut ability = BlinkAbility::new(presets::teleport());
        let mut ctx = arena.engine.context(&mut arena.world);
        ability.use_ability(&mut ctx, forward(arena.caster));
        let position = arena.world.combatant_position(arena.caster).unwrap_or(Vec3::ZERO);
        assert_relative_eq!(position.z, 2.5, epsilon = 1e-4);

        // Стена в 1м — отмена
        arena
            .world
            .add_terrain(Aabb::new(Vec3::new(-2.0, 0.0, 3.5), Vec3::new(2.0, 3.0, 4.0)));
        let cast = Cast {
            origin: position,
            ..forward(arena.caster)
        };
        let mut ctx = arena.engine.context(&mut arena.world);
        ability.use_ability(&mut ctx, cast);
        let after = arena.world.combatant_position(arena.caster).unwrap_or(Vec3::ZERO);
        assert_eq!(after, position);
    }

    #[test]
    fn test_beam_damage_on_interval() {
        let mut arena = arena();
        let config = AbilityConfig::new(
            "Beam",
            Slot::Secondary,
            0.0,
            EffectConfig::Beam(BeamConfig {
                range: 7.0,
                damage_per_tick: 5.0,
                tick_interval: 0.1,
                effect: Some("fire_beam".into()),
            }),
        )
        .with_cost(ResourceKind::Mana, 2.0);
        let mut ability = BeamAbility::new(config);

        for now in [0.0, 0.05, 0.1] {
            let mut ctx = arena.engine.context(&mut arena.world);
            ctx.now = now;
            ability.use_tick(&mut ctx, forward(arena.caster));
        }

        assert_eq!(arena.world.health(arena.target), 90.0);
        assert_eq!(arena.world.mana(arena.caster), 96.0);

        let segments = arena
            .engine
            .feedback()
            .events()
            .iter()
            .filter(|event| matches!(event, FeedbackEvent::BeamSegment { .. }))
            .count();
        assert_eq!(segments, 3);

        let end = ability.last_hit_point().unwrap_or(Vec3::ZERO);
        assert_relative_eq!(end.z, 4.5, epsilon = 1e-4);

        ability.cleanup();
        assert_eq!(ability.last_hit_point(), None);
    }

    #[test]
    fn test_beam_misses_beyond_range() {
        let mut arena = arena();
        let mut ability = BeamAbility::new(presets::fire_beam());
        let cast = Cast {
            direction: -Vec3::Z,
            ..forward(arena.caster)
        };

        let mut ctx = arena.engine.context(&mut arena.world);
        ability.use_tick(&mut ctx, cast);

        let end = ability.last_hit_point().unwrap_or(Vec3::ZERO);
        assert_relative_eq!(end.z, -7.0, epsilon = 1e-5);
        assert_eq!(arena.world.health(arena.target), 100.0);
    }
}
