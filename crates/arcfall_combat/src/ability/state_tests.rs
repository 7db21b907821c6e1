//! Tests for AbilityCore: cooldown, resource gating, charge.

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use bevy::prelude::*;
    use proptest::prelude::*;

    use crate::ability::AbilityCore;
    use crate::config::{
        AbilityConfig, ChargeConfig, ChargeRange, EffectConfig, ImpulseDirection, ResourceKind, Slot, UseImpulse,
    };
    use crate::engine::CombatEngine;
    use crate::sandbox::{CombatantSpawn, SandboxWorld};
    use crate::world::{CombatantId, CombatantRegistry, FeedbackEvent, PhysicsWorld};

    fn spark(cooldown: f32) -> AbilityConfig {
        AbilityConfig::new(
            "Spark",
            Slot::Primary,
            cooldown,
            EffectConfig::Raycast {
                damage: 10.0,
                max_range: 20.0,
            },
        )
    }

    fn chargeable(min: f32, max: f32) -> AbilityConfig {
        spark(0.5).with_charge(ChargeConfig {
            min_charge_time: min,
            max_charge_time: max,
            damage: Some(ChargeRange::new(20.0, 50.0)),
            ..Default::default()
        })
    }

    fn arena() -> (CombatEngine, SandboxWorld, CombatantId) {
        let mut world = SandboxWorld::new();
        let caster = world.spawn_combatant(CombatantSpawn::new("caster", Vec3::new(0.0, 1.0, 0.0)));
        (CombatEngine::default(), world, caster)
    }

    #[test]
    fn test_cooldown_gate() {
        let (mut engine, mut world, caster) = arena();
        let mut core = AbilityCore::new(spark(1.0));

        assert!(core.can_use(0.0, &world, caster));

        let mut ctx = engine.context(&mut world);
        core.start_cooldown(&mut ctx, caster);

        assert!(!core.can_use(0.5, &world, caster));
        assert!(!core.can_use(0.999, &world, caster));
        assert!(core.can_use(1.0, &world, caster));
        assert_eq!(core.last_use_time(), Some(0.0));
    }

    #[test]
    fn test_cooldown_started_event() {
        let (mut engine, mut world, caster) = arena();
        let mut core = AbilityCore::new(spark(1.5));

        let mut ctx = engine.context(&mut world);
        core.start_cooldown(&mut ctx, caster);

        assert_eq!(
            engine.drain_feedback(),
            vec![FeedbackEvent::CooldownStarted {
                combatant: caster,
                slot: Slot::Primary,
                duration: 1.5,
            }]
        );
    }

    #[test]
    fn test_remaining_cooldown() {
        let (mut engine, mut world, caster) = arena();
        let mut core = AbilityCore::new(spark(1.0));
        assert_eq!(core.remaining_cooldown(0.0), 0.0);

        let mut ctx = engine.context(&mut world);
        ctx.now = 2.0;
        core.start_cooldown(&mut ctx, caster);

        assert_relative_eq!(core.remaining_cooldown(2.25), 0.75);
        assert_eq!(core.remaining_cooldown(5.0), 0.0);
    }

    #[test]
    fn test_resource_gating_per_kind() {
        let (_, mut world, caster) = arena();

        for kind in [ResourceKind::Mana, ResourceKind::Stamina] {
            let core = AbilityCore::new(spark(0.0).with_cost(kind, 20.0));

            set_pool(&mut world, caster, kind, 19.0);
            assert!(!core.can_use(0.0, &world, caster), "{:?} below cost", kind);

            set_pool(&mut world, caster, kind, 20.0);
            assert!(core.can_use(0.0, &world, caster), "{:?} at cost", kind);
        }

        // Health: строго больше стоимости
        let core = AbilityCore::new(spark(0.0).with_cost(ResourceKind::Health, 20.0));
        set_pool(&mut world, caster, ResourceKind::Health, 20.0);
        assert!(!core.can_use(0.0, &world, caster));
        set_pool(&mut world, caster, ResourceKind::Health, 20.5);
        assert!(core.can_use(0.0, &world, caster));
    }

    #[test]
    fn test_missing_combatant_cannot_use() {
        let (_, world, _) = arena();
        let core = AbilityCore::new(spark(0.0));
        assert!(!core.can_use(0.0, &world, CombatantId(99)));
    }

    #[test]
    fn test_consume_resources_debits_configured_kind() {
        let (_, mut world, caster) = arena();

        AbilityCore::new(spark(0.0).with_cost(ResourceKind::Mana, 20.0)).consume_resources(&mut world, caster);
        assert_eq!(world.mana(caster), 80.0);

        AbilityCore::new(spark(0.0).with_cost(ResourceKind::Stamina, 35.0)).consume_resources(&mut world, caster);
        assert_eq!(world.resource(caster, ResourceKind::Stamina), Some(65.0));

        AbilityCore::new(spark(0.0).with_cost(ResourceKind::Health, 10.0)).consume_resources(&mut world, caster);
        assert_eq!(world.health(caster), 90.0);

        // Бесплатная способность ничего не трогает
        AbilityCore::new(spark(0.0)).consume_resources(&mut world, caster);
        assert_eq!(world.mana(caster), 80.0);
    }

    #[test]
    fn test_charge_interpolation() {
        let (mut engine, mut world, caster) = arena();
        let mut core = AbilityCore::new(chargeable(0.0, 1.0));

        let mut ctx = engine.context(&mut world);
        core.start_charge(&mut ctx, caster);
        assert!(core.is_charging());

        assert_eq!(core.charge_level_at(0.0), 0.0);
        assert_relative_eq!(core.charge_level_at(0.5), 0.5);
        assert_eq!(core.charge_level_at(1.0), 1.0);
        assert_eq!(core.charge_level_at(2.0), 1.0);
    }

    #[test]
    fn test_charge_below_min_time_is_zero() {
        let (mut engine, mut world, caster) = arena();
        let mut core = AbilityCore::new(chargeable(0.2, 0.6));

        let mut ctx = engine.context(&mut world);
        core.start_charge(&mut ctx, caster);

        assert_eq!(core.charge_level_at(0.1), 0.0);
        assert_relative_eq!(core.charge_level_at(0.4), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_charge_span_is_step() {
        let (mut engine, mut world, caster) = arena();
        let mut core = AbilityCore::new(chargeable(0.5, 0.5));

        let mut ctx = engine.context(&mut world);
        core.start_charge(&mut ctx, caster);

        assert_eq!(core.charge_level_at(0.4), 0.0);
        assert_eq!(core.charge_level_at(0.5), 1.0);
    }

    #[test]
    fn test_start_charge_without_config_is_noop() {
        let (mut engine, mut world, caster) = arena();
        let mut core = AbilityCore::new(spark(0.0));

        let mut ctx = engine.context(&mut world);
        core.start_charge(&mut ctx, caster);
        let level = core.end_charge(&mut ctx, caster);

        assert!(!core.is_charging());
        assert_eq!(level, 0.0);
        assert!(engine.feedback().is_empty());
    }

    #[test]
    fn test_charge_notifications() {
        let (mut engine, mut world, caster) = arena();
        let mut core = AbilityCore::new(chargeable(0.0, 1.0));

        let mut ctx = engine.context(&mut world);
        core.start_charge(&mut ctx, caster);
        ctx.now = 0.25;
        core.charge_level(&mut ctx, caster);
        ctx.now = 0.5;
        let level = core.end_charge(&mut ctx, caster);

        assert_relative_eq!(level, 0.5);
        assert!(!core.is_charging());

        let events = engine.drain_feedback();
        assert_eq!(
            events,
            vec![
                FeedbackEvent::MovementHint {
                    combatant: caster,
                    slow_walk: true
                },
                FeedbackEvent::ChargeBegin {
                    combatant: caster,
                    slot: Slot::Primary
                },
                FeedbackEvent::ChargeLevel {
                    combatant: caster,
                    slot: Slot::Primary,
                    level: 0.25
                },
                FeedbackEvent::ChargeLevel {
                    combatant: caster,
                    slot: Slot::Primary,
                    level: 0.5
                },
                FeedbackEvent::ChargeEnd {
                    combatant: caster,
                    slot: Slot::Primary
                },
                FeedbackEvent::MovementHint {
                    combatant: caster,
                    slow_walk: false
                },
            ]
        );
    }

    #[test]
    fn test_end_charge_twice_returns_zero() {
        let (mut engine, mut world, caster) = arena();
        let mut core = AbilityCore::new(chargeable(0.0, 1.0));

        let mut ctx = engine.context(&mut world);
        core.start_charge(&mut ctx, caster);
        ctx.now = 2.0;
        assert_eq!(core.end_charge(&mut ctx, caster), 1.0);
        assert_eq!(core.end_charge(&mut ctx, caster), 0.0);
    }

    #[test]
    fn test_charged_parameter_law() {
        let core = AbilityCore::new(chargeable(0.0, 1.0));

        assert_relative_eq!(core.charged(0.0, |c| c.damage, 10.0), 20.0);
        assert_relative_eq!(core.charged(0.25, |c| c.damage, 10.0), 27.5);
        assert_relative_eq!(core.charged(1.0, |c| c.damage, 10.0), 50.0);

        // Диапазон не задан → base
        assert_eq!(core.charged(1.0, |c| c.speed, 10.0), 10.0);
        assert_eq!(AbilityCore::new(spark(0.0)).charged(1.0, |c| c.damage, 10.0), 10.0);
    }

    #[test]
    fn test_use_impulse_backward_along_aim() {
        let (mut engine, mut world, caster) = arena();
        let core = AbilityCore::new(spark(0.0).with_use_impulse(UseImpulse {
            direction: ImpulseDirection::Backward,
            force: 4.0,
            use_aim_direction: true,
        }));

        let mut ctx = engine.context(&mut world);
        core.apply_use_impulse(&mut ctx, caster, Some(Vec3::new(0.0, 0.0, 2.0)), None);

        // set velocity + impulse той же величины (масса 1)
        let velocity = world
            .combatant_body(caster)
            .and_then(|body| world.body_velocity(body))
            .unwrap_or(Vec3::NAN);
        assert_relative_eq!(velocity.x, 0.0);
        assert_relative_eq!(velocity.y, 0.2, epsilon = 1e-6);
        assert_relative_eq!(velocity.z, -8.0, epsilon = 1e-6);
    }

    #[test]
    fn test_use_impulse_override_and_facing() {
        let (mut engine, mut world, caster) = arena();
        world.set_facing(caster, Vec3::X);
        let core = AbilityCore::new(spark(0.0).with_use_impulse(UseImpulse {
            direction: ImpulseDirection::Forward,
            force: 1.0,
            use_aim_direction: false,
        }));

        let mut ctx = engine.context(&mut world);
        core.apply_use_impulse(&mut ctx, caster, Some(Vec3::Z), Some(3.0));

        let velocity = world
            .combatant_body(caster)
            .and_then(|body| world.body_velocity(body))
            .unwrap_or(Vec3::NAN);
        assert_relative_eq!(velocity.x, 6.0, epsilon = 1e-6);
        assert_relative_eq!(velocity.z, 0.0, epsilon = 1e-6);
    }

    fn set_pool(world: &mut SandboxWorld, id: CombatantId, kind: ResourceKind, value: f32) {
        if let Some(combatant) = world.combatant_mut(id) {
            match kind {
                ResourceKind::Health => combatant.health.current = value,
                ResourceKind::Mana => combatant.mana.current = value,
                ResourceKind::Stamina => combatant.stamina.current = value,
            }
        }
    }

    proptest! {
        #[test]
        fn prop_cooldown_monotonic(cooldown in 0.0f32..5.0, elapsed in 0.0f32..10.0) {
            let (mut engine, mut world, caster) = arena();
            let mut core = AbilityCore::new(spark(cooldown));

            let mut ctx = engine.context(&mut world);
            core.start_cooldown(&mut ctx, caster);

            prop_assert_eq!(core.can_use(elapsed, &world, caster), elapsed >= cooldown);
        }

        #[test]
        fn prop_charge_level_in_unit_range(min in 0.0f32..1.0, span in 0.0f32..2.0, elapsed in 0.0f32..5.0) {
            let (mut engine, mut world, caster) = arena();
            let mut core = AbilityCore::new(chargeable(min, min + span));

            let mut ctx = engine.context(&mut world);
            core.start_charge(&mut ctx, caster);

            let level = core.charge_level_at(elapsed);
            prop_assert!((0.0..=1.0).contains(&level));
        }
    }
}
