//! Встроенные классы (баланс из плейтестов)
//!
//! Wizard — fireball с AOE + быстрые firedarts (multi-hit sensor)
//! Fighter — топор-бумеранг + заряжаемый рывок-слэш
//! Archer — заряжаемая стрела + бомба с AOE

use super::{
    AbilityConfig, ActivationMode, AoeConfig, BeamConfig, ChargeConfig, ChargeRange, ClassLoadout, ClassStats,
    EffectConfig, ImpulseDirection, MultiHitConfig, ProjectileConfig, ResourceKind, Slot, SoundCue, UseImpulse,
    VelocityReverseConfig,
};

pub fn wizard() -> ClassLoadout {
    let fireball = ProjectileConfig {
        max_range: Some(19.0),
        gravity_scale: 0.0,
        knockback: 0.8,
        model: Some("models/projectiles/fireball.gltf".into()),
        model_scale: 0.9,
        hit_effect: Some("explosion".into()),
        aoe: Some(AoeConfig {
            radius: 2.0,
            damage: 10.0,
            knockback: 15.5,
            falloff: true,
        }),
        ..ProjectileConfig::new(21.0, 30.0, 0.3)
    };

    let firedarts = ProjectileConfig {
        max_range: Some(12.0),
        gravity_scale: 0.1,
        knockback: 0.3,
        model: Some("models/projectiles/firedart.gltf".into()),
        model_scale: 0.3,
        sensor: true,
        hit_effect: Some("firehit".into()),
        multi_hit: Some(MultiHitConfig {
            max_hits: 3,
            hit_cooldown: 0.2,
        }),
        ..ProjectileConfig::new(20.0, 5.0, 0.05)
    };

    ClassLoadout {
        class: "Wizard".into(),
        stats: ClassStats {
            max_health: 150.0,
            run_speed: 8.0,
            jump_velocity: 11.0,
        },
        abilities: vec![
            AbilityConfig {
                use_sound: Some(SoundCue::new("audio/sfx/fire/Fire Spell 01.wav").with_volume(0.6)),
                hit_sound: Some(
                    SoundCue::new("audio/sfx/fire/Fire Spell 18.wav")
                        .with_volume(0.8)
                        .with_reference_distance(20.0),
                ),
                ..AbilityConfig::new("Fireball", Slot::Primary, 1.0, EffectConfig::Projectile(fireball))
                    .with_cost(ResourceKind::Mana, 35.0)
                    .with_use_impulse(UseImpulse {
                        direction: ImpulseDirection::Backward,
                        force: 4.0,
                        use_aim_direction: true,
                    })
            },
            AbilityConfig {
                use_sound: Some(SoundCue::new("audio/sfx/fire/Fire Spell 02.wav").with_volume(0.6)),
                hit_sound: Some(SoundCue::new("audio/sfx/fire/fire-ignite.mp3").with_volume(0.8)),
                ..AbilityConfig::new("Firedarts", Slot::Secondary, 0.2, EffectConfig::Projectile(firedarts))
                    .with_cost(ResourceKind::Mana, 1.0)
            },
        ],
    }
}

pub fn fighter() -> ClassLoadout {
    let axe = ProjectileConfig {
        max_range: None,
        life_time: Some(1.2),
        gravity_scale: 0.0,
        torque: Some(2.0),
        knockback: 0.6,
        model: Some("models/items/battle-axe.gltf".into()),
        model_scale: 0.6,
        sensor: true,
        hit_effect: Some("cloud_puff".into()),
        multi_hit: Some(MultiHitConfig {
            max_hits: 5,
            hit_cooldown: 0.15,
        }),
        velocity_reverse: Some(VelocityReverseConfig {
            time: 0.6,
            duration: 0.18,
            speed_multiplier: 1.1,
        }),
        ..ProjectileConfig::new(25.0, 15.0, 0.3)
    };

    let slash = ProjectileConfig {
        max_range: Some(0.1),
        life_time: Some(0.25),
        gravity_scale: 0.0,
        knockback: 0.4,
        model: Some("models/projectiles/slash1.gltf".into()),
        model_scale: 0.6,
        sensor: true,
        multi_hit: Some(MultiHitConfig {
            max_hits: 100,
            hit_cooldown: 0.2,
        }),
        ..ProjectileConfig::new(15.0, 15.0, 0.6)
    };

    ClassLoadout {
        class: "Fighter".into(),
        stats: ClassStats {
            max_health: 200.0,
            run_speed: 6.0,
            jump_velocity: 14.0,
        },
        abilities: vec![
            AbilityConfig {
                use_sound: Some(
                    SoundCue::new("audio/sfx/player/player-swing-woosh.mp3")
                        .with_volume(0.9)
                        .with_reference_distance(8.0),
                ),
                hit_sound: Some(
                    SoundCue::new("audio/sfx/player/player-swing-woosh.mp3")
                        .with_volume(0.5)
                        .with_reference_distance(8.0),
                ),
                ..AbilityConfig::new("Axe Throw", Slot::Primary, 1.5, EffectConfig::Projectile(axe))
                    .with_cost(ResourceKind::Mana, 0.0)
            },
            AbilityConfig {
                use_sound: Some(SoundCue::new("audio/sfx/damage/Sword Woosh 19.wav").with_volume(0.9)),
                ..AbilityConfig::new("Charge Slash", Slot::Secondary, 0.7, EffectConfig::Projectile(slash))
                    .with_cost(ResourceKind::Mana, 30.0)
                    .with_charge(ChargeConfig {
                        min_charge_time: 0.0,
                        max_charge_time: 1.0,
                        speed: Some(ChargeRange::new(20.0, 30.0)),
                        damage: Some(ChargeRange::new(20.0, 50.0)),
                        size: Some(ChargeRange::new(0.6, 1.3)),
                        // backward + отрицательная сила = рывок вперёд
                        impulse_force: Some(ChargeRange::new(-5.0, -11.0)),
                        gravity: None,
                    })
                    .with_use_impulse(UseImpulse {
                        direction: ImpulseDirection::Backward,
                        force: -15.0,
                        use_aim_direction: true,
                    })
            },
        ],
    }
}

pub fn archer() -> ClassLoadout {
    let arrow = ProjectileConfig {
        max_range: Some(100.0),
        gravity_scale: 0.5,
        knockback: 0.5,
        model: Some("models/projectiles/arrow.gltf".into()),
        model_scale: 0.6,
        face_velocity: true,
        hit_effect: Some("cloud_puff".into()),
        ..ProjectileConfig::new(30.0, 25.0, 0.3)
    };

    let bomb = ProjectileConfig {
        max_range: None,
        life_time: Some(1.5),
        gravity_scale: 0.6,
        knockback: 0.8,
        model: Some("models/items/bomb.gltf".into()),
        no_hit_on_terrain: true,
        hit_effect: Some("explosion_small".into()),
        aoe: Some(AoeConfig {
            radius: 2.0,
            damage: 20.0,
            knockback: 10.5,
            falloff: true,
        }),
        ..ProjectileConfig::new(18.0, 15.0, 0.3)
    };

    ClassLoadout {
        class: "Archer".into(),
        stats: ClassStats {
            max_health: 180.0,
            run_speed: 7.0,
            jump_velocity: 12.0,
        },
        abilities: vec![
            AbilityConfig {
                use_sound: Some(
                    SoundCue::new("audio/sfx/player/Fantasy_Game_Attack_Bow_A.wav")
                        .with_volume(0.8)
                        .with_reference_distance(8.0),
                ),
                hit_sound: Some(
                    SoundCue::new("audio/sfx/player/bow-hit.mp3")
                        .with_volume(0.5)
                        .with_reference_distance(8.0),
                ),
                charge_sound: Some(
                    SoundCue::new("audio/sfx/player/Bow string drawing fast 1.wav")
                        .with_volume(0.8)
                        .with_reference_distance(5.0),
                ),
                ..AbilityConfig::new("Arrow", Slot::Primary, 0.5, EffectConfig::Projectile(arrow))
                    .with_cost(ResourceKind::Mana, 0.0)
                    .with_charge(ChargeConfig {
                        min_charge_time: 0.0,
                        max_charge_time: 0.8,
                        speed: Some(ChargeRange::new(18.0, 75.0)),
                        damage: Some(ChargeRange::new(25.0, 60.0)),
                        gravity: Some(ChargeRange::new(0.4, 0.01)),
                        size: None,
                        impulse_force: None,
                    })
            },
            AbilityConfig {
                use_sound: Some(SoundCue::new("audio/sfx/player/player-swing-woosh.mp3").with_volume(0.8)),
                hit_sound: Some(
                    SoundCue::new("audio/sfx/fire/Fire Spell 18.wav")
                        .with_volume(0.8)
                        .with_reference_distance(20.0),
                ),
                ..AbilityConfig::new("Bomb", Slot::Secondary, 0.9, EffectConfig::Projectile(bomb))
                    .with_cost(ResourceKind::Mana, 35.0)
                    .with_use_impulse(UseImpulse {
                        direction: ImpulseDirection::Backward,
                        force: 3.0,
                        use_aim_direction: true,
                    })
            },
        ],
    }
}

/// Альтернативный secondary для Wizard: луч на удержание
pub fn fire_beam() -> AbilityConfig {
    AbilityConfig::new(
        "Fire Beam",
        Slot::Secondary,
        0.0,
        EffectConfig::Beam(BeamConfig {
            range: 7.0,
            damage_per_tick: 5.0,
            tick_interval: 0.1,
            effect: Some("fire_beam".into()),
        }),
    )
    .with_cost(ResourceKind::Mana, 2.0)
    .with_activation(ActivationMode::HoldContinuous)
}

/// Альтернативный secondary для Wizard: блинк
pub fn teleport() -> AbilityConfig {
    AbilityConfig::new("Teleport", Slot::Secondary, 1.0, EffectConfig::Blink { distance: 10.0 })
        .with_cost(ResourceKind::Mana, 20.0)
}

pub fn by_name(class: &str) -> Option<ClassLoadout> {
    match class.to_ascii_lowercase().as_str() {
        "wizard" => Some(wizard()),
        "fighter" => Some(fighter()),
        "archer" => Some(archer()),
        _ => None,
    }
}
