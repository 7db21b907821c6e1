//! PhysicsProjectileAbility — выстрел физическим снарядом
//!
//! `use_ability` только спавнит тело и регистрирует `Projectile`;
//! дальше снаряд живёт в `ProjectileRegistry` независимо от способности.

use bevy::prelude::*;
use std::sync::Arc;

use crate::config::{AbilityConfig, ProjectileConfig};
use crate::context::SimContext;
use crate::projectile::{LaunchParams, Projectile};
use crate::shared::{facing_rotation, right_of};
use crate::world::{BodyDesc, ColliderDesc, ColliderShape};

use super::{Ability, AbilityCore, Cast};

pub struct PhysicsProjectileAbility {
    core: AbilityCore,
    settings: Arc<ProjectileConfig>,
}

impl PhysicsProjectileAbility {
    /// Config обязан нести `EffectConfig::Projectile`; иначе снаряд по умолчанию (inert урон 0)
    pub fn new(config: AbilityConfig) -> Self {
        let settings = config
            .projectile()
            .cloned()
            .unwrap_or_else(|| ProjectileConfig::new(0.0, 0.0, 0.1));

        Self {
            core: AbilityCore::new(config),
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &ProjectileConfig {
        &self.settings
    }

    fn body_desc(&self, cast: &Cast, launch: &LaunchParams) -> BodyDesc {
        let direction = cast.direction.normalize_or_zero();
        let half_extent = launch.collider_radius(&self.settings);

        BodyDesc {
            label: format!("{} Projectile", self.core.config().name),
            model: self.settings.model.clone(),
            model_scale: self.settings.model_scale + launch.size,
            position: cast.origin,
            rotation: facing_rotation(direction),
            linear_velocity: direction * launch.speed,
            gravity_scale: launch.gravity_scale,
            collider: ColliderDesc {
                shape: ColliderShape::Cuboid {
                    half_extents: Vec3::splat(half_extent),
                },
                sensor: self.settings.sensor,
                friction: 0.1,
                restitution: 1.0,
            },
        }
    }
}

impl Ability for PhysicsProjectileAbility {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn use_ability(&mut self, ctx: &mut SimContext, cast: Cast) {
        let level = self.core.end_charge(ctx, cast.source);
        let launch = LaunchParams::resolve(self.core.config(), &self.settings, level);

        let body = ctx.world.spawn_body(self.body_desc(&cast, &launch));

        let direction = cast.direction.normalize_or_zero();
        if let Some(torque) = self.settings.torque {
            ctx.world.apply_torque(body, right_of(direction) * torque);
        }

        let projectile = Projectile::new(
            body,
            cast.source,
            self.core.shared_config(),
            Arc::clone(&self.settings),
            direction,
            launch,
            ctx.now,
            cast.origin,
        );

        crate::log(&format!(
            "🔥 {:?} fired '{}' (charge {:.2}, speed {:.1}, damage {:.1}, lifetime {:.2}s)",
            cast.source,
            self.core.config().name,
            level,
            launch.speed,
            launch.damage,
            projectile.lifetime
        ));

        ctx.projectiles.launch(projectile);

        self.core.spawn_use_effect(ctx, cast.origin);
        let caster_position = ctx.world.combatant_position(cast.source).unwrap_or(cast.origin);
        self.core.play_use_sound(ctx, caster_position);
        self.core
            .apply_use_impulse(ctx, cast.source, Some(cast.direction), launch.impulse_force);
    }
}
