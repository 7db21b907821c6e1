//! BlinkAbility — телепорт кастера вдоль aim direction
//!
//! Препятствие ближе 2.5м отменяет телепорт; дальше — встаём за 2м до него.

use bevy::prelude::*;

use crate::config::{AbilityConfig, EffectConfig};
use crate::context::SimContext;

use super::{Ability, AbilityCore, Cast};

/// Препятствие ближе — телепорта нет
pub const MIN_OBSTACLE_DISTANCE: f32 = 2.5;

/// Зазор до препятствия
pub const OBSTACLE_BUFFER: f32 = 2.0;

/// Дистанция телепорта по результату raycast (0 — отмена)
pub fn blink_distance(max_distance: f32, obstacle_distance: Option<f32>) -> f32 {
    match obstacle_distance {
        Some(distance) if distance < MIN_OBSTACLE_DISTANCE => 0.0,
        Some(distance) => (distance - OBSTACLE_BUFFER).max(0.0),
        None => max_distance,
    }
}

pub struct BlinkAbility {
    core: AbilityCore,
    distance: f32,
}

impl BlinkAbility {
    pub fn new(config: AbilityConfig) -> Self {
        let distance = match config.effect {
            EffectConfig::Blink { distance } => distance,
            _ => 0.0,
        };
        Self {
            core: AbilityCore::new(config),
            distance,
        }
    }
}

impl Ability for BlinkAbility {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn use_ability(&mut self, ctx: &mut SimContext, cast: Cast) {
        self.core.end_charge(ctx, cast.source);

        let exclude = ctx.world.combatant_body(cast.source);
        let obstacle = ctx
            .world
            .raycast(cast.origin, cast.direction, self.distance, exclude)
            .map(|hit| cast.origin.distance(hit.point));

        let travel = blink_distance(self.distance, obstacle);
        if travel <= 0.0 {
            crate::log(&format!("Blink {:?} blocked ({:?})", cast.source, obstacle));
            return;
        }

        let destination = cast.origin + cast.direction.normalize_or_zero() * travel;

        self.core.spawn_use_effect(ctx, cast.origin);
        ctx.world.teleport(cast.source, destination);
        self.core.play_use_sound(ctx, destination);

        crate::log(&format!(
            "✨ {:?} blinked {:.1}m to {:.2?}",
            cast.source, travel, destination
        ));
    }
}
