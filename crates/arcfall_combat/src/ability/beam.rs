//! BeamAbility — непрерывный луч (hold_continuous)
//!
//! Визуальный сегмент обновляется каждый вызов; урон и оплата — раз в `tick_interval`.

use bevy::prelude::*;

use crate::config::{AbilityConfig, BeamConfig, EffectConfig};
use crate::context::SimContext;
use crate::world::FeedbackEvent;

use super::{Ability, AbilityCore, Cast};

pub struct BeamAbility {
    core: AbilityCore,
    beam: BeamConfig,
    /// Время последнего уронного тика
    last_tick: Option<f32>,
    last_hit_point: Option<Vec3>,
}

impl BeamAbility {
    pub fn new(config: AbilityConfig) -> Self {
        let beam = match &config.effect {
            EffectConfig::Beam(beam) => beam.clone(),
            _ => BeamConfig {
                range: 0.0,
                damage_per_tick: 0.0,
                tick_interval: f32::INFINITY,
                effect: None,
            },
        };
        Self {
            core: AbilityCore::new(config),
            beam,
            last_tick: None,
            last_hit_point: None,
        }
    }

    pub fn last_hit_point(&self) -> Option<Vec3> {
        self.last_hit_point
    }

    fn damage_tick_due(&self, now: f32) -> bool {
        match self.last_tick {
            Some(last) => now - last >= self.beam.tick_interval,
            None => true,
        }
    }
}

impl Ability for BeamAbility {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn use_ability(&mut self, ctx: &mut SimContext, cast: Cast) {
        let direction = cast.direction.normalize_or_zero();
        let exclude = ctx.world.combatant_body(cast.source);
        let hit = ctx
            .world
            .raycast(cast.origin, direction, self.beam.range, exclude);

        let end = hit
            .map(|hit| hit.point)
            .unwrap_or(cast.origin + direction * self.beam.range);
        self.last_hit_point = Some(end);

        ctx.feedback.push(FeedbackEvent::BeamSegment {
            combatant: cast.source,
            from: cast.origin,
            to: end,
        });

        if !self.damage_tick_due(ctx.now) {
            return;
        }
        self.last_tick = Some(ctx.now);

        // Hold-режим не проходит через полную активацию — платим за каждый уронный тик
        self.core.consume_resources(&mut *ctx.world, cast.source);

        if let Some(effect) = &self.beam.effect {
            ctx.feedback.spawn_effect(effect, end);
        }

        let Some(target) = hit.and_then(|hit| hit.contact.combatant()) else {
            return;
        };
        if target == cast.source || ctx.world.is_dead(target) {
            return;
        }

        ctx.world
            .take_damage(target, self.beam.damage_per_tick, Some(cast.source));
    }

    fn cleanup(&mut self) {
        self.core.reset_charge();
        self.last_tick = None;
        self.last_hit_point = None;
    }
}
