//! Hitscan способности: мгновенный луч от aim origin
//!
//! Raycast — урон первому бойцу на луче, TargetedHeal — лечение.
//! Terrain на пути блокирует оба (луч останавливается на первом попадании).

use bevy::prelude::*;

use crate::config::{AbilityConfig, EffectConfig};
use crate::context::SimContext;
use crate::world::{CombatantId, RayHit};

use super::{Ability, AbilityCore, Cast};

/// Первый боец на луче (без кастера)
fn first_combatant_hit(ctx: &SimContext, cast: &Cast, max_range: f32) -> Option<(CombatantId, RayHit)> {
    let exclude = ctx.world.combatant_body(cast.source);
    let hit = ctx.world.raycast(cast.origin, cast.direction, max_range, exclude)?;
    let target = hit.contact.combatant()?;

    if target == cast.source || ctx.world.is_dead(target) {
        return None;
    }
    Some((target, hit))
}

pub struct RaycastAbility {
    core: AbilityCore,
    damage: f32,
    max_range: f32,
}

impl RaycastAbility {
    pub fn new(config: AbilityConfig) -> Self {
        let (damage, max_range) = match config.effect {
            EffectConfig::Raycast { damage, max_range } => (damage, max_range),
            _ => (0.0, 0.0),
        };
        Self {
            core: AbilityCore::new(config),
            damage,
            max_range,
        }
    }
}

impl Ability for RaycastAbility {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn use_ability(&mut self, ctx: &mut SimContext, cast: Cast) {
        let level = self.core.end_charge(ctx, cast.source);
        let damage = self.core.charged(level, |charge| charge.damage, self.damage);

        self.core.spawn_use_effect(ctx, cast.origin);
        self.core.play_use_sound(ctx, cast.origin);

        let Some((target, hit)) = first_combatant_hit(ctx, &cast, self.max_range) else {
            return;
        };

        ctx.world.take_damage(target, damage, Some(cast.source));
        ctx.feedback
            .spawn_effect(crate::projectile::BLOOD_HIT_EFFECT, hit.point);

        crate::log(&format!(
            "⚡ '{}' hitscan {:?} → {:?} for {:.1} at {:.1}m",
            self.core.config().name,
            cast.source,
            target,
            damage,
            hit.distance
        ));
    }
}

pub struct TargetedHealAbility {
    core: AbilityCore,
    healing: f32,
    max_range: f32,
}

impl TargetedHealAbility {
    pub fn new(config: AbilityConfig) -> Self {
        let (healing, max_range) = match config.effect {
            EffectConfig::TargetedHeal { healing, max_range } => (healing, max_range),
            _ => (0.0, 0.0),
        };
        Self {
            core: AbilityCore::new(config),
            healing,
            max_range,
        }
    }
}

impl Ability for TargetedHealAbility {
    fn core(&self) -> &AbilityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut AbilityCore {
        &mut self.core
    }

    fn use_ability(&mut self, ctx: &mut SimContext, cast: Cast) {
        self.core.end_charge(ctx, cast.source);
        self.core.play_use_sound(ctx, cast.origin);

        let Some((target, hit)) = first_combatant_hit(ctx, &cast, self.max_range) else {
            return;
        };

        ctx.world.heal(target, self.healing);
        self.core.spawn_use_effect(ctx, hit.point);

        crate::log(&format!(
            "💚 '{}' healed {:?} for {:.1}",
            self.core.config().name,
            target,
            self.healing
        ));
    }
}
