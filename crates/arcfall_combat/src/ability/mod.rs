//! Ability domain — способности и их эффекты
//!
//! Архитектура:
//! - `AbilityCore` — cooldown/charge/resource state (общий для всех)
//! - `Ability` trait — capability set {can_use, start_charge, end_charge, use, cleanup}
//! - Варианты: projectile, raycast, targeted heal, blink, beam
//!
//! Контракт dispatch (см. controller): полная активация = use → cooldown → оплата.
//! Заряд фиксирует сам `use_ability` через `end_charge` — после него charge state сброшен.

use bevy::prelude::*;

pub mod beam;
pub mod blink;
pub mod state;
pub mod hitscan;
pub mod projectile;

#[cfg(test)]
mod state_tests;
#[cfg(test)]
mod variants_tests;

pub use state::AbilityCore;
pub use beam::BeamAbility;
pub use blink::BlinkAbility;
pub use hitscan::{RaycastAbility, TargetedHealAbility};
pub use projectile::PhysicsProjectileAbility;

use crate::config::{AbilityConfig, EffectConfig};
use crate::context::SimContext;
use crate::world::CombatantId;

/// Куда и от чьего имени применить эффект (результат aim)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cast {
    pub origin: Vec3,
    pub direction: Vec3,
    pub source: CombatantId,
}

pub trait Ability: Send + Sync {
    fn core(&self) -> &AbilityCore;

    fn core_mut(&mut self) -> &mut AbilityCore;

    fn name(&self) -> &str {
        &self.core().config().name
    }

    fn can_use(&self, ctx: &SimContext, user: CombatantId) -> bool {
        self.core().can_use(ctx.now, &*ctx.world, user)
    }

    fn start_charge(&mut self, ctx: &mut SimContext, owner: CombatantId) {
        self.core_mut().start_charge(ctx, owner);
    }

    fn charge_level(&self, ctx: &mut SimContext, owner: CombatantId) -> f32 {
        self.core().charge_level(ctx, owner)
    }

    fn end_charge(&mut self, ctx: &mut SimContext, owner: CombatantId) -> f32 {
        self.core_mut().end_charge(ctx, owner)
    }

    fn start_cooldown(&mut self, ctx: &mut SimContext, owner: CombatantId) {
        self.core_mut().start_cooldown(ctx, owner);
    }

    fn consume_resources(&self, ctx: &mut SimContext, user: CombatantId) {
        self.core().consume_resources(&mut *ctx.world, user);
    }

    /// Эффект способности (полная активация)
    fn use_ability(&mut self, ctx: &mut SimContext, cast: Cast);

    /// Tick-вариант для hold/toggle режимов; по умолчанию тот же эффект
    fn use_tick(&mut self, ctx: &mut SimContext, cast: Cast) {
        self.use_ability(ctx, cast);
    }

    /// Вызывается при detach контроллера
    fn cleanup(&mut self) {
        self.core_mut().reset_charge();
    }
}

/// Собирает способность по её effect config
pub fn build_ability(config: AbilityConfig) -> Box<dyn Ability> {
    match &config.effect {
        EffectConfig::Projectile(_) => Box::new(PhysicsProjectileAbility::new(config)),
        EffectConfig::Raycast { .. } => Box::new(RaycastAbility::new(config)),
        EffectConfig::TargetedHeal { .. } => Box::new(TargetedHealAbility::new(config)),
        EffectConfig::Blink { .. } => Box::new(BlinkAbility::new(config)),
        EffectConfig::Beam(_) => Box::new(BeamAbility::new(config)),
    }
}
