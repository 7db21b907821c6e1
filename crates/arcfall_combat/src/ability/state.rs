//! AbilityCore — общий runtime state любой способности
//!
//! Два независимых state machine:
//! - Idle → Charging → Idle (start_charge / end_charge)
//! - Ready → OnCooldown → Ready (last_use_time)
//!
//! Инвариант: `is_charging` true только между start_charge и парным end_charge.

use bevy::prelude::*;
use std::sync::Arc;

use crate::config::{AbilityConfig, ChargeConfig, ChargeRange, ImpulseDirection, ResourceKind, Slot};
use crate::context::SimContext;
use crate::world::feedback::{CHARGE_SOUND, IMPACT_SOUND};
use crate::world::{CombatWorld, CombatantId, FeedbackEvent};

#[derive(Debug, Clone)]
pub struct AbilityCore {
    config: Arc<AbilityConfig>,
    /// None — способность ещё ни разу не использовалась
    last_use_time: Option<f32>,
    is_charging: bool,
    charge_start_time: f32,
}

impl AbilityCore {
    pub fn new(config: AbilityConfig) -> Self {
        Self {
            config: Arc::new(config),
            last_use_time: None,
            is_charging: false,
            charge_start_time: 0.0,
        }
    }

    pub fn config(&self) -> &AbilityConfig {
        &self.config
    }

    /// Snapshot конфига для снаряда (живёт дольше выстрела)
    pub fn shared_config(&self) -> Arc<AbilityConfig> {
        Arc::clone(&self.config)
    }

    pub fn slot(&self) -> Slot {
        self.config.slot
    }

    pub fn is_chargeable(&self) -> bool {
        self.config.charge.is_some()
    }

    pub fn is_charging(&self) -> bool {
        self.is_charging
    }

    pub fn last_use_time(&self) -> Option<f32> {
        self.last_use_time
    }

    // === Cooldown ===

    pub fn is_on_cooldown(&self, now: f32) -> bool {
        match self.last_use_time {
            Some(last) => now - last < self.config.cooldown,
            None => false,
        }
    }

    pub fn remaining_cooldown(&self, now: f32) -> f32 {
        match self.last_use_time {
            Some(last) => (self.config.cooldown - (now - last)).max(0.0),
            None => 0.0,
        }
    }

    pub fn start_cooldown(&mut self, ctx: &mut SimContext, owner: CombatantId) {
        self.last_use_time = Some(ctx.now);
        ctx.feedback.push(FeedbackEvent::CooldownStarted {
            combatant: owner,
            slot: self.config.slot,
            duration: self.config.cooldown,
        });
    }

    // === Resources ===

    /// Cooldown → ресурс. Health должен строго превышать стоимость
    /// (способность не может убить своего владельца).
    pub fn can_use(&self, now: f32, world: &dyn CombatWorld, user: CombatantId) -> bool {
        if self.is_on_cooldown(now) {
            return false;
        }

        let Some(available) = world.resource(user, self.config.resource_kind) else {
            return false;
        };

        match self.config.resource_kind {
            ResourceKind::Health => available > self.config.resource_cost,
            ResourceKind::Mana | ResourceKind::Stamina => available >= self.config.resource_cost,
        }
    }

    pub fn consume_resources(&self, world: &mut dyn CombatWorld, user: CombatantId) {
        if self.config.resource_cost <= 0.0 {
            return;
        }
        world.debit(user, self.config.resource_kind, self.config.resource_cost);
    }

    // === Charge ===

    pub fn start_charge(&mut self, ctx: &mut SimContext, owner: CombatantId) {
        if !self.is_chargeable() {
            return;
        }

        self.is_charging = true;
        self.charge_start_time = ctx.now;

        if let Some(cue) = &self.config.charge_sound {
            let position = ctx.world.combatant_position(owner).unwrap_or(Vec3::ZERO);
            ctx.feedback.play_sound(cue, position, ctx.rng, &CHARGE_SOUND);
        }

        ctx.feedback.push(FeedbackEvent::MovementHint {
            combatant: owner,
            slow_walk: true,
        });
        ctx.feedback.push(FeedbackEvent::ChargeBegin {
            combatant: owner,
            slot: self.config.slot,
        });
    }

    /// Чистая функция уровня заряда (без уведомления UI)
    pub fn charge_level_at(&self, now: f32) -> f32 {
        let Some(charge) = &self.config.charge else {
            return 0.0;
        };
        if !self.is_charging {
            return 0.0;
        }

        let elapsed = now - self.charge_start_time;
        let span = charge.max_charge_time - charge.min_charge_time;

        // Вырожденный диапазон → ступенька
        if span <= 0.0 {
            return if elapsed >= charge.min_charge_time { 1.0 } else { 0.0 };
        }

        ((elapsed - charge.min_charge_time) / span).clamp(0.0, 1.0)
    }

    /// Уровень заряда + pull-уведомление UI (charge bar обновляется каждый тик)
    pub fn charge_level(&self, ctx: &mut SimContext, owner: CombatantId) -> f32 {
        let level = self.charge_level_at(ctx.now);
        if self.is_charging {
            ctx.feedback.push(FeedbackEvent::ChargeLevel {
                combatant: owner,
                slot: self.config.slot,
                level,
            });
        }
        level
    }

    /// Фиксирует финальный уровень и сбрасывает заряд
    pub fn end_charge(&mut self, ctx: &mut SimContext, owner: CombatantId) -> f32 {
        if !self.is_charging {
            return 0.0;
        }

        let level = self.charge_level(ctx, owner);
        self.is_charging = false;

        ctx.feedback.push(FeedbackEvent::ChargeEnd {
            combatant: owner,
            slot: self.config.slot,
        });
        ctx.feedback.push(FeedbackEvent::MovementHint {
            combatant: owner,
            slow_walk: false,
        });

        level
    }

    /// Сброс заряда без уведомлений (detach)
    pub fn reset_charge(&mut self) {
        self.is_charging = false;
    }

    /// Значение параметра с учётом заряда (base, если диапазон не задан)
    pub fn charged(&self, level: f32, pick: impl Fn(&ChargeConfig) -> Option<ChargeRange>, base: f32) -> f32 {
        self.config
            .charge
            .as_ref()
            .and_then(pick)
            .map_or(base, |range| range.at(level))
    }

    // === Feedback helpers ===

    pub fn play_use_sound(&self, ctx: &mut SimContext, position: Vec3) {
        if let Some(cue) = &self.config.use_sound {
            ctx.feedback.play_sound(cue, position, ctx.rng, &IMPACT_SOUND);
        }
    }

    pub fn spawn_use_effect(&self, ctx: &mut SimContext, position: Vec3) {
        if let Some(effect) = &self.config.use_effect {
            ctx.feedback.spawn_effect(effect, position);
        }
    }

    /// Отдача/рывок кастера. `force_override` — заряженная сила на этот выстрел.
    pub fn apply_use_impulse(
        &self,
        ctx: &mut SimContext,
        user: CombatantId,
        aim_direction: Option<Vec3>,
        force_override: Option<f32>,
    ) {
        let Some(impulse) = self.config.use_impulse else {
            return;
        };
        let Some(body) = ctx.world.combatant_body(user) else {
            return;
        };

        let force = force_override.unwrap_or(impulse.force);
        let base = match aim_direction {
            Some(aim) if impulse.use_aim_direction => aim.normalize_or_zero(),
            _ => ctx.world.combatant_facing(user).unwrap_or(Vec3::Z),
        };

        let mut velocity = match impulse.direction {
            ImpulseDirection::Backward => base * -force,
            ImpulseDirection::Forward => base * force,
            ImpulseDirection::Up => Vec3::new(0.0, force, 0.0),
        };
        // +0.1 по Y: отрыв от пола
        velocity.y += 0.1;

        ctx.world.set_body_velocity(body, velocity);
        ctx.world.apply_impulse(body, velocity);
    }
}
