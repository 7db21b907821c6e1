//! Исходы боя со стороны мира (урон, смерть)
//!
//! Движок их не генерирует — это делает реализация `CombatantRegistry`
//! (sandbox пишет их в журнал, plugin пробрасывает в bevy Events).

use bevy::prelude::*;

use super::CombatantId;

/// Урон применён к бойцу
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    /// None — урон без источника (стоимость health-способности, окружение)
    pub attacker: Option<CombatantId>,
    pub target: CombatantId,
    /// Фактически снятое здоровье (после clamp)
    pub damage: f32,
    pub target_died: bool,
}

/// Боец умер (health дошёл до 0)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct CombatantDied {
    pub combatant: CombatantId,
    /// None — самоубийство или урон без источника
    pub killer: Option<CombatantId>,
}
