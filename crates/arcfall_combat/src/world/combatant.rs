//! Combatant collaborator: resource ledger + damage application
//!
//! Правила clamp/death/team живут в реализации (мир), не в движке.
//! Движок только читает ресурс, списывает стоимость и наносит урон.

use bevy::prelude::*;

use super::{BodyHandle, CombatantId};
use crate::config::{ClassStats, ResourceKind};

pub trait CombatantRegistry {
    fn contains(&self, id: CombatantId) -> bool;

    /// Текущее значение ресурса (None — бойца нет в мире)
    fn resource(&self, id: CombatantId, kind: ResourceKind) -> Option<f32>;

    /// Списать стоимость способности; clamp на стороне мира.
    /// Health-стоимость идёт как урон без источника.
    fn debit(&mut self, id: CombatantId, kind: ResourceKind, amount: f32);

    fn take_damage(&mut self, id: CombatantId, amount: f32, source: Option<CombatantId>);

    fn heal(&mut self, id: CombatantId, amount: f32);

    fn is_dead(&self, id: CombatantId) -> bool;

    fn combatant_position(&self, id: CombatantId) -> Option<Vec3>;

    /// Направление «вперёд» модели (fallback для use impulse без aim)
    fn combatant_facing(&self, id: CombatantId) -> Option<Vec3>;

    /// Собственное тело бойца (exclude для aim raycast, knockback)
    fn combatant_body(&self, id: CombatantId) -> Option<BodyHandle>;

    fn teleport(&mut self, id: CombatantId, position: Vec3);

    /// Class stats при attach контроллера (max health + полный heal).
    /// Миры без понятия классов могут игнорировать.
    fn apply_class_stats(&mut self, _id: CombatantId, _stats: &ClassStats) {}
}
