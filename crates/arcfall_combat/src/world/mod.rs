//! World collaborators (физика + combatant resource ledger + feedback)
//!
//! Движок способностей НЕ владеет ни физикой, ни здоровьем игроков.
//! Всё, что ему нужно от мира, описано узкими trait'ами:
//! - `PhysicsWorld` — bodies, raycast, overlap, collision events
//! - `CombatantRegistry` — ресурсы (health/mana/stamina), урон, позиция
//! - `FeedbackQueue` — fire-and-forget события для UI/audio/VFX
//!
//! Реальная игра подключает адаптер к своему физ-движку; в тестах и headless-демо
//! работает `crate::sandbox::SandboxWorld`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

pub mod combatant;
pub mod events;
pub mod feedback;
pub mod physics;

pub use combatant::CombatantRegistry;
pub use events::{CombatantDied, DamageDealt};
pub use feedback::{FeedbackEvent, FeedbackQueue};
pub use physics::{BodyDesc, ColliderDesc, ColliderShape, CollisionEvent, PhysicsWorld, RayHit};

/// Стабильный ID бойца (владелец — мир, контроллер держит только ID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect)]
pub struct CombatantId(pub u64);

/// Handle физического тела в world simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct BodyHandle(pub u64);

/// С чем столкнулось тело (или во что попал луч)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Contact {
    /// Damageable боец
    Combatant(CombatantId),
    /// Статическая геометрия уровня (блоки, стены, пол)
    Terrain,
    /// Любое другое динамическое тело (чужой снаряд и т.п.)
    Body(BodyHandle),
}

impl Contact {
    pub fn combatant(&self) -> Option<CombatantId> {
        match self {
            Contact::Combatant(id) => Some(*id),
            _ => None,
        }
    }
}

/// Полный мир, с которым работает движок: физика + реестр бойцов
pub trait CombatWorld: PhysicsWorld + CombatantRegistry {}

impl<T: PhysicsWorld + CombatantRegistry> CombatWorld for T {}
