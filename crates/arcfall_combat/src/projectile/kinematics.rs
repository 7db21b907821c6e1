//! Velocity reversal state machine (топор-бумеранг)
//!
//! outbound → returning по возрасту, stuck — после удара о terrain.
//! Без reversal config скоростью управляет физика (гравитация), не мы.

use bevy::prelude::*;

use crate::config::VelocityReverseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum KinematicPhase {
    /// Летит в направлении выстрела
    Outbound,
    /// Возраст перевалил за reversal time — летит обратно
    Returning,
    /// Зацепился за terrain (скорость 0)
    Stuck,
}

/// Фаза по возрасту снаряда. Terrain hit приоритетнее разворота.
pub fn phase_at(age: f32, reverse: Option<&VelocityReverseConfig>, stopped_by_terrain: bool) -> KinematicPhase {
    if stopped_by_terrain {
        return KinematicPhase::Stuck;
    }

    match reverse {
        Some(reverse) if age > reverse.time => KinematicPhase::Returning,
        _ => KinematicPhase::Outbound,
    }
}

/// Скорость, которую reversal навязывает телу в данной фазе
pub fn steered_velocity(phase: KinematicPhase, direction: Vec3, speed: f32, return_multiplier: f32) -> Vec3 {
    match phase {
        KinematicPhase::Outbound => direction * speed,
        KinematicPhase::Returning => -direction * speed * return_multiplier,
        KinematicPhase::Stuck => Vec3::ZERO,
    }
}
