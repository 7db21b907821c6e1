//! AOE sweep — один радиальный урон/knockback в точке смерти снаряда
//!
//! Overlap query мгновенный: видит только тех, кто в радиусе прямо сейчас.

use bevy::prelude::*;

use crate::config::AoeConfig;
use crate::context::SimContext;
use crate::world::{CombatantId, Contact};

use super::BLOOD_HIT_EFFECT;

/// Результат по одной цели (для логов и тестов)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlastHit {
    pub target: CombatantId,
    pub distance: f32,
    pub damage: f32,
    pub knockback: f32,
}

/// (damage, knockback) на дистанции; falloff линейный `1 - d/r`, clamp ≥ 0
pub fn blast_amounts(aoe: &AoeConfig, distance: f32) -> (f32, f32) {
    if !aoe.falloff {
        return (aoe.damage, aoe.knockback);
    }

    let factor = if aoe.radius > 0.0 {
        (1.0 - distance / aoe.radius).max(0.0)
    } else {
        0.0
    };

    (aoe.damage * factor, aoe.knockback * factor)
}

pub fn resolve_blast(ctx: &mut SimContext, center: Vec3, aoe: &AoeConfig, source: CombatantId) -> Vec<BlastHit> {
    let mut hits = Vec::new();

    for contact in ctx.world.overlap_sphere(center, aoe.radius) {
        let Contact::Combatant(target) = contact else {
            continue;
        };
        if ctx.world.is_dead(target) {
            continue;
        }
        let Some(position) = ctx.world.combatant_position(target) else {
            continue;
        };

        let distance = position.distance(center);
        let (damage, knockback) = blast_amounts(aoe, distance);

        ctx.world.take_damage(target, damage, Some(source));
        ctx.feedback.spawn_effect(BLOOD_HIT_EFFECT, position);

        if knockback > 0.0 {
            if let Some(body) = ctx.world.combatant_body(target) {
                let away = (position - center).normalize_or_zero();
                ctx.world.apply_impulse(body, away * knockback);
            }
        }

        hits.push(BlastHit {
            target,
            distance,
            damage,
            knockback,
        });
    }

    if !hits.is_empty() {
        crate::log(&format!(
            "💥 AOE at {:.2?} (r={}) hit {} target(s)",
            center,
            aoe.radius,
            hits.len()
        ));
    }

    hits
}
