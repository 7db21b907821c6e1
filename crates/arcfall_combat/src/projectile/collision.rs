//! Collision routing — overlap begin → урон / terrain / pass-through
//!
//! События приходят очередью из `PhysicsWorld::drain_collisions` в начале тика.
//! Снаряд вынимается из registry на время обработки и возвращается, если выжил.

use bevy::prelude::*;

use crate::context::SimContext;
use crate::world::{CollisionEvent, CombatantId, Contact};

use super::{terminate, Projectile, BLOOD_HIT_EFFECT};

/// Исход одного overlap для снаряда
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Событие не касается снаряда (self, suppressed, re-hit cooldown, мёртвая цель)
    Ignored,
    /// Попадание засчитано, снаряд летит дальше
    Continue,
    Terminate,
}

/// Разбирает одно collision event. Возвращает None, если тело — не наш снаряд.
pub fn handle_collision(ctx: &mut SimContext, event: &CollisionEvent) -> Option<CollisionOutcome> {
    if !event.started {
        return None;
    }

    let mut projectile = ctx.projectiles.take(event.body)?;
    let outcome = match event.other {
        Contact::Terrain => strike_terrain(&mut projectile),
        Contact::Combatant(target) => strike_combatant(ctx, &mut projectile, target),
        Contact::Body(_) => CollisionOutcome::Ignored,
    };

    match outcome {
        CollisionOutcome::Terminate => terminate(ctx, projectile),
        CollisionOutcome::Ignored | CollisionOutcome::Continue => ctx.projectiles.restore(projectile),
    }

    Some(outcome)
}

fn strike_terrain(projectile: &mut Projectile) -> CollisionOutcome {
    if projectile.settings.no_hit_on_terrain {
        return CollisionOutcome::Ignored;
    }

    projectile.stopped_by_terrain = true;

    if projectile.settings.multi_hit.is_none() || projectile.settings.destroy_on_terrain {
        CollisionOutcome::Terminate
    } else {
        CollisionOutcome::Continue
    }
}

fn strike_combatant(ctx: &mut SimContext, projectile: &mut Projectile, target: CombatantId) -> CollisionOutcome {
    if target == projectile.source || projectile.settings.no_hit_on_entity {
        return CollisionOutcome::Ignored;
    }
    if !ctx.world.contains(target) || ctx.world.is_dead(target) {
        return CollisionOutcome::Ignored;
    }

    // Per-target re-hit cooldown (только для multi-hit)
    if let (Some(multi), Some(last_hit)) = (projectile.settings.multi_hit, projectile.last_hit_on(target)) {
        if ctx.now - last_hit < multi.hit_cooldown {
            return CollisionOutcome::Ignored;
        }
    }

    ctx.world
        .take_damage(target, projectile.launch.damage, Some(projectile.source));

    if projectile.settings.knockback != 0.0 {
        let travel = ctx
            .world
            .body_velocity(projectile.body)
            .filter(|velocity| *velocity != Vec3::ZERO)
            .unwrap_or(projectile.direction * projectile.launch.speed);
        if let Some(target_body) = ctx.world.combatant_body(target) {
            ctx.world
                .apply_impulse(target_body, travel * projectile.settings.knockback);
        }
    }

    if let Some(position) = ctx.world.combatant_position(target) {
        ctx.feedback.spawn_effect(BLOOD_HIT_EFFECT, position);
    }

    projectile.hits += 1;
    projectile.hit_log.insert(target, ctx.now);

    crate::log(&format!(
        "🎯 '{}' hit {:?} for {:.1} (hit #{})",
        projectile.name(),
        target,
        projectile.launch.damage,
        projectile.hits
    ));

    match projectile.settings.multi_hit {
        Some(multi) if projectile.hits < multi.max_hits => CollisionOutcome::Continue,
        _ => CollisionOutcome::Terminate,
    }
}
