//! Projectile domain — жизнь снаряда после выстрела
//!
//! Снаряд независим от способности, которая его выпустила:
//! - `ProjectileRegistry` хранит живые снаряды по BodyHandle
//! - `advance_projectiles` — per-tick: reversal, face velocity, lifetime, orphan cleanup
//! - `collision::handle_collision` — overlap begin → урон / multi-hit / terrain
//! - `terminate` — AOE sweep → hit FX/sound → destroy body (ровно один раз)
//!
//! Инвариант: снаряд удаляется из registry при age ≥ lifetime, исчерпании hit budget
//! или первом попадании без multi-hit.

use bevy::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

pub mod aoe;
pub mod collision;
pub mod kinematics;


pub use aoe::{blast_amounts, resolve_blast, BlastHit};
pub use collision::{handle_collision, CollisionOutcome};
pub use kinematics::{phase_at, steered_velocity, KinematicPhase};

use crate::config::{AbilityConfig, ProjectileConfig};
use crate::context::SimContext;
use crate::shared::facing_rotation;
use crate::world::feedback::IMPACT_SOUND;
use crate::world::{BodyHandle, CombatantId};

/// VFX попадания по бойцу
pub const BLOOD_HIT_EFFECT: &str = "bloodhit";

/// Параметры выстрела после применения уровня заряда
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchParams {
    pub speed: f32,
    pub damage: f32,
    pub gravity_scale: f32,
    /// Бонус к размеру модели/коллайдера (0 — без бонуса)
    pub size: f32,
    /// Заряженная сила use impulse (None — из UseImpulse)
    pub impulse_force: Option<f32>,
}

impl LaunchParams {
    pub fn resolve(config: &AbilityConfig, projectile: &ProjectileConfig, level: f32) -> Self {
        let charge = config.charge.as_ref();
        let at = |range: Option<crate::config::ChargeRange>, base: f32| range.map_or(base, |r| r.at(level));

        Self {
            speed: at(charge.and_then(|c| c.speed), projectile.speed),
            damage: at(charge.and_then(|c| c.damage), projectile.damage),
            gravity_scale: at(charge.and_then(|c| c.gravity), projectile.gravity_scale),
            size: at(charge.and_then(|c| c.size), 0.0),
            impulse_force: charge.and_then(|c| c.impulse_force).map(|r| r.at(level)),
        }
    }

    /// Half-extent коллайдера: radius * (1 + size / model_scale) при size > 0
    pub fn collider_radius(&self, projectile: &ProjectileConfig) -> f32 {
        if self.size > 0.0 && projectile.model_scale > 0.0 {
            projectile.radius * (1.0 + self.size / projectile.model_scale)
        } else {
            projectile.radius
        }
    }

    /// life_time → range / speed → бесконечность
    pub fn lifetime(&self, projectile: &ProjectileConfig) -> f32 {
        if let Some(life_time) = projectile.life_time {
            return life_time;
        }
        match projectile.max_range {
            Some(range) if self.speed > 0.0 => range / self.speed,
            _ => f32::INFINITY,
        }
    }
}

/// Runtime state одного выстрела
#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: BodyHandle,
    pub source: CombatantId,
    ability: Arc<AbilityConfig>,
    settings: Arc<ProjectileConfig>,
    /// Нормализованное направление выстрела
    pub direction: Vec3,
    pub launch: LaunchParams,
    pub spawned_at: f32,
    pub lifetime: f32,
    last_position: Vec3,
    hits: u32,
    /// Per-target timestamp последнего попадания (multi-hit cooldown)
    hit_log: HashMap<CombatantId, f32>,
    stopped_by_terrain: bool,
}

impl Projectile {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        body: BodyHandle,
        source: CombatantId,
        ability: Arc<AbilityConfig>,
        settings: Arc<ProjectileConfig>,
        direction: Vec3,
        launch: LaunchParams,
        spawned_at: f32,
        origin: Vec3,
    ) -> Self {
        let lifetime = launch.lifetime(&settings);
        Self {
            body,
            source,
            ability,
            settings,
            direction: direction.normalize_or_zero(),
            launch,
            spawned_at,
            lifetime,
            last_position: origin,
            hits: 0,
            hit_log: HashMap::new(),
            stopped_by_terrain: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.ability.name
    }

    pub fn settings(&self) -> &ProjectileConfig {
        &self.settings
    }

    pub fn age(&self, now: f32) -> f32 {
        now - self.spawned_at
    }

    pub fn phase(&self, now: f32) -> KinematicPhase {
        phase_at(self.age(now), self.settings.velocity_reverse.as_ref(), self.stopped_by_terrain)
    }

    pub fn hits(&self) -> u32 {
        self.hits
    }

    /// None — без multi-hit (первое попадание terminal)
    pub fn remaining_hits(&self) -> Option<u32> {
        self.settings
            .multi_hit
            .map(|multi| multi.max_hits.saturating_sub(self.hits))
    }

    pub fn stopped_by_terrain(&self) -> bool {
        self.stopped_by_terrain
    }

    pub fn last_hit_on(&self, target: CombatantId) -> Option<f32> {
        self.hit_log.get(&target).copied()
    }

    pub fn is_expired(&self, now: f32) -> bool {
        self.age(now) >= self.lifetime
    }

    /// Скорость от reversal state machine (None — reversal не настроен)
    pub fn steered_velocity(&self, now: f32) -> Option<Vec3> {
        let reverse = self.settings.velocity_reverse?;
        Some(steered_velocity(
            self.phase(now),
            self.direction,
            self.launch.speed,
            reverse.speed_multiplier,
        ))
    }
}

/// Живые снаряды всех бойцов (детерминированный порядок обхода)
#[derive(Debug, Default)]
pub struct ProjectileRegistry {
    live: BTreeMap<BodyHandle, Projectile>,
}

impl ProjectileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launch(&mut self, projectile: Projectile) {
        self.live.insert(projectile.body, projectile);
    }

    pub fn get(&self, body: BodyHandle) -> Option<&Projectile> {
        self.live.get(&body)
    }

    pub fn contains(&self, body: BodyHandle) -> bool {
        self.live.contains_key(&body)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.live.values()
    }

    /// Вынимаем снаряд на время обработки (ctx свободен для мутаций мира)
    fn take(&mut self, body: BodyHandle) -> Option<Projectile> {
        self.live.remove(&body)
    }

    fn restore(&mut self, projectile: Projectile) {
        self.live.insert(projectile.body, projectile);
    }

    fn bodies(&self) -> Vec<BodyHandle> {
        self.live.keys().copied().collect()
    }
}

/// Per-tick обновление всех живых снарядов
pub fn advance_projectiles(ctx: &mut SimContext) {
    for body in ctx.projectiles.bodies() {
        let Some(mut projectile) = ctx.projectiles.take(body) else {
            continue;
        };

        // Orphan: тело или владелец исчезли из мира — тихо убираем без AOE
        if !ctx.world.body_exists(body) || !ctx.world.contains(projectile.source) {
            ctx.world.destroy_body(body);
            crate::log_warning(&format!(
                "Projectile '{}' ({:?}) orphaned, despawned",
                projectile.name(),
                body
            ));
            continue;
        }

        if let Some(position) = ctx.world.body_position(body) {
            projectile.last_position = position;
        }

        if let Some(velocity) = projectile.steered_velocity(ctx.now) {
            ctx.world.set_body_velocity(body, velocity);
        }

        if projectile.settings.face_velocity {
            if let Some(velocity) = ctx.world.body_velocity(body) {
                if velocity != Vec3::ZERO {
                    ctx.world.set_body_rotation(body, facing_rotation(velocity));
                }
            }
        }

        if projectile.is_expired(ctx.now) {
            terminate(ctx, projectile);
        } else {
            ctx.projectiles.restore(projectile);
        }
    }
}

/// AOE → hit FX/sound → destroy. Снаряд уже вынут из registry.
pub fn terminate(ctx: &mut SimContext, projectile: Projectile) {
    let position = ctx
        .world
        .body_position(projectile.body)
        .unwrap_or(projectile.last_position);

    if let Some(aoe) = projectile.settings.aoe {
        resolve_blast(ctx, position, &aoe, projectile.source);
    }

    if let Some(effect) = &projectile.settings.hit_effect {
        ctx.feedback.spawn_effect(effect, position);
    }
    if let Some(cue) = &projectile.ability.hit_sound {
        ctx.feedback.play_sound(cue, position, ctx.rng, &IMPACT_SOUND);
    }

    ctx.world.destroy_body(projectile.body);

    crate::log(&format!(
        "Projectile '{}' terminated at {:.2?} (age {:.2}s, hits {})",
        projectile.name(),
        position,
        projectile.age(ctx.now),
        projectile.hits
    ));
}
