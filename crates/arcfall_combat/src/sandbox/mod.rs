//! Sandbox world — минимальный мир для тестов и headless демо
//!
//! НЕ физический движок:
//! - бойцы = сферы, terrain = AABB, снаряды = сферы по half-extent коллайдера
//! - интеграция: gravity * gravity_scale, без contact response (только overlap events)
//! - overlap begin/end считается по пересечению сфер/боксов после каждого step
//! - raycast видит бойцов и terrain (чужие снаряды прозрачны)
//!
//! Правила бойцов: пулы по 100, mana/stamina регенерируют 10/s (stamina только
//! пока боец стоит), урон по мёртвым игнорируется, урон по своей
//! команде блокируется (кроме себя), смерть записывается с убийцей.

use bevy::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

pub mod geometry;
pub mod pool;


pub use geometry::{ray_aabb, ray_sphere, Aabb};
pub use pool::ResourcePool;

use crate::config::{ClassStats, ResourceKind};
use crate::world::{
    BodyDesc, BodyHandle, ColliderShape, CollisionEvent, CombatantDied, CombatantId, CombatantRegistry, Contact,
    DamageDealt, PhysicsWorld, RayHit,
};

pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

/// Затухание скорости бойца (knockback/use impulse не улетают навсегда)
pub const COMBATANT_DAMPING: f32 = 8.0;

pub const COMBATANT_RADIUS: f32 = 0.5;

/// Регенерация mana/stamina, units per second
pub const DEFAULT_REGEN_RATE: f32 = 10.0;

/// Быстрее — боец "движется", stamina не регенерирует
pub const MOVING_SPEED_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct SandboxBody {
    pub label: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub rotation: Quat,
    pub angular_velocity: Vec3,
    pub gravity_scale: f32,
    pub radius: f32,
    pub sensor: bool,
    /// Some — тело бойца (не генерирует overlap events само)
    pub owner: Option<CombatantId>,
}

#[derive(Debug, Clone)]
pub struct SandboxCombatant {
    pub name: String,
    /// None — вне команд (free-for-all)
    pub team: Option<u32>,
    pub body: BodyHandle,
    pub facing: Vec3,
    pub health: ResourcePool,
    pub mana: ResourcePool,
    pub stamina: ResourcePool,
    pub stats: ClassStats,
    dead: bool,
}

impl SandboxCombatant {
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn pool(&self, kind: ResourceKind) -> &ResourcePool {
        match kind {
            ResourceKind::Health => &self.health,
            ResourceKind::Mana => &self.mana,
            ResourceKind::Stamina => &self.stamina,
        }
    }
}

/// Параметры нового бойца
#[derive(Debug, Clone)]
pub struct CombatantSpawn {
    pub name: String,
    pub team: Option<u32>,
    pub position: Vec3,
    pub facing: Vec3,
    pub radius: f32,
    /// Регенерация mana/stamina (0 — пулы только тратятся)
    pub regen_rate: f32,
}

impl CombatantSpawn {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            team: None,
            position,
            facing: Vec3::Z,
            radius: COMBATANT_RADIUS,
            regen_rate: DEFAULT_REGEN_RATE,
        }
    }

    pub fn regen(mut self, regen_rate: f32) -> Self {
        self.regen_rate = regen_rate.max(0.0);
        self
    }

    pub fn team(mut self, team: u32) -> Self {
        self.team = Some(team);
        self
    }

    pub fn facing(mut self, facing: Vec3) -> Self {
        self.facing = facing.normalize_or_zero();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum OverlapKey {
    Combatant(CombatantId),
    Terrain(usize),
}

impl OverlapKey {
    fn contact(&self) -> Contact {
        match self {
            OverlapKey::Combatant(id) => Contact::Combatant(*id),
            OverlapKey::Terrain(_) => Contact::Terrain,
        }
    }
}

#[derive(Resource, Debug)]
pub struct SandboxWorld {
    gravity: Vec3,
    next_body: u64,
    next_combatant: u64,
    bodies: BTreeMap<BodyHandle, SandboxBody>,
    combatants: BTreeMap<CombatantId, SandboxCombatant>,
    terrain: Vec<Aabb>,
    overlaps: BTreeSet<(BodyHandle, OverlapKey)>,
    collisions: Vec<CollisionEvent>,
    damage_log: Vec<DamageDealt>,
    deaths: Vec<CombatantDied>,
}

impl Default for SandboxWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxWorld {
    pub fn new() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            next_body: 1,
            next_combatant: 1,
            bodies: BTreeMap::new(),
            combatants: BTreeMap::new(),
            terrain: Vec::new(),
            overlaps: BTreeSet::new(),
            collisions: Vec::new(),
            damage_log: Vec::new(),
            deaths: Vec::new(),
        }
    }

    pub fn add_terrain(&mut self, aabb: Aabb) -> usize {
        self.terrain.push(aabb);
        self.terrain.len() - 1
    }

    /// Пол на высоте `height` (верхняя грань), 200x200
    pub fn add_floor(&mut self, height: f32) -> usize {
        self.add_terrain(Aabb::new(
            Vec3::new(-100.0, height - 1.0, -100.0),
            Vec3::new(100.0, height, 100.0),
        ))
    }

    pub fn spawn_combatant(&mut self, spawn: CombatantSpawn) -> CombatantId {
        let id = CombatantId(self.next_combatant);
        self.next_combatant += 1;

        let body = self.insert_body(SandboxBody {
            label: spawn.name.clone(),
            position: spawn.position,
            velocity: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            angular_velocity: Vec3::ZERO,
            gravity_scale: 0.0,
            radius: spawn.radius,
            sensor: false,
            owner: Some(id),
        });

        self.combatants.insert(
            id,
            SandboxCombatant {
                name: spawn.name,
                team: spawn.team,
                body,
                facing: if spawn.facing == Vec3::ZERO { Vec3::Z } else { spawn.facing },
                health: ResourcePool::default(),
                mana: ResourcePool::default().with_regen(spawn.regen_rate),
                stamina: ResourcePool::default().with_regen(spawn.regen_rate),
                stats: ClassStats::default(),
                dead: false,
            },
        );
        id
    }

    /// Боец уходит из мира вместе с телом (его снаряды станут orphan)
    pub fn despawn_combatant(&mut self, id: CombatantId) {
        if let Some(combatant) = self.combatants.remove(&id) {
            self.destroy_body(combatant.body);
        }
        self.overlaps
            .retain(|(_, key)| *key != OverlapKey::Combatant(id));
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&SandboxCombatant> {
        self.combatants.get(&id)
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut SandboxCombatant> {
        self.combatants.get_mut(&id)
    }

    pub fn health(&self, id: CombatantId) -> f32 {
        self.resource(id, ResourceKind::Health).unwrap_or(0.0)
    }

    pub fn mana(&self, id: CombatantId) -> f32 {
        self.resource(id, ResourceKind::Mana).unwrap_or(0.0)
    }

    pub fn set_facing(&mut self, id: CombatantId, facing: Vec3) {
        if let Some(combatant) = self.combatants.get_mut(&id) {
            let facing = facing.normalize_or_zero();
            if facing != Vec3::ZERO {
                combatant.facing = facing;
            }
        }
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&SandboxBody> {
        self.bodies.get(&handle)
    }

    /// Тела, не принадлежащие бойцам (снаряды)
    pub fn free_bodies(&self) -> impl Iterator<Item = (BodyHandle, &SandboxBody)> {
        self.bodies
            .iter()
            .filter(|(_, body)| body.owner.is_none())
            .map(|(handle, body)| (*handle, body))
    }

    pub fn damage_log(&self) -> &[DamageDealt] {
        &self.damage_log
    }

    pub fn deaths(&self) -> &[CombatantDied] {
        &self.deaths
    }

    pub fn drain_damage_events(&mut self) -> Vec<DamageDealt> {
        std::mem::take(&mut self.damage_log)
    }

    pub fn drain_deaths(&mut self) -> Vec<CombatantDied> {
        std::mem::take(&mut self.deaths)
    }

    /// Интеграция + regen + пересчёт overlap'ов
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }

        let damping = (1.0 - COMBATANT_DAMPING * dt).max(0.0);
        for body in self.bodies.values_mut() {
            if body.owner.is_none() {
                body.velocity += self.gravity * body.gravity_scale * dt;
            }
            body.position += body.velocity * dt;
            if body.angular_velocity != Vec3::ZERO {
                body.rotation = (Quat::from_scaled_axis(body.angular_velocity * dt) * body.rotation).normalize();
            }
            if body.owner.is_some() {
                body.velocity *= damping;
            }
        }

        for combatant in self.combatants.values_mut() {
            if combatant.dead {
                continue;
            }
            combatant.mana.regenerate(dt);

            let moving = self
                .bodies
                .get(&combatant.body)
                .is_some_and(|body| body.velocity.length() > MOVING_SPEED_THRESHOLD);
            if !moving {
                combatant.stamina.regenerate(dt);
            }
        }

        self.detect_overlaps();
    }

    fn insert_body(&mut self, body: SandboxBody) -> BodyHandle {
        let handle = BodyHandle(self.next_body);
        self.next_body += 1;
        self.bodies.insert(handle, body);
        handle
    }

    fn detect_overlaps(&mut self) {
        let mut current = BTreeSet::new();

        for (handle, body) in self.bodies.iter().filter(|(_, body)| body.owner.is_none()) {
            for (id, combatant) in &self.combatants {
                let Some(target) = self.bodies.get(&combatant.body) else {
                    continue;
                };
                if body.position.distance(target.position) < body.radius + target.radius {
                    current.insert((*handle, OverlapKey::Combatant(*id)));
                }
            }
            for (index, aabb) in self.terrain.iter().enumerate() {
                if aabb.intersects_sphere(body.position, body.radius) {
                    current.insert((*handle, OverlapKey::Terrain(index)));
                }
            }
        }

        for (body, key) in current.difference(&self.overlaps) {
            self.collisions.push(CollisionEvent {
                body: *body,
                other: key.contact(),
                started: true,
            });
        }
        for (body, key) in self.overlaps.difference(&current) {
            self.collisions.push(CollisionEvent {
                body: *body,
                other: key.contact(),
                started: false,
            });
        }

        self.overlaps = current;
    }

    /// Детерминированный текстовый снимок (для сравнения прогонов)
    pub fn snapshot(&self) -> String {
        let mut out = String::new();
        for (id, combatant) in &self.combatants {
            let position = self.body_position(combatant.body).unwrap_or(Vec3::ZERO);
            let _ = writeln!(
                out,
                "{:?} {} hp={:?} mp={:?} sp={:?} dead={} pos={:?}",
                id,
                combatant.name,
                combatant.health.current,
                combatant.mana.current,
                combatant.stamina.current,
                combatant.dead,
                position
            );
        }
        for (handle, body) in self.free_bodies() {
            let _ = writeln!(out, "{:?} {} pos={:?} vel={:?}", handle, body.label, body.position, body.velocity);
        }
        let _ = writeln!(out, "damage={} deaths={}", self.damage_log.len(), self.deaths.len());
        out
    }

    fn same_team(&self, a: CombatantId, b: CombatantId) -> bool {
        let team = |id: CombatantId| self.combatants.get(&id).and_then(|c| c.team);
        matches!((team(a), team(b)), (Some(x), Some(y)) if x == y)
    }
}

impl PhysicsWorld for SandboxWorld {
    fn spawn_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let radius = match desc.collider.shape {
            ColliderShape::Ball { radius } => radius,
            ColliderShape::Cuboid { half_extents } => half_extents.max_element(),
        };

        self.insert_body(SandboxBody {
            label: desc.label,
            position: desc.position,
            velocity: desc.linear_velocity,
            rotation: desc.rotation,
            angular_velocity: Vec3::ZERO,
            gravity_scale: desc.gravity_scale,
            radius,
            sensor: desc.collider.sensor,
            owner: None,
        })
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        if self.bodies.remove(&body).is_some() {
            self.overlaps.retain(|(handle, _)| *handle != body);
        }
    }

    fn body_exists(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    fn body_position(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.position)
    }

    fn body_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.bodies.get(&body).map(|b| b.velocity)
    }

    fn set_body_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity = velocity;
        }
    }

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        // Масса 1
        if let Some(b) = self.bodies.get_mut(&body) {
            b.velocity += impulse;
        }
    }

    fn apply_torque(&mut self, body: BodyHandle, torque: Vec3) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.angular_velocity += torque;
        }
    }

    fn set_body_rotation(&mut self, body: BodyHandle, rotation: Quat) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.rotation = rotation;
        }
    }

    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, exclude: Option<BodyHandle>) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 {
            return None;
        }

        let mut best: Option<(f32, Contact)> = None;
        let mut consider = |distance: f32, contact: Contact| {
            if distance <= max_distance && best.is_none_or(|(d, _)| distance < d) {
                best = Some((distance, contact));
            }
        };

        for (id, combatant) in &self.combatants {
            if Some(combatant.body) == exclude {
                continue;
            }
            let Some(body) = self.bodies.get(&combatant.body) else {
                continue;
            };
            if let Some(distance) = ray_sphere(origin, direction, body.position, body.radius) {
                consider(distance, Contact::Combatant(*id));
            }
        }

        for aabb in &self.terrain {
            if let Some(distance) = ray_aabb(origin, direction, aabb) {
                consider(distance, Contact::Terrain);
            }
        }

        best.map(|(distance, contact)| RayHit {
            point: origin + direction * distance,
            distance,
            contact,
        })
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<Contact> {
        let mut contacts = Vec::new();

        for (id, combatant) in &self.combatants {
            let Some(body) = self.bodies.get(&combatant.body) else {
                continue;
            };
            if body.position.distance(center) <= radius {
                contacts.push(Contact::Combatant(*id));
            }
        }

        for (handle, body) in self.free_bodies() {
            if body.position.distance(center) <= radius {
                contacts.push(Contact::Body(handle));
            }
        }

        if self.terrain.iter().any(|aabb| aabb.intersects_sphere(center, radius)) {
            contacts.push(Contact::Terrain);
        }

        contacts
    }

    fn drain_collisions(&mut self) -> Vec<CollisionEvent> {
        std::mem::take(&mut self.collisions)
    }
}

impl CombatantRegistry for SandboxWorld {
    fn contains(&self, id: CombatantId) -> bool {
        self.combatants.contains_key(&id)
    }

    fn resource(&self, id: CombatantId, kind: ResourceKind) -> Option<f32> {
        self.combatants.get(&id).map(|c| c.pool(kind).current)
    }

    fn debit(&mut self, id: CombatantId, kind: ResourceKind, amount: f32) {
        match kind {
            ResourceKind::Health => self.take_damage(id, amount, None),
            ResourceKind::Mana => {
                if let Some(c) = self.combatants.get_mut(&id) {
                    c.mana.drain(amount);
                }
            }
            ResourceKind::Stamina => {
                if let Some(c) = self.combatants.get_mut(&id) {
                    c.stamina.drain(amount);
                }
            }
        }
    }

    fn take_damage(&mut self, id: CombatantId, amount: f32, source: Option<CombatantId>) {
        if amount <= 0.0 {
            return;
        }
        if let Some(attacker) = source {
            if attacker != id && self.same_team(attacker, id) {
                return;
            }
        }

        let Some(target) = self.combatants.get_mut(&id) else {
            return;
        };
        if target.dead {
            return;
        }

        let dealt = target.health.drain(amount);
        let died = target.health.is_empty();
        if died {
            target.dead = true;
        }

        self.damage_log.push(DamageDealt {
            attacker: source,
            target: id,
            damage: dealt,
            target_died: died,
        });

        if died {
            let killer = source.filter(|attacker| *attacker != id);
            self.deaths.push(CombatantDied { combatant: id, killer });
            crate::log_info(&format!("💀 {:?} killed by {:?}", id, killer));
        }
    }

    fn heal(&mut self, id: CombatantId, amount: f32) {
        if let Some(c) = self.combatants.get_mut(&id) {
            if !c.dead {
                c.health.restore(amount);
            }
        }
    }

    /// Отсутствующий боец считается мёртвым (урон по нему невозможен)
    fn is_dead(&self, id: CombatantId) -> bool {
        self.combatants.get(&id).is_none_or(|c| c.dead)
    }

    fn combatant_position(&self, id: CombatantId) -> Option<Vec3> {
        let combatant = self.combatants.get(&id)?;
        self.body_position(combatant.body)
    }

    fn combatant_facing(&self, id: CombatantId) -> Option<Vec3> {
        self.combatants.get(&id).map(|c| c.facing)
    }

    fn combatant_body(&self, id: CombatantId) -> Option<BodyHandle> {
        self.combatants.get(&id).map(|c| c.body)
    }

    fn teleport(&mut self, id: CombatantId, position: Vec3) {
        let Some(body) = self.combatant_body(id) else {
            return;
        };
        if let Some(b) = self.bodies.get_mut(&body) {
            b.position = position;
            b.velocity = Vec3::ZERO;
        }
    }

    fn apply_class_stats(&mut self, id: CombatantId, stats: &ClassStats) {
        if let Some(c) = self.combatants.get_mut(&id) {
            c.health.reset_max(stats.max_health);
            c.stats = *stats;
            c.dead = false;
        }
    }
}

/// FixedUpdate: физика sandbox шагает до engine step
pub fn step_sandbox_physics(time: Res<Time<Fixed>>, mut world: ResMut<SandboxWorld>) {
    world.step(time.timestep().as_secs_f32());
}

/// Журнал урона/смертей sandbox → bevy Events
pub fn forward_sandbox_outcomes(
    mut world: ResMut<SandboxWorld>,
    mut damage_events: EventWriter<DamageDealt>,
    mut death_events: EventWriter<CombatantDied>,
) {
    for event in world.drain_damage_events() {
        damage_events.write(event);
    }
    for event in world.drain_deaths() {
        death_events.write(event);
    }
}
