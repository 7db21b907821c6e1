//! Physics collaborator (tactical layer)
//!
//! Все вызовы синхронные: spawn/raycast/overlap возвращают результат сразу.
//! Collision callbacks заменены очередью событий (`drain_collisions`),
//! которую движок разбирает в начале тика — без re-entrancy.

use bevy::prelude::*;

use super::{BodyHandle, Contact};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColliderDesc {
    pub shape: ColliderShape,
    pub sensor: bool,
    pub friction: f32,
    pub restitution: f32,
}

/// Параметры нового dynamic body
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    pub label: String,
    pub model: Option<String>,
    pub model_scale: f32,
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub gravity_scale: f32,
    pub collider: ColliderDesc,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    pub distance: f32,
    pub contact: Contact,
}

/// Overlap begin/end между телом и чем-то ещё
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    pub body: BodyHandle,
    pub other: Contact,
    pub started: bool,
}

pub trait PhysicsWorld {
    fn spawn_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Повторный destroy уже удалённого тела — no-op
    fn destroy_body(&mut self, body: BodyHandle);

    fn body_exists(&self, body: BodyHandle) -> bool;

    fn body_position(&self, body: BodyHandle) -> Option<Vec3>;

    fn body_velocity(&self, body: BodyHandle) -> Option<Vec3>;

    fn set_body_velocity(&mut self, body: BodyHandle, velocity: Vec3);

    fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3);

    fn apply_torque(&mut self, body: BodyHandle, torque: Vec3);

    fn set_body_rotation(&mut self, body: BodyHandle, rotation: Quat);

    /// Первое попадание луча; `direction` не обязан быть нормализован
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<BodyHandle>,
    ) -> Option<RayHit>;

    /// Мгновенный сферический overlap query (transient region: создать → собрать → снести)
    fn overlap_sphere(&self, center: Vec3, radius: f32) -> Vec<Contact>;

    /// Накопленные с прошлого тика collision events
    fn drain_collisions(&mut self) -> Vec<CollisionEvent>;
}
