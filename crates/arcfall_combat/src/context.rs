//! Simulation context — всё, что нужно способности на один вызов
//!
//! Вместо глобального `world`: engine собирает контекст на тик и передаёт
//! по ссылке в controller → ability → projectile.

use rand_chacha::ChaCha8Rng;

use crate::projectile::ProjectileRegistry;
use crate::world::{CombatWorld, FeedbackQueue};

pub struct SimContext<'a> {
    /// Simulation time текущего тика (секунды)
    pub now: f32,
    pub world: &'a mut dyn CombatWorld,
    pub feedback: &'a mut FeedbackQueue,
    pub projectiles: &'a mut ProjectileRegistry,
    pub rng: &'a mut ChaCha8Rng,
}

impl<'a> SimContext<'a> {
    pub fn new(
        now: f32,
        world: &'a mut dyn CombatWorld,
        feedback: &'a mut FeedbackQueue,
        projectiles: &'a mut ProjectileRegistry,
        rng: &'a mut ChaCha8Rng,
    ) -> Self {
        Self {
            now,
            world,
            feedback,
            projectiles,
            rng,
        }
    }
}
