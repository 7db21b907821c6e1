//! Resource pool бойца (health / mana / stamina)
//!
//! Инвариант: 0 ≤ current ≤ max

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct ResourcePool {
    pub current: f32,
    pub max: f32,
    /// units per second (0 — без регена)
    pub regen_rate: f32,
}

impl Default for ResourcePool {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl ResourcePool {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate: 0.0,
        }
    }

    pub fn with_regen(mut self, regen_rate: f32) -> Self {
        self.regen_rate = regen_rate;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Списание с clamp в 0. Возвращает фактически списанное.
    pub fn drain(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current - amount.max(0.0)).max(0.0);
        before - self.current
    }

    pub fn restore(&mut self, amount: f32) {
        self.current = (self.current + amount.max(0.0)).min(self.max);
    }

    pub fn regenerate(&mut self, delta_time: f32) {
        self.restore(self.regen_rate * delta_time);
    }

    /// Новый максимум + полное восстановление
    pub fn reset_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.max;
    }
}
