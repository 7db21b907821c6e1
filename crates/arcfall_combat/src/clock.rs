//! Simulation clock
//!
//! Все таймеры (cooldown, заряд, возраст снаряда, multi-hit cooldown) читают
//! это время, а не wall clock. Один advance на тик → replay даёт тот же результат.

use bevy::prelude::*;

/// Монотонное simulation time в секундах
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Resource)]
pub struct SimClock {
    elapsed: f32,
    tick: u64,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Часы, уже стоящие на заданном времени (для тестов и restore)
    pub fn at(seconds: f32) -> Self {
        Self {
            elapsed: seconds,
            tick: 0,
        }
    }

    pub fn now(&self) -> f32 {
        self.elapsed
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Отрицательный dt игнорируется (clock монотонный)
    pub fn advance(&mut self, dt: f32) -> f32 {
        if dt > 0.0 {
            self.elapsed += dt;
        }
        self.tick += 1;
        self.elapsed
    }
}
